//! Serde helpers for the exchange wire format.
//!
//! Coinbase transmits most numeric fields as JSON strings (`"0.2475"`);
//! these deserializers parse them in place so the rest of the crate only
//! ever sees `f64`.

use serde::{Deserialize, Deserializer};

/// Deserialize an `f64` transmitted as a JSON string.
pub fn f64_from_str<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| serde::de::Error::custom(format!("invalid numeric string {raw:?}")))
}

/// Deserialize an optional `f64` from a missing, null, or empty JSON string.
pub fn opt_f64_from_str<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid numeric string {raw:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(deserialize_with = "super::f64_from_str")]
        price: f64,
        #[serde(default, deserialize_with = "super::opt_f64_from_str")]
        bid: Option<f64>,
    }

    #[test]
    fn parses_string_encoded_numerics() {
        let payload: Payload = serde_json::from_str(r#"{"price": "0.2475", "bid": "0.2470"}"#)
            .expect("valid payload");
        assert_eq!(payload.price, 0.2475);
        assert_eq!(payload.bid, Some(0.2470));
    }

    #[test]
    fn absent_null_and_empty_optionals_are_none() {
        let absent: Payload = serde_json::from_str(r#"{"price": "1.0"}"#).expect("absent bid");
        assert_eq!(absent.bid, None);

        let null: Payload = serde_json::from_str(r#"{"price": "1.0", "bid": null}"#).expect("null bid");
        assert_eq!(null.bid, None);

        let empty: Payload = serde_json::from_str(r#"{"price": "1.0", "bid": ""}"#).expect("empty bid");
        assert_eq!(empty.bid, None);
    }

    #[test]
    fn garbage_numerics_are_rejected() {
        assert!(serde_json::from_str::<Payload>(r#"{"price": "not-a-number"}"#).is_err());
    }
}
