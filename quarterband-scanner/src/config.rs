//! Environment-driven configuration.
//!
//! Every knob is overridable through a `QB_*` variable and falls back to a
//! sane deployment default. A variable that is present but unparseable is a
//! startup error, never a silent fallback.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use smol_str::SmolStr;
use url::Url;

use crate::error::ConfigError;
use crate::score::ScorePolicy;

const DEFAULT_EXCHANGE_URL: &str = "https://api.exchange.coinbase.com";

/// Scanner configuration.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Exchange REST base URL.
    pub exchange_url: Url,
    /// Quote currency defining the product universe.
    pub quote_currency: SmolStr,
    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
    /// Eligibility gates and band-widening bounds.
    pub filter: FilterConfig,
    /// Scoring strategy.
    pub score_policy: ScorePolicy,
    /// Size bound on the published scoreboard.
    pub top_k: usize,
    /// Fixed refresh cadence.
    pub refresh_interval: Duration,
    /// Maximum products snapshotted concurrently within one cycle.
    pub fetch_concurrency: usize,
    /// Daily-candle lookback for the 7d momentum feature.
    pub candle_days: i64,
}

/// Eligibility gate thresholds and adaptive-widening bounds.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub price_min: f64,
    pub price_max: f64,
    pub min_dollar_volume: f64,
    pub max_spread_pct: f64,
    /// Empty list admits every symbol.
    pub symbol_allow: Vec<SmolStr>,
    pub symbol_deny: Vec<SmolStr>,
    /// Widening target; 0 disables widening entirely.
    pub min_candidates: usize,
    pub widen_step: f64,
    pub price_max_cap: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            price_min: 0.10,
            price_max: 0.25,
            min_dollar_volume: 10_000_000.0,
            max_spread_pct: 0.35,
            symbol_allow: Vec::new(),
            symbol_deny: Vec::new(),
            min_candidates: 0,
            widen_step: 0.05,
            price_max_cap: 1.00,
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            exchange_url: Url::parse(DEFAULT_EXCHANGE_URL).expect("default URL is valid"),
            quote_currency: SmolStr::new_static("USD"),
            http_timeout: Duration::from_secs(25),
            filter: FilterConfig::default(),
            score_policy: ScorePolicy::default(),
            top_k: 13,
            refresh_interval: Duration::from_secs(30),
            fetch_concurrency: 12,
            candle_days: 8,
        }
    }
}

/// Read `name`, falling back to `default` when unset or blank.
pub fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parse `name` into `T`, falling back to `default` when unset or blank.
///
/// A present-but-unparseable value is an error, per the fail-fast startup
/// contract.
pub fn env_parse<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(default);
            }
            trimmed
                .parse::<T>()
                .map_err(|_| ConfigError::Parse { name, value: raw })
        }
    }
}

/// Parse a comma-separated symbol list, uppercased, blanks dropped.
fn env_symbols(name: &str) -> Vec<SmolStr> {
    env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|symbol| !symbol.is_empty())
        .map(|symbol| SmolStr::new(symbol.to_uppercase()))
        .collect()
}

impl ScannerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let filter_defaults = FilterConfig::default();

        let raw_url = env_str("QB_EXCHANGE_URL", DEFAULT_EXCHANGE_URL);
        let exchange_url = Url::parse(&raw_url).map_err(|_| ConfigError::Parse {
            name: "QB_EXCHANGE_URL",
            value: raw_url,
        })?;

        let config = Self {
            exchange_url,
            quote_currency: SmolStr::new(env_str("QB_QUOTE_CURRENCY", "USD").to_uppercase()),
            http_timeout: Duration::from_secs(env_parse("QB_HTTP_TIMEOUT_SECS", 25u64)?),
            filter: FilterConfig {
                price_min: env_parse("QB_PRICE_MIN", filter_defaults.price_min)?,
                price_max: env_parse("QB_PRICE_MAX", filter_defaults.price_max)?,
                min_dollar_volume: env_parse(
                    "QB_MIN_DOLLAR_VOLUME",
                    filter_defaults.min_dollar_volume,
                )?,
                max_spread_pct: env_parse("QB_MAX_SPREAD_PCT", filter_defaults.max_spread_pct)?,
                symbol_allow: env_symbols("QB_SYMBOL_ALLOW"),
                symbol_deny: env_symbols("QB_SYMBOL_DENY"),
                min_candidates: env_parse("QB_MIN_CANDIDATES", filter_defaults.min_candidates)?,
                widen_step: env_parse("QB_WIDEN_STEP", filter_defaults.widen_step)?,
                price_max_cap: env_parse("QB_PRICE_MAX_CAP", filter_defaults.price_max_cap)?,
            },
            score_policy: env_parse("QB_SCORE_POLICY", ScorePolicy::default())?,
            top_k: env_parse("QB_TOP_K", defaults.top_k)?,
            refresh_interval: Duration::from_secs(env_parse("QB_REFRESH_SECONDS", 30u64)?),
            fetch_concurrency: env_parse("QB_FETCH_CONCURRENCY", defaults.fetch_concurrency)?,
            candle_days: env_parse("QB_CANDLE_DAYS", defaults.candle_days)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: &str| Err(ConfigError::Invalid(message.to_string()));

        let filter = &self.filter;
        if filter.price_min < 0.0 || filter.price_min > filter.price_max {
            return invalid("price band requires 0 <= QB_PRICE_MIN <= QB_PRICE_MAX");
        }
        if filter.price_max_cap < filter.price_max {
            return invalid("QB_PRICE_MAX_CAP must be >= QB_PRICE_MAX");
        }
        if filter.widen_step <= 0.0 {
            return invalid("QB_WIDEN_STEP must be > 0");
        }
        if filter.min_dollar_volume < 0.0 {
            return invalid("QB_MIN_DOLLAR_VOLUME must be >= 0");
        }
        if filter.max_spread_pct < 0.0 {
            return invalid("QB_MAX_SPREAD_PCT must be >= 0");
        }
        if self.top_k == 0 {
            return invalid("QB_TOP_K must be >= 1");
        }
        if self.refresh_interval.is_zero() {
            return invalid("QB_REFRESH_SECONDS must be >= 1");
        }
        if self.fetch_concurrency == 0 {
            return invalid("QB_FETCH_CONCURRENCY must be >= 1");
        }
        if self.http_timeout.is_zero() {
            return invalid("QB_HTTP_TIMEOUT_SECS must be >= 1");
        }
        if self.candle_days < 1 {
            return invalid("QB_CANDLE_DAYS must be >= 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(ScannerConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_price_band_is_rejected() {
        let mut config = ScannerConfig::default();
        config.filter.price_min = 0.50;
        config.filter.price_max = 0.25;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn cap_below_band_is_rejected() {
        let mut config = ScannerConfig::default();
        config.filter.price_max_cap = 0.20;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let mut config = ScannerConfig::default();
        config.top_k = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
