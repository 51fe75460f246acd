//! REST client for the Coinbase Exchange public market-data API.
//!
//! All endpoints are public; no credentials are attached. Per-product
//! endpoint failures (non-2xx, timeout, malformed payload) degrade that
//! endpoint's value to `None` after a `debug!` log and never propagate
//! past this module. Only the product-universe fetch surfaces a typed
//! error, because without a universe there is nothing to scan.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use smol_str::SmolStr;
use tracing::debug;
use url::Url;

use crate::de;
use crate::error::ScanError;
use crate::market::{BookTop, Candle, MarketSnapshot, Product, Stats24h, Ticker};

/// Maximum rows the candle endpoint returns per request.
pub const MAX_CANDLE_ROWS: i64 = 300;

/// Candle bucket widths accepted by the exchange, in seconds.
pub const GRANULARITIES: [i64; 6] = [60, 300, 900, 3600, 21_600, 86_400];

/// Seconds per daily candle bucket.
pub const DAILY_GRANULARITY: i64 = 86_400;

#[derive(Debug, Clone)]
pub struct CoinbaseClient {
    http: Client,
    base_url: Url,
}

impl CoinbaseClient {
    /// Build a client with a bounded per-request timeout.
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, ScanError> {
        // Url::join drops the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ScanError::Transport {
                path: base_url.to_string(),
                source,
            })?;

        Ok(Self { http, base_url })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ScanError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|error| ScanError::Payload {
                path: path.to_string(),
                detail: error.to_string(),
            })?;

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| ScanError::Transport {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        response.json::<T>().await.map_err(|error| ScanError::Payload {
            path: path.to_string(),
            detail: error.to_string(),
        })
    }

    /// Product universe: pairs quoted in `quote` with trading enabled.
    pub async fn products(&self, quote: &str) -> Result<Vec<Product>, ScanError> {
        let raw: Vec<RawProduct> = self.get_json("products", &[]).await?;
        Ok(raw
            .into_iter()
            .filter(|product| {
                product.quote_currency == quote
                    && !product.trading_disabled
                    && product.status.as_deref().is_none_or(|status| status == "online")
            })
            .map(|product| Product {
                id: SmolStr::new(&product.id),
                base: SmolStr::new(&product.base_currency),
                quote: SmolStr::new(&product.quote_currency),
            })
            .collect())
    }

    /// Last trade and quoted top of book. `None` on any failure.
    pub async fn ticker(&self, product_id: &str) -> Option<Ticker> {
        let path = format!("products/{product_id}/ticker");
        match self.get_json::<RawTicker>(&path, &[]).await {
            Ok(raw) => Some(Ticker {
                price: raw.price,
                bid: raw.bid,
                ask: raw.ask,
            }),
            Err(error) => {
                debug!(product_id, %error, "ticker fetch degraded");
                None
            }
        }
    }

    /// Rolling 24h statistics. `None` on any failure.
    pub async fn stats(&self, product_id: &str) -> Option<Stats24h> {
        let path = format!("products/{product_id}/stats");
        match self.get_json::<RawStats>(&path, &[]).await {
            Ok(raw) => Some(Stats24h {
                open: raw.open,
                high: raw.high,
                low: raw.low,
                last: raw.last,
                volume: raw.volume,
            }),
            Err(error) => {
                debug!(product_id, %error, "stats fetch degraded");
                None
            }
        }
    }

    /// Level-1 order book top. `None` on any failure.
    pub async fn book_top(&self, product_id: &str) -> Option<BookTop> {
        let path = format!("products/{product_id}/book");
        match self
            .get_json::<RawBook>(&path, &[("level", "1".to_string())])
            .await
        {
            Ok(raw) => Some(BookTop {
                bid: raw.bids.first().map(|level| level.0),
                ask: raw.asks.first().map(|level| level.0),
            }),
            Err(error) => {
                debug!(product_id, %error, "book fetch degraded");
                None
            }
        }
    }

    /// Candles over `[start, end)` at the given granularity.
    ///
    /// Ranges longer than the endpoint's 300-row cap are split into
    /// sequential sub-requests; the merged rows are sorted ascending by
    /// timestamp because the endpoint's ordering is not trusted. `None` on
    /// any failure.
    pub async fn candles(
        &self,
        product_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity_secs: i64,
    ) -> Option<Vec<Candle>> {
        let path = format!("products/{product_id}/candles");
        let mut merged: Vec<Candle> = Vec::new();

        for (chunk_start, chunk_end) in
            chunk_windows(start, end, granularity_secs, MAX_CANDLE_ROWS)
        {
            let query = [
                ("start", chunk_start.to_rfc3339()),
                ("end", chunk_end.to_rfc3339()),
                ("granularity", granularity_secs.to_string()),
            ];
            match self.get_json::<Vec<RawCandle>>(&path, &query).await {
                Ok(rows) => merged.extend(rows.into_iter().filter_map(candle_from_row)),
                Err(error) => {
                    debug!(product_id, %error, "candle fetch degraded");
                    return None;
                }
            }
        }

        merged.sort_by_key(|candle| candle.time);
        Some(merged)
    }

    /// Daily candles covering the trailing `days`-day momentum window.
    pub async fn daily_candles(&self, product_id: &str, days: i64) -> Option<Vec<Candle>> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(days + 1);
        self.candles(product_id, start, end, DAILY_GRANULARITY).await
    }

    /// All four per-product reads, issued concurrently.
    ///
    /// Individual failures surface as `None` fields; the caller decides
    /// whether the snapshot is usable.
    pub async fn snapshot(&self, product: Product, candle_days: i64) -> MarketSnapshot {
        let (ticker, stats, book, candles) = tokio::join!(
            self.ticker(&product.id),
            self.stats(&product.id),
            self.book_top(&product.id),
            self.daily_candles(&product.id, candle_days),
        );

        MarketSnapshot {
            product,
            ticker,
            stats,
            book,
            candles,
        }
    }
}

/// Split `[start, end)` into windows of at most `max_rows` buckets of
/// `granularity_secs` each.
pub fn chunk_windows(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity_secs: i64,
    max_rows: i64,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut windows = Vec::new();
    if granularity_secs <= 0 || max_rows <= 0 || start >= end {
        return windows;
    }

    let span = chrono::Duration::seconds(granularity_secs * max_rows);
    let mut cursor = start;
    while cursor < end {
        let chunk_end = (cursor + span).min(end);
        windows.push((cursor, chunk_end));
        cursor = chunk_end;
    }
    windows
}

fn candle_from_row(row: RawCandle) -> Option<Candle> {
    let time = DateTime::from_timestamp(row.0, 0)?;
    Some(Candle {
        time,
        low: row.1,
        high: row.2,
        open: row.3,
        close: row.4,
        volume: row.5,
    })
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    id: String,
    base_currency: String,
    quote_currency: String,
    #[serde(default)]
    trading_disabled: bool,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTicker {
    #[serde(deserialize_with = "de::f64_from_str")]
    price: f64,
    #[serde(default, deserialize_with = "de::opt_f64_from_str")]
    bid: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_from_str")]
    ask: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawStats {
    #[serde(deserialize_with = "de::f64_from_str")]
    open: f64,
    #[serde(deserialize_with = "de::f64_from_str")]
    high: f64,
    #[serde(deserialize_with = "de::f64_from_str")]
    low: f64,
    #[serde(deserialize_with = "de::f64_from_str")]
    last: f64,
    #[serde(deserialize_with = "de::f64_from_str")]
    volume: f64,
}

#[derive(Debug, Deserialize)]
struct RawBook {
    #[serde(default)]
    bids: Vec<RawBookLevel>,
    #[serde(default)]
    asks: Vec<RawBookLevel>,
}

/// Level rows are `[price, size, order_count]`; only price and size are
/// numeric strings, and only the price matters here.
#[derive(Debug, Deserialize)]
struct RawBookLevel(
    #[serde(deserialize_with = "de::f64_from_str")] f64,
    #[serde(deserialize_with = "de::f64_from_str")] f64,
    serde_json::Value,
);

/// Candle rows are positional: `[time, low, high, open, close, volume]`.
#[derive(Debug, Deserialize)]
struct RawCandle(i64, f64, f64, f64, f64, f64);
