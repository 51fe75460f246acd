//! Domain types flowing through the scan pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A tradable base/quote currency pair on the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Exchange-assigned pair identifier, e.g. `ABC-USD`.
    pub id: SmolStr,
    /// Base asset symbol, e.g. `ABC`.
    pub base: SmolStr,
    /// Quote currency, e.g. `USD`.
    pub quote: SmolStr,
}

/// Last trade price and the quoted top of book from the ticker endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub price: f64,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
}

/// Rolling 24h statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats24h {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub last: f64,
    pub volume: f64,
}

/// Best bid and ask from the level-1 order book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BookTop {
    pub bid: Option<f64>,
    pub ask: Option<f64>,
}

impl BookTop {
    /// Midpoint of the quoted book, when both sides exist.
    pub fn mid(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => None,
        }
    }

    /// Bid/ask spread as a percentage of the midpoint.
    ///
    /// `None` when either side is missing or the midpoint is non-positive;
    /// an unknown spread stays unknown rather than becoming a sentinel.
    pub fn spread_pct(&self) -> Option<f64> {
        let mid = self.mid()?;
        if mid <= 0.0 {
            return None;
        }
        let (bid, ask) = (self.bid?, self.ask?);
        Some((ask - bid) / mid * 100.0)
    }
}

/// One OHLCV bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: DateTime<Utc>,
    pub low: f64,
    pub high: f64,
    pub open: f64,
    pub close: f64,
    pub volume: f64,
}

/// Point-in-time read of everything the pipeline needs for one product.
///
/// Every endpoint read is independently optional: a failed or malformed
/// response leaves that field `None` without poisoning the rest of the
/// snapshot. The caller decides whether the snapshot is usable.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub product: Product,
    pub ticker: Option<Ticker>,
    pub stats: Option<Stats24h>,
    pub book: Option<BookTop>,
    pub candles: Option<Vec<Candle>>,
}

/// Raw copies plus derived per-asset features for one snapshot.
///
/// Derived fields are `None` whenever a prerequisite raw field is missing
/// or degenerate (zero/negative denominator); downstream consumers treat
/// `None` as "term excluded", never as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureSet {
    pub last_price: f64,
    pub open_24h: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub base_volume_24h: f64,
    pub pct_change_24h: Option<f64>,
    pub pct_change_7d: Option<f64>,
    pub spread_pct: Option<f64>,
    pub dollar_volume_24h: Option<f64>,
    pub true_range_pct: Option<f64>,
}

/// Gate outcomes in evaluation order; eligibility is their conjunction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateReport {
    /// Passed the deny list and (if configured) the allow list.
    pub listed: bool,
    /// Last price inside the effective price band.
    pub in_band: bool,
    /// 24h dollar volume at or above the configured minimum.
    pub liquid: bool,
    /// Known spread at or below the configured maximum.
    pub tight: bool,
}

impl GateReport {
    pub fn eligible(&self) -> bool {
        self.listed && self.in_band && self.liquid && self.tight
    }
}

/// A ranked pick: identity, features, gates, score, and risk proxies.
///
/// Candidates are built fresh every refresh cycle and never mutated; the
/// score and probability are heuristic placeholders, not forecasts.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    pub product_id: SmolStr,
    pub symbol: SmolStr,
    pub price: f64,
    pub pct_change_24h: Option<f64>,
    pub pct_change_7d: Option<f64>,
    pub spread_pct: Option<f64>,
    pub dollar_volume_24h: Option<f64>,
    pub gates: GateReport,
    /// Momentum/quality score in [0, 1].
    pub score: f64,
    /// Pseudo-probability of the target move, as a percentage.
    pub probability_pct: f64,
    /// Median drawdown proxy, percent.
    pub drawdown_p50_pct: f64,
    /// Tail drawdown proxy, percent.
    pub drawdown_p90_pct: f64,
    pub as_of: DateTime<Utc>,
}

/// The published result of one refresh cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Scoreboard {
    pub picks: Vec<ScoredCandidate>,
    /// `None` until the first successful refresh.
    pub last_refresh: Option<DateTime<Utc>>,
}
