//! Snapshot → feature derivations.
//!
//! Every derivation is total: missing or degenerate inputs yield `None`,
//! never a sentinel value. All percentages are plain percent (0.4 = 0.4%).

use crate::market::{BookTop, Candle, FeatureSet, MarketSnapshot};

/// 24h percentage change from the stats open to the last trade.
/// `None` when the open is non-positive (undefined, not zero).
pub fn pct_change_24h(last: f64, open: f64) -> Option<f64> {
    if open <= 0.0 {
        return None;
    }
    Some((last - open) / open * 100.0)
}

/// Seven-day momentum from an ascending daily candle series.
///
/// Compares the latest close against the close six buckets earlier
/// (`close[-7]`); requires at least 7 candles and a positive base close.
pub fn pct_change_7d(candles: &[Candle]) -> Option<f64> {
    if candles.len() < 7 {
        return None;
    }
    let close_now = candles[candles.len() - 1].close;
    let close_then = candles[candles.len() - 7].close;
    if close_then <= 0.0 {
        return None;
    }
    Some((close_now - close_then) / close_then * 100.0)
}

/// 24h base volume converted to quote-currency (dollar) volume.
pub fn dollar_volume_24h(base_volume: f64, last: f64) -> Option<f64> {
    if base_volume < 0.0 || last < 0.0 {
        return None;
    }
    Some(base_volume * last)
}

/// Intraday high-minus-low as a percentage of the last trade price.
pub fn true_range_pct(high: f64, low: f64, last: f64) -> Option<f64> {
    if high <= 0.0 || low <= 0.0 || last <= 0.0 {
        return None;
    }
    Some((high - low) / last * 100.0)
}

/// Derive the full feature set for one snapshot.
///
/// Requires the ticker and stats reads; a missing book degrades the spread
/// (falling back to the ticker's own quotes when present) and missing
/// candles degrade the 7d momentum.
pub fn extract(snapshot: &MarketSnapshot) -> Option<FeatureSet> {
    let ticker = snapshot.ticker.as_ref()?;
    let stats = snapshot.stats.as_ref()?;
    let last = ticker.price;

    let spread_pct = snapshot
        .book
        .and_then(|book| book.spread_pct())
        .or_else(|| {
            BookTop {
                bid: ticker.bid,
                ask: ticker.ask,
            }
            .spread_pct()
        });

    Some(FeatureSet {
        last_price: last,
        open_24h: stats.open,
        high_24h: stats.high,
        low_24h: stats.low,
        base_volume_24h: stats.volume,
        pct_change_24h: pct_change_24h(last, stats.open),
        pct_change_7d: snapshot.candles.as_deref().and_then(pct_change_7d),
        spread_pct,
        dollar_volume_24h: dollar_volume_24h(stats.volume, last),
        true_range_pct: true_range_pct(stats.high, stats.low, last),
    })
}
