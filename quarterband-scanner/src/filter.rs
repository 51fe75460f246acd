//! Eligibility gates and adaptive price-band widening.

use smol_str::SmolStr;
use tracing::debug;

use crate::config::FilterConfig;
use crate::market::{FeatureSet, GateReport};

/// Inclusive price band the gates evaluate against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBand {
    pub min: f64,
    pub max: f64,
}

impl PriceBand {
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

/// Evaluate the gates for one asset.
///
/// Gate order is fixed for explainability: deny list, allow list (only
/// when non-empty), price band, liquidity, spread. Each outcome is recorded
/// independently; unknown dollar volume or spread fails its gate.
pub fn evaluate(
    symbol: &str,
    features: &FeatureSet,
    config: &FilterConfig,
    band: PriceBand,
) -> GateReport {
    let denied = config.symbol_deny.iter().any(|s| s.as_str() == symbol);
    let allowed =
        config.symbol_allow.is_empty() || config.symbol_allow.iter().any(|s| s.as_str() == symbol);

    GateReport {
        listed: !denied && allowed,
        in_band: band.contains(features.last_price),
        liquid: features
            .dollar_volume_24h
            .is_some_and(|volume| volume >= config.min_dollar_volume),
        tight: features
            .spread_pct
            .is_some_and(|spread| spread <= config.max_spread_pct),
    }
}

/// Resolve the effective band and per-asset gate reports.
///
/// Starts from the configured band; while fewer than `min_candidates`
/// assets are eligible and the upper bound is below `price_max_cap`, the
/// bound is raised by `widen_step` (clamped to the cap) and the
/// already-extracted features are re-evaluated. The upper bound only ever
/// increases, so the loop runs at most `ceil((cap - max) / step)` extra
/// passes. `min_candidates == 0` disables widening.
pub fn resolve_band(
    assets: &[(SmolStr, FeatureSet)],
    config: &FilterConfig,
) -> (PriceBand, Vec<GateReport>) {
    let mut band = PriceBand {
        min: config.price_min,
        max: config.price_max,
    };

    loop {
        let reports: Vec<GateReport> = assets
            .iter()
            .map(|(symbol, features)| evaluate(symbol, features, config, band))
            .collect();
        let eligible = reports.iter().filter(|report| report.eligible()).count();

        if eligible >= config.min_candidates || band.max >= config.price_max_cap {
            return (band, reports);
        }

        band.max = (band.max + config.widen_step).min(config.price_max_cap);
        debug!(
            eligible,
            min_candidates = config.min_candidates,
            band_max = band.max,
            "widening price band"
        );
    }
}
