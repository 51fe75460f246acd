//! Heuristic scoring strategies.
//!
//! Both policies are provisional, hand-weighted heuristics rather than
//! calibrated models: the buckets and weights below are placeholders until
//! something measured replaces them. Every path is pure and total over all
//! finite inputs, and the mapped probability never leaves its declared
//! range.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::market::FeatureSet;

/// Probability floor for snapshots too degenerate to score.
const PROBABILITY_FLOOR: f64 = 0.05;

/// External signal terms for the bucketed probability blend, fixed at zero
/// until real social/catalyst feeds exist.
const SOCIAL_TERM: f64 = 0.0;
const CATALYST_TERM: f64 = 0.0;

/// Scoring strategy, selected by configuration (`QB_SCORE_POLICY`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorePolicy {
    /// Stepwise momentum/spread buckets (the default).
    #[default]
    #[display("bucketed")]
    Bucketed,
    /// Continuous momentum, range-expansion, and volume blend.
    #[display("continuous")]
    Continuous,
}

impl std::str::FromStr for ScorePolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "bucketed" => Ok(Self::Bucketed),
            "continuous" => Ok(Self::Continuous),
            other => Err(format!("unknown score policy {other:?}")),
        }
    }
}

/// Score in [0, 1] plus the mapped probability percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreOutcome {
    pub score: f64,
    pub probability_pct: f64,
}

impl ScorePolicy {
    pub fn score(&self, features: &FeatureSet) -> ScoreOutcome {
        match self {
            Self::Bucketed => bucketed(features),
            Self::Continuous => continuous(features),
        }
    }
}

/// Bucketed policy: additive momentum/spread buckets capped at 1.0, blended
/// into a percentage. `None` features contribute nothing.
fn bucketed(features: &FeatureSet) -> ScoreOutcome {
    let mut score: f64 = 0.0;

    if let Some(change) = features.pct_change_24h {
        if (5.0..=20.0).contains(&change) {
            score += 0.4;
        } else if (0.0..5.0).contains(&change) {
            score += 0.2;
        } else if (-2.0..0.0).contains(&change) {
            score += 0.05;
        }
    }

    if let Some(change) = features.pct_change_7d {
        if change >= 8.0 {
            score += 0.3;
        } else if change >= 3.0 {
            score += 0.15;
        }
    }

    if let Some(spread) = features.spread_pct {
        if spread <= 0.25 {
            score += 0.3;
        } else if spread <= 0.35 {
            score += 0.15;
        }
    }

    let score = score.min(1.0);
    let probability =
        (0.6 * score + 0.2 * SOCIAL_TERM + 0.2 * CATALYST_TERM).clamp(0.0, 1.0);

    ScoreOutcome {
        score,
        probability_pct: probability * 100.0,
    }
}

/// Continuous policy: normalized momentum, intraday range expansion, and
/// log-volume, blended 50/35/15 and mapped into [0.01, 0.99].
fn continuous(features: &FeatureSet) -> ScoreOutcome {
    if features.last_price <= 0.0 || features.open_24h <= 0.0 {
        return ScoreOutcome {
            score: 0.0,
            probability_pct: PROBABILITY_FLOOR * 100.0,
        };
    }

    let open = features.open_24h;
    let momentum = ((features.last_price - open) / open).clamp(-0.20, 0.20);
    let momentum = (momentum + 0.20) / 0.40;

    let expansion = ((features.high_24h - features.low_24h) / open).clamp(0.0, 0.25) / 0.25;

    let volume = if features.base_volume_24h > 0.0 {
        (features.base_volume_24h.log10() / 8.0).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let score = 0.50 * momentum + 0.35 * expansion + 0.15 * volume;
    let probability = (0.05 + 0.90 * score).clamp(0.01, 0.99);

    ScoreOutcome {
        score,
        probability_pct: probability * 100.0,
    }
}

/// Drawdown-risk proxies `(p50, p90)` in percent, stretched from the
/// intraday true range, with fixed fallbacks when the range is unknown.
pub fn drawdown_proxies(true_range_pct: Option<f64>) -> (f64, f64) {
    match true_range_pct {
        Some(range) => ((1.2 * range).max(8.0), (2.1 * range).max(15.0)),
        None => (18.0, 32.0),
    }
}
