//! End-to-end pipeline tests over synthetic snapshots.
//!
//! `assemble` is pure, so a full fetch→filter→score→rank cycle can be
//! exercised here without a network or the refresh loop.

use chrono::{DateTime, Duration, Utc};
use smol_str::SmolStr;

use quarterband_scanner::config::ScannerConfig;
use quarterband_scanner::market::{BookTop, Candle, MarketSnapshot, Product, Stats24h, Ticker};
use quarterband_scanner::scanner::assemble;
use quarterband_scanner::score::ScorePolicy;

fn as_of() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
}

fn daily_closes(closes: &[f64]) -> Vec<Candle> {
    let start = as_of() - Duration::days(closes.len() as i64);
    closes
        .iter()
        .enumerate()
        .map(|(day, &close)| Candle {
            time: start + Duration::days(day as i64),
            low: close * 0.95,
            high: close * 1.05,
            open: close,
            close,
            volume: 1_000.0,
        })
        .collect()
}

struct SnapshotFixture {
    symbol: &'static str,
    last: f64,
    open: f64,
    high: f64,
    low: f64,
    volume: f64,
    bid: Option<f64>,
    ask: Option<f64>,
    closes: Option<Vec<f64>>,
}

impl SnapshotFixture {
    fn build(self) -> MarketSnapshot {
        MarketSnapshot {
            product: Product {
                id: SmolStr::new(format!("{}-USD", self.symbol)),
                base: SmolStr::new(self.symbol),
                quote: SmolStr::new_static("USD"),
            },
            ticker: Some(Ticker {
                price: self.last,
                bid: None,
                ask: None,
            }),
            stats: Some(Stats24h {
                open: self.open,
                high: self.high,
                low: self.low,
                last: self.last,
                volume: self.volume,
            }),
            book: Some(BookTop {
                bid: self.bid,
                ask: self.ask,
            }),
            candles: self.closes.as_deref().map(daily_closes),
        }
    }
}

/// A liquid, tight, in-band asset: eligible under the default config.
fn eligible_fixture(symbol: &'static str) -> SnapshotFixture {
    SnapshotFixture {
        symbol,
        last: 0.20,
        open: 0.19,
        high: 0.21,
        low: 0.18,
        volume: 60_000_000.0,
        bid: Some(0.1998),
        ask: Some(0.2002),
        closes: Some(vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.2]),
    }
}

fn config() -> ScannerConfig {
    ScannerConfig::default()
}

#[test]
fn momentum_spike_scores_zero_momentum_under_bucketed_policy() {
    // ABC-USD at 0.15 against a 0.10 open: +50%, outside every 24h bucket.
    let snapshots = vec![
        SnapshotFixture {
            symbol: "ABC",
            last: 0.15,
            open: 0.10,
            high: 0.16,
            low: 0.09,
            volume: 80_000_000.0,
            bid: Some(0.1498),
            ask: Some(0.1502),
            closes: None,
        }
        .build(),
    ];

    let board = assemble(&config(), &snapshots, as_of());
    assert_eq!(board.picks.len(), 1);

    let pick = &board.picks[0];
    assert!((pick.pct_change_24h.unwrap() - 50.0).abs() < 1e-9);
    // spread ~0.267% lands in the second spread bucket; the +50% momentum
    // term contributes nothing
    assert!((pick.score - 0.15).abs() < 1e-9);
}

#[test]
fn wide_spread_is_excluded() {
    // bid 0.1996 / ask 0.2004 -> mid 0.2, spread 0.4% > 0.35% maximum
    let snapshots = vec![
        SnapshotFixture {
            bid: Some(0.1996),
            ask: Some(0.2004),
            ..eligible_fixture("WIDE")
        }
        .build(),
        eligible_fixture("KEEP").build(),
    ];

    let board = assemble(&config(), &snapshots, as_of());
    let symbols: Vec<&str> = board.picks.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["KEEP"]);
}

#[test]
fn liquidity_boundary_is_inclusive() {
    // 50M base volume at $0.20 is exactly the $10M minimum
    let snapshots = vec![
        SnapshotFixture {
            volume: 50_000_000.0,
            ..eligible_fixture("EDGE")
        }
        .build(),
    ];

    let board = assemble(&config(), &snapshots, as_of());
    assert_eq!(board.picks.len(), 1);
    let volume = board.picks[0].dollar_volume_24h.unwrap();
    assert!((volume - 10_000_000.0).abs() < 1e-3);
    assert!(board.picks[0].gates.liquid);
}

#[test]
fn seven_day_momentum_from_candles() {
    let snapshots = vec![eligible_fixture("MOMO").build()];

    let board = assemble(&config(), &snapshots, as_of());
    let pick = &board.picks[0];
    let change_7d = pick.pct_change_7d.unwrap();
    assert!((change_7d - 20.0).abs() < 1e-9);
}

#[test]
fn unusable_snapshots_are_skipped() {
    let mut no_ticker = eligible_fixture("GONE").build();
    no_ticker.ticker = None;

    let board = assemble(&config(), &[no_ticker, eligible_fixture("HERE").build()], as_of());
    let symbols: Vec<&str> = board.picks.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["HERE"]);
}

#[test]
fn deny_list_vetoes_and_allow_list_restricts() {
    let mut cfg = config();
    cfg.filter.symbol_deny = vec![SmolStr::new_static("BAD")];
    let snapshots = vec![eligible_fixture("BAD").build(), eligible_fixture("OK").build()];
    let board = assemble(&cfg, &snapshots, as_of());
    let symbols: Vec<&str> = board.picks.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["OK"]);

    let mut cfg = config();
    cfg.filter.symbol_allow = vec![SmolStr::new_static("ONLY")];
    let snapshots = vec![eligible_fixture("ONLY").build(), eligible_fixture("OTHER").build()];
    let board = assemble(&cfg, &snapshots, as_of());
    let symbols: Vec<&str> = board.picks.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["ONLY"]);
}

#[test]
fn adaptive_widening_admits_above_band_assets() {
    let mut cfg = config();
    cfg.filter.min_candidates = 1;

    // 0.40 sits above the 0.25 default ceiling but below the 1.00 cap
    let snapshots = vec![
        SnapshotFixture {
            last: 0.40,
            open: 0.39,
            high: 0.42,
            low: 0.38,
            bid: Some(0.3996),
            ask: Some(0.4004),
            ..eligible_fixture("HIGH")
        }
        .build(),
    ];

    let strict = assemble(&config(), &snapshots, as_of());
    assert!(strict.picks.is_empty());

    let widened = assemble(&cfg, &snapshots, as_of());
    assert_eq!(widened.picks.len(), 1);
    assert_eq!(widened.picks[0].symbol, "HIGH");
}

#[test]
fn board_is_ranked_and_truncated() {
    let mut cfg = config();
    cfg.top_k = 2;
    cfg.score_policy = ScorePolicy::Continuous;

    // same spread/liquidity; momentum separates them
    let snapshots = vec![
        SnapshotFixture {
            last: 0.200,
            open: 0.200,
            ..eligible_fixture("FLAT")
        }
        .build(),
        SnapshotFixture {
            last: 0.220,
            open: 0.200,
            ..eligible_fixture("FAST")
        }
        .build(),
        SnapshotFixture {
            last: 0.210,
            open: 0.200,
            ..eligible_fixture("MID")
        }
        .build(),
    ];

    let board = assemble(&cfg, &snapshots, as_of());
    let symbols: Vec<&str> = board.picks.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["FAST", "MID"]);
    assert!(board.picks[0].probability_pct >= board.picks[1].probability_pct);
}

#[test]
fn pipeline_is_deterministic() {
    let snapshots: Vec<MarketSnapshot> = vec![
        eligible_fixture("AAA").build(),
        eligible_fixture("BBB").build(),
        SnapshotFixture {
            last: 0.15,
            open: 0.14,
            ..eligible_fixture("CCC")
        }
        .build(),
    ];

    for policy in [ScorePolicy::Bucketed, ScorePolicy::Continuous] {
        let mut cfg = config();
        cfg.score_policy = policy;

        let first = serde_json::to_string(&assemble(&cfg, &snapshots, as_of())).unwrap();
        let second = serde_json::to_string(&assemble(&cfg, &snapshots, as_of())).unwrap();
        assert_eq!(first, second, "policy {policy} must be deterministic");
    }
}

#[test]
fn probabilities_stay_in_declared_ranges() {
    let snapshots = vec![
        eligible_fixture("AAA").build(),
        SnapshotFixture {
            last: 0.24,
            open: 0.10,
            high: 0.30,
            low: 0.05,
            ..eligible_fixture("BBB")
        }
        .build(),
    ];

    for (policy, lo, hi) in [
        (ScorePolicy::Bucketed, 0.0, 100.0),
        (ScorePolicy::Continuous, 1.0, 99.0),
    ] {
        let mut cfg = config();
        cfg.score_policy = policy;
        let board = assemble(&cfg, &snapshots, as_of());
        for pick in &board.picks {
            assert!(
                (lo..=hi).contains(&pick.probability_pct),
                "{policy}: probability {} outside [{lo}, {hi}]",
                pick.probability_pct
            );
        }
    }
}
