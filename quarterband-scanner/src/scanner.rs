//! The fetch → filter → score → rank pipeline.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use smol_str::SmolStr;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::config::ScannerConfig;
use crate::error::ScanError;
use crate::exchange::coinbase::CoinbaseClient;
use crate::market::{FeatureSet, GateReport, MarketSnapshot, Scoreboard, ScoredCandidate};
use crate::{feature, filter, rank, score};

/// Drives one full scan cycle against the exchange.
pub struct Scanner {
    client: CoinbaseClient,
    config: ScannerConfig,
}

impl Scanner {
    pub fn new(config: ScannerConfig) -> Result<Self, ScanError> {
        let client = CoinbaseClient::new(config.exchange_url.clone(), config.http_timeout)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Direct access to the exchange client, for callers that need raw
    /// candle series outside the ranking pipeline (charting).
    pub fn client(&self) -> &CoinbaseClient {
        &self.client
    }

    /// One complete cycle: universe → bounded-concurrency snapshots →
    /// assemble. Returns a fully-built board or an error; never a partial
    /// board.
    pub async fn run_cycle(&self) -> Result<Scoreboard, ScanError> {
        let products = self.client.products(&self.config.quote_currency).await?;
        if products.is_empty() {
            return Err(ScanError::Universe(format!(
                "no tradable {} products returned",
                self.config.quote_currency
            )));
        }

        let snapshots = self.sweep(products).await;
        Ok(assemble(&self.config, &snapshots, Utc::now()))
    }

    /// Snapshot every product with at most `fetch_concurrency` products in
    /// flight at once. The permit covers a product's whole four-endpoint
    /// fan-out, so the bound is per product, not per request.
    async fn sweep(&self, products: Vec<crate::market::Product>) -> Vec<MarketSnapshot> {
        let semaphore = Arc::new(Semaphore::new(self.config.fetch_concurrency));
        let fetches = products.into_iter().map(|product| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore.acquire().await.expect("semaphore never closed");
                self.client.snapshot(product, self.config.candle_days).await
            }
        });
        futures::future::join_all(fetches).await
    }
}

/// Assemble a board from already-fetched snapshots: extract → filter (with
/// adaptive widening) → score the eligible → rank.
///
/// Pure and synchronous so a cycle can be exercised in tests without the
/// refresh loop or the network; identical snapshots and timestamp always
/// produce an identical board.
pub fn assemble(
    config: &ScannerConfig,
    snapshots: &[MarketSnapshot],
    as_of: DateTime<Utc>,
) -> Scoreboard {
    let mut rows: Vec<(&MarketSnapshot, FeatureSet)> = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        match feature::extract(snapshot) {
            Some(features) => rows.push((snapshot, features)),
            None => debug!(product = %snapshot.product.id, "snapshot unusable, skipping"),
        }
    }

    let keyed: Vec<(SmolStr, FeatureSet)> = rows
        .iter()
        .map(|(snapshot, features)| (snapshot.product.base.clone(), *features))
        .collect();
    let (band, reports) = filter::resolve_band(&keyed, &config.filter);
    debug!(band_min = band.min, band_max = band.max, "eligibility band resolved");

    let candidates: Vec<ScoredCandidate> = rows
        .iter()
        .zip(reports)
        .filter(|(_, report)| report.eligible())
        .map(|((snapshot, features), report)| {
            build_candidate(config, snapshot, features, report, as_of)
        })
        .collect();

    Scoreboard {
        picks: rank::top_k(candidates, config.top_k),
        last_refresh: Some(as_of),
    }
}

fn build_candidate(
    config: &ScannerConfig,
    snapshot: &MarketSnapshot,
    features: &FeatureSet,
    gates: GateReport,
    as_of: DateTime<Utc>,
) -> ScoredCandidate {
    let outcome = config.score_policy.score(features);
    let (drawdown_p50_pct, drawdown_p90_pct) = score::drawdown_proxies(features.true_range_pct);

    ScoredCandidate {
        product_id: snapshot.product.id.clone(),
        symbol: snapshot.product.base.clone(),
        price: features.last_price,
        pct_change_24h: features.pct_change_24h,
        pct_change_7d: features.pct_change_7d,
        spread_pct: features.spread_pct,
        dollar_volume_24h: features.dollar_volume_24h,
        gates,
        score: outcome.score,
        probability_pct: outcome.probability_pct,
        drawdown_p50_pct,
        drawdown_p90_pct,
        as_of,
    }
}
