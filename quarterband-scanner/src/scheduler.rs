//! Fixed-cadence refresh loop.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::cache::ScanCache;
use crate::scanner::Scanner;

/// Spawn the perpetual refresh task.
///
/// Each tick runs one pipeline cycle; a successful cycle atomically
/// replaces the cache with its complete board, a failed cycle leaves the
/// previous board untouched and waits for the next tick. The cadence is
/// fixed: no backoff, no jitter, no early retry. Cycles never overlap
/// because the next tick is only awaited after the current cycle finishes.
pub fn spawn_refresh_loop(scanner: Arc<Scanner>, cache: ScanCache) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(scanner.config().refresh_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            timer.tick().await;

            match scanner.run_cycle().await {
                Ok(board) => {
                    info!(
                        picks = board.picks.len(),
                        policy = %scanner.config().score_policy,
                        "scoreboard refreshed"
                    );
                    cache.store(board);
                }
                Err(err) if err.is_transient() => {
                    warn!(%err, "refresh cycle degraded upstream, keeping previous scoreboard");
                }
                Err(err) => {
                    error!(%err, "refresh cycle failed, keeping previous scoreboard");
                }
            }
        }
    })
}
