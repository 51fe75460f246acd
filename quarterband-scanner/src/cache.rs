//! Shared scoreboard cache: one writer, many readers.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::market::Scoreboard;

/// Process-wide holder of the latest fully-built [`Scoreboard`].
///
/// The scheduler replaces the inner `Arc` wholesale after each successful
/// cycle; readers clone the `Arc` under a read lock held only for the
/// pointer copy. No reader can ever observe a partially-updated board, and
/// a board handed out keeps its contents alive even across later swaps.
#[derive(Debug, Clone, Default)]
pub struct ScanCache {
    inner: Arc<RwLock<Arc<Scoreboard>>>,
}

impl ScanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest published board (empty before the first successful refresh).
    pub fn load(&self) -> Arc<Scoreboard> {
        Arc::clone(&self.inner.read())
    }

    /// Publish a complete board, replacing the previous one in one swap.
    pub fn store(&self, board: Scoreboard) {
        *self.inner.write() = Arc::new(board);
    }

    /// Whether at least one refresh has completed since startup.
    pub fn has_refreshed(&self) -> bool {
        self.load().last_refresh.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[test]
    fn starts_empty_and_unrefreshed() {
        let cache = ScanCache::new();
        let board = cache.load();
        assert!(board.picks.is_empty());
        assert!(board.last_refresh.is_none());
        assert!(!cache.has_refreshed());
    }

    #[test]
    fn store_replaces_wholesale() {
        let cache = ScanCache::new();
        let held = cache.load();

        let refreshed_at = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        cache.store(Scoreboard {
            picks: Vec::new(),
            last_refresh: Some(refreshed_at),
        });

        assert!(cache.has_refreshed());
        assert_eq!(cache.load().last_refresh, Some(refreshed_at));
        // a board handed out before the swap is unchanged
        assert!(held.last_refresh.is_none());
    }

    #[test]
    fn clones_share_the_same_board() {
        let cache = ScanCache::new();
        let reader = cache.clone();

        let refreshed_at = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        cache.store(Scoreboard {
            picks: Vec::new(),
            last_refresh: Some(refreshed_at),
        });

        assert_eq!(reader.load().last_refresh, Some(refreshed_at));
    }
}
