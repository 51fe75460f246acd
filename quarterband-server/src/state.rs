use std::sync::Arc;

use quarterband_scanner::{ScanCache, Scanner};

/// Shared application state, passed to all route handlers via
/// `axum::extract::State`.
///
/// Handlers only ever read: the scanner for raw candle queries and
/// configuration, the cache for the latest published board.
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
    pub cache: ScanCache,
}
