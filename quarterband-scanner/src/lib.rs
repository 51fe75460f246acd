//! QuarterBand scanner: fetch → filter → score → rank over the Coinbase
//! Exchange public market-data API.
//!
//! Each refresh cycle gathers per-product snapshots concurrently (bounded
//! fan-out), derives momentum/liquidity/volatility features, gates them for
//! quality, scores the survivors with a provisional heuristic, and
//! publishes a ranked, size-bounded scoreboard by atomically replacing a
//! shared cache. Readers always see either a complete board or the empty
//! pre-first-refresh board, never a partial one.

pub mod cache;
pub mod config;
pub mod de;
pub mod error;
pub mod exchange;
pub mod feature;
pub mod filter;
pub mod market;
pub mod rank;
pub mod scanner;
pub mod scheduler;
pub mod score;

// Re-export the types the server (and other embedders) touch every day.
pub use cache::ScanCache;
pub use config::{FilterConfig, ScannerConfig};
pub use error::{ConfigError, ScanError};
pub use exchange::coinbase::CoinbaseClient;
pub use market::{
    BookTop, Candle, FeatureSet, GateReport, MarketSnapshot, Product, Scoreboard, ScoredCandidate,
    Stats24h, Ticker,
};
pub use scanner::{Scanner, assemble};
pub use scheduler::spawn_refresh_loop;
pub use score::ScorePolicy;
