use axum::Json;
use axum::extract::{Query, State};
use axum::response::Html;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quarterband_scanner::ScoredCandidate;
use quarterband_scanner::exchange::coinbase::GRANULARITIES;

use crate::error::ServerError;
use crate::render;
use crate::state::AppState;

/// `GET /`: the auto-refreshing scoreboard page.
pub async fn scoreboard_page(State(state): State<AppState>) -> Html<String> {
    let board = state.cache.load();
    Html(render::scoreboard_page(&board, state.scanner.config()))
}

#[derive(Debug, Serialize)]
pub struct TopPicksResponse {
    pub last_refresh: Option<DateTime<Utc>>,
    pub picks: Vec<ScoredCandidate>,
}

/// `GET /api/top-picks`: the current ranked board as JSON.
///
/// Always either a previously-successful snapshot or an empty list (first
/// cycle not yet complete); upstream trouble is invisible here.
pub async fn top_picks(State(state): State<AppState>) -> Json<TopPicksResponse> {
    let board = state.cache.load();
    Json(TopPicksResponse {
        last_refresh: board.last_refresh,
        picks: board.picks.clone(),
    })
}

#[derive(Debug, Deserialize)]
pub struct CandlesQuery {
    pub product_id: String,
    #[serde(default = "default_days")]
    pub days: i64,
    #[serde(default = "default_granularity")]
    pub granularity: i64,
}

fn default_days() -> i64 {
    30
}

fn default_granularity() -> i64 {
    86_400
}

/// Close-price series for charting: parallel timestamp/close arrays.
#[derive(Debug, Serialize)]
pub struct CandleSeries {
    pub t: Vec<DateTime<Utc>>,
    pub c: Vec<f64>,
}

/// `GET /api/candles`: close-price history for one product, bypassing the
/// ranking pipeline. A degraded upstream yields an empty series, not an
/// error.
pub async fn candles(
    State(state): State<AppState>,
    Query(query): Query<CandlesQuery>,
) -> Result<Json<CandleSeries>, ServerError> {
    validate_candles_query(&query)?;

    let end = Utc::now();
    let start = end - chrono::Duration::days(query.days + 1);
    let rows = state
        .scanner
        .client()
        .candles(&query.product_id, start, end, query.granularity)
        .await
        .unwrap_or_default();

    let (t, c) = rows
        .into_iter()
        .map(|candle| (candle.time, candle.close))
        .unzip();
    Ok(Json(CandleSeries { t, c }))
}

fn validate_candles_query(query: &CandlesQuery) -> Result<(), ServerError> {
    if query.product_id.trim().is_empty() {
        return Err(ServerError::BadRequest("product_id is required".to_string()));
    }
    if !(1..=365).contains(&query.days) {
        return Err(ServerError::BadRequest(
            "days must be within 1..=365".to_string(),
        ));
    }
    if !GRANULARITIES.contains(&query.granularity) {
        return Err(ServerError::BadRequest(format!(
            "granularity must be one of {GRANULARITIES:?}"
        )));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Whether at least one refresh has completed since startup.
    pub refreshed: bool,
    pub last_refresh: Option<DateTime<Utc>>,
}

/// `GET /api/health`: liveness, unauthenticated.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let board = state.cache.load();
    Json(HealthResponse {
        status: "ok",
        refreshed: board.last_refresh.is_some(),
        last_refresh: board.last_refresh,
    })
}
