use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Unified error type for API responses.
///
/// Upstream exchange degradation never reaches this layer (degraded data
/// surfaces as empty/previous results), so the only client-visible errors
/// are malformed requests.
#[derive(Debug)]
pub enum ServerError {
    BadRequest(String),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "bad_request: {msg}"),
        }
    }
}

impl std::error::Error for ServerError {}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}
