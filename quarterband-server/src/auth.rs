use axum::extract::Request;
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

/// Extension type injected into every request so the middleware can read
/// the configured credential pair.
#[derive(Clone)]
pub struct BasicAuth(pub Option<(String, String)>);

/// Axum middleware: require `Authorization: Basic <base64(user:pass)>`
/// when credentials are configured.
///
/// With no credentials configured the middleware is a no-op; the startup
/// path logs that state so it cannot pass silently.
pub async fn require_basic_auth(request: Request, next: Next) -> Response {
    let configured = request
        .extensions()
        .get::<BasicAuth>()
        .cloned()
        .unwrap_or(BasicAuth(None));

    let Some((user, pass)) = configured.0 else {
        return next.run(request).await;
    };

    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if let Some((got_user, got_pass)) = decode_basic(header_value) {
        // Bitwise AND keeps both comparisons running regardless of the
        // first outcome.
        let matches = constant_time_eq(got_user.as_bytes(), user.as_bytes())
            & constant_time_eq(got_pass.as_bytes(), pass.as_bytes());
        if matches {
            return next.run(request).await;
        }
    }

    let body = json!({ "error": "unauthorized" });
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"quarterband\"")],
        axum::Json(body),
    )
        .into_response()
}

/// Parse an `Authorization: Basic <payload>` header into its credential pair.
fn decode_basic(header_value: &str) -> Option<(String, String)> {
    let payload = header_value.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(payload.trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (user, pass) = text.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
