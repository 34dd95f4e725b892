use axum::{
    body::Body,
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::models::SessionId;

/// HTTP header carrying the browsing session id
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Resolves the session from the `x-session-id` header and echoes it back.
///
/// A missing or malformed header starts a new session; callers keep the
/// returned id to continue it.
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    let session = request
        .headers()
        .get(SESSION_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(SessionId)
        .unwrap_or_else(SessionId::new);

    request.extensions_mut().insert(session);

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&session.to_string()) {
        response
            .headers_mut()
            .insert(SESSION_ID_HEADER, header_value);
    }

    response
}

/// Tracing span for a request, tagged with its session
pub fn make_span_with_session(request: &Request<Body>) -> tracing::Span {
    let session = request
        .extensions()
        .get::<SessionId>()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        session = %session,
    )
}
