use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;

use crate::shared::format::format_number;

/// Eastern Indonesia Time (WIT, UTC+9)
const LOCAL_OFFSET_HOURS: i64 = 9;

/// Logs every HTTP request:
/// - timestamp (WIT)
/// - duration (ms)
/// - response size
/// - status code
/// - method and path
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // buffer the body to know its real size
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            let timestamp = Utc::now() + chrono::Duration::hours(LOCAL_OFFSET_HOURS);
            tracing::warn!(
                target: "http",
                "{} | {:>5}ms | {:>12} | {} {:>6} {} ({})",
                timestamp.format("%H:%M:%S"),
                start.elapsed().as_millis(),
                "error",
                parts.status.as_u16(),
                method,
                uri.path(),
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let timestamp = Utc::now() + chrono::Duration::hours(LOCAL_OFFSET_HOURS);
    tracing::info!(
        target: "http",
        "{} | {:>5}ms | {:>12} | {} {:>6} {}",
        timestamp.format("%H:%M:%S"),
        start.elapsed().as_millis(),
        format_number(bytes.len()),
        parts.status.as_u16(),
        method,
        uri.path()
    );

    Response::from_parts(parts, Body::from(bytes))
}
