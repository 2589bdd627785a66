// admin-backend/src/middleware/slow_log.rs

use crate::log_with_context;
use crate::logging::RequestContext;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};

/// 閾値を超えたリクエストを WARN で記録する
pub async fn slow_request_middleware(
    State(threshold): State<Duration>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let request_id = req
        .extensions()
        .get::<RequestContext>()
        .map(|context| context.request_id.clone());

    let response = next.run(req).await;
    let elapsed = start.elapsed();

    if elapsed >= threshold {
        log_with_context!(
            tracing::Level::WARN,
            "Slow request detected",
            "request_id" => request_id,
            "method" => method,
            "path" => path,
            "status" => response.status().as_u16(),
            "duration_ms" => elapsed.as_millis(),
            "threshold_ms" => threshold.as_millis(),
        );
    }

    response
}
