//! Request timing: logs each request and stamps `X-Process-Time` (seconds).

use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::info;

pub const PROCESS_TIME_HEADER: &str = "x-process-time";

pub async fn track_process_time(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    info!("Request: {method} {path}");

    let mut response = next.run(request).await;
    let elapsed = started.elapsed().as_secs_f64();

    if let Ok(value) = HeaderValue::from_str(&elapsed.to_string()) {
        response.headers_mut().insert(PROCESS_TIME_HEADER, value);
    }

    info!(
        "Response: {method} {path} - Status: {} - Time: {elapsed:.3}s",
        response.status().as_u16()
    );

    response
}
