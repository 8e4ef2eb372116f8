//! Per-request logging

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

pub async fn request_tracing(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        tracing::error!(%method, %uri, status, elapsed_ms, "Request failed");
    } else {
        tracing::info!(%method, %uri, status, elapsed_ms, "Request handled");
    }

    response
}
