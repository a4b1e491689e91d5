//! 请求追踪上下文：为每个请求生成 request_id / trace_id，回写响应头并记录耗时。

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Instrument, debug};
use water_telemetry::{RequestIds, new_request_ids};

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const TRACE_ID_HEADER: &str = "x-trace-id";

pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let ids = new_request_ids();
    let span = tracing::info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %req.method(),
        path = %req.uri().path()
    );
    req.extensions_mut().insert(ids.clone());

    let started = Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;
    span.in_scope(|| {
        debug!(
            target: "water.api",
            status = response.status().as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "request_completed"
        )
    });
    write_ids(response.headers_mut(), &ids);
    response
}

fn write_ids(headers: &mut HeaderMap, ids: &RequestIds) {
    for (name, value) in [
        (REQUEST_ID_HEADER, &ids.request_id),
        (TRACE_ID_HEADER, &ids.trace_id),
    ] {
        let value = HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static(""));
        headers.insert(name, value);
    }
}
