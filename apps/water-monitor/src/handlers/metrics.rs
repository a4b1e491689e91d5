//! 进程内指标快照。
//!
//! - GET /metrics

use crate::utils::response::{metrics_to_dto, ok};
use axum::{http::StatusCode, response::Response};
use water_telemetry::metrics;

pub async fn get_metrics() -> Response {
    ok(StatusCode::OK, metrics_to_dto(metrics().snapshot()))
}
