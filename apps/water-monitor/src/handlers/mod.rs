//! Handlers 模块

pub mod campuses;
pub mod devices;
pub mod metrics;
pub mod monitor;
pub mod simulator;

pub use campuses::*;
pub use devices::*;
pub use metrics::*;
pub use monitor::*;
pub use simulator::*;

use axum::{Json, response::IntoResponse};

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
