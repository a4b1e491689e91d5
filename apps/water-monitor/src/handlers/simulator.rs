//! 模拟器状态（5 秒调度器的最新快照）。
//!
//! - GET /api/simulator/status

use crate::state::AppState;
use crate::utils::response::{ok, simulator_to_dto, snapshot_to_dto};
use axum::{extract::State, http::StatusCode, response::Response};

pub async fn get_simulator_status(State(state): State<AppState>) -> Response {
    let snapshot = state.simulator.snapshot();
    ok(StatusCode::OK, snapshot_to_dto(&snapshot, simulator_to_dto))
}
