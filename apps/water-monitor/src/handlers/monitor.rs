//! 楼栋监控视图 handlers
//!
//! - POST /api/monitor/select - 切换监控楼栋（销毁旧调度器，启动新调度器）
//! - GET /api/monitor/summary - 最新楼栋汇总 + 调度状态 / 错误
//! - POST /api/monitor/refresh - 手动刷新（刷新中时合并）
//! - DELETE /api/monitor - 销毁监控视图
//!
//! 没有活动视图时 summary / refresh / delete 返回 404。

use crate::state::AppState;
use crate::utils::response::{monitor_view_to_dto, not_found_error, ok};
use crate::utils::validation::{require_building, require_known_campus};
use api_contract::SelectBuildingRequest;
use axum::{Json, extract::State, http::StatusCode, response::Response};

const NO_ACTIVE_VIEW: &str = "no building selected";

pub async fn select_building(
    State(state): State<AppState>,
    Json(req): Json<SelectBuildingRequest>,
) -> Response {
    let campus = match require_known_campus(req.campus_no) {
        Ok(campus) => campus,
        Err(response) => return response,
    };
    let (config, _) = state.topology.load_config().await;
    let building_no = match require_building(req.building_no, &config) {
        Ok(building_no) => building_no,
        Err(response) => return response,
    };

    state.select_building(campus.no(), building_no).await;
    match state.monitor.current().await {
        Some((campus_no, building_no, snapshot)) => ok(
            StatusCode::ACCEPTED,
            monitor_view_to_dto(campus_no, building_no, &snapshot),
        ),
        None => not_found_error(NO_ACTIVE_VIEW),
    }
}

pub async fn get_summary(State(state): State<AppState>) -> Response {
    match state.monitor.current().await {
        Some((campus_no, building_no, snapshot)) => ok(
            StatusCode::OK,
            monitor_view_to_dto(campus_no, building_no, &snapshot),
        ),
        None => not_found_error(NO_ACTIVE_VIEW),
    }
}

pub async fn refresh_monitor(State(state): State<AppState>) -> Response {
    match state.monitor.refresh().await {
        Some((campus_no, building_no, snapshot)) => ok(
            StatusCode::ACCEPTED,
            monitor_view_to_dto(campus_no, building_no, &snapshot),
        ),
        None => not_found_error(NO_ACTIVE_VIEW),
    }
}

pub async fn clear_monitor(State(state): State<AppState>) -> Response {
    if state.monitor.clear().await {
        ok(StatusCode::OK, serde_json::json!({ "stopped": true }))
    } else {
        not_found_error(NO_ACTIVE_VIEW)
    }
}
