//! 校区楼宇 handlers
//!
//! - GET /api/campuses/:campus/buildings - 楼宇列表（按当前配置生成）
//! - GET /api/campuses/:campus/topology - 配置、各类型楼栋数与设备总数

use crate::state::AppState;
use crate::utils::response::{building_to_dto, ok, topology_to_dto};
use crate::utils::validation::parse_campus;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

pub async fn list_buildings(State(state): State<AppState>, Path(campus): Path<String>) -> Response {
    let campus_no = match parse_campus(&campus) {
        Ok(campus_no) => campus_no,
        Err(response) => return response,
    };
    let buildings = state.topology.list_buildings(campus_no).await;
    let items: Vec<_> = buildings.into_iter().map(building_to_dto).collect();
    ok(StatusCode::OK, items)
}

pub async fn get_topology(State(state): State<AppState>, Path(campus): Path<String>) -> Response {
    let campus_no = match parse_campus(&campus) {
        Ok(campus_no) => campus_no,
        Err(response) => return response,
    };
    let topology = state.topology.resolve(campus_no).await;
    ok(StatusCode::OK, topology_to_dto(&topology))
}
