//! HTTP 响应辅助函数和 DTO 转换
//!
//! - 错误响应：bad_request_error, not_found_error
//! - DTO 转换：领域模型 / 调度快照 → api-contract DTO

use api_contract::{
    ApiResponse, BuildingConfigDto, BuildingDto, BuildingSummaryDto, DeviceFieldsDto,
    FloorSummaryDto, MetricsSnapshotDto, MonitorViewDto, RefreshSnapshotDto, SimulatorStatusDto,
    TopologyDto, WaterQualityDto,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{
    BuildingConfig, BuildingInfo, Campus, DeviceFields, FloorSummary, QualityReading, campus_name,
};
use water_aggregate::{BuildingReport, SimulatorSnapshot};
use water_scheduler::RefreshSnapshot;
use water_telemetry::MetricsSnapshot;
use water_topology::CampusTopology;

/// 成功响应
pub fn ok<T: serde::Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(ApiResponse::success(data))).into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error(message: impl Into<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", message.into())),
    )
        .into_response()
}

pub fn building_to_dto(info: BuildingInfo) -> BuildingDto {
    BuildingDto {
        id: info.id,
        building_type: info.building_type.as_str().to_string(),
        name: info.name,
        building_no: info.building_no,
    }
}

pub fn config_to_dto(config: &BuildingConfig) -> BuildingConfigDto {
    BuildingConfigDto {
        education_start: config.education_start,
        experiment_start: config.experiment_start,
        dormitory_start: config.dormitory_start,
        total_buildings: config.total_buildings,
        floors: config.floors,
        rooms: config.rooms,
    }
}

pub fn topology_to_dto(topology: &CampusTopology) -> TopologyDto {
    TopologyDto {
        campus_no: topology.campus_no,
        campus_name: campus_name(topology.campus_no).to_string(),
        campus_code: Campus::from_no(topology.campus_no).map(|campus| campus.code().to_string()),
        config: config_to_dto(&topology.config),
        config_fallback: topology.fallback,
        education_buildings: topology.stats.education_buildings,
        experiment_buildings: topology.stats.experiment_buildings,
        dormitory_buildings: topology.stats.dormitory_buildings,
        meter_count: topology.stats.meter_count,
        sensor_count: topology.stats.sensor_count,
    }
}

pub fn device_fields_to_dto(device_id: String, fields: &DeviceFields) -> DeviceFieldsDto {
    DeviceFieldsDto {
        device_id,
        device_type: fields.device_type.digit(),
        campus_no: fields.campus_no,
        building_no: fields.building_no,
        floor_no: fields.floor_no,
        unit_no: fields.unit_no,
    }
}

fn quality_to_dto(reading: &QualityReading) -> WaterQualityDto {
    WaterQualityDto {
        device_id: reading.device_id.clone(),
        status: reading.status.as_str().to_string(),
        turbidity: reading.turbidity,
        ph: reading.ph,
        chlorine: reading.chlorine,
        temperature: reading.temperature,
        fetch_failed: reading.fetch_failed,
    }
}

fn floor_to_dto(floor: &FloorSummary) -> FloorSummaryDto {
    FloorSummaryDto {
        floor: floor.floor(),
        device_count: floor.device_count,
        online_count: floor.online_count,
        offline_count: floor.offline_count(),
        total_flow: floor.total_flow,
        avg_flow: floor.avg_flow,
        avg_pressure: floor.avg_pressure,
        avg_temperature: floor.avg_temperature,
        water_quality: floor.water_quality.as_ref().map(quality_to_dto),
    }
}

pub fn building_report_to_dto(report: &BuildingReport) -> BuildingSummaryDto {
    let summary = &report.summary;
    BuildingSummaryDto {
        campus_no: summary.campus_no,
        building_no: summary.building_no,
        device_count: summary.device_count,
        online_count: summary.online_count,
        offline_count: summary.offline_count(),
        total_flow: summary.total_flow,
        avg_flow: summary.avg_flow,
        avg_pressure: summary.avg_pressure,
        avg_temperature: summary.avg_temperature,
        malformed_count: report.malformed_count,
        floors: summary.floors.iter().map(floor_to_dto).collect(),
    }
}

pub fn simulator_to_dto(snapshot: &SimulatorSnapshot) -> SimulatorStatusDto {
    SimulatorStatusDto {
        device_count: snapshot.device_count,
        initialized: snapshot.initialized,
        meter_running: snapshot.meter_running,
        sensor_running: snapshot.sensor_running,
        any_task_running: snapshot.any_task_running(),
    }
}

/// 调度快照转 DTO（`data` 由调用方转换）。
pub fn snapshot_to_dto<T, D>(
    snapshot: &RefreshSnapshot<T>,
    convert: impl FnOnce(&T) -> D,
) -> RefreshSnapshotDto<D> {
    RefreshSnapshotDto {
        state: snapshot.state.as_str().to_string(),
        cycle: snapshot.cycle,
        updated_at_ms: snapshot.updated_at_ms,
        last_error: snapshot.last_error.clone(),
        data: snapshot.data.as_deref().map(convert),
    }
}

pub fn monitor_view_to_dto(
    campus_no: u8,
    building_no: u8,
    snapshot: &RefreshSnapshot<BuildingReport>,
) -> MonitorViewDto {
    MonitorViewDto {
        campus_no,
        campus_name: campus_name(campus_no).to_string(),
        building_no,
        snapshot: snapshot_to_dto(snapshot, building_report_to_dto),
    }
}

pub fn metrics_to_dto(snapshot: MetricsSnapshot) -> MetricsSnapshotDto {
    MetricsSnapshotDto {
        aggregation_cycles: snapshot.aggregation_cycles,
        aggregation_failures: snapshot.aggregation_failures,
        device_fetch_failures: snapshot.device_fetch_failures,
        field_defaults: snapshot.field_defaults,
        malformed_ids: snapshot.malformed_ids,
        status_source_failures: snapshot.status_source_failures,
        config_fallbacks: snapshot.config_fallbacks,
        coalesced_triggers: snapshot.coalesced_triggers,
        cycle_latency_ms_total: snapshot.cycle_latency_ms_total,
        cycle_latency_ms_count: snapshot.cycle_latency_ms_count,
    }
}
