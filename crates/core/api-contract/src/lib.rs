//! 稳定的 DTO 与 API 响应契约。
//!
//! - 对展示层：`ApiResponse` 统一封装 + 楼宇 / 汇总 / 调度状态 DTO
//! - 对上游服务：`UpstreamEnvelope` 与各接口的原始负载结构

use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

// ============================================
// 上游服务负载
// ============================================

/// 上游微服务统一响应体 `{code, message, data}`。
///
/// `code` 在不同服务中可能是数字或字符串，这里不解释其含义。
#[derive(Debug, Deserialize)]
pub struct UpstreamEnvelope<T> {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default, alias = "msg")]
    pub message: Option<String>,
    pub data: Option<T>,
}

/// 楼宇配置原始负载（字段缺失或为 0 时按默认值补齐）。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingConfigPayload {
    pub education_start: Option<u32>,
    pub experiment_start: Option<u32>,
    pub dormitory_start: Option<u32>,
    pub total_buildings: Option<u32>,
    pub floors: Option<u32>,
    pub rooms: Option<u32>,
}

/// 模拟任务运行状态原始负载。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusPayload {
    #[serde(default)]
    pub meter_running: bool,
    #[serde(default)]
    pub sensor_running: bool,
}

// ============================================
// 展示层 DTO
// ============================================

/// 楼宇返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingDto {
    pub id: String,
    #[serde(rename = "type")]
    pub building_type: String,
    pub name: String,
    pub building_no: u32,
}

/// 楼宇配置返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingConfigDto {
    pub education_start: u32,
    pub experiment_start: u32,
    pub dormitory_start: u32,
    pub total_buildings: u32,
    pub floors: u32,
    pub rooms: u32,
}

/// 校区拓扑统计返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyDto {
    pub campus_no: u8,
    pub campus_name: String,
    /// 校区简码（HY / LZ / JH），未知校区为空
    pub campus_code: Option<String>,
    pub config: BuildingConfigDto,
    /// 配置源不可用或配置不合法时为 true（使用默认配置）
    pub config_fallback: bool,
    pub education_buildings: u32,
    pub experiment_buildings: u32,
    pub dormitory_buildings: u32,
    pub meter_count: u64,
    pub sensor_count: u64,
}

/// 设备编码解析结果。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceFieldsDto {
    pub device_id: String,
    pub device_type: u8,
    pub campus_no: u8,
    pub building_no: u8,
    pub floor_no: u8,
    pub unit_no: u16,
}

/// 水质读数返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterQualityDto {
    pub device_id: String,
    pub status: String,
    pub turbidity: f64,
    pub ph: f64,
    pub chlorine: f64,
    pub temperature: f64,
    pub fetch_failed: bool,
}

/// 楼层汇总返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorSummaryDto {
    pub floor: u8,
    pub device_count: usize,
    pub online_count: usize,
    pub offline_count: usize,
    pub total_flow: f64,
    pub avg_flow: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
    /// `null` 表示水质未知
    pub water_quality: Option<WaterQualityDto>,
}

/// 楼栋汇总返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingSummaryDto {
    pub campus_no: u8,
    pub building_no: u8,
    pub device_count: usize,
    pub online_count: usize,
    pub offline_count: usize,
    pub total_flow: f64,
    pub avg_flow: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
    pub malformed_count: usize,
    pub floors: Vec<FloorSummaryDto>,
}

/// 刷新调度快照返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSnapshotDto<T> {
    pub state: String,
    pub cycle: u64,
    pub updated_at_ms: Option<i64>,
    pub last_error: Option<String>,
    pub data: Option<T>,
}

/// 当前监控视图返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorViewDto {
    pub campus_no: u8,
    pub campus_name: String,
    pub building_no: u8,
    pub snapshot: RefreshSnapshotDto<BuildingSummaryDto>,
}

/// 选择监控楼宇请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectBuildingRequest {
    #[serde(alias = "campus")]
    pub campus_no: u8,
    #[serde(alias = "building")]
    pub building_no: u8,
}

/// 模拟器状态返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorStatusDto {
    pub device_count: u64,
    pub initialized: bool,
    pub meter_running: bool,
    pub sensor_running: bool,
    pub any_task_running: bool,
}

/// 指标快照返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub aggregation_cycles: u64,
    pub aggregation_failures: u64,
    pub device_fetch_failures: u64,
    pub field_defaults: u64,
    pub malformed_ids: u64,
    pub status_source_failures: u64,
    pub config_fallbacks: u64,
    pub coalesced_triggers: u64,
    pub cycle_latency_ms_total: u64,
    pub cycle_latency_ms_count: u64,
}
