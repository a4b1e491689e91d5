//! 上游数据源接口。
//!
//! - ConfigSource：楼宇配置
//! - StatusSource：设备在线状态（批量）
//! - TelemetrySource：单设备读数
//! - SimulatorSource：模拟器设备数与任务状态
//!
//! `Err` 表示请求本身失败；请求成功但无值时返回 `Fetched::Defaulted`。

use crate::error::SourceError;
use crate::fetched::{Fetched, TaskStatus};
use api_contract::BuildingConfigPayload;
use async_trait::async_trait;
use domain::BuildingConfig;
use std::collections::HashMap;

/// 单设备可读取的遥测字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelemetryField {
    Flow,
    Pressure,
    Temperature,
    Turbidity,
    Ph,
    Chlorine,
}

impl TelemetryField {
    /// 数据服务上的读取路径。
    pub fn path(self) -> &'static str {
        match self {
            TelemetryField::Flow => "/Data/getFlowNow",
            TelemetryField::Pressure => "/Data/getPressureNow",
            TelemetryField::Temperature => "/Data/getTemNow",
            TelemetryField::Turbidity => "/Data/getTurbidity",
            TelemetryField::Ph => "/Data/getPh",
            TelemetryField::Chlorine => "/Data/getChlorine",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TelemetryField::Flow => "flow",
            TelemetryField::Pressure => "pressure",
            TelemetryField::Temperature => "temperature",
            TelemetryField::Turbidity => "turbidity",
            TelemetryField::Ph => "ph",
            TelemetryField::Chlorine => "chlorine",
        }
    }
}

/// 楼宇配置源
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// 获取楼宇配置（缺失字段已按默认配置补齐，未做范围校验）
    async fn building_config(&self) -> Result<BuildingConfig, SourceError>;
}

/// 设备状态源
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// 批量查询设备状态，返回 设备编码 → 状态串；缺失的键视为离线
    async fn device_status(&self, ids: &[String])
    -> Result<HashMap<String, String>, SourceError>;
}

/// 遥测读数源
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn reading(
        &self,
        device_id: &str,
        field: TelemetryField,
    ) -> Result<Fetched<f64>, SourceError>;
}

/// 模拟器状态源
#[async_trait]
pub trait SimulatorSource: Send + Sync {
    async fn device_count(&self) -> Result<Fetched<u64>, SourceError>;

    async fn is_initialized(&self) -> Result<Fetched<bool>, SourceError>;

    async fn task_status(&self) -> Result<Fetched<TaskStatus>, SourceError>;
}

/// 按字段合并楼宇配置：缺失或为 0 的字段取默认配置。
pub fn config_from_payload(payload: &BuildingConfigPayload) -> BuildingConfig {
    let fallback = BuildingConfig::FALLBACK;
    let pick = |value: Option<u32>, default: u32| value.filter(|v| *v > 0).unwrap_or(default);
    BuildingConfig {
        education_start: pick(payload.education_start, fallback.education_start),
        experiment_start: pick(payload.experiment_start, fallback.experiment_start),
        dormitory_start: pick(payload.dormitory_start, fallback.dormitory_start),
        total_buildings: pick(payload.total_buildings, fallback.total_buildings),
        floors: pick(payload.floors, fallback.floors),
        rooms: pick(payload.rooms, fallback.rooms),
    }
}
