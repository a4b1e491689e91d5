//! 遥测聚合入口：取数、失败隔离、分组汇总。

use crate::summarize::{summarize_building, summarize_buildings, summarize_floors};
use domain::{
    BuildingConfig, BuildingSummary, CodecError, DeviceFields, DeviceStatus, DeviceTelemetry,
    FloorKey, FloorSummary, MeterReading, QualityReading, decode,
};
use futures::future::join_all;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, warn};
use water_source::{Fetched, SourceError, StatusSource, TelemetryField, TelemetrySource};
use water_topology::{building_meter_ids, building_sensor_ids};

/// 聚合错误（仅在生成设备编码阶段出现，取数失败不会到这里）。
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("device id generation failed: {0}")]
    Codec(#[from] CodecError),
    #[error("building {building_no} not found (campus has {total} buildings)")]
    UnknownBuilding { building_no: u8, total: u32 },
}

/// 单个聚合周期的结果。
#[derive(Debug, Clone, Default)]
pub struct AggregateReport {
    /// 按 (校区, 楼栋, 楼层) 排序
    pub floors: BTreeMap<FloorKey, FloorSummary>,
    /// 无法解析的设备编码数量（不计入任何楼层）
    pub malformed_count: usize,
    /// 本周期全部可解析设备的读数
    pub devices: Vec<DeviceTelemetry>,
}

impl AggregateReport {
    pub fn buildings(&self) -> Vec<BuildingSummary> {
        summarize_buildings(&self.floors)
    }

    /// 指定楼栋的汇总；本周期没有该楼栋的读数时返回空汇总。
    pub fn building(&self, campus_no: u8, building_no: u8) -> BuildingSummary {
        let floors = self
            .floors
            .values()
            .filter(|floor| {
                floor.key.campus_no == campus_no && floor.key.building_no == building_no
            })
            .cloned()
            .collect();
        summarize_building(campus_no, building_no, floors)
    }

    pub fn device(&self, device_id: &str) -> Option<&DeviceTelemetry> {
        self.devices
            .iter()
            .find(|device| device.device_id() == device_id)
    }
}

/// 单栋楼的聚合快照。
#[derive(Debug, Clone)]
pub struct BuildingReport {
    pub summary: BuildingSummary,
    pub malformed_count: usize,
}

/// 遥测聚合器。
#[derive(Clone)]
pub struct TelemetryAggregator {
    status: Arc<dyn StatusSource>,
    telemetry: Arc<dyn TelemetrySource>,
}

impl TelemetryAggregator {
    pub fn new(status: Arc<dyn StatusSource>, telemetry: Arc<dyn TelemetrySource>) -> Self {
        Self { status, telemetry }
    }

    /// 拉取一组设备的状态与读数并按楼层汇总。
    ///
    /// 先批量查状态，再并发拉取每台设备的读数（无论状态如何）。
    /// 单台设备失败只影响自身：记为离线、读数为 0，仍计入设备数。
    pub async fn fetch_and_aggregate(&self, device_ids: &[String]) -> AggregateReport {
        let mut decoded: Vec<(String, DeviceFields)> = Vec::with_capacity(device_ids.len());
        let mut malformed_count = 0;
        for id in device_ids {
            match decode(id) {
                Some(fields) => decoded.push((id.clone(), fields)),
                None => malformed_count += 1,
            }
        }
        if malformed_count > 0 {
            warn!(
                target: "water.aggregate",
                malformed_count,
                "malformed_device_ids"
            );
            water_telemetry::record_malformed_ids(malformed_count as u64);
        }

        let valid_ids: Vec<String> = decoded.iter().map(|(id, _)| id.clone()).collect();
        let statuses = self.fetch_statuses(&valid_ids).await;

        let requests = decoded.iter().map(|(id, fields)| {
            let status = DeviceStatus::from_status_str(statuses.get(id).map(String::as_str));
            self.fetch_device(id, fields, status)
        });
        let readings = join_all(requests).await;

        let devices: Vec<(DeviceFields, DeviceTelemetry)> = decoded
            .into_iter()
            .map(|(_, fields)| fields)
            .zip(readings)
            .collect();
        let floors = summarize_floors(&devices);
        let failed = devices
            .iter()
            .filter(|(_, telemetry)| telemetry.fetch_failed())
            .count();
        info!(
            target: "water.aggregate",
            devices = devices.len(),
            failed,
            malformed_count,
            floors = floors.len(),
            "aggregation_completed"
        );

        AggregateReport {
            floors,
            malformed_count,
            devices: devices.into_iter().map(|(_, telemetry)| telemetry).collect(),
        }
    }

    /// 聚合单栋楼（全部水表 + 每层水质传感器）。
    pub async fn fetch_building(
        &self,
        campus_no: u8,
        building_no: u8,
        config: &BuildingConfig,
    ) -> Result<BuildingReport, AggregateError> {
        if building_no as u32 > config.total_buildings {
            return Err(AggregateError::UnknownBuilding {
                building_no,
                total: config.total_buildings,
            });
        }
        let mut ids = building_meter_ids(campus_no, building_no, config)?;
        ids.extend(building_sensor_ids(campus_no, building_no, config)?);
        let report = self.fetch_and_aggregate(&ids).await;
        Ok(BuildingReport {
            summary: report.building(campus_no, building_no),
            malformed_count: report.malformed_count,
        })
    }

    /// 状态接口失败时整批视为离线，读数照常拉取。
    async fn fetch_statuses(&self, ids: &[String]) -> HashMap<String, String> {
        if ids.is_empty() {
            return HashMap::new();
        }
        match self.status.device_status(ids).await {
            Ok(statuses) => statuses,
            Err(err) => {
                warn!(
                    target: "water.aggregate",
                    error = %err,
                    devices = ids.len(),
                    "status_source_failed"
                );
                water_telemetry::record_status_source_failure();
                HashMap::new()
            }
        }
    }

    async fn fetch_device(
        &self,
        device_id: &str,
        fields: &DeviceFields,
        status: DeviceStatus,
    ) -> DeviceTelemetry {
        if fields.is_meter() {
            DeviceTelemetry::Meter(self.fetch_meter(device_id, status).await)
        } else {
            DeviceTelemetry::Quality(self.fetch_quality(device_id, status).await)
        }
    }

    async fn fetch_meter(&self, device_id: &str, status: DeviceStatus) -> MeterReading {
        let (flow, pressure, temperature) = futures::join!(
            self.telemetry.reading(device_id, TelemetryField::Flow),
            self.telemetry.reading(device_id, TelemetryField::Pressure),
            self.telemetry.reading(device_id, TelemetryField::Temperature),
        );
        let flow = match flow {
            Ok(flow) => flow,
            Err(err) => {
                device_unreachable(device_id, &err);
                return MeterReading::unreachable(device_id);
            }
        };
        MeterReading {
            device_id: device_id.to_string(),
            status,
            flow: required(device_id, TelemetryField::Flow, flow),
            pressure: optional(device_id, TelemetryField::Pressure, pressure),
            temperature: optional(device_id, TelemetryField::Temperature, temperature),
            fetch_failed: false,
        }
    }

    async fn fetch_quality(&self, device_id: &str, status: DeviceStatus) -> QualityReading {
        let (turbidity, ph, chlorine, temperature) = futures::join!(
            self.telemetry.reading(device_id, TelemetryField::Turbidity),
            self.telemetry.reading(device_id, TelemetryField::Ph),
            self.telemetry.reading(device_id, TelemetryField::Chlorine),
            self.telemetry.reading(device_id, TelemetryField::Temperature),
        );
        if let (Err(err), Err(_), Err(_), Err(_)) = (&turbidity, &ph, &chlorine, &temperature) {
            device_unreachable(device_id, err);
            return QualityReading::unreachable(device_id);
        }
        let value = |field, result: Result<Fetched<f64>, SourceError>| {
            optional(device_id, field, result).unwrap_or(0.0)
        };
        QualityReading {
            device_id: device_id.to_string(),
            status,
            turbidity: value(TelemetryField::Turbidity, turbidity),
            ph: value(TelemetryField::Ph, ph),
            chlorine: value(TelemetryField::Chlorine, chlorine),
            temperature: value(TelemetryField::Temperature, temperature),
            fetch_failed: false,
        }
    }
}

fn device_unreachable(device_id: &str, err: &SourceError) {
    warn!(
        target: "water.aggregate",
        device_id,
        error = %err,
        "device_fetch_failed"
    );
    water_telemetry::record_device_fetch_failure();
}

/// 请求成功但无值：按 0 计。
fn required(device_id: &str, field: TelemetryField, fetched: Fetched<f64>) -> f64 {
    match fetched {
        Fetched::Value(value) => value,
        Fetched::Defaulted => {
            field_defaulted(device_id, field, None);
            0.0
        }
    }
}

/// 可选字段：请求失败或无值均为 `None`。
fn optional(
    device_id: &str,
    field: TelemetryField,
    result: Result<Fetched<f64>, SourceError>,
) -> Option<f64> {
    match result {
        Ok(Fetched::Value(value)) => Some(value),
        Ok(Fetched::Defaulted) => {
            field_defaulted(device_id, field, None);
            None
        }
        Err(err) => {
            field_defaulted(device_id, field, Some(&err));
            None
        }
    }
}

fn field_defaulted(device_id: &str, field: TelemetryField, err: Option<&SourceError>) {
    match err {
        Some(err) => warn!(
            target: "water.aggregate",
            device_id,
            field = field.as_str(),
            error = %err,
            "field_fetch_failed"
        ),
        None => tracing::debug!(
            target: "water.aggregate",
            device_id,
            field = field.as_str(),
            "field_defaulted"
        ),
    }
    water_telemetry::record_field_default();
}
