//! 楼宇拓扑能力。
//!
//! - 楼宇分类：按两个起始阈值判定教学楼 / 实验楼 / 宿舍楼
//! - 楼宇列表：按配置生成某校区的全部楼宇
//! - 设备编码：生成单栋楼的水表与水质传感器编码
//! - `TopologyResolver`：从配置源加载配置，失败时回退默认配置

use domain::{
    BuildingConfig, BuildingInfo, BuildingType, CodecError, DeviceField, campus_name,
    encode_meter, encode_quality_sensor,
};
use std::sync::Arc;
use tracing::{info, warn};
use water_source::ConfigSource;

/// 楼宇分类。
///
/// `building_no ≤ education_start` 为教学楼，否则 `≤ experiment_start` 为实验楼，
/// 其余为宿舍楼；等于阈值时归入阈值所在的（较低）类别。不校验楼号范围。
pub fn classify(building_no: u32, education_start: u32, experiment_start: u32) -> BuildingType {
    if building_no <= education_start {
        BuildingType::Education
    } else if building_no <= experiment_start {
        BuildingType::Experiment
    } else {
        BuildingType::Dormitory
    }
}

/// 按配置生成校区楼宇列表（楼号 `1..=total_buildings` 升序）。
pub fn list_buildings(config: &BuildingConfig, campus_no: u8) -> Vec<BuildingInfo> {
    let campus = campus_name(campus_no);
    (1..=config.total_buildings)
        .map(|building_no| {
            let building_type =
                classify(building_no, config.education_start, config.experiment_start);
            BuildingInfo {
                id: format!("{}-{}-{}", building_type.as_str(), campus_no, building_no),
                building_type,
                name: format!("{}{}{}号", campus, building_type.label(), building_no),
                building_no,
            }
        })
        .collect()
}

/// 单栋楼全部水表编码（按楼层、再按房间排列）。
pub fn building_meter_ids(
    campus_no: u8,
    building_no: u8,
    config: &BuildingConfig,
) -> Result<Vec<String>, CodecError> {
    let floors = narrow_u8(DeviceField::Floor, config.floors)?;
    let rooms = u16::try_from(config.rooms)
        .map_err(|_| out_of_range(DeviceField::Unit, config.rooms, 999))?;
    let mut ids = Vec::with_capacity(floors as usize * rooms as usize);
    for floor_no in 1..=floors {
        for unit_no in 1..=rooms {
            ids.push(encode_meter(campus_no, building_no, floor_no, unit_no)?);
        }
    }
    Ok(ids)
}

/// 单栋楼全部水质传感器编码（每层一个）。
pub fn building_sensor_ids(
    campus_no: u8,
    building_no: u8,
    config: &BuildingConfig,
) -> Result<Vec<String>, CodecError> {
    let floors = narrow_u8(DeviceField::Floor, config.floors)?;
    (1..=floors)
        .map(|floor_no| encode_quality_sensor(campus_no, building_no, floor_no))
        .collect()
}

fn narrow_u8(field: DeviceField, value: u32) -> Result<u8, CodecError> {
    u8::try_from(value).map_err(|_| out_of_range(field, value, 99))
}

fn out_of_range(field: DeviceField, value: u32, max: u32) -> CodecError {
    CodecError::OutOfRange {
        field,
        value,
        min: 1,
        max,
    }
}

/// 校区拓扑统计（数字孪生面板）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyStats {
    pub education_buildings: u32,
    pub experiment_buildings: u32,
    pub dormitory_buildings: u32,
    /// 楼栋数 × 楼层数 × 房间数
    pub meter_count: u64,
    /// 楼栋数 × 楼层数
    pub sensor_count: u64,
}

impl TopologyStats {
    pub fn from_config(config: &BuildingConfig) -> Self {
        let mut stats = TopologyStats {
            education_buildings: 0,
            experiment_buildings: 0,
            dormitory_buildings: 0,
            meter_count: 0,
            sensor_count: 0,
        };
        for building_no in 1..=config.total_buildings {
            match classify(building_no, config.education_start, config.experiment_start) {
                BuildingType::Education => stats.education_buildings += 1,
                BuildingType::Experiment => stats.experiment_buildings += 1,
                BuildingType::Dormitory => stats.dormitory_buildings += 1,
            }
        }
        let floors_total = config.total_buildings as u64 * config.floors as u64;
        stats.sensor_count = floors_total;
        stats.meter_count = floors_total * config.rooms as u64;
        stats
    }
}

/// 一次拓扑加载的结果（配置与楼宇列表同时替换）。
#[derive(Debug, Clone)]
pub struct CampusTopology {
    pub campus_no: u8,
    pub config: BuildingConfig,
    /// 配置是否来自默认值
    pub fallback: bool,
    pub buildings: Vec<BuildingInfo>,
    pub stats: TopologyStats,
}

/// 拓扑解析入口。
#[derive(Clone)]
pub struct TopologyResolver {
    source: Arc<dyn ConfigSource>,
}

impl TopologyResolver {
    pub fn new(source: Arc<dyn ConfigSource>) -> Self {
        Self { source }
    }

    /// 加载楼宇配置；配置源失败或配置不合法时回退默认配置，不向上抛错。
    ///
    /// 返回 `(配置, 是否回退)`。
    pub async fn load_config(&self) -> (BuildingConfig, bool) {
        let result = self.source.building_config().await;
        let reason = match result {
            Ok(config) => match config.validate() {
                Ok(()) => return (config, false),
                Err(err) => err.to_string(),
            },
            Err(err) => err.to_string(),
        };
        warn!(
            target: "water.topology",
            error = %reason,
            "building_config_fallback"
        );
        water_telemetry::record_config_fallback();
        (BuildingConfig::FALLBACK, true)
    }

    /// 加载配置并生成校区楼宇列表。
    pub async fn list_buildings(&self, campus_no: u8) -> Vec<BuildingInfo> {
        let (config, _) = self.load_config().await;
        list_buildings(&config, campus_no)
    }

    /// 加载配置并生成校区完整拓扑。
    pub async fn resolve(&self, campus_no: u8) -> CampusTopology {
        let (config, fallback) = self.load_config().await;
        let buildings = list_buildings(&config, campus_no);
        let stats = TopologyStats::from_config(&config);
        info!(
            target: "water.topology",
            campus_no,
            buildings = buildings.len(),
            fallback,
            "topology_resolved"
        );
        CampusTopology {
            campus_no,
            config,
            fallback,
            buildings,
            stats,
        }
    }
}
