//! 楼层 / 楼栋汇总。
//!
//! 每个聚合周期重新构建，仅归产生它的周期所有，不跨周期共享。

use crate::telemetry::QualityReading;

/// 楼层标识（校区 + 楼栋 + 楼层），按此顺序排序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FloorKey {
    pub campus_no: u8,
    pub building_no: u8,
    pub floor_no: u8,
}

impl FloorKey {
    pub fn new(campus_no: u8, building_no: u8, floor_no: u8) -> Self {
        Self {
            campus_no,
            building_no,
            floor_no,
        }
    }
}

/// 楼层汇总。
#[derive(Debug, Clone, PartialEq)]
pub struct FloorSummary {
    pub key: FloorKey,
    /// 全部水表数（在线 + 离线 + 请求失败）
    pub device_count: usize,
    pub online_count: usize,
    /// 全部水表流量之和
    pub total_flow: f64,
    /// 以下均值只在在线水表上计算，无在线水表时为 0
    pub avg_flow: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
    /// 参与压力 / 温度均值的在线水表数（未取得读数的不计入）
    pub pressure_samples: usize,
    pub temperature_samples: usize,
    /// 本层水质传感器读数；缺失表示“未知”，不等同于 0
    pub water_quality: Option<QualityReading>,
}

impl FloorSummary {
    pub fn floor(&self) -> u8 {
        self.key.floor_no
    }

    pub fn offline_count(&self) -> usize {
        self.device_count - self.online_count
    }
}

/// 楼栋汇总（楼层汇总再上卷一级）。
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingSummary {
    pub campus_no: u8,
    pub building_no: u8,
    /// 按楼层号升序
    pub floors: Vec<FloorSummary>,
    pub device_count: usize,
    pub online_count: usize,
    pub total_flow: f64,
    pub avg_flow: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
}

impl BuildingSummary {
    pub fn offline_count(&self) -> usize {
        self.device_count - self.online_count
    }

    pub fn floor(&self, floor_no: u8) -> Option<&FloorSummary> {
        self.floors.iter().find(|floor| floor.key.floor_no == floor_no)
    }
}
