//! 纯聚合计算：设备读数 → 楼层汇总 → 楼栋汇总。
//!
//! 两种分母不可混用：
//! - `total_flow`、`device_count` 覆盖全部水表（离线计 0 但计数）
//! - `avg_*` 只在在线水表上求均值，无在线水表时为 0；
//!   压力 / 温度未取得的在线水表不进入对应均值的分子和分母

use domain::{
    BuildingSummary, DeviceFields, DeviceTelemetry, FloorKey, FloorSummary, MeterReading,
};
use std::collections::BTreeMap;

#[derive(Default)]
struct FloorAccumulator {
    device_count: usize,
    online_count: usize,
    total_flow: f64,
    online_flow: f64,
    online_pressure: f64,
    pressure_samples: usize,
    online_temperature: f64,
    temperature_samples: usize,
}

impl FloorAccumulator {
    fn add(&mut self, reading: &MeterReading) {
        self.device_count += 1;
        self.total_flow += reading.flow;
        if reading.status.is_online() {
            self.online_count += 1;
            self.online_flow += reading.flow;
            if let Some(pressure) = reading.pressure {
                self.online_pressure += pressure;
                self.pressure_samples += 1;
            }
            if let Some(temperature) = reading.temperature {
                self.online_temperature += temperature;
                self.temperature_samples += 1;
            }
        }
    }
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// 按楼层分组汇总。
///
/// 水质传感器不计入 `device_count`，只挂到同一楼层的 `water_quality`；
/// 只有传感器读数的楼层同样出现在结果中。
pub fn summarize_floors(
    devices: &[(DeviceFields, DeviceTelemetry)],
) -> BTreeMap<FloorKey, FloorSummary> {
    let mut meters: BTreeMap<FloorKey, FloorAccumulator> = BTreeMap::new();
    let mut quality = BTreeMap::new();

    for (fields, telemetry) in devices {
        let key = FloorKey::new(fields.campus_no, fields.building_no, fields.floor_no);
        match telemetry {
            DeviceTelemetry::Meter(reading) => meters.entry(key).or_default().add(reading),
            DeviceTelemetry::Quality(reading) => {
                meters.entry(key).or_default();
                quality.insert(key, reading.clone());
            }
        }
    }

    meters
        .into_iter()
        .map(|(key, acc)| {
            let summary = FloorSummary {
                key,
                device_count: acc.device_count,
                online_count: acc.online_count,
                total_flow: acc.total_flow,
                avg_flow: mean(acc.online_flow, acc.online_count),
                avg_pressure: mean(acc.online_pressure, acc.pressure_samples),
                avg_temperature: mean(acc.online_temperature, acc.temperature_samples),
                pressure_samples: acc.pressure_samples,
                temperature_samples: acc.temperature_samples,
                water_quality: quality.remove(&key),
            };
            (key, summary)
        })
        .collect()
}

/// 楼层汇总上卷为楼栋汇总。
///
/// 流量均值按在线数加权，压力 / 温度均值按各自的样本数加权。
pub fn summarize_building(
    campus_no: u8,
    building_no: u8,
    floors: Vec<FloorSummary>,
) -> BuildingSummary {
    let mut device_count = 0;
    let mut online_count = 0;
    let mut total_flow = 0.0;
    let mut weighted_flow = 0.0;
    let mut weighted_pressure = 0.0;
    let mut pressure_samples = 0;
    let mut weighted_temperature = 0.0;
    let mut temperature_samples = 0;
    for floor in &floors {
        device_count += floor.device_count;
        online_count += floor.online_count;
        total_flow += floor.total_flow;
        weighted_flow += floor.avg_flow * floor.online_count as f64;
        weighted_pressure += floor.avg_pressure * floor.pressure_samples as f64;
        pressure_samples += floor.pressure_samples;
        weighted_temperature += floor.avg_temperature * floor.temperature_samples as f64;
        temperature_samples += floor.temperature_samples;
    }
    BuildingSummary {
        campus_no,
        building_no,
        floors,
        device_count,
        online_count,
        total_flow,
        avg_flow: mean(weighted_flow, online_count),
        avg_pressure: mean(weighted_pressure, pressure_samples),
        avg_temperature: mean(weighted_temperature, temperature_samples),
    }
}

/// 将楼层汇总按楼栋分组上卷，按 (校区, 楼栋) 升序。
pub fn summarize_buildings(floors: &BTreeMap<FloorKey, FloorSummary>) -> Vec<BuildingSummary> {
    let mut grouped: BTreeMap<(u8, u8), Vec<FloorSummary>> = BTreeMap::new();
    for (key, floor) in floors {
        grouped
            .entry((key.campus_no, key.building_no))
            .or_default()
            .push(floor.clone());
    }
    grouped
        .into_iter()
        .map(|((campus_no, building_no), floors)| {
            summarize_building(campus_no, building_no, floors)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_online_set_averages_to_zero() {
        assert_eq!(mean(0.0, 0), 0.0);
        assert_eq!(mean(6.0, 2), 3.0);
    }

    #[test]
    fn empty_building_rolls_up_to_zero() {
        let summary = summarize_building(1, 1, Vec::new());
        assert_eq!(summary.device_count, 0);
        assert_eq!(summary.avg_flow, 0.0);
        assert!(!summary.avg_flow.is_nan());
    }
}
