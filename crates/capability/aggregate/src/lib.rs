//! 遥测聚合能力。
//!
//! - `TelemetryAggregator`：按设备编码拉取状态与读数，汇总到楼层 / 楼栋
//! - `summarize`：纯计算部分，不做 I/O
//! - `SimulatorProbe`：模拟器设备数与任务状态

pub mod aggregator;
pub mod simulator;
pub mod summarize;

pub use aggregator::{AggregateError, AggregateReport, BuildingReport, TelemetryAggregator};
pub use simulator::{SimulatorProbe, SimulatorSnapshot};
pub use summarize::{summarize_building, summarize_buildings, summarize_floors};
