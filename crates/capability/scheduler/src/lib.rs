//! 刷新调度能力。
//!
//! 两个相互独立的调度器：设备 / 任务状态（5 秒）与楼栋遥测（30 秒）。
//! 快照通过 `tokio::sync::watch` 整体替换发布。

pub mod job;
pub mod scheduler;

pub use job::{BuildingTelemetryJob, RefreshError, RefreshJob, SimulatorStatusJob};
pub use scheduler::{MIN_PERIOD, RefreshScheduler, RefreshSnapshot, SchedulerState};
