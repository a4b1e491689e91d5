//! 模拟器状态探测（设备总数、初始化标记、模拟任务运行状态）。

use std::sync::Arc;
use tracing::warn;
use water_source::{Fetched, SimulatorSource, SourceError, TaskStatus};

/// 模拟器状态快照；各字段独立取数，失败时取 0 / false。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulatorSnapshot {
    pub device_count: u64,
    pub initialized: bool,
    pub meter_running: bool,
    pub sensor_running: bool,
}

impl SimulatorSnapshot {
    pub fn any_task_running(&self) -> bool {
        self.meter_running || self.sensor_running
    }
}

#[derive(Clone)]
pub struct SimulatorProbe {
    source: Arc<dyn SimulatorSource>,
}

impl SimulatorProbe {
    pub fn new(source: Arc<dyn SimulatorSource>) -> Self {
        Self { source }
    }

    pub async fn probe(&self) -> SimulatorSnapshot {
        let (device_count, initialized, task_status) = futures::join!(
            self.source.device_count(),
            self.source.is_initialized(),
            self.source.task_status(),
        );
        let task_status: TaskStatus = or_default("task_status", task_status);
        SimulatorSnapshot {
            device_count: or_default("device_count", device_count),
            initialized: or_default("initialized", initialized),
            meter_running: task_status.meter_running,
            sensor_running: task_status.sensor_running,
        }
    }
}

fn or_default<T: Default>(field: &'static str, result: Result<Fetched<T>, SourceError>) -> T {
    match result {
        Ok(fetched) => fetched.value_or_default(),
        Err(err) => {
            warn!(
                target: "water.aggregate",
                field,
                error = %err,
                "simulator_probe_failed"
            );
            T::default()
        }
    }
}
