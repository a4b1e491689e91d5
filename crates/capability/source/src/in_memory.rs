//! 内存数据源（用于测试与本地演示）。

use crate::error::SourceError;
use crate::fetched::{Fetched, TaskStatus};
use crate::traits::{
    ConfigSource, SimulatorSource, StatusSource, TelemetryField, TelemetrySource,
};
use async_trait::async_trait;
use domain::BuildingConfig;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
struct SimulatorState {
    device_count: Option<u64>,
    initialized: Option<bool>,
    task_status: Option<TaskStatus>,
}

/// 同时实现全部数据源接口的内存实现。
///
/// - 未设置的读数返回 `Fetched::Defaulted`
/// - 标记为失败的设备所有读数请求返回错误
/// - 未设置的配置 / 模拟器字段返回错误
pub struct InMemorySources {
    config: RwLock<Option<BuildingConfig>>,
    statuses: RwLock<HashMap<String, String>>,
    status_unavailable: AtomicBool,
    readings: RwLock<HashMap<(String, TelemetryField), f64>>,
    failing_devices: RwLock<HashSet<String>>,
    simulator: RwLock<SimulatorState>,
    status_calls: AtomicUsize,
    reading_calls: AtomicUsize,
}

impl InMemorySources {
    pub fn new() -> Self {
        Self {
            config: RwLock::new(None),
            statuses: RwLock::new(HashMap::new()),
            status_unavailable: AtomicBool::new(false),
            readings: RwLock::new(HashMap::new()),
            failing_devices: RwLock::new(HashSet::new()),
            simulator: RwLock::new(SimulatorState::default()),
            status_calls: AtomicUsize::new(0),
            reading_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_config(config: BuildingConfig) -> Self {
        let sources = Self::new();
        sources.set_config(Some(config));
        sources
    }

    pub fn set_config(&self, config: Option<BuildingConfig>) {
        if let Ok(mut slot) = self.config.write() {
            *slot = config;
        }
    }

    pub fn set_status(&self, device_id: &str, status: &str) {
        if let Ok(mut map) = self.statuses.write() {
            map.insert(device_id.to_string(), status.to_string());
        }
    }

    /// 模拟状态接口整体不可用。
    pub fn set_status_unavailable(&self, unavailable: bool) {
        self.status_unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_reading(&self, device_id: &str, field: TelemetryField, value: f64) {
        if let Ok(mut map) = self.readings.write() {
            map.insert((device_id.to_string(), field), value);
        }
    }

    /// 设置一块在线水表的三项读数。
    pub fn add_online_meter(&self, device_id: &str, flow: f64, pressure: f64, temperature: f64) {
        self.set_status(device_id, "online");
        self.set_reading(device_id, TelemetryField::Flow, flow);
        self.set_reading(device_id, TelemetryField::Pressure, pressure);
        self.set_reading(device_id, TelemetryField::Temperature, temperature);
    }

    /// 该设备的所有读数请求都返回错误。
    pub fn fail_device(&self, device_id: &str) {
        if let Ok(mut set) = self.failing_devices.write() {
            set.insert(device_id.to_string());
        }
    }

    pub fn set_simulator(
        &self,
        device_count: Option<u64>,
        initialized: Option<bool>,
        task_status: Option<TaskStatus>,
    ) {
        if let Ok(mut state) = self.simulator.write() {
            *state = SimulatorState {
                device_count,
                initialized,
                task_status,
            };
        }
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn reading_calls(&self) -> usize {
        self.reading_calls.load(Ordering::SeqCst)
    }

    fn simulator_field<T>(
        &self,
        name: &str,
        pick: impl FnOnce(&SimulatorState) -> Option<T>,
    ) -> Result<Fetched<T>, SourceError> {
        let state = self
            .simulator
            .read()
            .map_err(|_| SourceError::unavailable("lock failed"))?;
        pick(&*state)
            .map(Fetched::Value)
            .ok_or_else(|| SourceError::unavailable(format!("{} not set", name)))
    }
}

impl Default for InMemorySources {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigSource for InMemorySources {
    async fn building_config(&self) -> Result<BuildingConfig, SourceError> {
        let config = self
            .config
            .read()
            .map_err(|_| SourceError::unavailable("lock failed"))?;
        (*config).ok_or_else(|| SourceError::unavailable("building config not set"))
    }
}

#[async_trait]
impl StatusSource for InMemorySources {
    async fn device_status(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, String>, SourceError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if self.status_unavailable.load(Ordering::SeqCst) {
            return Err(SourceError::unavailable("status service down"));
        }
        let map = self
            .statuses
            .read()
            .map_err(|_| SourceError::unavailable("lock failed"))?;
        Ok(ids
            .iter()
            .filter_map(|id| map.get(id).map(|status| (id.clone(), status.clone())))
            .collect())
    }
}

#[async_trait]
impl TelemetrySource for InMemorySources {
    async fn reading(
        &self,
        device_id: &str,
        field: TelemetryField,
    ) -> Result<Fetched<f64>, SourceError> {
        self.reading_calls.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failing_devices
            .read()
            .map_err(|_| SourceError::unavailable("lock failed"))?;
        if failing.contains(device_id) {
            return Err(SourceError::unavailable(format!(
                "device {} unreachable",
                device_id
            )));
        }
        let map = self
            .readings
            .read()
            .map_err(|_| SourceError::unavailable("lock failed"))?;
        Ok(map
            .get(&(device_id.to_string(), field))
            .copied()
            .map(Fetched::Value)
            .unwrap_or(Fetched::Defaulted))
    }
}

#[async_trait]
impl SimulatorSource for InMemorySources {
    async fn device_count(&self) -> Result<Fetched<u64>, SourceError> {
        self.simulator_field("device count", |state| state.device_count)
    }

    async fn is_initialized(&self) -> Result<Fetched<bool>, SourceError> {
        self.simulator_field("initialized flag", |state| state.initialized)
    }

    async fn task_status(&self) -> Result<Fetched<TaskStatus>, SourceError> {
        self.simulator_field("task status", |state| state.task_status)
    }
}
