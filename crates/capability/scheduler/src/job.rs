//! 刷新任务：调度器每个周期执行一次。

use async_trait::async_trait;
use std::sync::Arc;
use water_aggregate::{
    AggregateError, BuildingReport, SimulatorProbe, SimulatorSnapshot, TelemetryAggregator,
};
use water_topology::TopologyResolver;

/// 整个周期失败（单设备失败不会到这里）。
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("aggregation failed: {0}")]
    Aggregate(#[from] AggregateError),
    #[error("refresh job failed: {0}")]
    Job(String),
}

/// 刷新任务抽象。
#[async_trait]
pub trait RefreshJob: Send + Sync + 'static {
    type Output: Send + Sync + 'static;

    /// 用于日志的任务名
    fn name(&self) -> &'static str;

    async fn run(&self) -> Result<Self::Output, RefreshError>;
}

/// 楼栋遥测刷新（默认 30 秒）：每个周期重新加载配置并聚合整栋楼。
pub struct BuildingTelemetryJob {
    resolver: TopologyResolver,
    aggregator: TelemetryAggregator,
    campus_no: u8,
    building_no: u8,
}

impl BuildingTelemetryJob {
    pub fn new(
        resolver: TopologyResolver,
        aggregator: TelemetryAggregator,
        campus_no: u8,
        building_no: u8,
    ) -> Self {
        Self {
            resolver,
            aggregator,
            campus_no,
            building_no,
        }
    }
}

#[async_trait]
impl RefreshJob for BuildingTelemetryJob {
    type Output = BuildingReport;

    fn name(&self) -> &'static str {
        "building_telemetry"
    }

    async fn run(&self) -> Result<BuildingReport, RefreshError> {
        let (config, _) = self.resolver.load_config().await;
        let report = self
            .aggregator
            .fetch_building(self.campus_no, self.building_no, &config)
            .await?;
        Ok(report)
    }
}

/// 设备 / 任务状态刷新（默认 5 秒）。
pub struct SimulatorStatusJob {
    probe: SimulatorProbe,
}

impl SimulatorStatusJob {
    pub fn new(probe: SimulatorProbe) -> Self {
        Self { probe }
    }
}

#[async_trait]
impl RefreshJob for SimulatorStatusJob {
    type Output = SimulatorSnapshot;

    fn name(&self) -> &'static str {
        "simulator_status"
    }

    async fn run(&self) -> Result<SimulatorSnapshot, RefreshError> {
        Ok(self.probe.probe().await)
    }
}

/// 将共享任务包装为刷新任务。
#[async_trait]
impl<J: RefreshJob> RefreshJob for Arc<J> {
    type Output = J::Output;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn run(&self) -> Result<Self::Output, RefreshError> {
        (**self).run().await
    }
}
