//! 应用状态：数据源装配、状态刷新调度器与当前监控视图。

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;
use water_aggregate::{BuildingReport, SimulatorProbe, SimulatorSnapshot, TelemetryAggregator};
use water_scheduler::{
    BuildingTelemetryJob, RefreshScheduler, RefreshSnapshot, SimulatorStatusJob,
};
use water_source::{ConfigSource, SimulatorSource, StatusSource, TelemetrySource};
use water_topology::TopologyResolver;

/// 两个调度器的刷新周期。
#[derive(Debug, Clone, Copy)]
pub struct MonitorSettings {
    pub telemetry_period: Duration,
    pub status_period: Duration,
}

#[derive(Clone)]
pub struct AppState {
    pub topology: TopologyResolver,
    pub aggregator: TelemetryAggregator,
    pub monitor: Arc<MonitorView>,
    pub simulator: Arc<RefreshScheduler<SimulatorSnapshot>>,
}

impl AppState {
    /// 用同时实现全部数据源接口的实现装配状态，并启动状态刷新调度器。
    pub fn from_sources<S>(sources: Arc<S>, settings: MonitorSettings) -> Self
    where
        S: ConfigSource + StatusSource + TelemetrySource + SimulatorSource + 'static,
    {
        let simulator = RefreshScheduler::start(
            SimulatorStatusJob::new(SimulatorProbe::new(sources.clone())),
            settings.status_period,
        );
        Self {
            topology: TopologyResolver::new(sources.clone()),
            aggregator: TelemetryAggregator::new(sources.clone(), sources),
            monitor: Arc::new(MonitorView::new(settings.telemetry_period)),
            simulator: Arc::new(simulator),
        }
    }

    /// 切换监控楼栋：销毁旧视图的调度器后启动新的。
    pub async fn select_building(&self, campus_no: u8, building_no: u8) {
        let job = BuildingTelemetryJob::new(
            self.topology.clone(),
            self.aggregator.clone(),
            campus_no,
            building_no,
        );
        self.monitor.select(campus_no, building_no, job).await;
    }
}

/// 当前监控的楼栋及其遥测调度器。
pub struct ActiveView {
    pub campus_no: u8,
    pub building_no: u8,
    pub scheduler: RefreshScheduler<BuildingReport>,
}

/// 监控视图：同一时刻最多一个活动调度器。
pub struct MonitorView {
    period: Duration,
    active: Mutex<Option<ActiveView>>,
}

impl MonitorView {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            active: Mutex::new(None),
        }
    }

    pub async fn select(&self, campus_no: u8, building_no: u8, job: BuildingTelemetryJob) {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            previous.scheduler.stop();
        }
        *active = Some(ActiveView {
            campus_no,
            building_no,
            scheduler: RefreshScheduler::start(job, self.period),
        });
        info!(
            target: "water.api",
            campus_no,
            building_no,
            "monitor_view_selected"
        );
    }

    /// 当前视图的 (校区, 楼栋, 快照)。
    pub async fn current(&self) -> Option<(u8, u8, RefreshSnapshot<BuildingReport>)> {
        let active = self.active.lock().await;
        active
            .as_ref()
            .map(|view| (view.campus_no, view.building_no, view.scheduler.snapshot()))
    }

    /// 手动刷新当前视图；没有视图时返回 `None`。
    pub async fn refresh(&self) -> Option<(u8, u8, RefreshSnapshot<BuildingReport>)> {
        let active = self.active.lock().await;
        active.as_ref().map(|view| {
            view.scheduler.refresh_now();
            (view.campus_no, view.building_no, view.scheduler.snapshot())
        })
    }

    /// 销毁当前视图；没有视图时返回 `false`。
    pub async fn clear(&self) -> bool {
        let mut active = self.active.lock().await;
        match active.take() {
            Some(view) => {
                view.scheduler.stop();
                info!(
                    target: "water.api",
                    campus_no = view.campus_no,
                    building_no = view.building_no,
                    "monitor_view_cleared"
                );
                true
            }
            None => false,
        }
    }
}
