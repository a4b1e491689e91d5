//! 刷新调度器：定时 + 手动触发，刷新中的触发合并，视图销毁时取消。

use crate::job::{RefreshError, RefreshJob};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{Notify, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 最短刷新周期（`tokio::time::interval` 不接受零周期）。
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// 调度器状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Refreshing,
    /// 视图已销毁（终态）
    Stopped,
}

impl SchedulerState {
    pub fn as_str(self) -> &'static str {
        match self {
            SchedulerState::Idle => "idle",
            SchedulerState::Refreshing => "refreshing",
            SchedulerState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 对外发布的快照。
///
/// 每个周期整体替换；周期失败时保留上一次的 `data`，只更新 `last_error`。
#[derive(Debug)]
pub struct RefreshSnapshot<T> {
    pub state: SchedulerState,
    /// 已完成的周期数（含失败周期）
    pub cycle: u64,
    pub updated_at_ms: Option<i64>,
    pub last_error: Option<String>,
    pub data: Option<Arc<T>>,
}

impl<T> RefreshSnapshot<T> {
    fn initial() -> Self {
        Self {
            state: SchedulerState::Idle,
            cycle: 0,
            updated_at_ms: None,
            last_error: None,
            data: None,
        }
    }
}

impl<T> Clone for RefreshSnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state,
            cycle: self.cycle,
            updated_at_ms: self.updated_at_ms,
            last_error: self.last_error.clone(),
            data: self.data.clone(),
        }
    }
}

struct Shared<T> {
    name: &'static str,
    cancel: CancellationToken,
    trigger: Notify,
    refreshing: AtomicBool,
    snapshot: watch::Sender<RefreshSnapshot<T>>,
}

impl<T> Shared<T> {
    /// 取消定时器并发布终态；已停止时返回 `false`。
    fn shutdown(&self) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.cancel.cancel();
        self.snapshot
            .send_modify(|snapshot| snapshot.state = SchedulerState::Stopped);
        true
    }
}

/// 刷新调度器（每个视图一个）。
///
/// 创建即启动：立即执行首个周期，之后按固定周期或手动触发执行。
/// 周期小于 [`MIN_PERIOD`] 时按 `MIN_PERIOD` 计。
/// 销毁（`stop` 或 drop）时取消定时器；进行中的请求不中断，结果直接丢弃。
pub struct RefreshScheduler<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Send + Sync + 'static> RefreshScheduler<T> {
    pub fn start<J>(job: J, period: Duration) -> Self
    where
        J: RefreshJob<Output = T>,
    {
        let period = period.max(MIN_PERIOD);
        let (snapshot, _) = watch::channel(RefreshSnapshot::initial());
        let shared = Arc::new(Shared {
            name: job.name(),
            cancel: CancellationToken::new(),
            trigger: Notify::new(),
            refreshing: AtomicBool::new(false),
            snapshot,
        });
        info!(
            target: "water.scheduler",
            job = shared.name,
            period_ms = period.as_millis() as u64,
            "scheduler_started"
        );
        tokio::spawn(drive(job, period, shared.clone()));
        Self { shared }
    }

    /// 手动刷新；刷新进行中时与后续一个周期合并。
    pub fn refresh_now(&self) {
        if self.shared.cancel.is_cancelled() {
            return;
        }
        if self.shared.refreshing.load(Ordering::SeqCst) {
            debug!(
                target: "water.scheduler",
                job = self.shared.name,
                "refresh_coalesced"
            );
            water_telemetry::record_coalesced_trigger();
        }
        self.shared.trigger.notify_one();
    }

    /// 销毁视图：取消定时器，状态置为 `stopped`。
    pub fn stop(&self) {
        if self.shared.shutdown() {
            info!(
                target: "water.scheduler",
                job = self.shared.name,
                "scheduler_stopped"
            );
        }
    }

    pub fn snapshot(&self) -> RefreshSnapshot<T> {
        self.shared.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RefreshSnapshot<T>> {
        self.shared.snapshot.subscribe()
    }

    pub fn state(&self) -> SchedulerState {
        self.shared.snapshot.borrow().state
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }
}

impl<T> Drop for RefreshScheduler<T> {
    fn drop(&mut self) {
        self.shared.shutdown();
    }
}

async fn drive<J, T>(job: J, period: Duration, shared: Arc<Shared<T>>)
where
    J: RefreshJob<Output = T>,
    T: Send + Sync + 'static,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shared.cancel.cancelled() => break,
            _ = ticker.tick() => {}
            _ = shared.trigger.notified() => {}
        }

        shared.refreshing.store(true, Ordering::SeqCst);
        shared.snapshot.send_modify(|snapshot| {
            if snapshot.state != SchedulerState::Stopped {
                snapshot.state = SchedulerState::Refreshing;
            }
        });

        let started = Instant::now();
        let result = job.run().await;
        let latency_ms = started.elapsed().as_millis() as u64;
        shared.refreshing.store(false, Ordering::SeqCst);

        if shared.cancel.is_cancelled() {
            debug!(
                target: "water.scheduler",
                job = shared.name,
                "refresh_result_discarded"
            );
            break;
        }
        publish(&shared, result, latency_ms);
        ticker.reset();
    }
}

fn publish<T>(shared: &Shared<T>, result: Result<T, RefreshError>, latency_ms: u64) {
    water_telemetry::record_cycle_latency_ms(latency_ms);
    let ts_ms = now_epoch_ms();
    match result {
        Ok(data) => {
            water_telemetry::record_aggregation_cycle();
            let data = Arc::new(data);
            shared.snapshot.send_modify(|snapshot| {
                if snapshot.state == SchedulerState::Stopped {
                    return;
                }
                snapshot.state = SchedulerState::Idle;
                snapshot.cycle += 1;
                snapshot.updated_at_ms = Some(ts_ms);
                snapshot.last_error = None;
                snapshot.data = Some(data);
            });
            debug!(
                target: "water.scheduler",
                job = shared.name,
                latency_ms,
                "refresh_completed"
            );
        }
        Err(err) => {
            water_telemetry::record_aggregation_failure();
            warn!(
                target: "water.scheduler",
                job = shared.name,
                latency_ms,
                error = %err,
                "refresh_failed"
            );
            let message = err.to_string();
            shared.snapshot.send_modify(|snapshot| {
                if snapshot.state == SchedulerState::Stopped {
                    return;
                }
                snapshot.state = SchedulerState::Idle;
                snapshot.cycle += 1;
                snapshot.last_error = Some(message);
            });
        }
    }
}

fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    let duration = now
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    duration.as_millis() as i64
}
