//! 追踪、请求 ID 生成与进程内指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub aggregation_cycles: u64,
    pub aggregation_failures: u64,
    pub device_fetch_failures: u64,
    pub field_defaults: u64,
    pub malformed_ids: u64,
    pub status_source_failures: u64,
    pub config_fallbacks: u64,
    pub coalesced_triggers: u64,
    pub cycle_latency_ms_total: u64,
    pub cycle_latency_ms_count: u64,
}

/// 进程内计数器。
pub struct TelemetryMetrics {
    aggregation_cycles: AtomicU64,
    aggregation_failures: AtomicU64,
    device_fetch_failures: AtomicU64,
    field_defaults: AtomicU64,
    malformed_ids: AtomicU64,
    status_source_failures: AtomicU64,
    config_fallbacks: AtomicU64,
    coalesced_triggers: AtomicU64,
    cycle_latency_ms_total: AtomicU64,
    cycle_latency_ms_count: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            aggregation_cycles: AtomicU64::new(0),
            aggregation_failures: AtomicU64::new(0),
            device_fetch_failures: AtomicU64::new(0),
            field_defaults: AtomicU64::new(0),
            malformed_ids: AtomicU64::new(0),
            status_source_failures: AtomicU64::new(0),
            config_fallbacks: AtomicU64::new(0),
            coalesced_triggers: AtomicU64::new(0),
            cycle_latency_ms_total: AtomicU64::new(0),
            cycle_latency_ms_count: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            aggregation_cycles: self.aggregation_cycles.load(Ordering::Relaxed),
            aggregation_failures: self.aggregation_failures.load(Ordering::Relaxed),
            device_fetch_failures: self.device_fetch_failures.load(Ordering::Relaxed),
            field_defaults: self.field_defaults.load(Ordering::Relaxed),
            malformed_ids: self.malformed_ids.load(Ordering::Relaxed),
            status_source_failures: self.status_source_failures.load(Ordering::Relaxed),
            config_fallbacks: self.config_fallbacks.load(Ordering::Relaxed),
            coalesced_triggers: self.coalesced_triggers.load(Ordering::Relaxed),
            cycle_latency_ms_total: self.cycle_latency_ms_total.load(Ordering::Relaxed),
            cycle_latency_ms_count: self.cycle_latency_ms_count.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录一次完成的刷新周期。
pub fn record_aggregation_cycle() {
    metrics().aggregation_cycles.fetch_add(1, Ordering::Relaxed);
}

/// 记录整体失败的刷新周期。
pub fn record_aggregation_failure() {
    metrics().aggregation_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录单设备请求失败（按离线 + 0 读数计入）。
pub fn record_device_fetch_failure() {
    metrics()
        .device_fetch_failures
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录可选字段按默认值补齐的次数。
pub fn record_field_default() {
    metrics().field_defaults.fetch_add(1, Ordering::Relaxed);
}

/// 记录无法解析的设备编码数量。
pub fn record_malformed_ids(count: u64) {
    if count > 0 {
        metrics().malformed_ids.fetch_add(count, Ordering::Relaxed);
    }
}

/// 记录状态接口失败（整批视为离线）。
pub fn record_status_source_failure() {
    metrics()
        .status_source_failures
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录楼宇配置回退到默认值。
pub fn record_config_fallback() {
    metrics().config_fallbacks.fetch_add(1, Ordering::Relaxed);
}

/// 记录刷新进行中被合并的触发。
pub fn record_coalesced_trigger() {
    metrics().coalesced_triggers.fetch_add(1, Ordering::Relaxed);
}

/// 记录刷新周期耗时（毫秒）。
pub fn record_cycle_latency_ms(latency_ms: u64) {
    let metrics = metrics();
    metrics
        .cycle_latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
    metrics
        .cycle_latency_ms_count
        .fetch_add(1, Ordering::Relaxed);
}
