//! 上游数据源能力：楼宇配置、设备状态、遥测读数、模拟器状态。
//!
//! - `traits`：数据源接口（`Arc<dyn ...>` 注入）
//! - `fetched`：传输边界的 `Fetched<T>` 解码
//! - `http`：设备服务 / 数据服务的 reqwest 实现
//! - `in_memory`：内存实现（测试与演示）

pub mod error;
pub mod fetched;
pub mod http;
pub mod in_memory;
pub mod traits;

pub use error::SourceError;
pub use fetched::{Fetched, FromPayload, TaskStatus, unwrap_envelope};
pub use http::HttpSources;
pub use in_memory::InMemorySources;
pub use traits::{
    ConfigSource, SimulatorSource, StatusSource, TelemetryField, TelemetrySource,
    config_from_payload,
};
