//! 应用运行配置加载。

use std::env;
use std::time::Duration;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    /// 设备服务（楼宇配置、设备状态、模拟器状态）
    pub device_api_url: String,
    /// 数据服务（流量、压力、温度、水质读数）
    pub data_api_url: String,
    pub http_timeout_ms: u64,
    pub auth_token: Option<String>,
    /// 设备 / 任务状态刷新周期
    pub status_refresh_seconds: u64,
    /// 楼栋遥测刷新周期
    pub telemetry_refresh_seconds: u64,
    pub default_campus: u8,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr =
            env::var("WATER_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let device_api_url = read_url_with_default("WATER_DEVICE_API_URL", "http://127.0.0.1:18097");
        let data_api_url = read_url_with_default("WATER_DATA_API_URL", "http://127.0.0.1:18016");
        let http_timeout_ms = read_u64_with_default("WATER_HTTP_TIMEOUT_MS", 10_000)?;
        let auth_token = read_optional("WATER_AUTH_TOKEN");
        let status_refresh_seconds = read_positive_u64("WATER_STATUS_REFRESH_SECONDS", 5)?;
        let telemetry_refresh_seconds = read_positive_u64("WATER_TELEMETRY_REFRESH_SECONDS", 30)?;
        let default_campus = read_u8_with_default("WATER_DEFAULT_CAMPUS", 2)?;
        if !(1..=3).contains(&default_campus) {
            return Err(ConfigError::Invalid(
                "WATER_DEFAULT_CAMPUS".to_string(),
                default_campus.to_string(),
            ));
        }

        Ok(Self {
            http_addr,
            device_api_url,
            data_api_url,
            http_timeout_ms,
            auth_token,
            status_refresh_seconds,
            telemetry_refresh_seconds,
            default_campus,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    pub fn status_refresh_period(&self) -> Duration {
        Duration::from_secs(self.status_refresh_seconds)
    }

    pub fn telemetry_refresh_period(&self) -> Duration {
        Duration::from_secs(self.telemetry_refresh_seconds)
    }
}

fn read_url_with_default(key: &str, default: &str) -> String {
    read_optional(key)
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

fn read_u8_with_default(key: &str, default: u8) -> Result<u8, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u8>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

/// 读取必须为正数的周期配置。
fn read_positive_u64(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = read_u64_with_default(key, default)?;
    if value == 0 {
        return Err(ConfigError::Invalid(key.to_string(), "0".to_string()));
    }
    Ok(value)
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
