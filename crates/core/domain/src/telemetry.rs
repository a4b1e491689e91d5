//! 单设备遥测快照（每个聚合周期重新获取，不与上一周期比对）。

/// 设备在线状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    /// 状态串以 `online` 开头即视为在线，其余（含缺失）均为离线。
    pub fn from_status_str(value: Option<&str>) -> Self {
        match value {
            Some(value) if value.starts_with("online") => DeviceStatus::Online,
            _ => DeviceStatus::Offline,
        }
    }

    pub fn is_online(self) -> bool {
        self == DeviceStatus::Online
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
        }
    }
}

/// 水表读数。
#[derive(Debug, Clone, PartialEq)]
pub struct MeterReading {
    pub device_id: String,
    pub status: DeviceStatus,
    pub flow: f64,
    /// `None` 表示本周期未取得（不参与均值）
    pub pressure: Option<f64>,
    pub temperature: Option<f64>,
    /// 设备整体请求失败（区别于设备自报离线）
    pub fetch_failed: bool,
}

impl MeterReading {
    /// 请求失败的设备：记为离线、读数全 0，但仍计入设备数。
    pub fn unreachable(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            status: DeviceStatus::Offline,
            flow: 0.0,
            pressure: Some(0.0),
            temperature: Some(0.0),
            fetch_failed: true,
        }
    }
}

/// 水质传感器读数。
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReading {
    pub device_id: String,
    pub status: DeviceStatus,
    /// 浊度 NTU
    pub turbidity: f64,
    pub ph: f64,
    /// 余氯 mg/L
    pub chlorine: f64,
    /// 温度 °C
    pub temperature: f64,
    pub fetch_failed: bool,
}

impl QualityReading {
    pub fn unreachable(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            status: DeviceStatus::Offline,
            turbidity: 0.0,
            ph: 0.0,
            chlorine: 0.0,
            temperature: 0.0,
            fetch_failed: true,
        }
    }
}

/// 单设备遥测。
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceTelemetry {
    Meter(MeterReading),
    Quality(QualityReading),
}

impl DeviceTelemetry {
    pub fn device_id(&self) -> &str {
        match self {
            DeviceTelemetry::Meter(reading) => &reading.device_id,
            DeviceTelemetry::Quality(reading) => &reading.device_id,
        }
    }

    pub fn status(&self) -> DeviceStatus {
        match self {
            DeviceTelemetry::Meter(reading) => reading.status,
            DeviceTelemetry::Quality(reading) => reading.status,
        }
    }

    pub fn fetch_failed(&self) -> bool {
        match self {
            DeviceTelemetry::Meter(reading) => reading.fetch_failed,
            DeviceTelemetry::Quality(reading) => reading.fetch_failed,
        }
    }
}
