//! 传输边界上的类型化解码。
//!
//! 上游响应可能是 `{code, message, data}` 信封，也可能是裸值；
//! 这里统一折叠为 `Fetched<T>`，聚合层不再关心响应形状。

use api_contract::{TaskStatusPayload, UpstreamEnvelope};
use serde_json::Value;

/// 单次读取的结果：拿到了值，或按默认值处理。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fetched<T> {
    Value(T),
    /// 响应为空、`data: null` 或无法解析
    Defaulted,
}

impl<T> Fetched<T> {
    /// 从原始响应体解码。
    pub fn decode(body: Value) -> Self
    where
        T: FromPayload,
    {
        match unwrap_envelope(body).and_then(T::from_payload) {
            Some(value) => Fetched::Value(value),
            None => Fetched::Defaulted,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Fetched::Defaulted)
    }

    pub fn value(self) -> Option<T> {
        match self {
            Fetched::Value(value) => Some(value),
            Fetched::Defaulted => None,
        }
    }

}

impl<T: Default> Fetched<T> {
    pub fn value_or_default(self) -> T {
        self.value().unwrap_or_default()
    }
}

/// 剥离响应信封，返回 `data`（或裸值本身）；空值返回 `None`。
pub fn unwrap_envelope(body: Value) -> Option<Value> {
    let is_envelope = body
        .as_object()
        .is_some_and(|map| map.contains_key("data") || map.contains_key("code"));
    if !is_envelope {
        return (!body.is_null()).then_some(body);
    }
    let envelope: UpstreamEnvelope<Value> = serde_json::from_value(body).ok()?;
    envelope.data.filter(|data| !data.is_null())
}

/// 从已剥离信封的 JSON 值构造具体类型。
pub trait FromPayload: Sized {
    fn from_payload(value: Value) -> Option<Self>;
}

impl FromPayload for f64 {
    fn from_payload(value: Value) -> Option<Self> {
        let number = match value {
            Value::Number(number) => number.as_f64()?,
            Value::String(text) => text.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        number.is_finite().then_some(number)
    }
}

impl FromPayload for u64 {
    fn from_payload(value: Value) -> Option<Self> {
        match value {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.trim().parse::<u64>().ok(),
            _ => None,
        }
    }
}

impl FromPayload for bool {
    fn from_payload(value: Value) -> Option<Self> {
        match value {
            Value::Bool(flag) => Some(flag),
            Value::Number(number) => number.as_u64().map(|n| n != 0),
            Value::String(text) => match text.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

/// 模拟任务运行状态。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStatus {
    pub meter_running: bool,
    pub sensor_running: bool,
}

impl TaskStatus {
    pub fn any_running(&self) -> bool {
        self.meter_running || self.sensor_running
    }
}

impl FromPayload for TaskStatus {
    fn from_payload(value: Value) -> Option<Self> {
        let payload: TaskStatusPayload = serde_json::from_value(value).ok()?;
        Some(TaskStatus {
            meter_running: payload.meter_running,
            sensor_running: payload.sensor_running,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_and_bare_values_decode_alike() {
        assert_eq!(Fetched::<f64>::decode(json!(2.5)), Fetched::Value(2.5));
        assert_eq!(
            Fetched::<f64>::decode(json!({"code": 200, "message": "ok", "data": 2.5})),
            Fetched::Value(2.5)
        );
        assert_eq!(Fetched::<f64>::decode(json!("3.75")), Fetched::Value(3.75));
    }

    #[test]
    fn null_or_garbage_is_defaulted() {
        assert!(Fetched::<f64>::decode(Value::Null).is_defaulted());
        assert!(Fetched::<f64>::decode(json!({"code": 200, "data": null})).is_defaulted());
        assert!(Fetched::<f64>::decode(json!("n/a")).is_defaulted());
        assert!(Fetched::<f64>::decode(json!("NaN")).is_defaulted());
        assert!(Fetched::<f64>::decode(json!([1, 2])).is_defaulted());
    }

    #[test]
    fn plain_object_is_not_an_envelope() {
        let body = json!({"meterRunning": true});
        let status = Fetched::<TaskStatus>::decode(body).value_or_default();
        assert!(status.meter_running);
        assert!(!status.sensor_running);
        assert!(status.any_running());
    }

    #[test]
    fn flags_accept_numeric_and_text() {
        assert_eq!(Fetched::<bool>::decode(json!(1)), Fetched::Value(true));
        assert_eq!(Fetched::<bool>::decode(json!("false")), Fetched::Value(false));
        assert!(Fetched::<u64>::decode(json!(-3)).is_defaulted());
    }
}
