//! 基于 reqwest 的上游数据源实现。
//!
//! 设备服务：楼宇配置、设备状态、模拟器状态；数据服务：单设备读数。

use crate::error::SourceError;
use crate::fetched::{Fetched, FromPayload, TaskStatus, unwrap_envelope};
use crate::traits::{
    ConfigSource, SimulatorSource, StatusSource, TelemetryField, TelemetrySource,
    config_from_payload,
};
use api_contract::BuildingConfigPayload;
use async_trait::async_trait;
use domain::BuildingConfig;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// 访问设备服务与数据服务的 HTTP 客户端。
#[derive(Clone)]
pub struct HttpSources {
    http: Client,
    device_api_url: String,
    data_api_url: String,
    auth_token: Option<String>,
}

impl HttpSources {
    pub fn new(
        device_api_url: impl Into<String>,
        data_api_url: impl Into<String>,
        timeout: Duration,
        auth_token: Option<String>,
    ) -> Result<Self, SourceError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(
            http,
            device_api_url,
            data_api_url,
            auth_token,
        ))
    }

    pub fn with_http_client(
        http: Client,
        device_api_url: impl Into<String>,
        data_api_url: impl Into<String>,
        auth_token: Option<String>,
    ) -> Self {
        Self {
            http,
            device_api_url: device_api_url.into().trim_end_matches('/').to_string(),
            data_api_url: data_api_url.into().trim_end_matches('/').to_string(),
            auth_token,
        }
    }

    fn device_url(&self, path: &str) -> String {
        format!("{}{}", self.device_api_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, SourceError> {
        let response = self.authorize(request).send().await?;
        read_body(response).await
    }

    async fn get_fetched<T: FromPayload>(&self, url: String) -> Result<Fetched<T>, SourceError> {
        let body = self.send(self.http.get(&url)).await?;
        Ok(Fetched::decode(body))
    }
}

/// 读取响应体；非 2xx 视为请求失败，非 JSON 文本按字符串值处理。
async fn read_body(response: reqwest::Response) -> Result<Value, SourceError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(SourceError::Status {
            status: status.as_u16(),
            message,
        });
    }
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

/// 解析状态映射；状态值非字符串时转为文本，不会被判为在线。
fn status_map(body: Value) -> HashMap<String, String> {
    let Some(Value::Object(map)) = unwrap_envelope(body) else {
        return HashMap::new();
    };
    map.into_iter()
        .map(|(id, status)| {
            let status = match status {
                Value::String(text) => text,
                other => other.to_string(),
            };
            (id, status)
        })
        .collect()
}

#[async_trait]
impl ConfigSource for HttpSources {
    async fn building_config(&self) -> Result<BuildingConfig, SourceError> {
        let body = self
            .send(self.http.get(self.device_url("/device/buildingConfig")))
            .await?;
        let data = unwrap_envelope(body)
            .ok_or_else(|| SourceError::Decode("building config is empty".to_string()))?;
        let payload: BuildingConfigPayload =
            serde_json::from_value(data).map_err(|err| SourceError::Decode(err.to_string()))?;
        Ok(config_from_payload(&payload))
    }
}

#[async_trait]
impl StatusSource for HttpSources {
    async fn device_status(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, String>, SourceError> {
        let request = self.http.post(self.device_url("/device/status")).json(ids);
        let body = self.send(request).await?;
        let statuses = status_map(body);
        debug!(
            target: "water.source",
            requested = ids.len(),
            reported = statuses.len(),
            "device_status_fetched"
        );
        Ok(statuses)
    }
}

#[async_trait]
impl TelemetrySource for HttpSources {
    async fn reading(
        &self,
        device_id: &str,
        field: TelemetryField,
    ) -> Result<Fetched<f64>, SourceError> {
        let url = format!("{}{}", self.data_api_url, field.path());
        let request = self.http.get(&url).query(&[("deviceId", device_id)]);
        let body = self.send(request).await?;
        Ok(Fetched::decode(body))
    }
}

#[async_trait]
impl SimulatorSource for HttpSources {
    async fn device_count(&self) -> Result<Fetched<u64>, SourceError> {
        self.get_fetched(self.device_url("/device/getDevicesNum"))
            .await
    }

    async fn is_initialized(&self) -> Result<Fetched<bool>, SourceError> {
        self.get_fetched(self.device_url("/device/isInit")).await
    }

    async fn task_status(&self) -> Result<Fetched<TaskStatus>, SourceError> {
        self.get_fetched(self.device_url("/device/taskStatus")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_map_reads_envelope_and_bare_objects() {
        let wrapped = status_map(json!({
            "code": 200,
            "data": {"110101001": "online", "110101002": "offline"}
        }));
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped["110101001"], "online");

        let bare = status_map(json!({"110101001": "online-idle"}));
        assert_eq!(bare["110101001"], "online-idle");
    }

    #[test]
    fn status_map_tolerates_missing_data() {
        assert!(status_map(json!({"code": 500, "data": null})).is_empty());
        assert!(status_map(Value::Null).is_empty());
        assert!(status_map(json!(["110101001"])).is_empty());
    }

    #[test]
    fn base_urls_are_normalized() {
        let sources = HttpSources::with_http_client(
            Client::new(),
            "http://device:18097/",
            "http://data:18016",
            None,
        );
        assert_eq!(
            sources.device_url("/device/isInit"),
            "http://device:18097/device/isInit"
        );
    }
}
