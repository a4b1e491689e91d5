//! 路由定义
//!
//! - 健康检查：/health
//! - 校区楼宇：/api/campuses/:campus/*
//! - 设备编码：/api/devices/:device_id
//! - 监控视图：/api/monitor/*
//! - 模拟器状态：/api/simulator/status
//! - 指标：/metrics

use crate::handlers::*;
use crate::middleware::request_context;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

/// 创建完整路由（含请求追踪中间件）
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
        .route("/api/campuses/:campus/buildings", get(list_buildings))
        .route("/api/campuses/:campus/topology", get(get_topology))
        .route("/api/devices/:device_id", get(decode_device))
        .route("/api/monitor", delete(clear_monitor))
        .route("/api/monitor/select", post(select_building))
        .route("/api/monitor/summary", get(get_summary))
        .route("/api/monitor/refresh", post(refresh_monitor))
        .route("/api/simulator/status", get(get_simulator_status))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_context))
}

#[cfg(test)]
mod tests {
    use super::create_router;
    use crate::state::{AppState, MonitorSettings};
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;
    use water_source::{InMemorySources, TaskStatus};

    fn test_app() -> (Router, AppState, Arc<InMemorySources>) {
        let sources = Arc::new(InMemorySources::new());
        sources.add_online_meter("120101001", 2.0, 0.3, 20.0);
        sources.add_online_meter("120101002", 4.0, 0.5, 22.0);
        sources.set_simulator(
            Some(360),
            Some(true),
            Some(TaskStatus {
                meter_running: true,
                sensor_running: true,
            }),
        );
        let state = AppState::from_sources(
            sources.clone(),
            MonitorSettings {
                telemetry_period: Duration::from_secs(3600),
                status_period: Duration::from_secs(3600),
            },
        );
        (create_router(state.clone()), state, sources)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn wait_for_summary(app: &Router) -> Value {
        for _ in 0..200 {
            let (status, body) = call(app, Method::GET, "/api/monitor/summary", None).await;
            assert_eq!(status, StatusCode::OK);
            if !body["data"]["snapshot"]["data"].is_null() {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("summary never published");
    }

    #[tokio::test]
    async fn health_carries_request_ids() {
        let (app, _, _) = test_app();
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request");
        let response = app.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert!(response.headers().contains_key("x-trace-id"));
    }

    #[tokio::test]
    async fn buildings_fall_back_to_default_config() {
        let (app, _, _) = test_app();
        let (status, body) = call(&app, Method::GET, "/api/campuses/2/buildings", None).await;
        assert_eq!(status, StatusCode::OK);
        let items = body["data"].as_array().expect("items");
        assert_eq!(items.len(), 6);
        assert_eq!(items[0]["name"], "龙子湖校区教学楼1号");
        assert_eq!(items[3]["type"], "dormitory");

        let (status, _) = call(&app, Method::GET, "/api/campuses/abc/buildings", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn topology_reports_device_totals() {
        let (app, _, _) = test_app();
        let (status, body) = call(&app, Method::GET, "/api/campuses/1/topology", None).await;
        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["campusName"], "花园校区");
        assert_eq!(data["campusCode"], "HY");
        assert_eq!(data["configFallback"], true);
        assert_eq!(data["meterCount"], 360);
        assert_eq!(data["sensorCount"], 36);
        assert_eq!(data["experimentBuildings"], 2);
    }

    #[tokio::test]
    async fn device_ids_decode_or_reject() {
        let (app, _, _) = test_app();
        let (status, body) = call(&app, Method::GET, "/api/devices/130512007", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["campusNo"], 3);
        assert_eq!(body["data"]["buildingNo"], 5);
        assert_eq!(body["data"]["floorNo"], 12);
        assert_eq!(body["data"]["unitNo"], 7);

        let (status, body) = call(&app, Method::GET, "/api/devices/12345", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn monitor_view_lifecycle() {
        let (app, _, _) = test_app();

        let (status, _) = call(&app, Method::GET, "/api/monitor/summary", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/monitor/select",
            Some(serde_json::json!({"campusNo": 2, "buildingNo": 7})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/monitor/select",
            Some(serde_json::json!({"campusNo": 2, "buildingNo": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let body = wait_for_summary(&app).await;
        let summary = &body["data"]["snapshot"]["data"];
        assert_eq!(summary["deviceCount"], 60);
        assert_eq!(summary["onlineCount"], 2);
        assert_eq!(summary["totalFlow"], 6.0);
        assert_eq!(summary["avgFlow"], 3.0);
        assert_eq!(summary["floors"].as_array().map(Vec::len), Some(6));

        let (status, _) = call(&app, Method::POST, "/api/monitor/refresh", None).await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let (status, _) = call(&app, Method::DELETE, "/api/monitor", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, Method::POST, "/api/monitor/refresh", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn simulator_status_is_published() {
        let (app, state, _) = test_app();
        let mut updates = state.simulator.subscribe();
        tokio::time::timeout(
            Duration::from_secs(5),
            updates.wait_for(|snapshot| snapshot.cycle >= 1),
        )
        .await
        .expect("status cycle in time")
        .expect("scheduler alive");

        let (status, body) = call(&app, Method::GET, "/api/simulator/status", None).await;
        assert_eq!(status, StatusCode::OK);
        let data = &body["data"]["data"];
        assert_eq!(data["deviceCount"], 360);
        assert_eq!(data["anyTaskRunning"], true);
        assert_eq!(body["data"]["state"], "idle");
    }

    #[tokio::test]
    async fn metrics_snapshot_is_served() {
        let (app, _, _) = test_app();
        let (status, body) = call(&app, Method::GET, "/metrics", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["aggregationCycles"].is_u64());
    }
}
