//! 校园供水监控 HTTP 服务：楼宇拓扑、楼栋遥测汇总与刷新调度。

mod handlers;
mod middleware;
mod routes;
mod state;
mod utils;

use state::{AppState, MonitorSettings};
use std::sync::Arc;
use tracing::info;
use water_config::AppConfig;
use water_source::HttpSources;
use water_telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    // 设备服务 + 数据服务
    let sources = Arc::new(HttpSources::new(
        config.device_api_url.clone(),
        config.data_api_url.clone(),
        config.http_timeout(),
        config.auth_token.clone(),
    )?);
    let state = AppState::from_sources(
        sources,
        MonitorSettings {
            telemetry_period: config.telemetry_refresh_period(),
            status_period: config.status_refresh_period(),
        },
    );

    // 启动时默认监控默认校区 1 号楼
    state.select_building(config.default_campus, 1).await;

    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(
        target: "water.api",
        addr = %config.http_addr,
        device_api = %config.device_api_url,
        data_api = %config.data_api_url,
        "http_listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
