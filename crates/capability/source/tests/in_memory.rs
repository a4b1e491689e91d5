use api_contract::BuildingConfigPayload;
use domain::BuildingConfig;
use water_source::{
    ConfigSource, Fetched, InMemorySources, SimulatorSource, StatusSource, TaskStatus,
    TelemetryField, TelemetrySource, config_from_payload,
};

#[tokio::test]
async fn unset_config_is_an_error() {
    let sources = InMemorySources::new();
    assert!(sources.building_config().await.is_err());

    sources.set_config(Some(BuildingConfig::FALLBACK));
    let config = sources.building_config().await.expect("config");
    assert_eq!(config.total_buildings, 6);
}

#[tokio::test]
async fn status_only_reports_known_ids() {
    let sources = InMemorySources::new();
    sources.set_status("110101001", "online");
    let ids = vec!["110101001".to_string(), "110101002".to_string()];
    let statuses = sources.device_status(&ids).await.expect("statuses");
    assert_eq!(statuses.len(), 1);
    assert_eq!(sources.status_calls(), 1);

    sources.set_status_unavailable(true);
    assert!(sources.device_status(&ids).await.is_err());
}

#[tokio::test]
async fn readings_default_or_fail_per_device() {
    let sources = InMemorySources::new();
    sources.add_online_meter("110101001", 1.5, 0.3, 18.0);
    sources.fail_device("110101003");

    let flow = sources
        .reading("110101001", TelemetryField::Flow)
        .await
        .expect("flow");
    assert_eq!(flow, Fetched::Value(1.5));

    let missing = sources
        .reading("110101002", TelemetryField::Flow)
        .await
        .expect("missing reading");
    assert!(missing.is_defaulted());

    assert!(
        sources
            .reading("110101003", TelemetryField::Pressure)
            .await
            .is_err()
    );
    assert_eq!(sources.reading_calls(), 3);
}

#[tokio::test]
async fn simulator_fields_fail_independently() {
    let sources = InMemorySources::new();
    sources.set_simulator(
        Some(360),
        None,
        Some(TaskStatus {
            meter_running: true,
            sensor_running: false,
        }),
    );
    assert_eq!(
        sources.device_count().await.expect("count"),
        Fetched::Value(360)
    );
    assert!(sources.is_initialized().await.is_err());
    let status = sources.task_status().await.expect("task").value_or_default();
    assert!(status.any_running());
}

#[test]
fn config_payload_fills_missing_and_zero_fields() {
    let payload = BuildingConfigPayload {
        education_start: Some(2),
        experiment_start: None,
        dormitory_start: Some(0),
        total_buildings: Some(8),
        floors: None,
        rooms: Some(12),
    };
    let config = config_from_payload(&payload);
    assert_eq!(config.education_start, 2);
    assert_eq!(config.experiment_start, 3);
    assert_eq!(config.dormitory_start, 4);
    assert_eq!(config.total_buildings, 8);
    assert_eq!(config.floors, 6);
    assert_eq!(config.rooms, 12);
}
