use domain::{BuildingConfig, DeviceStatus, DeviceTelemetry, FloorKey};
use std::sync::Arc;
use water_aggregate::{AggregateError, SimulatorProbe, TelemetryAggregator};
use water_source::{InMemorySources, TaskStatus, TelemetryField};

fn aggregator(sources: &Arc<InMemorySources>) -> TelemetryAggregator {
    TelemetryAggregator::new(sources.clone(), sources.clone())
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn approx(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}

#[tokio::test]
async fn averages_use_online_devices_only() {
    let sources = Arc::new(InMemorySources::new());
    sources.add_online_meter("110101001", 2.0, 0.2, 20.0);
    sources.add_online_meter("110101002", 4.0, 0.4, 22.0);
    sources.set_status("110101003", "offline");
    sources.set_reading("110101003", TelemetryField::Flow, 0.0);
    sources.set_reading("110101004", TelemetryField::Flow, 0.0);

    let report = aggregator(&sources)
        .fetch_and_aggregate(&ids(&["110101001", "110101002", "110101003", "110101004"]))
        .await;

    let floor = report
        .floors
        .get(&FloorKey::new(1, 1, 1))
        .expect("floor 1");
    assert_eq!(floor.device_count, 4);
    assert_eq!(floor.online_count, 2);
    assert_eq!(floor.offline_count(), 2);
    assert_eq!(floor.total_flow, 6.0);
    assert_eq!(floor.avg_flow, 3.0);
    assert!(approx(floor.avg_pressure, 0.3));
    assert!(approx(floor.avg_temperature, 21.0));
    assert!(floor.water_quality.is_none());
}

#[tokio::test]
async fn one_failed_device_does_not_spoil_the_batch() {
    let sources = Arc::new(InMemorySources::new());
    let all = ids(&["110101001", "110101002", "110101003", "110101004", "110101005"]);
    for (index, id) in all.iter().enumerate() {
        sources.add_online_meter(id, (index + 1) as f64, 0.5, 18.0);
    }
    sources.fail_device("110101003");

    let report = aggregator(&sources).fetch_and_aggregate(&all).await;
    let floor = report
        .floors
        .get(&FloorKey::new(1, 1, 1))
        .expect("floor 1");
    assert_eq!(floor.device_count, 5);
    assert_eq!(floor.online_count, 4);
    assert_eq!(floor.total_flow, 12.0);
    assert_eq!(floor.avg_flow, 3.0);

    let Some(DeviceTelemetry::Meter(failed)) = report.device("110101003") else {
        panic!("failed device missing from report");
    };
    assert_eq!(failed.status, DeviceStatus::Offline);
    assert_eq!(failed.flow, 0.0);
    assert_eq!(failed.pressure, Some(0.0));
    assert_eq!(failed.temperature, Some(0.0));
    assert!(failed.fetch_failed);

    let Some(DeviceTelemetry::Meter(healthy)) = report.device("110101005") else {
        panic!("healthy device missing from report");
    };
    assert_eq!(healthy.flow, 5.0);
    assert_eq!(healthy.pressure, Some(0.5));
    assert!(!healthy.fetch_failed);
}

#[tokio::test]
async fn malformed_ids_are_counted_not_grouped() {
    let sources = Arc::new(InMemorySources::new());
    sources.add_online_meter("110101001", 1.0, 0.1, 15.0);

    let report = aggregator(&sources)
        .fetch_and_aggregate(&ids(&["110101001", "12345", "999999999", "1a0010001"]))
        .await;
    assert_eq!(report.malformed_count, 3);
    assert_eq!(report.devices.len(), 1);
    assert_eq!(report.floors.len(), 1);
    // 只为可解析设备发起请求：1 次状态 + 3 项读数
    assert_eq!(sources.status_calls(), 1);
    assert_eq!(sources.reading_calls(), 3);
}

#[tokio::test]
async fn status_outage_keeps_readings() {
    let sources = Arc::new(InMemorySources::new());
    sources.add_online_meter("110101001", 1.5, 0.1, 15.0);
    sources.add_online_meter("110101002", 2.5, 0.1, 15.0);
    sources.set_status_unavailable(true);

    let report = aggregator(&sources)
        .fetch_and_aggregate(&ids(&["110101001", "110101002"]))
        .await;
    let floor = report
        .floors
        .get(&FloorKey::new(1, 1, 1))
        .expect("floor 1");
    assert_eq!(floor.device_count, 2);
    assert_eq!(floor.online_count, 0);
    assert_eq!(floor.total_flow, 4.0);
    assert_eq!(floor.avg_flow, 0.0);
    assert_eq!(sources.reading_calls(), 6);
}

#[tokio::test]
async fn water_quality_attaches_to_its_floor() {
    let sources = Arc::new(InMemorySources::new());
    sources.add_online_meter("110101001", 1.0, 0.2, 16.0);
    sources.add_online_meter("110102001", 2.0, 0.2, 16.0);
    sources.set_status("210101001", "online");
    sources.set_reading("210101001", TelemetryField::Turbidity, 0.8);
    sources.set_reading("210101001", TelemetryField::Ph, 7.2);
    sources.set_reading("210101001", TelemetryField::Chlorine, 0.3);

    let report = aggregator(&sources)
        .fetch_and_aggregate(&ids(&["110101001", "110102001", "210101001"]))
        .await;

    let first = report
        .floors
        .get(&FloorKey::new(1, 1, 1))
        .expect("floor 1");
    assert_eq!(first.device_count, 1);
    let quality = first.water_quality.as_ref().expect("quality row");
    assert_eq!(quality.ph, 7.2);
    assert_eq!(quality.temperature, 0.0);
    assert!(quality.status.is_online());

    let second = report
        .floors
        .get(&FloorKey::new(1, 1, 2))
        .expect("floor 2");
    assert!(second.water_quality.is_none());
}

#[tokio::test]
async fn building_rollup_weights_by_online_devices() {
    let sources = Arc::new(InMemorySources::new());
    sources.add_online_meter("110101001", 2.0, 0.0, 0.0);
    sources.add_online_meter("110101002", 4.0, 0.0, 0.0);
    sources.add_online_meter("110102001", 6.0, 0.0, 0.0);
    sources.set_reading("110102002", TelemetryField::Flow, 0.0);

    let report = aggregator(&sources)
        .fetch_and_aggregate(&ids(&["110101001", "110101002", "110102001", "110102002"]))
        .await;
    let buildings = report.buildings();
    assert_eq!(buildings.len(), 1);
    let building = &buildings[0];
    assert_eq!(building.floors.len(), 2);
    assert_eq!(building.device_count, 4);
    assert_eq!(building.online_count, 3);
    assert_eq!(building.total_flow, 12.0);
    assert_eq!(building.avg_flow, 4.0);
}

#[tokio::test]
async fn missing_pressure_and_temperature_stay_out_of_averages() {
    let sources = Arc::new(InMemorySources::new());
    sources.add_online_meter("110101001", 2.0, 0.4, 20.0);
    sources.set_status("110101002", "online");
    sources.set_reading("110101002", TelemetryField::Flow, 4.0);
    sources.add_online_meter("110102001", 6.0, 0.1, 10.0);

    let report = aggregator(&sources)
        .fetch_and_aggregate(&ids(&["110101001", "110101002", "110102001"]))
        .await;

    let floor = report
        .floors
        .get(&FloorKey::new(1, 1, 1))
        .expect("floor 1");
    assert_eq!(floor.online_count, 2);
    assert_eq!(floor.avg_flow, 3.0);
    assert_eq!(floor.pressure_samples, 1);
    assert_eq!(floor.temperature_samples, 1);
    assert!(approx(floor.avg_pressure, 0.4));
    assert!(approx(floor.avg_temperature, 20.0));

    let building = report.building(1, 1);
    assert_eq!(building.online_count, 3);
    assert!(approx(building.avg_flow, 4.0));
    assert!(approx(building.avg_pressure, 0.25));
    assert!(approx(building.avg_temperature, 15.0));
}

#[tokio::test]
async fn building_fetch_covers_every_meter_and_sensor() {
    let sources = Arc::new(InMemorySources::new());
    let aggregator = aggregator(&sources);
    let config = BuildingConfig::FALLBACK;

    let report = aggregator
        .fetch_building(2, 4, &config)
        .await
        .expect("building report");
    assert_eq!(report.malformed_count, 0);
    assert_eq!(report.summary.floors.len(), 6);
    assert_eq!(report.summary.device_count, 60);
    assert_eq!(report.summary.online_count, 0);
    assert!(
        report
            .summary
            .floors
            .iter()
            .all(|floor| floor.water_quality.is_some())
    );

    let err = aggregator
        .fetch_building(2, 7, &config)
        .await
        .expect_err("building outside config");
    assert!(matches!(err, AggregateError::UnknownBuilding { .. }));
}

#[tokio::test]
async fn simulator_probe_defaults_each_field() {
    let sources = Arc::new(InMemorySources::new());
    sources.set_simulator(
        Some(420),
        None,
        Some(TaskStatus {
            meter_running: false,
            sensor_running: true,
        }),
    );
    let snapshot = SimulatorProbe::new(sources.clone()).probe().await;
    assert_eq!(snapshot.device_count, 420);
    assert!(!snapshot.initialized);
    assert!(snapshot.sensor_running);
    assert!(snapshot.any_task_running());
}
