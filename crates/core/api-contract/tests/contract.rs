use api_contract::{
    BuildingConfigPayload, BuildingDto, FloorSummaryDto, SelectBuildingRequest, TaskStatusPayload,
    UpstreamEnvelope,
};
use serde_json::Value;

#[test]
fn building_dto_is_camel_case_with_type_key() {
    let dto = BuildingDto {
        id: "education-2-1".to_string(),
        building_type: "education".to_string(),
        name: "龙子湖校区教学楼1号".to_string(),
        building_no: 1,
    };
    let value = serde_json::to_value(dto).expect("serialize");
    assert_eq!(value.get("type"), Some(&Value::from("education")));
    assert!(value.get("buildingNo").is_some());
    assert!(value.get("building_type").is_none());
}

#[test]
fn floor_without_sensor_serializes_null_water_quality() {
    let dto = FloorSummaryDto {
        floor: 3,
        device_count: 4,
        online_count: 2,
        offline_count: 2,
        total_flow: 6.0,
        avg_flow: 3.0,
        avg_pressure: 0.0,
        avg_temperature: 0.0,
        water_quality: None,
    };
    let value = serde_json::to_value(dto).expect("serialize");
    assert_eq!(value.get("waterQuality"), Some(&Value::Null));
    assert_eq!(value.get("avgFlow"), Some(&Value::from(3.0)));
}

#[test]
fn building_config_payload_tolerates_missing_fields() {
    let payload: BuildingConfigPayload =
        serde_json::from_str(r#"{"educationStart":2,"totalBuildings":8}"#).expect("parse");
    assert_eq!(payload.education_start, Some(2));
    assert_eq!(payload.total_buildings, Some(8));
    assert!(payload.floors.is_none());
}

#[test]
fn upstream_envelope_accepts_string_and_numeric_codes() {
    let envelope: UpstreamEnvelope<f64> =
        serde_json::from_str(r#"{"code":"00000","message":"ok","data":1.5}"#).expect("parse");
    assert_eq!(envelope.data, Some(1.5));

    let envelope: UpstreamEnvelope<TaskStatusPayload> =
        serde_json::from_str(r#"{"code":200,"msg":"success","data":{"meterRunning":true}}"#)
            .expect("parse");
    assert_eq!(envelope.message.as_deref(), Some("success"));
    let data = envelope.data.expect("data");
    assert!(data.meter_running);
    assert!(!data.sensor_running);
}

#[test]
fn select_request_accepts_short_aliases() {
    let req: SelectBuildingRequest =
        serde_json::from_str(r#"{"campus":2,"building":5}"#).expect("parse");
    assert_eq!(req.campus_no, 2);
    assert_eq!(req.building_no, 5);
}
