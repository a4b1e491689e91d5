//! 设备编码 handlers
//!
//! - GET /api/devices/:device_id - 解析设备编码（不合法返回 400）

use crate::utils::response::{bad_request_error, device_fields_to_dto, ok};
use axum::{extract::Path, http::StatusCode, response::Response};

pub async fn decode_device(Path(device_id): Path<String>) -> Response {
    match domain::decode(&device_id) {
        Some(fields) => ok(StatusCode::OK, device_fields_to_dto(device_id, &fields)),
        None => bad_request_error(format!("malformed device id: {device_id}")),
    }
}
