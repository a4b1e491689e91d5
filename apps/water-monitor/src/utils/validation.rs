//! 输入验证辅助函数
//!
//! - parse_campus：解析路径中的校区号
//! - require_known_campus：校区号必须在校区目录中
//! - require_building：楼号必须在当前配置的楼栋范围内
//!
//! 失败返回 bad_request_error 响应

use crate::utils::response::bad_request_error;
use axum::response::Response;
use domain::{BuildingConfig, Campus};

/// 解析路径中的校区号（任意 0..=255 的数字；未知校区按 `未知` 展示）
pub fn parse_campus(raw: &str) -> Result<u8, Response> {
    raw.trim()
        .parse::<u8>()
        .map_err(|_| bad_request_error(format!("invalid campusNo: {raw}")))
}

/// 校区号必须是已知校区（可用于设备编码）
pub fn require_known_campus(campus_no: u8) -> Result<Campus, Response> {
    Campus::from_no(campus_no)
        .ok_or_else(|| bad_request_error(format!("unknown campusNo: {campus_no}")))
}

/// 楼号必须在 `1..=total_buildings` 内
pub fn require_building(building_no: u8, config: &BuildingConfig) -> Result<u8, Response> {
    if building_no == 0 || building_no as u32 > config.total_buildings {
        return Err(bad_request_error(format!(
            "buildingNo out of range: {building_no} (expected 1..={})",
            config.total_buildings
        )));
    }
    Ok(building_no)
}
