//! 设备编码（9 位定长数字串）的编码与解析。
//!
//! 编码格式（无分隔符，从左到右）：
//!
//! | 字段 | 宽度 | 取值 |
//! |---|---|---|
//! | 设备类型 | 1 | 1 = 水表，2 = 水质传感器 |
//! | 校区号 | 1 | 1..=3 |
//! | 楼栋号 | 2 | 01..=99 |
//! | 楼层号 | 2 | 01..=99 |
//! | 单元号 | 3 | 001..=999（传感器固定 001） |

use std::fmt;

/// 设备编码总长度。
pub const DEVICE_ID_LEN: usize = 9;

/// 水质传感器固定使用的单元号。
pub const SENSOR_UNIT_NO: u16 = 1;

/// 设备类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceType {
    /// 水表（每个单元一个）
    Meter,
    /// 水质传感器（每层一个）
    QualitySensor,
}

impl DeviceType {
    /// 编码中的类型位。
    pub fn digit(self) -> u8 {
        match self {
            DeviceType::Meter => 1,
            DeviceType::QualitySensor => 2,
        }
    }

    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(DeviceType::Meter),
            2 => Some(DeviceType::QualitySensor),
            _ => None,
        }
    }
}

/// 编码中的字段名（用于越界错误）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceField {
    Campus,
    Building,
    Floor,
    Unit,
}

impl fmt::Display for DeviceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceField::Campus => "campusNo",
            DeviceField::Building => "buildingNo",
            DeviceField::Floor => "floorNo",
            DeviceField::Unit => "unitNo",
        };
        f.write_str(name)
    }
}

/// 编码错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("{field} out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        field: DeviceField,
        value: u32,
        min: u32,
        max: u32,
    },
}

/// 解析后的设备编码字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceFields {
    pub device_type: DeviceType,
    pub campus_no: u8,
    pub building_no: u8,
    pub floor_no: u8,
    pub unit_no: u16,
}

impl DeviceFields {
    /// 按字段重新编码。
    pub fn encode(&self) -> Result<String, CodecError> {
        encode(
            self.device_type,
            self.campus_no,
            self.building_no,
            self.floor_no,
            self.unit_no,
        )
    }

    pub fn is_meter(&self) -> bool {
        self.device_type == DeviceType::Meter
    }

    pub fn is_quality_sensor(&self) -> bool {
        self.device_type == DeviceType::QualitySensor
    }
}

/// 生成设备编码。
///
/// 任一字段越界即返回 [`CodecError::OutOfRange`]，不做截断。
/// 水质传感器的单元号强制为 `001`，传入的 `unit_no` 被忽略。
pub fn encode(
    device_type: DeviceType,
    campus_no: u8,
    building_no: u8,
    floor_no: u8,
    unit_no: u16,
) -> Result<String, CodecError> {
    check_range(DeviceField::Campus, campus_no as u32, 1, 3)?;
    check_range(DeviceField::Building, building_no as u32, 1, 99)?;
    check_range(DeviceField::Floor, floor_no as u32, 1, 99)?;
    let unit_no = match device_type {
        DeviceType::Meter => {
            check_range(DeviceField::Unit, unit_no as u32, 1, 999)?;
            unit_no
        }
        DeviceType::QualitySensor => SENSOR_UNIT_NO,
    };
    Ok(format!(
        "{}{}{:02}{:02}{:03}",
        device_type.digit(),
        campus_no,
        building_no,
        floor_no,
        unit_no
    ))
}

/// 生成水表编码。
pub fn encode_meter(
    campus_no: u8,
    building_no: u8,
    floor_no: u8,
    unit_no: u16,
) -> Result<String, CodecError> {
    encode(DeviceType::Meter, campus_no, building_no, floor_no, unit_no)
}

/// 生成水质传感器编码（单元号固定 001）。
pub fn encode_quality_sensor(
    campus_no: u8,
    building_no: u8,
    floor_no: u8,
) -> Result<String, CodecError> {
    encode(
        DeviceType::QualitySensor,
        campus_no,
        building_no,
        floor_no,
        SENSOR_UNIT_NO,
    )
}

/// 解析设备编码。
///
/// 单次遍历、无分配；形状或任一字段不合法时返回 `None`。
pub fn decode(id: &str) -> Option<DeviceFields> {
    let bytes = id.as_bytes();
    if bytes.len() != DEVICE_ID_LEN {
        return None;
    }
    let mut digits = [0u8; DEVICE_ID_LEN];
    for (slot, byte) in digits.iter_mut().zip(bytes) {
        if !byte.is_ascii_digit() {
            return None;
        }
        *slot = byte - b'0';
    }

    let device_type = DeviceType::from_digit(digits[0])?;
    let campus_no = digits[1];
    if !(1..=3).contains(&campus_no) {
        return None;
    }
    let building_no = digits[2] * 10 + digits[3];
    let floor_no = digits[4] * 10 + digits[5];
    let unit_no = digits[6] as u16 * 100 + digits[7] as u16 * 10 + digits[8] as u16;
    if building_no == 0 || floor_no == 0 || unit_no == 0 {
        return None;
    }

    Some(DeviceFields {
        device_type,
        campus_no,
        building_no,
        floor_no,
        unit_no,
    })
}

/// 校验设备编码是否合法。
pub fn is_valid(id: &str) -> bool {
    decode(id).is_some()
}

fn check_range(field: DeviceField, value: u32, min: u32, max: u32) -> Result<(), CodecError> {
    if value < min || value > max {
        return Err(CodecError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
