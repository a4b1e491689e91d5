//! 校园供水计量领域模型：设备编码、楼宇拓扑、遥测读数与汇总。

pub mod device;
pub mod summary;
pub mod telemetry;
pub mod topology;

pub use device::{
    CodecError, DeviceField, DeviceFields, DeviceType, decode, encode, encode_meter,
    encode_quality_sensor, is_valid,
};
pub use summary::{BuildingSummary, FloorKey, FloorSummary};
pub use telemetry::{DeviceStatus, DeviceTelemetry, MeterReading, QualityReading};
pub use topology::{
    BuildingConfig, BuildingInfo, BuildingType, Campus, InvalidBuildingConfig, campus_name,
};
