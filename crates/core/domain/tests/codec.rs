use domain::{CodecError, DeviceField, DeviceType, decode, encode, encode_meter, encode_quality_sensor};

#[test]
fn encode_pads_fixed_width_fields() {
    let id = encode_meter(2, 5, 3, 7).expect("encode");
    assert_eq!(id, "120503007");
    assert_eq!(id.len(), 9);
}

#[test]
fn encode_quality_sensor_forces_unit_001() {
    let id = encode(DeviceType::QualitySensor, 3, 12, 4, 456).expect("encode");
    assert_eq!(id, "231204001");
    assert_eq!(encode_quality_sensor(3, 12, 4).expect("encode"), id);
}

#[test]
fn encode_rejects_out_of_range_fields_by_name() {
    let err = encode_meter(4, 1, 1, 1).expect_err("campus");
    assert!(matches!(
        err,
        CodecError::OutOfRange {
            field: DeviceField::Campus,
            value: 4,
            ..
        }
    ));

    let err = encode_meter(1, 100, 1, 1).expect_err("building");
    assert!(matches!(err, CodecError::OutOfRange { field: DeviceField::Building, .. }));

    let err = encode_meter(1, 1, 0, 1).expect_err("floor");
    assert!(matches!(err, CodecError::OutOfRange { field: DeviceField::Floor, .. }));

    let err = encode_meter(1, 1, 1, 1000).expect_err("unit");
    assert_eq!(err.to_string(), "unitNo out of range: 1000 (expected 1..=999)");
}

#[test]
fn sensor_ignores_unit_out_of_meter_range() {
    assert!(encode(DeviceType::QualitySensor, 1, 1, 1, 0).is_ok());
}

#[test]
fn decode_reproduces_encoded_fields() {
    for campus_no in 1..=3u8 {
        for building_no in 1..=99u8 {
            for floor_no in [1u8, 9, 10, 42, 99] {
                for unit_no in [1u16, 9, 10, 99, 100, 512, 999] {
                    let id = encode_meter(campus_no, building_no, floor_no, unit_no).expect("encode");
                    let fields = decode(&id).expect("decode");
                    assert_eq!(fields.device_type, DeviceType::Meter);
                    assert_eq!(fields.campus_no, campus_no);
                    assert_eq!(fields.building_no, building_no);
                    assert_eq!(fields.floor_no, floor_no);
                    assert_eq!(fields.unit_no, unit_no);
                    assert_eq!(fields.encode().expect("re-encode"), id);
                }
            }
            let sensor = encode_quality_sensor(campus_no, building_no, 7).expect("encode");
            let fields = decode(&sensor).expect("decode sensor");
            assert!(fields.is_quality_sensor());
            assert_eq!(fields.unit_no, 1);
        }
    }
}

#[test]
fn decode_rejects_malformed_ids() {
    assert!(decode("12345").is_none());
    assert!(decode("999999999").is_none());
    assert!(decode("1a0010001").is_none());
    assert!(decode("").is_none());
    assert!(decode("1101010010").is_none());
    // 设备类型 / 校区越界
    assert!(decode("310101001").is_none());
    assert!(decode("140101001").is_none());
    // 零值字段
    assert!(decode("110001001").is_none());
    assert!(decode("110100001").is_none());
    assert!(decode("110101000").is_none());
    // 符号与空白不做宽松解析
    assert!(decode("+11010100").is_none());
    assert!(decode(" 11010100").is_none());
    // 多字节字符长度不为 9 字节
    assert!(decode("１10101001").is_none());
}
