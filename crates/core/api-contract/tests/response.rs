use api_contract::ApiResponse;

#[test]
fn api_response_success() {
    let response = ApiResponse::success(vec![1u8, 2, 3]);
    assert!(response.success);
    assert_eq!(response.data.as_deref(), Some(&[1u8, 2, 3][..]));
    assert!(response.error.is_none());
}

#[test]
fn api_response_error() {
    let response = ApiResponse::<()>::error("DEVICE.INVALID_ID", "malformed device id");
    assert!(!response.success);
    assert!(response.data.is_none());
    let error = response.error.expect("error body");
    assert_eq!(error.code, "DEVICE.INVALID_ID");
}
