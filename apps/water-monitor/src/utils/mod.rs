//! 响应构造与输入验证。

pub mod response;
pub mod validation;
