//! 上游数据源错误类型。

/// 上游请求失败。
///
/// 只表示“本次请求没有拿到结果”；响应体为空或不可解析不属于错误，
/// 由 [`crate::Fetched::Defaulted`] 表达。
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("upstream payload invalid: {0}")]
    Decode(String),

    #[error("upstream unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
