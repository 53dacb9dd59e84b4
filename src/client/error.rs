//! Client Errors
//!
//! 传输/后端错误向用户统一展示为重试提示，应用层错误原样透传

use thiserror::Error;

/// 传输或后端失败时展示给用户的提示
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong! Please try again.";

/// 客户端错误
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// 响应体中的 `error` 字段
    #[error("{0}")]
    Application(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// 面向用户的错误文本
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Application(msg) => msg.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ClientError::Status(status.as_u16())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}
