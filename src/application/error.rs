//! 应用层错误定义
//!
//! 统一的命令错误类型，区分校验错误、后端错误与缺失配置

use thiserror::Error;

use crate::application::ports::{DocumentError, GenerationError};
use crate::domain::book::BookError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 生成式后端错误
    #[error("Backend error: {0}")]
    BackendError(String),

    /// 缺少外部配置（如 API 凭证）
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    /// 文档处理错误
    #[error("Document error: {0}")]
    DocumentError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建后端错误
    pub fn backend(message: impl Into<String>) -> Self {
        Self::BackendError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<GenerationError> for ApplicationError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::MissingCredentials => Self::MissingConfiguration(err.to_string()),
            other => Self::BackendError(other.to_string()),
        }
    }
}

impl From<DocumentError> for ApplicationError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::UnsupportedType(msg) => Self::ValidationError(msg),
            DocumentError::ReadError(_) => Self::ValidationError(err.to_string()),
            DocumentError::RenderError(_) => Self::DocumentError(err.to_string()),
        }
    }
}

impl From<BookError> for ApplicationError {
    fn from(err: BookError) -> Self {
        Self::ValidationError(err.to_string())
    }
}
