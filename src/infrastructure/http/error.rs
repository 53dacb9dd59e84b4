//! HTTP Error Handling
//!
//! 应用层错误统一以 HTTP 200 + 错误体返回，调用方需检查 `error` 字段

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

impl ErrorResponse {
    pub fn new(kind: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: kind.to_string(),
        }
    }
}

/// 错误类别
pub mod kind {
    pub const VALIDATION: &str = "validation";
    pub const BACKEND: &str = "backend";
    pub const CONFIGURATION: &str = "configuration";
    pub const INTERNAL: &str = "internal";
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Backend(String),
    Configuration(String),
    Internal(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => kind::VALIDATION,
            ApiError::Backend(_) => kind::BACKEND,
            ApiError::Configuration(_) => kind::CONFIGURATION,
            ApiError::Internal(_) => kind::INTERNAL,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Backend(msg)
            | ApiError::Configuration(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(kind = kind::VALIDATION, error = %msg, "Bad request");
            }
            ApiError::Backend(msg) => {
                tracing::error!(kind = kind::BACKEND, error = %msg, "Generative backend failed");
            }
            ApiError::Configuration(msg) => {
                tracing::error!(kind = kind::CONFIGURATION, error = %msg, "Missing configuration");
            }
            ApiError::Internal(msg) => {
                tracing::error!(kind = kind::INTERNAL, error = %msg, "Internal server error");
            }
        }

        let body = ErrorResponse::new(self.kind(), self.message());
        (StatusCode::OK, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::BackendError(msg) => ApiError::Backend(msg),
            ApplicationError::MissingConfiguration(msg) => ApiError::Configuration(msg),
            ApplicationError::DocumentError(msg) => ApiError::Internal(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_errors_are_http_200_with_kind() {
        let response = ApiError::from(ApplicationError::backend("quota exceeded")).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.kind, "backend");
        assert_eq!(body.error, "quota exceeded");
    }

    #[test]
    fn test_application_error_mapping() {
        let cases = [
            (ApplicationError::validation("x"), kind::VALIDATION),
            (ApplicationError::MissingConfiguration("x".into()), kind::CONFIGURATION),
            (ApplicationError::DocumentError("x".into()), kind::INTERNAL),
            (ApplicationError::internal("x"), kind::INTERNAL),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).kind(), expected);
        }
    }
}
