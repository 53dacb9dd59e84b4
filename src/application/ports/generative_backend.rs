//! Generative Backend Port - 生成式 AI 后端抽象
//!
//! 文本简化、提示词提取、图片/视频生成、问答都通过此端口完成，
//! 具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// 生成错误
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing API credentials for the generative backend")]
    MissingCredentials,
}

/// 文本生成请求
#[derive(Debug, Clone)]
pub struct TextRequest {
    pub prompt: String,
    /// 要求后端以 JSON 格式返回
    pub json_output: bool,
}

impl TextRequest {
    pub fn plain(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            json_output: false,
        }
    }

    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            json_output: true,
        }
    }
}

/// Generative Backend Port
///
/// 外部生成式 AI 服务的抽象接口。实现不做重试。
#[async_trait]
pub trait GenerativeBackendPort: Send + Sync {
    /// 文本生成，返回去除首尾空白前的原始文本
    async fn generate_text(&self, request: TextRequest) -> Result<String, GenerationError>;

    /// 图片生成，返回 data URI 或 URL；后端未返回图片时为 None
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, GenerationError>;

    /// 视频生成，返回视频 URI；后端未返回视频时为 None
    async fn generate_video(&self, prompt: &str) -> Result<Option<String>, GenerationError>;

    /// 后端名称（用于日志和健康检查）
    fn name(&self) -> &'static str;

    /// 检查后端是否可用
    async fn health_check(&self) -> bool {
        true
    }
}
