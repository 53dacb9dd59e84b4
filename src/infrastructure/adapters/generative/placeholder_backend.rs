//! Placeholder Backend - 未配置 API Key 时使用的后端
//!
//! 改写原样回显，提示词与媒体返回固定占位内容；
//! 不提供内容时所有调用都返回 MissingCredentials

use async_trait::async_trait;
use serde_json::json;

use crate::application::ports::{GenerationError, GenerativeBackendPort, TextRequest};
use crate::application::prompts;

/// Placeholder Backend 配置
#[derive(Debug, Clone)]
pub struct PlaceholderBackendConfig {
    /// 是否返回占位内容；false 时拒绝所有调用
    pub serve_placeholders: bool,
    /// 固定插图提示词
    pub image_prompt: String,
    /// 固定视频提示词
    pub video_prompt: String,
    /// 占位图片 URL
    pub image_url: String,
    /// 占位视频 URL
    pub video_url: String,
}

impl Default for PlaceholderBackendConfig {
    fn default() -> Self {
        Self {
            serve_placeholders: true,
            image_prompt: "A cute story illustration".to_string(),
            video_prompt: "Fun animation for kids".to_string(),
            image_url: "https://placehold.co/800x600?text=No+API+Key".to_string(),
            video_url: "https://placehold.co/800x600?text=No+Video+Key".to_string(),
        }
    }
}

/// Placeholder Backend
pub struct PlaceholderBackend {
    config: PlaceholderBackendConfig,
}

impl PlaceholderBackend {
    pub fn new(config: PlaceholderBackendConfig) -> Self {
        tracing::info!(
            serve_placeholders = config.serve_placeholders,
            "PlaceholderBackend initialized"
        );
        Self { config }
    }

    /// 返回占位内容
    pub fn with_defaults() -> Self {
        Self::new(PlaceholderBackendConfig::default())
    }

    /// 拒绝所有生成调用
    pub fn refusing() -> Self {
        Self::new(PlaceholderBackendConfig {
            serve_placeholders: false,
            ..Default::default()
        })
    }

    fn ensure_serving(&self) -> Result<(), GenerationError> {
        if self.config.serve_placeholders {
            Ok(())
        } else {
            Err(GenerationError::MissingCredentials)
        }
    }
}

#[async_trait]
impl GenerativeBackendPort for PlaceholderBackend {
    async fn generate_text(&self, request: TextRequest) -> Result<String, GenerationError> {
        self.ensure_serving()?;

        if request.json_output {
            let prompts = json!({
                "imagePrompt": self.config.image_prompt,
                "videoPrompt": self.config.video_prompt,
            });
            return Ok(prompts.to_string());
        }

        if let Some(source) = prompts::simplify_source(&request.prompt) {
            tracing::debug!(text_len = source.len(), "PlaceholderBackend: echoing source text");
            return Ok(source.to_string());
        }

        if prompts::is_image_prompt_request(&request.prompt) {
            return Ok(self.config.image_prompt.clone());
        }

        // 标题、问答等没有合理的占位回答
        Err(GenerationError::MissingCredentials)
    }

    async fn generate_image(&self, _prompt: &str) -> Result<Option<String>, GenerationError> {
        self.ensure_serving()?;
        Ok(Some(self.config.image_url.clone()))
    }

    async fn generate_video(&self, _prompt: &str) -> Result<Option<String>, GenerationError> {
        self.ensure_serving()?;
        Ok(Some(self.config.video_url.clone()))
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simplify_echoes_source() {
        let backend = PlaceholderBackend::with_defaults();
        let reply = backend
            .generate_text(TextRequest::plain(prompts::simplify("The fox ran.")))
            .await
            .unwrap();
        assert_eq!(reply, "The fox ran.");
    }

    #[tokio::test]
    async fn test_media_prompts_are_fixed() {
        let backend = PlaceholderBackend::with_defaults();
        let reply = backend
            .generate_text(TextRequest::json(prompts::media_prompts("x")))
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["imagePrompt"], "A cute story illustration");
        assert_eq!(value["videoPrompt"], "Fun animation for kids");

        let image_prompt = backend
            .generate_text(TextRequest::plain(prompts::image_prompt("x")))
            .await
            .unwrap();
        assert_eq!(image_prompt, "A cute story illustration");
    }

    #[tokio::test]
    async fn test_media_are_placeholder_urls() {
        let backend = PlaceholderBackend::with_defaults();
        assert_eq!(
            backend.generate_image("x").await.unwrap().as_deref(),
            Some("https://placehold.co/800x600?text=No+API+Key")
        );
        assert_eq!(
            backend.generate_video("x").await.unwrap().as_deref(),
            Some("https://placehold.co/800x600?text=No+Video+Key")
        );
    }

    #[tokio::test]
    async fn test_questions_need_credentials() {
        let backend = PlaceholderBackend::with_defaults();
        let result = backend
            .generate_text(TextRequest::plain(prompts::answer_question("T", "ctx", "Why?")))
            .await;
        assert!(matches!(result, Err(GenerationError::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_refusing_backend_rejects_everything() {
        let backend = PlaceholderBackend::refusing();
        assert!(matches!(
            backend.generate_image("x").await,
            Err(GenerationError::MissingCredentials)
        ));
        assert!(matches!(
            backend
                .generate_text(TextRequest::plain(prompts::simplify("x")))
                .await,
            Err(GenerationError::MissingCredentials)
        ));
    }
}
