//! Story Command Handlers

use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::steps::simplify_text;
use crate::application::commands::ConvertSingleChapter;
use crate::application::error::ApplicationError;
use crate::application::ports::{GenerativeBackendPort, TextRequest};
use crate::application::prompts;
use crate::domain::story::{MediaPrompts, SingleStoryResult};
use crate::domain::strip_code_fences;

/// 提示词提取的 JSON 回复
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptsReply {
    #[serde(alias = "image_prompt")]
    image_prompt: String,
    #[serde(default, alias = "video_prompt")]
    video_prompt: Option<String>,
}

/// 解析提示词回复
///
/// 回复不是合法 JSON 时，整段文本作为插图提示词，且没有视频提示词
pub(crate) fn parse_media_prompts(reply: &str) -> Result<MediaPrompts, ApplicationError> {
    let cleaned = strip_code_fences(reply);

    let prompts = match serde_json::from_str::<PromptsReply>(&cleaned) {
        Ok(parsed) => MediaPrompts {
            image_prompt: parsed.image_prompt.trim().to_string(),
            video_prompt: parsed
                .video_prompt
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        },
        Err(e) => {
            tracing::debug!(error = %e, "Prompt reply is not JSON, using it as image prompt");
            MediaPrompts {
                image_prompt: cleaned,
                video_prompt: None,
            }
        }
    };

    if prompts.image_prompt.is_empty() {
        return Err(ApplicationError::backend(
            "Prompt extraction returned no image prompt",
        ));
    }
    Ok(prompts)
}

/// ConvertSingleChapter Handler
pub struct ConvertSingleChapterHandler {
    backend: Arc<dyn GenerativeBackendPort>,
    video_enabled: bool,
}

impl ConvertSingleChapterHandler {
    pub fn new(backend: Arc<dyn GenerativeBackendPort>, video_enabled: bool) -> Self {
        Self {
            backend,
            video_enabled,
        }
    }

    pub async fn handle(
        &self,
        command: ConvertSingleChapter,
    ) -> Result<SingleStoryResult, ApplicationError> {
        let original_text = command.text.trim().to_string();
        if original_text.is_empty() {
            return Err(ApplicationError::validation("Text cannot be empty"));
        }

        let job_id = Uuid::new_v4();
        tracing::info!(
            job_id = %job_id,
            text_len = original_text.len(),
            backend = self.backend.name(),
            "Converting single chapter"
        );

        // Step 1: 简化
        let simplified_text = simplify_text(self.backend.as_ref(), &original_text).await?;

        // Step 2: 提取提示词
        let reply = self
            .backend
            .generate_text(TextRequest::json(prompts::media_prompts(&simplified_text)))
            .await?;
        let prompts = parse_media_prompts(&reply)?;

        // Step 3: 图片与视频并发生成，两者都结束后才返回
        let video_prompt = if self.video_enabled {
            prompts.video_prompt.clone()
        } else {
            None
        };

        let image_future = self.backend.generate_image(&prompts.image_prompt);
        let video_future = async {
            match video_prompt.as_deref() {
                Some(prompt) => self.backend.generate_video(prompt).await,
                None => Ok(None),
            }
        };
        let (image, video) = tokio::join!(image_future, video_future);

        let image_url = match image {
            Ok(url) => url.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Image generation failed, leaving it empty");
                String::new()
            }
        };

        let video_url = video_prompt.as_ref().map(|_| match video {
            Ok(url) => url.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Video generation failed, leaving it empty");
                String::new()
            }
        });

        tracing::info!(
            job_id = %job_id,
            has_image = !image_url.is_empty(),
            has_video = video_url.as_deref().map(|v| !v.is_empty()).unwrap_or(false),
            "Single chapter converted"
        );

        Ok(SingleStoryResult {
            original_text,
            simplified_text,
            image_prompt: prompts.image_prompt,
            video_prompt,
            image_url,
            video_url,
        })
    }
}
