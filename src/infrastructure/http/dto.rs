//! Data Transfer Objects
//!
//! 所有线上记录统一使用 camelCase

use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::book::{Book, ChapterResult};
use crate::domain::story::SingleStoryResult;

// ============================================================================
// Story DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ConvertStoryRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPrompts {
    pub image_prompt: String,
    pub video_prompt: Option<String>,
}

/// 单章节转换响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryResponse {
    pub original_text: String,
    pub simplified_text: String,
    pub prompts: StoryPrompts,
    pub image_url: String,
    pub video_url: Option<String>,
}

impl From<SingleStoryResult> for StoryResponse {
    fn from(result: SingleStoryResult) -> Self {
        Self {
            original_text: result.original_text,
            simplified_text: result.simplified_text,
            prompts: StoryPrompts {
                image_prompt: result.image_prompt,
                video_prompt: result.video_prompt,
            },
            image_url: result.image_url,
            video_url: result.video_url,
        }
    }
}

// ============================================================================
// Book DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IllustrateRequest {
    pub chapter_number: u32,
    #[serde(default)]
    pub simplified_text: String,
}

/// 下载请求中的书籍
///
/// 先按原始结构解析，再由 Book 校验，违反不变量时返回校验错误而不是 422
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: String,
    #[serde(alias = "total_chapters")]
    pub total_chapters: usize,
    pub chapters: Vec<ChapterResult>,
}

impl BookPayload {
    pub fn into_book(self) -> Result<Book, ApplicationError> {
        Ok(Book::from_parts(self.title, self.total_chapters, self.chapters)?)
    }
}

// ============================================================================
// Chat DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub book_context: String,
    #[serde(default)]
    pub book_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn answered(response: String) -> Self {
        Self {
            success: true,
            response,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            response: String::new(),
            error: Some(error.into()),
        }
    }
}

// ============================================================================
// Ping
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub status: String,
    pub version: String,
    pub backend: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_story_response_shape() {
        let response = StoryResponse::from(SingleStoryResult {
            original_text: "orig".to_string(),
            simplified_text: "simple".to_string(),
            image_prompt: "a cat".to_string(),
            video_prompt: None,
            image_url: "img".to_string(),
            video_url: None,
        });

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["originalText"], "orig");
        assert_eq!(value["prompts"]["imagePrompt"], "a cat");
        assert!(value["prompts"]["videoPrompt"].is_null());
        assert_eq!(value["imageUrl"], "img");
    }

    #[test]
    fn test_book_payload_validation() {
        let payload: BookPayload = serde_json::from_value(json!({
            "title": "Heidi",
            "totalChapters": 2,
            "chapters": [{"chapterNumber": 1, "title": "A", "simplifiedText": "x"}]
        }))
        .unwrap();

        assert!(matches!(
            payload.into_book(),
            Err(ApplicationError::ValidationError(_))
        ));
    }

    #[test]
    fn test_chat_response_omits_error_on_success() {
        let value = serde_json::to_value(ChatResponse::answered("hi".to_string())).unwrap();
        assert_eq!(value, json!({"success": true, "response": "hi"}));

        let value = serde_json::to_value(ChatResponse::failed("boom")).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "boom");
    }
}
