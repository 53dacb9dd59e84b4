//! Response Normalisation
//!
//! 所有响应都可能携带 `{error}`，需先检查再解析。
//! 单章节转换存在两种响应形态，统一转换为 SingleStoryResult：
//! - `{originalText, simplifiedText, prompts: {imagePrompt, videoPrompt}, imageUrl, videoUrl}`
//! - `{simplifiedText, imagePrompt, image}`（兼容 snake_case）

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::error::ClientError;
use crate::domain::story::SingleStoryResult;

/// 响应中的 `error` 字段转为应用错误
pub fn check_error(value: &Value) -> Result<(), ClientError> {
    match value.get("error") {
        Some(Value::String(msg)) if !msg.trim().is_empty() => {
            Err(ClientError::Application(msg.clone()))
        }
        _ => Ok(()),
    }
}

/// 检查 `error` 后解析为目标类型
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    check_error(&value)?;
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct PromptsPayload {
    #[serde(default, rename = "imagePrompt", alias = "image_prompt")]
    image_prompt: Option<String>,
    #[serde(default, rename = "videoPrompt", alias = "video_prompt")]
    video_prompt: Option<String>,
}

/// `{originalText, simplifiedText, prompts, imageUrl, videoUrl}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FullStory {
    #[serde(default, alias = "original_text")]
    original_text: Option<String>,
    #[serde(alias = "simplified_text")]
    simplified_text: String,
    prompts: PromptsPayload,
    #[serde(default, alias = "image_url")]
    image_url: Option<String>,
    #[serde(default, alias = "video_url")]
    video_url: Option<String>,
}

/// `{simplifiedText, imagePrompt, image}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CompactStory {
    #[serde(alias = "simplified_text")]
    simplified_text: String,
    #[serde(default, alias = "image_prompt")]
    image_prompt: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

/// 单章节响应的两种形态，字段混用的响应两种都不匹配
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoryPayload {
    Full(FullStory),
    Compact(CompactStory),
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// 将任一已知形态的单章节响应统一为 SingleStoryResult
///
/// 紧凑形态不带原文和视频，原文使用提交的文本补齐
pub fn normalize_story(value: Value, submitted_text: &str) -> Result<SingleStoryResult, ClientError> {
    let payload: StoryPayload = decode(value)?;

    let story = match payload {
        StoryPayload::Full(FullStory {
            original_text,
            simplified_text,
            prompts,
            image_url,
            video_url,
        }) => SingleStoryResult {
            original_text: non_empty(original_text).unwrap_or_else(|| submitted_text.to_string()),
            simplified_text,
            image_prompt: non_empty(prompts.image_prompt).unwrap_or_default(),
            video_prompt: non_empty(prompts.video_prompt),
            image_url: non_empty(image_url).unwrap_or_default(),
            video_url: non_empty(video_url),
        },
        StoryPayload::Compact(CompactStory {
            simplified_text,
            image_prompt,
            image,
        }) => SingleStoryResult {
            original_text: submitted_text.to_string(),
            simplified_text,
            image_prompt: non_empty(image_prompt).unwrap_or_default(),
            video_prompt: None,
            image_url: non_empty(image).unwrap_or_default(),
            video_url: None,
        },
    };

    Ok(story)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_shape() {
        let story = normalize_story(
            json!({
                "originalText": "A cat sat.",
                "simplifiedText": "A cat sat down.",
                "prompts": {"imagePrompt": "a cat", "videoPrompt": "a cat moving"},
                "imageUrl": "data:image/png;base64,AAAA",
                "videoUrl": "https://v/1.mp4"
            }),
            "ignored",
        )
        .unwrap();

        assert_eq!(story.original_text, "A cat sat.");
        assert_eq!(story.image_prompt, "a cat");
        assert_eq!(story.video_prompt.as_deref(), Some("a cat moving"));
        assert_eq!(story.image_url, "data:image/png;base64,AAAA");
        assert!(story.has_video());
    }

    #[test]
    fn test_compact_shape() {
        let story = normalize_story(
            json!({"simplified_text": "A cat sat down.", "image_prompt": "a cat", "image": "data:x"}),
            "A cat sat.",
        )
        .unwrap();

        assert_eq!(story.original_text, "A cat sat.");
        assert_eq!(story.simplified_text, "A cat sat down.");
        assert_eq!(story.image_prompt, "a cat");
        assert_eq!(story.image_url, "data:x");
        assert!(story.video_prompt.is_none());
        assert!(!story.has_video());
    }

    #[test]
    fn test_error_field_wins() {
        let result = normalize_story(json!({"error": "Text cannot be empty", "kind": "validation"}), "");
        assert!(matches!(result, Err(ClientError::Application(msg)) if msg == "Text cannot be empty"));
    }

    #[test]
    fn test_unknown_shape_is_decode_error() {
        let result = normalize_story(json!({"story": "?"}), "");
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_mixed_shape_is_rejected() {
        let result = normalize_story(
            json!({"simplifiedText": "x", "prompts": {"imagePrompt": "p"}, "image": "data:x"}),
            "x",
        );
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_empty_video_url_is_absent() {
        let story = normalize_story(
            json!({"simplifiedText": "x", "prompts": {"imagePrompt": "p"}, "imageUrl": "", "videoUrl": ""}),
            "x",
        )
        .unwrap();
        assert!(story.video_url.is_none());
        assert!(!story.has_image());
    }
}
