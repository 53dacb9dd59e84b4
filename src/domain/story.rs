//! Story Context - 单章节转换结果

use serde::{Deserialize, Serialize};

/// 从简化文本中提取的媒体提示词
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPrompts {
    pub image_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_prompt: Option<String>,
}

/// 单章节转换结果
///
/// image_url / video_url 相互独立：一个为空不影响另一个
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleStoryResult {
    pub original_text: String,
    pub simplified_text: String,
    pub image_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_prompt: Option<String>,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl SingleStoryResult {
    pub fn has_image(&self) -> bool {
        !self.image_url.trim().is_empty()
    }

    pub fn has_video(&self) -> bool {
        self.video_url
            .as_deref()
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }
}
