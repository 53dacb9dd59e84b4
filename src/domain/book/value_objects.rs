//! Book Context - Value Objects

use serde::{Deserialize, Serialize};

/// 单个章节的插图结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterIllustration {
    /// data URI 或 URL，生成失败时为空
    #[serde(default)]
    pub image: String,
    #[serde(default, alias = "image_prompt")]
    pub image_prompt: String,
}

impl ChapterIllustration {
    pub fn new(image: impl Into<String>, image_prompt: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            image_prompt: image_prompt.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.image.trim().is_empty()
    }
}
