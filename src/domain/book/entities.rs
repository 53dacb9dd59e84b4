//! Book Context - Entities

use serde::{Deserialize, Serialize};

use super::ChapterIllustration;

/// 章节转换结果
///
/// 不变量:
/// - chapter_number >= 1（由 Book 聚合校验顺序）
/// - 创建后不可变；补充插图时产生新值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterResult {
    #[serde(alias = "chapter_number")]
    chapter_number: u32,
    title: String,
    #[serde(alias = "simplified_text")]
    simplified_text: String,
    /// 插图引用（data URI 或 URL），可能为空
    #[serde(default)]
    image: String,
    #[serde(default, alias = "image_prompt")]
    image_prompt: String,
}

impl ChapterResult {
    pub fn new(chapter_number: u32, title: impl Into<String>, simplified_text: impl Into<String>) -> Self {
        Self {
            chapter_number,
            title: title.into(),
            simplified_text: simplified_text.into(),
            image: String::new(),
            image_prompt: String::new(),
        }
    }

    /// 返回带插图的新章节
    pub fn with_illustration(self, illustration: ChapterIllustration) -> Self {
        Self {
            image: illustration.image,
            image_prompt: illustration.image_prompt,
            ..self
        }
    }

    pub fn chapter_number(&self) -> u32 {
        self.chapter_number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn simplified_text(&self) -> &str {
        &self.simplified_text
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn image_prompt(&self) -> &str {
        &self.image_prompt
    }

    pub fn has_image(&self) -> bool {
        !self.image.trim().is_empty()
    }
}
