//! Book Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    #[error("章节数量不一致: 声明 {declared}, 实际 {actual}")]
    ChapterCountMismatch { declared: usize, actual: usize },

    #[error("章节编号必须从 1 开始且严格递增: 位置 {position} 的编号为 {number}")]
    InvalidChapterNumber { position: usize, number: u32 },

    #[error("无效的标题: {0}")]
    InvalidTitle(String),
}
