//! Domain Layer - 领域层
//!
//! 包含三个上下文:
//! - Book Context: 章节与整本书（PDF 转换结果）
//! - Story Context: 单章节转换结果
//! - Chat Context: 关于书籍的问答记录
//!
//! 以及共享的纯函数：章节切分、文本清理、下载文件名

pub mod book;
pub mod chat;
pub mod story;

mod chapter_splitter;
mod filename;
mod text_cleanup;

pub use chapter_splitter::{split_into_chapters, RawChapter, SplitConfig};
pub use filename::download_filename;
pub use text_cleanup::{
    normalize_title, paragraphs, strip_code_fences, strip_preamble, truncate_chars,
};
