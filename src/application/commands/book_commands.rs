//! Book Commands

use crate::domain::book::Book;

/// 文档转换命令（上传的 PDF → Book）
#[derive(Debug, Clone)]
pub struct ConvertDocument {
    /// 上传时的文件名
    pub file_name: Option<String>,
    /// 上传时声明的 Content-Type
    pub content_type: Option<String>,
    /// 用户指定的书名，缺省时使用文件名
    pub title: Option<String>,
    pub bytes: Vec<u8>,
}

/// 章节插图生成命令（每次调用都重新生成）
#[derive(Debug, Clone)]
pub struct GenerateChapterIllustration {
    pub chapter_number: u32,
    pub simplified_text: String,
}

/// 导出命令：补齐缺失插图后渲染为可下载文档
#[derive(Debug, Clone)]
pub struct RenderDownloadable {
    pub book: Book,
}
