//! Document Ports - 文档读取与渲染
//!
//! PDF 文本抽取和 PDF 生成都是同步、CPU 密集的操作，
//! 调用方负责放到阻塞线程中执行

use thiserror::Error;

use crate::domain::book::Book;

/// 文档处理错误
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported document type: {0}")]
    UnsupportedType(String),

    #[error("Error reading document: {0}")]
    ReadError(String),

    #[error("Error rendering document: {0}")]
    RenderError(String),
}

/// 文档读取端口
pub trait DocumentReaderPort: Send + Sync {
    /// 该读取器接受的 MIME 类型
    fn mime_type(&self) -> &'static str;

    /// 该读取器接受的文件扩展名（小写，不含点）
    fn extension(&self) -> &'static str;

    /// 抽取文档全文
    fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError>;
}

/// 文档渲染端口
pub trait DocumentRendererPort: Send + Sync {
    /// 输出的 MIME 类型
    fn mime_type(&self) -> &'static str;

    /// 输出的文件扩展名
    fn extension(&self) -> &'static str;

    /// 渲染整本书，输出文件字节
    fn render(&self, book: &Book) -> Result<Vec<u8>, DocumentError>;
}
