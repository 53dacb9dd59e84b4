//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（GenerativeBackend、DocumentReader、DocumentRenderer）
//! - commands: Orchestrator 的各个操作及处理器
//! - prompts: 生成式后端提示词
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod prompts;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use commands::{
    AnswerQuestion, ConvertDocument, ConvertSingleChapter, GenerateChapterIllustration,
    RenderDownloadable,
    // Handlers
    handlers::{
        AnswerQuestionHandler, ConvertDocumentHandler, ConvertDocumentSettings,
        ConvertSingleChapterHandler, GenerateChapterIllustrationHandler,
        RenderDownloadableHandler, RenderedDocument,
    },
};

pub use error::ApplicationError;

pub use ports::{
    DocumentError, DocumentReaderPort, DocumentRendererPort, GenerationError,
    GenerativeBackendPort, TextRequest,
};
