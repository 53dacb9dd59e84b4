//! Command Handlers

mod book_handlers;
mod chat_handlers;
mod steps;
mod story_handlers;

pub use book_handlers::{
    ConvertDocumentHandler, ConvertDocumentSettings, GenerateChapterIllustrationHandler,
    RenderDownloadableHandler, RenderedDocument,
};
pub use chat_handlers::AnswerQuestionHandler;
pub use story_handlers::ConvertSingleChapterHandler;
