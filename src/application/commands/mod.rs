//! Commands - 每个命令对应 Orchestrator 的一个操作

mod book_commands;
mod chat_commands;
pub mod handlers;
mod story_commands;

pub use book_commands::{ConvertDocument, GenerateChapterIllustration, RenderDownloadable};
pub use chat_commands::AnswerQuestion;
pub use story_commands::ConvertSingleChapter;
