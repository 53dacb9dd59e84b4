//! Presentation Client - 展示层客户端
//!
//! 包含：
//! - api: Orchestrator HTTP 客户端
//! - normalize: 响应结构归一化
//! - flow: 输入 / 加载 / 展示 状态机
//! - reader: 分页阅读与按章节插图登记
//! - export: 带定时进度的下载
//! - chat: 书籍问答会话
//! - view: 纯文本渲染

pub mod api;
pub mod chat;
pub mod error;
pub mod export;
pub mod flow;
pub mod normalize;
pub mod reader;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ChatReply, HttpOrchestratorClient, OrchestratorApi};
pub use chat::{book_context, ChatSession, CHAT_FAILED, NO_ANSWER};
pub use error::{ClientError, GENERIC_ERROR_MESSAGE};
pub use export::{download_book, ExportPlan, ExportProgress};
pub use flow::{Flow, FlowState};
pub use normalize::normalize_story;
pub use reader::{BookReader, IllustrationRequest, IllustrationStatus, ImagePane};
pub use view::{render_page, render_story, NO_IMAGE};
