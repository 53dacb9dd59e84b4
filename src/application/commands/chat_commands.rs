//! Chat Commands

/// 单轮问答命令
///
/// Orchestrator 不保存会话，调用方每次都需带上完整的书籍上下文
#[derive(Debug, Clone)]
pub struct AnswerQuestion {
    pub question: String,
    pub book_context: String,
    pub book_title: String,
}
