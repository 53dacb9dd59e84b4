//! Chat Session - 关于一本书的问答

use super::api::OrchestratorApi;
use crate::domain::book::Book;
use crate::domain::chat::{ChatMessage, ChatTranscript};

/// 后端回答失败时的提示
pub const NO_ANSWER: &str = "Sorry, I couldn't answer that. Please try again!";

/// 请求出错时的提示
pub const CHAT_FAILED: &str = "Oops! Something went wrong. Please try again!";

/// 以 `Chapter N: Title` 开头的章节块，空行分隔
pub fn book_context(book: &Book) -> String {
    book.chapters()
        .iter()
        .map(|c| {
            format!(
                "Chapter {}: {}\n{}",
                c.chapter_number(),
                c.title(),
                c.simplified_text()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// 单本书的问答会话，记录不做持久化
#[derive(Debug)]
pub struct ChatSession {
    title: String,
    context: String,
    transcript: ChatTranscript,
}

impl ChatSession {
    pub fn new(book: &Book) -> Self {
        Self {
            title: book.title().to_string(),
            context: book_context(book),
            transcript: ChatTranscript::greeting(book.title()),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.transcript.messages()
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// 提问并追加回答；空问题不发送，返回 None
    pub async fn ask<A>(&mut self, api: &A, question: &str) -> Option<&ChatMessage>
    where
        A: OrchestratorApi + ?Sized,
    {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        self.transcript.push(ChatMessage::user(question));

        let answer = match api.ask(question, &self.context, &self.title).await {
            Ok(reply) if reply.success && !reply.response.trim().is_empty() => reply.response,
            Ok(_) => NO_ANSWER.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Chat request failed");
                CHAT_FAILED.to_string()
            }
        };

        self.transcript.push(ChatMessage::assistant(answer));
        self.transcript.last()
    }
}
