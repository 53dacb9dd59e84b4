//! Chat Context - 书籍问答记录

use serde::{Deserialize, Serialize};

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// 聊天消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// 只追加的消息记录，作用域为一本书的一次会话
#[derive(Debug, Clone, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    /// 以助手问候语开始的新记录
    pub fn greeting(book_title: &str) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(format!(
                "Hi! Ask me anything about \"{}\"!",
                book_title
            ))],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_mentions_title() {
        let transcript = ChatTranscript::greeting("The Hobbit");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].role, ChatRole::Assistant);
        assert!(transcript.messages()[0].content.contains("\"The Hobbit\""));
    }

    #[test]
    fn test_push_appends_in_order() {
        let mut transcript = ChatTranscript::default();
        transcript.push(ChatMessage::user("Who is Bilbo?"));
        transcript.push(ChatMessage::assistant("A hobbit."));
        assert_eq!(transcript.messages()[0].role, ChatRole::User);
        assert_eq!(transcript.last().unwrap().content, "A hobbit.");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
    }
}
