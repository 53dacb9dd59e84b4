//! Chat Command Handlers

use std::sync::Arc;

use crate::application::commands::AnswerQuestion;
use crate::application::error::ApplicationError;
use crate::application::ports::{GenerativeBackendPort, TextRequest};
use crate::application::prompts;
use crate::domain::truncate_chars;

/// AnswerQuestion Handler - 无状态单轮问答
pub struct AnswerQuestionHandler {
    backend: Arc<dyn GenerativeBackendPort>,
    max_context_chars: usize,
}

impl AnswerQuestionHandler {
    pub fn new(backend: Arc<dyn GenerativeBackendPort>, max_context_chars: usize) -> Self {
        Self {
            backend,
            max_context_chars,
        }
    }

    pub async fn handle(&self, command: AnswerQuestion) -> Result<String, ApplicationError> {
        let question = command.question.trim();
        if question.is_empty() {
            return Err(ApplicationError::validation("Question cannot be empty"));
        }

        let title = match command.book_title.trim() {
            "" => "this book",
            t => t,
        };
        let context = truncate_chars(command.book_context.trim(), self.max_context_chars);

        tracing::debug!(
            title = %title,
            context_chars = context.chars().count(),
            "Answering question"
        );

        let reply = self
            .backend
            .generate_text(TextRequest::plain(prompts::answer_question(title, &context, question)))
            .await?;

        let answer = reply.trim().to_string();
        if answer.is_empty() {
            return Err(ApplicationError::backend("Backend returned an empty answer"));
        }
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::ScriptedBackend;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_answer_question() {
        let handler = AnswerQuestionHandler::new(Arc::new(ScriptedBackend::new()), 1000);
        let answer = handler
            .handle(AnswerQuestion {
                question: "Where does Heidi live?".to_string(),
                book_context: "Chapter 1: Alps\nHeidi lives on a mountain.".to_string(),
                book_title: "Heidi".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(answer, "On a mountain.");
    }

    #[tokio::test]
    async fn test_context_is_truncated() {
        let seen = Arc::new(Mutex::new(String::new()));
        let seen_clone = seen.clone();
        let backend = ScriptedBackend::new().with_text(move |req| {
            *seen_clone.lock().unwrap() = req.prompt.clone();
            Ok("Yes.".to_string())
        });
        let handler = AnswerQuestionHandler::new(Arc::new(backend), 10);

        handler
            .handle(AnswerQuestion {
                question: "Q?".to_string(),
                book_context: "abcdefghijklmnopqrstuvwxyz".to_string(),
                book_title: String::new(),
            })
            .await
            .unwrap();

        let prompt = seen.lock().unwrap();
        assert!(prompt.contains("abcdefghij..."));
        assert!(!prompt.contains("abcdefghijk"));
        assert!(prompt.contains("\"this book\""));
    }

    #[tokio::test]
    async fn test_empty_question_rejected() {
        let handler = AnswerQuestionHandler::new(Arc::new(ScriptedBackend::new()), 1000);
        let err = handler
            .handle(AnswerQuestion {
                question: " ".to_string(),
                book_context: String::new(),
                book_title: "T".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }
}
