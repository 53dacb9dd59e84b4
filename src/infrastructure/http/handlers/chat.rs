//! Chat HTTP Handlers - 关于书籍的问答

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{AnswerQuestion, ApplicationError};
use crate::infrastructure::http::dto::{ChatRequest, ChatResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 单轮问答；问题为空时返回校验错误，后端失败时返回 success=false
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let command = AnswerQuestion {
        question: req.question,
        book_context: req.book_context,
        book_title: req.book_title,
    };

    match state.answer_question_handler.handle(command).await {
        Ok(answer) => Ok(Json(ChatResponse::answered(answer))),
        Err(e @ ApplicationError::ValidationError(_)) => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Question could not be answered");
            Ok(Json(ChatResponse::failed(e.to_string())))
        }
    }
}
