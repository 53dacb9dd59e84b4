//! Story HTTP Handlers - 单章节转换

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::ConvertSingleChapter;
use crate::infrastructure::http::dto::{ConvertStoryRequest, StoryResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 单章节转换：改写 + 提示词 + 并发生成图片与视频
pub async fn convert_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConvertStoryRequest>,
) -> Result<Json<StoryResponse>, ApiError> {
    let result = state
        .convert_single_chapter_handler
        .handle(ConvertSingleChapter { text: req.text })
        .await?;

    Ok(Json(result.into()))
}
