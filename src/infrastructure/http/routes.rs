//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping               GET   健康检查
//! - /api/story/convert      POST  单章节转换（改写 + 图片 + 视频）
//! - /api/book/process       POST  上传 PDF，转换为儿童版 Book
//! - /api/book/illustrate    POST  为单个章节生成插图
//! - /api/book/download      POST  渲染整本书为 PDF 附件
//! - /api/chat/ask           POST  关于书籍的单轮问答

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/story", story_routes())
        .nest("/book", book_routes())
        .nest("/chat", chat_routes())
}

/// Story 路由
fn story_routes() -> Router<Arc<AppState>> {
    Router::new().route("/convert", post(handlers::convert_story))
}

/// Book 路由
fn book_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/process", post(handlers::process_book))
        .route("/illustrate", post(handlers::illustrate_chapter))
        .route("/download", post(handlers::download_book))
}

/// Chat 路由
fn chat_routes() -> Router<Arc<AppState>> {
    Router::new().route("/ask", post(handlers::ask))
}
