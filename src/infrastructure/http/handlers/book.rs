//! Book HTTP Handlers - 文档转换、章节插图与下载

use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::application::{ConvertDocument, GenerateChapterIllustration, RenderDownloadable};
use crate::domain::book::{Book, ChapterIllustration};
use crate::infrastructure::http::dto::{BookPayload, IllustrateRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 上传 PDF 并转换为儿童版 Book
///
/// multipart 字段：`file`（必填）、`title`（可选）
pub async fn process_book(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Book>, ApiError> {
    let mut title: Option<String> = None;
    let mut upload: Option<ConvertDocument> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read title: {}", e)))?,
                );
            }
            "file" => {
                let file_name = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;

                upload = Some(ConvertDocument {
                    file_name,
                    content_type,
                    title: None,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let mut command =
        upload.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;
    command.title = title;

    let book = state.convert_document_handler.handle(command).await?;
    Ok(Json(book))
}

/// 为单个章节生成插图（不缓存，重复调用会重新生成）
pub async fn illustrate_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IllustrateRequest>,
) -> Result<Json<ChapterIllustration>, ApiError> {
    let illustration = state
        .illustrate_chapter_handler
        .handle(GenerateChapterIllustration {
            chapter_number: req.chapter_number,
            simplified_text: req.simplified_text,
        })
        .await?;

    Ok(Json(illustration))
}

/// 补齐缺失插图后渲染整本书并作为附件返回
pub async fn download_book(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BookPayload>,
) -> Result<Response, ApiError> {
    let book = payload.into_book()?;
    let document = state
        .render_downloadable_handler
        .handle(RenderDownloadable { book })
        .await?;

    let disposition = HeaderValue::from_str(&content_disposition(&document.file_name))
        .map_err(|e| ApiError::Internal(format!("Invalid download filename: {}", e)))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, document.mime_type)
        .header(header::CONTENT_LENGTH, document.bytes.len())
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(document.bytes))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}

/// `attachment; filename="..."`，非 ASCII 文件名额外附带 RFC 5987 `filename*`
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    if fallback == file_name {
        return format!("attachment; filename=\"{}\"", file_name);
    }

    let encoded: String = file_name
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback, encoded
    )
}
