//! Orchestrator API Client
//!
//! 每个操作都是一次独立的请求/响应，不做重试；
//! 超时只来自底层传输

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super::error::ClientError;
use super::normalize::{check_error, decode, normalize_story};
use crate::config::ClientConfig;
use crate::domain::book::{Book, ChapterIllustration};
use crate::domain::story::SingleStoryResult;

/// 问答结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: String,
}

/// Orchestrator 操作
#[async_trait]
pub trait OrchestratorApi: Send + Sync {
    /// 单章节转换
    async fn convert_story(&self, text: &str) -> Result<SingleStoryResult, ClientError>;

    /// 上传 PDF 转换为 Book
    async fn process_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        title: Option<&str>,
    ) -> Result<Book, ClientError>;

    /// 为单个章节生成插图
    async fn illustrate_chapter(
        &self,
        chapter_number: u32,
        simplified_text: &str,
    ) -> Result<ChapterIllustration, ClientError>;

    /// 下载渲染好的整本书
    async fn download_book(&self, book: &Book) -> Result<Vec<u8>, ClientError>;

    /// 关于书籍的单轮问答
    async fn ask(
        &self,
        question: &str,
        book_context: &str,
        book_title: &str,
    ) -> Result<ChatReply, ClientError>;
}

/// 基于 reqwest 的 Orchestrator 客户端
pub struct HttpOrchestratorClient {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpOrchestratorClient {
    pub fn new(config: Arc<ClientConfig>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post_json(&self, path: &str, body: &impl Serialize) -> Result<Value, ClientError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "Calling orchestrator");

        let response = self.client.post(&url).json(body).send().await?;
        read_json(response).await
    }
}

async fn read_json(response: Response) -> Result<Value, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status(status.as_u16()));
    }
    Ok(response.json::<Value>().await?)
}

#[async_trait]
impl OrchestratorApi for HttpOrchestratorClient {
    async fn convert_story(&self, text: &str) -> Result<SingleStoryResult, ClientError> {
        let value = self.post_json("story/convert", &json!({ "text": text })).await?;
        normalize_story(value, text)
    }

    async fn process_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        title: Option<&str>,
    ) -> Result<Book, ClientError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let mut form = Form::new().part("file", part);
        if let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) {
            form = form.text("title", title.to_string());
        }

        let url = self.url("book/process");
        tracing::debug!(url = %url, file_name, "Uploading document");

        let response = self.client.post(&url).multipart(form).send().await?;
        decode(read_json(response).await?)
    }

    async fn illustrate_chapter(
        &self,
        chapter_number: u32,
        simplified_text: &str,
    ) -> Result<ChapterIllustration, ClientError> {
        let body = json!({
            "chapterNumber": chapter_number,
            "simplifiedText": simplified_text,
        });
        decode(self.post_json("book/illustrate", &body).await?)
    }

    async fn download_book(&self, book: &Book) -> Result<Vec<u8>, ClientError> {
        let url = self.url("book/download");
        let response = self.client.post(&url).json(book).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        // 失败时服务端返回 JSON 错误体而不是文档
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let value = response.json::<Value>().await?;
            check_error(&value)?;
            return Err(ClientError::Decode(
                "Expected a document but received JSON".to_string(),
            ));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn ask(
        &self,
        question: &str,
        book_context: &str,
        book_title: &str,
    ) -> Result<ChatReply, ClientError> {
        let body = json!({
            "question": question,
            "bookContext": book_context,
            "bookTitle": book_title,
        });
        let value = self.post_json("chat/ask", &body).await?;

        // 带 success 字段的失败回复是正常回答结果，不作为错误
        if value.get("success").is_some() {
            return serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()));
        }
        decode(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Multipart;
    use axum::http::header;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};

    async fn spawn_orchestrator() -> Arc<ClientConfig> {
        async fn convert(Json(body): Json<Value>) -> Json<Value> {
            if body["text"].as_str().unwrap_or_default().trim().is_empty() {
                return Json(json!({"error": "Text cannot be empty", "kind": "validation"}));
            }
            Json(json!({"simplifiedText": "Short.", "imagePrompt": "a cat", "image": "data:x"}))
        }

        async fn process(mut multipart: Multipart) -> Json<Value> {
            let mut title = String::from("Untitled");
            while let Some(field) = multipart.next_field().await.unwrap() {
                if field.name() == Some("title") {
                    title = field.text().await.unwrap();
                }
            }
            Json(json!({
                "title": title,
                "totalChapters": 1,
                "chapters": [{"chapterNumber": 1, "title": "Den", "simplifiedText": "A fox."}]
            }))
        }

        async fn download(Json(book): Json<Value>) -> axum::response::Response {
            if book["title"] == "broken" {
                return Json(json!({"error": "Render failed", "kind": "internal"})).into_response();
            }
            ([(header::CONTENT_TYPE, "application/pdf")], b"%PDF-1.5".to_vec()).into_response()
        }

        async fn ask(Json(body): Json<Value>) -> Json<Value> {
            if body["question"] == "?" {
                return Json(json!({"success": false, "response": "", "error": "Backend error: HTTP 503"}));
            }
            Json(json!({"success": true, "response": format!("About {}", body["bookTitle"].as_str().unwrap_or_default())}))
        }

        let app = Router::new()
            .route("/api/story/convert", post(convert))
            .route("/api/book/process", post(process))
            .route("/api/book/download", post(download))
            .route("/api/chat/ask", post(ask));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Arc::new(ClientConfig {
            base_url: format!("http://{}/", addr),
            ..Default::default()
        })
    }

    fn fox_book(title: &str) -> Book {
        Book::new(
            title,
            vec![crate::domain::book::ChapterResult::new(1, "Den", "A fox.")],
        )
        .unwrap()
    }

    #[test]
    fn test_url_joins_base() {
        let config = Arc::new(ClientConfig {
            base_url: "http://localhost:5060/".to_string(),
            ..Default::default()
        });
        let client = HttpOrchestratorClient::new(config).unwrap();
        assert_eq!(client.url("story/convert"), "http://localhost:5060/api/story/convert");
    }

    #[tokio::test]
    async fn test_convert_story_normalizes_compact_shape() {
        let client = HttpOrchestratorClient::new(spawn_orchestrator().await).unwrap();
        let story = client.convert_story("A cat sat on a mat.").await.unwrap();
        assert_eq!(story.original_text, "A cat sat on a mat.");
        assert_eq!(story.simplified_text, "Short.");
        assert_eq!(story.image_url, "data:x");
    }

    #[tokio::test]
    async fn test_error_body_becomes_application_error() {
        let client = HttpOrchestratorClient::new(spawn_orchestrator().await).unwrap();
        let result = client.convert_story("  ").await;
        assert!(matches!(result, Err(ClientError::Application(msg)) if msg == "Text cannot be empty"));
    }

    #[tokio::test]
    async fn test_process_document_sends_title() {
        let client = HttpOrchestratorClient::new(spawn_orchestrator().await).unwrap();
        let book = client
            .process_document("fox.pdf", b"%PDF".to_vec(), Some("Fox Tales"))
            .await
            .unwrap();
        assert_eq!(book.title(), "Fox Tales");
        assert_eq!(book.total_chapters(), 1);
    }

    #[tokio::test]
    async fn test_download_returns_bytes_or_error() {
        let client = HttpOrchestratorClient::new(spawn_orchestrator().await).unwrap();

        let bytes = client.download_book(&fox_book("Fox")).await.unwrap();
        assert_eq!(bytes, b"%PDF-1.5");

        let result = client.download_book(&fox_book("broken")).await;
        assert!(matches!(result, Err(ClientError::Application(msg)) if msg == "Render failed"));
    }

    #[tokio::test]
    async fn test_ask() {
        let client = HttpOrchestratorClient::new(spawn_orchestrator().await).unwrap();
        let reply = client.ask("Who?", "ctx", "Heidi").await.unwrap();
        assert_eq!(
            reply,
            ChatReply {
                success: true,
                response: "About Heidi".to_string()
            }
        );

        let reply = client.ask("?", "ctx", "Heidi").await.unwrap();
        assert!(!reply.success);
    }

    #[tokio::test]
    async fn test_unreachable_orchestrator_is_transport_error() {
        let config = Arc::new(ClientConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        });
        let client = HttpOrchestratorClient::new(config).unwrap();
        let result = client.convert_story("A cat.").await;
        assert!(matches!(result, Err(ClientError::Transport(_))));
    }
}
