//! 测试用的 Orchestrator 实现

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use super::api::{ChatReply, OrchestratorApi};
use super::error::ClientError;
use crate::domain::book::{Book, ChapterIllustration, ChapterResult};
use crate::domain::story::SingleStoryResult;

type ChatFn = Box<dyn Fn() -> Result<ChatReply, ClientError> + Send + Sync>;

/// 返回固定结果的 Orchestrator，并记录调用
pub struct FakeApi {
    download_delay: Duration,
    fail_downloads: bool,
    chat: ChatFn,
    asked: Mutex<Vec<(String, String, String)>>,
    illustrated: Mutex<Vec<(u32, String)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            download_delay: Duration::ZERO,
            fail_downloads: false,
            chat: Box::new(|| {
                Ok(ChatReply {
                    success: true,
                    response: "In the mountains.".to_string(),
                })
            }),
            asked: Mutex::new(Vec::new()),
            illustrated: Mutex::new(Vec::new()),
        }
    }

    pub fn with_download_delay(mut self, delay: Duration) -> Self {
        self.download_delay = delay;
        self
    }

    pub fn failing_downloads(mut self) -> Self {
        self.fail_downloads = true;
        self
    }

    pub fn with_chat(
        mut self,
        f: impl Fn() -> Result<ChatReply, ClientError> + Send + Sync + 'static,
    ) -> Self {
        self.chat = Box::new(f);
        self
    }

    pub fn asked(&self) -> Vec<(String, String, String)> {
        self.asked.lock().unwrap().clone()
    }

    /// 已请求插图的 (章节编号, 章节文本)
    pub fn illustrated(&self) -> Vec<(u32, String)> {
        self.illustrated.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrchestratorApi for FakeApi {
    async fn convert_story(&self, text: &str) -> Result<SingleStoryResult, ClientError> {
        Ok(SingleStoryResult {
            original_text: text.to_string(),
            simplified_text: text.to_string(),
            image_prompt: "a picture".to_string(),
            video_prompt: None,
            image_url: "data:image/png;base64,AAAA".to_string(),
            video_url: None,
        })
    }

    async fn process_document(
        &self,
        _file_name: &str,
        _bytes: Vec<u8>,
        title: Option<&str>,
    ) -> Result<Book, ClientError> {
        // 第二章没有预置插图
        let picture = ChapterIllustration::new("data:image/png;base64,AAAA", "a picture");
        Book::new(
            title.unwrap_or("Untitled"),
            vec![
                ChapterResult::new(1, "One", "First.").with_illustration(picture.clone()),
                ChapterResult::new(2, "Two", "Second."),
                ChapterResult::new(3, "Three", "Third.").with_illustration(picture),
            ],
        )
        .map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn illustrate_chapter(
        &self,
        chapter_number: u32,
        simplified_text: &str,
    ) -> Result<ChapterIllustration, ClientError> {
        self.illustrated
            .lock()
            .unwrap()
            .push((chapter_number, simplified_text.to_string()));
        Ok(ChapterIllustration::new(
            format!("data:chapter-{}", chapter_number),
            "a picture",
        ))
    }

    async fn download_book(&self, _book: &Book) -> Result<Vec<u8>, ClientError> {
        tokio::time::sleep(self.download_delay).await;
        if self.fail_downloads {
            return Err(ClientError::Application("Failed to render book".to_string()));
        }
        Ok(b"%PDF-1.5 fake".to_vec())
    }

    async fn ask(
        &self,
        question: &str,
        book_context: &str,
        book_title: &str,
    ) -> Result<ChatReply, ClientError> {
        self.asked.lock().unwrap().push((
            question.to_string(),
            book_context.to_string(),
            book_title.to_string(),
        ));
        (self.chat)()
    }
}
