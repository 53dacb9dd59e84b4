//! Book Command Handlers

use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use super::steps::{illustrate, simplify_text};
use crate::application::commands::{ConvertDocument, GenerateChapterIllustration, RenderDownloadable};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    DocumentReaderPort, DocumentRendererPort, GenerativeBackendPort, TextRequest,
};
use crate::application::prompts;
use crate::domain::book::{Book, ChapterIllustration, ChapterResult};
use crate::domain::{download_filename, normalize_title, split_into_chapters, RawChapter, SplitConfig};

/// 生成标题的最大词数
const MAX_TITLE_WORDS: usize = 3;

// ============================================================================
// ConvertDocument
// ============================================================================

/// 文档转换设置
#[derive(Debug, Clone)]
pub struct ConvertDocumentSettings {
    pub split: SplitConfig,
    /// 转换时即生成每章插图（否则留给客户端按需请求）
    pub eager_illustrations: bool,
    pub max_upload_bytes: usize,
}

impl Default for ConvertDocumentSettings {
    fn default() -> Self {
        Self {
            split: SplitConfig::default(),
            eager_illustrations: false,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// ConvertDocument Handler - 文档 → Book
pub struct ConvertDocumentHandler {
    backend: Arc<dyn GenerativeBackendPort>,
    reader: Arc<dyn DocumentReaderPort>,
    settings: ConvertDocumentSettings,
}

impl ConvertDocumentHandler {
    pub fn new(
        backend: Arc<dyn GenerativeBackendPort>,
        reader: Arc<dyn DocumentReaderPort>,
        settings: ConvertDocumentSettings,
    ) -> Self {
        Self {
            backend,
            reader,
            settings,
        }
    }

    pub async fn handle(&self, command: ConvertDocument) -> Result<Book, ApplicationError> {
        self.validate_upload(&command)?;

        let job_id = Uuid::new_v4();
        let title = resolve_book_title(command.title.as_deref(), command.file_name.as_deref());

        tracing::info!(
            job_id = %job_id,
            title = %title,
            size = command.bytes.len(),
            "Converting document"
        );

        // 文本抽取是同步 CPU 操作
        let reader = self.reader.clone();
        let bytes = command.bytes;
        let text = tokio::task::spawn_blocking(move || reader.extract_text(&bytes))
            .await
            .map_err(|e| ApplicationError::internal(format!("Text extraction task failed: {}", e)))??;

        if text.trim().is_empty() {
            return Err(ApplicationError::validation(
                "No text could be extracted from the document",
            ));
        }

        let raw_chapters = split_into_chapters(&text, &self.settings.split);
        if raw_chapters.is_empty() {
            return Err(ApplicationError::validation("Document contains no chapters"));
        }

        tracing::info!(job_id = %job_id, chapters = raw_chapters.len(), "Document split into chapters");

        let mut chapters = Vec::with_capacity(raw_chapters.len());
        for raw in &raw_chapters {
            let chapter_title = self.chapter_title(raw).await;
            let simplified = simplify_text(self.backend.as_ref(), &raw.text).await?;
            let mut chapter = ChapterResult::new(raw.number, chapter_title, simplified);

            if self.settings.eager_illustrations {
                match illustrate(self.backend.as_ref(), chapter.simplified_text()).await {
                    Ok(illustration) => chapter = chapter.with_illustration(illustration),
                    Err(e) => tracing::warn!(
                        job_id = %job_id,
                        chapter = raw.number,
                        error = %e,
                        "Chapter illustration failed, deferring to client"
                    ),
                }
            }

            tracing::debug!(job_id = %job_id, chapter = raw.number, "Chapter simplified");
            chapters.push(chapter);
        }

        let book = Book::new(title, chapters)?;

        tracing::info!(
            job_id = %job_id,
            title = %book.title(),
            total_chapters = book.total_chapters(),
            "Document converted"
        );

        Ok(book)
    }

    fn validate_upload(&self, command: &ConvertDocument) -> Result<(), ApplicationError> {
        let expected_mime = self.reader.mime_type();
        let extension = format!(".{}", self.reader.extension());

        let mime_ok = command
            .content_type
            .as_deref()
            .map(|ct| ct.eq_ignore_ascii_case(expected_mime))
            .unwrap_or(false);
        let name_ok = command
            .file_name
            .as_deref()
            .map(|name| name.to_lowercase().ends_with(&extension))
            .unwrap_or(false);

        if !mime_ok && !name_ok {
            return Err(ApplicationError::validation(format!(
                "Only {} files are allowed",
                self.reader.extension().to_uppercase()
            )));
        }

        if command.bytes.is_empty() {
            return Err(ApplicationError::validation("File is empty"));
        }

        if command.bytes.len() > self.settings.max_upload_bytes {
            return Err(ApplicationError::validation(format!(
                "File too large. Maximum size is {} MB",
                self.settings.max_upload_bytes / 1024 / 1024
            )));
        }

        Ok(())
    }

    /// 占位标题由后端生成，失败时保留占位标题
    async fn chapter_title(&self, raw: &RawChapter) -> String {
        if !raw.generic_title {
            return raw.title.clone();
        }

        match self
            .backend
            .generate_text(TextRequest::plain(prompts::chapter_title(&raw.text)))
            .await
        {
            Ok(reply) => normalize_title(&reply, MAX_TITLE_WORDS).unwrap_or_else(|| raw.title.clone()),
            Err(e) => {
                tracing::warn!(chapter = raw.number, error = %e, "Title generation failed");
                raw.title.clone()
            }
        }
    }
}

/// 书名：用户指定 > 文件名（去扩展名）> "Untitled"
fn resolve_book_title(title: Option<&str>, file_name: Option<&str>) -> String {
    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| {
            file_name
                .and_then(|f| Path::new(f).file_stem())
                .and_then(|s| s.to_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| "Untitled".to_string())
}

// ============================================================================
// GenerateChapterIllustration
// ============================================================================

/// GenerateChapterIllustration Handler - 每次调用都重新生成
pub struct GenerateChapterIllustrationHandler {
    backend: Arc<dyn GenerativeBackendPort>,
}

impl GenerateChapterIllustrationHandler {
    pub fn new(backend: Arc<dyn GenerativeBackendPort>) -> Self {
        Self { backend }
    }

    pub async fn handle(
        &self,
        command: GenerateChapterIllustration,
    ) -> Result<ChapterIllustration, ApplicationError> {
        if command.chapter_number == 0 {
            return Err(ApplicationError::validation("Chapter number must start at 1"));
        }
        if command.simplified_text.trim().is_empty() {
            return Err(ApplicationError::validation("Chapter text cannot be empty"));
        }

        let illustration = illustrate(self.backend.as_ref(), &command.simplified_text).await?;

        tracing::info!(
            chapter = command.chapter_number,
            has_image = !illustration.is_empty(),
            "Chapter illustration generated"
        );

        Ok(illustration)
    }
}

// ============================================================================
// RenderDownloadable
// ============================================================================

/// 渲染结果
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// RenderDownloadable Handler - 补齐缺失插图并渲染
pub struct RenderDownloadableHandler {
    backend: Arc<dyn GenerativeBackendPort>,
    renderer: Arc<dyn DocumentRendererPort>,
}

impl RenderDownloadableHandler {
    pub fn new(
        backend: Arc<dyn GenerativeBackendPort>,
        renderer: Arc<dyn DocumentRendererPort>,
    ) -> Self {
        Self { backend, renderer }
    }

    pub async fn handle(
        &self,
        command: RenderDownloadable,
    ) -> Result<RenderedDocument, ApplicationError> {
        let missing = command.book.chapters_missing_images();
        tracing::info!(
            title = %command.book.title(),
            total_chapters = command.book.total_chapters(),
            missing_images = missing,
            "Rendering downloadable document"
        );

        let (title, chapters) = command.book.into_chapters();
        let mut filled = Vec::with_capacity(chapters.len());
        for chapter in chapters {
            if chapter.has_image() {
                filled.push(chapter);
                continue;
            }

            match illustrate(self.backend.as_ref(), chapter.simplified_text()).await {
                Ok(illustration) => filled.push(chapter.with_illustration(illustration)),
                Err(e) => {
                    tracing::warn!(
                        chapter = chapter.chapter_number(),
                        error = %e,
                        "Missing illustration could not be generated, rendering without it"
                    );
                    filled.push(chapter);
                }
            }
        }

        let book = Book::new(title, filled)?;
        let file_name = download_filename(book.title(), self.renderer.extension());

        let renderer = self.renderer.clone();
        let bytes = tokio::task::spawn_blocking(move || renderer.render(&book))
            .await
            .map_err(|e| ApplicationError::internal(format!("Render task failed: {}", e)))??;

        tracing::info!(file_name = %file_name, size = bytes.len(), "Document rendered");

        Ok(RenderedDocument {
            file_name,
            mime_type: self.renderer.mime_type(),
            bytes,
        })
    }
}
