//! Application State
//!
//! 包含所有 Command Handlers 的应用状态，请求之间只共享不可变数据

use std::sync::Arc;

use crate::application::{
    AnswerQuestionHandler, ConvertDocumentHandler, ConvertDocumentSettings,
    ConvertSingleChapterHandler, DocumentReaderPort, DocumentRendererPort,
    GenerateChapterIllustrationHandler, GenerativeBackendPort, RenderDownloadableHandler,
};

/// Orchestrator 运行参数
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub video_enabled: bool,
    pub document: ConvertDocumentSettings,
    pub max_context_chars: usize,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            video_enabled: true,
            document: ConvertDocumentSettings::default(),
            max_context_chars: 30_000,
        }
    }
}

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub backend: Arc<dyn GenerativeBackendPort>,

    // ========== Command Handlers ==========
    pub convert_single_chapter_handler: ConvertSingleChapterHandler,
    pub convert_document_handler: ConvertDocumentHandler,
    pub illustrate_chapter_handler: GenerateChapterIllustrationHandler,
    pub render_downloadable_handler: RenderDownloadableHandler,
    pub answer_question_handler: AnswerQuestionHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        backend: Arc<dyn GenerativeBackendPort>,
        reader: Arc<dyn DocumentReaderPort>,
        renderer: Arc<dyn DocumentRendererPort>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            backend: backend.clone(),

            convert_single_chapter_handler: ConvertSingleChapterHandler::new(
                backend.clone(),
                settings.video_enabled,
            ),
            convert_document_handler: ConvertDocumentHandler::new(
                backend.clone(),
                reader,
                settings.document,
            ),
            illustrate_chapter_handler: GenerateChapterIllustrationHandler::new(backend.clone()),
            render_downloadable_handler: RenderDownloadableHandler::new(backend.clone(), renderer),
            answer_question_handler: AnswerQuestionHandler::new(
                backend,
                settings.max_context_chars,
            ),
        }
    }
}
