//! Storybook Orchestrator
//!
//! - Domain: book/, story, chat (Bounded Contexts)
//! - Application: commands, ports, prompts
//! - Infrastructure: http, adapters

use std::sync::Arc;
use std::time::Duration;

use storybook::application::{ConvertDocumentSettings, GenerativeBackendPort};
use storybook::config::{load_config, print_config, AppConfig};
use storybook::domain::SplitConfig;
use storybook::infrastructure::http::{AppState, HttpServer, HttpServerConfig, OrchestratorSettings};
use storybook::infrastructure::{
    HttpGenerativeClient, HttpGenerativeClientConfig, PdfBookRenderer, PdfTextReader,
    PlaceholderBackend,
};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},storybook={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 有 API Key 时使用 Gemini 客户端，否则使用占位后端
fn create_backend(config: &AppConfig) -> anyhow::Result<Arc<dyn GenerativeBackendPort>> {
    let backend = &config.backend;

    if let Some(api_key) = backend.api_key.as_deref().filter(|_| backend.has_credentials()) {
        let client_config = HttpGenerativeClientConfig::new(&backend.url, api_key)
            .with_timeout(backend.timeout_secs)
            .with_models(&backend.text_model, &backend.image_model, &backend.video_model)
            .with_video_polling(
                Duration::from_secs(backend.video_poll_interval_secs),
                backend.video_max_polls,
            );
        return Ok(Arc::new(HttpGenerativeClient::new(client_config)?));
    }

    if backend.placeholder_when_unconfigured {
        tracing::warn!("No API key configured, serving placeholder content");
        Ok(Arc::new(PlaceholderBackend::with_defaults()))
    } else {
        tracing::warn!("No API key configured, generation requests will fail");
        Ok(Arc::new(PlaceholderBackend::refusing()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Storybook - Magical Story Converter");
    print_config(&config);

    let backend = create_backend(&config)?;
    tracing::info!(backend = backend.name(), "Generative backend ready");

    let settings = OrchestratorSettings {
        video_enabled: config.backend.video_enabled,
        document: ConvertDocumentSettings {
            split: SplitConfig {
                max_chapters: config.document.max_chapters,
                max_chapter_chars: config.document.max_chapter_chars,
                words_per_part: config.document.words_per_part,
            },
            eager_illustrations: config.document.eager_illustrations,
            max_upload_bytes: config.document.max_upload_bytes,
        },
        max_context_chars: config.chat.max_context_chars,
    };

    let state = AppState::new(
        backend,
        Arc::new(PdfTextReader::new()),
        Arc::new(PdfBookRenderer::new()),
        settings,
    );

    let mut server_config = HttpServerConfig::new(&config.server.host, config.server.port)
        .with_body_limit(config.server.body_limit_bytes);
    if config.server.static_files.enabled {
        server_config = server_config.with_static_dir(&config.server.static_files.dir);
    }

    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
