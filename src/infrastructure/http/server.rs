//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    /// 请求体大小上限（用于 PDF 上传与整本书下载请求）
    pub body_limit_bytes: usize,
    /// 构建好的前端静态文件目录，None 表示不托管
    pub static_dir: Option<PathBuf>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5060,
            body_limit_bytes: 50 * 1024 * 1024,
            static_dir: None,
        }
    }
}

impl HttpServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit_bytes = bytes;
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP 服务器
pub struct HttpServer {
    config: HttpServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: HttpServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 构建 Router
    fn build_router(&self) -> Router {
        // CORS 配置 - 允许所有来源的跨域请求
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .expose_headers(Any)
            .max_age(std::time::Duration::from_secs(3600));

        let mut router = create_routes();
        if let Some(dir) = &self.config.static_dir {
            info!("Serving static files from {:?}", dir);
            router = router.fallback_service(ServeDir::new(dir));
        }

        router
            .layer(DefaultBodyLimit::max(self.config.body_limit_bytes))
            .layer(middleware::from_fn(error_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let addr = self.config.addr();

        info!("Starting HTTP server on {} (with graceful shutdown)", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{RecordingRenderer, ScriptedBackend, StaticReader};
    use crate::infrastructure::http::state::OrchestratorSettings;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::io::Write;
    use tower::util::ServiceExt;

    fn server(config: HttpServerConfig) -> HttpServer {
        let state = AppState::new(
            Arc::new(ScriptedBackend::new()),
            Arc::new(StaticReader(String::new())),
            Arc::new(RecordingRenderer::default()),
            OrchestratorSettings::default(),
        );
        HttpServer::new(config, state)
    }

    #[test]
    fn test_config_builder() {
        let config = HttpServerConfig::new("127.0.0.1", 8080).with_body_limit(1024);
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.body_limit_bytes, 1024);
        assert!(config.static_dir.is_none());
    }

    #[tokio::test]
    async fn test_serves_static_files_as_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = std::fs::File::create(dir.path().join("index.html")).unwrap();
        write!(index, "<h1>Storybook</h1>").unwrap();

        let router = server(HttpServerConfig::default().with_static_dir(dir.path())).build_router();
        let response = router
            .oneshot(Request::builder().uri("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_body_limit_keeps_transport_status() {
        let router = server(HttpServerConfig::default().with_body_limit(16)).build_router();
        let request = Request::builder()
            .method("POST")
            .uri("/api/story/convert")
            .header("content-type", "application/json")
            .body(Body::from(format!("{{\"text\": \"{}\"}}", "x".repeat(64))))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
