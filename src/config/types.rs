//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置（Orchestrator 服务端）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 生成式后端配置
    #[serde(default)]
    pub backend: BackendConfig,

    /// 文档处理配置
    #[serde(default)]
    pub document: DocumentConfig,

    /// 问答配置
    #[serde(default)]
    pub chat: ChatConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求体大小上限（字节）
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,

    /// 静态文件服务配置（托管构建好的前端）
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 是否启用静态文件服务
    #[serde(default)]
    pub enabled: bool,

    /// 静态文件目录
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5060
}

fn default_body_limit() -> usize {
    50 * 1024 * 1024 // 50 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 生成式后端配置
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// 后端基础 URL
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// API Key（也可通过 GEMINI_API_KEY 提供）
    #[serde(default)]
    pub api_key: Option<String>,

    /// 未配置 API Key 时使用占位内容，而不是报错
    #[serde(default = "default_true")]
    pub placeholder_when_unconfigured: bool,

    /// 文本模型
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// 图片模型
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// 视频模型
    #[serde(default = "default_video_model")]
    pub video_model: String,

    /// 单章节转换时是否生成视频
    #[serde(default = "default_true")]
    pub video_enabled: bool,

    /// 视频任务轮询间隔（秒）
    #[serde(default = "default_video_poll_interval")]
    pub video_poll_interval_secs: u64,

    /// 视频任务最大轮询次数
    #[serde(default = "default_video_max_polls")]
    pub video_max_polls: u32,

    /// 请求超时时间（秒）
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_backend_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_video_model() -> String {
    "veo-3.0-fast-generate-001".to_string()
}

fn default_video_poll_interval() -> u64 {
    10
}

fn default_video_max_polls() -> u32 {
    30
}

fn default_backend_timeout() -> u64 {
    120
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            api_key: None,
            placeholder_when_unconfigured: true,
            text_model: default_text_model(),
            image_model: default_image_model(),
            video_model: default_video_model(),
            video_enabled: true,
            video_poll_interval_secs: default_video_poll_interval(),
            video_max_polls: default_video_max_polls(),
            timeout_secs: default_backend_timeout(),
        }
    }
}

impl BackendConfig {
    /// 是否提供了非空的 API Key
    pub fn has_credentials(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }
}

/// 文档处理配置
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    /// 上传文件最大大小（字节），默认 10MB
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// 最大章节数
    #[serde(default = "default_max_chapters")]
    pub max_chapters: usize,

    /// 单章最大字符数
    #[serde(default = "default_max_chapter_chars")]
    pub max_chapter_chars: usize,

    /// 无章节标题时每部分的词数
    #[serde(default = "default_words_per_part")]
    pub words_per_part: usize,

    /// 转换时立即生成每章插图
    #[serde(default)]
    pub eager_illustrations: bool,
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024 // 10 MB
}

fn default_max_chapters() -> usize {
    10
}

fn default_max_chapter_chars() -> usize {
    3000
}

fn default_words_per_part() -> usize {
    500
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            max_chapters: default_max_chapters(),
            max_chapter_chars: default_max_chapter_chars(),
            words_per_part: default_words_per_part(),
            eager_illustrations: false,
        }
    }
}

/// 问答配置
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// 传给后端的书籍上下文最大字符数
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
}

fn default_max_context_chars() -> usize {
    30_000
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_context_chars: default_max_context_chars(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// 客户端配置（storybook-cli）
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Orchestrator 基础 URL
    #[serde(default = "default_client_base_url")]
    pub base_url: String,

    /// 导出配置
    #[serde(default)]
    pub export: ExportConfig,
}

fn default_client_base_url() -> String {
    "http://localhost:5060".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_client_base_url(),
            export: ExportConfig::default(),
        }
    }
}

/// 导出进度估算配置
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// 每张插图的估算耗时（秒），也是进度提示的间隔
    #[serde(default = "default_per_image_secs")]
    pub per_image_secs: u64,

    /// 生成 PDF 的估算耗时（秒）
    #[serde(default = "default_pdf_build_secs")]
    pub pdf_build_secs: u64,

    /// 下载目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_per_image_secs() -> u64 {
    5
}

fn default_pdf_build_secs() -> u64 {
    2
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            per_image_secs: default_per_image_secs(),
            pdf_build_secs: default_pdf_build_secs(),
            output_dir: default_output_dir(),
        }
    }
}
