//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigBuilder, ConfigError as ConfigCrateError, Environment, File};
use config::builder::DefaultState;
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, ClientConfig};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 客户端配置文件搜索路径
const CLIENT_CONFIG_FILE_NAMES: &[&str] = &["client", "client.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "STORYBOOK";

/// 客户端环境变量前缀
const CLIENT_ENV_PREFIX: &str = "STORYBOOK_CLIENT";

/// 兼容的 API Key 环境变量
const LEGACY_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `STORYBOOK_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值（`GEMINI_API_KEY` 作为 `backend.api_key` 的默认值）
///
/// # 环境变量示例
/// - `STORYBOOK_SERVER__PORT=8080`
/// - `STORYBOOK_BACKEND__API_KEY=...`
/// - `STORYBOOK_DOCUMENT__EAGER_ILLUSTRATIONS=true`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5060)?
        .set_default("backend.url", "https://generativelanguage.googleapis.com")?
        .set_default("backend.timeout_secs", 120)?
        .set_default("document.max_upload_bytes", 10 * 1024 * 1024)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Ok(key) = std::env::var(LEGACY_API_KEY_VAR) {
        builder = builder.set_default("backend.api_key", key)?;
    }

    // 2. 配置文件
    builder = add_files(builder, config_path, CONFIG_FILE_NAMES);

    // 3. 环境变量（最高优先级）
    // 例如: STORYBOOK_BACKEND__URL=http://localhost:8000
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let app_config: AppConfig = builder.build()?.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 加载客户端配置
///
/// Orchestrator 地址在启动时解析一次，之后以不可变值传递
///
/// # 环境变量示例
/// - `STORYBOOK_CLIENT_BASE_URL=https://storybook.example.com`
/// - `STORYBOOK_CLIENT_EXPORT__OUTPUT_DIR=/tmp/books`
pub fn load_client_config(config_path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    let mut builder = Config::builder().set_default("base_url", "http://localhost:5060")?;

    builder = add_files(builder, config_path, CLIENT_CONFIG_FILE_NAMES);

    builder = builder.add_source(
        Environment::with_prefix(CLIENT_ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let client_config: ClientConfig = builder.build()?.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize client config: {}", e))
    })?;

    validate_client_config(&client_config)?;

    Ok(client_config)
}

fn add_files(
    mut builder: ConfigBuilder<DefaultState>,
    config_path: Option<&Path>,
    names: &[&str],
) -> ConfigBuilder<DefaultState> {
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in names {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }
    builder
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.backend.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Backend URL cannot be empty".to_string(),
        ));
    }

    let models = [
        ("text", &config.backend.text_model),
        ("image", &config.backend.image_model),
        ("video", &config.backend.video_model),
    ];
    for (kind, model) in models {
        if model.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "Backend {} model cannot be empty",
                kind
            )));
        }
    }

    if config.document.max_chapters == 0 || config.document.words_per_part == 0 {
        return Err(ConfigError::ValidationError(
            "Document chapter limits must be positive".to_string(),
        ));
    }

    if config.document.max_upload_bytes > config.server.body_limit_bytes {
        return Err(ConfigError::ValidationError(
            "Upload limit cannot exceed the request body limit".to_string(),
        ));
    }

    if config.backend.video_enabled && config.backend.video_max_polls == 0 {
        return Err(ConfigError::ValidationError(
            "Video polling count cannot be 0 when video is enabled".to_string(),
        ));
    }

    Ok(())
}

fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "Client base URL must be http(s): {}",
            config.base_url
        )));
    }

    if config.export.per_image_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Export progress interval cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Backend URL: {}", config.backend.url);
    tracing::info!(
        "Backend Credentials: {}",
        if config.backend.has_credentials() { "configured" } else { "missing" }
    );
    if !config.backend.has_credentials() {
        tracing::info!(
            "Placeholder Mode: {}",
            config.backend.placeholder_when_unconfigured
        );
    }
    tracing::info!(
        "Models: text={}, image={}, video={}",
        config.backend.text_model,
        config.backend.image_model,
        config.backend.video_model
    );
    tracing::info!("Video Enabled: {}", config.backend.video_enabled);
    tracing::info!("Backend Timeout: {}s", config.backend.timeout_secs);
    tracing::info!(
        "Document: max {} chapters, {} chars each, eager illustrations {}",
        config.document.max_chapters,
        config.document.max_chapter_chars,
        config.document.eager_illustrations
    );
    if config.server.static_files.enabled {
        tracing::info!("Static Files: {:?}", config.server.static_files.dir);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_backend_url() {
        let mut config = AppConfig::default();
        config.backend.url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_model() {
        let mut config = AppConfig::default();
        config.backend.image_model = " ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_upload_over_body_limit() {
        let mut config = AppConfig::default();
        config.document.max_upload_bytes = config.server.body_limit_bytes + 1;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 7070\n\n[document]\neager_illustrations = true\nmax_chapters = 4"
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 7070);
        assert!(config.document.eager_illustrations);
        assert_eq!(config.document.max_chapters, 4);
        assert_eq!(config.document.max_chapter_chars, 3000);
    }

    #[test]
    fn test_load_client_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "base_url = \"http://books.local:9000\"\n\n[export]\nper_image_secs = 3").unwrap();

        let config = load_client_config(Some(file.path())).unwrap();
        assert_eq!(config.base_url, "http://books.local:9000");
        assert_eq!(config.export.per_image_secs, 3);
        assert_eq!(config.export.pdf_build_secs, 2);
    }

    #[test]
    fn test_client_rejects_non_http_url() {
        let mut config = ClientConfig::default();
        config.base_url = "ftp://books".to_string();
        assert!(validate_client_config(&config).is_err());
    }
}
