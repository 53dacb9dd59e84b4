//! HTTP Generative Client - 调用 Gemini 风格的 REST 接口
//!
//! 实现 GenerativeBackendPort trait
//!
//! 外部 API:
//! POST {base}/v1beta/models/{model}:generateContent      文本 / 图片
//! POST {base}/v1beta/models/{model}:predictLongRunning   视频（长任务）
//! GET  {base}/v1beta/{operation}                         视频任务轮询
//! 鉴权: x-goog-api-key header

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{GenerationError, GenerativeBackendPort, TextRequest};

const API_KEY_HEADER: &str = "x-goog-api-key";

// ---- 请求体 ----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<&'static str>>,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str, generation_config: Option<GenerationConfig>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![TextPart { text: prompt }],
            }],
            generation_config,
        }
    }
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: Vec<VideoInstance<'a>>,
}

#[derive(Debug, Serialize)]
struct VideoInstance<'a> {
    prompt: &'a str,
}

// ---- 响应体 ----

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter())
            .into_iter()
            .flatten()
    }

    /// 拼接第一个候选的全部文本片段
    fn text(&self) -> Option<String> {
        let text: String = self.parts().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// 第一张内联图片，转换为 data URI
    fn image_data_uri(&self) -> Option<String> {
        self.parts()
            .find_map(|p| p.inline_data.as_ref())
            .map(|d| format!("data:{};base64,{}", d.mime_type, d.data))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Operation {
    name: String,
    #[serde(default)]
    done: bool,
    error: Option<OperationError>,
    response: Option<OperationResponse>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
    video: Option<VideoRef>,
}

#[derive(Debug, Deserialize)]
struct VideoRef {
    uri: Option<String>,
}

impl Operation {
    fn video_uri(&self) -> Option<String> {
        self.response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .generated_samples
            .first()?
            .video
            .as_ref()?
            .uri
            .clone()
    }
}

/// HTTP 生成客户端配置
#[derive(Debug, Clone)]
pub struct HttpGenerativeClientConfig {
    /// 后端基础 URL
    pub base_url: String,
    /// API Key
    pub api_key: String,
    /// 文本模型
    pub text_model: String,
    /// 图片模型
    pub image_model: String,
    /// 视频模型
    pub video_model: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 视频任务轮询间隔
    pub video_poll_interval: Duration,
    /// 视频任务最大轮询次数
    pub video_max_polls: u32,
}

impl Default for HttpGenerativeClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            text_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            video_model: "veo-3.0-fast-generate-001".to_string(),
            timeout_secs: 120,
            video_poll_interval: Duration::from_secs(10),
            video_max_polls: 30,
        }
    }
}

impl HttpGenerativeClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_models(
        mut self,
        text: impl Into<String>,
        image: impl Into<String>,
        video: impl Into<String>,
    ) -> Self {
        self.text_model = text.into();
        self.image_model = image.into();
        self.video_model = video.into();
        self
    }

    pub fn with_video_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.video_poll_interval = interval;
        self.video_max_polls = max_polls;
        self
    }
}

/// HTTP 生成客户端
///
/// 所有调用只尝试一次，超时由 reqwest 客户端控制
pub struct HttpGenerativeClient {
    client: Client,
    config: HttpGenerativeClientConfig,
}

impl HttpGenerativeClient {
    /// 创建新的客户端；API Key 为空时返回 MissingCredentials
    pub fn new(config: HttpGenerativeClientConfig) -> Result<Self, GenerationError> {
        if config.api_key.trim().is_empty() {
            return Err(GenerationError::MissingCredentials);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn generate_content_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base(), model)
    }

    fn predict_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:predictLongRunning", self.base(), model)
    }

    fn operation_url(&self, name: &str) -> String {
        format!("{}/v1beta/{}", self.base(), name.trim_start_matches('/'))
    }

    fn models_url(&self) -> String {
        format!("{}/v1beta/models", self.base())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(API_KEY_HEADER, &self.config.api_key)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, GenerationError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        read_json(response).await
    }

    async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
        generation_config: Option<GenerationConfig>,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let url = self.generate_content_url(model);
        let body = GenerateContentRequest::new(prompt, generation_config);

        tracing::debug!(url = %url, prompt_len = prompt.len(), "Sending generateContent request");

        self.send_json(self.client.post(&url).json(&body)).await
    }

    async fn poll_operation(&self, mut operation: Operation) -> Result<Option<String>, GenerationError> {
        let mut polls = 0;
        while !operation.done {
            if polls >= self.config.video_max_polls {
                tracing::warn!(
                    operation = %operation.name,
                    polls,
                    "Video operation did not finish in time"
                );
                return Err(GenerationError::Timeout);
            }
            tokio::time::sleep(self.config.video_poll_interval).await;
            polls += 1;

            let url = self.operation_url(&operation.name);
            operation = self.send_json(self.client.get(&url)).await?;
            tracing::debug!(operation = %operation.name, polls, done = operation.done, "Polled video operation");
        }

        if let Some(error) = operation.error {
            return Err(GenerationError::ServiceError(error.message));
        }
        Ok(operation.video_uri())
    }
}

fn map_transport_error(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        GenerationError::Timeout
    } else if e.is_connect() {
        GenerationError::NetworkError(format!("Cannot connect to generative backend: {}", e))
    } else {
        GenerationError::NetworkError(e.to_string())
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GenerationError> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(GenerationError::ServiceError(format!(
            "HTTP {}: {}",
            status, error_text
        )));
    }

    response.json::<T>().await.map_err(|e| {
        if e.is_timeout() {
            GenerationError::Timeout
        } else {
            GenerationError::InvalidResponse(e.to_string())
        }
    })
}

#[async_trait]
impl GenerativeBackendPort for HttpGenerativeClient {
    async fn generate_text(&self, request: TextRequest) -> Result<String, GenerationError> {
        let generation_config = request.json_output.then(|| GenerationConfig {
            response_mime_type: Some("application/json"),
            ..Default::default()
        });

        let response = self
            .generate_content(&self.config.text_model, &request.prompt, generation_config)
            .await?;

        let text = response
            .text()
            .ok_or_else(|| GenerationError::InvalidResponse("No text in response".to_string()))?;

        tracing::debug!(model = %self.config.text_model, reply_len = text.len(), "Text generation completed");
        Ok(text)
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, GenerationError> {
        let generation_config = GenerationConfig {
            response_modalities: Some(vec!["IMAGE"]),
            ..Default::default()
        };

        let response = self
            .generate_content(&self.config.image_model, prompt, Some(generation_config))
            .await?;

        let image = response.image_data_uri();
        tracing::info!(
            model = %self.config.image_model,
            has_image = image.is_some(),
            "Image generation completed"
        );
        Ok(image)
    }

    async fn generate_video(&self, prompt: &str) -> Result<Option<String>, GenerationError> {
        let url = self.predict_url(&self.config.video_model);
        let body = PredictRequest {
            instances: vec![VideoInstance { prompt }],
        };

        let operation: Operation = self.send_json(self.client.post(&url).json(&body)).await?;
        tracing::info!(operation = %operation.name, "Video operation started");

        let video = self.poll_operation(operation).await?;
        tracing::info!(
            model = %self.config.video_model,
            has_video = video.is_some(),
            "Video generation completed"
        );
        Ok(video)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn health_check(&self) -> bool {
        match self
            .authorized(self.client.get(self.models_url()))
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
