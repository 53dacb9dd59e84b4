//! 测试用的端口实现

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

use crate::application::ports::{
    DocumentError, DocumentReaderPort, DocumentRendererPort, GenerationError,
    GenerativeBackendPort, TextRequest,
};
use crate::domain::book::Book;

type TextFn = Box<dyn Fn(&TextRequest) -> Result<String, GenerationError> + Send + Sync>;
type MediaFn = Box<dyn Fn(&str) -> Result<Option<String>, GenerationError> + Send + Sync>;

/// 按提示词内容返回预设结果的后端，并记录所有调用
pub struct ScriptedBackend {
    text: TextFn,
    image: MediaFn,
    video: MediaFn,
    /// 图片与视频生成都会等待此屏障，用于验证两者并发执行
    media_barrier: Option<Arc<Barrier>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            text: Box::new(default_text),
            image: Box::new(|_| Ok(Some("data:image/png;base64,iVBORw0KGgo=".to_string()))),
            video: Box::new(|_| Ok(Some("https://video.example/clip.mp4".to_string()))),
            media_barrier: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_text(
        mut self,
        f: impl Fn(&TextRequest) -> Result<String, GenerationError> + Send + Sync + 'static,
    ) -> Self {
        self.text = Box::new(f);
        self
    }

    pub fn with_image(
        mut self,
        f: impl Fn(&str) -> Result<Option<String>, GenerationError> + Send + Sync + 'static,
    ) -> Self {
        self.image = Box::new(f);
        self
    }

    pub fn with_video(
        mut self,
        f: impl Fn(&str) -> Result<Option<String>, GenerationError> + Send + Sync + 'static,
    ) -> Self {
        self.video = Box::new(f);
        self
    }

    pub fn with_media_barrier(mut self) -> Self {
        self.media_barrier = Some(Arc::new(Barrier::new(2)));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

/// 根据提示词模板识别请求类型
fn default_text(request: &TextRequest) -> Result<String, GenerationError> {
    let prompt = &request.prompt;
    let reply = if request.json_output {
        r#"```json
{"imagePrompt": "a cat in a hat", "videoPrompt": "a cat dancing"}
```"#
    } else if prompt.contains("You are rewriting a story") {
        "Here is the simplified story: Once upon a time, a cat sat.\nThe cat was happy."
    } else if prompt.contains("chapter title") {
        "\"Dark Forest\""
    } else if prompt.contains("image prompt") {
        "a cat in a hat"
    } else if prompt.contains("reading buddy") {
        "On a mountain."
    } else {
        "ok"
    };
    Ok(reply.to_string())
}

#[async_trait]
impl GenerativeBackendPort for ScriptedBackend {
    async fn generate_text(&self, request: TextRequest) -> Result<String, GenerationError> {
        self.record(format!("text:{}", request.json_output));
        (self.text)(&request)
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, GenerationError> {
        self.record(format!("image:{}", prompt));
        if let Some(barrier) = &self.media_barrier {
            barrier.wait().await;
        }
        (self.image)(prompt)
    }

    async fn generate_video(&self, prompt: &str) -> Result<Option<String>, GenerationError> {
        self.record(format!("video:{}", prompt));
        if let Some(barrier) = &self.media_barrier {
            barrier.wait().await;
        }
        (self.video)(prompt)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// 返回固定文本的文档读取器
pub struct StaticReader(pub String);

impl DocumentReaderPort for StaticReader {
    fn mime_type(&self) -> &'static str {
        "application/pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn extract_text(&self, _bytes: &[u8]) -> Result<String, DocumentError> {
        Ok(self.0.clone())
    }
}

/// 记录渲染内容的渲染器
#[derive(Default)]
pub struct RecordingRenderer {
    pub rendered: Mutex<Vec<Book>>,
}

impl DocumentRendererPort for RecordingRenderer {
    fn mime_type(&self) -> &'static str {
        "application/pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, book: &Book) -> Result<Vec<u8>, DocumentError> {
        self.rendered.lock().unwrap().push(book.clone());
        Ok(b"%PDF-1.5 fake".to_vec())
    }
}
