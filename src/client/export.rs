//! Export - 下载整本书并保存为文件
//!
//! 进度提示由固定定时器驱动，与服务端实际进度无关，只是粗略估计

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tokio::time::{interval_at, Instant};

use super::api::OrchestratorApi;
use super::error::ClientError;
use crate::config::ExportConfig;
use crate::domain::book::Book;
use crate::domain::download_filename;

/// 导出耗时估算
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    /// 缺少插图、需要服务端补图的章节数
    pub missing_images: usize,
    pub per_image: Duration,
    pub pdf_build: Duration,
}

impl ExportPlan {
    pub fn for_book(book: &Book, config: &ExportConfig) -> Self {
        Self {
            missing_images: book.chapters_missing_images(),
            per_image: Duration::from_secs(config.per_image_secs.max(1)),
            pdf_build: Duration::from_secs(config.pdf_build_secs),
        }
    }

    /// 缺图章节数 × 单张耗时 + PDF 生成耗时
    pub fn estimated(&self) -> Duration {
        self.per_image * self.missing_images as u32 + self.pdf_build
    }
}

/// 导出进度
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportProgress {
    Preparing { missing: usize },
    GeneratingImage { current: usize, total: usize },
    CreatingPdf,
    Complete { path: PathBuf },
}

impl fmt::Display for ExportProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportProgress::Preparing { missing } => {
                write!(f, "Preparing PDF... ({} images to generate)", missing)
            }
            ExportProgress::GeneratingImage { current, total } => {
                write!(f, "Generating image {}/{}...", current, total)
            }
            ExportProgress::CreatingPdf => write!(f, "Creating PDF..."),
            ExportProgress::Complete { .. } => write!(f, "Complete!"),
        }
    }
}

/// 文件名限制为单个路径分量，书名中的分隔符不能把文件写到 `output_dir` 之外
fn single_component(name: &str) -> String {
    let mut component: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    if component.starts_with('.') {
        component.replace_range(..1, "_");
    }
    component
}

/// 请求渲染好的书籍并保存到 `output_dir`
///
/// 等待期间每隔 `per_image` 发出一次图片进度，最多 N 次
pub async fn download_book<A>(
    api: &A,
    book: &Book,
    config: &ExportConfig,
    mut on_progress: impl FnMut(ExportProgress),
) -> Result<PathBuf, ClientError>
where
    A: OrchestratorApi + ?Sized,
{
    let plan = ExportPlan::for_book(book, config);
    tracing::info!(
        title = %book.title(),
        missing_images = plan.missing_images,
        estimated_secs = plan.estimated().as_secs(),
        "Exporting book"
    );
    on_progress(ExportProgress::Preparing {
        missing: plan.missing_images,
    });

    let download = api.download_book(book);
    tokio::pin!(download);

    let mut ticks = interval_at(Instant::now() + plan.per_image, plan.per_image);
    let mut current = 0;

    let bytes = loop {
        tokio::select! {
            biased;
            result = &mut download => break result?,
            _ = ticks.tick() => {
                if current < plan.missing_images {
                    current += 1;
                    on_progress(ExportProgress::GeneratingImage {
                        current,
                        total: plan.missing_images,
                    });
                }
            }
        }
    };

    on_progress(ExportProgress::CreatingPdf);

    tokio::fs::create_dir_all(&config.output_dir).await?;
    let path = config
        .output_dir
        .join(single_component(&download_filename(book.title(), "pdf")));
    tokio::fs::write(&path, &bytes).await?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Book saved");
    on_progress(ExportProgress::Complete { path: path.clone() });

    Ok(path)
}
