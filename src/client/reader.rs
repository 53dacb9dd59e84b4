//! Book Reader - 分页阅读与按需插图
//!
//! 每个缺少插图的章节在首次访问时恰好发出一次插图请求；
//! 请求状态按章节下标登记，离开再返回不会重复触发

use std::collections::HashMap;

use super::error::ClientError;
use crate::domain::book::{Book, ChapterIllustration};

/// 需要发出的插图请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllustrationRequest {
    pub index: usize,
    pub chapter_number: u32,
    pub simplified_text: String,
}

/// 单个章节的插图状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllustrationStatus {
    Idle,
    Pending,
    Done(ChapterIllustration),
    Failed,
}

/// 图片区域的展示内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePane<'a> {
    Loading,
    Image { src: &'a str, prompt: &'a str },
    Missing,
}

/// 书籍阅读器
#[derive(Debug)]
pub struct BookReader {
    book: Book,
    current_index: usize,
    registry: HashMap<usize, IllustrationStatus>,
}

impl BookReader {
    /// 打开书籍并定位到第一章，返回第一章可能需要的插图请求
    pub fn open(book: Book) -> (Self, Option<IllustrationRequest>) {
        let mut reader = Self {
            book,
            current_index: 0,
            registry: HashMap::new(),
        };
        let request = reader.arm(0);
        (reader, request)
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total(&self) -> usize {
        self.book.total_chapters()
    }

    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.total()
    }

    pub fn next(&mut self) -> Option<IllustrationRequest> {
        self.go_to(self.current_index.saturating_add(1))
    }

    pub fn previous(&mut self) -> Option<IllustrationRequest> {
        self.go_to(self.current_index.saturating_sub(1))
    }

    /// 跳转到指定章节（越界时夹到有效范围）
    pub fn go_to(&mut self, index: usize) -> Option<IllustrationRequest> {
        let last = self.total().saturating_sub(1);
        self.current_index = index.min(last);
        self.arm(self.current_index)
    }

    pub fn status(&self, index: usize) -> &IllustrationStatus {
        self.registry.get(&index).unwrap_or(&IllustrationStatus::Idle)
    }

    /// 记录插图请求结果
    ///
    /// 空图片视为失败；不处于 Pending 的章节忽略结果
    pub fn complete(&mut self, index: usize, result: Result<ChapterIllustration, ClientError>) {
        let Some(status) = self.registry.get_mut(&index) else {
            tracing::debug!(index, "Ignoring illustration for unrequested chapter");
            return;
        };
        if *status != IllustrationStatus::Pending {
            return;
        }

        *status = match result {
            Ok(illustration) if !illustration.is_empty() => IllustrationStatus::Done(illustration),
            Ok(_) => {
                tracing::warn!(index, "Illustration came back empty");
                IllustrationStatus::Failed
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "Illustration request failed");
                IllustrationStatus::Failed
            }
        };
    }

    /// 重新发起失败章节的插图请求
    pub fn retry(&mut self, index: usize) -> Option<IllustrationRequest> {
        if self.registry.get(&index) == Some(&IllustrationStatus::Failed) {
            self.registry.remove(&index);
            return self.arm(index);
        }
        None
    }

    pub fn image_pane(&self, index: usize) -> ImagePane<'_> {
        let Some(chapter) = self.book.chapter(index) else {
            return ImagePane::Missing;
        };
        if chapter.has_image() {
            return ImagePane::Image {
                src: chapter.image(),
                prompt: chapter.image_prompt(),
            };
        }

        match self.status(index) {
            IllustrationStatus::Pending => ImagePane::Loading,
            IllustrationStatus::Done(illustration) => ImagePane::Image {
                src: &illustration.image,
                prompt: &illustration.image_prompt,
            },
            IllustrationStatus::Idle | IllustrationStatus::Failed => ImagePane::Missing,
        }
    }

    /// 合并已获取插图后的书籍（用于导出）
    pub fn book_with_illustrations(&self) -> Book {
        let (title, chapters) = self.book.clone().into_chapters();
        let chapters = chapters
            .into_iter()
            .enumerate()
            .map(|(index, chapter)| match self.registry.get(&index) {
                Some(IllustrationStatus::Done(illustration)) if !chapter.has_image() => {
                    chapter.with_illustration(illustration.clone())
                }
                _ => chapter,
            })
            .collect();

        // 章节编号与数量未变，重建不会违反不变量
        Book::new(title, chapters).unwrap_or_else(|_| self.book.clone())
    }

    fn arm(&mut self, index: usize) -> Option<IllustrationRequest> {
        let chapter = self.book.chapter(index)?;
        if chapter.has_image() || self.registry.contains_key(&index) {
            return None;
        }

        self.registry.insert(index, IllustrationStatus::Pending);
        Some(IllustrationRequest {
            index,
            chapter_number: chapter.chapter_number(),
            simplified_text: chapter.simplified_text().to_string(),
        })
    }
}
