//! PDF Book Renderer - 基于 lopdf 生成儿童版 PDF
//!
//! 版式：Letter 纸张，Helvetica 字体；首页书名，每章另起一页，
//! 章节标题 `Chapter N: Title`，正文按段落折行，插图放在正文之后

use base64::{engine::general_purpose::STANDARD, Engine as _};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::application::ports::{DocumentError, DocumentRendererPort};
use crate::domain::book::{Book, ChapterResult};
use crate::domain::paragraphs;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;

const TITLE_SIZE: f32 = 24.0;
const HEADING_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 12.0;
const BODY_LEADING: f32 = 18.0;
const PARAGRAPH_GAP: f32 = 7.0;

/// 正文每行最多字符数（Helvetica 12pt，468pt 版心）
const WRAP_CHARS: usize = 78;

/// 插图最大宽度 5 英寸
const MAX_IMAGE_WIDTH: f32 = 360.0;

fn render_error(e: impl std::fmt::Display) -> DocumentError {
    DocumentError::RenderError(e.to_string())
}

/// 单页内容
struct PageDraft {
    operations: Vec<Operation>,
    xobjects: Dictionary,
    cursor: f32,
}

impl PageDraft {
    fn new() -> Self {
        Self {
            operations: Vec::new(),
            xobjects: Dictionary::new(),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    fn remaining(&self) -> f32 {
        self.cursor - MARGIN
    }

    fn is_blank(&self) -> bool {
        self.operations.is_empty()
    }

    fn text_line(&mut self, text: &str, size: f32, x: f32) {
        self.cursor -= size;
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), size.into()]),
            Operation::new("Td", vec![x.into(), self.cursor.into()]),
            Operation::new("Tj", vec![Object::string_literal(pdf_text(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn image(&mut self, name: &str, image_id: ObjectId, width: f32, height: f32) {
        self.cursor -= height;
        let x = (PAGE_WIDTH - width) / 2.0;
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width.into(),
                    0i64.into(),
                    0i64.into(),
                    height.into(),
                    x.into(),
                    self.cursor.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]);
        self.xobjects.set(name, image_id);
    }
}

/// 文档排版器，按需分页
struct Layout {
    doc: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    page_ids: Vec<ObjectId>,
    current: PageDraft,
    image_count: usize,
}

impl Layout {
    fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });

        Self {
            doc,
            pages_id,
            font_id,
            page_ids: Vec::new(),
            current: PageDraft::new(),
            image_count: 0,
        }
    }

    fn ensure_space(&mut self, height: f32) -> Result<(), DocumentError> {
        if self.current.remaining() < height && !self.current.is_blank() {
            self.break_page()?;
        }
        Ok(())
    }

    fn break_page(&mut self) -> Result<(), DocumentError> {
        let page = std::mem::replace(&mut self.current, PageDraft::new());
        let content = Content {
            operations: page.operations,
        };
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content.encode().map_err(render_error)?));

        // 每页独立的 Resources 字典
        let mut resources = dictionary! {
            "Font" => dictionary! { "F1" => self.font_id },
        };
        if !page.xobjects.is_empty() {
            resources.set("XObject", page.xobjects);
        }

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    fn gap(&mut self, height: f32) {
        self.current.cursor -= height;
    }

    fn title(&mut self, title: &str) -> Result<(), DocumentError> {
        for line in wrap(title, WRAP_CHARS / 2) {
            self.ensure_space(TITLE_SIZE + 12.0)?;
            let width = approximate_width(&line, TITLE_SIZE);
            let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
            self.current.text_line(&line, TITLE_SIZE, x);
            self.gap(12.0);
        }
        self.gap(24.0);
        Ok(())
    }

    fn chapter(&mut self, chapter: &ChapterResult) -> Result<(), DocumentError> {
        let heading = format!("Chapter {}: {}", chapter.chapter_number(), chapter.title());
        for line in wrap(&heading, WRAP_CHARS * 2 / 3) {
            self.ensure_space(HEADING_SIZE + BODY_LEADING * 2.0)?;
            self.current.text_line(&line, HEADING_SIZE, MARGIN);
            self.gap(8.0);
        }
        self.gap(12.0);

        for paragraph in paragraphs(chapter.simplified_text()) {
            for line in wrap(&paragraph, WRAP_CHARS) {
                self.ensure_space(BODY_LEADING)?;
                self.current.text_line(&line, BODY_SIZE, MARGIN);
                self.gap(BODY_LEADING - BODY_SIZE);
            }
            self.gap(PARAGRAPH_GAP);
        }

        if chapter.has_image() {
            self.illustration(chapter);
        }
        Ok(())
    }

    /// 插图无法解码时跳过，不影响整本书生成
    fn illustration(&mut self, chapter: &ChapterResult) {
        let stream = match decode_image(chapter.image()) {
            Some(bytes) => match lopdf::xobject::image_from(bytes) {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::warn!(
                        chapter = chapter.chapter_number(),
                        error = %e,
                        "Skipping undecodable illustration"
                    );
                    return;
                }
            },
            None => {
                tracing::warn!(
                    chapter = chapter.chapter_number(),
                    "Skipping illustration that is not inline image data"
                );
                return;
            }
        };

        let (pixel_width, pixel_height) = image_dimensions(&stream);
        if pixel_width <= 0.0 || pixel_height <= 0.0 {
            return;
        }

        let max_height = PAGE_HEIGHT - MARGIN * 2.0;
        let mut width = pixel_width.min(MAX_IMAGE_WIDTH);
        let mut height = width * pixel_height / pixel_width;
        if height > max_height {
            height = max_height;
            width = height * pixel_width / pixel_height;
        }

        if self.current.remaining() < height + 14.0 && !self.current.is_blank() {
            if self.break_page().is_err() {
                return;
            }
        } else {
            self.gap(14.0);
        }

        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        let image_id = self.doc.add_object(stream);
        self.current.image(&name, image_id, width, height);
    }

    fn finish(mut self) -> Result<Vec<u8>, DocumentError> {
        if !self.current.is_blank() || self.page_ids.is_empty() {
            self.break_page()?;
        }

        let kids: Vec<Object> = self.page_ids.iter().map(|id| (*id).into()).collect();
        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0i64.into(), 0i64.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let mut buffer = Vec::new();
        self.doc.save_to(&mut buffer).map_err(render_error)?;
        Ok(buffer)
    }
}

/// data URI 或裸 base64 解码为图片字节；URL 返回 None
fn decode_image(image: &str) -> Option<Vec<u8>> {
    let payload = match image.strip_prefix("data:") {
        Some(rest) => rest.split_once(',')?.1,
        None if image.starts_with("http://") || image.starts_with("https://") => return None,
        None => image,
    };
    STANDARD.decode(payload.trim()).ok()
}

fn image_dimensions(stream: &Stream) -> (f32, f32) {
    let read = |key: &[u8]| {
        stream
            .dict
            .get(key)
            .and_then(|o| o.as_i64())
            .map(|v| v as f32)
            .unwrap_or(0.0)
    };
    (read(b"Width"), read(b"Height"))
}

/// Helvetica 平均字宽估算
fn approximate_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

/// 按词折行，超长单词强制截断
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let line_len = line.chars().count();
        if line_len > 0 && line_len + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.extend(word);
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// 标准 Type1 字体只覆盖 WinAnsi，常见排版符号替换为 ASCII
fn pdf_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' => out.push(b'\''),
            '\u{201C}' | '\u{201D}' => out.push(b'"'),
            '\u{2013}' | '\u{2014}' => out.push(b'-'),
            '\u{2026}' => out.extend_from_slice(b"..."),
            c if (c as u32) < 0x80 => out.push(c as u8),
            c if (0xA0..=0xFF).contains(&(c as u32)) => out.push(c as u32 as u8),
            _ => out.push(b'?'),
        }
    }
    out
}

/// PDF 渲染器
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfBookRenderer;

impl PdfBookRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRendererPort for PdfBookRenderer {
    fn mime_type(&self) -> &'static str {
        "application/pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, book: &Book) -> Result<Vec<u8>, DocumentError> {
        let mut layout = Layout::new();
        layout.title(book.title())?;

        for (i, chapter) in book.chapters().iter().enumerate() {
            if i > 0 {
                layout.break_page()?;
            }
            layout.chapter(chapter)?;
        }

        let pages = layout.page_ids.len() + 1;
        let images = layout.image_count;
        let bytes = layout.finish()?;

        tracing::debug!(
            title = %book.title(),
            chapters = book.total_chapters(),
            pages,
            images,
            size = bytes.len(),
            "PDF rendered"
        );
        Ok(bytes)
    }
}
