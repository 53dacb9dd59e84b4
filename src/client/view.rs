//! 纯文本渲染（终端前端使用）

use std::fmt::Write;

use super::reader::{BookReader, ImagePane};
use crate::domain::paragraphs;
use crate::domain::story::SingleStoryResult;

pub const NO_IMAGE: &str = "No image generated";

const RULE: &str = "----------------------------------------";

fn image_line(src: &str, prompt: &str) -> String {
    if prompt.is_empty() {
        format!("[Image] {}", src)
    } else {
        format!("[Image: {}] {}", prompt, src)
    }
}

/// 单章节结果：段落 + 媒体
pub fn render_story(story: &SingleStoryResult) -> String {
    let mut out = String::new();

    for paragraph in paragraphs(&story.simplified_text) {
        let _ = writeln!(out, "{}\n", paragraph);
    }
    out.push_str(RULE);
    out.push('\n');

    if story.has_image() {
        let _ = writeln!(out, "{}", image_line(&story.image_url, &story.image_prompt));
    } else {
        let _ = writeln!(out, "{}", NO_IMAGE);
    }
    if let Some(video) = story.video_url.as_deref().filter(|v| !v.is_empty()) {
        let _ = writeln!(out, "[Video] {}", video);
    }

    out
}

/// 阅读器当前页
pub fn render_page(reader: &BookReader) -> String {
    let mut out = String::new();
    let index = reader.current_index();

    let Some(chapter) = reader.book().chapter(index) else {
        return out;
    };

    let _ = writeln!(out, "{}", reader.book().title());
    let _ = writeln!(
        out,
        "Chapter {} of {}: {}",
        index + 1,
        reader.total(),
        chapter.title()
    );
    out.push_str(RULE);
    out.push('\n');

    for paragraph in paragraphs(chapter.simplified_text()) {
        let _ = writeln!(out, "{}\n", paragraph);
    }
    out.push_str(RULE);
    out.push('\n');

    let pane = match reader.image_pane(index) {
        ImagePane::Loading => "Drawing a picture...".to_string(),
        ImagePane::Image { src, prompt } => image_line(src, prompt),
        ImagePane::Missing => NO_IMAGE.to_string(),
    };
    let _ = writeln!(out, "{}", pane);

    out
}
