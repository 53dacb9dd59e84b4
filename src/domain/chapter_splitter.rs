//! 章节切分器
//!
//! 将文档抽取出的原始文本切分为章节：
//! 1. 优先按 "Chapter 1: Title" / "CH. IV" 等标题行切分
//! 2. 没有标题行时按固定词数切分为 "Part N"

use regex::Regex;
use std::sync::OnceLock;

use super::text_cleanup::truncate_chars;

/// 默认最大章节数
pub const DEFAULT_MAX_CHAPTERS: usize = 10;

/// 默认单章最大字符数（超出部分截断并追加 "..."）
pub const DEFAULT_MAX_CHAPTER_CHARS: usize = 3000;

/// 无标题行时每个部分的词数
pub const DEFAULT_WORDS_PER_PART: usize = 500;

/// 首行被视为标题的最大长度
const MAX_TITLE_LINE_CHARS: usize = 100;

/// 切分配置
#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub max_chapters: usize,
    pub max_chapter_chars: usize,
    pub words_per_part: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_chapters: DEFAULT_MAX_CHAPTERS,
            max_chapter_chars: DEFAULT_MAX_CHAPTER_CHARS,
            words_per_part: DEFAULT_WORDS_PER_PART,
        }
    }
}

/// 切分出的原始章节（尚未简化）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChapter {
    /// 从 1 开始的章节编号
    pub number: u32,
    pub title: String,
    pub text: String,
    /// 标题是否为 "Chapter N" / "Part N" 这样的占位标题
    pub generic_title: bool,
}

/// 标题可以出现在行中间（PDF 抽取常把页尾文字和标题合并成一行），
/// 但编号或标题之后必须到行尾
fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| {
        Regex::new(
            r"(?m)(?:Chapter|CHAPTER|Ch\.|CH\.)\s*(\d+|[IVX]+)(?:[ \t]*[:\-–—][ \t]*(.*?))?[ \t]*$",
        )
        .expect("chapter heading regex is valid")
    })
}

/// 将文本切分为章节
pub fn split_into_chapters(text: &str, config: &SplitConfig) -> Vec<RawChapter> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let headings: Vec<_> = heading_regex().captures_iter(&text).collect();

    let chapters = if headings.is_empty() {
        split_by_words(&text, config.words_per_part.max(1))
    } else {
        headings
            .iter()
            .enumerate()
            .map(|(i, caps)| {
                let number = (i + 1) as u32;
                let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
                let end = headings
                    .get(i + 1)
                    .and_then(|next| next.get(0))
                    .map(|m| m.start())
                    .unwrap_or(text.len());

                let heading_title = caps
                    .get(2)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();

                build_chapter(number, heading_title, text[whole..end].trim(), config)
            })
            .collect()
    };

    chapters.into_iter().take(config.max_chapters).collect()
}

fn build_chapter(number: u32, heading_title: String, body: &str, config: &SplitConfig) -> RawChapter {
    let mut title = heading_title;
    let mut body = body.to_string();

    // 标题行没有标题时，尝试使用正文首行
    if title.is_empty() && !body.is_empty() {
        let first_line = body.lines().next().unwrap_or_default().trim().to_string();
        if first_line.chars().count() < MAX_TITLE_LINE_CHARS {
            title = first_line;
            body = body.lines().skip(1).collect::<Vec<_>>().join("\n").trim().to_string();
        }
    }

    let generic_title = title.is_empty();
    if generic_title {
        title = format!("Chapter {}", number);
    }

    RawChapter {
        number,
        title,
        text: truncate_chars(&body, config.max_chapter_chars),
        generic_title,
    }
}

fn split_by_words(text: &str, words_per_part: usize) -> Vec<RawChapter> {
    let words: Vec<&str> = text.split_whitespace().collect();

    words
        .chunks(words_per_part)
        .enumerate()
        .map(|(i, chunk)| {
            let number = (i + 1) as u32;
            RawChapter {
                number,
                title: format!("Part {}", number),
                text: chunk.join(" "),
                generic_title: true,
            }
        })
        .collect()
}
