//! Book Aggregate - 书籍聚合根

use serde::{Deserialize, Serialize};

use super::{BookError, ChapterResult};

/// 书籍聚合根
///
/// 不变量:
/// - total_chapters == chapters.len()
/// - 章节编号从 1 开始严格递增
///
/// 反序列化同样经过校验，因此从请求体解析出的 Book 一定满足不变量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawBook")]
pub struct Book {
    title: String,
    total_chapters: usize,
    chapters: Vec<ChapterResult>,
}

/// 未经校验的书籍数据（仅用于反序列化）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBook {
    title: String,
    #[serde(alias = "total_chapters")]
    total_chapters: usize,
    chapters: Vec<ChapterResult>,
}

impl TryFrom<RawBook> for Book {
    type Error = BookError;

    fn try_from(raw: RawBook) -> Result<Self, Self::Error> {
        Book::from_parts(raw.title, raw.total_chapters, raw.chapters)
    }
}

impl Book {
    /// 从章节列表创建书籍，total_chapters 由章节数推导
    pub fn new(title: impl Into<String>, chapters: Vec<ChapterResult>) -> Result<Self, BookError> {
        let total = chapters.len();
        Self::from_parts(title.into(), total, chapters)
    }

    /// 从完整字段创建书籍并校验不变量
    pub fn from_parts(
        title: String,
        total_chapters: usize,
        chapters: Vec<ChapterResult>,
    ) -> Result<Self, BookError> {
        if title.trim().is_empty() {
            return Err(BookError::InvalidTitle("标题不能为空".to_string()));
        }

        if total_chapters != chapters.len() {
            return Err(BookError::ChapterCountMismatch {
                declared: total_chapters,
                actual: chapters.len(),
            });
        }

        let mut previous = 0u32;
        for (position, chapter) in chapters.iter().enumerate() {
            let number = chapter.chapter_number();
            let valid = if position == 0 { number == 1 } else { number > previous };
            if !valid {
                return Err(BookError::InvalidChapterNumber { position, number });
            }
            previous = number;
        }

        Ok(Self {
            title,
            total_chapters,
            chapters,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn total_chapters(&self) -> usize {
        self.total_chapters
    }

    pub fn chapters(&self) -> &[ChapterResult] {
        &self.chapters
    }

    pub fn chapter(&self, index: usize) -> Option<&ChapterResult> {
        self.chapters.get(index)
    }

    /// 缺少插图的章节数量
    pub fn chapters_missing_images(&self) -> usize {
        self.chapters.iter().filter(|c| !c.has_image()).count()
    }

    /// 拆解为章节列表（用于服务端补图后重建）
    pub fn into_chapters(self) -> (String, Vec<ChapterResult>) {
        (self.title, self.chapters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapters(numbers: &[u32]) -> Vec<ChapterResult> {
        numbers
            .iter()
            .map(|n| ChapterResult::new(*n, format!("Chapter {}", n), "text"))
            .collect()
    }

    #[test]
    fn test_new_book_counts_chapters() {
        let book = Book::new("My Book", chapters(&[1, 2, 3])).unwrap();
        assert_eq!(book.total_chapters(), 3);
        assert_eq!(book.chapters().len(), book.total_chapters());
    }

    #[test]
    fn test_first_chapter_must_be_one() {
        let err = Book::new("My Book", chapters(&[2, 3])).unwrap_err();
        assert_eq!(err, BookError::InvalidChapterNumber { position: 0, number: 2 });
    }

    #[test]
    fn test_chapter_numbers_strictly_increasing() {
        let err = Book::new("My Book", chapters(&[1, 2, 2])).unwrap_err();
        assert_eq!(err, BookError::InvalidChapterNumber { position: 2, number: 2 });
    }

    #[test]
    fn test_declared_total_must_match() {
        let err = Book::from_parts("My Book".to_string(), 5, chapters(&[1, 2])).unwrap_err();
        assert_eq!(err, BookError::ChapterCountMismatch { declared: 5, actual: 2 });
    }

    #[test]
    fn test_empty_title_rejected() {
        assert!(Book::new("  ", chapters(&[1])).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let json = serde_json::json!({
            "title": "Bad",
            "totalChapters": 2,
            "chapters": [
                {"chapterNumber": 1, "title": "A", "simplifiedText": "a", "image": "", "imagePrompt": ""}
            ]
        });
        assert!(serde_json::from_value::<Book>(json).is_err());
    }

    #[test]
    fn test_deserialize_valid_book() {
        let json = serde_json::json!({
            "title": "Good",
            "totalChapters": 2,
            "chapters": [
                {"chapterNumber": 1, "title": "A", "simplifiedText": "a", "image": "x", "imagePrompt": "p"},
                {"chapterNumber": 2, "title": "B", "simplifiedText": "b"}
            ]
        });
        let book: Book = serde_json::from_value(json).unwrap();
        assert_eq!(book.total_chapters(), 2);
        assert_eq!(book.chapters_missing_images(), 1);
    }
}
