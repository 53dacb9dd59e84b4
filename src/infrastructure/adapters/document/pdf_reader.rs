//! PDF Text Reader - 基于 pdf-extract 的全文抽取

use crate::application::ports::{DocumentError, DocumentReaderPort};

/// PDF 全文读取器
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextReader;

impl PdfTextReader {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentReaderPort for PdfTextReader {
    fn mime_type(&self) -> &'static str {
        "application/pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError> {
        // pdf-extract 遇到部分损坏的文件会 panic
        let extracted = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
            .map_err(|_| DocumentError::ReadError("PDF parser aborted".to_string()))?;

        let text = extracted.map_err(|e| DocumentError::ReadError(e.to_string()))?;
        tracing::debug!(bytes = bytes.len(), chars = text.chars().count(), "PDF text extracted");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{Book, ChapterResult};
    use crate::application::ports::DocumentRendererPort;
    use crate::infrastructure::adapters::document::PdfBookRenderer;

    #[test]
    fn test_garbage_is_read_error() {
        let reader = PdfTextReader::new();
        let result = reader.extract_text(b"definitely not a pdf");
        assert!(matches!(result, Err(DocumentError::ReadError(_))));
    }

    #[test]
    fn test_reads_rendered_book() {
        let book = Book::new(
            "Fox Tales",
            vec![ChapterResult::new(1, "The Fox", "The quick fox jumped over the lazy dog.")],
        )
        .unwrap();
        let bytes = PdfBookRenderer::new().render(&book).unwrap();

        let text = PdfTextReader::new().extract_text(&bytes).unwrap();
        assert!(text.contains("Fox"));
        assert!(text.contains("lazy"));
    }
}
