//! Document Adapter - PDF 读取与生成

mod pdf_reader;
mod pdf_renderer;

pub use pdf_reader::PdfTextReader;
pub use pdf_renderer::PdfBookRenderer;
