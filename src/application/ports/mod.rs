//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod document;
mod generative_backend;

pub use document::{DocumentError, DocumentReaderPort, DocumentRendererPort};
pub use generative_backend::{GenerationError, GenerativeBackendPort, TextRequest};
