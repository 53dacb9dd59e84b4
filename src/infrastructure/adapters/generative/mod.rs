//! Generative Adapter - 生成式后端实现

mod http_generative_client;
mod placeholder_backend;

pub use http_generative_client::*;
pub use placeholder_backend::{PlaceholderBackend, PlaceholderBackendConfig};
