//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod document;
pub mod generative;

pub use document::*;
pub use generative::*;
