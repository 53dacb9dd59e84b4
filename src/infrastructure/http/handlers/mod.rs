//! HTTP Handlers

mod book;
mod chat;
mod ping;
mod story;

pub use book::*;
pub use chat::*;
pub use ping::*;
pub use story::*;
