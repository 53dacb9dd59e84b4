//! Book Context - 书籍限界上下文
//!
//! 职责:
//! - 章节结果实体（不可变）
//! - 书籍聚合（章节数与编号不变量）
//! - 章节插图值对象

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::Book;
pub use entities::ChapterResult;
pub use errors::BookError;
pub use value_objects::ChapterIllustration;
