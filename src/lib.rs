//! Storybook - 儿童故事改写与插图系统
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Book Context: 章节与整本书
//! - Story Context: 单章节转换结果
//! - Chat Context: 书籍问答记录
//!
//! 应用层 (application/):
//! - Ports: 端口定义（GenerativeBackend, DocumentReader, DocumentRenderer）
//! - Commands: Orchestrator 的五个操作及其处理器
//! - Prompts: 提示词模板
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: Orchestrator RESTful API
//! - Adapters: 生成式后端客户端、占位后端、PDF 读取与渲染
//!
//! 客户端 (client/):
//! - Orchestrator API 客户端、阅读器、导出与问答

pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
