//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量文档处理器
//! - 管理一次运行（初始化、加载输入、输出文件）
//! - 文档按目录顺序逐个处理
//! - 输出全局统计信息
//!
//! ### `document_processor` - 单个文档处理器
//! - 对一个文档并发提出所有问题（Semaphore 限流）
//! - 按完成顺序收集结果，回填问题原文
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Document>)
//!     ↓
//! document_processor (处理 QuestionSet)
//!     ↓
//! workflow::QuestionFlow (处理单个问题)
//!     ↓
//! services (能力层：llm / 解析 / 表格)
//!     ↓
//! infrastructure (基础设施：ChatBackend)
//! ```

pub mod batch_processor;
pub mod document_processor;

// 重新导出主要类型
pub use batch_processor::{App, Extraction, RunSummary};
pub use document_processor::{process_document, DocumentOutcome};
