//! # PDF Param Extract
//!
//! 从一批 PDF 文档中用 LLM 提取参数，并整理成 Excel 报表的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部资源（LLM 连接），只暴露能力
//! - `ChatBackend` - 对话补全接口，测试时可以替换
//! - `OpenAiBackend` - OpenAI 兼容接口的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `LlmService` - 按模型选择调用方式，发送请求
//! - `answer_parser` - 去代码块、取 JSON 第一个值
//! - `spreadsheet_writer` / `report_formatter` - 写表格和格式化报表
//! - `FailureWriter` - 写失败记录
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文档 + 一个问题"的完整处理流程
//! - `DocumentCtx` - 上下文封装（文档名 + 文档序号）
//! - `QuestionFlow` / `BulkFlow` - 单题流程和合并提问流程
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 运行模式、输入加载、输出文件
//! - `orchestrator/document_processor` - 单个文档内的并发提问
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, RunMode};
pub use error::{AppError, AppResult};
pub use infrastructure::{ChatBackend, ChatRequest, OpenAiBackend};
pub use models::{AnswerRecord, Document, DuplicatePolicy, QuestionSet, ResultMatrix};
pub use orchestrator::{process_document, App, RunSummary};
pub use workflow::{DocumentCtx, QuestionFlow};
