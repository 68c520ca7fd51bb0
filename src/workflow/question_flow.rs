//! 单题处理流程 - 流程层
//!
//! 核心职责：定义"一个文档 + 一个问题"的完整处理流程
//!
//! 流程顺序：
//! 1. 组装消息（文档全文 + 问题）
//! 2. 调用 LLM
//! 3. 去掉代码块，取 JSON 的第一个值，失败时保留原文

use anyhow::Result;
use tracing::debug;

use crate::infrastructure::ChatBackend;
use crate::models::Document;
use crate::services::{extract_first_value, LlmService};
use crate::utils::truncate_text;
use crate::workflow::question_ctx::DocumentCtx;

/// 单题模式的系统消息
pub const SYSTEM_MESSAGE: &str =
    "You are an assistant that extracts parameters and information from documents.";

/// 构建单题模式的用户消息
pub fn build_user_message(document_text: &str, question: &str) -> String {
    format!("Document:\n{}\n\nQuestion:\n{}\n\n", document_text, question)
}

/// 单题处理流程
///
/// - 不持有文档，不关心并发
/// - 只依赖 LlmService
pub struct QuestionFlow<B: ChatBackend> {
    llm_service: LlmService<B>,
}

impl<B: ChatBackend> QuestionFlow<B> {
    pub fn new(llm_service: LlmService<B>) -> Self {
        Self { llm_service }
    }

    /// 对一个文档提一个问题，返回解析后的答案
    ///
    /// # 参数
    /// - `document`: 文档
    /// - `prompt`: 带前缀的问题
    /// - `ctx`: 文档上下文（仅用于日志）
    pub async fn run(&self, document: &Document, prompt: &str, ctx: &DocumentCtx) -> Result<String> {
        let user_message = build_user_message(&document.text, prompt);

        let raw_answer = self
            .llm_service
            .send_to_llm(&user_message, Some(SYSTEM_MESSAGE))
            .await?;

        let answer = extract_first_value(&raw_answer);
        debug!("{} 答案: {}", ctx, truncate_text(&answer, 80));

        Ok(answer)
    }
}
