//! 合并提问流程 - 流程层
//!
//! 一个文档只发一次请求，回复原样保留，同时尽量按键对齐成答案记录

use anyhow::Result;
use tracing::info;

use crate::infrastructure::ChatBackend;
use crate::models::{AnswerRecord, BulkAnswer, Document, QuestionSet};
use crate::services::bulk_prompt::{align_bulk_answers, build_bulk_prompt};
use crate::services::LlmService;
use crate::workflow::question_ctx::DocumentCtx;

/// 合并提问模式的系统消息（Simple 调用方式下不会发送）
pub const BULK_SYSTEM_MESSAGE: &str =
    "You are an assistant that extracts information from documents.";

/// 一个文档的合并提问结果
#[derive(Debug, Clone)]
pub struct BulkOutcome {
    pub raw: BulkAnswer,
    pub aligned: Vec<AnswerRecord>,
}

pub struct BulkFlow<B: ChatBackend> {
    llm_service: LlmService<B>,
}

impl<B: ChatBackend> BulkFlow<B> {
    pub fn new(llm_service: LlmService<B>) -> Self {
        Self { llm_service }
    }

    pub async fn run(
        &self,
        document: &Document,
        questions: &QuestionSet,
        ctx: &DocumentCtx,
    ) -> Result<BulkOutcome> {
        let prompt = build_bulk_prompt(&document.text, questions);

        let answers = self
            .llm_service
            .send_to_llm(&prompt, Some(BULK_SYSTEM_MESSAGE))
            .await?;

        let aligned = align_bulk_answers(&document.name, &answers, questions);
        info!(
            "{} ✓ 回复中对齐到 {}/{} 个问题",
            ctx,
            aligned.len(),
            questions.len()
        );

        Ok(BulkOutcome {
            raw: BulkAnswer {
                document: document.name.clone(),
                answers,
            },
            aligned,
        })
    }
}
