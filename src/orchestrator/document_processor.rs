//! 单个文档处理器 - 编排层
//!
//! ## 职责
//!
//! 对一个文档并发地提出所有问题，是文档级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **并发控制**：每个文档一个 Semaphore，同时进行的请求不超过上限
//! 2. **按完成顺序收集**：先完成的先记录，不保证与提交顺序一致
//! 3. **回填原文**：用问题集合的映射把带前缀的问题换回原文
//! 4. **失败兜底**：调用失败的组合记录日志并从结果中丢弃

use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::error;

use crate::infrastructure::ChatBackend;
use crate::models::{AnswerRecord, Document, FailedPair, QuestionSet};
use crate::utils::truncate_text;
use crate::workflow::{DocumentCtx, QuestionFlow};

/// 一个文档的处理结果
#[derive(Debug, Default)]
pub struct DocumentOutcome {
    pub records: Vec<AnswerRecord>,
    pub failures: Vec<FailedPair>,
}

/// 处理单个文档
///
/// # 参数
/// - `flow`: 单题流程（所有任务共享）
/// - `document`: 文档（只读共享）
/// - `questions`: 问题集合
/// - `max_concurrent`: 同时进行的请求上限
/// - `ctx`: 文档上下文
///
/// # 返回
/// 返回所有完成的答案以及失败的组合，调用方会等到全部任务结束
pub async fn process_document<B: ChatBackend>(
    flow: Arc<QuestionFlow<B>>,
    document: Arc<Document>,
    questions: &QuestionSet,
    max_concurrent: usize,
    ctx: &DocumentCtx,
) -> DocumentOutcome {
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut tasks = FuturesUnordered::new();

    // 为每个问题创建任务
    for prompt in questions.prompts() {
        let semaphore = semaphore.clone();
        let flow = flow.clone();
        let document = document.clone();
        let task_ctx = ctx.clone();
        let task_prompt = prompt.to_string();

        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let answer = flow.run(&document, &task_prompt, &task_ctx).await?;
            anyhow::Ok(answer)
        });

        let prompt = prompt.to_string();
        tasks.push(async move { (prompt, handle.await) });
    }

    // 按完成顺序收集
    let mut outcome = DocumentOutcome::default();

    while let Some((prompt, joined)) = tasks.next().await {
        let question = questions
            .original_for(&prompt)
            .unwrap_or(prompt.as_str())
            .to_string();

        let error_message = match joined {
            Ok(Ok(answer)) => {
                outcome
                    .records
                    .push(AnswerRecord::new(&ctx.document, question, answer));
                continue;
            }
            Ok(Err(e)) => {
                error!(
                    "{} ❌ 问题 '{}' 调用失败: {:#}",
                    ctx,
                    truncate_text(&question, 60),
                    e
                );
                format!("{:#}", e)
            }
            Err(e) => {
                error!("{} 任务执行失败: {}", ctx, e);
                e.to_string()
            }
        };

        outcome.failures.push(FailedPair {
            document: ctx.document.clone(),
            question,
            error: error_message,
        });
    }

    outcome
}
