//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次运行的全部编排和输出。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建 LLM 后端，记录本次运行的时间戳
//! 2. **加载输入**：扫描 PDF 文件夹，读取问题表格
//! 3. **逐个文档处理**：文档按目录顺序串行处理，文档内部的问题并发处理
//! 4. **汇总输出**：扁平结果、透视表、合并提问结果、格式化报表
//! 5. **全局统计**：汇总答案数和失败数，失败的组合写入失败记录
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个问题的细节
//! - **资源所有者**：唯一持有 LLM 后端的模块
//! - **向下委托**：文档内的并发委托给 document_processor

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::{Config, RunMode};
use crate::infrastructure::{ChatBackend, OpenAiBackend};
use crate::models::{
    load_all_pdf_documents, load_question_set, load_report_layout, AnswerRecord, BulkAnswer,
    Document, FailedPair, QuestionSet, ResultMatrix,
};
use crate::orchestrator::document_processor::process_document;
use crate::services::{format_report, spreadsheet_writer, FailureWriter, LlmService};
use crate::utils::logging;
use crate::workflow::{BulkFlow, DocumentCtx, QuestionFlow};

/// 透视表文件名
pub const PIVOTED_FILE: &str = "output_single_question_pivoted.xlsx";
/// 格式化报表文件名
pub const FORMATTED_FILE: &str = "output_single_question_pivoted_formatted_new.xlsx";
/// 合并提问透视表文件名
pub const BULK_PIVOTED_FILE: &str = "output_bulk_questions_pivoted.xlsx";

/// 单题模式扁平结果文件名
pub fn single_flat_file(timestamp: &str) -> String {
    format!("output_single_question_{}.xlsx", timestamp)
}

/// 合并提问模式结果文件名
pub fn bulk_file(timestamp: &str) -> String {
    format!("output_bulk_questions_{}.xlsx", timestamp)
}

/// 一次提取的汇总（尚未写出）
#[derive(Debug, Default)]
pub struct Extraction {
    /// 处理过的文档名（按处理顺序）
    pub documents: Vec<String>,
    pub records: Vec<AnswerRecord>,
    pub failures: Vec<FailedPair>,
}

/// 运行统计
#[derive(Debug, Default)]
pub struct RunSummary {
    pub documents: usize,
    pub answers: usize,
    pub failed: usize,
    pub outputs: Vec<PathBuf>,
}

/// 应用主结构
pub struct App<B: ChatBackend> {
    config: Config,
    backend: Arc<B>,
    timestamp: String,
}

impl App<OpenAiBackend> {
    /// 使用 OpenAI 兼容后端初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        if config.llm_api_key.is_empty() && config.run_mode != RunMode::Format {
            warn!("⚠️ 未设置 OPENAI_API_KEY，请求很可能被拒绝");
        }

        let backend = OpenAiBackend::new(&config.llm_api_key, &config.llm_api_base_url);
        Ok(Self::with_backend(config, Arc::new(backend)))
    }
}

impl<B: ChatBackend> App<B> {
    /// 使用指定后端创建应用（测试时注入替身）
    pub fn with_backend(config: Config, backend: Arc<B>) -> Self {
        Self {
            config,
            backend,
            timestamp: chrono::Local::now().format("%Y%m%d_%H%M%S").to_string(),
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    fn output_path(&self, file_name: &str) -> PathBuf {
        Path::new(&self.config.output_dir).join(file_name)
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunSummary> {
        let summary = match self.config.run_mode {
            RunMode::Single => self.run_single().await?,
            RunMode::Bulk => self.run_bulk().await?,
            RunMode::Format => self.run_format().await?,
        };

        let outputs: Vec<String> = summary
            .outputs
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        logging::print_final_stats(summary.documents, summary.answers, summary.failed, &outputs);

        Ok(summary)
    }

    /// 加载 PDF 和问题
    async fn load_inputs(&self) -> Result<(Vec<Document>, QuestionSet)> {
        info!("\n📁 正在读取问题表格: {}", self.config.questions_file);
        let questions = load_question_set(
            Path::new(&self.config.questions_file),
            self.config.question_row,
            self.config.max_questions,
        )?;

        info!("\n📁 正在扫描待处理的 PDF...");
        let documents = load_all_pdf_documents(&self.config.input_folder).await?;

        logging::log_inputs_loaded(documents.len(), questions.len());
        Ok((documents, questions))
    }

    async fn prepare_output_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .with_context(|| format!("无法创建输出目录: {}", self.config.output_dir))
    }

    // ========== 单题模式 ==========

    /// 单题模式：每个 (文档, 问题) 一次请求
    pub async fn run_single(&self) -> Result<RunSummary> {
        logging::log_startup(
            "单题并发模式",
            &self.config.llm_model_name,
            self.config.max_concurrent_questions,
        );

        let (documents, questions) = self.load_inputs().await?;
        if documents.is_empty() {
            warn!("⚠️ 没有找到待处理的 PDF，程序结束");
            return Ok(RunSummary::default());
        }

        let extraction = self.extract_single(documents, &questions).await;
        self.write_single_outputs(&extraction, &questions).await
    }

    /// 对所有文档提问，不写文件
    pub async fn extract_single(&self, documents: Vec<Document>, questions: &QuestionSet) -> Extraction {
        let service = LlmService::new(
            self.backend.clone(),
            &self.config.llm_model_name,
            &self.config.simplified_models,
            self.config.max_tokens,
        );
        let flow = Arc::new(QuestionFlow::new(service));

        let total = documents.len();
        let mut extraction = Extraction::default();

        // 文档串行处理
        for (idx, document) in documents.into_iter().enumerate() {
            let doc_index = idx + 1;
            logging::log_document_start(doc_index, total, &document.name, document.text.chars().count());

            let ctx = DocumentCtx::new(document.name.clone(), doc_index);
            extraction.documents.push(document.name.clone());

            let outcome = process_document(
                flow.clone(),
                Arc::new(document),
                questions,
                self.config.max_concurrent_questions,
                &ctx,
            )
            .await;

            logging::log_document_complete(doc_index, outcome.records.len(), questions.len());
            extraction.records.extend(outcome.records);
            extraction.failures.extend(outcome.failures);
        }

        extraction
    }

    /// 写出扁平结果、失败记录和透视表
    ///
    /// 透视失败（重复组合）时扁平结果和失败记录已经写出，错误继续向上传递
    pub async fn write_single_outputs(
        &self,
        extraction: &Extraction,
        questions: &QuestionSet,
    ) -> Result<RunSummary> {
        self.prepare_output_dir().await?;
        let mut summary = RunSummary {
            documents: extraction.documents.len(),
            answers: extraction.records.len(),
            failed: extraction.failures.len(),
            outputs: Vec::new(),
        };

        let flat_path = self.output_path(&single_flat_file(&self.timestamp));
        spreadsheet_writer::write_flat(&flat_path, &extraction.records)?;
        summary.outputs.push(flat_path);

        self.write_failures(&extraction.failures).await;

        let matrix = ResultMatrix::pivot(
            &extraction.records,
            &extraction.documents,
            &questions.originals(),
            self.config.duplicate_policy,
        )?;
        let pivot_path = self.output_path(PIVOTED_FILE);
        spreadsheet_writer::write_pivot(&pivot_path, &matrix)?;
        summary.outputs.push(pivot_path);

        info!("✅ 单题模式完成");
        Ok(summary)
    }

    async fn write_failures(&self, failures: &[FailedPair]) {
        if failures.is_empty() {
            return;
        }

        let writer = FailureWriter::with_path(&self.config.failure_log_file);
        match writer.write(&self.timestamp, failures).await {
            Ok(()) => warn!(
                "⚠️ {} 个组合调用失败，已写入 {}",
                failures.len(),
                writer.path()
            ),
            Err(e) => error!("失败记录写入失败: {:#}", e),
        }
    }

    // ========== 合并提问模式 ==========

    /// 合并提问模式：每个文档一次请求
    pub async fn run_bulk(&self) -> Result<RunSummary> {
        logging::log_startup("合并提问模式", &self.config.bulk_model_name, 1);

        let (documents, questions) = self.load_inputs().await?;
        if documents.is_empty() {
            warn!("⚠️ 没有找到待处理的 PDF，程序结束");
            return Ok(RunSummary::default());
        }

        let service = LlmService::new(
            self.backend.clone(),
            &self.config.bulk_model_name,
            &self.config.simplified_models,
            self.config.max_tokens,
        );
        info!("调用方式: {:?}", service.style());
        let flow = BulkFlow::new(service);

        let total = documents.len();
        let mut raw_answers: Vec<BulkAnswer> = Vec::new();
        let mut extraction = Extraction::default();

        for (idx, document) in documents.iter().enumerate() {
            let doc_index = idx + 1;
            logging::log_document_start(doc_index, total, &document.name, document.text.chars().count());
            let ctx = DocumentCtx::new(document.name.clone(), doc_index);
            extraction.documents.push(document.name.clone());

            match flow.run(document, &questions, &ctx).await {
                Ok(outcome) => {
                    logging::log_document_complete(doc_index, outcome.aligned.len(), questions.len());
                    raw_answers.push(outcome.raw);
                    extraction.records.extend(outcome.aligned);
                }
                Err(e) => {
                    error!("{} ❌ 合并提问失败: {:#}", ctx, e);
                    extraction.failures.extend(questions.iter().map(|q| FailedPair {
                        document: document.name.clone(),
                        question: q.original.clone(),
                        error: format!("{:#}", e),
                    }));
                }
            }
        }

        self.prepare_output_dir().await?;
        let mut summary = RunSummary {
            documents: extraction.documents.len(),
            answers: extraction.records.len(),
            failed: extraction.failures.len(),
            outputs: Vec::new(),
        };

        let bulk_path = self.output_path(&bulk_file(&self.timestamp));
        spreadsheet_writer::write_bulk(&bulk_path, &raw_answers)?;
        summary.outputs.push(bulk_path);

        self.write_failures(&extraction.failures).await;

        if !extraction.records.is_empty() {
            let matrix = ResultMatrix::pivot(
                &extraction.records,
                &extraction.documents,
                &questions.originals(),
                self.config.duplicate_policy,
            )?;
            let pivot_path = self.output_path(BULK_PIVOTED_FILE);
            spreadsheet_writer::write_pivot(&pivot_path, &matrix)?;
            summary.outputs.push(pivot_path);
        }

        info!("✅ 合并提问模式完成");
        Ok(summary)
    }

    // ========== 格式化模式 ==========

    /// 格式化已有的透视表
    pub async fn run_format(&self) -> Result<RunSummary> {
        let layout = load_report_layout(self.config.column_layout_file.as_deref()).await?;
        let input = self.output_path(PIVOTED_FILE);
        let output = self.output_path(FORMATTED_FILE);

        info!("📄 正在格式化: {}", input.display());
        let formatted = format_report(&input, &output, &layout)?;

        Ok(RunSummary {
            documents: formatted.rows,
            outputs: vec![output],
            ..Default::default()
        })
    }
}
