use thiserror::Error;

/// 应用程序错误类型
///
/// 只收录调用方可能需要区分处理的领域错误；I/O 与第三方库错误
/// 通过 `anyhow::Context` 携带文件路径等上下文向上传递。
#[derive(Debug, Error)]
pub enum AppError {
    /// 透视时同一 (文档, 问题) 出现多次
    #[error("透视失败: 文档 '{document}' 的问题 '{question}' 出现了多个答案")]
    PivotCollision { document: String, question: String },

    /// 问题行为空
    #[error("问题表格 {path} 第 {row} 行没有可用的问题")]
    EmptyQuestionRow { path: String, row: u32 },

    /// 表格中没有工作表
    #[error("表格文件 {path} 中没有工作表")]
    NoWorksheet { path: String },

    /// PDF 文本提取失败
    #[error("PDF 文本提取失败 ({path}): {message}")]
    PdfExtract { path: String, message: String },

    /// LLM 返回结果为空
    #[error("LLM 返回内容为空 (模型: {model})")]
    EmptyContent { model: String },

    /// 环境变量取值非法
    #[error("环境变量 {var_name} 的值 '{value}' 无法识别")]
    InvalidConfig { var_name: String, value: String },
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
