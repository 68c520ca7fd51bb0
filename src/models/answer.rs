/// 单个 (文档, 问题) 的答案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub document: String,
    /// 问题原文（不带前缀）
    pub question: String,
    pub answer: String,
}

impl AnswerRecord {
    pub fn new(
        document: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            document: document.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// 调用失败而被丢弃的 (文档, 问题)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPair {
    pub document: String,
    pub question: String,
    pub error: String,
}

/// 合并提问模式下一个文档的原始回复
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkAnswer {
    pub document: String,
    pub answers: String,
}
