use std::collections::HashMap;

/// 每个参数问题前附加的固定指令
pub const QUESTION_PREFIX: &str = "After having gone through the PDF/document above, extract the specific parameter outlined below based on the contextual description/information accompanying it, and always replying strictly as outlined in the Output Format below.";

/// 单个问题
///
/// `prompt` 是实际发送给 LLM 的文本（带前缀），`original` 是表格中的原文，
/// 输出报表只使用原文。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    pub original: String,
}

impl Question {
    pub fn with_prefix(prefix: &str, original: impl Into<String>) -> Self {
        let original = original.into();
        Self {
            prompt: format!("{}{}", prefix, original),
            original,
        }
    }
}

/// 一次运行使用的问题集合
///
/// 保留 prompt → 原文 的反向映射，供并发结果回填时使用。
#[derive(Debug, Clone, Default)]
pub struct QuestionSet {
    questions: Vec<Question>,
    mapping: HashMap<String, String>,
}

impl QuestionSet {
    /// 使用默认前缀构建
    pub fn new<I, S>(originals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_prefix(QUESTION_PREFIX, originals)
    }

    pub fn with_prefix<I, S>(prefix: &str, originals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let questions: Vec<Question> = originals
            .into_iter()
            .map(|q| Question::with_prefix(prefix, q))
            .collect();
        let mapping = questions
            .iter()
            .map(|q| (q.prompt.clone(), q.original.clone()))
            .collect();
        Self { questions, mapping }
    }

    /// 根据 prompt 找回原文
    pub fn original_for(&self, prompt: &str) -> Option<&str> {
        self.mapping.get(prompt).map(String::as_str)
    }

    pub fn prompts(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(|q| q.prompt.as_str())
    }

    pub fn originals(&self) -> Vec<String> {
        self.questions.iter().map(|q| q.original.clone()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
