//! 合并提问 - 业务能力层
//!
//! 把一个文档的所有问题拼成一次请求，并把按键返回的 JSON 对齐回问题原文

use crate::models::{AnswerRecord, QuestionSet, QUESTION_PREFIX};
use crate::services::answer_parser::{json_value_text, parse_json_object};

/// 答案键取问题的前几个词
pub const KEY_WORD_COUNT: usize = 10;

/// 问题的对齐键：去掉符号和标点后的前十个词
pub fn question_key(question: &str) -> String {
    question
        .split_whitespace()
        .map(|word| word.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|word| !word.is_empty())
        .take(KEY_WORD_COUNT)
        .collect::<Vec<_>>()
        .join(" ")
}

/// 构建合并提问的用户消息
///
/// 问题列表使用原文，固定前缀只出现一次，否则所有问题的前十个词都相同，
/// 返回的键无法区分。
pub fn build_bulk_prompt(document_text: &str, questions: &QuestionSet) -> String {
    let questions_text = questions
        .iter()
        .map(|q| q.original.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Document:\n{}\n\n{}\n\nPlease answer the following questions:\n{}\n\nProvide the answer in JSON format, and when doing so, include only the first {} words of the question without symbols or punctuation as a key in the JSON, because the outputs will be aggregated later with the same keys from another process and they need to match exactly.",
        document_text, QUESTION_PREFIX, questions_text, KEY_WORD_COUNT
    )
}

/// 把合并回复按键对齐到问题原文
///
/// 回复不是 JSON 对象时返回空列表；键先精确匹配，再按规整后的键忽略大小写匹配，
/// 对不上的键丢弃。
pub fn align_bulk_answers(document: &str, reply: &str, questions: &QuestionSet) -> Vec<AnswerRecord> {
    let Some(map) = parse_json_object(reply) else {
        return Vec::new();
    };

    questions
        .iter()
        .filter_map(|question| {
            let key = question_key(&question.original);
            let value = map.get(&key).or_else(|| {
                map.iter()
                    .find(|(k, _)| question_key(k).eq_ignore_ascii_case(&key))
                    .map(|(_, v)| v)
            })?;
            Some(AnswerRecord::new(
                document,
                question.original.clone(),
                json_value_text(value),
            ))
        })
        .collect()
}
