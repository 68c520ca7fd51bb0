//! 回复解析 - 业务能力层
//!
//! 只负责把 LLM 的原始回复变成一个单元格的值

use regex::Regex;
use serde_json::{Map, Value as JsonValue};
use std::sync::LazyLock;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("代码块正则无效")
});

/// 如果文本中有 Markdown 代码块，只保留代码块内部的内容
///
/// 没有代码块时原样返回，因此对已去掉代码块的文本重复调用结果不变。
pub fn strip_code_fences(text: &str) -> &str {
    match CODE_FENCE.captures(text).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str(),
        None => text,
    }
}

/// 把回复解析为一层的 JSON 对象（保留键的顺序）
pub fn parse_json_object(text: &str) -> Option<Map<String, JsonValue>> {
    match serde_json::from_str::<JsonValue>(strip_code_fences(text)) {
        Ok(JsonValue::Object(map)) => Some(map),
        _ => None,
    }
}

/// JSON 值转单元格文本：字符串取内容，其他类型取 JSON 文本
pub fn json_value_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 从回复中取出答案
///
/// 1. 去掉代码块
/// 2. 尝试按 JSON 对象解析
/// 3. 返回第一个键对应的值
///
/// 解析失败或对象为空时返回原始回复。
pub fn extract_first_value(response_text: &str) -> String {
    parse_json_object(response_text)
        .and_then(|map| map.values().next().map(json_value_text))
        .unwrap_or_else(|| response_text.to_string())
}
