/// LLM 调用方式
///
/// 部分模型只接受单条用户消息，并且拒绝采样参数；
/// 每个模型在配置时确定一次，调用处只看这个枚举。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStyle {
    /// 只有用户消息，不带采样参数
    Simple,
    /// 系统消息 + 用户消息 + 固定采样参数
    Standard,
}

impl CallStyle {
    pub fn for_model(model: &str, simplified_models: &[String]) -> Self {
        if simplified_models.iter().any(|m| m == model) {
            CallStyle::Simple
        } else {
            CallStyle::Standard
        }
    }
}

/// 固定的采样参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub max_tokens: u32,
}

impl SamplingParams {
    /// 确定性采样
    pub fn deterministic(max_tokens: u32) -> Self {
        Self {
            temperature: 0.0,
            top_p: 0.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_selected_by_model_id() {
        let simplified = vec!["o1-preview".to_string(), "o1-mini".to_string()];
        assert_eq!(CallStyle::for_model("o1-mini", &simplified), CallStyle::Simple);
        assert_eq!(CallStyle::for_model("gpt-4o", &simplified), CallStyle::Standard);
        // 只做精确匹配
        assert_eq!(CallStyle::for_model("o1", &simplified), CallStyle::Standard);
    }
}
