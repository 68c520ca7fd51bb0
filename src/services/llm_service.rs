//! LLM 服务 - 业务能力层
//!
//! 只负责"按某种调用方式问一次模型"，不关心文档和问题从哪里来

use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use crate::infrastructure::{ChatBackend, ChatRequest};
use crate::models::{CallStyle, SamplingParams};

/// LLM 服务
///
/// 职责：
/// - 固定一个模型和它的调用方式
/// - Standard 方式带系统消息和确定性采样参数
/// - Simple 方式只发用户消息
pub struct LlmService<B: ChatBackend> {
    backend: Arc<B>,
    model_name: String,
    style: CallStyle,
    max_tokens: u32,
}

impl<B: ChatBackend> LlmService<B> {
    /// 创建新的 LLM 服务
    ///
    /// 调用方式由模型名在这里确定一次
    pub fn new(
        backend: Arc<B>,
        model_name: impl Into<String>,
        simplified_models: &[String],
        max_tokens: u32,
    ) -> Self {
        let model_name = model_name.into();
        let style = CallStyle::for_model(&model_name, simplified_models);
        Self {
            backend,
            model_name,
            style,
            max_tokens,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn style(&self) -> CallStyle {
        self.style
    }

    /// 按调用方式组装请求
    pub fn build_request(&self, user_message: &str, system_message: Option<&str>) -> ChatRequest {
        match self.style {
            CallStyle::Simple => ChatRequest {
                model: self.model_name.clone(),
                system_message: None,
                user_message: user_message.to_string(),
                sampling: None,
            },
            CallStyle::Standard => ChatRequest {
                model: self.model_name.clone(),
                system_message: system_message.map(str::to_string),
                user_message: user_message.to_string(),
                sampling: Some(SamplingParams::deterministic(self.max_tokens)),
            },
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（Simple 方式下忽略）
    ///
    /// # 返回
    /// 返回去掉首尾空白的回复
    pub async fn send_to_llm(&self, user_message: &str, system_message: Option<&str>) -> Result<String> {
        debug!("调用 LLM，模型: {}，方式: {:?}", self.model_name, self.style);

        let request = self.build_request(user_message, system_message);
        let content = self.backend.complete(request).await?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// 记录收到的请求，回复固定文本
    #[derive(Default)]
    struct RecordingBackend {
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ChatBackend for RecordingBackend {
        async fn complete(&self, request: ChatRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request);
            Ok("  \n{\"Yield\": \"5 tons\"}\n ".to_string())
        }
    }

    fn simplified() -> Vec<String> {
        vec!["o1-preview".to_string(), "o1-mini".to_string()]
    }

    #[tokio::test]
    async fn test_standard_call_shape() {
        let backend = Arc::new(RecordingBackend::default());
        let service = LlmService::new(backend.clone(), "gpt-4o", &simplified(), 2048);

        let reply = service.send_to_llm("hello", Some("system")).await.unwrap();
        assert_eq!(reply, "{\"Yield\": \"5 tons\"}");

        let requests = backend.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.system_message.as_deref(), Some("system"));
        let sampling = request.sampling.expect("Standard 方式应携带采样参数");
        assert_eq!(sampling.temperature, 0.0);
        assert_eq!(sampling.top_p, 0.0);
        assert_eq!(sampling.max_tokens, 2048);
    }

    #[tokio::test]
    async fn test_simple_call_shape_drops_system_and_sampling() {
        let backend = Arc::new(RecordingBackend::default());
        let service = LlmService::new(backend.clone(), "o1-preview", &simplified(), 2048);
        assert_eq!(service.style(), CallStyle::Simple);

        service.send_to_llm("hello", Some("system")).await.unwrap();

        let requests = backend.requests.lock().unwrap();
        assert!(requests[0].system_message.is_none());
        assert!(requests[0].sampling.is_none());
        assert_eq!(requests[0].user_message, "hello");
    }
}
