//! LLM 后端 - 基础设施层
//!
//! 持有 HTTP 客户端，只暴露"发送一次对话请求"的能力
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务都可以通过 `api_base` 接入

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use std::future::Future;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::models::SamplingParams;

/// 一次对话请求
///
/// `sampling` 为 `None` 时不携带任何采样参数（精简调用）。
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub system_message: Option<String>,
    pub user_message: String,
    pub sampling: Option<SamplingParams>,
}

/// 对话后端
///
/// 返回模型回复的原始文本。测试里用计数或固定回复的替身实现。
pub trait ChatBackend: Send + Sync + 'static {
    fn complete(&self, request: ChatRequest) -> impl Future<Output = Result<String>> + Send;
}

/// 基于 async-openai 的后端
pub struct OpenAiBackend {
    client: Client<OpenAIConfig>,
}

impl OpenAiBackend {
    pub fn new(api_key: &str, api_base_url: &str) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base_url);

        Self {
            client: Client::with_config(openai_config),
        }
    }
}

impl ChatBackend for OpenAiBackend {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        debug!("调用 LLM API，模型: {}", request.model);
        debug!("用户消息长度: {} 字符", request.user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = &request.system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg.as_str())
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user_message.as_str())
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&request.model).messages(messages);

        if let Some(sampling) = request.sampling {
            #[allow(deprecated)]
            builder
                .temperature(sampling.temperature)
                .top_p(sampling.top_p)
                .frequency_penalty(sampling.frequency_penalty)
                .presence_penalty(sampling.presence_penalty)
                .max_tokens(sampling.max_tokens)
                .response_format(ResponseFormat::Text);
        }

        let chat_request = builder.build()?;

        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::EmptyContent {
                model: request.model.clone(),
            })?;

        Ok(content)
    }
}
