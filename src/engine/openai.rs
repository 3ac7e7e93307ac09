//! OpenAI 兼容引擎
//!
//! 通过 chat completions 接口一次性生成。思考模型把思考内容包在
//! `<think>` 标签里时会被拆到独立通道。该接口不提供思考流，
//! `generate_stream` 把完整结果退化为至多两个分片。

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

use super::{FragmentStream, Generation, GenerationEngine, GenerationRequest, StreamFragment};
use crate::config::Config;
use crate::error::EngineError;

const ENGINE_NAME: &str = "openai";

/// OpenAI 兼容引擎
pub struct OpenAiEngine {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    top_p: f32,
}

impl OpenAiEngine {
    pub fn new(config: &Config) -> Self {
        let api_config = OpenAIConfig::new()
            .with_api_key(&config.openai_api_key)
            .with_api_base(&config.openai_api_base);

        Self {
            client: Client::with_config(api_config),
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
        }
    }

    fn build_messages(
        request: &GenerationRequest,
    ) -> Result<Vec<ChatCompletionRequestMessage>, EngineError> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system.clone())
            .build()
            .map_err(|e| EngineError::request_failed(ENGINE_NAME, e))?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user.clone())
            .build()
            .map_err(|e| EngineError::request_failed(ENGINE_NAME, e))?;

        Ok(vec![system.into(), user.into()])
    }
}

/// 拆分 `<think>` 标签包裹的思考内容
///
/// 没有成对标签时思考为空，原文仅去除首尾空白
fn split_think_tags(raw: &str) -> Generation {
    if let (Some(start), Some(end)) = (raw.find("<think>"), raw.find("</think>")) {
        if end > start {
            let thinking = raw[start + "<think>".len()..end].trim().to_string();
            let mut content = String::new();
            content.push_str(&raw[..start]);
            content.push_str(&raw[end + "</think>".len()..]);
            return Generation {
                thinking,
                content: content.trim().to_string(),
            };
        }
    }

    Generation {
        thinking: String::new(),
        content: raw.trim().to_string(),
    }
}

#[async_trait]
impl GenerationEngine for OpenAiEngine {
    fn name(&self) -> &str {
        ENGINE_NAME
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, EngineError> {
        let messages = Self::build_messages(request)?;
        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .top_p(self.top_p)
            .build()
            .map_err(|e| EngineError::request_failed(ENGINE_NAME, e))?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| EngineError::request_failed(ENGINE_NAME, e))?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| EngineError::empty_response(ENGINE_NAME))?;

        Ok(split_think_tags(&content))
    }

    async fn generate_stream(
        &self,
        request: &GenerationRequest,
    ) -> Result<FragmentStream, EngineError> {
        let generation = self.generate(request).await?;

        let mut fragments: Vec<Result<StreamFragment, EngineError>> = Vec::new();
        if !generation.thinking.is_empty() {
            fragments.push(Ok(StreamFragment::reasoning(generation.thinking)));
        }
        if !generation.content.is_empty() {
            fragments.push(Ok(StreamFragment::final_text(generation.content)));
        }
        Ok(Box::pin(futures::stream::iter(fragments)))
    }
}
