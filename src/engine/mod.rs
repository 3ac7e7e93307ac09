//! 生成引擎层
//!
//! 对外暴露统一的 [`GenerationEngine`] 接口，屏蔽具体后端差异：
//! - `ollama` - Ollama 原生 /api/chat 接口，支持思考流
//! - `openai` - OpenAI 兼容的 chat completions 接口
//! - `mock` - 测试用脚本化引擎
//!
//! 思考内容与正文在整个流水线中始终是两条独立通道

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::EngineError;

pub mod mock;
pub mod ollama;
pub mod openai;

// 重新导出主要类型
pub use mock::{MockEngine, MockOutcome};
pub use ollama::OllamaEngine;
pub use openai::OpenAiEngine;

/// 单次生成请求
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// 系统提示词
    pub system: String,
    /// 用户提示词
    pub user: String,
}

/// 输出通道
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// 模型的思考过程
    Reasoning,
    /// 最终正文
    Final,
}

/// 流式输出的一个分片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFragment {
    pub channel: Channel,
    pub text: String,
}

impl StreamFragment {
    pub fn reasoning(text: impl Into<String>) -> Self {
        Self {
            channel: Channel::Reasoning,
            text: text.into(),
        }
    }

    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            channel: Channel::Final,
            text: text.into(),
        }
    }
}

/// 一次完整生成的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    /// 思考内容，可能为空
    pub thinking: String,
    /// 正文内容
    pub content: String,
}

/// 分片流，按到达顺序产出
pub type FragmentStream = BoxStream<'static, Result<StreamFragment, EngineError>>;

/// 生成引擎统一接口
#[async_trait]
pub trait GenerationEngine: Send + Sync {
    /// 引擎名称，用于日志与错误信息
    fn name(&self) -> &str;

    /// 一次性生成完整结果
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, EngineError>;

    /// 流式生成
    async fn generate_stream(
        &self,
        request: &GenerationRequest,
    ) -> Result<FragmentStream, EngineError>;
}
