//! 测试用脚本化引擎
//!
//! 按预设脚本依次回放结果，用于离线验证重试与流水线行为

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{
    Channel, FragmentStream, Generation, GenerationEngine, GenerationRequest, StreamFragment,
};
use crate::error::EngineError;

/// 单次调用的预设结果
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// 返回完整结果
    Success(Generation),
    /// 按分片流返回
    Stream(Vec<StreamFragment>),
    /// 调用失败
    Failure(String),
}

/// 脚本化引擎
///
/// 每次调用消耗脚本中的下一项，脚本耗尽后返回空响应错误
#[derive(Debug, Default)]
pub struct MockEngine {
    script: Mutex<VecDeque<MockOutcome>>,
    calls: AtomicUsize,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一次成功结果
    pub fn with_success(self, thinking: &str, content: &str) -> Self {
        self.push(MockOutcome::Success(Generation {
            thinking: thinking.to_string(),
            content: content.to_string(),
        }))
    }

    /// 追加一次流式结果
    pub fn with_stream(self, fragments: Vec<StreamFragment>) -> Self {
        self.push(MockOutcome::Stream(fragments))
    }

    /// 追加一次失败
    pub fn with_failure(self, message: &str) -> Self {
        self.push(MockOutcome::Failure(message.to_string()))
    }

    /// 已发生的调用次数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn push(self, outcome: MockOutcome) -> Self {
        self.script().push_back(outcome);
        self
    }

    fn next_outcome(&self) -> Option<MockOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script().pop_front()
    }

    fn script(&self) -> MutexGuard<'_, VecDeque<MockOutcome>> {
        match self.script.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl GenerationEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<Generation, EngineError> {
        match self.next_outcome() {
            Some(MockOutcome::Success(generation)) => Ok(generation),
            Some(MockOutcome::Stream(fragments)) => {
                let mut generation = Generation::default();
                for fragment in fragments {
                    match fragment.channel {
                        Channel::Reasoning => generation.thinking.push_str(&fragment.text),
                        Channel::Final => generation.content.push_str(&fragment.text),
                    }
                }
                Ok(generation)
            }
            Some(MockOutcome::Failure(message)) => Err(EngineError::bad_response("mock", message)),
            None => Err(EngineError::empty_response("mock")),
        }
    }

    async fn generate_stream(
        &self,
        _request: &GenerationRequest,
    ) -> Result<FragmentStream, EngineError> {
        match self.next_outcome() {
            Some(MockOutcome::Stream(fragments)) => {
                let items: Vec<Result<StreamFragment, EngineError>> =
                    fragments.into_iter().map(Ok).collect();
                Ok(Box::pin(futures::stream::iter(items)))
            }
            Some(MockOutcome::Success(generation)) => {
                let mut fragments: Vec<Result<StreamFragment, EngineError>> = Vec::new();
                if !generation.thinking.is_empty() {
                    fragments.push(Ok(StreamFragment::reasoning(generation.thinking)));
                }
                if !generation.content.is_empty() {
                    fragments.push(Ok(StreamFragment::final_text(generation.content)));
                }
                Ok(Box::pin(futures::stream::iter(fragments)))
            }
            Some(MockOutcome::Failure(message)) => Err(EngineError::bad_response("mock", message)),
            None => Err(EngineError::empty_response("mock")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            system: "s".to_string(),
            user: "u".to_string(),
        }
    }

    #[test]
    fn test_script_plays_in_order() {
        let engine = MockEngine::new()
            .with_failure("boom")
            .with_success("think", "text");

        let first = tokio_test::block_on(engine.generate(&request()));
        assert!(first.is_err());

        let second = tokio_test::block_on(engine.generate(&request())).unwrap();
        assert_eq!(second.thinking, "think");
        assert_eq!(second.content, "text");
        assert_eq!(engine.call_count(), 2);
    }

    #[test]
    fn test_stream_outcome_accumulates_in_generate() {
        let engine = MockEngine::new().with_stream(vec![
            StreamFragment::reasoning("a"),
            StreamFragment::final_text("b"),
            StreamFragment::final_text("c"),
        ]);

        let generation = tokio_test::block_on(engine.generate(&request())).unwrap();
        assert_eq!(generation.thinking, "a");
        assert_eq!(generation.content, "bc");
    }

    #[test]
    fn test_exhausted_script_is_empty_response() {
        let engine = MockEngine::new();
        let result = tokio_test::block_on(engine.generate(&request()));
        assert!(matches!(result, Err(EngineError::EmptyResponse { .. })));
    }
}
