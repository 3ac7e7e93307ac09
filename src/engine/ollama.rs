//! Ollama 引擎
//!
//! 通过 Ollama 原生 /api/chat 接口调用思考模型。
//! 流式模式下响应为 NDJSON，每行一个 JSON 对象，
//! 思考与正文是对象里两个独立的增量字段。

use async_stream::try_stream;
use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;

use super::{FragmentStream, Generation, GenerationEngine, GenerationRequest, StreamFragment};
use crate::config::Config;
use crate::error::EngineError;

const ENGINE_NAME: &str = "ollama";

/// Ollama 引擎
#[derive(Debug, Clone)]
pub struct OllamaEngine {
    client: reqwest::Client,
    host: String,
    model: String,
    temperature: f32,
    top_p: f32,
}

/// /api/chat 响应中的消息体
#[derive(Debug, Deserialize)]
struct ChunkMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    thinking: Option<String>,
}

/// /api/chat 的单个响应对象，流式模式下每行一个
#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    message: Option<ChunkMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

impl OllamaEngine {
    /// 创建引擎
    ///
    /// 客户端不设超时：思考模型生成一页可能需要数分钟
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: config.ollama_host.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
        }
    }

    fn chat_body(&self, request: &GenerationRequest, stream: bool) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "think": true,
            "stream": stream,
            "options": {
                "temperature": self.temperature,
                "top_p": self.top_p,
            },
        })
    }

    async fn post_chat(
        &self,
        request: &GenerationRequest,
        stream: bool,
    ) -> Result<reqwest::Response, EngineError> {
        let response = self
            .client
            .post(format!("{}/api/chat", self.host))
            .json(&self.chat_body(request, stream))
            .send()
            .await
            .map_err(|e| EngineError::request_failed(ENGINE_NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::bad_response(
                ENGINE_NAME,
                format!("HTTP {}: {}", status, body),
            ));
        }
        Ok(response)
    }
}

#[async_trait]
impl GenerationEngine for OllamaEngine {
    fn name(&self) -> &str {
        ENGINE_NAME
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, EngineError> {
        let response = self.post_chat(request, false).await?;
        let chunk: ChatChunk = response
            .json()
            .await
            .map_err(|e| EngineError::request_failed(ENGINE_NAME, e))?;

        if let Some(error) = chunk.error {
            return Err(EngineError::bad_response(ENGINE_NAME, error));
        }

        let message = chunk
            .message
            .ok_or_else(|| EngineError::empty_response(ENGINE_NAME))?;

        Ok(Generation {
            thinking: message.thinking.unwrap_or_default(),
            content: message.content.unwrap_or_default(),
        })
    }

    async fn generate_stream(
        &self,
        request: &GenerationRequest,
    ) -> Result<FragmentStream, EngineError> {
        let response = self.post_chat(request, true).await?;
        let mut bytes = response.bytes_stream();

        let stream = try_stream! {
            let mut buffer: Vec<u8> = Vec::new();
            let mut finished = false;

            'read: while let Some(chunk) = bytes.next().await {
                let chunk = chunk.map_err(EngineError::stream_interrupted)?;
                buffer.extend_from_slice(&chunk);

                // 按行切出完整的 JSON 对象
                while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    let line = String::from_utf8_lossy(&line);
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let parsed: ChatChunk =
                        serde_json::from_str(line).map_err(EngineError::chunk_parse_failed)?;

                    if let Some(error) = parsed.error {
                        Err(EngineError::bad_response(ENGINE_NAME, error))?;
                    }

                    if let Some(message) = parsed.message {
                        if let Some(thinking) = message.thinking {
                            if !thinking.is_empty() {
                                yield StreamFragment::reasoning(thinking);
                            }
                        }
                        if let Some(content) = message.content {
                            if !content.is_empty() {
                                yield StreamFragment::final_text(content);
                            }
                        }
                    }

                    if parsed.done {
                        finished = true;
                        break 'read;
                    }
                }
            }

            // 服务端没有以换行结尾时，缓冲区里可能剩下最后一个对象
            if !finished {
                let tail = String::from_utf8_lossy(&buffer);
                let tail = tail.trim().to_string();
                if !tail.is_empty() {
                    let parsed: ChatChunk =
                        serde_json::from_str(&tail).map_err(EngineError::chunk_parse_failed)?;

                    if let Some(error) = parsed.error {
                        Err(EngineError::bad_response(ENGINE_NAME, error))?;
                    }

                    if let Some(message) = parsed.message {
                        if let Some(thinking) = message.thinking {
                            if !thinking.is_empty() {
                                yield StreamFragment::reasoning(thinking);
                            }
                        }
                        if let Some(content) = message.content {
                            if !content.is_empty() {
                                yield StreamFragment::final_text(content);
                            }
                        }
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stream_chunk() {
        let line = r#"{"model":"qwen3:8b","message":{"role":"assistant","content":"","thinking":"Let me"},"done":false}"#;
        let chunk: ChatChunk = serde_json::from_str(line).unwrap();

        let message = chunk.message.unwrap();
        assert_eq!(message.thinking.as_deref(), Some("Let me"));
        assert_eq!(message.content.as_deref(), Some(""));
        assert!(!chunk.done);
    }

    #[test]
    fn test_parse_done_chunk() {
        let line = r#"{"model":"qwen3:8b","message":{"role":"assistant","content":""},"done":true,"total_duration":12345}"#;
        let chunk: ChatChunk = serde_json::from_str(line).unwrap();
        assert!(chunk.done);
    }

    #[test]
    fn test_parse_error_chunk() {
        let line = r#"{"error":"model not found"}"#;
        let chunk: ChatChunk = serde_json::from_str(line).unwrap();
        assert_eq!(chunk.error.as_deref(), Some("model not found"));
    }

    #[test]
    fn test_chat_body_shape() {
        let engine = OllamaEngine::new(&Config::default());
        let request = GenerationRequest {
            system: "sys".to_string(),
            user: "usr".to_string(),
        };
        let body = engine.chat_body(&request, true);

        assert_eq!(body["model"], "qwen3:8b");
        assert_eq!(body["think"], true);
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "usr");
    }

    #[test]
    fn test_host_trailing_slash_trimmed() {
        let mut config = Config::default();
        config.ollama_host = "http://localhost:11434/".to_string();
        let engine = OllamaEngine::new(&config);
        assert_eq!(engine.host, "http://localhost:11434");
    }
}
