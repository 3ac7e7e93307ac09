//! 翻译服务
//!
//! 逐页向生成引擎发起请求：构建提示词、消费流式分片、
//! 失败后按固定间隔重试、清洗译文里的模板化开场白

use anyhow::{Context, Result};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::{Channel, Generation, GenerationEngine, GenerationRequest};
use crate::models::{Page, PageResult};
use crate::prompts::PromptBuilder;
use crate::services::stream_recorder::StreamRecorder;
use crate::utils::truncate_text;

/// 译文开头可能出现的模板化开场白，按序尝试，至多剥除一个
const BOILERPLATE_PREFIXES: [&str; 4] = [
    "Here is the translation:",
    "Translation:",
    "Here's the text translated",
    "Translated text:",
];

/// 翻译服务
pub struct Translator {
    engine: Arc<dyn GenerationEngine>,
    prompts: PromptBuilder,
    recorder: StreamRecorder,
    retry_attempts: usize,
    retry_delay: Duration,
    stream: bool,
}

impl Translator {
    pub fn new(
        engine: Arc<dyn GenerationEngine>,
        prompts: PromptBuilder,
        recorder: StreamRecorder,
        config: &Config,
    ) -> Self {
        Self {
            engine,
            prompts,
            recorder,
            retry_attempts: config.retry_attempts,
            retry_delay: config.retry_delay,
            stream: config.stream,
        }
    }

    /// 翻译单个页面
    ///
    /// 每次重试发起完全相同的请求，重试间隔固定；
    /// 预算用尽后返回最后一次的错误
    pub async fn translate_page(
        &self,
        page: &Page,
        page_num: usize,
        total_pages: usize,
    ) -> Result<PageResult> {
        let request = GenerationRequest {
            system: self.prompts.system(),
            user: self.prompts.user(&page.text),
        };

        let mut attempts = 0;
        loop {
            let outcome = if self.stream {
                self.run_streaming(&request, page_num).await
            } else {
                self.run_oneshot(&request).await
            };

            match outcome {
                Ok(generation) => {
                    let result = PageResult {
                        translation: clean_translation(&generation.content),
                        thinking: generation.thinking,
                    };
                    log_page_done(page_num, total_pages, &result);
                    return Ok(result);
                }
                Err(e) => {
                    attempts += 1;
                    warn!(
                        "  ⚠️ [页 {}] 第 {}/{} 次尝试失败: {:#}",
                        page_num, attempts, self.retry_attempts, e
                    );
                    if attempts < self.retry_attempts {
                        info!("  ⏳ {:.1} 秒后重试...", self.retry_delay.as_secs_f32());
                        sleep(self.retry_delay).await;
                    } else {
                        return Err(e).with_context(|| {
                            format!("页 {} 重试 {} 次后仍失败", page_num, self.retry_attempts)
                        });
                    }
                }
            }
        }
    }

    /// 流式执行：每个分片先落盘再进内存缓冲
    async fn run_streaming(
        &self,
        request: &GenerationRequest,
        page_num: usize,
    ) -> Result<Generation> {
        let mut fragments = self
            .engine
            .generate_stream(request)
            .await
            .with_context(|| format!("引擎 {} 建立流式请求失败", self.engine.name()))?;

        let mut sink = self.recorder.open(page_num).await?;
        let mut generation = Generation::default();
        let mut reasoning_started = false;
        let mut final_started = false;

        while let Some(fragment) = fragments.next().await {
            let fragment = fragment.context("读取流式分片失败")?;
            match fragment.channel {
                Channel::Reasoning => {
                    if !reasoning_started {
                        info!("  🧠 [页 {}] 思考流开始", page_num);
                        reasoning_started = true;
                    }
                    sink.append_thinking(&fragment.text).await?;
                    generation.thinking.push_str(&fragment.text);
                }
                Channel::Final => {
                    if !final_started {
                        info!("  ✍️ [页 {}] 正文流开始", page_num);
                        final_started = true;
                    }
                    sink.append_content(&fragment.text).await?;
                    generation.content.push_str(&fragment.text);
                }
            }
        }

        sink.finish().await?;
        Ok(generation)
    }

    /// 非流式执行
    async fn run_oneshot(&self, request: &GenerationRequest) -> Result<Generation> {
        self.engine
            .generate(request)
            .await
            .with_context(|| format!("引擎 {} 生成失败", self.engine.name()))
    }
}

/// 清洗译文开头的模板化开场白
///
/// 至多剥除一个前缀，比较不区分 ASCII 大小写。
/// 前缀全部是 ASCII，按字节长度截断不会落在字符中间
pub fn clean_translation(raw: &str) -> String {
    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();

    for prefix in BOILERPLATE_PREFIXES {
        if bytes.len() >= prefix.len()
            && bytes[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
        {
            return trimmed[prefix.len()..].trim_start().to_string();
        }
    }

    trimmed.to_string()
}

// ========== 日志辅助函数 ==========

fn log_page_done(page_num: usize, total_pages: usize, result: &PageResult) {
    info!(
        "  ✓ [页 {}/{}] 翻译完成，译文 {} 字符",
        page_num,
        total_pages,
        result.translation.chars().count()
    );
    debug!(
        "  📊 [页 {}] 思考 {} 字符",
        page_num,
        result.thinking.chars().count()
    );
    if !result.thinking.is_empty() {
        info!(
            "  💡 [页 {}] 思考摘要: {}",
            page_num,
            truncate_text(&result.thinking, 100)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MockEngine;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn temp_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or_default();
        let dir = std::env::temp_dir().join(format!("{}_{}_{}", tag, std::process::id(), nanos));
        std::fs::create_dir_all(&dir).expect("创建临时目录失败");
        dir
    }

    fn test_translator(engine: Arc<MockEngine>, dir: &Path, stream: bool) -> Translator {
        let mut config = Config::default();
        config.retry_delay = Duration::from_millis(1);
        config.stream = stream;
        let prompts =
            PromptBuilder::from_config(&config, &HashMap::new()).expect("构建提示词失败");
        Translator::new(engine, prompts, StreamRecorder::new(dir), &config)
    }

    #[test]
    fn test_clean_translation_strips_known_prefix() {
        assert_eq!(clean_translation("Translation: Der Text."), "Der Text.");
        assert_eq!(
            clean_translation("Here is the translation:\nDer Text."),
            "Der Text."
        );
    }

    #[test]
    fn test_clean_translation_case_insensitive() {
        assert_eq!(clean_translation("TRANSLATION: laut"), "laut");
        assert_eq!(clean_translation("translated TEXT: leise"), "leise");
    }

    #[test]
    fn test_clean_translation_strips_at_most_one() {
        assert_eq!(
            clean_translation("Translation: Translation: doppelt"),
            "Translation: doppelt"
        );
    }

    #[test]
    fn test_clean_translation_untouched_without_prefix() {
        assert_eq!(clean_translation("  Ohne Vorspann.  "), "Ohne Vorspann.");
    }

    #[test]
    fn test_clean_translation_prefix_only() {
        assert_eq!(clean_translation("Translation:"), "");
    }

    #[tokio::test]
    async fn test_retry_until_success() {
        let dir = temp_dir("translator_retry");
        let mock = Arc::new(
            MockEngine::new()
                .with_failure("kaputt")
                .with_failure("wieder kaputt")
                .with_success("überlegt", "Translation: Am Ende klappt es."),
        );
        let translator = test_translator(mock.clone(), &dir, false);
        let page = Page::from_paragraphs(&["Der Satz."]);

        let result = translator.translate_page(&page, 1, 1).await.unwrap();
        assert_eq!(result.translation, "Am Ende klappt es.");
        assert_eq!(result.thinking, "überlegt");
        assert_eq!(mock.call_count(), 3);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_retry_budget_exhausted() {
        let dir = temp_dir("translator_exhausted");
        let mock = Arc::new(
            MockEngine::new()
                .with_failure("1")
                .with_failure("2")
                .with_failure("3")
                .with_failure("4"),
        );
        let translator = test_translator(mock.clone(), &dir, false);
        let page = Page::from_paragraphs(&["Der Satz."]);

        let result = translator.translate_page(&page, 1, 1).await;
        assert!(result.is_err());
        // 预算固定为 3 次，第 4 项脚本不应被消耗
        assert_eq!(mock.call_count(), 3);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_streaming_records_fragments() {
        use crate::engine::StreamFragment;

        let dir = temp_dir("translator_stream");
        let mock = Arc::new(MockEngine::new().with_stream(vec![
            StreamFragment::reasoning("erst "),
            StreamFragment::reasoning("denken"),
            StreamFragment::final_text("dann "),
            StreamFragment::final_text("schreiben"),
        ]));
        let translator = test_translator(mock, &dir, true);
        let page = Page::from_paragraphs(&["Der Satz."]);

        let result = translator.translate_page(&page, 1, 1).await.unwrap();
        assert_eq!(result.thinking, "erst denken");
        assert_eq!(result.translation, "dann schreiben");

        let thinking = std::fs::read_to_string(dir.join("thinking_page_1.txt")).unwrap();
        let content = std::fs::read_to_string(dir.join("content_page_1.txt")).unwrap();
        assert_eq!(thinking, "erst denken");
        assert_eq!(content, "dann schreiben");

        std::fs::remove_dir_all(&dir).ok();
    }
}
