//! 翻译流水线
//!
//! 严格串行地遍历页面：翻译成功立即把译文追加到产物文件并落盘，
//! 有思考内容时重写思考日志快照；任何单页错误只导致该页被跳过

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::models::{Page, TraceRecord};
use crate::services::{FailureLog, Translator};
use crate::utils::truncate_text;

/// 运行统计
#[derive(Debug, Clone, Copy, Default)]
pub struct RunStats {
    /// 成功页数
    pub completed: usize,
    /// 跳过页数
    pub skipped: usize,
    /// 总页数
    pub total: usize,
}

/// 一次运行的结果
#[derive(Debug)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub trace_log_path: PathBuf,
    pub stats: RunStats,
}

/// 翻译流水线
pub struct Pipeline {
    translator: Translator,
    failure_log: FailureLog,
    save_thinking_log: bool,
    delay_between_pages: Duration,
    output_path: PathBuf,
    trace_log_path: PathBuf,
}

impl Pipeline {
    pub fn new(translator: Translator, failure_log: FailureLog, config: &Config) -> Self {
        Self {
            translator,
            failure_log,
            save_thinking_log: config.save_thinking_log,
            delay_between_pages: config.delay_between_pages,
            output_path: config.output_dir.join(&config.output_filename),
            trace_log_path: config.output_dir.join(&config.thinking_log_filename),
        }
    }

    /// 依次处理全部页面
    ///
    /// 产物文件在循环开始前一次性创建，创建失败是致命错误；
    /// 循环内的任何单页错误都不会中断运行
    pub async fn run(&self, pages: &[Page]) -> Result<RunReport> {
        let total = pages.len();
        let mut outfile = File::create(&self.output_path)
            .await
            .with_context(|| format!("无法创建输出文件: {}", self.output_path.display()))?;

        let mut trace_log: Vec<TraceRecord> = Vec::new();
        let mut stats = RunStats {
            total,
            ..Default::default()
        };

        for (index, page) in pages.iter().enumerate() {
            let page_num = index + 1;
            log_page_start(page_num, total, page);

            match self
                .process_page(&mut outfile, &mut trace_log, page, page_num, total)
                .await
            {
                Ok(()) => stats.completed += 1,
                Err(e) => {
                    error!("❌ [页 {}] 处理失败: {:#}", page_num, e);
                    info!("⏭️ [页 {}] 跳过，继续后续页面", page_num);
                    if let Err(log_err) =
                        self.failure_log.record(page_num, &format!("{:#}", e)).await
                    {
                        warn!("⚠️ 记录失败日志时出错: {:#}", log_err);
                    }
                    stats.skipped += 1;
                }
            }

            // 页间限速，最后一页之后不再等待
            if page_num < total {
                sleep(self.delay_between_pages).await;
            }
        }

        Ok(RunReport {
            output_path: self.output_path.clone(),
            trace_log_path: self.trace_log_path.clone(),
            stats,
        })
    }

    /// 处理单页：翻译、追加产物、更新思考日志
    ///
    /// 返回错误即视为该页失败，由调用方跳过；
    /// 失败的页对产物文件和思考日志均无贡献
    async fn process_page(
        &self,
        outfile: &mut File,
        trace_log: &mut Vec<TraceRecord>,
        page: &Page,
        page_num: usize,
        total: usize,
    ) -> Result<()> {
        let result = self.translator.translate_page(page, page_num, total).await?;

        self.append_translation(outfile, &result.translation, page_num)
            .await
            .context("写入产物文件失败")?;

        if self.save_thinking_log && !result.thinking.is_empty() {
            trace_log.push(TraceRecord::new(page_num, page, &result));
            self.save_trace_log(trace_log)
                .await
                .context("写入思考日志失败")?;
        }

        Ok(())
    }

    /// 追加一页译文并立即落盘，第二页起先写分隔空行
    async fn append_translation(
        &self,
        outfile: &mut File,
        translation: &str,
        page_num: usize,
    ) -> Result<()> {
        if page_num > 1 {
            outfile.write_all(b"\n\n").await?;
        }
        outfile.write_all(translation.as_bytes()).await?;
        outfile.flush().await?;
        Ok(())
    }

    /// 重写思考日志快照（完整 JSON 数组，而非追加式日志）
    async fn save_trace_log(&self, trace_log: &[TraceRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(trace_log)?;
        tokio::fs::write(&self.trace_log_path, json).await?;
        debug!("📝 思考日志已保存: {} 条记录", trace_log.len());
        Ok(())
    }
}

// ========== 日志辅助函数 ==========

fn log_page_start(page_num: usize, total: usize, page: &Page) {
    info!("{}", "─".repeat(60));
    info!(
        "📄 [页 {}/{}] 开始处理，原文 {} 词",
        page_num, total, page.word_count
    );
    debug!(
        "  原文开头: {}",
        truncate_text(&page.text.replace('\n', " "), 100)
    );
}
