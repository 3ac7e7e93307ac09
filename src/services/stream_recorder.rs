//! 流式记录器
//!
//! 为每一页打开两个独立文件，思考与正文各一个；
//! 每个分片写入后立即 flush，进程中断也不丢已到达的内容

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// 流式记录器
#[derive(Debug, Clone)]
pub struct StreamRecorder {
    output_dir: PathBuf,
}

impl StreamRecorder {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 为指定页打开一对记录文件
    ///
    /// 同名旧文件会被截断重建
    pub async fn open(&self, page_num: usize) -> Result<PageSink> {
        let thinking_path = self
            .output_dir
            .join(format!("thinking_page_{}.txt", page_num));
        let content_path = self
            .output_dir
            .join(format!("content_page_{}.txt", page_num));

        let thinking = File::create(&thinking_path)
            .await
            .with_context(|| format!("无法创建思考记录文件: {}", thinking_path.display()))?;
        let content = File::create(&content_path)
            .await
            .with_context(|| format!("无法创建正文记录文件: {}", content_path.display()))?;

        Ok(PageSink { thinking, content })
    }
}

/// 单页的一对记录文件
#[derive(Debug)]
pub struct PageSink {
    thinking: File,
    content: File,
}

impl PageSink {
    /// 追加思考分片并立即落盘
    pub async fn append_thinking(&mut self, text: &str) -> Result<()> {
        self.thinking
            .write_all(text.as_bytes())
            .await
            .context("写入思考记录失败")?;
        self.thinking.flush().await.context("刷新思考记录失败")?;
        Ok(())
    }

    /// 追加正文分片并立即落盘
    pub async fn append_content(&mut self, text: &str) -> Result<()> {
        self.content
            .write_all(text.as_bytes())
            .await
            .context("写入正文记录失败")?;
        self.content.flush().await.context("刷新正文记录失败")?;
        Ok(())
    }

    /// 收尾，确保两份文件都已落盘
    pub async fn finish(mut self) -> Result<()> {
        self.thinking.flush().await.context("刷新思考记录失败")?;
        self.content.flush().await.context("刷新正文记录失败")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or_default();
        let dir = std::env::temp_dir().join(format!("{}_{}_{}", tag, std::process::id(), nanos));
        std::fs::create_dir_all(&dir).expect("创建临时目录失败");
        dir
    }

    #[tokio::test]
    async fn test_fragments_written_per_channel() {
        let dir = temp_dir("recorder_channels");
        let recorder = StreamRecorder::new(&dir);

        let mut sink = recorder.open(7).await.unwrap();
        sink.append_thinking("denk ").await.unwrap();
        sink.append_thinking("nach").await.unwrap();
        sink.append_content("Der Text.").await.unwrap();
        sink.finish().await.unwrap();

        let thinking = std::fs::read_to_string(dir.join("thinking_page_7.txt")).unwrap();
        let content = std::fs::read_to_string(dir.join("content_page_7.txt")).unwrap();
        assert_eq!(thinking, "denk nach");
        assert_eq!(content, "Der Text.");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_reopen_truncates_old_files() {
        let dir = temp_dir("recorder_truncate");
        let recorder = StreamRecorder::new(&dir);

        let mut sink = recorder.open(1).await.unwrap();
        sink.append_content("alter Inhalt").await.unwrap();
        sink.finish().await.unwrap();

        let sink = recorder.open(1).await.unwrap();
        sink.finish().await.unwrap();

        let content = std::fs::read_to_string(dir.join("content_page_1.txt")).unwrap();
        assert!(content.is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_directory_fails() {
        let recorder = StreamRecorder::new("/nonexistent/output/dir");
        assert!(recorder.open(1).await.is_err());
    }
}
