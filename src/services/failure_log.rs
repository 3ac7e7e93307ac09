//! 失败页日志
//!
//! 被跳过的页面在 failed_pages.log 里留下一行带时间戳的记录，
//! 方便运行结束后定位并补跑

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// 失败页日志文件名
const FAILURE_LOG_FILENAME: &str = "failed_pages.log";

/// 失败页日志
#[derive(Debug, Clone)]
pub struct FailureLog {
    file_path: PathBuf,
}

impl FailureLog {
    /// 在输出目录下创建日志句柄，文件在首次记录时按需创建
    pub fn new(output_dir: &Path) -> Self {
        Self {
            file_path: output_dir.join(FAILURE_LOG_FILENAME),
        }
    }

    /// 追加一条失败记录
    ///
    /// # 参数
    /// - `page_num`: 页码
    /// - `reason`: 失败原因
    pub async fn record(&self, page_num: usize, reason: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .with_context(|| format!("无法打开失败日志: {}", self.file_path.display()))?;

        writeln!(
            file,
            "[{}] 页 {} 处理失败: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            page_num,
            reason
        )
        .context("写入失败日志失败")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_appends_lines() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or_default();
        let dir = std::env::temp_dir().join(format!("failure_log_{}_{}", std::process::id(), nanos));
        std::fs::create_dir_all(&dir).unwrap();

        let log = FailureLog::new(&dir);
        log.record(2, "连接被拒绝").await.unwrap();
        log.record(5, "超时").await.unwrap();

        let content = std::fs::read_to_string(dir.join(FAILURE_LOG_FILENAME)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("页 2 处理失败: 连接被拒绝"));
        assert!(lines[1].contains("页 5 处理失败: 超时"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
