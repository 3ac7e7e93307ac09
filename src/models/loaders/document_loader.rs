//! 输入文档加载
//!
//! 支持纯文本与 HTML 两类输入，其他后缀按纯文本处理并给出提示。
//! 文件按 UTF-8 宽松解码，非法字节被替换而不是报错。

use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use tracing::info;

use crate::error::FileError;

/// 读取输入文档并返回纯文本内容
///
/// # 参数
/// - `path`: 输入文件路径
///
/// # 返回
/// 返回文档的纯文本内容；HTML 输入会先去除标签并还原实体
pub async fn load_document(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(FileError::not_found(path).into());
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| FileError::read_failed(path, e))?;
    let content = String::from_utf8_lossy(&bytes).into_owned();

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" | "text" => Ok(content),
        "html" | "htm" => strip_html(&content),
        other => {
            info!("📄 未识别的文件后缀 .{}，按纯文本处理", other);
            Ok(content)
        }
    }
}

/// 去除 HTML 标签并还原常见实体
fn strip_html(html: &str) -> Result<String> {
    let tag_pattern = Regex::new(r"<[^>]+>").context("编译HTML标签正则失败")?;
    let text = tag_pattern.replace_all(html, "");
    Ok(unescape_entities(&text))
}

/// 还原常见 HTML 实体
///
/// `&amp;` 必须最后替换，否则 `&amp;lt;` 会被二次解码
fn unescape_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
