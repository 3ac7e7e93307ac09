//! 风格文件加载
//!
//! 用户可通过 TOML 文件补充或覆盖内置的作者风格描述：
//!
//! ```toml
//! [styles]
//! "Clarice Lispector" = "Write in short, trembling sentences ..."
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// 风格文件的顶层结构
#[derive(Debug, Deserialize)]
struct StyleFile {
    /// 作者名 -> 风格描述
    #[serde(default)]
    styles: HashMap<String, String>,
}

/// 从 TOML 文件加载作者风格表
///
/// # 参数
/// - `path`: 风格文件路径
///
/// # 返回
/// 返回作者名到风格描述的映射
pub async fn load_style_file(path: &Path) -> Result<HashMap<String, String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取风格文件: {}", path.display()))?;

    let file: StyleFile = toml::from_str(&content)
        .with_context(|| format!("解析风格文件失败: {}", path.display()))?;

    info!("✓ 已加载 {} 个自定义作者风格", file.styles.len());
    Ok(file.styles)
}
