//! 文本工具模块
//!
//! 提供日志预览和摘要截取的辅助函数

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
///
/// # 返回
/// 返回截断后的文本，超长时以 "..." 结尾
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

/// 截取文本的前 N 个字符
///
/// 与 [`truncate_text`] 不同，不附加省略号；按字符截取，
/// 多字节字符不会被从中间截断。
///
/// # 参数
/// - `text`: 原始文本
/// - `max_chars`: 最大字符数
pub fn char_prefix(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
