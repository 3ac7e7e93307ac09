//! 工具模块
//!
//! 与业务无关的通用辅助函数

pub mod text;

// 重新导出主要函数
pub use text::{char_prefix, truncate_text};
