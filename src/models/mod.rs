//! 数据模型层
//!
//! 定义贯穿整个流水线的数据结构与输入加载器：
//! - `page` - 页面、翻译结果与思考日志记录
//! - `language` - 朴素的源语言探测
//! - `loaders` - 输入文档与风格文件的加载

pub mod language;
pub mod loaders;
pub mod page;

// 重新导出主要类型
pub use language::{detect_language, DetectedLanguage};
pub use page::{Page, PageResult, TraceRecord};
