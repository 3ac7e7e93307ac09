//! 加载器模块
//!
//! 把磁盘上的输入文件转换为内存数据结构

pub mod document_loader;
pub mod style_loader;

// 重新导出主要函数
pub use document_loader::load_document;
pub use style_loader::load_style_file;
