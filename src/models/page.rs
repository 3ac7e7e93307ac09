//! 页面数据模型
//!
//! 定义分页结果、单页翻译结果与思考日志记录

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::{char_prefix, truncate_text};

/// 思考日志中摘要字段的长度（字符数）
const PREVIEW_CHARS: usize = 200;

/// 单个页面：若干完整段落的组合
///
/// 段落之间以空行分隔，段落内部永不截断
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 页面文本
    pub text: String,
    /// 按空白分词统计的词数
    pub word_count: usize,
}

impl Page {
    /// 由段落列表构造页面
    pub fn from_paragraphs(paragraphs: &[&str]) -> Self {
        let text = paragraphs.join("\n\n");
        let word_count = text.split_whitespace().count();
        Self { text, word_count }
    }

    /// 遍历页面内的段落
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.text.split("\n\n")
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} 词]", truncate_text(&self.text, 80), self.word_count)
    }
}

/// 单页翻译结果
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    /// 清洗后的译文正文
    pub translation: String,
    /// 模型的完整思考内容，可能为空
    pub thinking: String,
}

/// 思考日志中的单条记录
///
/// 字段名即磁盘 JSON 格式，摘要字段截取前 200 字符
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRecord {
    /// 页码，从 1 开始
    pub page: usize,
    /// 原文摘要
    pub original_preview: String,
    /// 完整思考内容
    pub thinking: String,
    /// 译文摘要
    pub translation_preview: String,
}

impl TraceRecord {
    /// 由页面与翻译结果构造记录
    pub fn new(page_num: usize, page: &Page, result: &PageResult) -> Self {
        Self {
            page: page_num,
            original_preview: char_prefix(&page.text, PREVIEW_CHARS),
            thinking: result.thinking.clone(),
            translation_preview: char_prefix(&result.translation, PREVIEW_CHARS),
        }
    }
}
