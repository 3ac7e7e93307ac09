//! 分页器
//!
//! 把整篇文档切分为词数有界的页面序列：
//! - 按空行切分段落，段落永不从中间截断
//! - 词数达到 target 后在下一段边界收页，将要超过 max 则提前收页
//! - 超长单段独立成页，保持完整
//! - 可选识别 Chapter/Part 标题，标题强制另起新页

use anyhow::{Context, Result};
use regex::Regex;

use crate::config::Config;
use crate::models::Page;

/// 段落分隔：一个或多个空行，空行内允许空白字符
const PARAGRAPH_SPLIT_PATTERN: &str = r"\n\s*\n+";

/// 结构性标题：Chapter/Part 加阿拉伯数字或罗马数字，标题词大小写不敏感
const BREAK_PATTERN: &str = r"^(?i:chapter|part)\s+[0-9IVXLCDM]+";

/// 文档分页器
#[derive(Debug)]
pub struct Paginator {
    target_words: usize,
    max_words: usize,
    preserve_breaks: bool,
    paragraph_splitter: Regex,
    break_pattern: Regex,
}

impl Paginator {
    /// 创建分页器
    ///
    /// # 参数
    /// - `target_words`: 每页目标词数，达到即在下一段边界收页
    /// - `max_words`: 每页最大词数，将要超过则提前收页
    /// - `preserve_breaks`: 是否让章节标题另起新页
    pub fn new(target_words: usize, max_words: usize, preserve_breaks: bool) -> Result<Self> {
        let paragraph_splitter =
            Regex::new(PARAGRAPH_SPLIT_PATTERN).context("编译段落分隔正则失败")?;
        let break_pattern = Regex::new(BREAK_PATTERN).context("编译章节标题正则失败")?;

        Ok(Self {
            target_words,
            max_words,
            preserve_breaks,
            paragraph_splitter,
            break_pattern,
        })
    }

    /// 按配置创建分页器
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.target_words_per_page,
            config.max_words_per_page,
            config.preserve_chapter_breaks,
        )
    }

    /// 把文档切分为页面序列
    ///
    /// 每个段落完整地落在恰好一个页面中，顺序与原文一致；
    /// 单段超过 max 时该段独立成页
    pub fn paginate(&self, text: &str) -> Vec<Page> {
        let mut pages = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_words = 0usize;

        for paragraph in self.paragraph_splitter.split(text.trim()) {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            let words = paragraph.split_whitespace().count();

            if self.preserve_breaks && self.break_pattern.is_match(paragraph) {
                // 章节标题另起新页
                if !current.is_empty() {
                    pages.push(Page::from_paragraphs(&current));
                    current.clear();
                }
                current.push(paragraph);
                current_words = words;
            } else if current_words + words > self.max_words && !current.is_empty() {
                pages.push(Page::from_paragraphs(&current));
                current.clear();
                current.push(paragraph);
                current_words = words;
            } else if current_words >= self.target_words && !current.is_empty() {
                pages.push(Page::from_paragraphs(&current));
                current.clear();
                current.push(paragraph);
                current_words = words;
            } else {
                current.push(paragraph);
                current_words += words;
            }
        }

        if !current.is_empty() {
            pages.push(Page::from_paragraphs(&current));
        }

        pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_target_and_max_thresholds() {
        // 300+250 词在 max 之内且越过 target，第三段另起新页
        let text = format!("{}\n\n{}\n\n{}", words(300), words(250), words(100));
        let paginator = Paginator::new(500, 800, true).unwrap();
        let pages = paginator.paginate(&text);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].word_count, 550);
        assert_eq!(pages[1].word_count, 100);
    }

    #[test]
    fn test_target_threshold_flushes_at_boundary() {
        let text = format!("{}\n\n{}", words(500), words(10));
        let paginator = Paginator::new(500, 800, true).unwrap();
        let pages = paginator.paginate(&text);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].word_count, 500);
        assert_eq!(pages[1].word_count, 10);
    }

    #[test]
    fn test_no_blank_lines_yields_single_page() {
        // 没有空行就只有一个段落，即使远超 max 也保持完整
        let paginator = Paginator::new(500, 800, true).unwrap();
        let pages = paginator.paginate(&words(2000));

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].word_count, 2000);
    }

    #[test]
    fn test_oversized_paragraph_flushes_previous_page() {
        let text = format!("{}\n\n{}\n\n{}", words(100), words(1000), words(100));
        let paginator = Paginator::new(500, 800, true).unwrap();
        let pages = paginator.paginate(&text);

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1].word_count, 1000);
    }

    #[test]
    fn test_chapter_heading_starts_new_page() {
        let text = format!("{}\n\nChapter 3\n\n{}", words(50), words(50));
        let paginator = Paginator::new(500, 800, true).unwrap();
        let pages = paginator.paginate(&text);

        assert_eq!(pages.len(), 2);
        assert!(pages[1].text.starts_with("Chapter 3"));
    }

    #[test]
    fn test_heading_case_insensitive() {
        let paginator = Paginator::new(500, 800, true).unwrap();
        for heading in ["Chapter 3", "chapter 12", "CHAPTER 7", "Part IV", "PART IX", "part 2"] {
            let text = format!("{}\n\n{}", words(10), heading);
            let pages = paginator.paginate(&text);
            assert_eq!(pages.len(), 2, "标题应另起新页: {}", heading);
        }
    }

    #[test]
    fn test_heading_must_lead_paragraph() {
        let paginator = Paginator::new(500, 800, true).unwrap();
        let text = format!("{}\n\nChapters 3 were long\n\nthe chapter was short", words(10));
        let pages = paginator.paginate(&text);

        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_breaks_disabled() {
        let paginator = Paginator::new(500, 800, false).unwrap();
        let text = format!("{}\n\nChapter 3", words(10));
        let pages = paginator.paginate(&text);

        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_paragraphs_preserved_in_order() {
        let paragraphs: Vec<String> = (0..40)
            .map(|i| format!("paragraph {} {}", i, words(30)))
            .collect();
        let text = paragraphs.join("\n\n");
        let paginator = Paginator::new(100, 150, true).unwrap();
        let pages = paginator.paginate(&text);

        let rejoined: Vec<&str> = pages.iter().flat_map(|p| p.paragraphs()).collect();
        let original: Vec<&str> = paragraphs.iter().map(String::as_str).collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn test_pages_respect_max_words() {
        let paragraphs: Vec<String> = (0..60).map(|i| words(20 + (i * 7) % 90)).collect();
        let text = paragraphs.join("\n\n");
        let paginator = Paginator::new(200, 300, true).unwrap();

        for page in paginator.paginate(&text) {
            assert!(
                page.word_count <= 300 || page.paragraphs().count() == 1,
                "页面超限且非单段: {} 词",
                page.word_count
            );
        }
    }

    #[test]
    fn test_empty_input() {
        let paginator = Paginator::new(500, 800, true).unwrap();
        assert!(paginator.paginate("").is_empty());
        assert!(paginator.paginate("   \n\n  \n ").is_empty());
    }

    #[test]
    fn test_blank_lines_with_spaces_split_paragraphs() {
        let paginator = Paginator::new(500, 800, true).unwrap();
        let text = "erster Absatz\n   \n\nzweiter Absatz";
        let pages = paginator.paginate(text);

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].paragraphs().count(), 2);
    }
}
