//! 源语言探测
//!
//! 基于常见功能词命中数的朴素判断，结果仅用于启动时的提示输出，
//! 不参与提示词构建

use phf::phf_set;
use std::fmt;

static GERMAN_WORDS: phf::Set<&'static str> = phf_set! {
    "der", "die", "das", "und", "ist", "ein", "nicht", "von",
};

static FRENCH_WORDS: phf::Set<&'static str> = phf_set! {
    "le", "la", "les", "et", "est", "un", "une", "de", "ne", "pas",
};

static SPANISH_WORDS: phf::Set<&'static str> = phf_set! {
    "el", "la", "los", "las", "y", "es", "un", "una", "de", "no",
};

/// 探测到的源语言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedLanguage {
    German,
    French,
    Spanish,
    Unknown,
}

impl fmt::Display for DetectedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DetectedLanguage::German => "German",
            DetectedLanguage::French => "French",
            DetectedLanguage::Spanish => "Spanish",
            DetectedLanguage::Unknown => "Unknown (possibly English or other)",
        };
        write!(f, "{}", name)
    }
}

/// 探测文本的源语言
///
/// 取前 100 个小写分词，分别统计三组功能词的命中数；
/// 仅当某种语言严格领先且命中超过 3 次时才判定，否则返回 Unknown
pub fn detect_language(text: &str) -> DetectedLanguage {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().take(100).collect();

    let german = words.iter().filter(|w| GERMAN_WORDS.contains(**w)).count();
    let french = words.iter().filter(|w| FRENCH_WORDS.contains(**w)).count();
    let spanish = words.iter().filter(|w| SPANISH_WORDS.contains(**w)).count();

    if german > french.max(spanish) && german > 3 {
        DetectedLanguage::German
    } else if french > german.max(spanish) && french > 3 {
        DetectedLanguage::French
    } else if spanish > german.max(french) && spanish > 3 {
        DetectedLanguage::Spanish
    } else {
        DetectedLanguage::Unknown
    }
}
