//! 提示词构建
//!
//! 系统与用户提示词模板，以及内置作者风格表。
//! 作者风格可由外部风格文件补充或覆盖，语言与作者在启动时一次性解析。

use anyhow::{bail, Result};
use phf::phf_map;
use std::collections::HashMap;

use crate::config::Config;

/// 内置作者风格表
pub static AUTHOR_STYLES: phf::Map<&'static str, &'static str> = phf_map! {
    "Sheila Heti" => "Write with a searching, self-aware energy that continually questions its own motives and hesitations, layering confession with detour, and detour with revelation. Let the sentences wander toward discovery, refusing neatness, sometimes exposing the scaffolding of thought, sometimes tumbling into lyric candor. The tone should feel both intimate and estranged, as though the act of writing is simultaneously creating and undoing the world it describes.",
    "Karl Ove Knausgård" => "Write in long, patient sentences that accumulate the small matter of daily life until it turns luminous, mixing banal detail with sudden essayistic digression. Let memory and the present moment bleed into one another without ceremony, and keep the gaze steady even when the material turns painful or embarrassing. The prose should feel unguarded and exhaustive, as though nothing were too minor to be written down.",
};

/// 提示词构建器
///
/// 持有解析完成的作者、风格与语言设置，构建提示词时只做纯文本拼装
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    target_author: String,
    author_style: String,
    source_language: String,
    target_language: String,
}

impl PromptBuilder {
    /// 根据配置与自定义风格表构建
    ///
    /// # 参数
    /// - `config`: 全局配置
    /// - `extra_styles`: 风格文件中的自定义条目，优先于内置表
    ///
    /// # 返回
    /// 作者既不在自定义表也不在内置表中时返回错误
    pub fn from_config(config: &Config, extra_styles: &HashMap<String, String>) -> Result<Self> {
        let author = config.target_author.as_str();
        let author_style = match extra_styles.get(author) {
            Some(style) => style.clone(),
            None => match AUTHOR_STYLES.get(author) {
                Some(style) => (*style).to_string(),
                None => bail!("未知的作者风格: {}，可通过风格文件提供", author),
            },
        };

        // "auto" 模式下提示词不指名源语言
        let source_language = if config.source_language == "auto" {
            "the source language".to_string()
        } else {
            config.source_language.clone()
        };

        Ok(Self {
            target_author: config.target_author.clone(),
            author_style,
            source_language,
            target_language: config.target_language.clone(),
        })
    }

    /// 系统提示词
    pub fn system(&self) -> String {
        format!(
            r#"You are a master literary translator and writer with deep expertise in {target_author}'s distinctive writing style. Your task is to translate and rewrite the given text from {source_language} into {target_language}, capturing not just the meaning but transforming it into {target_author}'s unique voice and style.

ALL OUTPUT WORDS MUST BE IN ENGLISH

CRITICAL INSTRUCTIONS:
- Output ONLY the translated and rewritten text
- Use no formatting markers, no titles, no metadata
- Do not add explanatory notes or commentary
- Do not ask questions or make suggestions
- Simply produce the raw literary text in the target style
- Maintain paragraph breaks as in the original
- This is creative literary translation, not literal translation
- Preserve paragraph breaks, but do not preserve line breaks (do not break sentences)
- ALL OUTPUT WORDS MUST BE IN ENGLISH"#,
            target_author = self.target_author,
            source_language = self.source_language,
            target_language = self.target_language,
        )
    }

    /// 用户提示词，嵌入当前页原文
    pub fn user(&self, page_text: &str) -> String {
        format!(
            r#"Translate and rewrite the following text into {target_language} in the distinctive style of {target_author}. Remember: output ONLY the translated literary text, nothing else.

ALL OUTPUT WORDS MUST BE IN ENGLISH

This is not a mechanical act of carrying words across borders, but a re-imagining in which the story is pressed through a new consciousness. The text should emerge altered, like fabric washed and wrung out until the weave shows different patterns of light. It must not only reproduce meaning but metabolize it, carrying the marks of the present voice, the accidents of choice, the inevitable distortions that become its signature.

{target_author_style}

Original text:
---
{text}
---

ALL OUTPUT WORDS MUST BE IN ENGLISH

Now produce the translation in {target_author}'s style:"#,
            target_author = self.target_author,
            target_author_style = self.author_style,
            target_language = self.target_language,
            text = page_text,
        )
    }
}
