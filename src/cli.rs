//! 命令行参数
//!
//! 两个位置参数加少量可选项，未指定的选项落回配置默认值

use clap::Parser;
use std::path::PathBuf;

use crate::config::EngineKind;

/// 文学翻译与风格重写工具
#[derive(Debug, Parser)]
#[command(name = "literary_rewriter", version, about = "把文学文本逐页翻译并重写为指定作者的风格")]
pub struct Cli {
    /// 输入文本文件路径（.txt / .html，其他后缀按纯文本处理）
    pub input_file: PathBuf,

    /// 输出文件名，生成在输出目录下
    pub output_file: String,

    /// 使用的模型
    #[arg(long)]
    pub model: Option<String>,

    /// 目标作者风格
    #[arg(long)]
    pub author: Option<String>,

    /// 生成引擎
    #[arg(long, value_enum)]
    pub engine: Option<EngineKind>,

    /// 源语言，"auto" 表示自动探测
    #[arg(long)]
    pub source_language: Option<String>,

    /// 自定义作者风格文件（TOML）
    #[arg(long)]
    pub styles_file: Option<PathBuf>,

    /// 输出目录
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// 测试模式：只处理前几页
    #[arg(long)]
    pub test: bool,

    /// 测试模式下处理的页数
    #[arg(long)]
    pub pages: Option<usize>,

    /// 关闭流式输出，一次性取回完整结果
    #[arg(long)]
    pub no_stream: bool,
}
