//! 应用配置
//!
//! 配置在启动时构建一次，之后以只读引用传递，没有任何全局可变状态。
//! 优先级：命令行参数 > 环境变量 > 默认值

use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;

/// 生成引擎类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    /// Ollama 原生接口
    Ollama,
    /// OpenAI 兼容接口
    #[value(name = "openai")]
    OpenAi,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Ollama => write!(f, "ollama"),
            EngineKind::OpenAi => write!(f, "openai"),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone)]
pub struct Config {
    // --- 模型配置 ---
    /// 生成引擎
    pub engine: EngineKind,
    /// 模型名称
    pub model: String,
    /// 采样温度
    pub temperature: f32,
    /// 核采样参数
    pub top_p: f32,

    // --- 分页配置 ---
    /// 每页目标词数
    pub target_words_per_page: usize,
    /// 每页最大词数
    pub max_words_per_page: usize,
    /// 章节标题是否另起新页
    pub preserve_chapter_breaks: bool,

    // --- 风格配置 ---
    /// 目标作者
    pub target_author: String,
    /// 源语言，"auto" 表示自动探测
    pub source_language: String,
    /// 目标语言
    pub target_language: String,
    /// 自定义风格文件
    pub styles_file: Option<PathBuf>,

    // --- 输入输出 ---
    /// 输入文件路径
    pub input_file: PathBuf,
    /// 输出目录
    pub output_dir: PathBuf,
    /// 输出文件名
    pub output_filename: String,
    /// 是否保存思考日志
    pub save_thinking_log: bool,
    /// 思考日志文件名
    pub thinking_log_filename: String,

    // --- 处理选项 ---
    /// 是否流式输出
    pub stream: bool,
    /// 测试模式
    pub test_mode: bool,
    /// 测试模式下处理的页数
    pub test_pages: usize,
    /// 每页最大尝试次数
    pub retry_attempts: usize,
    /// 重试间隔
    pub retry_delay: Duration,
    /// 页间限速间隔
    pub delay_between_pages: Duration,

    // --- 引擎端点 ---
    /// Ollama 服务地址
    pub ollama_host: String,
    /// OpenAI 兼容接口密钥
    pub openai_api_key: String,
    /// OpenAI 兼容接口地址
    pub openai_api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineKind::Ollama,
            model: "qwen3:8b".to_string(),
            temperature: 0.7,
            top_p: 0.9,

            target_words_per_page: 500,
            max_words_per_page: 800,
            preserve_chapter_breaks: true,

            target_author: "Sheila Heti".to_string(),
            source_language: "auto".to_string(),
            target_language: "English".to_string(),
            styles_file: None,

            input_file: PathBuf::new(),
            output_dir: PathBuf::from("./translations"),
            output_filename: String::new(),
            save_thinking_log: true,
            thinking_log_filename: "thinking_log.json".to_string(),

            stream: true,
            test_mode: false,
            test_pages: 5,
            retry_attempts: 3,
            retry_delay: Duration::from_secs(5),
            delay_between_pages: Duration::from_millis(100),

            ollama_host: "http://localhost:11434".to_string(),
            openai_api_key: String::new(),
            openai_api_base: "https://api.openai.com/v1".to_string(),
        }
    }
}

impl Config {
    /// 由命令行参数构建配置
    ///
    /// 引擎端点与密钥只从环境变量读取，默认值不含任何凭据
    pub fn from_cli(cli: Cli) -> Self {
        let default = Config::default();

        Self {
            engine: cli.engine.unwrap_or(default.engine),
            model: cli.model.unwrap_or(default.model),
            temperature: default.temperature,
            top_p: default.top_p,

            target_words_per_page: default.target_words_per_page,
            max_words_per_page: default.max_words_per_page,
            preserve_chapter_breaks: default.preserve_chapter_breaks,

            target_author: cli.author.unwrap_or(default.target_author),
            source_language: cli.source_language.unwrap_or(default.source_language),
            target_language: default.target_language,
            styles_file: cli.styles_file,

            input_file: cli.input_file,
            output_dir: cli.output_dir.unwrap_or(default.output_dir),
            output_filename: cli.output_file,
            save_thinking_log: default.save_thinking_log,
            thinking_log_filename: default.thinking_log_filename,

            stream: !cli.no_stream && default.stream,
            test_mode: cli.test,
            test_pages: cli.pages.unwrap_or(default.test_pages),
            retry_attempts: default.retry_attempts,
            retry_delay: default.retry_delay,
            delay_between_pages: default.delay_between_pages,

            ollama_host: std::env::var("OLLAMA_HOST").unwrap_or(default.ollama_host),
            openai_api_key: std::env::var("OPENAI_API_KEY").unwrap_or(default.openai_api_key),
            openai_api_base: std::env::var("OPENAI_API_BASE").unwrap_or(default.openai_api_base),
        }
    }

    /// 本次运行实际要处理的页数
    pub fn page_limit(&self, total_pages: usize) -> usize {
        if self.test_mode {
            self.test_pages.min(total_pages)
        } else {
            total_pages
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.engine, EngineKind::Ollama);
        assert_eq!(config.model, "qwen3:8b");
        assert_eq!(config.target_words_per_page, 500);
        assert_eq!(config.max_words_per_page, 800);
        assert!(config.preserve_chapter_breaks);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(5));
        assert!(config.stream);
        assert!(!config.test_mode);
        assert!(config.openai_api_key.is_empty());
    }

    #[test]
    fn test_page_limit() {
        let mut config = Config::default();
        assert_eq!(config.page_limit(12), 12);

        config.test_mode = true;
        assert_eq!(config.page_limit(12), 5);
        assert_eq!(config.page_limit(3), 3);
    }

    #[test]
    fn test_from_cli_overrides() {
        let cli = Cli::parse_from([
            "literary_rewriter",
            "in.txt",
            "out.txt",
            "--model",
            "qwen3:14b",
            "--test",
            "--no-stream",
        ]);
        let config = Config::from_cli(cli);

        assert_eq!(config.model, "qwen3:14b");
        assert_eq!(config.input_file, PathBuf::from("in.txt"));
        assert_eq!(config.output_filename, "out.txt");
        assert!(config.test_mode);
        assert!(!config.stream);
        // 未覆盖的选项落回默认值
        assert_eq!(config.target_author, "Sheila Heti");
        assert_eq!(config.test_pages, 5);
    }
}
