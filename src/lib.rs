//! # Literary Rewriter
//!
//! 把公版文学文本逐页翻译并重写为指定作者风格的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Engine）
//! - `engine/` - 生成引擎的统一接口与具体后端
//! - `OllamaEngine` - Ollama 原生接口，思考与正文双通道流式
//! - `OpenAiEngine` - OpenAI 兼容接口
//! - `MockEngine` - 测试用脚本化引擎
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个 Page
//! - `Translator` - 单页翻译能力，含重试与译文清洗
//! - `StreamRecorder` - 思考/正文分片的逐页落盘能力
//! - `FailureLog` - 失败页记录能力
//!
//! ### ③ 算法与数据层（Models）
//! - `paginator` - 段落完整的词数分页
//! - `prompts` - 提示词模板与作者风格表
//! - `models/` - 页面、思考日志记录、语言探测、输入加载
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/pipeline` - 串行页面流水线，落盘与统计
//! - `app` - 装配各层并驱动整次运行
//!
//! ## 模块结构

pub mod app;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod paginator;
pub mod prompts;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use cli::Cli;
pub use config::{Config, EngineKind};
pub use engine::{
    Channel, FragmentStream, Generation, GenerationEngine, GenerationRequest, MockEngine,
    OllamaEngine, OpenAiEngine, StreamFragment,
};
pub use error::{EngineError, FileError};
pub use models::{detect_language, DetectedLanguage, Page, PageResult, TraceRecord};
pub use orchestrator::{Pipeline, RunReport, RunStats};
pub use paginator::Paginator;
pub use prompts::PromptBuilder;
pub use services::{clean_translation, FailureLog, StreamRecorder, Translator};
