use crate::config::{Config, EngineKind};
use crate::engine::{GenerationEngine, OllamaEngine, OpenAiEngine};
use crate::models::loaders::{load_document, load_style_file};
use crate::models::{detect_language, Page};
use crate::orchestrator::{Pipeline, RunReport};
use crate::paginator::Paginator;
use crate::prompts::PromptBuilder;
use crate::services::{FailureLog, StreamRecorder, Translator};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    pipeline: Pipeline,
    pages: Vec<Page>,
}

impl App {
    /// 初始化应用：加载输入、分页、装配流水线
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        // 准备输出目录
        tokio::fs::create_dir_all(&config.output_dir)
            .await
            .with_context(|| format!("无法创建输出目录: {}", config.output_dir.display()))?;

        // 加载输入文档
        info!("\n📖 正在加载输入文档...");
        let text = load_document(&config.input_file).await?;
        info!("✓ 已加载 {} 字符", text.chars().count());

        // 自动模式下探测源语言，结果仅用于提示
        if config.source_language == "auto" {
            info!("🔍 探测到的源语言: {}", detect_language(&text));
        }

        // 分页
        let paginator = Paginator::from_config(&config)?;
        let mut pages = paginator.paginate(&text);
        let limit = config.page_limit(pages.len());
        if limit < pages.len() {
            warn!("⚡ 测试模式: 只处理前 {} / {} 页", limit, pages.len());
            pages.truncate(limit);
        }
        info!(
            "📄 共 {} 页待处理，每页约 {} 词",
            pages.len(),
            config.target_words_per_page
        );

        // 加载自定义风格
        let extra_styles = match &config.styles_file {
            Some(path) => load_style_file(path).await?,
            None => HashMap::new(),
        };

        // 装配流水线
        let engine: Arc<dyn GenerationEngine> = match config.engine {
            EngineKind::Ollama => Arc::new(OllamaEngine::new(&config)),
            EngineKind::OpenAi => Arc::new(OpenAiEngine::new(&config)),
        };
        info!("🤖 生成引擎: {} / 模型: {}", engine.name(), config.model);

        let prompts = PromptBuilder::from_config(&config, &extra_styles)?;
        let recorder = StreamRecorder::new(&config.output_dir);
        let translator = Translator::new(engine, prompts, recorder, &config);
        let failure_log = FailureLog::new(&config.output_dir);
        let pipeline = Pipeline::new(translator, failure_log, &config);

        Ok(Self {
            config,
            pipeline,
            pages,
        })
    }

    /// 运行主流程
    pub async fn run(self) -> Result<()> {
        if self.pages.is_empty() {
            warn!("⚠️ 输入文档没有可处理的段落");
        }

        info!("\n{}", "=".repeat(60));
        info!("🚀 开始翻译");
        info!("{}", "=".repeat(60));

        let report = self.pipeline.run(&self.pages).await?;

        print_final_stats(&report, &self.config);
        Ok(())
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 文学翻译与风格重写");
    info!("{}", "=".repeat(60));
    info!("📖 输入: {}", config.input_file.display());
    info!("🤖 模型: {}", config.model);
    info!("📋 目标风格: {}", config.target_author);
    info!(
        "📤 输出: {}",
        config.output_dir.join(&config.output_filename).display()
    );
}

fn print_final_stats(report: &RunReport, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 翻译完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", report.stats.completed, report.stats.total);
    info!("❌ 跳过: {}", report.stats.skipped);
    info!("{}", "=".repeat(60));
    info!("\n译文已保存至: {}", report.output_path.display());
    if config.save_thinking_log {
        info!("📝 思考日志: {}", report.trace_log_path.display());
    }
}
