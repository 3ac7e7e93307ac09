use anyhow::Result;
use clap::Parser;
use literary_rewriter::app::App;
use literary_rewriter::cli::Cli;
use literary_rewriter::config::Config;
use literary_rewriter::logger;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 解析命令行并加载配置
    let config = Config::from_cli(Cli::parse());

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
