use anyhow::Result;
use clap::Parser;

use sat_question_generator::cli::Cli;
use sat_question_generator::utils::logging;
use sat_question_generator::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::from_env()?;

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).run(cli.command).await
}
