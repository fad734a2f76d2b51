use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use webgames_tools::config::{Config, CONFIG_FILE};
use webgames_tools::models::TaskKind;
use webgames_tools::orchestrator::{FormGenerator, ViewerApp};
use webgames_tools::utils::logging;

#[derive(Parser, Debug)]
#[command(name = "webgames-tools", version, about = "WebGames 数据集查看与答题卡生成")]
struct Cli {
    /// 配置文件路径
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// 显示详细日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 浏览回合数据集（.jsonl）
    View {
        /// 数据集路径，默认取配置中的 default_dataset_path
        path: Option<PathBuf>,

        /// 任务类型，不指定时从路径推断
        #[arg(short, long)]
        task: Option<TaskKind>,
    },
    /// 根据挑战列表生成 Google Forms 答题卡
    Form {
        /// 挑战列表文件
        #[arg(long)]
        challenges: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(&cli.config)?;
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logging::init(config.verbose_logging);

    match cli.command {
        Command::View { path, task } => {
            logging::log_startup("view");
            let mut app = ViewerApp::initialize(&config, path, task)?;
            let stdin = std::io::stdin();
            app.run(stdin.lock(), std::io::stdout())?;
        }
        Command::Form { challenges } => {
            logging::log_startup("form");
            if let Some(challenges) = challenges {
                config.challenges_file = challenges;
            }
            FormGenerator::new(config).run().await?;
        }
    }

    Ok(())
}
