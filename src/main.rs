use clap::Parser;
use std::path::PathBuf;
use taskbot_lib::config::{Config, TransportKind, DEFAULT_CONFIG_PATH};

#[derive(Parser)]
#[command(name = "taskbot")]
#[command(version)]
#[command(about = "Chat tutor with array and arithmetic exercises")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short, env = "TASKBOT_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Chat on stdin/stdout instead of connecting to Telegram
    #[arg(long)]
    console: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    if cli.console {
        config.transport.kind = TransportKind::Console;
    }
    let config = config.validated()?;

    taskbot_lib::logging::init(&config.logging)?;
    taskbot_lib::run(config).await
}
