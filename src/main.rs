use anyhow::{Context, Result, bail};
use clap::Parser;
use leylo::config::load_config;
use leylo::generator::OpenAiGenerator;
use leylo::telegram::TelegramChannel;
use leylo::thread::ThreadManager;
use leylo::utils::get_leylo_home;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "leylo", version = leylo::VERSION, about = "Group-chat assistant bot for Telegram")]
struct Cli {
    /// Path to config.json (defaults to ~/.leylo/config.json)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".parse().unwrap());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    if config.telegram.bot_token.is_empty() {
        bail!("No Telegram bot token configured (telegram.botToken or TELEGRAM_BOT_TOKEN)");
    }

    let threads_dir = get_leylo_home()?.join("threads");
    let store = Arc::new(
        ThreadManager::new(threads_dir).context("Failed to initialize the thread store")?,
    );

    let generator = Arc::new(OpenAiGenerator::new(
        &config.generator.api_base,
        &config.generator.api_key,
        &config.generator.model,
        config.generator.max_tokens,
        config.generator.temperature,
    ));

    info!("leylo {} starting", leylo::VERSION);
    let channel = Arc::new(TelegramChannel::new(&config.telegram.bot_token));
    channel.dispatch(store, generator).await
}
