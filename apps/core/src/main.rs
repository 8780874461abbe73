// wordmix entry point
// Word shuffler with root-aware exclusion, chat dispatcher and request history.

mod actors;
mod cli;
mod commands;
mod config;
mod database;
mod engine;
mod error;
mod fs_manager;
mod logging;
mod models;
mod prompt;
mod rate_limiter;

#[cfg(test)]
mod tests;

use actors::dispatcher::DispatcherHandle;
use anyhow::Context;
use clap::Parser;
use cli::{ChatArgs, Cli, Commands, HistoryArgs, ProcessArgs};
use config::AppConfig;
use engine::ProcessResponse;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env().context("failed to load configuration")?;
    logging::init_tracing(logging::level_from_verbosity(cli.verbose), config.log_format);

    match cli.command {
        Commands::Process(args) => run_process(args).await,
        Commands::Chat(args) => run_chat(&config, args).await,
        Commands::History(args) => run_history(&config, args).await,
    }
}

async fn run_process(args: ProcessArgs) -> anyhow::Result<()> {
    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read text from stdin")?;
            buf
        }
    };

    let outcome = engine::process(&text, &args.exclude);

    if args.json {
        println!("{}", serde_json::to_string(&ProcessResponse::from(outcome))?);
        return Ok(());
    }

    let outcome = outcome?;
    println!("{}", outcome.text());
    Ok(())
}

async fn run_chat(config: &AppConfig, args: ChatArgs) -> anyhow::Result<()> {
    let pool = if args.no_history {
        None
    } else {
        match database::init_db(&config.db_path).await {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!("History disabled, failed to open database: {}", e);
                None
            }
        }
    };

    let dispatcher = DispatcherHandle::new(config, pool);
    info!(user = %args.user, "Chat session started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match dispatcher.handle_input(args.user.clone(), line).await {
            Ok(reply) => println!("{}\n", reply),
            Err(e) => println!("Ошибка: {}\n", e),
        }
    }

    dispatcher.shutdown().await;
    Ok(())
}

async fn run_history(config: &AppConfig, args: HistoryArgs) -> anyhow::Result<()> {
    let pool = database::init_db(&config.db_path)
        .await
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let entries = database::get_user_history(&pool, &args.user, args.limit).await?;
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
