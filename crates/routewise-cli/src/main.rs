mod cli;
mod commands;
mod completions;
mod config;
mod error;
mod output;
mod paths;
mod setup;

use anyhow::Result;
use clap::Parser;
use cli::{ChatArgs, Cli, Commands};
use config::RoutewiseConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        error::handle_error(err);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Some(Commands::Completions { shell }) = cli.command {
        completions::write_completions(shell, &mut std::io::stdout());
        return Ok(());
    }

    let config = RoutewiseConfig::load(cli.config.as_deref())?;
    // Flushes the log file on drop
    let _guard = init_logging(cli.verbose)?;

    match cli.command.unwrap_or(Commands::Chat(ChatArgs::default())) {
        Commands::Chat(args) => commands::chat::run(&config, args).await,
        Commands::Ask(args) => commands::ask::run(&config, args, cli.format).await,
        Commands::Ingest(args) => commands::ingest::run(&config, args, cli.format).await,
        Commands::Completions { .. } => Ok(()),
    }
}

/// Log to a daily file so output never interleaves with chat text.
fn init_logging(verbose: bool) -> Result<WorkerGuard> {
    let log_dir = paths::logs_dir()?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "routewise.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .init();

    Ok(guard)
}
