//! lanotifica CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use lanotifica_cli::cli::{Cli, Command, ConfigAction};
use lanotifica_cli::commands;
use lanotifica_cli::config::ClientConfig;
use lanotifica_cli::error::ClientResult;
use lanotifica_core::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let mut config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };
    config.apply_cli(&cli);

    match cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(),
        },
        Some(Command::Serve) | None => {
            init_tracing(config.tracing_config()?)?;
            commands::serve::run(&config).await
        }
    }
}
