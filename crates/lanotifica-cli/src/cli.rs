//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// lanotifica - Phone notifications on your desktop
#[derive(Debug, Parser)]
#[command(name = "lanotifica")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "LANOTIFICA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Listen address (":port", "port" or "host:port")
    #[arg(long, short, env = "LANOTIFICA_LISTEN")]
    pub listen: Option<String>,

    /// Do not advertise the relay over mDNS
    #[arg(long)]
    pub no_advertise: bool,

    /// Directory holding per-package icons
    #[arg(long)]
    pub icon_dir: Option<PathBuf>,

    /// Log output format (pretty, compact or json)
    #[arg(long)]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the relay (default)
    Serve,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Dump,
    /// Validate the configuration
    Validate,
    /// Show the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["lanotifica"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.no_advertise);
    }

    #[test]
    fn parses_flags_and_subcommands() {
        let cli = Cli::try_parse_from([
            "lanotifica",
            "-v",
            "--listen",
            ":8080",
            "--no-advertise",
            "--log-format",
            "json",
            "config",
            "dump",
        ])
        .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.listen.as_deref(), Some(":8080"));
        assert!(cli.no_advertise);
        assert_eq!(cli.log_format.as_deref(), Some("json"));
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Dump
            })
        ));
    }
}
