//! Command-line interface for the feedback service.
//!
//! This module provides the CLI structure for the `feedbackd` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{ConfigCommand, ListCommand, ServeCommand, StatsCommand, SubmitCommand};

/// feedbackd - Collect and browse feedback
///
/// Serves the feedback submission API and gives command-line access to the
/// stored records.
#[derive(Debug, Parser)]
#[command(name = "feedbackd")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// List stored feedback, newest first
    List(ListCommand),

    /// Validate and store a feedback entry
    Submit(SubmitCommand),

    /// Show store statistics
    Stats(StatsCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Stats(StatsCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "feedbackd");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from(["feedbackd", "serve", "--host", "127.0.0.1", "-p", "8080"])
            .unwrap();
        match cli.command {
            Command::Serve(cmd) => {
                assert_eq!(cmd.host.as_deref(), Some("127.0.0.1"));
                assert_eq!(cmd.port, Some(8080));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["feedbackd", "list"]).unwrap();
        match cli.command {
            Command::List(cmd) => {
                assert_eq!(cmd.page, 1);
                assert!(cmd.limit.is_none());
                assert!(cmd.query.is_none());
                assert!(!cmd.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_with_search() {
        let cli =
            Cli::try_parse_from(["feedbackd", "list", "-s", "checkout", "-l", "5", "-p", "2"])
                .unwrap();
        match cli.command {
            Command::List(cmd) => {
                assert_eq!(cmd.query.as_deref(), Some("checkout"));
                assert_eq!(cmd.limit, Some(5));
                assert_eq!(cmd.page, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_submit() {
        let cli = Cli::try_parse_from([
            "feedbackd",
            "submit",
            "--name",
            "Ann",
            "--email",
            "ann@x.com",
            "--message",
            "Great service, thank you!",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Submit(_)));
    }

    #[test]
    fn test_parse_submit_requires_fields() {
        assert!(Cli::try_parse_from(["feedbackd", "submit", "--name", "Ann"]).is_err());
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = Cli::try_parse_from(["feedbackd", "config", "validate", "/tmp/c.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli =
            Cli::try_parse_from(["feedbackd", "-c", "/custom/config.toml", "stats"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_quiet() {
        let cli = Cli::try_parse_from(["feedbackd", "-q", "stats"]).unwrap();
        assert!(cli.quiet);
    }
}
