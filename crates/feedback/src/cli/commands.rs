//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Interface to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Page number (1-based)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Records per page (defaults to the configured page size)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Only show records containing this text
    #[arg(short = 's', long)]
    pub query: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Submit command arguments.
#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// Submitter's name
    #[arg(short, long)]
    pub name: String,

    /// Submitter's email address
    #[arg(short, long)]
    pub email: String,

    /// The feedback text
    #[arg(short, long)]
    pub message: String,

    /// Output the stored record as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration file
    Validate {
        /// Path to configuration file (defaults to standard location)
        file: Option<PathBuf>,
    },
}
