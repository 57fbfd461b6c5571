//! `feedbackd` - CLI for the feedback service
//!
//! Runs the HTTP server and gives direct access to the record store.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use feedback::cli::{Cli, Command, ConfigCommand, ListCommand, StatsCommand, SubmitCommand};
use feedback::record::NewFeedback;
use feedback::storage::{FeedbackStore, PageRequest};
use feedback::{init_logging, server, Config, Validator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let mut config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Serve(cmd) => {
            if let Some(host) = cmd.host {
                config.server.host = host;
            }
            if let Some(port) = cmd.port {
                config.server.port = port;
            }
            config.validate()?;
            server::serve(&config).await?;
        }
        Command::List(cmd) => handle_list(&config, &cmd)?,
        Command::Submit(cmd) => handle_submit(&config, cmd)?,
        Command::Stats(cmd) => handle_stats(&config, &cmd)?,
        Command::Config(cmd) => handle_config(&config, cmd)?,
    }
    Ok(())
}

fn open_store(config: &Config) -> anyhow::Result<FeedbackStore> {
    let path = config.data_path();
    FeedbackStore::open(&path).with_context(|| format!("opening store at {}", path.display()))
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let request = PageRequest::from_config(Some(cmd.page), cmd.limit, &config.pagination);

    let page = match &cmd.query {
        Some(query) => store.search(query, request)?,
        None => store.list(request)?,
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    if page.data.is_empty() {
        println!("No feedback found.");
    }
    for record in &page.data {
        println!(
            "#{}  {}  {} <{}>",
            record.id,
            record.date.format("%Y-%m-%d %H:%M"),
            record.name,
            record.email
        );
        println!("    {}", record.message.trim());
        println!();
    }
    println!(
        "Page {} of {} ({} total){}",
        page.pagination.current_page,
        page.pagination.total_pages.max(1),
        page.total,
        if page.pagination.has_more {
            ", more available"
        } else {
            ""
        }
    );
    Ok(())
}

fn handle_submit(config: &Config, cmd: SubmitCommand) -> anyhow::Result<()> {
    let validator = Validator::new(&config.validation);
    let fields = validator.validate(NewFeedback::new(cmd.name, cmd.email, cmd.message))?;

    let store = open_store(config)?;
    let record = store.append(fields)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("Stored feedback #{} at {}", record.id, record.date.to_rfc3339());
    }
    Ok(())
}

fn handle_stats(config: &Config, cmd: &StatsCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let stats = store.stats()?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let show = |date: Option<chrono::DateTime<chrono::Utc>>| {
        date.map_or_else(|| "-".to_string(), |d| d.to_rfc3339())
    };

    println!("feedbackd stats");
    println!("---------------");
    println!("Store:         {}", store.path().display());
    println!("Records:       {}", stats.total_records);
    println!("Newest:        {}", show(stats.newest_record));
    println!("Oldest:        {}", show(stats.oldest_record));
    println!("File size:     {} bytes", stats.file_size_bytes);
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Host:               {}", config.server.host);
                println!("  Port:               {}", config.server.port);
                println!(
                    "  Allowed origins:    {}",
                    config.server.allowed_origins.join(", ")
                );
                println!();
                println!("[Storage]");
                println!("  Data path:          {}", config.data_path().display());
                println!();
                println!("[Pagination]");
                println!("  Default limit:      {}", config.pagination.default_limit);
                println!("  Max limit:          {}", config.pagination.max_limit);
                println!();
                println!("[Validation]");
                println!(
                    "  Min message length: {}",
                    config.validation.min_message_length
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
