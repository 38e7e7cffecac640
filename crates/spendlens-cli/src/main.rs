//! SpendLens CLI - Spending pattern analyzer
//!
//! Usage:
//!   spendlens patterns --file expenses.csv          Show spending patterns
//!   spendlens insights --file expenses.csv          Show budget insights
//!   spendlens report --expenses e.csv --income i.csv Full analytics dashboard
//!   spendlens config                                Show effective config

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let opts = cli.options();

    match cli.command {
        Commands::Patterns { file } => commands::cmd_patterns(&file, &opts),
        Commands::Insights { file } => commands::cmd_insights(&file, &opts),
        Commands::Report {
            expenses,
            income,
            top,
        } => commands::cmd_report(&expenses, income.as_deref(), top, &opts),
        Commands::Config => commands::cmd_config(&opts),
    }
}
