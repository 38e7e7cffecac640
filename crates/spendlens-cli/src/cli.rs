//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SpendLens - Understand where your money goes
#[derive(Parser)]
#[command(name = "spendlens")]
#[command(about = "Spending pattern analyzer and budget advisor", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Analysis config file (overrides the data-dir and built-in config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only analyze records belonging to this user
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Only analyze records from this month (YYYY-MM)
    #[arg(long, global = true)]
    pub month: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Options shared by every command
    pub fn options(&self) -> GlobalOpts {
        GlobalOpts {
            config: self.config.clone(),
            user: self.user.clone(),
            month: self.month.clone(),
            json: self.json,
        }
    }
}

/// Global flags after parsing, passed to each command
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
    pub user: Option<String>,
    pub month: Option<String>,
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze spending patterns (peak day, top category, trend, unusual expenses)
    Patterns {
        /// Expenses CSV (columns: user_id, category, amount, date)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Generate budget insights from spending patterns
    Insights {
        /// Expenses CSV (columns: user_id, category, amount, date)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Full analytics dashboard
    Report {
        /// Expenses CSV
        #[arg(short, long)]
        expenses: PathBuf,

        /// Income CSV (columns: user_id, amount, date) for the savings rate
        #[arg(short, long)]
        income: Option<PathBuf>,

        /// Number of categories to show (defaults to the config value)
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Show the effective analysis configuration
    Config,
}
