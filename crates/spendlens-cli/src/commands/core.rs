//! Shared loaders and the config command
//!
//! This module contains:
//! - `load_config` - Resolve the analysis config for this run
//! - `load_expenses` / `load_income` - Read CSV files and apply --user/--month
//! - `print_json` - JSON output for --json
//! - `cmd_config` - Show the effective configuration

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use spendlens_core::{
    for_user, in_month, parse_expenses_csv, parse_income_csv, AnalysisConfig, ConfigSource,
    Dated, ExpenseRecord, IncomeRecord,
};

use crate::cli::GlobalOpts;

/// Load the analysis config from --config, the data dir, or the built-in default
pub fn load_config(opts: &GlobalOpts) -> Result<(AnalysisConfig, ConfigSource)> {
    AnalysisConfig::load(opts.config.as_deref()).context("Failed to load analysis config")
}

/// Read expenses from CSV and apply the --user/--month filters
pub fn load_expenses(path: &Path, opts: &GlobalOpts) -> Result<Vec<ExpenseRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open expenses file: {}", path.display()))?;
    let outcome = parse_expenses_csv(file)
        .with_context(|| format!("Failed to parse expenses file: {}", path.display()))?;

    if outcome.skipped > 0 {
        tracing::warn!(
            skipped = outcome.skipped,
            file = %path.display(),
            "Skipped malformed expense rows"
        );
    }

    apply_filters(outcome.records, opts)
}

/// Read income from CSV and apply the --user/--month filters
pub fn load_income(path: &Path, opts: &GlobalOpts) -> Result<Vec<IncomeRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open income file: {}", path.display()))?;
    let outcome = parse_income_csv(file)
        .with_context(|| format!("Failed to parse income file: {}", path.display()))?;

    if outcome.skipped > 0 {
        tracing::warn!(
            skipped = outcome.skipped,
            file = %path.display(),
            "Skipped malformed income rows"
        );
    }

    apply_filters(outcome.records, opts)
}

fn apply_filters<T: Dated + Clone>(records: Vec<T>, opts: &GlobalOpts) -> Result<Vec<T>> {
    let records = match opts.user.as_deref() {
        Some(user) => for_user(&records, user),
        None => records,
    };
    let records = match opts.month.as_deref() {
        Some(month) => in_month(&records, month).context("Invalid --month")?,
        None => records,
    };
    tracing::debug!(count = records.len(), "Records after filters");
    Ok(records)
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

pub fn cmd_config(opts: &GlobalOpts) -> Result<()> {
    let (config, source) = load_config(opts)?;

    if opts.json {
        return print_json(&serde_json::json!({
            "source": source.to_string(),
            "config": config,
        }));
    }

    println!();
    println!("⚙️  Analysis Configuration");
    println!("   Source: {}", source);
    println!("   ─────────────────────────────────────────────");
    println!("   Anomalies");
    println!("     z-score threshold:         {:.2}", config.anomaly_z_threshold);
    println!(
        "     high severity threshold:   {:.2}",
        config.high_severity_z_threshold
    );
    println!("     minimum records:           {}", config.min_anomaly_records);
    println!("   Trend");
    println!(
        "     increase above:            {:.2}",
        config.trend_increase_threshold
    );
    println!(
        "     decrease below:            {:.2}",
        config.trend_decrease_threshold
    );
    println!("   Savings");
    println!("     low rate:                  {:.1}%", config.savings_low_rate);
    println!("     target rate:               {:.1}%", config.savings_target_rate);
    println!("   Reports");
    println!(
        "     categories shown:          {}",
        config.category_breakdown_limit
    );

    if let Some(path) = spendlens_core::config::default_config_path() {
        println!();
        println!("   💡 Tip: Put overrides in {}", path.display());
    }

    Ok(())
}
