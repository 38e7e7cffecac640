//! Report command implementations

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use spendlens_core::{AnalyticsReport, SavingsTier};

use super::analyze::{print_insights, print_patterns};
use super::{load_config, load_expenses, load_income, truncate};
use crate::cli::GlobalOpts;

pub fn cmd_report(
    expenses_path: &Path,
    income_path: Option<&Path>,
    top: Option<usize>,
    opts: &GlobalOpts,
) -> Result<()> {
    let (mut config, _) = load_config(opts)?;
    if let Some(top) = top {
        if top == 0 {
            anyhow::bail!("--top must be at least 1");
        }
        config.category_breakdown_limit = top;
    }

    let expenses = load_expenses(expenses_path, opts)?;
    let income = match income_path {
        Some(path) => load_income(path, opts)?,
        None => Vec::new(),
    };

    let report = AnalyticsReport::build(
        opts.user.as_deref(),
        &expenses,
        &income,
        &config,
        Utc::now(),
    );

    if opts.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    print_report(&report, expenses.len());
    Ok(())
}

fn print_report(report: &AnalyticsReport, expense_count: usize) {
    println!();
    println!("📊 Smart Analytics");
    if let Some(ref user) = report.user_id {
        println!("   User: {}", user);
    }
    println!(
        "   Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    print_patterns(&report.spending_patterns, expense_count);
    print_insights(&report.insights);

    if expense_count == 0 {
        return;
    }

    // Category breakdown
    println!();
    println!("🥧 Top Categories");
    println!("   Total: ${:.2}", report.total_expenses);
    println!();
    println!(
        "   {:25} │ {:>10} │ {:>6} │ {:>5}",
        "Category", "Amount", "%", "Count"
    );
    println!("   ──────────────────────────┼────────────┼────────┼───────");
    for cat in &report.top_categories {
        println!(
            "   {:25} │ {:>10.2} │ {:>5.1}% │ {:>5}",
            truncate(&cat.category, 25),
            cat.amount,
            cat.percentage,
            cat.transaction_count
        );
    }

    // Weekday bars, scaled to the busiest day
    println!();
    println!("📅 Spending by Weekday");
    let max = report
        .weekday_spending
        .iter()
        .map(|d| d.amount)
        .fold(0.0_f64, f64::max);
    for day in &report.weekday_spending {
        let width = if max > 0.0 {
            (day.amount / max * 30.0).round() as usize
        } else {
            0
        };
        println!(
            "   {:9} │ {:30} │ ${:.2}",
            day.weekday,
            "█".repeat(width),
            day.amount
        );
    }

    // Monthly totals
    if !report.monthly_totals.is_empty() {
        println!();
        println!("📈 Monthly Totals");
        for month in &report.monthly_totals {
            println!("   {} │ ${:>10.2}", month.month, month.amount);
        }
    }

    if let Some(ref stats) = report.quick_stats {
        println!();
        println!("⚡ Quick Stats");
        println!("   Avg transaction:   ${:.2}", stats.avg_transaction);
        println!("   Transactions:      {}", stats.transaction_count);
        println!("   Largest expense:   ${:.2}", stats.largest_expense);
        println!("   Categories:        {}", stats.unique_categories);
    }

    match report.forecast {
        Some(ref forecast) => {
            println!();
            println!("🔮 Forecast for {}", forecast.month);
            println!("   Spent so far:      ${:.2}", forecast.current_spending);
            println!("   Daily average:     ${:.2}", forecast.daily_average);
            println!("   Predicted total:   ${:.2}", forecast.predicted_total);
            println!(
                "   Month progress:    {:.0}% ({} of {} days)",
                forecast.progress() * 100.0,
                forecast.days_elapsed,
                forecast.days_in_month
            );
            println!(
                "   Recommended daily budget: ${:.2}",
                forecast.recommended_daily_budget
            );
            println!(
                "   Suggested daily limit:    ${:.2} ({} days left)",
                forecast.suggested_daily_limit, forecast.days_remaining
            );
        }
        None => {
            println!();
            println!("🔮 No spending recorded this month yet, so there is nothing to forecast.");
        }
    }

    if let Some(ref savings) = report.savings {
        let icon = match savings.tier {
            SavingsTier::Low => "🔴",
            SavingsTier::Fair => "🟡",
            SavingsTier::Excellent => "🟢",
        };
        println!();
        println!("💰 Savings");
        println!("   Income:            ${:.2}", savings.total_income);
        println!("   Expenses:          ${:.2}", savings.total_expenses);
        println!("   Savings rate:      {:.1}%", savings.savings_rate);
        println!("   {} {}", icon, savings.message);
    }
}
