//! Pattern and insight commands

use std::path::Path;

use anyhow::Result;
use spendlens_core::{
    AnomalySeverity, BudgetInsight, BudgetInsightGenerator, InsightKind, SpendingPatternAnalyzer,
    SpendingPatterns,
};

use super::{load_config, load_expenses, print_json, truncate};
use crate::cli::GlobalOpts;

pub fn cmd_patterns(file: &Path, opts: &GlobalOpts) -> Result<()> {
    let (config, _) = load_config(opts)?;
    let expenses = load_expenses(file, opts)?;
    let patterns = SpendingPatternAnalyzer::with_config(config).analyze(&expenses);

    if opts.json {
        return print_json(&patterns);
    }

    print_patterns(&patterns, expenses.len());
    Ok(())
}

pub fn cmd_insights(file: &Path, opts: &GlobalOpts) -> Result<()> {
    let (config, _) = load_config(opts)?;
    let expenses = load_expenses(file, opts)?;
    let patterns = SpendingPatternAnalyzer::with_config(config.clone()).analyze(&expenses);
    let insights = BudgetInsightGenerator::with_config(&config).generate(&patterns);

    if opts.json {
        return print_json(&insights);
    }

    print_insights(&insights);
    Ok(())
}

pub(crate) fn print_patterns(patterns: &SpendingPatterns, record_count: usize) {
    println!();
    println!("🔍 Spending Patterns");
    println!("   ─────────────────────────────────────────────────────────────");

    if record_count == 0 {
        println!("   No expenses found. Add some expenses to see your patterns.");
        return;
    }

    println!("   Expenses analyzed:  {}", record_count);
    println!("   Peak spending day:  {}", patterns.peak_spending_day);
    println!("   Top category:       {}", patterns.top_category);
    println!("   Avg daily spend:    ${:.2}", patterns.avg_daily_spend);
    println!(
        "   Spending trend:     {:.2}x {}",
        patterns.spending_trend,
        trend_arrow(patterns.spending_trend)
    );

    println!();
    if patterns.unusual_expenses.is_empty() {
        println!("   ✅ No unusual expenses detected.");
        return;
    }

    println!(
        "   ⚠️  Unusual Expenses ({})",
        patterns.unusual_expenses.len()
    );
    println!(
        "   {:10} │ {:20} │ {:>10} │ {:>6} │ {:8}",
        "Date", "Category", "Amount", "Z", "Severity"
    );
    println!("   ───────────┼──────────────────────┼────────────┼────────┼─────────");
    for expense in &patterns.unusual_expenses {
        let severity = match expense.severity {
            AnomalySeverity::High => "🔴 high",
            AnomalySeverity::Medium => "🟡 medium",
        };
        println!(
            "   {:10} │ {:20} │ {:>10.2} │ {:>6.2} │ {}",
            expense.date.format("%Y-%m-%d"),
            truncate(&expense.category, 20),
            expense.amount,
            expense.z_score,
            severity
        );
    }
}

pub(crate) fn print_insights(insights: &[BudgetInsight]) {
    println!();
    println!("💡 Budget Insights");
    println!("   ─────────────────────────────────────────────────────────────");

    if insights.is_empty() {
        println!("   Add more expenses to generate personalized insights!");
        return;
    }

    for insight in insights {
        println!("   {} {}", insight_icon(insight.kind), insight.message);
        println!("      → {}", insight.suggestion);
    }
}

fn insight_icon(kind: InsightKind) -> &'static str {
    match kind {
        InsightKind::Warning => "⚠️ ",
        InsightKind::Positive => "✅",
        InsightKind::Insight => "📊",
        InsightKind::Alert => "🚨",
    }
}

fn trend_arrow(trend: f64) -> &'static str {
    if trend > 1.0 {
        "📈"
    } else if trend < 1.0 {
        "📉"
    } else {
        "➡️"
    }
}
