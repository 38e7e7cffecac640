//! Dashboard reports
//!
//! Summary statistics shown next to the spending patterns: category and
//! weekday breakdowns, monthly totals, a month-to-date forecast, and the
//! savings rate. Everything here is computed from the records passed in.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{weekday_name, SpendingPatternAnalyzer, SpendingPatterns};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::insights::{BudgetInsight, BudgetInsightGenerator};
use crate::models::{ExpenseRecord, IncomeRecord, YearMonth};

/// Total spending for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: String,
    pub amount: f64,
    /// Share of total spending across all categories
    pub percentage: f64,
    pub transaction_count: usize,
}

/// Total spending for one weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdaySpending {
    pub weekday: String,
    pub amount: f64,
}

/// Total spending for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// `YYYY-MM`
    pub month: String,
    pub amount: f64,
}

/// At-a-glance numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickStats {
    pub avg_transaction: f64,
    pub transaction_count: usize,
    pub largest_expense: f64,
    pub unique_categories: usize,
}

/// Month-to-date projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthForecast {
    pub month: String,
    pub current_spending: f64,
    pub daily_average: f64,
    pub predicted_total: f64,
    pub days_elapsed: u32,
    pub days_in_month: u32,
    pub days_remaining: u32,
    /// Predicted total spread evenly over the month
    pub recommended_daily_budget: f64,
    /// What can still be spent per remaining day to land on the prediction
    pub suggested_daily_limit: f64,
}

impl MonthForecast {
    /// Fraction of the predicted total already spent, clamped to 1
    pub fn progress(&self) -> f64 {
        if self.predicted_total > 0.0 {
            (self.current_spending / self.predicted_total).min(1.0)
        } else {
            0.0
        }
    }
}

/// How healthy the savings rate is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsTier {
    /// Below the low-rate threshold (default 10%)
    Low,
    /// Between the low rate and the target (default 20%)
    Fair,
    /// At or above the target
    Excellent,
}

impl SavingsTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SavingsTier::Low => "low",
            SavingsTier::Fair => "fair",
            SavingsTier::Excellent => "excellent",
        }
    }

    /// Advice for this tier, quoting the configured thresholds
    pub fn message(&self, config: &AnalysisConfig) -> String {
        match self {
            SavingsTier::Low => format!(
                "Low savings rate! Try to save at least {}% of your income.",
                config.savings_low_rate
            ),
            SavingsTier::Fair => format!(
                "Good, but there is room to improve. Aim for a {}% savings rate.",
                config.savings_target_rate
            ),
            SavingsTier::Excellent => "Excellent savings rate! You're on track.".to_string(),
        }
    }
}

impl std::fmt::Display for SavingsTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Income vs expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    /// Percentage of income not spent (negative when overspending)
    pub savings_rate: f64,
    pub tier: SavingsTier,
    pub message: String,
}

/// Spending by category, largest first, truncated to `limit`
///
/// Ties keep the order in which categories first appear.
pub fn category_breakdown(records: &[ExpenseRecord], limit: usize) -> Vec<CategorySpending> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut categories: Vec<CategorySpending> = Vec::new();

    for record in records.iter().filter(|r| r.is_valid()) {
        let i = *index.entry(record.category.as_str()).or_insert_with(|| {
            categories.push(CategorySpending {
                category: record.category.clone(),
                amount: 0.0,
                percentage: 0.0,
                transaction_count: 0,
            });
            categories.len() - 1
        });
        categories[i].amount += record.amount;
        categories[i].transaction_count += 1;
    }

    let total: f64 = categories.iter().map(|c| c.amount).sum();
    if total > 0.0 {
        for cat in &mut categories {
            cat.percentage = cat.amount / total * 100.0;
        }
    }

    // Stable sort keeps first-appearance order for equal totals
    categories.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    categories.truncate(limit);
    categories
}

/// Spending per weekday, always Monday through Sunday
pub fn weekday_breakdown(records: &[ExpenseRecord]) -> Vec<WeekdaySpending> {
    let mut totals = [0.0_f64; 7];
    for record in records.iter().filter(|r| r.is_valid()) {
        totals[record.date.weekday().num_days_from_monday() as usize] += record.amount;
    }

    let mut day = chrono::Weekday::Mon;
    let mut breakdown = Vec::with_capacity(7);
    for amount in totals {
        breakdown.push(WeekdaySpending {
            weekday: weekday_name(day).to_string(),
            amount,
        });
        day = day.succ();
    }
    breakdown
}

/// Spending per calendar month, oldest first
pub fn monthly_totals(records: &[ExpenseRecord]) -> Vec<MonthlyTotal> {
    let mut by_month: BTreeMap<YearMonth, f64> = BTreeMap::new();
    for record in records.iter().filter(|r| r.is_valid()) {
        *by_month.entry(YearMonth::of(record.date)).or_insert(0.0) += record.amount;
    }

    by_month
        .into_iter()
        .map(|(month, amount)| MonthlyTotal {
            month: month.to_string(),
            amount,
        })
        .collect()
}

/// Average, count, largest, and distinct categories; `None` when empty
pub fn quick_stats(records: &[ExpenseRecord]) -> Option<QuickStats> {
    let valid: Vec<&ExpenseRecord> = records.iter().filter(|r| r.is_valid()).collect();
    if valid.is_empty() {
        return None;
    }

    let total: f64 = valid.iter().map(|r| r.amount).sum();
    let largest = valid
        .iter()
        .map(|r| r.amount)
        .fold(f64::NEG_INFINITY, f64::max);
    let mut categories: Vec<&str> = valid.iter().map(|r| r.category.as_str()).collect();
    categories.sort_unstable();
    categories.dedup();

    Some(QuickStats {
        avg_transaction: total / valid.len() as f64,
        transaction_count: valid.len(),
        largest_expense: largest,
        unique_categories: categories.len(),
    })
}

/// Project this month's total from spending so far
///
/// Uses records in `today`'s month dated on or before `today`. Returns
/// `None` if nothing was spent yet this month.
pub fn month_forecast(records: &[ExpenseRecord], today: NaiveDate) -> Option<MonthForecast> {
    let month = YearMonth::of(today);
    let current_spending: f64 = records
        .iter()
        .filter(|r| r.is_valid() && month.contains(r.date) && r.date <= today)
        .map(|r| r.amount)
        .sum();

    if current_spending <= 0.0 {
        return None;
    }

    let days_elapsed = today.day();
    let days_in_month = month.days();
    let days_remaining = days_in_month.saturating_sub(days_elapsed);

    let daily_average = current_spending / days_elapsed as f64;
    let predicted_total = daily_average * days_in_month as f64;

    Some(MonthForecast {
        month: month.to_string(),
        current_spending,
        daily_average,
        predicted_total,
        days_elapsed,
        days_in_month,
        days_remaining,
        recommended_daily_budget: predicted_total / days_in_month as f64,
        suggested_daily_limit: (predicted_total - current_spending)
            / days_remaining.max(1) as f64,
    })
}

/// Savings rate and tier; `None` without positive income
pub fn savings_summary(
    income: &[IncomeRecord],
    expenses: &[ExpenseRecord],
    config: &AnalysisConfig,
) -> Option<SavingsSummary> {
    let total_income: f64 = income
        .iter()
        .filter(|r| r.amount.is_finite() && r.amount > 0.0)
        .map(|r| r.amount)
        .sum();
    if total_income <= 0.0 {
        return None;
    }

    let total_expenses = total_spent(expenses);
    let savings_rate = (total_income - total_expenses) / total_income * 100.0;

    let tier = if savings_rate < config.savings_low_rate {
        SavingsTier::Low
    } else if savings_rate < config.savings_target_rate {
        SavingsTier::Fair
    } else {
        SavingsTier::Excellent
    };

    Some(SavingsSummary {
        total_income,
        total_expenses,
        savings_rate,
        message: tier.message(config),
        tier,
    })
}

fn total_spent(records: &[ExpenseRecord]) -> f64 {
    records
        .iter()
        .filter(|r| r.is_valid())
        .map(|r| r.amount)
        .sum()
}

/// Everything the analytics page shows, as one serializable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub user_id: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub spending_patterns: SpendingPatterns,
    pub insights: Vec<BudgetInsight>,
    pub total_expenses: f64,
    pub total_income: f64,
    pub top_categories: Vec<CategorySpending>,
    pub weekday_spending: Vec<WeekdaySpending>,
    pub monthly_totals: Vec<MonthlyTotal>,
    pub quick_stats: Option<QuickStats>,
    pub forecast: Option<MonthForecast>,
    pub savings: Option<SavingsSummary>,
}

impl AnalyticsReport {
    /// Build the full report
    ///
    /// `generated_at` also decides the forecast month.
    pub fn build(
        user_id: Option<&str>,
        expenses: &[ExpenseRecord],
        income: &[IncomeRecord],
        config: &AnalysisConfig,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let spending_patterns =
            SpendingPatternAnalyzer::with_config(config.clone()).analyze(expenses);
        let insights = BudgetInsightGenerator::with_config(config).generate(&spending_patterns);

        let total_income = income
            .iter()
            .filter(|r| r.amount.is_finite() && r.amount > 0.0)
            .map(|r| r.amount)
            .sum();

        Self {
            user_id: user_id.map(str::to_string),
            generated_at,
            insights,
            total_expenses: total_spent(expenses),
            total_income,
            top_categories: category_breakdown(expenses, config.category_breakdown_limit),
            weekday_spending: weekday_breakdown(expenses),
            monthly_totals: monthly_totals(expenses),
            quick_stats: quick_stats(expenses),
            forecast: month_forecast(expenses, generated_at.date_naive()),
            savings: savings_summary(income, expenses, config),
            spending_patterns,
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
