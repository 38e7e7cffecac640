//! SpendLens Core Library
//!
//! Spending analysis for the SpendLens personal finance tracker:
//! - Expense and income records with user and month filtering
//! - CSV import for exported expense and income tables
//! - Spending pattern analysis (peak day, trend, unusual expenses)
//! - Rule-based budget insights
//! - Analytics report assembly (breakdowns, forecast, savings rate)
//! - TOML analysis config with embedded defaults

pub mod analysis;
pub mod config;
pub mod error;
pub mod import;
pub mod insights;
pub mod models;
pub mod reports;

/// Record fixtures and temp CSV helpers
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analysis::{
    weekday_name, AnomalySeverity, SpendingPatternAnalyzer, SpendingPatterns, UnusualExpense,
};
pub use config::{AnalysisConfig, ConfigSource};
pub use error::{Error, Result};
pub use import::{parse_expenses_csv, parse_income_csv, ImportOutcome};
pub use insights::{BudgetInsight, BudgetInsightGenerator, BudgetRule, InsightKind};
pub use models::{for_user, in_month, Dated, ExpenseRecord, IncomeRecord, YearMonth, NOT_AVAILABLE};
pub use reports::{
    AnalyticsReport, CategorySpending, MonthForecast, MonthlyTotal, QuickStats, SavingsSummary,
    SavingsTier, WeekdaySpending,
};
