//! Spending Pattern Analysis
//!
//! Pure functions over an in-memory snapshot of one user's expenses:
//!
//! - **Peak spending day** - weekday with the highest total
//! - **Average daily spend** - mean of per-calendar-day totals
//! - **Top category** - category with the highest total
//! - **Spending trend** - recent half average vs older half average
//! - **Unusual expenses** - per-category z-score outliers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendlens_core::analysis::SpendingPatternAnalyzer;
//!
//! let patterns = SpendingPatternAnalyzer::new().analyze(&records);
//! println!("Peak day: {}", patterns.peak_spending_day);
//! ```

pub mod patterns;
pub mod stats;

pub use patterns::{
    weekday_name, AnomalySeverity, SpendingPatternAnalyzer, SpendingPatterns, UnusualExpense,
};
