//! Budget Insights
//!
//! Turns the output of the spending pattern analyzer into short, ordered
//! pieces of advice. Each insight pairs an observation with a suggestion and
//! carries a kind used for presentation.
//!
//! ## Built-in Rules
//!
//! - **Spending Trend** - warns on rising spending, praises falling spending
//! - **Top Category** - recommends envelope budgeting for the largest category
//! - **Unusual Expenses** - asks for review of statistical outliers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendlens_core::insights::BudgetInsightGenerator;
//!
//! let insights = BudgetInsightGenerator::new().generate(&patterns);
//! ```

pub mod generator;
pub mod rules;
pub mod types;

pub use generator::BudgetInsightGenerator;
pub use rules::{BudgetRule, TopCategoryRule, TrendRule, UnusualExpenseRule};
pub use types::{BudgetInsight, InsightKind};
