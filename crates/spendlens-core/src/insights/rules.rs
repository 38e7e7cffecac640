//! Built-in budget rules
//!
//! Each rule looks at one aspect of [`SpendingPatterns`] and contributes at
//! most one insight.

use crate::analysis::SpendingPatterns;
use crate::config::AnalysisConfig;

use super::types::{BudgetInsight, InsightKind};

/// A single rule evaluated by the insight generator
pub trait BudgetRule: Send + Sync {
    /// Human-readable name, used in logs
    fn name(&self) -> &'static str;

    /// Produce an insight if the rule applies
    fn evaluate(&self, patterns: &SpendingPatterns) -> Option<BudgetInsight>;
}

/// Flags a rising or falling spending trend
pub struct TrendRule {
    /// Ratio above which spending is increasing (default 1.2)
    increase_threshold: f64,
    /// Ratio below which spending is decreasing (default 0.8)
    decrease_threshold: f64,
}

impl TrendRule {
    pub fn new() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            increase_threshold: config.trend_increase_threshold,
            decrease_threshold: config.trend_decrease_threshold,
        }
    }
}

impl Default for TrendRule {
    fn default() -> Self {
        Self::new()
    }
}

impl BudgetRule for TrendRule {
    fn name(&self) -> &'static str {
        "Spending Trend"
    }

    fn evaluate(&self, patterns: &SpendingPatterns) -> Option<BudgetInsight> {
        let trend = patterns.spending_trend;

        if trend > self.increase_threshold {
            Some(BudgetInsight::new(
                InsightKind::Warning,
                format!("Spending increased by {:.1}%", (trend - 1.0) * 100.0),
                "Review recent purchases, set daily spending limits, and wait 24 hours \
                 before any large non-essential purchase.",
            ))
        } else if trend < self.decrease_threshold {
            Some(BudgetInsight::new(
                InsightKind::Positive,
                format!("Spending decreased by {:.1}%", (1.0 - trend) * 100.0),
                "Great job! Move what you saved into an emergency fund or investments.",
            ))
        } else {
            None
        }
    }
}

/// Recommends envelope budgeting for the top category
#[derive(Default)]
pub struct TopCategoryRule;

impl BudgetRule for TopCategoryRule {
    fn name(&self) -> &'static str {
        "Top Category"
    }

    fn evaluate(&self, patterns: &SpendingPatterns) -> Option<BudgetInsight> {
        if !patterns.has_top_category() {
            return None;
        }

        let category = &patterns.top_category;
        Some(BudgetInsight::new(
            InsightKind::Insight,
            format!("Highest spending category: {}", category),
            format!(
                "Use envelope budgeting for {}: set a monthly cap and review it weekly.",
                category
            ),
        ))
    }
}

/// Asks the user to review unusual expenses
#[derive(Default)]
pub struct UnusualExpenseRule;

impl BudgetRule for UnusualExpenseRule {
    fn name(&self) -> &'static str {
        "Unusual Expenses"
    }

    fn evaluate(&self, patterns: &SpendingPatterns) -> Option<BudgetInsight> {
        let count = patterns.unusual_expenses.len();
        if count == 0 {
            return None;
        }

        let noun = if count == 1 { "expense" } else { "expenses" };
        Some(BudgetInsight::new(
            InsightKind::Alert,
            format!("{} unusual {} detected", count, noun),
            "Review these transactions and decide whether each is a one-time event \
             or needs a budget adjustment.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnomalySeverity, UnusualExpense};
    use chrono::NaiveDate;

    fn patterns_with_trend(trend: f64) -> SpendingPatterns {
        SpendingPatterns {
            spending_trend: trend,
            ..SpendingPatterns::empty()
        }
    }

    fn unusual(amount: f64) -> UnusualExpense {
        UnusualExpense {
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            category: "Food".to_string(),
            amount,
            severity: AnomalySeverity::Medium,
            z_score: 2.4,
        }
    }

    #[test]
    fn test_trend_rule_increase() {
        let insight = TrendRule::new().evaluate(&patterns_with_trend(1.5)).unwrap();
        assert_eq!(insight.kind, InsightKind::Warning);
        assert_eq!(insight.message, "Spending increased by 50.0%");
        assert!(insight.suggestion.contains("24 hours"));
    }

    #[test]
    fn test_trend_rule_decrease() {
        let insight = TrendRule::new().evaluate(&patterns_with_trend(0.75)).unwrap();
        assert_eq!(insight.kind, InsightKind::Positive);
        assert_eq!(insight.message, "Spending decreased by 25.0%");
        assert!(insight.suggestion.contains("emergency fund"));
    }

    #[test]
    fn test_trend_rule_neutral_band() {
        let rule = TrendRule::new();
        for trend in [0.8, 1.0, 1.2] {
            assert!(rule.evaluate(&patterns_with_trend(trend)).is_none());
        }
    }

    #[test]
    fn test_top_category_rule() {
        assert!(TopCategoryRule.evaluate(&SpendingPatterns::empty()).is_none());

        let patterns = SpendingPatterns {
            top_category: "Dining".to_string(),
            ..SpendingPatterns::empty()
        };
        let insight = TopCategoryRule.evaluate(&patterns).unwrap();
        assert_eq!(insight.kind, InsightKind::Insight);
        assert_eq!(insight.message, "Highest spending category: Dining");
        assert!(insight.suggestion.contains("envelope budgeting for Dining"));
    }

    #[test]
    fn test_unusual_expense_rule_wording() {
        assert!(UnusualExpenseRule
            .evaluate(&SpendingPatterns::empty())
            .is_none());

        let mut patterns = SpendingPatterns {
            unusual_expenses: vec![unusual(120.0)],
            ..SpendingPatterns::empty()
        };
        let insight = UnusualExpenseRule.evaluate(&patterns).unwrap();
        assert_eq!(insight.kind, InsightKind::Alert);
        assert_eq!(insight.message, "1 unusual expense detected");

        patterns.unusual_expenses.push(unusual(140.0));
        let insight = UnusualExpenseRule.evaluate(&patterns).unwrap();
        assert_eq!(insight.message, "2 unusual expenses detected");
    }
}
