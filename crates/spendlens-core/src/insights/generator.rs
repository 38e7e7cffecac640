//! Budget Insight Generator - runs the budget rules in order

use crate::analysis::SpendingPatterns;
use crate::config::AnalysisConfig;

use super::rules::{BudgetRule, TopCategoryRule, TrendRule, UnusualExpenseRule};
use super::types::BudgetInsight;

/// Turns [`SpendingPatterns`] into an ordered list of budget insights
///
/// Rules run in registration order and each contributes at most one insight.
/// The built-in order is trend, top category, unusual expenses.
pub struct BudgetInsightGenerator {
    rules: Vec<Box<dyn BudgetRule>>,
}

impl Default for BudgetInsightGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl BudgetInsightGenerator {
    /// Create a generator with the built-in rules and default thresholds
    pub fn new() -> Self {
        Self::with_config(&AnalysisConfig::default())
    }

    /// Create a generator with the built-in rules using `config` thresholds
    pub fn with_config(config: &AnalysisConfig) -> Self {
        let mut generator = Self { rules: vec![] };

        generator.register(Box::new(TrendRule::from_config(config)));
        generator.register(Box::new(TopCategoryRule));
        generator.register(Box::new(UnusualExpenseRule));

        generator
    }

    /// Append a rule after the existing ones
    pub fn register(&mut self, rule: Box<dyn BudgetRule>) {
        self.rules.push(rule);
    }

    /// Evaluate every rule against `patterns`
    ///
    /// May return an empty list; showing an "add more data" message is up to
    /// the caller.
    pub fn generate(&self, patterns: &SpendingPatterns) -> Vec<BudgetInsight> {
        let insights: Vec<BudgetInsight> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let insight = rule.evaluate(patterns);
                if let Some(ref insight) = insight {
                    tracing::debug!(rule = rule.name(), kind = %insight.kind, "Budget rule fired");
                }
                insight
            })
            .collect();

        tracing::debug!(count = insights.len(), "Budget insights generated");
        insights
    }

    /// Names of the registered rules, in evaluation order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}
