//! Core types for budget insights

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of budget insight, which also drives how it is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Spending is rising
    Warning,
    /// Spending is falling
    Positive,
    /// General observation (top category)
    Insight,
    /// Unusual expenses need review
    Alert,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Warning => "warning",
            InsightKind::Positive => "positive",
            InsightKind::Insight => "insight",
            InsightKind::Alert => "alert",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warning" => Ok(InsightKind::Warning),
            "positive" => Ok(InsightKind::Positive),
            "insight" => Ok(InsightKind::Insight),
            "alert" => Ok(InsightKind::Alert),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// A human-readable observation paired with a suggested action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetInsight {
    pub kind: InsightKind,
    pub message: String,
    pub suggestion: String,
}

impl BudgetInsight {
    pub fn new(kind: InsightKind, message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_kind_names() {
        assert_eq!(InsightKind::Positive.as_str(), "positive");
        assert_eq!(
            InsightKind::from_str("alert").unwrap(),
            InsightKind::Alert
        );
        assert!(InsightKind::from_str("info").is_err());
    }

    #[test]
    fn test_insight_serialization() {
        let insight = BudgetInsight::new(InsightKind::Warning, "Up", "Slow down");
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["kind"], "warning");
        assert_eq!(json["message"], "Up");
        assert_eq!(json["suggestion"], "Slow down");
    }
}
