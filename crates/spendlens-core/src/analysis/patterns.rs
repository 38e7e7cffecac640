//! Spending pattern analysis
//!
//! Derives peak spending day, average daily spend, top category, the
//! recent-vs-older trend ratio, and per-category z-score anomalies from a flat
//! list of expense records.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::models::{ExpenseRecord, NOT_AVAILABLE};

use super::stats::{mean, ratio_or_neutral, sample_std_dev, z_score};

/// Weekdays in tie-break order
const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a weekday ("Monday", ...)
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// How far an unusual expense sits from its category's norm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySeverity {
    /// Beyond the anomaly threshold (default 2 standard deviations)
    Medium,
    /// Beyond the high-severity threshold (default 3 standard deviations)
    High,
}

impl AnomalySeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalySeverity::Medium => "medium",
            AnomalySeverity::High => "high",
        }
    }

    /// Classify a z-score; `None` if it is not unusual
    ///
    /// Both comparisons are strict: a z-score exactly at a threshold does not
    /// cross it.
    pub fn classify(z: f64, config: &AnalysisConfig) -> Option<Self> {
        let magnitude = z.abs();
        if magnitude > config.high_severity_z_threshold {
            Some(AnomalySeverity::High)
        } else if magnitude > config.anomaly_z_threshold {
            Some(AnomalySeverity::Medium)
        } else {
            None
        }
    }
}

impl fmt::Display for AnomalySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnomalySeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medium" => Ok(AnomalySeverity::Medium),
            "high" => Ok(AnomalySeverity::High),
            _ => Err(format!("Unknown anomaly severity: {}", s)),
        }
    }
}

/// An expense that is statistically unusual within its category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnusualExpense {
    /// Serialized as ISO-8601 (YYYY-MM-DD)
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    pub severity: AnomalySeverity,
    /// Signed z-score within the category
    pub z_score: f64,
}

/// Derived spending statistics for one user's records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingPatterns {
    /// Weekday name with the highest total spend, or "N/A"
    pub peak_spending_day: String,
    /// Mean of per-calendar-day totals
    pub avg_daily_spend: f64,
    /// Category with the highest total spend, or "N/A"
    pub top_category: String,
    /// Recent half average / older half average (1.0 when undefined)
    pub spending_trend: f64,
    pub unusual_expenses: Vec<UnusualExpense>,
}

impl SpendingPatterns {
    /// Sentinel result for an empty record set
    pub fn empty() -> Self {
        Self {
            peak_spending_day: NOT_AVAILABLE.to_string(),
            avg_daily_spend: 0.0,
            top_category: NOT_AVAILABLE.to_string(),
            spending_trend: 1.0,
            unusual_expenses: Vec::new(),
        }
    }

    pub fn has_top_category(&self) -> bool {
        self.top_category != NOT_AVAILABLE
    }

}

impl Default for SpendingPatterns {
    fn default() -> Self {
        Self::empty()
    }
}

/// Turns expense records into [`SpendingPatterns`]
///
/// Holds only immutable configuration, so one analyzer can serve any number
/// of users concurrently.
#[derive(Debug, Clone, Default)]
pub struct SpendingPatternAnalyzer {
    config: AnalysisConfig,
}

impl SpendingPatternAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Analyze one user's expense records
    ///
    /// Records with a non-positive or non-finite amount, or an empty
    /// category, are skipped. Never fails: undefined statistics fall back to
    /// their sentinel values.
    pub fn analyze(&self, records: &[ExpenseRecord]) -> SpendingPatterns {
        let valid: Vec<&ExpenseRecord> = records
            .iter()
            .filter(|r| {
                let ok = r.is_valid();
                if !ok {
                    debug!(
                        date = %r.date,
                        category = %r.category,
                        amount = r.amount,
                        "Skipping invalid expense record"
                    );
                }
                ok
            })
            .collect();

        if valid.is_empty() {
            return SpendingPatterns::empty();
        }

        let patterns = SpendingPatterns {
            peak_spending_day: peak_spending_day(&valid).to_string(),
            avg_daily_spend: average_daily_spend(&valid),
            top_category: top_category(&valid).to_string(),
            spending_trend: spending_trend(&valid),
            unusual_expenses: self.detect_anomalies(&valid),
        };

        debug!(
            records = valid.len(),
            skipped = records.len() - valid.len(),
            peak_day = %patterns.peak_spending_day,
            top_category = %patterns.top_category,
            trend = patterns.spending_trend,
            anomalies = patterns.unusual_expenses.len(),
            "Spending patterns analyzed"
        );

        patterns
    }

    /// Flag expenses whose |z-score| within their category exceeds the
    /// threshold
    ///
    /// Gated on the total record count, not on per-category counts.
    fn detect_anomalies(&self, records: &[&ExpenseRecord]) -> Vec<UnusualExpense> {
        if records.len() < self.config.min_anomaly_records {
            return Vec::new();
        }

        let mut unusual = Vec::new();

        for (category, members) in group_by_category(records) {
            let amounts: Vec<f64> = members.iter().map(|r| r.amount).collect();
            let (Some(category_mean), Some(std_dev)) = (mean(&amounts), sample_std_dev(&amounts))
            else {
                continue;
            };
            if std_dev == 0.0 {
                continue;
            }

            for record in members {
                let Some(z) = z_score(record.amount, category_mean, std_dev) else {
                    continue;
                };
                if let Some(severity) = AnomalySeverity::classify(z, &self.config) {
                    unusual.push(UnusualExpense {
                        date: record.date,
                        category: category.to_string(),
                        amount: record.amount,
                        severity,
                        z_score: z,
                    });
                }
            }
        }

        unusual
    }
}

/// Group records by category, categories in order of first appearance
fn group_by_category<'a>(records: &[&'a ExpenseRecord]) -> Vec<(&'a str, Vec<&'a ExpenseRecord>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&ExpenseRecord>)> = Vec::new();

    for &record in records {
        let category = record.category.as_str();
        match index.get(category) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(category, groups.len());
                groups.push((category, vec![record]));
            }
        }
    }

    groups
}

/// Weekday with the highest total; ties go to the earliest day from Monday
fn peak_spending_day(records: &[&ExpenseRecord]) -> &'static str {
    let mut totals = [0.0_f64; 7];
    let mut present = [false; 7];

    for record in records {
        let idx = record.date.weekday().num_days_from_monday() as usize;
        totals[idx] += record.amount;
        present[idx] = true;
    }

    let mut best: Option<usize> = None;
    for idx in 0..WEEKDAYS.len() {
        if !present[idx] {
            continue;
        }
        match best {
            Some(b) if totals[idx] <= totals[b] => {}
            _ => best = Some(idx),
        }
    }

    best.map(|idx| weekday_name(WEEKDAYS[idx]))
        .unwrap_or(NOT_AVAILABLE)
}

/// Mean of per-calendar-day totals
fn average_daily_spend(records: &[&ExpenseRecord]) -> f64 {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        *by_date.entry(record.date).or_insert(0.0) += record.amount;
    }
    let daily: Vec<f64> = by_date.into_values().collect();
    mean(&daily).unwrap_or(0.0)
}

/// Category with the highest total; ties go to the first category seen
fn top_category<'a>(records: &[&'a ExpenseRecord]) -> &'a str {
    let mut best: Option<(&str, f64)> = None;

    for (category, members) in group_by_category(records) {
        let total: f64 = members.iter().map(|r| r.amount).sum();
        match best {
            Some((_, best_total)) if total <= best_total => {}
            _ => best = Some((category, total)),
        }
    }

    best.map(|(category, _)| category).unwrap_or(NOT_AVAILABLE)
}

/// Mean of the chronologically later half over the earlier half
///
/// Records are stable-sorted by date first. The earlier half gets
/// `floor(n / 2)` records, so the later half takes the extra one.
fn spending_trend(records: &[&ExpenseRecord]) -> f64 {
    if records.len() < 2 {
        return 1.0;
    }

    let mut sorted = records.to_vec();
    sorted.sort_by_key(|r| r.date);

    let split = sorted.len() / 2;
    let older: Vec<f64> = sorted[..split].iter().map(|r| r.amount).collect();
    let recent: Vec<f64> = sorted[split..].iter().map(|r| r.amount).collect();

    match (mean(&recent), mean(&older)) {
        (Some(recent_mean), Some(older_mean)) => ratio_or_neutral(recent_mean, older_mean),
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, expense, expenses_with_outlier};
    use std::collections::HashSet;

    #[test]
    fn test_empty_input_returns_sentinel() {
        let patterns = SpendingPatternAnalyzer::new().analyze(&[]);

        assert_eq!(patterns.peak_spending_day, "N/A");
        assert_eq!(patterns.avg_daily_spend, 0.0);
        assert_eq!(patterns.top_category, "N/A");
        assert_eq!(patterns.spending_trend, 1.0);
        assert!(patterns.unusual_expenses.is_empty());
        assert_eq!(patterns, SpendingPatterns::empty());
    }

    #[test]
    fn test_only_invalid_records_is_empty() {
        let records = vec![
            expense("Food", 0.0, date(2025, 1, 6)),
            expense("Food", -12.0, date(2025, 1, 7)),
            expense("", 12.0, date(2025, 1, 8)),
        ];
        let patterns = SpendingPatternAnalyzer::new().analyze(&records);
        assert_eq!(patterns, SpendingPatterns::empty());
    }

    #[test]
    fn test_invalid_records_are_skipped() {
        let records = vec![
            expense("Food", 20.0, date(2025, 1, 6)),
            expense("Rent", -500.0, date(2025, 1, 7)),
        ];
        let patterns = SpendingPatternAnalyzer::new().analyze(&records);
        assert_eq!(patterns.top_category, "Food");
        assert_eq!(patterns.peak_spending_day, "Monday");
        assert_eq!(patterns.spending_trend, 1.0);
    }

    #[test]
    fn test_peak_spending_day() {
        // 2025-01-06 is a Monday
        let records = vec![
            expense("Food", 30.0, date(2025, 1, 6)),
            expense("Food", 25.0, date(2025, 1, 10)), // Friday
            expense("Fuel", 40.0, date(2025, 1, 17)), // Friday
        ];
        let patterns = SpendingPatternAnalyzer::new().analyze(&records);
        assert_eq!(patterns.peak_spending_day, "Friday");
    }

    #[test]
    fn test_peak_day_tie_prefers_monday_first_order() {
        // Sunday listed first, but Monday wins the tie
        let records = vec![
            expense("Food", 50.0, date(2025, 1, 12)), // Sunday
            expense("Food", 50.0, date(2025, 1, 13)), // Monday
        ];
        let patterns = SpendingPatternAnalyzer::new().analyze(&records);
        assert_eq!(patterns.peak_spending_day, "Monday");
    }

    #[test]
    fn test_average_daily_spend_is_mean_of_daily_totals() {
        // Day 1: 10 + 20 + 30 = 60, day 2: 40 -> (60 + 40) / 2 = 50
        // (a per-transaction mean would be 25)
        let records = vec![
            expense("Food", 10.0, date(2025, 1, 6)),
            expense("Food", 20.0, date(2025, 1, 6)),
            expense("Fuel", 30.0, date(2025, 1, 6)),
            expense("Food", 40.0, date(2025, 1, 7)),
        ];
        let patterns = SpendingPatternAnalyzer::new().analyze(&records);
        assert!((patterns.avg_daily_spend - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_category() {
        let records = vec![
            expense("Food", 10.0, date(2025, 1, 6)),
            expense("Rent", 35.0, date(2025, 1, 7)),
            expense("Food", 30.0, date(2025, 1, 8)),
        ];
        // Food 40 in two records beats a single Rent 35
        let patterns = SpendingPatternAnalyzer::new().analyze(&records);
        assert_eq!(patterns.top_category, "Food");
    }

    #[test]
    fn test_top_category_tie_prefers_first_seen() {
        let records = vec![
            expense("Travel", 20.0, date(2025, 1, 6)),
            expense("Food", 20.0, date(2025, 1, 7)),
        ];
        let patterns = SpendingPatternAnalyzer::new().analyze(&records);
        assert_eq!(patterns.top_category, "Travel");
    }

    #[test]
    fn test_trend_sorts_chronologically() {
        // Provided newest-first, as a "order by date desc" query returns them
        let records = vec![
            expense("B", 150.0, date(2025, 2, 1)),
            expense("A", 50.0, date(2025, 1, 1)),
        ];
        let patterns = SpendingPatternAnalyzer::new().analyze(&records);
        assert!((patterns.spending_trend - 3.0).abs() < 1e-9);

        let reversed: Vec<_> = records.into_iter().rev().collect();
        let patterns = SpendingPatternAnalyzer::new().analyze(&reversed);
        assert!((patterns.spending_trend - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_single_record_is_neutral() {
        let records = vec![expense("Food", 80.0, date(2025, 1, 6))];
        let patterns = SpendingPatternAnalyzer::new().analyze(&records);
        assert_eq!(patterns.spending_trend, 1.0);
    }

    #[test]
    fn test_trend_scales_with_later_half() {
        let earlier = [10.0, 20.0, 30.0];
        let k = 2.5;
        let mut records = Vec::new();
        for (i, amount) in earlier.iter().enumerate() {
            records.push(expense("Food", *amount, date(2025, 1, 1 + i as u32)));
        }
        for (i, amount) in earlier.iter().enumerate() {
            records.push(expense("Food", amount * k, date(2025, 2, 1 + i as u32)));
        }
        // Shuffle the input order; the sort restores chronology
        records.swap(0, 5);
        records.swap(2, 3);

        let patterns = SpendingPatternAnalyzer::new().analyze(&records);
        assert!((patterns.spending_trend - k).abs() < 1e-9);
    }

    #[test]
    fn test_trend_odd_count_gives_extra_record_to_recent_half() {
        // older = [100], recent = [10, 40] -> 25 / 100
        let records = vec![
            expense("Food", 100.0, date(2025, 1, 1)),
            expense("Food", 10.0, date(2025, 1, 2)),
            expense("Food", 40.0, date(2025, 1, 3)),
        ];
        let patterns = SpendingPatternAnalyzer::new().analyze(&records);
        assert!((patterns.spending_trend - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_fewer_than_three_records_have_no_anomalies() {
        let records = vec![
            expense("Food", 1.0, date(2025, 1, 6)),
            expense("Food", 1000.0, date(2025, 1, 7)),
        ];
        let patterns = SpendingPatternAnalyzer::new().analyze(&records);
        assert!(patterns.unusual_expenses.is_empty());
    }

    #[test]
    fn test_identical_amounts_have_no_anomalies() {
        let mut records: Vec<_> = (1..=8)
            .map(|d| expense("Streaming", 15.99, date(2025, 1, d)))
            .collect();
        records.extend(expenses_with_outlier("Food", 10.0, 11, 100.0, date(2025, 1, 1)));

        let patterns = SpendingPatternAnalyzer::new().analyze(&records);
        assert!(patterns
            .unusual_expenses
            .iter()
            .all(|u| u.category != "Streaming"));
        assert_eq!(patterns.unusual_expenses.len(), 1);
    }

    #[test]
    fn test_three_record_category_cannot_reach_threshold() {
        // mean 40, sample std dev sqrt(2700) ~ 51.96 -> z(100) ~ 1.155
        let records = vec![
            expense("Food", 10.0, date(2025, 3, 3)),
            expense("Food", 10.0, date(2025, 3, 4)),
            expense("Food", 100.0, date(2025, 3, 5)),
        ];
        let amounts = [10.0, 10.0, 100.0];
        let z = z_score(100.0, 40.0, sample_std_dev(&amounts).unwrap()).unwrap();
        assert!((z - 60.0 / 2700.0_f64.sqrt()).abs() < 1e-12);
        assert!(z < 2.0);

        let patterns = SpendingPatternAnalyzer::new().analyze(&records);
        assert!(patterns.unusual_expenses.is_empty());
    }

    #[test]
    fn test_medium_anomaly() {
        // nine 10s and one 100: z(100) ~ 2.85
        let records = expenses_with_outlier("Food", 10.0, 9, 100.0, date(2025, 1, 1));
        let patterns = SpendingPatternAnalyzer::new().analyze(&records);

        assert_eq!(patterns.unusual_expenses.len(), 1);
        let unusual = &patterns.unusual_expenses[0];
        assert_eq!(unusual.amount, 100.0);
        assert_eq!(unusual.category, "Food");
        assert_eq!(unusual.severity, AnomalySeverity::Medium);
        assert_eq!(unusual.date, date(2025, 1, 10));
        assert!(unusual.z_score > 2.0 && unusual.z_score <= 3.0);
    }

    #[test]
    fn test_high_anomaly() {
        // eleven 10s and one 100: z(100) ~ 3.18
        let records = expenses_with_outlier("Food", 10.0, 11, 100.0, date(2025, 1, 1));
        let patterns = SpendingPatternAnalyzer::new().analyze(&records);

        assert_eq!(patterns.unusual_expenses.len(), 1);
        assert_eq!(patterns.unusual_expenses[0].severity, AnomalySeverity::High);
        assert!(patterns.unusual_expenses[0].z_score > 3.0);
    }

    #[test]
    fn test_low_outlier_is_flagged() {
        // nine 100s and one 10: negative z-score, same magnitude as above
        let records = expenses_with_outlier("Rent", 100.0, 9, 10.0, date(2025, 1, 1));
        let patterns = SpendingPatternAnalyzer::new().analyze(&records);

        assert_eq!(patterns.unusual_expenses.len(), 1);
        assert!(patterns.unusual_expenses[0].z_score < -2.0);
    }

    #[test]
    fn test_severity_boundaries_are_strict() {
        let config = AnalysisConfig::default();
        assert_eq!(AnomalySeverity::classify(2.0, &config), None);
        assert_eq!(AnomalySeverity::classify(-2.0, &config), None);
        assert_eq!(
            AnomalySeverity::classify(2.0001, &config),
            Some(AnomalySeverity::Medium)
        );
        assert_eq!(
            AnomalySeverity::classify(3.0, &config),
            Some(AnomalySeverity::Medium)
        );
        assert_eq!(
            AnomalySeverity::classify(3.0001, &config),
            Some(AnomalySeverity::High)
        );
        assert_eq!(
            AnomalySeverity::classify(-3.5, &config),
            Some(AnomalySeverity::High)
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let config = AnalysisConfig {
            anomaly_z_threshold: 1.0,
            high_severity_z_threshold: 1.5,
            ..AnalysisConfig::default()
        };
        let records = vec![
            expense("Food", 10.0, date(2025, 3, 3)),
            expense("Food", 10.0, date(2025, 3, 4)),
            expense("Food", 100.0, date(2025, 3, 5)),
        ];
        let patterns = SpendingPatternAnalyzer::with_config(config).analyze(&records);
        assert_eq!(patterns.unusual_expenses.len(), 1);
        assert_eq!(
            patterns.unusual_expenses[0].severity,
            AnomalySeverity::Medium
        );
    }

    #[test]
    fn test_results_come_from_input() {
        let records = vec![
            expense("Food", 12.0, date(2025, 4, 1)),
            expense("Transport", 7.5, date(2025, 4, 2)),
            expense("Food", 3.0, date(2025, 4, 5)),
            expense("Books", 42.0, date(2025, 4, 9)),
            expense("Transport", 9.0, date(2025, 4, 12)),
        ];
        let patterns = SpendingPatternAnalyzer::new().analyze(&records);

        let categories: HashSet<&str> = records.iter().map(|r| r.category.as_str()).collect();
        let days: HashSet<&str> = records
            .iter()
            .map(|r| weekday_name(r.date.weekday()))
            .collect();

        assert!(categories.contains(patterns.top_category.as_str()));
        assert!(days.contains(patterns.peak_spending_day.as_str()));
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let mut records = expenses_with_outlier("Food", 10.0, 11, 100.0, date(2025, 1, 1));
        records.extend(expenses_with_outlier("Fuel", 40.0, 9, 4.0, date(2025, 1, 1)));

        let analyzer = SpendingPatternAnalyzer::new();
        let first = analyzer.analyze(&records);
        let second = analyzer.analyze(&records);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_anomalies_follow_category_order() {
        let mut records = expenses_with_outlier("Fuel", 40.0, 9, 4.0, date(2025, 1, 1));
        records.extend(expenses_with_outlier("Food", 10.0, 11, 100.0, date(2025, 1, 1)));

        let patterns = SpendingPatternAnalyzer::new().analyze(&records);
        let categories: Vec<&str> = patterns
            .unusual_expenses
            .iter()
            .map(|u| u.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Fuel", "Food"]);
    }

    #[test]
    fn test_serialized_shape() {
        let records = expenses_with_outlier("Food", 10.0, 11, 100.0, date(2025, 1, 1));
        let patterns = SpendingPatternAnalyzer::new().analyze(&records);
        let json = serde_json::to_value(&patterns).unwrap();

        assert_eq!(json["top_category"], "Food");
        assert_eq!(json["unusual_expenses"][0]["date"], "2025-01-12");
        assert_eq!(json["unusual_expenses"][0]["severity"], "high");
    }

    #[test]
    fn test_severity_round_trip_names() {
        assert_eq!(AnomalySeverity::High.to_string(), "high");
        assert_eq!(
            "medium".parse::<AnomalySeverity>().unwrap(),
            AnomalySeverity::Medium
        );
        assert!("low".parse::<AnomalySeverity>().is_err());
    }
}
