//! Record types consumed by the analysis engine
//!
//! Records arrive from the storage layer already converted into one explicit
//! shape with named fields. The analysis code never mutates them.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Placeholder returned when a statistic is undefined
pub const NOT_AVAILABLE: &str = "N/A";

/// A single logged expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub user_id: String,
    pub category: String,
    /// Positive amount, currency-agnostic
    pub amount: f64,
    pub date: NaiveDate,
}

impl ExpenseRecord {
    pub fn new(
        user_id: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            category: category.into(),
            amount,
            date,
        }
    }

    /// Whether the record can take part in analysis (finite positive amount,
    /// non-empty category)
    pub fn is_valid(&self) -> bool {
        self.amount.is_finite() && self.amount > 0.0 && !self.category.trim().is_empty()
    }
}

/// A single logged income entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub user_id: String,
    pub amount: f64,
    pub date: NaiveDate,
}

impl IncomeRecord {
    pub fn new(user_id: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            date,
        }
    }
}

/// Anything that carries an owner and a calendar date
pub trait Dated {
    fn user_id(&self) -> &str;
    fn date(&self) -> NaiveDate;
}

impl Dated for ExpenseRecord {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for IncomeRecord {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// A calendar month such as `2025-09`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Parse a `YYYY-MM` string
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidData(format!("Invalid month '{}' (use YYYY-MM)", s));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        // Rejects month 0 and 13+
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;

        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Number of days in this month
    pub fn days(&self) -> u32 {
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        match (NaiveDate::from_ymd_opt(self.year, self.month, 1), next) {
            (Some(start), Some(next)) => (next - start).num_days() as u32,
            _ => 30,
        }
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Keep only records belonging to `user_id`
pub fn for_user<T: Dated + Clone>(records: &[T], user_id: &str) -> Vec<T> {
    records
        .iter()
        .filter(|r| r.user_id() == user_id)
        .cloned()
        .collect()
}

/// Keep only records dated within the given `YYYY-MM` month
pub fn in_month<T: Dated + Clone>(records: &[T], year_month: &str) -> Result<Vec<T>> {
    let month = YearMonth::parse(year_month)?;
    Ok(records
        .iter()
        .filter(|r| month.contains(r.date()))
        .cloned()
        .collect())
}
