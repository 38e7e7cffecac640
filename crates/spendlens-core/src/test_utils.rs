//! Record fixtures for tests
//!
//! Enabled for this crate's own tests and, through the `test-utils` feature,
//! for dependent crates.

use std::io::Write;

use chrono::{Duration, NaiveDate};

use crate::models::{ExpenseRecord, IncomeRecord};

pub const TEST_USER: &str = "user@example.com";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub fn expense(category: &str, amount: f64, day: NaiveDate) -> ExpenseRecord {
    ExpenseRecord::new(TEST_USER, category, amount, day)
}

pub fn income(amount: f64, day: NaiveDate) -> IncomeRecord {
    IncomeRecord::new(TEST_USER, amount, day)
}

/// `count` identical expenses on consecutive days from `start`, followed by
/// one `outlier` on the next day
pub fn expenses_with_outlier(
    category: &str,
    base: f64,
    count: usize,
    outlier: f64,
    start: NaiveDate,
) -> Vec<ExpenseRecord> {
    let mut records: Vec<ExpenseRecord> = (0..count)
        .map(|i| expense(category, base, start + Duration::days(i as i64)))
        .collect();
    records.push(expense(
        category,
        outlier,
        start + Duration::days(count as i64),
    ));
    records
}

/// Render expense records as CSV with a `user_email` column
pub fn expenses_csv(records: &[ExpenseRecord]) -> String {
    let mut out = String::from("user_email,category,amount,date\n");
    for r in records {
        out.push_str(&format!(
            "{},{},{},{}\n",
            r.user_id,
            r.category,
            r.amount,
            r.date.format("%Y-%m-%d")
        ));
    }
    out
}

/// Render income records as CSV with a `user_email` column
pub fn income_csv(records: &[IncomeRecord]) -> String {
    let mut out = String::from("user_email,amount,date\n");
    for r in records {
        out.push_str(&format!(
            "{},{},{}\n",
            r.user_id,
            r.amount,
            r.date.format("%Y-%m-%d")
        ));
    }
    out
}

/// Write `contents` to a named temp file that lives as long as the handle
pub fn write_temp_csv(contents: &str) -> std::io::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}
