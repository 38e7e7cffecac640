//! CSV import for expense and income records
//!
//! Converts rows exported from the row store into typed records once, at the
//! boundary. Columns are located by header name (case-insensitive):
//!
//! - expenses: `user_id` (or `user_email` / `user`), `category`, `amount`, `date`
//! - income: `user_id` (or `user_email` / `user`), `amount`, `date`
//!
//! Rows with an unparseable date, a non-numeric or non-positive amount, or an
//! empty category are skipped and counted rather than failing the import.

use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{ExpenseRecord, IncomeRecord};

const USER_COLUMNS: &[&str] = &["user_id", "user_email", "user"];
const CATEGORY_COLUMNS: &[&str] = &["category"];
const AMOUNT_COLUMNS: &[&str] = &["amount"];
const DATE_COLUMNS: &[&str] = &["date"];
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹', '₩', '₽', '₺', '₫', '₦', '₱'];

/// Parsed records plus the number of rows that were skipped
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

/// Parse expense rows from CSV
pub fn parse_expenses_csv<R: Read>(reader: R) -> Result<ImportOutcome<ExpenseRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let user_col = find_column(&headers, USER_COLUMNS);
    let category_col = require_column(&headers, CATEGORY_COLUMNS)?;
    let amount_col = require_column(&headers, AMOUNT_COLUMNS)?;
    let date_col = require_column(&headers, DATE_COLUMNS)?;

    let mut records = Vec::new();
    let mut skipped = 0;

    for result in rdr.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(
                    line = e.position().map(|p| p.line()).unwrap_or(0),
                    error = %e,
                    "Skipping unreadable expense row"
                );
                skipped += 1;
                continue;
            }
        };
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let category = row.get(category_col).unwrap_or_default();
        if category.is_empty() {
            warn!(line, "Skipping expense row with empty category");
            skipped += 1;
            continue;
        }

        let Some(amount) = row.get(amount_col).and_then(parse_amount) else {
            warn!(
                line,
                amount = row.get(amount_col).unwrap_or_default(),
                "Skipping expense row with invalid amount"
            );
            skipped += 1;
            continue;
        };

        let Some(date) = row.get(date_col).and_then(parse_date) else {
            warn!(
                line,
                date = row.get(date_col).unwrap_or_default(),
                "Skipping expense row with invalid date"
            );
            skipped += 1;
            continue;
        };

        let user_id = user_col.and_then(|c| row.get(c)).unwrap_or_default();
        records.push(ExpenseRecord::new(user_id, category, amount, date));
    }

    debug!(imported = records.len(), skipped, "Parsed expense CSV");
    Ok(ImportOutcome { records, skipped })
}

/// Parse income rows from CSV
pub fn parse_income_csv<R: Read>(reader: R) -> Result<ImportOutcome<IncomeRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let user_col = find_column(&headers, USER_COLUMNS);
    let amount_col = require_column(&headers, AMOUNT_COLUMNS)?;
    let date_col = require_column(&headers, DATE_COLUMNS)?;

    let mut records = Vec::new();
    let mut skipped = 0;

    for result in rdr.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(
                    line = e.position().map(|p| p.line()).unwrap_or(0),
                    error = %e,
                    "Skipping unreadable income row"
                );
                skipped += 1;
                continue;
            }
        };
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let amount = row.get(amount_col).and_then(parse_amount);
        let date = row.get(date_col).and_then(parse_date);

        match (amount, date) {
            (Some(amount), Some(date)) => {
                let user_id = user_col.and_then(|c| row.get(c)).unwrap_or_default();
                records.push(IncomeRecord::new(user_id, amount, date));
            }
            _ => {
                warn!(line, "Skipping malformed income row");
                skipped += 1;
            }
        }
    }

    debug!(imported = records.len(), skipped, "Parsed income CSV");
    Ok(ImportOutcome { records, skipped })
}

/// Parse a date as `YYYY-MM-DD`, an ISO date-time, or `MM/DD/YYYY`
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    // ISO date-time such as 2025-09-14T08:30:00Z
    if s.len() > 10 && s.is_char_boundary(10) {
        if let Ok(date) = NaiveDate::parse_from_str(&s[..10], "%Y-%m-%d") {
            return Some(date);
        }
    }
    NaiveDate::parse_from_str(s, "%m/%d/%Y").ok()
}

/// Parse a positive amount, tolerating a currency symbol and thousands
/// separators (e.g. `$1,234.50`)
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .trim_start_matches(|c: char| c.is_whitespace() || CURRENCY_SYMBOLS.contains(&c))
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();

    let amount: f64 = cleaned.trim().parse().ok()?;
    if amount.is_finite() && amount > 0.0 {
        Some(amount)
    } else {
        None
    }
}

fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim().to_lowercase();
        names.iter().any(|n| h == *n)
    })
}

fn require_column(headers: &StringRecord, names: &[&str]) -> Result<usize> {
    find_column(headers, names)
        .ok_or_else(|| Error::Import(format!("Missing required column: {}", names[0])))
}
