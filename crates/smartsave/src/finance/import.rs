//! Bank statement CSV import.
//!
//! Expected headers are `Date`, `Merchant`, `Amount`, `Category` and
//! `Essential` (only `Amount` is mandatory). Rows are converted into
//! [`TransactionDraft`]s so they pass through the same validation as HTTP input.

use super::domain::{AmountInput, TransactionDraft, ValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid statement CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unrecognised date '{value}'")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: unrecognised essential flag '{value}'")]
    InvalidEssentialFlag { row: usize, value: String },
    #[error("row {row}: {source}")]
    Validation {
        row: usize,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Deserialize)]
struct StatementRow {
    #[serde(
        rename = "Date",
        alias = "date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    date: Option<String>,
    #[serde(
        rename = "Merchant",
        alias = "merchant",
        alias = "Description",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    merchant: Option<String>,
    #[serde(rename = "Amount", alias = "amount")]
    amount: String,
    #[serde(
        rename = "Category",
        alias = "category",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    category: Option<String>,
    #[serde(
        rename = "Essential",
        alias = "essential",
        alias = "is_essential",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    essential: Option<String>,
}

/// Reads every row, failing on the first row that does not validate.
pub fn parse_statement<R: Read>(reader: R) -> Result<Vec<TransactionDraft>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut drafts = Vec::new();

    for (index, record) in csv_reader.deserialize::<StatementRow>().enumerate() {
        let row_number = index + 1;
        let row = record?;

        let amount = AmountInput::Text(row.amount);
        amount
            .validate()
            .map_err(|source| ImportError::Validation {
                row: row_number,
                source,
            })?;

        let date = row
            .date
            .map(|value| match parse_date(&value) {
                Some(date) => Ok(date),
                None => Err(ImportError::InvalidDate {
                    row: row_number,
                    value,
                }),
            })
            .transpose()?;

        let is_essential = row
            .essential
            .map(|value| match parse_essential(&value) {
                Some(flag) => Ok(flag),
                None => Err(ImportError::InvalidEssentialFlag {
                    row: row_number,
                    value,
                }),
            })
            .transpose()?;

        drafts.push(TransactionDraft {
            merchant: row.merchant,
            amount,
            category: row.category,
            date,
            is_essential,
        });
    }

    Ok(drafts)
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_essential(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "need" | "essential" => Some(true),
        "no" | "n" | "false" | "0" | "want" | "discretionary" => Some(false),
        _ => None,
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
