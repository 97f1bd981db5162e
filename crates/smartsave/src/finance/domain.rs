use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for stored transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

/// Read-only view the Serenity engine and insight helper need from a spend record.
pub trait SpendingRecord {
    fn amount(&self) -> f64;
    fn category(&self) -> &str;
    fn is_essential(&self) -> bool;
}

impl<T: SpendingRecord + ?Sized> SpendingRecord for &T {
    fn amount(&self) -> f64 {
        (**self).amount()
    }

    fn category(&self) -> &str {
        (**self).category()
    }

    fn is_essential(&self) -> bool {
        (**self).is_essential()
    }
}

/// A validated spend entry. Amounts are non-negative magnitudes; income is not tracked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub merchant: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
    pub is_essential: bool,
}

impl Transaction {
    pub fn from_draft(id: TransactionId, draft: TransactionDraft) -> Result<Self, ValidationError> {
        let amount = draft.amount.validate()?;
        let merchant = non_blank(draft.merchant).unwrap_or_else(|| "Unknown".to_string());
        let category = non_blank(draft.category).unwrap_or_else(|| "Uncategorized".to_string());

        Ok(Self {
            id,
            merchant,
            amount,
            category,
            date: draft.date.unwrap_or_else(Utc::now),
            is_essential: draft.is_essential.unwrap_or(true),
        })
    }

    pub fn booked_on(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

impl SpendingRecord for Transaction {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn is_essential(&self) -> bool {
        self.is_essential
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Untrusted transaction payload as received from HTTP, CSV, or receipt scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    #[serde(default)]
    pub merchant: Option<String>,
    pub amount: AmountInput,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_essential: Option<bool>,
}

impl TransactionDraft {
    pub fn new(amount: f64, category: impl Into<String>, is_essential: bool) -> Self {
        Self {
            merchant: None,
            amount: AmountInput::Number(amount),
            category: Some(category.into()),
            date: None,
            is_essential: Some(is_essential),
        }
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    pub fn on(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

/// Largest single amount accepted at the boundary. Sums of any realistic number
/// of records stay finite well below `f64::MAX`.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// Amount as supplied by a client: a JSON number or free text such as `"12,50"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    pub fn validate(&self) -> Result<f64, ValidationError> {
        let value = match self {
            AmountInput::Number(value) => *value,
            AmountInput::Text(raw) => parse_amount(raw)?,
        };

        if !value.is_finite() {
            return Err(ValidationError::NonFiniteAmount);
        }
        if value < 0.0 {
            return Err(ValidationError::NegativeAmount(value));
        }
        if value > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge(value));
        }
        Ok(value)
    }
}

/// Parses a decimal amount accepting either `.` or `,` as decimal separator and
/// an optional currency symbol.
pub fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches(['€', '$', '£'])
        .trim_end_matches(['€', '$', '£'])
        .trim()
        .replace(',', ".");

    cleaned
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidAmount {
            raw: raw.to_string(),
        })
}

/// Monthly spending ceiling used by the budget scoring mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MonthlyBudget(f64);

impl MonthlyBudget {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidBudget(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for MonthlyBudget {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        MonthlyBudget::new(value).map_err(serde::de::Error::custom)
    }
}

/// Inclusive date window used to slice stored transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SpendingPeriod {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl SpendingPeriod {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Boundary validation failures. The scoring engine never sees unvalidated input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("amount '{raw}' is not a number")]
    InvalidAmount { raw: String },
    #[error("amount {0} must not be negative")]
    NegativeAmount(f64),
    #[error("amount must be a finite number")]
    NonFiniteAmount,
    #[error("amount {0} exceeds the maximum of {max}", max = MAX_AMOUNT)]
    AmountTooLarge(f64),
    #[error("monthly budget {0} must be a positive number")]
    InvalidBudget(f64),
    #[error("goal name must not be empty")]
    EmptyGoalName,
    #[error("goal target {0} must be a positive number")]
    InvalidGoalTarget(f64),
    #[error("contribution {0} must be a positive number")]
    InvalidContribution(f64),
    #[error("message must not be empty")]
    EmptyMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn amount_accepts_comma_decimal_and_currency() {
        assert_eq!(AmountInput::Text("12,50".into()).validate(), Ok(12.5));
        assert_eq!(AmountInput::Text(" €82.50 ".into()).validate(), Ok(82.5));
        assert_eq!(AmountInput::Number(0.0).validate(), Ok(0.0));
    }

    #[test]
    fn amount_rejects_garbage_negative_and_nan() {
        assert_eq!(
            AmountInput::Text("twelve".into()).validate(),
            Err(ValidationError::InvalidAmount {
                raw: "twelve".into()
            })
        );
        assert_eq!(
            AmountInput::Number(-3.0).validate(),
            Err(ValidationError::NegativeAmount(-3.0))
        );
        assert_eq!(
            AmountInput::Number(f64::INFINITY).validate(),
            Err(ValidationError::NonFiniteAmount)
        );
        assert_eq!(
            AmountInput::Text("NaN".into()).validate(),
            Err(ValidationError::NonFiniteAmount)
        );
    }

    #[test]
    fn amount_is_capped() {
        assert_eq!(AmountInput::Number(MAX_AMOUNT).validate(), Ok(MAX_AMOUNT));
        assert_eq!(
            AmountInput::Number(1e308).validate(),
            Err(ValidationError::AmountTooLarge(1e308))
        );
        assert!(matches!(
            AmountInput::Text("2000000000000,00".into()).validate(),
            Err(ValidationError::AmountTooLarge(_))
        ));
    }

    #[test]
    fn draft_defaults_fill_missing_fields() {
        let draft: TransactionDraft =
            serde_json::from_str(r#"{"amount": "15.99", "category": "  "}"#).expect("json");
        let tx = Transaction::from_draft(TransactionId(7), draft).expect("valid");
        assert_eq!(tx.merchant, "Unknown");
        assert_eq!(tx.category, "Uncategorized");
        assert!(tx.is_essential);
        assert!((tx.amount - 15.99).abs() < f64::EPSILON);
    }

    #[test]
    fn draft_rejects_non_numeric_json_amount() {
        let draft: TransactionDraft =
            serde_json::from_str(r#"{"amount": "abc", "category": "Food"}"#).expect("json");
        assert!(matches!(
            Transaction::from_draft(TransactionId(1), draft),
            Err(ValidationError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn budget_must_be_positive() {
        assert!(MonthlyBudget::new(1500.0).is_ok());
        assert_eq!(
            MonthlyBudget::new(0.0),
            Err(ValidationError::InvalidBudget(0.0))
        );
        assert!(serde_json::from_str::<MonthlyBudget>("-10").is_err());
    }

    #[test]
    fn period_bounds_are_inclusive() {
        let from = NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid");
        let to = NaiveDate::from_ymd_opt(2025, 9, 30).expect("valid");
        let period = SpendingPeriod::between(from, to);
        assert!(period.contains(from));
        assert!(period.contains(to));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid")));
        let date = Utc.with_ymd_and_hms(2025, 9, 12, 8, 0, 0).unwrap();
        assert!(SpendingPeriod::all().contains(date.date_naive()));
    }
}
