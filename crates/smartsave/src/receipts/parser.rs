use regex::Regex;

use super::{ReceiptError, ReceiptScan};

pub const UNKNOWN_MERCHANT: &str = "Unknown Store";
pub const DEFAULT_CATEGORY: &str = "Shopping";

const TOTAL_PATTERN: &str = r"(?i)(?:TOTAL|AMOUNT|EUR|MONTANT)[:\s]*(\d+[.,]\d{2})";
const PRICE_PATTERN: &str = r"\d+[.,]\d{2}";

/// First matching keyword list wins.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Food", &["coffee", "restaurant", "food", "eat", "cafe"]),
    ("Transport", &["uber", "taxi", "train", "fuel", "gas"]),
    ("Subs", &["netflix", "spotify", "disney", "prime"]),
];

/// Heuristic reader for OCR'd receipt text.
#[derive(Debug, Clone)]
pub struct ReceiptParser {
    total: Regex,
    price: Regex,
}

impl ReceiptParser {
    pub fn new() -> Result<Self, ReceiptError> {
        Ok(Self {
            total: Regex::new(TOTAL_PATTERN)?,
            price: Regex::new(PRICE_PATTERN)?,
        })
    }

    pub fn parse(&self, text: &str) -> ReceiptScan {
        ReceiptScan {
            merchant: merchant(text),
            amount: self.amount(text),
            category: category(text).to_string(),
        }
    }

    /// Keyword total when present, otherwise the largest price on the receipt.
    pub fn amount(&self, text: &str) -> f64 {
        if let Some(total) = self
            .total
            .captures(text)
            .and_then(|captures| captures.get(1))
            .and_then(|value| to_number(value.as_str()))
        {
            return total;
        }

        self.price
            .find_iter(text)
            .filter_map(|value| to_number(value.as_str()))
            .fold(0.0, f64::max)
    }
}

fn to_number(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse::<f64>().ok()
}

pub fn merchant(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| line.chars().count() > 2)
        .unwrap_or(UNKNOWN_MERCHANT)
        .to_string()
}

pub fn category(text: &str) -> &'static str {
    let lowered = text.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|word| lowered.contains(word)))
        .map(|(category, _)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}
