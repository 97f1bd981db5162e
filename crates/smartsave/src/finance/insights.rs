use super::domain::SpendingRecord;
use serde::Serialize;
use std::collections::HashMap;

/// Categories above this share of total spend (in whole percent) are flagged.
pub const HIGH_SPENDING_PERCENT: u32 = 30;

const DEFAULT_ICON: &str = "fa-tag";
const HIGH_COLOR: &str = "#EF4444";
const ON_TRACK_COLOR: &str = "#10B981";

const CATEGORY_ICONS: &[(&str, &str)] = &[
    ("Food", "fa-utensils"),
    ("Transport", "fa-car"),
    ("Housing", "fa-house"),
    ("Shopping", "fa-bag-shopping"),
    ("Health", "fa-heart-pulse"),
    ("Entertainment", "fa-gamepad"),
    ("Bills", "fa-file-invoice-dollar"),
];

pub fn category_icon(category: &str) -> &'static str {
    CATEGORY_ICONS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightStatus {
    HighSpending,
    OnTrack,
}

impl InsightStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::HighSpending => "High Spending",
            Self::OnTrack => "On track",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInsight {
    pub name: String,
    pub amount: f64,
    pub percentage: u32,
    pub icon: &'static str,
    pub color: &'static str,
    pub status: InsightStatus,
    pub status_label: &'static str,
}

impl CategoryInsight {
    pub fn is_high(&self) -> bool {
        self.status == InsightStatus::HighSpending
    }
}

/// Groups spend by category and ranks categories by amount, largest first.
pub fn category_insights<T: SpendingRecord>(
    transactions: &[T],
    total_spent: f64,
) -> Vec<CategoryInsight> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for record in transactions {
        *totals.entry(record.category()).or_insert(0.0) += record.amount();
    }

    let mut ranked: Vec<(&str, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .map(|(name, amount)| {
            let percentage = if total_spent > 0.0 {
                (amount / total_spent * 100.0) as u32
            } else {
                0
            };
            let status = if percentage > HIGH_SPENDING_PERCENT {
                InsightStatus::HighSpending
            } else {
                InsightStatus::OnTrack
            };
            let color = match status {
                InsightStatus::HighSpending => HIGH_COLOR,
                InsightStatus::OnTrack => ON_TRACK_COLOR,
            };

            CategoryInsight {
                name: name.to_string(),
                amount: (amount * 100.0).round() / 100.0,
                percentage,
                icon: category_icon(name),
                color,
                status,
                status_label: status.label(),
            }
        })
        .collect()
}
