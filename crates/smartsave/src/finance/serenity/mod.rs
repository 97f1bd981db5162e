//! Serenity Score engine.
//!
//! Maps a set of spend records and an optional monthly budget to a 0-100
//! wellness score, a status label, and the spend aggregates the dashboard and
//! coach prompt consume. Without a budget the score penalises the share of
//! discretionary spending above a threshold; with a budget it decays with the
//! fraction of the budget already spent. The engine is a pure function of its
//! inputs and keeps no state between calls.

mod rules;
mod status;

pub use status::{SerenityStatus, StatusBand, StatusTable};

use super::domain::{MonthlyBudget, SpendingRecord};
use serde::{Deserialize, Serialize};

/// Tunables for the ratio formula and the status thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub discretionary_threshold: f64,
    pub penalty_per_point: f64,
    pub statuses: StatusTable,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            discretionary_threshold: 0.30,
            penalty_per_point: 2.0,
            statuses: StatusTable::default(),
        }
    }
}

/// Which formula produced the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringMode {
    NoData,
    DiscretionaryRatio,
    Budget { budget: f64, usage_ratio: f64 },
}

/// Engine output, rebuilt on every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub score: f64,
    pub status: SerenityStatus,
    pub status_label: &'static str,
    pub total_spent: f64,
    pub essential_spent: f64,
    pub discretionary_spent: f64,
    pub discretionary_ratio: f64,
    pub transaction_count: usize,
    pub mode: ScoringMode,
}

impl ScoreReport {
    fn no_data() -> Self {
        Self {
            score: 100.0,
            status: SerenityStatus::Stable,
            status_label: SerenityStatus::Stable.label(),
            total_spent: 0.0,
            essential_spent: 0.0,
            discretionary_spent: 0.0,
            discretionary_ratio: 0.0,
            transaction_count: 0,
            mode: ScoringMode::NoData,
        }
    }
}

/// Stateless scorer holding its configuration.
#[derive(Debug, Clone, Default)]
pub struct SerenityEngine {
    config: ScoringConfig,
}

impl SerenityEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score<T: SpendingRecord>(
        &self,
        transactions: &[T],
        budget: Option<MonthlyBudget>,
    ) -> ScoreReport {
        if transactions.is_empty() {
            return ScoreReport::no_data();
        }

        let signals = rules::spend_signals(
            transactions
                .iter()
                .map(|record| (record.amount(), record.is_essential())),
        );

        let (raw_score, mode) = match budget {
            Some(budget) => {
                let usage_ratio = signals.total_spent / budget.value();
                (
                    rules::budget_score(usage_ratio),
                    ScoringMode::Budget {
                        budget: budget.value(),
                        usage_ratio,
                    },
                )
            }
            None => (
                rules::discretionary_score(signals.discretionary_ratio, &self.config),
                ScoringMode::DiscretionaryRatio,
            ),
        };

        let score = rules::finalize(raw_score);
        let status = self.config.statuses.classify(score);

        ScoreReport {
            score,
            status,
            status_label: status.label(),
            total_spent: signals.total_spent,
            essential_spent: signals.total_spent - signals.discretionary_spent,
            discretionary_spent: signals.discretionary_spent,
            discretionary_ratio: signals.discretionary_ratio,
            transaction_count: transactions.len(),
            mode,
        }
    }
}

/// Scores with the default configuration.
pub fn score_finances<T: SpendingRecord>(
    transactions: &[T],
    budget: Option<MonthlyBudget>,
) -> ScoreReport {
    SerenityEngine::default().score(transactions, budget)
}
