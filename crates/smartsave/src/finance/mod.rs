//! Spending, scoring, and savings-goal workflows.

pub mod domain;
pub mod goals;
pub mod import;
pub mod insights;
pub mod repository;
pub mod router;
pub mod serenity;
pub mod service;

#[cfg(test)]
pub(crate) mod tests;

pub use domain::{
    AmountInput, MonthlyBudget, SpendingPeriod, SpendingRecord, Transaction, TransactionDraft,
    TransactionId, ValidationError, MAX_AMOUNT,
};
pub use goals::{Goal, GoalDraft, GoalId, GoalProgress, GoalView};
pub use import::{parse_statement, ImportError};
pub use insights::{category_insights, CategoryInsight, InsightStatus};
pub use repository::{GoalRepository, RepositoryError, TransactionRepository};
pub use router::finance_router;
pub use serenity::{
    score_finances, ScoreReport, ScoringConfig, ScoringMode, SerenityEngine, SerenityStatus,
    StatusTable,
};
pub use service::{AnalyticsView, DashboardView, FinanceService, FinanceServiceError, ImportSummary};
