use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::domain::{
    MonthlyBudget, SpendingPeriod, Transaction, TransactionDraft, TransactionId, ValidationError,
};
use super::goals::{Goal, GoalDraft, GoalId, GoalView};
use super::import::{parse_statement, ImportError};
use super::insights::{category_insights, CategoryInsight};
use super::repository::{GoalRepository, RepositoryError, TransactionRepository};
use super::serenity::{ScoreReport, SerenityEngine};

/// Number of transactions surfaced on the dashboard.
pub const RECENT_TRANSACTIONS: usize = 3;

/// Service composing the transaction and goal stores with the Serenity engine.
pub struct FinanceService<T, G> {
    transactions: Arc<T>,
    goals: Arc<G>,
    engine: Arc<SerenityEngine>,
    transaction_sequence: AtomicU64,
    goal_sequence: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub report: ScoreReport,
    pub recent_transactions: Vec<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_budget: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsView {
    pub total_spent: f64,
    pub essential_spent: f64,
    pub discretionary_spent: f64,
    pub categories: Vec<CategoryInsight>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub total_amount: f64,
}

impl<T, G> FinanceService<T, G>
where
    T: TransactionRepository + 'static,
    G: GoalRepository + 'static,
{
    pub fn new(transactions: Arc<T>, goals: Arc<G>, engine: SerenityEngine) -> Self {
        Self {
            transactions,
            goals,
            engine: Arc::new(engine),
            transaction_sequence: AtomicU64::new(1),
            goal_sequence: AtomicU64::new(1),
        }
    }

    pub fn engine(&self) -> &SerenityEngine {
        &self.engine
    }

    fn next_transaction_id(&self) -> TransactionId {
        TransactionId(self.transaction_sequence.fetch_add(1, Ordering::Relaxed))
    }

    fn next_goal_id(&self) -> GoalId {
        GoalId(self.goal_sequence.fetch_add(1, Ordering::Relaxed))
    }

    /// Validate and store a new transaction.
    pub fn record_transaction(
        &self,
        draft: TransactionDraft,
    ) -> Result<Transaction, FinanceServiceError> {
        let transaction = Transaction::from_draft(self.next_transaction_id(), draft)?;
        let stored = self.transactions.insert(transaction)?;
        info!(
            id = stored.id.0,
            category = %stored.category,
            amount = stored.amount,
            essential = stored.is_essential,
            "transaction recorded"
        );
        Ok(stored)
    }

    /// Import a CSV statement. Every row is validated before any is stored, so a
    /// bad row stores nothing; a store failure mid-import can leave earlier rows
    /// inserted.
    pub fn import_statement<R: Read>(
        &self,
        reader: R,
    ) -> Result<ImportSummary, FinanceServiceError> {
        let drafts = parse_statement(reader)?;
        let mut prepared = Vec::with_capacity(drafts.len());
        for draft in drafts {
            prepared.push(Transaction::from_draft(self.next_transaction_id(), draft)?);
        }

        let mut total_amount = 0.0;
        for transaction in prepared.iter().cloned() {
            total_amount += transaction.amount;
            self.transactions.insert(transaction)?;
        }

        info!(imported = prepared.len(), total_amount, "statement imported");
        Ok(ImportSummary {
            imported: prepared.len(),
            total_amount,
        })
    }

    pub fn transaction(&self, id: TransactionId) -> Result<Transaction, FinanceServiceError> {
        let transaction = self
            .transactions
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(transaction)
    }

    /// Stored transactions inside the period, newest first.
    pub fn transactions(
        &self,
        period: SpendingPeriod,
    ) -> Result<Vec<Transaction>, FinanceServiceError> {
        let mut selected: Vec<Transaction> = self
            .transactions
            .all()?
            .into_iter()
            .filter(|transaction| period.contains(transaction.booked_on()))
            .collect();
        selected.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        Ok(selected)
    }

    pub fn score(
        &self,
        period: SpendingPeriod,
        budget: Option<MonthlyBudget>,
    ) -> Result<ScoreReport, FinanceServiceError> {
        let transactions = self.transactions(period)?;
        let report = self.engine.score(&transactions, budget);
        debug!(score = report.score, status = report.status_label, "serenity score computed");
        Ok(report)
    }

    pub fn dashboard(
        &self,
        period: SpendingPeriod,
        budget: Option<MonthlyBudget>,
    ) -> Result<DashboardView, FinanceServiceError> {
        let transactions = self.transactions(period)?;
        let report = self.engine.score(&transactions, budget);
        let remaining_budget = budget.map(|budget| budget.value() - report.total_spent);
        let recent_transactions = transactions.into_iter().take(RECENT_TRANSACTIONS).collect();

        Ok(DashboardView {
            report,
            recent_transactions,
            remaining_budget,
        })
    }

    pub fn analytics(&self, period: SpendingPeriod) -> Result<AnalyticsView, FinanceServiceError> {
        let transactions = self.transactions(period)?;
        let report = self.engine.score(&transactions, None);
        let categories = category_insights(&transactions, report.total_spent);

        Ok(AnalyticsView {
            total_spent: (report.total_spent * 100.0).round() / 100.0,
            essential_spent: report.essential_spent,
            discretionary_spent: report.discretionary_spent,
            categories,
        })
    }

    pub fn create_goal(&self, draft: GoalDraft) -> Result<GoalView, FinanceServiceError> {
        let goal = Goal::from_draft(self.next_goal_id(), draft)?;
        let stored = self.goals.insert(goal)?;
        info!(id = stored.id.0, name = %stored.name, target = stored.target, "goal created");
        Ok(stored.view())
    }

    pub fn contribute(&self, id: GoalId, amount: f64) -> Result<GoalView, FinanceServiceError> {
        let mut goal = self.goals.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        goal.contribute(amount)?;
        self.goals.update(goal.clone())?;
        info!(id = goal.id.0, amount, current = goal.current, "goal contribution saved");
        Ok(goal.view())
    }

    pub fn goals(&self) -> Result<Vec<GoalView>, FinanceServiceError> {
        let mut goals = self.goals.all()?;
        goals.sort_by_key(|goal| goal.id);
        Ok(goals.iter().map(Goal::view).collect())
    }
}

/// Error raised by the finance service.
#[derive(Debug, thiserror::Error)]
pub enum FinanceServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
