use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::finance::domain::{Transaction, TransactionDraft, TransactionId};
use crate::finance::goals::{Goal, GoalId};
use crate::finance::repository::{GoalRepository, RepositoryError, TransactionRepository};
use crate::finance::serenity::SerenityEngine;
use crate::finance::service::FinanceService;

pub(crate) fn tx(amount: f64, category: &str, is_essential: bool) -> Transaction {
    Transaction {
        id: TransactionId(0),
        merchant: "Test".to_string(),
        amount,
        category: category.to_string(),
        date: Utc.with_ymd_and_hms(2025, 9, 15, 12, 0, 0).unwrap(),
        is_essential,
    }
}

pub(crate) fn draft_on(
    day: u32,
    merchant: &str,
    amount: f64,
    category: &str,
    essential: bool,
) -> TransactionDraft {
    TransactionDraft::new(amount, category, essential)
        .with_merchant(merchant)
        .on(Utc.with_ymd_and_hms(2025, 9, day, 12, 0, 0).unwrap())
}

/// The five sample transactions the dashboard falls back to.
pub(crate) fn sample_drafts() -> Vec<TransactionDraft> {
    vec![
        draft_on(1, "Netflix", 15.99, "Subs", false),
        draft_on(2, "Carrefour", 82.50, "Food", true),
        draft_on(3, "Uber", 25.00, "Transport", false),
        draft_on(4, "Loyer", 800.00, "Housing", true),
        draft_on(5, "Starbucks", 6.50, "Food", false),
    ]
}

pub(crate) fn build_service() -> (
    FinanceService<MemoryTransactions, MemoryGoals>,
    Arc<MemoryTransactions>,
    Arc<MemoryGoals>,
) {
    let transactions = Arc::new(MemoryTransactions::default());
    let goals = Arc::new(MemoryGoals::default());
    let service =
        FinanceService::new(transactions.clone(), goals.clone(), SerenityEngine::default());
    (service, transactions, goals)
}

pub(crate) fn seeded_service() -> FinanceService<MemoryTransactions, MemoryGoals> {
    let (service, _, _) = build_service();
    for draft in sample_drafts() {
        service.record_transaction(draft).expect("sample transaction");
    }
    service
}

#[derive(Default, Clone)]
pub(crate) struct MemoryTransactions {
    pub(crate) records: Arc<Mutex<HashMap<TransactionId, Transaction>>>,
}

impl TransactionRepository for MemoryTransactions {
    fn insert(&self, transaction: Transaction) -> Result<Transaction, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&transaction.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(transaction.id, transaction.clone());
        Ok(transaction)
    }

    fn fetch(&self, id: TransactionId) -> Result<Option<Transaction>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<Transaction>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct MemoryGoals {
    pub(crate) records: Arc<Mutex<HashMap<GoalId, Goal>>>,
}

impl GoalRepository for MemoryGoals {
    fn insert(&self, goal: Goal) -> Result<Goal, RepositoryError> {
        let mut guard = self.records.lock().expect("goal mutex poisoned");
        if guard.values().any(|existing| existing.name == goal.name) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(goal.id, goal.clone());
        Ok(goal)
    }

    fn update(&self, goal: Goal) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("goal mutex poisoned");
        guard.insert(goal.id, goal);
        Ok(())
    }

    fn fetch(&self, id: GoalId) -> Result<Option<Goal>, RepositoryError> {
        let guard = self.records.lock().expect("goal mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<Goal>, RepositoryError> {
        let guard = self.records.lock().expect("goal mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(crate) struct UnavailableTransactions;

impl TransactionRepository for UnavailableTransactions {
    fn insert(&self, _transaction: Transaction) -> Result<Transaction, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: TransactionId) -> Result<Option<Transaction>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<Transaction>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
