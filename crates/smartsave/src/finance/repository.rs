use super::domain::{Transaction, TransactionId};
use super::goals::{Goal, GoalId};

/// Storage abstraction for recorded spending so services can run against any store.
pub trait TransactionRepository: Send + Sync {
    fn insert(&self, transaction: Transaction) -> Result<Transaction, RepositoryError>;
    fn fetch(&self, id: TransactionId) -> Result<Option<Transaction>, RepositoryError>;
    fn all(&self) -> Result<Vec<Transaction>, RepositoryError>;
}

/// Storage abstraction for savings goals. Goal names are unique.
pub trait GoalRepository: Send + Sync {
    fn insert(&self, goal: Goal) -> Result<Goal, RepositoryError>;
    fn update(&self, goal: Goal) -> Result<(), RepositoryError>;
    fn fetch(&self, id: GoalId) -> Result<Option<Goal>, RepositoryError>;
    fn all(&self) -> Result<Vec<Goal>, RepositoryError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
