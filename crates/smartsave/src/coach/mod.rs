//! Conversational coaching on top of the Serenity Score.
//!
//! The chat backend is a black box behind [`AdviceProvider`]; the service
//! only assembles the prompt from the user's spending and keeps a bounded
//! per-session history.

pub mod offline;
pub mod openai;
pub mod prompt;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

use std::fmt;
use std::future::Future;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::finance::{
    category_insights, RepositoryError, ScoreReport, SerenityStatus, SpendingRecord,
    ValidationError,
};

pub use offline::OfflineCoach;
pub use openai::OpenAiClient;
pub use router::coach_router;
pub use service::{CoachReply, CoachService};

/// Number of categories quoted back to the coach.
pub const TOP_CATEGORIES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Identifier grouping one user's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Financial snapshot handed to the advice provider alongside the chat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachContext {
    pub score: f64,
    pub status: SerenityStatus,
    pub status_label: &'static str,
    pub total_spent: f64,
    pub essential_spent: f64,
    pub discretionary_spent: f64,
    pub transaction_count: usize,
    pub top_categories: Vec<String>,
    pub summary: String,
}

impl CoachContext {
    pub fn new<T: SpendingRecord>(report: &ScoreReport, transactions: &[T]) -> Self {
        let top_categories: Vec<String> = category_insights(transactions, report.total_spent)
            .into_iter()
            .take(TOP_CATEGORIES)
            .map(|insight| format!("{} {}%", insight.name, insight.percentage))
            .collect();

        let summary = if report.transaction_count == 0 {
            "No transactions recorded yet.".to_string()
        } else {
            format!(
                "{} transactions totalling {:.2} (essential {:.2}, discretionary {:.2}). Top categories: {}.",
                report.transaction_count,
                report.total_spent,
                report.essential_spent,
                report.discretionary_spent,
                top_categories.join(", "),
            )
        };

        Self {
            score: report.score,
            status: report.status,
            status_label: report.status_label,
            total_spent: report.total_spent,
            essential_spent: report.essential_spent,
            discretionary_spent: report.discretionary_spent,
            transaction_count: report.transaction_count,
            top_categories,
            summary,
        }
    }
}

/// Chat backend producing the assistant's next message.
pub trait AdviceProvider: Send + Sync {
    fn get_advice(
        &self,
        messages: &[ChatMessage],
        context: &CoachContext,
    ) -> impl Future<Output = Result<String, AdviceError>> + Send;
}

/// Per-session conversation storage.
pub trait ChatHistoryStore: Send + Sync {
    fn history(&self, session: &SessionId) -> Result<Vec<ChatMessage>, RepositoryError>;
    fn append(&self, session: &SessionId, message: ChatMessage) -> Result<(), RepositoryError>;
    fn reset(&self, session: &SessionId) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AdviceError {
    #[error("advice provider rejected the credentials")]
    Unauthorized,
    #[error("advice provider is rate limiting requests")]
    RateLimited,
    #[error("advice provider returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("advice provider returned no message")]
    EmptyResponse,
    #[error("advice provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Advice(#[from] AdviceError),
    #[error(transparent)]
    History(#[from] RepositoryError),
}

impl CoachError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CoachError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CoachError::Advice(_) => StatusCode::BAD_GATEWAY,
            CoachError::History(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
