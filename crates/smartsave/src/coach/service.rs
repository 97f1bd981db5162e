use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::prompt::build_messages;
use super::{
    AdviceProvider, ChatHistoryStore, ChatMessage, CoachContext, CoachError, SessionId,
};
use crate::finance::{MonthlyBudget, SerenityEngine, SerenityStatus, SpendingRecord, ValidationError};

#[derive(Debug, Clone, Serialize)]
pub struct CoachReply {
    pub session_id: SessionId,
    pub reply: String,
    pub score: f64,
    pub status: SerenityStatus,
}

/// Service pairing an advice provider with per-session chat history.
pub struct CoachService<P, H> {
    provider: Arc<P>,
    history: Arc<H>,
    engine: Arc<SerenityEngine>,
    history_limit: usize,
}

impl<P, H> CoachService<P, H>
where
    P: AdviceProvider + 'static,
    H: ChatHistoryStore + 'static,
{
    pub fn new(
        provider: Arc<P>,
        history: Arc<H>,
        engine: SerenityEngine,
        history_limit: usize,
    ) -> Self {
        Self {
            provider,
            history,
            engine: Arc::new(engine),
            history_limit,
        }
    }

    /// Score the supplied transactions, ask the provider, and record the exchange.
    ///
    /// Nothing is written to the session when the provider fails.
    pub async fn ask<T: SpendingRecord>(
        &self,
        session: &SessionId,
        message: &str,
        transactions: &[T],
        budget: Option<MonthlyBudget>,
    ) -> Result<CoachReply, CoachError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }

        let report = self.engine.score(transactions, budget);
        let context = CoachContext::new(&report, transactions);
        let history = self.history.history(session)?;
        let messages = build_messages(&context, &history, message, self.history_limit);

        let reply = match self.provider.get_advice(&messages, &context).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(session = %session, error = %err, "advice provider failed");
                return Err(err.into());
            }
        };

        self.history.append(session, ChatMessage::user(message))?;
        self.history
            .append(session, ChatMessage::assistant(reply.clone()))?;
        info!(
            session = %session,
            score = report.score,
            history = history.len() + 2,
            "coach replied"
        );

        Ok(CoachReply {
            session_id: session.clone(),
            reply,
            score: report.score,
            status: report.status,
        })
    }

    pub fn history(&self, session: &SessionId) -> Result<Vec<ChatMessage>, CoachError> {
        Ok(self.history.history(session)?)
    }

    pub fn reset(&self, session: &SessionId) -> Result<(), CoachError> {
        self.history.reset(session)?;
        info!(session = %session, "coach session cleared");
        Ok(())
    }
}
