mod routing;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{
    AdviceError, AdviceProvider, ChatHistoryStore, ChatMessage, CoachContext, SessionId,
};
use crate::finance::RepositoryError;

/// Provider returning a fixed reply and remembering what it was sent.
#[derive(Default)]
pub(super) struct ScriptedProvider {
    pub(super) reply: Option<String>,
    pub(super) seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    pub(super) fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn failing() -> Self {
        Self::default()
    }

    pub(super) fn last_request(&self) -> Vec<ChatMessage> {
        self.seen
            .lock()
            .expect("provider mutex poisoned")
            .last()
            .cloned()
            .unwrap_or_default()
    }
}

impl AdviceProvider for ScriptedProvider {
    async fn get_advice(
        &self,
        messages: &[ChatMessage],
        _context: &CoachContext,
    ) -> Result<String, AdviceError> {
        self.seen
            .lock()
            .expect("provider mutex poisoned")
            .push(messages.to_vec());
        self.reply.clone().ok_or(AdviceError::Upstream {
            status: 503,
            message: "model overloaded".to_string(),
        })
    }
}

#[derive(Default)]
pub(super) struct MemoryHistory {
    sessions: Mutex<HashMap<SessionId, Vec<ChatMessage>>>,
}

impl ChatHistoryStore for MemoryHistory {
    fn history(&self, session: &SessionId) -> Result<Vec<ChatMessage>, RepositoryError> {
        let guard = self.sessions.lock().expect("history mutex poisoned");
        Ok(guard.get(session).cloned().unwrap_or_default())
    }

    fn append(&self, session: &SessionId, message: ChatMessage) -> Result<(), RepositoryError> {
        let mut guard = self.sessions.lock().expect("history mutex poisoned");
        guard.entry(session.clone()).or_default().push(message);
        Ok(())
    }

    fn reset(&self, session: &SessionId) -> Result<(), RepositoryError> {
        let mut guard = self.sessions.lock().expect("history mutex poisoned");
        guard.remove(session);
        Ok(())
    }
}

pub(super) fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
