use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use smartsave::coach::{
    AdviceError, AdviceProvider, ChatHistoryStore, ChatMessage, CoachContext, OfflineCoach,
    OpenAiClient, SessionId,
};
use smartsave::config::CoachConfig;
use smartsave::finance::{
    Goal, GoalId, GoalRepository, RepositoryError, SerenityEngine, Transaction, TransactionId,
    TransactionRepository,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) engine: Arc<SerenityEngine>,
}

fn lock<'a, T>(
    mutex: &'a Mutex<T>,
    store: &str,
) -> Result<MutexGuard<'a, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{store} mutex poisoned")))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTransactionRepository {
    records: Arc<Mutex<HashMap<TransactionId, Transaction>>>,
}

impl TransactionRepository for InMemoryTransactionRepository {
    fn insert(&self, record: Transaction) -> Result<Transaction, RepositoryError> {
        let mut guard = lock(&self.records, "transaction store")?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: TransactionId) -> Result<Option<Transaction>, RepositoryError> {
        let guard = lock(&self.records, "transaction store")?;
        Ok(guard.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<Transaction>, RepositoryError> {
        let guard = lock(&self.records, "transaction store")?;
        Ok(guard.values().cloned().collect())
    }
}

/// Goal names are unique regardless of case.
#[derive(Default, Clone)]
pub(crate) struct InMemoryGoalRepository {
    records: Arc<Mutex<HashMap<GoalId, Goal>>>,
}

impl GoalRepository for InMemoryGoalRepository {
    fn insert(&self, goal: Goal) -> Result<Goal, RepositoryError> {
        let mut guard = lock(&self.records, "goal store")?;
        let duplicate = guard.contains_key(&goal.id)
            || guard
                .values()
                .any(|existing| existing.name.eq_ignore_ascii_case(&goal.name));
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(goal.id, goal.clone());
        Ok(goal)
    }

    fn update(&self, goal: Goal) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records, "goal store")?;
        match guard.get_mut(&goal.id) {
            Some(existing) => {
                *existing = goal;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: GoalId) -> Result<Option<Goal>, RepositoryError> {
        let guard = lock(&self.records, "goal store")?;
        Ok(guard.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<Goal>, RepositoryError> {
        let guard = lock(&self.records, "goal store")?;
        Ok(guard.values().cloned().collect())
    }
}

/// Keeps the most recent `retain` messages of every session.
#[derive(Clone)]
pub(crate) struct InMemoryChatHistory {
    sessions: Arc<Mutex<HashMap<SessionId, Vec<ChatMessage>>>>,
    retain: usize,
}

impl InMemoryChatHistory {
    pub(crate) fn retaining(retain: usize) -> Self {
        Self {
            sessions: Arc::default(),
            retain,
        }
    }
}

impl ChatHistoryStore for InMemoryChatHistory {
    fn history(&self, session: &SessionId) -> Result<Vec<ChatMessage>, RepositoryError> {
        let guard = lock(&self.sessions, "chat history")?;
        Ok(guard.get(session).cloned().unwrap_or_default())
    }

    fn append(&self, session: &SessionId, message: ChatMessage) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.sessions, "chat history")?;
        let messages = guard.entry(session.clone()).or_default();
        messages.push(message);
        let overflow = messages.len().saturating_sub(self.retain);
        messages.drain(..overflow);
        Ok(())
    }

    fn reset(&self, session: &SessionId) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.sessions, "chat history")?;
        guard.remove(session);
        Ok(())
    }
}

/// Chat backend chosen at startup: OpenAI when a key is configured, canned advice otherwise.
pub(crate) enum CoachBackend {
    OpenAi(OpenAiClient),
    Offline(OfflineCoach),
}

impl CoachBackend {
    pub(crate) fn from_config(config: &CoachConfig) -> Self {
        match &config.api_key {
            Some(key) => Self::OpenAi(OpenAiClient::new(
                &config.base_url,
                key.clone(),
                config.model.clone(),
            )),
            None => Self::Offline(OfflineCoach),
        }
    }

    pub(crate) fn name(&self) -> &str {
        match self {
            Self::OpenAi(client) => client.model(),
            Self::Offline(_) => "offline",
        }
    }
}

impl AdviceProvider for CoachBackend {
    async fn get_advice(
        &self,
        messages: &[ChatMessage],
        context: &CoachContext,
    ) -> Result<String, AdviceError> {
        match self {
            Self::OpenAi(client) => client.get_advice(messages, context).await,
            Self::Offline(coach) => coach.get_advice(messages, context).await,
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
