use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::service::CoachService;
use super::{AdviceProvider, ChatHistoryStore, CoachError, SessionId};
use crate::finance::router::error_response as finance_error_response;
use crate::finance::{
    FinanceService, GoalRepository, MonthlyBudget, SpendingPeriod, TransactionRepository,
};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub message: String,
    #[serde(default)]
    pub budget: Option<f64>,
}

/// Router builder for coach conversations. Advice is grounded in every
/// transaction stored by `finance`.
pub fn coach_router<P, H, T, G>(
    coach: Arc<CoachService<P, H>>,
    finance: Arc<FinanceService<T, G>>,
    default_budget: Option<MonthlyBudget>,
) -> Router
where
    P: AdviceProvider + 'static,
    H: ChatHistoryStore + 'static,
    T: TransactionRepository + 'static,
    G: GoalRepository + 'static,
{
    let state = CoachState {
        coach,
        finance,
        default_budget,
    };

    Router::new()
        .route(
            "/api/v1/coach/:session_id/messages",
            post(ask_handler::<P, H, T, G>),
        )
        .route(
            "/api/v1/coach/:session_id",
            get(history_handler::<P, H, T, G>).delete(reset_handler::<P, H, T, G>),
        )
        .with_state(state)
}

pub(crate) struct CoachState<P, H, T, G> {
    pub(crate) coach: Arc<CoachService<P, H>>,
    pub(crate) finance: Arc<FinanceService<T, G>>,
    pub(crate) default_budget: Option<MonthlyBudget>,
}

impl<P, H, T, G> Clone for CoachState<P, H, T, G> {
    fn clone(&self) -> Self {
        Self {
            coach: Arc::clone(&self.coach),
            finance: Arc::clone(&self.finance),
            default_budget: self.default_budget,
        }
    }
}

pub(crate) async fn ask_handler<P, H, T, G>(
    State(state): State<CoachState<P, H, T, G>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<AskRequest>,
) -> Response
where
    P: AdviceProvider + 'static,
    H: ChatHistoryStore + 'static,
    T: TransactionRepository + 'static,
    G: GoalRepository + 'static,
{
    let budget = match request.budget {
        Some(value) => match MonthlyBudget::new(value) {
            Ok(budget) => Some(budget),
            Err(err) => return error_response(CoachError::Validation(err)),
        },
        None => state.default_budget,
    };

    let transactions = match state.finance.transactions(SpendingPeriod::all()) {
        Ok(transactions) => transactions,
        Err(err) => return finance_error_response(err),
    };

    let session = SessionId::new(session_id);
    match state
        .coach
        .ask(&session, &request.message, &transactions, budget)
        .await
    {
        Ok(reply) => (StatusCode::OK, axum::Json(reply)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn history_handler<P, H, T, G>(
    State(state): State<CoachState<P, H, T, G>>,
    Path(session_id): Path<String>,
) -> Response
where
    P: AdviceProvider + 'static,
    H: ChatHistoryStore + 'static,
    T: TransactionRepository + 'static,
    G: GoalRepository + 'static,
{
    match state.coach.history(&SessionId::new(session_id)) {
        Ok(messages) => (StatusCode::OK, axum::Json(messages)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reset_handler<P, H, T, G>(
    State(state): State<CoachState<P, H, T, G>>,
    Path(session_id): Path<String>,
) -> Response
where
    P: AdviceProvider + 'static,
    H: ChatHistoryStore + 'static,
    T: TransactionRepository + 'static,
    G: GoalRepository + 'static,
{
    match state.coach.reset(&SessionId::new(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: CoachError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (err.status_code(), axum::Json(payload)).into_response()
}
