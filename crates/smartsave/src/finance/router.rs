use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::domain::{MonthlyBudget, SpendingPeriod, TransactionDraft, TransactionId};
use super::goals::{GoalDraft, GoalId};
use super::repository::{GoalRepository, RepositoryError, TransactionRepository};
use super::service::{FinanceService, FinanceServiceError};

/// Query string shared by the dashboard and analytics endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub budget: Option<f64>,
}

impl PeriodQuery {
    fn period(&self) -> SpendingPeriod {
        SpendingPeriod {
            from: self.from,
            to: self.to,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ContributionRequest {
    pub amount: f64,
}

/// Router builder exposing transactions, dashboard, analytics, and goals.
///
/// `default_budget` applies to dashboard requests that do not name a budget.
pub fn finance_router<T, G>(
    service: Arc<FinanceService<T, G>>,
    default_budget: Option<MonthlyBudget>,
) -> Router
where
    T: TransactionRepository + 'static,
    G: GoalRepository + 'static,
{
    let state = FinanceState {
        service,
        default_budget,
    };

    Router::new()
        .route(
            "/api/v1/transactions",
            get(list_transactions_handler::<T, G>).post(record_transaction_handler::<T, G>),
        )
        .route(
            "/api/v1/transactions/import",
            post(import_statement_handler::<T, G>),
        )
        .route(
            "/api/v1/transactions/:transaction_id",
            get(get_transaction_handler::<T, G>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<T, G>))
        .route("/api/v1/analytics", get(analytics_handler::<T, G>))
        .route(
            "/api/v1/goals",
            get(list_goals_handler::<T, G>).post(create_goal_handler::<T, G>),
        )
        .route(
            "/api/v1/goals/:goal_id/contributions",
            post(contribute_handler::<T, G>),
        )
        .with_state(state)
}

pub(crate) struct FinanceState<T, G> {
    pub(crate) service: Arc<FinanceService<T, G>>,
    pub(crate) default_budget: Option<MonthlyBudget>,
}

impl<T, G> Clone for FinanceState<T, G> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            default_budget: self.default_budget,
        }
    }
}

pub(crate) async fn record_transaction_handler<T, G>(
    State(state): State<FinanceState<T, G>>,
    axum::Json(draft): axum::Json<TransactionDraft>,
) -> Response
where
    T: TransactionRepository + 'static,
    G: GoalRepository + 'static,
{
    match state.service.record_transaction(draft) {
        Ok(transaction) => (StatusCode::CREATED, axum::Json(transaction)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_transactions_handler<T, G>(
    State(state): State<FinanceState<T, G>>,
    Query(query): Query<PeriodQuery>,
) -> Response
where
    T: TransactionRepository + 'static,
    G: GoalRepository + 'static,
{
    match state.service.transactions(query.period()) {
        Ok(transactions) => (StatusCode::OK, axum::Json(transactions)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_transaction_handler<T, G>(
    State(state): State<FinanceState<T, G>>,
    Path(transaction_id): Path<u64>,
) -> Response
where
    T: TransactionRepository + 'static,
    G: GoalRepository + 'static,
{
    match state.service.transaction(TransactionId(transaction_id)) {
        Ok(transaction) => (StatusCode::OK, axum::Json(transaction)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn import_statement_handler<T, G>(
    State(state): State<FinanceState<T, G>>,
    body: String,
) -> Response
where
    T: TransactionRepository + 'static,
    G: GoalRepository + 'static,
{
    match state.service.import_statement(Cursor::new(body.into_bytes())) {
        Ok(summary) => (StatusCode::CREATED, axum::Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn dashboard_handler<T, G>(
    State(state): State<FinanceState<T, G>>,
    Query(query): Query<PeriodQuery>,
) -> Response
where
    T: TransactionRepository + 'static,
    G: GoalRepository + 'static,
{
    let budget = match resolve_budget(query.budget, state.default_budget) {
        Ok(budget) => budget,
        Err(err) => return error_response(err),
    };

    match state.service.dashboard(query.period(), budget) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn analytics_handler<T, G>(
    State(state): State<FinanceState<T, G>>,
    Query(query): Query<PeriodQuery>,
) -> Response
where
    T: TransactionRepository + 'static,
    G: GoalRepository + 'static,
{
    match state.service.analytics(query.period()) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_goals_handler<T, G>(State(state): State<FinanceState<T, G>>) -> Response
where
    T: TransactionRepository + 'static,
    G: GoalRepository + 'static,
{
    match state.service.goals() {
        Ok(goals) => (StatusCode::OK, axum::Json(goals)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_goal_handler<T, G>(
    State(state): State<FinanceState<T, G>>,
    axum::Json(draft): axum::Json<GoalDraft>,
) -> Response
where
    T: TransactionRepository + 'static,
    G: GoalRepository + 'static,
{
    match state.service.create_goal(draft) {
        Ok(goal) => (StatusCode::CREATED, axum::Json(goal)).into_response(),
        Err(FinanceServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({ "error": "a goal with this name already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn contribute_handler<T, G>(
    State(state): State<FinanceState<T, G>>,
    Path(goal_id): Path<u64>,
    axum::Json(request): axum::Json<ContributionRequest>,
) -> Response
where
    T: TransactionRepository + 'static,
    G: GoalRepository + 'static,
{
    match state.service.contribute(GoalId(goal_id), request.amount) {
        Ok(goal) => (StatusCode::OK, axum::Json(goal)).into_response(),
        Err(err) => error_response(err),
    }
}

fn resolve_budget(
    requested: Option<f64>,
    fallback: Option<MonthlyBudget>,
) -> Result<Option<MonthlyBudget>, FinanceServiceError> {
    match requested {
        Some(value) => Ok(Some(MonthlyBudget::new(value)?)),
        None => Ok(fallback),
    }
}

pub(crate) fn status_for(err: &FinanceServiceError) -> StatusCode {
    match err {
        FinanceServiceError::Validation(_) | FinanceServiceError::Import(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        FinanceServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        FinanceServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        FinanceServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(crate) fn error_response(err: FinanceServiceError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (status_for(&err), axum::Json(payload)).into_response()
}
