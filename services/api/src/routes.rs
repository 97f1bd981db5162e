use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use smartsave::error::AppError;
use smartsave::finance::{
    category_insights, CategoryInsight, MonthlyBudget, ScoreReport, Transaction,
    TransactionDraft, TransactionId,
};

/// Stateless scoring request: nothing is stored.
#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    #[serde(default)]
    pub(crate) transactions: Vec<TransactionDraft>,
    #[serde(default)]
    pub(crate) budget: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreResponse {
    pub(crate) report: ScoreReport,
    pub(crate) insights: Vec<CategoryInsight>,
}

pub(crate) fn with_system_routes(router: Router) -> Router {
    router
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/score", axum::routing::post(score_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn score_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let ScoreRequest {
        transactions,
        budget,
    } = payload;

    let budget = budget.map(MonthlyBudget::new).transpose()?;
    let transactions = transactions
        .into_iter()
        .zip(1..)
        .map(|(draft, id)| Transaction::from_draft(TransactionId(id), draft))
        .collect::<Result<Vec<_>, _>>()?;

    let report = state.engine.score(&transactions, budget);
    let insights = category_insights(&transactions, report.total_spent);
    Ok(Json(ScoreResponse { report, insights }))
}
