use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use super::{shared, MemoryHistory, ScriptedProvider};
use crate::coach::{coach_router, CoachService, OfflineCoach};
use crate::finance::tests::common::{read_json_body, seeded_service};
use crate::finance::{MonthlyBudget, SerenityEngine};

fn ask(session: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(format!("/api/v1/coach/{session}/messages"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn offline_router(default_budget: Option<MonthlyBudget>) -> Router {
    let coach = CoachService::new(
        shared(OfflineCoach),
        shared(MemoryHistory::default()),
        SerenityEngine::default(),
        20,
    );
    coach_router(Arc::new(coach), Arc::new(seeded_service()), default_budget)
}

#[tokio::test]
async fn ask_route_answers_from_stored_transactions() {
    let router = offline_router(Some(MonthlyBudget::new(1500.0).expect("budget")));

    let response = router
        .oneshot(ask("alice", json!({ "message": "Where does my money go?" })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["session_id"], json!("alice"));
    assert_eq!(payload["status"], json!("good"));
    let reply = payload["reply"].as_str().expect("reply text");
    assert!(reply.contains("reducing your non-essential spending"));
    assert!(reply.contains("Housing 86%"));
}

#[tokio::test]
async fn history_and_reset_routes() {
    let router = offline_router(None);

    let asked = router
        .clone()
        .oneshot(ask("bob", json!({ "message": "hello" })))
        .await
        .expect("route executes");
    assert_eq!(asked.status(), StatusCode::OK);

    let history = router
        .clone()
        .oneshot(Request::get("/api/v1/coach/bob").body(Body::empty()).unwrap())
        .await
        .expect("route executes");
    assert_eq!(history.status(), StatusCode::OK);
    let payload = read_json_body(history).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(2));
    assert_eq!(payload[0]["role"], json!("user"));
    assert_eq!(payload[1]["role"], json!("assistant"));

    let cleared = router
        .clone()
        .oneshot(
            Request::delete("/api/v1/coach/bob")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(cleared.status(), StatusCode::NO_CONTENT);

    let after = router
        .oneshot(Request::get("/api/v1/coach/bob").body(Body::empty()).unwrap())
        .await
        .expect("route executes");
    let payload = read_json_body(after).await;
    assert_eq!(payload, json!([]));
}

#[tokio::test]
async fn ask_route_maps_errors() {
    let router = offline_router(None);
    let blank = router
        .clone()
        .oneshot(ask("carol", json!({ "message": " " })))
        .await
        .expect("route executes");
    assert_eq!(blank.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let bad_budget = router
        .oneshot(ask("carol", json!({ "message": "hi", "budget": 0.0 })))
        .await
        .expect("route executes");
    assert_eq!(bad_budget.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let coach = CoachService::new(
        shared(ScriptedProvider::failing()),
        shared(MemoryHistory::default()),
        SerenityEngine::default(),
        20,
    );
    let failing = coach_router(Arc::new(coach), Arc::new(seeded_service()), None);
    let upstream = failing
        .oneshot(ask("carol", json!({ "message": "hi" })))
        .await
        .expect("route executes");
    assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
    let payload = read_json_body(upstream).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("model overloaded"));
}
