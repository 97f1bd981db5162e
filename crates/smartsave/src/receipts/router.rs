use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::{ReceiptScanner, TextExtractor};

/// Largest accepted receipt upload.
pub const MAX_RECEIPT_BYTES: usize = 10 * 1024 * 1024;

/// Router builder for `POST /api/v1/receipts/scan`; the request body is the raw image.
pub fn receipts_router<E>(scanner: Arc<ReceiptScanner<E>>) -> Router
where
    E: TextExtractor + 'static,
{
    Router::new()
        .route("/api/v1/receipts/scan", post(scan_handler::<E>))
        .layer(DefaultBodyLimit::max(MAX_RECEIPT_BYTES))
        .with_state(scanner)
}

async fn scan_handler<E>(State(scanner): State<Arc<ReceiptScanner<E>>>, body: Bytes) -> Response
where
    E: TextExtractor + 'static,
{
    match scanner.extract_receipt(body.to_vec()).await {
        Ok(scan) => (StatusCode::OK, axum::Json(scan)).into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (err.status_code(), axum::Json(payload)).into_response()
        }
    }
}
