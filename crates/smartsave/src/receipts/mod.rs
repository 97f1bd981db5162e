//! Receipt scanning: OCR text extraction followed by heuristic parsing.

pub mod parser;
pub mod router;
pub mod tesseract;

use std::sync::Arc;

use axum::http::StatusCode;
use serde::Serialize;
use tracing::{debug, info};

pub use parser::ReceiptParser;
pub use router::receipts_router;
pub use tesseract::TesseractCommand;

/// Turns an image into raw text.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, image: &[u8]) -> Result<String, ExtractionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("ocr io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("ocr exited with status {status:?}: {stderr}")]
    Failed { status: Option<i32>, stderr: String },
    #[error("ocr output was not utf-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ReceiptError {
    #[error("receipt image is empty")]
    EmptyImage,
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("receipt pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
    #[error("receipt worker failed: {0}")]
    Worker(String),
}

impl ReceiptError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReceiptError::EmptyImage => StatusCode::UNPROCESSABLE_ENTITY,
            ReceiptError::Extraction(_) => StatusCode::BAD_GATEWAY,
            ReceiptError::Pattern(_) | ReceiptError::Worker(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Fields recovered from a receipt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptScan {
    pub merchant: String,
    pub amount: f64,
    pub category: String,
}

/// Runs the extractor off the async runtime and parses its output.
pub struct ReceiptScanner<E> {
    extractor: Arc<E>,
    parser: Arc<ReceiptParser>,
}

impl<E> ReceiptScanner<E>
where
    E: TextExtractor + 'static,
{
    pub fn new(extractor: Arc<E>, parser: ReceiptParser) -> Self {
        Self {
            extractor,
            parser: Arc::new(parser),
        }
    }

    pub async fn extract_receipt(&self, image: Vec<u8>) -> Result<ReceiptScan, ReceiptError> {
        if image.is_empty() {
            return Err(ReceiptError::EmptyImage);
        }

        let bytes = image.len();
        let extractor = Arc::clone(&self.extractor);
        let text = tokio::task::spawn_blocking(move || extractor.extract_text(&image))
            .await
            .map_err(|err| ReceiptError::Worker(err.to_string()))??;
        debug!(bytes, characters = text.len(), "receipt text extracted");

        let scan = self.parser.parse(&text);
        info!(
            merchant = %scan.merchant,
            amount = scan.amount,
            category = %scan.category,
            "receipt scanned"
        );
        Ok(scan)
    }
}
