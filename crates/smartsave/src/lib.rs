//! SmartSave personal finance service.
//!
//! The [`finance`] module hosts the Serenity Score engine and the transaction,
//! goal, and analytics workflows built around it. [`coach`] and [`receipts`]
//! wrap the external AI and OCR collaborators behind narrow traits.

pub mod coach;
pub mod config;
pub mod error;
pub mod finance;
pub mod receipts;
pub mod telemetry;
