//! Core library for receipt text extraction.
//!
//! This crate provides:
//! - Field extraction from raw OCR text (amount, date, merchant, category)
//! - Confidence scoring for the extracted fields
//! - Review policy turning an extraction into an editable expense draft
//! - Configuration shared by the CLI and WASM front-ends

pub mod error;
pub mod extract;
pub mod models;
pub mod review;

pub use error::{Result, ScanError};
pub use extract::{extract, ReceiptExtractor, ReceiptParser};
pub use models::receipt::{Category, ConfidenceLevel, ExtractionResult};
pub use models::expense::{ExpenseDraft, ReviewStatus};
pub use review::ReviewPolicy;
