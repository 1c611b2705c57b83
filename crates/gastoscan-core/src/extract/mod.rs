//! Receipt field extraction module.

mod parser;
pub mod rules;

pub use parser::{normalize_text, ReceiptExtractor};

use crate::models::receipt::ExtractionResult;

/// Trait for receipt parsing.
///
/// Parsing never fails: text that yields nothing produces a result with
/// every field unset and zero confidence.
pub trait ReceiptParser {
    /// Parse receipt fields from raw OCR text.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Extract receipt fields from raw OCR text with the default rules.
pub fn extract(raw_text: &str) -> ExtractionResult {
    ReceiptExtractor::new().parse(raw_text)
}
