//! Rule-based receipt parser.

use tracing::debug;

use crate::models::receipt::ExtractionResult;

use super::rules::{
    AmountExtractor, CategoryExtractor, DateExtractor, FieldExtractor, MerchantExtractor,
};
use super::ReceiptParser;

/// Receipt parser running the amount, date, merchant and category rules.
///
/// Holds no state between calls and can be shared across threads.
#[derive(Default)]
pub struct ReceiptExtractor {
    amounts: AmountExtractor,
    dates: DateExtractor,
    merchants: MerchantExtractor,
    categories: CategoryExtractor,
}

impl ReceiptExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReceiptParser for ReceiptExtractor {
    fn parse(&self, text: &str) -> ExtractionResult {
        let normalized = normalize_text(text);

        debug!("Parsing receipt from {} characters of text", normalized.len());

        let amount = self.amounts.extract(&normalized);
        let date = self.dates.extract(&normalized);
        let merchant = self.merchants.extract(&normalized);
        let category = self.categories.extract(&normalized);

        if let Some(m) = &amount {
            debug!("Amount {} from rule {} ({:?})", m.value, m.rule, m.source);
        }
        if let Some(m) = &date {
            debug!("Date {} from rule {} ({:?})", m.value, m.rule, m.source);
        }
        if let Some(m) = &merchant {
            debug!("Merchant {:?} from rule {}", m.value, m.rule);
        }
        if let Some(m) = &category {
            debug!("Category {} from keyword {:?}", m.value, m.source);
        }

        let result = ExtractionResult::new(
            normalized,
            amount.map(|m| m.value),
            date.map(|m| m.value),
            merchant.map(|m| m.value),
            category.map(|m| m.value),
        );

        debug!("Extracted receipt with confidence {}", result.confidence());

        result
    }
}

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
