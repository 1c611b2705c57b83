//! WASM bindings for receipt expense extraction.
//!
//! The browser runs OCR itself and hands the recognized text to these
//! bindings, which return the suggested expense fields.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use gastoscan_core::extract::rules::{format_euro_amount, parse_amount as parse_decimal};
use gastoscan_core::{
    Category, ExpenseDraft, ExtractionResult, ReceiptExtractor, ReceiptParser, ReviewPolicy,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract expense fields from OCR text.
///
/// Returns the serialized extraction: amount (as a string), ISO date,
/// merchant, category, confidence and the normalized text.
#[wasm_bindgen]
pub fn extract_receipt(text: &str) -> Result<JsValue, JsValue> {
    to_js(&gastoscan_core::extract(text))
}

/// Format an amount as euros in Spanish style (e.g. "12,50 €").
#[wasm_bindgen]
pub fn format_amount(amount: f64) -> String {
    match Decimal::try_from(amount) {
        Ok(decimal) => format_euro_amount(decimal),
        Err(_) => amount.to_string(),
    }
}

/// Parse a receipt amount such as "12,50".
#[wasm_bindgen]
pub fn parse_amount(amount: &str) -> Option<f64> {
    parse_decimal(amount).and_then(|d| d.to_f64())
}

/// List of category labels, in matching order.
#[wasm_bindgen]
pub fn categories() -> Vec<String> {
    Category::ALL.iter().map(|c| c.label().to_string()).collect()
}

/// Receipt scanner class for browser use.
#[wasm_bindgen]
pub struct ReceiptScanner {
    extractor: ReceiptExtractor,
    policy: ReviewPolicy,
}

#[wasm_bindgen]
impl ReceiptScanner {
    /// Create a scanner with the default review policy.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            extractor: ReceiptExtractor::new(),
            policy: ReviewPolicy::new(),
        }
    }

    #[wasm_bindgen]
    pub fn set_auto_approve(&mut self, auto_approve: bool) {
        self.policy = self.policy.clone().with_auto_approve(auto_approve);
    }

    #[wasm_bindgen]
    pub fn set_skip_low_confidence(&mut self, skip: bool) {
        self.policy = self.policy.clone().with_skip_low_confidence(skip);
    }

    /// Confidence below which drafts are skipped (clamped to 100).
    #[wasm_bindgen]
    pub fn set_confidence_threshold(&mut self, threshold: u8) {
        self.policy = self.policy.clone().with_confidence_threshold(threshold);
    }

    /// Category used when none is inferred. An empty string clears it.
    #[wasm_bindgen]
    pub fn set_default_category(&mut self, category: &str) -> Result<(), JsValue> {
        let category = if category.trim().is_empty() {
            None
        } else {
            Some(
                category
                    .parse::<Category>()
                    .map_err(|e| JsValue::from_str(&e.to_string()))?,
            )
        };
        self.policy = self.policy.clone().with_default_category(category);
        Ok(())
    }

    /// Extract expense fields from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.extractor.parse(text))
    }

    /// Extract and apply the review policy, returning the expense draft.
    #[wasm_bindgen]
    pub fn review(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.draft(text))
    }

    /// Extraction and draft together.
    #[wasm_bindgen]
    pub fn scan(&self, text: &str) -> Result<JsValue, JsValue> {
        #[derive(serde::Serialize)]
        struct ScanOutput {
            extraction: ExtractionResult,
            draft: ExpenseDraft,
        }

        let extraction = self.extractor.parse(text);
        let draft = self.policy.review(&extraction);
        to_js(&ScanOutput { extraction, draft })
    }
}

impl ReceiptScanner {
    fn draft(&self, text: &str) -> ExpenseDraft {
        self.policy.review(&self.extractor.parse(text))
    }
}

impl Default for ReceiptScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}
