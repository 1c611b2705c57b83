//! Editable expense draft pre-filled from a receipt extraction.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::receipt::Category;

/// What should happen to a draft after extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Shown to the user for confirmation before saving.
    #[default]
    PendingReview,
    /// Saved without user confirmation.
    Approved,
    /// Dropped because extraction confidence was too low.
    Skipped,
}

/// Expense form values suggested by the extractor.
///
/// All fields stay editable; the extractor's guesses are not authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    /// Confidence of the extraction this draft came from.
    pub confidence: u8,

    pub status: ReviewStatus,
}

impl ExpenseDraft {
    /// True if the draft has everything an expense record needs.
    pub fn is_complete(&self) -> bool {
        self.amount.is_some() && self.date.is_some() && self.category.is_some()
    }
}
