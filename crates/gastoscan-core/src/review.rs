//! Review policy: turns an extraction into an editable expense draft.

use tracing::debug;

use crate::models::config::ReviewConfig;
use crate::models::expense::{ExpenseDraft, ReviewStatus};
use crate::models::receipt::{Category, ExtractionResult};

/// Decides how an extracted receipt is handed to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPolicy {
    auto_approve: bool,
    default_category: Option<Category>,
    skip_low_confidence: bool,
    confidence_threshold: u8,
}

impl ReviewPolicy {
    /// Create a policy with default settings: manual review, skip below 70.
    pub fn new() -> Self {
        Self {
            auto_approve: false,
            default_category: None,
            skip_low_confidence: true,
            confidence_threshold: 70,
        }
    }

    /// Approve drafts without asking the user.
    pub fn with_auto_approve(mut self, auto_approve: bool) -> Self {
        self.auto_approve = auto_approve;
        self
    }

    /// Category used when none was inferred.
    pub fn with_default_category(mut self, category: Option<Category>) -> Self {
        self.default_category = category;
        self
    }

    /// Skip drafts below the confidence threshold.
    pub fn with_skip_low_confidence(mut self, skip: bool) -> Self {
        self.skip_low_confidence = skip;
        self
    }

    /// Set the confidence threshold, clamped to 100.
    pub fn with_confidence_threshold(mut self, threshold: u8) -> Self {
        self.confidence_threshold = threshold.min(100);
        self
    }

    pub fn confidence_threshold(&self) -> u8 {
        self.confidence_threshold
    }

    /// Build the expense draft for one extraction.
    pub fn review(&self, result: &ExtractionResult) -> ExpenseDraft {
        let status = if self.skip_low_confidence && result.confidence() < self.confidence_threshold {
            ReviewStatus::Skipped
        } else if self.auto_approve {
            ReviewStatus::Approved
        } else {
            ReviewStatus::PendingReview
        };

        debug!(
            "Reviewed receipt with confidence {} (threshold {}): {:?}",
            result.confidence(),
            self.confidence_threshold,
            status
        );

        ExpenseDraft {
            amount: result.amount(),
            date: result.date(),
            description: result.description().to_string(),
            category: result.category().or(self.default_category),
            confidence: result.confidence(),
            status,
        }
    }
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&ReviewConfig> for ReviewPolicy {
    fn from(config: &ReviewConfig) -> Self {
        Self::new()
            .with_auto_approve(config.auto_approve)
            .with_default_category(config.default_category)
            .with_skip_low_confidence(config.skip_low_confidence)
            .with_confidence_threshold(config.confidence_threshold)
    }
}
