//! Data models for receipt extraction and expense drafts.

pub mod config;
pub mod expense;
pub mod receipt;

pub use config::GastoscanConfig;
pub use expense::{ExpenseDraft, ReviewStatus};
pub use receipt::{Category, ConfidenceLevel, ExtractionResult};
