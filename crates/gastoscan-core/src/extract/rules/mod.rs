//! Rule-based field extractors for Spanish receipts.

pub mod amounts;
pub mod category;
pub mod dates;
pub mod merchant;
pub mod patterns;

pub use amounts::{format_euro_amount, parse_amount, AmountExtractor};
pub use category::{CategoryExtractor, CATEGORY_KEYWORDS};
pub use dates::{DateExtractor, YEAR_RANGE};
pub use merchant::{normalize_merchant, MerchantExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the best candidate for the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract every candidate, in rule priority order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A field value together with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Name of the rule that produced the value.
    pub rule: &'static str,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, rule: &'static str, source: impl Into<String>) -> Self {
        Self {
            value,
            rule,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
