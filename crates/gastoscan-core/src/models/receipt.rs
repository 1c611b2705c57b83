//! Receipt extraction result and expense categories.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Confidence contributed by an extracted amount.
pub const AMOUNT_WEIGHT: u8 = 40;
/// Confidence contributed by an extracted date.
pub const DATE_WEIGHT: u8 = 30;
/// Confidence contributed by an extracted merchant.
pub const MERCHANT_WEIGHT: u8 = 20;
/// Confidence contributed by an inferred category.
pub const CATEGORY_WEIGHT: u8 = 10;

/// Description used for expenses whose merchant could not be read.
pub const FALLBACK_DESCRIPTION: &str = "Gasto escaneado";

/// Structured fields inferred from the text of one receipt.
///
/// Every field is a best guess meant to pre-fill a form the user reviews.
/// `confidence` always equals the summed weights of the fields that are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    merchant: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<Category>,

    confidence: u8,

    raw_text: String,
}

impl ExtractionResult {
    /// Build a result from its fields, scoring confidence from field presence.
    pub fn new(
        raw_text: impl Into<String>,
        amount: Option<Decimal>,
        date: Option<NaiveDate>,
        merchant: Option<String>,
        category: Option<Category>,
    ) -> Self {
        let mut confidence = 0;
        if amount.is_some() {
            confidence += AMOUNT_WEIGHT;
        }
        if date.is_some() {
            confidence += DATE_WEIGHT;
        }
        if merchant.is_some() {
            confidence += MERCHANT_WEIGHT;
        }
        if category.is_some() {
            confidence += CATEGORY_WEIGHT;
        }

        Self {
            amount,
            date,
            merchant,
            category,
            confidence,
            raw_text: raw_text.into(),
        }
    }

    /// A result with no fields set, for text that yielded nothing.
    pub fn empty(raw_text: impl Into<String>) -> Self {
        Self::new(raw_text, None, None, None, None)
    }

    pub fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn merchant(&self) -> Option<&str> {
        self.merchant.as_deref()
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Heuristic confidence in 0..=100.
    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    /// The whitespace-normalized text the fields were extracted from.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Coarse confidence bucket shown next to the result.
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.confidence)
    }

    /// Expense description: the merchant, or a generic label when unknown.
    pub fn description(&self) -> &str {
        self.merchant().unwrap_or(FALLBACK_DESCRIPTION)
    }

    /// True when no field could be extracted.
    pub fn is_empty(&self) -> bool {
        self.confidence == 0
    }
}

/// Expense category inferred from receipt keywords.
///
/// Declaration order matters: category inference returns the first variant
/// whose keywords match, in the order of [`Category::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Groceries and supermarkets.
    #[serde(rename = "Alimentación", alias = "Alimentacion")]
    Alimentacion,
    /// Restaurants, bars and cafés.
    #[serde(rename = "Restaurante")]
    Restaurante,
    /// Pharmacy and health.
    #[serde(rename = "Farmacia")]
    Farmacia,
    /// Fuel, public transport, taxis and parking.
    #[serde(rename = "Transporte")]
    Transporte,
    /// Clothing.
    #[serde(rename = "Ropa")]
    Ropa,
    /// Home, furniture and hardware.
    #[serde(rename = "Hogar")]
    Hogar,
}

impl Category {
    /// All categories in inference priority order.
    pub const ALL: [Category; 6] = [
        Category::Alimentacion,
        Category::Restaurante,
        Category::Farmacia,
        Category::Transporte,
        Category::Ropa,
        Category::Hogar,
    ];

    /// Display label, as stored on expense records.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Alimentacion => "Alimentación",
            Category::Restaurante => "Restaurante",
            Category::Farmacia => "Farmacia",
            Category::Transporte => "Transporte",
            Category::Ropa => "Ropa",
            Category::Hogar => "Hogar",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = fold_label(s.trim());
        Category::ALL
            .into_iter()
            .find(|c| fold_label(c.label()) == wanted)
            .ok_or_else(|| ScanError::InvalidCategory(s.to_string()))
    }
}

/// Lower-case and strip Spanish accents so "ALIMENTACION" matches "Alimentación".
fn fold_label(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            other => other,
        })
        .collect()
}

/// Confidence bucket used to flag how much review a result needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    /// 80 and above.
    High,
    /// 60 to 79.
    Medium,
    /// Below 60.
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => ConfidenceLevel::High,
            60..=79 => ConfidenceLevel::Medium,
            _ => ConfidenceLevel::Low,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "Alta confianza",
            ConfidenceLevel::Medium => "Confianza media",
            ConfidenceLevel::Low => "Baja confianza",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_from_fields() {
        let amount = Decimal::from_str("12.50").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let full = ExtractionResult::new(
            "x",
            Some(amount),
            Some(date),
            Some("Mercadona".to_string()),
            Some(Category::Alimentacion),
        );
        assert_eq!(full.confidence(), 100);

        let partial = ExtractionResult::new("x", Some(amount), None, None, Some(Category::Hogar));
        assert_eq!(partial.confidence(), 50);

        assert_eq!(ExtractionResult::empty("").confidence(), 0);
        assert!(ExtractionResult::empty("").is_empty());
    }

    #[test]
    fn test_description_fallback() {
        let result = ExtractionResult::empty("nada");
        assert_eq!(result.description(), "Gasto escaneado");

        let result = ExtractionResult::new("x", None, None, Some("Lidl".to_string()), None);
        assert_eq!(result.description(), "Lidl");
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Alimentación".parse::<Category>().unwrap(), Category::Alimentacion);
        assert_eq!("alimentacion".parse::<Category>().unwrap(), Category::Alimentacion);
        assert_eq!(" HOGAR ".parse::<Category>().unwrap(), Category::Hogar);
        assert!("Ocio".parse::<Category>().is_err());

        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_serde_label() {
        let json = serde_json::to_string(&Category::Alimentacion).unwrap();
        assert_eq!(json, "\"Alimentación\"");

        let parsed: Category = serde_json::from_str("\"Alimentacion\"").unwrap();
        assert_eq!(parsed, Category::Alimentacion);
    }

    #[test]
    fn test_confidence_level() {
        assert_eq!(ConfidenceLevel::from_score(100), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(80), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(70), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(59), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(0).label(), "Baja confianza");
    }

    #[test]
    fn test_result_json_shape() {
        let result = ExtractionResult::new(
            "Total 12,50€",
            Some(Decimal::from_str("12.50").unwrap()),
            None,
            None,
            None,
        );
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["amount"], "12.50");
        assert_eq!(json["confidence"], 40);
        assert_eq!(json["rawText"], "Total 12,50€");
        assert!(json.get("date").is_none());
        assert!(json.get("merchant").is_none());
    }
}
