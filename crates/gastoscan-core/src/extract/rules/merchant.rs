//! Merchant name extraction.

use regex::Regex;

use super::patterns::{MERCHANT_HEADER, MERCHANT_KEYWORD};
use super::{ExtractionMatch, FieldExtractor};

/// Merchant field extractor.
///
/// Tries the capitalized header first, then a business-type keyword
/// ("FARMACIA", "BAR", ...) in any case. The keyword is kept together with
/// up to two following words as the name, or returned alone when no word
/// follows.
pub struct MerchantExtractor;

impl MerchantExtractor {
    pub fn new() -> Self {
        Self
    }

    fn rules() -> [(&'static str, &'static Regex); 2] {
        [
            ("header", &*MERCHANT_HEADER),
            ("business_keyword", &*MERCHANT_KEYWORD),
        ]
    }

    fn matches(rule: &'static str, pattern: &Regex, text: &str) -> Option<ExtractionMatch<String>> {
        let caps = pattern.captures(text)?;
        let full_match = caps.get(0)?;

        let raw = match (caps.get(1), caps.get(2)) {
            (Some(keyword), Some(name)) => format!("{} {}", keyword.as_str(), name.as_str()),
            (Some(name), None) => name.as_str().to_string(),
            _ => return None,
        };

        let merchant = normalize_merchant(&raw)?;
        Some(
            ExtractionMatch::new(merchant, rule, full_match.as_str().trim())
                .with_position(full_match.start(), full_match.end()),
        )
    }
}

impl Default for MerchantExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for MerchantExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        Self::rules()
            .into_iter()
            .find_map(|(rule, pattern)| Self::matches(rule, pattern, text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        Self::rules()
            .into_iter()
            .filter_map(|(rule, pattern)| Self::matches(rule, pattern, text))
            .collect()
    }
}

/// Lower-case a merchant name and capitalize its first letter.
///
/// "MERCADONA" becomes "Mercadona", "BAR EL PUERTO" becomes "Bar el puerto".
pub fn normalize_merchant(raw: &str) -> Option<String> {
    let lower = raw.trim().to_lowercase();
    let mut chars = lower.chars();
    let first = chars.next()?;

    Some(first.to_uppercase().chain(chars).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_merchant() {
        assert_eq!(normalize_merchant("MERCADONA"), Some("Mercadona".to_string()));
        assert_eq!(normalize_merchant(" BAR EL PUERTO "), Some("Bar el puerto".to_string()));
        assert_eq!(normalize_merchant("ÑAM ÑAM"), Some("Ñam ñam".to_string()));
        assert_eq!(normalize_merchant("   "), None);
    }

    #[test]
    fn test_header_merchant() {
        let extractor = MerchantExtractor::new();

        let result = extractor.extract("MERCADONA S.A. Fecha: 15/03/2024").unwrap();
        assert_eq!(result.value, "Mercadona");
        assert_eq!(result.rule, "header");
    }

    #[test]
    fn test_keyword_merchant() {
        let extractor = MerchantExtractor::new();

        let result = extractor
            .extract("Ticket nº 42 Farmacia Central 12/03/2024")
            .unwrap();
        assert_eq!(result.value, "Farmacia central");
        assert_eq!(result.rule, "business_keyword");
    }

    #[test]
    fn test_keyword_merchant_in_any_case() {
        let extractor = MerchantExtractor::new();

        for text in ["Ticket farmacia central 3,95 €", "Ticket Farmacia central 3,95 €"] {
            let result = extractor.extract(text).unwrap();
            assert_eq!(result.value, "Farmacia central");
            assert_eq!(result.rule, "business_keyword");
        }
    }

    #[test]
    fn test_keyword_without_name() {
        let extractor = MerchantExtractor::new();

        let result = extractor.extract("ticket farmacia 3,95 €").unwrap();
        assert_eq!(result.value, "Farmacia");
    }

    #[test]
    fn test_header_wins_over_keyword() {
        let extractor = MerchantExtractor::new();
        let text = "LA TAGLIATELLA Restaurante Italiano";

        let result = extractor.extract(text).unwrap();
        assert_eq!(result.value, "La tagliatella");

        let all = extractor.extract_all(text);
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].value, "Restaurante italiano");
    }

    #[test]
    fn test_no_merchant() {
        let extractor = MerchantExtractor::new();
        assert!(extractor.extract("").is_none());
        assert!(extractor.extract("gracias por su compra 12,50 €").is_none());
    }
}
