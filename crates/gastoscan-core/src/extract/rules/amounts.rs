//! Amount extraction for Spanish receipts.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use super::patterns::{
    AMOUNT_EURO_PREFIX, AMOUNT_EURO_SUFFIX, AMOUNT_EURO_WORD, AMOUNT_IMPORTE_LABEL,
    AMOUNT_TOTAL_LABEL,
};
use super::{ExtractionMatch, FieldExtractor};

/// Amount field extractor.
///
/// Every rule contributes candidates and the largest one wins: on a receipt
/// the grand total is normally the biggest figure, above subtotals, line
/// items and tax. Large non-total figures formatted like prices (loyalty card
/// numbers, cash tendered) will be picked up too.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }

    fn rules() -> [(&'static str, &'static Regex); 5] {
        [
            ("total_label", &*AMOUNT_TOTAL_LABEL),
            ("importe_label", &*AMOUNT_IMPORTE_LABEL),
            ("euro_prefix", &*AMOUNT_EURO_PREFIX),
            ("euro_suffix", &*AMOUNT_EURO_SUFFIX),
            ("euro_word", &*AMOUNT_EURO_WORD),
        ]
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text)
            .into_iter()
            .filter(|m| m.value > Decimal::ZERO)
            .max_by(|a, b| a.value.cmp(&b.value))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for (rule, pattern) in Self::rules() {
            for caps in pattern.captures_iter(text) {
                let Some(number) = caps.get(1) else {
                    continue;
                };

                match parse_amount(number.as_str()) {
                    Some(amount) => results.push(
                        ExtractionMatch::new(amount, rule, number.as_str())
                            .with_position(number.start(), number.end()),
                    ),
                    None => debug!("Skipping unparseable amount {:?} from rule {}", number.as_str(), rule),
                }
            }
        }

        results
    }
}

/// Parse a receipt amount such as "12,50" or "12.50".
pub fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.trim().replace(',', ".")).ok()
}

/// Format an amount the way Spanish receipts and apps show euros.
///
/// Thousands are only grouped from five integer digits upward, so 1234,50 €
/// stays ungrouped while 12.345,67 € is grouped.
pub fn format_euro_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };

    let Some((integer_part, decimal_part)) = digits.split_once('.') else {
        return format!("{} €", s);
    };

    let mut formatted = String::new();
    if integer_part.len() >= 5 {
        let chars: Vec<char> = integer_part.chars().collect();
        for (i, c) in chars.iter().enumerate() {
            if i > 0 && (chars.len() - i) % 3 == 0 {
                formatted.push('.');
            }
            formatted.push(*c);
        }
    } else {
        formatted.push_str(integer_part);
    }

    format!("{}{},{} €", sign, formatted, decimal_part)
}
