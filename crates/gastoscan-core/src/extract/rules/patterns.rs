//! Common regex patterns for Spanish receipt extraction.
//!
//! Patterns run against whitespace-normalized text, so there are no line
//! breaks to anchor on; `^` means the start of the receipt.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Amount patterns (decimal with `.` or `,` and exactly two decimals)
    pub static ref AMOUNT_TOTAL_LABEL: Regex = Regex::new(
        r"(?i)total[:\s]*€?\s*(\d+[.,]\d{2})"
    ).unwrap();

    pub static ref AMOUNT_IMPORTE_LABEL: Regex = Regex::new(
        r"(?i)importe[:\s]*€?\s*(\d+[.,]\d{2})"
    ).unwrap();

    pub static ref AMOUNT_EURO_PREFIX: Regex = Regex::new(
        r"€\s*(\d+[.,]\d{2})"
    ).unwrap();

    pub static ref AMOUNT_EURO_SUFFIX: Regex = Regex::new(
        r"(\d+[.,]\d{2})\s*€"
    ).unwrap();

    pub static ref AMOUNT_EURO_WORD: Regex = Regex::new(
        r"(?i)(\d+[.,]\d{2})\s*(?:€|eur(?:os?)?)"
    ).unwrap();

    // Numeric dates: 15/03/2024, 15-03-24, 2024.03.15
    // Unanchored so dates glued to letters ("FECHA15/03/2024") still match;
    // the date extractor rejects matches touching other digits.
    pub static ref DATE_DMY_LONG_YEAR: Regex = Regex::new(
        r"(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4})"
    ).unwrap();

    pub static ref DATE_DMY_SHORT_YEAR: Regex = Regex::new(
        r"(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{2})"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"(\d{4})[/.\-](\d{1,2})[/.\-](\d{1,2})"
    ).unwrap();

    // Spanish textual dates: "12 de enero de 2024", "12 ene 2024"
    pub static ref DATE_SPANISH_LONG: Regex = Regex::new(
        r"(?i)(\d{1,2})\s+de\s+(enero|febrero|marzo|abril|mayo|junio|julio|agosto|septiembre|setiembre|octubre|noviembre|diciembre)\s+del?\s+(\d{4})"
    ).unwrap();

    pub static ref DATE_SPANISH_ABBREV: Regex = Regex::new(
        r"(?i)(\d{1,2})[/\-\s]+(ene|feb|mar|abr|may|jun|jul|ago|sep|oct|nov|dic)\.?[/\-\s]+(\d{4}|\d{2})"
    ).unwrap();

    // Space-separated dates as last resort: "15 03 2024"
    pub static ref DATE_LOOSE: Regex = Regex::new(
        r"(\d{1,2})[\s/\-](\d{1,2})[\s/\-](\d{2,4})"
    ).unwrap();

    // Merchant name printed in capitals at the top of the receipt
    pub static ref MERCHANT_HEADER: Regex = Regex::new(
        r"^([A-ZÁÉÍÓÚÜÑ][A-ZÁÉÍÓÚÜÑ ]{1,28}[A-ZÁÉÍÓÚÜÑ])(?:\s|$)"
    ).unwrap();

    // Business type keyword, optionally followed by a one or two word name
    pub static ref MERCHANT_KEYWORD: Regex = Regex::new(
        r"(?i)\b(supermercado|farmacia|restaurante|cafe|bar|tienda|shop|store)\b(?:\s+(\p{L}[\p{L}&'\-]*(?:\s\p{L}[\p{L}&'\-]*)?))?"
    ).unwrap();
}
