//! Date extraction for Spanish receipts.

use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};

use super::patterns::{
    DATE_DMY_LONG_YEAR, DATE_DMY_SHORT_YEAR, DATE_LOOSE, DATE_SPANISH_ABBREV, DATE_SPANISH_LONG,
    DATE_YMD,
};
use super::{ExtractionMatch, FieldExtractor};

/// Years accepted as a receipt date. Anything outside is treated as noise.
pub const YEAR_RANGE: RangeInclusive<i32> = 2020..=2030;

/// How the three captures of a date rule are read.
#[derive(Debug, Clone, Copy)]
enum DateShape {
    /// Three numbers; year position is decided per match.
    Numeric,
    /// Day, Spanish month name or abbreviation, year.
    SpanishMonth,
}

struct DateRule {
    name: &'static str,
    pattern: &'static Regex,
    shape: DateShape,
}

/// Date field extractor.
///
/// Rules are tried in order and the first one producing a valid date wins.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    fn rules() -> [DateRule; 6] {
        [
            DateRule { name: "dmy_long_year", pattern: &*DATE_DMY_LONG_YEAR, shape: DateShape::Numeric },
            DateRule { name: "dmy_short_year", pattern: &*DATE_DMY_SHORT_YEAR, shape: DateShape::Numeric },
            DateRule { name: "ymd", pattern: &*DATE_YMD, shape: DateShape::Numeric },
            DateRule { name: "spanish_long", pattern: &*DATE_SPANISH_LONG, shape: DateShape::SpanishMonth },
            DateRule { name: "spanish_abbrev", pattern: &*DATE_SPANISH_ABBREV, shape: DateShape::SpanishMonth },
            DateRule { name: "loose", pattern: &*DATE_LOOSE, shape: DateShape::Numeric },
        ]
    }

    fn matches(rule: &DateRule, text: &str) -> Vec<ExtractionMatch<NaiveDate>> {
        rule.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                if !digit_bounded(text, full_match.start(), full_match.end()) {
                    return None;
                }
                let date = match rule.shape {
                    DateShape::Numeric => interpret_numeric(&caps),
                    DateShape::SpanishMonth => interpret_spanish_month(&caps),
                }?;
                Some(
                    ExtractionMatch::new(date, rule.name, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        Self::rules()
            .iter()
            .find_map(|rule| Self::matches(rule, text).into_iter().next())
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for rule in Self::rules() {
            for candidate in Self::matches(&rule, text) {
                // Skip if already found by an earlier rule
                if results.iter().any(|r| r.value == candidate.value) {
                    continue;
                }
                results.push(candidate);
            }
        }

        results
    }
}

/// A date match must not run into further digits: "115/03/2024" and
/// "15/03/20245" are not dates, while "FECHA15/03/2024" is.
fn digit_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(|c| c.is_ascii_digit()) && !after.is_some_and(|c| c.is_ascii_digit())
}

fn interpret_numeric(caps: &Captures) -> Option<NaiveDate> {
    let first: u32 = caps.get(1)?.as_str().parse().ok()?;
    let second: u32 = caps.get(2)?.as_str().parse().ok()?;
    let third: u32 = caps.get(3)?.as_str().parse().ok()?;

    // A leading value past 2000 can only be a year: 2024-03-15.
    // Otherwise read day first: 15/03/2024, 15/03/24.
    let (year, month, day) = if first > 2000 {
        (first as i32, second, third)
    } else {
        (expand_year(third), second, first)
    };

    checked_date(year, month, day)
}

fn interpret_spanish_month(caps: &Captures) -> Option<NaiveDate> {
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month = spanish_month_to_number(caps.get(2)?.as_str())?;
    let year: u32 = caps.get(3)?.as_str().parse().ok()?;

    checked_date(expand_year(year), month, day)
}

/// Two-digit years are read as 20xx.
fn expand_year(year: u32) -> i32 {
    if year < 100 {
        2000 + year as i32
    } else {
        year as i32
    }
}

/// Build a date and make sure it did not roll over (31/04 must not become 01/05).
fn checked_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !YEAR_RANGE.contains(&year) {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    (date.year() == year && date.month() == month && date.day() == day).then_some(date)
}

fn spanish_month_to_number(month: &str) -> Option<u32> {
    let month = match month.to_lowercase().as_str() {
        "enero" | "ene" => 1,
        "febrero" | "feb" => 2,
        "marzo" | "mar" => 3,
        "abril" | "abr" => 4,
        "mayo" | "may" => 5,
        "junio" | "jun" => 6,
        "julio" | "jul" => 7,
        "agosto" | "ago" => 8,
        "septiembre" | "setiembre" | "sep" => 9,
        "octubre" | "oct" => 10,
        "noviembre" | "nov" => 11,
        "diciembre" | "dic" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extract_date_dmy() {
        let extractor = DateExtractor::new();

        let result = extractor.extract("Fecha: 15/03/2024").unwrap();
        assert_eq!(result.value, ymd(2024, 3, 15));
        assert_eq!(result.rule, "dmy_long_year");
        assert_eq!(result.source, "15/03/2024");
    }

    #[test]
    fn test_year_first_and_day_first_agree() {
        let extractor = DateExtractor::new();

        let ymd_result = extractor.extract("2024-03-15").unwrap();
        let dmy_result = extractor.extract("15-03-2024").unwrap();

        assert_eq!(ymd_result.value, ymd(2024, 3, 15));
        assert_eq!(dmy_result.value, ymd_result.value);
        assert_eq!(ymd_result.rule, "ymd");
    }

    #[test]
    fn test_invalid_calendar_date_is_rejected() {
        let extractor = DateExtractor::new();

        assert!(extractor.extract("31/04/2024").is_none());
        assert!(extractor.extract("29/02/2023").is_none());
        assert_eq!(extractor.extract("29/02/2024").unwrap().value, ymd(2024, 2, 29));
    }

    #[test]
    fn test_invalid_date_falls_through_to_next_candidate() {
        let extractor = DateExtractor::new();

        let result = extractor.extract("31/04/2024 ... 15/03/2024").unwrap();
        assert_eq!(result.value, ymd(2024, 3, 15));
    }

    #[test]
    fn test_year_window() {
        let extractor = DateExtractor::new();

        assert!(extractor.extract("15/03/2019").is_none());
        assert!(extractor.extract("15/03/2031").is_none());
        assert_eq!(extractor.extract("01.01.2020").unwrap().value, ymd(2020, 1, 1));
        assert_eq!(extractor.extract("31.12.2030").unwrap().value, ymd(2030, 12, 31));
    }

    #[test]
    fn test_two_digit_year() {
        let extractor = DateExtractor::new();

        let result = extractor.extract("15.01.24").unwrap();
        assert_eq!(result.value, ymd(2024, 1, 15));
        assert_eq!(result.rule, "dmy_short_year");

        // 2015 falls outside the window
        assert!(extractor.extract("15.01.15").is_none());
    }

    #[test]
    fn test_spanish_long_date() {
        let extractor = DateExtractor::new();

        let result = extractor.extract("Madrid, 12 de enero de 2024").unwrap();
        assert_eq!(result.value, ymd(2024, 1, 12));
        assert_eq!(result.rule, "spanish_long");

        let result = extractor.extract("3 de Septiembre del 2025").unwrap();
        assert_eq!(result.value, ymd(2025, 9, 3));
    }

    #[test]
    fn test_spanish_abbreviated_date() {
        let extractor = DateExtractor::new();

        assert_eq!(extractor.extract("12 ene 2024").unwrap().value, ymd(2024, 1, 12));
        assert_eq!(extractor.extract("5-DIC-23").unwrap().value, ymd(2023, 12, 5));
        assert_eq!(extractor.extract("5 ene 24").unwrap().value, ymd(2024, 1, 5));
    }

    #[test]
    fn test_loose_date() {
        let extractor = DateExtractor::new();

        let result = extractor.extract("Fecha 15 03 2024 Hora 12:30").unwrap();
        assert_eq!(result.value, ymd(2024, 3, 15));
        assert_eq!(result.rule, "loose");
    }

    #[test]
    fn test_rule_priority_beats_text_order() {
        let extractor = DateExtractor::new();

        // The textual date appears first but numeric rules are tried first.
        let result = extractor.extract("12 de enero de 2024 ref 15/03/2024").unwrap();
        assert_eq!(result.value, ymd(2024, 3, 15));

        let all = extractor.extract_all("12 de enero de 2024 ref 15/03/2024");
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].value, ymd(2024, 1, 12));
    }

    #[test]
    fn test_date_glued_to_letters() {
        let extractor = DateExtractor::new();

        let result = extractor.extract("FECHA15/03/2024 Total 3,00€").unwrap();
        assert_eq!(result.value, ymd(2024, 3, 15));
        assert_eq!(result.source, "15/03/2024");

        let result = extractor.extract("Fecha: 15/03/2024Hora 10:30").unwrap();
        assert_eq!(result.value, ymd(2024, 3, 15));

        assert_eq!(extractor.extract("el12 de enero de 2024").unwrap().value, ymd(2024, 1, 12));
    }

    #[test]
    fn test_date_glued_to_digits_is_rejected() {
        let extractor = DateExtractor::new();

        assert!(extractor.extract("Ref 115/03/2024").is_none());
        assert!(extractor.extract("15/03/20245").is_none());

        // The short-year reading of a year-first date touches the century digits.
        let result = extractor.extract("2024-03-15").unwrap();
        assert_eq!(result.rule, "ymd");
    }

    #[test]
    fn test_no_date() {
        let extractor = DateExtractor::new();
        assert!(extractor.extract("").is_none());
        assert!(extractor.extract("Total 12,50€").is_none());
    }
}
