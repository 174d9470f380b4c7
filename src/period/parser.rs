use once_cell::sync::Lazy;
use regex::Regex;

use super::ParsedPeriod;

/// "2Q2023" → quarter 2 of 2023. Matches anywhere in the label.
static REG_QUARTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([1-4])[Qq]([0-9]{4})").expect("Failed to compile quarter regex"));

/// "31 ธ.ค. 21" → day, month token, two-digit year.
static REG_CALENDAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([0-9]{1,2})\s+(\S+)\s+([0-9]{2})\b").expect("Failed to compile calendar-date regex")
});

/// Thai month abbreviations, January first.
const THAI_MONTHS: [&str; 12] = [
    "ม.ค.", "ก.พ.", "มี.ค.", "เม.ย.", "พ.ค.", "มิ.ย.",
    "ก.ค.", "ส.ค.", "ก.ย.", "ต.ค.", "พ.ย.", "ธ.ค.",
];

pub fn thai_month(token: &str) -> Option<u32> {
    THAI_MONTHS
        .iter()
        .position(|m| *m == token)
        .map(|i| i as u32 + 1)
}

/// Classify a raw period label. Pure: same text, same result.
pub fn parse_period(label: &str) -> ParsedPeriod {
    if let Some(caps) = REG_QUARTER.captures(label) {
        // Both groups are pure ASCII digits of bounded width.
        let quarter = caps[1].parse().unwrap_or_default();
        let year = caps[2].parse().unwrap_or_default();
        return ParsedPeriod::FiscalQuarter { year, quarter };
    }

    if let Some(caps) = REG_CALENDAR.captures(label) {
        let day: u32 = caps[1].parse().unwrap_or_default();
        let yy: i32 = caps[3].parse().unwrap_or_default();
        let year = 2000 + yy;

        // Day is not checked against the month: "30 ก.พ. 24" still orders by (y, m, d).
        if let Some(month) = thai_month(&caps[2]) {
            return ParsedPeriod::CalendarDate { day, month, year };
        }
    }

    ParsedPeriod::Unparseable(label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{sort_labels, PeriodOrdering};

    #[test]
    fn test_parse_fiscal_quarter() {
        assert_eq!(
            parse_period("3Q2022"),
            ParsedPeriod::FiscalQuarter { year: 2022, quarter: 3 }
        );
        assert_eq!(
            parse_period("ไตรมาส 1q2019"),
            ParsedPeriod::FiscalQuarter { year: 2019, quarter: 1 }
        );
    }

    #[test]
    fn test_quarter_digit_out_of_range() {
        assert_eq!(
            parse_period("5Q2022"),
            ParsedPeriod::Unparseable("5Q2022".into())
        );
    }

    #[test]
    fn test_parse_calendar_date() {
        assert_eq!(
            parse_period("5 ม.ค. 23"),
            ParsedPeriod::CalendarDate { day: 5, month: 1, year: 2023 }
        );
        assert_eq!(
            parse_period("31 ธ.ค. 21"),
            ParsedPeriod::CalendarDate { day: 31, month: 12, year: 2021 }
        );
    }

    #[test]
    fn test_unknown_month_is_unparseable() {
        assert_eq!(
            parse_period("31 Dec 21"),
            ParsedPeriod::Unparseable("31 Dec 21".into())
        );
    }

    #[test]
    fn test_out_of_month_day_is_still_a_date() {
        assert_eq!(
            parse_period("30 ก.พ. 24"),
            ParsedPeriod::CalendarDate { day: 30, month: 2, year: 2024 }
        );
        assert_eq!(
            parse_period("0 ม.ค. 21"),
            ParsedPeriod::CalendarDate { day: 0, month: 1, year: 2021 }
        );

        let mut labels: Vec<String> = ["30 ก.พ. 24", "งบปี", "1Q2024", "1 มี.ค. 24", "31 ธ.ค. 23"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        sort_labels(&mut labels, PeriodOrdering::CalendarDatesLast);
        assert_eq!(labels, ["1Q2024", "31 ธ.ค. 23", "30 ก.พ. 24", "1 มี.ค. 24", "งบปี"]);
    }

    #[test]
    fn test_day_needs_a_leading_boundary() {
        assert_eq!(
            parse_period("131 ธ.ค. 21"),
            ParsedPeriod::Unparseable("131 ธ.ค. 21".into())
        );
        assert_eq!(
            parse_period("งวด 31 ธ.ค. 21"),
            ParsedPeriod::CalendarDate { day: 31, month: 12, year: 2021 }
        );
    }

    #[test]
    fn test_four_digit_year_is_not_a_short_year() {
        assert!(matches!(parse_period("31 ธ.ค. 2021"), ParsedPeriod::Unparseable(_)));
    }

    #[test]
    fn test_thai_digits_are_not_numbers() {
        assert!(matches!(parse_period("๑Q๒๕๖๔"), ParsedPeriod::Unparseable(_)));
        assert!(matches!(parse_period("๓๑ ธ.ค. ๖๔"), ParsedPeriod::Unparseable(_)));
    }

    #[test]
    fn test_garbage_keeps_original_text() {
        assert_eq!(parse_period("งบปี"), ParsedPeriod::Unparseable("งบปี".into()));
        assert_eq!(parse_period(""), ParsedPeriod::Unparseable(String::new()));
    }

    #[test]
    fn test_every_month_resolves() {
        for (i, m) in THAI_MONTHS.iter().enumerate() {
            assert_eq!(thai_month(m), Some(i as u32 + 1));
        }
        assert_eq!(thai_month("ธค"), None);
    }
}
