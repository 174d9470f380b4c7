//! Period labels: classification and the ordering used for the global axis.
//!
//! Labels come in two shapes, fiscal quarters ("2Q2023") and Thai calendar
//! dates ("31 ธ.ค. 21"). Anything else is kept verbatim and sorts last.

pub mod parser;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub use self::parser::parse_period;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedPeriod {
    FiscalQuarter { year: i32, quarter: u32 },
    CalendarDate { day: u32, month: u32, year: i32 },
    Unparseable(String),
}

impl ParsedPeriod {
    /// (year, month, day) the period starts on; quarters start on day 1 of
    /// their first month.
    pub fn date_key(&self) -> Option<(i32, u32, u32)> {
        match *self {
            ParsedPeriod::FiscalQuarter { year, quarter } => Some((year, (quarter - 1) * 3 + 1, 1)),
            ParsedPeriod::CalendarDate { day, month, year } => Some((year, month, day)),
            ParsedPeriod::Unparseable(_) => None,
        }
    }

    fn is_calendar_date(&self) -> bool {
        matches!(self, ParsedPeriod::CalendarDate { .. })
    }
}

/// How mismatched label kinds are ordered against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodOrdering {
    /// Calendar-date labels (trailing/annual figures) follow every quarter.
    #[default]
    CalendarDatesLast,
    /// Quarters and calendar dates interleave by the date they resolve to.
    Chronological,
}

pub fn compare_parsed(a: &ParsedPeriod, b: &ParsedPeriod, ordering: PeriodOrdering) -> Ordering {
    match (a.date_key(), b.date_key()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(ka), Some(kb)) => {
            if ordering == PeriodOrdering::CalendarDatesLast {
                let kind = a.is_calendar_date().cmp(&b.is_calendar_date());
                if kind != Ordering::Equal {
                    return kind;
                }
            }
            ka.cmp(&kb)
        }
    }
}

pub fn compare_labels(a: &str, b: &str, ordering: PeriodOrdering) -> Ordering {
    compare_parsed(&parse_period(a), &parse_period(b), ordering)
}

/// Stable sort, so equal labels (e.g. two unparseable ones) keep input order.
pub fn sort_labels(labels: &mut [String], ordering: PeriodOrdering) {
    // Parse once per label instead of once per comparison.
    let mut keyed: Vec<(ParsedPeriod, String)> = labels
        .iter()
        .map(|l| (parse_period(l), l.clone()))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_parsed(a, b, ordering));

    for (slot, (_, label)) in labels.iter_mut().zip(keyed) {
        *slot = label;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(labels: &[&str], ordering: PeriodOrdering) -> Vec<String> {
        let mut v: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
        sort_labels(&mut v, ordering);
        v
    }

    #[test]
    fn test_quarters_then_calendar_dates() {
        assert_eq!(
            sorted(&["2Q2021", "1Q2021", "31 ธ.ค. 21", "4Q2020"], PeriodOrdering::CalendarDatesLast),
            vec!["4Q2020", "1Q2021", "2Q2021", "31 ธ.ค. 21"]
        );
    }

    #[test]
    fn test_calendar_date_after_later_quarter() {
        // 31 Dec 2019 is earlier than 1Q2021 but still sorts after it.
        assert_eq!(
            compare_labels("31 ธ.ค. 19", "1Q2021", PeriodOrdering::CalendarDatesLast),
            Ordering::Greater
        );
        assert_eq!(
            compare_labels("31 ธ.ค. 19", "1Q2021", PeriodOrdering::Chronological),
            Ordering::Less
        );
    }

    #[test]
    fn test_unparseable_sorts_last_and_keeps_order() {
        assert_eq!(
            sorted(&["zeta", "31 ธ.ค. 21", "alpha", "1Q2020"], PeriodOrdering::CalendarDatesLast),
            vec!["1Q2020", "31 ธ.ค. 21", "zeta", "alpha"]
        );
        assert_eq!(compare_labels("zeta", "alpha", PeriodOrdering::Chronological), Ordering::Equal);
    }

    #[test]
    fn test_calendar_dates_by_day() {
        assert_eq!(
            sorted(&["31 ธ.ค. 22", "30 มิ.ย. 22", "1 ม.ค. 22"], PeriodOrdering::CalendarDatesLast),
            vec!["1 ม.ค. 22", "30 มิ.ย. 22", "31 ธ.ค. 22"]
        );
    }

    #[test]
    fn test_quarter_date_key() {
        let q = parse_period("4Q2020");
        assert_eq!(q.date_key(), Some((2020, 10, 1)));
        assert_eq!(parse_period("2Q2020").date_key(), Some((2020, 4, 1)));
    }

    #[test]
    fn test_order_is_total_and_consistent() {
        let labels = [
            "4Q2020", "1Q2021", "2Q2021", "31 ธ.ค. 21", "30 ก.ย. 20", "1 ม.ค. 21",
            "??", "n/a", "3Q2021", "3q2021",
        ];
        for ordering in [PeriodOrdering::CalendarDatesLast, PeriodOrdering::Chronological] {
            for a in labels {
                assert_eq!(compare_labels(a, a, ordering), Ordering::Equal);
                for b in labels {
                    let ab = compare_labels(a, b, ordering);
                    assert_eq!(ab, compare_labels(b, a, ordering).reverse(), "{a} vs {b}");
                    for c in labels {
                        let bc = compare_labels(b, c, ordering);
                        if ab != Ordering::Greater && bc != Ordering::Greater {
                            assert_ne!(
                                compare_labels(a, c, ordering),
                                Ordering::Greater,
                                "{a} <= {b} <= {c}"
                            );
                        }
                    }
                }
            }
        }
    }
}
