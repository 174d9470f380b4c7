use crate::error::RecordError;
use crate::models::{Metric, RawSummaryPage, SymbolRecord};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

// ── Shared checks ─────────────────────────────────────────────────────────────

fn check_symbol(query: &str) -> Result<String, RecordError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(RecordError::BlankSymbol);
    }
    Ok(query.to_string())
}

fn check_periods(symbol: &str, periods: &[String]) -> Result<(), RecordError> {
    let mut seen = HashSet::new();
    for p in periods {
        if !seen.insert(p.as_str()) {
            return Err(RecordError::DuplicatePeriod {
                symbol: symbol.to_string(),
                period: p.clone(),
            });
        }
    }
    Ok(())
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

// ── Scraped page → SymbolRecord ───────────────────────────────────────────────

/// Turn the positional table into a (period, metric) keyed record.
///
/// Header `i` pairs with value `i` of each row. A short row just has missing
/// values. Cells past the last header and columns under a repeated header are
/// dropped with a warning; the page still yields a record.
pub fn clean_summary_page(query: &str, page: RawSummaryPage) -> Result<SymbolRecord, RecordError> {
    let query = check_symbol(query)?;

    // (column index, label) for the first column carrying each label.
    let mut columns: Vec<(usize, String)> = Vec::with_capacity(page.headers.len());
    let mut seen = HashSet::new();
    for (i, header) in page.headers.iter().enumerate() {
        let header = header.trim();
        if seen.insert(header.to_string()) {
            columns.push((i, header.to_string()));
        } else {
            warn!("{}: period header {:?} repeated at column {}, keeping the first", query, header, i);
        }
    }
    let width = page.headers.len();

    let mut values = HashMap::new();
    let mut taken = HashSet::new();
    let mut skipped = 0usize;

    for row in page.rows {
        let label = row.label.as_deref().unwrap_or_default().trim().to_string();
        let Some(metric) = Metric::from_label(&label) else {
            skipped += 1;
            continue;
        };

        // First matching row wins.
        if !taken.insert(metric) {
            continue;
        }

        if row.values.len() > width {
            warn!(
                "{}: row {:?} has {} values for {} period headers, ignoring the extra cells",
                query,
                label,
                row.values.len(),
                width
            );
        }

        for (i, period) in &columns {
            let Some(value) = row.values.get(*i) else { continue };
            let value = value.trim();
            if !value.is_empty() {
                values.insert((period.clone(), metric), value.to_string());
            }
        }
    }

    debug!("{}: {} periods, {} values, {} rows outside allow-list", query, columns.len(), values.len(), skipped);

    Ok(SymbolRecord {
        code: non_blank(page.stock_code.as_deref()),
        query,
        periods: columns.into_iter().map(|(_, p)| p).collect(),
        values,
    })
}

// ── Keyed document → SymbolRecord ─────────────────────────────────────────────

/// Build a record from values already keyed by period then metric label.
pub fn clean_keyed_values(
    query: &str,
    code: Option<&str>,
    periods: Vec<String>,
    keyed: BTreeMap<String, BTreeMap<String, String>>,
) -> Result<SymbolRecord, RecordError> {
    let query = check_symbol(query)?;
    check_periods(&query, &periods)?;

    let declared: HashSet<&str> = periods.iter().map(String::as_str).collect();
    let mut values = HashMap::new();

    for (period, metrics) in keyed {
        if !declared.contains(period.as_str()) {
            return Err(RecordError::UnknownPeriod {
                symbol: query,
                period,
            });
        }
        for (label, value) in metrics {
            let Some(metric) = Metric::from_label(&label) else { continue };
            let value = value.trim();
            if !value.is_empty() {
                values.insert((period.clone(), metric), value.to_string());
            }
        }
    }

    Ok(SymbolRecord {
        code: non_blank(code),
        query,
        periods,
        values,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawTableRow;

    fn row(label: &str, values: &[&str]) -> RawTableRow {
        RawTableRow {
            label: Some(label.to_string()),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn page(headers: &[&str], rows: Vec<RawTableRow>) -> RawSummaryPage {
        RawSummaryPage {
            stock_code: Some("SCC".into()),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn test_positions_become_keys() {
        let p = page(
            &["1Q2021", "2Q2021"],
            vec![
                row("รายได้รวม", &["100", "120"]),
                row("กำไรสุทธิ", &["1", "2"]),
                row("กำไรขั้นต้น", &["30"]),
            ],
        );
        let rec = clean_summary_page("scc", p).unwrap();

        assert_eq!(rec.display_symbol(), "SCC");
        assert_eq!(rec.query, "scc");
        assert_eq!(rec.periods, ["1Q2021", "2Q2021"]);
        assert_eq!(rec.value("2Q2021", Metric::TotalRevenue), Some("120"));
        assert_eq!(rec.value("1Q2021", Metric::GrossProfit), Some("30"));
        assert_eq!(rec.value("2Q2021", Metric::GrossProfit), None);
        assert_eq!(rec.values.len(), 3);
    }

    #[test]
    fn test_first_duplicate_row_wins() {
        let p = page(
            &["1Q2021"],
            vec![row("รายได้รวม", &["100"]), row("รายได้รวม", &["999"])],
        );
        let rec = clean_summary_page("SCC", p).unwrap();
        assert_eq!(rec.value("1Q2021", Metric::TotalRevenue), Some("100"));
    }

    #[test]
    fn test_wide_row_keeps_covered_cells() {
        let p = page(&["1Q2021"], vec![row("รายได้รวม", &["100", "120"])]);
        let rec = clean_summary_page("SCC", p).unwrap();
        assert_eq!(rec.periods, ["1Q2021"]);
        assert_eq!(rec.value("1Q2021", Metric::TotalRevenue), Some("100"));
        assert_eq!(rec.values.len(), 1);
    }

    #[test]
    fn test_wide_row_outside_allow_list_is_ignored() {
        let p = page(&["1Q2021"], vec![row("อื่นๆ", &["1", "2", "3"])]);
        assert!(clean_summary_page("SCC", p).is_ok());
    }

    #[test]
    fn test_repeated_header_keeps_first_column() {
        let p = page(
            &["1Q2021", " 1Q2021 ", "2Q2021"],
            vec![row("รายได้รวม", &["100", "999", "120"])],
        );
        let rec = clean_summary_page("SCC", p).unwrap();
        assert_eq!(rec.periods, ["1Q2021", "2Q2021"]);
        assert_eq!(rec.value("1Q2021", Metric::TotalRevenue), Some("100"));
        assert_eq!(rec.value("2Q2021", Metric::TotalRevenue), Some("120"));
    }

    #[test]
    fn test_blank_symbol_rejected() {
        assert_eq!(
            clean_summary_page("  ", RawSummaryPage::default()),
            Err(RecordError::BlankSymbol)
        );
    }

    #[test]
    fn test_keyed_values() {
        let mut keyed = BTreeMap::new();
        keyed.insert(
            "1Q2021".to_string(),
            BTreeMap::from([
                ("รายได้รวม".to_string(), "100".to_string()),
                ("อื่นๆ".to_string(), "5".to_string()),
                ("กำไรขั้นต้น".to_string(), "".to_string()),
            ]),
        );
        let rec = clean_keyed_values("GJS", None, vec!["1Q2021".into()], keyed).unwrap();
        assert_eq!(rec.display_symbol(), "GJS");
        assert_eq!(rec.values.len(), 1);
        assert_eq!(rec.value("1Q2021", Metric::TotalRevenue), Some("100"));
    }

    #[test]
    fn test_keyed_values_unknown_period() {
        let keyed = BTreeMap::from([("9Q9999".to_string(), BTreeMap::new())]);
        let err = clean_keyed_values("GJS", None, vec!["1Q2021".into()], keyed).unwrap_err();
        assert_eq!(
            err,
            RecordError::UnknownPeriod {
                symbol: "GJS".into(),
                period: "9Q9999".into()
            }
        );
    }
}
