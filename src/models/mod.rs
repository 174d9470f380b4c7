use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Metrics ───────────────────────────────────────────────────────────────────

/// Allow-listed financial line items, in their declared output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    TotalRevenue,
    GrossProfit,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::TotalRevenue, Metric::GrossProfit];

    /// Row label as it appears on the source page.
    pub fn label(self) -> &'static str {
        match self {
            Metric::TotalRevenue => "รายได้รวม",
            Metric::GrossProfit => "กำไรขั้นต้น",
        }
    }

    /// Anything outside the allow-list yields `None` and is dropped.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|m| m.label() == label)
    }
}

// ── Symbol record ─────────────────────────────────────────────────────────────

/// Everything the source reported for one requested symbol.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SymbolRecord {
    /// Symbol as requested by the caller.
    pub query: String,
    /// Code reported by the page, e.g. a normalised ticker.
    pub code: Option<String>,
    /// Period labels in page order.
    pub periods: Vec<String>,
    pub values: HashMap<(String, Metric), String>,
}

impl SymbolRecord {
    /// Record standing in for "not found" / "no financial section".
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Identifier used in the output table.
    pub fn display_symbol(&self) -> &str {
        match self.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code,
            _ => self.query.as_str(),
        }
    }

    /// Empty and missing values both read as `None`.
    pub fn value(&self, period: &str, metric: Metric) -> Option<&str> {
        self.values
            .get(&(period.to_string(), metric))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() && self.values.is_empty()
    }
}

/// What a source returns for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Found(SymbolRecord),
    NotFound,
    NoDataSection,
}

impl FetchOutcome {
    /// Both sentinels collapse to an empty record for `query`.
    pub fn into_record(self, query: &str) -> SymbolRecord {
        match self {
            FetchOutcome::Found(record) => record,
            FetchOutcome::NotFound | FetchOutcome::NoDataSection => SymbolRecord::empty(query),
        }
    }
}

// ── Raw page extraction ───────────────────────────────────────────────────────

/// One `<tr>` of the financial summary table, before filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTableRow {
    pub label: Option<String>,
    pub values: Vec<String>,
}

/// Financial summary section as scraped, still position-based.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSummaryPage {
    pub stock_code: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<RawTableRow>,
}

// ── Output layout ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// One row per (symbol, metric), values truncated, symbol cells merged.
    #[default]
    PerMetricRow,
    /// One row per symbol with `metric period` compound columns.
    PerSymbolRow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub symbol: String,
    pub metric: Option<Metric>,
    /// Aligned with `Table::value_columns`.
    pub values: Vec<String>,
}

/// Closed range of row indices sharing one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRegion {
    pub start: usize,
    pub end: usize,
}

impl MergeRegion {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Single-row regions are never merge-rendered.
    pub fn is_mergeable(&self) -> bool {
        self.len() > 1
    }
}
