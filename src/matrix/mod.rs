//! Cross-symbol reshaping: global period axis, output rows, merge regions.

pub mod regions;

use std::collections::HashSet;

use crate::models::{Layout, MergeRegion, Metric, OutputRow, SymbolRecord};
use crate::period::{sort_labels, PeriodOrdering};

pub use self::regions::compute_regions;

pub const SYMBOL_HEADER: &str = "หุ้น";
pub const METRIC_HEADER: &str = "ประเภท";

/// Display width for values in the per-metric layout.
pub const DEFAULT_VALUE_WIDTH: usize = 10;

/// Every period label seen across the run, deduplicated by exact text and
/// sorted. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodAxis {
    labels: Vec<String>,
}

impl PeriodAxis {
    pub fn build(records: &[SymbolRecord], ordering: PeriodOrdering) -> Self {
        let mut seen = HashSet::new();
        let mut labels = Vec::new();
        for period in records.iter().flat_map(|r| &r.periods) {
            if seen.insert(period.as_str()) {
                labels.push(period.clone());
            }
        }
        sort_labels(&mut labels, ordering);
        Self { labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Finished, rectangular output of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub layout: Layout,
    pub axis: PeriodAxis,
    pub value_columns: Vec<String>,
    pub rows: Vec<OutputRow>,
    /// Empty for `Layout::PerSymbolRow`.
    pub regions: Vec<MergeRegion>,
}

impl Table {
    /// Header row: symbol, metric (per-metric layout only), value columns.
    pub fn header(&self) -> Vec<String> {
        let mut header = vec![SYMBOL_HEADER.to_string()];
        if self.layout == Layout::PerMetricRow {
            header.push(METRIC_HEADER.to_string());
        }
        header.extend(self.value_columns.iter().cloned());
        header
    }

    /// Cells of `row` in header order.
    pub fn record(&self, row: &OutputRow) -> Vec<String> {
        let mut cells = vec![row.symbol.clone()];
        if self.layout == Layout::PerMetricRow {
            cells.push(row.metric.map(Metric::label).unwrap_or_default().to_string());
        }
        cells.extend(row.values.iter().cloned());
        cells
    }

    pub fn mergeable_regions(&self) -> impl Iterator<Item = &MergeRegion> {
        self.regions.iter().filter(|r| r.is_mergeable())
    }
}

/// Column names for `metric × period` in the per-symbol layout.
pub fn compound_column(metric: Metric, period: &str) -> String {
    format!("{} {}", metric.label(), period)
}

/// First `width` characters (not bytes) of `value`.
pub fn truncate_display(value: &str, width: usize) -> String {
    value.chars().take(width).collect()
}

pub fn build_rows(records: &[SymbolRecord], axis: &PeriodAxis, layout: Layout, width: usize) -> Vec<OutputRow> {
    match layout {
        Layout::PerMetricRow => records
            .iter()
            .flat_map(|record| {
                Metric::ALL.into_iter().map(move |metric| OutputRow {
                    symbol: record.display_symbol().to_string(),
                    metric: Some(metric),
                    values: axis
                        .labels()
                        .iter()
                        .map(|period| {
                            record
                                .value(period, metric)
                                .map(|v| truncate_display(v, width))
                                .unwrap_or_default()
                        })
                        .collect(),
                })
            })
            .collect(),

        Layout::PerSymbolRow => records
            .iter()
            .map(|record| OutputRow {
                symbol: record.display_symbol().to_string(),
                metric: None,
                values: Metric::ALL
                    .into_iter()
                    .flat_map(|metric| {
                        axis.labels()
                            .iter()
                            .map(move |period| record.value(period, metric).unwrap_or_default().to_string())
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Axis, rows and regions for one run over fully materialised records.
pub fn assemble(records: &[SymbolRecord], layout: Layout, ordering: PeriodOrdering, width: usize) -> Table {
    let axis = PeriodAxis::build(records, ordering);
    let rows = build_rows(records, &axis, layout, width);

    let value_columns = match layout {
        Layout::PerMetricRow => axis.labels().to_vec(),
        Layout::PerSymbolRow => Metric::ALL
            .into_iter()
            .flat_map(|m| axis.labels().iter().map(move |p| compound_column(m, p)))
            .collect(),
    };

    let regions = match layout {
        Layout::PerMetricRow => compute_regions(&rows),
        Layout::PerSymbolRow => Vec::new(),
    };

    Table {
        layout,
        axis,
        value_columns,
        rows,
        regions,
    }
}
