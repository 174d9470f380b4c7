//! Pipeline orchestrator: ties source → matrix → export together.
//!
//! ## Phases
//!
//!   1. Fetch every requested symbol, strictly one after another, into an
//!      immutable list of records. A symbol whose fetch fails in transport
//!      becomes an empty record. Scraped pages with odd layouts are cleaned
//!      into records upstream; only a record handed over in breach of its
//!      contract (e.g. values under an undeclared period) aborts the run.
//!   2. Build axis, rows and merge regions in one pure pass over that list.
//!   3. Hand the table to the exporter.

use crate::config::ExportConfig;
use crate::error::FetchError;
use crate::export::{ExportedFiles, Exporter};
use crate::matrix::{assemble, Table};
use crate::models::SymbolRecord;
use crate::scraper::FinancialSource;
use anyhow::{Context, Result};
use chrono::Local;
use tracing::{info, warn};

/// Result of the fetch phase.
#[derive(Debug, Default)]
pub struct Collected {
    pub records: Vec<SymbolRecord>,
    pub empty: usize,
    pub errors: usize,
}

pub struct Pipeline<'a, S: FinancialSource + ?Sized> {
    source: &'a S,
    config: ExportConfig,
}

impl<'a, S: FinancialSource + ?Sized> Pipeline<'a, S> {
    pub fn new(source: &'a S, config: ExportConfig) -> Self {
        Self { source, config }
    }

    /// Fetch `symbols` in order. Input order is output order.
    pub async fn collect(&self, symbols: &[String]) -> Result<Collected> {
        let mut collected = Collected::default();

        for (i, symbol) in symbols.iter().enumerate() {
            info!("[{}/{}] Fetching {}", i + 1, symbols.len(), symbol);

            let record = match self.source.fetch_summary(symbol).await {
                Ok(outcome) => outcome.into_record(symbol),
                Err(FetchError::Transport(e)) => {
                    warn!("{}: {:#} — exporting empty rows", symbol, e);
                    collected.errors += 1;
                    SymbolRecord::empty(symbol.as_str())
                }
                Err(e @ FetchError::Malformed(_)) => {
                    return Err(e).with_context(|| format!("Malformed record for {}", symbol));
                }
            };

            if record.is_empty() {
                collected.empty += 1;
            }
            collected.records.push(record);
        }

        Ok(collected)
    }

    /// Fetch and reshape, without touching the filesystem.
    pub async fn build(&self, symbols: &[String]) -> Result<(Table, Collected)> {
        let collected = self.collect(symbols).await?;
        let table = assemble(
            &collected.records,
            self.config.layout,
            self.config.ordering,
            self.config.value_width,
        );
        if table.axis.is_empty() {
            warn!("No period labels for any symbol; every value column will be empty");
        }
        info!(
            "Table: {} rows × {} value columns, {} periods, {} merge regions",
            table.rows.len(),
            table.value_columns.len(),
            table.axis.len(),
            table.mergeable_regions().count()
        );
        Ok((table, collected))
    }

    pub async fn run(&self, symbols: &[String]) -> Result<PipelineStats> {
        let (table, collected) = self.build(symbols).await?;

        let files = Exporter::new(&self.config.out_dir)
            .export(&table, Local::now().naive_local())
            .context("Export failed")?;

        let stats = PipelineStats {
            symbols_requested: symbols.len(),
            symbols_empty: collected.empty,
            errors: collected.errors,
            rows_written: table.rows.len(),
            periods: table.axis.len(),
            files,
        };

        info!(
            "=== Done: {} symbols ({} empty, {} errors) | {} rows | {} periods ===",
            stats.symbols_requested, stats.symbols_empty, stats.errors, stats.rows_written, stats.periods,
        );

        Ok(stats)
    }
}

#[derive(Debug)]
pub struct PipelineStats {
    pub symbols_requested: usize,
    pub symbols_empty: usize,
    pub errors: usize,
    pub rows_written: usize,
    pub periods: usize,
    pub files: ExportedFiles,
}
