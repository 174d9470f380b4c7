//! Writes a finished [`Table`] to disk: the table as CSV, and for the
//! per-metric layout a JSON sidecar with the symbol-column merges.

use crate::matrix::Table;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// Excel only detects UTF-8 (and so Thai text) when the file starts with a BOM.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A merge in sheet coordinates; row 0 is the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SheetMerge {
    pub first_row: usize,
    pub last_row: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub table: PathBuf,
    pub merges: Option<PathBuf>,
}

/// `financial_summary_DDMMYYYY_HHMM`
pub fn export_stem(now: NaiveDateTime) -> String {
    format!("financial_summary_{}", now.format("%d%m%Y_%H%M"))
}

/// Mergeable regions shifted past the header and confined to the symbol column.
pub fn sheet_merges(table: &Table) -> Vec<SheetMerge> {
    table
        .mergeable_regions()
        .map(|r| SheetMerge {
            first_row: r.start + 1,
            last_row: r.end + 1,
            column: 0,
        })
        .collect()
}

pub fn write_table_csv<W: Write>(table: &Table, out: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(false).from_writer(out);
    wtr.write_record(table.header())?;
    for row in &table.rows {
        wtr.write_record(table.record(row))
            .with_context(|| format!("write row for {}", row.symbol))?;
    }
    wtr.flush()?;
    Ok(())
}

pub struct Exporter {
    out_dir: PathBuf,
}

impl Exporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into() }
    }

    pub fn export(&self, table: &Table, now: NaiveDateTime) -> Result<ExportedFiles> {
        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("Could not create dir {:?}", self.out_dir))?;

        let stem = export_stem(now);
        let table_path = self.out_dir.join(format!("{}.csv", stem));

        let file = File::create(&table_path)
            .with_context(|| format!("Failed to create {:?}", table_path))?;
        let mut out = BufWriter::new(file);
        out.write_all(UTF8_BOM)?;
        write_table_csv(table, out).with_context(|| format!("Failed to write {:?}", table_path))?;
        info!("Wrote {} rows to {}", table.rows.len(), table_path.display());

        let merges = sheet_merges(table);
        let merges_path = if merges.is_empty() {
            None
        } else {
            let path = self.out_dir.join(format!("{}.merges.json", stem));
            let json = serde_json::to_string_pretty(&merges)?;
            std::fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;
            info!("Wrote {} merges to {}", merges.len(), path.display());
            Some(path)
        };

        Ok(ExportedFiles {
            table: table_path,
            merges: merges_path,
        })
    }
}
