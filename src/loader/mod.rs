//! Offline source: per-symbol documents from a JSON file, e.g. a saved dump
//! of an earlier scrape.

use crate::error::FetchError;
use crate::models::FetchOutcome;
use crate::scraper::cleaner::clean_keyed_values;
use crate::scraper::FinancialSource;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Found,
    NotFound,
    NoData,
}

/// One symbol as stored in the JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolDocument {
    pub symbol: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub periods: Vec<String>,
    /// period label → metric label → value
    #[serde(default)]
    pub values: BTreeMap<String, BTreeMap<String, String>>,
}

fn symbol_key(s: &str) -> String {
    s.trim().to_uppercase()
}

pub struct JsonFileSource {
    order: Vec<String>,
    documents: HashMap<String, SymbolDocument>,
}

impl JsonFileSource {
    pub fn from_documents(docs: Vec<SymbolDocument>) -> Result<Self> {
        let mut order = Vec::new();
        let mut documents = HashMap::new();

        for doc in docs {
            let key = symbol_key(&doc.symbol);
            if documents.contains_key(&key) {
                bail!("Symbol {} appears more than once", key);
            }
            order.push(doc.symbol.trim().to_string());
            documents.insert(key, doc);
        }

        Ok(Self { order, documents })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        let docs: Vec<SymbolDocument> = serde_json::from_str(&text)
            .with_context(|| format!("Malformed symbol documents in {:?}", path))?;

        let source = Self::from_documents(docs)
            .with_context(|| format!("Invalid symbol documents in {:?}", path))?;
        info!("{}: {} symbol documents loaded", path.display(), source.order.len());
        Ok(source)
    }

    /// Symbols in file order.
    pub fn symbols(&self) -> &[String] {
        &self.order
    }
}

#[async_trait]
impl FinancialSource for JsonFileSource {
    async fn fetch_summary(&self, symbol: &str) -> Result<FetchOutcome, FetchError> {
        let Some(doc) = self.documents.get(&symbol_key(symbol)) else {
            debug!("{}: not in file", symbol);
            return Ok(FetchOutcome::NotFound);
        };

        match doc.status {
            DocumentStatus::NotFound => Ok(FetchOutcome::NotFound),
            DocumentStatus::NoData => Ok(FetchOutcome::NoDataSection),
            DocumentStatus::Found => {
                let record = clean_keyed_values(
                    symbol,
                    doc.code.as_deref(),
                    doc.periods.clone(),
                    doc.values.clone(),
                )?;
                Ok(FetchOutcome::Found(record))
            }
        }
    }
}
