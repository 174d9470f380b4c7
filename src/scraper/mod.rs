pub mod cleaner;
pub mod http_client;
pub mod parsers;

use crate::config::ScraperConfig;
use crate::error::FetchError;
use crate::models::FetchOutcome;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::Url;

use self::cleaner::clean_summary_page;
use self::http_client::{HttpClient, Page};
use self::parsers::{parse_stock_page, StockPage};

// ── Source trait ──────────────────────────────────────────────────────────────

/// Swappable per-symbol data source. Called once per symbol, in order.
#[async_trait]
pub trait FinancialSource: Send + Sync {
    async fn fetch_summary(&self, symbol: &str) -> Result<FetchOutcome, FetchError>;
}

// ── finnomena scraper ─────────────────────────────────────────────────────────

pub struct FinnomenaScraper {
    client: HttpClient,
    base_url: Url,
}

impl FinnomenaScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        // Trailing slash so `join` appends instead of replacing the last segment.
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        Ok(Self {
            client: HttpClient::new(config)?,
            base_url: Url::parse(&base).with_context(|| format!("Invalid base URL {:?}", config.base_url))?,
        })
    }

    /// URL for a stock page.  e.g. scc → /stock/SCC
    fn stock_url(&self, symbol: &str) -> Result<Url> {
        self.base_url
            .join(&symbol.trim().to_uppercase())
            .with_context(|| format!("Cannot build URL for {:?}", symbol))
    }
}

#[async_trait]
impl FinancialSource for FinnomenaScraper {
    async fn fetch_summary(&self, symbol: &str) -> Result<FetchOutcome, FetchError> {
        let url = self.stock_url(symbol).map_err(FetchError::Transport)?;
        debug!("Fetching stock page: {}", url);

        let html = match self.client.get_page(url.as_str()).await.map_err(FetchError::Transport)? {
            Page::Body(html) => html,
            Page::Missing => {
                warn!("{}: page not found (HTTP 404)", symbol);
                return Ok(FetchOutcome::NotFound);
            }
        };

        let page = parse_stock_page(&html).map_err(FetchError::Transport)?;

        match page {
            StockPage::NotFound => {
                warn!("{}: stock page not found — skipping", symbol);
                Ok(FetchOutcome::NotFound)
            }
            StockPage::NoFinancialSection => {
                warn!("{}: no financial summary section — skipping", symbol);
                Ok(FetchOutcome::NoDataSection)
            }
            StockPage::Summary(raw) => {
                let record = clean_summary_page(symbol, raw)?;
                info!(
                    "{}: {} periods, {} values (code {})",
                    symbol,
                    record.periods.len(),
                    record.values.len(),
                    record.display_symbol()
                );
                Ok(FetchOutcome::Found(record))
            }
        }
    }
}
