use crate::models::{RawSummaryPage, RawTableRow};
use anyhow::Result;
use scraper::{ElementRef, Html, Selector};

// ── Selectors ─────────────────────────────────────────────────────────────────

const NOT_FOUND_IMG: &str = r#"img[alt="ไม่พบหน้าที่คุณค้นหา"]"#;
const FINANCE_SECTION: &str = r#"section[data-fn-location="stock-finance-40q"]"#;
const STOCK_CODE: &str = r#"div[data-alias="stock_code_financial_summary"]"#;
const PERIOD_HEADERS: &str = r#"div[data-alias^="financial_summary_header_"]"#;
const TABLE_ROWS: &str = "table.text-colors-text-secondary tbody tr";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("selector {}: {:?}", css, e))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// What a stock page turned out to contain.
#[derive(Debug, Clone, PartialEq)]
pub enum StockPage {
    NotFound,
    NoFinancialSection,
    Summary(RawSummaryPage),
}

// ── Stock page ────────────────────────────────────────────────────────────────

pub fn parse_stock_page(html: &str) -> Result<StockPage> {
    let doc = Html::parse_document(html);

    if doc.select(&selector(NOT_FOUND_IMG)?).next().is_some() {
        return Ok(StockPage::NotFound);
    }

    if doc.select(&selector(FINANCE_SECTION)?).next().is_none() {
        return Ok(StockPage::NoFinancialSection);
    }

    let stock_code = doc
        .select(&selector(STOCK_CODE)?)
        .next()
        .map(text_of)
        .filter(|s| !s.is_empty());

    let headers: Vec<String> = doc.select(&selector(PERIOD_HEADERS)?).map(text_of).collect();

    let td_sel = selector("td")?;
    let span_sel = selector("span")?;

    let mut rows = Vec::new();
    for tr in doc.select(&selector(TABLE_ROWS)?) {
        let mut cells = tr.select(&td_sel);
        let label = cells.next().map(text_of);
        // One value per cell, so a blank cell keeps its column.
        let values = cells
            .map(|td| td.select(&span_sel).next().map(text_of).unwrap_or_default())
            .collect();
        rows.push(RawTableRow { label, values });
    }

    Ok(StockPage::Summary(RawSummaryPage {
        stock_code,
        headers,
        rows,
    }))
}
