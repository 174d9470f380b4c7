mod config;
mod error;
mod export;
mod loader;
mod matrix;
mod models;
mod period;
mod pipeline;
mod scraper;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::cmp::Ordering;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::AppConfig;
use crate::loader::JsonFileSource;
use crate::matrix::PeriodAxis;
use crate::models::{Layout, SymbolRecord};
use crate::period::{compare_labels, parse_period, PeriodOrdering};
use crate::pipeline::Pipeline;
use crate::scraper::{FinancialSource, FinnomenaScraper};

#[derive(Parser)]
#[command(name = "fin-summary", about = "Quarterly financial summary export for SET stocks", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch symbols one by one and export the merged table
    Export {
        /// Symbols to export, comma-separated or repeated (default: config)
        #[arg(short, long, value_delimiter = ',')]
        symbols: Vec<String>,

        /// Read symbol documents from a JSON file instead of scraping
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(short, long, value_enum)]
        layout: Option<Layout>,

        #[arg(long, value_enum)]
        ordering: Option<PeriodOrdering>,

        /// Output directory (default: result/)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Show how period labels parse and sort
    Labels {
        #[arg(required = true)]
        labels: Vec<String>,

        #[arg(long, value_enum, default_value_t = PeriodOrdering::CalendarDatesLast)]
        ordering: PeriodOrdering,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "fin_summary=info,warn",
        1 => "fin_summary=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let mut config = AppConfig::load()?;

    match cli.command {
        Command::Export {
            symbols,
            input,
            layout,
            ordering,
            out_dir,
        } => {
            let _t = utils::Timer::start("Financial summary export");

            if let Some(layout) = layout {
                config.export.layout = layout;
            }
            if let Some(ordering) = ordering {
                config.export.ordering = ordering;
            }
            if let Some(out_dir) = out_dir {
                config.export.out_dir = out_dir;
            }

            let file_source = input.as_deref().map(JsonFileSource::load).transpose()?;

            let mut symbols = utils::split_symbols(&symbols);
            if symbols.is_empty() {
                symbols = match &file_source {
                    Some(src) => utils::split_symbols(src.symbols()),
                    None => utils::split_symbols(&config.export.symbols),
                };
            }
            info!("Exporting {} symbols: {}", symbols.len(), symbols.join(", "));

            let source: Box<dyn FinancialSource> = match file_source {
                Some(src) => Box::new(src),
                None => Box::new(FinnomenaScraper::new(&config.scraper)?),
            };

            let stats = Pipeline::new(source.as_ref(), config.export.clone())
                .run(&symbols)
                .await?;

            println!("─────────────────────────────────");
            println!("  Financial summary export");
            println!("─────────────────────────────────");
            println!("  Symbols  : {} ({} empty, {} errors)", stats.symbols_requested, stats.symbols_empty, stats.errors);
            println!("  Rows     : {}", stats.rows_written);
            println!("  Periods  : {}", stats.periods);
            println!("  Table    : {}", stats.files.table.display());
            if let Some(merges) = &stats.files.merges {
                println!("  Merges   : {}", merges.display());
            }
            println!("─────────────────────────────────");
        }

        Command::Labels { labels, ordering } => {
            for label in &labels {
                println!("  {:<16} {:?}", label, parse_period(label));
            }

            let mut scratch = SymbolRecord::empty("labels");
            scratch.periods = labels;
            let axis = PeriodAxis::build(std::slice::from_ref(&scratch), ordering);
            println!("Sorted ({:?}):", ordering);
            let sorted = axis.labels();
            for (i, label) in sorted.iter().enumerate() {
                let tie = i > 0 && compare_labels(&sorted[i - 1], label, ordering) == Ordering::Equal;
                println!("  {:>3}. {}{}", i + 1, label, if tie { "  (tie, input order)" } else { "" });
            }
        }
    }

    Ok(())
}
