//! SP500 CLI: the dashboard's data operations without the terminal UI.
//!
//! Commands:
//! - `sectors`: list the distinct GICS sectors with company counts
//! - `table`: print the (sector-filtered) constituent table
//! - `export`: write the filtered table as CSV, optionally printing the data-URI link
//! - `prices`: download daily adjusted prices for one or more symbols

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

use sp500_core::data::{
    download_grouped, Company, ConstituentCache, ConstituentTable, HttpSource, Lookback,
    YahooProvider,
};
use sp500_core::export::CsvDownload;
use sp500_core::{telemetry, DashboardConfig};

#[derive(Parser)]
#[command(name = "sp500", about = "S&P 500 constituents, CSV export and price downloads")]
struct Cli {
    /// TOML config file. Defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the distinct sectors and how many companies each has.
    Sectors,
    /// Print the constituent table, optionally filtered by sector.
    Table {
        /// Sector to keep (repeatable). All sectors when omitted.
        #[arg(long = "sector")]
        sectors: Vec<String>,
    },
    /// Write the filtered table as CSV.
    Export {
        /// Sector to keep (repeatable). All sectors when omitted.
        #[arg(long = "sector")]
        sectors: Vec<String>,

        /// Output directory. Defaults to the configured download_dir.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also print the HTML data-URI download link.
        #[arg(long, default_value_t = false)]
        link: bool,
    },
    /// Download daily adjusted prices from Yahoo Finance.
    Prices {
        /// Constituent symbols as listed in the table (e.g., MMM BRK.B).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Year-to-date when omitted.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Print the full series as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    telemetry::init_subscriber(telemetry::get_subscriber(
        &config.log_filter,
        std::io::stderr,
        true,
    ))?;

    match cli.command {
        Commands::Sectors => run_sectors(&config),
        Commands::Table { sectors } => run_table(&config, &sectors),
        Commands::Export { sectors, out, link } => run_export(&config, &sectors, out, link),
        Commands::Prices {
            symbols,
            start,
            end,
            json,
        } => run_prices(&config, &symbols, start, end, json),
    }
}

fn load_table(config: &DashboardConfig) -> Result<ConstituentTable> {
    let source = HttpSource::new(config.http_timeout(), &config.user_agent)?;
    let cache = ConstituentCache::new(config.source_url.clone());
    let table = cache
        .get_or_load(&source)
        .with_context(|| format!("failed to load the constituent table from {}", cache.url()))?;
    Ok(ConstituentTable::clone(&table))
}

/// Filter by sector, rejecting names the table does not know.
fn filtered(table: &ConstituentTable, sectors: &[String]) -> Result<ConstituentTable> {
    let known = table.sectors();
    if let Some(unknown) = sectors.iter().find(|s| !known.contains(s)) {
        bail!("unknown sector '{unknown}'. Known sectors: {}", known.join(", "));
    }
    Ok(table.filter_by_sectors(sectors))
}

fn run_sectors(config: &DashboardConfig) -> Result<()> {
    let table = load_table(config)?;
    for sector in table.sectors() {
        let count = table
            .filter_by_sectors(std::slice::from_ref(&sector))
            .row_count();
        println!("{sector:<28} {count:>4}");
    }
    Ok(())
}

fn run_table(config: &DashboardConfig, sectors: &[String]) -> Result<()> {
    let table = load_table(config)?;
    let view = filtered(&table, sectors)?;

    println!("{}", view.dimension_label());
    println!();
    println!("{:<8} {:<40} {}", "Symbol", "Security", "GICS Sector");
    println!("{}", "-".repeat(76));
    for row in 0..view.row_count() {
        println!(
            "{:<8} {:<40} {}",
            view.symbol(row).unwrap_or_default(),
            view.security(row).unwrap_or_default(),
            view.sector(row).unwrap_or_default(),
        );
    }
    Ok(())
}

fn run_export(
    config: &DashboardConfig,
    sectors: &[String],
    out: Option<PathBuf>,
    link: bool,
) -> Result<()> {
    let table = load_table(config)?;
    let view = filtered(&table, sectors)?;
    let download = CsvDownload::from_table(&view, &config.csv_filename)?;

    let dir = out.unwrap_or_else(|| config.download_dir.clone());
    let path = download.save_to(&dir)?;
    println!("{}", view.dimension_label());
    println!("Saved: {}", path.display());
    if link {
        println!("{}", download.html_link());
    }
    Ok(())
}

fn run_prices(
    config: &DashboardConfig,
    symbols: &[String],
    start: Option<String>,
    end: Option<String>,
    json: bool,
) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let lookback = parse_lookback(start.as_deref(), end.as_deref(), today)?;
    let table = load_table(config)?;
    let companies = listed_companies(&table, symbols)?;
    let provider = YahooProvider::new(config.http_timeout(), &config.user_agent)?;

    let started = Instant::now();
    let grouped = download_grouped(&provider, symbols, lookback, config.threads)?;
    info!(
        symbols = grouped.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "prices downloaded"
    );

    if json {
        let series: Vec<_> = grouped.symbols().filter_map(|s| grouped.get(s)).collect();
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    println!(
        "{:<8} {:<32} {:>6} {:<12} {:<12} {:>12}",
        "Symbol", "Security", "Bars", "First", "Last", "Last Close"
    );
    println!("{}", "-".repeat(87));
    for company in &companies {
        let Some(series) = grouped.get(&company.symbol) else {
            continue;
        };
        let first = series.bars.first().map(|b| b.date.to_string()).unwrap_or_default();
        let last = series.bars.last().map(|b| b.date.to_string()).unwrap_or_default();
        let close = series
            .last_close()
            .map(|c| format!("{c:.2}"))
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<8} {:<32} {:>6} {:<12} {:<12} {:>12}",
            company.symbol,
            company.security,
            series.len(),
            first,
            last,
            close
        );
    }
    Ok(())
}

/// Map symbols to table companies; symbols outside the index are an error.
fn listed_companies(table: &ConstituentTable, symbols: &[String]) -> Result<Vec<Company>> {
    symbols
        .iter()
        .map(|symbol| {
            table
                .company_by_symbol(symbol)
                .with_context(|| format!("'{symbol}' is not an S&P 500 constituent"))
        })
        .collect()
}

/// No dates means year-to-date. A start without an end runs to `today`.
fn parse_lookback(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> Result<Lookback> {
    let parse = |s: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
    };
    match (start, end) {
        (None, None) => Ok(Lookback::YearToDate),
        (None, Some(_)) => bail!("--end requires --start"),
        (Some(start), end) => {
            let start = parse(start)?;
            let end = end.map(parse).transpose()?.unwrap_or(today);
            if end < start {
                bail!("end date {end} is before start date {start}");
            }
            Ok(Lookback::Range { start, end })
        }
    }
}
