//! Shared fixtures for the TUI unit tests.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use chrono::NaiveDate;

use sp500_core::chart::CompanyChart;
use sp500_core::data::{Company, ConstituentTable, PriceBar, PriceSeries};
use sp500_core::DashboardConfig;

use crate::app::AppState;
use crate::worker::{WorkerCommand, WorkerResponse};

pub fn sample_table() -> ConstituentTable {
    let columns = ["Symbol", "Security", "GICS Sector", "Headquarters Location"]
        .into_iter()
        .map(String::from)
        .collect();
    let rows = [
        ["MMM", "3M", "Industrials", "Saint Paul, Minnesota"],
        ["AOS", "A. O. Smith", "Industrials", "Milwaukee, Wisconsin"],
        ["ABT", "Abbott", "Health Care", "North Chicago, Illinois"],
        ["ADBE", "Adobe Inc.", "Information Technology", "San Jose, California"],
        ["AAPL", "Apple Inc.", "Information Technology", "Cupertino, California"],
        ["BRK.B", "Berkshire Hathaway", "Financials", "Omaha, Nebraska"],
    ]
    .into_iter()
    .map(|r| r.into_iter().map(String::from).collect())
    .collect();
    ConstituentTable::new(columns, rows).unwrap()
}

/// App over [`sample_table`] with the worker side of both channels.
pub fn test_app() -> (AppState, Receiver<WorkerCommand>, Sender<WorkerResponse>) {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let app = AppState::new(
        Arc::new(sample_table()),
        DashboardConfig::default(),
        cmd_tx,
        resp_rx,
    );
    (app, cmd_rx, resp_tx)
}

/// Ten trading days of rising prices.
pub fn chart_for(symbol: &str, security: &str) -> CompanyChart {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = (0..10)
        .map(|i| PriceBar {
            date: start + chrono::Duration::days(i),
            open: 100.0 + i as f64,
            high: 101.0 + i as f64,
            low: 99.0 + i as f64,
            close: 100.5 + i as f64,
            volume: 1_000_000 + 10_000 * i as u64,
        })
        .collect();
    let company = Company {
        symbol: symbol.into(),
        security: security.into(),
    };
    CompanyChart::from_series(company, Some(&PriceSeries::new(symbol, bars)))
}
