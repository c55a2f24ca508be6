//! End-to-end flow through the dashboard state: keys in, worker round trip,
//! charts out. Prices come from an in-process provider.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use sp500_core::data::{ConstituentTable, DataError, Lookback, PriceBar, PriceProvider, PriceSeries};
use sp500_core::DashboardConfig;
use sp500_tui::app::{AppState, Focus};
use sp500_tui::input::handle_key;
use sp500_tui::worker::{spawn_worker, WorkerCommand};

struct RecordingProvider {
    calls: Mutex<Vec<String>>,
}

impl PriceProvider for RecordingProvider {
    fn name(&self) -> &str {
        "recording"
    }

    fn fetch(&self, symbol: &str, _lookback: Lookback) -> Result<PriceSeries, DataError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars = (0..5)
            .map(|i| PriceBar {
                date: start + chrono::Duration::days(i),
                open: 50.0,
                high: 51.0,
                low: 49.0,
                close: 50.0 + i as f64,
                volume: 500_000,
            })
            .collect();
        Ok(PriceSeries::new(symbol, bars))
    }
}

fn table() -> ConstituentTable {
    let columns = vec!["Symbol".into(), "Security".into(), "GICS Sector".into()];
    let rows = [
        ["MMM", "3M", "Industrials"],
        ["ABT", "Abbott", "Health Care"],
        ["AAPL", "Apple Inc.", "Information Technology"],
        ["BRK.B", "Berkshire Hathaway", "Financials"],
    ]
    .into_iter()
    .map(|r| r.into_iter().map(String::from).collect())
    .collect();
    ConstituentTable::new(columns, rows).unwrap()
}

fn press(app: &mut AppState, code: KeyCode) {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

/// Drain worker responses until the in-flight request settles.
fn settle(app: &mut AppState) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while app.charts.pending && Instant::now() < deadline {
        if let Ok(resp) = app.worker_rx.recv_timeout(Duration::from_millis(50)) {
            app.apply_worker_response(resp);
        }
    }
}

fn start(
    config: DashboardConfig,
) -> (AppState, Arc<RecordingProvider>, std::thread::JoinHandle<()>) {
    let provider = Arc::new(RecordingProvider {
        calls: Mutex::new(Vec::new()),
    });
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let handle = spawn_worker(cmd_rx, resp_tx, provider.clone()).unwrap();
    let app = AppState::new(Arc::new(table()), config, cmd_tx, resp_rx);
    (app, provider, handle)
}

fn stop(app: AppState, handle: std::thread::JoinHandle<()>) {
    app.worker_tx.send(WorkerCommand::Shutdown).unwrap();
    handle.join().unwrap();
}

#[test]
fn three_companies_give_three_charts_in_selection_order() {
    let (mut app, provider, handle) = start(DashboardConfig::default());

    press(&mut app, KeyCode::Char('2'));
    press(&mut app, KeyCode::End);
    press(&mut app, KeyCode::Char(' ')); // Berkshire Hathaway
    press(&mut app, KeyCode::Home);
    press(&mut app, KeyCode::Char(' ')); // 3M
    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char(' ')); // Apple Inc.
    press(&mut app, KeyCode::Char('g'));
    settle(&mut app);

    let symbols: Vec<_> = app.charts.charts.iter().map(|c| c.company.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["BRK.B", "MMM", "AAPL"]);
    assert!(app.charts.charts.iter().all(|c| c.has_data()));
    assert_eq!(app.charts.selected_rows.as_ref().unwrap().row_count(), 3);
    assert_eq!(provider.calls.lock().unwrap().len(), 3);

    stop(app, handle);
}

#[test]
fn no_companies_means_no_download() {
    let (mut app, provider, handle) = start(DashboardConfig::default());

    press(&mut app, KeyCode::Char('g'));
    assert!(!app.charts.pending);
    assert!(app.charts.charts.is_empty());
    assert!(app.charts.guidance.is_some());

    stop(app, handle);
    assert!(provider.calls.lock().unwrap().is_empty());
}

#[test]
fn padded_single_company_charts_only_the_target() {
    let config = DashboardConfig {
        pad_single_request: true,
        ..DashboardConfig::default()
    };
    let (mut app, provider, handle) = start(config);

    app.focus = Focus::Companies;
    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Enter); // Abbott
    press(&mut app, KeyCode::Char('g'));
    settle(&mut app);

    assert_eq!(app.charts.charts.len(), 1);
    assert_eq!(app.charts.charts[0].title, "ABT - Abbott");
    let mut calls = provider.calls.lock().unwrap().clone();
    calls.sort();
    assert_eq!(calls, vec!["ABT", "MMM"]);

    stop(app, handle);
}

#[test]
fn sector_filter_does_not_touch_company_options() {
    let (mut app, _provider, handle) = start(DashboardConfig::default());

    press(&mut app, KeyCode::Char('1'));
    press(&mut app, KeyCode::Char(' ')); // Financials
    assert_eq!(app.table_view.view.row_count(), 1);
    assert_eq!(app.sidebar.companies.len(), 4);
    assert_eq!(app.table_view.download.as_ref().unwrap().rows, 1);

    stop(app, handle);
}
