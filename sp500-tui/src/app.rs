//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels.
//! Every control change goes through a method on [`AppState`] so that the
//! derived state (filtered view, CSV payload, chart generation) is updated
//! in one place.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use sp500_core::chart::CompanyChart;
use sp500_core::data::{ConstituentTable, Lookback};
use sp500_core::export::CsvDownload;
use sp500_core::selection::{plan_charts, ChartPlan, NO_COMPANY_PROMPT};
use sp500_core::DashboardConfig;

use crate::worker::{WorkerCommand, WorkerResponse};

const ERROR_HISTORY_CAP: usize = 50;

/// Which control has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sectors,
    Companies,
    Fetch,
    Table,
    Charts,
}

impl Focus {
    pub const COUNT: usize = 5;

    pub fn index(self) -> usize {
        match self {
            Focus::Sectors => 0,
            Focus::Companies => 1,
            Focus::Fetch => 2,
            Focus::Table => 3,
            Focus::Charts => 4,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Focus::Sectors),
            1 => Some(Focus::Companies),
            2 => Some(Focus::Fetch),
            3 => Some(Focus::Table),
            4 => Some(Focus::Charts),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Focus::Sectors => "Sectors",
            Focus::Companies => "Companies",
            Focus::Fetch => "Fetch",
            Focus::Table => "Table",
            Focus::Charts => "Charts",
        }
    }

    pub fn next(self) -> Focus {
        Focus::from_index((self.index() + 1) % Self::COUNT).unwrap_or(Focus::Sectors)
    }

    pub fn prev(self) -> Focus {
        Focus::from_index((self.index() + Self::COUNT - 1) % Self::COUNT).unwrap_or(Focus::Sectors)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Export,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Export => "CSV",
            ErrorCategory::Other => "ERR",
        }
    }
}

/// Modal overlays drawn over the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    About,
    ErrorHistory,
    Search,
}

/// Sidebar inputs: the two multiselects.
#[derive(Debug)]
pub struct SidebarState {
    /// Distinct sectors, sorted.
    pub sectors: Vec<String>,
    pub sector_cursor: usize,
    /// Chosen sectors in the order they were picked.
    pub selected_sectors: Vec<String>,
    /// Every company name from the full table, in table order.
    pub companies: Vec<String>,
    pub company_cursor: usize,
    /// Chosen company names in the order they were picked.
    pub selected_companies: Vec<String>,
}

impl SidebarState {
    pub fn new(table: &ConstituentTable) -> Self {
        Self {
            sectors: table.sectors(),
            sector_cursor: 0,
            selected_sectors: Vec::new(),
            companies: table.securities().into_iter().map(String::from).collect(),
            company_cursor: 0,
            selected_companies: Vec::new(),
        }
    }

    pub fn is_sector_selected(&self, sector: &str) -> bool {
        self.selected_sectors.iter().any(|s| s == sector)
    }

    /// 1-based position of `name` in the company selection.
    pub fn company_rank(&self, name: &str) -> Option<usize> {
        self.selected_companies
            .iter()
            .position(|s| s == name)
            .map(|i| i + 1)
    }

    pub fn cursor_sector(&self) -> Option<&str> {
        self.sectors.get(self.sector_cursor).map(String::as_str)
    }

    pub fn cursor_company(&self) -> Option<&str> {
        self.companies.get(self.company_cursor).map(String::as_str)
    }
}

/// The filtered table and its CSV download.
#[derive(Debug)]
pub struct TableViewState {
    pub view: ConstituentTable,
    pub download: Option<CsvDownload>,
    pub row_cursor: usize,
    pub col_offset: usize,
    pub last_saved: Option<PathBuf>,
}

/// Chart section state.
#[derive(Debug, Default)]
pub struct ChartsState {
    /// Bumped on every selection change and every fetch; worker answers
    /// carrying an older value are dropped.
    pub generation: u64,
    pub pending: bool,
    /// Symbols of the request in flight.
    pub requested: Vec<String>,
    pub guidance: Option<&'static str>,
    pub charts: Vec<CompanyChart>,
    /// Full table rows of the charted companies, shown when more than one
    /// company is charted.
    pub selected_rows: Option<ConstituentTable>,
    pub scroll: usize,
}

impl ChartsState {
    fn reset(&mut self) {
        self.generation += 1;
        self.pending = false;
        self.requested.clear();
        self.guidance = None;
        self.charts.clear();
        self.selected_rows = None;
        self.scroll = 0;
    }
}

/// Top-level application state.
pub struct AppState {
    pub focus: Focus,
    pub running: bool,
    pub config: DashboardConfig,

    /// Full constituent table, loaded once at startup.
    pub table: Arc<ConstituentTable>,
    pub sidebar: SidebarState,
    pub table_view: TableViewState,
    pub charts: ChartsState,

    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
    pub search_input: String,
}

impl AppState {
    pub fn new(
        table: Arc<ConstituentTable>,
        config: DashboardConfig,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
    ) -> Self {
        let sidebar = SidebarState::new(&table);
        let view = ConstituentTable::clone(&table);
        let mut app = Self {
            focus: Focus::Sectors,
            running: true,
            config,
            table,
            sidebar,
            table_view: TableViewState {
                view,
                download: None,
                row_cursor: 0,
                col_offset: 0,
                last_saved: None,
            },
            charts: ChartsState::default(),
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
            search_input: String::new(),
        };
        app.refresh_view();
        app
    }

    // ── Sidebar controls ─────────────────────────────────────────────

    pub fn toggle_sector(&mut self, sector: &str) {
        let selected = &mut self.sidebar.selected_sectors;
        if let Some(pos) = selected.iter().position(|s| s == sector) {
            selected.remove(pos);
        } else {
            selected.push(sector.to_string());
        }
        debug!(sectors = ?self.sidebar.selected_sectors, "sector selection changed");
        self.refresh_view();
        self.invalidate_charts();
    }

    pub fn clear_sectors(&mut self) {
        if self.sidebar.selected_sectors.is_empty() {
            return;
        }
        self.sidebar.selected_sectors.clear();
        self.refresh_view();
        self.invalidate_charts();
    }

    pub fn toggle_company(&mut self, name: &str) {
        let selected = &mut self.sidebar.selected_companies;
        if let Some(pos) = selected.iter().position(|s| s == name) {
            selected.remove(pos);
        } else {
            selected.push(name.to_string());
        }
        debug!(companies = ?self.sidebar.selected_companies, "company selection changed");
        self.invalidate_charts();
    }

    pub fn clear_companies(&mut self) {
        if self.sidebar.selected_companies.is_empty() {
            return;
        }
        self.sidebar.selected_companies.clear();
        self.invalidate_charts();
    }

    /// Move the company cursor to the next name containing `query`
    /// (case-insensitive), wrapping around. Returns whether one was found.
    pub fn search_companies(&mut self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        let len = self.sidebar.companies.len();
        let start = self.sidebar.company_cursor;
        let hit = (1..=len)
            .map(|step| (start + step) % len)
            .find(|&i| self.sidebar.companies[i].to_lowercase().contains(&needle));
        match hit {
            Some(i) => {
                self.sidebar.company_cursor = i;
                self.focus = Focus::Companies;
                true
            }
            None => {
                self.set_warning(format!("No company matches '{}'", query.trim()));
                false
            }
        }
    }

    // ── Derived state ────────────────────────────────────────────────

    /// Recompute the filtered view and its CSV payload from the sector
    /// selection.
    pub fn refresh_view(&mut self) {
        let view = self.table.filter_by_sectors(&self.sidebar.selected_sectors);
        let download = CsvDownload::from_table(&view, &self.config.csv_filename);

        self.table_view.view = view;
        self.table_view.row_cursor = self
            .table_view
            .row_cursor
            .min(self.table_view.view.row_count().saturating_sub(1));
        self.table_view.download = match download {
            Ok(d) => Some(d),
            Err(e) => {
                self.push_error(
                    ErrorCategory::Data,
                    format!("CSV encoding failed: {e}"),
                    String::new(),
                );
                None
            }
        };
    }

    /// Any selection change makes the current charts stale.
    fn invalidate_charts(&mut self) {
        self.charts.reset();
    }

    // ── Fetch button ─────────────────────────────────────────────────

    /// Plan a chart request from the company selection and hand it to the
    /// worker. Returns whether a command was sent.
    pub fn request_charts(&mut self) -> bool {
        let plan = plan_charts(
            &self.table,
            &self.sidebar.selected_companies,
            self.config.pad_single_request,
        );
        self.charts.reset();
        self.charts.guidance = plan.guidance();

        let request = match plan {
            ChartPlan::Empty => {
                self.set_warning(NO_COMPANY_PROMPT);
                return false;
            }
            ChartPlan::Fetch(request) => request,
        };

        if request.targets.len() > 1 {
            self.charts.selected_rows = Some(self.table.rows_for(&request.targets));
        }
        self.charts.requested = request.symbols.clone();

        let generation = self.charts.generation;
        let symbols = request.symbols.len();
        info!(generation, symbols, "requesting charts");

        let cmd = WorkerCommand::FetchCharts {
            generation,
            request,
            lookback: Lookback::YearToDate,
            threaded: self.config.threads,
        };
        if self.worker_tx.send(cmd).is_err() {
            self.push_error(
                ErrorCategory::Other,
                "Download worker is not running".into(),
                String::new(),
            );
            return false;
        }

        self.charts.pending = true;
        self.set_status(format!("Fetching year-to-date prices for {symbols} symbol(s)..."));
        true
    }

    pub fn apply_worker_response(&mut self, resp: WorkerResponse) {
        if resp.generation() != self.charts.generation {
            debug!(
                got = resp.generation(),
                current = self.charts.generation,
                "dropping stale worker response"
            );
            return;
        }

        self.charts.pending = false;
        match resp {
            WorkerResponse::ChartsReady { charts, .. } => {
                let total = charts.len();
                let empty = charts.iter().filter(|c| !c.has_data()).count();
                self.charts.charts = charts;
                self.charts.scroll = 0;
                if empty > 0 {
                    self.set_warning(format!(
                        "{total} chart(s) loaded, {empty} without price data"
                    ));
                } else {
                    self.set_status(format!("{total} chart(s) loaded"));
                }
            }
            WorkerResponse::FetchFailed { symbols, error, .. } => {
                warn!(%error, "chart fetch failed");
                self.push_error(
                    ErrorCategory::Network,
                    format!("Price download failed: {error}"),
                    symbols.join(", "),
                );
            }
        }
    }

    // ── CSV download ─────────────────────────────────────────────────

    /// Write the current CSV payload into the configured download directory.
    pub fn save_csv(&mut self) -> Option<PathBuf> {
        let Some(download) = &self.table_view.download else {
            self.set_warning("Nothing to download");
            return None;
        };
        match download.save_to(&self.config.download_dir) {
            Ok(path) => {
                self.set_status(format!("Saved {} rows to {}", download.rows, path.display()));
                self.table_view.last_saved = Some(path.clone());
                Some(path)
            }
            Err(e) => {
                let context = self.config.download_dir.display().to_string();
                self.push_error(ErrorCategory::Export, format!("CSV save failed: {e}"), context);
                None
            }
        }
    }

    // ── Status ───────────────────────────────────────────────────────

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
