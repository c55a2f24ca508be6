//! Price provider trait, bar types and structured error types.
//!
//! The PriceProvider trait abstracts over price sources so the dashboard can
//! swap implementations and mock them in tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw daily OHLCV quote from a provider, before price adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adj_close: f64,
}

impl RawBar {
    /// Scale OHLC by the adjustment ratio (adj_close / close) so splits and
    /// dividends do not show up as price gaps. Close becomes adj_close.
    pub fn adjusted(&self) -> PriceBar {
        let ratio = if self.close.is_finite() && self.close != 0.0 && self.adj_close.is_finite() {
            self.adj_close / self.close
        } else {
            1.0
        };
        PriceBar {
            date: self.date,
            open: self.open * ratio,
            high: self.high * ratio,
            low: self.low * ratio,
            close: self.close * ratio,
            volume: self.volume,
        }
    }
}

/// One adjusted trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Daily series for one symbol, dates ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }
}

/// Retrieval window for a price request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    /// From 1 January of the current year to today.
    YearToDate,
    /// Explicit inclusive date range.
    Range { start: NaiveDate, end: NaiveDate },
}

/// Structured error types for data operations.
///
/// Displayable in both CLI and TUI contexts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no HTML table found in page")]
    NoTable,

    #[error("table has no header row")]
    EmptyTable,

    #[error("required column '{0}' missing from constituent table")]
    MissingColumn(String),

    #[error("duplicate symbol '{0}' in constituent table")]
    DuplicateSymbol(String),

    #[error("cache is keyed by {cached}, cannot serve {requested}")]
    CacheKeyMismatch { cached: String, requested: String },

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for price providers (Yahoo Finance, test stubs).
///
/// Implementations fetch one symbol at a time; bulk requests are orchestrated
/// by [`super::download::download_grouped`].
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily adjusted bars for a symbol over the lookback window.
    fn fetch(&self, symbol: &str, lookback: Lookback) -> Result<PriceSeries, DataError>;
}
