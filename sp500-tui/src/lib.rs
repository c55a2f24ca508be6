//! SP500 TUI: terminal dashboard over the S&P 500 constituent table.
//!
//! Layout:
//! - Sidebar with the sector filter, the company selector and the fetch button
//! - Filtered constituent table with its dimension label and CSV download
//! - Closing price and volume charts for the selected companies

pub mod app;
pub mod input;
pub mod theme;
pub mod ui;
pub mod worker;

#[cfg(test)]
mod test_helpers;
