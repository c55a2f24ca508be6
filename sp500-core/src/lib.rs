//! SP500 Core: constituent table, sector filtering, CSV export, price
//! downloads and chart models.
//!
//! This crate holds everything the dashboard front-ends share:
//! - Scraping the constituent table and caching it for the process lifetime
//! - Sector filtering and the data-dimension label
//! - CSV export as a base64 data-URI download
//! - Year-to-date price/volume downloads grouped by ticker
//! - Chart models for the two-panel price/volume figures

pub mod chart;
pub mod config;
pub mod data;
pub mod export;
pub mod selection;
pub mod telemetry;

pub use config::DashboardConfig;
