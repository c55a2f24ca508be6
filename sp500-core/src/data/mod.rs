//! Data acquisition: constituent table scraping and price downloads.

pub mod constituents;
pub mod download;
pub mod provider;
pub mod scrape;
pub mod source;
pub mod yahoo;

pub use constituents::{Company, ConstituentTable};
pub use download::{download_grouped, GroupedSeries};
pub use provider::{DataError, Lookback, PriceBar, PriceProvider, PriceSeries, RawBar};
pub use source::{ConstituentCache, ConstituentSource, HttpSource, DEFAULT_SOURCE_URL};
pub use yahoo::YahooProvider;
