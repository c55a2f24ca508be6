//! Bulk download: request N symbols, block until all N arrive or one fails.

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, warn};

use super::provider::{DataError, Lookback, PriceProvider, PriceSeries};

/// Price series for one bulk request, grouped by symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedSeries {
    series: BTreeMap<String, PriceSeries>,
}

impl GroupedSeries {
    pub fn get(&self, symbol: &str) -> Option<&PriceSeries> {
        self.series.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn insert(&mut self, series: PriceSeries) {
        self.series.insert(series.symbol.clone(), series);
    }
}

impl FromIterator<PriceSeries> for GroupedSeries {
    fn from_iter<I: IntoIterator<Item = PriceSeries>>(iter: I) -> Self {
        let mut grouped = GroupedSeries::default();
        for s in iter {
            grouped.insert(s);
        }
        grouped
    }
}

/// Fetch every symbol over `lookback`.
///
/// With `threaded` the fetches run on the current rayon pool; otherwise they
/// run one after another. Duplicate symbols are fetched once. The first error
/// fails the whole request.
pub fn download_grouped(
    provider: &dyn PriceProvider,
    symbols: &[String],
    lookback: Lookback,
    threaded: bool,
) -> Result<GroupedSeries, DataError> {
    let mut unique: Vec<&str> = Vec::with_capacity(symbols.len());
    for s in symbols {
        if !unique.contains(&s.as_str()) {
            unique.push(s);
        }
    }

    let started = Instant::now();
    let result: Result<Vec<PriceSeries>, DataError> = if threaded {
        unique
            .par_iter()
            .map(|s| provider.fetch(s, lookback))
            .collect()
    } else {
        unique.iter().map(|s| provider.fetch(s, lookback)).collect()
    };

    match result {
        Ok(series) => {
            info!(
                provider = provider.name(),
                symbols = unique.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "download complete"
            );
            Ok(series.into_iter().collect())
        }
        Err(e) => {
            warn!(provider = provider.name(), error = %e, "download failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::PriceBar;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct StubProvider {
        calls: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl StubProvider {
        fn new(fail_on: Option<&'static str>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on,
            }
        }
    }

    impl PriceProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn fetch(&self, symbol: &str, _lookback: Lookback) -> Result<PriceSeries, DataError> {
            self.calls.lock().unwrap().push(symbol.to_string());
            if self.fail_on == Some(symbol) {
                return Err(DataError::NetworkUnreachable("boom".into()));
            }
            let bar = PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
                volume: 10,
            };
            Ok(PriceSeries::new(symbol, vec![bar]))
        }
    }

    fn syms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn groups_every_requested_symbol() {
        let p = StubProvider::new(None);
        for threaded in [false, true] {
            let g = download_grouped(
                &p,
                &syms(&["AAPL", "MMM", "ABT"]),
                Lookback::YearToDate,
                threaded,
            )
            .unwrap();
            assert_eq!(g.len(), 3);
            assert_eq!(g.get("MMM").unwrap().symbol, "MMM");
        }
    }

    #[test]
    fn duplicates_are_fetched_once() {
        let p = StubProvider::new(None);
        let g =
            download_grouped(&p, &syms(&["AAPL", "AAPL"]), Lookback::YearToDate, false).unwrap();
        assert_eq!(g.len(), 1);
        assert_eq!(p.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn any_failure_fails_the_request() {
        let p = StubProvider::new(Some("MMM"));
        let err = download_grouped(&p, &syms(&["AAPL", "MMM"]), Lookback::YearToDate, true)
            .unwrap_err();
        assert!(matches!(err, DataError::NetworkUnreachable(_)));
    }

    #[test]
    fn empty_request_is_empty_result() {
        let p = StubProvider::new(None);
        let g = download_grouped(&p, &[], Lookback::YearToDate, true).unwrap();
        assert!(g.is_empty());
        assert!(p.calls.lock().unwrap().is_empty());
    }
}
