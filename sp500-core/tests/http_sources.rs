//! HTTP-level tests for the constituent source and the Yahoo provider,
//! run against a local mock server.

use std::time::Duration;

use httpmock::prelude::*;
use sp500_core::data::{
    ConstituentCache, ConstituentSource, DataError, HttpSource, Lookback, PriceProvider,
    YahooProvider,
};

const PAGE: &str = r#"<html><body>
<table class="wikitable sortable" id="constituents"><tbody>
<tr><th>Symbol</th><th>Security</th><th>GICS Sector</th><th>GICS Sub-Industry</th></tr>
<tr><td>MMM</td><td>3M</td><td>Industrials</td><td>Industrial Conglomerates</td></tr>
<tr><td>ABT</td><td>Abbott</td><td>Health Care</td><td>Health Care Equipment</td></tr>
<tr><td>BRK.B</td><td>Berkshire Hathaway</td><td>Financials</td><td>Multi-Sector Holdings</td></tr>
</tbody></table>
<table><tr><th>Date</th><th>Added</th></tr></table>
</body></html>"#;

const CHART: &str = r#"{"chart":{"result":[{
  "meta":{"symbol":"BRK-B"},
  "timestamp":[1704205800,1704292200,1704378600],
  "indicators":{
    "quote":[{"open":[360.0,362.0,null],"high":[365.0,366.0,null],"low":[358.0,360.0,null],
              "close":[362.0,364.0,null],"volume":[3000000,2500000,null]}],
    "adjclose":[{"adjclose":[181.0,182.0,null]}]
  }}],"error":null}}"#;

fn http_source() -> HttpSource {
    HttpSource::new(Duration::from_secs(5), "sp500-test").unwrap()
}

fn yahoo(server: &MockServer) -> YahooProvider {
    YahooProvider::with_base_url(server.base_url(), Duration::from_secs(5), "sp500-test").unwrap()
}

#[test]
fn cache_fetches_the_page_once() {
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/wiki/sp500");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(PAGE);
    });

    let cache = ConstituentCache::new(server.url("/wiki/sp500"));
    let source = http_source();
    let first = cache.get_or_load(&source).unwrap();
    let second = cache.get_or_load(&source).unwrap();

    assert_eq!(first.shape(), (3, 4));
    assert_eq!(second.symbol(2), Some("BRK.B"));
    page.assert_hits(1);
}

#[test]
fn server_error_surfaces_as_http_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/down");
        then.status(503);
    });

    let err = http_source().fetch_html(&server.url("/down")).unwrap_err();
    assert!(matches!(err, DataError::HttpStatus { status: 503, .. }));
}

#[test]
fn page_without_constituent_columns_fails_the_load() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/other");
        then.status(200).body("<table><tr><th>Name</th></tr></table>");
    });

    let cache = ConstituentCache::new(server.url("/other"));
    let err = cache.get_or_load(&http_source()).unwrap_err();
    assert!(matches!(err, DataError::MissingColumn(_)));
    assert!(cache.peek().is_none());
}

#[test]
fn yahoo_ytd_request_is_adjusted_and_keyed_by_table_symbol() {
    let server = MockServer::start();
    let chart = server.mock(|when, then| {
        when.method(GET)
            .path("/v8/finance/chart/BRK-B")
            .query_param("range", "ytd")
            .query_param("interval", "1d")
            .query_param("includePrePost", "true");
        then.status(200)
            .header("content-type", "application/json")
            .body(CHART);
    });

    let series = yahoo(&server).fetch("BRK.B", Lookback::YearToDate).unwrap();

    chart.assert();
    assert_eq!(series.symbol, "BRK.B");
    assert_eq!(series.len(), 2);
    assert_eq!(series.bars[0].close, 181.0);
    assert_eq!(series.bars[0].open, 180.0);
    assert_eq!(series.bars[1].volume, 2_500_000);
}

#[test]
fn yahoo_unknown_symbol() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v8/finance/chart/NOPE");
        then.status(404).body(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        );
    });

    let err = yahoo(&server).fetch("NOPE", Lookback::YearToDate).unwrap_err();
    assert!(matches!(err, DataError::SymbolNotFound { .. }));
}

#[test]
fn yahoo_errors_are_not_retried() {
    let server = MockServer::start();
    let failing = server.mock(|when, then| {
        when.method(GET).path("/v8/finance/chart/MMM");
        then.status(500);
    });

    let err = yahoo(&server).fetch("MMM", Lookback::YearToDate).unwrap_err();
    assert!(matches!(err, DataError::HttpStatus { status: 500, .. }));
    failing.assert_hits(1);
}

#[test]
fn yahoo_garbage_body_is_a_format_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v8/finance/chart/MMM");
        then.status(200).body("<html>consent wall</html>");
    });

    let err = yahoo(&server).fetch("MMM", Lookback::YearToDate).unwrap_err();
    assert!(matches!(err, DataError::ResponseFormatChanged(_)));
}
