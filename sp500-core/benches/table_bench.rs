//! Criterion benchmarks for the dashboard's per-interaction work.
//!
//! Benchmarks:
//! 1. Parsing a full-size constituent page
//! 2. Sector filtering
//! 3. CSV export (encode + base64)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use sp500_core::data::scrape::parse_first_table;
use sp500_core::export::CsvDownload;

const SECTORS: &[&str] = &[
    "Communication Services",
    "Consumer Discretionary",
    "Consumer Staples",
    "Energy",
    "Financials",
    "Health Care",
    "Industrials",
    "Information Technology",
    "Materials",
    "Real Estate",
    "Utilities",
];

// ── Helpers ──────────────────────────────────────────────────────────

fn make_page(rows: usize) -> String {
    let mut html = String::from(
        "<html><body><table class=\"wikitable\"><tbody>\
         <tr><th>Symbol</th><th>Security</th><th>GICS Sector</th>\
         <th>GICS Sub-Industry</th><th>Headquarters Location</th>\
         <th>Date added</th><th>CIK</th><th>Founded</th></tr>",
    );
    for i in 0..rows {
        let sector = SECTORS[i % SECTORS.len()];
        html.push_str(&format!(
            "<tr><td><a href=\"#\">T{i}</a></td><td><a>Company {i}</a></td><td>{sector}</td>\
             <td>Sub {i}</td><td>City {i}, State</td><td>2001-01-01</td>\
             <td>{:010}</td><td>19{:02}</td></tr>",
            i * 7,
            i % 100
        ));
    }
    html.push_str("</tbody></table></body></html>");
    html
}

// ── Benches ──────────────────────────────────────────────────────────

fn bench_parse(c: &mut Criterion) {
    let page = make_page(503);
    c.bench_function("parse_first_table/503", |b| {
        b.iter(|| parse_first_table(black_box(&page)).unwrap())
    });
}

fn bench_filter(c: &mut Criterion) {
    let table = parse_first_table(&make_page(503)).unwrap();
    let mut group = c.benchmark_group("filter_by_sectors");
    for n in [0usize, 1, 3, 11] {
        let selected: Vec<String> = SECTORS.iter().take(n).map(|s| s.to_string()).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &selected, |b, sel| {
            b.iter(|| table.filter_by_sectors(black_box(sel)))
        });
    }
    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let table = parse_first_table(&make_page(503)).unwrap();
    c.bench_function("csv_download/503", |b| {
        b.iter(|| CsvDownload::from_table(black_box(&table), "SP500.csv").unwrap())
    });
}

criterion_group!(benches, bench_parse, bench_filter, bench_export);
criterion_main!(benches);
