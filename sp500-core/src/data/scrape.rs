//! HTML table scraping.
//!
//! Reads the first `<table>` of a page: the first row is the header, every
//! later row is data. Cell text is whitespace-collapsed; rows narrower than
//! the header are padded with empty cells and wider rows are truncated.

use scraper::{ElementRef, Html, Selector};

use super::constituents::ConstituentTable;
use super::provider::DataError;

/// Parse the first HTML table of `html` into a constituent table.
pub fn parse_first_table(html: &str) -> Result<ConstituentTable, DataError> {
    let (columns, rows) = parse_first_table_raw(html)?;
    ConstituentTable::new(columns, rows)
}

/// Parse the first HTML table into (header, rows) without column checks.
pub fn parse_first_table_raw(html: &str) -> Result<(Vec<String>, Vec<Vec<String>>), DataError> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or(DataError::NoTable)?;

    let mut rows = table
        .select(&row_sel)
        .filter(|row| owning_table(row).map(|t| t.id()) == Some(table.id()))
        .map(|row| row_cells(&row))
        .filter(|cells| !cells.is_empty());

    let header = rows.next().ok_or(DataError::EmptyTable)?;
    let width = header.len();

    let body = rows
        .map(|mut cells| {
            cells.resize(width, String::new());
            cells
        })
        .collect();

    Ok((header, body))
}

fn selector(css: &'static str) -> Result<Selector, DataError> {
    Selector::parse(css).map_err(|e| DataError::Other(format!("bad selector {css}: {e:?}")))
}

/// Nearest enclosing `<table>`, so rows of nested tables are ignored.
fn owning_table<'a>(row: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "table")
}

fn row_cells(row: &ElementRef<'_>) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "th" | "td"))
        .map(|cell| cell_text(&cell))
        .collect()
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    let raw: String = cell.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
