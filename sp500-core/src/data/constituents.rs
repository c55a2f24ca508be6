//! Constituent table: the index members and their metadata, as scraped.
//!
//! Columns are kept verbatim from the source page. Only three are required:
//! the ticker symbol, the display name and the GICS sector. The table is
//! immutable once built; filtering produces a new table.

use std::collections::{BTreeSet, HashSet};

use super::provider::DataError;

pub const SYMBOL_COLUMN: &str = "Symbol";
pub const SECURITY_COLUMN: &str = "Security";
pub const SECTOR_COLUMN: &str = "GICS Sector";

/// A company as the dashboard needs it: ticker plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Company {
    pub symbol: String,
    pub security: String,
}

/// The parsed constituent table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstituentTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    symbol_idx: usize,
    security_idx: usize,
    sector_idx: usize,
}

impl ConstituentTable {
    /// Build a table, locating the required columns and checking that every
    /// symbol is unique. Rows must already match the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, DataError> {
        let find = |name: &str| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))
        };
        let symbol_idx = find(SYMBOL_COLUMN)?;
        let security_idx = find(SECURITY_COLUMN)?;
        let sector_idx = find(SECTOR_COLUMN)?;

        if let Some(bad) = rows.iter().find(|r| r.len() != columns.len()) {
            return Err(DataError::Other(format!(
                "row has {} cells, header has {}",
                bad.len(),
                columns.len()
            )));
        }

        let mut seen = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !seen.insert(row[symbol_idx].as_str()) {
                return Err(DataError::DuplicateSymbol(row[symbol_idx].clone()));
            }
        }

        Ok(Self {
            columns,
            rows,
            symbol_idx,
            security_idx,
            sector_idx,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// (rows, columns), like a dataframe shape.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// "Data Dimension: R rows and C columns."
    pub fn dimension_label(&self) -> String {
        let (rows, cols) = self.shape();
        format!("Data Dimension: {rows} rows and {cols} columns.")
    }

    pub fn symbol(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(|r| r[self.symbol_idx].as_str())
    }

    pub fn security(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(|r| r[self.security_idx].as_str())
    }

    pub fn sector(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(|r| r[self.sector_idx].as_str())
    }

    /// Sorted unique sector names.
    pub fn sectors(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r[self.sector_idx].clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Display names in table order.
    pub fn securities(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|r| r[self.security_idx].as_str())
            .collect()
    }

    /// Rows whose sector is one of `selected`, in table order. An empty
    /// selection means "no filter" and yields the whole table.
    pub fn filter_by_sectors(&self, selected: &[String]) -> ConstituentTable {
        if selected.is_empty() {
            return self.clone();
        }
        let wanted: HashSet<&str> = selected.iter().map(String::as_str).collect();
        let rows = self
            .rows
            .iter()
            .filter(|r| wanted.contains(r[self.sector_idx].as_str()))
            .cloned()
            .collect();
        ConstituentTable {
            columns: self.columns.clone(),
            rows,
            symbol_idx: self.symbol_idx,
            security_idx: self.security_idx,
            sector_idx: self.sector_idx,
        }
    }

    /// Look up a company by display name.
    pub fn company_by_security(&self, security: &str) -> Option<Company> {
        self.rows
            .iter()
            .find(|r| r[self.security_idx] == security)
            .map(|r| self.company_at(r))
    }

    /// Look up a company by ticker symbol.
    pub fn company_by_symbol(&self, symbol: &str) -> Option<Company> {
        self.rows
            .iter()
            .find(|r| r[self.symbol_idx] == symbol)
            .map(|r| self.company_at(r))
    }

    /// Rows for the given companies, in the order given. Unknown symbols are skipped.
    pub fn rows_for(&self, companies: &[Company]) -> ConstituentTable {
        let rows = companies
            .iter()
            .filter_map(|c| self.rows.iter().find(|r| r[self.symbol_idx] == c.symbol))
            .cloned()
            .collect();
        ConstituentTable {
            columns: self.columns.clone(),
            rows,
            symbol_idx: self.symbol_idx,
            security_idx: self.security_idx,
            sector_idx: self.sector_idx,
        }
    }

    fn company_at(&self, row: &[String]) -> Company {
        Company {
            symbol: row[self.symbol_idx].clone(),
            security: row[self.security_idx].clone(),
        }
    }
}
