//! CSV export of the (filtered) constituent table.
//!
//! The table is written as CSV, base64-encoded, and wrapped in a data URI so
//! a browser-style link can trigger a client-side download. The terminal UI
//! and CLI decode the same payload to write the file.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use thiserror::Error;
use tracing::info;

use crate::data::ConstituentTable;

pub const DEFAULT_CSV_FILENAME: &str = "SP500.csv";
pub const LINK_TEXT: &str = "Download CSV File (with respect to filtered sectors)";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Write the table as CSV text: header row, then rows, no index column.
pub fn to_csv(table: &ConstituentTable) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// A base64 CSV payload ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDownload {
    pub filename: String,
    pub payload: String,
    pub rows: usize,
}

impl CsvDownload {
    pub fn from_table(table: &ConstituentTable, filename: &str) -> Result<Self, ExportError> {
        let csv = to_csv(table)?;
        Ok(Self {
            filename: filename.to_string(),
            payload: BASE64.encode(csv.as_bytes()),
            rows: table.row_count(),
        })
    }

    pub fn data_uri(&self) -> String {
        format!("data:file/csv;base64,{}", self.payload)
    }

    /// `<a href="data:..." download="SP500.csv">Download CSV File ...</a>`
    pub fn html_link(&self) -> String {
        format!(
            r#"<a href="{}" download="{}">{LINK_TEXT}</a>"#,
            self.data_uri(),
            self.filename
        )
    }

    /// Decode the payload back to CSV text.
    pub fn decode(&self) -> Result<String, ExportError> {
        let bytes = BASE64.decode(self.payload.as_bytes())?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Write the decoded CSV to `dir/filename`, creating `dir` if needed.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, BASE64.decode(self.payload.as_bytes())?)?;
        info!(path = %path.display(), rows = self.rows, "saved csv export");
        Ok(path)
    }
}
