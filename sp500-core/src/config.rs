//! Dashboard configuration, loaded from TOML.
//!
//! Every key is optional; a missing file or empty document yields defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::source::DEFAULT_SOURCE_URL;
use crate::export::DEFAULT_CSV_FILENAME;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Page whose first table is the constituent list.
    pub source_url: String,
    /// File name offered for the CSV download.
    pub csv_filename: String,
    /// Where downloads are written.
    pub download_dir: PathBuf,
    /// Fetch symbols concurrently.
    pub threads: bool,
    /// Pair a single-company request with a companion symbol.
    pub pad_single_request: bool,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    /// Default tracing filter when RUST_LOG is unset.
    pub log_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            csv_filename: DEFAULT_CSV_FILENAME.to_string(),
            download_dir: PathBuf::from("."),
            threads: true,
            pad_single_request: false,
            http_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load `path` if it exists, otherwise defaults. A file that exists but
    /// does not parse is still an error.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = DashboardConfig::from_toml("").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.csv_filename, "SP500.csv");
        assert!(cfg.threads);
        assert!(!cfg.pad_single_request);
    }

    #[test]
    fn partial_document_overrides_only_given_keys() {
        let cfg = DashboardConfig::from_toml(
            r#"
pad_single_request = true
download_dir = "/tmp/exports"
"#,
        )
        .unwrap();
        assert!(cfg.pad_single_request);
        assert_eq!(cfg.download_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(cfg.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = DashboardConfig::default();
        cfg.log_filter = "debug".into();
        let parsed = DashboardConfig::from_toml(&cfg.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn bad_types_are_errors() {
        assert!(matches!(
            DashboardConfig::from_toml("threads = \"yes\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg =
            DashboardConfig::from_file_or_default(Path::new("/nonexistent/sp500.toml")).unwrap();
        assert_eq!(cfg, DashboardConfig::default());
    }
}
