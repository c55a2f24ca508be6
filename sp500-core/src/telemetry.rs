//! Tracing subscriber setup shared by the front-ends.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing::subscriber::set_global_default;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("open log file {path}: {source}")]
    LogFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("tracing subscriber already installed")]
    AlreadyInstalled(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Compose an env filter and a plain-text fmt layer writing to `sink`.
///
/// `RUST_LOG` wins over `env_filter` when set.
pub fn get_subscriber<Sink>(
    env_filter: &str,
    sink: Sink,
    ansi: bool,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(sink)
        .with_ansi(ansi)
        .with_target(false);
    Registry::default().with(env_filter).with(fmt_layer)
}

/// Register a subscriber as global default. Call once per process.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> Result<(), TelemetryError> {
    set_global_default(subscriber)?;
    Ok(())
}

/// Append-mode log file for front-ends that own the terminal.
pub fn open_log_file(path: &Path) -> Result<Mutex<fs::File>, TelemetryError> {
    let err = |source| TelemetryError::LogFile {
        path: path.display().to_string(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(err)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(err)?;
    Ok(Mutex::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_created_with_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("sp500.log");
        let writer = open_log_file(&path).unwrap();

        let subscriber = get_subscriber("info", writer, false);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(rows = 3, "table loaded");
            tracing::debug!("filtered out");
        });

        let logged = std::fs::read_to_string(&path).unwrap();
        assert!(logged.contains("table loaded"));
        assert!(logged.contains("rows=3"));
        assert!(!logged.contains("filtered out"));
    }
}
