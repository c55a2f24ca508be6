//! Background worker thread: price downloads run here, never on the UI
//! thread.
//!
//! Communication with the TUI main thread is via `mpsc` channels. The worker
//! owns a private rayon::ThreadPool (not the global pool) so concurrent
//! per-symbol fetches never compete with anything else in the process.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use rayon::ThreadPool;
use tracing::{debug, info};

use sp500_core::chart::{build_chart_set, CompanyChart};
use sp500_core::data::{download_grouped, Lookback, PriceProvider};
use sp500_core::selection::ChartRequest;

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    FetchCharts {
        /// Echoed back so the UI can drop answers to superseded requests.
        generation: u64,
        request: ChartRequest,
        lookback: Lookback,
        threaded: bool,
    },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    ChartsReady {
        generation: u64,
        charts: Vec<CompanyChart>,
    },
    FetchFailed {
        generation: u64,
        symbols: Vec<String>,
        error: String,
    },
}

impl WorkerResponse {
    pub fn generation(&self) -> u64 {
        match self {
            WorkerResponse::ChartsReady { generation, .. }
            | WorkerResponse::FetchFailed { generation, .. } => *generation,
        }
    }
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    provider: Arc<dyn PriceProvider>,
) -> Result<JoinHandle<()>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .thread_name(|i| format!("sp500-fetch-{i}"))
        .build()
        .context("failed to build worker rayon pool")?;

    thread::Builder::new()
        .name("sp500-worker".into())
        .spawn(move || worker_loop(rx, tx, provider, pool))
        .context("failed to spawn worker thread")
}

fn worker_loop(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    provider: Arc<dyn PriceProvider>,
    pool: ThreadPool,
) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::FetchCharts {
                generation,
                request,
                lookback,
                threaded,
            }) => {
                let resp = handle_fetch(
                    &pool,
                    provider.as_ref(),
                    generation,
                    request,
                    lookback,
                    threaded,
                );
                if tx.send(resp).is_err() {
                    break;
                }
            }
        }
    }
    debug!("worker stopped");
}

fn handle_fetch(
    pool: &ThreadPool,
    provider: &dyn PriceProvider,
    generation: u64,
    request: ChartRequest,
    lookback: Lookback,
    threaded: bool,
) -> WorkerResponse {
    info!(
        generation,
        symbols = ?request.symbols,
        companions = ?request.companions(),
        "fetching chart data"
    );

    let downloaded =
        pool.install(|| download_grouped(provider, &request.symbols, lookback, threaded));
    match downloaded {
        Ok(grouped) => WorkerResponse::ChartsReady {
            generation,
            charts: build_chart_set(&request, &grouped),
        },
        Err(e) => WorkerResponse::FetchFailed {
            generation,
            symbols: request.symbols,
            error: e.to_string(),
        },
    }
}
