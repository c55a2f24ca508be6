use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use sp500_core::data::{ConstituentCache, HttpSource, PriceProvider, YahooProvider};
use sp500_core::{telemetry, DashboardConfig};
use sp500_tui::app::AppState;
use sp500_tui::worker::{self, WorkerCommand};
use sp500_tui::{input, ui};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Paths
    let app_dir = |base: Option<PathBuf>| base.unwrap_or_else(|| PathBuf::from(".")).join("sp500");
    let config_path = app_dir(dirs::config_dir()).join("config.toml");
    let log_path = app_dir(dirs::cache_dir()).join("sp500-tui.log");

    let config = DashboardConfig::from_file_or_default(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    // The terminal belongs to the UI, so logs go to a file.
    let log_file = telemetry::open_log_file(&log_path)?;
    telemetry::init_subscriber(telemetry::get_subscriber(&config.log_filter, log_file, false))?;
    info!(config = %config_path.display(), "starting dashboard");

    // Load the constituent table before entering raw mode; without it
    // there is nothing to show.
    let source = HttpSource::new(config.http_timeout(), &config.user_agent)?;
    let cache = ConstituentCache::new(config.source_url.clone());
    let table = cache
        .get_or_load(&source)
        .with_context(|| format!("failed to load the constituent table from {}", cache.url()))?;

    let provider: Arc<dyn PriceProvider> =
        Arc::new(YahooProvider::new(config.http_timeout(), &config.user_agent)?);

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(cmd_rx, resp_tx, provider)?;

    let mut app = AppState::new(table, config, cmd_tx.clone(), resp_rx);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("dashboard closed");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.apply_worker_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
