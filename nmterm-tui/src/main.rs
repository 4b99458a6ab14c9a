/*!
 * nmterm
 * Terminal front-end for NetworkManager, driven through nmcli
 */

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::Duration;

use nmterm_core::config::{self, Config};
use nmterm_core::{CommandRunner, NetworkManager};

mod app;
mod logging;
mod ui;
mod worker;

use app::{Action, App, Level};
use ui::render_ui;
use worker::Worker;

#[derive(Parser)]
#[command(name = "nmterm")]
#[command(about = "Terminal interface for NetworkManager")]
struct Cli {
    /// Config file path (default: ~/.nmterm/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug tab and debug log
    #[arg(short, long)]
    debug: bool,

    /// Poll interval in milliseconds
    #[arg(short, long)]
    interval: Option<u64>,

    /// nmcli binary to run
    #[arg(long)]
    nmcli: Option<String>,

    /// Interface used when connecting
    #[arg(long)]
    interface: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = config::ensure_config_dir();
    let config_path = cli.config.clone().or_else(config::default_config_path);

    let mut startup_notes = Vec::new();
    let mut config = match &config_path {
        Some(path) => Config::load(path).unwrap_or_else(|e| {
            startup_notes.push(format!("{}; using defaults", e));
            Config::default()
        }),
        None => Config::default(),
    };
    apply_overrides(&mut config, &cli);

    // Keep the guard alive until the terminal is restored
    let _log_guard = match (config.debug, &config_dir) {
        (true, Some(_)) => match config::debug_log_path().map(|p| logging::init_file_logging(&p)) {
            Some(Ok(guard)) => Some(guard),
            Some(Err(e)) => {
                startup_notes.push(format!("debug log disabled: {}", e));
                None
            }
            None => None,
        },
        _ => None,
    };

    tracing::info!("nmterm starting, config {:?}", config_path);

    let runner = CommandRunner::new(config.command_timeout());
    let nm = NetworkManager::new(runner, config.nmcli.clone());
    let mut worker = Worker::spawn(nm, config.poll_interval());

    let mut app = App::new(config);
    for note in startup_notes {
        app.notify(Level::Error, note);
    }

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &mut worker).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("nmterm exiting");
    result
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if cli.debug {
        config.debug = true;
    }
    if let Some(interval) = cli.interval {
        config.poll_interval_ms = interval;
    }
    if let Some(nmcli) = &cli.nmcli {
        config.nmcli = nmcli.clone();
    }
    if cli.interface.is_some() {
        config.interface = cli.interface.clone();
    }
}

async fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    worker: &mut Worker,
) -> Result<()> {
    loop {
        while let Some(response) = worker.try_recv() {
            app.apply(response);
        }
        app.tick();

        terminal.draw(|f| render_ui(f, app))?;

        // Short poll keeps worker results flowing to the screen
        if !event::poll(Duration::from_millis(50))? {
            tokio::task::yield_now().await;
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Some(Action::Quit) => return Ok(()),
            Some(Action::Refresh) => {
                app.record(Level::Info, "manual refresh");
                worker.refresh();
            }
            Some(Action::Submit(request)) => {
                let what = request.describe();
                if worker.submit(request) {
                    app.notify(Level::Info, format!("{}...", what));
                } else {
                    app.notify(Level::Error, format!("busy, dropped: {}", what));
                }
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::parse_from(["nmterm", "--debug", "-i", "2500", "--interface", "wlan0"]);
        let mut config = Config::default();
        apply_overrides(&mut config, &cli);

        assert!(config.debug);
        assert_eq!(config.poll_interval_ms, 2500);
        assert_eq!(config.interface.as_deref(), Some("wlan0"));
        assert_eq!(config.nmcli, "nmcli");
    }

    #[test]
    fn no_flags_keep_file_values() {
        let cli = Cli::parse_from(["nmterm"]);
        let mut config = Config {
            debug: true,
            interface: Some("wlp2s0".into()),
            ..Config::default()
        };
        apply_overrides(&mut config, &cli);
        assert!(config.debug);
        assert_eq!(config.interface.as_deref(), Some("wlp2s0"));
    }
}
