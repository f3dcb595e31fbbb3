mod app;
mod config;
mod format;
mod signal;
mod status;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use config::AppConfig;
use signal::Signal;
use theme::ThemeMode;
use ui::panel::SignalPanel;

#[derive(Parser, Debug)]
#[command(name = "signal-panel")]
#[command(version)]
#[command(about = "A terminal card for the latest AI trading signal")]
struct Args {
    /// Signal JSON file to display (overrides signal_path in config)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Color theme (overrides theme in config)
    #[arg(short, long, value_enum)]
    theme: Option<ThemeMode>,

    /// Output the current signal as JSON (for waybar)
    #[arg(short, long)]
    status: bool,

    /// Print the panel once as plain text and exit
    #[arg(short, long)]
    print: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, so --status/--print output stays clean)
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = AppConfig::load();

    let source = args.file.or_else(|| config.signal_path.clone());
    let theme = args.theme.unwrap_or(config.theme);

    // Handle CLI-only commands
    if args.status {
        let signal = load_once(source.as_ref()).await;
        println!("{}", serde_json::to_string(&status::status_json(signal.as_ref()))?);
        return Ok(());
    }

    if args.print {
        let signal = load_once(source.as_ref()).await;
        let panel = SignalPanel::new(signal.as_ref(), false, theme).time_format(&config.time_format);
        println!("{}", panel.plain_text());
        return Ok(());
    }

    // Run TUI
    run_tui(App::new(config, source, theme)).await
}

/// Load for one-shot commands; a failed load is shown as "no signal"
async fn load_once(source: Option<&PathBuf>) -> Option<Signal> {
    let path = source?;
    match signal::load_signal(path).await {
        Ok(signal) => Some(signal),
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    }
}

async fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    tracing::info!("Starting signal-panel ({} theme)", app.theme.label());

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Poll without blocking the runtime so load tasks keep running
        let key = tokio::task::block_in_place(|| -> Result<Option<event::KeyEvent>> {
            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    return Ok(Some(key));
                }
            }
            Ok(None)
        })?;

        if let Some(key) = key {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    _ => app.handle_key(key),
                }
            }
        }

        // Periodic refresh
        app.tick();
    }
}
