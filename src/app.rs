use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::signal::{Signal, SignalError};
use crate::theme::ThemeMode;

/// How long a status message stays in the info line
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

type LoadResult = Result<Signal, SignalError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

pub struct App {
    pub popup: Popup,
    pub theme: ThemeMode,

    // What the panel shows
    pub signal: Option<Signal>,
    pub is_loading: bool,
    pub spinner_frame: usize,

    // Where signals come from
    pub source: Option<PathBuf>,
    pub refresh_interval: Option<Duration>,   // None = no background re-reads
    pub refresh_paused: bool,                 // Set by clearing, lifted by reload
    pub last_refresh: Instant,
    pub time_format: String,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    // Loads run on a tokio task and report back here
    load_tx: mpsc::UnboundedSender<LoadResult>,
    load_rx: mpsc::UnboundedReceiver<LoadResult>,
    load_in_flight: bool,
    discard_in_flight: bool,                  // Load started before a clear
}

impl App {
    /// Build app state; starts loading `source` right away if there is one
    pub fn new(config: AppConfig, source: Option<PathBuf>, theme: ThemeMode) -> Self {
        let (load_tx, load_rx) = mpsc::unbounded_channel();

        let mut app = Self {
            popup: Popup::None,
            theme,

            signal: None,
            is_loading: false,
            spinner_frame: 0,

            source,
            refresh_interval: (config.refresh_secs > 0).then(|| Duration::from_secs(config.refresh_secs)),
            refresh_paused: false,
            last_refresh: Instant::now(),
            time_format: config.time_format,

            status_message: None,
            status_message_time: None,

            load_tx,
            load_rx,
            load_in_flight: false,
            discard_in_flight: false,
        };

        if app.source.is_some() {
            app.reload();
        }

        app
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.popup == Popup::Help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q')) {
                self.popup = Popup::None;
            }
            return;
        }

        match key.code {
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('c') => self.clear_signal(),
            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,
            _ => {}
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        tracing::debug!("Theme switched to {}", self.theme.label());
        self.set_status(format!("Theme: {}", self.theme.label()));
    }

    /// Show the empty state until the user reloads
    fn clear_signal(&mut self) {
        self.signal = None;
        self.is_loading = false;
        self.refresh_paused = true;
        self.discard_in_flight = self.load_in_flight;
        self.set_status("Signal cleared (r reloads)");
    }

    /// Re-read the signal file, showing the spinner until it arrives
    pub fn reload(&mut self) {
        if self.source.is_none() {
            self.set_status("No signal file (start with --file)");
            return;
        }
        self.refresh_paused = false;
        // A load still running now counts as this reload
        self.discard_in_flight = false;
        self.is_loading = true;
        self.start_load();
    }

    fn start_load(&mut self) {
        if self.load_in_flight {
            return;
        }
        let Some(path) = self.source.clone() else {
            return;
        };

        self.load_in_flight = true;
        let tx = self.load_tx.clone();
        tokio::spawn(async move {
            let result = crate::signal::load_signal(&path).await;
            // Receiver only goes away when the app exits
            let _ = tx.send(result);
        });
    }

    fn apply_load_result(&mut self, result: LoadResult) {
        self.load_in_flight = false;
        self.is_loading = false;
        self.last_refresh = Instant::now();

        if self.discard_in_flight {
            self.discard_in_flight = false;
            tracing::debug!("Dropping signal load started before clear");
            return;
        }

        match result {
            Ok(signal) => {
                if self.signal.as_ref() != Some(&signal) {
                    tracing::info!(
                        "New signal {}: {} {} ({})",
                        signal.id,
                        signal.side.label(),
                        signal.symbol,
                        crate::format::format_confidence(signal.confidence)
                    );
                }
                self.signal = Some(signal);
            }
            Err(e) => {
                // A source we cannot read means there is no signal to show
                tracing::warn!("{}", e);
                self.signal = None;
                self.set_status(format!("Error: {}", e));
            }
        }
    }

    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);

        while let Ok(result) = self.load_rx.try_recv() {
            self.apply_load_result(result);
        }

        // Clear status message after timeout
        if let Some(time) = self.status_message_time {
            if time.elapsed() >= STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }

        // Background re-read keeps the last signal on screen (no spinner)
        if let Some(interval) = self.refresh_interval {
            if !self.refresh_paused && !self.load_in_flight && self.last_refresh.elapsed() >= interval {
                self.start_load();
            }
        }
    }
}
