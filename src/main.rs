// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # riffbox.
//!
//! A terminal music catalog, playlist manager and player.
//!
//! This application coordinates a TUI frontend built with `ratatui`, an audio
//! device backed by `mpv`, and a background worker for account and import
//! operations.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** manages the terminal lifecycle, UI rendering and the
//!   playback coordinator.
//! * **Background Workers** handle account operations, directory scans and
//!   uploads via asynchronous command processing, and drive the audio device.
//! * **Event Loops** capture user input and system ticks to drive the UI
//!   state.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a crash. Communication
//! between the UI and background workers is handled via `std::sync::mpsc`
//! channels.

mod actions;
mod commander;
mod components;
mod config;
mod identity;
mod importer;
mod logging;
mod model;
mod player;
mod render;
mod storage;
mod theme;
mod util;

use anyhow::{Context, Result};
use crossterm::{
    event::{self},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self},
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};

use crate::{
    actions::{
        commands::AppCommand,
        events::{AppEvent, process_events},
    },
    commander::Commander,
    components::{PlaylistView, QueueView, SongTableState},
    config::AppConfig,
    identity::User,
    model::{
        catalog::Catalog,
        playlists::PlaylistStore,
        search::SearchQuery,
        seed,
    },
    player::{PlaybackCoordinator, mpv::MpvDevice},
    theme::Theme,
};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum MainView {
    Catalog,
    Playlists,
    Queue,
}

/// A one-line message shown above the command line until replaced or
/// dismissed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StatusMessage {
    Info(String),
    Error(String),
}

/// Application state.
pub(crate) struct App {
    pub config: AppConfig,

    pub theme: Theme,
    pub main_view: MainView,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub command_tx: Sender<AppCommand>,

    pub catalog: Catalog,
    pub playlists: PlaylistStore,
    pub search: SearchQuery,

    pub player: PlaybackCoordinator<MpvDevice>,

    pub catalog_view: SongTableState,
    pub playlist_view: PlaylistView,
    pub queue_view: QueueView,

    pub commander: Commander,

    pub user: Option<User>,
    pub status: Option<StatusMessage>,
    /// Label of the account or import command in flight, if any.
    pub busy: Option<&'static str>,
}

impl App {
    /// Create a new instance of application state.
    pub fn new(config: AppConfig, command_tx: Sender<AppCommand>) -> Self {
        let (event_tx, event_rx) = mpsc::channel();

        let device = MpvDevice::spawn(event_tx.clone());
        let player = PlaybackCoordinator::new(device, config.initial_volume);

        let (catalog, playlists) = if config.seed_catalog {
            let catalog = seed::catalog();
            let playlists = seed::playlists(&catalog);
            (catalog, playlists)
        } else {
            (Catalog::new(), PlaylistStore::new())
        };

        let mut app = Self {
            config,
            theme: Theme::default(),
            main_view: MainView::Catalog,
            event_tx,
            event_rx,
            command_tx,
            catalog,
            playlists,
            search: SearchQuery::default(),
            player,
            catalog_view: SongTableState::new(),
            playlist_view: PlaylistView::new(),
            queue_view: QueueView::new(),
            commander: Commander::new(),
            user: None,
            status: None,
            busy: None,
        };

        app.refresh_catalog_view();
        app.playlist_view.refresh(&app.playlists);

        app
    }

    /// Re-runs the catalog search after the catalog or the query changed.
    pub fn refresh_catalog_view(&mut self) {
        let songs = self.catalog.search(&self.search).into_iter().cloned().collect();
        self.catalog_view.set_songs(songs);
    }

    pub fn notify(&mut self, message: String) {
        self.status = Some(StatusMessage::Info(message));
    }

    pub fn fail(&mut self, message: String) {
        tracing::debug!("{}", message);
        self.status = Some(StatusMessage::Error(message));
    }

    /// Hands a slow command to the background worker, showing `label` until
    /// it finishes.
    pub fn dispatch(&mut self, command: AppCommand, label: &'static str) -> Result<()> {
        self.command_tx.send(command).context("Command worker has stopped")?;
        self.busy = Some(label);
        Ok(())
    }
}

/// The entry point of the application.
///
/// Sets up the communication channels, initializes the application state,
/// manages the terminal lifecycle, and returns an error if any part of the
/// execution fails.
fn main() -> Result<()> {
    let config = config::load_config();

    let _log_guard = logging::init_logging(&config).context("Failed to initialise logging")?;
    tracing::info!("Starting riffbox");

    let (command_tx, command_rx) = mpsc::channel();

    let mut app = App::new(config, command_tx);

    let mut terminal = setup_terminal()?;
    let res = run(&mut terminal, &mut app, command_rx);
    restore_terminal(&mut terminal);

    if let Err(e) = &res {
        tracing::error!("Application error: {:#}", e);
    }

    res.context("Application error occurred")
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`], disabling raw mode
/// and leaving the alternate screen. It also ensures the cursor is made
/// visible again.
///
/// This function is "best-effort" and does not return a result, as it is
/// called during cleanup.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
}

/// Starts the application's background workers and enters the main event loop.
///
/// This function spawns several long-running background threads:
/// * A command worker to process asynchronous [`AppCommand`]s.
/// * An input thread to poll for system keyboard events.
/// * A tick thread to trigger periodic UI refreshes.
///
/// After spawning the workers, it hands control to [`process_events`] to
/// manage the UI and state updates.
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    command_rx: Receiver<AppCommand>,
) -> Result<()> {
    // Spawn a background worker to process application commands asynchronously.
    let command_event_tx = app.event_tx.clone();
    actions::commands::spawn_command_worker(&app.config, command_rx, command_event_tx);

    // Spawn a thread to translate raw key events to application events.
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            if let Ok(event::Event::Key(key)) = event::read() {
                if tx_keys.send(AppEvent::Key(key)).is_err() {
                    break;
                }
            }
        }
    });

    // Spawn a thread to send a periodic tick application event, this is
    // effectively the minimum "frame rate" for rendering the TUI application.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        while tx_tick.send(AppEvent::Tick).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });

    // Pick up a session left signed in by a previous run
    app.dispatch(AppCommand::RestoreSession, "Restoring session")?;

    if !app.config.media_dirs.is_empty() {
        app.command_tx
            .send(AppCommand::ScanMediaDirs)
            .context("Command worker has stopped")?;
    }

    // Application event loop, process events until the user quits
    process_events(terminal, app)
}
