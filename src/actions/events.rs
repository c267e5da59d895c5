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

//! Application event distribution and orchestration.
//!
//! This module defines the central event-handling logic for the application,
//! bridging the gap between user input (keyboard), background worker updates
//! (accounts, imports, audio device), and the UI rendering pipeline.
//!
//! # Architecture
//!
//! The system follows a reactive event-loop pattern:
//!
//! 1. **Capture**: Events are received via the [`AppEvent`] enum through a
//!    channel.
//! 2. **Process**: The [`process_events`] function updates the [`App`] state,
//!    sends commands to the background worker, and drives the playback
//!    coordinator.
//! 3. **Render**: After each event is processed, the UI is re-drawn using the
//!    `ratatui` terminal.

use std::io::Stdout;

use anyhow::{Result, anyhow};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{
    App, MainView,
    actions::commands::{AppCommand, UploadSpec},
    commander::{Command, CommanderOutput, SongField},
    components::{PlaylistAction, QueueAction, SongTableAction},
    identity::{Credentials, PasswordChange, ProfileUpdate, Registration, User},
    model::{
        Song, SongPatch,
        playlists::{PlaylistDraft, PlaylistId, PlaylistPatch},
        queue::Direction,
    },
    player::{TransportState, device::DeviceSignal},
    render::draw,
};

const VOLUME_STEP: f64 = 0.05;

const FINE_SEEK_DELTA: f64 = 5.0;
const SEEK_DELTA: f64 = 20.0;

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),

    Device(DeviceSignal),

    SessionChanged(Option<User>),
    SongsImported(Vec<Song>),
    CommandFinished,

    Tick,

    ExitApplication,

    Notice(String),
    Error(String),
    FatalError(String),
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed.
pub(crate) fn process_events(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    terminal.draw(|f| draw(f, app))?;

    while let Ok(event) = app.event_rx.recv() {
        match event {
            AppEvent::ExitApplication => break,
            AppEvent::FatalError(message) => return Err(anyhow!(message)),
            event => process_event(app, event)?,
        }

        // Render after every event processed
        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}

fn process_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) if key.kind != KeyEventKind::Release => process_key_event(app, key)?,
        AppEvent::Key(_) => {}

        AppEvent::Device(signal) => app.player.handle_signal(signal),

        AppEvent::SessionChanged(user) => app.user = user,
        AppEvent::SongsImported(songs) => import_songs(app, songs),
        AppEvent::CommandFinished => app.busy = None,

        AppEvent::Notice(message) => app.notify(message),
        AppEvent::Error(message) => app.fail(message),

        AppEvent::Tick => {}

        AppEvent::ExitApplication | AppEvent::FatalError(_) => {}
    }

    Ok(())
}

/// Maps keyboard input to application actions and playback commands.
///
/// The command line gets the first look at every key, then the global
/// playback keys, then the active view.
///
/// # Errors
///
/// Returns an error if a command fails to send to the background worker.
fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    match app.commander.handle_event(&Event::Key(key)) {
        CommanderOutput::Handled => return Ok(()),
        CommanderOutput::Submitted(Ok(command)) => return run_command(app, command),
        CommanderOutput::Submitted(Err(e)) => {
            app.fail(e.to_string());
            return Ok(());
        }
        CommanderOutput::Ignored => {}
    }

    if process_global_key_event(app, key)? {
        return Ok(());
    }

    match app.main_view {
        MainView::Catalog => {
            if let Some(action) = app.catalog_view.process_key(key) {
                apply_song_table_action(app, action);
            }
        }
        MainView::Playlists => {
            if let Some(action) = app.playlist_view.process_key(key, &app.playlists) {
                apply_playlist_action(app, action);
            }
        }
        MainView::Queue => {
            if let Some(action) = app.queue_view.process_key(key, app.player.queue()) {
                apply_queue_action(app, action);
            }
        }
    }

    Ok(())
}

/// Handles keys that work the same in every view. Returns whether the key
/// was consumed.
fn process_global_key_event(app: &mut App, key: KeyEvent) -> Result<bool> {
    let snapshot = app.player.snapshot();

    match key.code {
        KeyCode::Char('q') => app.event_tx.send(AppEvent::ExitApplication)?,
        KeyCode::Esc => app.status = None,

        KeyCode::Char('1') => app.main_view = MainView::Catalog,
        KeyCode::Char('2') => app.main_view = MainView::Playlists,
        KeyCode::Char('3') => app.main_view = MainView::Queue,

        KeyCode::Char('p') => app.player.toggle_play(),
        KeyCode::Char('n') => app.player.advance(Direction::Next),
        KeyCode::Char('b') => app.player.advance(Direction::Previous),
        KeyCode::Char('s') => {
            let shuffled = app.player.toggle_shuffle();
            app.notify(format!("Shuffle {}", if shuffled { "on" } else { "off" }));
        }
        KeyCode::Char('r') => {
            let repeat = app.player.cycle_repeat();
            app.notify(format!("Repeat {:?}", repeat).to_lowercase());
        }

        KeyCode::Char(',') => seek(app, snapshot.elapsed - FINE_SEEK_DELTA),
        KeyCode::Char('.') => seek(app, snapshot.elapsed + FINE_SEEK_DELTA),
        KeyCode::Char('<') => seek(app, snapshot.elapsed - SEEK_DELTA),
        KeyCode::Char('>') => seek(app, snapshot.elapsed + SEEK_DELTA),

        KeyCode::Char('-') => app.player.set_volume(snapshot.volume - VOLUME_STEP),
        KeyCode::Char('=') => app.player.set_volume(snapshot.volume + VOLUME_STEP),

        _ => return Ok(false),
    }

    app.queue_view.sync(app.player.queue());

    Ok(true)
}

/// Seeks within the current song, keeping the position inside it. Songs that
/// are still loading or failed to load are left alone.
fn seek(app: &mut App, seconds: f64) {
    if !matches!(app.player.state(), TransportState::Playing | TransportState::Paused) {
        return;
    }

    let duration = app.player.snapshot().duration;
    let upper = if duration > 0.0 { duration } else { f64::MAX };
    app.player.seek(seconds.clamp(0.0, upper));
}

fn run_command(app: &mut App, command: Command) -> Result<()> {
    match command {
        Command::Quit => app.event_tx.send(AppEvent::ExitApplication)?,
        Command::TogglePlay => app.player.toggle_play(),
        Command::Next => app.player.advance(Direction::Next),
        Command::Previous => app.player.advance(Direction::Previous),
        Command::ToggleShuffle => {
            app.player.toggle_shuffle();
        }
        Command::CycleRepeat => {
            app.player.cycle_repeat();
        }
        Command::Volume(percent) => app.player.set_volume(f64::from(percent) / 100.0),
        Command::Seek(seconds) => seek(app, seconds),
        Command::ClearQueue => {
            app.player.clear();
            app.notify("Queue cleared".to_string());
        }
        Command::ShowView(view) => app.main_view = view,

        Command::Find(text) => match app.main_view {
            MainView::Playlists => app.playlist_view.set_text(text, &app.playlists),
            _ => {
                app.search.text = text;
                app.main_view = MainView::Catalog;
                app.refresh_catalog_view();
            }
        },
        Command::Genre(genre) => match app.main_view {
            MainView::Playlists => app.playlist_view.set_genre(genre, &app.playlists),
            _ => {
                app.search.genre = genre;
                app.main_view = MainView::Catalog;
                app.refresh_catalog_view();
            }
        },

        Command::Register {
            username,
            email,
            password,
        } => app.dispatch(
            AppCommand::Register(Registration {
                username,
                email,
                password,
            }),
            "Creating account",
        )?,
        Command::Login { email, password } => {
            app.dispatch(AppCommand::Login(Credentials { email, password }), "Signing in")?
        }
        Command::Logout => app.dispatch(AppCommand::Logout, "Signing out")?,
        Command::ChangePassword { current, new } => app.dispatch(
            AppCommand::ChangePassword(PasswordChange {
                current_password: current,
                new_password: new,
            }),
            "Changing password",
        )?,
        Command::Bio(bio) => app.dispatch(
            AppCommand::UpdateProfile(ProfileUpdate {
                bio: Some(bio),
                ..Default::default()
            }),
            "Updating profile",
        )?,
        Command::Rename(username) => app.dispatch(
            AppCommand::UpdateProfile(ProfileUpdate {
                username: Some(username),
                ..Default::default()
            }),
            "Updating profile",
        )?,
        Command::Email(email) => app.dispatch(
            AppCommand::UpdateProfile(ProfileUpdate {
                email: Some(email),
                ..Default::default()
            }),
            "Updating profile",
        )?,

        Command::Upload {
            path,
            title,
            artist,
            genre,
        } => app.dispatch(
            AppCommand::Upload(UploadSpec {
                path,
                title,
                artist,
                genre,
            }),
            "Uploading",
        )?,
        Command::Scan => app.dispatch(AppCommand::ScanMediaDirs, "Scanning media directories")?,

        Command::DeleteSong => delete_selected_song(app),
        Command::TagSong(field, value) => tag_selected_song(app, field, value),

        Command::NewPlaylist { name, description } => create_playlist(app, name, description),
        Command::DeletePlaylist => {
            if let Some(id) = app.playlist_view.selected_id() {
                match app.playlists.delete(id) {
                    Ok(playlist) => app.notify(format!("Deleted playlist {}", playlist.name)),
                    Err(e) => app.fail(e.to_string()),
                }
                app.playlist_view.refresh(&app.playlists);
            }
        }
        Command::QueuePlaylist => {
            if let Some(id) = app.playlist_view.selected_id() {
                let songs = playlist_songs(app, id);
                let count = songs.len();
                app.player.enqueue_all(songs);
                app.notify(format!("Added {} songs to the queue", count));
            }
        }
        Command::AddToPlaylist => add_marked_to_playlist(app),
        Command::RenamePlaylist(name) => update_selected_playlist(
            app,
            PlaylistPatch {
                name: Some(name),
                ..Default::default()
            },
        ),
        Command::TogglePlaylistVisibility => {
            let is_public = app
                .playlist_view
                .selected_id()
                .and_then(|id| app.playlists.get(id))
                .map(|p| !p.is_public);
            if let Some(is_public) = is_public {
                update_selected_playlist(
                    app,
                    PlaylistPatch {
                        is_public: Some(is_public),
                        ..Default::default()
                    },
                );
            }
        }
        Command::SortPlaylists(sort) => {
            app.playlist_view.set_sort(sort, &app.playlists);
            app.main_view = MainView::Playlists;
        }
    }

    app.queue_view.sync(app.player.queue());

    Ok(())
}

fn apply_song_table_action(app: &mut App, action: SongTableAction) {
    match action {
        SongTableAction::Play(song) => {
            let song = match app.catalog.record_play(song.id) {
                Ok(_) => app.catalog.get(song.id).cloned().unwrap_or(song),
                Err(_) => song,
            };
            app.player.play_song(song);
            app.refresh_catalog_view();
        }
        SongTableAction::Enqueue(songs) => {
            let count = songs.len();
            app.player.enqueue_all(songs);
            app.notify(format!("Added {} songs to the queue", count));
        }
        SongTableAction::Like(id) => {
            if let Err(e) = app.catalog.like(id) {
                app.fail(e.to_string());
            }
            app.refresh_catalog_view();
        }
    }
    app.queue_view.sync(app.player.queue());
}

fn apply_playlist_action(app: &mut App, action: PlaylistAction) {
    let result = match action {
        PlaylistAction::Play(id) => {
            let songs = playlist_songs(app, id);
            if songs.is_empty() {
                app.fail("None of this playlist's songs are in the catalog".to_string());
                return;
            }
            app.player.clear();
            app.player.enqueue_all(songs);
            if let Err(e) = app.player.play_index(0) {
                app.fail(e.to_string());
            }
            app.queue_view.sync(app.player.queue());
            Ok(())
        }
        PlaylistAction::MoveSong(id, song, direction) => app.playlists.move_song(id, song, direction).map(|_| ()),
        PlaylistAction::RemoveSong(id, song) => app.playlists.remove_song(id, song).map(|_| ()),
    };

    if let Err(e) = result {
        app.fail(e.to_string());
    }
    app.playlist_view.refresh(&app.playlists);
}

fn apply_queue_action(app: &mut App, action: QueueAction) {
    match action {
        QueueAction::Play(index) => {
            if let Err(e) = app.player.play_index(index) {
                app.fail(e.to_string());
            }
        }
        QueueAction::Remove(id) => {
            app.player.dequeue(id);
        }
    }
    app.queue_view.sync(app.player.queue());
}

/// Resolves a playlist's songs against the catalog. Songs deleted from the
/// catalog since being added are left out.
fn playlist_songs(app: &App, id: PlaylistId) -> Vec<Song> {
    app.playlists
        .get(id)
        .map(|playlist| {
            playlist
                .songs()
                .iter()
                .filter_map(|summary| app.catalog.get(summary.id).cloned())
                .collect()
        })
        .unwrap_or_default()
}

fn create_playlist(app: &mut App, name: String, description: String) {
    let songs = app.catalog_view.marked_or_selected();

    let draft = PlaylistDraft {
        name,
        description,
        is_public: true,
        songs: songs.iter().map(Song::summary).collect(),
    };

    match app.playlists.add(draft) {
        Ok(playlist) => {
            let (id, name) = (playlist.id, playlist.name.clone());
            app.catalog_view.clear_marks();
            app.playlist_view.select(id, &app.playlists);
            app.notify(format!("Created playlist {} with {} songs", name, songs.len()));
        }
        Err(e) => app.fail(e.to_string()),
    }
}

fn add_marked_to_playlist(app: &mut App) {
    let Some(id) = app.playlist_view.selected_id() else {
        app.fail("Select a playlist first".to_string());
        return;
    };

    let songs = app.catalog_view.marked_or_selected();
    for song in &songs {
        if let Err(e) = app.playlists.add_song(id, song.summary()) {
            app.fail(e.to_string());
            return;
        }
    }

    app.catalog_view.clear_marks();
    app.playlist_view.refresh(&app.playlists);
    app.notify(format!("Added {} songs to the playlist", songs.len()));
}

fn update_selected_playlist(app: &mut App, patch: PlaylistPatch) {
    if let Some(id) = app.playlist_view.selected_id() {
        if let Err(e) = app.playlists.update(id, patch) {
            app.fail(e.to_string());
        }
        app.playlist_view.refresh(&app.playlists);
    }
}

fn delete_selected_song(app: &mut App) {
    let Some(id) = app.catalog_view.selected().map(|s| s.id) else {
        return;
    };

    match app.catalog.delete(id) {
        Ok(song) => app.notify(format!("Deleted {}", song.title)),
        Err(e) => app.fail(e.to_string()),
    }
    app.refresh_catalog_view();
}

fn tag_selected_song(app: &mut App, field: SongField, value: String) {
    let Some(id) = app.catalog_view.selected().map(|s| s.id) else {
        return;
    };

    let patch = match field {
        SongField::Title => SongPatch {
            title: Some(value),
            ..Default::default()
        },
        SongField::Artist => SongPatch {
            artist: Some(value),
            ..Default::default()
        },
        SongField::Genre => SongPatch {
            genre: Some(value),
            ..Default::default()
        },
    };

    if let Err(e) = app.catalog.update(id, patch) {
        app.fail(e.to_string());
    }
    app.refresh_catalog_view();
}

fn import_songs(app: &mut App, songs: Vec<Song>) {
    let total = songs.len();
    let mut added = 0;

    for song in songs {
        match app.catalog.add(song) {
            Ok(()) => added += 1,
            Err(e) => tracing::debug!("Not importing song: {}", e),
        }
    }

    app.refresh_catalog_view();
    app.notify(format!("Imported {} of {} songs", added, total));
}
