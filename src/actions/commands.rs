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

//! Asynchronous application command processing.
//!
//! This module implements the command pattern used to keep slow work off the
//! UI thread. It provides a dedicated worker loop that owns the account store
//! and its database connection, translates [`AppCommand`] requests into
//! account operations, directory scans and uploads, and reports the results
//! back to the application via [`AppEvent`]s.

use anyhow::Result;
use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
};

use crate::{
    actions::events::AppEvent,
    config::AppConfig,
    identity::{Credentials, IdentityError, IdentityStore, PasswordChange, ProfileUpdate, Registration},
    importer::{self, UploadFile, UploadRequest},
    storage::{KeyValueStore, memory::MemoryStorage, sqlite::SqliteStorage},
};

#[derive(Debug)]
pub(crate) enum AppCommand {
    RestoreSession,
    Register(Registration),
    Login(Credentials),
    Logout,
    UpdateProfile(ProfileUpdate),
    ChangePassword(PasswordChange),
    ScanMediaDirs,
    Upload(UploadSpec),
}

/// An upload as typed on the command line. Details left out are taken from
/// the file's own tags.
#[derive(Debug, Clone, Default)]
pub(crate) struct UploadSpec {
    pub(crate) path: String,
    pub(crate) title: Option<String>,
    pub(crate) artist: Option<String>,
    pub(crate) genre: Option<String>,
}

/// Spawns a background thread to process application commands.
///
/// The worker opens the account database itself. If the database cannot be
/// opened, accounts are kept in memory for this run only.
///
/// # Arguments
///
/// * `config` - The application configuration.
/// * `command_rx` - The receiving end of the command channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
pub(crate) fn spawn_command_worker(
    config: &AppConfig,
    command_rx: Receiver<AppCommand>,
    event_tx: Sender<AppEvent>,
) {
    let config = config.clone();

    thread::spawn(move || {
        let latency = config.simulated_latency();

        match SqliteStorage::open(&config.database_file) {
            Ok(storage) => run_worker(IdentityStore::new(storage, latency), &config, command_rx, event_tx),
            Err(e) => {
                tracing::warn!("Failed to open {}, accounts will not be saved: {:#}", config.database_file, e);
                let _ = event_tx.send(AppEvent::Error(format!("Accounts will not be saved: {:#}", e)));
                run_worker(IdentityStore::new(MemoryStorage::new(), latency), &config, command_rx, event_tx)
            }
        }
    });
}

fn run_worker<S: KeyValueStore>(
    mut identity: IdentityStore<S>,
    config: &AppConfig,
    command_rx: Receiver<AppCommand>,
    event_tx: Sender<AppEvent>,
) {
    while let Ok(command) = command_rx.recv() {
        tracing::debug!("Processing command {:?}", CommandName(&command));

        if let Err(e) = handle_command(&mut identity, config, command, &event_tx) {
            let _ = event_tx.send(AppEvent::Error(format!("{:#}", e)));
        }
        let _ = event_tx.send(AppEvent::CommandFinished);
    }
}

/// Orchestrates the execution of a single command.
///
/// Account failures are reported to the user as [`AppEvent::Error`]; only a
/// closed event channel or a failed upload is returned as an error.
fn handle_command<S: KeyValueStore>(
    identity: &mut IdentityStore<S>,
    config: &AppConfig,
    command: AppCommand,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    match command {
        AppCommand::RestoreSession => {
            let user = report(identity.restore_session(), event_tx)?.flatten();
            if let Some(user) = &user {
                event_tx.send(AppEvent::Notice(format!("Welcome back, {}", user.username)))?;
            }
            event_tx.send(AppEvent::SessionChanged(user))?;
        }
        AppCommand::Register(registration) => {
            if let Some(user) = report(identity.register(registration), event_tx)? {
                event_tx.send(AppEvent::Notice(format!("Welcome, {}", user.username)))?;
                event_tx.send(AppEvent::SessionChanged(Some(user)))?;
            }
        }
        AppCommand::Login(credentials) => {
            if let Some(user) = report(identity.login(credentials), event_tx)? {
                event_tx.send(AppEvent::Notice(format!("Signed in as {}", user.username)))?;
                event_tx.send(AppEvent::SessionChanged(Some(user)))?;
            }
        }
        AppCommand::Logout => {
            if !require_session(identity, event_tx)? {
                return Ok(());
            }
            if report(identity.logout(), event_tx)?.is_some() {
                event_tx.send(AppEvent::Notice("Signed out".to_string()))?;
                event_tx.send(AppEvent::SessionChanged(identity.current_user().cloned()))?;
            }
        }
        AppCommand::UpdateProfile(update) => {
            if !require_session(identity, event_tx)? {
                return Ok(());
            }
            if report(identity.update_profile(update), event_tx)?.is_some() {
                event_tx.send(AppEvent::Notice("Profile updated".to_string()))?;
                event_tx.send(AppEvent::SessionChanged(identity.current_user().cloned()))?;
            }
        }
        AppCommand::ChangePassword(change) => {
            if !require_session(identity, event_tx)? {
                return Ok(());
            }
            if report(identity.change_password(change), event_tx)?.is_some() {
                event_tx.send(AppEvent::Notice("Password changed".to_string()))?;
            }
        }
        AppCommand::ScanMediaDirs => {
            if config.media_dirs.is_empty() {
                event_tx.send(AppEvent::Notice("No media directories configured".to_string()))?;
                return Ok(());
            }

            let songs = importer::scan_media_dirs(&config.media_dirs);
            tracing::info!("Scan found {} songs", songs.len());
            event_tx.send(AppEvent::SongsImported(songs))?;
        }
        AppCommand::Upload(spec) => {
            let song = importer::upload(upload_request(spec))?;
            event_tx.send(AppEvent::SongsImported(vec![song]))?;
        }
    }

    Ok(())
}

/// Sends an account failure to the UI, returning `None` in its place.
/// Reports [`IdentityError::NotAuthenticated`] unless a session is active.
fn require_session<S: KeyValueStore>(identity: &IdentityStore<S>, event_tx: &Sender<AppEvent>) -> Result<bool> {
    match report(identity.is_authenticated(), event_tx)? {
        Some(true) => Ok(true),
        Some(false) => {
            event_tx.send(AppEvent::Error(IdentityError::NotAuthenticated.to_string()))?;
            Ok(false)
        }
        None => Ok(false),
    }
}

fn report<T>(result: Result<T, IdentityError>, event_tx: &Sender<AppEvent>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::info!("Account operation failed: {}", e);
            event_tx.send(AppEvent::Error(e.to_string()))?;
            Ok(None)
        }
    }
}

/// Builds the upload request, filling any missing details from the file's
/// tags. A file that cannot be read is left out so validation reports it.
fn upload_request(spec: UploadSpec) -> UploadRequest {
    let audio = match UploadFile::open(&spec.path) {
        Ok(audio) => Some(audio),
        Err(e) => {
            tracing::warn!("{:#}", e);
            None
        }
    };

    let tagged = if spec.title.is_none() || spec.artist.is_none() || spec.genre.is_none() {
        audio.as_ref().and_then(|a| importer::import_file(&a.path).ok())
    } else {
        None
    };

    UploadRequest {
        title: spec.title.or_else(|| tagged.as_ref().map(|s| s.title.clone())).unwrap_or_default(),
        artist: spec.artist.or_else(|| tagged.as_ref().map(|s| s.artist.clone())).unwrap_or_default(),
        genre: spec.genre.or_else(|| tagged.as_ref().map(|s| s.genre.clone())).unwrap_or_default(),
        audio,
        cover: None,
    }
}

/// Logs a command without its payload, which may hold credentials.
struct CommandName<'a>(&'a AppCommand);

impl std::fmt::Debug for CommandName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self.0 {
            AppCommand::RestoreSession => "RestoreSession",
            AppCommand::Register(_) => "Register",
            AppCommand::Login(_) => "Login",
            AppCommand::Logout => "Logout",
            AppCommand::UpdateProfile(_) => "UpdateProfile",
            AppCommand::ChangePassword(_) => "ChangePassword",
            AppCommand::ScanMediaDirs => "ScanMediaDirs",
            AppCommand::Upload(_) => "Upload",
        };
        f.write_str(name)
    }
}
