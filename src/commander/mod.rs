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

//! Command-line input logic and state management.
//!
//! This module implements the `:` command line: a text input component that
//! is activated with `:`, and a parser that turns the submitted line into a
//! [`Command`] for the event loop to carry out.

use crossterm::event::{Event, KeyCode};
use thiserror::Error;
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{MainView, model::playlists::PlaylistSort};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Quit,
    TogglePlay,
    Next,
    Previous,
    ToggleShuffle,
    CycleRepeat,
    /// Volume as a percentage.
    Volume(u8),
    Seek(f64),
    ClearQueue,
    ShowView(MainView),

    /// Filter the current view by text; empty clears the filter.
    Find(String),
    /// Filter the current view by genre; `None` clears the filter.
    Genre(Option<String>),

    Register {
        username: String,
        email: String,
        password: String,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    ChangePassword {
        current: String,
        new: String,
    },
    Bio(String),
    Rename(String),
    Email(String),

    Upload {
        path: String,
        title: Option<String>,
        artist: Option<String>,
        genre: Option<String>,
    },
    Scan,
    DeleteSong,
    TagSong(SongField, String),

    NewPlaylist {
        name: String,
        description: String,
    },
    DeletePlaylist,
    QueuePlaylist,
    AddToPlaylist,
    RenamePlaylist(String),
    TogglePlaylistVisibility,
    SortPlaylists(PlaylistSort),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SongField {
    Title,
    Artist,
    Genre,
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// What happened to a key press offered to the command line.
#[derive(Debug, PartialEq)]
pub(crate) enum CommanderOutput {
    /// Not for the command line, offer it elsewhere.
    Ignored,
    Handled,
    Submitted(Result<Command, CommandError>),
}

pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
}

impl Commander {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    pub(crate) fn handle_event(&mut self, event: &Event) -> CommanderOutput {
        let Event::Key(key_event) = event else {
            return CommanderOutput::Ignored;
        };

        if !self.active {
            if key_event.code == KeyCode::Char(':') {
                self.active = true;
                return CommanderOutput::Handled;
            }
            return CommanderOutput::Ignored;
        }

        match key_event.code {
            KeyCode::Esc => {
                self.active = false;
                self.input.reset();
                CommanderOutput::Handled
            }

            KeyCode::Enter => {
                let line = self.input.value().trim().to_string();
                self.input.reset();
                self.active = false;

                if line.is_empty() {
                    CommanderOutput::Handled
                } else {
                    CommanderOutput::Submitted(parse_command(&line))
                }
            }

            _ => {
                // Delegate all other key events to the managed input component.
                self.input.handle_event(event);
                CommanderOutput::Handled
            }
        }
    }
}

/// Parses one command line. The first word names the command, the rest are
/// its arguments.
pub(crate) fn parse_command(line: &str) -> Result<Command, CommandError> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let command = match parts.as_slice() {
        ["q"] => Command::Quit,
        ["p"] => Command::TogglePlay,
        ["n"] => Command::Next,
        ["b"] => Command::Previous,
        ["s"] => Command::ToggleShuffle,
        ["r"] => Command::CycleRepeat,
        ["cq"] => Command::ClearQueue,

        ["v", volume] => match volume.parse::<u8>() {
            Ok(volume) if volume <= 100 => Command::Volume(volume),
            _ => return Err(CommandError::Usage("v <0-100>")),
        },
        ["v", ..] => return Err(CommandError::Usage("v <0-100>")),

        ["seek", position] => match parse_position(position) {
            Some(seconds) => Command::Seek(seconds),
            None => return Err(CommandError::Usage("seek <seconds|m:ss>")),
        },
        ["seek", ..] => return Err(CommandError::Usage("seek <seconds|m:ss>")),

        ["1"] => Command::ShowView(MainView::Catalog),
        ["2"] => Command::ShowView(MainView::Playlists),
        ["3"] => Command::ShowView(MainView::Queue),

        ["find", text @ ..] => Command::Find(text.join(" ")),
        ["genre"] => Command::Genre(None),
        ["genre", genre @ ..] => Command::Genre(Some(genre.join(" "))),

        ["register", username, email, password] => Command::Register {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        },
        ["register", ..] => return Err(CommandError::Usage("register <username> <email> <password>")),

        ["login", email, password] => Command::Login {
            email: email.to_string(),
            password: password.to_string(),
        },
        ["login", ..] => return Err(CommandError::Usage("login <email> <password>")),

        ["logout"] => Command::Logout,

        ["passwd", current, new] => Command::ChangePassword {
            current: current.to_string(),
            new: new.to_string(),
        },
        ["passwd", ..] => return Err(CommandError::Usage("passwd <current> <new>")),

        ["bio", text @ ..] => Command::Bio(text.join(" ")),
        ["rename", username] => Command::Rename(username.to_string()),
        ["rename", ..] => return Err(CommandError::Usage("rename <username>")),
        ["email", email] => Command::Email(email.to_string()),
        ["email", ..] => return Err(CommandError::Usage("email <address>")),

        ["upload", path, details @ ..] => {
            let details = details.join(" ");
            let mut fields = details.split('|').map(|f| f.trim()).map(|f| (!f.is_empty()).then(|| f.to_string()));

            Command::Upload {
                path: path.to_string(),
                title: fields.next().flatten(),
                artist: fields.next().flatten(),
                genre: fields.next().flatten(),
            }
        }
        ["upload"] => return Err(CommandError::Usage("upload <path> [title|artist|genre]")),

        ["scan"] => Command::Scan,
        ["del"] => Command::DeleteSong,

        ["tag", field, value @ ..] if !value.is_empty() => {
            let field = match *field {
                "title" => SongField::Title,
                "artist" => SongField::Artist,
                "genre" => SongField::Genre,
                _ => return Err(CommandError::Usage("tag <title|artist|genre> <value>")),
            };
            Command::TagSong(field, value.join(" "))
        }
        ["tag", ..] => return Err(CommandError::Usage("tag <title|artist|genre> <value>")),

        ["np", name @ ..] if !name.is_empty() => {
            let text = name.join(" ");
            let (name, description) = text.split_once('|').unwrap_or((text.as_str(), ""));
            Command::NewPlaylist {
                name: name.trim().to_string(),
                description: description.trim().to_string(),
            }
        }
        ["np"] => return Err(CommandError::Usage("np <name>[|description]")),

        ["pd"] => Command::DeletePlaylist,
        ["pq"] => Command::QueuePlaylist,
        ["pa"] => Command::AddToPlaylist,
        ["pv"] => Command::TogglePlaylistVisibility,
        ["pr", name @ ..] if !name.is_empty() => Command::RenamePlaylist(name.join(" ")),
        ["pr"] => return Err(CommandError::Usage("pr <name>")),

        ["sort", order] => match PlaylistSort::parse(order) {
            Some(sort) => Command::SortPlaylists(sort),
            None => return Err(CommandError::Usage("sort <recent|oldest|name|songs|duration>")),
        },
        ["sort", ..] => return Err(CommandError::Usage("sort <recent|oldest|name|songs|duration>")),

        [] => return Err(CommandError::Unknown(String::new())),
        [cmd, ..] => return Err(CommandError::Unknown(cmd.to_string())),
    };

    Ok(command)
}

/// Accepts whole or fractional seconds, or `m:ss`.
fn parse_position(value: &str) -> Option<f64> {
    let seconds = match value.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u64 = minutes.parse().ok()?;
            let seconds: u64 = seconds.parse().ok()?;
            if seconds >= 60 {
                return None;
            }
            (minutes * 60 + seconds) as f64
        }
        None => value.parse::<f64>().ok()?,
    };

    (seconds.is_finite() && seconds >= 0.0).then_some(seconds)
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn press(commander: &mut Commander, code: KeyCode) -> CommanderOutput {
        commander.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn transport_commands() {
        assert_eq!(parse_command("p"), Ok(Command::TogglePlay));
        assert_eq!(parse_command("n"), Ok(Command::Next));
        assert_eq!(parse_command("b"), Ok(Command::Previous));
        assert_eq!(parse_command("v 45"), Ok(Command::Volume(45)));
        assert_eq!(parse_command("seek 1:30"), Ok(Command::Seek(90.0)));
        assert_eq!(parse_command("seek 12.5"), Ok(Command::Seek(12.5)));
        assert_eq!(parse_command("3"), Ok(Command::ShowView(MainView::Queue)));
    }

    #[test]
    fn bad_arguments_report_usage() {
        assert_eq!(parse_command("v 101"), Err(CommandError::Usage("v <0-100>")));
        assert_eq!(parse_command("v"), Err(CommandError::Usage("v <0-100>")));
        assert!(matches!(parse_command("seek -4"), Err(CommandError::Usage(_))));
        assert!(matches!(parse_command("seek 1:75"), Err(CommandError::Usage(_))));
        assert!(matches!(parse_command("login ada@example.com"), Err(CommandError::Usage(_))));
        assert!(matches!(parse_command("sort loudest"), Err(CommandError::Usage(_))));
        assert_eq!(parse_command("dance"), Err(CommandError::Unknown("dance".into())));
    }

    #[test]
    fn account_commands() {
        assert_eq!(
            parse_command("register ada ada@example.com secret1"),
            Ok(Command::Register {
                username: "ada".into(),
                email: "ada@example.com".into(),
                password: "secret1".into(),
            })
        );
        assert_eq!(parse_command("bio Writes   music"), Ok(Command::Bio("Writes music".into())));
        assert_eq!(parse_command("bio"), Ok(Command::Bio(String::new())));
    }

    #[test]
    fn upload_splits_optional_details() {
        assert_eq!(
            parse_command("upload /music/drive.mp3 Night Drive | Neon Coast | Synthwave"),
            Ok(Command::Upload {
                path: "/music/drive.mp3".into(),
                title: Some("Night Drive".into()),
                artist: Some("Neon Coast".into()),
                genre: Some("Synthwave".into()),
            })
        );
        assert_eq!(
            parse_command("upload /music/drive.mp3"),
            Ok(Command::Upload {
                path: "/music/drive.mp3".into(),
                title: None,
                artist: None,
                genre: None,
            })
        );
    }

    #[test]
    fn playlist_commands() {
        assert_eq!(
            parse_command("np Road Trip | songs for the drive"),
            Ok(Command::NewPlaylist {
                name: "Road Trip".into(),
                description: "songs for the drive".into(),
            })
        );
        assert_eq!(parse_command("sort songs"), Ok(Command::SortPlaylists(PlaylistSort::Songs)));
        assert_eq!(parse_command("genre"), Ok(Command::Genre(None)));
        assert_eq!(parse_command("genre Hip Hop"), Ok(Command::Genre(Some("Hip Hop".into()))));
    }

    #[test]
    fn command_line_activates_on_colon_and_submits_on_enter() {
        let mut commander = Commander::new();

        assert_eq!(press(&mut commander, KeyCode::Char('p')), CommanderOutput::Ignored);
        assert_eq!(press(&mut commander, KeyCode::Char(':')), CommanderOutput::Handled);
        assert!(commander.active());

        press(&mut commander, KeyCode::Char('c'));
        press(&mut commander, KeyCode::Char('q'));

        assert_eq!(press(&mut commander, KeyCode::Enter), CommanderOutput::Submitted(Ok(Command::ClearQueue)));
        assert!(!commander.active());
        assert_eq!(commander.input.value(), "");
    }

    #[test]
    fn escape_abandons_the_line() {
        let mut commander = Commander::new();
        press(&mut commander, KeyCode::Char(':'));
        press(&mut commander, KeyCode::Char('q'));

        assert_eq!(press(&mut commander, KeyCode::Esc), CommanderOutput::Handled);
        assert!(!commander.active());
        assert_eq!(commander.input.value(), "");
    }
}
