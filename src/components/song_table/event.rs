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

//! Input handling for the song table.
//!
//! This module maps raw keyboard events to table navigation, marking, and
//! the actions the table hands back to the event loop.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::components::{SongTableAction, SongTableState};

impl SongTableState {
    /// Applies a key press, returning an action when one was requested.
    pub(crate) fn process_key(&mut self, key: KeyEvent) -> Option<SongTableAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => self.goto_next(),
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => self.goto_previous(),
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => self.goto_first(),
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => self.goto_last(),

            (KeyCode::Char('A'), _) => self.mark_all(),
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => self.clear_marks(),

            (KeyCode::Char(' '), _) => {
                self.toggle_mark_current();
                self.goto_next();
            }

            (KeyCode::Enter, _) => return self.selected().cloned().map(SongTableAction::Play),

            (KeyCode::Char('a'), _) => {
                let songs = self.marked_or_selected();
                self.clear_marks();
                return Some(songs).filter(|s| !s.is_empty()).map(SongTableAction::Enqueue);
            }

            (KeyCode::Char('+'), _) => return self.selected().map(|s| SongTableAction::Like(s.id)),

            _ => {}
        }

        None
    }
}
