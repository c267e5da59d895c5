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

//! Event routing for the playlists view.
//!
//! `Tab` switches between the playlist list and the songs of the selected
//! playlist. In the song pane `J` and `K` move the song under the cursor and
//! `x` removes it.

use crossterm::event::{KeyCode, KeyEvent};

use crate::{
    components::{PlaylistAction, PlaylistView, playlist::PlaylistFocus, wrap_next, wrap_previous},
    model::playlists::{MoveDirection, PlaylistStore},
};

impl PlaylistView {
    pub(crate) fn process_key(&mut self, key: KeyEvent, store: &PlaylistStore) -> Option<PlaylistAction> {
        if key.code == KeyCode::Tab {
            self.focus = match self.focus {
                PlaylistFocus::List => PlaylistFocus::Songs,
                PlaylistFocus::Songs => PlaylistFocus::List,
            };
            self.refresh(store);
            return None;
        }

        match self.focus {
            PlaylistFocus::List => self.process_list_key(key, store),
            PlaylistFocus::Songs => self.process_song_key(key, store),
        }
    }

    fn process_list_key(&mut self, key: KeyEvent, store: &PlaylistStore) -> Option<PlaylistAction> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.list_state.select(wrap_next(self.list_state.selected(), self.ids.len()));
                self.song_state.select(Some(0));
                self.refresh(store);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.list_state.select(wrap_previous(self.list_state.selected(), self.ids.len()));
                self.song_state.select(Some(0));
                self.refresh(store);
            }
            KeyCode::Enter => return self.selected_id().map(PlaylistAction::Play),
            _ => {}
        }

        None
    }

    fn process_song_key(&mut self, key: KeyEvent, store: &PlaylistStore) -> Option<PlaylistAction> {
        let len = self.selected_id().and_then(|id| store.get(id)).map_or(0, |p| p.song_count());

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.song_state.select(wrap_next(self.song_state.selected(), len)),
            KeyCode::Char('k') | KeyCode::Up => self.song_state.select(wrap_previous(self.song_state.selected(), len)),
            KeyCode::Char('J') => {
                let (playlist, song) = self.selected_song(store)?;
                if let Some(i) = self.song_state.selected().filter(|i| i + 1 < len) {
                    self.song_state.select(Some(i + 1));
                }
                return Some(PlaylistAction::MoveSong(playlist, song, MoveDirection::Down));
            }
            KeyCode::Char('K') => {
                let (playlist, song) = self.selected_song(store)?;
                if let Some(i) = self.song_state.selected().filter(|i| *i > 0) {
                    self.song_state.select(Some(i - 1));
                }
                return Some(PlaylistAction::MoveSong(playlist, song, MoveDirection::Up));
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                let (playlist, song) = self.selected_song(store)?;
                return Some(PlaylistAction::RemoveSong(playlist, song));
            }
            KeyCode::Enter => return self.selected_id().map(PlaylistAction::Play),
            _ => {}
        }

        None
    }
}
