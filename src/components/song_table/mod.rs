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

//! Interactive song table state.
//!
//! This module provides a table component for displaying and marking catalog
//! songs. The rows are a copy of whatever the catalog search currently
//! returns and are replaced wholesale with [`SongTableState::set_songs`]
//! whenever the catalog or the search changes.

mod event;
mod render;

use std::collections::HashSet;

use ratatui::widgets::TableState;

use crate::{
    components::{clamp_selection, wrap_next, wrap_previous},
    model::{Song, SongId},
};

/// Something the user asked to do with songs in the table.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SongTableAction {
    Play(Song),
    Enqueue(Vec<Song>),
    Like(SongId),
}

#[derive(Debug, Default)]
pub(crate) struct SongTableState {
    songs: Vec<Song>,
    marked: HashSet<SongId>,
    table_state: TableState,
}

impl SongTableState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Replaces the rows, dropping marks on songs that are gone and keeping
    /// the cursor in range.
    pub(crate) fn set_songs(&mut self, songs: Vec<Song>) {
        self.marked.retain(|id| songs.iter().any(|s| s.id == *id));
        let selected = clamp_selection(self.table_state.selected(), songs.len());
        self.table_state.select(selected);
        self.songs = songs;
    }

    pub(crate) fn selected(&self) -> Option<&Song> {
        self.table_state.selected().and_then(|i| self.songs.get(i))
    }

    pub(crate) fn is_marked(&self, id: SongId) -> bool {
        self.marked.contains(&id)
    }

    /// The marked songs in table order, or the song under the cursor when
    /// nothing is marked.
    pub(crate) fn marked_or_selected(&self) -> Vec<Song> {
        if self.marked.is_empty() {
            return self.selected().cloned().into_iter().collect();
        }

        self.songs
            .iter()
            .filter(|s| self.marked.contains(&s.id))
            .cloned()
            .collect()
    }

    pub(crate) fn clear_marks(&mut self) {
        self.marked.clear();
    }

    fn goto_next(&mut self) {
        let next = wrap_next(self.table_state.selected(), self.songs.len());
        self.table_state.select(next);
    }

    fn goto_previous(&mut self) {
        let previous = wrap_previous(self.table_state.selected(), self.songs.len());
        self.table_state.select(previous);
    }

    fn goto_first(&mut self) {
        if !self.songs.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    fn goto_last(&mut self) {
        if !self.songs.is_empty() {
            self.table_state.select(Some(self.songs.len() - 1));
        }
    }

    fn toggle_mark_current(&mut self) {
        if let Some(id) = self.selected().map(|s| s.id) {
            if !self.marked.insert(id) {
                self.marked.remove(&id);
            }
        }
    }

    fn mark_all(&mut self) {
        self.marked.extend(self.songs.iter().map(|s| s.id));
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::model::test_song;

    fn table() -> SongTableState {
        let mut table = SongTableState::new();
        table.set_songs((1..=4).map(|id| test_song(id, &format!("Song {id}"), 120)).collect());
        table
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn cursor_starts_on_first_row_and_wraps() {
        let mut table = table();
        assert_eq!(table.selected().map(|s| s.id), Some(SongId(1)));

        table.process_key(key(KeyCode::Char('k')));
        assert_eq!(table.selected().map(|s| s.id), Some(SongId(4)));

        table.process_key(key(KeyCode::Down));
        assert_eq!(table.selected().map(|s| s.id), Some(SongId(1)));
    }

    #[test]
    fn space_marks_and_moves_on() {
        let mut table = table();

        table.process_key(key(KeyCode::Char(' ')));
        table.process_key(key(KeyCode::Char(' ')));

        let marked: Vec<SongId> = table.marked_or_selected().iter().map(|s| s.id).collect();
        assert_eq!(marked, vec![SongId(1), SongId(2)]);
    }

    #[test]
    fn without_marks_the_cursor_song_is_used() {
        let mut table = table();
        table.process_key(key(KeyCode::Char('G')));

        let songs = table.marked_or_selected();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, SongId(4));
    }

    #[test]
    fn enter_plays_and_a_enqueues() {
        let mut table = table();

        let play = table.process_key(key(KeyCode::Enter));
        assert!(matches!(play, Some(SongTableAction::Play(song)) if song.id == SongId(1)));

        table.process_key(key(KeyCode::Char('A')));
        let enqueue = table.process_key(key(KeyCode::Char('a')));
        assert!(matches!(enqueue, Some(SongTableAction::Enqueue(songs)) if songs.len() == 4));
        assert!(table.marked.is_empty());
    }

    #[test]
    fn shrinking_rows_drops_stale_marks_and_clamps_cursor() {
        let mut table = table();
        table.process_key(key(KeyCode::Char('G')));
        table.process_key(key(KeyCode::Char(' ')));

        table.set_songs(vec![test_song(1, "Song 1", 120)]);

        assert!(!table.is_marked(SongId(4)));
        assert_eq!(table.selected().map(|s| s.id), Some(SongId(1)));

        table.set_songs(vec![]);
        assert!(table.selected().is_none());
        assert_eq!(table.process_key(key(KeyCode::Enter)), None);
    }
}
