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

//! Playlist browsing and editing state.
//!
//! This module keeps the filtered, sorted list of playlist ids shown in the
//! playlists view along with two cursors: one over the playlists and one over
//! the songs of the selected playlist. [`PlaylistView::refresh`] must be
//! called after any change to the playlist store or the filter.

mod event;
mod render;

use ratatui::widgets::TableState;

use crate::{
    components::clamp_selection,
    model::{
        SongId,
        playlists::{MoveDirection, PlaylistFilter, PlaylistId, PlaylistSort, PlaylistStore},
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum PlaylistFocus {
    #[default]
    List,
    Songs,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlaylistAction {
    Play(PlaylistId),
    MoveSong(PlaylistId, SongId, MoveDirection),
    RemoveSong(PlaylistId, SongId),
}

#[derive(Debug, Default)]
pub(crate) struct PlaylistView {
    filter: PlaylistFilter,
    ids: Vec<PlaylistId>,
    list_state: TableState,
    song_state: TableState,
    focus: PlaylistFocus,
}

impl PlaylistView {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_sort(&mut self, sort: PlaylistSort, store: &PlaylistStore) {
        self.filter.sort = sort;
        self.refresh(store);
    }

    pub(crate) fn set_text(&mut self, text: String, store: &PlaylistStore) {
        self.filter.text = text;
        self.refresh(store);
    }

    pub(crate) fn set_genre(&mut self, genre: Option<String>, store: &PlaylistStore) {
        self.filter.genre = genre;
        self.refresh(store);
    }

    pub(crate) fn selected_id(&self) -> Option<PlaylistId> {
        self.list_state.selected().and_then(|i| self.ids.get(i)).copied()
    }

    /// Re-reads the listing from the store, keeping the cursors in range.
    pub(crate) fn refresh(&mut self, store: &PlaylistStore) {
        let previous = self.selected_id();

        self.ids = store.list(&self.filter).iter().map(|p| p.id).collect();

        let selected = previous
            .and_then(|id| self.ids.iter().position(|i| *i == id))
            .or_else(|| clamp_selection(self.list_state.selected(), self.ids.len()));
        self.list_state.select(selected);

        let song_count = self.selected_id().and_then(|id| store.get(id)).map_or(0, |p| p.song_count());
        self.song_state.select(clamp_selection(self.song_state.selected(), song_count));

        if song_count == 0 {
            self.focus = PlaylistFocus::List;
        }
    }

    /// Points the playlist cursor at `id`, typically a newly created playlist.
    pub(crate) fn select(&mut self, id: PlaylistId, store: &PlaylistStore) {
        self.refresh(store);
        if let Some(index) = self.ids.iter().position(|i| *i == id) {
            self.list_state.select(Some(index));
            self.song_state.select(Some(0));
        }
        self.refresh(store);
    }

    fn selected_song(&self, store: &PlaylistStore) -> Option<(PlaylistId, SongId)> {
        let id = self.selected_id()?;
        let index = self.song_state.selected()?;
        let song = store.get(id)?.songs().get(index)?;
        Some((id, song.id))
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::model::{playlists::PlaylistDraft, test_song};

    fn store() -> PlaylistStore {
        let mut store = PlaylistStore::new();
        for (name, songs) in [("Road Trip", 3), ("Focus", 2)] {
            store
                .add(PlaylistDraft {
                    name: name.to_string(),
                    songs: (1..=songs).map(|id| test_song(id, &format!("Song {id}"), 100).summary()).collect(),
                    ..Default::default()
                })
                .unwrap();
        }
        store
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn refresh_follows_filter_and_sort() {
        let store = store();
        let mut view = PlaylistView::new();

        view.refresh(&store);
        assert_eq!(view.ids.len(), 2);
        assert_eq!(store.get(view.selected_id().unwrap()).unwrap().name, "Focus");

        view.set_sort(PlaylistSort::Songs, &store);
        assert_eq!(store.get(view.ids[0]).unwrap().name, "Road Trip");

        view.set_text("road".into(), &store);
        assert_eq!(view.ids.len(), 1);
    }

    #[test]
    fn enter_plays_the_selected_playlist() {
        let store = store();
        let mut view = PlaylistView::new();
        view.refresh(&store);

        view.process_key(key(KeyCode::Char('j')), &store);
        let action = view.process_key(key(KeyCode::Enter), &store);

        let road_trip = store.playlists().iter().find(|p| p.name == "Road Trip").unwrap().id;
        assert_eq!(action, Some(PlaylistAction::Play(road_trip)));
    }

    #[test]
    fn song_pane_moves_and_removes_songs() {
        let store = store();
        let mut view = PlaylistView::new();
        view.refresh(&store);
        let focus = view.selected_id().unwrap();

        view.process_key(key(KeyCode::Tab), &store);
        assert_eq!(view.focus, PlaylistFocus::Songs);

        let moved = view.process_key(key(KeyCode::Char('J')), &store);
        assert_eq!(moved, Some(PlaylistAction::MoveSong(focus, SongId(1), MoveDirection::Down)));
        assert_eq!(view.song_state.selected(), Some(1));

        let removed = view.process_key(key(KeyCode::Char('x')), &store);
        assert_eq!(removed, Some(PlaylistAction::RemoveSong(focus, SongId(2))));
    }

    #[test]
    fn select_points_at_playlist() {
        let store = store();
        let mut view = PlaylistView::new();
        let road_trip = store.playlists().iter().find(|p| p.name == "Road Trip").unwrap().id;

        view.select(road_trip, &store);

        assert_eq!(view.selected_id(), Some(road_trip));
    }
}
