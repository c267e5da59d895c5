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

//! Playlist management.
//!
//! This module provides the [`PlaylistStore`], an ordered list of user
//! playlists. A playlist's song count and total duration are always computed
//! from its song list; its genre label is recomputed inside every mutation
//! that touches the song list.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{SongId, SongSummary};

const MIXED_GENRE: &str = "Mixed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct PlaylistId(pub(crate) u64);

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum PlaylistError {
    #[error("Playlist name is required")]
    MissingName,

    #[error("A playlist needs at least one song")]
    NoSongs,

    #[error("Playlist {0} not found")]
    PlaylistNotFound(PlaylistId),

    #[error("Song {0} is not in the playlist")]
    SongNotInPlaylist(SongId),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Playlist {
    pub(crate) id: PlaylistId,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) is_public: bool,
    pub(crate) created_at: DateTime<Utc>,
    genre: String,
    songs: Vec<SongSummary>,
}

impl Playlist {
    fn new(id: PlaylistId, draft: PlaylistDraft, created_at: DateTime<Utc>) -> Self {
        let mut playlist = Self {
            id,
            name: draft.name.trim().to_string(),
            description: draft.description,
            is_public: draft.is_public,
            created_at,
            genre: String::new(),
            songs: draft.songs,
        };
        playlist.refresh_genre();
        playlist
    }

    pub(crate) fn songs(&self) -> &[SongSummary] {
        &self.songs
    }

    /// Genre of the first song, or "Mixed" for an empty playlist.
    pub(crate) fn genre(&self) -> &str {
        &self.genre
    }

    pub(crate) fn song_count(&self) -> usize {
        self.songs.len()
    }

    /// Sum of the song durations, in seconds.
    pub(crate) fn total_duration(&self) -> u64 {
        self.songs.iter().map(|song| song.duration).sum()
    }

    fn set_songs(&mut self, songs: Vec<SongSummary>) {
        self.songs = songs;
        self.refresh_genre();
    }

    fn refresh_genre(&mut self) {
        self.genre = self
            .songs
            .first()
            .map(|song| song.genre.clone())
            .unwrap_or_else(|| MIXED_GENRE.to_string());
    }
}

/// Everything needed to create a playlist.
#[derive(Debug, Clone, Default)]
pub(crate) struct PlaylistDraft {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) is_public: bool,
    pub(crate) songs: Vec<SongSummary>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PlaylistPatch {
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) is_public: Option<bool>,
    pub(crate) songs: Option<Vec<SongSummary>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum PlaylistSort {
    #[default]
    Recent,
    Oldest,
    Name,
    Songs,
    Duration,
}

impl PlaylistSort {
    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value {
            "recent" => Some(Self::Recent),
            "oldest" => Some(Self::Oldest),
            "name" => Some(Self::Name),
            "songs" => Some(Self::Songs),
            "duration" => Some(Self::Duration),
            _ => None,
        }
    }
}

/// Listing options for the playlists view.
#[derive(Debug, Clone, Default)]
pub(crate) struct PlaylistFilter {
    pub(crate) text: String,
    pub(crate) genre: Option<String>,
    pub(crate) sort: PlaylistSort,
}

#[derive(Debug, Default)]
pub(crate) struct PlaylistStore {
    playlists: Vec<Playlist>,
    next_id: u64,
}

impl PlaylistStore {
    pub(crate) fn new() -> Self {
        Self {
            playlists: vec![],
            next_id: 1,
        }
    }

    pub(crate) fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub(crate) fn get(&self, id: PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|playlist| playlist.id == id)
    }

    /// Creates a playlist at the front of the store.
    ///
    /// # Errors
    ///
    /// Returns [`PlaylistError::MissingName`] for a blank name and
    /// [`PlaylistError::NoSongs`] for an empty song list.
    pub(crate) fn add(&mut self, draft: PlaylistDraft) -> Result<&Playlist, PlaylistError> {
        self.add_at(draft, Utc::now())
    }

    pub(crate) fn add_at(
        &mut self,
        draft: PlaylistDraft,
        created_at: DateTime<Utc>,
    ) -> Result<&Playlist, PlaylistError> {
        if draft.name.trim().is_empty() {
            return Err(PlaylistError::MissingName);
        }
        if draft.songs.is_empty() {
            return Err(PlaylistError::NoSongs);
        }

        let id = PlaylistId(self.next_id.max(1));
        self.next_id = id.0 + 1;

        self.playlists.insert(0, Playlist::new(id, draft, created_at));

        Ok(&self.playlists[0])
    }

    pub(crate) fn update(
        &mut self,
        id: PlaylistId,
        patch: PlaylistPatch,
    ) -> Result<&Playlist, PlaylistError> {
        if patch.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(PlaylistError::MissingName);
        }

        let playlist = self.get_mut(id)?;

        if let Some(name) = patch.name {
            playlist.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            playlist.description = description;
        }
        if let Some(is_public) = patch.is_public {
            playlist.is_public = is_public;
        }
        if let Some(songs) = patch.songs {
            playlist.set_songs(songs);
        }

        Ok(playlist)
    }

    pub(crate) fn delete(&mut self, id: PlaylistId) -> Result<Playlist, PlaylistError> {
        let index = self
            .playlists
            .iter()
            .position(|playlist| playlist.id == id)
            .ok_or(PlaylistError::PlaylistNotFound(id))?;

        Ok(self.playlists.remove(index))
    }

    /// Appends a song, ignoring songs the playlist already holds.
    pub(crate) fn add_song(&mut self, id: PlaylistId, song: SongSummary) -> Result<&Playlist, PlaylistError> {
        let playlist = self.get_mut(id)?;

        if !playlist.songs.iter().any(|s| s.id == song.id) {
            let mut songs = playlist.songs.clone();
            songs.push(song);
            playlist.set_songs(songs);
        }

        Ok(playlist)
    }

    pub(crate) fn remove_song(&mut self, id: PlaylistId, song_id: SongId) -> Result<&Playlist, PlaylistError> {
        let playlist = self.get_mut(id)?;

        if !playlist.songs.iter().any(|s| s.id == song_id) {
            return Err(PlaylistError::SongNotInPlaylist(song_id));
        }

        let songs = playlist.songs.iter().filter(|s| s.id != song_id).cloned().collect();
        playlist.set_songs(songs);

        Ok(playlist)
    }

    /// Swaps a song with its neighbour. Moving past either end is a no-op.
    pub(crate) fn move_song(
        &mut self,
        id: PlaylistId,
        song_id: SongId,
        direction: MoveDirection,
    ) -> Result<&Playlist, PlaylistError> {
        let playlist = self.get_mut(id)?;

        let index = playlist
            .songs
            .iter()
            .position(|s| s.id == song_id)
            .ok_or(PlaylistError::SongNotInPlaylist(song_id))?;

        let mut songs = playlist.songs.clone();
        match direction {
            MoveDirection::Up if index > 0 => songs.swap(index, index - 1),
            MoveDirection::Down if index + 1 < songs.len() => songs.swap(index, index + 1),
            _ => {}
        }
        playlist.set_songs(songs);

        Ok(playlist)
    }

    pub(crate) fn public_count(&self) -> usize {
        self.playlists.iter().filter(|playlist| playlist.is_public).count()
    }

    pub(crate) fn list(&self, filter: &PlaylistFilter) -> Vec<&Playlist> {
        let needle = filter.text.trim().to_lowercase();

        let mut playlists: Vec<&Playlist> = self
            .playlists
            .iter()
            .filter(|playlist| {
                needle.is_empty()
                    || playlist.name.to_lowercase().contains(&needle)
                    || playlist.description.to_lowercase().contains(&needle)
            })
            .filter(|playlist| filter.genre.as_deref().is_none_or(|genre| playlist.genre == genre))
            .collect();

        match filter.sort {
            PlaylistSort::Recent => playlists.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            PlaylistSort::Oldest => playlists.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            PlaylistSort::Name => playlists.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
            PlaylistSort::Songs => playlists.sort_by(|a, b| b.song_count().cmp(&a.song_count())),
            PlaylistSort::Duration => playlists.sort_by(|a, b| b.total_duration().cmp(&a.total_duration())),
        }

        playlists
    }

    fn get_mut(&mut self, id: PlaylistId) -> Result<&mut Playlist, PlaylistError> {
        self.playlists
            .iter_mut()
            .find(|playlist| playlist.id == id)
            .ok_or(PlaylistError::PlaylistNotFound(id))
    }
}
