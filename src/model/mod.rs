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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the application, songs and
//! their playlist summaries, along with the in-memory stores that own them.
//!
//! # Sub-modules
//!
//! * [`catalog`]: The song catalog store.
//! * [`playlists`]: The playlist store.
//! * [`queue`]: The playback queue owned by the player.
//! * [`search`]: Catalog filtering.
//! * [`seed`]: Songs and playlists available on first start.

pub(crate) mod catalog;
pub(crate) mod playlists;
pub(crate) mod queue;
pub(crate) mod search;
pub(crate) mod seed;

use std::fmt;

use chrono::{DateTime, Utc};

/// Stable identifier of a song in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct SongId(pub(crate) u64);

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Song {
    pub(crate) id: SongId,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) genre: String,
    /// Length in whole seconds.
    pub(crate) duration: u64,
    pub(crate) cover: Option<String>,
    /// Something the playback device can open, a file path or a URL.
    pub(crate) source: Option<String>,
    pub(crate) uploaded_at: DateTime<Utc>,
    pub(crate) plays: u64,
    pub(crate) likes: u64,
}

impl Song {
    /// The denormalized form of this song held by playlists.
    pub(crate) fn summary(&self) -> SongSummary {
        SongSummary {
            id: self.id,
            title: self.title.clone(),
            artist: self.artist.clone(),
            genre: self.genre.clone(),
            duration: self.duration,
        }
    }

    fn apply(&mut self, patch: SongPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(artist) = patch.artist {
            self.artist = artist;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(cover) = patch.cover {
            self.cover = cover;
        }
        if let Some(source) = patch.source {
            self.source = source;
        }
        if let Some(plays) = patch.plays {
            self.plays = plays;
        }
        if let Some(likes) = patch.likes {
            self.likes = likes;
        }
    }
}

/// A copy of the song fields a playlist displays.
///
/// Summaries are not linked back to the catalog, deleting a song leaves
/// existing playlist entries in place.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SongSummary {
    pub(crate) id: SongId,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) genre: String,
    pub(crate) duration: u64,
}

/// Partial update merged into an existing song. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub(crate) struct SongPatch {
    pub(crate) title: Option<String>,
    pub(crate) artist: Option<String>,
    pub(crate) genre: Option<String>,
    pub(crate) duration: Option<u64>,
    pub(crate) cover: Option<Option<String>>,
    pub(crate) source: Option<Option<String>>,
    pub(crate) plays: Option<u64>,
    pub(crate) likes: Option<u64>,
}

#[cfg(test)]
pub(crate) fn test_song(id: u64, title: &str, duration: u64) -> Song {
    Song {
        id: SongId(id),
        title: title.to_string(),
        artist: format!("{title} Artist"),
        genre: "Electronic".to_string(),
        duration,
        cover: None,
        source: Some(format!("/music/{id}.mp3")),
        uploaded_at: DateTime::from_timestamp(1_700_000_000 + id as i64, 0).unwrap_or_default(),
        plays: 0,
        likes: 0,
    }
}
