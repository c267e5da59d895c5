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

//! Song catalog management.
//!
//! This module provides the [`Catalog`] store, the ordered in-memory list of
//! every song known to the application. New songs are prepended so the most
//! recently added song is listed first.

use thiserror::Error;

use crate::model::{Song, SongId, SongPatch, search::SearchQuery};

pub(crate) const DEFAULT_RECENT_COUNT: usize = 3;
pub(crate) const DEFAULT_FEATURED_COUNT: usize = 6;

#[derive(Debug, Error, PartialEq)]
pub(crate) enum CatalogError {
    #[error("Song {0} is already in the catalog")]
    DuplicateSong(SongId),

    #[error("Song {0} not found")]
    SongNotFound(SongId),
}

#[derive(Debug, Default)]
pub(crate) struct Catalog {
    songs: Vec<Song>,
}

impl Catalog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_songs(songs: Vec<Song>) -> Self {
        Self { songs }
    }

    #[cfg(test)]
    pub(crate) fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub(crate) fn len(&self) -> usize {
        self.songs.len()
    }

    pub(crate) fn get(&self, id: SongId) -> Option<&Song> {
        self.songs.iter().find(|song| song.id == id)
    }

    pub(crate) fn contains(&self, id: SongId) -> bool {
        self.get(id).is_some()
    }

    /// Adds a song to the front of the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateSong`] if a song with the same id is
    /// already present.
    pub(crate) fn add(&mut self, song: Song) -> Result<(), CatalogError> {
        if self.contains(song.id) {
            return Err(CatalogError::DuplicateSong(song.id));
        }

        self.songs.insert(0, song);

        Ok(())
    }

    /// Merges `patch` into the song with the given id.
    pub(crate) fn update(&mut self, id: SongId, patch: SongPatch) -> Result<&Song, CatalogError> {
        let song = self
            .songs
            .iter_mut()
            .find(|song| song.id == id)
            .ok_or(CatalogError::SongNotFound(id))?;

        song.apply(patch);

        Ok(song)
    }

    pub(crate) fn delete(&mut self, id: SongId) -> Result<Song, CatalogError> {
        let index = self
            .songs
            .iter()
            .position(|song| song.id == id)
            .ok_or(CatalogError::SongNotFound(id))?;

        Ok(self.songs.remove(index))
    }

    pub(crate) fn record_play(&mut self, id: SongId) -> Result<u64, CatalogError> {
        let plays = self.get(id).ok_or(CatalogError::SongNotFound(id))?.plays + 1;
        self.update(id, SongPatch { plays: Some(plays), ..SongPatch::default() })?;
        Ok(plays)
    }

    pub(crate) fn like(&mut self, id: SongId) -> Result<u64, CatalogError> {
        let likes = self.get(id).ok_or(CatalogError::SongNotFound(id))?.likes + 1;
        self.update(id, SongPatch { likes: Some(likes), ..SongPatch::default() })?;
        Ok(likes)
    }

    /// The `count` most recently uploaded songs, newest first.
    ///
    /// The catalog order itself is left untouched.
    pub(crate) fn recent(&self, count: usize) -> Vec<&Song> {
        let mut songs: Vec<&Song> = self.songs.iter().collect();
        songs.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        songs.truncate(count);
        songs
    }

    /// The `count` most played songs, most played first.
    pub(crate) fn featured(&self, count: usize) -> Vec<&Song> {
        let mut songs: Vec<&Song> = self.songs.iter().collect();
        songs.sort_by(|a, b| b.plays.cmp(&a.plays));
        songs.truncate(count);
        songs
    }

    pub(crate) fn search(&self, query: &SearchQuery) -> Vec<&Song> {
        self.songs.iter().filter(|song| query.matches(song)).collect()
    }

    /// Distinct genres in the catalog, sorted.
    pub(crate) fn genres(&self) -> Vec<&str> {
        let mut genres: Vec<&str> = self.songs.iter().map(|song| song.genre.as_str()).collect();
        genres.sort_unstable();
        genres.dedup();
        genres
    }
}
