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

//! Catalog search.
//!
//! Filtering is a case-insensitive substring match against title and artist,
//! optionally narrowed to a single genre.

use crate::model::Song;

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub(crate) struct SearchQuery {
    pub(crate) text: String,
    pub(crate) genre: Option<String>,
}

#[cfg(test)]
impl SearchQuery {
    pub(crate) fn for_text(text: String) -> Self {
        Self { text, genre: None }
    }

    pub(crate) fn for_genre(genre: String) -> Self {
        Self {
            text: String::default(),
            genre: Some(genre),
        }
    }
}

impl SearchQuery {
    pub(crate) fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.genre.is_none()
    }

    pub(crate) fn matches(&self, song: &Song) -> bool {
        let needle = self.text.trim().to_lowercase();

        let text_matches = needle.is_empty()
            || song.title.to_lowercase().contains(&needle)
            || song.artist.to_lowercase().contains(&needle);

        let genre_matches = self
            .genre
            .as_deref()
            .is_none_or(|genre| song.genre.eq_ignore_ascii_case(genre));

        text_matches && genre_matches
    }
}
