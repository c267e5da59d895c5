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

//! Playback queue management.
//!
//! This module provides state for the player queue, an ordered list of songs
//! eligible for next/previous navigation along with a cursor into it. The
//! queue is separate from the catalog and is only ever mutated by the player.

use crate::model::{Song, SongId};

/// Which way to move through the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Next,
    Previous,
}

#[derive(Debug, Default)]
pub(crate) struct Queue {
    songs: Vec<Song>,
    index: usize,
}

impl Queue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub(crate) fn len(&self) -> usize {
        self.songs.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    pub(crate) fn position_of(&self, id: SongId) -> Option<usize> {
        self.songs.iter().position(|song| song.id == id)
    }

    pub(crate) fn enqueue_all(&mut self, songs: impl IntoIterator<Item = Song>) {
        self.songs.extend(songs);
    }

    /// Removes every entry for the song and returns whether anything was
    /// removed.
    ///
    /// Entries removed before the cursor shift it back. Removing the entry
    /// under the cursor moves the cursor to its predecessor (wrapping), so
    /// that advancing forward reaches the entry that followed it.
    pub(crate) fn dequeue(&mut self, id: SongId) -> bool {
        let before = self.songs.len();

        let cursor = self.index;
        let mut position = 0;
        let mut index = cursor;
        let mut removed_cursor = false;

        self.songs.retain(|song| {
            let keep = song.id != id;
            if !keep {
                if position < cursor {
                    index -= 1;
                } else if position == cursor {
                    removed_cursor = true;
                }
            }
            position += 1;
            keep
        });

        let len = self.songs.len();
        self.index = match (len, removed_cursor) {
            (0, _) => 0,
            (_, true) => (index + len - 1) % len,
            _ => index.min(len - 1),
        };

        len != before
    }

    pub(crate) fn clear(&mut self) {
        self.songs.clear();
        self.index = 0;
    }

    /// Finds the song in the queue by id, appending it when absent, and
    /// returns its index.
    pub(crate) fn resolve(&mut self, song: Song) -> usize {
        match self.position_of(song.id) {
            Some(index) => index,
            None => {
                self.songs.push(song);
                self.songs.len() - 1
            }
        }
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// The index an advance in `direction` would land on, or `None` for an
    /// empty queue.
    ///
    /// When shuffled every index is drawn uniformly from the whole queue,
    /// which can repeat the current song and does not cycle through every
    /// song before repeating. Otherwise the cursor moves by one and wraps at
    /// both ends.
    pub(crate) fn step(&self, direction: Direction, shuffled: bool) -> Option<usize> {
        let len = self.songs.len();
        if len == 0 {
            return None;
        }

        let index = if shuffled {
            rand::random_range(0..len)
        } else {
            match direction {
                Direction::Next => (self.index + 1) % len,
                Direction::Previous => (self.index + len - 1) % len,
            }
        };

        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_song;

    fn queue(len: u64) -> Queue {
        let mut queue = Queue::new();
        queue.enqueue_all((1..=len).map(|id| test_song(id, &format!("Song {id}"), 100)));
        queue
    }

    #[test]
    fn step_wraps_in_both_directions() {
        let mut queue = queue(3);

        queue.set_index(2);
        assert_eq!(queue.step(Direction::Next, false), Some(0));

        queue.set_index(0);
        assert_eq!(queue.step(Direction::Previous, false), Some(2));
    }

    #[test]
    fn step_on_empty_queue_is_none() {
        let queue = Queue::new();
        assert_eq!(queue.step(Direction::Next, false), None);
        assert_eq!(queue.step(Direction::Previous, true), None);
    }

    #[test]
    fn resolve_finds_existing_or_appends() {
        let mut queue = queue(3);

        assert_eq!(queue.resolve(test_song(2, "Song 2", 100)), 1);
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.resolve(test_song(9, "Song 9", 100)), 3);
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn dequeue_before_cursor_shifts_it_back() {
        let mut queue = queue(4);
        queue.set_index(2);

        assert!(queue.dequeue(SongId(1)));
        assert_eq!(queue.index(), 1);
        assert_eq!(queue.get(queue.index()).map(|s| s.id), Some(SongId(3)));
    }

    #[test]
    fn dequeue_at_cursor_keeps_the_follower_next() {
        let mut queue = queue(4);
        queue.set_index(1);

        assert!(queue.dequeue(SongId(2)));
        assert_eq!(queue.index(), 0);
        assert_eq!(queue.step(Direction::Next, false).and_then(|i| queue.get(i)).map(|s| s.id), Some(SongId(3)));

        queue.set_index(0);
        assert!(queue.dequeue(SongId(1)));
        assert_eq!(queue.step(Direction::Next, false).and_then(|i| queue.get(i)).map(|s| s.id), Some(SongId(3)));
    }

    #[test]
    fn dequeue_unknown_song_changes_nothing() {
        let mut queue = queue(2);
        queue.set_index(1);

        assert!(!queue.dequeue(SongId(42)));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.index(), 1);
    }

    #[test]
    fn dequeue_last_song_resets_cursor() {
        let mut queue = queue(1);

        assert!(queue.dequeue(SongId(1)));
        assert!(queue.is_empty());
        assert_eq!(queue.index(), 0);
    }
}
