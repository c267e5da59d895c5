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

//! Interactive view components.
//!
//! Each component owns only view state (cursor positions, marks, filters) and
//! turns key presses into an action value. Components never mutate the stores
//! or the player themselves; the event loop applies their actions.
//!
//! # Sub-modules
//!
//! * [`song_table`]: A navigable, markable table of catalog songs.
//! * [`playlist`]: The playlist list and the songs of the selected playlist.
//! * [`queue`]: The play queue.

pub(crate) mod playlist;
pub(crate) mod queue;
pub(crate) mod song_table;

pub(crate) use playlist::{PlaylistAction, PlaylistView};
pub(crate) use queue::{QueueAction, QueueView};
pub(crate) use song_table::{SongTableAction, SongTableState};

/// The row after `selected`, wrapping to the top.
pub(crate) fn wrap_next(selected: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match selected {
        Some(i) if i + 1 < len => i + 1,
        Some(_) => 0,
        None => 0,
    })
}

/// The row before `selected`, wrapping to the bottom.
pub(crate) fn wrap_previous(selected: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match selected {
        Some(0) => len - 1,
        Some(i) => (i - 1).min(len - 1),
        None => 0,
    })
}

/// Keeps a selection inside a list that may have shrunk.
pub(crate) fn clamp_selection(selected: Option<usize>, len: usize) -> Option<usize> {
    match (selected, len) {
        (_, 0) => None,
        (Some(i), len) => Some(i.min(len - 1)),
        (None, _) => Some(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_wraps() {
        assert_eq!(wrap_next(Some(2), 3), Some(0));
        assert_eq!(wrap_next(None, 3), Some(0));
        assert_eq!(wrap_previous(Some(0), 3), Some(2));
        assert_eq!(wrap_previous(Some(5), 3), Some(2));
        assert_eq!(wrap_next(Some(0), 0), None);
    }

    #[test]
    fn selection_is_clamped_to_new_length() {
        assert_eq!(clamp_selection(Some(4), 2), Some(1));
        assert_eq!(clamp_selection(Some(1), 0), None);
        assert_eq!(clamp_selection(None, 3), Some(0));
    }
}
