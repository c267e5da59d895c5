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

//! Cursor state for the play queue view.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::ListState;

use crate::{
    components::{clamp_selection, wrap_next, wrap_previous},
    model::{SongId, queue::Queue},
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum QueueAction {
    Play(usize),
    Remove(SongId),
}

#[derive(Debug, Default)]
pub(crate) struct QueueView {
    pub(crate) list_state: ListState,
}

impl QueueView {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn process_key(&mut self, key: KeyEvent, queue: &Queue) -> Option<QueueAction> {
        let len = queue.len();
        self.list_state.select(clamp_selection(self.list_state.selected(), len));

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.list_state.select(wrap_next(self.list_state.selected(), len)),
            KeyCode::Char('k') | KeyCode::Up => self.list_state.select(wrap_previous(self.list_state.selected(), len)),
            KeyCode::Char('c') => self.list_state.select((len > 0).then_some(queue.index())),
            KeyCode::Enter => return self.list_state.selected().map(QueueAction::Play),
            KeyCode::Char('x') | KeyCode::Delete => {
                return self
                    .list_state
                    .selected()
                    .and_then(|i| queue.get(i))
                    .map(|song| QueueAction::Remove(song.id));
            }
            _ => {}
        }

        None
    }

    /// Keeps the cursor in range after the queue changed.
    pub(crate) fn sync(&mut self, queue: &Queue) {
        self.list_state.select(clamp_selection(self.list_state.selected(), queue.len()));
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::model::test_song;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_plays_and_x_removes_the_row_under_the_cursor() {
        let mut queue = Queue::new();
        queue.enqueue_all((1..=3).map(|id| test_song(id, "Song", 60)));
        let mut view = QueueView::new();

        view.process_key(key(KeyCode::Char('j')), &queue);
        assert_eq!(view.process_key(key(KeyCode::Enter), &queue), Some(QueueAction::Play(1)));
        assert_eq!(view.process_key(key(KeyCode::Char('x')), &queue), Some(QueueAction::Remove(SongId(2))));
    }

    #[test]
    fn empty_queue_yields_no_actions() {
        let queue = Queue::new();
        let mut view = QueueView::new();

        assert_eq!(view.process_key(key(KeyCode::Enter), &queue), None);
        assert_eq!(view.process_key(key(KeyCode::Char('x')), &queue), None);
    }
}
