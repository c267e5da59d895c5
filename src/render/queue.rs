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

//! Render the play queue.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, Padding},
};

use crate::{App, util::format::format_time};

/// Renders the queue, marking the song at the queue position.
pub(crate) fn draw_queue(f: &mut Frame, area: Rect, app: &mut App) {
    let queue = app.player.queue();
    let theme = &app.theme;
    let current = app.player.current().map(|song| song.id);

    let items: Vec<ListItem> = queue
        .songs()
        .iter()
        .enumerate()
        .map(|(i, song)| {
            let is_current = current == Some(song.id) && i == queue.index();
            let title_style = if is_current {
                Style::default().fg(theme.accent_colour).bold()
            } else {
                Style::default().fg(theme.table_title_fg)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>3} ", i + 1), Style::default().fg(theme.muted_colour)),
                Span::styled(if is_current { "\u{25B6} " } else { "  " }, title_style),
                Span::styled(song.title.as_str(), title_style),
                Span::raw("  "),
                Span::styled(song.artist.as_str(), Style::default().fg(theme.table_artist_fg)),
                Span::raw("  "),
                Span::styled(format_time(song.duration), Style::default().fg(theme.table_time_fg)),
            ]))
        })
        .collect();

    let title = format!(" Queue ({} songs) ", queue.len());

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .title_style(Style::default().fg(theme.muted_colour))
                .padding(Padding::horizontal(1)),
        )
        .highlight_style(Style::default().bg(theme.highlight_colour).fg(Color::White));

    f.render_stateful_widget(list, area, &mut app.queue_view.list_state);
}
