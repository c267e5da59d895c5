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

//! UI rendering logic for the playlists view.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Cell, Padding, Paragraph, Row, Table},
};

use crate::{
    components::{PlaylistView, playlist::PlaylistFocus},
    model::playlists::{PlaylistSort, PlaylistStore},
    render::icons::{ICON_PRIVATE, ICON_PUBLIC},
    theme::Theme,
    util::format::{format_running_time, format_time},
};

impl PlaylistView {
    pub(crate) fn draw(&mut self, f: &mut Frame, area: Rect, store: &PlaylistStore, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(area);

        self.draw_header(f, chunks[0], store, theme);

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);

        self.draw_list(f, panes[0], store, theme);
        self.draw_songs(f, panes[1], store, theme);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect, store: &PlaylistStore, theme: &Theme) {
        let sort = match self.filter.sort {
            PlaylistSort::Recent => "most recent",
            PlaylistSort::Oldest => "oldest",
            PlaylistSort::Name => "name",
            PlaylistSort::Songs => "song count",
            PlaylistSort::Duration => "duration",
        };

        let total: u64 = store.playlists().iter().map(|p| p.total_duration()).sum();

        let mut text = format!(
            "{} playlists | {} public | {} total | sorted by {}",
            store.playlists().len(),
            store.public_count(),
            format_running_time(total),
            sort
        );
        if !self.filter.text.is_empty() {
            text.push_str(&format!(" | matching \"{}\"", self.filter.text));
        }
        if let Some(genre) = &self.filter.genre {
            text.push_str(&format!(" | genre {}", genre));
        }

        let header = Paragraph::new(text).fg(theme.muted_colour).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border_colour))
                .padding(Padding::horizontal(1)),
        );
        f.render_widget(header, area);
    }

    fn draw_list(&mut self, f: &mut Frame, area: Rect, store: &PlaylistStore, theme: &Theme) {
        let rows = self.ids.iter().filter_map(|id| store.get(*id)).map(|playlist| {
            let visibility = if playlist.is_public { ICON_PUBLIC } else { ICON_PRIVATE };

            Row::new(vec![
                Cell::from(visibility),
                Cell::from(Line::from(playlist.name.as_str()).style(Style::default().fg(theme.table_title_fg))),
                Cell::from(Line::from(playlist.genre()).style(Style::default().fg(theme.table_genre_fg))),
                Cell::from(Line::from(playlist.song_count().to_string()).alignment(Alignment::Right)),
                Cell::from(
                    Line::from(format_running_time(playlist.total_duration()))
                        .style(Style::default().fg(theme.table_time_fg))
                        .alignment(Alignment::Right),
                ),
                Cell::from(Line::from(playlist.created_at.format("%Y-%m-%d").to_string()).style(Style::default().fg(theme.muted_colour))),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Percentage(40),
                Constraint::Percentage(20),
                Constraint::Length(5),
                Constraint::Length(7),
                Constraint::Length(10),
            ],
        )
        .header(
            Row::new(vec![
                Cell::from(""),
                Cell::from("Name"),
                Cell::from("Genre"),
                Cell::from(Line::from("Songs").alignment(Alignment::Right)),
                Cell::from(Line::from("Length").alignment(Alignment::Right)),
                Cell::from("Created"),
            ])
            .style(Style::default().bold().fg(theme.accent_colour))
            .bottom_margin(1),
        )
        .row_highlight_style(self.highlight(PlaylistFocus::List, theme))
        .block(Block::default().padding(Padding::horizontal(1)));

        f.render_stateful_widget(table, area, &mut self.list_state);
    }

    fn draw_songs(&mut self, f: &mut Frame, area: Rect, store: &PlaylistStore, theme: &Theme) {
        let playlist = self.selected_id().and_then(|id| store.get(id));

        let title = playlist.map_or_else(String::new, |p| {
            if p.description.is_empty() {
                format!(" {} ", p.name)
            } else {
                format!(" {} - {} ", p.name, p.description)
            }
        });

        let rows = playlist.into_iter().flat_map(|p| p.songs()).enumerate().map(|(i, song)| {
            Row::new(vec![
                Cell::from(Line::from(format!("{:02}", i + 1)).style(Style::default().fg(theme.muted_colour))),
                Cell::from(Line::from(song.title.as_str()).style(Style::default().fg(theme.table_title_fg))),
                Cell::from(Line::from(song.artist.as_str()).style(Style::default().fg(theme.table_artist_fg))),
                Cell::from(
                    Line::from(format_time(song.duration))
                        .style(Style::default().fg(theme.table_time_fg))
                        .alignment(Alignment::Right),
                ),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(3),
                Constraint::Percentage(50),
                Constraint::Percentage(35),
                Constraint::Length(6),
            ],
        )
        .row_highlight_style(self.highlight(PlaylistFocus::Songs, theme))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::LEFT)
                .border_style(Style::default().fg(theme.border_colour))
                .padding(Padding::horizontal(1)),
        );

        f.render_stateful_widget(table, area, &mut self.song_state);
    }

    fn highlight(&self, pane: PlaylistFocus, theme: &Theme) -> Style {
        if self.focus == pane {
            Style::default().bg(theme.highlight_colour).fg(Color::White)
        } else {
            Style::default().fg(theme.accent_colour)
        }
    }
}
