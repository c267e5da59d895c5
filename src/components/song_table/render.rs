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

//! UI rendering logic for the song table.
//!
//! This module handles the visual representation of songs, including column
//! layout, mark indicators, and theme application.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Cell, Row, Table},
};

use crate::{components::SongTableState, model::SongId, theme::Theme, util::format::format_time};

impl SongTableState {
    /// Draws the table, highlighting the song that is currently loaded.
    pub(crate) fn draw(&mut self, f: &mut Frame, area: Rect, block: Block, playing: Option<SongId>, theme: &Theme) {
        let rows = self.songs.iter().map(|song| {
            let mark = if self.is_marked(song.id) {
                Line::from("+").style(Style::default().fg(Color::Black).bg(theme.accent_colour))
            } else {
                Line::from("")
            };

            let title_style = if Some(song.id) == playing {
                Style::default().fg(theme.accent_colour).bold()
            } else {
                Style::default().fg(theme.table_title_fg)
            };

            Row::new(vec![
                Cell::from(mark),
                Cell::from(Line::from(format_time(song.duration)).style(Style::default().fg(theme.table_time_fg)).alignment(Alignment::Right)),
                Cell::from(""),
                Cell::from(Line::from(song.title.as_str()).style(title_style)),
                Cell::from(Line::from(song.artist.as_str()).style(Style::default().fg(theme.table_artist_fg))),
                Cell::from(Line::from(song.genre.as_str()).style(Style::default().fg(theme.table_genre_fg))),
                Cell::from(Line::from(song.plays.to_string()).style(Style::default().fg(theme.table_time_fg)).alignment(Alignment::Right)),
                Cell::from(Line::from(song.likes.to_string()).style(Style::default().fg(theme.table_time_fg)).alignment(Alignment::Right)),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(1),
                Constraint::Length(6),
                Constraint::Length(1),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(20),
                Constraint::Length(8),
                Constraint::Length(6),
            ],
        )
        .header(
            Row::new(vec![
                Cell::from(""),
                Cell::from(Line::from("Time").alignment(Alignment::Right)),
                Cell::from(""),
                Cell::from("Title"),
                Cell::from("Artist"),
                Cell::from("Genre"),
                Cell::from(Line::from("Plays").alignment(Alignment::Right)),
                Cell::from(Line::from("Likes").alignment(Alignment::Right)),
            ])
            .style(Style::default().bold().fg(theme.accent_colour))
            .bottom_margin(1),
        )
        .row_highlight_style(Style::default().bg(theme.highlight_colour).fg(Color::White))
        .block(block);

        f.render_stateful_widget(table, area, &mut self.table_state);
    }
}
