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

//! Render the catalog view: the song table beside featured and recently
//! added songs.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::{
    App,
    model::{
        Song,
        catalog::{DEFAULT_FEATURED_COUNT, DEFAULT_RECENT_COUNT},
    },
    theme::Theme,
};

pub(crate) fn draw_catalog(f: &mut Frame, area: Rect, app: &mut App) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(36)])
        .split(area);

    let mut title = format!(" {} of {} songs ", app.catalog_view.songs().len(), app.catalog.len());
    if !app.search.is_empty() {
        if !app.search.text.trim().is_empty() {
            title.push_str(&format!("matching \"{}\" ", app.search.text));
        }
        if let Some(genre) = &app.search.genre {
            title.push_str(&format!("in {} ", genre));
        }
    }

    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(app.theme.muted_colour))
        .padding(Padding::horizontal(1));

    let playing = app.player.current().map(|song| song.id);
    app.catalog_view.draw(f, panes[0], block, playing, &app.theme);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(DEFAULT_FEATURED_COUNT as u16 + 2),
            Constraint::Length(DEFAULT_RECENT_COUNT as u16 + 2),
            Constraint::Min(0),
        ])
        .split(panes[1]);

    let featured = app.catalog.featured(DEFAULT_FEATURED_COUNT);
    draw_song_panel(f, side[0], " Featured ", &featured, &app.theme);

    let recent = app.catalog.recent(DEFAULT_RECENT_COUNT);
    draw_song_panel(f, side[1], " Recently added ", &recent, &app.theme);

    let genres = app.catalog.genres().join(", ");
    let genres = Paragraph::new(genres)
        .fg(app.theme.table_genre_fg)
        .wrap(Wrap { trim: true })
        .block(panel_block(" Genres ", &app.theme));
    f.render_widget(genres, side[2]);
}

fn draw_song_panel(f: &mut Frame, area: Rect, title: &str, songs: &[&Song], theme: &Theme) {
    let lines: Vec<Line> = songs
        .iter()
        .map(|song| {
            Line::from(vec![
                Span::styled(song.title.as_str(), Style::default().fg(theme.table_title_fg)),
                Span::raw(" "),
                Span::styled(song.artist.as_str(), Style::default().fg(theme.table_artist_fg)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(panel_block(title, theme)), area);
}

fn panel_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(title)
        .title_style(Style::default().fg(theme.accent_colour).bold())
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(theme.border_colour))
        .padding(Padding::horizontal(1))
}
