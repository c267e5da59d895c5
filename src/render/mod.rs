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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. It is responsible for layout
//! management, widget styling, and terminal frame composition.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called on every
//! terminal tick or state change to provide a reactive user interface.

mod catalog;
mod commander;
pub(crate) mod icons;
mod player;
mod queue;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::{
    App, MainView,
    render::{
        catalog::draw_catalog,
        commander::{draw_commander, draw_status},
        player::draw_player,
        queue::draw_queue,
    },
};

const VIEWS: [(MainView, &str); 3] = [
    (MainView::Catalog, "1 Catalog"),
    (MainView::Playlists, "2 Playlists"),
    (MainView::Queue, "3 Queue"),
];

/// Renders the user interface to the terminal frame.
///
/// This function calculates the layout constraints and populates the frame
/// with widgets based on the current state of the [`App`].
///
/// It handles:
///
/// * **Layout**: Partitioning the screen into the header, the active view,
///   the player and the status and command lines.
/// * **State Mapping**: Converting application data (like the catalog search
///   results) into interactive widgets.
/// * **Styling**: Applying colors and borders defined in the application theme.
///
/// # Arguments
///
/// * `f` - The current terminal frame used for drawing.
/// * `app` - A mutable reference to the application state, allowing the UI
///   to reflect changes and update internal view state (like list scroll
///   positions).
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Outer layout: header, main, player, status, commander
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(6),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(f, outer[0], app);

    match app.main_view {
        MainView::Catalog => draw_catalog(f, outer[1], app),
        MainView::Playlists => app.playlist_view.draw(f, outer[1], &app.playlists, &app.theme),
        MainView::Queue => draw_queue(f, outer[1], app),
    };

    draw_player(f, outer[2], app);

    draw_status(f, outer[3], app);

    draw_commander(f, outer[4], app);
}

/// View tabs on the left, the signed-in user on the right.
fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(40)])
        .split(inner);

    let mut tabs = vec![Span::raw("riffbox ").bold().fg(app.theme.accent_colour)];
    for (view, label) in VIEWS {
        let style = if view == app.main_view {
            Style::default().bg(app.theme.highlight_colour).fg(Color::White)
        } else {
            Style::default().fg(app.theme.muted_colour)
        };
        tabs.push(Span::raw(" "));
        tabs.push(Span::styled(format!(" {} ", label), style));
    }
    f.render_widget(Paragraph::new(Line::from(tabs)), chunks[0]);

    let user = match &app.user {
        Some(user) => Line::from(vec![
            Span::raw("signed in as ").fg(app.theme.muted_colour),
            Span::raw(user.username.as_str()).bold().fg(app.theme.table_artist_fg),
        ]),
        None => Line::from("not signed in").fg(app.theme.muted_colour),
    };
    f.render_widget(Paragraph::new(user).right_aligned(), chunks[1]);
}
