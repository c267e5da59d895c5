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

//! Render the command-line and the status line above it.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    widgets::Paragraph,
};

use crate::{App, StatusMessage};

const HINT: &str = ":  command   p play/pause   n/b next/prev   s shuffle   r repeat   1/2/3 views   q quit";

pub(crate) fn draw_commander(f: &mut Frame, area: Rect, app: &App) {
    let commander = &app.commander;

    let container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1)])
        .horizontal_margin(1)
        .split(area);

    let line = if commander.active() {
        Paragraph::new(format!(":{}", commander.input.value())).fg(app.theme.commander_colour)
    } else {
        Paragraph::new(HINT).fg(app.theme.muted_colour)
    };
    f.render_widget(line.bg(app.theme.gauge_track_colour), container[0]);

    if commander.active() {
        let cursor_x = container[0].x + 1 + commander.input.cursor() as u16;
        let cursor_y = container[0].y;
        f.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Shows the in-flight command, otherwise the latest notice or error.
pub(crate) fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let status = match (&app.busy, &app.status) {
        (Some(label), _) => Paragraph::new(format!(" {}...", label)).fg(app.theme.accent_colour),
        (None, Some(StatusMessage::Info(message))) => Paragraph::new(format!(" {}", message)).fg(app.theme.muted_colour),
        (None, Some(StatusMessage::Error(message))) => {
            Paragraph::new(format!(" {}", message)).style(Style::default().fg(app.theme.error_colour).bold())
        }
        (None, None) => Paragraph::new(""),
    };

    f.render_widget(status, area);
}
