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

//! Render the music player interface.
//!
//! This module renders the visual representation of the current song, the
//! transport state, progress and volume.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::{
    App,
    player::{PlaybackSnapshot, RepeatMode, TransportState},
    render::icons::{
        ICON_ERROR, ICON_LOADING, ICON_MUTED, ICON_PAUSE, ICON_PLAY, ICON_REPEAT, ICON_REPEAT_ONE, ICON_SHUFFLE,
        ICON_STOP, ICON_VOLUME_HIGH, ICON_VOLUME_LOW, ICON_VOLUME_MEDIUM,
    },
    theme::Theme,
    util::format::format_position,
};

/// Renders the main player widget including song info and controls.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let snapshot = app.player.snapshot();
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    let info_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)])
        .split(chunks[0]);

    let bold = Style::default().add_modifier(Modifier::BOLD);

    let song_line = match &snapshot.current {
        Some(song) => Line::from(vec![
            Span::styled(format!(" {} ", state_icon(snapshot.state)), bold).fg(Color::White),
            Span::styled(song.title.as_str(), bold).fg(theme.accent_colour),
            Span::raw(" by "),
            Span::styled(song.artist.as_str(), bold).fg(theme.accent_colour),
            Span::raw(format!("  {}/{}", snapshot.index + 1, snapshot.queue_len)).fg(theme.muted_colour),
        ]),
        None => Line::from(format!(" {} Nothing playing", ICON_STOP)).fg(theme.muted_colour),
    };
    f.render_widget(Paragraph::new(song_line), info_chunks[0]);

    if snapshot.current.is_some() {
        let remaining = (snapshot.duration - snapshot.elapsed).max(0.0);

        let time_line = Line::from(vec![
            Span::styled(format_position(snapshot.elapsed), bold).fg(theme.accent_colour),
            Span::styled(" / ", bold).fg(Color::White),
            Span::styled(format_position(snapshot.duration), bold).fg(theme.accent_colour),
            Span::styled(" (-", bold).fg(Color::White),
            Span::styled(format_position(remaining), bold).fg(theme.accent_colour),
            Span::styled(")", bold).fg(Color::White),
        ]);
        f.render_widget(Paragraph::new(time_line).alignment(Alignment::Right), info_chunks[1]);
    }

    draw_controls(f, chunks[1], &snapshot, theme);

    if let Some(error) = &snapshot.error {
        let error_line = Line::from(format!(" {} {}", ICON_ERROR, error)).fg(theme.error_colour);
        f.render_widget(Paragraph::new(error_line), chunks[2]);
    }

    let progress = if snapshot.duration > 0.0 {
        (snapshot.elapsed / snapshot.duration).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let position_gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.accent_colour).bg(theme.gauge_track_colour))
        .ratio(progress)
        .label("")
        .use_unicode(true);

    f.render_widget(position_gauge, chunks[3]);
}

/// Shuffle and repeat on the left, the volume gauge on the right.
fn draw_controls(f: &mut Frame, area: Rect, snapshot: &PlaybackSnapshot, theme: &Theme) {
    let control_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(26)])
        .split(area);

    let on = Style::default().fg(theme.accent_colour);
    let off = Style::default().fg(theme.muted_colour);

    let (repeat_icon, repeat_style) = match snapshot.repeat {
        RepeatMode::Off => (ICON_REPEAT, off),
        RepeatMode::All => (ICON_REPEAT, on),
        RepeatMode::One => (ICON_REPEAT_ONE, on),
    };

    let modes = Line::from(vec![
        Span::styled(format!(" {} shuffle", ICON_SHUFFLE), if snapshot.shuffled { on } else { off }),
        Span::raw("  "),
        Span::styled(format!("{} repeat", repeat_icon), repeat_style),
    ]);
    f.render_widget(Paragraph::new(modes), control_chunks[0]);

    let volume_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(5)])
        .split(control_chunks[1]);

    f.render_widget(Paragraph::new(volume_icon(snapshot.volume)).fg(Color::White), volume_layout[0]);

    let volume_gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.accent_colour).bg(theme.gauge_track_colour))
        .ratio(snapshot.volume.clamp(0.0, 1.0))
        .label("")
        .use_unicode(true);
    f.render_widget(volume_gauge, volume_layout[1]);

    let volume_label = Paragraph::new(format!(" {}%", (snapshot.volume * 100.0).round() as u16))
        .alignment(Alignment::Right)
        .fg(Color::White);
    f.render_widget(volume_label, volume_layout[2]);
}

fn state_icon(state: TransportState) -> &'static str {
    match state {
        TransportState::Empty => ICON_STOP,
        TransportState::Loading => ICON_LOADING,
        TransportState::Paused => ICON_PAUSE,
        TransportState::Playing => ICON_PLAY,
        TransportState::Errored => ICON_ERROR,
    }
}

fn volume_icon(volume: f64) -> &'static str {
    match volume {
        v if v <= 0.0 => ICON_MUTED,
        v if v < 0.34 => ICON_VOLUME_LOW,
        v if v < 0.67 => ICON_VOLUME_MEDIUM,
        _ => ICON_VOLUME_HIGH,
    }
}
