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

/// Formats a duration in seconds into a human-readable `MM:SS` string.
///
/// This is used primarily for displaying song positions and durations in the
/// player interface.
///
/// # Arguments
///
/// * `total_seconds` - The duration to format, represented as a 64-bit integer.
pub(crate) fn format_time(total_seconds: u64) -> String {
    let mins = total_seconds / 60;
    let secs = total_seconds % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Formats a playback position reported in fractional seconds. Negative and
/// non-finite values show as zero.
pub(crate) fn format_position(seconds: f64) -> String {
    if seconds.is_finite() && seconds > 0.0 {
        format_time(seconds as u64)
    } else {
        format_time(0)
    }
}

/// Formats a long running time, such as a whole playlist, as `1h 23m` or
/// `23m`.
pub(crate) fn format_running_time(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_format() {
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(3600), "60:00");
        assert_eq!(format_position(245.9), "04:05");
        assert_eq!(format_position(f64::NAN), "00:00");
        assert_eq!(format_position(-3.0), "00:00");
    }

    #[test]
    fn running_time_format() {
        assert_eq!(format_running_time(1422), "23m");
        assert_eq!(format_running_time(5000), "1h 23m");
        assert_eq!(format_running_time(0), "0m");
    }
}
