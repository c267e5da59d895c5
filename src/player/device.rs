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

//! The audio output contract used by the playback coordinator.
//!
//! A device accepts transport commands synchronously and reports what it is
//! doing through [`DeviceSignal`]s delivered later on the application event
//! channel. Every signal carries the generation of the load that produced it
//! so signals from an abandoned load can be recognised and dropped.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub(crate) enum DeviceError {
    #[error("Playback device is not running")]
    Disconnected,

    #[error("{0}")]
    Rejected(String),
}

pub(crate) trait PlaybackDevice {
    /// Binds the device to `source` and begins loading it. Signals caused by
    /// this load are tagged with `generation`.
    fn load(&mut self, source: &str, generation: u64) -> Result<(), DeviceError>;

    fn play(&mut self) -> Result<(), DeviceError>;

    fn pause(&mut self) -> Result<(), DeviceError>;

    /// Moves the play position to `seconds` from the start.
    fn seek(&mut self, seconds: f64) -> Result<(), DeviceError>;

    /// Sets the output level, `0.0` to `1.0`.
    fn set_volume(&mut self, level: f64) -> Result<(), DeviceError>;
}

/// Something the device reports without being asked.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DeviceEvent {
    LoadStart,
    CanPlay,
    MetadataReady(f64),
    TimeUpdate(f64),
    Error(String),
    Ended,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DeviceSignal {
    pub(crate) generation: u64,
    pub(crate) event: DeviceEvent,
}

impl DeviceSignal {
    pub(crate) fn new(generation: u64, event: DeviceEvent) -> Self {
        Self { generation, event }
    }
}
