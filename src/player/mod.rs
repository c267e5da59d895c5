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

//! Audio playback control and state management.
//!
//! This module provides the [`PlaybackCoordinator`], the single owner of what
//! is playing and how. It holds the playback queue, the transport state and
//! the one [`PlaybackDevice`] the application plays through; nothing else
//! talks to the device.
//!
//! # Transport States
//!
//! ```text
//! Empty ──play──▶ Loading ──can-play──▶ Playing ◀──toggle──▶ Paused
//!                    │
//!                    └──error──▶ Errored
//! ```
//!
//! Any song change (play, next, previous, end of song) re-enters `Loading`.
//! Clearing the queue returns to `Empty`.
//!
//! All commands run synchronously on the caller's thread. Device readiness,
//! progress, failure and completion arrive later as [`DeviceSignal`]s and are
//! applied with [`PlaybackCoordinator::handle_signal`].

pub(crate) mod device;
pub(crate) mod mpv;

use thiserror::Error;

use crate::{
    model::{
        Song, SongId,
        queue::{Direction, Queue},
    },
    player::device::{DeviceError, DeviceEvent, DeviceSignal, PlaybackDevice},
};

pub(crate) const DEFAULT_VOLUME: f64 = 0.7;

/// Represents the current playback status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum TransportState {
    #[default]
    Empty,
    Loading,
    Paused,
    Playing,
    Errored,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum RepeatMode {
    #[default]
    Off,
    One,
    All,
}

impl RepeatMode {
    /// The mode after this one in the cycle off, one, all.
    pub(crate) fn next(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::One,
            RepeatMode::One => RepeatMode::All,
            RepeatMode::All => RepeatMode::Off,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum PlaybackError {
    #[error("Queue position {0} is out of range")]
    IndexOutOfBounds(usize),

    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// A read-only copy of the playback session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlaybackSnapshot {
    pub(crate) current: Option<Song>,
    pub(crate) index: usize,
    pub(crate) queue_len: usize,
    pub(crate) state: TransportState,
    pub(crate) elapsed: f64,
    pub(crate) duration: f64,
    pub(crate) volume: f64,
    pub(crate) shuffled: bool,
    pub(crate) repeat: RepeatMode,
    pub(crate) error: Option<String>,
}

pub(crate) struct PlaybackCoordinator<D: PlaybackDevice> {
    device: D,
    queue: Queue,
    current: Option<Song>,
    state: TransportState,
    /// Start playing as soon as the device can.
    play_when_ready: bool,
    elapsed: f64,
    duration: f64,
    volume: f64,
    shuffled: bool,
    repeat: RepeatMode,
    error: Option<String>,
    /// Incremented for every load and every clear; signals tagged with any
    /// other value are stale.
    generation: u64,
}

impl<D: PlaybackDevice> PlaybackCoordinator<D> {
    pub(crate) fn new(device: D, volume: f64) -> Self {
        let mut coordinator = Self {
            device,
            queue: Queue::new(),
            current: None,
            state: TransportState::Empty,
            play_when_ready: false,
            elapsed: 0.0,
            duration: 0.0,
            volume: DEFAULT_VOLUME,
            shuffled: false,
            repeat: RepeatMode::Off,
            error: None,
            generation: 0,
        };
        coordinator.set_volume(volume);
        coordinator
    }

    pub(crate) fn queue(&self) -> &Queue {
        &self.queue
    }

    pub(crate) fn current(&self) -> Option<&Song> {
        self.current.as_ref()
    }

    pub(crate) fn state(&self) -> TransportState {
        self.state
    }

    pub(crate) fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current: self.current.clone(),
            index: self.queue.index(),
            queue_len: self.queue.len(),
            state: self.state,
            elapsed: self.elapsed,
            duration: self.duration,
            volume: self.volume,
            shuffled: self.shuffled,
            repeat: self.repeat,
            error: self.error.clone(),
        }
    }

    /// Plays `song`, finding it in the queue by id or appending it.
    pub(crate) fn play_song(&mut self, song: Song) {
        let index = self.queue.resolve(song);
        self.start(index);
    }

    /// Plays the song at a queue position.
    pub(crate) fn play_index(&mut self, index: usize) -> Result<(), PlaybackError> {
        if index >= self.queue.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }

        self.start(index);

        Ok(())
    }

    /// Toggles between playing and paused.
    ///
    /// With nothing loaded this starts the first song in the queue. While a
    /// song is still loading it flips whether playback starts once ready.
    /// After a load failure it retries the current song.
    pub(crate) fn toggle_play(&mut self) {
        let Some(song) = self.current.clone() else {
            if !self.queue.is_empty() {
                self.start(0);
            }
            return;
        };

        match self.state {
            TransportState::Playing => {
                if let Err(e) = self.device.pause() {
                    self.error = Some(format!("Failed to pause audio: {e}"));
                }
                self.state = TransportState::Paused;
            }
            TransportState::Paused => self.resume(),
            TransportState::Loading => {
                self.play_when_ready = !self.play_when_ready;
                if !self.play_when_ready {
                    if let Err(e) = self.device.pause() {
                        self.error = Some(format!("Failed to pause audio: {e}"));
                    }
                }
            }
            TransportState::Errored | TransportState::Empty => self.play_song(song),
        }
    }

    /// Moves to the next or previous song. Does nothing on an empty queue.
    pub(crate) fn advance(&mut self, direction: Direction) {
        if let Some(index) = self.queue.step(direction, self.shuffled) {
            self.start(index);
        }
    }

    /// Moves the play position. Callers keep `seconds` within the song.
    pub(crate) fn seek(&mut self, seconds: f64) {
        if self.current.is_none() {
            return;
        }

        if let Err(e) = self.device.seek(seconds) {
            self.error = Some(format!("Failed to seek: {e}"));
        }
        self.elapsed = seconds;
    }

    /// Sets the output level, clamped to `0.0..=1.0`.
    pub(crate) fn set_volume(&mut self, level: f64) {
        let level = if level.is_finite() { level.clamp(0.0, 1.0) } else { self.volume };

        self.volume = level;
        if let Err(e) = self.device.set_volume(level) {
            self.error = Some(format!("Failed to set volume: {e}"));
        }
    }

    pub(crate) fn toggle_shuffle(&mut self) -> bool {
        self.shuffled = !self.shuffled;
        self.shuffled
    }

    pub(crate) fn cycle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.next();
        self.repeat
    }

    pub(crate) fn enqueue_all(&mut self, songs: impl IntoIterator<Item = Song>) {
        self.queue.enqueue_all(songs);
    }

    /// Removes a song from the queue. A song that is playing keeps playing.
    pub(crate) fn dequeue(&mut self, id: SongId) -> bool {
        self.queue.dequeue(id)
    }

    /// Empties the queue and unloads the current song.
    pub(crate) fn clear(&mut self) {
        self.queue.clear();
        self.current = None;
        self.state = TransportState::Empty;
        self.play_when_ready = false;
        self.elapsed = 0.0;
        self.duration = 0.0;
        self.error = None;
        self.generation += 1;

        if let Err(e) = self.device.pause() {
            tracing::warn!("Failed to pause device while clearing queue: {e}");
        }
    }

    /// Applies a device signal to the session, dropping stale ones.
    pub(crate) fn handle_signal(&mut self, signal: DeviceSignal) {
        if signal.generation != self.generation || self.current.is_none() {
            tracing::debug!(
                generation = signal.generation,
                current = self.generation,
                "Discarding stale device signal {:?}",
                signal.event
            );
            return;
        }

        match signal.event {
            DeviceEvent::LoadStart => {
                if self.state != TransportState::Errored {
                    self.state = TransportState::Loading;
                }
            }
            DeviceEvent::CanPlay => {
                if self.state == TransportState::Loading {
                    if self.play_when_ready {
                        self.resume();
                    } else {
                        self.state = TransportState::Paused;
                    }
                }
            }
            DeviceEvent::MetadataReady(duration) => {
                if duration.is_finite() && duration >= 0.0 {
                    self.duration = duration;
                }
            }
            DeviceEvent::TimeUpdate(seconds) => self.elapsed = seconds,
            DeviceEvent::Error(message) => self.fail(format!("Failed to load audio: {message}")),
            // Repeat modes do not change what happens at the end of a song.
            DeviceEvent::Ended if self.queue.is_empty() => {
                self.play_when_ready = false;
                self.state = TransportState::Paused;
            }
            DeviceEvent::Ended => self.advance(Direction::Next),
        }
    }

    fn start(&mut self, index: usize) {
        let Some(song) = self.queue.get(index).cloned() else {
            return;
        };

        self.queue.set_index(index);
        self.generation += 1;
        self.elapsed = 0.0;
        self.duration = 0.0;
        self.error = None;
        self.play_when_ready = true;

        tracing::info!(song = %song.id, title = %song.title, generation = self.generation, "Loading song");

        let source = song.source.clone();
        self.current = Some(song);

        match source {
            Some(source) => match self.device.load(&source, self.generation) {
                Ok(()) => self.state = TransportState::Loading,
                Err(e) => self.fail(format!("Failed to load audio: {e}")),
            },
            None => self.fail("Failed to load audio: song has no audio source".to_string()),
        }
    }

    fn resume(&mut self) {
        match self.device.play() {
            Ok(()) => self.state = TransportState::Playing,
            Err(e) => {
                tracing::warn!("Device refused to play: {e}");
                self.error = Some(format!("Failed to play audio: {e}"));
                self.play_when_ready = false;
                self.state = TransportState::Paused;
            }
        }
    }

    fn fail(&mut self, message: String) {
        tracing::warn!("{message}");
        self.error = Some(message);
        self.play_when_ready = false;
        self.state = TransportState::Errored;
    }
}

#[cfg(test)]
mod tests;
