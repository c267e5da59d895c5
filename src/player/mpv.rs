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

//! MPV-backed playback device.
//!
//! This module provides [`MpvDevice`], the [`PlaybackDevice`] used by the
//! application. `libmpv` lives on a dedicated worker thread; the device itself
//! is only the sending half of a command channel, so every transport call
//! returns immediately.
//!
//! # Architecture
//!
//! The worker operates using a dual-channel communication pattern:
//! 1. **Command Channel**: Receives [`DeviceCommand`]s from the coordinator.
//! 2. **Event Channel**: Reports [`DeviceSignal`]s back to the UI loop as
//!    [`AppEvent::Device`], tagged with the generation of the load whose
//!    file MPV is playing.

use anyhow::{Context, Result};
use mpv::Format;
use std::{
    sync::mpsc::{self, Receiver, Sender, TryRecvError},
    thread,
};

use crate::{
    actions::events::AppEvent,
    player::device::{DeviceError, DeviceEvent, DeviceSignal, PlaybackDevice},
};

#[derive(Debug)]
enum DeviceCommand {
    Load { source: String, generation: u64 },
    Play,
    Pause,
    Seek(f64),
    SetVolume(f64),
}

pub(crate) struct MpvDevice {
    command_tx: Sender<DeviceCommand>,
}

impl MpvDevice {
    /// Starts the MPV worker thread and returns a device bound to it.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - The channel used to report device signals and fatal
    ///   worker failures.
    pub(crate) fn spawn(event_tx: Sender<AppEvent>) -> Self {
        let (command_tx, command_rx) = mpsc::channel();
        let error_tx = event_tx.clone();

        thread::spawn(move || {
            if let Err(e) = device_worker(command_rx, event_tx) {
                let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:?}", e)));
            }
        });

        Self { command_tx }
    }

    fn send(&self, command: DeviceCommand) -> Result<(), DeviceError> {
        self.command_tx.send(command).map_err(|_| DeviceError::Disconnected)
    }
}

impl PlaybackDevice for MpvDevice {
    fn load(&mut self, source: &str, generation: u64) -> Result<(), DeviceError> {
        if source.trim().is_empty() {
            return Err(DeviceError::Rejected("empty audio source".to_string()));
        }

        self.send(DeviceCommand::Load {
            source: source.to_string(),
            generation,
        })
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        self.send(DeviceCommand::Play)
    }

    fn pause(&mut self) -> Result<(), DeviceError> {
        self.send(DeviceCommand::Pause)
    }

    fn seek(&mut self, seconds: f64) -> Result<(), DeviceError> {
        self.send(DeviceCommand::Seek(seconds))
    }

    fn set_volume(&mut self, level: f64) -> Result<(), DeviceError> {
        self.send(DeviceCommand::SetVolume(level))
    }
}

/// The primary execution loop for the playback device.
///
/// Initializes a local `libmpv` context, then alternates between draining
/// pending commands and waiting briefly for MPV events. Returns cleanly once
/// the coordinator side of the command channel is dropped.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or the event
/// channel is closed.
fn device_worker(command_rx: Receiver<DeviceCommand>, event_tx: Sender<AppEvent>) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("vo", "null")
            .context("Failed to set no video output")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;

    let mut tags = LoadTags::default();

    loop {
        if !process_commands(&mut handler, &command_rx, &mut tags, &event_tx)? {
            tracing::debug!("Playback device channel closed, stopping MPV worker");
            return Ok(());
        }
        process_mpv_events(&mut handler, &mut tags, &event_tx)?;
    }
}

/// Tracks which load the events coming out of MPV belong to.
///
/// A load is only requested when its command is drained; MPV may still hold
/// events for the previous file at that point. The requested generation
/// becomes active when MPV reports the new file starting, and every event is
/// tagged with the active generation.
#[derive(Debug, Default, PartialEq)]
struct LoadTags {
    pending: Option<u64>,
    active: u64,
}

impl LoadTags {
    fn requested(&mut self, generation: u64) {
        self.pending = Some(generation);
    }

    fn tag(&mut self, event: DeviceEvent) -> DeviceSignal {
        if event == DeviceEvent::LoadStart {
            if let Some(generation) = self.pending.take() {
                self.active = generation;
            }
        }

        DeviceSignal::new(self.active, event)
    }

    /// The generation a failed `loadfile` belongs to.
    fn failed(&mut self) -> u64 {
        self.pending.take().unwrap_or(self.active)
    }
}

/// Drains and executes all pending commands. Returns `false` once the command
/// channel is disconnected.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &Receiver<DeviceCommand>,
    tags: &mut LoadTags,
    event_tx: &Sender<AppEvent>,
) -> Result<bool> {
    loop {
        let command = match command_rx.try_recv() {
            Ok(command) => command,
            Err(TryRecvError::Empty) => return Ok(true),
            Err(TryRecvError::Disconnected) => return Ok(false),
        };

        let outcome = match &command {
            DeviceCommand::Load { source, generation } => {
                tags.requested(*generation);
                handler
                    .set_property("pause", true)
                    .and_then(|_| handler.command(&["loadfile", source.as_str(), "replace"]))
            }
            DeviceCommand::Play => handler.set_property("pause", false),
            DeviceCommand::Pause => handler.set_property("pause", true),
            DeviceCommand::Seek(seconds) => handler.command(&["seek", &seconds.to_string(), "absolute"]),
            DeviceCommand::SetVolume(level) => handler.set_property("volume", level * 100.0),
        };

        if let Err(e) = outcome {
            tracing::warn!("MPV rejected {:?}: {:?}", command, e);
            if let Some(signal) = failure_signal(&command, tags, format!("{:?}", e)) {
                send(event_tx, signal)?;
            }
        }
    }
}

/// Maps a failed command to the signal the coordinator should see, if any.
///
/// Only a failed load is a device error. A rejected transport command, such
/// as a seek while the file is still opening, leaves the loaded file as it
/// was.
fn failure_signal(command: &DeviceCommand, tags: &mut LoadTags, message: String) -> Option<DeviceSignal> {
    match command {
        DeviceCommand::Load { .. } => Some(DeviceSignal::new(tags.failed(), DeviceEvent::Error(message))),
        _ => None,
    }
}

/// Polls for a single MPV event and reports it as a device signal.
///
/// This function waits for up to 50ms for an event from the MPV context.
fn process_mpv_events(handler: &mut mpv::MpvHandler, tags: &mut LoadTags, event_tx: &Sender<AppEvent>) -> Result<()> {
    let Some(mpv_event) = handler.wait_event(0.05) else {
        return Ok(());
    };

    let event = match mpv_event {
        mpv::Event::StartFile => Some(DeviceEvent::LoadStart),
        mpv::Event::FileLoaded => Some(DeviceEvent::CanPlay),
        mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
            ("duration", Format::Double(duration)) => Some(DeviceEvent::MetadataReady(duration)),
            ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                Some(DeviceEvent::TimeUpdate(seconds))
            }
            _ => None,
        },
        mpv::Event::EndFile(result) => match result {
            Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF) => Some(DeviceEvent::Ended),
            Ok(_) => None,
            Err(e) => Some(DeviceEvent::Error(format!("{:?}", e))),
        },
        _ => None,
    };

    if let Some(event) = event {
        send(event_tx, tags.tag(event))?;
    }

    Ok(())
}

fn send(event_tx: &Sender<AppEvent>, signal: DeviceSignal) -> Result<()> {
    event_tx
        .send(AppEvent::Device(signal))
        .context("Failed to send device event")
}
