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

use std::collections::HashSet;

use proptest::prelude::*;

use super::*;
use crate::model::test_song;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(String, u64),
    Play,
    Pause,
    Seek(f64),
    Volume(f64),
}

#[derive(Debug, Default)]
struct FakeDevice {
    calls: Vec<Call>,
    reject_play: bool,
    reject_pause: bool,
    reject_load: bool,
}

impl PlaybackDevice for FakeDevice {
    fn load(&mut self, source: &str, generation: u64) -> Result<(), DeviceError> {
        if self.reject_load {
            return Err(DeviceError::Rejected("unsupported format".into()));
        }
        self.calls.push(Call::Load(source.to_string(), generation));
        Ok(())
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        if self.reject_play {
            return Err(DeviceError::Rejected("autoplay blocked".into()));
        }
        self.calls.push(Call::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), DeviceError> {
        if self.reject_pause {
            return Err(DeviceError::Disconnected);
        }
        self.calls.push(Call::Pause);
        Ok(())
    }

    fn seek(&mut self, seconds: f64) -> Result<(), DeviceError> {
        self.calls.push(Call::Seek(seconds));
        Ok(())
    }

    fn set_volume(&mut self, level: f64) -> Result<(), DeviceError> {
        self.calls.push(Call::Volume(level));
        Ok(())
    }
}

fn coordinator() -> PlaybackCoordinator<FakeDevice> {
    PlaybackCoordinator::new(FakeDevice::default(), DEFAULT_VOLUME)
}

fn with_queue(len: u64) -> PlaybackCoordinator<FakeDevice> {
    let mut coordinator = coordinator();
    coordinator.enqueue_all((1..=len).map(|id| test_song(id, &format!("Song {id}"), 180)));
    coordinator
}

/// Delivers `event` tagged with the coordinator's current generation.
fn signal(coordinator: &mut PlaybackCoordinator<FakeDevice>, event: DeviceEvent) {
    let generation = coordinator.generation;
    coordinator.handle_signal(DeviceSignal::new(generation, event));
}

fn current_id(coordinator: &PlaybackCoordinator<FakeDevice>) -> Option<SongId> {
    coordinator.current().map(|song| song.id)
}

#[test]
fn new_coordinator_is_empty_at_default_volume() {
    let coordinator = coordinator();
    let snapshot = coordinator.snapshot();

    assert_eq!(snapshot.state, TransportState::Empty);
    assert_eq!(snapshot.volume, 0.7);
    assert_eq!(snapshot.repeat, RepeatMode::Off);
    assert!(!snapshot.shuffled);
    assert!(snapshot.current.is_none());
    assert_eq!(coordinator.device.calls, vec![Call::Volume(0.7)]);
}

#[test]
fn play_song_loads_then_plays_when_ready() {
    let mut coordinator = coordinator();

    coordinator.play_song(test_song(1, "Midnight Dreams", 245));

    assert_eq!(coordinator.state(), TransportState::Loading);
    assert_eq!(coordinator.queue().len(), 1);
    assert!(coordinator.device.calls.contains(&Call::Load("/music/1.mp3".into(), 1)));

    signal(&mut coordinator, DeviceEvent::CanPlay);

    assert_eq!(coordinator.state(), TransportState::Playing);
    assert_eq!(coordinator.device.calls.last(), Some(&Call::Play));
}

#[test]
fn play_song_already_queued_reuses_its_entry() {
    let mut coordinator = with_queue(3);

    coordinator.play_song(test_song(2, "Song 2", 180));

    assert_eq!(coordinator.queue().len(), 3);
    assert_eq!(coordinator.queue().index(), 1);
    assert_eq!(current_id(&coordinator), Some(SongId(2)));
}

#[test]
fn play_index_out_of_range_is_rejected() {
    let mut coordinator = with_queue(2);

    assert_eq!(coordinator.play_index(2), Err(PlaybackError::IndexOutOfBounds(2)));
    assert_eq!(coordinator.state(), TransportState::Empty);

    assert_eq!(coordinator.play_index(1), Ok(()));
    assert_eq!(current_id(&coordinator), Some(SongId(2)));
}

#[test]
fn toggle_with_nothing_loaded_starts_first_song() {
    let mut coordinator = with_queue(3);

    coordinator.toggle_play();

    assert_eq!(current_id(&coordinator), Some(SongId(1)));
    assert_eq!(coordinator.state(), TransportState::Loading);
}

#[test]
fn toggle_on_empty_queue_does_nothing() {
    let mut coordinator = coordinator();

    coordinator.toggle_play();

    assert_eq!(coordinator.state(), TransportState::Empty);
    assert_eq!(coordinator.device.calls, vec![Call::Volume(0.7)]);
}

#[test]
fn toggle_pauses_and_resumes() {
    let mut coordinator = with_queue(1);
    coordinator.toggle_play();
    signal(&mut coordinator, DeviceEvent::CanPlay);

    coordinator.toggle_play();
    assert_eq!(coordinator.state(), TransportState::Paused);
    assert_eq!(coordinator.device.calls.last(), Some(&Call::Pause));

    coordinator.toggle_play();
    assert_eq!(coordinator.state(), TransportState::Playing);
    assert_eq!(coordinator.device.calls.last(), Some(&Call::Play));
}

#[test]
fn toggle_while_loading_cancels_autoplay() {
    let mut coordinator = with_queue(1);
    coordinator.toggle_play();

    coordinator.toggle_play();
    assert_eq!(coordinator.state(), TransportState::Loading);

    signal(&mut coordinator, DeviceEvent::CanPlay);
    assert_eq!(coordinator.state(), TransportState::Paused);
    assert!(!coordinator.device.calls.contains(&Call::Play));
}

#[test]
fn rejected_play_leaves_session_paused_with_error() {
    let mut coordinator = with_queue(1);
    coordinator.device.reject_play = true;

    coordinator.toggle_play();
    signal(&mut coordinator, DeviceEvent::CanPlay);

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.state, TransportState::Paused);
    assert_eq!(snapshot.error.as_deref(), Some("Failed to play audio: autoplay blocked"));
}

#[test]
fn device_error_moves_to_errored_and_toggle_retries() {
    let mut coordinator = with_queue(1);
    coordinator.toggle_play();

    signal(&mut coordinator, DeviceEvent::Error("404 not found".into()));

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.state, TransportState::Errored);
    assert_eq!(snapshot.error.as_deref(), Some("Failed to load audio: 404 not found"));

    coordinator.toggle_play();

    assert_eq!(coordinator.state(), TransportState::Loading);
    assert!(coordinator.snapshot().error.is_none());
    assert_eq!(coordinator.device.calls.last(), Some(&Call::Load("/music/1.mp3".into(), 2)));
}

#[test]
fn song_without_source_fails_to_load() {
    let mut coordinator = coordinator();
    let mut song = test_song(6, "Digital Love", 267);
    song.source = None;

    coordinator.play_song(song);

    assert_eq!(coordinator.state(), TransportState::Errored);
    assert!(coordinator.snapshot().error.is_some_and(|e| e.starts_with("Failed to load audio")));
    assert!(!coordinator.device.calls.iter().any(|c| matches!(c, Call::Load(..))));
}

#[test]
fn rejected_load_fails_immediately() {
    let mut coordinator = with_queue(1);
    coordinator.device.reject_load = true;

    coordinator.toggle_play();

    assert_eq!(coordinator.state(), TransportState::Errored);
    assert_eq!(
        coordinator.snapshot().error.as_deref(),
        Some("Failed to load audio: unsupported format")
    );
}

#[test]
fn stale_signals_are_discarded() {
    let mut coordinator = with_queue(2);
    coordinator.toggle_play();
    let first = coordinator.generation;

    coordinator.advance(Direction::Next);

    coordinator.handle_signal(DeviceSignal::new(first, DeviceEvent::CanPlay));
    coordinator.handle_signal(DeviceSignal::new(first, DeviceEvent::Error("late".into())));
    coordinator.handle_signal(DeviceSignal::new(first, DeviceEvent::Ended));

    assert_eq!(coordinator.state(), TransportState::Loading);
    assert_eq!(current_id(&coordinator), Some(SongId(2)));
    assert!(coordinator.snapshot().error.is_none());
}

#[test]
fn end_of_song_advances_to_the_next_one() {
    let mut coordinator = coordinator();
    coordinator.enqueue_all([test_song(1, "A", 200), test_song(2, "B", 150)]);

    coordinator.toggle_play();
    signal(&mut coordinator, DeviceEvent::CanPlay);
    signal(&mut coordinator, DeviceEvent::MetadataReady(200.0));
    signal(&mut coordinator, DeviceEvent::TimeUpdate(200.0));
    assert_eq!(coordinator.snapshot().duration, 200.0);

    signal(&mut coordinator, DeviceEvent::Ended);

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.current.map(|s| s.title), Some("B".to_string()));
    assert_eq!(snapshot.index, 1);
    assert_eq!(snapshot.elapsed, 0.0);
    assert_eq!(snapshot.state, TransportState::Loading);

    signal(&mut coordinator, DeviceEvent::CanPlay);
    signal(&mut coordinator, DeviceEvent::MetadataReady(150.0));
    assert_eq!(coordinator.state(), TransportState::Playing);
    assert_eq!(coordinator.snapshot().duration, 150.0);
}

#[test]
fn end_of_last_song_wraps_to_the_first() {
    let mut coordinator = with_queue(2);
    coordinator.play_index(1).unwrap();

    signal(&mut coordinator, DeviceEvent::Ended);

    assert_eq!(current_id(&coordinator), Some(SongId(1)));
}

#[test]
fn repeat_one_still_advances_at_end_of_song() {
    let mut coordinator = with_queue(2);
    coordinator.cycle_repeat();
    coordinator.toggle_play();

    signal(&mut coordinator, DeviceEvent::Ended);

    assert_eq!(current_id(&coordinator), Some(SongId(2)));
}

#[test]
fn cycle_repeat_returns_to_off_after_three_steps() {
    let mut coordinator = coordinator();

    assert_eq!(coordinator.cycle_repeat(), RepeatMode::One);
    assert_eq!(coordinator.cycle_repeat(), RepeatMode::All);
    assert_eq!(coordinator.cycle_repeat(), RepeatMode::Off);
}

#[test]
fn toggle_shuffle_flips() {
    let mut coordinator = coordinator();

    assert!(coordinator.toggle_shuffle());
    assert!(!coordinator.toggle_shuffle());
}

#[test]
fn shuffled_advance_eventually_visits_every_song() {
    let mut coordinator = with_queue(4);
    coordinator.toggle_shuffle();
    coordinator.toggle_play();

    let mut seen = HashSet::new();
    for _ in 0..500 {
        coordinator.advance(Direction::Next);
        let index = coordinator.queue().index();
        assert!(index < 4);
        seen.insert(index);
    }

    assert_eq!(seen.len(), 4);
}

#[test]
fn advance_on_empty_queue_does_nothing() {
    let mut coordinator = coordinator();

    coordinator.advance(Direction::Next);
    coordinator.advance(Direction::Previous);

    assert_eq!(coordinator.state(), TransportState::Empty);
    assert_eq!(coordinator.generation, 0);
}

#[test]
fn clear_unloads_and_pauses_device() {
    let mut coordinator = with_queue(3);
    coordinator.toggle_play();
    signal(&mut coordinator, DeviceEvent::CanPlay);
    let before = coordinator.generation;

    coordinator.clear();

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.state, TransportState::Empty);
    assert_eq!(snapshot.queue_len, 0);
    assert_eq!(snapshot.index, 0);
    assert!(snapshot.current.is_none());
    assert_eq!(coordinator.device.calls.last(), Some(&Call::Pause));

    coordinator.handle_signal(DeviceSignal::new(before, DeviceEvent::Ended));
    assert_eq!(coordinator.state(), TransportState::Empty);
}

#[test]
fn dequeue_current_song_keeps_it_playing() {
    let mut coordinator = with_queue(3);
    coordinator.play_index(1).unwrap();
    signal(&mut coordinator, DeviceEvent::CanPlay);

    assert!(coordinator.dequeue(SongId(2)));

    assert_eq!(coordinator.state(), TransportState::Playing);
    assert_eq!(current_id(&coordinator), Some(SongId(2)));

    coordinator.advance(Direction::Next);
    assert_eq!(current_id(&coordinator), Some(SongId(3)));
}

#[test]
fn end_of_a_dequeued_song_with_nothing_left_pauses() {
    let mut coordinator = with_queue(1);
    coordinator.toggle_play();
    signal(&mut coordinator, DeviceEvent::CanPlay);
    signal(&mut coordinator, DeviceEvent::TimeUpdate(180.0));

    coordinator.dequeue(SongId(1));
    signal(&mut coordinator, DeviceEvent::Ended);

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.state, TransportState::Paused);
    assert_eq!(snapshot.current.map(|s| s.id), Some(SongId(1)));
    assert_eq!(snapshot.elapsed, 180.0);
}

#[test]
fn end_of_song_from_before_a_skip_does_not_skip_again() {
    let mut coordinator = with_queue(3);
    coordinator.toggle_play();
    signal(&mut coordinator, DeviceEvent::CanPlay);
    let first = coordinator.generation;

    coordinator.advance(Direction::Next);
    coordinator.handle_signal(DeviceSignal::new(first, DeviceEvent::Ended));

    assert_eq!(current_id(&coordinator), Some(SongId(2)));
    assert_eq!(coordinator.state(), TransportState::Loading);
}

#[test]
fn seek_while_loading_keeps_the_song_loading() {
    let mut coordinator = with_queue(2);
    coordinator.play_index(0).unwrap();

    coordinator.seek(5.0);

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.state, TransportState::Loading);
    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.elapsed, 5.0);
}

#[test]
fn failed_pause_when_cancelling_autoplay_is_recorded() {
    let mut coordinator = with_queue(1);
    coordinator.toggle_play();
    coordinator.device.reject_pause = true;

    coordinator.toggle_play();

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.state, TransportState::Loading);
    assert_eq!(snapshot.error.as_deref(), Some("Failed to pause audio: Playback device is not running"));
}

#[test]
fn seek_without_a_song_is_ignored() {
    let mut coordinator = coordinator();

    coordinator.seek(30.0);

    assert_eq!(coordinator.snapshot().elapsed, 0.0);
    assert!(!coordinator.device.calls.iter().any(|c| matches!(c, Call::Seek(_))));
}

#[test]
fn volume_is_clamped() {
    let mut coordinator = coordinator();

    coordinator.set_volume(1.5);
    assert_eq!(coordinator.snapshot().volume, 1.0);

    coordinator.set_volume(-0.2);
    assert_eq!(coordinator.snapshot().volume, 0.0);

    coordinator.set_volume(f64::NAN);
    assert_eq!(coordinator.snapshot().volume, 0.0);
    assert_eq!(coordinator.device.calls.last(), Some(&Call::Volume(0.0)));
}

proptest! {
    #[test]
    fn seek_sets_elapsed(seconds in 0.0f64..600.0) {
        let mut coordinator = with_queue(1);
        coordinator.toggle_play();

        coordinator.seek(seconds);

        prop_assert_eq!(coordinator.snapshot().elapsed, seconds);
        prop_assert_eq!(coordinator.device.calls.last(), Some(&Call::Seek(seconds)));
    }

    #[test]
    fn sequential_advance_wraps_modulo_queue_length(len in 1u64..12, start in 0usize..12, forward in any::<bool>()) {
        let len_usize = len as usize;
        let start = start % len_usize;
        let mut coordinator = with_queue(len);
        coordinator.play_index(start).unwrap();

        let (direction, expected) = if forward {
            (Direction::Next, (start + 1) % len_usize)
        } else {
            (Direction::Previous, (start + len_usize - 1) % len_usize)
        };
        coordinator.advance(direction);

        prop_assert_eq!(coordinator.queue().index(), expected);
        prop_assert_eq!(coordinator.state(), TransportState::Loading);
    }

    #[test]
    fn shuffled_advance_stays_in_range(len in 1u64..12) {
        let mut coordinator = with_queue(len);
        coordinator.toggle_shuffle();

        coordinator.advance(Direction::Previous);

        prop_assert!(coordinator.queue().index() < len as usize);
    }

    #[test]
    fn volume_always_in_unit_range(level in -10.0f64..10.0) {
        let mut coordinator = coordinator();

        coordinator.set_volume(level);

        let volume = coordinator.snapshot().volume;
        prop_assert!((0.0..=1.0).contains(&volume));
    }
}
