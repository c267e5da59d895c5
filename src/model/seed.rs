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

//! Starter content shown before any media directory has been scanned.

use chrono::{DateTime, TimeZone, Utc};

use crate::model::{
    Song, SongId,
    catalog::Catalog,
    playlists::{PlaylistDraft, PlaylistStore},
};

struct SeedSong {
    id: u64,
    title: &'static str,
    artist: &'static str,
    genre: &'static str,
    duration: u64,
    uploaded_at: (u32, u32, u32),
    plays: u64,
    likes: u64,
    source: Option<&'static str>,
}

const SEED_SONGS: [SeedSong; 6] = [
    SeedSong {
        id: 1,
        title: "Midnight Dreams",
        artist: "Luna Echo",
        genre: "Electronic",
        duration: 245,
        uploaded_at: (15, 10, 30),
        plays: 1250,
        likes: 89,
        source: Some("https://www2.cs.uic.edu/~i101/SoundFiles/CantinaBand60.wav"),
    },
    SeedSong {
        id: 2,
        title: "Ocean Waves",
        artist: "The Coastal Band",
        genre: "Indie",
        duration: 198,
        uploaded_at: (10, 14, 20),
        plays: 890,
        likes: 67,
        source: Some("https://www2.cs.uic.edu/~i101/SoundFiles/BabyElephantWalk60.wav"),
    },
    SeedSong {
        id: 3,
        title: "City Lights",
        artist: "Urban Pulse",
        genre: "Pop",
        duration: 223,
        uploaded_at: (20, 16, 45),
        plays: 2100,
        likes: 156,
        source: Some("https://www2.cs.uic.edu/~i101/SoundFiles/ImperialMarch60.wav"),
    },
    SeedSong {
        id: 4,
        title: "Mountain High",
        artist: "Peak Climbers",
        genre: "Rock",
        duration: 312,
        uploaded_at: (5, 9, 15),
        plays: 750,
        likes: 45,
        source: Some("https://www2.cs.uic.edu/~i101/SoundFiles/StarWars60.wav"),
    },
    SeedSong {
        id: 5,
        title: "Jazz Night",
        artist: "Smooth Collective",
        genre: "Jazz",
        duration: 267,
        uploaded_at: (12, 11, 30),
        plays: 680,
        likes: 52,
        source: Some("https://www2.cs.uic.edu/~i101/SoundFiles/gettysburg10.wav"),
    },
    SeedSong {
        id: 6,
        title: "Digital Love",
        artist: "Synthwave",
        genre: "Electronic",
        duration: 189,
        uploaded_at: (18, 13, 25),
        plays: 920,
        likes: 78,
        source: None,
    },
];

// (name, description, public, created day/hour/minute, song ids)
const SEED_PLAYLISTS: [(&str, &str, bool, (u32, u32, u32), &[u64]); 5] = [
    ("Chill Vibes", "Perfect for relaxing evenings and study sessions", true, (15, 10, 30), &[1, 2]),
    ("Workout Mix", "High energy tracks to keep you motivated during workouts", true, (10, 14, 20), &[4, 3]),
    ("Jazz Collection", "Classic and modern jazz favorites", false, (5, 9, 15), &[5]),
    ("Pop Hits 2024", "Latest pop songs that are trending this year", true, (20, 16, 45), &[3]),
    ("Indie Discoveries", "Hidden gems from independent artists", true, (12, 11, 30), &[2]),
];

fn january(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

pub(crate) fn catalog() -> Catalog {
    let songs = SEED_SONGS
        .iter()
        .map(|seed| {
            let (day, hour, minute) = seed.uploaded_at;
            Song {
                id: SongId(seed.id),
                title: seed.title.to_string(),
                artist: seed.artist.to_string(),
                genre: seed.genre.to_string(),
                duration: seed.duration,
                cover: None,
                source: seed.source.map(str::to_string),
                uploaded_at: january(day, hour, minute),
                plays: seed.plays,
                likes: seed.likes,
            }
        })
        .collect();

    Catalog::with_songs(songs)
}

/// Builds the starter playlists from songs present in `catalog`.
pub(crate) fn playlists(catalog: &Catalog) -> PlaylistStore {
    let mut store = PlaylistStore::new();

    // Oldest first so the store ends up newest first, matching how users add.
    let mut seeds = SEED_PLAYLISTS.to_vec();
    seeds.sort_by_key(|(_, _, _, created, _)| *created);

    for (name, description, is_public, (day, hour, minute), song_ids) in seeds {
        let songs = song_ids
            .iter()
            .filter_map(|id| catalog.get(SongId(*id)))
            .map(Song::summary)
            .collect();

        let draft = PlaylistDraft {
            name: name.to_string(),
            description: description.to_string(),
            is_public,
            songs,
        };

        if let Err(e) = store.add_at(draft, january(day, hour, minute)) {
            tracing::warn!("Skipping seed playlist {name}: {e}");
        }
    }

    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_playlists_reference_seeded_songs() {
        let catalog = catalog();
        let store = playlists(&catalog);

        assert_eq!(catalog.len(), 6);
        assert_eq!(store.playlists().len(), 5);
        assert_eq!(store.playlists()[0].name, "Pop Hits 2024");
        assert_eq!(store.public_count(), 4);

        for playlist in store.playlists() {
            for song in playlist.songs() {
                assert!(catalog.contains(song.id));
            }
        }
    }
}
