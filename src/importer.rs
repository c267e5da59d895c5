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

//! Bringing local audio files into the catalog.
//!
//! This module handles the discovery of audio files on the local filesystem
//! and turns them into catalog [`Song`]s.
//!
//! It utilizes `WalkDir` for directory traversal and `Lofty` for metadata
//! extraction. Song ids are an `xxh3` hash of the file path, so importing the
//! same file twice yields the same id.
//!
//! Uploads go through [`validate_upload`] first, which reports every problem
//! with the request at once rather than stopping at the first.

use anyhow::{Context, Result};
use chrono::Utc;
use lofty::prelude::*;
use lofty::probe::Probe;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::WalkDir;
use xxhash_rust::xxh3::xxh3_64;

use crate::model::{Song, SongId};

pub(crate) const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "wav", "flac", "m4a", "aac", "ogg"];

const MAX_AUDIO_BYTES: u64 = 50 * 1024 * 1024;
const MAX_COVER_BYTES: u64 = 5 * 1024 * 1024;

const UNKNOWN_ARTIST: &str = "Unknown Artist";
const UNKNOWN_GENRE: &str = "Unknown";

/// A file picked for upload, with its size on disk.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UploadFile {
    pub(crate) path: PathBuf,
    pub(crate) size: u64,
}

impl UploadFile {
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let size = fs::metadata(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?
            .len();
        Ok(Self { path, size })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct UploadRequest {
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) genre: String,
    pub(crate) audio: Option<UploadFile>,
    pub(crate) cover: Option<UploadFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum UploadFieldError {
    #[error("Song title is required")]
    MissingTitle,

    #[error("Artist name is required")]
    MissingArtist,

    #[error("Please select a genre")]
    MissingGenre,

    #[error("Please select an audio file")]
    MissingAudio,

    #[error("Please select a valid audio file (MP3, WAV, FLAC, M4A, AAC, OGG)")]
    UnsupportedAudio,

    #[error("File size must be less than 50MB")]
    AudioTooLarge,

    #[error("Cover image must be less than 5MB")]
    CoverTooLarge,
}

/// Every field problem found in an upload request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) struct UploadError(pub(crate) Vec<UploadFieldError>);

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Checks an upload request, collecting all field errors.
pub(crate) fn validate_upload(request: &UploadRequest) -> Result<(), UploadError> {
    let mut errors = Vec::new();

    if request.title.trim().is_empty() {
        errors.push(UploadFieldError::MissingTitle);
    }
    if request.artist.trim().is_empty() {
        errors.push(UploadFieldError::MissingArtist);
    }
    if request.genre.trim().is_empty() {
        errors.push(UploadFieldError::MissingGenre);
    }

    match &request.audio {
        None => errors.push(UploadFieldError::MissingAudio),
        Some(audio) if !is_supported_audio(&audio.path) => {
            errors.push(UploadFieldError::UnsupportedAudio)
        }
        Some(audio) if audio.size > MAX_AUDIO_BYTES => errors.push(UploadFieldError::AudioTooLarge),
        Some(_) => {}
    }

    if request.cover.as_ref().is_some_and(|cover| cover.size > MAX_COVER_BYTES) {
        errors.push(UploadFieldError::CoverTooLarge);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(UploadError(errors))
    }
}

/// Validates and imports an upload. The request's title, artist and genre
/// take precedence over whatever the file's tags say.
///
/// # Errors
///
/// Returns the collected [`UploadError`] if validation fails, or an error if
/// the audio file cannot be read.
pub(crate) fn upload(request: UploadRequest) -> Result<Song> {
    validate_upload(&request)?;

    let audio = request.audio.context("Upload has no audio file")?;
    let mut song = import_file(&audio.path)?;

    song.title = request.title.trim().to_string();
    song.artist = request.artist.trim().to_string();
    song.genre = request.genre.trim().to_string();
    song.cover = request
        .cover
        .map(|cover| cover.path.to_string_lossy().into_owned());

    tracing::info!(song = %song.id, title = %song.title, "Uploaded song");

    Ok(song)
}

/// Reads a single audio file into a new catalog song.
///
/// Missing tags fall back to the file stem for the title, "Unknown Artist"
/// and "Unknown" genre.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not a recognised
/// audio format.
pub(crate) fn import_file(path: &Path) -> Result<Song> {
    let tagged_file = Probe::open(path)
        .and_then(|p| p.read())
        .with_context(|| format!("Failed to read audio file {}", path.display()))?;

    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let title = tag
        .and_then(|t| t.title().map(|s| s.to_string()))
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(stem);
    let artist = tag
        .and_then(|t| t.artist().map(|s| s.to_string()))
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
    let genre = tag
        .and_then(|t| t.genre().map(|s| s.to_string()))
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_GENRE.to_string());

    let source = path.to_str().context("Path contains invalid UTF-8")?.to_string();

    Ok(Song {
        id: song_id(path),
        title,
        artist,
        genre,
        duration: tagged_file.properties().duration().as_secs(),
        cover: None,
        source: Some(source),
        uploaded_at: Utc::now(),
        plays: 0,
        likes: 0,
    })
}

/// Recursively imports every supported audio file under each directory.
///
/// Files that cannot be read are skipped with a warning; a missing
/// directory yields no songs.
pub(crate) fn scan_media_dirs<P: AsRef<Path>>(dirs: &[P]) -> Vec<Song> {
    let mut songs = Vec::new();

    for dir in dirs {
        let dir = dir.as_ref();
        tracing::info!("Scanning media directory {}", dir.display());

        for entry in WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_supported_audio(e.path()))
        {
            match import_file(entry.path()) {
                Ok(song) => songs.push(song),
                Err(e) => tracing::warn!("Skipping {}: {:#}", entry.path().display(), e),
            }
        }
    }

    songs
}

fn song_id(path: &Path) -> SongId {
    SongId(xxh3_64(path.to_string_lossy().as_bytes()))
}

fn is_supported_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64) -> Option<UploadFile> {
        Some(UploadFile {
            path: PathBuf::from(name),
            size,
        })
    }

    fn request() -> UploadRequest {
        UploadRequest {
            title: "Night Drive".into(),
            artist: "Neon Coast".into(),
            genre: "Electronic".into(),
            audio: file("night-drive.mp3", 4_000_000),
            cover: None,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert_eq!(validate_upload(&request()), Ok(()));
    }

    #[test]
    fn all_field_errors_are_reported_together() {
        let request = UploadRequest {
            cover: file("cover.png", MAX_COVER_BYTES + 1),
            ..Default::default()
        };

        let UploadError(errors) = validate_upload(&request).unwrap_err();

        assert_eq!(
            errors,
            vec![
                UploadFieldError::MissingTitle,
                UploadFieldError::MissingArtist,
                UploadFieldError::MissingGenre,
                UploadFieldError::MissingAudio,
                UploadFieldError::CoverTooLarge,
            ]
        );
    }

    #[test]
    fn audio_format_and_size_are_checked() {
        let mut unsupported = request();
        unsupported.audio = file("notes.txt", 10);
        assert_eq!(
            validate_upload(&unsupported),
            Err(UploadError(vec![UploadFieldError::UnsupportedAudio]))
        );

        let mut too_large = request();
        too_large.audio = file("long-mix.FLAC", MAX_AUDIO_BYTES + 1);
        assert_eq!(
            validate_upload(&too_large),
            Err(UploadError(vec![UploadFieldError::AudioTooLarge]))
        );

        let mut at_limit = request();
        at_limit.audio = file("long-mix.ogg", MAX_AUDIO_BYTES);
        assert_eq!(validate_upload(&at_limit), Ok(()));
    }

    #[test]
    fn upload_error_lists_every_message() {
        let error = UploadError(vec![UploadFieldError::MissingTitle, UploadFieldError::MissingGenre]);
        assert_eq!(error.to_string(), "Song title is required; Please select a genre");
    }

    #[test]
    fn import_of_non_audio_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.mp3");
        fs::write(&path, b"definitely not audio").unwrap();

        assert!(import_file(&path).is_err());
    }

    #[test]
    fn scan_skips_unreadable_and_unsupported_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/broken.flac"), b"junk").unwrap();
        fs::write(dir.path().join("readme.txt"), b"hello").unwrap();

        let songs = scan_media_dirs(&[dir.path(), Path::new("/does/not/exist")]);

        assert!(songs.is_empty());
    }

    #[test]
    fn upload_file_open_reads_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.jpg");
        fs::write(&path, [0u8; 128]).unwrap();

        let file = UploadFile::open(&path).unwrap();
        assert_eq!(file.size, 128);
        assert!(UploadFile::open(dir.path().join("missing.jpg")).is_err());
    }

    #[test]
    fn song_ids_are_stable_per_path() {
        assert_eq!(song_id(Path::new("/music/a.mp3")), song_id(Path::new("/music/a.mp3")));
        assert_ne!(song_id(Path::new("/music/a.mp3")), song_id(Path::new("/music/b.mp3")));
    }

    #[test]
    fn extension_check_ignores_case() {
        assert!(is_supported_audio(Path::new("a.MP3")));
        assert!(is_supported_audio(Path::new("a.m4a")));
        assert!(!is_supported_audio(Path::new("a.mp4")));
        assert!(!is_supported_audio(Path::new("mp3")));
    }
}
