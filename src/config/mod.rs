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

//! Application configuration.
//!
//! This module manages the application configuration file. A missing or
//! unreadable file falls back to the defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::player::DEFAULT_VOLUME;

const CONFIG_NAME: &str = "riffbox";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) version: u32,
    /// Directories scanned for audio files at startup.
    pub(crate) media_dirs: Vec<String>,
    /// SQLite file holding accounts and the signed-in session.
    pub(crate) database_file: String,
    pub(crate) log_dir: String,
    /// Delay applied to every account operation.
    pub(crate) simulated_latency_ms: u64,
    pub(crate) initial_volume: f64,
    /// Start with the built-in demo songs and playlists.
    pub(crate) seed_catalog: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            media_dirs: vec![],
            database_file: "riffbox.db".to_string(),
            log_dir: "logs".to_string(),
            simulated_latency_ms: 1000,
            initial_volume: DEFAULT_VOLUME,
            seed_catalog: true,
        }
    }
}

impl AppConfig {
    pub(crate) fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

pub(crate) fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"media_dirs": ["/srv/music"], "seed_catalog": false}"#).unwrap();

        assert_eq!(config.media_dirs, vec!["/srv/music".to_string()]);
        assert!(!config.seed_catalog);
        assert_eq!(config.simulated_latency(), Duration::from_millis(1000));
        assert_eq!(config.initial_volume, 0.7);
    }
}
