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

//! Durable key-value storage.
//!
//! Values are stored as JSON-encoded strings under fixed string keys. The
//! [`KeyValueStore`] trait is implemented by:
//!
//! * [`sqlite::SqliteStorage`] - a single `kv` table in an SQLite database.
//! * [`memory::MemoryStorage`] - a process-local map, used in tests.

pub(crate) mod memory;
pub(crate) mod sqlite;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Session token of the signed-in user.
pub(crate) const TOKEN_KEY: &str = "token";

/// The signed-in user record, without its credential.
pub(crate) const USER_KEY: &str = "user";

/// Every registered user record, credentials included.
pub(crate) const USERS_KEY: &str = "users";

#[derive(Debug, Error)]
pub(crate) enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Corrupt value stored under '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub(crate) trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Reads and decodes a JSON value. A missing key is `Ok(None)`, an
    /// undecodable one is [`StorageError::Corrupt`].
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError>
    where
        Self: Sized,
    {
        match self.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Corrupt { key: key.to_string(), source }),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value)
            .map_err(|source| StorageError::Encode { key: key.to_string(), source })?;
        self.set(key, &raw)
    }
}
