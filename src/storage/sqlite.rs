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

//! SQLite-backed key-value storage.
//!
//! All values live in one table:
//!
//! * `kv` - `key` is the primary key, `value` is a JSON-encoded string.
//!
//! Statements are prepared with [`rusqlite::Connection::prepare_cached`] since
//! the same three statements are executed for every identity operation.

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};

use crate::storage::{KeyValueStore, StorageError};

pub(crate) struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (creating if necessary) the database file and configures it.
    ///
    /// This function performs the following setup:
    /// * **WAL Mode**: Enables Write-Ahead Logging.
    /// * **Performance Tuning**: Sets synchronous mode to `NORMAL`.
    /// * **Schema**: Executes [`create_schema`] to ensure the table exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database file cannot be opened, the PRAGMA
    /// configuration fails, or the schema cannot be created.
    pub(crate) fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;

        let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
        if journal_mode != "wal" {
            anyhow::bail!(
                "Failed to switch to WAL mode. Current mode: {}",
                journal_mode
            );
        }

        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;

        create_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Opens a private in-memory database with the same schema.
    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Create the database schema.
fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        );",
    )?;

    Ok(())
}

impl KeyValueStore for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare_cached("SELECT value FROM kv WHERE key = ?")?;
        let value = stmt.query_row([key], |row| row.get(0)).optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO kv (key, value) VALUES (?, ?)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value",
        )?;
        stmt.execute(params![key, value])?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut stmt = self.conn.prepare_cached("DELETE FROM kv WHERE key = ?")?;
        stmt.execute([key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_and_remove_deletes() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();

        assert_eq!(storage.get("token").unwrap(), None);

        storage.set("token", "\"a\"").unwrap();
        storage.set("token", "\"b\"").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("\"b\""));

        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
    }

    #[test]
    fn json_values_round_trip_and_corruption_is_reported() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();

        storage.set_json("users", &vec!["ada", "grace"]).unwrap();
        let users: Option<Vec<String>> = storage.get_json("users").unwrap();
        assert_eq!(users, Some(vec!["ada".to_string(), "grace".to_string()]));

        storage.set("user", "{not json").unwrap();
        let corrupt = storage.get_json::<Vec<String>>("user");
        assert!(matches!(corrupt, Err(StorageError::Corrupt { ref key, .. }) if key == "user"));
    }
}
