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

//! Account records and the inputs of each account operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user record as shown to the rest of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct User {
    #[serde(rename = "_id")]
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) role: String,
    pub(crate) is_verified: bool,
    pub(crate) bio: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) last_login: DateTime<Utc>,
}

/// A user record as persisted in the `users` table, with its credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredUser {
    #[serde(flatten)]
    pub(crate) user: User,
    pub(crate) password: String,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Registration {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Credentials {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ProfileUpdate {
    pub(crate) username: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) bio: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PasswordChange {
    pub(crate) current_password: String,
    pub(crate) new_password: String,
}
