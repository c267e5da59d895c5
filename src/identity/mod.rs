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

//! Local user accounts.
//!
//! This module provides the [`IdentityStore`], which keeps the signed-in user
//! and the table of registered users in a [`KeyValueStore`]. There is no
//! server: registration, sign-in and profile changes are checks against the
//! stored user records, each preceded by a fixed delay standing in for a
//! network round trip.
//!
//! # Storage Layout
//!
//! * `token` - the session token of the signed-in user.
//! * `user` - the signed-in [`User`], never with a credential.
//! * `users` - every [`StoredUser`], credential included.
//!
//! Credentials are stored and compared as plain text. Uniqueness and
//! credential checks are linear scans over the stored users.

mod model;

use std::{thread, time::Duration};

use chrono::Utc;
use thiserror::Error;

pub(crate) use model::{Credentials, PasswordChange, ProfileUpdate, Registration, StoredUser, User};

use crate::storage::{KeyValueStore, StorageError, TOKEN_KEY, USER_KEY, USERS_KEY};

const MIN_PASSWORD_LEN: usize = 6;
const TOKEN_RANDOM_LEN: usize = 9;
const DEFAULT_ROLE: &str = "user";

#[derive(Debug, Error)]
pub(crate) enum IdentityError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Please provide email and password")]
    MissingCredentials,

    #[error("Password must be at least 6 characters long")]
    WeakPassword,

    #[error("User already exists with this email or username")]
    UserExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("User not found")]
    UserNotFound,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already taken")]
    EmailTaken,

    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub(crate) struct IdentityStore<S: KeyValueStore> {
    storage: S,
    current: Option<User>,
    latency: Duration,
}

impl<S: KeyValueStore> IdentityStore<S> {
    /// Creates a store over `storage`. Every operation except
    /// [`IdentityStore::logout`] and [`IdentityStore::restore_session`]
    /// sleeps for `latency` before doing any work.
    pub(crate) fn new(storage: S, latency: Duration) -> Self {
        Self {
            storage,
            current: None,
            latency,
        }
    }

    pub(crate) fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub(crate) fn token(&self) -> Result<Option<String>, IdentityError> {
        Ok(self.storage.get_json(TOKEN_KEY)?)
    }

    pub(crate) fn is_authenticated(&self) -> Result<bool, IdentityError> {
        Ok(self.current.is_some() && self.token()?.is_some())
    }

    /// Picks up a session persisted by an earlier run.
    ///
    /// A stored user without a token is not a session. Undecodable stored
    /// values are treated as no session and both session keys are cleared.
    pub(crate) fn restore_session(&mut self) -> Result<Option<User>, IdentityError> {
        let session = self
            .storage
            .get_json::<User>(USER_KEY)
            .and_then(|user| Ok((user, self.storage.get_json::<String>(TOKEN_KEY)?)));

        self.current = match session {
            Ok((Some(user), Some(_))) => Some(user),
            Ok(_) => None,
            Err(StorageError::Corrupt { key, source }) => {
                tracing::warn!("Discarding stored session, '{key}' is unreadable: {source}");
                self.clear_session()?;
                None
            }
            Err(e) => return Err(e.into()),
        };

        Ok(self.current.clone())
    }

    /// Creates an account and signs it in.
    ///
    /// # Errors
    ///
    /// * [`IdentityError::MissingFields`] if any field is blank.
    /// * [`IdentityError::WeakPassword`] if the credential is too short.
    /// * [`IdentityError::UserExists`] if the email or username is already
    ///   registered. Stored records are left untouched.
    pub(crate) fn register(&mut self, registration: Registration) -> Result<User, IdentityError> {
        self.simulate_latency();

        let username = registration.username.trim();
        let email = registration.email.trim();

        if username.is_empty() || email.is_empty() || registration.password.is_empty() {
            return Err(IdentityError::MissingFields);
        }

        if registration.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::WeakPassword);
        }

        let mut users = self.users()?;

        if users.iter().any(|u| u.user.email == email || u.user.username == username) {
            return Err(IdentityError::UserExists);
        }

        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            role: DEFAULT_ROLE.to_string(),
            is_verified: true,
            bio: String::new(),
            created_at: now,
            last_login: now,
        };

        users.push(StoredUser {
            user: user.clone(),
            password: registration.password,
        });
        self.storage.set_json(USERS_KEY, &users)?;

        self.start_session(&user)?;

        tracing::info!(username = %user.username, "Registered new user");

        Ok(user)
    }

    /// Signs in with an email and credential, recording the sign-in time.
    ///
    /// # Errors
    ///
    /// * [`IdentityError::MissingCredentials`] if either field is blank.
    /// * [`IdentityError::InvalidCredentials`] if the email is unknown or the
    ///   credential does not match.
    pub(crate) fn login(&mut self, credentials: Credentials) -> Result<User, IdentityError> {
        self.simulate_latency();

        let email = credentials.email.trim();
        if email.is_empty() || credentials.password.is_empty() {
            return Err(IdentityError::MissingCredentials);
        }

        let mut users = self.users()?;

        let stored = users
            .iter_mut()
            .find(|u| u.user.email == email)
            .ok_or(IdentityError::InvalidCredentials)?;

        if stored.password != credentials.password {
            return Err(IdentityError::InvalidCredentials);
        }

        stored.user.last_login = Utc::now();
        let user = stored.user.clone();

        self.storage.set_json(USERS_KEY, &users)?;
        self.start_session(&user)?;

        tracing::info!(username = %user.username, "User signed in");

        Ok(user)
    }

    pub(crate) fn logout(&mut self) -> Result<(), IdentityError> {
        self.clear_session()?;

        if let Some(user) = self.current.take() {
            tracing::info!(username = %user.username, "User signed out");
        }

        Ok(())
    }

    /// Merges profile changes into the signed-in user's record.
    ///
    /// # Errors
    ///
    /// * [`IdentityError::NotAuthenticated`] if nobody is signed in.
    /// * [`IdentityError::UserNotFound`] if the signed-in user is no longer
    ///   in the stored users.
    /// * [`IdentityError::UsernameTaken`] or [`IdentityError::EmailTaken`] if
    ///   another user already holds the new value.
    pub(crate) fn update_profile(&mut self, update: ProfileUpdate) -> Result<User, IdentityError> {
        self.simulate_latency();

        let id = self.current.as_ref().ok_or(IdentityError::NotAuthenticated)?.id.clone();

        let mut users = self.users()?;
        let index = users
            .iter()
            .position(|u| u.user.id == id)
            .ok_or(IdentityError::UserNotFound)?;

        if let Some(username) = update.username.as_deref() {
            if users.iter().any(|u| u.user.username == username && u.user.id != id) {
                return Err(IdentityError::UsernameTaken);
            }
        }

        if let Some(email) = update.email.as_deref() {
            if users.iter().any(|u| u.user.email == email && u.user.id != id) {
                return Err(IdentityError::EmailTaken);
            }
        }

        let stored = &mut users[index];
        if let Some(username) = update.username {
            stored.user.username = username;
        }
        if let Some(email) = update.email {
            stored.user.email = email;
        }
        if let Some(bio) = update.bio {
            stored.user.bio = bio;
        }
        let user = stored.user.clone();

        self.storage.set_json(USERS_KEY, &users)?;
        self.storage.set_json(USER_KEY, &user)?;
        self.current = Some(user.clone());

        Ok(user)
    }

    /// # Errors
    ///
    /// * [`IdentityError::NotAuthenticated`] if nobody is signed in.
    /// * [`IdentityError::IncorrectPassword`] if the current credential does
    ///   not match.
    /// * [`IdentityError::WeakPassword`] if the new credential is too short.
    pub(crate) fn change_password(&mut self, change: PasswordChange) -> Result<(), IdentityError> {
        self.simulate_latency();

        let id = self.current.as_ref().ok_or(IdentityError::NotAuthenticated)?.id.clone();

        let mut users = self.users()?;
        let stored = users
            .iter_mut()
            .find(|u| u.user.id == id)
            .ok_or(IdentityError::UserNotFound)?;

        if stored.password != change.current_password {
            return Err(IdentityError::IncorrectPassword);
        }

        if change.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::WeakPassword);
        }

        stored.password = change.new_password;
        self.storage.set_json(USERS_KEY, &users)?;

        Ok(())
    }

    fn users(&self) -> Result<Vec<StoredUser>, IdentityError> {
        Ok(self.storage.get_json(USERS_KEY)?.unwrap_or_default())
    }

    fn start_session(&mut self, user: &User) -> Result<(), IdentityError> {
        self.storage.set_json(TOKEN_KEY, &generate_token())?;
        self.storage.set_json(USER_KEY, user)?;
        self.current = Some(user.clone());
        Ok(())
    }

    fn clear_session(&mut self) -> Result<(), IdentityError> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;
        Ok(())
    }

    fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
    }
}

/// An opaque session token: `token_`, nine random base-36 digits, `_`, and
/// the current time in milliseconds.
fn generate_token() -> String {
    let random: String = (0..TOKEN_RANDOM_LEN)
        .filter_map(|_| char::from_digit(rand::random_range(0..36u32), 36))
        .collect();

    format!("token_{}_{}", random, Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests;
