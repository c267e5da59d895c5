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

use chrono::{TimeZone, Utc};

use super::*;
use crate::storage::memory::MemoryStorage;

fn store() -> IdentityStore<MemoryStorage> {
    IdentityStore::new(MemoryStorage::new(), Duration::ZERO)
}

fn registration(username: &str, email: &str, password: &str) -> Registration {
    Registration {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        password: password.to_string(),
    }
}

fn registered() -> IdentityStore<MemoryStorage> {
    let mut store = store();
    store
        .register(registration("ada", "ada@example.com", "secret1"))
        .unwrap();
    store
}

#[test]
fn register_persists_user_and_starts_session() {
    let store = registered();

    let user = store.current_user().unwrap();
    assert_eq!(user.username, "ada");
    assert_eq!(user.role, "user");
    assert!(user.is_verified);
    assert!(store.is_authenticated().unwrap());

    let token = store.token().unwrap().unwrap();
    assert!(token.starts_with("token_"));

    let raw_user = store.storage.get(USER_KEY).unwrap().unwrap();
    assert!(!raw_user.contains("password"));
    assert!(raw_user.contains("\"_id\""));

    let users: Vec<StoredUser> = store.storage.get_json(USERS_KEY).unwrap().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].password, "secret1");
}

#[test]
fn register_with_taken_email_fails_without_touching_storage() {
    let mut store = registered();
    let before = store.storage.get(USERS_KEY).unwrap();

    let result = store.register(registration("grace", "ada@example.com", "secret2"));

    assert!(matches!(result, Err(IdentityError::UserExists)));
    assert_eq!(store.storage.get(USERS_KEY).unwrap(), before);
}

#[test]
fn register_with_taken_username_fails() {
    let mut store = registered();

    let result = store.register(registration("ada", "other@example.com", "secret2"));
    assert!(matches!(result, Err(IdentityError::UserExists)));
}

#[test]
fn register_validates_fields() {
    let mut store = store();

    assert!(matches!(
        store.register(registration("", "a@example.com", "secret1")),
        Err(IdentityError::MissingFields)
    ));
    assert!(matches!(
        store.register(registration("ada", "a@example.com", "12345")),
        Err(IdentityError::WeakPassword)
    ));
    assert_eq!(store.storage.get(USERS_KEY).unwrap(), None);
}

#[test]
fn login_with_wrong_password_or_unknown_email_fails() {
    let mut store = registered();
    store.logout().unwrap();

    assert!(matches!(
        store.login(credentials("ada@example.com", "wrong-secret")),
        Err(IdentityError::InvalidCredentials)
    ));
    assert!(matches!(
        store.login(credentials("nobody@example.com", "secret1")),
        Err(IdentityError::InvalidCredentials)
    ));
    assert!(matches!(
        store.login(credentials("ada@example.com", "")),
        Err(IdentityError::MissingCredentials)
    ));
    assert!(store.current_user().is_none());
}

#[test]
fn login_updates_last_login_in_storage() {
    let mut store = registered();
    store.logout().unwrap();

    let long_ago = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let mut users: Vec<StoredUser> = store.storage.get_json(USERS_KEY).unwrap().unwrap();
    users[0].user.last_login = long_ago;
    store.storage.set_json(USERS_KEY, &users).unwrap();

    let user = store.login(credentials("ada@example.com", "secret1")).unwrap();

    assert!(user.last_login > long_ago);
    let users: Vec<StoredUser> = store.storage.get_json(USERS_KEY).unwrap().unwrap();
    assert_eq!(users[0].user.last_login, user.last_login);
    assert!(store.is_authenticated().unwrap());
}

#[test]
fn logout_clears_session_keys() {
    let mut store = registered();

    store.logout().unwrap();

    assert!(store.current_user().is_none());
    assert!(!store.is_authenticated().unwrap());
    assert_eq!(store.storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(store.storage.get(USER_KEY).unwrap(), None);
    assert!(store.storage.get(USERS_KEY).unwrap().is_some());
}

#[test]
fn restore_session_picks_up_stored_user() {
    let storage = registered().storage;

    let mut store = IdentityStore::new(storage, Duration::ZERO);
    let user = store.restore_session().unwrap();

    assert_eq!(user.map(|u| u.username), Some("ada".to_string()));
    assert!(store.is_authenticated().unwrap());
}

#[test]
fn restore_session_with_corrupt_user_clears_session() {
    let mut storage = registered().storage;
    storage.set(USER_KEY, "{broken").unwrap();

    let mut store = IdentityStore::new(storage, Duration::ZERO);

    assert_eq!(store.restore_session().unwrap(), None);
    assert_eq!(store.storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(store.storage.get(USER_KEY).unwrap(), None);
}

#[test]
fn update_profile_requires_session_and_unique_username() {
    let mut store = registered();
    store.logout().unwrap();
    store.register(registration("grace", "grace@example.com", "secret2")).unwrap();

    let taken = store.update_profile(ProfileUpdate {
        username: Some("ada".into()),
        ..Default::default()
    });
    assert!(matches!(taken, Err(IdentityError::UsernameTaken)));

    let user = store
        .update_profile(ProfileUpdate {
            bio: Some("Compiler pioneer".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(user.bio, "Compiler pioneer");

    let stored: User = store.storage.get_json(USER_KEY).unwrap().unwrap();
    assert_eq!(stored.bio, "Compiler pioneer");

    store.logout().unwrap();
    assert!(matches!(
        store.update_profile(ProfileUpdate::default()),
        Err(IdentityError::NotAuthenticated)
    ));
}

#[test]
fn change_password_checks_current_credential() {
    let mut store = registered();

    let wrong = store.change_password(PasswordChange {
        current_password: "nope".into(),
        new_password: "secret9".into(),
    });
    assert!(matches!(wrong, Err(IdentityError::IncorrectPassword)));

    store
        .change_password(PasswordChange {
            current_password: "secret1".into(),
            new_password: "secret9".into(),
        })
        .unwrap();

    store.logout().unwrap();
    assert!(store.login(credentials("ada@example.com", "secret1")).is_err());
    assert!(store.login(credentials("ada@example.com", "secret9")).is_ok());
}

#[test]
fn tokens_have_the_expected_shape() {
    let token = generate_token();
    let parts: Vec<&str> = token.split('_').collect();

    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "token");
    assert_eq!(parts[1].len(), TOKEN_RANDOM_LEN);
    assert!(parts[2].parse::<i64>().is_ok());
}
