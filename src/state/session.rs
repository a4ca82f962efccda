//! Session record and the repository that persists it.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionRepository` is the only code that knows the durable-storage key
//! names. The session store and the authenticated client both go through it,
//! so they can never disagree about where the user and token live.
//!
//! DESIGN
//! ======
//! A session is the user record *and* the token. Storage holding only one of
//! the two, or a user value that is not valid JSON, reads as no session at all.
//! `heal` deletes such leftovers so memory and storage agree again.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::StorageKeys;
use crate::util::storage::{KeyValueStore, StorageError};

/// Application-defined user record. The session layer never inspects its
/// shape beyond the optional display helpers below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(pub serde_json::Value);

impl UserRecord {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// A JSON `null` record stands for "no user", in memory and in storage.
    pub fn is_present(&self) -> bool {
        !self.0.is_null()
    }

    /// `id` field when the record is an object with a string id.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(serde_json::Value::as_str)
    }

    /// Best label for the record: `name`, then `email`, then `id`.
    pub fn display_name(&self) -> Option<&str> {
        ["name", "email", "id"]
            .iter()
            .find_map(|field| self.0.get(*field).and_then(serde_json::Value::as_str))
    }
}

/// Authenticated identity plus the bearer credential that proves it.
#[derive(Clone, PartialEq)]
pub struct Session {
    pub user: UserRecord,
    pub token: String,
}

impl Session {
    pub fn new(user: UserRecord, token: impl Into<String>) -> Self {
        Self { user, token: token.into() }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// What durable storage currently holds.
#[derive(Debug, PartialEq)]
enum Stored {
    Empty,
    Complete(Session),
    /// One key without the other, or an unreadable user value.
    Partial(&'static str),
}

/// Read/write/clear access to the persisted session.
#[derive(Clone)]
pub struct SessionRepository {
    backend: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl fmt::Debug for SessionRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRepository").field("keys", &self.keys).finish_non_exhaustive()
    }
}

impl SessionRepository {
    pub fn new(backend: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { backend, keys }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Persisted session, or `None` when storage is empty, half-written,
    /// malformed or unreachable.
    pub fn read(&self) -> Option<Session> {
        match self.inspect() {
            Ok(Stored::Complete(session)) => Some(session),
            Ok(Stored::Empty) => None,
            Ok(Stored::Partial(reason)) => {
                log::warn!("ignoring persisted session: {reason}");
                None
            }
            Err(e) => {
                log::warn!("session storage read failed: {e}");
                None
            }
        }
    }

    /// Token of the persisted session, if a complete session is stored.
    pub fn read_token(&self) -> Option<String> {
        self.read().map(|session| session.token)
    }

    /// Persist `session`. Either both keys hold the new values afterwards, or
    /// storage is restored to what it held before the call.
    ///
    /// # Errors
    ///
    /// Returns the first storage error; earlier writes are rolled back.
    pub fn write(&self, session: &Session) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(&session.user).map_err(|e| StorageError::Serialize {
            key: self.keys.user_key.clone(),
            message: e.to_string(),
        })?;
        let previous_token = self.backend.get(&self.keys.token_key)?;

        self.backend.set(&self.keys.token_key, &session.token)?;
        if let Err(e) = self.backend.set(&self.keys.user_key, &user_json) {
            let rollback = match &previous_token {
                Some(token) => self.backend.set(&self.keys.token_key, token),
                None => self.backend.remove(&self.keys.token_key),
            };
            if let Err(rollback_err) = rollback {
                log::error!("session write rollback failed: {rollback_err}");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Remove both keys. Both removals are attempted; the first error wins.
    ///
    /// # Errors
    ///
    /// Returns an error if either key could not be removed.
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.backend.remove(&self.keys.token_key);
        let user = self.backend.remove(&self.keys.user_key);
        token.and(user)
    }

    /// Delete a half-written or malformed session. Returns whether anything
    /// was removed.
    pub fn heal(&self) -> bool {
        match self.inspect() {
            Ok(Stored::Partial(reason)) => {
                log::info!("clearing inconsistent persisted session: {reason}");
                if let Err(e) = self.clear() {
                    log::warn!("failed to clear inconsistent session: {e}");
                    return false;
                }
                true
            }
            Ok(_) => false,
            Err(e) => {
                log::warn!("session storage read failed: {e}");
                false
            }
        }
    }

    fn inspect(&self) -> Result<Stored, StorageError> {
        let raw_user = self.backend.get(&self.keys.user_key)?;
        let token = self.backend.get(&self.keys.token_key)?;

        let user = match raw_user.as_deref().map(serde_json::from_str::<UserRecord>) {
            None => None,
            Some(Ok(user)) => Some(user).filter(UserRecord::is_present),
            Some(Err(_)) => return Ok(Stored::Partial("user record is not valid JSON")),
        };
        let token = token.filter(|t| !t.is_empty());

        Ok(match (user, token) {
            (None, None) => Stored::Empty,
            (Some(user), Some(token)) => Stored::Complete(Session { user, token }),
            (Some(_), None) => Stored::Partial("user record without token"),
            (None, Some(_)) => Stored::Partial("token without user record"),
        })
    }
}
