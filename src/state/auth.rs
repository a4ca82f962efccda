//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionStore` is created once by the root component and handed to every
//! guard, page and client that needs it. It owns the reactive in-memory mirror
//! of the session; durable storage behind it is shared with other tabs and
//! reached only through `SessionRepository`.
//!
//! SETTLING
//! ========
//! A fresh store starts unsettled: its session came from whatever storage the
//! build can see, which on the server is nothing. Guards hold until `settle`
//! runs after mount, so server and hydrating client render the same markup.
//!
//! ERROR HANDLING
//! ==============
//! `login` reports storage failures to the caller and leaves memory untouched.
//! `logout` and `force_logout` never fail: memory is always cleared and storage
//! errors are logged, so tearing down UI can't be blocked by a logout.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;

use crate::config::ClientConfig;
use crate::state::session::{Session, SessionRepository, UserRecord};
use crate::util::storage::{StorageError, default_backend};

/// Authentication state: the current session, if any.
///
/// User and token live in one `Option<Session>`, so "user present" and
/// "token present" can't drift apart in memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
    /// Set once durable storage has been consulted in the mounted client.
    pub settled: bool,
}

impl AuthState {
    /// Settled state holding `session`.
    pub fn settled(session: Option<Session>) -> Self {
        Self { session, settled: true }
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("access token is empty")]
    EmptyToken,
    #[error("user record is missing")]
    MissingUser,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Handle to the process-wide session. Cheap to clone; clones share state.
#[derive(Clone, Debug)]
pub struct SessionStore {
    state: RwSignal<AuthState>,
    repo: SessionRepository,
}

impl SessionStore {
    /// Load the persisted session, discarding half-written or malformed data.
    pub fn new(repo: SessionRepository) -> Self {
        repo.heal();
        let session = repo.read();
        Self { state: RwSignal::new(AuthState { session, settled: false }), repo }
    }

    /// Store backed by the build's default storage (`localStorage` in the
    /// browser).
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(SessionRepository::new(default_backend(), config.storage_keys.clone()))
    }

    /// Persist and adopt a new session.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty token, a `null` user, or when storage
    /// rejects the write. In every case neither memory nor storage changes.
    pub fn login(&self, user: UserRecord, token: impl Into<String>) -> Result<(), LoginError> {
        let token = token.into();
        if token.is_empty() {
            return Err(LoginError::EmptyToken);
        }
        if !user.is_present() {
            return Err(LoginError::MissingUser);
        }
        let session = Session::new(user, token);
        self.repo.write(&session)?;
        self.state.set(AuthState::settled(Some(session)));
        Ok(())
    }

    /// Drop the session from memory and storage. Safe to call repeatedly.
    pub fn logout(&self) {
        self.state.set(AuthState::settled(None));
        if let Err(e) = self.repo.clear() {
            log::error!("logout could not clear session storage: {e}");
        }
    }

    /// Logout triggered by the server rejecting the credential. Returns
    /// whether a session was active.
    pub fn force_logout(&self) -> bool {
        let was_active = self.state.with_untracked(AuthState::is_authenticated);
        self.logout();
        log::info!("session invalidated by server (active: {was_active})");
        was_active
    }

    /// Re-read durable storage after another tab changed it.
    pub fn sync_from_storage(&self) {
        let session = self.repo.read();
        if self.state.with_untracked(|s| s.session != session) {
            self.state.update(|s| s.session = session);
        }
    }

    /// Adopt whatever storage holds now and let guards act on it.
    pub fn settle(&self) {
        self.sync_from_storage();
        if !self.state.with_untracked(|s| s.settled) {
            self.state.update(|s| s.settled = true);
        }
    }

    pub fn is_settled(&self) -> bool {
        self.state.with(|s| s.settled)
    }

    /// Reactive view of the whole state.
    pub fn state(&self) -> ReadSignal<AuthState> {
        self.state.read_only()
    }

    /// Tracked copy of the current state.
    pub fn snapshot(&self) -> AuthState {
        self.state.get()
    }

    pub fn user(&self) -> Option<UserRecord> {
        self.state.with(|s| s.user().cloned())
    }

    pub fn token(&self) -> Option<String> {
        self.state.with(|s| s.token().map(str::to_owned))
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(AuthState::is_authenticated)
    }

    pub fn repository(&self) -> &SessionRepository {
        &self.repo
    }
}
