//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route guards apply identical redirect rules, so the decision lives here as
//! plain functions over `AuthState`; the components in `components::guard`
//! only turn the outcome into a view. Cross-tab storage sync is wired here too.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

#[cfg(feature = "hydrate")]
use leptos::prelude::*;

use crate::config::{HOME_PATH, LOGIN_PATH};
use crate::state::auth::{AuthState, SessionStore};

/// What a guarded route should do for the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session matches the route; show the wrapped view.
    RenderChildren,
    /// Send the router to this path.
    RedirectTo(&'static str),
    /// Session not settled yet, or it doesn't match but we're already on
    /// the redirect target: render nothing.
    Hold,
}

/// Authenticated-only routes: children when signed in, otherwise `/login`.
/// Holds until the session has settled.
pub fn require_auth(state: &AuthState, current_path: &str) -> GuardOutcome {
    if !state.settled {
        GuardOutcome::Hold
    } else if state.is_authenticated() {
        GuardOutcome::RenderChildren
    } else {
        redirect_unless_current(LOGIN_PATH, current_path)
    }
}

/// Guest-only routes: children when signed out, otherwise `/`.
/// Holds until the session has settled.
pub fn require_guest(state: &AuthState, current_path: &str) -> GuardOutcome {
    if !state.settled {
        GuardOutcome::Hold
    } else if state.is_authenticated() {
        redirect_unless_current(HOME_PATH, current_path)
    } else {
        GuardOutcome::RenderChildren
    }
}

fn redirect_unless_current(target: &'static str, current_path: &str) -> GuardOutcome {
    if normalize_path(target) == normalize_path(current_path) {
        GuardOutcome::Hold
    } else {
        GuardOutcome::RedirectTo(target)
    }
}

fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// Keep `store` in step with writes made by other tabs.
///
/// Settles the store once mounted, then re-syncs on every window `storage`
/// event until the current reactive owner is cleaned up. The event payload is
/// ignored; the store re-reads both keys itself. Server renders never settle,
/// so guards there always hold. Plain native builds settle immediately.
pub fn install_storage_sync(store: &SessionStore) {
    #[cfg(not(any(feature = "hydrate", feature = "ssr")))]
    store.settle();

    #[cfg(feature = "ssr")]
    let _ = store;

    #[cfg(feature = "hydrate")]
    {
        let mount_store = store.clone();
        Effect::new(move |_| mount_store.settle());

        let listener_store = store.clone();
        let handle = window_event_listener(leptos::ev::storage, move |_ev| {
            listener_store.sync_from_storage();
        });
        on_cleanup(move || handle.remove());
    }
}
