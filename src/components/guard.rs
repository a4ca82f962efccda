//! Route guards that render their children or redirect based on the session.
//!
//! Redirects are declarative (`<Redirect/>`), so the router owns navigation
//! and a guard never navigates to the page it is already on. Until the
//! session has settled after mount a guard renders nothing.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_location;

use crate::state::auth::{AuthState, SessionStore};
use crate::util::auth::{GuardOutcome, require_auth, require_guest};

/// Authenticated-only wrapper: children when signed in, otherwise `/login`.
#[component]
pub fn RequireAuth(session: SessionStore, children: ChildrenFn) -> impl IntoView {
    guarded(session, children, require_auth)
}

/// Guest-only wrapper: children when signed out, otherwise `/`.
#[component]
pub fn RequireGuest(session: SessionStore, children: ChildrenFn) -> impl IntoView {
    guarded(session, children, require_guest)
}

type Decide = fn(&AuthState, &str) -> GuardOutcome;

fn guarded(session: SessionStore, children: ChildrenFn, decide: Decide) -> impl IntoView {
    let location = use_location();
    let path = Signal::derive(move || location.pathname.get());
    let outcome = guard_outcome(session, path, decide);
    move || match outcome.get() {
        GuardOutcome::RenderChildren => children(),
        GuardOutcome::RedirectTo(target) => view! { <Redirect path=target/> }.into_any(),
        GuardOutcome::Hold => ().into_any(),
    }
}

/// Reactive guard decision for the session at `path`.
fn guard_outcome(session: SessionStore, path: Signal<String>, decide: Decide) -> Memo<GuardOutcome> {
    Memo::new(move |_| decide(&session.snapshot(), &path.get()))
}
