//! Delayed, cancelable full-page navigation.
//!
//! SYSTEM CONTEXT
//! ==============
//! After a 401 the client shows a toast and only then sends the whole page to
//! the login view. The wait runs on a browser timer and is tied to the root
//! component: cleanup cancels it, and only one navigation can be armed at once.
//!
//! Outside the browser nothing fires; `pending()` still reports what would.

#[cfg(test)]
#[path = "redirect_test.rs"]
mod redirect_test;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRedirect {
    pub path: String,
    pub delay: Duration,
}

#[derive(Debug)]
struct Armed {
    pending: PendingRedirect,
    cancelled: Arc<AtomicBool>,
}

/// Single-slot scheduler shared by everything that can force a navigation.
#[derive(Clone, Debug, Default)]
pub struct RedirectScheduler {
    slot: Arc<Mutex<Option<Armed>>>,
}

impl RedirectScheduler {
    /// Arm a navigation to `path` after `delay`. Returns `false` and changes
    /// nothing when a navigation is already armed.
    pub fn schedule(&self, path: &str, delay: Duration) -> bool {
        let mut slot = self.lock_slot();
        if slot.is_some() {
            return false;
        }
        let cancelled = Arc::new(AtomicBool::new(false));
        *slot = Some(Armed {
            pending: PendingRedirect { path: path.to_owned(), delay },
            cancelled: cancelled.clone(),
        });
        drop(slot);

        #[cfg(feature = "hydrate")]
        spawn_navigation(self.slot.clone(), path.to_owned(), delay, cancelled);
        #[cfg(not(feature = "hydrate"))]
        drop(cancelled);

        true
    }

    /// The armed navigation, if any.
    pub fn pending(&self) -> Option<PendingRedirect> {
        self.lock_slot().as_ref().map(|armed| armed.pending.clone())
    }

    /// Disarm the pending navigation. Returns whether one was armed.
    pub fn cancel(&self) -> bool {
        match self.lock_slot().take() {
            Some(armed) => {
                armed.cancelled.store(true, Ordering::Relaxed);
                log::info!("cancelled pending redirect to {}", armed.pending.path);
                true
            }
            None => false,
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<Armed>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(feature = "hydrate")]
fn spawn_navigation(slot: Arc<Mutex<Option<Armed>>>, path: String, delay: Duration, cancelled: Arc<AtomicBool>) {
    leptos::task::spawn_local(async move {
        gloo_timers::future::sleep(delay).await;
        if cancelled.load(Ordering::Relaxed) {
            return;
        }
        let navigated = match web_sys::window() {
            Some(window) => window.location().set_href(&path).map_err(|e| format!("{e:?}")),
            None => Err("no window".to_owned()),
        };
        if let Err(e) = navigated {
            log::error!("redirect to {path} failed: {e}");
            // Free the slot so a later 401 can try again.
            let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            if guard.as_ref().is_some_and(|armed| Arc::ptr_eq(&armed.cancelled, &cancelled)) {
                *guard = None;
            }
        }
    });
}
