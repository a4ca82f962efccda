//! Reusable UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! `guard` wraps routes with session-based redirects; `toast` renders the
//! transient notice queue.

pub mod guard;
pub mod toast;
