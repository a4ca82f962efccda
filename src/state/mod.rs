//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `session` owns the persisted record and its storage keys, `auth` the
//! reactive mirror the UI reads, `notice` the toast queue.

pub mod auth;
pub mod notice;
pub mod session;
