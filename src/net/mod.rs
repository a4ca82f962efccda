//! Networking modules for the authenticated HTTP client.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` wraps every request with the session's bearer token and handles 401s;
//! `types` defines the request/response shapes it passes to a `Transport`.

pub mod api;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;
