//! Request/response shapes for the authenticated client.
//!
//! DESIGN
//! ======
//! Requests are plain data until a `Transport` sends them, so header injection
//! and 401 handling can be tested without a browser or a server.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::api::ApiError;
use crate::state::session::UserRecord;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured API base URL.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Whether a 401 answer means the stored session is dead. Credential
    /// checks (the login call itself) turn this off.
    pub expires_session_on_401: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            expires_session_on_401: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body and matching content type.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Encode` if `body` cannot be serialized.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let raw = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.set_header(CONTENT_TYPE, "application/json");
        self.body = Some(raw);
        Ok(self)
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    #[must_use]
    pub fn without_session_expiry(mut self) -> Self {
        self.expires_session_on_401 = false;
        self
    }

    /// Set `name`, replacing any existing value (names compare ASCII
    /// case-insensitively, as in HTTP).
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.push((name.to_owned(), value.to_owned()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Decode` when the body doesn't match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Credentials posted by the login form.
#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login answer: user details plus the bearer token.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    pub user: UserRecord,
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,
}
