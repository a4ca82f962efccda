//! Authenticated HTTP client.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Elsewhere: an offline transport that fails every call, since these
//! endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every non-2xx answer comes back as `Err`. A 401 additionally ends the
//! session: one toast, storage and memory cleared together, and a delayed
//! navigation to the login view. The caller still receives
//! `ApiError::Unauthorized` so its own error UI runs.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::future::Future;

use leptos::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{AUTHORIZATION, ApiRequest, ApiResponse};
use crate::config::{ClientConfig, LOGIN_PATH};
use crate::state::auth::SessionStore;
use crate::state::notice::{NoticeKind, NoticeState};
use crate::util::redirect::RedirectScheduler;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

const UNAUTHORIZED: u16 = 401;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("session expired")]
    Unauthorized { body: String },
    #[error("request failed with status {status}")]
    Status { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("invalid request body: {0}")]
    Encode(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(UNAUTHORIZED),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Sends a fully prepared request to an absolute URL.
pub trait Transport {
    fn send(&self, url: String, request: ApiRequest) -> impl Future<Output = Result<ApiResponse, ApiError>>;
}

/// `fetch`-backed transport.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

impl Transport for GlooTransport {
    async fn send(&self, url: String, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            use gloo_net::http::Request;

            use super::types::Method;

            let mut builder = match request.method {
                Method::Get => Request::get(&url),
                Method::Post => Request::post(&url),
                Method::Put => Request::put(&url),
                Method::Patch => Request::patch(&url),
                Method::Delete => Request::delete(&url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let prepared = match request.body {
                Some(body) => builder.body(body),
                None => builder.build(),
            }
            .map_err(|e| ApiError::Transport(e.to_string()))?;

            let resp = prepared.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
            let status = resp.status();
            let body = resp.text().await.map_err(|e| ApiError::Decode(e.to_string()))?;
            Ok(ApiResponse { status, body })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (url, request);
            Err(ApiError::Transport("not available on server".to_owned()))
        }
    }
}

/// HTTP client that carries the session's bearer token and ends the session
/// when the server rejects it.
#[derive(Clone, Debug)]
pub struct AuthClient<T = GlooTransport> {
    config: ClientConfig,
    session: SessionStore,
    notices: RwSignal<NoticeState>,
    redirect: RedirectScheduler,
    transport: T,
}

impl<T: Transport> AuthClient<T> {
    pub fn new(
        config: ClientConfig,
        session: SessionStore,
        notices: RwSignal<NoticeState>,
        redirect: RedirectScheduler,
        transport: T,
    ) -> Self {
        Self { config, session, notices, redirect, transport }
    }

    /// Attach `Authorization: Bearer <token>` when storage holds a session.
    /// Storage is read at call time, so a login in another tab is picked up
    /// without waiting for the sync event.
    pub fn authorize(&self, mut request: ApiRequest) -> ApiRequest {
        if let Some(token) = self.session.repository().read_token() {
            request.set_header(AUTHORIZATION, &format!("Bearer {token}"));
        }
        request
    }

    /// Classify a transport result. Only a 401 on a session-bearing request
    /// has side effects.
    ///
    /// # Errors
    ///
    /// Returns the transport error unchanged, `Unauthorized` for 401, and
    /// `Status` for any other non-2xx answer.
    pub fn intercept(
        &self,
        request: &ApiRequest,
        result: Result<ApiResponse, ApiError>,
    ) -> Result<ApiResponse, ApiError> {
        let resp = result?;
        if resp.is_success() {
            return Ok(resp);
        }
        if resp.status == UNAUTHORIZED && request.expires_session_on_401 {
            self.expire_session();
            return Err(ApiError::Unauthorized { body: resp.body });
        }
        Err(ApiError::Status { status: resp.status, body: resp.body })
    }

    /// Authorize, send and intercept one request.
    ///
    /// # Errors
    ///
    /// See [`AuthClient::intercept`].
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let request = self.authorize(request);
        let url = self.config.endpoint(&request.path);
        let result = self.transport.send(url, request.clone()).await;
        self.intercept(&request, result)
    }

    /// `GET path` and decode the JSON answer.
    ///
    /// # Errors
    ///
    /// Returns any `send` error, or `Decode` for an unexpected body.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.send(ApiRequest::get(path)).await?.json()
    }

    /// `POST path` with a JSON body and decode the JSON answer.
    ///
    /// # Errors
    ///
    /// Returns `Encode` for an unserializable body, any `send` error, or
    /// `Decode` for an unexpected answer.
    pub async fn post_json<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        self.send(ApiRequest::post(path).json(body)?).await?.json()
    }

    /// Drop a navigation armed by an earlier 401, e.g. after signing in
    /// again. Returns whether one was pending.
    pub fn cancel_pending_redirect(&self) -> bool {
        self.redirect.cancel()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Forced logout after the server rejected the credential. Concurrent
    /// 401s collapse into one toast and one navigation.
    fn expire_session(&self) {
        let first = self.redirect.pending().is_none();
        if first {
            self.notices.update(|n| {
                n.push(NoticeKind::Error, SESSION_EXPIRED_MESSAGE);
            });
        }
        self.session.force_logout();
        if first {
            self.redirect.schedule(LOGIN_PATH, self.config.redirect_delay);
        }
    }
}
