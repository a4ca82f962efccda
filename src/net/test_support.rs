//! Scripted transport and client wiring shared by network and page tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use leptos::prelude::*;

use super::api::{ApiError, AuthClient, Transport};
use super::types::{ApiRequest, ApiResponse};
use crate::config::{ClientConfig, StorageKeys};
use crate::state::auth::SessionStore;
use crate::state::notice::NoticeState;
use crate::state::session::{SessionRepository, UserRecord};
use crate::util::redirect::RedirectScheduler;
use crate::util::storage::MemoryStore;

/// Transport answering from a queue (200 `{}` once drained) and recording
/// every request it was handed.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<Result<ApiResponse, ApiError>>>>,
    sent: Arc<Mutex<Vec<(String, ApiRequest)>>>,
}

impl MockTransport {
    pub fn respond(&self, result: Result<ApiResponse, ApiError>) {
        self.responses.lock().unwrap().push_back(result);
    }

    pub fn last_sent(&self) -> (String, ApiRequest) {
        self.sent.lock().unwrap().last().cloned().unwrap()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    async fn send(&self, url: String, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.sent.lock().unwrap().push((url, request));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::new(200, "{}")))
    }
}

pub struct Harness {
    pub backend: MemoryStore,
    pub transport: MockTransport,
    pub notices: RwSignal<NoticeState>,
    pub redirect: RedirectScheduler,
    pub client: AuthClient<MockTransport>,
}

pub fn harness() -> Harness {
    let backend = MemoryStore::default();
    let repo = SessionRepository::new(Arc::new(backend.clone()), StorageKeys::default());
    let session = SessionStore::new(repo);
    let transport = MockTransport::default();
    let notices = RwSignal::new(NoticeState::default());
    let redirect = RedirectScheduler::default();
    let client = AuthClient::new(ClientConfig::default(), session, notices, redirect.clone(), transport.clone());
    Harness { backend, transport, notices, redirect, client }
}

pub fn user(id: &str) -> UserRecord {
    UserRecord::new(serde_json::json!({ "id": id }))
}
