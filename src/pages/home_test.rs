use futures::executor::block_on;
use leptos::prelude::*;

use super::*;
use crate::net::test_support::{harness, user};
use crate::net::types::ApiResponse;

#[test]
fn greeting_uses_display_name_when_available() {
    let named = UserRecord::new(serde_json::json!({ "id": "u1", "name": "Alice" }));
    assert_eq!(greeting(Some(&named)), "Signed in as Alice");
    assert_eq!(greeting(Some(&UserRecord::new(serde_json::json!(42)))), "Signed in");
    assert_eq!(greeting(None), "Signed in");
}

#[test]
fn load_profile_returns_server_record() {
    let h = harness();
    h.client.session().login(user("u1"), "tok").unwrap();
    h.transport.respond(Ok(ApiResponse::new(200, r#"{"id":"u1","name":"Alice"}"#)));

    let profile = block_on(load_profile(&h.client)).unwrap();
    assert_eq!(profile.display_name(), Some("Alice"));
    assert_eq!(h.transport.last_sent().0, "/api/auth/me");
}

#[test]
fn load_profile_with_expired_token_ends_session() {
    let h = harness();
    h.client.session().login(user("u1"), "tok").unwrap();
    h.transport.respond(Ok(ApiResponse::new(401, "")));

    let err = block_on(load_profile(&h.client)).unwrap_err();
    assert_eq!(err, "Could not load profile: session expired");
    assert!(!h.client.session().is_authenticated());
    assert_eq!(h.notices.get_untracked().notices.len(), 1);
}
