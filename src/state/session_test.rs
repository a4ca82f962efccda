use super::*;
use crate::util::storage::MemoryStore;

fn repo_with(store: &MemoryStore) -> SessionRepository {
    SessionRepository::new(Arc::new(store.clone()), StorageKeys::default())
}

fn alice() -> Session {
    Session::new(UserRecord::new(serde_json::json!({ "id": "u1", "name": "Alice" })), "tok123")
}

// =============================================================
// UserRecord
// =============================================================

#[test]
fn user_record_exposes_id_and_display_name() {
    let user = UserRecord::new(serde_json::json!({ "id": "u1", "email": "a@b.test" }));
    assert_eq!(user.id(), Some("u1"));
    assert_eq!(user.display_name(), Some("a@b.test"));
}

#[test]
fn user_record_without_known_fields_has_no_labels() {
    let user = UserRecord::new(serde_json::json!(["not", "an", "object"]));
    assert_eq!(user.id(), None);
    assert_eq!(user.display_name(), None);
}

#[test]
fn session_debug_redacts_token() {
    let rendered = format!("{:?}", alice());
    assert!(rendered.contains("<redacted>"));
    assert!(!rendered.contains("tok123"));
}

// =============================================================
// read / write / clear
// =============================================================

#[test]
fn write_then_read_returns_same_session() {
    let store = MemoryStore::default();
    let repo = repo_with(&store);
    repo.write(&alice()).unwrap();
    assert_eq!(repo.read(), Some(alice()));
    assert_eq!(repo.read_token(), Some("tok123".to_owned()));
    assert_eq!(store.get("auth_token").unwrap(), Some("tok123".to_owned()));
}

#[test]
fn read_empty_storage_is_none() {
    let repo = repo_with(&MemoryStore::default());
    assert_eq!(repo.read(), None);
    assert_eq!(repo.read_token(), None);
}

#[test]
fn read_malformed_user_is_none() {
    let store = MemoryStore::default();
    store.set("auth_user", "{not json").unwrap();
    store.set("auth_token", "tok").unwrap();
    assert_eq!(repo_with(&store).read(), None);
}

#[test]
fn read_token_without_user_is_none() {
    let store = MemoryStore::default();
    store.set("auth_token", "tok").unwrap();
    assert_eq!(repo_with(&store).read_token(), None);
}

#[test]
fn read_user_without_token_is_none() {
    let store = MemoryStore::default();
    store.set("auth_user", r#"{"id":"u1"}"#).unwrap();
    assert_eq!(repo_with(&store).read(), None);
}

#[test]
fn read_null_user_is_none() {
    let store = MemoryStore::default();
    store.set("auth_user", "null").unwrap();
    assert_eq!(repo_with(&store).read(), None);
}

#[test]
fn clear_removes_both_keys() {
    let store = MemoryStore::default();
    let repo = repo_with(&store);
    repo.write(&alice()).unwrap();
    repo.clear().unwrap();
    assert!(store.is_empty());
}

#[test]
fn custom_keys_are_respected() {
    let store = MemoryStore::default();
    let keys = StorageKeys { user_key: "data".to_owned(), token_key: "token".to_owned() };
    let repo = SessionRepository::new(Arc::new(store.clone()), keys);
    repo.write(&alice()).unwrap();
    assert_eq!(store.get("token").unwrap(), Some("tok123".to_owned()));
    assert!(store.get("data").unwrap().is_some());
}

// =============================================================
// Atomic write
// =============================================================

#[test]
fn failed_user_write_leaves_no_token_behind() {
    // Room for the token entry but not the user entry.
    let store = MemoryStore::with_capacity_bytes(20);
    let repo = repo_with(&store);
    let err = repo.write(&alice()).unwrap_err();
    assert_eq!(err, StorageError::QuotaExceeded { key: "auth_user".to_owned() });
    assert!(store.is_empty());
}

#[test]
fn failed_user_write_restores_previous_token() {
    let small = MemoryStore::with_capacity_bytes(20);
    small.set("auth_token", "old").unwrap();
    let repo = repo_with(&small);
    assert!(repo.write(&alice()).is_err());
    assert_eq!(small.get("auth_token").unwrap(), Some("old".to_owned()));
    assert_eq!(small.get("auth_user").unwrap(), None);
}

// =============================================================
// heal
// =============================================================

#[test]
fn heal_removes_orphaned_token() {
    let store = MemoryStore::default();
    store.set("auth_token", "tok").unwrap();
    assert!(repo_with(&store).heal());
    assert!(store.is_empty());
}

#[test]
fn heal_removes_malformed_user() {
    let store = MemoryStore::default();
    store.set("auth_user", "{oops").unwrap();
    store.set("auth_token", "tok").unwrap();
    assert!(repo_with(&store).heal());
    assert!(store.is_empty());
}

#[test]
fn heal_keeps_complete_session() {
    let store = MemoryStore::default();
    let repo = repo_with(&store);
    repo.write(&alice()).unwrap();
    assert!(!repo.heal());
    assert_eq!(repo.read(), Some(alice()));
}

#[test]
fn null_user_record_is_not_present() {
    assert!(!UserRecord::new(serde_json::Value::Null).is_present());
    assert!(UserRecord::new(serde_json::json!({})).is_present());
}
