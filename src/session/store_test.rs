use super::*;
use crate::session::Role;

fn user() -> UserProfile {
    UserProfile {
        id: 1,
        username: "ada".into(),
        email: "ada@example.com".into(),
        role: Role::Editor,
        extra: serde_json::Map::new(),
    }
}

fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("blog-client-store-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let _ = std::fs::remove_file(&path);
    path
}

// =============================================================================
// MemoryTokenStore
// =============================================================================

#[test]
fn memory_load_when_never_set_is_empty() {
    let store = MemoryTokenStore::new();
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn memory_save_then_load() {
    let store = MemoryTokenStore::new();
    let session = Session::new(user(), "access", "refresh");
    store.save(&session).unwrap();

    assert_eq!(store.load().unwrap(), session);
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("access"));
    assert_eq!(store.get(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("refresh"));
    assert_eq!(store.len(), 3);
}

#[test]
fn memory_clear_removes_all_three() {
    let store = MemoryTokenStore::new();
    store.save(&Session::new(user(), "a", "r")).unwrap();
    store.clear().unwrap();
    assert!(store.is_empty());
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn save_removes_absent_parts() {
    let store = MemoryTokenStore::new();
    store.save(&Session::new(user(), "a", "r")).unwrap();
    store
        .save(&Session { user: Some(user()), access_token: Some("b".into()), refresh_token: None })
        .unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.access_token.as_deref(), Some("b"));
    assert_eq!(loaded.refresh_token, None);
}

#[test]
fn corrupt_user_entry_loads_as_absent() {
    let store = MemoryTokenStore::new();
    store.set(ACCESS_TOKEN_KEY, "a").unwrap();
    store.set(USER_KEY, "{not json").unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.user, None);
    assert_eq!(loaded.access_token.as_deref(), Some("a"));
}

// =============================================================================
// FileTokenStore
// =============================================================================

#[test]
fn file_missing_reads_as_empty() {
    let store = FileTokenStore::new(temp_path("missing.json"));
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn file_round_trip_survives_new_instance() {
    let path = temp_path("roundtrip.json");
    FileTokenStore::new(&path).save(&Session::new(user(), "a", "r")).unwrap();

    let reopened = FileTokenStore::new(&path);
    let loaded = reopened.load().unwrap();
    assert_eq!(loaded.user, Some(user()));
    assert_eq!(loaded.access_token.as_deref(), Some("a"));
    assert_eq!(loaded.refresh_token.as_deref(), Some("r"));
}

#[test]
fn file_uses_fixed_key_names() {
    let path = temp_path("keys.json");
    FileTokenStore::new(&path).save(&Session::new(user(), "a", "r")).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["token"], "a");
    assert_eq!(raw["refreshToken"], "r");
    assert!(raw["user"].is_string());
}

#[test]
fn file_clear_deletes_file() {
    let path = temp_path("clear.json");
    let store = FileTokenStore::new(&path);
    store.save(&Session::new(user(), "a", "r")).unwrap();
    assert!(path.exists());

    store.clear().unwrap();
    assert!(!path.exists());
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn file_set_single_entry_keeps_others() {
    let path = temp_path("partial.json");
    let store = FileTokenStore::new(&path);
    store.save(&Session::new(user(), "a", "r")).unwrap();
    store.set(ACCESS_TOKEN_KEY, "b").unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.access_token.as_deref(), Some("b"));
    assert_eq!(loaded.refresh_token.as_deref(), Some("r"));
}

#[test]
fn file_with_garbage_reads_as_empty() {
    let path = temp_path("garbage.json");
    std::fs::write(&path, "{ not json").unwrap();
    let store = FileTokenStore::new(&path);
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn garbage_file_bootstraps_logged_out_and_accepts_a_new_session() {
    let path = temp_path("garbage-then-login.json");
    std::fs::write(&path, "{ not json").unwrap();
    let store = FileTokenStore::new(&path);

    let state = crate::session::bootstrap(&store, 0);
    assert!(!state.is_authenticated());

    store.save(&Session::new(user(), "a", "r")).unwrap();
    let loaded = store.load().unwrap();
    assert_eq!(loaded.access_token.as_deref(), Some("a"));
    assert_eq!(loaded.user, Some(user()));

    store.clear().unwrap();
    assert!(!path.exists());
}

#[cfg(unix)]
#[test]
fn file_is_private_to_owner() {
    use std::os::unix::fs::PermissionsExt;

    let path = temp_path("mode.json");
    let store = FileTokenStore::new(&path);
    store.save(&Session::new(user(), "a", "r")).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
