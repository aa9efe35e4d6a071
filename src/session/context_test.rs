use super::*;
use crate::session::store::MemoryTokenStore;
use crate::session::Role;

fn user(role: Role) -> UserProfile {
    UserProfile {
        id: 2,
        username: "margaret".into(),
        email: "margaret@example.com".into(),
        role,
        extra: serde_json::Map::new(),
    }
}

fn context() -> (SessionContext, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::new());
    (SessionContext::new(store.clone()), store)
}

#[test]
fn new_context_is_logged_out_without_reading_store() {
    let store = Arc::new(MemoryTokenStore::new());
    store.save(&Session::new(user(Role::Admin), "a", "r")).unwrap();

    let ctx = SessionContext::new(store.clone());

    assert!(!ctx.is_authenticated());
    assert_eq!(store.len(), 3);
}

#[test]
fn establish_persists_then_authenticates() {
    let (ctx, store) = context();
    ctx.establish(user(Role::Editor), "access-1", "refresh-1").unwrap();

    assert!(ctx.is_authenticated());
    assert_eq!(ctx.access_token().as_deref(), Some("access-1"));
    assert_eq!(ctx.refresh_token().as_deref(), Some("refresh-1"));
    assert_eq!(store.load().unwrap().user, Some(user(Role::Editor)));
}

#[test]
fn replace_tokens_updates_memory_and_store() {
    let (ctx, store) = context();
    ctx.establish(user(Role::Reader), "old", "refresh-1").unwrap();

    ctx.replace_tokens("new", None).unwrap();

    assert_eq!(ctx.access_token().as_deref(), Some("new"));
    assert_eq!(store.load().unwrap().access_token.as_deref(), Some("new"));
    assert_eq!(ctx.refresh_token().as_deref(), Some("refresh-1"));
}

#[test]
fn replace_tokens_stores_rotated_refresh_token() {
    let (ctx, _store) = context();
    ctx.establish(user(Role::Reader), "old", "refresh-1").unwrap();

    ctx.replace_tokens("new", Some("refresh-2")).unwrap();

    assert_eq!(ctx.refresh_token().as_deref(), Some("refresh-2"));
}

#[test]
fn update_user_replaces_profile() {
    let (ctx, store) = context();
    ctx.establish(user(Role::Reader), "a", "r").unwrap();

    let mut promoted = user(Role::Editor);
    promoted.username = "maggie".into();
    ctx.update_user(promoted.clone()).unwrap();

    assert_eq!(ctx.user(), Some(promoted.clone()));
    assert_eq!(store.load().unwrap().user, Some(promoted));
}

#[test]
fn clear_wipes_memory_and_store() {
    let (ctx, store) = context();
    ctx.establish(user(Role::Admin), "a", "r").unwrap();

    ctx.clear();

    assert_eq!(ctx.snapshot(), SessionState::logged_out());
    assert!(store.is_empty());
    assert_eq!(ctx.refresh_token(), None);
}

#[test]
fn clones_share_state() {
    let (ctx, _store) = context();
    let other = ctx.clone();
    ctx.establish(user(Role::Reader), "a", "r").unwrap();
    assert!(other.is_authenticated());
}

#[test]
fn bootstrap_at_reads_store() {
    let store = Arc::new(MemoryTokenStore::new());
    store.save(&Session::new(user(Role::Reader), "not-a-jwt", "r")).unwrap();

    let ctx = SessionContext::bootstrap_at(store.clone(), 0);

    assert!(!ctx.is_authenticated());
    assert!(store.is_empty());
}

#[tokio::test]
async fn refresh_gate_is_exclusive() {
    let (ctx, _store) = context();
    let guard = ctx.refresh_gate().await;
    assert!(ctx.inner.refresh_gate.try_lock().is_err());
    drop(guard);
    assert!(ctx.inner.refresh_gate.try_lock().is_ok());
}
