use super::*;
use serde_json::json;

fn user(role: Role) -> UserProfile {
    UserProfile {
        id: 7,
        username: "ada".into(),
        email: "ada@example.com".into(),
        role,
        extra: serde_json::Map::new(),
    }
}

// =============================================================================
// Role
// =============================================================================

#[test]
fn role_deserializes_server_spelling() {
    let roles: Vec<Role> = serde_json::from_value(json!(["Viewer", "Editor", "Admin"])).unwrap();
    assert_eq!(roles, vec![Role::Reader, Role::Editor, Role::Admin]);
}

#[test]
fn role_deserializes_lowercase() {
    let roles: Vec<Role> = serde_json::from_value(json!(["reader", "editor", "admin", "viewer"])).unwrap();
    assert_eq!(roles, vec![Role::Reader, Role::Editor, Role::Admin, Role::Reader]);
}

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_value(Role::Editor).unwrap(), json!("editor"));
}

#[test]
fn role_rejects_unknown() {
    assert!(serde_json::from_value::<Role>(json!("Owner")).is_err());
    assert!("owner".parse::<Role>().is_err());
}

#[test]
fn role_from_str_is_case_insensitive() {
    assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
    assert_eq!(" Viewer ".parse::<Role>().unwrap(), Role::Reader);
}

#[test]
fn admin_satisfies_every_role() {
    for required in [Role::Reader, Role::Editor, Role::Admin] {
        assert!(Role::Admin.satisfies(required));
    }
}

#[test]
fn reader_does_not_satisfy_editor() {
    assert!(!Role::Reader.satisfies(Role::Editor));
    assert!(Role::Editor.satisfies(Role::Editor));
}

// =============================================================================
// UserProfile
// =============================================================================

#[test]
fn user_profile_accepts_api_shape_and_keeps_extras() {
    let profile: UserProfile = serde_json::from_value(json!({
        "id": 3,
        "name": "Grace",
        "email": "grace@example.com",
        "role": "Editor",
        "created_at": "2025-01-01T00:00:00Z"
    }))
    .unwrap();

    assert_eq!(profile.username, "Grace");
    assert_eq!(profile.role, Role::Editor);
    assert_eq!(profile.extra["created_at"], "2025-01-01T00:00:00Z");

    let back = serde_json::to_value(&profile).unwrap();
    assert_eq!(back["username"], "Grace");
    assert_eq!(back["created_at"], "2025-01-01T00:00:00Z");
}

#[test]
fn user_profile_requires_role() {
    assert!(serde_json::from_value::<UserProfile>(json!({ "id": 1, "name": "x" })).is_err());
}

// =============================================================================
// SessionState
// =============================================================================

#[test]
fn state_requires_user_and_token() {
    assert!(!SessionState::logged_out().is_authenticated());
    assert!(!SessionState { user: Some(user(Role::Reader)), token: None }.is_authenticated());
    assert!(!SessionState { user: None, token: Some("t".into()) }.is_authenticated());
    assert!(SessionState::authenticated(user(Role::Reader), "t").is_authenticated());
}

#[test]
fn state_role_follows_user() {
    assert_eq!(SessionState::logged_out().role(), None);
    assert_eq!(SessionState::authenticated(user(Role::Admin), "t").role(), Some(Role::Admin));
}

#[test]
fn session_is_empty() {
    assert!(Session::default().is_empty());
    assert!(!Session::new(user(Role::Reader), "a", "r").is_empty());
}
