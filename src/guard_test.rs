use super::*;
use crate::session::UserProfile;

fn state(role: Role) -> SessionState {
    SessionState::authenticated(
        UserProfile {
            id: 5,
            username: "barbara".into(),
            email: "barbara@example.com".into(),
            role,
            extra: serde_json::Map::new(),
        },
        "token",
    )
}

#[test]
fn logged_out_redirects_to_login_with_origin() {
    let decision = check_access(&SessionState::logged_out(), None, "/dashboard");
    assert_eq!(decision, GuardDecision::Redirect(Redirect::Login { from: Some("/dashboard".into()) }));
}

#[test]
fn user_without_token_is_not_authenticated() {
    let mut partial = state(Role::Admin);
    partial.token = None;
    let decision = check_access(&partial, Some(Role::Admin), "/create-blog");
    assert!(matches!(decision, GuardDecision::Redirect(Redirect::Login { .. })));
}

#[test]
fn token_without_user_is_not_authenticated() {
    let partial = SessionState { user: None, token: Some("t".into()) };
    assert!(matches!(check_access(&partial, None, "/profile"), GuardDecision::Redirect(Redirect::Login { .. })));
}

#[test]
fn no_required_role_allows_any_signed_in_user() {
    assert!(check_access(&state(Role::Reader), None, "/profile").is_allowed());
}

#[test]
fn reader_denied_editor_view_goes_home() {
    assert_eq!(
        check_access(&state(Role::Reader), Some(Role::Editor), "/create-blog"),
        GuardDecision::Redirect(Redirect::Home)
    );
}

#[test]
fn editor_allowed_editor_view() {
    assert!(check_access(&state(Role::Editor), Some(Role::Editor), "/create-blog").is_allowed());
}

#[test]
fn editor_denied_admin_view() {
    assert_eq!(
        check_access(&state(Role::Editor), Some(Role::Admin), "/dashboard"),
        GuardDecision::Redirect(Redirect::Home)
    );
}

#[test]
fn admin_allowed_regardless_of_required_role() {
    for required in [None, Some(Role::Reader), Some(Role::Editor), Some(Role::Admin)] {
        assert!(check_access(&state(Role::Admin), required, "/dashboard").is_allowed());
    }
}
