use super::*;
use std::sync::Arc;

use crate::error::{ErrorKind, NOT_FOUND_MESSAGE, SERVER_ERROR_MESSAGE};
use crate::session::{MemoryTokenStore, Role, UserProfile};
use crate::ui::{Notice, UiEvent};

fn client() -> (ApiClient, tokio::sync::mpsc::UnboundedReceiver<UiEvent>) {
    let (events, rx) = UiEvents::channel();
    let session = SessionContext::new(Arc::new(MemoryTokenStore::new()));
    let config = ClientConfig::new("http://127.0.0.1:9/api").unwrap();
    (ApiClient::new(config, session, events).unwrap(), rx)
}

fn user() -> UserProfile {
    UserProfile {
        id: 1,
        username: "ada".into(),
        email: "ada@example.com".into(),
        role: Role::Editor,
        extra: serde_json::Map::new(),
    }
}

// =============================================================================
// finish / reject
// =============================================================================

#[test]
fn finish_passes_2xx_through_silently() {
    let (client, mut rx) = client();
    let response = ApiResponse { status: 201, body: "{}".into() };
    assert_eq!(client.finish(response.clone()).unwrap(), response);
    assert!(rx.try_recv().is_err());
}

#[test]
fn finish_maps_404_and_notifies() {
    let (client, mut rx) = client();
    let err = client.finish(ApiResponse { status: 404, body: String::new() }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(rx.try_recv().unwrap(), UiEvent::Notice(Notice::error(NOT_FOUND_MESSAGE)));
}

#[test]
fn finish_maps_503_and_notifies() {
    let (client, mut rx) = client();
    let err = client.finish(ApiResponse { status: 503, body: "upstream down".into() }).unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(rx.try_recv().unwrap(), UiEvent::Notice(Notice::error(SERVER_ERROR_MESSAGE)));
}

#[test]
fn finish_never_starts_a_refresh_for_401() {
    let (client, mut rx) = client();
    client.session().establish(user(), "a", "r").unwrap();

    let err = client.finish(ApiResponse { status: 401, body: r#"{"detail":"nope"}"#.into() }).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValidationError);
    assert!(client.session().is_authenticated());
    assert_eq!(rx.try_recv().unwrap(), UiEvent::Notice(Notice::error("nope")));
}

// =============================================================================
// end_session
// =============================================================================

#[test]
fn end_session_clears_and_redirects() {
    let (client, mut rx) = client();
    client.session().establish(user(), "a", "r").unwrap();

    client.end_session(&ApiError::AuthExpired);

    assert!(!client.session().is_authenticated());
    assert_eq!(client.session().refresh_token(), None);
    assert_eq!(rx.try_recv().unwrap(), UiEvent::Notice(Notice::error(SESSION_EXPIRED_MESSAGE)));
    assert_eq!(rx.try_recv().unwrap(), UiEvent::Redirect(Redirect::Login { from: None }));
}

// =============================================================================
// refreshed_token short-circuits (no network involved)
// =============================================================================

#[tokio::test]
async fn refresh_reuses_token_replaced_by_another_request() {
    let (client, _rx) = client();
    client.session().establish(user(), "fresh", "r").unwrap();

    let token = client.refreshed_token(Some("stale")).await.unwrap();

    assert_eq!(token, "fresh");
}

#[tokio::test]
async fn refresh_fails_when_session_already_cleared() {
    let (client, _rx) = client();
    let err = client.refreshed_token(Some("stale")).await.unwrap_err();
    assert!(matches!(err, RefreshFailure::SessionEnded));
}

#[tokio::test]
async fn refresh_without_refresh_token_is_auth_expired() {
    let (client, _rx) = client();
    let err = client.refreshed_token(None).await.unwrap_err();
    assert!(matches!(err, RefreshFailure::Failed(ApiError::AuthExpired)));
}

#[test]
fn attempt_state_labels() {
    assert_eq!(AttemptState::Initial.label(), "initial");
    assert_eq!(AttemptState::AwaitingRefresh { rejected_token: None }.label(), "awaiting_refresh");
    assert_eq!(AttemptState::Retried { token: "t".into() }.label(), "retried");
    assert_eq!(AttemptState::Failed(ApiError::AuthExpired).label(), "failed");
}
