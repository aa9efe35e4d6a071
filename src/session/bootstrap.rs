//! Startup rehydration of the session from the token store.

use super::store::TokenStore;
use super::token;
use super::{Session, SessionState};

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod tests;

/// Read the persisted session and decide whether it can be trusted.
///
/// Only a stored user together with an unexpired, decodable access token
/// yields an authenticated state. Every other shape fails closed: the state
/// is logged-out and the leftover entries are cleared from the store.
pub fn bootstrap(store: &dyn TokenStore, now_ms: i64) -> SessionState {
    let persisted = match store.load() {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "session store unreadable; starting logged out");
            if let Err(e) = store.clear() {
                tracing::warn!(error = %e, "failed to clear unreadable session store");
            }
            return SessionState::logged_out();
        }
    };

    if persisted.is_empty() {
        return SessionState::logged_out();
    }

    match persisted {
        Session { user: Some(user), access_token: Some(token), .. } if !token::is_expired_at(&token, now_ms) => {
            tracing::info!(user_id = user.id, role = %user.role, "restored persisted session");
            SessionState::authenticated(user, token)
        }
        Session { user, access_token, .. } => {
            let reason = match (&user, &access_token) {
                (Some(_), Some(_)) => "access token expired or malformed",
                (None, Some(_)) => "access token without user",
                (Some(_), None) => "user without access token",
                (None, None) => "refresh token without user",
            };
            tracing::info!(reason, "discarding persisted session");
            if let Err(e) = store.clear() {
                tracing::warn!(error = %e, "failed to clear stale session entries");
            }
            SessionState::logged_out()
        }
    }
}
