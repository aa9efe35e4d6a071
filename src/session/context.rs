//! Shared, explicitly-passed session handle.
//!
//! DESIGN
//! ======
//! `SessionContext` pairs the authoritative in-memory `SessionState` with the
//! `TokenStore` that backs it. Every mutation writes the store first and the
//! in-memory state second, so a crash between the two never leaves memory
//! claiming a session the store does not have.
//!
//! The context also owns the refresh gate: an async mutex that serializes
//! token refreshes so concurrent 401s share a single refresh call.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::{Mutex, MutexGuard};

use super::store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, StoreError, TokenStore, USER_KEY};
use super::{Session, SessionState, UserProfile, bootstrap, token};

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;

#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

struct Inner {
    state: RwLock<SessionState>,
    store: Arc<dyn TokenStore>,
    refresh_gate: Mutex<()>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext").field("state", &self.snapshot()).finish_non_exhaustive()
    }
}

impl SessionContext {
    /// A logged-out context over `store`. The store is not read.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self::with_state(store, SessionState::logged_out())
    }

    /// Run the bootstrapper against `store` at the current wall-clock time.
    #[must_use]
    pub fn bootstrap(store: Arc<dyn TokenStore>) -> Self {
        Self::bootstrap_at(store, token::now_ms())
    }

    #[must_use]
    pub fn bootstrap_at(store: Arc<dyn TokenStore>, now_ms: i64) -> Self {
        let state = bootstrap(store.as_ref(), now_ms);
        Self::with_state(store, state)
    }

    fn with_state(store: Arc<dyn TokenStore>, state: SessionState) -> Self {
        Self { inner: Arc::new(Inner { state: RwLock::new(state), store, refresh_gate: Mutex::new(()) }) }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner).token.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner).is_authenticated()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner).user.clone()
    }

    /// Refresh token as currently persisted. Read errors count as absent.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        match self.inner.store.get(REFRESH_TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "refresh token unreadable");
                None
            }
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.store
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Start a session after a successful login: persist, then publish.
    ///
    /// # Errors
    ///
    /// Returns the store error; in-memory state is left untouched in that case.
    pub fn establish(
        &self,
        user: UserProfile,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), StoreError> {
        self.inner.store.save(&Session::new(user.clone(), access_token, refresh_token))?;
        tracing::info!(user_id = user.id, role = %user.role, "session established");
        *self.write_state() = SessionState::authenticated(user, access_token);
        Ok(())
    }

    /// Swap in a freshly issued access token (and a rotated refresh token, if any).
    ///
    /// # Errors
    ///
    /// Returns the store error; in-memory state is left untouched in that case.
    pub fn replace_tokens(&self, access_token: &str, refresh_token: Option<&str>) -> Result<(), StoreError> {
        self.inner.store.set(ACCESS_TOKEN_KEY, access_token)?;
        if let Some(refresh_token) = refresh_token {
            self.inner.store.set(REFRESH_TOKEN_KEY, refresh_token)?;
        }
        self.write_state().token = Some(access_token.to_owned());
        Ok(())
    }

    /// Replace the stored profile (after a profile fetch or edit).
    ///
    /// # Errors
    ///
    /// Returns the store error when the profile cannot be persisted.
    pub fn update_user(&self, user: UserProfile) -> Result<(), StoreError> {
        self.inner.store.set(USER_KEY, &serde_json::to_string(&user)?)?;
        self.write_state().user = Some(user);
        Ok(())
    }

    /// Destroy the session: memory is logged-out even if clearing the store fails.
    pub fn clear(&self) {
        if let Err(e) = self.inner.store.clear() {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
        *self.write_state() = SessionState::logged_out();
        tracing::info!("session cleared");
    }

    /// Serialize refreshes. Holders must re-check the access token after acquiring.
    pub(crate) async fn refresh_gate(&self) -> MutexGuard<'_, ()> {
        self.inner.refresh_gate.lock().await
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
