//! Login, registration and profile endpoints.
//!
//! DESIGN
//! ======
//! Login and registration are sent with refresh disabled: a 401 there means
//! bad credentials, not an expired session. Logout is best-effort remotely and
//! always clears the local session.

use serde::Serialize;

use super::types::{Ack, AuthResponse, Credentials, PasswordChange, ProfileUpdate, Registration};
use crate::error::{ApiError, ApiResult};
use crate::http::{ApiClient, ApiRequest};
use crate::session::UserProfile;

pub(crate) const LOGIN_PATH: &str = "/users/login/";
pub(crate) const REGISTER_PATH: &str = "/users/register/";
pub(crate) const LOGOUT_PATH: &str = "/users/logout/";
pub(crate) const PROFILE_PATH: &str = "/users/profile/";
pub(crate) const CHANGE_PASSWORD_PATH: &str = "/users/change-password/";

#[derive(Serialize)]
struct LogoutRequest<'a> {
    refresh_token: &'a str,
}

impl ApiClient {
    /// Authenticate and persist the returned session.
    ///
    /// # Errors
    ///
    /// Returns the classified API error, or [`ApiError::Store`] when the new
    /// session cannot be persisted.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<UserProfile> {
        let request = ApiRequest::post(LOGIN_PATH).json(credentials)?.without_refresh();
        let reply: AuthResponse = self.json(request).await?;
        self.start_session(reply)
    }

    /// Create an account; the server logs the new user in immediately.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::login`].
    pub async fn register(&self, registration: &Registration) -> ApiResult<UserProfile> {
        let request = ApiRequest::post(REGISTER_PATH).json(registration)?.without_refresh();
        let reply: AuthResponse = self.json(request).await?;
        self.start_session(reply)
    }

    /// Blacklist the refresh token remotely, then clear the local session.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.session().refresh_token() {
            if let Err(e) = self.remote_logout(&refresh_token).await {
                tracing::info!(error = %e, "remote logout failed; clearing locally");
            }
        }
        self.session().clear();
    }

    /// Fetch the current user's profile and store it.
    ///
    /// # Errors
    ///
    /// Returns the classified API error or [`ApiError::Store`].
    pub async fn profile(&self) -> ApiResult<UserProfile> {
        let user: UserProfile = self.json(ApiRequest::get(PROFILE_PATH)).await?;
        self.session().update_user(user.clone())?;
        Ok(user)
    }

    /// Update the current user's profile and store the server's copy.
    ///
    /// # Errors
    ///
    /// Returns the classified API error or [`ApiError::Store`].
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<UserProfile> {
        let user: UserProfile = self.json(ApiRequest::put(PROFILE_PATH).json(update)?).await?;
        self.session().update_user(user.clone())?;
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn change_password(&self, change: &PasswordChange) -> ApiResult<Ack> {
        self.json(ApiRequest::post(CHANGE_PASSWORD_PATH).json(change)?).await
    }

    async fn remote_logout(&self, refresh_token: &str) -> ApiResult<()> {
        let request = ApiRequest::post(LOGOUT_PATH).json(&LogoutRequest { refresh_token })?.without_refresh();
        self.send_quietly(&request).await.map(|_| ())
    }

    fn start_session(&self, reply: AuthResponse) -> ApiResult<UserProfile> {
        self.session()
            .establish(reply.user.clone(), &reply.tokens.access, &reply.tokens.refresh)
            .map_err(ApiError::from)?;
        if let Some(message) = reply.message.filter(|m| !m.trim().is_empty()) {
            self.events().success(message);
        }
        Ok(reply.user)
    }
}
