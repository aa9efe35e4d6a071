//! Bearer-auth HTTP client with refresh-on-401.
//!
//! ARCHITECTURE
//! ============
//! Each `send` walks one small state machine:
//!
//! ```text
//! Initial --401--> AwaitingRefresh --ok--> Retried --> done (any outcome)
//!    |                   |
//!    +--other--> done    +--no refresh token / refresh error--> Failed
//! ```
//!
//! `Retried` never loops back, so a request is refreshed and resent at most
//! once no matter how the retry fares.
//!
//! TRADE-OFFS
//! ==========
//! Refreshes are single-flight per session. A request that reaches
//! `AwaitingRefresh` takes the session's refresh gate and then compares the
//! live access token with the one it was rejected with; if another request
//! already replaced it, the new token is reused and the refresh endpoint is
//! not called again. Requests queue behind one slow refresh instead of
//! stampeding the endpoint.

use serde::{Deserialize, Serialize};

use super::request::{ApiRequest, ApiResponse};
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::session::SessionContext;
use crate::ui::{Redirect, SESSION_EXPIRED_MESSAGE, UiEvents};

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

pub const REFRESH_PATH: &str = "/users/token/refresh/";

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    /// Present when the server rotates refresh tokens.
    refresh: Option<String>,
}

/// Why no fresh token could be obtained.
#[derive(Debug)]
enum RefreshFailure {
    /// Another request already ended the session for this expiry; nothing left to announce.
    SessionEnded,
    Failed(ApiError),
}

impl From<ApiError> for RefreshFailure {
    fn from(error: ApiError) -> Self {
        Self::Failed(error)
    }
}

#[derive(Debug)]
enum AttemptState {
    Initial,
    AwaitingRefresh { rejected_token: Option<String> },
    Retried { token: String },
    Failed(ApiError),
}

impl AttemptState {
    fn label(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::AwaitingRefresh { .. } => "awaiting_refresh",
            Self::Retried { .. } => "retried",
            Self::Failed(_) => "failed",
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    session: SessionContext,
    events: UiEvents,
}

impl ApiClient {
    /// Build a client that authorizes requests from `session` and reports to `events`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig, session: SessionContext, events: UiEvents) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("http client build failed: {e}")))?;
        Ok(Self { http, config, session, events })
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    #[must_use]
    pub fn events(&self) -> &UiEvents {
        &self.events
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `request` and decode a JSON reply.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from [`ApiClient::send`], or [`ApiError::Decode`].
    pub async fn json<T: serde::de::DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        self.send(request).await?.json()
    }

    /// Send `request` through the authorization pipeline.
    ///
    /// # Errors
    ///
    /// - [`ApiError::AuthExpired`] / [`ApiError::RefreshFailed`] after the
    ///   session has been cleared and a login redirect emitted.
    /// - Status-classified errors for every other non-2xx reply, after a notice.
    /// - [`ApiError::Network`] for transport failures and timeouts.
    pub async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let mut state = AttemptState::Initial;
        loop {
            tracing::trace!(path = %request.path, state = state.label(), "request attempt");
            state = match state {
                AttemptState::Initial => {
                    let token = self.session.access_token();
                    let response = match self.dispatch(&request, token.as_deref()).await {
                        Ok(response) => response,
                        Err(e) => return Err(self.reject(e)),
                    };
                    if response.status != 401 || !request.is_refreshable() {
                        return self.finish(response);
                    }
                    tracing::debug!(method = %request.method, path = %request.path, "unauthorized; refreshing token");
                    AttemptState::AwaitingRefresh { rejected_token: token }
                }
                AttemptState::AwaitingRefresh { rejected_token } => {
                    match self.refreshed_token(rejected_token.as_deref()).await {
                        Ok(token) => AttemptState::Retried { token },
                        Err(RefreshFailure::Failed(e)) => AttemptState::Failed(e),
                        Err(RefreshFailure::SessionEnded) => return Err(ApiError::AuthExpired),
                    }
                }
                AttemptState::Retried { token } => {
                    tracing::debug!(method = %request.method, path = %request.path, "retrying with refreshed token");
                    return match self.dispatch(&request, Some(&token)).await {
                        Ok(response) => self.finish(response),
                        Err(e) => Err(self.reject(e)),
                    };
                }
                AttemptState::Failed(error) => {
                    self.end_session(&error);
                    return Err(error);
                }
            };
        }
    }

    /// Send once with the current token and no side effects: no refresh,
    /// no notices, no session teardown. For best-effort calls whose failure
    /// the user should not hear about.
    pub(crate) async fn send_quietly(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let token = self.session.access_token();
        let response = self.dispatch(request, token.as_deref()).await?;
        if (200..300).contains(&response.status) {
            return Ok(response);
        }
        Err(ApiError::from_status(response.status, &response.body))
    }

    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> ApiResult<ApiResponse> {
        let builder = request.build(&self.http, self.config.url(&request.path), token)?;
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ApiResponse { status, body })
    }

    fn finish(&self, response: ApiResponse) -> ApiResult<ApiResponse> {
        if (200..300).contains(&response.status) {
            return Ok(response);
        }
        Err(self.reject(ApiError::from_status(response.status, &response.body)))
    }

    /// Announce a non-session error and hand it back for propagation.
    fn reject(&self, error: ApiError) -> ApiError {
        tracing::warn!(error = %error, kind = ?error.kind(), "api request failed");
        self.events.error(error.notice_message());
        error
    }

    fn end_session(&self, error: &ApiError) {
        tracing::warn!(error = %error, "ending session");
        self.session.clear();
        self.events.error(SESSION_EXPIRED_MESSAGE);
        self.events.redirect(Redirect::Login { from: None });
    }

    // -------------------------------------------------------------------------
    // Refresh
    // -------------------------------------------------------------------------

    /// Obtain an access token newer than `rejected`, refreshing at most once per expiry.
    async fn refreshed_token(&self, rejected: Option<&str>) -> Result<String, RefreshFailure> {
        let _gate = self.session.refresh_gate().await;

        match (self.session.access_token(), rejected) {
            (Some(current), rejected) if rejected != Some(current.as_str()) => {
                tracing::debug!("token already refreshed by a concurrent request");
                return Ok(current);
            }
            (None, Some(_)) => {
                tracing::debug!("session cleared while waiting for refresh");
                return Err(RefreshFailure::SessionEnded);
            }
            _ => {}
        }

        let Some(refresh_token) = self.session.refresh_token() else {
            tracing::info!("no refresh token stored");
            return Err(ApiError::AuthExpired.into());
        };

        let tokens = self.call_refresh(&refresh_token).await?;
        self.session
            .replace_tokens(&tokens.access, tokens.refresh.as_deref())
            .map_err(|e| ApiError::RefreshFailed(format!("could not persist refreshed token: {e}")))?;
        tracing::info!(rotated = tokens.refresh.is_some(), "access token refreshed");
        Ok(tokens.access)
    }

    async fn call_refresh(&self, refresh_token: &str) -> ApiResult<RefreshResponse> {
        let response = self
            .http
            .post(self.config.url(REFRESH_PATH))
            .json(&RefreshRequest { refresh: refresh_token })
            .send()
            .await
            .map_err(|e| ApiError::RefreshFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::RefreshFailed(format!("refresh endpoint returned HTTP {}", status.as_u16())));
        }

        response
            .json::<RefreshResponse>()
            .await
            .map_err(|e| ApiError::RefreshFailed(format!("unexpected refresh response: {e}")))
    }
}
