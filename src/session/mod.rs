//! Session model, persistence, and startup rehydration.
//!
//! DESIGN
//! ======
//! Three layers, leaves first:
//! - `store`: dumb key-value persistence of the three session entries.
//! - `token`: offline decoding of the access token's expiry claim.
//! - `bootstrap` + `context`: the in-memory `SessionState`, seeded from the
//!   store at startup and shared by the HTTP client and the route guard.
//!
//! INVARIANT
//! =========
//! A session counts as authenticated only when both a user and an access
//! token are present. Anything less is logged-out.

pub mod bootstrap;
pub mod context;
pub mod store;
pub mod token;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

pub use bootstrap::bootstrap;
pub use context::SessionContext;
pub use store::{FileTokenStore, MemoryTokenStore, StoreError, TokenStore};

// =============================================================================
// ROLE
// =============================================================================

/// Authorization role. The API speaks `Viewer`/`Editor`/`Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "Reader", alias = "Viewer", alias = "viewer", alias = "READER", alias = "VIEWER")]
    Reader,
    #[serde(alias = "Editor", alias = "EDITOR")]
    Editor,
    #[serde(alias = "Admin", alias = "ADMIN")]
    Admin,
}

impl Role {
    /// Whether this role may open a view that requires `required`. Admin satisfies everything.
    #[must_use]
    pub fn satisfies(self, required: Role) -> bool {
        self == Role::Admin || self == required
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Reader => "reader",
            Self::Editor => "editor",
            Self::Admin => "admin",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reader" | "viewer" => Ok(Self::Reader),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role `{other}`")),
        }
    }
}

// =============================================================================
// USER PROFILE
// =============================================================================

/// Signed-in user as returned by the API. Only `role` drives decisions here;
/// unrecognised fields ride along in `extra` so persistence is lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    #[serde(alias = "name", default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// =============================================================================
// SESSION
// =============================================================================

/// Everything the token store persists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(user: UserProfile, access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self { user: Some(user), access_token: Some(access_token.into()), refresh_token: Some(refresh_token.into()) }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// In-memory view of who is signed in. The refresh token deliberately stays
/// in the store and is only read when a refresh is needed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
}

impl SessionState {
    #[must_use]
    pub fn logged_out() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn authenticated(user: UserProfile, token: impl Into<String>) -> Self {
        Self { user: Some(user), token: Some(token.into()) }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }
}
