//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_SESSION_FILE: &str = ".blog-session.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, without a trailing slash (e.g. `http://127.0.0.1:8000/api`).
    pub base_url: String,
    /// Whole-request timeout. Exceeding it is a network error, never a refresh trigger.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Where `FileTokenStore` keeps the persisted session.
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Config for `base_url` with default timeouts and session file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] unless the URL is `http://` or `https://`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        })
    }

    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `BLOG_API_BASE_URL`: default `http://127.0.0.1:8000/api`
    /// - `BLOG_API_TIMEOUT_SECS`: default 10
    /// - `BLOG_API_CONNECT_TIMEOUT_SECS`: default 5
    /// - `BLOG_SESSION_FILE`: default `.blog-session.json`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for a base URL without an HTTP scheme.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("BLOG_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let session_file = std::env::var("BLOG_SESSION_FILE").unwrap_or_else(|_| DEFAULT_SESSION_FILE.to_owned());

        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            timeout: Duration::from_secs(env_parse("BLOG_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)),
            connect_timeout: Duration::from_secs(env_parse(
                "BLOG_API_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
            session_file: PathBuf::from(session_file),
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    /// Join an endpoint path onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.trim_end_matches('/').to_owned())
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
