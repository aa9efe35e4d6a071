//! Offline inspection of access tokens.
//!
//! Tokens are compact JWS strings (`header.payload.signature`). Only the
//! payload's `exp` claim is read; the signature is the server's business.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token must have exactly three dot-separated segments")]
    Segments,
    #[error("token payload is not valid base64url")]
    Encoding,
    #[error("token payload is not a JSON object")]
    Payload,
    #[error("token payload has no numeric `exp` claim")]
    MissingExpiry,
}

/// Decode the `exp` claim (seconds since the Unix epoch) without verifying the signature.
pub fn decode_expiry(token: &str) -> Result<f64, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(TokenError::Segments);
    };
    if payload.is_empty() {
        return Err(TokenError::Segments);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| TokenError::Encoding)?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).map_err(|_| TokenError::Payload)?;
    let claims = claims.as_object().ok_or(TokenError::Payload)?;

    claims
        .get("exp")
        .and_then(serde_json::Value::as_f64)
        .ok_or(TokenError::MissingExpiry)
}

/// True when the token expired at or before `now_ms`, or cannot be decoded at all.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn is_expired_at(token: &str, now_ms: i64) -> bool {
    match decode_expiry(token) {
        Ok(exp) => exp * 1000.0 <= now_ms as f64,
        Err(e) => {
            tracing::debug!(error = %e, "treating undecodable token as expired");
            true
        }
    }
}

/// Wall-clock milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}
