//! Newsletter subscription endpoints. Both are anonymous-friendly; a bearer
//! token is still attached when a session exists.

use super::types::{Ack, NewsletterEmail};
use crate::error::ApiResult;
use crate::http::{ApiClient, ApiRequest};

pub(crate) const SUBSCRIBE_PATH: &str = "/newsletter/subscribe/";
pub(crate) const UNSUBSCRIBE_PATH: &str = "/newsletter/unsubscribe/";

impl ApiClient {
    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn subscribe(&self, email: &str) -> ApiResult<Ack> {
        self.newsletter(SUBSCRIBE_PATH, email).await
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn unsubscribe(&self, email: &str) -> ApiResult<Ack> {
        self.newsletter(UNSUBSCRIBE_PATH, email).await
    }

    async fn newsletter(&self, path: &str, email: &str) -> ApiResult<Ack> {
        let request = ApiRequest::post(path).json(&NewsletterEmail { email: email.to_owned() })?;
        self.json(request).await
    }
}
