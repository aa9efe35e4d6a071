//! Comment endpoints, including the moderation queue.

use serde_json::json;

use super::types::{Comment, Listing, NewComment};
use crate::error::ApiResult;
use crate::http::{ApiClient, ApiRequest};

#[cfg(test)]
#[path = "comments_test.rs"]
mod tests;

pub(crate) const COMMENTS_PATH: &str = "/comments/";

fn comment_endpoint(id: u64) -> String {
    format!("/comments/{id}/")
}

impl ApiClient {
    /// Comments on one post.
    ///
    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn list_comments(&self, blog_id: u64) -> ApiResult<Vec<Comment>> {
        let listing: Listing<Comment> = self.json(ApiRequest::get(COMMENTS_PATH).query("blog", blog_id)).await?;
        Ok(listing.into_items())
    }

    /// Comments awaiting moderation.
    ///
    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn pending_comments(&self) -> ApiResult<Vec<Comment>> {
        let request = ApiRequest::get(COMMENTS_PATH).query("is_approved", false);
        let listing: Listing<Comment> = self.json(request).await?;
        Ok(listing.into_items())
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn create_comment(&self, blog_id: u64, content: &str) -> ApiResult<Comment> {
        let body = NewComment { blog_id, content: content.to_owned() };
        self.json(ApiRequest::post(COMMENTS_PATH).json(&body)?).await
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn update_comment(&self, id: u64, content: &str) -> ApiResult<Comment> {
        let request = ApiRequest::put(comment_endpoint(id)).json_value(json!({ "content": content }));
        self.json(request).await
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn approve_comment(&self, id: u64) -> ApiResult<Comment> {
        let request = ApiRequest::patch(comment_endpoint(id)).json_value(json!({ "is_approved": true }));
        self.json(request).await
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn delete_comment(&self, id: u64) -> ApiResult<()> {
        self.send(ApiRequest::delete(comment_endpoint(id))).await?;
        Ok(())
    }
}
