//! Blog endpoints.
//!
//! DESIGN
//! ======
//! A draft becomes a multipart form only when it carries a featured image;
//! otherwise it is sent as JSON. Both shapes are rebuilt per attempt, so a
//! create that hits a 401 is resent intact after the refresh.

use serde::Serialize;
use serde_json::{Value, json};

use super::types::{Blog, BlogStats, BlogStatus, ImageUpload, Listing, UploadedImage};
use crate::error::ApiResult;
use crate::http::{ApiClient, ApiRequest, FormPart};

#[cfg(test)]
#[path = "blogs_test.rs"]
mod tests;

pub(crate) const BLOGS_PATH: &str = "/blogs/";
pub(crate) const MY_BLOGS_PATH: &str = "/blogs/my-blogs/";
pub(crate) const FEATURED_BLOGS_PATH: &str = "/blogs/featured/";
pub(crate) const BLOG_STATS_PATH: &str = "/blogs/stats/";
pub(crate) const UPLOAD_IMAGE_PATH: &str = "/blogs/upload-image/";

fn blog_endpoint(key: &str) -> String {
    format!("/blogs/{key}/")
}

fn publish_endpoint(slug: &str) -> String {
    format!("/blogs/{slug}/publish/")
}

// =============================================================================
// QUERY
// =============================================================================

/// Filters for `GET /blogs/`. Unset fields are left off the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogQuery {
    pub page: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub status: Option<BlogStatus>,
    pub ordering: Option<String>,
}

impl BlogQuery {
    pub(crate) fn apply(&self, request: ApiRequest) -> ApiRequest {
        request
            .query_opt("page", self.page)
            .query_opt("search", self.search.as_deref())
            .query_opt("category__slug", self.category.as_deref())
            .query_opt("tags__slug", self.tag.as_deref())
            .query_opt("status", self.status.map(BlogStatus::as_str))
            .query_opt("ordering", self.ordering.as_deref())
    }
}

// =============================================================================
// DRAFT
// =============================================================================

/// Fields for creating or replacing a blog post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlogDraft {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
    pub tag_ids: Vec<u64>,
    pub status: BlogStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt_text: Option<String>,
    #[serde(skip)]
    pub featured_image: Option<ImageUpload>,
}

impl BlogDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { title: title.into(), content: content.into(), ..Self::default() }
    }

    /// Attach this draft as the request body.
    pub(crate) fn attach(&self, request: ApiRequest) -> ApiResult<ApiRequest> {
        match &self.featured_image {
            None => request.json(self),
            Some(image) => Ok(request.multipart(self.form_parts(image))),
        }
    }

    fn form_parts(&self, image: &ImageUpload) -> Vec<FormPart> {
        let mut parts = vec![
            FormPart::text("title", &self.title),
            FormPart::text("content", &self.content),
            FormPart::text("status", self.status.as_str()),
        ];
        if let Some(category_id) = self.category_id {
            parts.push(FormPart::text("category_id", category_id.to_string()));
        }
        parts.extend(self.tag_ids.iter().map(|id| FormPart::text("tag_ids", id.to_string())));
        let optional = [
            ("meta_title", &self.meta_title),
            ("meta_description", &self.meta_description),
            ("image_alt_text", &self.image_alt_text),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                parts.push(FormPart::text(name, value));
            }
        }
        parts.push(FormPart::file(
            "featured_image",
            &image.file_name,
            &image.content_type,
            image.bytes.clone(),
        ));
        parts
    }
}

// =============================================================================
// ENDPOINTS
// =============================================================================

impl ApiClient {
    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn list_blogs(&self, query: &BlogQuery) -> ApiResult<Listing<Blog>> {
        self.json(query.apply(ApiRequest::get(BLOGS_PATH))).await
    }

    /// Fetch one post by id or slug.
    ///
    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn get_blog(&self, key: &str) -> ApiResult<Blog> {
        self.json(ApiRequest::get(blog_endpoint(key))).await
    }

    /// # Errors
    ///
    /// Returns the classified API error, or [`crate::ApiError::InvalidRequest`]
    /// for an unusable image content type.
    pub async fn create_blog(&self, draft: &BlogDraft) -> ApiResult<Blog> {
        self.json(draft.attach(ApiRequest::post(BLOGS_PATH))?).await
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::create_blog`].
    pub async fn update_blog(&self, key: &str, draft: &BlogDraft) -> ApiResult<Blog> {
        self.json(draft.attach(ApiRequest::put(blog_endpoint(key)))?).await
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn delete_blog(&self, key: &str) -> ApiResult<()> {
        self.send(ApiRequest::delete(blog_endpoint(key))).await?;
        Ok(())
    }

    /// Set a post's status; publishing also triggers the newsletter server-side.
    ///
    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn publish_blog(&self, slug: &str, status: BlogStatus) -> ApiResult<Value> {
        let request = ApiRequest::patch(publish_endpoint(slug)).json_value(json!({ "status": status.as_str() }));
        self.json(request).await
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn my_blogs(&self, query: &BlogQuery) -> ApiResult<Listing<Blog>> {
        self.json(query.apply(ApiRequest::get(MY_BLOGS_PATH))).await
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn featured_blogs(&self) -> ApiResult<Vec<Blog>> {
        let listing: Listing<Blog> = self.json(ApiRequest::get(FEATURED_BLOGS_PATH)).await?;
        Ok(listing.into_items())
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn blog_stats(&self) -> ApiResult<BlogStats> {
        self.json(ApiRequest::get(BLOG_STATS_PATH)).await
    }

    /// Upload an inline image for the editor and return its URL.
    ///
    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn upload_image(&self, image: &ImageUpload) -> ApiResult<UploadedImage> {
        let part = FormPart::file("image", &image.file_name, &image.content_type, image.bytes.clone());
        self.json(ApiRequest::post(UPLOAD_IMAGE_PATH).multipart(vec![part])).await
    }
}
