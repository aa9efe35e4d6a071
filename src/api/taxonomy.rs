//! Category and tag endpoints. Both resources share one shape, so the
//! methods are thin wrappers over a collection path.

use serde::de::DeserializeOwned;

use super::types::{Category, Listing, NamedInput, Tag};
use crate::error::ApiResult;
use crate::http::{ApiClient, ApiRequest};

#[cfg(test)]
#[path = "taxonomy_test.rs"]
mod tests;

pub(crate) const CATEGORIES: &str = "categories";
pub(crate) const TAGS: &str = "tags";

fn collection_endpoint(collection: &str) -> String {
    format!("/{collection}/")
}

fn member_endpoint(collection: &str, slug: &str) -> String {
    format!("/{collection}/{slug}/")
}

impl ApiClient {
    async fn list_named<T: DeserializeOwned>(&self, collection: &str) -> ApiResult<Vec<T>> {
        let listing: Listing<T> = self.json(ApiRequest::get(collection_endpoint(collection))).await?;
        Ok(listing.into_items())
    }

    async fn get_named<T: DeserializeOwned>(&self, collection: &str, slug: &str) -> ApiResult<T> {
        self.json(ApiRequest::get(member_endpoint(collection, slug))).await
    }

    async fn create_named<T: DeserializeOwned>(&self, collection: &str, name: &str) -> ApiResult<T> {
        let request = ApiRequest::post(collection_endpoint(collection)).json(&NamedInput { name: name.to_owned() })?;
        self.json(request).await
    }

    async fn update_named<T: DeserializeOwned>(&self, collection: &str, slug: &str, name: &str) -> ApiResult<T> {
        let request =
            ApiRequest::put(member_endpoint(collection, slug)).json(&NamedInput { name: name.to_owned() })?;
        self.json(request).await
    }

    async fn delete_named(&self, collection: &str, slug: &str) -> ApiResult<()> {
        self.send(ApiRequest::delete(member_endpoint(collection, slug))).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Categories
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        self.list_named(CATEGORIES).await
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn get_category(&self, slug: &str) -> ApiResult<Category> {
        self.get_named(CATEGORIES, slug).await
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn create_category(&self, name: &str) -> ApiResult<Category> {
        self.create_named(CATEGORIES, name).await
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn update_category(&self, slug: &str, name: &str) -> ApiResult<Category> {
        self.update_named(CATEGORIES, slug, name).await
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn delete_category(&self, slug: &str) -> ApiResult<()> {
        self.delete_named(CATEGORIES, slug).await
    }

    // -------------------------------------------------------------------------
    // Tags
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn list_tags(&self) -> ApiResult<Vec<Tag>> {
        self.list_named(TAGS).await
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn get_tag(&self, slug: &str) -> ApiResult<Tag> {
        self.get_named(TAGS, slug).await
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn create_tag(&self, name: &str) -> ApiResult<Tag> {
        self.create_named(TAGS, name).await
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn update_tag(&self, slug: &str, name: &str) -> ApiResult<Tag> {
        self.update_named(TAGS, slug, name).await
    }

    /// # Errors
    ///
    /// Returns the classified API error.
    pub async fn delete_tag(&self, slug: &str) -> ApiResult<()> {
        self.delete_named(TAGS, slug).await
    }
}
