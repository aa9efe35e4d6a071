//! Authorized HTTP access to the blog API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `request` describes a call as plain data so it can be replayed after a
//! token refresh; `client` runs the bearer-auth and refresh-on-401 pipeline
//! and turns failures into `ApiError`s plus user notices.

pub mod client;
pub mod request;

pub use client::{ApiClient, REFRESH_PATH};
pub use request::{ApiRequest, ApiResponse, FormPart, PartValue, RequestBody};
