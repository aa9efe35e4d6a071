//! Typed endpoints of the blog REST API.
//!
//! Every call goes through [`ApiClient::send`](crate::http::ApiClient::send),
//! so bearer auth, refresh-on-401, notices and redirects apply uniformly. The
//! submodules only know paths and payload shapes.

mod auth;
mod blogs;
mod comments;
mod newsletter;
mod taxonomy;
pub mod types;

pub use blogs::{BlogDraft, BlogQuery};
pub use types::{
    Ack, AuthResponse, Author, Blog, BlogStats, BlogStatus, Category, Comment, CommentStatus, Credentials,
    ImageUpload, Listing, NamedInput, NewComment, Page, PasswordChange, ProfileUpdate, Registration, Tag,
    TokenPair, UploadedImage,
};
