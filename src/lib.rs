//! Client-side session and request pipeline for the blog REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` owns the persisted tokens and the in-memory session state,
//! `http` wraps every outbound call with bearer auth and the refresh-on-401
//! flow, `api` exposes typed endpoints on top of it, and `guard` decides
//! whether a view may render for the current session.
//!
//! ARCHITECTURE
//! ============
//! There is no global session. A `SessionContext` is built once (usually via
//! `SessionContext::bootstrap`) and handed to `ApiClient` and the guard, so
//! every collaborator sees the same state and tests can build isolated ones.

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod session;
pub mod ui;

pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind};
pub use guard::{GuardDecision, check_access};
pub use http::{ApiClient, ApiRequest, ApiResponse};
pub use session::{Role, SessionContext, SessionState, UserProfile};
pub use ui::{Notice, NoticeLevel, Redirect, UiEvent, UiEvents};
