//! # API crate: typed REST client for the pipeline CRM backend
//!
//! Every page and the session logic talk to the backend through
//! [`ApiClient`]. The client turns typed calls into [`ApiRequest`]s, hands them
//! to a [`Transport`], and decodes the answer into a typed record or an
//! [`ApiError`] that says exactly what went wrong.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Session exchange, "who am I" check, login, logout, password change, user directory |
//! | [`crm`] | Organizations, contacts, opportunities, activities, pipelines, dashboards, analytics |
//! | [`config`] | Backend base URL and identity-provider URL from the build/run environment |
//! | [`error`] | The [`ApiError`] taxonomy and toast messages |
//! | [`models`] | Response contracts ([`User`], [`Opportunity`], ...) and request payloads |
//! | [`transport`] | [`Transport`] trait, the `reqwest` [`HttpTransport`] and the scripted [`MockTransport`] |
//!
//! ## Response classification
//!
//! - 2xx with a body matching the contract → `Ok(T)`
//! - 2xx with JSON that does not match → [`ApiError::Schema`]
//! - any status with a non-JSON body (an HTML error page) → [`ApiError::NotJson`]
//! - non-2xx with JSON → [`ApiError::Status`] carrying the backend's `detail`
//! - no response at all → [`ApiError::Transport`]

pub mod auth;
pub mod client;
pub mod config;
pub mod crm;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::{ExchangeRoute, SessionToken};
pub use client::ApiClient;
pub use config::ApiConfig;
pub use crm::ListFilter;
pub use error::ApiError;
pub use models::*;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, MockTransport, Transport};
