//! Core library for revdash — typed client for the review-service HTTP API.
//!
//! This crate contains everything the terminal frontend needs that is not UI:
//! the entity types exchanged with the backend (`types`), the async HTTP
//! client (`client`), the keyed time-expiring response cache (`cache`), and
//! configuration loading (`config`). No ratatui or crossterm types appear
//! anywhere in this crate.

pub mod cache;
pub mod config;
pub mod types;

mod client;

pub use client::ApiClient;
pub use config::Config;

/// Default backend base URL when neither environment nor config file set one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Error type for all API operations.
///
/// The UI collapses every variant to a single "fetch failed" signal per
/// operation; the distinction exists for logs and tests, not for rendering.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure: connection refused, timeout, TLS, or an
    /// undecodable response body (reqwest reports decode errors here too).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("server returned {status}: {message}")]
    Http { status: u16, message: String },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ApiError>;
