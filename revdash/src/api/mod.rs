//! Background fetch layer for revdash.
//!
//! `types` defines the fetch keys and message enums exchanged with the
//! worker; `worker` is the tokio task that owns the HTTP client and the
//! response cache. All communication is via channels: `ApiRequest` in,
//! `AppEvent::Api` out.

pub mod types;
pub mod worker;
