//! Owned message types for the background fetch worker.
//!
//! Everything here is fully owned and `Send` so values can cross from the
//! worker task to the main loop inside `AppEvent::Api`. Errors travel as
//! display strings: by the time a failure reaches the UI, every transport or
//! status distinction has collapsed into one "fetch failed" signal anyway.

use revdash_core::types::{
    Analytics, ExportFormat, Metrics, Review, ReviewDetail, ReviewQuery, Settings, StatusFilter,
    TimeRange,
};

/// The tuple of input variables that determines whether a backend request
/// must be issued.
///
/// Two requests with equal keys are the same fetch: the response cache is
/// keyed by this type, and a result whose key no longer matches its slot's
/// current key is discarded as stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchKey {
    Metrics(TimeRange),
    Reviews(ReviewQuery),
    ReviewDetail(String),
    Analytics(TimeRange),
    Settings,
}

/// Commands sent from the main loop to the fetch worker.
#[derive(Debug)]
pub enum ApiRequest {
    /// Cacheable GET — the key fully determines the request.
    Fetch(FetchKey),
    /// Full-replace settings save. Never cached, never retried.
    SaveSettings(Settings),
    /// One-shot export fetch. The raw body comes back for the caller to
    /// deliver (the event loop writes it to a file).
    Export {
        format: ExportFormat,
        status: StatusFilter,
    },
}

/// Successful payload of a [`FetchKey`]-driven GET.
///
/// The variant always corresponds to the key's variant; the worker is the
/// only producer.
#[derive(Debug, Clone)]
pub enum ApiData {
    Metrics(Metrics),
    Reviews(Vec<Review>),
    ReviewDetail(Box<ReviewDetail>),
    Analytics(Analytics),
    Settings(Settings),
}

/// Result message sent from the fetch worker back to the main loop.
///
/// Carried inside `AppEvent::Api(Box<ApiOutcome>)`; `Box` keeps the event
/// enum small on the channel.
#[derive(Debug)]
pub enum ApiOutcome {
    /// A keyed GET finished (possibly served from cache).
    Fetched {
        key: FetchKey,
        result: Result<ApiData, String>,
    },
    /// The settings save finished.
    Saved { result: Result<Settings, String> },
    /// The export fetch finished with the raw serialized body.
    Exported {
        format: ExportFormat,
        result: Result<String, String>,
    },
}
