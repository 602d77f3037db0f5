//! Background task that owns the HTTP client and the response cache.
//!
//! The worker receives [`ApiRequest`] messages over a tokio mpsc channel and
//! sends every outcome back as `AppEvent::Api`. The cache is created at
//! startup and injected here — the fetching layer owns it for the process
//! lifetime, and nothing else can reach it.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use revdash_core::cache::{Lookup, ResponseCache};
use revdash_core::{ApiClient, ApiError};

use crate::api::types::{ApiData, ApiOutcome, ApiRequest, FetchKey};
use crate::event::AppEvent;

/// Spawns the fetch worker task.
///
/// The task runs until the request channel closes (all senders dropped).
/// Requests are processed sequentially; the UI stays responsive because
/// results are key-matched on arrival, so ordering between pages is
/// irrelevant.
pub fn spawn_api_worker(
    client: ApiClient,
    mut cache: ResponseCache<FetchKey, ApiData>,
    mut rx: UnboundedReceiver<ApiRequest>,
    event_tx: UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            // Expired entries are collected here rather than on a timer; an
            // idle dashboard issues no requests and touches no cache state.
            cache.sweep();
            let outcome = handle_request(&client, &mut cache, request).await;
            if event_tx.send(AppEvent::Api(Box::new(outcome))).is_err() {
                break;
            }
        }
    });
}

/// Dispatches one request, consulting and updating the cache for keyed GETs.
async fn handle_request(
    client: &ApiClient,
    cache: &mut ResponseCache<FetchKey, ApiData>,
    request: ApiRequest,
) -> ApiOutcome {
    match request {
        ApiRequest::Fetch(key) => {
            if let Lookup::Fresh(data) = cache.get(&key) {
                tracing::debug!(?key, "serving fetch from cache");
                let data = data.clone();
                return ApiOutcome::Fetched { key, result: Ok(data) };
            }
            let result = fetch_with_retry(client, &key).await;
            if let Ok(data) = &result {
                cache.insert(key.clone(), data.clone());
            }
            ApiOutcome::Fetched {
                key,
                result: result.map_err(|e| e.to_string()),
            }
        }
        ApiRequest::SaveSettings(settings) => {
            let result = client
                .update_settings(&settings)
                .await
                .map_err(|e| e.to_string());
            if let Err(e) = &result {
                tracing::warn!(error = %e, "settings save failed");
            }
            ApiOutcome::Saved { result }
        }
        ApiRequest::Export { format, status } => {
            let result = client
                .export_reviews(format, status)
                .await
                .map_err(|e| e.to_string());
            if let Err(e) = &result {
                tracing::warn!(error = %e, "export failed");
            }
            ApiOutcome::Exported { format, result }
        }
    }
}

/// Performs the GET for `key`, retrying exactly once on failure.
///
/// One retry matches the query layer the dashboard replaces; mutations and
/// exports are never retried (see `handle_request`).
async fn fetch_with_retry(client: &ApiClient, key: &FetchKey) -> Result<ApiData, ApiError> {
    match fetch_once(client, key).await {
        Ok(data) => Ok(data),
        Err(first) => {
            tracing::warn!(?key, error = %first, "fetch failed, retrying once");
            fetch_once(client, key).await
        }
    }
}

/// Issues the single HTTP request a key describes.
async fn fetch_once(client: &ApiClient, key: &FetchKey) -> Result<ApiData, ApiError> {
    match key {
        FetchKey::Metrics(range) => client.fetch_metrics(*range).await.map(ApiData::Metrics),
        FetchKey::Reviews(query) => client.fetch_reviews(query).await.map(ApiData::Reviews),
        FetchKey::ReviewDetail(id) => client
            .fetch_review_detail(id)
            .await
            .map(|detail| ApiData::ReviewDetail(Box::new(detail))),
        FetchKey::Analytics(range) => client.fetch_analytics(*range).await.map(ApiData::Analytics),
        FetchKey::Settings => client.fetch_settings().await.map(ApiData::Settings),
    }
}
