//! Typed HTTP client for the review-service backend.
//!
//! One async method per backend operation, all rooted under the `/api` base
//! path. Query assembly lives in the typed inputs ([`ReviewQuery`] and the
//! filter enums), so an unset optional filter can never leak onto the wire as
//! an empty parameter.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::types::{
    Analytics, ExportFormat, Metrics, Review, ReviewDetail, ReviewQuery, Settings, StatusFilter,
    TimeRange,
};
use crate::{ApiError, Result};

/// Client for the review-service HTTP API.
///
/// Cheap to clone; the underlying `reqwest::Client` shares its connection
/// pool between clones.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client against `base_url` with the given request timeout.
    ///
    /// The timeout covers the whole request including body download; connect
    /// attempts are additionally capped at 5 seconds so an unreachable host
    /// fails fast instead of consuming the full budget.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Creates a client from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base_url.clone(), Duration::from_millis(config.timeout_ms))
    }

    /// Base URL this client talks to (without the `/api` prefix).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Shared GET-and-decode path for all JSON endpoints.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        let response = self.client.get(self.url(path)).query(params).send().await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(status_error(response).await)
        }
    }

    /// Fetches aggregate metrics for `range`.
    pub async fn fetch_metrics(&self, range: TimeRange) -> Result<Metrics> {
        self.get_json("/metrics", &[("time_range", range.as_param().to_owned())])
            .await
    }

    /// Fetches the reviews page described by `query`.
    pub async fn fetch_reviews(&self, query: &ReviewQuery) -> Result<Vec<Review>> {
        self.get_json("/reviews", &query.params()).await
    }

    /// Fetches one review with its comments and feedback.
    pub async fn fetch_review_detail(&self, id: &str) -> Result<ReviewDetail> {
        self.get_json(&format!("/reviews/{id}"), &[]).await
    }

    /// Fetches the extended analytics aggregate for `range`.
    pub async fn fetch_analytics(&self, range: TimeRange) -> Result<Analytics> {
        self.get_json("/analytics", &[("time_range", range.as_param().to_owned())])
            .await
    }

    /// Fetches the current service settings.
    pub async fn fetch_settings(&self) -> Result<Settings> {
        self.get_json("/settings", &[]).await
    }

    /// Replaces the service settings wholesale and returns the updated record.
    ///
    /// This is a full replace, not a merge: absent fields revert to backend
    /// defaults.
    pub async fn update_settings(&self, settings: &Settings) -> Result<Settings> {
        let response = self
            .client
            .put(self.url("/settings"))
            .json(settings)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(status_error(response).await)
        }
    }

    /// Fetches the serialized review export and returns the raw text body.
    ///
    /// The caller is responsible for delivering the text to the user; nothing
    /// is written to disk here. A `status` of [`StatusFilter::All`] omits the
    /// parameter from the request entirely.
    pub async fn export_reviews(
        &self,
        format: ExportFormat,
        status: StatusFilter,
    ) -> Result<String> {
        let mut params = vec![("format", format.as_param().to_owned())];
        if let Some(status) = status.as_param() {
            params.push(("status", status.to_owned()));
        }
        let response = self
            .client
            .get(self.url("/reviews/export"))
            .query(&params)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.text().await?)
        } else {
            Err(status_error(response).await)
        }
    }
}

/// Builds the [`ApiError::Http`] for a non-success response, consuming the
/// body as the message (truncated — backend error bodies are short JSON or
/// plain text, but a proxy can return a whole HTML page).
async fn status_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let mut message = response.text().await.unwrap_or_default();
    if message.len() > 200 {
        message.truncate(200);
    }
    tracing::warn!(status, "api request failed");
    ApiError::Http { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> ApiClient {
        ApiClient::new(server.uri(), Duration::from_secs(5))
    }

    fn metrics_body() -> serde_json::Value {
        serde_json::json!({
            "total_reviews": 128,
            "success_rate": 93.5,
            "average_latency_ms": 2150.0,
            "cache_hit_rate": 41.0,
            "total_reviews_trend": 12.0,
            "success_rate_trend": 1.5,
            "average_latency_trend": -5.0,
            "cache_hit_rate_trend": 3.0
        })
    }

    fn review_body(id: &str, status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "installation_id": "inst-77",
            "repo_name": "acme/billing",
            "pr_number": 412,
            "pr_url": "https://github.com/acme/billing/pull/412",
            "commit_sha": "0dc5801c28849cbe193cd16a81f477fa90ea9169",
            "files_reviewed": 7,
            "status": status,
            "total_comments": 3,
            "api_latency_ms": 1840,
            "cache_hit": false,
            "error_message": null,
            "created_at": "2026-08-05T14:32:11Z",
            "updated_at": "2026-08-05T14:32:11Z"
        })
    }

    #[tokio::test]
    async fn metrics_request_carries_time_range() {
        let server = MockServer::start().await;
        for range in [TimeRange::H24, TimeRange::D7, TimeRange::D30] {
            let _guard = Mock::given(method("GET"))
                .and(path("/api/metrics"))
                .and(query_param("time_range", range.as_param()))
                .respond_with(ResponseTemplate::new(200).set_body_json(metrics_body()))
                .expect(1)
                .mount_as_scoped(&server)
                .await;

            let metrics = test_client(&server).fetch_metrics(range).await.unwrap();
            assert_eq!(metrics.total_reviews, 128);
        }
    }

    #[tokio::test]
    async fn default_review_query_sends_no_optional_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reviews"))
            .and(query_param_is_missing("search"))
            .and(query_param_is_missing("status"))
            .and(query_param("sort_by", "date"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "25"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([review_body("a", "success")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let reviews = test_client(&server)
            .fetch_reviews(&ReviewQuery::default())
            .await
            .unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].status, crate::types::ReviewStatus::Success);
    }

    #[tokio::test]
    async fn filtered_review_query_sends_all_set_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reviews"))
            .and(query_param("search", "billing"))
            .and(query_param("status", "partial_failure"))
            .and(query_param("sort_by", "comments"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let query = ReviewQuery {
            search: "billing".to_owned(),
            status: StatusFilter::PartialFailure,
            sort: crate::types::SortKey::Comments,
            page: 2,
            limit: 25,
        };
        let reviews = test_client(&server).fetch_reviews(&query).await.unwrap();
        assert!(reviews.is_empty());
    }

    #[tokio::test]
    async fn export_omits_status_for_all_and_includes_it_otherwise() {
        let server = MockServer::start().await;
        let csv_guard = Mock::given(method("GET"))
            .and(path("/api/reviews/export"))
            .and(query_param("format", "csv"))
            .and(query_param_is_missing("status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("id,repo_name\n"))
            .expect(1)
            .mount_as_scoped(&server)
            .await;
        let body = test_client(&server)
            .export_reviews(ExportFormat::Csv, StatusFilter::All)
            .await
            .unwrap();
        assert!(body.starts_with("id,repo_name"));
        drop(csv_guard);

        Mock::given(method("GET"))
            .and(path("/api/reviews/export"))
            .and(query_param("format", "json"))
            .and(query_param("status", "failure"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;
        let body = test_client(&server)
            .export_reviews(ExportFormat::Json, StatusFilter::Failure)
            .await
            .unwrap();
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn update_settings_puts_full_object_and_returns_updated() {
        let server = MockServer::start().await;
        let settings = Settings {
            default_model: Some("gemini-pro".to_owned()),
            max_files_per_review: Some(20),
            caching_enabled: Some(true),
            ..Settings::default()
        };
        Mock::given(method("PUT"))
            .and(path("/api/settings"))
            .and(body_json(&settings))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::to_value(&settings).unwrap()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let updated = test_client(&server).update_settings(&settings).await.unwrap();
        assert_eq!(updated, settings);
    }

    #[tokio::test]
    async fn non_success_status_surfaces_as_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/settings"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = test_client(&server).fetch_settings().await.unwrap_err();
        match err {
            ApiError::Http { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_status_in_listing_does_not_fail_the_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reviews"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                review_body("a", "success"),
                review_body("b", "timed_out"),
            ])))
            .mount(&server)
            .await;

        let reviews = test_client(&server)
            .fetch_reviews(&ReviewQuery::default())
            .await
            .unwrap();
        assert_eq!(reviews[1].status, crate::types::ReviewStatus::Unknown);
    }
}
