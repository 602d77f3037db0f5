//! Integration test for the full client lifecycle.
//!
//! Exercises every backend operation against one mock server the way a
//! dashboard session would: metrics, filtered reviews, review detail,
//! analytics, settings round-trip, and export.

use std::time::Duration;

use revdash_core::types::{
    ExportFormat, ReviewQuery, ReviewStatus, SortKey, StatusFilter, TimeRange,
};
use revdash_core::ApiClient;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn review_json(id: &str, status: &str, latency: Option<u64>) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "installation_id": "inst-1",
        "repo_name": "acme/api",
        "pr_number": 9,
        "pr_url": "https://github.com/acme/api/pull/9",
        "commit_sha": "5f31966a2792a0c250ffa4a2f9e79620cd2e2bbf",
        "files_reviewed": 4,
        "status": status,
        "total_comments": 2,
        "api_latency_ms": latency,
        "cache_hit": latency.is_none(),
        "error_message": if status == "success" { serde_json::Value::Null } else { serde_json::json!("model unavailable") },
        "created_at": "2026-08-04T09:15:00Z",
        "updated_at": "2026-08-04T09:15:03Z"
    })
}

#[tokio::test]
async fn full_dashboard_session() {
    let server = MockServer::start().await;
    let client = ApiClient::new(server.uri(), Duration::from_secs(5));

    // Dashboard: metrics for the default 24h window.
    Mock::given(method("GET"))
        .and(path("/api/metrics"))
        .and(query_param("time_range", "24h"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total_reviews": 42,
            "success_rate": 88.1,
            "average_latency_ms": 1900.0,
            "cache_hit_rate": 37.5,
            "total_reviews_trend": 5.0,
            "success_rate_trend": -2.0,
            "average_latency_trend": -11.0,
            "cache_hit_rate_trend": 0.0
        })))
        .mount(&server)
        .await;
    let metrics = client.fetch_metrics(TimeRange::H24).await.unwrap();
    assert_eq!(metrics.total_reviews, 42);
    assert!(metrics.average_latency_trend < 0.0, "improving latency");

    // Reviews page: failure filter, latency sort, page 1.
    Mock::given(method("GET"))
        .and(path("/api/reviews"))
        .and(query_param("status", "failure"))
        .and(query_param("sort_by", "latency"))
        .and(query_param_is_missing("search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            review_json("r-1", "failure", Some(4100)),
        ])))
        .mount(&server)
        .await;
    let query = ReviewQuery {
        status: StatusFilter::Failure,
        sort: SortKey::Latency,
        ..ReviewQuery::default()
    };
    let reviews = client.fetch_reviews(&query).await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].status, ReviewStatus::Failure);
    assert_eq!(reviews[0].error_message.as_deref(), Some("model unavailable"));

    // Drill into the failing review.
    let mut detail_json = review_json("r-1", "failure", Some(4100));
    detail_json["comments"] = serde_json::json!([
        {"file_path": "src/api.rs", "line_number": 12, "severity": "critical", "comment_text": "unchecked unwrap"},
        {"file_path": "src/api.rs", "line_number": null, "severity": "info", "comment_text": "consider splitting this module"},
    ]);
    detail_json["feedback"] = serde_json::json!({
        "rating": 4, "is_helpful": true, "user_comment": null, "created_at": "2026-08-04T10:00:00Z"
    });
    Mock::given(method("GET"))
        .and(path("/api/reviews/r-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_json))
        .mount(&server)
        .await;
    let detail = client.fetch_review_detail("r-1").await.unwrap();
    assert_eq!(detail.review.id, "r-1");
    assert_eq!(detail.comments.len(), 2);
    assert!(detail.comments[1].line_number.is_none());
    assert!(detail.feedback.unwrap().is_helpful);

    // Analytics for the default 7d window.
    Mock::given(method("GET"))
        .and(path("/api/analytics"))
        .and(query_param("time_range", "7d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "api_calls": 310,
            "api_calls_trend": 4.2,
            "average_response_ms": 2050.0,
            "average_response_trend": 1.0,
            "error_rate": 3.1,
            "error_rate_trend": -0.4,
            "model_performance": [
                {"name": "gemini-pro", "usage_count": 280, "average_latency_ms": 2010.0, "success_rate": 97.0, "average_cost_usd": 0.012}
            ],
            "repo_activity": [
                {"repo_name": "acme/api", "review_count": 19, "average_latency_ms": 1890.0, "success_rate": 94.7}
            ],
            "cache_hits": 120,
            "cache_misses": 190,
            "rate_limited_requests": 3,
            "total_cost_usd": 3.72
        })))
        .mount(&server)
        .await;
    let analytics = client.fetch_analytics(TimeRange::D7).await.unwrap();
    assert_eq!(analytics.model_performance[0].name, "gemini-pro");
    assert_eq!(analytics.cache_hits + analytics.cache_misses, analytics.api_calls);

    // Settings: fetch, edit one field, save the whole object back.
    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "default_model": "gemini-pro",
            "max_files_per_review": 20,
            "caching_enabled": true
        })))
        .mount(&server)
        .await;
    let mut settings = client.fetch_settings().await.unwrap();
    assert_eq!(settings.max_files_per_review, Some(20));
    settings.max_files_per_review = Some(30);

    Mock::given(method("PUT"))
        .and(path("/api/settings"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::to_value(&settings).unwrap()),
        )
        .mount(&server)
        .await;
    let updated = client.update_settings(&settings).await.unwrap();
    assert_eq!(updated, settings);

    // Export the unfiltered listing as CSV.
    Mock::given(method("GET"))
        .and(path("/api/reviews/export"))
        .and(query_param("format", "csv"))
        .and(query_param_is_missing("status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("id,repo_name,status\nr-1,acme/api,failure\n"))
        .mount(&server)
        .await;
    let body = client
        .export_reviews(ExportFormat::Csv, StatusFilter::All)
        .await
        .unwrap();
    assert!(body.lines().count() >= 2);
}
