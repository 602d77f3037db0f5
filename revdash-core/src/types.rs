//! Entity types exchanged with the review-service backend.
//!
//! Everything here is a plain serde record: the frontend never creates,
//! mutates, or destroys these server-side — it reads them and, for
//! [`Settings`], writes back a full replacement object. Filter and sort
//! inputs are closed enums validated at the input boundary; no stringly-typed
//! parameter crosses the client API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse window over which aggregate metrics are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeRange {
    /// Last 24 hours.
    #[default]
    H24,
    /// Last 7 days.
    D7,
    /// Last 30 days.
    D30,
}

impl TimeRange {
    /// Wire value for the `time_range` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            TimeRange::H24 => "24h",
            TimeRange::D7 => "7d",
            TimeRange::D30 => "30d",
        }
    }

    /// Next range in the 24h -> 7d -> 30d cycle (wraps around).
    pub fn next(self) -> Self {
        match self {
            TimeRange::H24 => TimeRange::D7,
            TimeRange::D7 => TimeRange::D30,
            TimeRange::D30 => TimeRange::H24,
        }
    }
}

/// Sort key for the reviews listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Creation timestamp, newest first (backend default).
    #[default]
    Date,
    /// API latency.
    Latency,
    /// Total comment count.
    Comments,
}

impl SortKey {
    /// Wire value for the `sort_by` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Latency => "latency",
            SortKey::Comments => "comments",
        }
    }

    /// Next key in the date -> latency -> comments cycle (wraps around).
    pub fn next(self) -> Self {
        match self {
            SortKey::Date => SortKey::Latency,
            SortKey::Latency => SortKey::Comments,
            SortKey::Comments => SortKey::Date,
        }
    }
}

/// Status filter for the reviews listing and export.
///
/// `All` means "no filter" and is never sent on the wire — the parameter is
/// omitted from the request entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Success,
    PartialFailure,
    Failure,
}

impl StatusFilter {
    /// Wire value for the `status` query parameter; `None` for [`StatusFilter::All`],
    /// which must not appear in the request at all.
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Success => Some("success"),
            StatusFilter::PartialFailure => Some("partial_failure"),
            StatusFilter::Failure => Some("failure"),
        }
    }

    /// Next filter in the all -> success -> partial_failure -> failure cycle.
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Success,
            StatusFilter::Success => StatusFilter::PartialFailure,
            StatusFilter::PartialFailure => StatusFilter::Failure,
            StatusFilter::Failure => StatusFilter::All,
        }
    }

    /// Human-readable label for the filter bar.
    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Success => "success",
            StatusFilter::PartialFailure => "partial failure",
            StatusFilter::Failure => "failure",
        }
    }
}

/// Serialization format for the review export endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Wire value for the `format` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// File extension used when the export body is delivered as a file.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Status of a completed review.
///
/// Unrecognized wire values deserialize to `Unknown` rather than failing the
/// whole payload; the renderer shows them as a neutral badge with no icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Success,
    PartialFailure,
    Failure,
    #[serde(other)]
    Unknown,
}

/// A completed code-review result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub installation_id: String,
    pub repo_name: String,
    pub pr_number: u64,
    pub pr_url: String,
    pub commit_sha: String,
    pub files_reviewed: u32,
    pub status: ReviewStatus,
    pub total_comments: u32,
    /// Null for reviews that failed before any model call was made.
    pub api_latency_ms: Option<u64>,
    pub cache_hit: bool,
    /// Present only when `status` is not `success` (backend convention, not
    /// enforced here).
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Committed query state for the reviews listing.
///
/// Doubles as the fetch-key component for the reviews page: two queries are
/// the same fetch if and only if they compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReviewQuery {
    /// Search text; empty means unset and is omitted from the request.
    pub search: String,
    pub status: StatusFilter,
    pub sort: SortKey,
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
}

impl Default for ReviewQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            sort: SortKey::Date,
            page: 1,
            limit: 25,
        }
    }
}

impl ReviewQuery {
    /// Query used by the dashboard's "most recent 10" widget.
    pub fn recent(limit: u32) -> Self {
        Self { limit, ..Self::default() }
    }

    /// Builds the request parameter list, omitting unset optional fields
    /// entirely (never sending empty values).
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(5);
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search", search.to_owned()));
        }
        if let Some(status) = self.status.as_param() {
            params.push(("status", status.to_owned()));
        }
        params.push(("sort_by", self.sort.as_param().to_owned()));
        params.push(("page", self.page.to_string()));
        params.push(("limit", self.limit.to_string()));
        params
    }
}

/// Aggregate counters for a time window, with a trend percentage per counter.
///
/// Trend sign indicates change versus the immediately preceding window of the
/// same length; for latency a negative trend is an improvement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    pub total_reviews: u64,
    /// Percentage in 0..=100.
    pub success_rate: f64,
    pub average_latency_ms: f64,
    /// Percentage in 0..=100.
    pub cache_hit_rate: f64,
    pub total_reviews_trend: f64,
    pub success_rate_trend: f64,
    pub average_latency_trend: f64,
    pub cache_hit_rate_trend: f64,
}

/// Per-model aggregate within an [`Analytics`] window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPerformance {
    pub name: String,
    pub usage_count: u64,
    pub average_latency_ms: f64,
    pub success_rate: f64,
    pub average_cost_usd: f64,
}

/// Per-repository aggregate within an [`Analytics`] window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoActivity {
    pub repo_name: String,
    pub review_count: u64,
    pub average_latency_ms: f64,
    pub success_rate: f64,
}

/// Extended aggregate for a time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analytics {
    pub api_calls: u64,
    pub api_calls_trend: f64,
    pub average_response_ms: f64,
    pub average_response_trend: f64,
    /// Percentage in 0..=100; lower is better.
    pub error_rate: f64,
    pub error_rate_trend: f64,
    pub model_performance: Vec<ModelPerformance>,
    pub repo_activity: Vec<RepoActivity>,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub rate_limited_requests: u64,
    pub total_cost_usd: f64,
}

/// Mutable service configuration, edited on the settings page.
///
/// Every field is optional; `None` serializes to an absent key and means
/// "use the backend default". Updates are a full replace of this object,
/// never a partial merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_files_per_review: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lines_per_file: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caching_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_processing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_processing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_per_hour: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u32>,
}

/// Severity of an individual review comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentSeverity {
    Critical,
    Warning,
    Info,
    #[serde(other)]
    Unknown,
}

/// One inline comment within a review, ordered by file then line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewComment {
    pub file_path: String,
    /// Null for file-level comments.
    pub line_number: Option<u32>,
    pub severity: CommentSeverity,
    pub comment_text: String,
}

/// User feedback attached to a review (most recent if several were left).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewFeedback {
    /// 1-5 rating.
    pub rating: u8,
    pub is_helpful: bool,
    pub user_comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Full detail for a single review: the record plus its comments and feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDetail {
    #[serde(flatten)]
    pub review: Review,
    pub comments: Vec<ReviewComment>,
    pub feedback: Option<ReviewFeedback>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_values_deserialize_to_unknown() {
        let status: ReviewStatus = serde_json::from_str("\"timed_out\"").unwrap();
        assert_eq!(status, ReviewStatus::Unknown);
        let status: ReviewStatus = serde_json::from_str("\"partial_failure\"").unwrap();
        assert_eq!(status, ReviewStatus::PartialFailure);
    }

    #[test]
    fn review_query_omits_unset_optional_filters() {
        let query = ReviewQuery::default();
        let params = query.params();
        assert!(params.iter().all(|(name, _)| *name != "search"));
        assert!(params.iter().all(|(name, _)| *name != "status"));
        assert!(params.contains(&("page", "1".to_owned())));
    }

    #[test]
    fn review_query_includes_set_filters() {
        let query = ReviewQuery {
            search: "billing".to_owned(),
            status: StatusFilter::Failure,
            sort: SortKey::Latency,
            page: 3,
            limit: 25,
        };
        let params = query.params();
        assert!(params.contains(&("search", "billing".to_owned())));
        assert!(params.contains(&("status", "failure".to_owned())));
        assert!(params.contains(&("sort_by", "latency".to_owned())));
        assert!(params.contains(&("page", "3".to_owned())));
    }

    #[test]
    fn whitespace_only_search_is_treated_as_unset() {
        let query = ReviewQuery { search: "   ".to_owned(), ..ReviewQuery::default() };
        assert!(query.params().iter().all(|(name, _)| *name != "search"));
    }

    #[test]
    fn none_settings_fields_are_absent_from_json() {
        let settings = Settings { default_model: Some("gemini-pro".to_owned()), ..Settings::default() };
        let json = serde_json::to_value(&settings).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["default_model"], "gemini-pro");
    }
}
