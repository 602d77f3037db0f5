//! Central application state for revdash.
//!
//! This module owns all mutable UI state: the active page, the per-page
//! filter variables and fetch slots, the settings draft, toasts, and the
//! overlay/mode flags. No ratatui rendering logic lives here — `app.rs` is
//! pure state that is read by the render module and mutated by the
//! keybinding dispatcher and by [`AppState::apply_api_result`].
//!
//! The fetch contract (one slot per backend payload):
//! - every fetch `begin`s with the [`FetchKey`] it was issued for;
//! - a result is applied only while its key still matches the slot's current
//!   key — superseded responses are dropped, never rendered;
//! - changing any filter that contributes to the reviews fetch key resets the
//!   page number to 1;
//! - a slot keeps its previous payload while a refetch is in flight, so
//!   pagination never blanks the table.

use ratatui::widgets::TableState;
use tokio::sync::mpsc::UnboundedSender;

use revdash_core::types::{
    Analytics, ExportFormat, Metrics, Review, ReviewDetail, ReviewQuery, Settings, TimeRange,
};

use crate::api::types::{ApiData, ApiOutcome, ApiRequest, FetchKey};

/// Number of reviews shown in the dashboard's "recent" widget.
pub const RECENT_REVIEWS_LIMIT: u32 = 10;

/// Toast lifetime in logic ticks (12 ticks at 4 Hz = 3 seconds).
const TOAST_TICKS: u8 = 12;

/// The four top-level pages, selectable from the tab bar.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    #[default]
    Dashboard,
    Reviews,
    Analytics,
    Settings,
}

impl Page {
    /// All pages in tab-bar order.
    pub const ALL: [Page; 4] = [Page::Dashboard, Page::Reviews, Page::Analytics, Page::Settings];

    /// Tab title shown in the tab bar.
    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Reviews => "Reviews",
            Page::Analytics => "Analytics",
            Page::Settings => "Settings",
        }
    }

    /// Index into [`Page::ALL`] (tab bar highlight).
    pub fn index(self) -> usize {
        match self {
            Page::Dashboard => 0,
            Page::Reviews => 1,
            Page::Analytics => 2,
            Page::Settings => 3,
        }
    }

    /// Page after `self` in tab order (wraps around).
    pub fn next(self) -> Self {
        match self {
            Page::Dashboard => Page::Reviews,
            Page::Reviews => Page::Analytics,
            Page::Analytics => Page::Settings,
            Page::Settings => Page::Dashboard,
        }
    }

    /// Page before `self` in tab order (wraps around).
    pub fn prev(self) -> Self {
        match self {
            Page::Dashboard => Page::Settings,
            Page::Reviews => Page::Dashboard,
            Page::Analytics => Page::Reviews,
            Page::Settings => Page::Analytics,
        }
    }
}

/// Input mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal navigation mode (default).
    #[default]
    Normal,
    /// Typing into the reviews search box.
    Search,
    /// Editing a settings form field.
    EditField,
    /// Full-screen help overlay is shown above the page.
    HelpOverlay,
    /// Quit-confirmation dialog shown when the settings draft has unsaved
    /// edits.
    ConfirmQuit,
}

/// Derived view state for one fetch slot, computed at render time.
#[derive(Debug, PartialEq, Eq)]
pub enum SlotView<'a, T> {
    /// In flight with no prior payload — render skeleton placeholders.
    Loading,
    /// Failed with no prior payload — render the blocking error state.
    Error(&'a str),
    /// Payload available (possibly from before an in-flight refetch).
    Ready(&'a T),
}

/// What [`FetchSlot::accept`] did with a worker result.
#[derive(Debug, PartialEq, Eq)]
pub enum SlotUpdate {
    /// The result's key no longer matches the slot — dropped.
    Stale,
    /// Payload stored.
    Updated,
    /// Fetch failed; `had_data` tells whether the previous payload is still
    /// on screen (toast) or the page is now blocked (error state).
    Failed { error: String, had_data: bool },
}

/// One page-level fetch: current key, last payload, and in-flight/error flags.
#[derive(Debug)]
pub struct FetchSlot<T> {
    /// Key of the most recently issued fetch for this slot.
    pub key: Option<FetchKey>,
    /// Last successfully fetched payload, kept during refetches.
    pub data: Option<T>,
    /// True while a fetch for `key` is in flight.
    pub loading: bool,
    /// Error of the last fetch, set only when there is no payload to show.
    pub error: Option<String>,
}

impl<T> Default for FetchSlot<T> {
    fn default() -> Self {
        Self {
            key: None,
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> FetchSlot<T> {
    /// Records that a fetch for `key` is now in flight.
    ///
    /// The previous payload is retained so the page keeps rendering it until
    /// the replacement arrives.
    pub fn begin(&mut self, key: FetchKey) {
        self.key = Some(key);
        self.loading = true;
    }

    /// Applies a worker result if its key still matches the slot.
    pub fn accept(&mut self, key: &FetchKey, result: Result<T, String>) -> SlotUpdate {
        if self.key.as_ref() != Some(key) {
            return SlotUpdate::Stale;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                SlotUpdate::Updated
            }
            Err(error) => {
                let had_data = self.data.is_some();
                if !had_data {
                    self.error = Some(error.clone());
                }
                SlotUpdate::Failed { error, had_data }
            }
        }
    }

    /// Derives the view state for rendering.
    pub fn view(&self) -> SlotView<'_, T> {
        if let Some(data) = &self.data {
            SlotView::Ready(data)
        } else if let Some(error) = &self.error {
            SlotView::Error(error)
        } else {
            SlotView::Loading
        }
    }

    /// True while refetching a slot that already has a payload on screen.
    pub fn refreshing(&self) -> bool {
        self.loading && self.data.is_some()
    }
}

/// Kind of a transient status-bar notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// A transient status-bar notification, decayed by the 4 Hz logic tick.
#[derive(Debug)]
pub struct Toast {
    pub text: String,
    pub kind: ToastKind,
    ticks_left: u8,
}

/// The editable settings form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    DefaultModel,
    MaxFilesPerReview,
    MaxLinesPerFile,
    CachingEnabled,
    ParallelProcessing,
    BatchProcessing,
    RateLimitPerHour,
    RequestTimeoutSecs,
}

impl SettingsField {
    /// All fields in form order.
    pub const ALL: [SettingsField; 8] = [
        SettingsField::DefaultModel,
        SettingsField::MaxFilesPerReview,
        SettingsField::MaxLinesPerFile,
        SettingsField::CachingEnabled,
        SettingsField::ParallelProcessing,
        SettingsField::BatchProcessing,
        SettingsField::RateLimitPerHour,
        SettingsField::RequestTimeoutSecs,
    ];

    /// Form row label.
    pub fn label(self) -> &'static str {
        match self {
            SettingsField::DefaultModel => "Default model",
            SettingsField::MaxFilesPerReview => "Max files per review",
            SettingsField::MaxLinesPerFile => "Max lines per file",
            SettingsField::CachingEnabled => "Caching",
            SettingsField::ParallelProcessing => "Parallel processing",
            SettingsField::BatchProcessing => "Batch processing",
            SettingsField::RateLimitPerHour => "Rate limit (per hour)",
            SettingsField::RequestTimeoutSecs => "Request timeout (s)",
        }
    }

    /// True for boolean fields toggled in place (no edit buffer).
    pub fn is_toggle(self) -> bool {
        matches!(
            self,
            SettingsField::CachingEnabled
                | SettingsField::ParallelProcessing
                | SettingsField::BatchProcessing
        )
    }

    /// Current draft value rendered for the form row.
    pub fn display_value(self, draft: &Settings) -> String {
        fn opt_num(value: Option<u32>) -> String {
            value.map(|v| v.to_string()).unwrap_or_else(|| "(default)".to_owned())
        }
        fn opt_flag(value: Option<bool>) -> String {
            match value {
                Some(true) => "on".to_owned(),
                Some(false) => "off".to_owned(),
                None => "(default)".to_owned(),
            }
        }
        match self {
            SettingsField::DefaultModel => draft
                .default_model
                .clone()
                .unwrap_or_else(|| "(default)".to_owned()),
            SettingsField::MaxFilesPerReview => opt_num(draft.max_files_per_review),
            SettingsField::MaxLinesPerFile => opt_num(draft.max_lines_per_file),
            SettingsField::CachingEnabled => opt_flag(draft.caching_enabled),
            SettingsField::ParallelProcessing => opt_flag(draft.parallel_processing),
            SettingsField::BatchProcessing => opt_flag(draft.batch_processing),
            SettingsField::RateLimitPerHour => opt_num(draft.rate_limit_per_hour),
            SettingsField::RequestTimeoutSecs => opt_num(draft.request_timeout_secs),
        }
    }
}

/// All mutable UI state passed through every render cycle.
pub struct AppState {
    /// Currently visible page.
    pub page: Page,
    /// Current input mode governing which keybindings are active.
    pub mode: Mode,
    /// Sender into the background fetch worker; `None` only in unit tests.
    pub api_tx: Option<UnboundedSender<ApiRequest>>,

    // Dashboard
    /// Time range driving the metrics fetch key.
    pub dash_range: TimeRange,
    pub metrics: FetchSlot<Metrics>,
    /// Fixed most-recent-10 widget; independent of the metrics fetch.
    pub recent: FetchSlot<Vec<Review>>,

    // Reviews
    /// Committed query — the reviews fetch key is derived from this.
    pub review_query: ReviewQuery,
    /// Live buffer while typing in Search mode; committed on Enter.
    pub search_input: String,
    pub reviews: FetchSlot<Vec<Review>>,
    /// Table selection for the reviews listing.
    pub review_table: TableState,
    /// True while the review-detail overlay is shown.
    pub detail_open: bool,
    pub detail: FetchSlot<ReviewDetail>,
    /// Vertical scroll offset inside the detail overlay.
    pub detail_scroll: u16,
    /// Guard: at most one export request in flight.
    pub exporting: bool,

    // Analytics
    /// Time range driving the analytics fetch key.
    pub analytics_range: TimeRange,
    pub analytics: FetchSlot<Analytics>,

    // Settings
    pub settings: FetchSlot<Settings>,
    /// Local draft edited by the form; diverges from `settings` until saved.
    pub draft: Settings,
    /// True once the draft differs from the last fetched/saved settings.
    pub draft_dirty: bool,
    /// Guard: at most one save in flight; disables the save control.
    pub saving: bool,
    /// Selected form row index into [`SettingsField::ALL`].
    pub settings_cursor: usize,
    /// Text buffer while editing a field in EditField mode.
    pub edit_buffer: String,

    // Chrome
    pub toast: Option<Toast>,
    /// Vertical scroll offset for the help overlay.
    pub help_scroll: u16,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            page: Page::default(),
            mode: Mode::default(),
            api_tx: None,
            dash_range: TimeRange::H24,
            metrics: FetchSlot::default(),
            recent: FetchSlot::default(),
            review_query: ReviewQuery::default(),
            search_input: String::new(),
            reviews: FetchSlot::default(),
            review_table: TableState::default(),
            detail_open: false,
            detail: FetchSlot::default(),
            detail_scroll: 0,
            exporting: false,
            analytics_range: TimeRange::D7,
            analytics: FetchSlot::default(),
            settings: FetchSlot::default(),
            draft: Settings::default(),
            draft_dirty: false,
            saving: false,
            settings_cursor: 0,
            edit_buffer: String::new(),
            toast: None,
            help_scroll: 0,
        }
    }
}

impl AppState {
    fn send(&self, request: ApiRequest) {
        if let Some(tx) = &self.api_tx {
            let _ = tx.send(request);
        }
    }

    /// Shows a transient status-bar notification, replacing any current one.
    pub fn push_toast(&mut self, kind: ToastKind, text: impl Into<String>) {
        self.toast = Some(Toast {
            text: text.into(),
            kind,
            ticks_left: TOAST_TICKS,
        });
    }

    /// Advances time-based state; called on every 4 Hz logic tick.
    pub fn tick(&mut self) {
        if let Some(toast) = &mut self.toast {
            toast.ticks_left = toast.ticks_left.saturating_sub(1);
            if toast.ticks_left == 0 {
                self.toast = None;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Fetch issuance
    // -----------------------------------------------------------------------

    /// Switches to `page` and issues its fetches.
    ///
    /// Fetching on every entry is correct even when data is already present:
    /// the worker serves fresh cache entries without a network round-trip,
    /// and the slot keeps rendering the old payload while anything newer is
    /// in flight.
    pub fn enter_page(&mut self, page: Page) {
        self.page = page;
        self.refresh_page();
    }

    /// Re-issues the visible page's fetches (also bound to the `r` key).
    pub fn refresh_page(&mut self) {
        match self.page {
            Page::Dashboard => {
                self.fetch_metrics();
                self.fetch_recent();
            }
            Page::Reviews => self.fetch_reviews(),
            Page::Analytics => self.fetch_analytics(),
            Page::Settings => self.fetch_settings(),
        }
    }

    fn fetch_metrics(&mut self) {
        let key = FetchKey::Metrics(self.dash_range);
        self.metrics.begin(key.clone());
        self.send(ApiRequest::Fetch(key));
    }

    fn fetch_recent(&mut self) {
        let key = FetchKey::Reviews(ReviewQuery::recent(RECENT_REVIEWS_LIMIT));
        self.recent.begin(key.clone());
        self.send(ApiRequest::Fetch(key));
    }

    fn fetch_reviews(&mut self) {
        let key = FetchKey::Reviews(self.review_query.clone());
        self.reviews.begin(key.clone());
        self.send(ApiRequest::Fetch(key));
    }

    fn fetch_analytics(&mut self) {
        let key = FetchKey::Analytics(self.analytics_range);
        self.analytics.begin(key.clone());
        self.send(ApiRequest::Fetch(key));
    }

    fn fetch_settings(&mut self) {
        let key = FetchKey::Settings;
        self.settings.begin(key.clone());
        self.send(ApiRequest::Fetch(key));
    }

    // -----------------------------------------------------------------------
    // Filter mutations (each re-keys its page's fetch)
    // -----------------------------------------------------------------------

    /// Cycles the dashboard metrics window: 24h -> 7d -> 30d.
    pub fn cycle_dash_range(&mut self) {
        self.dash_range = self.dash_range.next();
        self.fetch_metrics();
    }

    /// Cycles the analytics window: 24h -> 7d -> 30d.
    pub fn cycle_analytics_range(&mut self) {
        self.analytics_range = self.analytics_range.next();
        self.fetch_analytics();
    }

    /// Commits the search box contents and refetches from page 1.
    pub fn commit_search(&mut self, text: String) {
        self.review_query.search = text;
        self.review_query.page = 1;
        self.fetch_reviews();
    }

    /// Cycles the status filter and refetches from page 1.
    pub fn cycle_status_filter(&mut self) {
        self.review_query.status = self.review_query.status.next();
        self.review_query.page = 1;
        self.fetch_reviews();
    }

    /// Cycles the sort key and refetches from page 1.
    ///
    /// Sorting re-orders the whole result space, so the old page number would
    /// show an arbitrary slice; pagination resets like any other filter.
    pub fn cycle_sort_key(&mut self) {
        self.review_query.sort = self.review_query.sort.next();
        self.review_query.page = 1;
        self.fetch_reviews();
    }

    /// Advances to the next reviews page when the current one is full.
    ///
    /// A short page proves there is nothing further; the backend sends no
    /// total count.
    pub fn next_review_page(&mut self) {
        let full_page = self
            .reviews
            .data
            .as_ref()
            .is_some_and(|rows| rows.len() as u32 >= self.review_query.limit);
        if full_page {
            self.review_query.page += 1;
            self.fetch_reviews();
        }
    }

    /// Steps back one reviews page (no-op on page 1).
    pub fn prev_review_page(&mut self) {
        if self.review_query.page > 1 {
            self.review_query.page -= 1;
            self.fetch_reviews();
        }
    }

    // -----------------------------------------------------------------------
    // Reviews table selection and detail overlay
    // -----------------------------------------------------------------------

    /// Number of rows currently shown in the reviews table.
    fn review_count(&self) -> usize {
        self.reviews.data.as_ref().map_or(0, Vec::len)
    }

    /// Moves the table selection down one row (clamped).
    pub fn select_next_review(&mut self) {
        let count = self.review_count();
        if count == 0 {
            return;
        }
        let next = match self.review_table.selected() {
            Some(i) => (i + 1).min(count - 1),
            None => 0,
        };
        self.review_table.select(Some(next));
    }

    /// Moves the table selection up one row (clamped).
    pub fn select_prev_review(&mut self) {
        if self.review_count() == 0 {
            return;
        }
        let prev = match self.review_table.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.review_table.select(Some(prev));
    }

    /// Returns the review under the table cursor, if any.
    pub fn selected_review(&self) -> Option<&Review> {
        let rows = self.reviews.data.as_ref()?;
        rows.get(self.review_table.selected()?)
    }

    /// Opens the detail overlay for the selected review and fetches it.
    pub fn open_selected_detail(&mut self) {
        let Some(id) = self.selected_review().map(|r| r.id.clone()) else {
            return;
        };
        self.detail = FetchSlot::default();
        self.detail_scroll = 0;
        self.detail_open = true;
        let key = FetchKey::ReviewDetail(id);
        self.detail.begin(key.clone());
        self.send(ApiRequest::Fetch(key));
    }

    /// Closes the detail overlay.
    pub fn close_detail(&mut self) {
        self.detail_open = false;
    }

    /// Starts a one-shot export of the current listing's status filter.
    ///
    /// The search/sort/page variables deliberately do not apply: export
    /// serializes the filtered set, not the visible page.
    pub fn start_export(&mut self, format: ExportFormat) {
        if self.exporting {
            return;
        }
        self.exporting = true;
        self.push_toast(ToastKind::Info, format!("Exporting {}...", format.as_param()));
        self.send(ApiRequest::Export {
            format,
            status: self.review_query.status,
        });
    }

    /// Writes a completed export body to the working directory.
    ///
    /// Only called once the full body is in memory, so a failed export never
    /// leaves a partial file behind.
    fn deliver_export(&mut self, format: ExportFormat, body: &str) {
        let name = format!(
            "reviews-export-{}.{}",
            chrono::Utc::now().format("%Y%m%d-%H%M%S"),
            format.extension()
        );
        match std::fs::write(&name, body) {
            Ok(()) => self.push_toast(ToastKind::Success, format!("Export written to {name}")),
            Err(e) => self.push_toast(ToastKind::Error, format!("Export write failed: {e}")),
        }
    }

    // -----------------------------------------------------------------------
    // Settings draft
    // -----------------------------------------------------------------------

    /// The form field under the cursor.
    pub fn settings_field(&self) -> SettingsField {
        SettingsField::ALL[self.settings_cursor.min(SettingsField::ALL.len() - 1)]
    }

    /// Moves the form cursor down one row (clamped).
    pub fn settings_cursor_down(&mut self) {
        self.settings_cursor = (self.settings_cursor + 1).min(SettingsField::ALL.len() - 1);
    }

    /// Moves the form cursor up one row (clamped).
    pub fn settings_cursor_up(&mut self) {
        self.settings_cursor = self.settings_cursor.saturating_sub(1);
    }

    /// Activates the field under the cursor: toggles flags in place, enters
    /// EditField mode for text/numeric fields.
    pub fn activate_settings_field(&mut self) {
        let field = self.settings_field();
        if field.is_toggle() {
            let slot = match field {
                SettingsField::CachingEnabled => &mut self.draft.caching_enabled,
                SettingsField::ParallelProcessing => &mut self.draft.parallel_processing,
                SettingsField::BatchProcessing => &mut self.draft.batch_processing,
                _ => unreachable!("is_toggle covers exactly the flag fields"),
            };
            *slot = Some(!slot.unwrap_or(false));
            self.draft_dirty = true;
        } else {
            self.edit_buffer = match field {
                SettingsField::DefaultModel => self.draft.default_model.clone().unwrap_or_default(),
                SettingsField::MaxFilesPerReview => {
                    self.draft.max_files_per_review.map(|v| v.to_string()).unwrap_or_default()
                }
                SettingsField::MaxLinesPerFile => {
                    self.draft.max_lines_per_file.map(|v| v.to_string()).unwrap_or_default()
                }
                SettingsField::RateLimitPerHour => {
                    self.draft.rate_limit_per_hour.map(|v| v.to_string()).unwrap_or_default()
                }
                SettingsField::RequestTimeoutSecs => {
                    self.draft.request_timeout_secs.map(|v| v.to_string()).unwrap_or_default()
                }
                _ => String::new(),
            };
            self.mode = Mode::EditField;
        }
    }

    /// Commits the edit buffer into the draft. An empty buffer clears the
    /// field back to the backend default; a non-numeric value for a numeric
    /// field toasts and keeps the editor open.
    pub fn commit_field_edit(&mut self) {
        let field = self.settings_field();
        let text = self.edit_buffer.trim().to_owned();

        if field == SettingsField::DefaultModel {
            self.draft.default_model = (!text.is_empty()).then_some(text);
        } else {
            let parsed = if text.is_empty() {
                None
            } else {
                match text.parse::<u32>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        self.push_toast(ToastKind::Error, format!("Not a number: {text}"));
                        return;
                    }
                }
            };
            match field {
                SettingsField::MaxFilesPerReview => self.draft.max_files_per_review = parsed,
                SettingsField::MaxLinesPerFile => self.draft.max_lines_per_file = parsed,
                SettingsField::RateLimitPerHour => self.draft.rate_limit_per_hour = parsed,
                SettingsField::RequestTimeoutSecs => self.draft.request_timeout_secs = parsed,
                _ => {}
            }
        }
        self.draft_dirty = true;
        self.mode = Mode::Normal;
    }

    /// Abandons the edit buffer without touching the draft.
    pub fn cancel_field_edit(&mut self) {
        self.edit_buffer.clear();
        self.mode = Mode::Normal;
    }

    /// Submits the whole draft as a full-replace save.
    ///
    /// The `saving` guard ensures exactly one in-flight save; the save key in
    /// the UI is disabled (ignored) until the result arrives.
    pub fn save_settings(&mut self) {
        if self.saving {
            return;
        }
        self.saving = true;
        self.send(ApiRequest::SaveSettings(self.draft.clone()));
    }

    // -----------------------------------------------------------------------
    // Worker results
    // -----------------------------------------------------------------------

    /// Applies a worker result to the owning slot.
    ///
    /// Key-matching happens inside [`FetchSlot::accept`]: superseded results
    /// come back `Stale` and are dropped here. A failed refresh of data that
    /// is still on screen becomes a toast; a failure with nothing to show
    /// becomes the slot's blocking error state.
    pub fn apply_api_result(&mut self, outcome: ApiOutcome) {
        match outcome {
            ApiOutcome::Fetched { key, result } => self.apply_fetched(key, result),
            ApiOutcome::Saved { result } => {
                self.saving = false;
                match result {
                    Ok(settings) => {
                        self.draft = settings.clone();
                        self.draft_dirty = false;
                        self.settings.data = Some(settings);
                        self.settings.error = None;
                        self.push_toast(ToastKind::Success, "Settings saved");
                    }
                    Err(error) => {
                        // Draft stays intact: the user's edits are not lost.
                        self.push_toast(ToastKind::Error, format!("Save failed: {error}"));
                    }
                }
            }
            ApiOutcome::Exported { format, result } => {
                self.exporting = false;
                match result {
                    Ok(body) => self.deliver_export(format, &body),
                    Err(error) => {
                        self.push_toast(ToastKind::Error, format!("Export failed: {error}"));
                    }
                }
            }
        }
    }

    fn apply_fetched(&mut self, key: FetchKey, result: Result<ApiData, String>) {
        let update = match &key {
            FetchKey::Metrics(_) => {
                let result = result.and_then(|data| match data {
                    ApiData::Metrics(metrics) => Ok(metrics),
                    _ => Err("mismatched payload".to_owned()),
                });
                self.metrics.accept(&key, result)
            }
            FetchKey::Reviews(_) => {
                let result = result.and_then(|data| match data {
                    ApiData::Reviews(reviews) => Ok(reviews),
                    _ => Err("mismatched payload".to_owned()),
                });
                // Two slots fetch reviews (dashboard recent + reviews page);
                // the key decides which one this result belongs to.
                if self.recent.key.as_ref() == Some(&key) {
                    self.recent.accept(&key, result)
                } else {
                    let update = self.reviews.accept(&key, result);
                    if update == SlotUpdate::Updated {
                        self.clamp_review_selection();
                    }
                    update
                }
            }
            FetchKey::ReviewDetail(_) => {
                let result = result.and_then(|data| match data {
                    ApiData::ReviewDetail(detail) => Ok(*detail),
                    _ => Err("mismatched payload".to_owned()),
                });
                self.detail.accept(&key, result)
            }
            FetchKey::Analytics(_) => {
                let result = result.and_then(|data| match data {
                    ApiData::Analytics(analytics) => Ok(analytics),
                    _ => Err("mismatched payload".to_owned()),
                });
                self.analytics.accept(&key, result)
            }
            FetchKey::Settings => {
                let result = result.and_then(|data| match data {
                    ApiData::Settings(settings) => Ok(settings),
                    _ => Err("mismatched payload".to_owned()),
                });
                let update = self.settings.accept(&key, result);
                if update == SlotUpdate::Updated && !self.draft_dirty {
                    // Refresh the clean draft; dirty edits survive a refetch.
                    if let Some(settings) = &self.settings.data {
                        self.draft = settings.clone();
                    }
                }
                update
            }
        };

        match update {
            SlotUpdate::Stale => {
                tracing::debug!(?key, "dropped stale fetch result");
            }
            SlotUpdate::Updated => {}
            SlotUpdate::Failed { error, had_data } => {
                if had_data {
                    self.push_toast(ToastKind::Error, format!("Refresh failed: {error}"));
                }
            }
        }
    }

    /// Keeps the table cursor inside the freshly fetched row set.
    fn clamp_review_selection(&mut self) {
        let count = self.review_count();
        if count == 0 {
            self.review_table.select(None);
        } else {
            match self.review_table.selected() {
                Some(i) if i < count => {}
                _ => self.review_table.select(Some(0)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use revdash_core::types::{ReviewStatus, SortKey, StatusFilter};

    fn review(id: &str) -> Review {
        Review {
            id: id.to_owned(),
            installation_id: "inst".to_owned(),
            repo_name: "acme/api".to_owned(),
            pr_number: 1,
            pr_url: "https://example.invalid/pr/1".to_owned(),
            commit_sha: "abc".to_owned(),
            files_reviewed: 1,
            status: ReviewStatus::Success,
            total_comments: 0,
            api_latency_ms: Some(100),
            cache_hit: false,
            error_message: None,
            created_at: "2026-08-05T14:32:11Z".parse().unwrap(),
            updated_at: "2026-08-05T14:32:11Z".parse().unwrap(),
        }
    }

    fn reviews_result(ids: &[&str]) -> Result<ApiData, String> {
        Ok(ApiData::Reviews(ids.iter().map(|id| review(id)).collect()))
    }

    #[test]
    fn changing_filters_resets_page_to_one() {
        let mut state = AppState::default();
        state.review_query.page = 4;
        state.cycle_status_filter();
        assert_eq!(state.review_query.page, 1);

        state.review_query.page = 4;
        state.commit_search("auth".to_owned());
        assert_eq!(state.review_query.page, 1);

        state.review_query.page = 4;
        state.cycle_sort_key();
        assert_eq!(state.review_query.page, 1);
        assert_eq!(state.review_query.sort, SortKey::Latency);
    }

    #[test]
    fn stale_results_are_dropped_by_key_matching() {
        let mut state = AppState::default();
        state.enter_page(Page::Reviews);
        let old_key = state.reviews.key.clone().unwrap();

        // Filter changes while the old fetch is still in flight.
        state.cycle_status_filter();
        state.apply_api_result(ApiOutcome::Fetched {
            key: old_key,
            result: reviews_result(&["stale"]),
        });
        assert!(state.reviews.data.is_none(), "stale payload must not render");
        assert!(state.reviews.loading, "new fetch is still outstanding");

        let new_key = state.reviews.key.clone().unwrap();
        state.apply_api_result(ApiOutcome::Fetched {
            key: new_key,
            result: reviews_result(&["current"]),
        });
        assert_eq!(state.reviews.data.as_ref().unwrap()[0].id, "current");
        assert!(!state.reviews.loading);
    }

    #[test]
    fn recent_and_reviews_results_route_by_key() {
        let mut state = AppState::default();
        state.enter_page(Page::Dashboard);
        state.enter_page(Page::Reviews);

        let recent_key = state.recent.key.clone().unwrap();
        state.apply_api_result(ApiOutcome::Fetched {
            key: recent_key,
            result: reviews_result(&["recent-1"]),
        });
        assert_eq!(state.recent.data.as_ref().unwrap().len(), 1);
        assert!(state.reviews.data.is_none());
    }

    #[test]
    fn failed_save_keeps_draft_and_clears_saving_flag() {
        let mut state = AppState::default();
        state.draft.max_files_per_review = Some(30);
        state.draft_dirty = true;
        state.save_settings();
        assert!(state.saving);

        state.apply_api_result(ApiOutcome::Saved {
            result: Err("503".to_owned()),
        });
        assert!(!state.saving);
        assert!(state.draft_dirty);
        assert_eq!(state.draft.max_files_per_review, Some(30));
        assert_eq!(state.toast.as_ref().unwrap().kind, ToastKind::Error);
    }

    #[test]
    fn successful_save_adopts_returned_settings() {
        let mut state = AppState::default();
        state.draft.default_model = Some("gemini-pro".to_owned());
        state.draft_dirty = true;
        state.save_settings();

        let saved = state.draft.clone();
        state.apply_api_result(ApiOutcome::Saved { result: Ok(saved.clone()) });
        assert!(!state.saving);
        assert!(!state.draft_dirty);
        assert_eq!(state.settings.data.as_ref(), Some(&saved));
    }

    #[test]
    fn second_save_is_blocked_while_one_is_in_flight() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut state = AppState { api_tx: Some(tx), ..AppState::default() };
        state.save_settings();
        state.save_settings();
        assert!(rx.try_recv().is_ok(), "first save goes out");
        assert!(rx.try_recv().is_err(), "second save is suppressed by the guard");
    }

    #[test]
    fn refresh_failure_with_data_toasts_instead_of_blocking() {
        let mut state = AppState::default();
        state.enter_page(Page::Reviews);
        let key = state.reviews.key.clone().unwrap();
        state.apply_api_result(ApiOutcome::Fetched {
            key: key.clone(),
            result: reviews_result(&["r-1"]),
        });

        state.refresh_page();
        let key = state.reviews.key.clone().unwrap();
        state.apply_api_result(ApiOutcome::Fetched {
            key,
            result: Err("connection reset".to_owned()),
        });
        assert!(state.reviews.data.is_some(), "previous rows keep rendering");
        assert!(matches!(state.reviews.view(), SlotView::Ready(_)));
        assert_eq!(state.toast.as_ref().unwrap().kind, ToastKind::Error);
    }

    #[test]
    fn error_without_data_blocks_the_page() {
        let mut state = AppState::default();
        state.enter_page(Page::Analytics);
        let key = state.analytics.key.clone().unwrap();
        state.apply_api_result(ApiOutcome::Fetched {
            key,
            result: Err("boom".to_owned()),
        });
        assert!(matches!(state.analytics.view(), SlotView::Error("boom")));
    }

    #[test]
    fn next_page_requires_a_full_page() {
        let mut state = AppState::default();
        state.review_query.limit = 2;
        state.enter_page(Page::Reviews);
        let key = state.reviews.key.clone().unwrap();
        state.apply_api_result(ApiOutcome::Fetched {
            key,
            result: reviews_result(&["a"]),
        });
        state.next_review_page();
        assert_eq!(state.review_query.page, 1, "short page means no further data");

        let key = state.reviews.key.clone().unwrap();
        state.apply_api_result(ApiOutcome::Fetched {
            key,
            result: reviews_result(&["a", "b"]),
        });
        state.next_review_page();
        assert_eq!(state.review_query.page, 2);
        state.prev_review_page();
        assert_eq!(state.review_query.page, 1);
        state.prev_review_page();
        assert_eq!(state.review_query.page, 1);
    }

    #[test]
    fn toasts_decay_after_their_tick_budget() {
        let mut state = AppState::default();
        state.push_toast(ToastKind::Info, "hello");
        for _ in 0..11 {
            state.tick();
        }
        assert!(state.toast.is_some());
        state.tick();
        assert!(state.toast.is_none());
    }

    #[test]
    fn clean_draft_follows_fetched_settings_but_dirty_draft_survives() {
        let mut state = AppState::default();
        state.enter_page(Page::Settings);
        let fetched = Settings { max_files_per_review: Some(20), ..Settings::default() };
        state.apply_api_result(ApiOutcome::Fetched {
            key: FetchKey::Settings,
            result: Ok(ApiData::Settings(fetched.clone())),
        });
        assert_eq!(state.draft, fetched);

        state.draft.max_files_per_review = Some(99);
        state.draft_dirty = true;
        state.enter_page(Page::Settings);
        state.apply_api_result(ApiOutcome::Fetched {
            key: FetchKey::Settings,
            result: Ok(ApiData::Settings(fetched)),
        });
        assert_eq!(state.draft.max_files_per_review, Some(99));
    }

    #[test]
    fn export_guard_allows_one_in_flight_request() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut state = AppState { api_tx: Some(tx), ..AppState::default() };
        state.start_export(ExportFormat::Csv);
        state.start_export(ExportFormat::Json);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err(), "second export suppressed while in flight");
        assert_eq!(state.review_query.status, StatusFilter::All);
    }
}
