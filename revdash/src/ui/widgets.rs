//! Shared presentational helpers.
//!
//! Pure functions from entity values to spans, lines, and rows — no state,
//! no layout arithmetic. The derived-display rules live here: status badge
//! mapping, trend favorability, timestamp formatting, and the skeleton and
//! empty/error placeholders, so every page renders them identically.

use chrono::{DateTime, Utc};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Row};

use revdash_core::types::{CommentSeverity, ReviewStatus};

use crate::theme::Theme;

/// Fixed number of skeleton rows/cards rendered while a first fetch is in
/// flight.
pub const SKELETON_ROWS: usize = 5;

/// Badge icon for a review status; `None` for unrecognized values, which
/// render with no icon at all.
pub fn badge_glyph(status: ReviewStatus) -> Option<&'static str> {
    match status {
        ReviewStatus::Success => Some("✓"),
        ReviewStatus::PartialFailure => Some("!"),
        ReviewStatus::Failure => Some("✗"),
        ReviewStatus::Unknown => None,
    }
}

/// Badge text for a review status.
pub fn badge_label(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::Success => "success",
        ReviewStatus::PartialFailure => "partial",
        ReviewStatus::Failure => "failure",
        ReviewStatus::Unknown => "unknown",
    }
}

/// Badge color for a review status.
pub fn badge_color(status: ReviewStatus, theme: &Theme) -> Color {
    match status {
        ReviewStatus::Success => theme.status_success,
        ReviewStatus::PartialFailure => theme.status_warning,
        ReviewStatus::Failure => theme.status_failure,
        ReviewStatus::Unknown => theme.status_neutral,
    }
}

/// Complete status badge: icon (when recognized) plus label, colored.
pub fn status_badge(status: ReviewStatus, theme: &Theme) -> Span<'static> {
    let text = match badge_glyph(status) {
        Some(glyph) => format!("{glyph} {}", badge_label(status)),
        None => badge_label(status).to_owned(),
    };
    Span::styled(text, Style::default().fg(badge_color(status, theme)))
}

/// Whether a trend value is favorable.
///
/// For lower-is-better metrics (latency, error rate) the comparison against
/// zero is sign-inverted: a falling value is the good direction.
pub fn is_favorable(trend: f64, lower_is_better: bool) -> bool {
    if lower_is_better {
        trend < 0.0
    } else {
        trend > 0.0
    }
}

/// Displayed trend magnitude — always the absolute value.
pub fn trend_label(trend: f64) -> String {
    format!("{:.1}%", trend.abs())
}

/// Trend indicator span: direction arrow from the raw sign, color from
/// favorability, magnitude as absolute value. A zero trend renders dim with
/// no direction.
pub fn trend_span(trend: f64, lower_is_better: bool, theme: &Theme) -> Span<'static> {
    let arrow = if trend > 0.0 {
        "▲ "
    } else if trend < 0.0 {
        "▼ "
    } else {
        "· "
    };
    let color = if trend == 0.0 {
        theme.text_dim
    } else if is_favorable(trend, lower_is_better) {
        theme.trend_favorable
    } else {
        theme.trend_unfavorable
    };
    Span::styled(format!("{arrow}{}", trend_label(trend)), Style::default().fg(color))
}

/// Renders a created/updated timestamp as month abbreviation, day, and
/// 24-hour time, e.g. `Aug 5, 14:32`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %H:%M").to_string()
}

/// Integer with thousands separators, e.g. `12,345`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Latency cell text; reviews that never reached the model have none.
pub fn latency_label(latency_ms: Option<u64>) -> String {
    match latency_ms {
        Some(ms) => format!("{ms} ms"),
        None => "—".to_owned(),
    }
}

/// Badge color for a comment severity (review detail overlay).
pub fn severity_color(severity: CommentSeverity, theme: &Theme) -> Color {
    match severity {
        CommentSeverity::Critical => theme.severity_critical,
        CommentSeverity::Warning => theme.severity_warning,
        CommentSeverity::Info => theme.severity_info,
        CommentSeverity::Unknown => theme.status_neutral,
    }
}

/// Badge text for a comment severity.
pub fn severity_label(severity: CommentSeverity) -> &'static str {
    match severity {
        CommentSeverity::Critical => "CRITICAL",
        CommentSeverity::Warning => "WARNING",
        CommentSeverity::Info => "INFO",
        CommentSeverity::Unknown => "NOTE",
    }
}

/// One skeleton placeholder line of the given width.
pub fn skeleton_line(width: usize, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        "▒".repeat(width),
        Style::default().fg(theme.skeleton),
    ))
}

/// Fixed-count skeleton table rows shown while a first fetch is in flight.
pub fn skeleton_rows(columns: usize, theme: &Theme) -> Vec<Row<'static>> {
    (0..SKELETON_ROWS)
        .map(|_| {
            Row::new(
                (0..columns)
                    .map(|_| {
                        Cell::from(Span::styled(
                            "▒▒▒▒▒▒",
                            Style::default().fg(theme.skeleton),
                        ))
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

/// Distinct placeholder for a fetch that succeeded with zero elements.
pub fn empty_state_lines(title: &str, hint: &str, theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            title.to_owned(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(hint.to_owned(), Style::default().fg(theme.text_dim))),
    ]
}

/// Blocking error state for a page whose only fetch failed with no previous
/// payload to fall back on.
pub fn error_state_lines(message: &str, theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            "Something went wrong",
            Style::default()
                .fg(theme.status_failure)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(message.to_owned()),
        Line::from(Span::styled(
            "press r to retry",
            Style::default().fg(theme.text_dim),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_mapping_matches_the_contract_exactly() {
        assert_eq!(badge_glyph(ReviewStatus::Success), Some("✓"));
        assert_eq!(badge_glyph(ReviewStatus::PartialFailure), Some("!"));
        assert_eq!(badge_glyph(ReviewStatus::Failure), Some("✗"));
        assert_eq!(badge_glyph(ReviewStatus::Unknown), None, "no icon for unrecognized values");

        let theme = Theme::dark();
        assert_eq!(badge_color(ReviewStatus::Success, &theme), theme.status_success);
        assert_eq!(badge_color(ReviewStatus::PartialFailure, &theme), theme.status_warning);
        assert_eq!(badge_color(ReviewStatus::Failure, &theme), theme.status_failure);
        assert_eq!(badge_color(ReviewStatus::Unknown, &theme), theme.status_neutral);
    }

    #[test]
    fn latency_trend_favorability_is_sign_inverted() {
        // Falling latency is an improvement; rising is a regression.
        assert!(is_favorable(-5.0, true));
        assert!(!is_favorable(5.0, true));
        // Rising review counts are an improvement.
        assert!(is_favorable(5.0, false));
        assert!(!is_favorable(-5.0, false));
    }

    #[test]
    fn trend_magnitude_is_displayed_as_absolute_value() {
        assert_eq!(trend_label(-5.0), "5.0%");
        assert_eq!(trend_label(5.0), "5.0%");

        let theme = Theme::dark();
        let favorable = trend_span(-5.0, true, &theme);
        assert!(favorable.content.contains("5.0%"));
        assert_eq!(favorable.style.fg, Some(theme.trend_favorable));

        let unfavorable = trend_span(5.0, true, &theme);
        assert!(unfavorable.content.contains("5.0%"));
        assert_eq!(unfavorable.style.fg, Some(theme.trend_unfavorable));
    }

    #[test]
    fn timestamps_render_as_month_day_and_24h_time() {
        let ts: DateTime<Utc> = "2026-08-05T14:32:11Z".parse().unwrap();
        assert_eq!(format_timestamp(&ts), "Aug 5, 14:32");
        let ts: DateTime<Utc> = "2026-01-31T03:05:00Z".parse().unwrap();
        assert_eq!(format_timestamp(&ts), "Jan 31, 03:05");
    }

    #[test]
    fn skeletons_have_a_fixed_row_count() {
        let theme = Theme::dark();
        assert_eq!(skeleton_rows(4, &theme).len(), SKELETON_ROWS);
    }

    #[test]
    fn counts_get_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(12_345), "12,345");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
