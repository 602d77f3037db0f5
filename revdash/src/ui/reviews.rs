//! Reviews page: the paginated, searchable table plus the detail overlay.
//!
//! The table renders from the committed [`ReviewQuery`] snapshot in app
//! state; the filter line above it shows which variables are currently part
//! of the fetch key. While a refetch for a changed key is in flight the
//! previous rows keep rendering, so paging never blanks the view.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use revdash_core::types::{Review, ReviewDetail};

use crate::app::{AppState, SlotView};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};
use crate::ui::widgets;

const TABLE_COLUMNS: usize = 8;

/// Renders the reviews page into `area`.
pub fn render(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let title = format!("Reviews — page {}", state.review_query.page);
    let block = panel_block(&title, true, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let [filter_area, table_area] =
        inner.layout(&Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]));

    render_filter_line(frame, filter_area, state, theme);

    match state.reviews.view() {
        SlotView::Ready(reviews) if reviews.is_empty() => {
            frame.render_widget(
                Paragraph::new(widgets::empty_state_lines(
                    "No reviews found",
                    "Adjust the search text or status filter",
                    theme,
                )),
                table_area,
            );
        }
        SlotView::Ready(reviews) => {
            let rows: Vec<Row> = reviews.iter().map(|r| review_row(r, theme)).collect();
            let table = review_table(rows, theme)
                .row_highlight_style(
                    Style::default()
                        .fg(theme.selection)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");
            frame.render_stateful_widget(table, table_area, &mut state.review_table);
        }
        SlotView::Loading => {
            frame.render_widget(
                review_table(widgets::skeleton_rows(TABLE_COLUMNS, theme), theme),
                table_area,
            );
        }
        SlotView::Error(message) => {
            frame.render_widget(Paragraph::new(widgets::error_state_lines(message, theme)), table_area);
        }
    }
}

/// One line summarizing the committed filter variables.
fn render_filter_line(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let query = &state.review_query;
    let search = if query.search.trim().is_empty() {
        "(none)".to_owned()
    } else {
        format!("\"{}\"", query.search)
    };
    let line = Line::from(vec![
        Span::styled("search ", Style::default().fg(theme.text_dim)),
        Span::raw(search),
        Span::styled("  status ", Style::default().fg(theme.text_dim)),
        Span::raw(query.status.label()),
        Span::styled("  sort ", Style::default().fg(theme.text_dim)),
        Span::raw(query.sort.as_param()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn review_table<'a>(rows: Vec<Row<'a>>, theme: &Theme) -> Table<'a> {
    Table::new(
        rows,
        [
            Constraint::Fill(2),
            Constraint::Length(7),
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Length(6),
            Constraint::Length(14),
        ],
    )
    .header(
        Row::new(["Repository", "PR", "Status", "Files", "Cmts", "Latency", "Cache", "Created"])
            .style(Style::default().fg(theme.text_dim).add_modifier(Modifier::BOLD)),
    )
}

fn review_row<'a>(review: &Review, theme: &Theme) -> Row<'a> {
    let cache = if review.cache_hit { "hit" } else { "miss" };
    Row::new(vec![
        Cell::from(review.repo_name.clone()),
        Cell::from(format!("#{}", review.pr_number)),
        Cell::from(widgets::status_badge(review.status, theme)),
        Cell::from(review.files_reviewed.to_string()),
        Cell::from(review.total_comments.to_string()),
        Cell::from(widgets::latency_label(review.api_latency_ms)),
        Cell::from(cache),
        Cell::from(widgets::format_timestamp(&review.created_at)),
    ])
}

/// Renders the review-detail modal on top of the page.
///
/// Erases the overlay area with `Clear` first, then draws a bordered
/// `Paragraph` scrolled by `detail_scroll`. Skipped on very narrow terminals
/// to avoid a zero-height `Rect`.
pub fn render_detail_overlay(frame: &mut Frame, state: &AppState, theme: &Theme) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));
    frame.render_widget(Clear, overlay_area);

    let (title, lines) = match state.detail.view() {
        SlotView::Ready(detail) => (
            format!(
                " {} #{} — j/k scroll, Esc to close ",
                detail.review.repo_name, detail.review.pr_number
            ),
            detail_lines(detail, theme),
        ),
        SlotView::Loading => (
            " Review ".to_owned(),
            vec![Line::from(""), widgets::skeleton_line(40, theme), widgets::skeleton_line(28, theme)],
        ),
        SlotView::Error(message) => (" Review ".to_owned(), widgets::error_state_lines(message, theme)),
    };

    let block = panel_block(&title, true, theme);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((state.detail_scroll, 0)),
        overlay_area,
    );
}

/// Builds the full detail body: record header, comments, feedback.
fn detail_lines(detail: &ReviewDetail, theme: &Theme) -> Vec<Line<'static>> {
    let review = &detail.review;
    let dim = Style::default().fg(theme.text_dim);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Status     ", dim),
            widgets::status_badge(review.status, theme),
        ]),
        Line::from(vec![Span::styled("PR         ", dim), Span::raw(review.pr_url.clone())]),
        Line::from(vec![Span::styled("Commit     ", dim), Span::raw(review.commit_sha.clone())]),
        Line::from(vec![
            Span::styled("Files      ", dim),
            Span::raw(review.files_reviewed.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Latency    ", dim),
            Span::raw(widgets::latency_label(review.api_latency_ms)),
        ]),
        Line::from(vec![
            Span::styled("Cache      ", dim),
            Span::raw(if review.cache_hit { "hit" } else { "miss" }),
        ]),
        Line::from(vec![
            Span::styled("Created    ", dim),
            Span::raw(widgets::format_timestamp(&review.created_at)),
        ]),
    ];

    if let Some(message) = &review.error_message {
        lines.push(Line::from(vec![
            Span::styled("Error      ", dim),
            Span::styled(message.clone(), Style::default().fg(theme.status_failure)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Comments ({})", detail.comments.len()),
        Style::default().add_modifier(Modifier::BOLD),
    )));

    if detail.comments.is_empty() {
        lines.push(Line::from(Span::styled("  (none)", dim)));
    }
    for comment in &detail.comments {
        let location = match comment.line_number {
            Some(line) => format!("{}:{}", comment.file_path, line),
            None => comment.file_path.clone(),
        };
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", widgets::severity_label(comment.severity)),
                Style::default()
                    .fg(widgets::severity_color(comment.severity, theme))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(location, dim),
        ]));
        lines.push(Line::from(format!("  {}", comment.comment_text)));
    }

    if let Some(feedback) = &detail.feedback {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Feedback",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        let helpful = if feedback.is_helpful { "helpful" } else { "not helpful" };
        lines.push(Line::from(format!("  {}/5 — {}", feedback.rating, helpful)));
        if let Some(comment) = &feedback.user_comment {
            lines.push(Line::from(format!("  {comment}")));
        }
    }

    lines
}
