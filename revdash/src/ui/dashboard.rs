//! Dashboard page: four metric stat cards plus the most-recent-reviews table.
//!
//! Metrics and the recent list are two independent fetches — either half can
//! be loading, failed, or ready on any given frame, and each half derives its
//! own view state.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use revdash_core::types::{Metrics, Review};

use crate::app::{AppState, SlotView};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};
use crate::ui::widgets;

/// Renders the dashboard page into `area`.
pub fn render(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let [cards_area, recent_area] =
        area.layout(&Layout::vertical([Constraint::Length(5), Constraint::Fill(1)]));

    match state.metrics.view() {
        SlotView::Ready(metrics) => render_metric_cards(frame, cards_area, state, metrics, theme),
        SlotView::Loading => render_card_skeletons(frame, cards_area, theme),
        SlotView::Error(message) => {
            let block = panel_block("Metrics", false, theme);
            let inner = inner_rect(cards_area);
            frame.render_widget(block, cards_area);
            frame.render_widget(
                Paragraph::new(widgets::error_state_lines(message, theme)),
                inner,
            );
        }
    }

    render_recent(frame, recent_area, state, theme);
}

/// One stat card per aggregate counter, with its trend underneath the value.
fn render_metric_cards(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    metrics: &Metrics,
    theme: &Theme,
) {
    let range = state.dash_range.as_param();
    let cards: [(String, String, f64, bool); 4] = [
        (
            format!("Total Reviews ({range})"),
            widgets::format_count(metrics.total_reviews),
            metrics.total_reviews_trend,
            false,
        ),
        (
            "Success Rate".to_owned(),
            format!("{:.1}%", metrics.success_rate),
            metrics.success_rate_trend,
            false,
        ),
        (
            "Avg Latency".to_owned(),
            format!("{:.0} ms", metrics.average_latency_ms),
            metrics.average_latency_trend,
            true,
        ),
        (
            "Cache Hit Rate".to_owned(),
            format!("{:.1}%", metrics.cache_hit_rate),
            metrics.cache_hit_rate_trend,
            false,
        ),
    ];

    let areas = card_areas(area);
    for ((title, value, trend, lower_is_better), card_area) in cards.into_iter().zip(areas) {
        let block = panel_block(&title, false, theme);
        let inner = inner_rect(card_area);
        frame.render_widget(block, card_area);

        let lines = vec![
            Line::from(Span::styled(
                value,
                Style::default()
                    .fg(theme.value_emphasis)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(widgets::trend_span(trend, lower_is_better, theme)),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// Skeleton placeholders in card shape while the first metrics fetch runs.
fn render_card_skeletons(frame: &mut Frame, area: Rect, theme: &Theme) {
    for card_area in card_areas(area) {
        let block = panel_block("", false, theme);
        let inner = inner_rect(card_area);
        frame.render_widget(block, card_area);
        let width = inner.width.saturating_sub(2).max(4) as usize;
        let lines = vec![
            widgets::skeleton_line(width, theme),
            widgets::skeleton_line(width / 2, theme),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// Splits the cards row into four equal columns.
fn card_areas(area: Rect) -> [Rect; 4] {
    area.layout(&Layout::horizontal([
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
    ]))
}

/// The fixed most-recent-10 table under the cards.
fn render_recent(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let block = panel_block("Recent Reviews", false, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    match state.recent.view() {
        SlotView::Ready(reviews) if reviews.is_empty() => {
            frame.render_widget(
                Paragraph::new(widgets::empty_state_lines(
                    "No reviews yet",
                    "Completed reviews appear here as they finish",
                    theme,
                )),
                inner,
            );
        }
        SlotView::Ready(reviews) => {
            let rows: Vec<Row> = reviews.iter().map(|r| recent_row(r, theme)).collect();
            frame.render_widget(recent_table(rows, theme), inner);
        }
        SlotView::Loading => {
            frame.render_widget(recent_table(widgets::skeleton_rows(4, theme), theme), inner);
        }
        SlotView::Error(message) => {
            frame.render_widget(Paragraph::new(widgets::error_state_lines(message, theme)), inner);
        }
    }
}

fn recent_table<'a>(rows: Vec<Row<'a>>, theme: &Theme) -> Table<'a> {
    Table::new(
        rows,
        [
            Constraint::Fill(2),
            Constraint::Length(7),
            Constraint::Length(12),
            Constraint::Length(14),
        ],
    )
    .header(
        Row::new(["Repository", "PR", "Status", "Created"])
            .style(Style::default().fg(theme.text_dim).add_modifier(Modifier::BOLD)),
    )
}

fn recent_row<'a>(review: &Review, theme: &Theme) -> Row<'a> {
    Row::new(vec![
        Cell::from(review.repo_name.clone()),
        Cell::from(format!("#{}", review.pr_number)),
        Cell::from(widgets::status_badge(review.status, theme)),
        Cell::from(widgets::format_timestamp(&review.created_at)),
    ])
}
