//! Analytics page: extended aggregates for a time window.
//!
//! Three trend cards on top, the per-model and per-repository tables side by
//! side underneath, and a one-line cache/cost summary at the bottom. The
//! whole page derives from a single fetch keyed by the time range.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use revdash_core::types::Analytics;

use crate::app::{AppState, SlotView};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};
use crate::ui::widgets;

/// Renders the analytics page into `area`.
pub fn render(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    match state.analytics.view() {
        SlotView::Ready(analytics) => render_ready(frame, area, state, analytics, theme),
        SlotView::Loading => {
            let block = panel_block("Analytics", false, theme);
            let inner = inner_rect(area);
            frame.render_widget(block, area);
            let lines: Vec<Line> = (0..widgets::SKELETON_ROWS)
                .map(|_| widgets::skeleton_line(inner.width.saturating_sub(4).max(8) as usize, theme))
                .collect();
            frame.render_widget(Paragraph::new(lines), inner);
        }
        SlotView::Error(message) => {
            let block = panel_block("Analytics", false, theme);
            let inner = inner_rect(area);
            frame.render_widget(block, area);
            frame.render_widget(Paragraph::new(widgets::error_state_lines(message, theme)), inner);
        }
    }
}

fn render_ready(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    analytics: &Analytics,
    theme: &Theme,
) {
    let [cards_area, tables_area, summary_area] = area.layout(&Layout::vertical([
        Constraint::Length(5),
        Constraint::Fill(1),
        Constraint::Length(3),
    ]));

    render_trend_cards(frame, cards_area, state, analytics, theme);

    let [models_area, repos_area] = tables_area.layout(&Layout::horizontal([
        Constraint::Percentage(55),
        Constraint::Percentage(45),
    ]));
    render_model_table(frame, models_area, analytics, theme);
    render_repo_table(frame, repos_area, analytics, theme);

    render_summary(frame, summary_area, analytics, theme);
}

/// API calls, average response time, and error rate, each with its trend.
/// Response time and error rate are lower-is-better metrics.
fn render_trend_cards(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    analytics: &Analytics,
    theme: &Theme,
) {
    let range = state.analytics_range.as_param();
    let cards: [(String, String, f64, bool); 3] = [
        (
            format!("API Calls ({range})"),
            widgets::format_count(analytics.api_calls),
            analytics.api_calls_trend,
            false,
        ),
        (
            "Avg Response".to_owned(),
            format!("{:.0} ms", analytics.average_response_ms),
            analytics.average_response_trend,
            true,
        ),
        (
            "Error Rate".to_owned(),
            format!("{:.1}%", analytics.error_rate),
            analytics.error_rate_trend,
            true,
        ),
    ];

    let areas: [Rect; 3] = area.layout(&Layout::horizontal([
        Constraint::Percentage(34),
        Constraint::Percentage(33),
        Constraint::Percentage(33),
    ]));
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

fn render_model_table(frame: &mut Frame, area: Rect, analytics: &Analytics, theme: &Theme) {
    let block = panel_block("Model Performance", false, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    if analytics.model_performance.is_empty() {
        frame.render_widget(
            Paragraph::new(widgets::empty_state_lines(
                "No model activity",
                "Nothing ran in this window",
                theme,
            )),
            inner,
        );
        return;
    }

    let rows: Vec<Row> = analytics
        .model_performance
        .iter()
        .map(|m| {
            Row::new(vec![
                Cell::from(m.name.clone()),
                Cell::from(widgets::format_count(m.usage_count)),
                Cell::from(format!("{:.0} ms", m.average_latency_ms)),
                Cell::from(format!("{:.1}%", m.success_rate)),
                Cell::from(format!("${:.4}", m.average_cost_usd)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Fill(2),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(9),
        ],
    )
    .header(
        Row::new(["Model", "Calls", "Latency", "Success", "Avg Cost"])
            .style(Style::default().fg(theme.text_dim).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(table, inner);
}

fn render_repo_table(frame: &mut Frame, area: Rect, analytics: &Analytics, theme: &Theme) {
    let block = panel_block("Repository Activity", false, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    if analytics.repo_activity.is_empty() {
        frame.render_widget(
            Paragraph::new(widgets::empty_state_lines(
                "No repository activity",
                "Nothing was reviewed in this window",
                theme,
            )),
            inner,
        );
        return;
    }

    let rows: Vec<Row> = analytics
        .repo_activity
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.repo_name.clone()),
                Cell::from(widgets::format_count(r.review_count)),
                Cell::from(format!("{:.0} ms", r.average_latency_ms)),
                Cell::from(format!("{:.1}%", r.success_rate)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Fill(2),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(["Repository", "Reviews", "Latency", "Success"])
            .style(Style::default().fg(theme.text_dim).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(table, inner);
}

/// Cache effectiveness, throttling, and spend for the window.
fn render_summary(frame: &mut Frame, area: Rect, analytics: &Analytics, theme: &Theme) {
    let block = panel_block("Cache & Cost", false, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let dim = Style::default().fg(theme.text_dim);
    let line = Line::from(vec![
        Span::styled("cache ", dim),
        Span::raw(format!(
            "{} hits / {} misses",
            widgets::format_count(analytics.cache_hits),
            widgets::format_count(analytics.cache_misses),
        )),
        Span::styled("   rate limited ", dim),
        Span::raw(widgets::format_count(analytics.rate_limited_requests)),
        Span::styled("   total cost ", dim),
        Span::styled(
            format!("${:.2}", analytics.total_cost_usd),
            Style::default().fg(theme.value_emphasis).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
