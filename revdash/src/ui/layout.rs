//! Frame chrome for revdash: tab bar, page area, and status bar.
//!
//! This module is pure layout arithmetic plus the two chrome widgets — no
//! mutable application state lives here. It is called inside
//! `terminal.draw()` on every render so every frame reflects the current
//! terminal size.

use ratatui::{
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Tabs},
    Frame,
};

use crate::app::{AppState, Mode, Page, ToastKind};
use crate::theme::Theme;

/// Returns `[tab_bar, body, status_bar]` `Rect`s for the current frame.
///
/// Tab bar and status bar are one row each; the body fills the rest. Called
/// inside `terminal.draw()` on every render — never store the returned
/// rects across frames.
pub fn compute_layout(frame: &Frame) -> [Rect; 3] {
    frame.area().layout(&Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ]))
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border on
/// each side.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// `BorderType::Thick` marks the active panel or modal; `MergeStrategy::Fuzzy`
/// merges junction characters correctly when thick and plain borders meet.
pub fn panel_block<'a>(title: &'a str, is_active: bool, theme: &'a Theme) -> Block<'a> {
    let border_style = if is_active {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_active { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the 1-row tab bar listing the four pages.
///
/// A `⟳` marker is appended to the current page's title while any of its
/// fetches is refreshing already-displayed data.
pub fn render_tab_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let titles: Vec<Line> = Page::ALL
        .iter()
        .map(|page| {
            let mut title = format!(" {} ", page.title());
            if *page == state.page && page_refreshing(state) {
                title.push_str("⟳ ");
            }
            Line::from(title)
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(state.page.index())
        .style(Style::default().fg(theme.tab_inactive))
        .highlight_style(
            Style::default()
                .fg(theme.tab_active)
                .add_modifier(Modifier::BOLD),
        )
        .divider("│");

    frame.render_widget(tabs, area);
}

/// True when the visible page has a fetch in flight behind existing data.
fn page_refreshing(state: &AppState) -> bool {
    match state.page {
        Page::Dashboard => state.metrics.refreshing() || state.recent.refreshing(),
        Page::Reviews => state.reviews.refreshing(),
        Page::Analytics => state.analytics.refreshing(),
        Page::Settings => state.settings.refreshing(),
    }
}

/// Renders the 1-row status bar at the bottom of the terminal.
///
/// Left side: the input prompt while typing (search or field edit), the
/// quit-confirmation question, or the current page's key hints. Right side:
/// the active toast, colored by kind. The bar never renders blank.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let left: Vec<Span> = match state.mode {
        Mode::Search => vec![
            Span::styled(" /", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(state.search_input.clone()),
            Span::styled("▌", Style::default().fg(theme.border_active)),
        ],
        Mode::EditField => vec![
            Span::styled(
                format!(" {}: ", state.settings_field().label()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(state.edit_buffer.clone()),
            Span::styled("▌", Style::default().fg(theme.border_active)),
        ],
        Mode::ConfirmQuit => vec![Span::styled(
            " Unsaved settings — quit anyway? (y/n) ",
            Style::default()
                .fg(theme.status_warning)
                .add_modifier(Modifier::BOLD),
        )],
        Mode::Normal | Mode::HelpOverlay => {
            vec![Span::raw(format!(" {} ", page_hints(state)))]
        }
    };

    let mut spans = left;
    if let Some(toast) = &state.toast {
        let color = match toast.kind {
            ToastKind::Info => theme.toast_info,
            ToastKind::Success => theme.toast_success,
            ToastKind::Error => theme.toast_error,
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            toast.text.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}

/// Key hints shown in the status bar for the visible page.
fn page_hints(state: &AppState) -> &'static str {
    if state.detail_open {
        return "j/k scroll · Esc close";
    }
    match state.page {
        Page::Dashboard => "t range · r refresh · 1-4 pages · ? help · q quit",
        Page::Reviews => "/ search · s status · o sort · n/p page · Enter detail · e/E export",
        Page::Analytics => "t range · r refresh · ? help · q quit",
        Page::Settings => "j/k field · Enter edit/toggle · w save · r reload",
    }
}
