//! Settings page: the configuration form.
//!
//! The form renders the local draft, never the fetched record directly — the
//! two diverge between an edit and a successful save. The panel title tracks
//! the draft lifecycle: a `*` marker for unsaved edits and a `saving...`
//! marker while the one permitted in-flight save is outstanding.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{AppState, SettingsField, SlotView};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};
use crate::ui::widgets;

/// Renders the settings page into `area`.
pub fn render(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let mut title = "Settings".to_owned();
    if state.draft_dirty {
        title.push_str(" *");
    }
    if state.saving {
        title.push_str(" — saving...");
    }
    let block = panel_block(&title, true, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    match state.settings.view() {
        SlotView::Ready(_) => render_form(frame, inner, state, theme),
        SlotView::Loading => {
            let lines: Vec<Line> = (0..SettingsField::ALL.len())
                .map(|_| widgets::skeleton_line(36, theme))
                .collect();
            frame.render_widget(Paragraph::new(lines), inner);
        }
        SlotView::Error(message) => {
            frame.render_widget(Paragraph::new(widgets::error_state_lines(message, theme)), inner);
        }
    }
}

/// One row per field: padded label, current draft value, cursor highlight.
fn render_form(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let [form_area, hint_area] =
        area.layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let lines: Vec<Line> = SettingsField::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let selected = i == state.settings_cursor;
            let marker = if selected { "> " } else { "  " };
            let label_style = if selected {
                Style::default().fg(theme.selection).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(marker, label_style),
                Span::styled(format!("{:<24}", field.label()), label_style),
                Span::styled(
                    field.display_value(&state.draft),
                    Style::default().fg(theme.value_emphasis),
                ),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), form_area);

    let hint = if state.draft_dirty {
        "unsaved changes — w saves the whole form"
    } else {
        "(default) values defer to the backend"
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default().fg(theme.text_dim),
        ))),
        hint_area,
    );
}
