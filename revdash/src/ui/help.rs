//! Help overlay renderer for revdash.
//!
//! Provides `render_help_overlay()` which draws a centred modal box over the
//! visible page using ratatui's `Clear` widget to erase the background first.
//! The overlay is rendered inside the same `terminal.draw()` closure as the
//! rest of the frame — calling `frame.render_widget(Clear, area)` before the
//! bordered `Paragraph` achieves the modal effect without a second draw call.

use ratatui::{
    layout::Constraint,
    text::{Line, Text},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::Theme;
use crate::ui::layout::panel_block;

/// Renders the help overlay as a centred modal on top of the visible page.
///
/// Skipped on terminals narrower than 60 columns to avoid a zero-height
/// `Rect`.
///
/// # Arguments
///
/// * `frame` — current render frame provided by `terminal.draw()`
/// * `theme` — active color theme (supplies `border_active` for the modal)
/// * `help_scroll` — vertical scroll offset; j/k in HelpOverlay mode mutate it
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = panel_block(" Help  — j/k scroll, ? or Esc to dismiss ", true, theme);

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

/// Builds the help text as a multi-line `Text` value, grouped by section.
fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Pages"),
        Line::from("  1 / 2 / 3 / 4   Dashboard / Reviews / Analytics / Settings"),
        Line::from("  Tab / S-Tab     Next / previous page"),
        Line::from("  r               Refetch the visible page (retry after errors)"),
        Line::from(""),
        Line::from("Dashboard & Analytics"),
        Line::from("  t               Cycle time range: 24h -> 7d -> 30d"),
        Line::from(""),
        Line::from("Reviews"),
        Line::from("  /               Edit search text (Enter commits, Esc cancels)"),
        Line::from("  s               Cycle status filter: all -> success -> partial -> failure"),
        Line::from("  o               Cycle sort key: date -> latency -> comments"),
        Line::from("  n / p           Next / previous page of results"),
        Line::from("  j / k           Move the row selection"),
        Line::from("  Enter           Open the selected review's detail"),
        Line::from("  e / E           Export the filtered set as CSV / JSON"),
        Line::from(""),
        Line::from("Settings"),
        Line::from("  j / k           Move between form fields"),
        Line::from("  Enter / Space   Edit the field (toggles flip in place)"),
        Line::from("  w               Save the whole form (full replace)"),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?               Open / close this help overlay"),
        Line::from("  q / Esc         Quit (confirms if unsaved settings edits exist)"),
    ])
}
