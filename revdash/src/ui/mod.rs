//! UI rendering module for revdash.
//!
//! This is the module root for `ui/`. It re-exports `render()` as the single
//! entry point called by the event loop's `terminal.draw()` closure.
//!
//! Frame chrome (tab bar, status bar) lives in `layout.rs`; the shared
//! derived-display helpers in `widgets.rs`; one module per page; overlays in
//! `help.rs` and `reviews.rs` (detail modal). Keybinding dispatch lives in
//! `keybindings.rs` and touches no rendering.

mod layout;

pub mod analytics;
pub mod dashboard;
pub mod help;
pub mod keybindings;
pub mod reviews;
pub mod settings;
pub mod widgets;

use ratatui::Frame;

use crate::app::{AppState, Mode, Page};
use crate::theme::Theme;

/// Renders one complete frame: tab bar, the visible page, status bar, and
/// any overlay.
///
/// Called exactly once per `AppEvent::Render` inside `terminal.draw()`. This
/// is the only location where `terminal.draw()` is invoked in the
/// application — never call it from anywhere else.
///
/// # Arguments
///
/// * `frame` — current render frame provided by `terminal.draw()`
/// * `state` — mutable reference to app state (table selection lives here)
/// * `theme` — active color theme
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [tab_area, body, status_bar] = layout::compute_layout(frame);

    layout::render_tab_bar(frame, tab_area, state, theme);

    match state.page {
        Page::Dashboard => dashboard::render(frame, body, state, theme),
        Page::Reviews => reviews::render(frame, body, state, theme),
        Page::Analytics => analytics::render(frame, body, state, theme),
        Page::Settings => settings::render(frame, body, state, theme),
    }

    layout::render_status_bar(frame, status_bar, state, theme);

    // Overlays render after the page so they sit on top. Clear is called
    // inside each overlay renderer to erase the background.
    if state.detail_open {
        reviews::render_detail_overlay(frame, state, theme);
    }
    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}
