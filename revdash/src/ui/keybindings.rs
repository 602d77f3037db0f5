//! Keybinding dispatcher for revdash.
//!
//! Translates raw crossterm `KeyEvent`s into `AppState` mutations and returns
//! a `KeyAction` telling the event loop whether to continue or quit. The
//! dispatcher branches first on `state.mode` so that Search, EditField,
//! HelpOverlay, ConfirmQuit, and Normal all have isolated handler functions.

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};

use revdash_core::types::ExportFormat;

use crate::app::{AppState, Mode, Page};

/// Control-flow signal returned from the key dispatcher.
///
/// The event loop checks this after every keypress: `Quit` tears down the
/// terminal and exits; `Continue` proceeds to the next event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue the event loop normally.
    Continue,
    /// Exit cleanly.
    Quit,
}

/// Dispatches a key event to the handler matching the current mode.
///
/// Mutates `state` in place and returns a `KeyAction` signalling whether to
/// continue or quit.
///
/// # Arguments
///
/// * `key`   — the raw crossterm key event (code + modifiers)
/// * `state` — mutable reference to all UI state
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::ConfirmQuit => handle_confirm_quit(key, state),
        Mode::Search => handle_search(key, state),
        Mode::EditField => handle_edit_field(key, state),
        Mode::Normal => handle_normal(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

/// Handles a key event while in Normal mode.
///
/// The detail overlay consumes navigation keys first when it is open; global
/// keys (pages, help, refresh, quit) come next; anything left falls through
/// to the visible page's handler.
fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if state.detail_open {
        return handle_detail_overlay(key, state);
    }

    match key.code {
        // Page selection
        KeyCode::Char('1') => {
            state.enter_page(Page::Dashboard);
            KeyAction::Continue
        }
        KeyCode::Char('2') => {
            state.enter_page(Page::Reviews);
            KeyAction::Continue
        }
        KeyCode::Char('3') => {
            state.enter_page(Page::Analytics);
            KeyAction::Continue
        }
        KeyCode::Char('4') => {
            state.enter_page(Page::Settings);
            KeyAction::Continue
        }
        KeyCode::Tab => {
            state.enter_page(state.page.next());
            KeyAction::Continue
        }
        KeyCode::BackTab => {
            state.enter_page(state.page.prev());
            KeyAction::Continue
        }

        // Manual refetch of the visible page (also the error-state retry key).
        KeyCode::Char('r') => {
            state.refresh_page();
            KeyAction::Continue
        }

        // Help overlay
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }

        // Quit, guarded by the dirty settings draft.
        KeyCode::Char('q') | KeyCode::Esc => {
            if state.draft_dirty {
                state.mode = Mode::ConfirmQuit;
                KeyAction::Continue
            } else {
                KeyAction::Quit
            }
        }

        _ => handle_page_key(key, state),
    }
}

/// Page-specific keys in Normal mode.
fn handle_page_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.page {
        Page::Dashboard => {
            if key.code == KeyCode::Char('t') {
                state.cycle_dash_range();
            }
        }
        Page::Reviews => match key.code {
            KeyCode::Char('/') => {
                state.search_input = state.review_query.search.clone();
                state.mode = Mode::Search;
            }
            KeyCode::Char('s') => state.cycle_status_filter(),
            KeyCode::Char('o') => state.cycle_sort_key(),
            KeyCode::Char('n') | KeyCode::Right => state.next_review_page(),
            KeyCode::Char('p') | KeyCode::Left => state.prev_review_page(),
            KeyCode::Char('j') | KeyCode::Down => state.select_next_review(),
            KeyCode::Char('k') | KeyCode::Up => state.select_prev_review(),
            KeyCode::Enter => state.open_selected_detail(),
            KeyCode::Char('e') => state.start_export(ExportFormat::Csv),
            KeyCode::Char('E') => state.start_export(ExportFormat::Json),
            _ => {}
        },
        Page::Analytics => {
            if key.code == KeyCode::Char('t') {
                state.cycle_analytics_range();
            }
        }
        Page::Settings => match key.code {
            KeyCode::Char('j') | KeyCode::Down => state.settings_cursor_down(),
            KeyCode::Char('k') | KeyCode::Up => state.settings_cursor_up(),
            KeyCode::Enter | KeyCode::Char(' ') => state.activate_settings_field(),
            KeyCode::Char('w') => state.save_settings(),
            _ => {}
        },
    }
    KeyAction::Continue
}

/// Navigation inside the review-detail overlay.
fn handle_detail_overlay(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.detail_scroll = state.detail_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.detail_scroll = state.detail_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.detail_scroll = 0,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => state.close_detail(),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Search mode
// ---------------------------------------------------------------------------

/// Handles a key event while typing into the reviews search box.
///
/// Enter commits the buffer (resetting pagination and re-keying the fetch);
/// Esc abandons the buffer and keeps the committed query untouched.
fn handle_search(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Enter => {
            let text = state.search_input.clone();
            state.commit_search(text);
            state.mode = Mode::Normal;
        }
        KeyCode::Esc => {
            state.search_input.clear();
            state.mode = Mode::Normal;
        }
        KeyCode::Backspace => {
            state.search_input.pop();
        }
        KeyCode::Char(c) => state.search_input.push(c),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// EditField mode (settings form)
// ---------------------------------------------------------------------------

/// Handles a key event while editing a settings form field.
///
/// Enter commits (which validates numeric fields and may keep the editor
/// open on a parse error); Esc abandons the buffer without touching the
/// draft.
fn handle_edit_field(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Enter => state.commit_field_edit(),
        KeyCode::Esc => state.cancel_field_edit(),
        KeyCode::Backspace => {
            state.edit_buffer.pop();
        }
        KeyCode::Char(c) => state.edit_buffer.push(c),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

/// Handles a key event while the help overlay is visible.
///
/// Any of `?`, `Esc`, or `q` dismisses the overlay and returns to Normal
/// mode. `j`/`k`/`g`/`G` scroll the overlay text.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') => {
            state.help_scroll = state.help_scroll.saturating_add(1);
            KeyAction::Continue
        }
        KeyCode::Char('k') => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
            KeyAction::Continue
        }
        KeyCode::Char('g') => {
            state.help_scroll = 0;
            KeyAction::Continue
        }
        KeyCode::Char('G') => {
            state.help_scroll = u16::MAX;
            KeyAction::Continue
        }
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// ConfirmQuit mode
// ---------------------------------------------------------------------------

/// Handles a key event while the quit-confirmation prompt is active.
///
/// `y` / `Y` confirms the quit (discarding the dirty draft) and returns
/// `Quit`. `n` / `N` / `Esc` cancels and returns to Normal mode.
fn handle_confirm_quit(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Quit,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Handles a mouse event: scroll wheel only.
///
/// The wheel scrolls whatever the cursor context is — the help overlay, the
/// detail overlay, or the reviews table selection. Clicks are intentionally
/// ignored; every control has a key.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            if state.mode == Mode::HelpOverlay {
                state.help_scroll = state.help_scroll.saturating_sub(3);
            } else if state.detail_open {
                state.detail_scroll = state.detail_scroll.saturating_sub(3);
            } else if state.page == Page::Reviews {
                state.select_prev_review();
            }
        }
        MouseEventKind::ScrollDown => {
            if state.mode == Mode::HelpOverlay {
                state.help_scroll = state.help_scroll.saturating_add(3);
            } else if state.detail_open {
                state.detail_scroll = state.detail_scroll.saturating_add(3);
            } else if state.page == Page::Reviews {
                state.select_next_review();
            }
        }
        _ => {}
    }
    KeyAction::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn quit_is_guarded_by_a_dirty_settings_draft() {
        let mut state = AppState::default();
        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut state), KeyAction::Quit);

        let mut state = AppState::default();
        state.draft_dirty = true;
        assert_eq!(
            handle_key(press(KeyCode::Char('q')), &mut state),
            KeyAction::Continue
        );
        assert_eq!(state.mode, Mode::ConfirmQuit);
        assert_eq!(
            handle_key(press(KeyCode::Char('n')), &mut state),
            KeyAction::Continue
        );
        assert_eq!(state.mode, Mode::Normal);
        state.mode = Mode::ConfirmQuit;
        assert_eq!(handle_key(press(KeyCode::Char('y')), &mut state), KeyAction::Quit);
    }

    #[test]
    fn committing_a_search_resets_pagination() {
        let mut state = AppState::default();
        state.enter_page(Page::Reviews);
        state.review_query.page = 3;

        handle_key(press(KeyCode::Char('/')), &mut state);
        assert_eq!(state.mode, Mode::Search);
        for c in "auth".chars() {
            handle_key(press(KeyCode::Char(c)), &mut state);
        }
        handle_key(press(KeyCode::Enter), &mut state);

        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.review_query.search, "auth");
        assert_eq!(state.review_query.page, 1);
    }

    #[test]
    fn escaping_a_search_keeps_the_committed_query() {
        let mut state = AppState::default();
        state.enter_page(Page::Reviews);
        state.review_query.search = "old".to_owned();

        handle_key(press(KeyCode::Char('/')), &mut state);
        handle_key(press(KeyCode::Char('x')), &mut state);
        handle_key(press(KeyCode::Esc), &mut state);
        assert_eq!(state.review_query.search, "old");
    }

    #[test]
    fn tab_cycles_pages_in_order() {
        let mut state = AppState::default();
        handle_key(press(KeyCode::Tab), &mut state);
        assert_eq!(state.page, Page::Reviews);
        handle_key(press(KeyCode::Tab), &mut state);
        assert_eq!(state.page, Page::Analytics);
        handle_key(press(KeyCode::BackTab), &mut state);
        assert_eq!(state.page, Page::Reviews);
    }
}
