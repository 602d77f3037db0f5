//! revdash — terminal dashboard for an AI code-review service.
//!
//! Entry point for the `revdash` binary. Wires together the terminal
//! lifecycle (`tui`), unified event bus (`event`), page rendering (`ui`),
//! theme system (`theme`), and the background fetch worker (`api`) that owns
//! the typed HTTP client and response cache from `revdash-core`.
//!
//! # Startup sequence (order matters)
//!
//! 1. Load config and theme — read-only, safe before terminal init.
//! 2. Initialise file logging — the TUI owns the terminal, so tracing output
//!    goes to `.revdash/revdash.log`, never to stdout/stderr.
//! 3. `install_panic_hook()` — installed first so it is the innermost hook.
//!    Restores the terminal before the panic message prints.
//! 4. `register_sigterm()` — returns `Arc<AtomicBool>` polled in the event loop.
//! 5. `init_tui()` — enters alternate screen and enables raw mode.
//! 6. Create the event channel, spawn the event task and the fetch worker,
//!    then seed the dashboard's initial fetches so the first frame already
//!    shows skeletons instead of a blank page.
//!
//! # Safety
//!
//! `restore_tui()` is called after the event loop exits (normal quit, `q`
//! key, SIGTERM, or `None` channel close). The `?` operator is only used
//! before `init_tui()` or inside the Render arm — draw errors propagate out
//! of the loop and reach `restore_tui()` after `break`. The panic hook
//! covers unexpected panics.

mod api;
mod app;
mod event;
mod theme;
mod tui;
mod ui;

use std::sync::atomic::Ordering;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use revdash_core::cache::ResponseCache;
use revdash_core::{ApiClient, Config};

use crate::ui::keybindings::{self, KeyAction};

/// Staleness window for cached responses: entries younger than this are
/// served without a network round-trip.
const CACHE_STALE_AFTER: Duration = Duration::from_secs(30);

/// Eviction window: the worker's sweep drops entries older than this.
const CACHE_EVICT_AFTER: Duration = Duration::from_secs(300);

/// Initialises file-based tracing under `.revdash/`.
///
/// Returns the appender guard, which must stay alive for the process
/// lifetime or buffered log lines are lost. Level comes from `REVDASH_LOG`
/// (default `info`).
fn init_logging() -> std::io::Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(".revdash")?;
    let appender = tracing_appender::rolling::never(".revdash", "revdash.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("REVDASH_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Step 0: load config and theme — read-only, safe before terminal init.
    let config = Config::load();
    let theme = theme::Theme::from_name(&config.theme);
    let mut state = app::AppState::default();

    // Step 1: file logging; the guard must outlive the event loop.
    let _log_guard = init_logging()?;
    tracing::info!(base_url = %config.base_url, timeout_ms = config.timeout_ms, "starting revdash");

    // Step 2: panic hook installed first — innermost hook restores terminal.
    tui::install_panic_hook();

    // Step 3: SIGTERM flag — polled in the 50ms heartbeat arm below.
    let term_flag = tui::register_sigterm();

    // Step 4: enter alternate screen and raw mode.
    let mut terminal = tui::init_tui()?;

    // Step 5: create event channel and spawn the background event task.
    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    // Step 6: spawn the fetch worker owning the client and response cache,
    // then seed the dashboard's fetches before the first frame.
    let (api_tx, api_rx) = tokio::sync::mpsc::unbounded_channel();
    let client = ApiClient::from_config(&config);
    let cache = ResponseCache::new(CACHE_STALE_AFTER, CACHE_EVICT_AFTER);
    api::worker::spawn_api_worker(client, cache, api_rx, handler.tx.clone());
    state.api_tx = Some(api_tx);
    state.enter_page(app::Page::Dashboard);

    // Event loop — exits only via `break`, never via `?`.
    // This guarantees `restore_tui()` is always reached after the loop.
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: guarantees SIGTERM is checked at least every 50ms,
            // even when no crossterm/tick/render events arrive.
            // Without this arm, a quiescent terminal blocks forever in
            // rx.recv() and the SIGTERM flag is never polled.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(event::AppEvent::Render) => {
                        // Exactly one draw() call per Render event — never elsewhere.
                        terminal.draw(|frame| ui::render(frame, &mut state, &theme))?;
                    }
                    Some(event::AppEvent::Key(key)) => {
                        if keybindings::handle_key(key, &mut state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(event::AppEvent::Mouse(mouse)) => {
                        let _ = keybindings::handle_mouse(mouse, &mut state);
                    }
                    Some(event::AppEvent::Tick) => {
                        state.tick();
                    }
                    Some(event::AppEvent::Api(outcome)) => {
                        state.apply_api_result(*outcome);
                    }
                    Some(event::AppEvent::Resize(_, _)) => {
                        // Handled automatically by ratatui on the next Render:
                        // frame.area() returns the new terminal size.
                    }
                    Some(event::AppEvent::Quit) | None => break 'event_loop,
                }
                // Check SIGTERM after every event too, not just on the heartbeat,
                // so quit latency is at most one event cycle rather than 50ms.
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    // Restore the terminal at the single exit point of the loop.
    // Called unconditionally — covers normal quit, 'q' key, SIGTERM, and
    // channel close. The panic hook handles the panic path separately.
    tui::restore_tui()?;
    Ok(())
}
