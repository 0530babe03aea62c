//! forward-together: the Forward Together peer-support site in the terminal.
//!
//! Entry point for the `forward-together` binary. Wires together logging
//! (`logging`), configuration (`config`), the content and preference layers of
//! `forward-together-core`, the terminal lifecycle (`tui`), the event bus
//! (`event`), and rendering (`ui`).
//!
//! # Startup sequence
//!
//! 1. Logging to a file in the data directory, so nothing writes to the
//!    terminal once the TUI owns it.
//! 2. Config, content, and preferences. Content defects are fatal and reported
//!    on stderr before the terminal is touched; preference-store failures fall
//!    back to an in-memory store.
//! 3. `install_panic_hook()`, then `register_sigterm()`, then `init_tui()`.
//! 4. Event channel and `spawn_event_task()`.
//!
//! `restore_tui()` runs once after the event loop exits (q key, SIGTERM, or
//! channel close). The loop never uses `?`: a draw error is stored in
//! `draw_result` and breaks out, so the terminal is still restored.

mod app;
mod config;
mod event;
mod logging;
mod theme;
mod tui;
mod ui;

use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use forward_together_core::{ContentStore, ConversationPlayer, LocaleResolver, Preferences};
use tracing::{error, info, warn};

use crate::ui::keybindings::{handle_key, handle_mouse, KeyAction};

const PREFERENCES_DB: &str = "preferences.db";

#[tokio::main]
async fn main() -> ExitCode {
    let data_dir = config::data_dir();
    if let Err(e) = logging::init(&data_dir) {
        eprintln!("forward-together: logging disabled: {e}");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let config = config::Config::load();
    let theme = theme::Theme::from_name(&config.theme);

    let content = match ContentStore::embedded() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!(error = %e, "content failed to load");
            eprintln!("forward-together: content failed to load: {e}");
            return ExitCode::FAILURE;
        }
    };

    let prefs = open_preferences(&data_dir).await;
    let resolver = LocaleResolver::restore(content, prefs, config.default_locale).await;
    let player = ConversationPlayer::new(config.pacing);
    let mut state = app::AppState::new(resolver, player);

    match run(&mut state, &theme).await {
        Ok(()) => {
            info!("clean exit");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "terminal error");
            eprintln!("forward-together: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Opens the SQLite preference store, or an in-memory one if that fails.
async fn open_preferences(data_dir: &std::path::Path) -> Preferences {
    if let Err(e) = std::fs::create_dir_all(data_dir) {
        warn!(error = %e, dir = %data_dir.display(), "cannot create data directory, preferences will not persist");
        return Preferences::memory();
    }
    let path = data_dir.join(PREFERENCES_DB);
    match Preferences::open(&path.to_string_lossy()).await {
        Ok(prefs) => prefs,
        Err(e) => {
            warn!(error = %e, path = %path.display(), "cannot open preference database, preferences will not persist");
            Preferences::memory()
        }
    }
}

/// Runs the TUI until quit. The terminal is restored on every return path
/// after `init_tui()` succeeds.
async fn run(state: &mut app::AppState, theme: &theme::Theme) -> std::io::Result<()> {
    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    let mut draw_result = Ok(());

    // Exits only via `break` so `restore_tui()` below is always reached.
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: checks SIGTERM at least every 50ms even when no
            // events arrive.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    info!("SIGTERM received");
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                let action = match maybe_event {
                    Some(event::AppEvent::Render) => {
                        // Exactly one draw() call per Render event.
                        if let Err(e) = terminal.draw(|frame| ui::render(frame, state, theme)) {
                            draw_result = Err(e);
                            break 'event_loop;
                        }
                        KeyAction::Continue
                    }
                    Some(event::AppEvent::Tick) => {
                        state.on_tick();
                        KeyAction::Continue
                    }
                    Some(event::AppEvent::Key(key)) => handle_key(key, state),
                    Some(event::AppEvent::Mouse(mouse)) => handle_mouse(mouse, state),
                    // ratatui picks up the new size from frame.area() on the next Render.
                    Some(event::AppEvent::Resize(_, _)) => KeyAction::Continue,
                    Some(event::AppEvent::Quit) | None => KeyAction::Quit,
                };

                match action {
                    KeyAction::Continue => {}
                    KeyAction::ToggleLocale => state.cycle_locale().await,
                    KeyAction::Quit => break 'event_loop,
                }

                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    state.shutdown();
    tui::restore_tui()?;
    draw_result
}
