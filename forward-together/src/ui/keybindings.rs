//! Keybinding dispatcher.
//!
//! Translates raw crossterm `KeyEvent`s into `AppState` mutations and returns a
//! `KeyAction` telling the event loop what to do next. The dispatcher branches
//! first on `state.mode` so Normal, Insert, and HelpOverlay each have an
//! isolated handler.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use forward_together_core::Persona;
use ratatui::layout::Position;

use crate::app::{AppState, Mode, Page};

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Keep running.
    Continue,
    /// Switch to the next language. Needs an `.await` on the preference
    /// store, so the event loop performs it.
    ToggleLocale,
    /// Exit cleanly.
    Quit,
}

/// Dispatches a key event to the handler matching the current mode.
///
/// # Arguments
///
/// * `key`: the raw crossterm key event (code + modifiers)
/// * `state`: mutable reference to all UI state
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Normal => handle_normal(key, state),
        Mode::Insert => handle_insert(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

/// Handles a key event while in Normal mode.
///
/// Scroll keys go to `handle_scroll_key`, chat-only keys to `handle_chat_key`;
/// page navigation, language, help, and quit are handled inline.
fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }
    if let Some(action) = handle_chat_key(key, state) {
        return action;
    }

    match key.code {
        KeyCode::Char(c @ '1'..='6') => {
            if let Some(page) = Page::from_digit(c) {
                state.navigate(page);
            }
            KeyAction::Continue
        }
        KeyCode::Tab => {
            state.navigate(state.page.next());
            KeyAction::Continue
        }
        KeyCode::BackTab => {
            state.navigate(state.page.prev());
            KeyAction::Continue
        }

        // Open a guide from anywhere.
        KeyCode::Char('b') => {
            state.open_chat(Persona::SurvivorGuide);
            KeyAction::Continue
        }
        KeyCode::Char('m') => {
            state.open_chat(Persona::CaregiverGuide);
            KeyAction::Continue
        }

        KeyCode::Char('L') => KeyAction::ToggleLocale,

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }

        KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,

        _ => KeyAction::Continue,
    }
}

/// Handles keys that only mean something while a chat is on screen: Esc, i, r.
///
/// Returns `None` when the key should fall through to the rest of the Normal handler.
fn handle_chat_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    if state.page.persona().is_none() {
        return None;
    }
    match key.code {
        KeyCode::Esc => state.close_chat(),
        KeyCode::Char('i') | KeyCode::Enter => state.mode = Mode::Insert,
        KeyCode::Char('r') => state.restart_chat(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

/// Handles scroll keys: j / k / g / G, arrows, and Ctrl-d / Ctrl-u.
///
/// Returns `None` when the key should fall through to the rest of the Normal handler.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') | KeyCode::Home => state.scroll_top(),
        KeyCode::Char('G') | KeyCode::End => state.scroll_bottom(),
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        KeyCode::PageDown => state.half_page_down(),
        KeyCode::PageUp => state.half_page_up(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

/// `?`, `Esc`, or `q` dismisses the overlay; j / k / g / G scroll it.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('G') => state.help_scroll = u16::MAX,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Edits the demo input line. Enter sends, Esc returns to Normal mode and
/// keeps the draft.
fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc => state.mode = Mode::Normal,
        KeyCode::Enter => {
            if state.send_reply() {
                state.mode = Mode::Normal;
            }
        }
        KeyCode::Backspace => {
            state.input.pop();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.input.clear();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.input.push(c);
        }
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Handles a mouse event: click on a navigation label, and the scroll wheel.
///
/// The wheel moves 3 lines at a time, and scrolls the help overlay while it is open.
///
/// # Arguments
///
/// * `mouse`: the crossterm mouse event
/// * `state`: mutable reference to all UI state
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => handle_mouse_click(mouse.column, mouse.row, state),
        MouseEventKind::ScrollUp => {
            if state.mode == Mode::HelpOverlay {
                state.help_scroll = state.help_scroll.saturating_sub(3);
            } else {
                state.scroll_up(3);
            }
        }
        MouseEventKind::ScrollDown => {
            if state.mode == Mode::HelpOverlay {
                state.help_scroll = state.help_scroll.saturating_add(3);
            } else {
                state.scroll_down(3);
            }
        }
        _ => {}
    }
    KeyAction::Continue
}

/// Navigates to the page whose label was clicked, using the rects cached by
/// the last render. Ignored while the help overlay is open.
fn handle_mouse_click(col: u16, row: u16, state: &mut AppState) {
    if state.mode == Mode::HelpOverlay {
        return;
    }
    let pos = Position { x: col, y: row };
    let hit = state
        .nav_rects
        .iter()
        .position(|r| r.width > 0 && r.contains(pos));
    if let Some(i) = hit {
        state.navigate(Page::NAV[i]);
    }
}
