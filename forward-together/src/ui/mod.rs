//! UI rendering.
//!
//! `render()` is the single entry point, called from the event loop's
//! `terminal.draw()` closure. Layout and the fixed bars live in `layout.rs`,
//! static pages in `pages.rs`, the demo chat in `chat.rs`.

mod chat;
pub mod help;
pub mod keybindings;
mod layout;
mod pages;

use ratatui::{Frame, style::Style, widgets::Block};

use crate::app::{AppState, Mode, Page};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_footer, render_nav_bar, render_status_bar};

/// Renders one complete frame.
///
/// Viewport height and navigation-label rects are written back into `state`
/// so the next keypress or click can use them. The one-frame lag is not
/// noticeable.
///
/// # Arguments
///
/// * `frame`: current render frame provided by `terminal.draw()`
/// * `state`: app state; caches and clamped scroll offsets are written here
/// * `theme`: active color theme
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    frame.render_widget(Block::default().style(Style::default().bg(theme.background)), frame.area());

    let [nav_bar, body, footer, status_bar] = compute_layout(frame.area());
    state.viewport_height = inner_rect(body).height;
    state.nav_rects = render_nav_bar(frame, nav_bar, state, theme);

    match state.page {
        Page::Chat(persona) => chat::render_chat(frame, body, persona, state, theme),
        page => pages::render_page(frame, body, page, state, theme),
    }

    render_footer(frame, footer, state, theme);
    render_status_bar(frame, status_bar, state, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, state, theme);
    }
}
