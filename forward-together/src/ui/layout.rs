//! Screen layout and the frame chrome around the page body.
//!
//! This module is pure layout arithmetic plus the three fixed bars: navigation
//! on top, footer and status bar at the bottom. It runs inside `terminal.draw()`
//! on every render, so every frame reflects the live terminal size.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Mode, Page};
use crate::theme::Theme;

/// Returns `[nav_bar, body, footer, status_bar]` for the given screen area.
///
/// The body takes whatever height remains after the 1-row navigation bar, the
/// 2-row footer, and the 1-row status bar.
pub fn compute_layout(area: Rect) -> [Rect; 4] {
    area.layout(&Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(1),
    ]))
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border on each side.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// Focused panels get a thick border in `border_active`. `MergeStrategy::Fuzzy`
/// keeps junctions correct when thick and plain borders meet.
///
/// # Arguments
///
/// * `title`: panel title shown in the top border
/// * `is_focused`: `true` when this panel receives input
/// * `theme`: active color theme
pub fn panel_block<'a>(title: Line<'a>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the brand, the six page labels, and the language indicator.
///
/// Returns the screen area of each page label so clicks can be mapped back to
/// pages. Labels that do not fit get a zero-width rect.
pub fn render_nav_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) -> [Rect; 6] {
    let mut spans = vec![
        Span::styled(
            format!(" {}", state.t("brand.forward")),
            Style::default().fg(theme.brand).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            state.t("brand.together"),
            Style::default().fg(theme.accent_caregiver).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  │", Style::default().fg(theme.border_inactive)),
    ];

    let active = state.page.nav_index();
    let mut rects = [Rect::default(); 6];
    let mut x = area.x + spans.iter().map(|s| s.width() as u16).sum::<u16>();
    for (i, page) in Page::NAV.iter().enumerate() {
        let label = format!(" {} {} ", i + 1, state.t(page.nav_key()));
        let style = if i == active {
            Style::default().fg(theme.nav_active).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.nav_inactive)
        };
        let span = Span::styled(label, style);
        let width = span.width() as u16;
        if x.saturating_add(width) <= area.right() {
            rects[i] = Rect::new(x, area.y, width, 1);
        }
        x = x.saturating_add(width);
        spans.push(span);
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    let locale = state.resolver.current();
    let language = Line::from(vec![
        Span::styled(format!("{} ", state.t("language.name")), Style::default().fg(theme.muted)),
        Span::styled(
            format!("[{}] ", locale.code().to_uppercase()),
            Style::default().fg(theme.nav_active).add_modifier(Modifier::BOLD),
        ),
    ])
    .right_aligned();
    let language_width = language.width() as u16;
    if x.saturating_add(language_width) < area.right() {
        frame.render_widget(Paragraph::new(language), area);
    }

    rects
}

/// Renders the 2-row footer: brand and tagline, then the copyright line.
pub fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let brand = Line::from(vec![
        Span::styled(
            format!(" {}", state.t("brand.forward")),
            Style::default().fg(theme.brand).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            state.t("brand.together"),
            Style::default().fg(theme.accent_caregiver).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", state.t("brand.tagline")), Style::default().fg(theme.text)),
    ]);
    let copyright = Line::from(Span::styled(
        format!(" {}  {}", state.t("footer.copyright"), state.t("footer.builtBy")),
        Style::default().fg(theme.muted),
    ));
    frame.render_widget(Paragraph::new(vec![brand, copyright]), area);
}

/// Renders the 1-row status bar: mode indicator, then key hints for the page.
///
/// `HelpOverlay` shows `NORMAL`; the overlay is a transient layer, not a mode
/// with its own editing semantics.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::Normal | Mode::HelpOverlay => (" NORMAL ", theme.status_mode_normal),
    };

    let hints = match (state.mode, state.page) {
        (Mode::Insert, _) => "hints.insert",
        (_, Page::Chat(_)) => "hints.chat",
        _ => "hints.page",
    };

    let status_line = Line::from(vec![
        Span::styled(mode_text, Style::default().fg(mode_fg).add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {}", state.t(hints))),
    ]);

    frame.render_widget(
        Paragraph::new(status_line)
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
