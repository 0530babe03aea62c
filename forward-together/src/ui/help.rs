//! Help overlay.
//!
//! A centred modal drawn over the current page in the same `terminal.draw()`
//! closure: `Clear` erases the area, then a bordered `Paragraph` lists the keys.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::inner_rect;

/// Key column followed by the content key of its description, per section.
const SECTIONS: [(&str, &[(&str, &str)]); 4] = [
    (
        "help.pages",
        &[
            ("1 - 6", "help.pagesJump"),
            ("Tab / S-Tab", "help.pagesCycle"),
            ("click", "help.pagesClick"),
        ],
    ),
    (
        "help.scrolling",
        &[
            ("j / k", "help.lineScroll"),
            ("g / G", "help.topBottom"),
            ("Ctrl-d / u", "help.halfPage"),
            ("wheel", "help.wheel"),
        ],
    ),
    (
        "help.chat",
        &[
            ("b / m", "help.talk"),
            ("i / Enter", "help.type"),
            ("r", "help.restart"),
            ("Esc", "help.leave"),
        ],
    ),
    (
        "help.general",
        &[
            ("L", "help.language"),
            ("?", "help.toggle"),
            ("q", "help.quit"),
        ],
    ),
];

/// Width of the key column, after the two-space indent.
const KEY_COLUMN: usize = 14;

/// Renders the help overlay on top of everything else.
///
/// Skipped on terminals narrower than 40 columns, where the modal would
/// collapse to nothing. The scroll offset is clamped to the wrapped text and
/// written back, so `G` followed by `k` moves up from the real bottom.
///
/// # Arguments
///
/// * `frame`: current render frame provided by `terminal.draw()`
/// * `state`: app state; `help_scroll` is clamped here
/// * `theme`: active color theme
pub fn render_help_overlay(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    if frame.area().width < 40 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(70), Constraint::Percentage(80));

    let paragraph = Paragraph::new(build_help_text(state, theme)).wrap(Wrap { trim: false });
    let inner = inner_rect(overlay_area);
    let rows = paragraph.line_count(inner.width);
    let max_scroll = rows.saturating_sub(inner.height as usize).min(u16::MAX as usize) as u16;
    state.help_scroll = state.help_scroll.min(max_scroll);

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(format!(" {} ", state.t("help.title")))
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        paragraph.block(block).scroll((state.help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text(state: &AppState, theme: &Theme) -> Text<'static> {
    let mut lines = Vec::new();
    for (i, (title, entries)) in SECTIONS.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            state.t(title),
            Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD),
        )));
        for (keys, description) in entries.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {keys:<KEY_COLUMN$}"), Style::default().fg(theme.text)),
                Span::styled(state.t(description), Style::default().fg(theme.text)),
            ]));
        }
    }
    Text::from(lines)
}
