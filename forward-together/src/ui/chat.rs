//! The demo chat panel.
//!
//! Draws whatever the running `ChatSession` last published: revealed messages
//! as bubbles (guide on the left in the persona's accent, visitor on the
//! right), an animated three-dot typing indicator, the input line, and the
//! demo notice. The view is borrowed once per frame and released before
//! anything else is drawn, so the playback task is never held up by the render.

use forward_together_core::{ChatView, Message, Persona, Sender};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Bubbles take at most this share of the panel width, in percent.
const BUBBLE_WIDTH_PCT: usize = 75;

pub fn render_chat(frame: &mut Frame, area: Rect, persona: Persona, state: &mut AppState, theme: &Theme) {
    let accent = theme.accent(persona);
    let name = state.t(persona.name_key());

    let title = Line::from(vec![
        Span::styled(format!(" {name} "), Style::default().fg(accent).add_modifier(Modifier::BOLD)),
        Span::styled(format!("· {} ", state.t(persona.role_key())), Style::default().fg(theme.muted)),
    ]);
    let status = Line::from(vec![
        Span::styled("● ", Style::default().fg(theme.status_mode_insert)),
        Span::styled(format!("{} ", state.t("chat.online")), Style::default().fg(theme.muted)),
    ])
    .right_aligned();
    let block = panel_block(title, state.mode == Mode::Insert, theme).title(status);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let [notice_area, messages_area, input_area, footnote_area] = inner.layout(&Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ]));
    state.viewport_height = messages_area.height;

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            state.t("chat.watchingSample"),
            Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
        )))
        .centered(),
        notice_area,
    );

    let lines = match state.chat_view() {
        Some(view) => message_lines(&view, &name, accent, messages_area.width, state.tick, theme),
        None => Vec::new(),
    };

    let max_top = lines.len().saturating_sub(messages_area.height as usize);
    let max_back = max_top.min(u16::MAX as usize) as u16;
    state.chat_scrollback = state.chat_scrollback.min(max_back);
    let top = max_top - state.chat_scrollback as usize;
    frame.render_widget(
        Paragraph::new(lines).scroll((top.min(u16::MAX as usize) as u16, 0)),
        messages_area,
    );

    render_input(frame, input_area, state, theme);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            state.t("chat.demoOnly"),
            Style::default().fg(theme.muted),
        )))
        .centered(),
        footnote_area,
    );
}

/// Lays out the whole conversation as pre-wrapped lines, typing indicator last.
fn message_lines(
    view: &ChatView,
    guide_name: &str,
    accent: ratatui::style::Color,
    width: u16,
    tick: u64,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let bubble_width = (usize::from(width) * BUBBLE_WIDTH_PCT / 100).max(12);
    let mut lines = Vec::new();
    let mut previous: Option<Sender> = None;

    for message in &view.messages {
        if previous.is_some_and(|s| s != message.sender) {
            lines.push(Line::default());
        }
        if message.is_bot() && previous != Some(Sender::Bot) {
            lines.push(Line::from(Span::styled(
                guide_name.to_owned(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )));
        }
        lines.extend(bubble(message, bubble_width, accent, theme));
        previous = Some(message.sender);
    }

    if view.bot_typing {
        if previous.is_some() {
            lines.push(Line::default());
        }
        lines.push(typing_dots(tick, accent, theme));
    } else if view.user_typing {
        if previous.is_some() {
            lines.push(Line::default());
        }
        lines.push(typing_dots(tick, theme.bubble_user, theme).right_aligned());
    }
    lines
}

/// One message as wrapped lines: guide bubbles open with a left bar in the
/// accent color, visitor bubbles close with a right bar and are right-aligned.
fn bubble(message: &Message, width: usize, accent: ratatui::style::Color, theme: &Theme) -> Vec<Line<'static>> {
    let text_width = width.saturating_sub(2).max(1);
    wrap_words(&message.text, text_width)
        .into_iter()
        .map(|row| match message.sender {
            Sender::Bot => Line::from(vec![
                Span::styled("▌ ", Style::default().fg(accent)),
                Span::styled(row, Style::default().fg(theme.text)),
            ]),
            Sender::User => Line::from(vec![
                Span::styled(row, Style::default().fg(theme.bubble_user)),
                Span::styled(" ▐", Style::default().fg(theme.bubble_user)),
            ])
            .right_aligned(),
        })
        .collect()
}

/// Three dots with one lit, moving one step per tick.
fn typing_dots(tick: u64, color: ratatui::style::Color, theme: &Theme) -> Line<'static> {
    let lit = (tick % 3) as usize;
    let spans = (0..3)
        .map(|i| {
            let style = if i == lit {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.muted)
            };
            Span::styled(if i < 2 { "● " } else { "●" }, style)
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

/// The demo input box. Shows the draft with a cursor in Insert mode and the
/// localized placeholder otherwise.
fn render_input(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let editing = state.mode == Mode::Insert;
    let border = if editing { theme.border_active } else { theme.border_inactive };
    let block = Block::bordered()
        .border_style(Style::default().fg(border))
        .title(Line::from(format!(" {} ", state.t("chat.send"))).right_aligned());

    let line = if editing {
        // Keep the tail of a long draft visible.
        let room = usize::from(inner_rect(area).width.saturating_sub(1));
        let chars = state.input.chars().count();
        let visible: String = state.input.chars().skip(chars.saturating_sub(room)).collect();
        Line::from(vec![
            Span::styled(visible, Style::default().fg(theme.text)),
            Span::styled("▏", Style::default().fg(theme.border_active)),
        ])
    } else if state.input.is_empty() {
        Line::from(Span::styled(state.t("chat.inputPlaceholder"), Style::default().fg(theme.muted)))
    } else {
        Line::from(Span::styled(state.input.clone(), Style::default().fg(theme.muted)))
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Greedy word wrap to `width` characters. Words longer than a row are split.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                rows.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            rows.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }
        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > width {
            rows.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }
    if current_len > 0 || rows.is_empty() {
        rows.push(current);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use forward_together_core::Phase;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_words("That's okay. You don't have to have it figured out.", 20),
            vec!["That's okay. You", "don't have to have", "it figured out."]
        );
        assert_eq!(wrap_words("", 10), vec![""]);
        assert_eq!(wrap_words("supercalifragilistic", 8), vec!["supercal", "ifragili", "stic"]);
        assert_eq!(wrap_words("a bbbbbbbbbb c", 4), vec!["a", "bbbb", "bbbb", "bb c"]);
    }

    #[test]
    fn guide_name_heads_each_guide_run() {
        let view = ChatView {
            messages: vec![Message::bot("one"), Message::bot("two"), Message::user("three"), Message::bot("four")],
            bot_typing: false,
            user_typing: true,
            phase: Phase::Typing(Sender::User),
            pass: 1,
        };
        let theme = Theme::dark();
        let lines = message_lines(&view, "Bob", theme.accent_survivor, 60, 0, &theme);
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(
            text,
            vec!["Bob", "▌ one", "▌ two", "", "three ▐", "", "Bob", "▌ four", "", "● ● ●"]
        );
    }
}
