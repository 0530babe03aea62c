//! The static content pages.
//!
//! Each page is built as a `Text` from localized strings and drawn as one
//! scrolling `Paragraph` inside the body panel. Nothing here holds state; the
//! scroll offset lives in `AppState::page_scroll` and is clamped on render.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use crate::app::{AppState, Page};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders a static page into the body area.
///
/// Writes the clamped scroll offset back into `state` so that `G` followed by
/// `k` moves up from the real bottom.
pub fn render_page(frame: &mut Frame, area: Rect, page: Page, state: &mut AppState, theme: &Theme) {
    let inner = inner_rect(area);
    let paragraph = Paragraph::new(build_page(page, state, theme)).wrap(Wrap { trim: false });

    let rows = paragraph.line_count(inner.width);
    let max_scroll = rows.saturating_sub(inner.height as usize).min(u16::MAX as usize) as u16;
    state.page_scroll = state.page_scroll.min(max_scroll);

    let title = Line::from(format!(" {} ", state.t(page.nav_key())));
    frame.render_widget(
        paragraph
            .block(panel_block(title, true, theme))
            .scroll((state.page_scroll, 0)),
        area,
    );
}

fn build_page(page: Page, state: &AppState, theme: &Theme) -> Text<'static> {
    let p = Styler { state, theme };
    let lines = match page {
        Page::Home => home(&p),
        Page::HowItWorks => how_it_works(&p),
        Page::ForSurvivors => for_survivors(&p),
        Page::ForCaregivers => for_caregivers(&p),
        Page::Stories => stories(&p),
        Page::GetStarted => get_started(&p),
        Page::Chat(_) => Vec::new(),
    };
    Text::from(lines)
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

fn home(p: &Styler) -> Vec<Line<'static>> {
    let mut out = vec![
        Line::default(),
        p.title("hero.title1", "hero.title2"),
        Line::default(),
        p.body("hero.description"),
        Line::default(),
        p.action("6", "hero.startJourney"),
        p.action("2", "hero.seeHowItWorks"),
        p.muted("hero.joinWith"),
        Line::default(),
    ];

    // Static preview of the Bob conversation.
    out.push(p.heading_pair("chatPreview.bob", "chatPreview.yourSurvivorGuide"));
    out.push(p.preview_bubble("chatPreview.msg1", true));
    out.push(p.preview_bubble("chatPreview.msg2", true));
    out.push(p.preview_bubble("chatPreview.msg3", false));
    out.push(p.preview_bubble("chatPreview.msg4", true));
    out.push(Line::default());

    out.extend(steps(p));
    out.extend(guides(p));
    out.extend(features(p));

    out.push(p.title("cta.title", ""));
    out.push(p.body("cta.subtitle"));
    out.push(p.action("b", "cta.imSurvivor"));
    out.push(p.action("m", "cta.imCaregiver"));
    out.push(p.muted("cta.freePrivate"));
    out
}

fn how_it_works(p: &Styler) -> Vec<Line<'static>> {
    let mut out = vec![
        Line::default(),
        p.label("howItWorksPage.label"),
        p.title("howItWorksPage.title", "howItWorksPage.highlight"),
        p.body("howItWorksPage.subtitle"),
        Line::default(),
    ];
    out.extend(steps(p));
    out.extend(features(p));
    out.push(p.action("6", "nav.beginJourney"));
    out
}

fn for_survivors(p: &Styler) -> Vec<Line<'static>> {
    let mut out = vec![
        Line::default(),
        p.label("forSurvivors.label"),
        p.title("forSurvivors.title", "forSurvivors.highlight"),
        p.body("forSurvivors.subtitle"),
        Line::default(),
        p.action("b", "forSurvivors.ctaText"),
        Line::default(),
        p.label("forSurvivors.sectionTitle"),
    ];
    for n in 1..=4 {
        out.extend(p.item(&format!("forSurvivors.stage{n}Title"), &format!("forSurvivors.stage{n}Desc")));
    }
    out
}

fn for_caregivers(p: &Styler) -> Vec<Line<'static>> {
    let mut out = vec![
        Line::default(),
        p.label("forCaregivers.label"),
        p.title("forCaregivers.title", "forCaregivers.highlight"),
        p.body("forCaregivers.subtitle"),
        Line::default(),
        p.action("m", "forCaregivers.ctaText"),
        Line::default(),
        p.label("forCaregivers.sectionTitle"),
    ];
    for n in 1..=3 {
        out.extend(p.item(&format!("forCaregivers.quote{n}"), &format!("forCaregivers.response{n}")));
    }
    out
}

fn stories(p: &Styler) -> Vec<Line<'static>> {
    let mut out = vec![
        Line::default(),
        p.label("stories.label"),
        p.title("stories.title", "stories.highlight"),
        p.body("stories.subtitle"),
        Line::default(),
    ];
    for who in ["sarah", "michael"] {
        out.push(p.heading_pair(&format!("stories.{who}.name"), &format!("stories.{who}.role")));
        out.push(p.emphasis(&format!("stories.{who}.headline")));
        out.push(p.body(&format!("stories.{who}.story")));
        out.push(Line::from(vec![
            Span::styled(format!("{} ", p.t("stories.today")), p.label_style()),
            Span::styled(p.t(&format!("stories.{who}.outcome")), Style::default().fg(p.theme.text)),
        ]));
        out.push(Line::default());
    }
    out
}

fn get_started(p: &Styler) -> Vec<Line<'static>> {
    vec![
        Line::default(),
        p.title("getStarted.welcome", ""),
        p.body("getStarted.weAreHere"),
        Line::default(),
        p.emphasis("getStarted.facingDiagnosis"),
        p.body("getStarted.talkToBob"),
        p.action("b", "getStarted.meetBob"),
        Line::default(),
        p.emphasis("getStarted.caringForSomeone"),
        p.body("getStarted.talkToMiri"),
        p.action("m", "getStarted.meetMiri"),
        Line::default(),
        p.action("1", "getStarted.backToHome"),
    ]
}

// Sections shared between pages.

fn steps(p: &Styler) -> Vec<Line<'static>> {
    let mut out = vec![
        p.label("howItWorks.label"),
        p.title("howItWorks.title1", "howItWorks.title2"),
        p.muted("howItWorks.subtitle"),
    ];
    for n in 1..=4 {
        out.extend(p.item(&format!("howItWorks.step{n}Title"), &format!("howItWorks.step{n}Desc")));
    }
    out.push(Line::default());
    out
}

fn guides(p: &Styler) -> Vec<Line<'static>> {
    let mut out = vec![p.label("guides.label"), p.title("guides.title", ""), Line::default()];
    for (who, key, accent) in [
        ("bob", "b", p.theme.accent_survivor),
        ("miri", "m", p.theme.accent_caregiver),
    ] {
        out.push(Line::from(vec![
            Span::styled(
                p.t(&format!("guides.{who}.name")),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", p.t(&format!("guides.{who}.role"))), Style::default().fg(p.theme.muted)),
        ]));
        out.push(p.body(&format!("guides.{who}.description")));
        let traits = (1..=3)
            .map(|n| p.t(&format!("guides.{who}.trait{n}")))
            .collect::<Vec<_>>()
            .join(" · ");
        out.push(Line::from(Span::styled(traits, Style::default().fg(accent))));
        out.push(p.action(key, &format!("guides.{who}.button")));
        out.push(Line::default());
    }
    out
}

fn features(p: &Styler) -> Vec<Line<'static>> {
    let mut out = vec![p.label("features.label"), p.title("features.title", "")];
    for n in 1..=6 {
        out.extend(p.item(&format!("features.feature{n}Title"), &format!("features.feature{n}Desc")));
    }
    out.push(Line::default());
    out
}

// ---------------------------------------------------------------------------
// Line builders
// ---------------------------------------------------------------------------

/// Resolves keys and applies the theme's text roles.
struct Styler<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl Styler<'_> {
    fn t(&self, key: &str) -> String {
        self.state.t(key)
    }

    fn label_style(&self) -> Style {
        Style::default().fg(self.theme.highlight).add_modifier(Modifier::BOLD)
    }

    /// Small uppercase section label.
    fn label(&self, key: &str) -> Line<'static> {
        Line::from(Span::styled(self.t(key).to_uppercase(), self.label_style()))
    }

    /// Heading with an optional highlighted second half. Pass `""` for none.
    fn title(&self, key: &str, highlight_key: &str) -> Line<'static> {
        let mut spans = vec![Span::styled(
            self.t(key),
            Style::default().fg(self.theme.heading).add_modifier(Modifier::BOLD),
        )];
        if !highlight_key.is_empty() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                self.t(highlight_key),
                Style::default().fg(self.theme.highlight).add_modifier(Modifier::BOLD | Modifier::ITALIC),
            ));
        }
        Line::from(spans)
    }

    fn heading_pair(&self, key: &str, secondary_key: &str) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                self.t(key),
                Style::default().fg(self.theme.heading).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", self.t(secondary_key)), Style::default().fg(self.theme.muted)),
        ])
    }

    fn body(&self, key: &str) -> Line<'static> {
        Line::from(Span::styled(self.t(key), Style::default().fg(self.theme.text)))
    }

    fn muted(&self, key: &str) -> Line<'static> {
        Line::from(Span::styled(self.t(key), Style::default().fg(self.theme.muted)))
    }

    fn emphasis(&self, key: &str) -> Line<'static> {
        Line::from(Span::styled(
            self.t(key),
            Style::default().fg(self.theme.heading).add_modifier(Modifier::ITALIC),
        ))
    }

    /// A call to action with the key that performs it.
    fn action(&self, shortcut: &str, key: &str) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!(" {shortcut} "),
                Style::default().fg(self.theme.background).bg(self.theme.nav_active).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", self.t(key)), Style::default().fg(self.theme.nav_active)),
        ])
    }

    /// A bulleted title with its description on the following line.
    fn item(&self, title_key: &str, desc_key: &str) -> [Line<'static>; 2] {
        [
            Line::from(vec![
                Span::styled("• ", Style::default().fg(self.theme.highlight)),
                Span::styled(
                    self.t(title_key),
                    Style::default().fg(self.theme.heading).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(format!("  {}", self.t(desc_key)), Style::default().fg(self.theme.muted))),
        ]
    }

    /// One line of the home-page chat preview.
    fn preview_bubble(&self, key: &str, from_guide: bool) -> Line<'static> {
        if from_guide {
            Line::from(vec![
                Span::styled("▌ ", Style::default().fg(self.theme.accent_survivor)),
                Span::styled(self.t(key), Style::default().fg(self.theme.text)),
            ])
        } else {
            Line::from(vec![
                Span::styled(self.t(key), Style::default().fg(self.theme.bubble_user)),
                Span::styled(" ▐", Style::default().fg(self.theme.bubble_user)),
            ])
            .right_aligned()
        }
    }
}
