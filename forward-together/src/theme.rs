//! Color themes for the Forward Together terminal front end.
//!
//! A `Theme` holds named `ratatui::style::Color` fields for every surface the
//! shell draws. Two built-in themes are provided:
//!
//! - `dark`: ANSI 16 colors only, so it renders the same over SSH and on
//!   256-color terminals.
//! - `catppuccin_mocha`: the Catppuccin Mocha palette in RGB; needs truecolor.
//!
//! Each guide has an accent color. Bob's is warm, Miri's is cool, matching the
//! amber and teal of the website.

use forward_together_core::Persona;
use ratatui::style::Color;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_active: Color,
    pub border_inactive: Color,

    // Navigation bar
    /// Label of the page currently shown.
    pub nav_active: Color,
    pub nav_inactive: Color,
    /// Brand wordmark, "Forward" half. The "Together" half uses `accent_caregiver`.
    pub brand: Color,

    // Page text
    /// Section labels and headings.
    pub heading: Color,
    /// Highlighted second half of a heading.
    pub highlight: Color,
    pub text: Color,
    /// Secondary copy: subtitles, footnotes, placeholders.
    pub muted: Color,

    // Chat
    /// Accent for Bob: header, bubble name, typing dots.
    pub accent_survivor: Color,
    /// Accent for Miri.
    pub accent_caregiver: Color,
    /// Visitor bubbles.
    pub bubble_user: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_mode_normal: Color,
    pub status_mode_insert: Color,

    pub background: Color,
}

impl Theme {
    /// The built-in dark theme using ANSI 16 colors. Default when no config is present.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Yellow,
            border_inactive: Color::DarkGray,

            nav_active: Color::Yellow,
            nav_inactive: Color::Gray,
            brand: Color::Yellow,

            heading: Color::White,
            highlight: Color::Yellow,
            text: Color::Reset,
            muted: Color::DarkGray,

            accent_survivor: Color::Yellow,
            accent_caregiver: Color::Cyan,
            bubble_user: Color::Blue,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Yellow,
            status_mode_insert: Color::Green,

            background: Color::Reset,
        }
    }

    /// The Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let peach = Color::Rgb(250, 179, 135); // #fab387
        let teal = Color::Rgb(148, 226, 213); // #94e2d5
        let blue = Color::Rgb(137, 180, 250); // #89b4fa
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let subtext0 = Color::Rgb(166, 173, 200); // #a6adc8
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let base = Color::Rgb(30, 30, 46); // #1e1e2e
        let text = Color::Rgb(205, 214, 244); // #cdd6f4

        Self {
            border_active: peach,
            border_inactive: overlay1,

            nav_active: peach,
            nav_inactive: subtext0,
            brand: peach,

            heading: text,
            highlight: yellow,
            text,
            muted: overlay1,

            accent_survivor: peach,
            accent_caregiver: teal,
            bubble_user: blue,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: peach,
            status_mode_insert: green,

            background: base,
        }
    }

    /// Resolves a theme name from config to a built-in theme.
    ///
    /// Unknown names fall back to `dark()` with a warning in the log.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }

    /// Accent color of `persona`.
    pub fn accent(&self, persona: Persona) -> Color {
        match persona {
            Persona::SurvivorGuide => self.accent_survivor,
            Persona::CaregiverGuide => self.accent_caregiver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_fall_back_to_dark() {
        assert_eq!(Theme::from_name("solarized").border_active, Theme::dark().border_active);
        assert_eq!(
            Theme::from_name("catppuccin-mocha").background,
            Theme::catppuccin_mocha().background
        );
    }

    #[test]
    fn guides_have_distinct_accents() {
        for theme in [Theme::dark(), Theme::catppuccin_mocha()] {
            assert_ne!(
                theme.accent(Persona::SurvivorGuide),
                theme.accent(Persona::CaregiverGuide)
            );
        }
    }
}
