//! The active interface language.
//!
//! One `LocaleResolver` is built at startup and handed to whatever renders
//! text. It restores the persisted language, answers `t(key)` lookups against
//! the content store, and writes the language back every time it changes.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::content::ContentStore;
use crate::db::Preferences;
use crate::types::{Locale, Persona, Transcript};

/// Preference key under which the language code is persisted.
pub const LANGUAGE_KEY: &str = "language";

pub struct LocaleResolver {
    content: Arc<ContentStore>,
    prefs: Preferences,
    current: Locale,
}

impl LocaleResolver {
    /// Builds a resolver, restoring the persisted language from `prefs`.
    ///
    /// An absent, unsupported, or unreadable value falls back to `default`;
    /// none of these are errors.
    pub async fn restore(content: Arc<ContentStore>, prefs: Preferences, default: Locale) -> Self {
        let current = match prefs.get(LANGUAGE_KEY).await {
            Ok(Some(code)) => Locale::from_code(&code).unwrap_or_else(|| {
                debug!(%code, "ignoring unsupported persisted language");
                default
            }),
            Ok(None) => default,
            Err(e) => {
                warn!(error = %e, "could not read language preference");
                default
            }
        };
        info!(locale = %current, "interface language");
        Self { content, prefs, current }
    }

    pub fn current(&self) -> Locale {
        self.current
    }

    /// Switches to `code` and persists it.
    ///
    /// Unsupported codes leave the current language untouched and return
    /// `false`. A failed write is logged; the in-memory switch still applies.
    pub async fn set_locale(&mut self, code: &str) -> bool {
        let Some(locale) = Locale::from_code(code) else {
            debug!(%code, "rejected unsupported language");
            return false;
        };
        self.current = locale;
        if let Err(e) = self.prefs.set(LANGUAGE_KEY, locale.code()).await {
            warn!(error = %e, locale = %locale, "could not persist language preference");
        }
        info!(locale = %locale, "language changed");
        true
    }

    /// Advances to the next supported language and returns it.
    pub async fn cycle_locale(&mut self) -> Locale {
        let next = self.current.next();
        self.set_locale(next.code()).await;
        self.current
    }

    /// Resolves a UI string in the current language, falling back to `key`.
    pub fn t(&self, key: &str) -> String {
        self.content.string_for(self.current, key)
    }

    /// The scripted conversation for `persona` in the current language.
    pub fn conversation_for(&self, persona: Persona) -> Arc<Transcript> {
        self.content.transcript_for(self.current, persona)
    }

    pub fn content(&self) -> &Arc<ContentStore> {
        &self.content
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }
}
