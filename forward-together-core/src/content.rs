//! Localized UI strings and conversation transcripts.
//!
//! Content is authored as one TOML document per locale under `content/` and
//! embedded at compile time. Top-level tables hold UI strings addressed by
//! dot-path (`nav.home`, `guides.bob.name`); the `transcripts` table holds one
//! array of `{ sender, text }` entries per persona slug.
//!
//! [`ContentStore::from_sources`] runs the completeness check: every locale must
//! be present, every string key found in any locale must exist in all of them,
//! and both persona transcripts must be present and well-formed. After that,
//! lookups never fail: a missing string resolves to its own key.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::error::ContentError;
use crate::types::{Locale, Message, Persona, Transcript};

/// The table name holding transcripts; every other top-level table is UI text.
const TRANSCRIPTS_TABLE: &str = "transcripts";

const EMBEDDED: [(Locale, &str); 2] = [
    (Locale::En, include_str!("../content/en.toml")),
    (Locale::Es, include_str!("../content/es.toml")),
];

/// Parsed content for one locale.
#[derive(Debug)]
struct LocaleContent {
    strings: toml::Table,
    /// Indexed by `Persona::index()`.
    transcripts: [Arc<Transcript>; 2],
}

/// Immutable, validated content for every supported locale.
#[derive(Debug)]
pub struct ContentStore {
    /// Indexed by `Locale::index()`.
    locales: Vec<LocaleContent>,
}

impl ContentStore {
    /// Loads the content shipped inside the binary.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if the embedded files fail the completeness check.
    pub fn embedded() -> Result<Self, ContentError> {
        Self::from_sources(EMBEDDED)
    }

    /// Parses and validates one TOML document per locale.
    ///
    /// # Errors
    ///
    /// Returns the first authoring defect found: malformed TOML, a locale with
    /// no document, a string key missing from some locale, or a missing or
    /// malformed transcript.
    pub fn from_sources<'a>(
        sources: impl IntoIterator<Item = (Locale, &'a str)>,
    ) -> Result<Self, ContentError> {
        let mut parsed: HashMap<Locale, LocaleContent> = HashMap::new();
        for (locale, source) in sources {
            parsed.insert(locale, parse_locale(locale, source)?);
        }

        let mut locales = Vec::with_capacity(Locale::ALL.len());
        for locale in Locale::ALL {
            let content = parsed.remove(&locale).ok_or(ContentError::MissingLocale(locale))?;
            locales.push(content);
        }

        let store = Self { locales };
        store.check_key_parity()?;
        Ok(store)
    }

    /// Resolves a dot-delimited key to a UI string.
    ///
    /// Returns `key` itself when any path segment is missing, when the path
    /// ends on a table, or when the string is empty, so untranslated text is
    /// visible on screen instead of failing.
    pub fn string_for(&self, locale: Locale, key: &str) -> String {
        lookup(&self.content(locale).strings, key)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| key.to_owned())
    }

    /// Returns the shared transcript for `persona` in `locale`.
    pub fn transcript_for(&self, locale: Locale, persona: Persona) -> Arc<Transcript> {
        Arc::clone(&self.content(locale).transcripts[persona.index()])
    }

    /// Lists every string key of `locale` as a dot-path, in sorted order.
    pub fn keys(&self, locale: Locale) -> Vec<String> {
        let mut out = Vec::new();
        collect_keys(&self.content(locale).strings, "", &mut out);
        out.sort();
        out
    }

    fn content(&self, locale: Locale) -> &LocaleContent {
        &self.locales[locale.index()]
    }

    fn check_key_parity(&self) -> Result<(), ContentError> {
        let per_locale: Vec<(Locale, BTreeSet<String>)> = Locale::ALL
            .into_iter()
            .map(|l| (l, self.keys(l).into_iter().collect()))
            .collect();
        let union: BTreeSet<&String> = per_locale.iter().flat_map(|(_, keys)| keys).collect();

        for (locale, keys) in &per_locale {
            if let Some(missing) = union.iter().find(|k| !keys.contains(k.as_str())) {
                return Err(ContentError::MissingKey {
                    locale: *locale,
                    key: (*missing).clone(),
                });
            }
        }
        Ok(())
    }
}

fn parse_locale(locale: Locale, source: &str) -> Result<LocaleContent, ContentError> {
    let mut strings: toml::Table =
        toml::from_str(source).map_err(|source| ContentError::Parse { locale, source })?;

    let mut raw: HashMap<String, Vec<Message>> = match strings.remove(TRANSCRIPTS_TABLE) {
        Some(value) => value
            .try_into()
            .map_err(|source| ContentError::Parse { locale, source })?,
        None => HashMap::new(),
    };

    let mut load = |persona: Persona| -> Result<Arc<Transcript>, ContentError> {
        let messages = raw
            .remove(persona.slug())
            .ok_or(ContentError::MissingTranscript { locale, persona })?;
        Transcript::new(messages)
            .map(Arc::new)
            .map_err(|source| ContentError::InvalidTranscript { locale, persona, source })
    };
    let survivor = load(Persona::SurvivorGuide)?;
    let caregiver = load(Persona::CaregiverGuide)?;

    Ok(LocaleContent { strings, transcripts: [survivor, caregiver] })
}

fn lookup<'a>(table: &'a toml::Table, key: &str) -> Option<&'a str> {
    let mut segments = key.split('.');
    let mut value = table.get(segments.next()?)?;
    for segment in segments {
        value = value.as_table()?.get(segment)?;
    }
    value.as_str()
}

fn collect_keys(table: &toml::Table, prefix: &str, out: &mut Vec<String>) {
    for (name, value) in table {
        let path = if prefix.is_empty() { name.clone() } else { format!("{prefix}.{name}") };
        match value {
            toml::Value::Table(inner) => collect_keys(inner, &path, out),
            _ => out.push(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranscriptError;
    use crate::types::Sender;

    const EN: &str = r#"
        [nav]
        home = "Home"

        [guides.bob]
        name = "Bob"

        [[transcripts.survivor-guide]]
        sender = "bot"
        text = "Hey. I'm Bob."

        [[transcripts.caregiver-guide]]
        sender = "bot"
        text = "Hi. I'm Miri."
    "#;

    const ES: &str = r#"
        [nav]
        home = "Inicio"

        [guides.bob]
        name = "Bob"

        [[transcripts.survivor-guide]]
        sender = "bot"
        text = "Hola. Soy Bob."

        [[transcripts.caregiver-guide]]
        sender = "bot"
        text = "Hola. Soy Miri."
    "#;

    #[test]
    fn resolves_nested_keys() {
        let store = ContentStore::from_sources([(Locale::En, EN), (Locale::Es, ES)]).unwrap();
        assert_eq!(store.string_for(Locale::En, "nav.home"), "Home");
        assert_eq!(store.string_for(Locale::Es, "nav.home"), "Inicio");
        assert_eq!(store.string_for(Locale::Es, "guides.bob.name"), "Bob");
    }

    #[test]
    fn unresolvable_keys_fall_back_to_the_key() {
        let store = ContentStore::from_sources([(Locale::En, EN), (Locale::Es, ES)]).unwrap();
        assert_eq!(store.string_for(Locale::En, "nonexistent.key"), "nonexistent.key");
        // Path runs past a leaf.
        assert_eq!(store.string_for(Locale::En, "nav.home.extra"), "nav.home.extra");
        // Path stops at a table.
        assert_eq!(store.string_for(Locale::En, "guides.bob"), "guides.bob");
        assert_eq!(store.string_for(Locale::En, ""), "");
    }

    #[test]
    fn missing_locale_is_rejected() {
        let err = ContentStore::from_sources([(Locale::En, EN)]).unwrap_err();
        assert!(matches!(err, ContentError::MissingLocale(Locale::Es)));
    }

    #[test]
    fn partial_locale_is_rejected() {
        let partial = ES.replace("home = \"Inicio\"", "");
        let err =
            ContentStore::from_sources([(Locale::En, EN), (Locale::Es, partial.as_str())]).unwrap_err();
        match err {
            ContentError::MissingKey { locale, key } => {
                assert_eq!(locale, Locale::Es);
                assert_eq!(key, "nav.home");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_or_malformed_transcripts_are_rejected() {
        let no_miri = EN.replace("caregiver-guide", "someone-else");
        let err =
            ContentStore::from_sources([(Locale::En, no_miri.as_str()), (Locale::Es, ES)]).unwrap_err();
        assert!(matches!(
            err,
            ContentError::MissingTranscript { locale: Locale::En, persona: Persona::CaregiverGuide }
        ));

        let user_first = ES.replace(
            "sender = \"bot\"\n        text = \"Hola. Soy Bob.\"",
            "sender = \"user\"\n        text = \"Hola.\"",
        );
        let err = ContentStore::from_sources([(Locale::En, EN), (Locale::Es, user_first.as_str())])
            .unwrap_err();
        assert!(matches!(
            err,
            ContentError::InvalidTranscript {
                locale: Locale::Es,
                persona: Persona::SurvivorGuide,
                source: TranscriptError::OpensWithUser,
            }
        ));
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let err = ContentStore::from_sources([(Locale::En, "[nav"), (Locale::Es, ES)]).unwrap_err();
        assert!(matches!(err, ContentError::Parse { locale: Locale::En, .. }));
    }

    #[test]
    fn embedded_content_is_complete() {
        let store = ContentStore::embedded().unwrap();
        for locale in Locale::ALL {
            for persona in Persona::ALL {
                let transcript = store.transcript_for(locale, persona);
                assert!(!transcript.is_empty());
                assert_eq!(transcript.messages()[0].sender, Sender::Bot);
            }
            assert_eq!(store.keys(locale), store.keys(Locale::En));
        }
        assert_eq!(store.string_for(Locale::Es, "nav.home"), "Inicio");
        assert_eq!(store.string_for(Locale::En, "chat.online"), "Online");
    }

    #[test]
    fn transcripts_are_shared_not_copied() {
        let store = ContentStore::embedded().unwrap();
        let a = store.transcript_for(Locale::En, Persona::SurvivorGuide);
        let b = store.transcript_for(Locale::En, Persona::SurvivorGuide);
        assert!(Arc::ptr_eq(&a, &b));
    }
}
