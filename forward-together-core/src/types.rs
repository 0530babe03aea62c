//! Domain types shared by the content store, the locale resolver, and the player.
//!
//! Everything here is plain owned data. `Locale` and `Persona` are closed sets:
//! adding a variant means adding content for it, which the content store checks
//! at load time.

use std::fmt;

use serde::Deserialize;

use crate::error::TranscriptError;

/// Who authored a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The guide persona (Bob or Miri).
    Bot,
    /// The scripted visitor on the other side of the conversation.
    User,
}

/// A single chat bubble.
///
/// Messages are defined once in the content files and never mutated; the
/// player clones them into the view model as they are revealed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    /// Builds a guide message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self { sender: Sender::Bot, text: text.into() }
    }

    /// Builds a visitor message.
    pub fn user(text: impl Into<String>) -> Self {
        Self { sender: Sender::User, text: text.into() }
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

/// The fixed, ordered script for one persona in one locale.
///
/// Construction guarantees the transcript is non-empty and opens with a guide
/// message, so the player never has to handle either case at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Validates and wraps `messages`.
    ///
    /// # Errors
    ///
    /// Returns `TranscriptError::Empty` for an empty list and
    /// `TranscriptError::OpensWithUser` when the first line is not from the guide.
    pub fn new(messages: Vec<Message>) -> Result<Self, TranscriptError> {
        match messages.first() {
            None => Err(TranscriptError::Empty),
            Some(first) if !first.is_bot() => Err(TranscriptError::OpensWithUser),
            Some(_) => Ok(Self { messages }),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always `false` for a constructed transcript; kept for slice parity.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

/// One of the two support guides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    /// Bob, for people facing a diagnosis.
    SurvivorGuide,
    /// Miri, for the people caring for them.
    CaregiverGuide,
}

impl Persona {
    pub const ALL: [Persona; 2] = [Persona::SurvivorGuide, Persona::CaregiverGuide];

    /// Stable identifier used as the transcript table name in content files.
    pub fn slug(self) -> &'static str {
        match self {
            Persona::SurvivorGuide => "survivor-guide",
            Persona::CaregiverGuide => "caregiver-guide",
        }
    }

    /// Content key of the guide's display name.
    pub fn name_key(self) -> &'static str {
        match self {
            Persona::SurvivorGuide => "guides.bob.name",
            Persona::CaregiverGuide => "guides.miri.name",
        }
    }

    /// Content key of the guide's role label shown in the chat header.
    pub fn role_key(self) -> &'static str {
        match self {
            Persona::SurvivorGuide => "chat.survivorGuide",
            Persona::CaregiverGuide => "chat.caregiverGuide",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A supported interface language.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Es];

    /// Short language code, as persisted in the preference store.
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }

    /// Parses a language code. Matching ignores ASCII case and surrounding
    /// whitespace; anything else unsupported yields `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL.into_iter().find(|l| l.code().eq_ignore_ascii_case(code))
    }

    /// The next locale in `ALL`, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_rejects_empty_and_user_openers() {
        assert_eq!(Transcript::new(vec![]), Err(TranscriptError::Empty));
        assert_eq!(
            Transcript::new(vec![Message::user("hi"), Message::bot("hello")]),
            Err(TranscriptError::OpensWithUser)
        );
        let t = Transcript::new(vec![Message::bot("hello"), Message::user("hi")]).unwrap();
        assert_eq!(t.len(), 2);
        assert!(t.get(0).unwrap().is_bot());
    }

    #[test]
    fn locale_codes() {
        assert_eq!(Locale::from_code("es"), Some(Locale::Es));
        assert_eq!(Locale::from_code(" EN "), Some(Locale::En));
        assert_eq!(Locale::from_code("fr"), None);
        assert_eq!(Locale::from_code(""), None);
        assert_eq!(Locale::En.next(), Locale::Es);
        assert_eq!(Locale::Es.next(), Locale::En);
    }

    #[test]
    fn persona_slugs_are_distinct() {
        assert_ne!(Persona::SurvivorGuide.slug(), Persona::CaregiverGuide.slug());
    }
}
