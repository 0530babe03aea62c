use thiserror::Error;

use crate::types::{Locale, Persona};

/// Structural problems with a single transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TranscriptError {
    #[error("transcript is empty")]
    Empty,

    #[error("transcript opens with a visitor message instead of the guide")]
    OpensWithUser,
}

/// Authoring defects found while loading the content tables.
///
/// These are caught once at startup; a store that loaded successfully can
/// resolve every key and transcript for every locale.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content for locale '{locale}' is malformed: {source}")]
    Parse {
        locale: Locale,
        #[source]
        source: toml::de::Error,
    },

    #[error("no content supplied for locale '{0}'")]
    MissingLocale(Locale),

    #[error("locale '{locale}' is missing string key '{key}'")]
    MissingKey { locale: Locale, key: String },

    #[error("locale '{locale}' has no transcript for '{persona}'")]
    MissingTranscript { locale: Locale, persona: Persona },

    #[error("transcript for '{persona}' in locale '{locale}' is invalid: {source}")]
    InvalidTranscript {
        locale: Locale,
        persona: Persona,
        #[source]
        source: TranscriptError,
    },
}

/// Failures of the durable preference store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preference database error: {0}")]
    Db(#[from] tokio_rusqlite::Error),
}

/// Rejected pacing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacingError {
    #[error("{name} range is empty ({lo}ms..{hi}ms)")]
    EmptyRange { name: &'static str, lo: u64, hi: u64 },

    #[error("visitor delay starts at {user_lo}ms, before the guide delay ends at {bot_hi}ms")]
    UserFasterThanBot { user_lo: u64, bot_hi: u64 },

    #[error("burst pause ({burst}ms) must be shorter than turn pause ({turn}ms)")]
    BurstNotShorter { burst: u64, turn: u64 },
}
