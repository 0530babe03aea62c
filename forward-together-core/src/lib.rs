//! Content, language selection, preferences, and scripted chat playback for
//! Forward Together. The terminal front end lives in the `forward-together`
//! crate; nothing here touches the terminal.

pub mod content;
pub mod db;
pub mod error;
pub mod locale;
pub mod pacing;
pub mod player;
pub mod schema;
pub mod types;

pub use content::ContentStore;
pub use db::Preferences;
pub use error::{ContentError, PacingError, StoreError, TranscriptError};
pub use locale::LocaleResolver;
pub use pacing::{Pacing, PacingConfig};
pub use player::{ChatSession, ChatView, ConversationPlayer, Phase};
pub use types::{Locale, Message, Persona, Sender, Transcript};
