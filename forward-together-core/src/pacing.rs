//! Timing parameters for scripted playback.
//!
//! The numbers themselves are a presentation choice. What the player relies on
//! is their ordering: a visitor "composing" a reply always takes longer than the
//! guide, and consecutive guide bubbles arrive in a quicker burst than a change
//! of speaker. [`Pacing::validate`] enforces both.

use std::ops::Range;
use std::time::Duration;

use rand::Rng;
use serde::Deserialize;

use crate::error::PacingError;
use crate::types::{Message, Sender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pacing {
    /// Typing indicator duration before a guide message appears.
    pub bot_delay: Range<Duration>,
    /// Typing indicator duration before a visitor message appears.
    pub user_delay: Range<Duration>,
    /// Pause after a guide message that is followed by another guide message.
    pub burst_pause: Duration,
    /// Pause after any message followed by a change of speaker.
    pub turn_pause: Duration,
    /// Pause after the final message before the conversation starts over.
    pub end_pause: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            bot_delay: ms(1500)..ms(2000),
            user_delay: ms(3500)..ms(5000),
            burst_pause: ms(600),
            turn_pause: ms(1400),
            end_pause: ms(6000),
        }
    }
}

impl Pacing {
    /// Checks the orderings the player depends on.
    ///
    /// # Errors
    ///
    /// Returns `PacingError` for an empty delay range, a visitor range that
    /// can undercut the guide range, or a burst pause that is not shorter than
    /// the turn pause.
    pub fn validate(&self) -> Result<(), PacingError> {
        check_range("guide delay", &self.bot_delay)?;
        check_range("visitor delay", &self.user_delay)?;
        if self.user_delay.start < self.bot_delay.end {
            return Err(PacingError::UserFasterThanBot {
                user_lo: millis(self.user_delay.start),
                bot_hi: millis(self.bot_delay.end),
            });
        }
        if self.burst_pause >= self.turn_pause {
            return Err(PacingError::BurstNotShorter {
                burst: millis(self.burst_pause),
                turn: millis(self.turn_pause),
            });
        }
        Ok(())
    }

    /// Draws the typing duration for a message from `sender`.
    pub fn thinking_delay<R: Rng>(&self, sender: Sender, rng: &mut R) -> Duration {
        let range = match sender {
            Sender::Bot => &self.bot_delay,
            Sender::User => &self.user_delay,
        };
        let (lo, hi) = (millis(range.start), millis(range.end));
        if hi <= lo {
            return range.start;
        }
        Duration::from_millis(rng.gen_range(lo..hi))
    }

    /// The pause after `current` given the message that follows it.
    ///
    /// `None` after the last message; the end pause applies there instead.
    pub fn read_pause(&self, current: &Message, next: Option<&Message>) -> Option<Duration> {
        let next = next?;
        if current.is_bot() && next.is_bot() {
            Some(self.burst_pause)
        } else {
            Some(self.turn_pause)
        }
    }
}

/// The `[pacing]` section of `config.toml`, in milliseconds.
///
/// Every field is optional; unset fields keep the default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub bot_delay_ms: Option<[u64; 2]>,
    pub user_delay_ms: Option<[u64; 2]>,
    pub burst_pause_ms: Option<u64>,
    pub turn_pause_ms: Option<u64>,
    pub end_pause_ms: Option<u64>,
}

impl PacingConfig {
    /// Overlays the configured values on the defaults and validates the result.
    ///
    /// # Errors
    ///
    /// Returns `PacingError` if the merged pacing fails [`Pacing::validate`].
    pub fn resolve(&self) -> Result<Pacing, PacingError> {
        let defaults = Pacing::default();
        let range = |v: Option<[u64; 2]>, fallback: Range<Duration>| match v {
            Some([lo, hi]) => ms(lo)..ms(hi),
            None => fallback,
        };
        let pacing = Pacing {
            bot_delay: range(self.bot_delay_ms, defaults.bot_delay),
            user_delay: range(self.user_delay_ms, defaults.user_delay),
            burst_pause: self.burst_pause_ms.map(ms).unwrap_or(defaults.burst_pause),
            turn_pause: self.turn_pause_ms.map(ms).unwrap_or(defaults.turn_pause),
            end_pause: self.end_pause_ms.map(ms).unwrap_or(defaults.end_pause),
        };
        pacing.validate()?;
        Ok(pacing)
    }
}

fn check_range(name: &'static str, range: &Range<Duration>) -> Result<(), PacingError> {
    if range.start >= range.end {
        return Err(PacingError::EmptyRange {
            name,
            lo: millis(range.start),
            hi: millis(range.end),
        });
    }
    Ok(())
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn millis(d: Duration) -> u64 {
    d.as_millis() as u64
}
