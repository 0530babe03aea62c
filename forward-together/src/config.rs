//! User configuration and XDG paths.
//!
//! Everything in `config.toml` is optional, and every problem with it is a soft
//! failure: the offending value is logged and replaced by its default. A broken
//! config never keeps the app from starting.
//!
//! ```toml
//! theme = "catppuccin-mocha"
//! default_locale = "es"
//!
//! [pacing]
//! bot_delay_ms = [1500, 2000]
//! user_delay_ms = [3500, 5000]
//! burst_pause_ms = 600
//! turn_pause_ms = 1400
//! end_pause_ms = 6000
//! ```

use std::path::{Path, PathBuf};

use forward_together_core::{Locale, Pacing, PacingConfig};
use serde::Deserialize;
use tracing::{debug, warn};

const APP_DIR: &str = "forward-together";
const DEFAULT_THEME: &str = "catppuccin-mocha";

/// Resolved configuration, defaults already applied.
#[derive(Debug, Clone)]
pub struct Config {
    pub theme: String,
    /// Language used when no preference has been saved yet.
    pub default_locale: Locale,
    pub pacing: Pacing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_owned(),
            default_locale: Locale::default(),
            pacing: Pacing::default(),
        }
    }
}

/// `config.toml` as written by the user.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    theme: Option<String>,
    default_locale: Option<String>,
    pacing: PacingConfig,
}

impl Config {
    /// Loads `config_path()`. A missing file yields the defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(raw) => Self::parse(&raw, &path),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no config file, using defaults");
                Self::default()
            }
        }
    }

    /// Parses config text, falling back per field on invalid values.
    pub fn parse(raw: &str, origin: &Path) -> Self {
        let raw: RawConfig = match toml::from_str(raw) {
            Ok(r) => r,
            Err(e) => {
                warn!(path = %origin.display(), error = %e, "config parse error, using defaults");
                return Self::default();
            }
        };
        let defaults = Self::default();

        let default_locale = match raw.default_locale.as_deref() {
            None => defaults.default_locale,
            Some(code) => Locale::from_code(code).unwrap_or_else(|| {
                warn!(code, "unsupported default_locale in config, using 'en'");
                defaults.default_locale
            }),
        };

        let pacing = raw.pacing.resolve().unwrap_or_else(|e| {
            warn!(error = %e, "invalid [pacing] in config, using default pacing");
            defaults.pacing.clone()
        });

        Self {
            theme: raw.theme.unwrap_or(defaults.theme),
            default_locale,
            pacing,
        }
    }
}

/// `$XDG_CONFIG_HOME/forward-together/config.toml`, falling back to
/// `~/.config/forward-together/config.toml`.
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config").join(APP_DIR).join("config.toml")
}

/// `$XDG_DATA_HOME/forward-together`, falling back to
/// `~/.local/share/forward-together`. Holds the preference database and the log.
pub fn data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", ".local/share").join(APP_DIR)
}

fn xdg_dir(var: &str, home_relative: &str) -> PathBuf {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(home_relative))
        })
        .unwrap_or_else(|| PathBuf::from(home_relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parse(raw: &str) -> Config {
        Config::parse(raw, Path::new("config.toml"))
    }

    #[test]
    fn empty_config_is_all_defaults() {
        let config = parse("");
        assert_eq!(config.theme, DEFAULT_THEME);
        assert_eq!(config.default_locale, Locale::En);
        assert_eq!(config.pacing, Pacing::default());
    }

    #[test]
    fn reads_every_field() {
        let config = parse(
            r#"
            theme = "dark"
            default_locale = "ES"

            [pacing]
            end_pause_ms = 2500
            "#,
        );
        assert_eq!(config.theme, "dark");
        assert_eq!(config.default_locale, Locale::Es);
        assert_eq!(config.pacing.end_pause, Duration::from_millis(2500));
    }

    #[test]
    fn bad_values_fall_back_individually() {
        let config = parse(
            r#"
            theme = "dark"
            default_locale = "fr"

            [pacing]
            user_delay_ms = [100, 200]
            "#,
        );
        assert_eq!(config.theme, "dark");
        assert_eq!(config.default_locale, Locale::En);
        assert_eq!(config.pacing, Pacing::default());
    }

    #[test]
    fn malformed_toml_is_not_fatal() {
        let config = parse("theme = ");
        assert_eq!(config.theme, DEFAULT_THEME);
    }
}
