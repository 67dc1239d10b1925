//! User settings loaded from `config.toml`.
//!
//! The file lives at `~/.config/wikiscroll/config.toml` (or wherever
//! `--config` points).  Every field is optional; a missing file yields the
//! defaults and a file that fails to parse is logged and ignored.
//!
//! ```toml
//! language = "fr"
//! domain = "wikipedia.org"
//! error_timeout_secs = 6
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::language::{Language, DEFAULT_LANGUAGE};

const CONFIG_DIR: &str = "wikiscroll";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/8/80/Wikipedia-logo-v2.svg/1200px-Wikipedia-logo-v2.svg.png";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Language code the feed starts in.
    pub language: String,
    /// Provider domain; requests go to `https://{language}.{domain}`.
    pub domain: String,
    /// Image shown for articles without a lead image.
    pub placeholder_image: String,
    /// Sent with every request, as Wikimedia's API etiquette asks.
    pub user_agent: String,
    /// Seconds before an error notification hides itself.
    pub error_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            domain: "wikipedia.org".to_string(),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            user_agent: concat!(
                "wikiscroll/",
                env!("CARGO_PKG_VERSION"),
                " (terminal random-article reader)"
            )
            .to_string(),
            error_timeout_secs: 6,
        }
    }
}

impl Settings {
    pub fn error_timeout(&self) -> Duration {
        Duration::from_secs(self.error_timeout_secs)
    }

    /// The configured start language, falling back to the default when the
    /// code is not in the language table.
    pub fn start_language(&self) -> &'static Language {
        match Language::from_code(&self.language) {
            Some(lang) => lang,
            None => {
                warn!(
                    "Unknown language {:?} in settings, using {}",
                    self.language, DEFAULT_LANGUAGE
                );
                &crate::language::LANGUAGES[0]
            }
        }
    }
}

/// Default location of the config file, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

/// Load settings from `path`, or from [`default_config_path`] when `None`.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let config_path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(p) => p,
        None => return Settings::default(),
    };

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let settings = load_settings(Some(temp.path().join("nope.toml").as_path()));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "language = \"fr\"\nerror_timeout_secs = 10\n").unwrap();

        let settings = load_settings(Some(path.as_path()));
        assert_eq!(settings.language, "fr");
        assert_eq!(settings.error_timeout(), Duration::from_secs(10));
        assert_eq!(settings.domain, "wikipedia.org");
        assert_eq!(settings.placeholder_image, DEFAULT_PLACEHOLDER_IMAGE);
    }

    #[test]
    fn invalid_toml_falls_back_to_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "language = [unterminated").unwrap();

        assert_eq!(load_settings(Some(path.as_path())), Settings::default());
    }

    #[test]
    fn unknown_language_falls_back_to_default() {
        let settings = Settings {
            language: "klingon".into(),
            ..Settings::default()
        };
        assert_eq!(settings.start_language().code, DEFAULT_LANGUAGE);
    }

    #[test]
    fn known_language_is_used() {
        let settings = Settings {
            language: "ja".into(),
            ..Settings::default()
        };
        assert_eq!(settings.start_language().code, "ja");
    }
}
