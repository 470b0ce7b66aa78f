//! Configuration file loading and compiled defaults
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments (highest priority, handled by the binary)
//! 2. Environment variables
//! 3. TOML config file
//! 4. Compiled defaults (fallback)
//!
//! A missing config file at the default location is not an error: defaults
//! are used and startup continues. A file named explicitly (CLI or
//! `STANDUP_CONFIG`) must exist.

use crate::{Error, FadeCurve, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "STANDUP_CONFIG";

/// Compiled default values
pub mod defaults {
    pub const TRACKS_FILE: &str = "songs.csv";
    pub const PLAYER_APPLICATION: &str = "Spotify";
    pub const OPEN_TIMEOUT_SECS: f64 = 10.0;
    pub const LOAD_TIMEOUT_SECS: f64 = 5.0;
    pub const OPEN_POLL_INTERVAL_MS: u64 = 500;
    pub const LOAD_POLL_INTERVAL_MS: u64 = 100;
    pub const FADE_SECS: f64 = 3.0;
    pub const NOTIFICATION_TITLE: &str = "Stand up!";
    pub const NOTIFICATION_ICON_URL: &str = "https://secure.static.tumblr.com/325cf030a255dd186faa6aec64f555d2/k3htaqs/Dxynz1uj7/tumblr_static_spotify-logo_128.png";
    pub const LOG_LEVEL: &str = "info";
}

/// Settings loaded from the TOML config file
///
/// Every field is optional in the file; missing values fall back to
/// [`defaults`].
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    /// CSV track list (relative paths resolve against the working directory)
    pub tracks_file: Option<PathBuf>,

    pub player: PlayerConfig,

    pub fade: FadeConfig,

    pub notification: NotificationConfig,

    pub logging: LoggingConfig,
}

/// Player application and polling settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Application name used for scripting and launching
    pub application: String,

    /// How long to wait for a launched player to report running
    pub open_timeout_secs: f64,

    /// How long to wait for a requested track to become current
    pub load_timeout_secs: f64,

    pub open_poll_interval_ms: u64,

    pub load_poll_interval_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            application: defaults::PLAYER_APPLICATION.to_string(),
            open_timeout_secs: defaults::OPEN_TIMEOUT_SECS,
            load_timeout_secs: defaults::LOAD_TIMEOUT_SECS,
            open_poll_interval_ms: defaults::OPEN_POLL_INTERVAL_MS,
            load_poll_interval_ms: defaults::LOAD_POLL_INTERVAL_MS,
        }
    }
}

/// Fade settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FadeConfig {
    /// Fade length used when `--fade-in`/`--fade-out` is given without a value
    pub default_secs: f64,

    pub curve: FadeCurve,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            default_secs: defaults::FADE_SECS,
            curve: FadeCurve::default(),
        }
    }
}

/// Desktop notification settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub title: String,
    pub icon_url: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: defaults::NOTIFICATION_TITLE.to_string(),
            icon_url: Some(defaults::NOTIFICATION_ICON_URL.to_string()),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
        }
    }
}

impl TomlConfig {
    /// Parse a config file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::TomlParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load configuration following the resolution order above
    ///
    /// `cli_path` wins over `STANDUP_CONFIG`; both must name an existing file.
    /// Without either, the platform config directory is tried and a missing
    /// file yields compiled defaults.
    pub fn load_or_default(cli_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_config_path(cli_path) {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!("Loading config from {}", path.display());
            return Self::load(&path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            Some(path) => {
                info!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                info!("Could not determine config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Track list path, falling back to the compiled default
    pub fn tracks_file(&self) -> PathBuf {
        self.tracks_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::TRACKS_FILE))
    }
}

fn explicit_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }
    std::env::var_os(CONFIG_ENV_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Platform config file location (`<config_dir>/standup/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("standup").join("config.toml"))
}
