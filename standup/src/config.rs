//! Run configuration
//!
//! [`Args`] holds the command line; [`RunConfig`] is the validated, merged
//! view the orchestrator consumes. Priority: CLI flags and their `STANDUP_*`
//! environment variables, then the TOML file, then compiled defaults.

use crate::{Error, Result};
use clap::Parser;
use standup_common::config::TomlConfig;
use standup_common::FadeCurve;
use std::path::PathBuf;
use std::time::Duration;

/// Default break length in seconds
pub const DEFAULT_DURATION_SECS: f64 = 10.0;

/// Level a fade ramps to when no `--volume` was given
pub const DEFAULT_TARGET_VOLUME: u8 = 100;

/// Command-line arguments for standup
#[derive(Parser, Debug, Clone)]
#[command(name = "standup")]
#[command(about = "Play a random track to mark a stand-up break")]
#[command(version)]
pub struct Args {
    /// Length of the break in seconds, fades included
    #[arg(short, long, default_value_t = DEFAULT_DURATION_SECS, env = "STANDUP_DURATION")]
    pub duration: f64,

    /// Playback volume (0-100); the current volume is kept when omitted
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100), env = "STANDUP_VOLUME")]
    pub volume: Option<u8>,

    /// Fade in over SECS (config default length when given without a value)
    #[arg(long, num_args = 0..=1, value_name = "SECS")]
    pub fade_in: Option<Option<f64>>,

    /// Fade out over SECS (config default length when given without a value)
    #[arg(long, num_args = 0..=1, value_name = "SECS")]
    pub fade_out: Option<Option<f64>>,

    /// Enable trace-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// CSV track list (uri,minutes,seconds)
    #[arg(short, long, env = "STANDUP_TRACKS")]
    pub tracks: Option<PathBuf>,

    /// Config file (defaults to <config dir>/standup/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seconds to wait for a launched player to come up
    #[arg(long, value_name = "SECS")]
    pub open_timeout: Option<f64>,

    /// Seconds to wait for the requested track to load
    #[arg(long, value_name = "SECS")]
    pub load_timeout: Option<f64>,

    /// Force the player's shuffle mode on or off before playing
    #[arg(long, value_name = "BOOL")]
    pub shuffle: Option<bool>,

    /// Skip the desktop notification
    #[arg(long)]
    pub no_notify: bool,

    /// Fade curve (linear, exponential, logarithmic, s-curve, equal-power)
    #[arg(long, value_name = "CURVE")]
    pub fade_curve: Option<FadeCurve>,
}

impl Args {
    /// `tracing` filter directive for the selected verbosity
    pub fn log_filter(&self, toml: &TomlConfig) -> String {
        let level = if self.verbose {
            "trace"
        } else {
            toml.logging.level.as_str()
        };
        format!("standup={level},standup_common={level}")
    }

    /// Track list path (CLI, then config file, then `songs.csv`)
    pub fn tracks_file(&self, toml: &TomlConfig) -> PathBuf {
        self.tracks.clone().unwrap_or_else(|| toml.tracks_file())
    }
}

/// Desktop notification settings for a run
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationSettings {
    pub title: String,
    pub icon_url: Option<String>,
}

/// Everything one transition run needs
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Whole break, fades included
    pub total_duration_seconds: f64,

    /// `None` keeps the player's volume unless a fade needs an endpoint
    pub target_volume: Option<u8>,

    pub fade_in_seconds: Option<f64>,

    pub fade_out_seconds: Option<f64>,

    pub open_timeout_seconds: f64,

    pub load_timeout_seconds: f64,

    pub open_poll_interval: Duration,

    pub load_poll_interval: Duration,

    pub fade_curve: FadeCurve,

    /// Shuffle mode to enforce before switching tracks
    pub shuffle: Option<bool>,

    /// `None` disables the track notification
    pub notification: Option<NotificationSettings>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::from_toml(&TomlConfig::default())
    }
}

impl RunConfig {
    /// Config-file values with no CLI overrides
    pub fn from_toml(toml: &TomlConfig) -> Self {
        Self {
            total_duration_seconds: DEFAULT_DURATION_SECS,
            target_volume: None,
            fade_in_seconds: None,
            fade_out_seconds: None,
            open_timeout_seconds: toml.player.open_timeout_secs,
            load_timeout_seconds: toml.player.load_timeout_secs,
            open_poll_interval: Duration::from_millis(toml.player.open_poll_interval_ms),
            load_poll_interval: Duration::from_millis(toml.player.load_poll_interval_ms),
            fade_curve: toml.fade.curve,
            shuffle: None,
            notification: toml.notification.enabled.then(|| NotificationSettings {
                title: toml.notification.title.clone(),
                icon_url: toml.notification.icon_url.clone(),
            }),
        }
    }

    /// Merge CLI arguments over the config file and validate the result
    pub fn from_sources(args: &Args, toml: &TomlConfig) -> Result<Self> {
        let mut config = Self::from_toml(toml);
        let default_fade = toml.fade.default_secs;

        config.total_duration_seconds = args.duration;
        config.target_volume = args.volume;
        config.fade_in_seconds = args.fade_in.map(|secs| secs.unwrap_or(default_fade));
        config.fade_out_seconds = args.fade_out.map(|secs| secs.unwrap_or(default_fade));
        if let Some(secs) = args.open_timeout {
            config.open_timeout_seconds = secs;
        }
        if let Some(secs) = args.load_timeout {
            config.load_timeout_seconds = secs;
        }
        if let Some(curve) = args.fade_curve {
            config.fade_curve = curve;
        }
        config.shuffle = args.shuffle;
        if args.no_notify {
            config.notification = None;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values no run can use
    ///
    /// Fades longer than the break are allowed; see
    /// [`Self::fade_budget_exceeded`].
    pub fn validate(&self) -> Result<()> {
        check_seconds("duration", Some(self.total_duration_seconds))?;
        check_seconds("fade-in", self.fade_in_seconds)?;
        check_seconds("fade-out", self.fade_out_seconds)?;
        check_seconds("open timeout", Some(self.open_timeout_seconds))?;
        check_seconds("load timeout", Some(self.load_timeout_seconds))?;

        if let Some(volume) = self.target_volume {
            if volume > 100 {
                return Err(Error::Config(format!(
                    "volume must be between 0 and 100, got {}",
                    volume
                )));
            }
        }
        Ok(())
    }

    /// True when the fades alone are longer than the whole break
    pub fn fade_budget_exceeded(&self) -> bool {
        self.fade_in_seconds.unwrap_or(0.0) + self.fade_out_seconds.unwrap_or(0.0)
            > self.total_duration_seconds
    }

    /// Break time left between the fades (negative when over budget)
    pub fn hold_seconds(&self) -> f64 {
        self.total_duration_seconds
            - self.fade_in_seconds.unwrap_or(0.0)
            - self.fade_out_seconds.unwrap_or(0.0)
    }

    /// Hold period as a sleepable duration, zero when not positive
    pub fn hold_duration(&self) -> Duration {
        seconds_to_duration(self.hold_seconds())
    }

    pub fn open_timeout(&self) -> Duration {
        seconds_to_duration(self.open_timeout_seconds)
    }

    pub fn load_timeout(&self) -> Duration {
        seconds_to_duration(self.load_timeout_seconds)
    }

    /// Level the fades ramp to and from
    pub fn fade_target_volume(&self) -> u8 {
        self.target_volume.unwrap_or(DEFAULT_TARGET_VOLUME)
    }
}

fn check_seconds(name: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(secs) if !secs.is_finite() || secs < 0.0 => Err(Error::Config(format!(
            "{} must be a non-negative number of seconds, got {}",
            name, secs
        ))),
        _ => Ok(()),
    }
}

/// Non-positive and non-finite values become zero
pub fn seconds_to_duration(seconds: f64) -> Duration {
    if seconds.is_finite() && seconds > 0.0 {
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}
