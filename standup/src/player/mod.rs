//! Player control surface
//!
//! [`PlayerClient`] is the narrow capability interface the orchestrator drives
//! the media application through: imperative commands plus read-only queries.
//! [`SpotifyClient`] implements it with AppleScript.

pub mod osascript;
mod spotify;

pub use osascript::Osascript;
pub use spotify::SpotifyClient;

use crate::Result;
use async_trait::async_trait;

/// Read-only snapshot of the player, never cached beyond a single check
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// Identifier of the current track (e.g. `spotify:track:...`)
    pub track_id: String,

    /// Sound volume, 0-100
    pub volume: u8,

    pub is_playing: bool,
}

/// Descriptive metadata for the current track
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackInfo {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub duration_ms: u64,
}

/// Control and query interface over the media application
///
/// Command methods (`open`, `play_track`, `jump_to`, `play`, `pause`,
/// `set_volume`, `mute_volume`, `unmute_volume`, `set_shuffling`) report
/// failures as [`crate::Error::Command`]. Query methods report
/// [`crate::Error::Query`] or [`crate::Error::UnexpectedResponse`].
#[async_trait]
pub trait PlayerClient: Send + Sync {
    /// Whether the application process is running
    async fn is_running(&self) -> Result<bool>;

    /// Launch the application (returns once the launch was requested)
    async fn open(&self) -> Result<()>;

    /// Current track id, volume and play state
    async fn state(&self) -> Result<PlayerState>;

    /// Metadata of the current track
    async fn track(&self) -> Result<TrackInfo>;

    /// Start playing the track identified by `uri`
    async fn play_track(&self, uri: &str) -> Result<()>;

    /// Seek within the current track
    async fn jump_to(&self, offset_seconds: f64) -> Result<()>;

    async fn play(&self) -> Result<()>;

    async fn pause(&self) -> Result<()>;

    /// Set sound volume (0-100)
    async fn set_volume(&self, percent: u8) -> Result<()>;

    /// Silence output, remembering the volume for [`Self::unmute_volume`]
    async fn mute_volume(&self) -> Result<()>;

    async fn unmute_volume(&self) -> Result<()>;

    async fn is_shuffling(&self) -> Result<bool>;

    async fn set_shuffling(&self, enabled: bool) -> Result<()>;
}
