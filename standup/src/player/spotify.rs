//! Spotify desktop client driven through AppleScript
//!
//! Every operation is one `osascript` invocation. The application name is
//! configurable so the same client works with renamed or beta builds.

use super::osascript::{quote, Osascript};
use super::{PlayerClient, PlayerState, TrackInfo};
use crate::{Error, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, trace};

/// Volume restored by `unmute_volume` when nothing was muted first
const FULL_VOLUME: u8 = 100;

/// AppleScript-backed [`PlayerClient`] for the Spotify desktop app
pub struct SpotifyClient {
    application: String,
    script: Osascript,
    /// Volume captured by the last `mute_volume`
    muted_volume: Mutex<Option<u8>>,
}

impl SpotifyClient {
    pub fn new(application: impl Into<String>) -> Self {
        Self::with_runner(application, Osascript::new())
    }

    pub fn with_runner(application: impl Into<String>, script: Osascript) -> Self {
        Self {
            application: application.into(),
            script,
            muted_volume: Mutex::new(None),
        }
    }

    fn tell(&self, body: &str) -> String {
        format!("tell application {} to {}", quote(&self.application), body)
    }

    async fn command(&self, command: &'static str, body: &str) -> Result<()> {
        self.script
            .run(&self.tell(body))
            .await
            .map(|_| ())
            .map_err(|message| Error::Command { command, message })
    }

    async fn query(&self, query: &'static str, script: &str) -> Result<String> {
        self.script
            .run(script)
            .await
            .map_err(|message| Error::Query { query, message })
    }

    async fn sound_volume(&self) -> Result<u8> {
        let response = self.query("sound volume", &self.tell("sound volume")).await?;
        parse_volume("sound volume", &response)
    }
}

#[async_trait]
impl PlayerClient for SpotifyClient {
    async fn is_running(&self) -> Result<bool> {
        let script = format!("application {} is running", quote(&self.application));
        let response = self.query("is running", &script).await?;
        parse_bool("is running", &response)
    }

    async fn open(&self) -> Result<()> {
        debug!(application = %self.application, "Launching player");
        let output = Command::new("open")
            .arg("-a")
            .arg(&self.application)
            .output()
            .await
            .map_err(|e| Error::Command {
                command: "open",
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::Command {
                command: "open",
                message: format!(
                    "{} ({})",
                    String::from_utf8_lossy(&output.stderr).trim(),
                    output.status
                ),
            });
        }
        Ok(())
    }

    async fn state(&self) -> Result<PlayerState> {
        let body = "(id of current track as string) & \"|\" & \
                    (sound volume as string) & \"|\" & (player state as string)";
        let response = self.query("state", &self.tell(body)).await?;
        parse_state(&response)
    }

    async fn track(&self) -> Result<TrackInfo> {
        let script = format!(
            "tell application {}\n\
             set t to current track\n\
             return (id of t) & linefeed & (name of t) & linefeed & (artist of t) \
             & linefeed & (album of t) & linefeed & (duration of t as string)\n\
             end tell",
            quote(&self.application)
        );
        let response = self.query("track", &script).await?;
        parse_track(&response)
    }

    async fn play_track(&self, uri: &str) -> Result<()> {
        self.command("play track", &format!("play track {}", quote(uri)))
            .await
    }

    async fn jump_to(&self, offset_seconds: f64) -> Result<()> {
        self.command(
            "jump to",
            &format!("set player position to {}", offset_seconds.max(0.0)),
        )
        .await
    }

    async fn play(&self) -> Result<()> {
        self.command("play", "play").await
    }

    async fn pause(&self) -> Result<()> {
        self.command("pause", "pause").await
    }

    async fn set_volume(&self, percent: u8) -> Result<()> {
        let percent = percent.min(FULL_VOLUME);
        self.command("set volume", &format!("set sound volume to {}", percent))
            .await
    }

    async fn mute_volume(&self) -> Result<()> {
        let current = self.sound_volume().await.map_err(|e| Error::Command {
            command: "mute volume",
            message: e.to_string(),
        })?;

        let mut muted = self.muted_volume.lock().await;
        // A second mute must not overwrite the level to restore with 0
        if current > 0 || muted.is_none() {
            *muted = Some(current);
        }
        trace!(restore_to = ?*muted, "Muting");
        drop(muted);

        self.command("mute volume", "set sound volume to 0").await
    }

    async fn unmute_volume(&self) -> Result<()> {
        let restore = self.muted_volume.lock().await.take().unwrap_or(FULL_VOLUME);
        self.command(
            "unmute volume",
            &format!("set sound volume to {}", restore),
        )
        .await
    }

    async fn is_shuffling(&self) -> Result<bool> {
        let response = self.query("shuffling", &self.tell("shuffling")).await?;
        parse_bool("shuffling", &response)
    }

    async fn set_shuffling(&self, enabled: bool) -> Result<()> {
        self.command("set shuffling", &format!("set shuffling to {}", enabled))
            .await
    }
}

fn unexpected(query: &'static str, response: &str) -> Error {
    Error::UnexpectedResponse {
        query,
        response: response.to_string(),
    }
}

fn parse_bool(query: &'static str, response: &str) -> Result<bool> {
    match response.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(unexpected(query, other)),
    }
}

fn parse_volume(query: &'static str, response: &str) -> Result<u8> {
    let value: f64 = response
        .trim()
        .parse()
        .map_err(|_| unexpected(query, response))?;
    if !(0.0..=100.0).contains(&value) {
        return Err(unexpected(query, response));
    }
    Ok(value.round() as u8)
}

/// Parse `id|volume|player state`
fn parse_state(response: &str) -> Result<PlayerState> {
    let mut parts = response.trim().splitn(3, '|');
    let (Some(track_id), Some(volume), Some(state)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(unexpected("state", response));
    };

    Ok(PlayerState {
        track_id: track_id.to_string(),
        volume: parse_volume("state", volume)?,
        is_playing: state.trim() == "playing",
    })
}

/// Parse line-separated `id, name, artist, album, duration`
fn parse_track(response: &str) -> Result<TrackInfo> {
    let lines: Vec<&str> = response.lines().collect();
    let [id, name, artist, album, duration] = lines.as_slice() else {
        return Err(unexpected("track", response));
    };

    Ok(TrackInfo {
        id: id.trim().to_string(),
        name: name.trim().to_string(),
        artist: artist.trim().to_string(),
        album: album.trim().to_string(),
        duration_ms: duration
            .trim()
            .parse::<f64>()
            .map(|d| d.max(0.0) as u64)
            .map_err(|_| unexpected("track", response))?,
    })
}
