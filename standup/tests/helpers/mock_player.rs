//! Recording PlayerClient for orchestration tests
//!
//! Every command is logged with the (virtual) time it was issued, so tests can
//! assert both the order of calls and the sleeps between them. Queries are
//! counted but not logged as calls.

use async_trait::async_trait;
use standup::player::{PlayerClient, PlayerState, TrackInfo};
use standup::{Error, Result};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Track the player reports before any `play_track`
pub const PREVIOUS_TRACK: &str = "spotify:track:previous";

/// One imperative command sent to the player
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open,
    PlayTrack(String),
    JumpTo(f64),
    Play,
    Pause,
    SetVolume(u8),
    MuteVolume,
    UnmuteVolume,
    SetShuffling(bool),
}

impl Call {
    fn name(&self) -> &'static str {
        match self {
            Call::Open => "open",
            Call::PlayTrack(_) => "play track",
            Call::JumpTo(_) => "jump to",
            Call::Play => "play",
            Call::Pause => "pause",
            Call::SetVolume(_) => "set volume",
            Call::MuteVolume => "mute volume",
            Call::UnmuteVolume => "unmute volume",
            Call::SetShuffling(_) => "set shuffling",
        }
    }
}

/// A command with the time since the mock was created
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub call: Call,
    pub at: Duration,
}

/// When the requested track shows up in `state()`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackLoad {
    /// On the first state query after `play_track`
    Immediate,
    /// After this many state queries reported the old track
    AfterPolls(u32),
    /// Never; the previous track stays current
    Never,
}

/// Whether `is_running` ever reports true
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Startup {
    AlreadyRunning,
    /// Closed until this many `is_running` calls after `open` returned false
    OpensAfterPolls(u32),
    NeverOpens,
}

#[derive(Debug)]
struct Inner {
    calls: Vec<RecordedCall>,
    running: bool,
    opened: bool,
    is_running_after_open: u32,
    track_id: String,
    requested_track: Option<String>,
    state_polls_since_switch: u32,
    volume: u8,
    muted_volume: Option<u8>,
    playing: bool,
    shuffling: bool,
    set_volume_calls: usize,
    state_queries: u32,
    track_queries: u32,
}

pub struct RecordingPlayer {
    started: Instant,
    inner: Mutex<Inner>,
    startup: Startup,
    load: TrackLoad,
    fail_command: Option<&'static str>,
    fail_set_volume_after: Option<usize>,
    state_errors: bool,
}

impl Default for RecordingPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingPlayer {
    /// Running player, tracks load immediately, volume 30
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            inner: Mutex::new(Inner {
                calls: Vec::new(),
                running: true,
                opened: false,
                is_running_after_open: 0,
                track_id: PREVIOUS_TRACK.to_string(),
                requested_track: None,
                state_polls_since_switch: 0,
                volume: 30,
                muted_volume: None,
                playing: true,
                shuffling: false,
                set_volume_calls: 0,
                state_queries: 0,
                track_queries: 0,
            }),
            startup: Startup::AlreadyRunning,
            load: TrackLoad::Immediate,
            fail_command: None,
            fail_set_volume_after: None,
            state_errors: false,
        }
    }

    pub fn with_startup(mut self, startup: Startup) -> Self {
        self.startup = startup;
        self.inner.get_mut().unwrap().running = startup == Startup::AlreadyRunning;
        self
    }

    pub fn with_track_load(mut self, load: TrackLoad) -> Self {
        self.load = load;
        self
    }

    pub fn with_volume(mut self, volume: u8) -> Self {
        self.inner.get_mut().unwrap().volume = volume;
        self
    }

    pub fn with_shuffling(mut self, shuffling: bool) -> Self {
        self.inner.get_mut().unwrap().shuffling = shuffling;
        self
    }

    /// Fail every command with this name (see [`Call`] names)
    pub fn failing_on(mut self, command: &'static str) -> Self {
        self.fail_command = Some(command);
        self
    }

    /// Let `count` volume sets succeed, then fail
    pub fn failing_set_volume_after(mut self, count: usize) -> Self {
        self.fail_set_volume_after = Some(count);
        self
    }

    /// Every `state()` query fails
    pub fn with_state_errors(mut self) -> Self {
        self.state_errors = true;
        self
    }

    /// Recorded commands with timestamps
    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Recorded commands without timestamps
    pub fn calls(&self) -> Vec<Call> {
        self.recorded().into_iter().map(|r| r.call).collect()
    }

    /// Volumes passed to `set_volume`, in order
    pub fn volumes(&self) -> Vec<u8> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetVolume(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    /// Time of the first recorded call matching `call`
    pub fn time_of(&self, call: &Call) -> Option<Duration> {
        self.recorded()
            .into_iter()
            .find(|r| &r.call == call)
            .map(|r| r.at)
    }

    /// Time of the last recorded call
    pub fn last_call_at(&self) -> Option<Duration> {
        self.recorded().last().map(|r| r.at)
    }

    pub fn state_queries(&self) -> u32 {
        self.inner.lock().unwrap().state_queries
    }

    pub fn track_queries(&self) -> u32 {
        self.inner.lock().unwrap().track_queries
    }

    pub fn current_volume(&self) -> u8 {
        self.inner.lock().unwrap().volume
    }

    pub fn is_playing(&self) -> bool {
        self.inner.lock().unwrap().playing
    }

    fn record(&self, call: Call) -> Result<std::sync::MutexGuard<'_, Inner>> {
        let name = call.name();
        let mut inner = self.inner.lock().unwrap();

        if self.fail_command == Some(name) {
            return Err(Error::Command {
                command: name,
                message: "injected failure".to_string(),
            });
        }
        if let (Call::SetVolume(_), Some(limit)) = (&call, self.fail_set_volume_after) {
            if inner.set_volume_calls >= limit {
                return Err(Error::Command {
                    command: name,
                    message: "injected volume failure".to_string(),
                });
            }
        }
        if matches!(call, Call::SetVolume(_)) {
            inner.set_volume_calls += 1;
        }

        inner.calls.push(RecordedCall {
            call,
            at: self.started.elapsed(),
        });
        Ok(inner)
    }
}

#[async_trait]
impl PlayerClient for RecordingPlayer {
    async fn is_running(&self) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        if inner.running {
            return Ok(true);
        }
        if inner.opened {
            inner.is_running_after_open += 1;
            if let Startup::OpensAfterPolls(n) = self.startup {
                if inner.is_running_after_open >= n {
                    inner.running = true;
                }
            }
        }
        Ok(inner.running)
    }

    async fn open(&self) -> Result<()> {
        let mut inner = self.record(Call::Open)?;
        inner.opened = true;
        Ok(())
    }

    async fn state(&self) -> Result<PlayerState> {
        let mut inner = self.inner.lock().unwrap();
        inner.state_queries += 1;
        if self.state_errors {
            return Err(Error::Query {
                query: "state",
                message: "injected query failure".to_string(),
            });
        }

        if let Some(requested) = inner.requested_track.clone() {
            let loaded = match self.load {
                TrackLoad::Immediate => true,
                TrackLoad::AfterPolls(n) => inner.state_polls_since_switch >= n,
                TrackLoad::Never => false,
            };
            inner.state_polls_since_switch += 1;
            if loaded {
                inner.track_id = requested;
                inner.requested_track = None;
            }
        }

        Ok(PlayerState {
            track_id: inner.track_id.clone(),
            volume: inner.volume,
            is_playing: inner.playing,
        })
    }

    async fn track(&self) -> Result<TrackInfo> {
        let mut inner = self.inner.lock().unwrap();
        inner.track_queries += 1;
        Ok(TrackInfo {
            id: inner.track_id.clone(),
            name: "Test Song".to_string(),
            artist: "Test Artist".to_string(),
            album: "Test Album".to_string(),
            duration_ms: 240_000,
        })
    }

    async fn play_track(&self, uri: &str) -> Result<()> {
        let mut inner = self.record(Call::PlayTrack(uri.to_string()))?;
        inner.requested_track = Some(uri.to_string());
        inner.state_polls_since_switch = 0;
        inner.playing = true;
        Ok(())
    }

    async fn jump_to(&self, offset_seconds: f64) -> Result<()> {
        self.record(Call::JumpTo(offset_seconds)).map(|_| ())
    }

    async fn play(&self) -> Result<()> {
        self.record(Call::Play)?.playing = true;
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.record(Call::Pause)?.playing = false;
        Ok(())
    }

    async fn set_volume(&self, percent: u8) -> Result<()> {
        self.record(Call::SetVolume(percent))?.volume = percent;
        Ok(())
    }

    async fn mute_volume(&self) -> Result<()> {
        let mut inner = self.record(Call::MuteVolume)?;
        inner.muted_volume = Some(inner.volume);
        inner.volume = 0;
        Ok(())
    }

    async fn unmute_volume(&self) -> Result<()> {
        let mut inner = self.record(Call::UnmuteVolume)?;
        inner.volume = inner.muted_volume.take().unwrap_or(100);
        Ok(())
    }

    async fn is_shuffling(&self) -> Result<bool> {
        Ok(self.inner.lock().unwrap().shuffling)
    }

    async fn set_shuffling(&self, enabled: bool) -> Result<()> {
        self.record(Call::SetShuffling(enabled))?.shuffling = enabled;
        Ok(())
    }
}
