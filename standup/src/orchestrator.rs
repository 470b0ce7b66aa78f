//! Playback transition orchestrator
//!
//! Drives one stand-up break through a forward-only sequence of stages:
//!
//! NotStarted → PlayerOpened → Muted → TrackSwitched → TrackLoaded →
//! SeekedAndUnmuted → SteadyState → Holding → Paused → Done
//!
//! # Failure policy
//! - A failed player command aborts the run with [`Error::Aborted`] naming the
//!   stage being entered. Nothing is retried.
//! - Waiting for the player to open or for the track to load is best-effort:
//!   a timeout is logged and the next stage runs anyway.
//! - The track notification runs in a detached task; its outcome is only
//!   logged.

use crate::config::RunConfig;
use crate::fader::{FadeSpec, VolumeFader};
use crate::notify::{Notification, Notifier};
use crate::player::PlayerClient;
use crate::poller::{ConditionPoller, PollOutcome};
use crate::tracks::TrackDescriptor;
use crate::{Error, Result};
use standup_common::human_time::{format_seconds, format_seconds_opt};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Stages of a transition run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NotStarted,
    PlayerOpened,
    Muted,
    TrackSwitched,
    TrackLoaded,
    SeekedAndUnmuted,
    SteadyState,
    Holding,
    Paused,
    Done,
}

impl Stage {
    /// Stages entered by a run, after `NotStarted`
    pub const SEQUENCE: [Stage; 9] = [
        Stage::PlayerOpened,
        Stage::Muted,
        Stage::TrackSwitched,
        Stage::TrackLoaded,
        Stage::SeekedAndUnmuted,
        Stage::SteadyState,
        Stage::Holding,
        Stage::Paused,
        Stage::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::NotStarted => "not-started",
            Stage::PlayerOpened => "player-opened",
            Stage::Muted => "muted",
            Stage::TrackSwitched => "track-switched",
            Stage::TrackLoaded => "track-loaded",
            Stage::SeekedAndUnmuted => "seeked-and-unmuted",
            Stage::SteadyState => "steady-state",
            Stage::Holding => "holding",
            Stage::Paused => "paused",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sequences one transition run against a [`PlayerClient`]
///
/// Assumes exclusive control of the player for the whole run.
pub struct TransitionOrchestrator<P: PlayerClient + ?Sized + 'static> {
    player: Arc<P>,
    config: RunConfig,
    fader: VolumeFader,
    notifier: Option<Arc<dyn Notifier>>,
}

impl<P: PlayerClient + ?Sized + 'static> TransitionOrchestrator<P> {
    pub fn new(player: Arc<P>, config: RunConfig) -> Self {
        let fader = VolumeFader::new(config.fade_curve);
        Self {
            player,
            config,
            fader,
            notifier: None,
        }
    }

    /// Show a track notification once playback starts
    ///
    /// Only used when the run config has notification settings.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Replace the fader (e.g. a different step rate)
    pub fn with_fader(mut self, fader: VolumeFader) -> Self {
        self.fader = fader;
        self
    }

    /// Execute every stage for `track`
    pub async fn run(self, track: &TrackDescriptor) -> Result<()> {
        info!(
            uri = %track.uri,
            start = %format_seconds(track.starting_point_seconds),
            duration = %format_seconds(self.config.total_duration_seconds),
            fade_in = %format_seconds_opt(self.config.fade_in_seconds),
            fade_out = %format_seconds_opt(self.config.fade_out_seconds),
            "Starting transition"
        );

        if self.config.fade_budget_exceeded() {
            warn!(
                "Fades ({} in, {} out) exceed the break duration ({}); there will be no hold",
                format_seconds_opt(self.config.fade_in_seconds),
                format_seconds_opt(self.config.fade_out_seconds),
                format_seconds(self.config.total_duration_seconds)
            );
        }

        for stage in Stage::SEQUENCE {
            self.enter(stage, track)
                .await
                .map_err(|source| Error::Aborted {
                    stage,
                    source: Box::new(source),
                })?;
            debug!(stage = %stage, "Entered stage");
        }
        Ok(())
    }

    async fn enter(&self, stage: Stage, track: &TrackDescriptor) -> Result<()> {
        match stage {
            Stage::NotStarted => Ok(()),
            Stage::PlayerOpened => self.open_player().await,
            Stage::Muted => {
                // Mute before switching so the old track cannot blare
                self.player.pause().await?;
                self.player.mute_volume().await
            }
            Stage::TrackSwitched => self.player.play_track(&track.uri).await,
            Stage::TrackLoaded => {
                self.wait_for_track(&track.uri).await;
                Ok(())
            }
            Stage::SeekedAndUnmuted => {
                self.player.jump_to(track.starting_point_seconds).await?;
                self.player.unmute_volume().await
            }
            Stage::SteadyState => self.start_playback().await,
            Stage::Holding => {
                let hold = self.config.hold_duration();
                debug!("Holding for {}", format_seconds(hold.as_secs_f64()));
                tokio::time::sleep(hold).await;
                Ok(())
            }
            Stage::Paused => self.stop_playback().await,
            Stage::Done => {
                info!("Transition complete");
                Ok(())
            }
        }
    }

    async fn open_player(&self) -> Result<()> {
        let player: &P = &self.player;

        let running = player.is_running().await.unwrap_or_else(|e| {
            trace!(error = %e, "Could not query player, assuming it is closed");
            false
        });

        if !running {
            info!("Opening player");
            player.open().await?;

            let poller = ConditionPoller::new(
                self.config.open_poll_interval,
                Some(self.config.open_timeout()),
            );
            match poller.wait_for(|| player.is_running()).await {
                PollOutcome::Satisfied { attempts, elapsed } => debug!(
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Player is running"
                ),
                PollOutcome::TimedOut { elapsed, .. } => warn!(
                    "Player not running after {}, continuing anyway",
                    format_seconds(elapsed.as_secs_f64())
                ),
            }
        }

        if let Some(shuffle) = self.config.shuffle {
            self.ensure_shuffle(shuffle).await?;
        }
        Ok(())
    }

    async fn ensure_shuffle(&self, wanted: bool) -> Result<()> {
        match self.player.is_shuffling().await {
            Ok(current) if current == wanted => {
                trace!(shuffle = wanted, "Shuffle already set");
                Ok(())
            }
            Ok(_) => self.player.set_shuffling(wanted).await,
            Err(e) => {
                warn!(error = %e, "Could not read shuffle state, setting it anyway");
                self.player.set_shuffling(wanted).await
            }
        }
    }

    /// Wait until the requested track is current so the seek lands in it
    async fn wait_for_track(&self, uri: &str) {
        let player: &P = &self.player;
        let poller = ConditionPoller::new(
            self.config.load_poll_interval,
            Some(self.config.load_timeout()),
        );

        let outcome = poller
            .wait_for(|| async move { player.state().await.map(|state| state.track_id == uri) })
            .await;

        match outcome {
            PollOutcome::Satisfied { attempts, elapsed } => debug!(
                uri,
                attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                "Track loaded"
            ),
            PollOutcome::TimedOut { elapsed, .. } => warn!(
                uri,
                "Track not reported as current after {}, seeking anyway",
                format_seconds(elapsed.as_secs_f64())
            ),
        }
    }

    async fn start_playback(&self) -> Result<()> {
        match self.config.fade_in_seconds {
            Some(fade_in) => {
                let target = self.config.fade_target_volume();
                // Fixed starting point regardless of what unmuting restored
                self.player.set_volume(0).await?;
                self.player.play().await?;
                self.spawn_track_notification();
                self.fader
                    .fade(self.player.as_ref(), &FadeSpec::new(0, target, fade_in))
                    .await
            }
            None => {
                if let Some(volume) = self.config.target_volume {
                    self.player.set_volume(volume).await?;
                }
                self.player.play().await?;
                self.spawn_track_notification();
                Ok(())
            }
        }
    }

    async fn stop_playback(&self) -> Result<()> {
        if let Some(fade_out) = self.config.fade_out_seconds {
            let from = self.fade_out_start_volume().await;
            self.fader
                .fade(self.player.as_ref(), &FadeSpec::new(from, 0, fade_out))
                .await?;
        }
        self.player.pause().await
    }

    /// Level the fade-out starts from
    ///
    /// The configured target when a volume was set or faded to, otherwise
    /// whatever the player currently reports.
    async fn fade_out_start_volume(&self) -> u8 {
        if self.config.target_volume.is_some() || self.config.fade_in_seconds.is_some() {
            return self.config.fade_target_volume();
        }
        match self.player.state().await {
            Ok(state) => state.volume,
            Err(e) => {
                let fallback = self.config.fade_target_volume();
                warn!(error = %e, fallback, "Could not read volume before fade-out");
                fallback
            }
        }
    }

    /// Fire-and-forget: the task is detached and reports only through logs
    fn spawn_track_notification(&self) {
        let (Some(notifier), Some(settings)) =
            (self.notifier.clone(), self.config.notification.clone())
        else {
            return;
        };
        let player = Arc::clone(&self.player);

        tokio::spawn(async move {
            let result = match player.track().await {
                Ok(track) => {
                    let notification =
                        Notification::for_track(settings.title, &track, settings.icon_url);
                    debug!(message = %notification.message, "Sending track notification");
                    notifier.notify(&notification).await
                }
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                warn!(error = %e, "Track notification failed");
            }
        });
    }
}

/// Run one complete transition for `track`
pub async fn run_transition<P>(
    player: Arc<P>,
    config: RunConfig,
    track: &TrackDescriptor,
    notifier: Option<Arc<dyn Notifier>>,
) -> Result<()>
where
    P: PlayerClient + ?Sized + 'static,
{
    let mut orchestrator = TransitionOrchestrator::new(player, config);
    if let Some(notifier) = notifier {
        orchestrator = orchestrator.with_notifier(notifier);
    }
    orchestrator.run(track).await
}
