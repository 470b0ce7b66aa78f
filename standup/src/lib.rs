//! # Standup
//!
//! Plays a random track from a list as a stand-up break: mutes the desktop
//! player, switches tracks, waits for the new track to load, seeks to its
//! starting point and ramps the volume in and out around the break.
//!
//! **Architecture:** [`orchestrator::TransitionOrchestrator`] drives a
//! [`player::PlayerClient`] using [`poller::ConditionPoller`] for bounded
//! waits and [`fader::VolumeFader`] for volume ramps.

pub mod config;
pub mod error;
pub mod fader;
pub mod notify;
pub mod orchestrator;
pub mod player;
pub mod poller;
pub mod tracks;

pub use config::RunConfig;
pub use error::{Error, Result};
pub use orchestrator::{run_transition, Stage, TransitionOrchestrator};
pub use tracks::TrackDescriptor;
