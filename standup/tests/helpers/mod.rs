//! Test helper modules for standup integration tests
//!
//! Provides reusable test infrastructure components:
//! - RecordingPlayer: PlayerClient that logs commands with virtual timestamps
//! - RecordingNotifier: Notifier that keeps every notification it was sent

#![allow(dead_code)]

pub mod mock_notifier;
pub mod mock_player;

// Re-export commonly used types
pub use mock_notifier::RecordingNotifier;
pub use mock_player::{Call, RecordedCall, RecordingPlayer, Startup, TrackLoad, PREVIOUS_TRACK};

use standup::RunConfig;
use std::time::Duration;

/// Track URI used throughout the scenarios
pub const TRACK_URI: &str = "spotify:track:3AhXZa8sUQht0UEdBJgpGc";

/// Run config with notifications off and short poll intervals
pub fn run_config(duration: f64, volume: Option<u8>, fade_in: Option<f64>, fade_out: Option<f64>) -> RunConfig {
    RunConfig {
        total_duration_seconds: duration,
        target_volume: volume,
        fade_in_seconds: fade_in,
        fade_out_seconds: fade_out,
        open_timeout_seconds: 10.0,
        load_timeout_seconds: 5.0,
        open_poll_interval: Duration::from_millis(500),
        load_poll_interval: Duration::from_millis(100),
        notification: None,
        ..RunConfig::default()
    }
}

/// Assert `actual` is within 1ms of `expected`
pub fn assert_at(actual: Option<Duration>, expected: Duration) {
    let actual = actual.expect("call was not recorded");
    let diff = if actual > expected {
        actual - expected
    } else {
        expected - actual
    };
    assert!(
        diff <= Duration::from_millis(1),
        "expected call at {:?}, was at {:?}",
        expected,
        actual
    );
}
