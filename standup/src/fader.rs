//! Timed volume ramps
//!
//! A fade of `d` seconds at `r` steps per second issues `d × r + 1` volume
//! sets: step `i` applies `from + curve(i / total) × (to - from)`, with a
//! `1/r` second pause between sets. Volumes are computed from the step index
//! and the last step applies `to` itself, so the ramp always ends exactly on
//! the requested level.

use crate::player::PlayerClient;
use crate::Result;
use standup_common::human_time::format_seconds;
use standup_common::FadeCurve;
use std::time::Duration;
use tracing::{debug, trace};

/// Default sampling rate of a fade
pub const STEPS_PER_SECOND: u32 = 10;

const MAX_VOLUME: f64 = 100.0;

/// One volume ramp request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeSpec {
    pub duration_seconds: f64,
    pub from_volume: u8,
    pub to_volume: u8,
}

impl FadeSpec {
    pub fn new(from_volume: u8, to_volume: u8, duration_seconds: f64) -> Self {
        Self {
            duration_seconds,
            from_volume,
            to_volume,
        }
    }

    /// Number of intervals in the ramp (0 for empty or invalid durations)
    pub fn total_steps(&self, steps_per_second: u32) -> u32 {
        let steps = self.duration_seconds * f64::from(steps_per_second);
        if steps.is_finite() && steps > 0.0 {
            steps.round().min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }
}

/// Drives a [`PlayerClient`]'s volume along a [`FadeCurve`]
#[derive(Debug, Clone, Copy)]
pub struct VolumeFader {
    steps_per_second: u32,
    curve: FadeCurve,
}

impl Default for VolumeFader {
    fn default() -> Self {
        Self::new(FadeCurve::Linear)
    }
}

impl VolumeFader {
    pub fn new(curve: FadeCurve) -> Self {
        Self::with_rate(STEPS_PER_SECOND, curve)
    }

    pub fn with_rate(steps_per_second: u32, curve: FadeCurve) -> Self {
        Self {
            steps_per_second: steps_per_second.max(1),
            curve,
        }
    }

    pub fn curve(&self) -> FadeCurve {
        self.curve
    }

    /// Pause between two volume sets
    pub fn step_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.steps_per_second))
    }

    /// Volume applied at `step` of a `total`-step ramp
    pub fn volume_at(&self, spec: &FadeSpec, step: u32, total: u32) -> u8 {
        if step >= total {
            return spec.to_volume;
        }
        let progress = f64::from(step) / f64::from(total);
        let level = self.curve.interpolate(
            f64::from(spec.from_volume),
            f64::from(spec.to_volume),
            progress,
        );
        level.round().clamp(0.0, MAX_VOLUME) as u8
    }

    /// Full sequence of volumes [`Self::fade`] will apply
    pub fn plan(&self, spec: &FadeSpec) -> Vec<u8> {
        let total = spec.total_steps(self.steps_per_second);
        (0..=total).map(|i| self.volume_at(spec, i, total)).collect()
    }

    /// Run the ramp to completion
    ///
    /// A failed volume set aborts the fade and is returned as-is.
    pub async fn fade<P>(&self, player: &P, spec: &FadeSpec) -> Result<()>
    where
        P: PlayerClient + ?Sized,
    {
        let total = spec.total_steps(self.steps_per_second);
        let interval = self.step_interval();
        debug!(
            from = spec.from_volume,
            to = spec.to_volume,
            steps = total,
            curve = %self.curve,
            "Fading volume over {}",
            format_seconds(spec.duration_seconds)
        );

        for step in 0..=total {
            let volume = self.volume_at(spec, step, total);
            trace!(step, volume, "Fade step");
            player.set_volume(volume).await?;

            if step < total {
                tokio::time::sleep(interval).await;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_steps() {
        assert_eq!(FadeSpec::new(0, 80, 5.0).total_steps(10), 50);
        assert_eq!(FadeSpec::new(0, 80, 0.3).total_steps(10), 3);
        assert_eq!(FadeSpec::new(0, 80, 1.1).total_steps(10), 11);
        assert_eq!(FadeSpec::new(0, 80, 0.0).total_steps(10), 0);
        assert_eq!(FadeSpec::new(0, 80, -2.0).total_steps(10), 0);
        assert_eq!(FadeSpec::new(0, 80, f64::NAN).total_steps(10), 0);
    }

    #[test]
    fn test_plan_fade_in() {
        let fader = VolumeFader::default();
        let plan = fader.plan(&FadeSpec::new(0, 80, 5.0));

        assert_eq!(plan.len(), 51);
        assert_eq!(plan[0], 0);
        assert_eq!(plan[25], 40);
        assert_eq!(*plan.last().unwrap(), 80);
        assert!(plan.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_plan_fade_out() {
        let fader = VolumeFader::default();
        let plan = fader.plan(&FadeSpec::new(80, 0, 5.0));

        assert_eq!(plan.len(), 51);
        assert_eq!(plan[0], 80);
        assert_eq!(*plan.last().unwrap(), 0);
        assert!(plan.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_plan_zero_duration_sets_target_once() {
        let fader = VolumeFader::default();
        assert_eq!(fader.plan(&FadeSpec::new(30, 70, 0.0)), vec![70]);
        // Rounds to zero steps
        assert_eq!(fader.plan(&FadeSpec::new(30, 70, 0.04)), vec![70]);
    }

    #[test]
    fn test_plan_every_curve_hits_endpoints() {
        for curve in FadeCurve::all_variants() {
            let fader = VolumeFader::new(*curve);
            for (from, to) in [(0u8, 100u8), (100, 0), (17, 93), (93, 17)] {
                let plan = fader.plan(&FadeSpec::new(from, to, 2.7));
                assert_eq!(plan[0], from, "{:?} {}->{}", curve, from, to);
                assert_eq!(*plan.last().unwrap(), to, "{:?} {}->{}", curve, from, to);
                if to >= from {
                    assert!(plan.windows(2).all(|w| w[0] <= w[1]), "{:?}", curve);
                } else {
                    assert!(plan.windows(2).all(|w| w[0] >= w[1]), "{:?}", curve);
                }
            }
        }
    }

    #[test]
    fn test_step_interval() {
        assert_eq!(VolumeFader::default().step_interval(), Duration::from_millis(100));
        assert_eq!(
            VolumeFader::with_rate(4, FadeCurve::Linear).step_interval(),
            Duration::from_millis(250)
        );
        // A zero rate is clamped rather than dividing by zero
        assert_eq!(
            VolumeFader::with_rate(0, FadeCurve::Linear).step_interval(),
            Duration::from_secs(1)
        );
    }
}
