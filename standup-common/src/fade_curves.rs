//! Fade curve implementations for volume ramps
//!
//! A curve maps normalised fade progress `t` (0.0 at the first step, 1.0 at
//! the last) onto the fraction of the volume distance already covered. Every
//! curve is monotonic with `f(0) = 0` and `f(1) = 1`, so ramps in either
//! direction stay monotonic and hit both endpoints.
//!
//! - **Linear**: `f(t) = t` (default)
//! - **Exponential**: `f(t) = t²`, slow start, fast finish
//! - **Logarithmic**: `f(t) = √t`, fast start, slow finish
//! - **SCurve**: `f(t) = 0.5 × (1 - cos(π × t))`
//! - **EqualPower**: `f(t) = sin(t × π/2)`

use serde::Deserialize;
use std::f64::consts::{FRAC_PI_2, PI};
use std::str::FromStr;

/// Fade curve types for volume ramps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FadeCurve {
    /// Constant rate of change
    #[default]
    Linear,

    /// Slow start, fast finish
    Exponential,

    /// Fast start, slow finish
    Logarithmic,

    /// Smooth acceleration and deceleration
    #[serde(alias = "cosine", alias = "scurve", alias = "s_curve")]
    SCurve,

    /// Constant perceived loudness
    #[serde(alias = "equal_power", alias = "equalpower")]
    EqualPower,
}

impl FadeCurve {
    /// Fraction of the ramp covered at `progress` (clamped to 0.0..=1.0)
    pub fn shape(&self, progress: f64) -> f64 {
        let t = progress.clamp(0.0, 1.0);

        match self {
            FadeCurve::Linear => t,
            FadeCurve::Exponential => t * t,
            FadeCurve::Logarithmic => t.sqrt(),
            FadeCurve::SCurve => 0.5 * (1.0 - (PI * t).cos()),
            FadeCurve::EqualPower => (t * FRAC_PI_2).sin(),
        }
    }

    /// Interpolated level between `from` and `to` at `progress`
    ///
    /// For `Linear` this is `from + t × (to - from)`.
    pub fn interpolate(&self, from: f64, to: f64, progress: f64) -> f64 {
        from + self.shape(progress) * (to - from)
    }

    /// Canonical config/CLI name
    pub fn as_str(&self) -> &'static str {
        match self {
            FadeCurve::Linear => "linear",
            FadeCurve::Exponential => "exponential",
            FadeCurve::Logarithmic => "logarithmic",
            FadeCurve::SCurve => "s-curve",
            FadeCurve::EqualPower => "equal-power",
        }
    }

    /// Get all available fade curve variants
    pub fn all_variants() -> &'static [FadeCurve] {
        &[
            FadeCurve::Linear,
            FadeCurve::Exponential,
            FadeCurve::Logarithmic,
            FadeCurve::SCurve,
            FadeCurve::EqualPower,
        ]
    }
}

impl FromStr for FadeCurve {
    type Err = String;

    /// Case-insensitive; accepts `cosine`/`scurve`/`s_curve` and
    /// `equal_power`/`equalpower` aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(FadeCurve::Linear),
            "exponential" => Ok(FadeCurve::Exponential),
            "logarithmic" => Ok(FadeCurve::Logarithmic),
            "cosine" | "scurve" | "s-curve" | "s_curve" => Ok(FadeCurve::SCurve),
            "equal-power" | "equal_power" | "equalpower" => Ok(FadeCurve::EqualPower),
            other => Err(format!("unknown fade curve '{}'", other)),
        }
    }
}

impl std::fmt::Display for FadeCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
