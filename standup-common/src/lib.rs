//! # Standup Common Library
//!
//! Shared code for the standup workspace:
//! - Error types
//! - TOML configuration loading and defaults
//! - Fade curve definitions
//! - Human-readable duration formatting

pub mod config;
pub mod error;
pub mod fade_curves;
pub mod human_time;

pub use error::{Error, Result};
pub use fade_curves::FadeCurve;
