//! Track list loading and random selection
//!
//! The list is a CSV file with one track per row: `uri,minutes,seconds`.
//! The starting point is `minutes × 60 + seconds`. Blank lines and lines
//! starting with `#` are ignored.

use crate::{Error, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;

/// A track to play and where to start it
#[derive(Debug, Clone, PartialEq)]
pub struct TrackDescriptor {
    /// Opaque player identifier (e.g. `spotify:track:...`)
    pub uri: String,

    /// Offset into the track, in seconds
    pub starting_point_seconds: f64,
}

impl TrackDescriptor {
    pub fn new(uri: impl Into<String>, starting_point_seconds: f64) -> Self {
        Self {
            uri: uri.into(),
            starting_point_seconds,
        }
    }
}

/// Parsed track list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackList {
    tracks: Vec<TrackDescriptor>,
}

impl TrackList {
    /// Read and parse a CSV track list
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::TrackList(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parse CSV content; errors name the offending line (1-based)
    pub fn parse(content: &str) -> Result<Self> {
        let mut tracks = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            tracks.push(parse_row(line).map_err(|reason| {
                Error::TrackList(format!("line {}: {}", index + 1, reason))
            })?);
        }

        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[TrackDescriptor] {
        &self.tracks
    }

    /// Uniformly pick one track
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&TrackDescriptor> {
        self.tracks
            .choose(rng)
            .ok_or_else(|| Error::TrackList("track list is empty".to_string()))
    }

    /// Pick one track using the thread-local generator
    pub fn choose_random(&self) -> Result<&TrackDescriptor> {
        self.choose(&mut rand::thread_rng())
    }
}

fn parse_row(line: &str) -> std::result::Result<TrackDescriptor, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [uri, minutes, seconds] = fields.as_slice() else {
        return Err(format!("expected 3 fields (uri,minutes,seconds), got {}", fields.len()));
    };

    if uri.is_empty() {
        return Err("empty track uri".to_string());
    }
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| format!("invalid minutes {:?}", minutes))?;
    let seconds: f64 = seconds
        .parse()
        .map_err(|_| format!("invalid seconds {:?}", seconds))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("seconds must be non-negative, got {}", seconds));
    }

    Ok(TrackDescriptor::new(
        *uri,
        f64::from(minutes) * 60.0 + seconds,
    ))
}
