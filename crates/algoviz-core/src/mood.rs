//! Mood-based playback speed presets.
//!
//! A mood is resolved to a speed multiplier once, when an engine is built from
//! configuration. The engine itself only ever sees the resulting speed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pace preset picked by the learner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mood {
    Chill,
    Rush,
    Grind,
}

impl Mood {
    pub const ALL: [Mood; 3] = [Mood::Chill, Mood::Rush, Mood::Grind];

    /// Speed multiplier applied through `AnimationEngine::set_speed`
    pub fn speed(self) -> f64 {
        match self {
            Mood::Chill => 0.5,
            Mood::Rush => 1.5,
            Mood::Grind => 2.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Chill => "CHILL",
            Mood::Rush => "RUSH",
            Mood::Grind => "GRIND",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chill" => Ok(Mood::Chill),
            "rush" => Ok(Mood::Rush),
            "grind" => Ok(Mood::Grind),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown mood '{}' (expected chill, rush or grind)",
                other
            ))),
        }
    }
}
