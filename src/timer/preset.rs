//! Preset registry: the closed table of focus/break durations

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::Phase;

/// Named Pomodoro presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Classic,
    Extended,
    Short,
}

/// Phase durations of a preset, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetDurations {
    pub focus_minutes: u64,
    pub short_break_minutes: u64,
    pub long_break_minutes: u64,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Classic, Preset::Extended, Preset::Short];

    /// Look up the durations for this preset
    pub const fn durations(self) -> PresetDurations {
        match self {
            Preset::Classic => PresetDurations {
                focus_minutes: 25,
                short_break_minutes: 5,
                long_break_minutes: 15,
            },
            Preset::Extended => PresetDurations {
                focus_minutes: 50,
                short_break_minutes: 10,
                long_break_minutes: 30,
            },
            Preset::Short => PresetDurations {
                focus_minutes: 15,
                short_break_minutes: 3,
                long_break_minutes: 10,
            },
        }
    }

    /// Configured length of `phase` in minutes
    pub const fn minutes_for(self, phase: Phase) -> u64 {
        let d = self.durations();
        match phase {
            Phase::Focus => d.focus_minutes,
            Phase::ShortBreak => d.short_break_minutes,
            Phase::LongBreak => d.long_break_minutes,
        }
    }

    /// Configured length of `phase` in seconds
    pub const fn seconds_for(self, phase: Phase) -> u64 {
        self.minutes_for(phase) * 60
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Classic => "classic",
            Preset::Extended => "extended",
            Preset::Short => "short",
        }
    }

    /// Human readable label, e.g. `Classic (25/5/15)`
    pub fn label(self) -> String {
        let d = self.durations();
        let name = match self {
            Preset::Classic => "Classic",
            Preset::Extended => "Extended",
            Preset::Short => "Short",
        };
        format!(
            "{} ({}/{}/{})",
            name, d.focus_minutes, d.short_break_minutes, d.long_break_minutes
        )
    }
}

impl Default for Preset {
    fn default() -> Self {
        Preset::Classic
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Preset::Classic),
            "extended" => Ok(Preset::Extended),
            "short" => Ok(Preset::Short),
            other => Err(format!(
                "unknown preset '{}', expected one of: classic, extended, short",
                other
            )),
        }
    }
}
