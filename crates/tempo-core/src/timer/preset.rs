use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const FLEX_MIN_MINUTES: u32 = 1;
pub const FLEX_MAX_MINUTES: u32 = 60;
pub const FLEX_DEFAULT_MINUTES: u32 = 15;

/// Which catalog produced a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Build focus gradually; longer sessions cost more energy.
    Momentum,
    /// Quick bursts with no energy cost.
    Sprint,
    /// Custom duration chosen by the user.
    Flex,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Momentum, Mode::Sprint, Mode::Flex];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Momentum => "momentum",
            Mode::Sprint => "sprint",
            Mode::Flex => "flex",
        }
    }

    /// Fixed catalog for this mode. Flex has none.
    pub fn presets(&self) -> &'static [Preset] {
        match self {
            Mode::Momentum => &MOMENTUM_PRESETS,
            Mode::Sprint => &SPRINT_PRESETS,
            Mode::Flex => &[],
        }
    }

    /// Look up a catalog entry by zero-based index.
    pub fn preset(&self, index: usize) -> Result<Preset, ValidationError> {
        let presets = self.presets();
        presets
            .get(index)
            .copied()
            .ok_or(ValidationError::PresetOutOfRange {
                mode: *self,
                index,
                len: presets.len(),
            })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "momentum" | "m" => Ok(Mode::Momentum),
            "sprint" | "s" => Ok(Mode::Sprint),
            "flex" | "f" => Ok(Mode::Flex),
            other => Err(ValidationError::UnknownMode(other.to_string())),
        }
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub mode: Mode,
    /// Duration in minutes.
    pub duration_min: u32,
    pub label: &'static str,
    pub energy_cost: u32,
}

impl Preset {
    const fn new(mode: Mode, duration_min: u32, label: &'static str, energy_cost: u32) -> Self {
        Self {
            mode,
            duration_min,
            label,
            energy_cost,
        }
    }

    /// A flex preset; `minutes` is clamped into the slider range.
    pub fn flex(minutes: u32) -> Self {
        Self::new(
            Mode::Flex,
            minutes.clamp(FLEX_MIN_MINUTES, FLEX_MAX_MINUTES),
            "Custom",
            0,
        )
    }

    /// Get preset duration in seconds.
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.duration_min).saturating_mul(60)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min {}", self.duration_min, self.label)
    }
}

pub const MOMENTUM_PRESETS: [Preset; 4] = [
    Preset::new(Mode::Momentum, 5, "Quick Win", 15),
    Preset::new(Mode::Momentum, 12, "Flow Start", 25),
    Preset::new(Mode::Momentum, 18, "Deep Dive", 40),
    Preset::new(Mode::Momentum, 25, "Full Focus", 50),
];

pub const SPRINT_PRESETS: [Preset; 3] = [
    Preset::new(Mode::Sprint, 2, "Blitz", 0),
    Preset::new(Mode::Sprint, 5, "Rush", 0),
    Preset::new(Mode::Sprint, 10, "Power", 0),
];

/// Suggestion shown between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakIdea {
    pub icon: &'static str,
    pub title: &'static str,
    pub hint: &'static str,
}

pub const BREAK_IDEAS: [BreakIdea; 5] = [
    BreakIdea { icon: "💧", title: "Hydrate", hint: "Drink water" },
    BreakIdea { icon: "🚶", title: "Move", hint: "Quick walk or stretch" },
    BreakIdea { icon: "👀", title: "Rest eyes", hint: "Look 20ft away" },
    BreakIdea { icon: "🧘", title: "Breathe", hint: "3 deep breaths" },
    BreakIdea { icon: "✨", title: "Celebrate", hint: "You did it!" },
];
