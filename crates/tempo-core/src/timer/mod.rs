mod controller;
mod format;
mod preset;

pub use controller::{Outcome, SessionController, TickToken, TimerState};
pub use format::{format_countdown, progress_pct, PLACEHOLDER};
pub use preset::{
    BreakIdea, Mode, Preset, BREAK_IDEAS, FLEX_DEFAULT_MINUTES, FLEX_MAX_MINUTES,
    FLEX_MIN_MINUTES, MOMENTUM_PRESETS, SPRINT_PRESETS,
};
