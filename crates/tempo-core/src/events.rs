use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::energy::EnergyBand;
use crate::timer::{Mode, TimerState};

/// Every state change of the session controller produces an Event.
/// Presentation layers render [`Snapshot`]s; integrations subscribe to events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        mode: Mode,
        duration_secs: u64,
        energy_spent: u32,
        energy: u32,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Manual stop. `toggled` is set when a start request on a running
    /// session caused it.
    SessionStopped {
        remaining_secs: u64,
        toggled: bool,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        mode: Mode,
        session_count: u64,
        energy_recovered: u32,
        energy: u32,
        at: DateTime<Utc>,
    },
    /// A preset start was blocked because the ledger could not cover it.
    StartRejected {
        mode: Mode,
        energy_cost: u32,
        energy: u32,
        at: DateTime<Utc>,
    },
}

/// Full, immutable view of the controller after an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: Mode,
    pub state: TimerState,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub session_count: u64,
    pub energy: u32,
    pub energy_band: EnergyBand,
    pub progress_pct: f64,
    /// Countdown as rendered on screen (`m:ss` or the placeholder).
    pub display: String,
}
