//! Session controller.
//!
//! Owns the countdown, the energy ledger and the session counter. Like the
//! rest of the core it has no internal thread: a driver (see
//! [`crate::runtime`]) arms a one-second ticker whenever
//! [`SessionController::tick_token`] changes and feeds each fire back
//! through [`SessionController::tick_with`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --resume--> Running
//! Running --start/stop/last tick--> Idle
//! Paused --stop--> Idle
//! ```
//!
//! Every operation is valid from every state; operations without a
//! transition are no-ops that still return a snapshot.
//!
//! ## Usage
//!
//! ```
//! use tempo_core::{SessionController, TimerState, MOMENTUM_PRESETS};
//!
//! let mut controller = SessionController::new();
//! controller.start_preset(&MOMENTUM_PRESETS[0]);
//! assert_eq!(controller.state(), TimerState::Running);
//! controller.tick();
//! assert_eq!(controller.remaining_secs(), 299);
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::format::{format_countdown, progress_pct};
use super::preset::{Mode, Preset};
use crate::energy::EnergyLedger;
use crate::events::{Event, Snapshot};
use crate::sink::{CompletionNotice, CompletionSink, Sinks};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Identifies one tick subscription. A fresh token is issued every time the
/// controller enters `Running`; ticks carrying any other token are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

/// Result of a controller operation: the event it produced, if any, and the
/// state after it ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub event: Option<Event>,
    pub snapshot: Snapshot,
}

#[derive(Debug)]
pub struct SessionController {
    mode: Mode,
    state: TimerState,
    total_secs: u64,
    remaining_secs: u64,
    session_count: u64,
    ledger: EnergyLedger,
    /// Last issued token generation.
    generation: u64,
    /// Live subscription; `Some` iff `state == Running`.
    subscription: Option<TickToken>,
    sinks: Sinks,
}

impl SessionController {
    /// Idle controller with a full default ledger and no sinks.
    pub fn new() -> Self {
        Self::with_ledger(EnergyLedger::default())
    }

    pub fn with_ledger(ledger: EnergyLedger) -> Self {
        Self {
            mode: Mode::Momentum,
            state: TimerState::Idle,
            total_secs: 0,
            remaining_secs: 0,
            session_count: 0,
            ledger,
            generation: 0,
            subscription: None,
            sinks: Sinks::new(),
        }
    }

    /// Register a completion sink.
    pub fn with_sink(mut self, sink: impl CompletionSink + 'static) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn add_sink(&mut self, sink: impl CompletionSink + 'static) {
        self.sinks.push(sink);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn session_count(&self) -> u64 {
        self.session_count
    }

    pub fn energy(&self) -> u32 {
        self.ledger.level()
    }

    pub fn ledger(&self) -> &EnergyLedger {
        &self.ledger
    }

    /// The active tick subscription, if the countdown is running.
    pub fn tick_token(&self) -> Option<TickToken> {
        self.subscription
    }

    /// 0.0 .. 100.0 elapsed share of the current (or last) session.
    pub fn progress_pct(&self) -> f64 {
        progress_pct(self.total_secs, self.remaining_secs)
    }

    pub fn display(&self) -> String {
        format_countdown(self.remaining_secs)
    }

    /// Whether the ledger can pay for `preset`.
    pub fn is_selectable(&self, preset: &Preset) -> bool {
        self.ledger.can_afford(preset.energy_cost)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            state: self.state,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            session_count: self.session_count,
            energy: self.ledger.level(),
            energy_band: self.ledger.band(),
            progress_pct: self.progress_pct(),
            display: self.display(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a session from a catalog entry, enforcing the energy gate.
    ///
    /// An unaffordable preset is rejected outright, even while a session is
    /// running, and leaves all state untouched.
    pub fn start_preset(&mut self, preset: &Preset) -> Outcome {
        if !self.is_selectable(preset) {
            debug!(
                mode = %preset.mode,
                cost = preset.energy_cost,
                energy = self.ledger.level(),
                "start rejected"
            );
            let event = Event::StartRejected {
                mode: preset.mode,
                energy_cost: preset.energy_cost,
                energy: self.ledger.level(),
                at: Utc::now(),
            };
            return self.outcome(Some(event));
        }
        self.start(preset.mode, preset.duration_min, preset.energy_cost)
    }

    /// Start a session of `minutes`, charging `energy_cost` (floored at zero).
    ///
    /// While a session is running this acts as a stop toggle: the running
    /// session ends and the requested duration and cost are discarded.
    /// A zero-minute request from idle or paused is a no-op and leaves the
    /// mode untouched.
    pub fn start(&mut self, mode: Mode, minutes: u32, energy_cost: u32) -> Outcome {
        match self.state {
            TimerState::Running => {
                self.mode = mode;
                self.end_manually(true)
            }
            TimerState::Idle | TimerState::Paused => {
                let duration_secs = u64::from(minutes).saturating_mul(60);
                if duration_secs == 0 {
                    return self.outcome(None);
                }
                self.mode = mode;
                self.cancel_ticks();
                let energy_spent = self.ledger.spend(energy_cost);
                self.total_secs = duration_secs;
                self.remaining_secs = duration_secs;
                self.state = TimerState::Running;
                self.arm_ticks();
                debug!(%mode, duration_secs, energy_spent, "session started");
                let event = Event::SessionStarted {
                    mode,
                    duration_secs,
                    energy_spent,
                    energy: self.ledger.level(),
                    at: Utc::now(),
                };
                self.outcome(Some(event))
            }
        }
    }

    pub fn pause(&mut self) -> Outcome {
        if self.state != TimerState::Running {
            return self.outcome(None);
        }
        self.cancel_ticks();
        self.state = TimerState::Paused;
        debug!(remaining_secs = self.remaining_secs, "session paused");
        let event = Event::SessionPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        };
        self.outcome(Some(event))
    }

    pub fn resume(&mut self) -> Outcome {
        if self.state != TimerState::Paused {
            return self.outcome(None);
        }
        self.state = TimerState::Running;
        self.arm_ticks();
        debug!(remaining_secs = self.remaining_secs, "session resumed");
        let event = Event::SessionResumed {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        };
        self.outcome(Some(event))
    }

    pub fn stop(&mut self) -> Outcome {
        match self.state {
            TimerState::Running | TimerState::Paused => self.end_manually(false),
            TimerState::Idle => self.outcome(None),
        }
    }

    /// Advance the live subscription by one second.
    pub fn tick(&mut self) -> Outcome {
        match self.subscription {
            Some(token) => self.tick_with(token),
            None => self.outcome(None),
        }
    }

    /// Advance by one second if `token` is the live subscription.
    ///
    /// Returns a `SessionCompleted` event when the countdown runs out.
    pub fn tick_with(&mut self, token: TickToken) -> Outcome {
        if self.state != TimerState::Running || self.subscription != Some(token) {
            return self.outcome(None);
        }
        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return self.outcome(None);
        }
        self.complete()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Outcome {
        self.cancel_ticks();
        self.remaining_secs = 0;
        self.state = TimerState::Idle;
        self.session_count += 1;
        let energy_recovered = self.ledger.recover();
        info!(
            mode = %self.mode,
            session_count = self.session_count,
            energy = self.ledger.level(),
            "session completed"
        );
        let event = Event::SessionCompleted {
            mode: self.mode,
            session_count: self.session_count,
            energy_recovered,
            energy: self.ledger.level(),
            at: Utc::now(),
        };
        // State is committed before any side effect runs.
        self.sinks.notify_all(&CompletionNotice::default());
        self.outcome(Some(event))
    }

    fn end_manually(&mut self, toggled: bool) -> Outcome {
        self.cancel_ticks();
        let remaining_secs = self.remaining_secs;
        self.remaining_secs = 0;
        self.state = TimerState::Idle;
        debug!(remaining_secs, toggled, "session stopped");
        let event = Event::SessionStopped {
            remaining_secs,
            toggled,
            at: Utc::now(),
        };
        self.outcome(Some(event))
    }

    fn arm_ticks(&mut self) {
        self.cancel_ticks();
        self.generation += 1;
        self.subscription = Some(TickToken(self.generation));
    }

    fn cancel_ticks(&mut self) {
        self.subscription = None;
    }

    fn outcome(&self, event: Option<Event>) -> Outcome {
        Outcome {
            event,
            snapshot: self.snapshot(),
        }
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}
