//! # Tempo Core Library
//!
//! This library provides the core logic for the Tempo focus timer: a session
//! controller with three modes (momentum presets, sprint presets and a
//! custom-duration flex mode) and an energy budget that gates the costlier
//! presets. The `tempo` CLI is a thin presentation layer over this crate.
//!
//! ## Architecture
//!
//! - **Session Controller**: a tick-driven state machine; the caller (or the
//!   async runtime) feeds it one tick per second
//! - **Energy Ledger**: clamped budget spent on start, recovered on completion
//! - **Runtime**: tokio task owning one controller, with exactly one live
//!   ticker while a session runs
//! - **Sinks**: best-effort completion side effects (chime, notification)
//!
//! ## Key Components
//!
//! - [`SessionController`]: core state machine
//! - [`SessionRuntime`]: async driver
//! - [`Config`]: application configuration management
//! - [`CompletionSink`]: trait for completion side effects

pub mod config;
pub mod energy;
pub mod error;
pub mod events;
pub mod runtime;
pub mod sink;
pub mod timer;

pub use config::Config;
pub use energy::{EnergyBand, EnergyLedger};
pub use error::{ConfigError, RuntimeError, ValidationError};
pub use events::{Event, Snapshot};
pub use runtime::{Command, RuntimeHandle, SessionRuntime};
pub use sink::{CompletionNotice, CompletionSink, LogSink, MemorySink, TerminalBell, TerminalNotifier};
pub use timer::{
    Mode, Outcome, Preset, SessionController, TickToken, TimerState, BREAK_IDEAS,
    MOMENTUM_PRESETS, SPRINT_PRESETS,
};
