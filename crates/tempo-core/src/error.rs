//! Core error types for tempo-core.
//!
//! The session controller itself never fails; these errors cover the
//! fallible edges around it: configuration I/O, input resolution and the
//! async runtime's command channel.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::Mode;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not name a configuration field
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Config directory could not be created
    #[error("Cannot prepare config directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while talking to a running [`crate::runtime::SessionRuntime`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// The runtime task has exited and no longer accepts commands
    #[error("session runtime has shut down")]
    Closed,
}

/// Validation errors for user-supplied selections.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Mode name not recognised
    #[error("Unknown mode '{0}' (expected momentum, sprint or flex)")]
    UnknownMode(String),

    /// Preset index outside the mode's catalog
    #[error("Preset {index} out of range for {mode} (catalog has {len})")]
    PresetOutOfRange { mode: Mode, index: usize, len: usize },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for RuntimeError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        RuntimeError::Closed
    }
}
