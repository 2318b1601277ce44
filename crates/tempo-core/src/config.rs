//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Starting energy and the recovery amount per completed session
//! - Completion notification and chime toggles
//! - Tick period and the default flex duration
//!
//! Configuration lives at `~/.config/tempo/config.toml`. Session state is
//! never written here; only preferences are.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::energy::{EnergyLedger, DEFAULT_RECOVERY, ENERGY_MAX};
use crate::error::ConfigError;
use crate::timer::{Preset, FLEX_DEFAULT_MINUTES, FLEX_MAX_MINUTES, FLEX_MIN_MINUTES};

/// Energy ledger configuration.
///
/// The defaults (start at 100, recover 30 per completed session) are the
/// standard rules; other values change the game's balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyConfig {
    #[serde(default = "default_starting_energy")]
    pub starting: u32,
    /// Energy regained per natural completion, at most 100.
    #[serde(default = "default_recovery")]
    pub recovery: u32,
}

/// Completion side effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub chime: bool,
}

/// Countdown behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Milliseconds between ticks; one tick always removes one second, so
    /// anything but 1000 runs the countdown faster or slower than real time.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Default flex duration, within the 1-60 minute slider range.
    #[serde(default = "default_flex_minutes")]
    pub flex_minutes: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tempo/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub energy: EnergyConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub timer: TimerConfig,
}

fn default_starting_energy() -> u32 {
    ENERGY_MAX
}
fn default_recovery() -> u32 {
    DEFAULT_RECOVERY
}
fn default_true() -> bool {
    true
}
fn default_tick_ms() -> u64 {
    1000
}
fn default_flex_minutes() -> u32 {
    FLEX_DEFAULT_MINUTES
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            starting: default_starting_energy(),
            recovery: default_recovery(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chime: true,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            flex_minutes: default_flex_minutes(),
        }
    }
}

/// Returns the config directory: `$TEMPO_HOME` when set, otherwise
/// `~/.config/tempo[-dev]/` based on `TEMPO_ENV`.
///
/// Set TEMPO_ENV=dev to use the development directory.
pub fn config_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("TEMPO_HOME") {
        return PathBuf::from(home);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TEMPO_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("tempo-dev")
    } else {
        base_dir.join("tempo")
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load from the default location, or defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path())
    }

    /// Load from `path`; the file's values must pass [`Config::validate`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Directory {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.energy.starting > ENERGY_MAX {
            return Err(ConfigError::InvalidValue {
                key: "energy.starting".into(),
                message: format!("must be at most {ENERGY_MAX}"),
            });
        }
        if self.energy.recovery > ENERGY_MAX {
            return Err(ConfigError::InvalidValue {
                key: "energy.recovery".into(),
                message: format!("must be at most {ENERGY_MAX}"),
            });
        }
        if !(FLEX_MIN_MINUTES..=FLEX_MAX_MINUTES).contains(&self.timer.flex_minutes) {
            return Err(ConfigError::InvalidValue {
                key: "timer.flex_minutes".into(),
                message: format!("must be between {FLEX_MIN_MINUTES} and {FLEX_MAX_MINUTES}"),
            });
        }
        if self.timer.tick_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.tick_ms".into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn ledger(&self) -> EnergyLedger {
        EnergyLedger::new(self.energy.starting, self.energy.recovery)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.timer.tick_ms.max(1))
    }

    /// Default flex preset, clamped into the slider range.
    pub fn flex_preset(&self) -> Preset {
        Preset::flex(self.timer.flex_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.energy.starting, 100);
        assert_eq!(parsed.energy.recovery, 30);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[energy]\nstarting = 40\n").unwrap();
        assert_eq!(parsed.energy.starting, 40);
        assert_eq!(parsed.energy.recovery, 30);
        assert_eq!(parsed.timer.tick_ms, 1000);
        assert!(parsed.notifications.chime);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("notifications.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("timer.flex_minutes").as_deref(), Some("15"));
        assert!(cfg.get("timer.missing_key").is_none());
        assert!(cfg.get("timer").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("notifications.chime", "false").unwrap();
        cfg.set("energy.recovery", "20").unwrap();
        assert!(!cfg.notifications.chime);
        assert_eq!(cfg.energy.recovery, 20);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("timer.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("notifications.enabled", "not_a_bool"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("timer.tick_ms", "-5"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn set_rejects_out_of_range_energy() {
        let mut cfg = Config::default();
        assert!(cfg.set("energy.starting", "150").is_err());
        assert_eq!(cfg.energy.starting, 100);
        assert!(cfg.set("timer.tick_ms", "0").is_err());
        assert!(cfg.set("energy.recovery", "101").is_err());
        assert_eq!(cfg.energy.recovery, 30);
    }

    #[test]
    fn set_rejects_flex_minutes_outside_slider() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("timer.flex_minutes", "500"),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "timer.flex_minutes"
        ));
        assert!(cfg.set("timer.flex_minutes", "0").is_err());
        assert_eq!(cfg.timer.flex_minutes, 15);

        cfg.set("timer.flex_minutes", "60").unwrap();
        assert_eq!(cfg.flex_preset().duration_min, 60);
    }

    #[test]
    fn hand_edited_file_is_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\nflex_minutes = 500\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "timer.flex_minutes"
        ));

        std::fs::write(&path, "[energy]\nrecovery = 250\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn derived_values() {
        let mut cfg = Config::default();
        cfg.timer.flex_minutes = 90;
        cfg.energy.starting = 45;
        assert_eq!(cfg.flex_preset().duration_min, 60);
        assert_eq!(cfg.ledger().level(), 45);
        assert_eq!(cfg.tick_period(), Duration::from_secs(1));
    }

    #[test]
    fn save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let mut cfg = Config::default();
        cfg.energy.starting = 70;
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().energy.starting, 70);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "energy = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
