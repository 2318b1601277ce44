//! Energy ledger.
//!
//! A process-wide budget consumed by higher-effort presets and replenished
//! whenever a session completes naturally. The level is always kept within
//! `[ENERGY_MIN, ENERGY_MAX]`; out-of-range requests are clamped, never
//! rejected.

use serde::{Deserialize, Serialize};

pub const ENERGY_MIN: u32 = 0;
pub const ENERGY_MAX: u32 = 100;
/// Energy regained on every natural completion.
pub const DEFAULT_RECOVERY: u32 = 30;

/// Coarse energy bands used to colour the energy bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyBand {
    High,
    Medium,
    Low,
}

impl EnergyBand {
    pub fn for_level(level: u32) -> Self {
        if level > 60 {
            EnergyBand::High
        } else if level > 30 {
            EnergyBand::Medium
        } else {
            EnergyBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyBand::High => "high",
            EnergyBand::Medium => "medium",
            EnergyBand::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyLedger {
    level: u32,
    recovery: u32,
}

impl EnergyLedger {
    /// Create a ledger; `level` is clamped to the ceiling.
    pub fn new(level: u32, recovery: u32) -> Self {
        Self {
            level: level.min(ENERGY_MAX),
            recovery,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn recovery(&self) -> u32 {
        self.recovery
    }

    pub fn band(&self) -> EnergyBand {
        EnergyBand::for_level(self.level)
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.level >= cost
    }

    /// Deduct `cost`, flooring at zero. Returns the amount actually taken.
    pub fn spend(&mut self, cost: u32) -> u32 {
        let before = self.level;
        self.level = self.level.saturating_sub(cost);
        before - self.level
    }

    /// Add the recovery amount, capped at the ceiling. Returns the amount
    /// actually gained.
    pub fn recover(&mut self) -> u32 {
        let before = self.level;
        self.level = self.level.saturating_add(self.recovery).min(ENERGY_MAX);
        self.level - before
    }
}

impl Default for EnergyLedger {
    fn default() -> Self {
        Self::new(ENERGY_MAX, DEFAULT_RECOVERY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_ledger_is_full() {
        let ledger = EnergyLedger::default();
        assert_eq!(ledger.level(), 100);
        assert_eq!(ledger.recovery(), 30);
        assert_eq!(ledger.band(), EnergyBand::High);
    }

    #[test]
    fn new_clamps_to_ceiling() {
        assert_eq!(EnergyLedger::new(250, 30).level(), 100);
    }

    #[test]
    fn spend_floors_at_zero() {
        let mut ledger = EnergyLedger::new(10, 30);
        assert_eq!(ledger.spend(15), 10);
        assert_eq!(ledger.level(), 0);
    }

    #[test]
    fn recover_caps_at_ceiling() {
        let mut ledger = EnergyLedger::new(90, 30);
        assert_eq!(ledger.recover(), 10);
        assert_eq!(ledger.level(), 100);
        assert_eq!(ledger.recover(), 0);
        assert_eq!(ledger.level(), 100);
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(EnergyBand::for_level(61), EnergyBand::High);
        assert_eq!(EnergyBand::for_level(60), EnergyBand::Medium);
        assert_eq!(EnergyBand::for_level(31), EnergyBand::Medium);
        assert_eq!(EnergyBand::for_level(30), EnergyBand::Low);
        assert_eq!(EnergyBand::for_level(0), EnergyBand::Low);
    }

    proptest! {
        #[test]
        fn spend_never_goes_negative(level in 0u32..=100, cost in 0u32..=1000) {
            let mut ledger = EnergyLedger::new(level, DEFAULT_RECOVERY);
            ledger.spend(cost);
            prop_assert_eq!(ledger.level(), level.saturating_sub(cost));
        }

        #[test]
        fn recover_never_exceeds_ceiling(level in 0u32..=100, rounds in 1usize..10) {
            let mut ledger = EnergyLedger::new(level, DEFAULT_RECOVERY);
            for _ in 0..rounds {
                ledger.recover();
                prop_assert!(ledger.level() <= ENERGY_MAX);
            }
        }
    }
}
