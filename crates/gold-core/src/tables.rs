//! Static progression data: experience-cost curves, economy rates, and the
//! experience-rate tier ladder.
//!
//! Every cost table is stored as the literal ladder whose first entry is the
//! cost of the base level (always 0). The cost of leaving level `L` is the
//! entry that follows it; see [`UpgradeCostTable::cost_from`].

use crate::{TrackKind, ValidationError};

/// Lowest selectable SPM level.
pub const SPM_MIN_LEVEL: u32 = 1;
/// Highest selectable SPM level.
pub const SPM_MAX_LEVEL: u32 = 50;

/// Gold produced per minute by each accumulated soldier.
pub const GOLD_PER_SOLDIER: f64 = 2.6;

/// Highest experience-rate tier.
pub const MAX_TIER: u32 = 6;

pub const MINUTES_PER_DAY: u64 = 24 * 60;

/// Upper bound on any simulated horizon (ten years of minutes).
pub const MAX_HORIZON_MINUTES: u64 = 3650 * MINUTES_PER_DAY;

/// Experience needed per SPM level, starting with the free base level 1.
pub const SPM_EXP_COSTS: [u64; 50] = [
    0, 150, 275, 300, 325, 350, 375, 400, 450, 500, //
    650, 700, 750, 800, 850, 900, 950, 1000, 1050, 1200, //
    1250, 1300, 1350, 1400, 1500, 1700, 1800, 1900, 2000, 2100, //
    2300, 2400, 2500, 2600, 2700, 2800, 2900, 3000, 3100, 3400, //
    3600, 3700, 3800, 3900, 4000, 4100, 4200, 4300, 4400, 4500,
];

/// Flat gold per minute granted by each economy level index.
pub const ECONOMY_RATES: [u64; 13] = [
    0, 200, 500, 1300, 3100, 7800, 19500, 48800, 122100, 305200, 762900, 1907300, 4768400,
];

/// Experience needed per economy level index, starting with the free index 0.
pub const ECONOMY_EXP_COSTS: [u64; 13] = [
    0, 75, 150, 300, 600, 1200, 2400, 4800, 9600, 19200, 38400, 76800, 153600,
];

/// Gold cost of each experience-rate tier, starting with the free tier 1.
pub const TIER_COSTS: [u64; 6] = [
    0,
    200_000_000,
    550_000_000,
    800_000_000,
    1_000_000_000,
    2_000_000_000,
];

/// Read-only view over one experience (or gold) cost ladder.
///
/// Values are treated as an opaque lookup. The shipped tables happen to grow
/// with level but nothing here relies on that.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeCostTable {
    entries: &'static [u64],
    base_level: u32,
}

impl UpgradeCostTable {
    /// Wrap a literal ladder whose first entry belongs to `base_level`.
    pub const fn new(entries: &'static [u64], base_level: u32) -> Self {
        Self {
            entries,
            base_level,
        }
    }

    pub const fn spm() -> Self {
        Self::new(&SPM_EXP_COSTS, SPM_MIN_LEVEL)
    }

    pub const fn economy() -> Self {
        Self::new(&ECONOMY_EXP_COSTS, 0)
    }

    pub const fn tiers() -> Self {
        Self::new(&TIER_COSTS, 1)
    }

    /// Cost table for a progression track.
    pub const fn for_track(kind: TrackKind) -> Self {
        match kind {
            TrackKind::Spm => Self::spm(),
            TrackKind::Economy => Self::economy(),
        }
    }

    pub fn base_level(&self) -> u32 {
        self.base_level
    }

    /// Highest level reachable through this ladder.
    pub fn max_level(&self) -> u32 {
        self.base_level + self.entries.len().saturating_sub(1) as u32
    }

    /// Number of literal entries, including the base level.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cost of advancing from `level` to `level + 1`.
    ///
    /// Returns `None` below the base level or at the top of the ladder.
    pub fn cost_from(&self, level: u32) -> Option<f64> {
        let offset = level.checked_sub(self.base_level)? as usize;
        self.entries.get(offset + 1).map(|&c| c as f64)
    }

    /// Sum of every transition cost paid to climb from the base level to `level`.
    pub fn cumulative_cost_to(&self, level: u32) -> f64 {
        let steps = level.saturating_sub(self.base_level) as usize;
        self.entries
            .iter()
            .skip(1)
            .take(steps)
            .map(|&c| c as f64)
            .sum()
    }
}

/// Gold per minute granted by economy level `index`.
pub fn economy_rate(index: u32) -> Result<f64, ValidationError> {
    ECONOMY_RATES
        .get(index as usize)
        .map(|&r| r as f64)
        .ok_or(ValidationError::LevelOutOfRange {
            track: TrackKind::Economy,
            level: index,
            max: (ECONOMY_RATES.len() - 1) as u32,
        })
}

/// Economy level index that grants exactly `rate` gold per minute.
pub fn economy_index_for_rate(rate: u64) -> Result<u32, ValidationError> {
    ECONOMY_RATES
        .iter()
        .position(|&r| r == rate)
        .map(|i| i as u32)
        .ok_or(ValidationError::UnknownEconomyRate(rate))
}

/// Gold cost of advancing from experience-rate `tier` to the next one.
pub fn tier_cost_from(tier: u32) -> Option<f64> {
    UpgradeCostTable::tiers().cost_from(tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes_match_level_ranges() {
        assert_eq!(UpgradeCostTable::spm().len(), 50);
        assert_eq!(UpgradeCostTable::spm().max_level(), SPM_MAX_LEVEL);
        assert_eq!(UpgradeCostTable::economy().len(), ECONOMY_RATES.len());
        assert_eq!(UpgradeCostTable::economy().max_level(), 12);
        assert_eq!(UpgradeCostTable::tiers().max_level(), MAX_TIER);
    }

    #[test]
    fn first_transitions_skip_the_base_entry() {
        assert_eq!(UpgradeCostTable::spm().cost_from(1), Some(150.0));
        assert_eq!(UpgradeCostTable::economy().cost_from(0), Some(75.0));
        assert_eq!(tier_cost_from(1), Some(200_000_000.0));
        assert_eq!(tier_cost_from(5), Some(2_000_000_000.0));
    }

    #[test]
    fn no_transition_past_the_top_or_below_the_base() {
        assert_eq!(UpgradeCostTable::spm().cost_from(50), None);
        assert_eq!(UpgradeCostTable::spm().cost_from(0), None);
        assert_eq!(UpgradeCostTable::economy().cost_from(12), None);
        assert_eq!(tier_cost_from(MAX_TIER), None);
    }

    #[test]
    fn cumulative_cost_sums_transitions() {
        let econ = UpgradeCostTable::economy();
        assert_eq!(econ.cumulative_cost_to(0), 0.0);
        assert_eq!(econ.cumulative_cost_to(1), 75.0);
        assert_eq!(econ.cumulative_cost_to(3), 75.0 + 150.0 + 300.0);
        let spm = UpgradeCostTable::spm();
        assert_eq!(spm.cumulative_cost_to(2), 150.0);
    }

    #[test]
    fn economy_rate_lookup_both_ways() {
        assert_eq!(economy_rate(0).unwrap(), 0.0);
        assert_eq!(economy_rate(12).unwrap(), 4_768_400.0);
        assert_eq!(economy_index_for_rate(500).unwrap(), 2);
        assert_eq!(
            economy_index_for_rate(501),
            Err(ValidationError::UnknownEconomyRate(501))
        );
        assert!(matches!(
            economy_rate(13),
            Err(ValidationError::LevelOutOfRange { level: 13, max: 12, .. })
        ));
    }
}
