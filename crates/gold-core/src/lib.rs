#![deny(warnings)]

//! Core domain models and invariants for the gold planner.
//!
//! This crate defines the serializable inputs and outputs shared by the
//! simulation, the static progression tables, and validation helpers that
//! reject malformed requests before any simulation runs.

pub mod tables;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use tables::{
    economy_index_for_rate, economy_rate, tier_cost_from, UpgradeCostTable, GOLD_PER_SOLDIER,
    MAX_HORIZON_MINUTES, MAX_TIER, MINUTES_PER_DAY, SPM_MAX_LEVEL, SPM_MIN_LEVEL,
};

/// The two competing upgrade tracks that drive gold income.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    /// Soldiers per minute: income scales with the cumulative soldier count.
    Spm,
    /// Economy: each level index grants a flat gold rate.
    Economy,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Spm => f.write_str("SPM"),
            TrackKind::Economy => f.write_str("Economy"),
        }
    }
}

/// Validation errors for request inputs.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Level index beyond its cost or rate table.
    #[error("{track} level {level} is out of range (max {max})")]
    LevelOutOfRange { track: TrackKind, level: u32, max: u32 },
    /// Economy rate that is not one of the table values.
    #[error("economy rate {0} is not a known level")]
    UnknownEconomyRate(u64),
    /// Unrecognized horizon tag.
    #[error("unrecognized end condition: {0}")]
    InvalidEndCondition(String),
    /// Date string that is not `YYYY-MM-DD` (optionally followed by a time).
    #[error("invalid date: {0}")]
    InvalidDate(String),
    /// Experience-rate tier outside the tier ladder.
    #[error("tier {tier} is out of range (max {max})")]
    TierOutOfRange { tier: u32, max: u32 },
    /// Numeric field must be finite.
    #[error("non-finite numeric value encountered")]
    NonFinite,
}

/// Recorded whenever a track advances one level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeEvent {
    /// 1-based minute in which the upgrade happened.
    pub minute_index: u64,
    /// Wall-clock instant of that minute relative to the request origin.
    pub timestamp: NaiveDateTime,
    /// Gold total as of this minute, before the next minute's accrual.
    pub cumulative_gold: f64,
    /// Level reached by this upgrade.
    pub new_level: u32,
    /// Human-readable description.
    pub label: String,
}

/// Mutable per-track state carried across minute steps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub level: u32,
    pub experience: f64,
    pub gold: f64,
    /// Cumulative soldiers (SPM) or current flat rate (Economy).
    pub units_or_rate: f64,
}

/// Recognized end condition tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndCondition {
    EndDate,
    TargetGold,
}

impl FromStr for EndCondition {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "end_date" => Ok(EndCondition::EndDate),
            "target_gold" => Ok(EndCondition::TargetGold),
            other => Err(ValidationError::InvalidEndCondition(other.to_string())),
        }
    }
}

/// How the simulated window ends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HorizonSpec {
    /// Simulate until midnight of this calendar date.
    EndDate { date: NaiveDate },
    /// Simulate until the proxy gold projection reaches this amount.
    TargetGold { amount: f64 },
}

/// Parse a `YYYY-MM-DD` date, ignoring any trailing time component.
pub fn parse_date(text: &str) -> Result<NaiveDate, ValidationError> {
    let date_part = text
        .trim()
        .split([' ', 'T'])
        .next()
        .unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(text.to_string()))
}

/// State of the early-game greedy planner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannerState {
    pub spm_level: u32,
    /// Economy level index (not rate).
    pub econ_level: u32,
    pub gold: f64,
    pub experience: f64,
    /// Experience-rate tier; also the experience gained per minute.
    pub tier: u32,
    /// Minutes of play the plan has waited through so far.
    pub elapsed_minutes: f64,
}

/// Early-game planner configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub starting_gold: f64,
    pub starting_spm: u32,
    /// Economy level index.
    pub starting_econ: u32,
    pub starting_tier: u32,
    /// Stop once this tier is bought.
    pub target_tier: u32,
    /// Hard cap on greedy iterations.
    pub max_iterations: u32,
    /// Once both tracks are exhausted, wait for gold to afford the next tier
    /// instead of stopping.
    pub wait_for_gold: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            starting_gold: 50_000.0,
            starting_spm: 1,
            starting_econ: 0,
            starting_tier: 1,
            target_tier: MAX_TIER,
            max_iterations: 1000,
            wait_for_gold: true,
        }
    }
}

/// A single planning request as supplied by the presentation layer.
///
/// Economy levels are given as rates, matching what a player reads off the
/// game screen; they are mapped to level indices during validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Flat gold income per minute.
    pub income: f64,
    /// Experience gained per minute.
    pub experience_rate: f64,
    pub current_spm: u32,
    pub goal_spm: u32,
    /// Current economy rate (one of the table values).
    pub current_economy: u64,
    /// Goal economy rate (one of the table values).
    pub goal_economy: u64,
    /// `end_date` or `target_gold`.
    pub end_condition: String,
    /// `YYYY-MM-DD`; defaults to 30 days after today.
    pub end_date: Option<String>,
    pub target_gold: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            income: 100.0,
            experience_rate: 1.0,
            current_spm: SPM_MIN_LEVEL,
            goal_spm: SPM_MAX_LEVEL,
            current_economy: 0,
            goal_economy: 4_768_400,
            end_condition: "end_date".to_string(),
            end_date: None,
            target_gold: 2_000_000_000.0,
        }
    }
}

/// Days of horizon used when no end date is supplied.
pub const DEFAULT_HORIZON_DAYS: i64 = 30;

impl ScenarioConfig {
    /// Resolve the end condition tag and its value into a [`HorizonSpec`].
    pub fn horizon(&self, today: NaiveDate) -> Result<HorizonSpec, ValidationError> {
        match self.end_condition.parse::<EndCondition>()? {
            EndCondition::EndDate => {
                let date = match &self.end_date {
                    Some(text) => parse_date(text)?,
                    None => today + Duration::days(DEFAULT_HORIZON_DAYS),
                };
                Ok(HorizonSpec::EndDate { date })
            }
            EndCondition::TargetGold => {
                if !self.target_gold.is_finite() {
                    return Err(ValidationError::NonFinite);
                }
                Ok(HorizonSpec::TargetGold {
                    amount: self.target_gold,
                })
            }
        }
    }
}

/// Validated level indices of a scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScenarioLevels {
    pub current_spm: u32,
    pub goal_spm: u32,
    pub current_econ: u32,
    pub goal_econ: u32,
}

/// Ensure `level` is selectable on `kind`'s track.
pub fn validate_level(kind: TrackKind, level: u32) -> Result<(), ValidationError> {
    let table = UpgradeCostTable::for_track(kind);
    if level < table.base_level() || level > table.max_level() {
        return Err(ValidationError::LevelOutOfRange {
            track: kind,
            level,
            max: table.max_level(),
        });
    }
    Ok(())
}

/// Validate a scenario and map its economy rates to level indices.
pub fn validate_scenario(s: &ScenarioConfig) -> Result<ScenarioLevels, ValidationError> {
    if !(s.income.is_finite() && s.experience_rate.is_finite() && s.target_gold.is_finite()) {
        return Err(ValidationError::NonFinite);
    }
    validate_level(TrackKind::Spm, s.current_spm)?;
    validate_level(TrackKind::Spm, s.goal_spm)?;
    let current_econ = economy_index_for_rate(s.current_economy)?;
    let goal_econ = economy_index_for_rate(s.goal_economy)?;
    Ok(ScenarioLevels {
        current_spm: s.current_spm,
        goal_spm: s.goal_spm,
        current_econ,
        goal_econ,
    })
}

/// Validate a planner configuration.
pub fn validate_planner(p: &PlannerConfig) -> Result<(), ValidationError> {
    if !p.starting_gold.is_finite() {
        return Err(ValidationError::NonFinite);
    }
    validate_level(TrackKind::Spm, p.starting_spm)?;
    validate_level(TrackKind::Economy, p.starting_econ)?;
    let tiers = UpgradeCostTable::tiers();
    for tier in [p.starting_tier, p.target_tier] {
        if tier < tiers.base_level() || tier > tiers.max_level() {
            return Err(ValidationError::TierOutOfRange {
                tier,
                max: tiers.max_level(),
            });
        }
    }
    Ok(())
}
