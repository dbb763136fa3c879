#![deny(warnings)]

//! Simulation and planning core for the gold planner.
//!
//! This crate provides:
//! - a minute-stepped accrual engine for the SPM and Economy tracks
//! - horizon resolution from an end date or a target gold amount
//! - fixed-level comparison projections
//! - a greedy early-game planner for experience-rate tiers
//!
//! Everything is a pure function of its inputs; no state outlives a call.

pub mod horizon;
pub mod planner;
pub mod projector;
pub mod track;

use chrono::NaiveDateTime;
use gold_core::{
    validate_scenario, HorizonSpec, PlannerConfig, ScenarioConfig, TrackKind, ValidationError,
};
use serde::Serialize;
use thiserror::Error;

pub use horizon::resolve_horizon;
pub use planner::{plan_early_game, EarlyGamePlan, PlanStep, Termination};
pub use projector::{
    compare_totals, project_baseline, project_combined, project_experience, TrackComparison,
};
pub use track::{
    simulate, simulate_track, EconomyTrack, SpmTrack, TrackModel, TrackParams, TrackRun,
};

/// Errors produced by the simulation core.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    /// The horizon cannot be simulated: unbounded, empty, or too long.
    #[error("invalid horizon: {0}")]
    InvalidHorizon(String),
    /// Rejected request input.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Everything the presentation layer needs for one request.
#[derive(Clone, Debug, Serialize)]
pub struct ScenarioReport {
    pub horizon: HorizonSpec,
    pub minute_count: u64,
    pub origin: NaiveDateTime,
    pub spm: TrackRun,
    pub economy: TrackRun,
    /// Current SPM level held fixed.
    pub baseline: Vec<f64>,
    /// Current SPM level and current economy rate held fixed.
    pub combined: Vec<f64>,
    pub experience: Vec<f64>,
    pub comparison: TrackComparison,
    pub early_game: EarlyGamePlan,
}

impl ScenarioReport {
    pub fn spm_total(&self) -> f64 {
        self.spm.total().unwrap_or_default()
    }

    pub fn economy_total(&self) -> f64 {
        self.economy.total().unwrap_or_default()
    }
}

/// Run every projection for `scenario`, starting at `now`.
pub fn plan_scenario(
    scenario: &ScenarioConfig,
    planner: &PlannerConfig,
    now: NaiveDateTime,
) -> Result<ScenarioReport, SimError> {
    let levels = validate_scenario(scenario)?;
    let horizon = scenario.horizon(now.date())?;
    let minute_count =
        resolve_horizon(&horizon, now.date(), scenario.income, levels.current_spm)?;
    if minute_count == 0 {
        return Err(SimError::InvalidHorizon(
            "horizon resolves to zero minutes".to_string(),
        ));
    }

    let spm = simulate_track(
        TrackKind::Spm,
        &TrackParams {
            minute_count,
            start_level: levels.current_spm,
            goal_level: levels.goal_spm,
            income: scenario.income,
            experience_rate: scenario.experience_rate,
            origin: now,
        },
    )?;
    let economy = simulate_track(
        TrackKind::Economy,
        &TrackParams {
            minute_count,
            start_level: levels.current_econ,
            goal_level: levels.goal_econ,
            income: scenario.income,
            experience_rate: scenario.experience_rate,
            origin: now,
        },
    )?;
    let baseline = project_baseline(minute_count, scenario.income, levels.current_spm)?;
    let combined = project_combined(
        minute_count,
        scenario.income,
        levels.current_spm,
        levels.current_econ,
    )?;
    let experience = project_experience(minute_count, scenario.experience_rate)?;
    let comparison = compare_totals(
        spm.total().unwrap_or_default(),
        economy.total().unwrap_or_default(),
    );
    let early_game = plan_early_game(planner)?;

    Ok(ScenarioReport {
        horizon,
        minute_count,
        origin: now,
        spm,
        economy,
        baseline,
        combined,
        experience,
        comparison,
        early_game,
    })
}
