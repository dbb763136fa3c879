//! Comparison projections with no upgrade logic.
//!
//! These series hold the current levels fixed for the whole horizon and only
//! serve as a reference line next to the two upgrade-driven tracks.

use gold_core::{economy_rate, validate_level, TrackKind, GOLD_PER_SOLDIER, MAX_HORIZON_MINUTES};
use serde::Serialize;

use crate::SimError;

fn check_minutes(minute_count: u64) -> Result<(), SimError> {
    if minute_count > MAX_HORIZON_MINUTES {
        return Err(SimError::InvalidHorizon(format!(
            "{minute_count} minutes exceeds the {MAX_HORIZON_MINUTES} minute limit"
        )));
    }
    Ok(())
}

fn fixed_spm_series(minute_count: u64, income: f64, spm_level: u32, flat: f64) -> Vec<f64> {
    let mut series = Vec::with_capacity(minute_count as usize);
    let mut soldiers = 0.0;
    let mut total = 0.0;
    for _ in 0..minute_count {
        soldiers += spm_level as f64;
        total += income + flat + soldiers * GOLD_PER_SOLDIER;
        series.push(total);
    }
    series
}

/// Gold over the horizon if SPM stays at `spm_level` and nothing else changes.
pub fn project_baseline(
    minute_count: u64,
    income: f64,
    spm_level: u32,
) -> Result<Vec<f64>, SimError> {
    check_minutes(minute_count)?;
    validate_level(TrackKind::Spm, spm_level)?;
    Ok(fixed_spm_series(minute_count, income, spm_level, 0.0))
}

/// Baseline plus the flat rate of economy level `econ_level`.
pub fn project_combined(
    minute_count: u64,
    income: f64,
    spm_level: u32,
    econ_level: u32,
) -> Result<Vec<f64>, SimError> {
    check_minutes(minute_count)?;
    validate_level(TrackKind::Spm, spm_level)?;
    let flat = economy_rate(econ_level)?;
    Ok(fixed_spm_series(minute_count, income, spm_level, flat))
}

/// Cumulative experience earned over the horizon.
pub fn project_experience(minute_count: u64, experience_rate: f64) -> Result<Vec<f64>, SimError> {
    check_minutes(minute_count)?;
    Ok((1..=minute_count)
        .map(|m| experience_rate * m as f64)
        .collect())
}

/// Which upgrade track ends the horizon with more gold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "leader", content = "margin", rename_all = "snake_case")]
pub enum TrackComparison {
    /// SPM ahead by this much gold.
    SpmAhead(f64),
    /// Economy ahead by this much gold.
    EconomyAhead(f64),
    Even,
}

pub fn compare_totals(spm_total: f64, economy_total: f64) -> TrackComparison {
    if spm_total > economy_total {
        TrackComparison::SpmAhead(spm_total - economy_total)
    } else if spm_total < economy_total {
        TrackComparison::EconomyAhead(economy_total - spm_total)
    } else {
        TrackComparison::Even
    }
}
