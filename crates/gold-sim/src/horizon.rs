//! Converts an end condition into a concrete number of simulated minutes.

use chrono::NaiveDate;
use gold_core::{
    HorizonSpec, ValidationError, GOLD_PER_SOLDIER, MAX_HORIZON_MINUTES, MINUTES_PER_DAY,
};
use tracing::info;

use crate::SimError;

/// Resolve `spec` to a minute count.
///
/// `EndDate` counts whole calendar days from `today` (never negative).
/// `TargetGold` steps the proxy projection `income + spm * 2.6 * m` minute by
/// minute until it reaches the target. The proxy ignores upgrades.
pub fn resolve_horizon(
    spec: &HorizonSpec,
    today: NaiveDate,
    income: f64,
    spm_level: u32,
) -> Result<u64, SimError> {
    let minutes = match spec {
        HorizonSpec::EndDate { date } => {
            let days = date.signed_duration_since(today).num_days().max(0) as u64;
            let minutes = days.saturating_mul(MINUTES_PER_DAY);
            if minutes > MAX_HORIZON_MINUTES {
                return Err(SimError::InvalidHorizon(format!(
                    "end date {date} is more than {} days away",
                    MAX_HORIZON_MINUTES / MINUTES_PER_DAY
                )));
            }
            minutes
        }
        HorizonSpec::TargetGold { amount } => minutes_to_target(*amount, income, spm_level)?,
    };
    info!(?spec, minutes, "resolved horizon");
    Ok(minutes)
}

fn minutes_to_target(target: f64, income: f64, spm_level: u32) -> Result<u64, SimError> {
    if !(target.is_finite() && income.is_finite()) {
        return Err(ValidationError::NonFinite.into());
    }
    if target <= 0.0 {
        return Ok(0);
    }
    if income <= 0.0 && spm_level == 0 {
        return Err(SimError::InvalidHorizon(
            "gold never grows with no income and no soldiers".to_string(),
        ));
    }
    let per_minute_growth = spm_level as f64 * GOLD_PER_SOLDIER;
    let mut minutes: u64 = 0;
    let mut gold = 0.0;
    while gold < target {
        minutes += 1;
        if minutes > MAX_HORIZON_MINUTES {
            return Err(SimError::InvalidHorizon(format!(
                "target of {target} gold is not reached within {MAX_HORIZON_MINUTES} minutes"
            )));
        }
        gold += income + per_minute_growth * minutes as f64;
    }
    Ok(minutes)
}
