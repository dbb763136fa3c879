//! Minute-stepped accrual engine shared by both upgrade tracks.
//!
//! Each minute: accrue gold, accrue experience, then check for at most one
//! level-up. A level-up resets experience and is recorded with the gold total
//! of the minute it happened in.

use chrono::{Duration, NaiveDateTime};
use gold_core::{
    economy_rate, validate_level, SimulationState, TrackKind, UpgradeCostTable, UpgradeEvent,
    ValidationError, GOLD_PER_SOLDIER, MAX_HORIZON_MINUTES,
};
use serde::Serialize;
use tracing::debug;

use crate::SimError;

/// How a track turns its level into gold.
pub trait TrackModel {
    fn kind(&self) -> TrackKind;

    fn costs(&self) -> UpgradeCostTable {
        UpgradeCostTable::for_track(self.kind())
    }

    /// Initial value of [`SimulationState::units_or_rate`] at `level`.
    fn initial_units(&self, level: u32) -> Result<f64, ValidationError>;

    /// Gold produced this minute on top of flat income. May update the
    /// accumulated units carried in `state`.
    fn minute_gold(&self, state: &mut SimulationState) -> f64;

    /// Apply a level-up from `from_level` that cost `cost` experience and
    /// return the event label.
    fn on_upgrade(
        &self,
        state: &mut SimulationState,
        from_level: u32,
        cost: f64,
    ) -> Result<String, ValidationError>;
}

/// SPM: every minute adds the current level's worth of soldiers, and gold
/// scales with the cumulative soldier count.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpmTrack;

impl TrackModel for SpmTrack {
    fn kind(&self) -> TrackKind {
        TrackKind::Spm
    }

    fn initial_units(&self, _level: u32) -> Result<f64, ValidationError> {
        Ok(0.0)
    }

    fn minute_gold(&self, state: &mut SimulationState) -> f64 {
        state.units_or_rate += state.level as f64;
        state.units_or_rate * GOLD_PER_SOLDIER
    }

    fn on_upgrade(
        &self,
        state: &mut SimulationState,
        _from_level: u32,
        _cost: f64,
    ) -> Result<String, ValidationError> {
        Ok(format!("Upgrade to {} SPM", state.level))
    }
}

/// Economy: a flat gold rate looked up from the level index.
#[derive(Clone, Copy, Debug, Default)]
pub struct EconomyTrack;

impl TrackModel for EconomyTrack {
    fn kind(&self) -> TrackKind {
        TrackKind::Economy
    }

    fn initial_units(&self, level: u32) -> Result<f64, ValidationError> {
        economy_rate(level)
    }

    fn minute_gold(&self, state: &mut SimulationState) -> f64 {
        state.units_or_rate
    }

    fn on_upgrade(
        &self,
        state: &mut SimulationState,
        from_level: u32,
        cost: f64,
    ) -> Result<String, ValidationError> {
        let rate = economy_rate(state.level)?;
        state.units_or_rate = rate;
        let paid = self.costs().cumulative_cost_to(state.level);
        Ok(format!(
            "Buy Upgrade #{}: New Econ Rate: {}, XP Cost: {}, Total Accumulated XP: {}",
            from_level + 1,
            rate,
            cost,
            paid
        ))
    }
}

/// Inputs of one track run.
#[derive(Clone, Debug)]
pub struct TrackParams {
    pub minute_count: u64,
    pub start_level: u32,
    /// The track never advances past this level.
    pub goal_level: u32,
    /// Flat gold per minute.
    pub income: f64,
    /// Experience gained per minute.
    pub experience_rate: f64,
    /// Instant of minute 0; event timestamps are offset from it.
    pub origin: NaiveDateTime,
}

/// Output of one track run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrackRun {
    pub kind: TrackKind,
    /// Cumulative gold after each minute, `series[m - 1]` for minute `m`.
    pub series: Vec<f64>,
    pub events: Vec<UpgradeEvent>,
    pub final_state: SimulationState,
}

impl TrackRun {
    /// Gold accumulated over the whole horizon.
    pub fn total(&self) -> Option<f64> {
        self.series.last().copied()
    }
}

/// Run `model` over `params.minute_count` minutes.
pub fn simulate<M: TrackModel>(model: &M, params: &TrackParams) -> Result<TrackRun, SimError> {
    let kind = model.kind();
    validate_level(kind, params.start_level)?;
    validate_level(kind, params.goal_level)?;
    if !(params.income.is_finite() && params.experience_rate.is_finite()) {
        return Err(ValidationError::NonFinite.into());
    }
    if params.minute_count > MAX_HORIZON_MINUTES {
        return Err(SimError::InvalidHorizon(format!(
            "{} minutes exceeds the {} minute limit",
            params.minute_count, MAX_HORIZON_MINUTES
        )));
    }

    let costs = model.costs();
    let mut state = SimulationState {
        level: params.start_level,
        experience: 0.0,
        gold: 0.0,
        units_or_rate: model.initial_units(params.start_level)?,
    };
    let mut series = Vec::with_capacity(params.minute_count as usize);
    let mut events = Vec::new();

    for minute in 1..=params.minute_count {
        state.gold += params.income + model.minute_gold(&mut state);
        state.experience += params.experience_rate;

        if state.level < params.goal_level {
            if let Some(cost) = costs.cost_from(state.level) {
                if state.experience >= cost {
                    let from_level = state.level;
                    state.level += 1;
                    state.experience = 0.0;
                    let label = model.on_upgrade(&mut state, from_level, cost)?;
                    debug!(track = %kind, minute, level = state.level, gold = state.gold, "upgrade");
                    events.push(UpgradeEvent {
                        minute_index: minute,
                        timestamp: params.origin + Duration::minutes(minute as i64),
                        cumulative_gold: state.gold,
                        new_level: state.level,
                        label,
                    });
                }
            }
        }
        series.push(state.gold);
    }

    Ok(TrackRun {
        kind,
        series,
        events,
        final_state: state,
    })
}

/// Run the track named by `kind`.
pub fn simulate_track(kind: TrackKind, params: &TrackParams) -> Result<TrackRun, SimError> {
    match kind {
        TrackKind::Spm => simulate(&SpmTrack, params),
        TrackKind::Economy => simulate(&EconomyTrack, params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn origin() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn params(minute_count: u64, start: u32, goal: u32, income: f64, xp: f64) -> TrackParams {
        TrackParams {
            minute_count,
            start_level: start,
            goal_level: goal,
            income,
            experience_rate: xp,
            origin: origin(),
        }
    }

    #[test]
    fn spm_first_upgrade_needs_150_minutes() {
        // 100 minutes is not enough to afford the first transition.
        let short = simulate_track(TrackKind::Spm, &params(100, 1, 2, 100.0, 1.0)).unwrap();
        assert!(short.events.is_empty());
        assert_eq!(short.final_state.level, 1);

        let run = simulate_track(TrackKind::Spm, &params(200, 1, 2, 100.0, 1.0)).unwrap();
        assert_eq!(run.events.len(), 1);
        let ev = &run.events[0];
        assert_eq!(ev.minute_index, 150);
        assert_eq!(ev.new_level, 2);
        assert_eq!(ev.label, "Upgrade to 2 SPM");
        assert_eq!(ev.cumulative_gold, run.series[149]);
        assert_eq!(ev.timestamp, origin() + Duration::minutes(150));
        assert_eq!(run.final_state.level, 2);
        // Goal reached: experience keeps accruing from the reset.
        assert_eq!(run.final_state.experience, 50.0);
    }

    #[test]
    fn spm_gold_scales_with_cumulative_soldiers() {
        let run = simulate_track(TrackKind::Spm, &params(3, 1, 1, 100.0, 1.0)).unwrap();
        // Soldiers 1, 2, 3 -> gold 102.6, 105.2, 107.8 per minute.
        let expected = [102.6, 102.6 + 105.2, 102.6 + 105.2 + 107.8];
        for (got, want) in run.series.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
    }

    #[test]
    fn spm_units_grow_faster_after_upgrade() {
        let run = simulate_track(TrackKind::Spm, &params(152, 1, 2, 0.0, 1.0)).unwrap();
        // Minutes 1..=150 add one soldier each, 151 and 152 add two.
        assert_eq!(run.final_state.units_or_rate, 154.0);
    }

    #[test]
    fn economy_first_upgrade_at_minute_75() {
        let run = simulate_track(TrackKind::Economy, &params(100, 0, 1, 0.0, 1.0)).unwrap();
        assert_eq!(run.events.len(), 1);
        let ev = &run.events[0];
        assert_eq!(ev.minute_index, 75);
        assert_eq!(
            ev.label,
            "Buy Upgrade #1: New Econ Rate: 200, XP Cost: 75, Total Accumulated XP: 75"
        );
        // The new rate applies from the next minute on.
        assert_eq!(ev.cumulative_gold, 0.0);
        assert_eq!(run.series[75], 200.0);
        assert_eq!(run.total(), Some(25.0 * 200.0));
    }

    #[test]
    fn economy_labels_accumulate_experience() {
        let run = simulate_track(TrackKind::Economy, &params(300, 0, 2, 0.0, 1.0)).unwrap();
        assert_eq!(run.events.len(), 2);
        assert_eq!(run.events[1].minute_index, 75 + 150);
        assert_eq!(
            run.events[1].label,
            "Buy Upgrade #2: New Econ Rate: 500, XP Cost: 150, Total Accumulated XP: 225"
        );
    }

    #[test]
    fn at_most_one_upgrade_per_minute() {
        // 10k experience a minute covers several transitions at once.
        let run = simulate_track(TrackKind::Economy, &params(5, 0, 12, 0.0, 10_000.0)).unwrap();
        let minutes: Vec<u64> = run.events.iter().map(|e| e.minute_index).collect();
        assert_eq!(minutes, vec![1, 2, 3, 4, 5]);
        assert_eq!(run.final_state.level, 5);
    }

    #[test]
    fn goal_at_start_means_no_events() {
        let run = simulate_track(TrackKind::Spm, &params(1000, 5, 5, 10.0, 5.0)).unwrap();
        assert!(run.events.is_empty());
        let run = simulate_track(TrackKind::Spm, &params(1000, 5, 3, 10.0, 5.0)).unwrap();
        assert!(run.events.is_empty());
    }

    #[test]
    fn zero_minutes_yields_empty_run() {
        let run = simulate_track(TrackKind::Economy, &params(0, 0, 12, 100.0, 1.0)).unwrap();
        assert!(run.series.is_empty());
        assert_eq!(run.total(), None);
    }

    #[test]
    fn out_of_range_levels_are_rejected() {
        let err = simulate_track(TrackKind::Economy, &params(10, 0, 13, 0.0, 1.0)).unwrap_err();
        assert!(matches!(
            err,
            SimError::Validation(ValidationError::LevelOutOfRange { level: 13, .. })
        ));
        let err = simulate_track(TrackKind::Spm, &params(10, 0, 2, 0.0, 1.0)).unwrap_err();
        assert!(matches!(
            err,
            SimError::Validation(ValidationError::LevelOutOfRange { level: 0, .. })
        ));
    }

    #[test]
    fn oversized_horizon_is_rejected() {
        let err = simulate_track(
            TrackKind::Spm,
            &params(MAX_HORIZON_MINUTES + 1, 1, 2, 0.0, 1.0),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::InvalidHorizon(_)));
    }

    fn kind_strategy() -> impl Strategy<Value = (TrackKind, u32, u32)> {
        prop_oneof![
            (1u32..=50, 1u32..=50).prop_map(|(s, g)| (TrackKind::Spm, s, g)),
            (0u32..=12, 0u32..=12).prop_map(|(s, g)| (TrackKind::Economy, s, g)),
        ]
    }

    proptest! {
        #[test]
        fn series_is_non_decreasing_with_exact_length(
            (kind, start, goal) in kind_strategy(),
            minutes in 0u64..3000,
            income in 0.0f64..10_000.0,
            xp in 0.0f64..500.0,
        ) {
            let run = simulate_track(kind, &params(minutes, start, goal, income, xp)).unwrap();
            prop_assert_eq!(run.series.len() as u64, minutes);
            for w in run.series.windows(2) {
                prop_assert!(w[1] >= w[0]);
            }
        }

        #[test]
        fn events_are_ordered_and_bounded_by_goal(
            (kind, start, goal) in kind_strategy(),
            minutes in 0u64..3000,
            xp in 0.0f64..500.0,
        ) {
            let run = simulate_track(kind, &params(minutes, start, goal, 50.0, xp)).unwrap();
            for w in run.events.windows(2) {
                prop_assert!(w[1].minute_index > w[0].minute_index);
                prop_assert_eq!(w[1].new_level, w[0].new_level + 1);
            }
            for ev in &run.events {
                prop_assert!(ev.new_level <= goal);
            }
            prop_assert!(run.final_state.level <= start.max(goal));
        }

        #[test]
        fn identical_inputs_give_identical_runs(
            (kind, start, goal) in kind_strategy(),
            minutes in 0u64..2000,
            xp in 0.0f64..100.0,
        ) {
            let p = params(minutes, start, goal, 100.0, xp);
            let a = simulate_track(kind, &p).unwrap();
            let b = simulate_track(kind, &p).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
