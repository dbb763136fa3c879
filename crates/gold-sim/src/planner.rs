//! Greedy early-game planner racing to the top experience-rate tier.
//!
//! Each iteration recomputes the gold rate, buys the next SPM level and then
//! the next economy level (waiting for the experience each needs, earning gold
//! meanwhile), and finally buys the next tier if the gold is there. Only tier
//! purchases are reported as steps; track purchases change state silently.

use gold_core::{
    economy_rate, tier_cost_from, validate_planner, PlannerConfig, PlannerState,
    UpgradeCostTable, GOLD_PER_SOLDIER,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::SimError;

/// One reported purchase of an experience-rate tier.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlanStep {
    /// Tier reached by this purchase.
    pub tier: u32,
    /// Gold paid.
    pub cost: f64,
    /// Minutes of play since the start of the plan.
    pub elapsed_minutes: f64,
    pub description: String,
}

/// Why the planner stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The target tier was bought.
    TargetReached,
    /// An iteration left the state unchanged.
    FixedPoint,
    /// `max_iterations` ran out first.
    IterationCap,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EarlyGamePlan {
    pub steps: Vec<PlanStep>,
    pub final_state: PlannerState,
    pub iterations: u32,
    pub termination: Termination,
}

impl EarlyGamePlan {
    /// Step descriptions in purchase order.
    pub fn descriptions(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.description.clone()).collect()
    }
}

/// Wait until the experience needed to leave `level` is banked, spend it,
/// and return the next level. `None` at the top of the ladder.
fn buy_track_level(
    state: &mut PlannerState,
    level: u32,
    costs: &UpgradeCostTable,
    gold_rate: f64,
) -> Option<u32> {
    let cost = costs.cost_from(level)?;
    let wait = ((cost - state.experience) / state.tier as f64).max(0.0);
    state.gold += gold_rate * wait;
    state.elapsed_minutes += wait;
    state.experience = 0.0;
    Some(level + 1)
}

/// Plan the early game from `config`'s bootstrap resources.
pub fn plan_early_game(config: &PlannerConfig) -> Result<EarlyGamePlan, SimError> {
    validate_planner(config)?;
    let spm_costs = UpgradeCostTable::spm();
    let econ_costs = UpgradeCostTable::economy();

    let mut state = PlannerState {
        spm_level: config.starting_spm,
        econ_level: config.starting_econ,
        gold: config.starting_gold,
        experience: 0.0,
        tier: config.starting_tier,
        elapsed_minutes: 0.0,
    };
    let mut steps = Vec::new();
    let mut iterations = 0;

    let termination = loop {
        if state.tier >= config.target_tier {
            break Termination::TargetReached;
        }
        if iterations >= config.max_iterations {
            break Termination::IterationCap;
        }
        iterations += 1;
        let before = state.clone();
        let gold_rate =
            state.spm_level as f64 * GOLD_PER_SOLDIER + economy_rate(state.econ_level)?;

        let mut track_moved = false;
        let spm_level = state.spm_level;
        if let Some(next) = buy_track_level(&mut state, spm_level, &spm_costs, gold_rate) {
            state.spm_level = next;
            track_moved = true;
        }
        let econ_level = state.econ_level;
        if let Some(next) = buy_track_level(&mut state, econ_level, &econ_costs, gold_rate) {
            state.econ_level = next;
            track_moved = true;
        }

        if let Some(cost) = tier_cost_from(state.tier) {
            if config.wait_for_gold && !track_moved && state.gold < cost && gold_rate > 0.0 {
                state.elapsed_minutes += (cost - state.gold) / gold_rate;
                state.gold = cost;
            }
            if state.gold >= cost {
                let tier = state.tier + 1;
                state.tier = tier;
                state.gold -= cost;
                debug!(tier, cost, elapsed = state.elapsed_minutes, "tier purchase");
                steps.push(PlanStep {
                    tier,
                    cost,
                    elapsed_minutes: state.elapsed_minutes,
                    description: format!("Get XP/minute upgrade {tier} (Cost: {cost} Gold)"),
                });
            }
        }

        if state == before {
            warn!(iterations, tier = state.tier, "planner reached a fixed point");
            break Termination::FixedPoint;
        }
    };

    info!(
        iterations,
        steps = steps.len(),
        ?termination,
        "early-game plan finished"
    );
    Ok(EarlyGamePlan {
        steps,
        final_state: state,
        iterations,
        termination,
    })
}
