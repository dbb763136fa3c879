#![deny(warnings)]

//! Headless CLI: load a scenario, run every projection, print the report.

mod report;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDateTime, NaiveTime};
use gold_core::{parse_date, PlannerConfig, ScenarioConfig};
use serde::Deserialize;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// On-disk scenario file. Both sections are optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScenarioFile {
    scenario: ScenarioConfig,
    planner: PlannerConfig,
}

#[derive(Debug, Default)]
struct Args {
    scenario: Option<String>,
    today: Option<String>,
    json: bool,
    events: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => args.scenario = it.next(),
            "--today" => args.today = it.next(),
            "--format" => match it.next().as_deref() {
                Some("json") => args.json = true,
                Some("text") => args.json = false,
                other => bail!("unknown format: {other:?} (expected text or json)"),
            },
            "--events" => args.events = true,
            _ => {}
        }
    }
    Ok(args)
}

fn load_scenario(path: &Path) -> Result<ScenarioFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    let file: ScenarioFile = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing scenario {}", path.display()))?;
    Ok(file)
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    info!(?args, "starting CLI");

    let file = match &args.scenario {
        Some(path) => load_scenario(Path::new(path))?,
        None => ScenarioFile::default(),
    };
    let now: NaiveDateTime = match &args.today {
        Some(text) => parse_date(text)?.and_time(NaiveTime::MIN),
        None => chrono::Local::now().naive_local(),
    };

    let report = gold_sim::plan_scenario(&file.scenario, &file.planner, now)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report::render_text(&report, args.events));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn bundled_scenario_parses() {
        let path =
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/scenarios/default.yaml");
        let file = load_scenario(&path).unwrap();
        assert_eq!(file.scenario.income, 100.0);
        assert_eq!(file.scenario.goal_economy, 4_768_400);
        assert_eq!(file.scenario.end_condition, "end_date");
        assert_eq!(file.planner.starting_gold, 50_000.0);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let file: ScenarioFile = serde_yaml::from_str("scenario:\n  income: 250\n").unwrap();
        assert_eq!(file.scenario.income, 250.0);
        assert_eq!(file.scenario.goal_spm, 50);
        assert_eq!(file.planner.max_iterations, 1000);
    }

    #[test]
    fn target_gold_yaml() {
        let yaml = "scenario:\n  end_condition: target_gold\n  target_gold: 5000000\n";
        let file: ScenarioFile = serde_yaml::from_str(yaml).unwrap();
        let now = parse_date("2024-01-01").unwrap().and_time(NaiveTime::MIN);
        let report = gold_sim::plan_scenario(&file.scenario, &file.planner, now).unwrap();
        assert!(report.minute_count > 0);
        assert!(report.baseline.last().copied().unwrap_or_default() > 0.0);
    }
}
