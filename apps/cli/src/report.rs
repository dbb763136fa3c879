//! Text rendering of a scenario report.

use gold_sim::{ScenarioReport, TrackComparison, TrackRun};
use std::fmt::Write;

/// Format gold with thousands separators and two decimals, e.g. `1,234.56`.
pub fn format_gold(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

pub fn comparison_sentence(c: &TrackComparison) -> String {
    match c {
        TrackComparison::SpmAhead(diff) => {
            format!("SPM results in higher income by {} gold.", format_gold(*diff))
        }
        TrackComparison::EconomyAhead(diff) => format!(
            "Economy results in higher income by {} gold.",
            format_gold(*diff)
        ),
        TrackComparison::Even => "Both SPM and Economy result in the same income.".to_string(),
    }
}

fn write_events(out: &mut String, run: &TrackRun) {
    for ev in &run.events {
        let _ = writeln!(
            out,
            "  {}  {}  (gold {})",
            ev.timestamp.format("%Y-%m-%d %H:%M"),
            ev.label,
            format_gold(ev.cumulative_gold)
        );
    }
}

/// Render `report` as plain text. With `events`, every upgrade is listed.
pub fn render_text(report: &ScenarioReport, events: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Horizon: {} minutes from {}",
        report.minute_count,
        report.origin.format("%Y-%m-%d %H:%M")
    );
    let _ = writeln!(
        out,
        "SPM Total Accumulated Gold: {} ({} upgrades)",
        format_gold(report.spm_total()),
        report.spm.events.len()
    );
    if events {
        write_events(&mut out, &report.spm);
    }
    let _ = writeln!(
        out,
        "Economy Total Accumulated Gold: {} ({} upgrades)",
        format_gold(report.economy_total()),
        report.economy.events.len()
    );
    if events {
        write_events(&mut out, &report.economy);
    }
    let _ = writeln!(out, "{}", comparison_sentence(&report.comparison));
    if let (Some(b), Some(c)) = (report.baseline.last(), report.combined.last()) {
        let _ = writeln!(
            out,
            "Current levels only: {} | with current economy: {}",
            format_gold(*b),
            format_gold(*c)
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Early Game");
    for step in &report.early_game.steps {
        let _ = writeln!(out, "  {}", step.description);
    }
    out
}
