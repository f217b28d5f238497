//! Terminal-free driver loop.
//!
//! Ticks a [`SimulationClock`] a fixed number of times, printing a population
//! summary every `report_every` ticks either as a text line or as one JSON
//! object per line.

use habitat_core::snapshot::PopulationSummary;
use habitat_core::SimulationClock;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    pub ticks: u64,
    /// 0 disables periodic reports.
    pub report_every: u64,
    pub json: bool,
    /// Stop early once every animal is dead.
    pub stop_when_extinct: bool,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            ticks: 1000,
            report_every: 100,
            json: false,
            stop_when_extinct: true,
        }
    }
}

/// Totals of a finished headless run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub seed: u64,
    pub ticks_run: u64,
    pub births: u64,
    pub deaths: u64,
    pub kills: u64,
    pub final_population: usize,
}

pub fn run<W: Write>(
    clock: &mut SimulationClock,
    options: &HeadlessOptions,
    out: &mut W,
) -> anyhow::Result<RunTotals> {
    let mut births = 0u64;
    let mut deaths = 0u64;
    let mut kills = 0u64;
    let mut ticks_run = 0;

    for _ in 0..options.ticks {
        let report = clock.tick();
        ticks_run += 1;
        births += report.births() as u64;
        deaths += report.deaths() as u64;
        kills += report.kills().count() as u64;

        if options.report_every > 0 && report.tick % options.report_every == 0 {
            write_summary(&clock.summary(), options.json, out)?;
        }
        if options.stop_when_extinct && report.population == 0 {
            tracing::info!(tick = report.tick, "Population extinct, stopping");
            break;
        }
    }

    Ok(RunTotals {
        seed: clock.seed(),
        ticks_run,
        births,
        deaths,
        kills,
        final_population: clock.population().len(),
    })
}

pub fn write_summary<W: Write>(
    summary: &PopulationSummary,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, summary)?;
        writeln!(out)?;
    } else {
        let species: Vec<String> = summary
            .by_species
            .iter()
            .map(|(kind, n)| format!("{kind}={n}"))
            .collect();
        writeln!(
            out,
            "tick {:>6} | alive {:>4} | {} | health {:.1} hunger {:.1} thirst {:.1} | sick {}",
            summary.tick,
            summary.total,
            species.join(" "),
            summary.mean_health,
            summary.mean_hunger,
            summary.mean_thirst,
            summary.infected
        )?;
    }
    Ok(())
}
