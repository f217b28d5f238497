//! Run statistics and logging setup.
//!
//! The clock feeds every finished tick into [`Metrics`], which keeps running
//! totals and emits an `info` summary every `log_interval` ticks.

use crate::events::{SimEvent, TickReport};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Running totals for one simulation.
#[derive(Debug, Clone)]
pub struct Metrics {
    tick_count: u64,
    population: usize,
    births: u64,
    deaths: u64,
    kills: u64,
    infections: u64,
    counters: BTreeMap<String, u64>,
    log_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Metrics {
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            tick_count: 0,
            population: 0,
            births: 0,
            deaths: 0,
            kills: 0,
            infections: 0,
            counters: BTreeMap::new(),
            log_interval,
            start_time: Instant::now(),
        }
    }

    /// Folds a finished tick into the totals.
    pub fn record_tick(&mut self, report: &TickReport, duration: Duration) {
        self.tick_count = report.tick;
        self.population = report.population;
        for event in &report.events {
            match event {
                SimEvent::Born { .. } => self.births += 1,
                SimEvent::Died { cause, .. } => {
                    self.deaths += 1;
                    self.increment_counter(&format!("death.{cause:?}"));
                }
                SimEvent::Killed { .. } => self.kills += 1,
                SimEvent::Infected { .. } => self.infections += 1,
                _ => {}
            }
        }

        if self.log_interval > 0 && self.tick_count % self.log_interval == 0 {
            tracing::info!(
                tick = self.tick_count,
                population = self.population,
                births = self.births,
                deaths = self.deaths,
                kills = self.kills,
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    pub fn increment_counter(&mut self, name: &str) {
        *self.counters.entry(name.to_string()).or_insert(0) += 1;
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn population(&self) -> usize {
        self.population
    }

    #[must_use]
    pub fn births(&self) -> u64 {
        self.births
    }

    #[must_use]
    pub fn deaths(&self) -> u64 {
        self.deaths
    }

    #[must_use]
    pub fn kills(&self) -> u64 {
        self.kills
    }

    #[must_use]
    pub fn infections(&self) -> u64 {
        self.infections
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Installs a global `fmt` subscriber. `RUST_LOG` wins over `level` when set.
/// Later calls are no-ops.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use habitat_data::{AnimalId, Coord, DeathCause, SpeciesKind};

    fn report(tick: u64, events: Vec<SimEvent>) -> TickReport {
        TickReport {
            tick,
            events,
            population: 3,
        }
    }

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::default();
        assert_eq!(metrics.tick_count(), 0);
        assert_eq!(metrics.births(), 0);
    }

    #[test]
    fn test_record_tick_totals() {
        let mut metrics = Metrics::new(0);
        let id = AnimalId::from_bits(1);
        metrics.record_tick(
            &report(
                1,
                vec![
                    SimEvent::Born {
                        id,
                        species: SpeciesKind::Deer,
                        parents: None,
                        at: Coord::new(0, 0),
                    },
                    SimEvent::Died {
                        id,
                        species: SpeciesKind::Deer,
                        cause: DeathCause::OldAge,
                        age: 701,
                    },
                ],
            ),
            Duration::from_millis(1),
        );
        assert_eq!(metrics.tick_count(), 1);
        assert_eq!(metrics.population(), 3);
        assert_eq!(metrics.births(), 1);
        assert_eq!(metrics.deaths(), 1);
        assert_eq!(metrics.counter("death.OldAge"), 1);
    }

    #[test]
    fn test_counters() {
        let mut metrics = Metrics::default();
        metrics.increment_counter("outbreak");
        metrics.increment_counter("outbreak");
        assert_eq!(metrics.counter("outbreak"), 2);
        assert_eq!(metrics.counter("missing"), 0);
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging("warn");
        init_logging("debug");
    }
}
