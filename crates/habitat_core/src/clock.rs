//! The simulation clock: owns the world and advances it one tick at a time.
//!
//! A tick runs to completion before control returns to the caller, so a
//! driver can only ever observe whole-tick states. Within a tick animals act
//! in population order and every move is visible to the animals after them.

use crate::animal::Animal;
use crate::behavior::{advance_animal, Disposition, TickContext};
use crate::config::AppConfig;
use crate::disease::Disease;
use crate::error::{Result, SimError};
use crate::events::{SimEvent, TickReport};
use crate::landscape::Landscape;
use crate::metrics::Metrics;
use crate::population::Population;
use crate::snapshot::{PopulationSummary, WorldSnapshot};
use habitat_data::{AnimalId, Coord, DeathCause, Direction, DiseaseKind, Gender, SpeciesKind};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

pub struct SimulationClock {
    config: AppConfig,
    landscape: Landscape,
    population: Population,
    rng: ChaCha8Rng,
    seed: u64,
    tick: u64,
    metrics: Metrics,
    controlled: Option<AnimalId>,
}

impl SimulationClock {
    /// Builds a world from `config`: generated terrain plus the configured
    /// initial spawn. Without a configured seed one is drawn from the OS.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let seed = config.world.seed.unwrap_or_else(rand::random);
        let landscape = Landscape::generate(
            config.world.width,
            config.world.height,
            seed,
            config.world.density_cap,
            config.world.water_level,
            config.world.forest_level,
            config.ecology.resource_max,
        );
        let mut clock = Self::with_landscape(config, landscape, seed)?;
        clock.populate();
        tracing::info!(
            seed,
            population = clock.population.len(),
            fingerprint = %clock.config.fingerprint(),
            "World created"
        );
        Ok(clock)
    }

    /// An empty world over a prepared landscape. `config` is validated the
    /// same way [`SimulationClock::new`] does.
    pub fn with_landscape(config: AppConfig, landscape: Landscape, seed: u64) -> anyhow::Result<Self> {
        config.validate()?;
        let metrics = Metrics::new(config.world.log_interval);
        Ok(Self {
            config,
            landscape,
            population: Population::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            tick: 0,
            metrics,
            controlled: None,
        })
    }

    fn populate(&mut self) {
        let rules = self.config.world.spawns.clone();
        for rule in rules {
            let Some(species) = self.config.species_for(rule.species).copied() else {
                continue;
            };
            for _ in 0..rule.count {
                let Some(at) = self.random_free_cell(|g| species.can_enter(g)) else {
                    tracing::warn!(species = %rule.species, "No room left for initial spawn");
                    break;
                };
                let animal = Animal::spawn(species, &mut self.rng);
                let mature = animal.maturity_age(&self.config.behavior);
                let age = self.rng.gen_range(mature..=mature.max(animal.lifespan() / 2));
                let animal = animal.with_age(age);
                if let Err(err) = self.admit(animal, at) {
                    tracing::warn!(%err, "Initial spawn rejected");
                }
            }
        }
    }

    fn random_free_cell<F>(&mut self, can_enter: F) -> Option<Coord>
    where
        F: Fn(habitat_data::GroundType) -> bool,
    {
        let fits = |land: &Landscape, c: Coord| {
            land.has_room(c) && land.ground_at(c).is_some_and(&can_enter)
        };
        for _ in 0..64 {
            let c = Coord::new(
                self.rng.gen_range(0..self.landscape.width()),
                self.rng.gen_range(0..self.landscape.height()),
            );
            if fits(&self.landscape, c) {
                return Some(c);
            }
        }
        let free: Vec<Coord> = self
            .landscape
            .cells()
            .map(|(c, _)| c)
            .filter(|c| fits(&self.landscape, *c))
            .collect();
        free.choose(&mut self.rng).copied()
    }

    /// Places `animal` at `at` and adds it to the end of the update order.
    fn admit(&mut self, mut animal: Animal, at: Coord) -> Result<AnimalId> {
        if self.population.get(animal.id()).is_some() {
            return Err(SimError::invalid_input(format!(
                "animal {} is already registered",
                animal.id()
            )));
        }
        self.landscape.place(&mut animal, at)?;
        let id = animal.id();
        self.population.insert(animal)?;
        Ok(id)
    }

    /// Adds a mature animal of `kind` at `at`.
    pub fn spawn(&mut self, kind: SpeciesKind, at: Coord, gender: Gender) -> Result<AnimalId> {
        let species = self
            .config
            .species_for(kind)
            .copied()
            .ok_or_else(|| SimError::invalid_input(format!("no descriptor for {kind}")))?;
        let animal = Animal::new(AnimalId::from_bits(self.rng.gen()), species, gender);
        let mature = animal.maturity_age(&self.config.behavior);
        self.admit(animal.with_age(mature), at)
    }

    /// Adds a fully built animal at `at`.
    pub fn insert(&mut self, animal: Animal, at: Coord) -> Result<AnimalId> {
        self.admit(animal, at)
    }

    /// Advances the world by exactly one step.
    pub fn tick(&mut self) -> TickReport {
        let started = Instant::now();
        self.tick += 1;
        let mut events = Vec::new();

        self.landscape.regrow(self.config.ecology.regrowth);
        self.roll_outbreak(&mut events);

        // newborns join after everyone has acted
        let count = self.population.len();
        let mut newborns = Vec::new();
        for idx in 0..count {
            let mut ctx = TickContext {
                config: &self.config,
                landscape: &mut self.landscape,
                population: &mut self.population,
                rng: &mut self.rng,
                events: &mut events,
            };
            if let Disposition::GaveBirth(child) = advance_animal(&mut ctx, idx) {
                newborns.push(*child);
            }
        }

        for mut dead in self.population.drain_dead() {
            dead.settle_death();
            self.landscape.remove(dead.id(), dead.position());
            if self.controlled == Some(dead.id()) {
                self.controlled = None;
            }
            let cause = dead.cause_of_death().unwrap_or(DeathCause::Injury);
            tracing::debug!(id = %dead.id(), species = %dead.kind(), ?cause, "Removed dead animal");
            events.push(SimEvent::Died {
                id: dead.id(),
                species: dead.kind(),
                cause,
                age: dead.age(),
            });
        }

        for child in newborns {
            self.place_newborn(child, &mut events);
        }

        let report = TickReport {
            tick: self.tick,
            events,
            population: self.population.len(),
        };
        self.metrics.record_tick(&report, started.elapsed());
        debug_assert!(self.check_consistency(), "occupancy registry out of sync");
        report
    }

    /// Registers a newborn in its parents' cell, or the nearest free cell it
    /// can stand on when that one filled up during the tick.
    fn place_newborn(&mut self, child: Animal, events: &mut Vec<SimEvent>) -> Option<AnimalId> {
        let origin = child.position();
        let species = *child.species();
        let radius = species.detection_radius;
        let land = &self.landscape;
        let spot = land.nearest_of_kind(
            origin,
            |c, t| species.can_enter(t.ground()) && land.has_room(c),
            radius,
        );
        let Some(at) = spot else {
            tracing::warn!(parent_cell = %origin, species = %species.kind, "No room for newborn");
            return None;
        };
        let parents = child.parents();
        let kind = child.kind();
        match self.admit(child, at) {
            Ok(id) => {
                tracing::debug!(%id, species = %kind, %at, "Born");
                events.push(SimEvent::Born {
                    id,
                    species: kind,
                    parents,
                    at,
                });
                Some(id)
            }
            Err(err) => {
                tracing::warn!(%err, "Newborn rejected");
                None
            }
        }
    }

    /// With probability `outbreak_chance`, one random live animal catches a
    /// random disease it can host.
    fn roll_outbreak(&mut self, events: &mut Vec<SimEvent>) {
        let chance = self.config.ecology.outbreak_chance;
        if chance <= 0.0 || self.population.is_empty() || !self.rng.gen_bool(chance) {
            return;
        }
        let idx = self.rng.gen_range(0..self.population.len());
        let Some(animal) = self.population.at_mut(idx) else {
            return;
        };
        let options: Vec<DiseaseKind> = DiseaseKind::ALL
            .into_iter()
            .filter(|k| animal.is_susceptible(*k))
            .collect();
        let Some(kind) = options.choose(&mut self.rng).copied() else {
            return;
        };
        if animal.infect(Disease::new(kind)) {
            self.metrics.increment_counter("outbreak");
            tracing::debug!(id = %animal.id(), disease = %kind, "Outbreak");
            events.push(SimEvent::Infected {
                id: animal.id(),
                disease: kind,
            });
        }
    }

    /// One mating attempt outside the normal tick, e.g. from a driver or test.
    /// Returns the registered offspring.
    pub fn try_mate(&mut self, a: AnimalId, b: AnimalId) -> Result<AnimalId> {
        if a == b {
            return Err(SimError::invalid_input("an animal cannot mate with itself"));
        }
        let i = self.population.index_of(a).ok_or(SimError::UnknownAnimal(a))?;
        let j = self.population.index_of(b).ok_or(SimError::UnknownAnimal(b))?;
        let (pa, pb) = self
            .population
            .pair_mut(i, j)
            .ok_or(SimError::UnknownAnimal(b))?;
        let child = pa.try_mate(pb, &self.landscape, &self.config.behavior, &mut self.rng)?;
        let at = child.position();
        let id = self.admit(child, at)?;
        tracing::debug!(%id, parents = ?(a, b), "Born outside tick");
        Ok(id)
    }

    /// [`SimulationClock::try_mate`] with the reason dropped.
    pub fn mate_pair(&mut self, a: AnimalId, b: AnimalId) -> Option<AnimalId> {
        self.try_mate(a, b).ok()
    }

    /// Takes an animal out of the world immediately.
    pub fn remove_animal(&mut self, id: AnimalId) -> Result<Animal> {
        let mut animal = self.population.remove(id).ok_or(SimError::UnknownAnimal(id))?;
        self.landscape.remove(id, animal.position());
        if self.controlled == Some(id) {
            self.controlled = None;
        }
        animal.set_controlled(false);
        if animal.is_alive() {
            animal.kill(DeathCause::Removed);
        }
        tracing::debug!(%id, "Removed by driver");
        Ok(animal)
    }

    /// Hands `id` to the player. Any previously controlled animal is released.
    pub fn set_controlled(&mut self, id: AnimalId) -> Result<()> {
        match self.population.get(id) {
            Some(a) if a.is_alive() => {}
            _ => return Err(SimError::UnknownAnimal(id)),
        }
        self.release_control();
        if let Some(animal) = self.population.get_mut(id) {
            animal.set_controlled(true);
        }
        self.controlled = Some(id);
        Ok(())
    }

    pub fn release_control(&mut self) -> Option<AnimalId> {
        let id = self.controlled.take()?;
        if let Some(animal) = self.population.get_mut(id) {
            animal.set_controlled(false);
        }
        Some(id)
    }

    pub fn controlled(&self) -> Option<AnimalId> {
        self.controlled
    }

    /// Moves the controlled animal one cell right away.
    pub fn steer(&mut self, direction: Direction) -> Result<Coord> {
        let id = self.controlled.ok_or(SimError::NotControlled)?;
        let animal = self
            .population
            .get_mut(id)
            .ok_or(SimError::UnknownAnimal(id))?;
        if !animal.is_alive() {
            return Err(SimError::UnknownAnimal(id));
        }
        let from = animal.position();
        let to = from
            .step(direction)
            .filter(|c| self.landscape.cell(*c).is_some())
            .ok_or(SimError::LeavesLandscape { from, direction })?;
        self.landscape.move_occupant(animal, to)?;
        tracing::trace!(%id, %from, %to, "Steered");
        Ok(to)
    }

    /// [`SimulationClock::steer`] from a driver's `up`/`down`/`left`/`right`.
    pub fn steer_intent(&mut self, intent: &str) -> Result<Coord> {
        let direction = Direction::from_intent(intent)
            .ok_or_else(|| SimError::invalid_input(format!("unknown direction '{intent}'")))?;
        self.steer(direction)
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn landscape(&self) -> &Landscape {
        &self.landscape
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn animal(&self, id: AnimalId) -> Option<&Animal> {
        self.population.get(id)
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self.tick, &self.landscape, &self.population)
    }

    pub fn summary(&self) -> PopulationSummary {
        PopulationSummary::capture(self.tick, &self.landscape, &self.population)
    }

    /// True when every animal is registered exactly once, in its own cell.
    pub fn check_consistency(&self) -> bool {
        self.landscape.is_consistent_with(self.population.iter())
    }
}
