//! The animal entity and its behavior contract.
//!
//! One `Animal` type serves every species. What an individual may do is read
//! from its [`SpeciesDescriptor`]: herbivores graze, carnivores chase, strike
//! and feed on prey, omnivores do both. Calls that need a capability the
//! species lacks fail with [`SimError::MissingCapability`].
//!
//! Movement always goes through [`Landscape::move_occupant`], which keeps the
//! occupancy registry and `position` in step.

use crate::config::{BehaviorConfig, MetabolismConfig};
use crate::disease::Disease;
use crate::error::{MateRejection, Result, SimError};
use crate::landscape::{GroundType, Landscape};
use crate::species::SpeciesDescriptor;
use crate::stats::StatModel;
use habitat_data::{
    AnimalId, AppearanceHandle, Capability, Coord, DeathCause, DiseaseKind, Gender, SpeciesKind,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

/// What an animal did with its last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Activity {
    #[default]
    Idle,
    /// Drinking or heading for water.
    Surviving,
    Fleeing,
    Hunting,
    Feeding,
    SeekingMate,
    /// Moved by the player instead of deciding for itself.
    Controlled,
    Dead,
}

#[derive(Debug, Clone)]
pub struct Animal {
    id: AnimalId,
    species: SpeciesDescriptor,
    gender: Gender,
    stats: StatModel,
    diseases: BTreeMap<DiseaseKind, Disease>,
    immunities: BTreeSet<DiseaseKind>,
    /// Mirror of the landscape registry; written only by `Landscape`.
    position: Coord,
    controlled: bool,
    appearance: AppearanceHandle,
    mating_cooldown: u32,
    generation: u32,
    parents: Option<(AnimalId, AnimalId)>,
    cause_of_death: Option<DeathCause>,
    activity: Activity,
}

impl Animal {
    /// A newborn-state animal of `species`. Stats start full; size, speed and
    /// lifespan come from the descriptor.
    #[must_use]
    pub fn new(id: AnimalId, species: SpeciesDescriptor, gender: Gender) -> Self {
        Self {
            id,
            stats: StatModel::new(species.size, species.speed, species.lifespan),
            appearance: AppearanceHandle::new(species.kind.name().to_lowercase()),
            species,
            gender,
            diseases: BTreeMap::new(),
            immunities: BTreeSet::new(),
            position: Coord::default(),
            controlled: false,
            mating_cooldown: 0,
            generation: 0,
            parents: None,
            cause_of_death: None,
            activity: Activity::Idle,
        }
    }

    /// Like [`Animal::new`] with the id and gender drawn from `rng`.
    pub fn spawn<R: Rng>(species: SpeciesDescriptor, rng: &mut R) -> Self {
        let gender = if rng.gen_bool(0.5) {
            Gender::Female
        } else {
            Gender::Male
        };
        Self::new(AnimalId::from_bits(rng.gen()), species, gender)
    }

    #[must_use]
    pub fn with_stats(mut self, stats: StatModel) -> Self {
        self.stats = stats;
        self
    }

    #[must_use]
    pub fn with_age(mut self, age: u32) -> Self {
        self.stats = self.stats.with_age(age);
        self
    }

    #[must_use]
    pub fn with_levels(mut self, health: i32, hunger: i32, thirst: i32) -> Self {
        self.stats = self.stats.with_levels(health, hunger, thirst);
        self
    }

    pub fn id(&self) -> AnimalId {
        self.id
    }

    pub fn kind(&self) -> SpeciesKind {
        self.species.kind
    }

    pub fn species(&self) -> &SpeciesDescriptor {
        &self.species
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn stats(&self) -> &StatModel {
        &self.stats
    }

    pub fn health(&self) -> i32 {
        self.stats.health()
    }

    pub fn hunger(&self) -> i32 {
        self.stats.hunger()
    }

    pub fn thirst(&self) -> i32 {
        self.stats.thirst()
    }

    pub fn size(&self) -> u32 {
        self.stats.size()
    }

    pub fn speed(&self) -> u32 {
        self.stats.speed()
    }

    pub fn lifespan(&self) -> u32 {
        self.stats.lifespan()
    }

    pub fn age(&self) -> u32 {
        self.stats.age()
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub(crate) fn set_position(&mut self, at: Coord) {
        self.position = at;
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    pub(crate) fn set_controlled(&mut self, controlled: bool) {
        self.controlled = controlled;
    }

    pub fn appearance(&self) -> &AppearanceHandle {
        &self.appearance
    }

    /// Swaps the presentation key. The engine never reads it.
    pub fn set_appearance(&mut self, appearance: AppearanceHandle) {
        self.appearance = appearance;
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn parents(&self) -> Option<(AnimalId, AnimalId)> {
        self.parents
    }

    pub fn mating_cooldown(&self) -> u32 {
        self.mating_cooldown
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub(crate) fn set_activity(&mut self, activity: Activity) {
        self.activity = activity;
    }

    pub fn cause_of_death(&self) -> Option<DeathCause> {
        self.cause_of_death
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.species.has(capability)
    }

    pub fn diseases(&self) -> impl Iterator<Item = &Disease> + '_ {
        self.diseases.values()
    }

    pub fn disease(&self, kind: DiseaseKind) -> Option<&Disease> {
        self.diseases.get(&kind)
    }

    pub fn carries(&self, kind: DiseaseKind) -> bool {
        self.diseases.contains_key(&kind)
    }

    pub fn is_immune(&self, kind: DiseaseKind) -> bool {
        self.immunities.contains(&kind)
    }

    /// Alive, of a species that can host `kind`, not already carrying it and
    /// not immune.
    pub fn is_susceptible(&self, kind: DiseaseKind) -> bool {
        self.is_alive()
            && Disease::can_host(kind, &self.species)
            && !self.carries(kind)
            && !self.is_immune(kind)
    }

    /// Adds `disease` unless the animal is not susceptible to its kind.
    pub fn infect(&mut self, disease: Disease) -> bool {
        if !self.is_susceptible(disease.kind()) {
            return false;
        }
        tracing::debug!(id = %self.id, disease = %disease.kind(), "Infected");
        self.diseases.insert(disease.kind(), disease);
        true
    }

    pub fn maturity_age(&self, rules: &BehaviorConfig) -> u32 {
        (self.lifespan() as f32 * rules.maturity_fraction) as u32
    }

    pub fn is_mature(&self, rules: &BehaviorConfig) -> bool {
        self.age() >= self.maturity_age(rules)
    }

    /// Hunger and thirst both strictly above the viability threshold.
    pub fn is_viable(&self, rules: &BehaviorConfig) -> bool {
        self.hunger() > rules.viability_threshold && self.thirst() > rules.viability_threshold
    }

    /// Ready to look for a partner this tick.
    pub fn wants_mate(&self, rules: &BehaviorConfig) -> bool {
        self.is_alive() && self.mating_cooldown == 0 && self.is_mature(rules) && self.is_viable(rules)
    }

    /// Whether this animal treats `other` as prey: a live carnivore facing a
    /// live animal of another species no bigger than itself.
    pub fn hunts(&self, other: &Animal) -> bool {
        self.is_alive()
            && other.is_alive()
            && self.has(Capability::Carnivore)
            && self.kind() != other.kind()
            && self.size() >= other.size()
    }

    /// A carnivore at least as large as `other` stands its ground.
    pub fn can_overpower(&self, other: &Animal) -> bool {
        self.has(Capability::Carnivore) && self.size() >= other.size()
    }

    /// Any live carnivore of another species is a threat unless this animal
    /// can overpower it, whatever their relative sizes.
    pub fn threatened_by(&self, other: &Animal) -> bool {
        other.is_alive()
            && other.has(Capability::Carnivore)
            && other.kind() != self.kind()
            && !self.can_overpower(other)
    }

    /// Takes `damage` off health. Negative damage is rejected.
    pub fn injured(&mut self, damage: i32) -> Result<()> {
        self.stats.apply_damage(damage)?;
        if !self.is_alive() {
            self.activity = Activity::Dead;
        }
        Ok(())
    }

    /// Marks the animal dead. An earlier recorded cause is kept.
    pub fn kill(&mut self, cause: DeathCause) {
        self.stats.kill();
        self.cause_of_death.get_or_insert(cause);
        self.activity = Activity::Dead;
    }

    /// Records the most plausible cause for an animal found dead without one.
    pub(crate) fn settle_death(&mut self) {
        if self.cause_of_death.is_none() {
            let cause = if self.age() > self.lifespan() {
                DeathCause::OldAge
            } else if self.stats.starving_ticks() > 0 {
                DeathCause::Starvation
            } else if !self.diseases.is_empty() {
                DeathCause::Disease
            } else {
                DeathCause::Injury
            };
            self.cause_of_death = Some(cause);
        }
        self.activity = Activity::Dead;
    }

    pub(crate) fn tick_cooldown(&mut self) {
        self.mating_cooldown = self.mating_cooldown.saturating_sub(1);
    }

    /// Metabolism then disease effects for one tick. Returns the kinds the
    /// animal recovered from; it is immune to those from now on.
    pub fn advance_stats<R: Rng>(&mut self, rules: &MetabolismConfig, rng: &mut R) -> Vec<DiseaseKind> {
        if !self.is_alive() {
            return Vec::new();
        }
        self.stats.decay_tick(rules, rng);
        let stats = &mut self.stats;
        let mut recovered = Vec::new();
        self.diseases.retain(|kind, disease| {
            let active = disease.tick(stats);
            if !active {
                recovered.push(*kind);
            }
            active
        });
        for kind in &recovered {
            self.immunities.insert(*kind);
        }
        recovered
    }

    /// Restores hunger by a meal drawn from the configured range.
    pub fn eat_meal<R: Rng>(&mut self, rules: &MetabolismConfig, rng: &mut R) -> i32 {
        let amount = rules.meal.sample(rng);
        self.stats.eat(amount);
        amount
    }

    /// Restores thirst by a draught drawn from the configured range.
    pub fn drink<R: Rng>(&mut self, rules: &MetabolismConfig, rng: &mut R) -> i32 {
        let amount = rules.draught.sample(rng);
        self.stats.drink(amount);
        amount
    }

    /// Drinks if standing on or next to water.
    pub fn drink_here<R: Rng>(
        &mut self,
        landscape: &Landscape,
        rules: &MetabolismConfig,
        rng: &mut R,
    ) -> Option<i32> {
        if self.is_alive() && landscape.is_near_water(self.position) {
            Some(self.drink(rules, rng))
        } else {
            None
        }
    }

    /// Herbivore feeding: takes one bite of the current cell's stock and eats.
    /// Returns the hunger gained, or 0 when the cell is bare.
    pub fn graze<R: Rng>(
        &mut self,
        landscape: &mut Landscape,
        bite: u32,
        rules: &MetabolismConfig,
        rng: &mut R,
    ) -> Result<i32> {
        if !self.has(Capability::Herbivore) {
            return Err(SimError::MissingCapability(Capability::Herbivore));
        }
        let cell = landscape
            .cell_mut(self.position)
            .ok_or(SimError::OutOfBounds(self.position))?;
        if cell.take_resource(bite) == 0 {
            return Ok(0);
        }
        Ok(self.eat_meal(rules, rng))
    }

    /// Hits prey in the same cell for talon plus bite damage.
    pub fn strike(&self, prey: &mut Animal) -> Result<i32> {
        if !self.has(Capability::Carnivore) {
            return Err(SimError::MissingCapability(Capability::Carnivore));
        }
        if prey.id == self.id {
            return Err(SimError::invalid_input("an animal cannot strike itself"));
        }
        if prey.position != self.position || !prey.is_alive() {
            return Ok(0);
        }
        let damage = self.species.strike_damage();
        prey.injured(damage)?;
        Ok(damage)
    }

    /// Carnivore feeding. Succeeds only when `prey` shares this cell and is at
    /// or below the capture threshold; the prey dies and the hunter eats.
    /// Returns the hunger gained, or `None` when the prey was out of reach.
    pub fn feed_on<R: Rng>(
        &mut self,
        prey: &mut Animal,
        behavior: &BehaviorConfig,
        rules: &MetabolismConfig,
        rng: &mut R,
    ) -> Result<Option<i32>> {
        if !self.has(Capability::Carnivore) {
            return Err(SimError::MissingCapability(Capability::Carnivore));
        }
        if prey.id == self.id {
            return Err(SimError::invalid_input("an animal cannot feed on itself"));
        }
        if !self.is_alive() || prey.position != self.position {
            return Ok(None);
        }
        if prey.health() > behavior.capture_threshold {
            return Ok(None);
        }
        prey.kill(DeathCause::Predation);
        self.activity = Activity::Feeding;
        Ok(Some(self.eat_meal(rules, rng)))
    }

    /// Moves up to `speed` cells along the shortest enterable path to `target`.
    ///
    /// Stops early in front of a full cell. Fails without moving when there is
    /// no path or the very first step is blocked.
    pub fn seek(&mut self, landscape: &mut Landscape, target: Coord) -> Result<Coord> {
        if target == self.position {
            return Ok(self.position);
        }
        let radius = self
            .position
            .chebyshev(target)
            .max(self.species.detection_radius);
        let species = self.species;
        let path = landscape
            .find_path(self.position, target, radius, |g| species.can_enter(g))
            .ok_or(SimError::PathNotFound)?;

        for (taken, step) in path.into_iter().take(self.speed() as usize).enumerate() {
            match landscape.move_occupant(self, step) {
                Ok(()) => {}
                Err(SimError::OccupancyFull { .. }) if taken > 0 => break,
                Err(e) => return Err(e),
            }
        }
        Ok(self.position)
    }

    /// Pursues live prey within detection range.
    pub fn chase(&mut self, landscape: &mut Landscape, prey: &Animal) -> Result<Coord> {
        if !self.has(Capability::Carnivore) {
            return Err(SimError::MissingCapability(Capability::Carnivore));
        }
        let target = prey.position;
        if !prey.is_alive() || self.position.chebyshev(target) > self.species.detection_radius {
            return Err(SimError::PathNotFound);
        }
        match self.seek(landscape, target) {
            Err(SimError::OccupancyFull { .. })
                if self.species.flight && self.position.chebyshev(target) == 1 =>
            {
                self.encircle(landscape, target)
            }
            other => other,
        }
    }

    /// Flying hunters circle prey whose cell is full: move to the closest
    /// other free cell next to it.
    pub fn encircle(&mut self, landscape: &mut Landscape, prey_at: Coord) -> Result<Coord> {
        if !self.species.flight {
            return Err(SimError::invalid_input("only flying species encircle"));
        }
        let here = self.position;
        let species = self.species;
        let spot = landscape
            .neighbors_of(prey_at)
            .filter(|c| *c != here && landscape.has_room(*c))
            .filter(|c| landscape.ground_at(*c).is_some_and(|g| species.can_enter(g)))
            .min_by_key(|c| (here.chebyshev(*c), *c))
            .ok_or(SimError::PathNotFound)?;
        self.seek(landscape, spot)
    }

    /// Steps away from `threat` up to `speed` times.
    ///
    /// Each step goes to the free neighbor farthest from the threat, breaking
    /// ties by preferred ground then lowest coordinate. The first step may keep
    /// the distance; later steps must increase it.
    pub fn flee(&mut self, landscape: &mut Landscape, threat: Coord) -> Result<Coord> {
        let species = self.species;
        for step in 0..self.speed() {
            let here = self.position;
            let current = here.chebyshev(threat);
            let best = landscape
                .neighbors_of(here)
                .filter(|c| landscape.has_room(*c))
                .filter_map(|c| landscape.ground_at(c).map(|g| (c, g)))
                .filter(|(_, g)| species.can_enter(*g))
                .max_by_key(|(c, g)| {
                    (
                        c.chebyshev(threat),
                        *g == species.preferred_ground,
                        Reverse(*c),
                    )
                })
                .map(|(c, _)| c);

            let next = match best {
                Some(c) if c.chebyshev(threat) > current => c,
                Some(c) if step == 0 && c.chebyshev(threat) == current => c,
                _ if step == 0 => return Err(SimError::PathNotFound),
                _ => break,
            };
            landscape.move_occupant(self, next)?;
        }
        Ok(self.position)
    }

    /// Random step to a free, enterable neighbor.
    pub fn wander<R: Rng>(&mut self, landscape: &mut Landscape, rng: &mut R) -> Result<Coord> {
        let species = self.species;
        let options: Vec<Coord> = landscape
            .neighbors_of(self.position)
            .filter(|c| landscape.has_room(*c))
            .filter(|c| {
                landscape
                    .ground_at(*c)
                    .is_some_and(|g: GroundType| species.can_enter(g))
            })
            .collect();
        let next = *options.choose(rng).ok_or(SimError::PathNotFound)?;
        landscape.move_occupant(self, next)?;
        Ok(next)
    }

    /// Every reason `other` cannot mate with this animal right now.
    pub fn check_mate(
        &self,
        other: &Animal,
        landscape: &Landscape,
        rules: &BehaviorConfig,
    ) -> std::result::Result<(), MateRejection> {
        if self.gender == other.gender {
            return Err(MateRejection::SameGender);
        }
        if !self.is_alive() || !other.is_alive() {
            return Err(MateRejection::Dead);
        }
        if self.kind() != other.kind() {
            return Err(MateRejection::DifferentSpecies);
        }
        if self.position != other.position {
            return Err(MateRejection::DifferentCell);
        }
        if !self.is_viable(rules) || !other.is_viable(rules) {
            return Err(MateRejection::NotViable);
        }
        if self.mating_cooldown > 0 || other.mating_cooldown > 0 {
            return Err(MateRejection::CoolingDown);
        }
        if !landscape.has_room(self.position) {
            return Err(MateRejection::NurseryFull);
        }
        Ok(())
    }

    /// Mates with `other`, producing exactly one offspring on success. Both
    /// partners then cool down. The offspring is not yet registered anywhere.
    pub fn try_mate<R: Rng>(
        &mut self,
        other: &mut Animal,
        landscape: &Landscape,
        rules: &BehaviorConfig,
        rng: &mut R,
    ) -> Result<Animal> {
        self.check_mate(other, landscape, rules)
            .map_err(SimError::InvalidMateAttempt)?;
        let child = self.birth(other, rules, rng);
        self.mating_cooldown = rules.mating_cooldown;
        other.mating_cooldown = rules.mating_cooldown;
        Ok(child)
    }

    /// [`Animal::try_mate`] with the reason dropped.
    pub fn mate<R: Rng>(
        &mut self,
        other: &mut Animal,
        landscape: &Landscape,
        rules: &BehaviorConfig,
        rng: &mut R,
    ) -> Option<Animal> {
        self.try_mate(other, landscape, rules, rng).ok()
    }

    /// Builds the offspring of this animal and `other`.
    ///
    /// Size and lifespan are the parents' midpoint plus a mutation within
    /// `mutation_delta`; speed mutates by at most one and never drops below 1.
    /// Stats start full and the child stands in this parent's cell.
    pub fn birth<R: Rng>(&self, other: &Animal, rules: &BehaviorConfig, rng: &mut R) -> Animal {
        let delta = rules.mutation_delta.max(0);
        let speed_delta = delta.min(1);
        let size = inherit(self.size(), other.size(), delta, rng);
        let speed = inherit(self.speed(), other.speed(), speed_delta, rng);
        let lifespan = inherit(self.lifespan(), other.lifespan(), delta, rng);

        let mut child = Animal::spawn(self.species, rng);
        child.stats = StatModel::new(size, speed, lifespan);
        child.position = self.position;
        child.appearance = self.appearance.clone();
        child.generation = self.generation.max(other.generation) + 1;
        child.parents = Some((self.id, other.id));
        child
    }
}

fn inherit<R: Rng>(a: u32, b: u32, delta: i32, rng: &mut R) -> u32 {
    let mid = (i64::from(a) + i64::from(b)) / 2;
    let shift = if delta > 0 {
        i64::from(rng.gen_range(-delta..=delta))
    } else {
        0
    };
    (mid + shift).max(1) as u32
}
