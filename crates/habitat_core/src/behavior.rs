//! The per-tick orchestrator for a single animal.
//!
//! Each live animal gets exactly one turn per tick: metabolism and diseases
//! first, then contagion, then one behavior picked by priority
//! (survive > flee > feed/chase > seek mate > idle). The choice is made
//! against a read-only view of the world and then carried out; a failed
//! action leaves the animal idle for the tick.

use crate::animal::{Activity, Animal};
use crate::config::AppConfig;
use crate::error::SimError;
use crate::events::SimEvent;
use crate::landscape::{Coord, GroundLogic, Landscape};
use crate::population::Population;
use habitat_data::{AnimalId, Capability};
use rand::Rng;

/// What happened to the animal during its turn.
#[derive(Debug)]
pub enum Disposition {
    Alive,
    /// Died this tick; still registered until the clock sweeps it.
    Died,
    /// Mated this tick. The offspring is not yet registered.
    GaveBirth(Box<Animal>),
    /// Already dead; nothing ran.
    Inactive,
}

/// Mutable world state one animal's turn may touch.
pub struct TickContext<'a, R: Rng> {
    pub config: &'a AppConfig,
    pub landscape: &'a mut Landscape,
    pub population: &'a mut Population,
    pub rng: &'a mut R,
    pub events: &'a mut Vec<SimEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Drink,
    SeekWater(Coord),
    Flee(Coord),
    Graze,
    SeekFood(Coord),
    Hunt(AnimalId),
    Mate(AnimalId),
    SeekMate(Coord),
    Wander,
    Rest,
}

/// Runs the turn of the animal at slot `idx`.
pub fn advance_animal<R: Rng>(ctx: &mut TickContext<'_, R>, idx: usize) -> Disposition {
    let Some(animal) = ctx.population.at_mut(idx) else {
        return Disposition::Inactive;
    };
    if !animal.is_alive() {
        return Disposition::Inactive;
    }

    animal.tick_cooldown();
    let id = animal.id();
    for disease in animal.advance_stats(&ctx.config.metabolism, ctx.rng) {
        ctx.events.push(SimEvent::Recovered { id, disease });
    }
    if !animal.is_alive() {
        animal.settle_death();
        tracing::debug!(%id, species = %animal.kind(), cause = ?animal.cause_of_death(), "Died");
        return Disposition::Died;
    }

    spread_diseases(ctx, idx);

    let Some(animal) = ctx.population.at_mut(idx) else {
        return Disposition::Inactive;
    };
    if animal.is_controlled() {
        animal.set_activity(Activity::Controlled);
        return Disposition::Alive;
    }

    let intent = choose_intent(ctx, idx);
    match carry_out(ctx, idx, intent) {
        Ok(disposition) => disposition,
        Err(err) => {
            tracing::trace!(%id, ?intent, %err, "Action failed, idling");
            if let Some(animal) = ctx.population.at_mut(idx) {
                animal.set_activity(Activity::Idle);
            }
            Disposition::Alive
        }
    }
}

/// Every disease the animal carries gets one transmission roll against each
/// animal in its own and adjacent cells.
fn spread_diseases<R: Rng>(ctx: &mut TickContext<'_, R>, idx: usize) {
    let Some(animal) = ctx.population.at(idx) else {
        return;
    };
    if animal.diseases().next().is_none() {
        return;
    }
    let strains: Vec<_> = animal.diseases().cloned().collect();
    let nearby = ctx.landscape.occupants_near(animal.position());

    for strain in strains {
        for other in &nearby {
            let Some(j) = ctx.population.index_of(*other) else {
                continue;
            };
            let Some((from, to)) = ctx.population.pair_mut(idx, j) else {
                continue;
            };
            if strain.try_transmit(from, to, ctx.rng) {
                ctx.events.push(SimEvent::Infected {
                    id: to.id(),
                    disease: strain.kind(),
                });
            }
        }
    }
}

fn choose_intent<R: Rng>(ctx: &mut TickContext<'_, R>, idx: usize) -> Intent {
    let Some(me) = ctx.population.at(idx) else {
        return Intent::Rest;
    };
    let rules = &ctx.config.behavior;
    let land = &*ctx.landscape;
    let pop = &*ctx.population;
    let here = me.position();
    let radius = me.species().detection_radius;
    let species = *me.species();

    // survive
    if me.thirst() < rules.thirst_threshold {
        if land.is_near_water(here) {
            return Intent::Drink;
        }
        let shore = land.nearest_of_kind(
            here,
            |c, t| species.can_enter(t.ground()) && land.is_near_water(c),
            radius,
        );
        if let Some(target) = shore {
            return Intent::SeekWater(target);
        }
    }

    // flee
    let threat = land.nearest_occupant(here, radius, |id| {
        pop.get(id).is_some_and(|other| me.threatened_by(other))
    });
    if let Some((_, at)) = threat {
        return Intent::Flee(at);
    }

    // feed / chase
    if me.has(Capability::Herbivore) && me.hunger() < rules.hunger_threshold {
        let stock = land.cell(here).map_or(0, |t| t.resource());
        if stock > 0 {
            return Intent::Graze;
        }
        let bite = ctx.config.ecology.graze_bite;
        let pasture = land.nearest_of_kind(
            here,
            |c, t| {
                species.can_enter(t.ground())
                    && t.ground().regrowth_modifier() > 0
                    && t.resource() >= bite
                    && land.has_room(c)
            },
            radius,
        );
        if let Some(target) = pasture {
            return Intent::SeekFood(target);
        }
    }
    if me.has(Capability::Carnivore) {
        let prey = land.nearest_occupant(here, radius, |id| {
            pop.get(id).is_some_and(|other| me.hunts(other))
        });
        if let Some((prey, _)) = prey {
            return Intent::Hunt(prey);
        }
    }

    // seek mate
    if me.wants_mate(rules) {
        let partner = land.nearest_occupant(here, radius, |id| {
            pop.get(id).is_some_and(|other| {
                other.id() != me.id()
                    && other.kind() == me.kind()
                    && other.gender() != me.gender()
                    && other.wants_mate(rules)
            })
        });
        match partner {
            Some((id, at)) if at == here => return Intent::Mate(id),
            Some((_, at)) => return Intent::SeekMate(at),
            None => {}
        }
    }

    if ctx.rng.gen_bool(rules.wander_chance) {
        Intent::Wander
    } else {
        Intent::Rest
    }
}

fn carry_out<R: Rng>(
    ctx: &mut TickContext<'_, R>,
    idx: usize,
    intent: Intent,
) -> Result<Disposition, SimError> {
    let config = ctx.config;
    match intent {
        Intent::Hunt(prey) => return hunt(ctx, idx, prey),
        Intent::Mate(partner) => return mate(ctx, idx, partner),
        _ => {}
    }

    let animal = ctx
        .population
        .at_mut(idx)
        .ok_or(SimError::PathNotFound)?;
    let id = animal.id();
    let from = animal.position();
    let activity = match intent {
        Intent::Drink => {
            let amount = animal.drink(&config.metabolism, ctx.rng);
            ctx.events.push(SimEvent::Drank { id, amount });
            Activity::Surviving
        }
        Intent::SeekWater(target) => {
            animal.seek(ctx.landscape, target)?;
            Activity::Surviving
        }
        Intent::Flee(threat) => {
            animal.flee(ctx.landscape, threat)?;
            Activity::Fleeing
        }
        Intent::Graze => {
            let amount = animal.graze(
                ctx.landscape,
                config.ecology.graze_bite,
                &config.metabolism,
                ctx.rng,
            )?;
            if amount > 0 {
                ctx.events.push(SimEvent::Fed { id, amount });
            }
            Activity::Feeding
        }
        Intent::SeekFood(target) => {
            animal.seek(ctx.landscape, target)?;
            Activity::Feeding
        }
        Intent::SeekMate(target) => {
            animal.seek(ctx.landscape, target)?;
            Activity::SeekingMate
        }
        Intent::Wander => {
            animal.wander(ctx.landscape, ctx.rng)?;
            Activity::Idle
        }
        Intent::Rest | Intent::Hunt(_) | Intent::Mate(_) => Activity::Idle,
    };
    let to = animal.position();
    animal.set_activity(activity);
    if from != to {
        ctx.events.push(SimEvent::Moved { id, from, to });
    }
    Ok(Disposition::Alive)
}

/// Chase, then strike and try to eat if the prey is within reach.
fn hunt<R: Rng>(
    ctx: &mut TickContext<'_, R>,
    idx: usize,
    prey: AnimalId,
) -> Result<Disposition, SimError> {
    let config = ctx.config;
    let j = ctx
        .population
        .index_of(prey)
        .ok_or(SimError::UnknownAnimal(prey))?;
    let (hunter, target) = ctx
        .population
        .pair_mut(idx, j)
        .ok_or(SimError::UnknownAnimal(prey))?;

    let from = hunter.position();
    if from != target.position() {
        hunter.chase(ctx.landscape, target)?;
        let to = hunter.position();
        if from != to {
            ctx.events.push(SimEvent::Moved {
                id: hunter.id(),
                from,
                to,
            });
        }
    }
    hunter.set_activity(Activity::Hunting);

    if hunter.position() == target.position() {
        let damage = hunter.strike(target)?;
        if damage > 0 {
            ctx.events.push(SimEvent::Struck {
                attacker: hunter.id(),
                target: target.id(),
                damage,
            });
        }
        if let Some(amount) =
            hunter.feed_on(target, &config.behavior, &config.metabolism, ctx.rng)?
        {
            tracing::debug!(predator = %hunter.id(), prey = %target.id(), "Prey taken");
            ctx.events.push(SimEvent::Killed {
                predator: hunter.id(),
                prey: target.id(),
            });
            ctx.events.push(SimEvent::Fed {
                id: hunter.id(),
                amount,
            });
        }
    }
    Ok(Disposition::Alive)
}

fn mate<R: Rng>(
    ctx: &mut TickContext<'_, R>,
    idx: usize,
    partner: AnimalId,
) -> Result<Disposition, SimError> {
    let j = ctx
        .population
        .index_of(partner)
        .ok_or(SimError::UnknownAnimal(partner))?;
    let (me, other) = ctx
        .population
        .pair_mut(idx, j)
        .ok_or(SimError::UnknownAnimal(partner))?;
    let child = me.try_mate(other, ctx.landscape, &ctx.config.behavior, ctx.rng)?;
    me.set_activity(Activity::SeekingMate);
    Ok(Disposition::GaveBirth(Box::new(child)))
}
