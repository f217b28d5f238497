//! Clamped physiological stats and their per-tick decay.
//!
//! Health, hunger and thirst are integers in `[0, MAX_STAT]` and every write
//! goes through a clamp, so no sequence of calls can push them outside the
//! range. Hunger and thirst count *down*: 100 is sated, 0 is starving.

use crate::config::MetabolismConfig;
use crate::error::{Result, SimError};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const MAX_STAT: i32 = 100;

#[inline]
fn clamp_stat(value: i32) -> i32 {
    value.clamp(0, MAX_STAT)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatModel {
    health: i32,
    hunger: i32,
    thirst: i32,
    size: u32,
    speed: u32,
    lifespan: u32,
    age: u32,
    /// Consecutive ticks spent with hunger or thirst at zero.
    starving_ticks: u32,
}

impl StatModel {
    /// Full health, hunger and thirst at age zero. Size, speed and lifespan
    /// are floored at 1.
    #[must_use]
    pub fn new(size: u32, speed: u32, lifespan: u32) -> Self {
        Self {
            health: MAX_STAT,
            hunger: MAX_STAT,
            thirst: MAX_STAT,
            size: size.max(1),
            speed: speed.max(1),
            lifespan: lifespan.max(1),
            age: 0,
            starving_ticks: 0,
        }
    }

    /// Overrides the three clamped levels.
    #[must_use]
    pub fn with_levels(mut self, health: i32, hunger: i32, thirst: i32) -> Self {
        self.health = clamp_stat(health);
        self.hunger = clamp_stat(hunger);
        self.thirst = clamp_stat(thirst);
        self
    }

    #[must_use]
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn hunger(&self) -> i32 {
        self.hunger
    }

    pub fn thirst(&self) -> i32 {
        self.thirst
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn lifespan(&self) -> u32 {
        self.lifespan
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn starving_ticks(&self) -> u32 {
        self.starving_ticks
    }

    pub fn is_starving(&self) -> bool {
        self.hunger == 0 || self.thirst == 0
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0 && self.age <= self.lifespan
    }

    /// One tick of metabolism: hunger and thirst drop by a random amount,
    /// health bleeds while either sits at zero, and age advances.
    pub fn decay_tick<R: Rng>(&mut self, rules: &MetabolismConfig, rng: &mut R) {
        if !self.is_alive() {
            return;
        }
        self.hunger = clamp_stat(self.hunger - rules.hunger_decay.sample(rng));
        self.thirst = clamp_stat(self.thirst - rules.thirst_decay.sample(rng));

        if self.is_starving() {
            self.starving_ticks += 1;
            self.health = clamp_stat(self.health - rules.starvation_penalty);
            if self.starving_ticks > rules.starvation_grace {
                self.health = 0;
            }
        } else {
            self.starving_ticks = 0;
        }

        self.age = self.age.saturating_add(1);
    }

    /// Restores hunger. Non-positive amounts are ignored.
    pub fn eat(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.hunger = clamp_stat(self.hunger.saturating_add(amount));
    }

    /// Restores thirst. Non-positive amounts are ignored.
    pub fn drink(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.thirst = clamp_stat(self.thirst.saturating_add(amount));
    }

    pub fn apply_damage(&mut self, amount: i32) -> Result<()> {
        if amount < 0 {
            return Err(SimError::invalid_input(format!(
                "damage must be non-negative, got {amount}"
            )));
        }
        self.health = clamp_stat(self.health.saturating_sub(amount));
        Ok(())
    }

    /// Drains the three levels by non-negative amounts; negative parts are
    /// treated as zero.
    pub fn drain(&mut self, health: i32, hunger: i32, thirst: i32) {
        self.health = clamp_stat(self.health - health.max(0));
        self.hunger = clamp_stat(self.hunger - hunger.max(0));
        self.thirst = clamp_stat(self.thirst - thirst.max(0));
    }

    pub fn kill(&mut self) {
        self.health = 0;
    }
}
