//! Afflictions that drain an animal's stats and spread by proximity.
//!
//! A host carries at most one disease per [`DiseaseKind`]; recovering from a
//! finite disease leaves the host immune to that kind.

use crate::animal::Animal;
use crate::species::SpeciesDescriptor;
use crate::stats::StatModel;
pub use habitat_data::DiseaseKind;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Per-tick drain applied to the host, before severity scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatPenalty {
    pub health: i32,
    pub hunger: i32,
    pub thirst: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disease {
    kind: DiseaseKind,
    severity: i32,
    contagion: f64,
    penalty: StatPenalty,
    /// Full course length; `None` for permanent afflictions.
    duration: Option<u32>,
    remaining: Option<u32>,
}

impl Disease {
    /// A fresh case with the kind's standard profile.
    #[must_use]
    pub fn new(kind: DiseaseKind) -> Self {
        let (severity, contagion, penalty, duration) = match kind {
            DiseaseKind::Rabies => (
                3,
                0.25,
                StatPenalty {
                    health: 1,
                    hunger: 0,
                    thirst: 1,
                },
                None,
            ),
            DiseaseKind::Mange => (
                1,
                0.15,
                StatPenalty {
                    health: 1,
                    hunger: 0,
                    thirst: 0,
                },
                Some(60),
            ),
            DiseaseKind::Parasites => (
                1,
                0.10,
                StatPenalty {
                    health: 0,
                    hunger: 2,
                    thirst: 0,
                },
                Some(80),
            ),
            DiseaseKind::AvianFlu => (
                2,
                0.35,
                StatPenalty {
                    health: 1,
                    hunger: 0,
                    thirst: 1,
                },
                Some(25),
            ),
        };
        Self {
            kind,
            severity,
            contagion,
            penalty,
            duration,
            remaining: duration,
        }
    }

    /// Overrides the contagion probability, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_contagion(mut self, contagion: f64) -> Self {
        self.contagion = contagion.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Option<u32>) -> Self {
        self.duration = duration;
        self.remaining = duration;
        self
    }

    pub fn kind(&self) -> DiseaseKind {
        self.kind
    }

    pub fn severity(&self) -> i32 {
        self.severity
    }

    pub fn contagion(&self) -> f64 {
        self.contagion
    }

    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    pub fn is_permanent(&self) -> bool {
        self.duration.is_none()
    }

    /// Whether a species can catch this kind at all.
    #[must_use]
    pub fn can_host(kind: DiseaseKind, species: &SpeciesDescriptor) -> bool {
        match kind {
            DiseaseKind::AvianFlu => species.flight,
            _ => true,
        }
    }

    /// Applies one tick of the disease to its host. Returns `false` once the
    /// course has run out and the disease should be dropped.
    pub fn tick(&mut self, host: &mut StatModel) -> bool {
        host.drain(
            self.penalty.health * self.severity,
            self.penalty.hunger * self.severity,
            self.penalty.thirst * self.severity,
        );
        match &mut self.remaining {
            Some(left) => {
                *left = left.saturating_sub(1);
                *left > 0
            }
            None => true,
        }
    }

    /// Rolls a transmission from `from` to `to`.
    ///
    /// Needs both alive and at most one cell apart; never infects a host that
    /// already carries or is immune to this kind.
    pub fn try_transmit<R: Rng>(&self, from: &Animal, to: &mut Animal, rng: &mut R) -> bool {
        if from.id() == to.id() || !from.is_alive() || !to.is_alive() {
            return false;
        }
        if from.position().chebyshev(to.position()) > 1 {
            return false;
        }
        if !to.is_susceptible(self.kind) {
            return false;
        }
        if !rng.gen_bool(self.contagion) {
            return false;
        }
        to.infect(self.fresh_case())
    }

    /// A copy of this strain at the start of its course.
    #[must_use]
    pub fn fresh_case(&self) -> Self {
        Self {
            remaining: self.duration,
            ..self.clone()
        }
    }
}
