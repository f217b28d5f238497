use habitat_data::{AnimalId, Coord, DeathCause, DiseaseKind, SpeciesKind};
use serde::{Deserialize, Serialize};

/// Something that happened during a tick, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum SimEvent {
    Born {
        id: AnimalId,
        species: SpeciesKind,
        parents: Option<(AnimalId, AnimalId)>,
        at: Coord,
    },
    Died {
        id: AnimalId,
        species: SpeciesKind,
        cause: DeathCause,
        age: u32,
    },
    Fed {
        id: AnimalId,
        amount: i32,
    },
    Drank {
        id: AnimalId,
        amount: i32,
    },
    Struck {
        attacker: AnimalId,
        target: AnimalId,
        damage: i32,
    },
    Killed {
        predator: AnimalId,
        prey: AnimalId,
    },
    Infected {
        id: AnimalId,
        disease: DiseaseKind,
    },
    Recovered {
        id: AnimalId,
        disease: DiseaseKind,
    },
    Moved {
        id: AnimalId,
        from: Coord,
        to: Coord,
    },
}

impl SimEvent {
    /// The animal the event is mainly about.
    pub fn subject(&self) -> AnimalId {
        match self {
            SimEvent::Born { id, .. }
            | SimEvent::Died { id, .. }
            | SimEvent::Fed { id, .. }
            | SimEvent::Drank { id, .. }
            | SimEvent::Infected { id, .. }
            | SimEvent::Recovered { id, .. }
            | SimEvent::Moved { id, .. } => *id,
            SimEvent::Struck { attacker, .. } => *attacker,
            SimEvent::Killed { predator, .. } => *predator,
        }
    }
}

/// Outcome of one [`crate::SimulationClock::tick`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub events: Vec<SimEvent>,
    pub population: usize,
}

impl TickReport {
    pub fn births(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SimEvent::Born { .. }))
            .count()
    }

    pub fn deaths(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SimEvent::Died { .. }))
            .count()
    }

    /// Whether `id` ate anything this tick.
    pub fn fed(&self, id: AnimalId) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, SimEvent::Fed { id: fed, .. } if *fed == id))
    }

    pub fn kills(&self) -> impl Iterator<Item = (AnimalId, AnimalId)> + '_ {
        self.events.iter().filter_map(|e| match e {
            SimEvent::Killed { predator, prey } => Some((*predator, *prey)),
            _ => None,
        })
    }
}
