use crate::animal::{Activity, Animal};
use crate::landscape::Landscape;
use crate::population::Population;
use habitat_data::{
    AnimalId, AppearanceHandle, Coord, DiseaseKind, Gender, GroundType, SpeciesKind,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnimalSnapshot {
    pub id: AnimalId,
    pub species: SpeciesKind,
    pub gender: Gender,
    pub position: Coord,
    pub health: i32,
    pub hunger: i32,
    pub thirst: i32,
    pub size: u32,
    pub speed: u32,
    pub age: u32,
    pub lifespan: u32,
    pub generation: u32,
    pub alive: bool,
    pub controlled: bool,
    pub activity: Activity,
    pub diseases: Vec<DiseaseKind>,
    pub appearance: AppearanceHandle,
}

impl From<&Animal> for AnimalSnapshot {
    fn from(a: &Animal) -> Self {
        Self {
            id: a.id(),
            species: a.kind(),
            gender: a.gender(),
            position: a.position(),
            health: a.health(),
            hunger: a.hunger(),
            thirst: a.thirst(),
            size: a.size(),
            speed: a.speed(),
            age: a.age(),
            lifespan: a.lifespan(),
            generation: a.generation(),
            alive: a.is_alive(),
            controlled: a.is_controlled(),
            activity: a.activity(),
            diseases: a.diseases().map(|d| d.kind()).collect(),
            appearance: a.appearance().clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CellSnapshot {
    pub at: Coord,
    pub ground: GroundType,
    pub resource: u32,
    pub occupants: Vec<AnimalId>,
}

/// Read-only copy of the world for renderers. Not a save format.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub width: u16,
    pub height: u16,
    pub cells: Vec<CellSnapshot>,
    pub animals: Vec<AnimalSnapshot>,
}

impl WorldSnapshot {
    pub fn capture(tick: u64, landscape: &Landscape, population: &Population) -> Self {
        Self {
            tick,
            width: landscape.width(),
            height: landscape.height(),
            cells: landscape
                .cells()
                .map(|(at, t)| CellSnapshot {
                    at,
                    ground: t.ground(),
                    resource: t.resource(),
                    occupants: t.occupants().to_vec(),
                })
                .collect(),
            animals: population.iter().map(AnimalSnapshot::from).collect(),
        }
    }

    pub fn animal(&self, id: AnimalId) -> Option<&AnimalSnapshot> {
        self.animals.iter().find(|a| a.id == id)
    }
}

/// One line of the headless driver's periodic report.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PopulationSummary {
    pub tick: u64,
    pub total: usize,
    pub by_species: BTreeMap<SpeciesKind, usize>,
    pub mean_health: f64,
    pub mean_hunger: f64,
    pub mean_thirst: f64,
    pub infected: usize,
    pub total_resource: u64,
}

impl PopulationSummary {
    pub fn capture(tick: u64, landscape: &Landscape, population: &Population) -> Self {
        let alive: Vec<_> = population.alive().collect();
        let mean = |f: fn(&Animal) -> i32| {
            if alive.is_empty() {
                0.0
            } else {
                alive.iter().map(|a| f64::from(f(a))).sum::<f64>() / alive.len() as f64
            }
        };
        Self {
            tick,
            total: alive.len(),
            by_species: population.census(),
            mean_health: mean(Animal::health),
            mean_hunger: mean(Animal::hunger),
            mean_thirst: mean(Animal::thirst),
            infected: alive
                .iter()
                .filter(|a| a.diseases().next().is_some())
                .count(),
            total_resource: landscape.cells().map(|(_, t)| u64::from(t.resource())).sum(),
        }
    }
}
