pub mod macros;

use habitat_lib::engine::config::AppConfig;
use habitat_lib::{Coord, Gender, GroundType, Landscape, SimulationClock, SpeciesKind};
use habitat_lib::{Animal, AnimalId};

type AnimalMod = Box<dyn FnOnce(Animal) -> Animal>;

struct Placement {
    kind: SpeciesKind,
    at: Coord,
    gender: Gender,
    modifier: Option<AnimalMod>,
}

/// Builds a small hand-made world: all grass unless painted otherwise, no
/// random initial spawn, outbreaks off.
#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    width: u16,
    height: u16,
    seed: u64,
    ground: Vec<(Coord, GroundType)>,
    placements: Vec<Placement>,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new(width: u16, height: u16) -> Self {
        let mut config = AppConfig::default();
        config.world.width = width;
        config.world.height = height;
        config.world.spawns.clear();
        config.ecology.outbreak_chance = 0.0;
        Self {
            config,
            width,
            height,
            seed: 42,
            ground: Vec::new(),
            placements: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_ground(mut self, x: u16, y: u16, ground: GroundType) -> Self {
        self.ground.push((Coord::new(x, y), ground));
        self
    }

    pub fn with_animal(mut self, kind: SpeciesKind, x: u16, y: u16, gender: Gender) -> Self {
        self.placements.push(Placement {
            kind,
            at: Coord::new(x, y),
            gender,
            modifier: None,
        });
        self
    }

    pub fn with_animal_mod<F>(
        mut self,
        kind: SpeciesKind,
        x: u16,
        y: u16,
        gender: Gender,
        modifier: F,
    ) -> Self
    where
        F: FnOnce(Animal) -> Animal + 'static,
    {
        self.placements.push(Placement {
            kind,
            at: Coord::new(x, y),
            gender,
            modifier: Some(Box::new(modifier)),
        });
        self
    }

    /// Returns the clock and the ids in placement order. Animals start at
    /// maturity age with full stats; ids are `1, 2, 3, ...`.
    pub fn build(self) -> (SimulationClock, Vec<AnimalId>) {
        let mut landscape = Landscape::new(
            self.width,
            self.height,
            self.config.world.density_cap,
            self.config.ecology.resource_max,
        );
        for (at, ground) in self.ground {
            landscape
                .set_ground(at, ground)
                .expect("painted cell out of bounds");
        }
        let mut clock = SimulationClock::with_landscape(self.config, landscape, self.seed)
            .expect("invalid config in test builder");
        let mut ids = Vec::new();
        for (n, p) in self.placements.into_iter().enumerate() {
            let species = *clock
                .config()
                .species_for(p.kind)
                .expect("species missing from config");
            let mut animal = Animal::new(AnimalId::from_bits(n as u128 + 1), species, p.gender);
            let mature = animal.maturity_age(&clock.config().behavior);
            animal = animal.with_age(mature);
            if let Some(modifier) = p.modifier {
                animal = modifier(animal);
            }
            let id = clock
                .insert(animal, p.at)
                .expect("Failed to place animal in test builder");
            ids.push(id);
        }
        (clock, ids)
    }
}

/// Ids of the animals that ate during `report`'s tick.
#[allow(dead_code)]
pub fn fed_ids(report: &habitat_lib::TickReport) -> Vec<AnimalId> {
    report
        .events
        .iter()
        .filter_map(|e| match e {
            habitat_lib::SimEvent::Fed { id, .. } => Some(*id),
            _ => None,
        })
        .collect()
}
