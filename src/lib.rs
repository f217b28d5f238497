//! Habitat: a grid ecosystem simulation.
//!
//! This crate bundles the engine ([`habitat_core`]) and its value types
//! ([`habitat_data`]) for drivers, plus the headless runner used by the
//! `habitat` binary.

pub mod headless;

pub use habitat_core as engine;
pub use habitat_data as data;

pub use habitat_core::{
    config::AppConfig, init_logging, Animal, Landscape, SimEvent, SimError, SimulationClock,
    TickReport,
};
pub use habitat_data::{AnimalId, Coord, Direction, Gender, GroundType, SpeciesKind};
