//! # Habitat Core
//!
//! The simulation engine for Habitat, a grid ecosystem of herbivores,
//! carnivores and omnivores that age, feed, flee, hunt, mate, sicken and die.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Clamped physiological stats and their per-tick decay
//! - Diseases with contagion, recovery and immunity
//! - Data-driven species descriptors and the capability-based animal model
//! - The territory grid with its occupancy registry and spatial queries
//! - The per-tick behavior orchestrator and the simulation clock
//! - Configuration, metrics collection and structured logging
//!
//! ## Architecture
//!
//! - **One animal type**: species differ only by their [`SpeciesDescriptor`]
//! - **Single owner of placement**: [`Landscape`] is the only writer of an
//!   animal's position
//! - **Sequential ticks**: animals act in insertion order on a single thread
//! - **Deterministic simulation**: seeded RNG for reproducible results
//!
//! ## Example
//!
//! ```
//! use habitat_core::{AppConfig, Landscape, SimulationClock};
//! use habitat_data::{Coord, Gender, SpeciesKind};
//!
//! let config = AppConfig::default();
//! let landscape = Landscape::new(10, 10, 4, 20);
//! let mut clock = SimulationClock::with_landscape(config, landscape, 42).unwrap();
//! let wolf = clock.spawn(SpeciesKind::Wolf, Coord::new(1, 1), Gender::Male).unwrap();
//! clock.spawn(SpeciesKind::Rabbit, Coord::new(4, 1), Gender::Female).unwrap();
//!
//! let report = clock.tick();
//! assert_eq!(report.tick, 1);
//! assert!(clock.animal(wolf).is_some());
//! ```

/// Live animal entity and its behavior contract
pub mod animal;
/// Per-tick orchestration of one animal's turn
pub mod behavior;
/// The simulation clock driving the world
pub mod clock;
/// Configuration management for simulation parameters
pub mod config;
/// Afflictions, contagion and immunity
pub mod disease;
pub mod error;
/// Tick events and reports
pub mod events;
/// Territory grid, spatial queries and terrain generation
pub mod landscape;
/// Run statistics and logging setup
pub mod metrics;
pub mod population;
/// Read-only world copies for renderers
pub mod snapshot;
/// Species parameter table
pub mod species;
/// Clamped stats and metabolism
pub mod stats;

pub use animal::{Activity, Animal};
pub use behavior::{advance_animal, Disposition, TickContext};
pub use clock::SimulationClock;
pub use config::AppConfig;
pub use disease::Disease;
pub use error::{MateRejection, Result, SimError};
pub use events::{SimEvent, TickReport};
pub use landscape::{GroundLogic, Landscape, Territory};
pub use metrics::{init_logging, Metrics};
pub use population::Population;
pub use snapshot::{AnimalSnapshot, PopulationSummary, WorldSnapshot};
pub use species::SpeciesDescriptor;
pub use stats::{StatModel, MAX_STAT};
