//! Plain value types shared by the habitat engine, its drivers and renderers.
//!
//! Nothing in this crate carries behavior beyond small geometric helpers;
//! the rules live in `habitat_core`.

pub mod data;

pub use data::animal::{AnimalId, AppearanceHandle, Capability, DeathCause, Gender, SpeciesKind};
pub use data::disease::DiseaseKind;
pub use data::landscape::{Coord, Direction, GroundType};
