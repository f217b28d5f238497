//! Core data structures for the habitat simulation.

pub mod animal;
pub mod disease;
pub mod landscape;
