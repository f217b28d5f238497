use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity of an animal for its whole life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimalId(pub Uuid);

impl AnimalId {
    /// Builds an id from raw random bits, so seeded runs produce seeded ids.
    #[must_use]
    pub fn from_bits(bits: u128) -> Self {
        Self(Uuid::from_u128(bits))
    }
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.simple().to_string();
        f.write_str(&s[..8])
    }
}

/// Biological sex. Mating needs one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Gender::Female => Gender::Male,
            Gender::Male => Gender::Female,
        }
    }
}

/// The concrete species an animal belongs to.
///
/// Behavioral differences are data, not code: each kind maps to a
/// descriptor in the engine's species table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpeciesKind {
    /// Small land herbivore.
    Rabbit,
    /// Large land herbivore.
    Deer,
    /// Flying herbivore.
    Songbird,
    /// Flying carnivore.
    Raptor,
    /// Land carnivore.
    Wolf,
    /// Land omnivore.
    Bear,
}

impl SpeciesKind {
    pub const ALL: [SpeciesKind; 6] = [
        SpeciesKind::Rabbit,
        SpeciesKind::Deer,
        SpeciesKind::Songbird,
        SpeciesKind::Raptor,
        SpeciesKind::Wolf,
        SpeciesKind::Bear,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SpeciesKind::Rabbit => "rabbit",
            SpeciesKind::Deer => "deer",
            SpeciesKind::Songbird => "songbird",
            SpeciesKind::Raptor => "raptor",
            SpeciesKind::Wolf => "wolf",
            SpeciesKind::Bear => "bear",
        }
    }
}

impl fmt::Display for SpeciesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named behavior set an animal may possess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Grazes the resource stock of its cell.
    Herbivore,
    /// Chases, strikes and eats other animals.
    Carnivore,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Herbivore => f.write_str("herbivore"),
            Capability::Carnivore => f.write_str("carnivore"),
        }
    }
}

/// Why an animal left the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// Hunger or thirst stayed at zero past the grace period, or drained health.
    Starvation,
    /// Age exceeded lifespan.
    OldAge,
    /// Health drained by an affliction.
    Disease,
    /// Captured and eaten.
    Predation,
    /// Health lost to strikes without being eaten.
    Injury,
    /// Taken out of the world by the driver.
    Removed,
}

/// Opaque key the presentation layer uses to find an animal's sprite.
///
/// The engine stores and copies it but never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AppearanceHandle(pub String);

impl AppearanceHandle {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_opposite() {
        assert_eq!(Gender::Female.opposite(), Gender::Male);
        assert_eq!(Gender::Male.opposite().opposite(), Gender::Male);
    }

    #[test]
    fn test_animal_id_display_is_short() {
        let id = AnimalId::from_bits(0xdead_beef_0000_0000_0000_0000_0000_0001);
        assert_eq!(id.to_string().len(), 8);
    }

    #[test]
    fn test_species_serializes_as_variant_name() {
        let json = serde_json::to_string(&SpeciesKind::Raptor).unwrap();
        assert_eq!(json, "\"Raptor\"");
    }
}
