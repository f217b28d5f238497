//! Data-driven species descriptors.
//!
//! Every behavioral difference between species is a field here; the engine
//! runs one `Animal` type and reads these numbers at runtime.

use habitat_data::{Capability, GroundType, SpeciesKind};
use serde::{Deserialize, Serialize};

/// Tunable constants for one species.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDescriptor {
    pub kind: SpeciesKind,
    pub herbivore: bool,
    pub carnivore: bool,
    /// Flyers cross water and rock.
    pub flight: bool,
    /// Swimmers cross water.
    pub aquatic: bool,
    /// Flee tie-break: cells of this type are preferred.
    pub preferred_ground: GroundType,
    pub size: u32,
    /// Cells per tick.
    pub speed: u32,
    pub lifespan: u32,
    /// Chebyshev radius for spotting prey, predators, mates and food.
    pub detection_radius: u16,
    pub talon_size: i32,
    /// Jaw or beak strength.
    pub bite_strength: i32,
}

impl SpeciesDescriptor {
    #[must_use]
    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Herbivore => self.herbivore,
            Capability::Carnivore => self.carnivore,
        }
    }

    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        [Capability::Herbivore, Capability::Carnivore]
            .into_iter()
            .filter(|c| self.has(*c))
    }

    #[must_use]
    pub fn can_enter(&self, ground: GroundType) -> bool {
        match ground {
            GroundType::Water => self.flight || self.aquatic,
            GroundType::Rock => self.flight,
            _ => true,
        }
    }

    /// Damage dealt by one strike.
    #[must_use]
    pub fn strike_damage(&self) -> i32 {
        (self.talon_size + self.bite_strength).max(0)
    }

    #[must_use]
    pub fn defaults() -> Vec<Self> {
        SpeciesKind::ALL.iter().map(|k| Self::default_for(*k)).collect()
    }

    #[must_use]
    pub fn default_for(kind: SpeciesKind) -> Self {
        let base = Self {
            kind,
            herbivore: false,
            carnivore: false,
            flight: false,
            aquatic: false,
            preferred_ground: GroundType::Grass,
            size: 10,
            speed: 1,
            lifespan: 400,
            detection_radius: 4,
            talon_size: 0,
            bite_strength: 0,
        };
        match kind {
            SpeciesKind::Rabbit => Self {
                herbivore: true,
                speed: 2,
                ..base
            },
            SpeciesKind::Deer => Self {
                herbivore: true,
                preferred_ground: GroundType::Forest,
                size: 50,
                speed: 2,
                lifespan: 700,
                detection_radius: 5,
                ..base
            },
            SpeciesKind::Songbird => Self {
                herbivore: true,
                flight: true,
                preferred_ground: GroundType::Forest,
                size: 4,
                speed: 3,
                lifespan: 300,
                detection_radius: 5,
                ..base
            },
            SpeciesKind::Raptor => Self {
                carnivore: true,
                flight: true,
                preferred_ground: GroundType::Rock,
                size: 20,
                speed: 3,
                lifespan: 600,
                detection_radius: 6,
                talon_size: 30,
                bite_strength: 40,
                ..base
            },
            SpeciesKind::Wolf => Self {
                carnivore: true,
                preferred_ground: GroundType::Forest,
                size: 40,
                speed: 2,
                lifespan: 600,
                detection_radius: 5,
                talon_size: 25,
                bite_strength: 45,
                ..base
            },
            SpeciesKind::Bear => Self {
                herbivore: true,
                carnivore: true,
                preferred_ground: GroundType::Forest,
                size: 80,
                speed: 1,
                lifespan: 900,
                detection_radius: 3,
                talon_size: 40,
                bite_strength: 40,
                ..base
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raptor_weapons() {
        let raptor = SpeciesDescriptor::default_for(SpeciesKind::Raptor);
        assert_eq!(raptor.talon_size, 30);
        assert_eq!(raptor.bite_strength, 40);
        assert_eq!(raptor.strike_damage(), 70);
        assert!(raptor.has(Capability::Carnivore));
        assert!(!raptor.has(Capability::Herbivore));
    }

    #[test]
    fn test_bear_has_both_capabilities() {
        let bear = SpeciesDescriptor::default_for(SpeciesKind::Bear);
        let caps: Vec<_> = bear.capabilities().collect();
        assert_eq!(caps, vec![Capability::Herbivore, Capability::Carnivore]);
    }

    #[test]
    fn test_ground_access() {
        let rabbit = SpeciesDescriptor::default_for(SpeciesKind::Rabbit);
        let bird = SpeciesDescriptor::default_for(SpeciesKind::Songbird);
        assert!(!rabbit.can_enter(GroundType::Water));
        assert!(!rabbit.can_enter(GroundType::Rock));
        assert!(bird.can_enter(GroundType::Water));
        assert!(bird.can_enter(GroundType::Rock));
    }

    #[test]
    fn test_defaults_cover_every_kind() {
        let table = SpeciesDescriptor::defaults();
        for kind in SpeciesKind::ALL {
            assert!(table.iter().any(|d| d.kind == kind));
        }
    }
}
