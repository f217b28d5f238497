//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! a `habitat.toml` file. Every tunable constant of the engine lives here.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `habitat.toml` file (overrides defaults, missing keys keep defaults)
//! 3. Command-line overrides applied by the driver (seed, size)
//!
//! ## Example `habitat.toml`
//!
//! ```toml
//! [world]
//! width = 40
//! height = 30
//! seed = 42
//! density_cap = 4
//!
//! [[world.spawns]]
//! species = "Rabbit"
//! count = 20
//!
//! [metabolism]
//! starvation_grace = 10
//!
//! [behavior]
//! capture_threshold = 30
//! ```

use crate::species::SpeciesDescriptor;
use habitat_data::SpeciesKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Inclusive integer range for random draws.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatRange {
    pub min: i32,
    pub max: i32,
}

impl StatRange {
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: rand::Rng>(&self, rng: &mut R) -> i32 {
        rng.gen_range(self.min..=self.max)
    }

    fn is_valid(&self) -> bool {
        self.min >= 0 && self.min <= self.max
    }
}

/// How many animals of a species the initial spawn places.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnRule {
    pub species: SpeciesKind,
    pub count: usize,
}

/// World-level simulation configuration.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u16,
    pub height: u16,
    pub seed: Option<u64>,
    /// Maximum animals sharing one cell.
    pub density_cap: usize,
    /// Fraction of the terrain noise range that becomes water.
    pub water_level: f32,
    /// Noise level above which cells become forest.
    pub forest_level: f32,
    pub spawns: Vec<SpawnRule>,
    /// Ticks between periodic `info` summaries.
    pub log_interval: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 30,
            seed: None,
            density_cap: 4,
            water_level: 0.25,
            forest_level: 0.62,
            spawns: vec![
                SpawnRule {
                    species: SpeciesKind::Rabbit,
                    count: 30,
                },
                SpawnRule {
                    species: SpeciesKind::Deer,
                    count: 10,
                },
                SpawnRule {
                    species: SpeciesKind::Songbird,
                    count: 12,
                },
                SpawnRule {
                    species: SpeciesKind::Raptor,
                    count: 4,
                },
                SpawnRule {
                    species: SpeciesKind::Wolf,
                    count: 4,
                },
                SpawnRule {
                    species: SpeciesKind::Bear,
                    count: 2,
                },
            ],
            log_interval: 100,
        }
    }
}

/// Stat decay and recovery rules.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MetabolismConfig {
    pub hunger_decay: StatRange,
    pub thirst_decay: StatRange,
    /// Health lost per tick while hunger or thirst sits at zero.
    pub starvation_penalty: i32,
    /// Ticks at zero hunger or thirst tolerated before death.
    pub starvation_grace: u32,
    /// Hunger regained per meal.
    pub meal: StatRange,
    /// Thirst regained per drink.
    pub draught: StatRange,
}

impl Default for MetabolismConfig {
    fn default() -> Self {
        Self {
            hunger_decay: StatRange::new(1, 3),
            thirst_decay: StatRange::new(1, 3),
            starvation_penalty: 5,
            starvation_grace: 10,
            meal: StatRange::new(8, 12),
            draught: StatRange::new(8, 12),
        }
    }
}

/// Thresholds steering the per-tick behavior choice.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Herbivores graze when hunger falls below this.
    pub hunger_threshold: i32,
    /// Animals drink or seek water when thirst falls below this.
    pub thirst_threshold: i32,
    /// Minimum hunger and thirst for mating.
    pub viability_threshold: i32,
    /// Ticks after mating before either partner may mate again.
    pub mating_cooldown: u32,
    /// Prey at or below this health can be captured and eaten.
    pub capture_threshold: i32,
    /// Chance an idle animal wanders to a random neighbor.
    pub wander_chance: f64,
    /// Bound of the inheritance mutation for size and lifespan.
    pub mutation_delta: i32,
    /// Fraction of lifespan before an animal can mate.
    pub maturity_fraction: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            hunger_threshold: 70,
            thirst_threshold: 40,
            viability_threshold: 40,
            mating_cooldown: 30,
            capture_threshold: 30,
            wander_chance: 0.5,
            mutation_delta: 2,
            maturity_fraction: 0.1,
        }
    }
}

/// Landscape resource and disease dynamics.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EcologyConfig {
    /// Cap of a cell's food stock.
    pub resource_max: u32,
    /// Base stock regained per cell per tick, scaled by ground type.
    pub regrowth: u32,
    /// Stock removed from a cell by one grazing bite.
    pub graze_bite: u32,
    /// Per-tick chance that a random animal falls ill.
    pub outbreak_chance: f64,
}

impl Default for EcologyConfig {
    fn default() -> Self {
        Self {
            resource_max: 20,
            regrowth: 1,
            graze_bite: 5,
            outbreak_chance: 0.002,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub metabolism: MetabolismConfig,
    pub behavior: BehaviorConfig,
    pub ecology: EcologyConfig,
    pub species: Vec<SpeciesDescriptor>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            metabolism: MetabolismConfig::default(),
            behavior: BehaviorConfig::default(),
            ecology: EcologyConfig::default(),
            species: SpeciesDescriptor::defaults(),
        }
    }
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.world.width > 0, "World width must be positive");
        anyhow::ensure!(self.world.width <= 1000, "World width too large (max 1000)");
        anyhow::ensure!(self.world.height > 0, "World height must be positive");
        anyhow::ensure!(
            self.world.height <= 1000,
            "World height too large (max 1000)"
        );
        anyhow::ensure!(self.world.density_cap > 0, "Density cap must be positive");
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.world.water_level),
            "Water level must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.world.forest_level),
            "Forest level must be in [0.0, 1.0]"
        );
        let total: usize = self.world.spawns.iter().map(|s| s.count).sum();
        anyhow::ensure!(
            total <= usize::from(self.world.width) * usize::from(self.world.height) * self.world.density_cap,
            "Initial population does not fit the landscape"
        );
        for rule in &self.world.spawns {
            anyhow::ensure!(
                self.species_for(rule.species).is_some(),
                "No species descriptor for spawned species {}",
                rule.species
            );
        }

        anyhow::ensure!(
            self.metabolism.hunger_decay.is_valid(),
            "Hunger decay range must be non-negative and ordered"
        );
        anyhow::ensure!(
            self.metabolism.thirst_decay.is_valid(),
            "Thirst decay range must be non-negative and ordered"
        );
        anyhow::ensure!(
            self.metabolism.meal.is_valid(),
            "Meal range must be non-negative and ordered"
        );
        anyhow::ensure!(
            self.metabolism.draught.is_valid(),
            "Draught range must be non-negative and ordered"
        );
        anyhow::ensure!(
            self.metabolism.starvation_penalty >= 0,
            "Starvation penalty must be non-negative"
        );

        anyhow::ensure!(
            (0.0..=1.0).contains(&self.behavior.wander_chance),
            "Wander chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.behavior.mutation_delta >= 0,
            "Mutation delta must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.behavior.maturity_fraction),
            "Maturity fraction must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0..=crate::stats::MAX_STAT).contains(&self.behavior.capture_threshold),
            "Capture threshold must be a stat value"
        );

        anyhow::ensure!(
            (0.0..=1.0).contains(&self.ecology.outbreak_chance),
            "Outbreak chance must be in [0.0, 1.0]"
        );

        for d in &self.species {
            anyhow::ensure!(d.size > 0, "Species {} must have positive size", d.kind);
            anyhow::ensure!(d.speed > 0, "Species {} must have positive speed", d.kind);
            anyhow::ensure!(
                d.lifespan > 0,
                "Species {} must have positive lifespan",
                d.kind
            );
            anyhow::ensure!(
                d.herbivore || d.carnivore,
                "Species {} needs at least one capability",
                d.kind
            );
        }

        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    #[must_use]
    pub fn species_for(&self, kind: SpeciesKind) -> Option<&SpeciesDescriptor> {
        self.species.iter().find(|d| d.kind == kind)
    }

    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.metabolism).as_bytes());
        hasher.update(format!("{:?}", self.behavior).as_bytes());
        hasher.update(format!("{:?}", self.ecology).as_bytes());
        hasher.update(format!("{:?}", self.species).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_world_width() {
        let config = AppConfig {
            world: WorldConfig {
                width: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overfull_spawn_rejected() {
        let config = AppConfig {
            world: WorldConfig {
                width: 2,
                height: 2,
                density_cap: 1,
                spawns: vec![SpawnRule {
                    species: SpeciesKind::Rabbit,
                    count: 5,
                }],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config = AppConfig {
            metabolism: MetabolismConfig {
                meal: StatRange::new(12, 8),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [world]
            width = 12
            height = 8
            seed = 7
            spawns = [{ species = "Raptor", count = 2 }]

            [behavior]
            capture_threshold = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.world.width, 12);
        assert_eq!(config.world.seed, Some(7));
        assert_eq!(config.world.density_cap, 4);
        assert_eq!(config.behavior.capture_threshold, 10);
        assert_eq!(config.behavior.viability_threshold, 40);
        assert_eq!(config.species.len(), SpeciesKind::ALL.len());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load("/nonexistent/habitat.toml").unwrap();
        assert_eq!(config.world.width, WorldConfig::default().width);
    }

    #[test]
    fn test_fingerprint_consistency() {
        let config1 = AppConfig::default();
        let config2 = AppConfig::default();
        assert_eq!(config1.fingerprint(), config2.fingerprint());
    }
}
