pub use habitat_data::GroundType;
use habitat_data::AnimalId;
use serde::{Deserialize, Serialize};

pub trait GroundLogic {
    /// Multiplier on the base per-tick regrowth.
    fn regrowth_modifier(&self) -> u32;
    fn is_drinkable(&self) -> bool;
}

impl GroundLogic for GroundType {
    fn regrowth_modifier(&self) -> u32 {
        match self {
            GroundType::Grass => 1,
            GroundType::Forest => 2,
            GroundType::Sand => 0,
            GroundType::Water => 0,
            GroundType::Rock => 0,
        }
    }

    fn is_drinkable(&self) -> bool {
        matches!(self, GroundType::Water)
    }
}

/// One landscape cell: static ground, a regrowing food stock and the ids of
/// the animals standing on it, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    ground: GroundType,
    resource: u32,
    occupants: Vec<AnimalId>,
}

impl Territory {
    #[must_use]
    pub fn new(ground: GroundType, resource: u32) -> Self {
        Self {
            ground,
            resource,
            occupants: Vec::new(),
        }
    }

    pub fn ground(&self) -> GroundType {
        self.ground
    }

    pub fn resource(&self) -> u32 {
        self.resource
    }

    pub fn occupants(&self) -> &[AnimalId] {
        &self.occupants
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    pub fn contains(&self, id: AnimalId) -> bool {
        self.occupants.contains(&id)
    }

    pub(crate) fn set_ground(&mut self, ground: GroundType) {
        self.ground = ground;
    }

    pub(crate) fn set_resource(&mut self, resource: u32) {
        self.resource = resource;
    }

    pub(crate) fn add(&mut self, id: AnimalId) {
        if !self.contains(id) {
            self.occupants.push(id);
        }
    }

    pub(crate) fn remove(&mut self, id: AnimalId) -> bool {
        match self.occupants.iter().position(|o| *o == id) {
            Some(i) => {
                self.occupants.remove(i);
                true
            }
            None => false,
        }
    }

    /// Removes up to `bite` from the stock; returns what was actually taken.
    pub(crate) fn take_resource(&mut self, bite: u32) -> u32 {
        let taken = bite.min(self.resource);
        self.resource -= taken;
        taken
    }

    pub(crate) fn regrow(&mut self, base: u32, max: u32) {
        let gain = base.saturating_mul(self.ground.regrowth_modifier());
        self.resource = self.resource.saturating_add(gain).min(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> AnimalId {
        AnimalId::from_bits(n)
    }

    #[test]
    fn test_occupants_keep_arrival_order_without_duplicates() {
        let mut t = Territory::new(GroundType::Grass, 5);
        t.add(id(3));
        t.add(id(1));
        t.add(id(3));
        assert_eq!(t.occupants(), &[id(3), id(1)]);
        assert!(t.remove(id(3)));
        assert!(!t.remove(id(3)));
        assert_eq!(t.occupants(), &[id(1)]);
    }

    #[test]
    fn test_take_resource_is_bounded() {
        let mut t = Territory::new(GroundType::Grass, 3);
        assert_eq!(t.take_resource(5), 3);
        assert_eq!(t.resource(), 0);
        assert_eq!(t.take_resource(5), 0);
    }

    #[test]
    fn test_regrowth_scales_with_ground() {
        let mut grass = Territory::new(GroundType::Grass, 0);
        let mut forest = Territory::new(GroundType::Forest, 0);
        let mut water = Territory::new(GroundType::Water, 0);
        grass.regrow(1, 20);
        forest.regrow(1, 20);
        water.regrow(1, 20);
        assert_eq!(grass.resource(), 1);
        assert_eq!(forest.resource(), 2);
        assert_eq!(water.resource(), 0);
    }

    #[test]
    fn test_regrowth_capped() {
        let mut t = Territory::new(GroundType::Forest, 19);
        t.regrow(1, 20);
        assert_eq!(t.resource(), 20);
    }
}
