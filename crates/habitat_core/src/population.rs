//! The live-animal collection.
//!
//! Animals are kept in insertion order, which is also the update order within
//! a tick. A side index maps ids to slots and is rebuilt whenever slots shift.

use crate::animal::Animal;
use crate::error::{Result, SimError};
use habitat_data::{AnimalId, SpeciesKind};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default)]
pub struct Population {
    animals: Vec<Animal>,
    index: HashMap<AnimalId, usize>,
}

impl Population {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.animals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animals.is_empty()
    }

    /// Appends `animal` at the end of the update order.
    pub fn insert(&mut self, animal: Animal) -> Result<()> {
        if self.index.contains_key(&animal.id()) {
            return Err(SimError::invalid_input(format!(
                "animal {} is already registered",
                animal.id()
            )));
        }
        self.index.insert(animal.id(), self.animals.len());
        self.animals.push(animal);
        Ok(())
    }

    pub fn index_of(&self, id: AnimalId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn get(&self, id: AnimalId) -> Option<&Animal> {
        self.index_of(id).map(|i| &self.animals[i])
    }

    pub fn get_mut(&mut self, id: AnimalId) -> Option<&mut Animal> {
        self.index_of(id).map(move |i| &mut self.animals[i])
    }

    pub fn at(&self, idx: usize) -> Option<&Animal> {
        self.animals.get(idx)
    }

    pub fn at_mut(&mut self, idx: usize) -> Option<&mut Animal> {
        self.animals.get_mut(idx)
    }

    /// Two distinct animals borrowed mutably at once.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut Animal, &mut Animal)> {
        if a == b || a >= self.animals.len() || b >= self.animals.len() {
            return None;
        }
        if a < b {
            let (lo, hi) = self.animals.split_at_mut(b);
            Some((&mut lo[a], &mut hi[0]))
        } else {
            let (lo, hi) = self.animals.split_at_mut(a);
            Some((&mut hi[0], &mut lo[b]))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Animal> + '_ {
        self.animals.iter()
    }

    pub fn alive(&self) -> impl Iterator<Item = &Animal> + '_ {
        self.animals.iter().filter(|a| a.is_alive())
    }

    pub fn remove(&mut self, id: AnimalId) -> Option<Animal> {
        let idx = self.index.remove(&id)?;
        let animal = self.animals.remove(idx);
        self.reindex();
        Some(animal)
    }

    /// Takes every dead animal out, keeping the survivors' relative order.
    pub fn drain_dead(&mut self) -> Vec<Animal> {
        if self.animals.iter().all(Animal::is_alive) {
            return Vec::new();
        }
        let (alive, dead): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.animals).into_iter().partition(Animal::is_alive);
        self.animals = alive;
        self.reindex();
        dead
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, a) in self.animals.iter().enumerate() {
            self.index.insert(a.id(), i);
        }
    }

    /// Live head count per species.
    pub fn census(&self) -> BTreeMap<SpeciesKind, usize> {
        let mut counts = BTreeMap::new();
        for a in self.alive() {
            *counts.entry(a.kind()).or_insert(0) += 1;
        }
        counts
    }
}
