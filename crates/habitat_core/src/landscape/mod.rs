//! The territory grid: spatial queries and the occupancy registry.
//!
//! The landscape owns every cell and is the single record of where each
//! animal stands. An animal's own `position` mirrors that record and is only
//! ever written from here, so the two cannot drift apart.

use crate::animal::Animal;
use crate::error::{Result, SimError};
pub use habitat_data::{Coord, Direction};
use habitat_data::AnimalId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub mod generation;
pub mod territory;

pub use territory::{GroundLogic, GroundType, Territory};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Landscape {
    width: u16,
    height: u16,
    density_cap: usize,
    resource_max: u32,
    cells: Vec<Territory>,
}

impl Landscape {
    /// An all-grass landscape with every food stock full.
    #[must_use]
    pub fn new(width: u16, height: u16, density_cap: usize, resource_max: u32) -> Self {
        let cells = vec![
            Territory::new(GroundType::Grass, resource_max);
            usize::from(width) * usize::from(height)
        ];
        Self {
            width,
            height,
            density_cap: density_cap.max(1),
            resource_max,
            cells,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn density_cap(&self) -> usize {
        self.density_cap
    }

    pub fn resource_max(&self) -> u32 {
        self.resource_max
    }

    #[inline(always)]
    pub fn in_bounds(&self, c: Coord) -> bool {
        c.x < self.width && c.y < self.height
    }

    #[inline(always)]
    fn index(&self, c: Coord) -> usize {
        usize::from(c.y) * usize::from(self.width) + usize::from(c.x)
    }

    fn coord_of(&self, idx: usize) -> Coord {
        let w = usize::from(self.width);
        Coord::new((idx % w) as u16, (idx / w) as u16)
    }

    /// Read-only view of the cell at `(x, y)`.
    pub fn cell_at(&self, x: u16, y: u16) -> Option<&Territory> {
        self.cell(Coord::new(x, y))
    }

    pub fn cell(&self, c: Coord) -> Option<&Territory> {
        if self.in_bounds(c) {
            Some(&self.cells[self.index(c)])
        } else {
            None
        }
    }

    pub(crate) fn cell_mut(&mut self, c: Coord) -> Option<&mut Territory> {
        if self.in_bounds(c) {
            let idx = self.index(c);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, &Territory)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, t)| (self.coord_of(i), t))
    }

    pub fn ground_at(&self, c: Coord) -> Option<GroundType> {
        self.cell(c).map(Territory::ground)
    }

    /// Changes a cell's ground. Existing occupants are left in place.
    pub fn set_ground(&mut self, c: Coord, ground: GroundType) -> Result<()> {
        let max = self.resource_max;
        let cell = self.cell_mut(c).ok_or(SimError::OutOfBounds(c))?;
        cell.set_ground(ground);
        if ground.regrowth_modifier() == 0 {
            cell.set_resource(0);
        } else if cell.resource() == 0 {
            cell.set_resource(max);
        }
        Ok(())
    }

    pub fn set_resource(&mut self, c: Coord, resource: u32) -> Result<()> {
        let max = self.resource_max;
        let cell = self.cell_mut(c).ok_or(SimError::OutOfBounds(c))?;
        cell.set_resource(resource.min(max));
        Ok(())
    }

    /// The up-to-8 in-bounds neighbors of `c`, in N, NE, E, SE, S, SW, W, NW
    /// order. Lazy; clone the iterator to walk it again.
    pub fn neighbors_of(&self, c: Coord) -> impl Iterator<Item = Coord> + Clone + '_ {
        Direction::ALL
            .iter()
            .filter_map(move |d| c.step(*d))
            .filter(move |n| self.in_bounds(*n))
    }

    /// Cells within `max_radius` of `origin`, in breadth-first discovery order.
    pub fn breadth_first(&self, origin: Coord, max_radius: u16) -> BreadthFirst<'_> {
        BreadthFirst::new(self, origin, max_radius)
    }

    /// The first cell, in breadth-first order from `origin`, that satisfies
    /// `predicate`. `origin` itself is tested first.
    pub fn nearest_of_kind<P>(&self, origin: Coord, mut predicate: P, max_radius: u16) -> Option<Coord>
    where
        P: FnMut(Coord, &Territory) -> bool,
    {
        self.breadth_first(origin, max_radius)
            .find(|c| predicate(*c, &self.cells[self.index(*c)]))
    }

    /// The first occupant satisfying `predicate`, scanning cells breadth-first
    /// and occupants in arrival order.
    pub fn nearest_occupant<P>(
        &self,
        origin: Coord,
        max_radius: u16,
        mut predicate: P,
    ) -> Option<(AnimalId, Coord)>
    where
        P: FnMut(AnimalId) -> bool,
    {
        for c in self.breadth_first(origin, max_radius) {
            let cell = &self.cells[self.index(c)];
            if let Some(id) = cell.occupants().iter().copied().find(|id| predicate(*id)) {
                return Some((id, c));
            }
        }
        None
    }

    /// Occupants of `c` and its neighbors.
    pub fn occupants_near(&self, c: Coord) -> Vec<AnimalId> {
        let mut ids = Vec::new();
        if let Some(cell) = self.cell(c) {
            ids.extend_from_slice(cell.occupants());
        }
        for n in self.neighbors_of(c) {
            ids.extend_from_slice(self.cells[self.index(n)].occupants());
        }
        ids
    }

    /// True if `c` is water or touches water.
    pub fn is_near_water(&self, c: Coord) -> bool {
        self.ground_at(c).is_some_and(|g| g.is_drinkable())
            || self
                .neighbors_of(c)
                .any(|n| self.cells[self.index(n)].ground().is_drinkable())
    }

    pub fn has_room(&self, c: Coord) -> bool {
        self.cell(c)
            .is_some_and(|cell| cell.occupant_count() < self.density_cap)
    }

    /// Shortest 8-directional path from `from` to `to` through cells the
    /// caller can enter, staying within `max_radius` of `from`. The result
    /// excludes `from` and ends at `to`. Occupancy is not considered.
    pub fn find_path<F>(&self, from: Coord, to: Coord, max_radius: u16, can_enter: F) -> Option<Vec<Coord>>
    where
        F: Fn(GroundType) -> bool,
    {
        if !self.in_bounds(from) || !self.in_bounds(to) {
            return None;
        }
        if from == to {
            return Some(Vec::new());
        }
        if !can_enter(self.cells[self.index(to)].ground()) {
            return None;
        }

        let mut parent: Vec<Option<usize>> = vec![None; self.cells.len()];
        let mut visited = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        visited[self.index(from)] = true;
        queue.push_back(from);

        while let Some(c) = queue.pop_front() {
            for n in self.neighbors_of(c) {
                let ni = self.index(n);
                if visited[ni] || from.chebyshev(n) > max_radius {
                    continue;
                }
                visited[ni] = true;
                if !can_enter(self.cells[ni].ground()) {
                    continue;
                }
                parent[ni] = Some(self.index(c));
                if n == to {
                    let mut path = vec![n];
                    let start = self.index(from);
                    let mut cur = ni;
                    while let Some(p) = parent[cur] {
                        if p == start {
                            break;
                        }
                        path.push(self.coord_of(p));
                        cur = p;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(n);
            }
        }
        None
    }

    /// Registers `animal` in the cell at `at` and points its position there.
    ///
    /// An animal already registered anywhere on the landscape is rejected;
    /// use [`Landscape::move_occupant`] to relocate it.
    pub fn place(&mut self, animal: &mut Animal, at: Coord) -> Result<()> {
        if self.cells.iter().any(|cell| cell.contains(animal.id())) {
            return Err(SimError::invalid_input(format!(
                "animal {} is already on the landscape",
                animal.id()
            )));
        }
        self.check_entry(animal, at)?;
        let idx = self.index(at);
        self.cells[idx].add(animal.id());
        animal.set_position(at);
        Ok(())
    }

    /// Relocates `animal` from its current cell to `to` as one step: either
    /// both registry edits and the position update happen, or none do.
    ///
    /// Rejected with `OccupancyFull` when `to` is at the density cap, in which
    /// case the animal stays where it was.
    pub fn move_occupant(&mut self, animal: &mut Animal, to: Coord) -> Result<()> {
        let from = animal.position();
        if from == to {
            return Ok(());
        }
        self.check_entry(animal, to)?;
        let from_idx = self.index(from);
        let to_idx = self.index(to);
        debug_assert!(self.cells[from_idx].contains(animal.id()));
        self.cells[from_idx].remove(animal.id());
        self.cells[to_idx].add(animal.id());
        animal.set_position(to);
        tracing::trace!(id = %animal.id(), %from, %to, "Moved");
        Ok(())
    }

    fn check_entry(&self, animal: &Animal, at: Coord) -> Result<()> {
        let cell = self.cell(at).ok_or(SimError::OutOfBounds(at))?;
        if !animal.species().can_enter(cell.ground()) {
            return Err(SimError::Impassable(at));
        }
        if cell.occupant_count() >= self.density_cap {
            return Err(SimError::OccupancyFull { at });
        }
        Ok(())
    }

    /// Drops `id` from the cell at `at`. Returns whether it was there.
    pub fn remove(&mut self, id: AnimalId, at: Coord) -> bool {
        match self.cell_mut(at) {
            Some(cell) => cell.remove(id),
            None => false,
        }
    }

    /// Regrows every cell's food stock by `base` scaled by its ground type.
    pub fn regrow(&mut self, base: u32) {
        let max = self.resource_max;
        for cell in &mut self.cells {
            cell.regrow(base, max);
        }
    }

    pub fn occupant_total(&self) -> usize {
        self.cells.iter().map(Territory::occupant_count).sum()
    }

    /// Checks that every given animal is registered exactly once, in the cell
    /// its position names, and that nothing else is registered.
    pub fn is_consistent_with<'a>(&self, animals: impl IntoIterator<Item = &'a Animal>) -> bool {
        let mut expected = 0;
        for animal in animals {
            expected += 1;
            let registered: usize = self
                .cells
                .iter()
                .filter(|cell| cell.contains(animal.id()))
                .count();
            if registered != 1 {
                return false;
            }
            match self.cell(animal.position()) {
                Some(cell) if cell.contains(animal.id()) => {}
                _ => return false,
            }
        }
        expected == self.occupant_total()
    }
}

/// Lazy breadth-first walk over cells from an origin, bounded by a
/// chessboard radius. Discovery order follows [`Direction::ALL`].
pub struct BreadthFirst<'a> {
    landscape: &'a Landscape,
    origin: Coord,
    max_radius: u16,
    queue: VecDeque<Coord>,
    visited: Vec<bool>,
}

impl<'a> BreadthFirst<'a> {
    fn new(landscape: &'a Landscape, origin: Coord, max_radius: u16) -> Self {
        let mut visited = vec![false; landscape.cells.len()];
        let mut queue = VecDeque::new();
        if landscape.in_bounds(origin) {
            visited[landscape.index(origin)] = true;
            queue.push_back(origin);
        }
        Self {
            landscape,
            origin,
            max_radius,
            queue,
            visited,
        }
    }
}

impl Iterator for BreadthFirst<'_> {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        let c = self.queue.pop_front()?;
        for n in self.landscape.neighbors_of(c) {
            let ni = self.landscape.index(n);
            if !self.visited[ni] && self.origin.chebyshev(n) <= self.max_radius {
                self.visited[ni] = true;
                self.queue.push_back(n);
            }
        }
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::SpeciesDescriptor;
    use habitat_data::{Gender, SpeciesKind};

    fn rabbit(n: u128) -> Animal {
        Animal::new(
            AnimalId::from_bits(n),
            SpeciesDescriptor::default_for(SpeciesKind::Rabbit),
            Gender::Female,
        )
    }

    #[test]
    fn test_neighbors_order_and_bounds() {
        let land = Landscape::new(5, 5, 4, 20);
        let center: Vec<_> = land.neighbors_of(Coord::new(2, 2)).collect();
        assert_eq!(
            center,
            vec![
                Coord::new(2, 1),
                Coord::new(3, 1),
                Coord::new(3, 2),
                Coord::new(3, 3),
                Coord::new(2, 3),
                Coord::new(1, 3),
                Coord::new(1, 2),
                Coord::new(1, 1),
            ]
        );
        assert_eq!(land.neighbors_of(Coord::new(0, 0)).count(), 3);
        assert_eq!(land.neighbors_of(Coord::new(4, 2)).count(), 5);
    }

    #[test]
    fn test_neighbors_restartable() {
        let land = Landscape::new(5, 5, 4, 20);
        let it = land.neighbors_of(Coord::new(1, 1));
        let first: Vec<_> = it.clone().collect();
        let second: Vec<_> = it.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_nearest_of_kind_prefers_discovery_order() {
        let mut land = Landscape::new(7, 7, 4, 20);
        land.set_ground(Coord::new(3, 1), GroundType::Water).unwrap();
        land.set_ground(Coord::new(5, 3), GroundType::Water).unwrap();
        // both at distance 2 from (3, 3); north is discovered first
        let found = land.nearest_of_kind(
            Coord::new(3, 3),
            |_, t| t.ground() == GroundType::Water,
            3,
        );
        assert_eq!(found, Some(Coord::new(3, 1)));
    }

    #[test]
    fn test_nearest_of_kind_respects_radius() {
        let mut land = Landscape::new(9, 9, 4, 20);
        land.set_ground(Coord::new(8, 8), GroundType::Water).unwrap();
        let origin = Coord::new(0, 0);
        let water = |_: Coord, t: &Territory| t.ground() == GroundType::Water;
        assert_eq!(land.nearest_of_kind(origin, water, 7), None);
        assert_eq!(land.nearest_of_kind(origin, water, 8), Some(Coord::new(8, 8)));
    }

    #[test]
    fn test_origin_is_checked_first() {
        let land = Landscape::new(3, 3, 4, 20);
        let found = land.nearest_of_kind(Coord::new(1, 1), |_, _| true, 1);
        assert_eq!(found, Some(Coord::new(1, 1)));
    }

    #[test]
    fn test_breadth_first_covers_radius_once() {
        let land = Landscape::new(10, 10, 4, 20);
        let cells: Vec<_> = land.breadth_first(Coord::new(5, 5), 2).collect();
        assert_eq!(cells.len(), 25);
        let mut dedup = cells.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), 25);
        let dists: Vec<_> = cells.iter().map(|c| c.chebyshev(Coord::new(5, 5))).collect();
        assert!(dists.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_move_occupant_updates_both_sides() {
        let mut land = Landscape::new(5, 5, 4, 20);
        let mut a = rabbit(1);
        land.place(&mut a, Coord::new(1, 1)).unwrap();
        land.move_occupant(&mut a, Coord::new(2, 1)).unwrap();
        assert_eq!(a.position(), Coord::new(2, 1));
        assert!(!land.cell_at(1, 1).unwrap().contains(a.id()));
        assert!(land.cell_at(2, 1).unwrap().contains(a.id()));
        assert!(land.is_consistent_with([&a]));
    }

    #[test]
    fn test_second_place_is_rejected() {
        let mut land = Landscape::new(5, 5, 4, 20);
        let mut a = rabbit(1);
        land.place(&mut a, Coord::new(0, 0)).unwrap();
        assert!(matches!(
            land.place(&mut a, Coord::new(3, 3)),
            Err(SimError::InvalidInput(_))
        ));
        // a stale copy is caught too
        let mut copy = rabbit(1);
        assert!(land.place(&mut copy, Coord::new(3, 3)).is_err());

        assert_eq!(a.position(), Coord::new(0, 0));
        assert_eq!(land.occupant_total(), 1);
        assert!(land.cell_at(3, 3).unwrap().occupants().is_empty());
        assert!(land.is_consistent_with([&a]));
    }

    #[test]
    fn test_move_into_full_cell_is_rejected() {
        let mut land = Landscape::new(5, 5, 1, 20);
        let mut a = rabbit(1);
        let mut b = rabbit(2);
        land.place(&mut a, Coord::new(0, 0)).unwrap();
        land.place(&mut b, Coord::new(1, 0)).unwrap();
        let err = land.move_occupant(&mut a, Coord::new(1, 0)).unwrap_err();
        assert_eq!(
            err,
            SimError::OccupancyFull {
                at: Coord::new(1, 0)
            }
        );
        assert_eq!(a.position(), Coord::new(0, 0));
        assert!(land.is_consistent_with([&a, &b]));
    }

    #[test]
    fn test_move_into_water_is_impassable_for_rabbits() {
        let mut land = Landscape::new(5, 5, 4, 20);
        land.set_ground(Coord::new(1, 0), GroundType::Water).unwrap();
        let mut a = rabbit(1);
        land.place(&mut a, Coord::new(0, 0)).unwrap();
        assert_eq!(
            land.move_occupant(&mut a, Coord::new(1, 0)),
            Err(SimError::Impassable(Coord::new(1, 0)))
        );
        assert_eq!(
            land.move_occupant(&mut a, Coord::new(9, 9)),
            Err(SimError::OutOfBounds(Coord::new(9, 9)))
        );
        assert!(land.is_consistent_with([&a]));
    }

    #[test]
    fn test_find_path_goes_around_water() {
        let mut land = Landscape::new(5, 5, 4, 20);
        for y in 0..4 {
            land.set_ground(Coord::new(2, y), GroundType::Water).unwrap();
        }
        let path = land
            .find_path(Coord::new(0, 0), Coord::new(4, 0), 5, |g| g != GroundType::Water)
            .unwrap();
        assert_eq!(path.last(), Some(&Coord::new(4, 0)));
        assert!(path.contains(&Coord::new(2, 4)));
        for w in path.windows(2) {
            assert_eq!(w[0].chebyshev(w[1]), 1);
        }
    }

    #[test]
    fn test_find_path_is_shortest_on_open_ground() {
        let land = Landscape::new(10, 10, 4, 20);
        let path = land
            .find_path(Coord::new(1, 1), Coord::new(4, 3), 10, |_| true)
            .unwrap();
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_find_path_none_when_walled_off() {
        let mut land = Landscape::new(5, 5, 4, 20);
        for y in 0..5 {
            land.set_ground(Coord::new(2, y), GroundType::Water).unwrap();
        }
        assert!(land
            .find_path(Coord::new(0, 0), Coord::new(4, 0), 5, |g| g != GroundType::Water)
            .is_none());
    }

    #[test]
    fn test_regrow_caps_at_max() {
        let mut land = Landscape::new(2, 1, 4, 3);
        land.set_resource(Coord::new(0, 0), 0).unwrap();
        for _ in 0..5 {
            land.regrow(1);
        }
        assert_eq!(land.cell_at(0, 0).unwrap().resource(), 3);
    }

    #[test]
    fn test_regrowth_scales_with_ground() {
        let mut land = Landscape::new(3, 1, 4, 20);
        land.set_ground(Coord::new(1, 0), GroundType::Forest).unwrap();
        land.set_ground(Coord::new(2, 0), GroundType::Sand).unwrap();
        land.set_resource(Coord::new(0, 0), 0).unwrap();
        land.set_resource(Coord::new(1, 0), 0).unwrap();
        land.regrow(1);
        land.regrow(1);
        let stock: Vec<u32> = (0..3).map(|x| land.cell_at(x, 0).unwrap().resource()).collect();
        assert_eq!(stock, vec![2, 4, 0]);
    }

    #[test]
    fn test_near_water() {
        let mut land = Landscape::new(5, 5, 4, 20);
        land.set_ground(Coord::new(2, 2), GroundType::Water).unwrap();
        assert!(land.is_near_water(Coord::new(1, 1)));
        assert!(land.is_near_water(Coord::new(2, 2)));
        assert!(!land.is_near_water(Coord::new(0, 0)));
    }
}
