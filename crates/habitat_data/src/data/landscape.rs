use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer grid address of a landscape cell.
///
/// Ordering is lexical on `(x, y)`; movement tie-breaks rely on it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Coord {
    pub x: u16,
    pub y: u16,
}

impl Coord {
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Chessboard (8-directional) distance.
    #[must_use]
    pub fn chebyshev(self, other: Coord) -> u16 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// The neighbor in `dir`, or `None` when that would underflow.
    /// Upper bounds are the landscape's business.
    #[must_use]
    pub fn step(self, dir: Direction) -> Option<Coord> {
        let (dx, dy) = dir.delta();
        let x = i32::from(self.x) + dx;
        let y = i32::from(self.y) + dy;
        if x < 0 || y < 0 || x > i32::from(u16::MAX) || y > i32::from(u16::MAX) {
            return None;
        }
        Some(Coord::new(x as u16, y as u16))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(u16, u16)> for Coord {
    fn from((x, y): (u16, u16)) -> Self {
        Self::new(x, y)
    }
}

/// Compass direction on the grid. `y` grows southwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// Fixed enumeration order for neighbor queries: N, NE, E, SE, S, SW, W, NW.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// Parses the player's four-way intent (`up`, `down`, `left`, `right`).
    #[must_use]
    pub fn from_intent(intent: &str) -> Option<Self> {
        match intent.to_ascii_lowercase().as_str() {
            "up" | "north" => Some(Direction::North),
            "down" | "south" => Some(Direction::South),
            "left" | "west" => Some(Direction::West),
            "right" | "east" => Some(Direction::East),
            _ => None,
        }
    }
}

/// Ground type of a landscape cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GroundType {
    /// Open grassland, the default.
    #[default]
    Grass,
    /// Dense woodland with fast regrowth.
    Forest,
    /// Dry sand with little to eat.
    Sand,
    /// Open water. Drinkable; only flyers and swimmers enter.
    Water,
    /// Bare rock. Only flyers enter.
    Rock,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chebyshev_distance() {
        let a = Coord::new(2, 2);
        assert_eq!(a.chebyshev(Coord::new(5, 5)), 3);
        assert_eq!(a.chebyshev(Coord::new(2, 7)), 5);
        assert_eq!(a.chebyshev(a), 0);
    }

    #[test]
    fn test_step_underflow() {
        assert_eq!(Coord::new(0, 0).step(Direction::North), None);
        assert_eq!(Coord::new(0, 0).step(Direction::West), None);
        assert_eq!(
            Coord::new(0, 0).step(Direction::SouthEast),
            Some(Coord::new(1, 1))
        );
    }

    #[test]
    fn test_coord_order_is_lexical() {
        assert!(Coord::new(1, 9) < Coord::new(2, 0));
        assert!(Coord::new(2, 0) < Coord::new(2, 1));
    }

    #[test]
    fn test_intent_parsing() {
        assert_eq!(Direction::from_intent("UP"), Some(Direction::North));
        assert_eq!(Direction::from_intent("left"), Some(Direction::West));
        assert_eq!(Direction::from_intent("jump"), None);
    }
}
