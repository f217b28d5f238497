//! Error types for the simulation engine.
//!
//! Every variant here is an expected, recoverable outcome of a single
//! action within a tick. None of them is allowed to end a run.

use habitat_data::{AnimalId, Capability, Coord, Direction};
use thiserror::Error;

/// Why a mating attempt produced no offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MateRejection {
    SameGender,
    DifferentSpecies,
    DifferentCell,
    NotViable,
    CoolingDown,
    Dead,
    NurseryFull,
}

impl std::fmt::Display for MateRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            MateRejection::SameGender => "partners share a gender",
            MateRejection::DifferentSpecies => "partners are different species",
            MateRejection::DifferentCell => "partners are not in the same cell",
            MateRejection::NotViable => "a partner is below the viability threshold",
            MateRejection::CoolingDown => "a partner is still cooling down",
            MateRejection::Dead => "a partner is dead",
            MateRejection::NurseryFull => "the cell has no room for offspring",
        };
        f.write_str(reason)
    }
}

/// Main error type for engine operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Negative damage or amount, or an otherwise malformed request.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid mate attempt: {0}")]
    InvalidMateAttempt(MateRejection),

    /// Destination cell is at its density cap; the mover holds position.
    #[error("Cell {at} is at its density cap")]
    OccupancyFull { at: Coord },

    /// No reachable target cell for seek, chase or flee.
    #[error("No path to target")]
    PathNotFound,

    #[error("Coordinate {0} is outside the landscape")]
    OutOfBounds(Coord),

    /// A one-cell step from `from` would cross the landscape's edge.
    #[error("Moving {direction:?} from {from} leaves the landscape")]
    LeavesLandscape { from: Coord, direction: Direction },

    /// The mover's species cannot stand on the destination ground.
    #[error("Cell {0} is impassable for this animal")]
    Impassable(Coord),

    /// The animal's species lacks the behavior asked of it.
    #[error("Animal lacks the {0} capability")]
    MissingCapability(Capability),

    #[error("Unknown animal {0}")]
    UnknownAnimal(AnimalId),

    #[error("No animal is under player control")]
    NotControlled,
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new invalid-input error.
    #[must_use]
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::invalid_input("damage must be non-negative");
        assert_eq!(
            err.to_string(),
            "Invalid input: damage must be non-negative"
        );
    }

    #[test]
    fn test_occupancy_display_names_cell() {
        let err = SimError::OccupancyFull {
            at: Coord::new(3, 4),
        };
        assert!(err.to_string().contains("(3, 4)"));
    }

    #[test]
    fn test_edge_display_names_origin_and_direction() {
        let err = SimError::LeavesLandscape {
            from: Coord::new(0, 2),
            direction: Direction::West,
        };
        let text = err.to_string();
        assert!(text.contains("West"));
        assert!(text.contains("(0, 2)"));
    }

    #[test]
    fn test_mate_rejection_display() {
        let err = SimError::InvalidMateAttempt(MateRejection::SameGender);
        assert!(err.to_string().contains("gender"));
    }
}
