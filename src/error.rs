//! Error types for the uniform coloring crate.

use thiserror::Error;

use crate::engine::Position;

/// What exactly is wrong with a grid handed to [`crate::engine::GridState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridDefect {
    /// The grid has no rows, or its first row has no cells.
    Empty,
    /// A row's length differs from the first row's.
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },
    /// No cell holds the head marker.
    MissingHead,
    /// More than one cell holds the head marker.
    MultipleHeads { positions: Vec<Position> },
    /// The caller claimed a head position that does not hold the marker.
    HeadMismatch { claimed: Position, actual: Position },
}

impl std::fmt::Display for GridDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridDefect::Empty => write!(f, "grid must have at least one row and one column"),
            GridDefect::RaggedRow { row, expected, got } => {
                write!(f, "row {row} has {got} cells, expected {expected}")
            }
            GridDefect::MissingHead => write!(f, "head marker not found"),
            GridDefect::MultipleHeads { positions } => {
                write!(f, "head marker found {} times: ", positions.len())?;
                for (i, p) in positions.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                Ok(())
            }
            GridDefect::HeadMismatch { claimed, actual } => {
                write!(f, "claimed head at {claimed} but marker is at {actual}")
            }
        }
    }
}

/// Main error type for the crate.
///
/// Searches that end without a goal are not errors; see
/// [`crate::solver::SearchOutcome`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid grid: {0}")]
    InvalidGrid(GridDefect),

    #[error("cost table is empty")]
    EmptyCostTable,

    #[error("color '{label}' at {position} has no entry in the cost table")]
    UnknownColor { label: char, position: Position },

    #[error("head marker '{marker}' cannot be used as a color")]
    MarkerInCostTable { marker: char },

    #[error("target color '{label}' is not in the cost table")]
    UnknownTargetColor { label: char },

    #[error("color '{label}' appears more than once in the cost table")]
    DuplicateColor { label: char },

    #[error("cost {cost} for color '{label}' exceeds the maximum of {max}")]
    CostOutOfRange { label: char, cost: u64, max: u64 },

    #[error("invalid cost table entry '{entry}': {reason}")]
    CostTableSyntax { entry: String, reason: String },
}

impl From<GridDefect> for Error {
    fn from(defect: GridDefect) -> Self {
        Error::InvalidGrid(defect)
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
