//! Core state representation for the uniform coloring puzzle.
//!
//! This module defines the puzzle's fundamental value types:
//! - `Position`: a 0-indexed (row, column) cell coordinate.
//! - `Action`: the five things the head can do (four moves and a repaint).
//! - `Grid`: an immutable rectangular grid of single-character color labels.
//! - `GridState`: a grid paired with the current head position. This is the
//!   search state, so equality and hashing are structural.
//!
//! Grids are never edited in place. Every change goes through
//! [`Grid::with_cell`], which returns a fresh grid and leaves the original
//! untouched, so states can be used as hash keys without aliasing surprises.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;

use crate::error::{Error, GridDefect, Result};

/// The label that marks the head's starting cell.
///
/// Exactly one cell of an input grid must hold this label. During a search it
/// stays pinned to the start cell while the head itself moves around.
pub const HEAD_MARKER: char = 'T';

/// A 0-indexed (row, column) coordinate on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// Manhattan (taxicab) distance between two positions.
    ///
    /// # Examples
    /// ```
    /// use uniform_coloring::engine::Position;
    /// assert_eq!(Position::new(0, 1).manhattan_distance(Position::new(3, 0)), 4);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One step the head can take.
///
/// Moves are orthogonal only. `Paint` repaints the head's current cell with
/// the problem's target color; its meaning is defined by the transition
/// function in [`crate::problem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Paint,
}

impl Action {
    /// The four movement actions, in the order they are offered to the search.
    pub const MOVES: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Returns `true` for the four movement actions.
    pub fn is_move(self) -> bool {
        !matches!(self, Action::Paint)
    }

    /// Row/column delta of a movement action, `None` for `Paint`.
    fn delta(self) -> Option<(isize, isize)> {
        match self {
            Action::Up => Some((-1, 0)),
            Action::Down => Some((1, 0)),
            Action::Left => Some((0, -1)),
            Action::Right => Some((0, 1)),
            Action::Paint => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Up => "Up",
            Action::Down => "Down",
            Action::Left => "Left",
            Action::Right => "Right",
            Action::Paint => "Paint",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable rectangular grid of color labels, stored row-major.
///
/// Construction checks that the grid is non-empty and rectangular; it says
/// nothing about the head marker (that is [`GridState`]'s job).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Box<[char]>,
}

impl Grid {
    /// Builds a grid from a slice of rows.
    ///
    /// # Errors
    /// Returns [`Error::InvalidGrid`] if there are no rows, the first row is
    /// empty, or any row's length differs from the first row's.
    pub fn from_rows<R: AsRef<[char]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        if cols == 0 {
            return Err(GridDefect::Empty.into());
        }

        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(GridDefect::RaggedRow {
                    row: r,
                    expected: cols,
                    got: row.len(),
                }
                .into());
            }
            cells.extend_from_slice(row);
        }

        Ok(Grid {
            rows: rows.len(),
            cols,
            cells: cells.into_boxed_slice(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false` for a constructed grid; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns `true` if `pos` lies inside the grid.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Returns the label at `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is outside the grid.
    pub fn get(&self, pos: Position) -> char {
        assert!(self.contains(pos), "position {pos} outside {}x{} grid", self.rows, self.cols);
        self.cells[pos.row * self.cols + pos.col]
    }

    /// Returns a copy of this grid with `pos` relabelled.
    ///
    /// The receiver is left untouched. If the cell already holds `label`
    /// the copy is still made, so callers never share storage with a state
    /// they did not build.
    ///
    /// # Panics
    /// Panics if `pos` is outside the grid.
    pub fn with_cell(&self, pos: Position, label: char) -> Grid {
        assert!(self.contains(pos), "position {pos} outside {}x{} grid", self.rows, self.cols);
        let mut cells = self.cells.clone();
        cells[pos.row * self.cols + pos.col] = label;
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }

    /// Iterates over every cell in row-major order together with its label.
    pub fn cells(&self) -> impl Iterator<Item = (Position, char)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &label)| (Position::new(i / self.cols, i % self.cols), label))
    }

    /// Returns row `r` as a string.
    ///
    /// # Panics
    /// Panics if `r` is not a row of the grid.
    pub fn row_string(&self, r: usize) -> String {
        assert!(r < self.rows, "row {r} outside {}x{} grid", self.rows, self.cols);
        self.cells[r * self.cols..(r + 1) * self.cols].iter().collect()
    }

    /// Where the head would land after `action` from `from`.
    ///
    /// Returns `None` for `Paint` and for moves that would leave the grid.
    pub fn step(&self, from: Position, action: Action) -> Option<Position> {
        let (dr, dc) = action.delta()?;
        let row = from.row.checked_add_signed(dr)?;
        let col = from.col.checked_add_signed(dc)?;
        let to = Position::new(row, col);
        self.contains(to).then_some(to)
    }

    fn positions_of(&self, label: char) -> Vec<Position> {
        self.cells()
            .filter(|&(_, l)| l == label)
            .map(|(p, _)| p)
            .collect()
    }
}

/// A search state: a grid plus the head's current position.
///
/// Two states are equal iff both their grids and head positions are equal.
/// The start cell always holds [`HEAD_MARKER`]; the head itself may be
/// anywhere on the grid.
///
/// # Examples
/// ```
/// use uniform_coloring::engine::{Grid, GridState, Position};
///
/// let rows: Vec<Vec<char>> = ["GTG", "BGB"].iter().map(|r| r.chars().collect()).collect();
/// let state = GridState::new(Grid::from_rows(&rows).unwrap()).unwrap();
/// assert_eq!(state.head(), Position::new(0, 1));
///
/// let rows: Vec<Vec<char>> = ["TT"].iter().map(|r| r.chars().collect()).collect();
/// assert!(GridState::new(Grid::from_rows(&rows).unwrap()).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridState {
    grid: Grid,
    head: Position,
}

impl GridState {
    /// Validates `grid` and places the head on its single marker cell.
    ///
    /// # Errors
    /// Returns [`Error::InvalidGrid`] if the marker occurs zero times or more
    /// than once.
    pub fn new(grid: Grid) -> Result<Self> {
        let mut markers = grid.positions_of(HEAD_MARKER);
        match markers.len() {
            0 => Err(GridDefect::MissingHead.into()),
            1 => {
                let head = markers.remove(0);
                Ok(GridState { grid, head })
            }
            _ => Err(GridDefect::MultipleHeads { positions: markers }.into()),
        }
    }

    /// Like [`GridState::new`], but also checks the caller's idea of where
    /// the head is against the marker actually present.
    ///
    /// # Errors
    /// Returns [`Error::InvalidGrid`] for any defect `new` reports, or
    /// [`GridDefect::HeadMismatch`] if `claimed` is not the marker cell.
    pub fn with_claimed_head(grid: Grid, claimed: Position) -> Result<Self> {
        let state = GridState::new(grid)?;
        if state.head != claimed {
            return Err(GridDefect::HeadMismatch {
                claimed,
                actual: state.head,
            }
            .into());
        }
        Ok(state)
    }

    /// Assembles a state without validation. Only the transition function
    /// uses this, on grids derived from an already validated state.
    pub(crate) fn from_parts(grid: Grid, head: Position) -> Self {
        debug_assert!(grid.contains(head));
        GridState { grid, head }
    }

    /// Creates a random state with a reproducible layout.
    ///
    /// Every cell gets a color drawn uniformly from `colors`, then one cell,
    /// also chosen at random, is overwritten with the head marker.
    ///
    /// # Errors
    /// - [`Error::InvalidGrid`] if `rows` or `cols` is zero.
    /// - [`Error::EmptyCostTable`] if `colors` is empty.
    /// - [`Error::MarkerInCostTable`] if `colors` contains the head marker.
    pub fn random_with_seed(rows: usize, cols: usize, colors: &[char], seed: u64) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GridDefect::Empty.into());
        }
        if colors.is_empty() {
            return Err(Error::EmptyCostTable);
        }
        if colors.contains(&HEAD_MARKER) {
            return Err(Error::MarkerInCostTable {
                marker: HEAD_MARKER,
            });
        }

        let mut rng = SmallRng::seed_from_u64(seed);
        let mut grid_rows: Vec<Vec<char>> = (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| colors[rng.gen_range(0..colors.len())])
                    .collect()
            })
            .collect();
        let head = Position::new(rng.gen_range(0..rows), rng.gen_range(0..cols));
        grid_rows[head.row][head.col] = HEAD_MARKER;

        GridState::new(Grid::from_rows(&grid_rows)?)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn head(&self) -> Position {
        self.head
    }

    /// Renders the grid with row/column numbers, bracketing the cell at `pos`.
    pub fn to_string_with_highlight(&self, pos: Option<Position>) -> String {
        let mut output = String::from("   ");
        for c in 0..self.grid.cols() {
            output.push_str(&format!("{c:^3}"));
        }

        for r in 0..self.grid.rows() {
            output.push('\n');
            output.push_str(&format!("{r:<3}"));
            for c in 0..self.grid.cols() {
                let here = Position::new(r, c);
                let label = self.grid.get(here);
                if pos == Some(here) {
                    output.push_str(&format!("[{label}]"));
                } else {
                    output.push_str(&format!(" {label} "));
                }
            }
        }

        output
    }
}

impl fmt::Display for GridState {
    /// Formats the grid with the head's current cell bracketed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(Some(self.head)))
    }
}
