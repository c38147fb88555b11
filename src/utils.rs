use crate::engine::{Grid, GridState};
use crate::error::Result;

/// Parses an array of string slices into a validated `GridState`.
///
/// Each string slice is one row, starting from row 0. Whitespace inside a row
/// is dropped, so `"G T G"` and `"GTG"` describe the same row; rows that are
/// blank after trimming are skipped. Every remaining character is a label,
/// and exactly one of them must be the head marker `T`.
///
/// # Returns
/// * `Ok(GridState)` with the head on the marker cell.
/// * `Err(Error::InvalidGrid)` if the rows are empty, ragged, or do not contain
///   exactly one head marker.
///
/// # Examples
/// ```
/// use uniform_coloring::engine::Position;
/// use uniform_coloring::utils::grid_from_str_array;
///
/// let state = grid_from_str_array(&["G T G", "BGB"]).unwrap();
/// assert_eq!(state.head(), Position::new(0, 1));
/// assert_eq!(state.grid().row_string(1), "BGB");
///
/// assert!(grid_from_str_array(&["GTB", "BYG", "TGG", "YYB"]).is_err());
/// ```
pub fn grid_from_str_array(s: &[&str]) -> Result<GridState> {
    let rows: Vec<Vec<char>> = s
        .iter()
        .map(|row| row.chars().filter(|c| !c.is_whitespace()).collect::<Vec<char>>())
        .filter(|row| !row.is_empty())
        .collect();
    GridState::new(Grid::from_rows(&rows)?)
}

/// Parses a multi-line grid, one row per line. Same rules as
/// [`grid_from_str_array`].
pub fn parse_grid(text: &str) -> Result<GridState> {
    let lines: Vec<&str> = text.lines().collect();
    grid_from_str_array(&lines)
}
