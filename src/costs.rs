//! Repaint costs and the pre-search target color estimate.
//!
//! `ColorCostTable` maps every color label to what one repaint into that
//! color costs. `ColorCostEstimator` uses it to rank candidate target colors
//! before any search runs: for each color it adds up the cost of repainting
//! every cell that does not already hold it. Movement is ignored, so the
//! tally is independent of where the head is and of the order cells are
//! visited in.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::engine::{GridState, HEAD_MARKER};
use crate::error::{Error, Result};

/// Largest repaint cost a table accepts.
///
/// Keeps every path cost and repaint tally well inside `u64` for any grid
/// that fits in memory.
pub const MAX_REPAINT_COST: u64 = u32::MAX as u64;

/// Cost of one repaint, per color label.
///
/// Labels are kept in ascending character order. That order is the
/// tie-break used by [`ColorCostEstimator`] and the order colors are tried
/// in by [`crate::solver::solve_each_color`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorCostTable {
    costs: BTreeMap<char, u64>,
}

impl ColorCostTable {
    /// Builds a table from `(label, cost)` pairs.
    ///
    /// # Errors
    /// - [`Error::EmptyCostTable`] if no pairs are supplied.
    /// - [`Error::MarkerInCostTable`] if the head marker is given a cost.
    /// - [`Error::DuplicateColor`] if a label appears twice.
    /// - [`Error::CostOutOfRange`] if a cost exceeds [`MAX_REPAINT_COST`].
    pub fn new<I: IntoIterator<Item = (char, u64)>>(entries: I) -> Result<Self> {
        let mut costs = BTreeMap::new();
        for (label, cost) in entries {
            if cost > MAX_REPAINT_COST {
                return Err(Error::CostOutOfRange {
                    label,
                    cost,
                    max: MAX_REPAINT_COST,
                });
            }
            if costs.insert(label, cost).is_some() {
                return Err(Error::DuplicateColor { label });
            }
        }
        if costs.is_empty() {
            return Err(Error::EmptyCostTable);
        }
        if costs.contains_key(&HEAD_MARKER) {
            return Err(Error::MarkerInCostTable {
                marker: HEAD_MARKER,
            });
        }
        Ok(ColorCostTable { costs })
    }

    /// Cost of painting one cell `label`, or `None` if the color is unknown.
    pub fn cost(&self, label: char) -> Option<u64> {
        self.costs.get(&label).copied()
    }

    pub fn contains(&self, label: char) -> bool {
        self.costs.contains_key(&label)
    }

    /// Color labels in tie-break order.
    pub fn colors(&self) -> impl Iterator<Item = char> + '_ {
        self.costs.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    /// Always `false` for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

impl FromStr for ColorCostTable {
    type Err = Error;

    /// Parses `label=cost` pairs separated by commas, e.g. `B=1,Y=2,G=3`.
    /// Whitespace around entries and around `=` is ignored. Each label may
    /// appear once, with a cost of at most [`MAX_REPAINT_COST`].
    fn from_str(s: &str) -> Result<Self> {
        let mut entries: Vec<(char, u64)> = Vec::new();
        for raw in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let syntax = |reason: &str| Error::CostTableSyntax {
                entry: raw.to_string(),
                reason: reason.to_string(),
            };

            let (label, cost) = raw.split_once('=').ok_or_else(|| syntax("expected label=cost"))?;
            let mut label_chars = label.trim().chars();
            let label = match (label_chars.next(), label_chars.next()) {
                (Some(c), None) => c,
                _ => return Err(syntax("label must be a single character")),
            };
            let cost = cost
                .trim()
                .parse::<u64>()
                .map_err(|e| syntax(&e.to_string()))?;
            if cost > MAX_REPAINT_COST {
                return Err(syntax(&format!("cost exceeds {MAX_REPAINT_COST}")));
            }
            if entries.iter().any(|&(seen, _)| seen == label) {
                return Err(syntax("duplicate label"));
            }
            entries.push((label, cost));
        }
        ColorCostTable::new(entries)
    }
}

impl fmt::Display for ColorCostTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (label, cost)) in self.costs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{label}={cost}")?;
        }
        Ok(())
    }
}

/// Result of ranking every candidate target color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorEstimate {
    /// Total repaint cost for each color in the table.
    pub totals: BTreeMap<char, u64>,
    /// The cheapest color. Ties go to the first color in table order.
    pub best_color: char,
    /// `totals[best_color]`.
    pub best_cost: u64,
}

/// Ranks target colors by the flat repaint tally described in the module docs.
#[derive(Clone, Copy, Debug)]
pub struct ColorCostEstimator<'a> {
    table: &'a ColorCostTable,
}

impl<'a> ColorCostEstimator<'a> {
    pub fn new(table: &'a ColorCostTable) -> Self {
        ColorCostEstimator { table }
    }

    /// Repaint cost of turning every non-marker cell of `state` into `color`.
    ///
    /// # Errors
    /// - [`Error::UnknownTargetColor`] if `color` is not in the table.
    /// - [`Error::UnknownColor`] if some cell holds a label the table lacks.
    pub fn total_for(&self, state: &GridState, color: char) -> Result<u64> {
        let unit = self
            .table
            .cost(color)
            .ok_or(Error::UnknownTargetColor { label: color })?;

        let mut total = 0u64;
        for (position, label) in state.grid().cells() {
            if label == HEAD_MARKER {
                continue;
            }
            if !self.table.contains(label) {
                return Err(Error::UnknownColor { label, position });
            }
            if label != color {
                total = total.saturating_add(unit);
            }
        }
        Ok(total)
    }

    /// Computes the tally for every color and picks the cheapest.
    ///
    /// # Errors
    /// Returns [`Error::UnknownColor`] if a cell holds a label the table
    /// lacks. The empty-table case cannot arise here because
    /// [`ColorCostTable::new`] refuses to build one.
    ///
    /// # Examples
    /// ```
    /// use uniform_coloring::costs::{ColorCostEstimator, ColorCostTable};
    /// use uniform_coloring::utils::grid_from_str_array;
    ///
    /// let state = grid_from_str_array(&["GTG", "GGG", "GGG", "YYB"]).unwrap();
    /// let table: ColorCostTable = "B=1,Y=2,G=3".parse().unwrap();
    /// let estimate = ColorCostEstimator::new(&table).estimate(&state).unwrap();
    /// assert_eq!(estimate.best_color, 'G');
    /// assert_eq!(estimate.best_cost, 9);
    /// ```
    pub fn estimate(&self, state: &GridState) -> Result<ColorEstimate> {
        let mut totals = BTreeMap::new();
        let mut best: Option<(char, u64)> = None;

        for color in self.table.colors() {
            let total = self.total_for(state, color)?;
            totals.insert(color, total);
            // Strict `<` keeps the first color in table order on ties.
            if best.map_or(true, |(_, cost)| total < cost) {
                best = Some((color, total));
            }
        }

        let (best_color, best_cost) = best.ok_or(Error::EmptyCostTable)?;
        log::debug!("color estimate: {totals:?}, choosing '{best_color}' at {best_cost}");
        Ok(ColorEstimate {
            totals,
            best_color,
            best_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Position;
    use crate::utils::grid_from_str_array;

    fn default_table() -> ColorCostTable {
        ColorCostTable::new([('B', 1), ('Y', 2), ('G', 3)]).unwrap()
    }

    #[test]
    fn test_estimate_mostly_green_grid() {
        let state = grid_from_str_array(&["GTG", "GGG", "GGG", "YYB"]).unwrap();
        let table = default_table();
        let estimate = ColorCostEstimator::new(&table).estimate(&state).unwrap();

        // 11 non-head cells: 8 G, 2 Y, 1 B.
        assert_eq!(estimate.totals[&'B'], 10);
        assert_eq!(estimate.totals[&'Y'], 18);
        assert_eq!(estimate.totals[&'G'], 9);
        assert_eq!(estimate.best_color, 'G');
        assert_eq!(estimate.best_cost, 9);
    }

    #[test]
    fn test_estimate_covers_every_color_and_picks_minimum() {
        let table = default_table();
        let estimator = ColorCostEstimator::new(&table);
        for seed in 0..20 {
            let state = GridState::random_with_seed(3, 4, &['B', 'Y', 'G'], seed).unwrap();
            let estimate = estimator.estimate(&state).unwrap();
            assert_eq!(estimate.totals.len(), table.len());
            let min = *estimate.totals.values().min().unwrap();
            assert_eq!(estimate.best_cost, min, "seed {seed}");
            assert_eq!(estimate.totals[&estimate.best_color], min);
        }
    }

    #[test]
    fn test_ties_go_to_first_color_in_table_order() {
        // A is the majority color, but Z is cheaper per repaint.
        let state = grid_from_str_array(&["AAT", "ZZA"]).unwrap();
        let table = ColorCostTable::new([('Z', 1), ('A', 2)]).unwrap();
        let estimate = ColorCostEstimator::new(&table).estimate(&state).unwrap();
        assert_eq!(estimate.totals[&'A'], 4);
        assert_eq!(estimate.totals[&'Z'], 3);
        assert_eq!(estimate.best_color, 'Z');

        let state = grid_from_str_array(&["ATZ"]).unwrap();
        let table = ColorCostTable::new([('Z', 1), ('A', 1)]).unwrap();
        let estimate = ColorCostEstimator::new(&table).estimate(&state).unwrap();
        assert_eq!(estimate.totals[&'A'], 1);
        assert_eq!(estimate.totals[&'Z'], 1);
        assert_eq!(estimate.best_color, 'A', "A sorts before Z");
    }

    #[test]
    fn test_estimate_ignores_head_position() {
        let state = grid_from_str_array(&["BTY", "YYB"]).unwrap();
        let moved = GridState::from_parts(state.grid().clone(), Position::new(1, 2));
        let table = default_table();
        let estimator = ColorCostEstimator::new(&table);
        assert_eq!(estimator.estimate(&state), estimator.estimate(&moved));
    }

    #[test]
    fn test_single_head_cell_costs_nothing() {
        let state = grid_from_str_array(&["T"]).unwrap();
        let table = default_table();
        let estimate = ColorCostEstimator::new(&table).estimate(&state).unwrap();
        assert!(estimate.totals.values().all(|&t| t == 0));
        assert_eq!(estimate.best_color, 'B');
    }

    #[test]
    fn test_unknown_color_reported_with_position() {
        let state = grid_from_str_array(&["GTG", "GRG"]).unwrap();
        let table = default_table();
        let err = ColorCostEstimator::new(&table).estimate(&state).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownColor {
                label: 'R',
                position: Position::new(1, 1)
            }
        );
    }

    #[test]
    fn test_unknown_target_color() {
        let state = grid_from_str_array(&["GT"]).unwrap();
        let table = default_table();
        let err = ColorCostEstimator::new(&table)
            .total_for(&state, 'R')
            .unwrap_err();
        assert_eq!(err, Error::UnknownTargetColor { label: 'R' });
    }

    #[test]
    fn test_empty_table_rejected() {
        let empty: [(char, u64); 0] = [];
        assert_eq!(ColorCostTable::new(empty).unwrap_err(), Error::EmptyCostTable);
        assert_eq!("".parse::<ColorCostTable>().unwrap_err(), Error::EmptyCostTable);
    }

    #[test]
    fn test_marker_cannot_have_a_cost() {
        let err = ColorCostTable::new([('T', 1)]).unwrap_err();
        assert_eq!(err, Error::MarkerInCostTable { marker: 'T' });
    }

    #[test]
    fn test_parse_cost_table() {
        let table: ColorCostTable = " B = 1, Y=2 ,G=3 ".parse().unwrap();
        assert_eq!(table, default_table());
        assert_eq!(table.to_string(), "B=1,G=3,Y=2");

        let err = "B1".parse::<ColorCostTable>().unwrap_err();
        assert!(matches!(err, Error::CostTableSyntax { .. }));
        let err = "BB=1".parse::<ColorCostTable>().unwrap_err();
        assert!(matches!(err, Error::CostTableSyntax { .. }));
        let err = "B=-1".parse::<ColorCostTable>().unwrap_err();
        assert!(matches!(err, Error::CostTableSyntax { .. }));
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let err = "B=1,Y=2,B=9".parse::<ColorCostTable>().unwrap_err();
        assert_eq!(
            err,
            Error::CostTableSyntax {
                entry: "B=9".to_string(),
                reason: "duplicate label".to_string(),
            }
        );
        let err = ColorCostTable::new([('B', 1), ('B', 9)]).unwrap_err();
        assert_eq!(err, Error::DuplicateColor { label: 'B' });
    }

    #[test]
    fn test_huge_cost_rejected() {
        let err = "B=1,Y=9223372036854775808".parse::<ColorCostTable>().unwrap_err();
        assert!(
            matches!(&err, Error::CostTableSyntax { entry, .. } if entry == "Y=9223372036854775808"),
            "{err}"
        );
        let err = ColorCostTable::new([('B', 1), ('Y', 1 << 63)]).unwrap_err();
        assert_eq!(
            err,
            Error::CostOutOfRange {
                label: 'Y',
                cost: 1 << 63,
                max: MAX_REPAINT_COST,
            }
        );
    }

    #[test]
    fn test_largest_cost_tallies_without_overflow() {
        let state = grid_from_str_array(&["TBBYY"]).unwrap();
        let table = ColorCostTable::new([('B', 1), ('Y', MAX_REPAINT_COST)]).unwrap();
        let estimate = ColorCostEstimator::new(&table).estimate(&state).unwrap();
        assert_eq!(estimate.totals[&'B'], 2);
        assert_eq!(estimate.totals[&'Y'], 2 * MAX_REPAINT_COST);
        assert_eq!(estimate.best_color, 'B');
    }
}
