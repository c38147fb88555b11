//! Problem definitions for the search engine.
//!
//! [`Problem`] is the contract the generic search in [`crate::solver`] runs
//! against: actions, transition, goal test, and path cost.
//! [`UniformColoringProblem`] binds a starting [`GridState`], a target color,
//! and a [`ColorCostTable`] into that contract.
use std::hash::Hash;

use crate::costs::ColorCostTable;
use crate::engine::{Action, Grid, GridState, Position, HEAD_MARKER};
use crate::error::{Error, Result};

/// Cost of moving the head by one cell.
pub const MOVE_COST: u64 = 1;

/// A state-space search problem.
///
/// Implementations must be deterministic: the same state always yields the
/// same actions in the same order, and `path_cost` must never decrease the
/// accumulated cost.
pub trait Problem {
    type State: Clone + Eq + Hash;
    type Action: Copy;

    fn initial(&self) -> &Self::State;

    /// Actions applicable in `state`, in a fixed order.
    fn actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// The state reached by applying `action` to `state`.
    ///
    /// Only called with actions returned by [`Problem::actions`] for the same state.
    fn result(&self, state: &Self::State, action: Self::Action) -> Self::State;

    fn goal_test(&self, state: &Self::State) -> bool;

    /// Accumulated cost after taking `action` from `from` to `to`, given the
    /// cost `cost` accumulated so far.
    fn path_cost(&self, cost: u64, from: &Self::State, action: Self::Action, to: &Self::State) -> u64;
}

/// Where the head has to be for a state to count as solved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GoalPolicy {
    /// Only the colors matter; the head may finish anywhere.
    #[default]
    AnyPosition,
    /// The colors must be uniform and the head must be back on its start cell.
    ReturnToStart,
}

/// The uniform coloring puzzle for one fixed target color.
///
/// The head starts on the marker cell. That cell is never painted and is
/// exempt from the goal test; it keeps showing [`HEAD_MARKER`] for the whole
/// search. Every other cell must end up holding the target color.
///
/// # Examples
/// ```
/// use uniform_coloring::costs::ColorCostTable;
/// use uniform_coloring::engine::Action;
/// use uniform_coloring::problem::{Problem, UniformColoringProblem};
/// use uniform_coloring::utils::grid_from_str_array;
///
/// let state = grid_from_str_array(&["TB"]).unwrap();
/// let table: ColorCostTable = "B=1,G=3".parse().unwrap();
/// let problem = UniformColoringProblem::new(state, 'G', table).unwrap();
///
/// let start = problem.initial().clone();
/// assert_eq!(problem.actions(&start), vec![Action::Right]);
/// let moved = problem.result(&start, Action::Right);
/// assert_eq!(problem.actions(&moved), vec![Action::Left, Action::Paint]);
/// let painted = problem.result(&moved, Action::Paint);
/// assert!(problem.goal_test(&painted));
/// ```
#[derive(Clone, Debug)]
pub struct UniformColoringProblem {
    initial: GridState,
    target: char,
    target_cost: u64,
    start: Position,
    goal_policy: GoalPolicy,
    costs: ColorCostTable,
}

impl UniformColoringProblem {
    /// Creates the problem of turning `initial` uniformly `target`.
    ///
    /// The start cell is taken from `initial`'s head position.
    ///
    /// # Errors
    /// Returns [`Error::UnknownTargetColor`] if `target` has no cost in `costs`.
    pub fn new(initial: GridState, target: char, costs: ColorCostTable) -> Result<Self> {
        let target_cost = costs
            .cost(target)
            .ok_or(Error::UnknownTargetColor { label: target })?;
        let start = initial.head();
        Ok(UniformColoringProblem {
            initial,
            target,
            target_cost,
            start,
            goal_policy: GoalPolicy::default(),
            costs,
        })
    }

    pub fn with_goal_policy(mut self, goal_policy: GoalPolicy) -> Self {
        self.goal_policy = goal_policy;
        self
    }

    pub fn target(&self) -> char {
        self.target
    }

    /// Cost of one repaint into the target color.
    pub fn target_cost(&self) -> u64 {
        self.target_cost
    }

    /// The cell the head started on, which keeps the marker.
    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal_policy(&self) -> GoalPolicy {
        self.goal_policy
    }

    pub fn costs(&self) -> &ColorCostTable {
        &self.costs
    }

    /// Cells that still need a repaint in `state`: everything off the start
    /// cell that does not hold the target color.
    pub fn miscolored_cells<'a>(&'a self, state: &'a GridState) -> impl Iterator<Item = Position> + 'a {
        state
            .grid()
            .cells()
            .filter(move |&(pos, label)| pos != self.start && label != self.target)
            .map(|(pos, _)| pos)
    }

    fn with_marker(&self, grid: Grid) -> Grid {
        if grid.get(self.start) == HEAD_MARKER {
            grid
        } else {
            grid.with_cell(self.start, HEAD_MARKER)
        }
    }
}

impl Problem for UniformColoringProblem {
    type State = GridState;
    type Action = Action;

    fn initial(&self) -> &GridState {
        &self.initial
    }

    /// In-bounds moves in `Up, Down, Left, Right` order, then `Paint` if the
    /// head is off the start cell and its cell is not yet the target color.
    fn actions(&self, state: &GridState) -> Vec<Action> {
        let head = state.head();
        let mut actions: Vec<Action> = Action::MOVES
            .into_iter()
            .filter(|&a| state.grid().step(head, a).is_some())
            .collect();

        if head != self.start && state.grid().get(head) != self.target {
            actions.push(Action::Paint);
        }
        actions
    }

    /// # Panics
    /// Panics if a move would leave the grid; `actions` never offers one.
    fn result(&self, state: &GridState, action: Action) -> GridState {
        let head = state.head();
        let (grid, head) = match action {
            Action::Paint => (state.grid().with_cell(head, self.target), head),
            _ => {
                let next = state.grid().step(head, action).unwrap_or_else(|| {
                    panic!("{action} from {head} leaves the grid")
                });
                (state.grid().clone(), next)
            }
        };
        GridState::from_parts(self.with_marker(grid), head)
    }

    fn goal_test(&self, state: &GridState) -> bool {
        if self.goal_policy == GoalPolicy::ReturnToStart && state.head() != self.start {
            return false;
        }
        self.miscolored_cells(state).next().is_none()
    }

    fn path_cost(&self, cost: u64, _from: &GridState, action: Action, _to: &GridState) -> u64 {
        match action {
            Action::Paint => cost.saturating_add(self.target_cost),
            _ => cost.saturating_add(MOVE_COST),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::grid_from_str_array;

    fn problem(rows: &[&str], target: char) -> UniformColoringProblem {
        let state = grid_from_str_array(rows).unwrap();
        let table = ColorCostTable::new([('B', 1), ('Y', 2), ('G', 3)]).unwrap();
        UniformColoringProblem::new(state, target, table).unwrap()
    }

    #[test]
    fn test_unknown_target_rejected() {
        let state = grid_from_str_array(&["TB"]).unwrap();
        let table = ColorCostTable::new([('B', 1)]).unwrap();
        let err = UniformColoringProblem::new(state, 'R', table).unwrap_err();
        assert_eq!(err, Error::UnknownTargetColor { label: 'R' });
    }

    #[test]
    fn test_actions_at_start_never_include_paint() {
        let p = problem(&["GGG", "GTG", "GGG"], 'B');
        let actions = p.actions(p.initial());
        assert_eq!(actions, Action::MOVES.to_vec());
    }

    #[test]
    fn test_actions_respect_bounds() {
        let p = problem(&["TB", "BB"], 'G');
        let start = p.initial().clone();
        assert_eq!(p.actions(&start), vec![Action::Down, Action::Right]);

        let corner = p.result(&p.result(&start, Action::Down), Action::Right);
        assert_eq!(corner.head(), Position::new(1, 1));
        assert_eq!(p.actions(&corner), vec![Action::Up, Action::Left, Action::Paint]);
    }

    #[test]
    fn test_paint_not_offered_on_target_colored_cell() {
        let p = problem(&["TG"], 'G');
        let moved = p.result(p.initial(), Action::Right);
        assert_eq!(p.actions(&moved), vec![Action::Left]);
    }

    #[test]
    fn test_move_keeps_colors_and_marker() {
        let p = problem(&["BTY", "YYB"], 'G');
        let start = p.initial().clone();
        let moved = p.result(&start, Action::Down);
        assert_eq!(moved.head(), Position::new(1, 1));
        assert_eq!(moved.grid(), start.grid());
        assert_eq!(moved.grid().get(p.start()), HEAD_MARKER);
    }

    #[test]
    fn test_paint_sets_target_and_leaves_input_untouched() {
        let p = problem(&["BTY"], 'G');
        let at_left = p.result(p.initial(), Action::Left);
        let painted = p.result(&at_left, Action::Paint);
        assert_eq!(painted.grid().get(Position::new(0, 0)), 'G');
        assert_eq!(at_left.grid().get(Position::new(0, 0)), 'B');
        assert_eq!(painted.grid().get(p.start()), HEAD_MARKER);
        assert_eq!(painted.head(), at_left.head());
    }

    #[test]
    fn test_goal_ignores_head_position_by_default() {
        let p = problem(&["GTG", "GGG"], 'G');
        let start = p.initial().clone();
        assert!(p.goal_test(&start));
        let moved = p.result(&start, Action::Down);
        assert!(p.goal_test(&moved));

        let p = problem(&["GTG", "GBG"], 'G');
        assert!(!p.goal_test(p.initial()));
    }

    #[test]
    fn test_goal_return_to_start_requires_head_home() {
        let p = problem(&["GTG", "GGG"], 'G').with_goal_policy(GoalPolicy::ReturnToStart);
        let start = p.initial().clone();
        assert!(p.goal_test(&start));
        let moved = p.result(&start, Action::Down);
        assert!(!p.goal_test(&moved));
        let back = p.result(&moved, Action::Up);
        assert!(p.goal_test(&back));
    }

    #[test]
    fn test_single_head_cell_is_goal() {
        let p = problem(&["T"], 'B');
        assert!(p.goal_test(p.initial()));
        assert!(p.actions(p.initial()).is_empty());
    }

    #[test]
    fn test_path_cost_is_strictly_increasing() {
        let p = problem(&["BTY", "YYB"], 'Y');
        let mut state = p.initial().clone();
        let mut cost = 0;
        for action in [Action::Left, Action::Paint, Action::Down, Action::Right, Action::Right, Action::Paint] {
            assert!(p.actions(&state).contains(&action), "{action} not offered");
            let next = p.result(&state, action);
            let next_cost = p.path_cost(cost, &state, action, &next);
            let expected = if action.is_move() { MOVE_COST } else { 2 };
            assert_eq!(next_cost - cost, expected);
            state = next;
            cost = next_cost;
        }
        assert!(p.goal_test(&state));
        assert_eq!(cost, 4 + 2 * 2);
    }

    #[test]
    fn test_path_cost_saturates() {
        let p = problem(&["TB"], 'G');
        let start = p.initial().clone();
        let moved = p.result(&start, Action::Right);
        assert_eq!(p.path_cost(u64::MAX, &start, Action::Right, &moved), u64::MAX);
        let painted = p.result(&moved, Action::Paint);
        assert_eq!(p.path_cost(u64::MAX - 1, &moved, Action::Paint, &painted), u64::MAX);
    }

    #[test]
    fn test_miscolored_cells_skip_start() {
        let p = problem(&["BTY", "YYB"], 'Y');
        let cells: Vec<Position> = p.miscolored_cells(p.initial()).collect();
        assert_eq!(cells, vec![Position::new(0, 0), Position::new(1, 2)]);
    }
}
