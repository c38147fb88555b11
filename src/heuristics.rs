//! Estimates of the remaining cost from a state to the goal, for A*.
//!
//! Both heuristics are total functions of the state and the problem's
//! target color, cost table, and goal policy. Both return 0 on goal states.
use std::fmt;

use crate::engine::GridState;
use crate::problem::{GoalPolicy, UniformColoringProblem};

/// The heuristics available to the informed search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeuristicKind {
    /// See [`manhattan_distance`]. Fast, but may overestimate.
    Manhattan,
    /// See [`paint_cost_plus_farthest`]. Admissible.
    PaintFarthest,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 2] = [HeuristicKind::Manhattan, HeuristicKind::PaintFarthest];

    pub fn evaluate(self, problem: &UniformColoringProblem, state: &GridState) -> u64 {
        match self {
            HeuristicKind::Manhattan => manhattan_distance(problem, state),
            HeuristicKind::PaintFarthest => paint_cost_plus_farthest(problem, state),
        }
    }

    /// Whether the heuristic never overestimates the true remaining cost.
    /// A* with first-pop goal termination is only optimal when this holds.
    pub fn is_admissible(self) -> bool {
        matches!(self, HeuristicKind::PaintFarthest)
    }

    pub fn name(self) -> &'static str {
        match self {
            HeuristicKind::Manhattan => "manhattan",
            HeuristicKind::PaintFarthest => "paint-farthest",
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sum of the Manhattan distances from the head to every cell that still
/// needs painting.
///
/// Ignores paint costs, yet summing the distances can still exceed the real
/// remaining cost once several cells line up along one route, so it is not
/// admissible. Under [`GoalPolicy::ReturnToStart`], a state whose colors are
/// done scores the head's distance back to the start cell.
pub fn manhattan_distance(problem: &UniformColoringProblem, state: &GridState) -> u64 {
    let head = state.head();
    let mut total = 0u64;
    let mut any = false;
    for cell in problem.miscolored_cells(state) {
        total = total.saturating_add(head.manhattan_distance(cell) as u64);
        any = true;
    }

    if !any && problem.goal_policy() == GoalPolicy::ReturnToStart {
        return head.manhattan_distance(problem.start()) as u64;
    }
    total
}

/// One repaint per miscolored cell plus the distance to the farthest one.
///
/// Every miscolored cell needs exactly one paint, and the head has to reach
/// the farthest of them at least once, so this never overestimates. Under
/// [`GoalPolicy::ReturnToStart`] the distance term becomes the longest
/// head → cell → start detour, or the distance home when nothing is left to
/// paint.
pub fn paint_cost_plus_farthest(problem: &UniformColoringProblem, state: &GridState) -> u64 {
    let head = state.head();
    let start = problem.start();
    let return_home = problem.goal_policy() == GoalPolicy::ReturnToStart;

    let mut paint = 0u64;
    let mut farthest: Option<usize> = None;
    for cell in problem.miscolored_cells(state) {
        paint = paint.saturating_add(problem.target_cost());
        let mut distance = head.manhattan_distance(cell);
        if return_home {
            distance += cell.manhattan_distance(start);
        }
        farthest = Some(farthest.map_or(distance, |d| d.max(distance)));
    }

    let travel = match farthest {
        Some(d) => d,
        None if return_home => head.manhattan_distance(start),
        None => 0,
    };
    paint.saturating_add(travel as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costs::ColorCostTable;
    use crate::engine::{Action, Position};
    use crate::problem::Problem;
    use crate::utils::grid_from_str_array;

    fn problem(rows: &[&str], target: char) -> UniformColoringProblem {
        let state = grid_from_str_array(rows).unwrap();
        let table = ColorCostTable::new([('B', 1), ('Y', 2), ('G', 3)]).unwrap();
        UniformColoringProblem::new(state, target, table).unwrap()
    }

    #[test]
    fn test_manhattan_sums_distances() {
        // Head at (0,1); miscolored: (3,0) d=4, (3,1) d=3, (3,2) d=4.
        let p = problem(&["GTG", "GGG", "GGG", "YYB"], 'G');
        assert_eq!(manhattan_distance(&p, p.initial()), 11);
    }

    #[test]
    fn test_paint_farthest_value() {
        let p = problem(&["GTG", "GGG", "GGG", "YYB"], 'G');
        assert_eq!(paint_cost_plus_farthest(&p, p.initial()), 3 * 3 + 4);
    }

    #[test]
    fn test_heuristics_zero_on_goal() {
        let p = problem(&["GTG", "GGG"], 'G');
        let start = p.initial().clone();
        let moved = p.result(&start, Action::Down);
        for kind in HeuristicKind::ALL {
            assert_eq!(kind.evaluate(&p, &start), 0, "{kind} at start");
            assert_eq!(kind.evaluate(&p, &moved), 0, "{kind} after move");
        }
    }

    #[test]
    fn test_heuristics_count_return_trip() {
        let p = problem(&["GTG", "GGG"], 'G').with_goal_policy(GoalPolicy::ReturnToStart);
        let moved = p.result(p.initial(), Action::Down);
        assert!(!p.goal_test(&moved));
        for kind in HeuristicKind::ALL {
            assert_eq!(kind.evaluate(&p, &moved), 1, "{kind}");
            assert_eq!(kind.evaluate(&p, p.initial()), 0, "{kind}");
        }
    }

    #[test]
    fn test_paint_farthest_detour_under_return_to_start() {
        // Head at start (0,0); only (0,2) is miscolored: 2 out + 2 back.
        let p = problem(&["TGB"], 'G').with_goal_policy(GoalPolicy::ReturnToStart);
        assert_eq!(paint_cost_plus_farthest(&p, p.initial()), 3 + 4);
    }

    #[test]
    fn test_paint_farthest_positive_off_goal() {
        let p = problem(&["TB", "YB"], 'G');
        let start = p.initial().clone();
        assert!(!p.goal_test(&start));
        assert!(paint_cost_plus_farthest(&p, &start) > 0);

        let s = p.result(&start, Action::Right);
        assert_eq!(s.head(), Position::new(0, 1));
        // Three cells at 3 each, farthest (1,0) is 2 away.
        assert_eq!(paint_cost_plus_farthest(&p, &s), 9 + 2);
    }

    #[test]
    fn test_paint_farthest_with_largest_cost() {
        use crate::costs::MAX_REPAINT_COST;
        let state = grid_from_str_array(&["TBB"]).unwrap();
        let table = ColorCostTable::new([('B', 1), ('Y', MAX_REPAINT_COST)]).unwrap();
        let p = UniformColoringProblem::new(state, 'Y', table).unwrap();
        assert_eq!(paint_cost_plus_farthest(&p, p.initial()), 2 * MAX_REPAINT_COST + 2);
    }

    #[test]
    fn test_admissibility_flags() {
        assert!(HeuristicKind::PaintFarthest.is_admissible());
        assert!(!HeuristicKind::Manhattan.is_admissible());
    }
}
