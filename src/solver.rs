//! Best-first search over any [`Problem`], plus the coloring-specific driver.
//!
//! The engine is one loop serving both uniform-cost search (zero heuristic)
//! and A*. The frontier is a binary min-heap keyed by
//! `(f, path length, insertion order)`, which makes every run fully
//! deterministic. Duplicate states are handled lazily: a cheaper path to a
//! state simply pushes a new entry, and entries whose state was already
//! expanded at an equal or lower cost are skipped when popped.
//!
//! The goal test runs when a node is popped, not when it is generated. That
//! is what makes uniform-cost search optimal, and it keeps A* optimal as long
//! as the heuristic never overestimates.
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::thread;

use crate::costs::{ColorCostEstimator, ColorCostTable, ColorEstimate};
use crate::engine::{Action, GridState};
use crate::error::Result;
use crate::heuristics::HeuristicKind;
use crate::problem::{GoalPolicy, Problem, UniformColoringProblem};

/// Limits for a single search run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Stop with [`SearchOutcome::BudgetExhausted`] after this many node
    /// expansions. `None` searches until the frontier is empty.
    pub max_expansions: Option<u64>,
}

/// Effort counters for one search run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose successors were generated.
    pub expanded: u64,
    /// Entries pushed onto the frontier, the root included.
    pub generated: u64,
    /// Popped entries discarded because their state was already expanded
    /// at an equal or lower cost.
    pub stale_skipped: u64,
    /// Largest frontier size seen.
    pub frontier_high_water: usize,
}

/// One point along a solution: the state, the cost paid to reach it, and
/// the actions taken so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceStep<S, A> {
    pub state: S,
    pub cost: u64,
    pub path: Vec<A>,
}

/// A minimum-cost action sequence and its replay.
#[derive(Clone, Debug)]
pub struct Solution<S, A> {
    pub actions: Vec<A>,
    pub cost: u64,
    /// `actions.len() + 1` steps, from the initial state (cost 0, empty path)
    /// to the goal state.
    pub trace: Vec<TraceStep<S, A>>,
    pub stats: SearchStats,
}

impl<S, A> Solution<S, A> {
    pub fn final_state(&self) -> &S {
        // The trace always holds at least the initial state.
        &self.trace[self.trace.len() - 1].state
    }
}

/// How a search run ended. Running out of frontier or budget is a normal
/// result, not an error.
#[derive(Clone, Debug)]
pub enum SearchOutcome<S, A> {
    Solved(Solution<S, A>),
    /// The frontier emptied without reaching a goal.
    NoSolution(SearchStats),
    /// [`SearchConfig::max_expansions`] was reached first.
    BudgetExhausted(SearchStats),
}

impl<S, A> SearchOutcome<S, A> {
    pub fn is_solved(&self) -> bool {
        matches!(self, SearchOutcome::Solved(_))
    }

    pub fn solution(&self) -> Option<&Solution<S, A>> {
        match self {
            SearchOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn into_solution(self) -> Option<Solution<S, A>> {
        match self {
            SearchOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    /// Total cost, if solved.
    pub fn cost(&self) -> Option<u64> {
        self.solution().map(|s| s.cost)
    }

    pub fn stats(&self) -> &SearchStats {
        match self {
            SearchOutcome::Solved(solution) => &solution.stats,
            SearchOutcome::NoSolution(stats) | SearchOutcome::BudgetExhausted(stats) => stats,
        }
    }
}

/// Arena record for a generated node. Parents are arena indices.
struct Node<S, A> {
    state: S,
    g: u64,
    depth: usize,
    parent: Option<usize>,
    action: Option<A>,
}

/// Frontier ordering: lowest `f` first, then shorter paths, then older entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierKey {
    f: u64,
    depth: usize,
    order: usize,
}

/// Runs best-first search on `problem`, ordering the frontier by
/// `g + heuristic(state)`.
///
/// Pass `|_| 0` for uniform-cost search. The returned solution is optimal
/// when the heuristic never overestimates the remaining cost.
pub fn best_first_search<P, H>(
    problem: &P,
    heuristic: H,
    config: &SearchConfig,
) -> SearchOutcome<P::State, P::Action>
where
    P: Problem,
    H: Fn(&P::State) -> u64,
{
    let mut stats = SearchStats::default();
    let mut nodes: Vec<Node<P::State, P::Action>> = Vec::new();
    let mut frontier: BinaryHeap<Reverse<FrontierKey>> = BinaryHeap::new();
    let mut explored: HashMap<P::State, u64> = HashMap::new();

    let root = problem.initial().clone();
    frontier.push(Reverse(FrontierKey {
        f: heuristic(&root),
        depth: 0,
        order: 0,
    }));
    nodes.push(Node {
        state: root,
        g: 0,
        depth: 0,
        parent: None,
        action: None,
    });
    stats.generated = 1;
    stats.frontier_high_water = 1;

    while let Some(Reverse(key)) = frontier.pop() {
        let index = key.order;
        let node = &nodes[index];

        if problem.goal_test(&node.state) {
            log::debug!(
                "goal reached at cost {} after {} expansions",
                node.g,
                stats.expanded
            );
            return SearchOutcome::Solved(reconstruct(&nodes, index, stats));
        }

        if explored.get(&node.state).is_some_and(|&best| best <= node.g) {
            stats.stale_skipped += 1;
            continue;
        }

        if config.max_expansions.is_some_and(|max| stats.expanded >= max) {
            log::debug!("expansion budget of {} exhausted", stats.expanded);
            return SearchOutcome::BudgetExhausted(stats);
        }

        explored.insert(node.state.clone(), node.g);
        stats.expanded += 1;
        log::trace!(
            "expanding node {index} (g={}, f={}, depth={})",
            node.g,
            key.f,
            node.depth
        );

        let (g, depth) = (node.g, node.depth);
        let mut children = Vec::new();
        for action in problem.actions(&node.state) {
            let child = problem.result(&node.state, action);
            let child_g = problem.path_cost(g, &node.state, action, &child);
            debug_assert!(child_g >= g, "path cost decreased");
            if explored.get(&child).map_or(true, |&best| best > child_g) {
                children.push((action, child, child_g));
            }
        }

        for (action, child, child_g) in children {
            let order = nodes.len();
            frontier.push(Reverse(FrontierKey {
                f: child_g.saturating_add(heuristic(&child)),
                depth: depth + 1,
                order,
            }));
            nodes.push(Node {
                state: child,
                g: child_g,
                depth: depth + 1,
                parent: Some(index),
                action: Some(action),
            });
            stats.generated += 1;
        }
        stats.frontier_high_water = stats.frontier_high_water.max(frontier.len());
    }

    log::debug!("frontier exhausted after {} expansions", stats.expanded);
    SearchOutcome::NoSolution(stats)
}

/// Uniform-cost search: best-first search with a zero heuristic.
pub fn uniform_cost_search<P: Problem>(
    problem: &P,
    config: &SearchConfig,
) -> SearchOutcome<P::State, P::Action> {
    best_first_search(problem, |_| 0, config)
}

/// Walks parent links from `goal` back to the root and builds the replay.
fn reconstruct<S: Clone, A: Copy>(
    nodes: &[Node<S, A>],
    goal: usize,
    stats: SearchStats,
) -> Solution<S, A> {
    let mut chain = vec![goal];
    while let Some(parent) = nodes[chain[chain.len() - 1]].parent {
        chain.push(parent);
    }
    chain.reverse();

    let actions: Vec<A> = chain.iter().filter_map(|&i| nodes[i].action).collect();
    let trace = chain
        .iter()
        .map(|&i| TraceStep {
            state: nodes[i].state.clone(),
            cost: nodes[i].g,
            path: actions[..nodes[i].depth].to_vec(),
        })
        .collect();

    Solution {
        actions,
        cost: nodes[goal].g,
        trace,
        stats,
    }
}

/// Result type of a coloring search.
pub type ColoringOutcome = SearchOutcome<GridState, Action>;

/// Which search to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    #[default]
    UniformCost,
    AStar(HeuristicKind),
}

/// Configuration for solving a coloring puzzle.
///
/// # Examples
///
/// ```
/// use uniform_coloring::heuristics::HeuristicKind;
/// use uniform_coloring::problem::GoalPolicy;
/// use uniform_coloring::solver::{SolverConfig, Strategy};
///
/// let config = SolverConfig::new(Strategy::AStar(HeuristicKind::PaintFarthest))
///     .with_goal_policy(GoalPolicy::ReturnToStart)
///     .with_max_expansions(100_000);
/// assert_eq!(config.max_expansions, Some(100_000));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolverConfig {
    pub strategy: Strategy,
    pub goal_policy: GoalPolicy,
    pub max_expansions: Option<u64>,
}

impl SolverConfig {
    /// Uses the default goal policy and no expansion budget.
    pub fn new(strategy: Strategy) -> Self {
        SolverConfig {
            strategy,
            ..SolverConfig::default()
        }
    }

    pub fn with_goal_policy(mut self, goal_policy: GoalPolicy) -> Self {
        self.goal_policy = goal_policy;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: u64) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_expansions: self.max_expansions,
        }
    }
}

/// Runs the configured search on an already built problem.
///
/// The problem's own goal policy is used as is; `config.goal_policy` only
/// matters to [`solve`] and [`solve_each_color`], which build the problem.
pub fn search_coloring(problem: &UniformColoringProblem, config: &SolverConfig) -> ColoringOutcome {
    log::debug!(
        "searching for target '{}' with {:?}, goal policy {:?}",
        problem.target(),
        config.strategy,
        problem.goal_policy()
    );
    let search_config = config.search_config();
    let outcome = match config.strategy {
        Strategy::UniformCost => uniform_cost_search(problem, &search_config),
        Strategy::AStar(kind) => {
            if !kind.is_admissible() {
                log::warn!("heuristic {kind} may overestimate; the solution may not be optimal");
            }
            best_first_search(problem, |state| kind.evaluate(problem, state), &search_config)
        }
    };

    match &outcome {
        SearchOutcome::Solved(solution) => log::info!(
            "target '{}': solved at cost {} in {} actions ({} expansions)",
            problem.target(),
            solution.cost,
            solution.actions.len(),
            solution.stats.expanded
        ),
        SearchOutcome::NoSolution(stats) => log::info!(
            "target '{}': no solution ({} expansions)",
            problem.target(),
            stats.expanded
        ),
        SearchOutcome::BudgetExhausted(stats) => log::info!(
            "target '{}': budget exhausted after {} expansions",
            problem.target(),
            stats.expanded
        ),
    }
    outcome
}

/// What [`solve`] did: the color ranking, the color it picked, and the search result.
#[derive(Clone, Debug)]
pub struct SolveReport {
    pub estimate: ColorEstimate,
    pub target: char,
    pub outcome: ColoringOutcome,
}

/// Picks the cheapest target color by the repaint estimate and searches for
/// it.
///
/// # Errors
/// Returns [`crate::error::Error::UnknownColor`] if the grid holds a label
/// the table lacks.
///
/// # Examples
/// ```
/// use uniform_coloring::costs::ColorCostTable;
/// use uniform_coloring::solver::{solve, SolverConfig};
/// use uniform_coloring::utils::grid_from_str_array;
///
/// let state = grid_from_str_array(&["GTG", "GGG", "GGG", "YYB"]).unwrap();
/// let table: ColorCostTable = "B=1,Y=2,G=3".parse().unwrap();
/// let report = solve(&state, &table, &SolverConfig::default()).unwrap();
/// assert_eq!(report.target, 'G');
/// assert_eq!(report.outcome.cost(), Some(15));
/// ```
pub fn solve(
    initial: &GridState,
    costs: &ColorCostTable,
    config: &SolverConfig,
) -> Result<SolveReport> {
    let estimate = ColorCostEstimator::new(costs).estimate(initial)?;
    let target = estimate.best_color;
    let problem = UniformColoringProblem::new(initial.clone(), target, costs.clone())?
        .with_goal_policy(config.goal_policy);
    let outcome = search_coloring(&problem, config);
    Ok(SolveReport {
        estimate,
        target,
        outcome,
    })
}

/// The search result for one candidate target color.
#[derive(Clone, Debug)]
pub struct ColorSearch {
    pub color: char,
    pub outcome: ColoringOutcome,
}

/// What [`solve_each_color`] found.
#[derive(Clone, Debug)]
pub struct ExhaustiveReport {
    pub estimate: ColorEstimate,
    /// One entry per color, in table order.
    pub searches: Vec<ColorSearch>,
}

impl ExhaustiveReport {
    /// The color with the cheapest solved search and its cost. Ties go to
    /// the first color in table order.
    pub fn best(&self) -> Option<(char, u64)> {
        let mut best: Option<(char, u64)> = None;
        for search in &self.searches {
            if let Some(cost) = search.outcome.cost() {
                if best.map_or(true, |(_, c)| cost < c) {
                    best = Some((search.color, cost));
                }
            }
        }
        best
    }
}

/// Searches every color in `costs` as the target, one thread per color.
///
/// Unlike [`solve`], which trusts the repaint estimate, this finds the
/// exact cheapest target once movement is counted. The searches share
/// nothing mutable; each thread owns its problem and frontier.
///
/// # Errors
/// Returns [`crate::error::Error::UnknownColor`] if the grid holds a label
/// the table lacks.
pub fn solve_each_color(
    initial: &GridState,
    costs: &ColorCostTable,
    config: &SolverConfig,
) -> Result<ExhaustiveReport> {
    let estimate = ColorCostEstimator::new(costs).estimate(initial)?;
    let problems = costs
        .colors()
        .map(|color| {
            UniformColoringProblem::new(initial.clone(), color, costs.clone())
                .map(|p| p.with_goal_policy(config.goal_policy))
        })
        .collect::<Result<Vec<_>>>()?;

    let searches: Vec<ColorSearch> = thread::scope(|scope| {
        let handles: Vec<_> = problems
            .iter()
            .map(|problem| {
                scope.spawn(move || ColorSearch {
                    color: problem.target(),
                    outcome: search_coloring(problem, config),
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    Ok(ExhaustiveReport { estimate, searches })
}
