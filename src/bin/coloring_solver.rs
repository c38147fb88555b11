use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use uniform_coloring::costs::ColorCostTable;
use uniform_coloring::engine::{Action, GridState};
use uniform_coloring::heuristics::HeuristicKind;
use uniform_coloring::problem::GoalPolicy;
use uniform_coloring::solver::{
    solve, solve_each_color, ColoringOutcome, SearchOutcome, SolverConfig, Strategy,
};
use uniform_coloring::utils::parse_grid;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    /// Uniform-cost search
    Ucs,
    /// A* with the chosen heuristic
    Astar,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Heuristic {
    Manhattan,
    PaintFarthest,
}

impl From<Heuristic> for HeuristicKind {
    fn from(h: Heuristic) -> Self {
        match h {
            Heuristic::Manhattan => HeuristicKind::Manhattan,
            Heuristic::PaintFarthest => HeuristicKind::PaintFarthest,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the grid file: one row per line, exactly one 'T' marking the head
    grid_file: PathBuf,

    /// Repaint cost per color, as label=cost pairs
    #[clap(short, long, default_value = "B=1,Y=2,G=3")]
    costs: String,

    /// Search algorithm
    #[clap(short, long, value_enum, default_value_t = Algorithm::Ucs)]
    algorithm: Algorithm,

    /// Heuristic used by A*
    #[clap(long, value_enum, default_value_t = Heuristic::PaintFarthest)]
    heuristic: Heuristic,

    /// Require the head to finish on its start cell
    #[clap(long)]
    return_home: bool,

    /// Give up after this many node expansions
    #[clap(long)]
    max_expansions: Option<u64>,

    /// Search every color instead of trusting the repaint estimate
    #[clap(long)]
    all_colors: bool,

    /// Only print the summary, not every intermediate grid
    #[clap(long)]
    no_steps: bool,
}

fn read_grid_file(path: &PathBuf) -> Result<GridState> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read grid file {}", path.display()))?;
    parse_grid(&content).with_context(|| format!("invalid grid in {}", path.display()))
}

fn format_path(actions: &[Action]) -> String {
    if actions.is_empty() {
        return "(none)".to_string();
    }
    actions
        .iter()
        .map(|a| a.name())
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn print_outcome(target: char, outcome: &ColoringOutcome, show_steps: bool) {
    match outcome {
        SearchOutcome::Solved(solution) => {
            println!(
                "Solution for target '{}' found with cost {} ({} actions, {} expansions).",
                target,
                solution.cost,
                solution.actions.len(),
                solution.stats.expanded
            );
            if show_steps {
                for (i, step) in solution.trace.iter().enumerate() {
                    println!("\nStep {}, cost: {}, actions: {}", i, step.cost, format_path(&step.path));
                    println!("{}", step.state);
                }
            } else {
                println!("Actions: {}", format_path(&solution.actions));
            }
        }
        SearchOutcome::NoSolution(stats) => {
            println!(
                "No solution for target '{}' ({} expansions).",
                target, stats.expanded
            );
        }
        SearchOutcome::BudgetExhausted(stats) => {
            println!(
                "Gave up on target '{}' after {} expansions.",
                target, stats.expanded
            );
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let state = read_grid_file(&args.grid_file)?;
    let costs: ColorCostTable = args
        .costs
        .parse()
        .with_context(|| format!("invalid cost table '{}'", args.costs))?;

    let strategy = match args.algorithm {
        Algorithm::Ucs => Strategy::UniformCost,
        Algorithm::Astar => Strategy::AStar(args.heuristic.into()),
    };
    let goal_policy = if args.return_home {
        GoalPolicy::ReturnToStart
    } else {
        GoalPolicy::AnyPosition
    };
    let mut config = SolverConfig::new(strategy).with_goal_policy(goal_policy);
    if let Some(max) = args.max_expansions {
        config = config.with_max_expansions(max);
    }

    println!("Loaded grid from {}\n", args.grid_file.display());
    println!("{}\n", state);
    println!("Costs: {}", costs);

    if args.all_colors {
        let report = solve_each_color(&state, &costs, &config)?;
        println!("Estimated repaint costs: {:?}\n", report.estimate.totals);
        for search in &report.searches {
            print_outcome(search.color, &search.outcome, false);
        }
        match report.best() {
            Some((color, cost)) => println!("\nCheapest target: '{}' at cost {}.", color, cost),
            None => println!("\nNo target color could be solved."),
        }
        return Ok(());
    }

    let report = solve(&state, &costs, &config)?;
    println!("Estimated repaint costs: {:?}", report.estimate.totals);
    println!("Target color: '{}'\n", report.target);
    print_outcome(report.target, &report.outcome, !args.no_steps);
    Ok(())
}
