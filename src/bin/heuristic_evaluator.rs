use anyhow::Result;
use clap::Parser;
use std::collections::HashMap;
use uniform_coloring::costs::ColorCostTable;
use uniform_coloring::engine::GridState;
use uniform_coloring::heuristics::HeuristicKind;
use uniform_coloring::solver::{solve, SolverConfig, Strategy};

const DEFAULT_COSTS: [(char, u64); 3] = [('B', 1), ('Y', 2), ('G', 3)];

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare uniform-cost search and A* on random grids", long_about = None)]
struct Args {
    /// Number of random grids to evaluate
    #[clap(short, long, default_value_t = 20)]
    boards: usize,

    /// Grid rows
    #[clap(long, default_value_t = 3)]
    rows: usize,

    /// Grid columns
    #[clap(long, default_value_t = 4)]
    cols: usize,

    /// Seed of the first grid; grid i uses seed + i
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Per-search expansion budget
    #[clap(long, default_value_t = 2_000_000)]
    max_expansions: u64,
}

#[derive(Default)]
struct Tally {
    costs: Vec<u64>,
    expansions: Vec<u64>,
    unsolved: usize,
    suboptimal: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let costs = ColorCostTable::new(DEFAULT_COSTS)?;
    let colors: Vec<char> = costs.colors().collect();
    let strategies: Vec<(String, Strategy)> = std::iter::once(("UCS".to_string(), Strategy::UniformCost))
        .chain(
            HeuristicKind::ALL
                .into_iter()
                .map(|kind| (format!("A*/{kind}"), Strategy::AStar(kind))),
        )
        .collect();

    let mut tallies: HashMap<String, Tally> = HashMap::new();
    for (name, _) in &strategies {
        tallies.insert(name.clone(), Tally::default());
    }

    println!(
        "Starting evaluation on {} random {}x{} grids...",
        args.boards, args.rows, args.cols
    );

    for board_idx in 0..args.boards {
        let current_seed = args.seed + board_idx as u64;
        let state = GridState::random_with_seed(args.rows, args.cols, &colors, current_seed)?;

        println!("\nEvaluating grid {} (Seed: {})", board_idx, current_seed);

        let mut reference_cost: Option<u64> = None;
        for (name, strategy) in &strategies {
            let config = SolverConfig::new(*strategy).with_max_expansions(args.max_expansions);
            let report = solve(&state, &costs, &config)?;
            let stats = *report.outcome.stats();
            let tally = tallies
                .get_mut(name)
                .expect("every strategy has a tally");

            match report.outcome.cost() {
                Some(cost) => {
                    println!(
                        "  Strategy: {:<20} Target: {}  Cost: {:<6} Expansions: {}",
                        name, report.target, cost, stats.expanded
                    );
                    // UCS runs first and is exact, so it is the reference.
                    match reference_cost {
                        None => reference_cost = Some(cost),
                        Some(best) if cost > best => {
                            tally.suboptimal += 1;
                            println!("    (above the optimum of {})", best);
                        }
                        Some(_) => {}
                    }
                    tally.costs.push(cost);
                    tally.expansions.push(stats.expanded);
                }
                None => {
                    println!(
                        "  Strategy: {:<20} unsolved after {} expansions",
                        name, stats.expanded
                    );
                    tally.unsolved += 1;
                }
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of grids evaluated: {}", args.boards);
    println!("\n--- Average Expansions ---");

    let mut averages: Vec<(&str, f64, &Tally)> = Vec::new();
    for (name, _) in &strategies {
        let tally = &tallies[name];
        if tally.expansions.is_empty() {
            println!("Strategy {}: No solved grids.", name);
            continue;
        }
        let total: u64 = tally.expansions.iter().sum();
        averages.push((name.as_str(), total as f64 / tally.expansions.len() as f64, tally));
    }

    // Fewest expansions first
    averages.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    for (name, avg, tally) in averages {
        let avg_cost = tally.costs.iter().sum::<u64>() as f64 / tally.costs.len() as f64;
        println!(
            "Strategy {:<20}: Average Expansions = {:.1}, Average Cost = {:.2}, Suboptimal = {}, Unsolved = {}",
            name, avg, avg_cost, tally.suboptimal, tally.unsolved
        );
    }
    Ok(())
}
