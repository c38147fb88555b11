//! # Uniform Coloring Solver Library
//!
//! This library solves the grid "uniform coloring" puzzle: a rectangular grid
//! of colored cells has one movable head that starts on a marker cell. The
//! head may step to an orthogonal neighbor (cost 1) or repaint its current
//! cell with the target color (cost taken from a per-color table). The goal is
//! to make every cell except the start cell the target color at minimum total
//! cost.
//!
//! It is used by two binaries:
//! - `coloring_solver`: loads a grid file, picks a target color, runs uniform-cost
//!   search or A*, and prints the solution step by step.
//! - `heuristic_evaluator`: compares uniform-cost search with A* under each
//!   heuristic on seeded random grids.
//!
//! ## Modules
//! - `engine`: positions, actions, the immutable `Grid`, and the `GridState` search state.
//! - `costs`: the per-color repaint cost table and the pre-search target color estimate.
//! - `problem`: the generic `Problem` contract and `UniformColoringProblem`.
//! - `heuristics`: remaining-cost estimates for A*.
//! - `solver`: the best-first search engine and the `solve` / `solve_each_color` drivers.
//! - `utils`: parsing grids from text.
//! - `error`: the crate's error type.

pub mod costs;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod problem;
pub mod solver;
pub mod utils;

pub use error::{Error, Result};
