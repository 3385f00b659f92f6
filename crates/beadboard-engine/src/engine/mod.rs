//! Puzzle setup, search and solution output.
//!
//! This module turns a configuration into solutions:
//!
//! - [`PuzzleConfig`] - Board, piece inventory, skip list and start board
//! - [`MoveCatalog`] / [`PositionIndex`] - Every placement of every piece, and
//!   the placements covering each cell
//! - [`Puzzle`] - A configuration compiled for searching, with the bead bounds
//!   of every slot
//! - [`Solver`] - Depth-first search with bead-count and reachability pruning
//! - [`SolutionSink`] - Destination of the solutions, e.g. [`JsonLinesSink`]
//!
//! # Example
//!
//! ```no_run
//! use beadboard_engine::{JsonLinesSink, Puzzle, PuzzleConfig, Solver};
//!
//! let puzzle = Puzzle::new(PuzzleConfig::standard());
//! let stdout = std::io::stdout().lock();
//! let mut sink = JsonLinesSink::new(stdout, puzzle.config().inventory());
//!
//! let stats = Solver::new(&puzzle).run(&mut sink)?;
//! println!("Total number of solutions: {}", stats.solutions);
//! # Ok::<(), beadboard_engine::SinkError>(())
//! ```

pub use self::{catalog::*, config::*, frame::*, puzzle::*, sink::*, solution::*, solver::*};

mod catalog;
mod config;
mod frame;
mod puzzle;
mod sink;
mod solution;
mod solver;
