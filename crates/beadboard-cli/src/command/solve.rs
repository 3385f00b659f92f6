use std::{path::PathBuf, sync::Mutex};

use anyhow::Context;
use beadboard_engine::{DEFAULT_PROGRESS_INTERVAL, JsonLinesSink, Puzzle, Solver};

use super::PuzzleArg;
use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SolveArg {
    #[clap(flatten)]
    pub(crate) puzzle: PuzzleArg,
    /// Output file path; stdout if omitted
    #[arg(long)]
    output: Option<PathBuf>,
    /// Iterations between progress messages, 0 to disable them
    #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    progress_interval: u64,
    /// Stop after this many solutions
    #[arg(long)]
    max_solutions: Option<u64>,
    /// Explore the placements of the first piece on all cores
    #[arg(long)]
    parallel: bool,
}

impl Default for SolveArg {
    fn default() -> Self {
        Self {
            puzzle: PuzzleArg::default(),
            output: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            max_solutions: None,
            parallel: false,
        }
    }
}

pub(crate) fn run(arg: &SolveArg) -> anyhow::Result<()> {
    let SolveArg {
        puzzle,
        output,
        progress_interval,
        max_solutions,
        parallel,
    } = arg;

    let puzzle = Puzzle::new(puzzle.load()?);
    let config = puzzle.config();
    log::info!(
        "Solving {}x{} board: {} pieces ({} skipped), {} placements, {} free cells",
        config.dims().width(),
        config.dims().height(),
        config.inventory().len(),
        config.skipped().count(),
        puzzle.catalog().len(),
        config.initial_free_cells()
    );

    let output = Output::from_output_path(output.clone())?;
    let display_path = output.display_path();
    let mut sink = JsonLinesSink::new(output, config.inventory());
    let solver = Solver::new(&puzzle)
        .with_progress_interval(*progress_interval)
        .with_max_solutions(*max_solutions);

    let stats = if *parallel {
        let shared = Mutex::new(sink);
        let stats = solver.run_parallel(&shared);
        sink = shared
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        stats
    } else {
        solver.run(&mut sink)
    }
    .with_context(|| format!("Failed to write solutions to {display_path}"))?;

    log::info!(
        "{} iterations, maximum stack depth {}",
        stats.iterations,
        stats.max_stack_depth
    );
    if !stats.completed {
        log::warn!("Search stopped before exploring every placement");
    }
    eprintln!("Total number of solutions: {}", sink.written());
    Ok(())
}
