use std::path::PathBuf;

use anyhow::{Context, bail};
use beadboard_engine::Puzzle;

use super::PuzzleArg;
use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct VerifyArg {
    #[clap(flatten)]
    puzzle: PuzzleArg,
    /// Solutions file (JSON lines) written by `solve`
    file: PathBuf,
}

pub(crate) fn run(arg: &VerifyArg) -> anyhow::Result<()> {
    let VerifyArg { puzzle, file } = arg;

    let puzzle = Puzzle::new(puzzle.load()?);
    let config = puzzle.config();
    let expected_placements = config.inventory().len() - config.skipped().count();

    let records = util::read_solutions_file(file)?;
    for (line_number, record) in &records {
        let location = format!("{}:{line_number}", file.display());
        let solution = record
            .resolve(&puzzle)
            .with_context(|| format!("Invalid solution at {location}"))?;
        if solution.to_record(config.inventory()) != *record {
            bail!("Solution at {location} does not round-trip");
        }
        if solution.moves().len() != expected_placements {
            bail!(
                "Solution at {location} has {} placements, expected {expected_placements}",
                solution.moves().len()
            );
        }
        solution
            .check_tiling(config)
            .with_context(|| format!("Solution at {location} does not tile the board"))?;
    }

    println!("{} solutions verified", records.len());
    Ok(())
}
