use std::path::PathBuf;

use anyhow::{Context, bail};
use beadboard_engine::Puzzle;

use super::PuzzleArg;
use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ShowArg {
    #[clap(flatten)]
    puzzle: PuzzleArg,
    /// Solutions file (JSON lines) written by `solve`
    file: PathBuf,
    /// Show only the solution with this 0-based index
    #[arg(long)]
    index: Option<usize>,
}

pub(crate) fn run(arg: &ShowArg) -> anyhow::Result<()> {
    let ShowArg {
        puzzle,
        file,
        index,
    } = arg;

    let puzzle = Puzzle::new(puzzle.load()?);
    let config = puzzle.config();
    let records = util::read_solutions_file(file)?;

    let selected: Vec<_> = match index {
        Some(index) => match records.get(*index) {
            Some(entry) => vec![(*index, entry)],
            None => bail!(
                "Solution index {index} out of range, {} contains {} solutions",
                file.display(),
                records.len()
            ),
        },
        None => records.iter().enumerate().collect(),
    };

    for (id, piece) in config.inventory().iter() {
        println!("{}: {}", id.symbol(), piece.name());
    }
    for (index, (line_number, record)) in selected {
        let solution = record.resolve(&puzzle).with_context(|| {
            format!("Invalid solution at {}:{line_number}", file.display())
        })?;
        println!();
        println!("Solution #{index}");
        print!("{}", solution.to_ascii(config));
    }
    Ok(())
}
