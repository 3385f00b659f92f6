use std::path::PathBuf;

use anyhow::Context;
use beadboard_engine::{ConfigFile, PuzzleConfig};
use clap::{Parser, Subcommand};

use crate::util;

use self::{pieces::PiecesArg, show::ShowArg, solve::SolveArg, verify::VerifyArg};

mod pieces;
mod show;
mod solve;
mod verify;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What to do; searches for solutions when omitted
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Search for every tiling and write them as JSON lines
    Solve(#[clap(flatten)] SolveArg),
    /// Check that every solution in a file tiles the board
    Verify(#[clap(flatten)] VerifyArg),
    /// Draw the solutions in a file as boards
    Show(#[clap(flatten)] ShowArg),
    /// Draw every piece in all variants and rotations
    Pieces(#[clap(flatten)] PiecesArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Solve(SolveArg::default())) {
        Mode::Solve(arg) => solve::run(&arg)?,
        Mode::Verify(arg) => verify::run(&arg)?,
        Mode::Show(arg) => show::run(&arg)?,
        Mode::Pieces(arg) => pieces::run(&arg)?,
    }
    Ok(())
}

/// Options selecting the puzzle, shared by every subcommand.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PuzzleArg {
    /// Puzzle configuration file (JSON); the standard puzzle if omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Piece that keeps its slot but is never placed (repeatable)
    #[arg(long = "skip", value_name = "NAME")]
    skip: Vec<String>,
    /// Pre-filled cells, row-major, `x` or `#` occupied and `.` empty
    #[arg(long, value_name = "CELLS")]
    start_board: Option<String>,
}

impl PuzzleArg {
    /// Loads the configuration file, then applies `--skip` and
    /// `--start-board` on top of it.
    pub(crate) fn load(&self) -> anyhow::Result<PuzzleConfig> {
        let mut file = match &self.config {
            Some(path) => util::read_json_file::<ConfigFile, _>("puzzle configuration", path)?,
            None => ConfigFile::default(),
        };
        if !self.skip.is_empty() {
            file.skip.clone_from(&self.skip);
        }
        if let Some(start_board) = &self.start_board {
            file.start_board = Some(start_board.clone());
        }
        file.into_config()
            .context("Invalid puzzle configuration")
    }
}
