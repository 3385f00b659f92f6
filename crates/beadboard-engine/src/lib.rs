//! Exhaustive search for tilings of a bead board by two-row pieces.
//!
//! Pieces are given as two rows of `x` (bead) and `.` (empty) cells. Each
//! piece has two variants and four rotations and is placed in a fixed slot
//! order; the [`Solver`] enumerates every way to fill the board.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board of {width} x {height} cells is not supported (1 to 64 cells)")]
    InvalidBoardSize { width: u8, height: u8 },
    #[display("unexpected character {ch:?} in board cells")]
    InvalidBoardChar { ch: char },
    #[display("board cells describe {actual} cells, expected {expected}")]
    BoardCellCount { expected: usize, actual: usize },
    #[display("start board covers cells outside the board")]
    StartBoardOutOfRange,
    #[display("invalid shape of piece {name:?}: {source}")]
    InvalidShape { name: String, source: ShapeError },
    #[display("piece inventory is empty")]
    EmptyInventory,
    #[display("{count} pieces given, at most 16 are supported")]
    TooManyPieces { count: usize },
    #[display("piece name is empty")]
    EmptyPieceName,
    #[display("duplicate piece {name:?}")]
    DuplicatePiece { name: String },
    #[display("unknown piece {name:?}")]
    UnknownPiece { name: String },
}
