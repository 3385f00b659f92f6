use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::{BoardMask, Inventory, MAX_PIECES, Move, Placement, PlacementRecord};

use super::{config::PuzzleConfig, puzzle::Puzzle};

/// A completed tiling: one move per placed slot, in slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    moves: ArrayVec<Move, MAX_PIECES>,
}

impl Solution {
    pub(crate) fn new(moves: ArrayVec<Move, MAX_PIECES>) -> Self {
        Self { moves }
    }

    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn placements(&self) -> impl Iterator<Item = Placement> + '_ {
        self.moves.iter().map(|mv| mv.placement)
    }

    /// Union of the cells covered by the placed pieces.
    #[must_use]
    pub fn occupied(&self) -> BoardMask {
        self.moves
            .iter()
            .fold(BoardMask::EMPTY, |acc, mv| acc | mv.mask)
    }

    /// Checks that the pieces are pairwise disjoint, stay off the start board,
    /// and together with the start board cover every cell.
    pub fn check_tiling(&self, config: &PuzzleConfig) -> Result<(), TilingError> {
        let mut board = config.start_board();
        for (index, mv) in self.moves.iter().enumerate() {
            if config.is_skipped(mv.placement.piece) {
                return Err(TilingError::SkippedPiece { index });
            }
            if self.moves[..index]
                .iter()
                .any(|other| other.placement.piece == mv.placement.piece)
            {
                return Err(TilingError::RepeatedPiece { index });
            }
            if board.overlaps(mv.mask) {
                return Err(TilingError::Overlap { index });
            }
            board |= mv.mask;
        }
        let free = config.dims().free_cells(board).count();
        if free > 0 {
            return Err(TilingError::Incomplete { free });
        }
        Ok(())
    }

    #[must_use]
    pub fn to_record(&self, inventory: &Inventory) -> SolutionRecord {
        SolutionRecord(
            self.placements()
                .map(|placement| placement.to_record(inventory))
                .collect(),
        )
    }

    /// Renders the board with the [symbol](crate::PieceId::symbol) of each
    /// slot, `#` for start board cells and `.` for free cells.
    #[must_use]
    pub fn to_ascii(&self, config: &PuzzleConfig) -> String {
        let dims = config.dims();
        let mut cells = vec!['.'; dims.cell_count()];
        for cell in config.start_board().cells() {
            cells[cell] = '#';
        }
        for mv in &self.moves {
            let symbol = mv.placement.piece.symbol();
            for cell in mv.mask.cells() {
                cells[cell] = symbol;
            }
        }

        let mut out = String::with_capacity(dims.cell_count() * 2);
        for row in cells.chunks(dims.width()) {
            for (x, ch) in row.iter().enumerate() {
                if x > 0 {
                    out.push(' ');
                }
                out.push(*ch);
            }
            out.push('\n');
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TilingError {
    #[display("placement #{index} uses a skipped piece")]
    SkippedPiece { index: usize },
    #[display("placement #{index} repeats an earlier piece")]
    RepeatedPiece { index: usize },
    #[display("placement #{index} overlaps an occupied cell")]
    Overlap { index: usize },
    #[display("{free} cells are left uncovered")]
    Incomplete { free: usize },
}

/// Serialized form of a [`Solution`]: a JSON array of placement records.
///
/// ```
/// use beadboard_engine::SolutionRecord;
///
/// let line = r#"[["yellow","A","N",0,0],["blue","B","E",8,1]]"#;
/// let record: SolutionRecord = serde_json::from_str(line).unwrap();
/// assert_eq!(record.0.len(), 2);
/// assert_eq!(serde_json::to_string(&record).unwrap(), line);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolutionRecord(pub Vec<PlacementRecord>);

impl SolutionRecord {
    /// Maps the record back onto the puzzle's pieces and placements.
    pub fn resolve(&self, puzzle: &Puzzle) -> Result<Solution, RecordError> {
        if self.0.len() > puzzle.slot_count() {
            return Err(RecordError::TooManyPlacements {
                count: self.0.len(),
            });
        }
        let inventory = puzzle.config().inventory();
        let mut moves = ArrayVec::new();
        for (index, record) in self.0.iter().enumerate() {
            let PlacementRecord(name, variant, rotation, x, y) = record;
            let piece = inventory
                .find(name)
                .ok_or_else(|| RecordError::UnknownPiece { name: name.clone() })?;
            let placement = Placement {
                piece,
                variant: *variant,
                rotation: *rotation,
                x: *x,
                y: *y,
            };
            let mv = puzzle
                .catalog()
                .find(placement)
                .ok_or(RecordError::OffBoard { index })?;
            moves.push(mv);
        }
        Ok(Solution::new(moves))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RecordError {
    #[display("record has {count} placements, more than the puzzle has pieces")]
    TooManyPlacements { count: usize },
    #[display("unknown piece {name:?}")]
    UnknownPiece { name: String },
    #[display("placement #{index} does not fit on the board")]
    OffBoard { index: usize },
}
