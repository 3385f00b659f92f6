use arrayvec::ArrayVec;

use crate::core::{BoardMask, MAX_PIECES, Move};

use super::{puzzle::Puzzle, solution::Solution};

/// A node of the depth-first search.
///
/// Frames are values: extending one builds a new frame and leaves the old one
/// untouched. The invariant `cells_free + board.count() == cell_count` holds
/// for every frame, and `board` is the start board plus the masks of `moves`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFrame {
    board: BoardMask,
    moves: ArrayVec<Move, MAX_PIECES>,
    pieces_todo: u8,
    cells_free: u8,
}

impl SearchFrame {
    /// The start board with every slot still to go.
    #[must_use]
    pub fn root(puzzle: &Puzzle) -> Self {
        let config = puzzle.config();
        #[expect(clippy::cast_possible_truncation)]
        let pieces_todo = puzzle.slot_count() as u8;
        Self {
            board: config.start_board(),
            moves: ArrayVec::new(),
            pieces_todo,
            cells_free: config.initial_free_cells(),
        }
    }

    #[must_use]
    pub fn board(&self) -> BoardMask {
        self.board
    }

    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[must_use]
    pub fn pieces_todo(&self) -> usize {
        usize::from(self.pieces_todo)
    }

    #[must_use]
    pub fn cells_free(&self) -> u8 {
        self.cells_free
    }

    /// Slot of the next piece, or `None` once every slot is done.
    #[must_use]
    pub fn next_slot(&self, slot_count: usize) -> Option<usize> {
        (self.pieces_todo > 0).then(|| slot_count - self.pieces_todo())
    }

    /// Moves past the current slot without placing anything.
    #[must_use]
    pub fn skip(&self) -> Self {
        Self {
            board: self.board,
            moves: self.moves.clone(),
            pieces_todo: self.pieces_todo - 1,
            cells_free: self.cells_free,
        }
    }

    /// Places `mv` in the current slot. `mv` must not overlap the board.
    #[must_use]
    pub fn place(&self, mv: Move) -> Self {
        debug_assert!(!self.board.overlaps(mv.mask));
        let mut moves = self.moves.clone();
        moves.push(mv);
        Self {
            board: self.board | mv.mask,
            moves,
            pieces_todo: self.pieces_todo - 1,
            cells_free: self.cells_free - mv.beads,
        }
    }

    #[must_use]
    pub fn into_solution(self) -> Solution {
        Solution::new(self.moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PuzzleConfig;

    #[test]
    fn test_root_frame() {
        let puzzle = Puzzle::new(PuzzleConfig::standard());
        let root = SearchFrame::root(&puzzle);
        assert_eq!(root.board(), BoardMask::EMPTY);
        assert_eq!(root.pieces_todo(), 10);
        assert_eq!(root.cells_free(), 50);
        assert_eq!(root.next_slot(10), Some(0));
        assert!(root.moves().is_empty());
    }

    #[test]
    fn test_place_and_skip_keep_invariant() {
        let puzzle = Puzzle::new(PuzzleConfig::standard());
        let cell_count = puzzle.config().dims().cell_count();
        let root = SearchFrame::root(&puzzle);
        let first = puzzle.catalog().moves(0)[0];

        let placed = root.place(first);
        assert_eq!(placed.next_slot(10), Some(1));
        assert_eq!(placed.board(), first.mask);
        assert_eq!(
            usize::from(placed.cells_free()) + usize::from(placed.board().count()),
            cell_count
        );
        // The parent frame is untouched.
        assert_eq!(root.board(), BoardMask::EMPTY);

        let skipped = placed.skip();
        assert_eq!(skipped.next_slot(10), Some(2));
        assert_eq!(skipped.board(), placed.board());
        assert_eq!(skipped.cells_free(), placed.cells_free());
        assert_eq!(skipped.moves(), placed.moves());
    }

    #[test]
    fn test_root_counts_start_board() {
        let config = PuzzleConfig::standard()
            .with_start_board(BoardMask::from_bits(0b111))
            .unwrap();
        let puzzle = Puzzle::new(config);
        let root = SearchFrame::root(&puzzle);
        assert_eq!(root.cells_free(), 47);
        assert_eq!(root.board().count(), 3);
    }
}
