use crate::core::BoardMask;

use super::{
    catalog::{MoveCatalog, PositionIndex},
    config::PuzzleConfig,
};

/// Bead counts the pieces of a range of slots can contribute together.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BeadBounds {
    pub min: u16,
    pub max: u16,
}

/// A configuration compiled for searching.
///
/// Owns the move catalog, the position index and the bead bounds of every
/// slot. Everything here is read-only after [`Puzzle::new`], so a `&Puzzle`
/// can be shared between search workers.
#[derive(Debug, Clone)]
pub struct Puzzle {
    config: PuzzleConfig,
    catalog: MoveCatalog,
    index: PositionIndex,
    active: Vec<bool>,
    last_active: Option<usize>,
    remaining: Vec<BeadBounds>,
}

impl Puzzle {
    #[must_use]
    pub fn new(config: PuzzleConfig) -> Self {
        let catalog = MoveCatalog::build(config.dims(), config.inventory());
        let index = PositionIndex::build(&catalog);
        let active: Vec<bool> = config
            .inventory()
            .ids()
            .map(|id| !config.is_skipped(id))
            .collect();
        let last_active = active.iter().rposition(|&active| active);

        // remaining[slot] sums the bead ranges of all active slots after `slot`.
        let mut remaining = vec![BeadBounds::default(); catalog.slot_count()];
        let mut acc = BeadBounds::default();
        for slot in (0..catalog.slot_count()).rev() {
            remaining[slot] = acc;
            if active[slot] {
                let (min, max) = catalog.bead_range(slot).unwrap_or((0, 0));
                acc.min += u16::from(min);
                acc.max += u16::from(max);
            }
        }

        log::debug!(
            "compiled {} slots with {} placements",
            catalog.slot_count(),
            catalog.len()
        );
        Self {
            config,
            catalog,
            index,
            active,
            last_active,
            remaining,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &MoveCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn position_index(&self) -> &PositionIndex {
        &self.index
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.catalog.slot_count()
    }

    #[must_use]
    pub fn is_skipped(&self, slot: usize) -> bool {
        !self.active[slot]
    }

    /// Whether `slot` is the last slot that is not skipped.
    #[must_use]
    pub fn is_last_active(&self, slot: usize) -> bool {
        self.last_active == Some(slot)
    }

    /// Bead counts the active slots after `slot` can still place.
    #[must_use]
    pub fn remaining_beads(&self, slot: usize) -> BeadBounds {
        self.remaining[slot]
    }

    /// Checks that every free cell of `board` can still be covered by some
    /// placement of an active slot at or after `from_slot` that does not
    /// overlap `board`.
    #[must_use]
    pub fn is_reachable(&self, board: BoardMask, from_slot: usize) -> bool {
        let slots = from_slot..self.slot_count();
        self.config.dims().free_cells(board).all(|cell| {
            slots.clone().filter(|&slot| self.active[slot]).any(|slot| {
                self.index
                    .covering(cell, slot)
                    .iter()
                    .any(|mask| !mask.overlaps(board))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoardDims, Inventory, Piece};

    #[test]
    fn test_standard_bounds() {
        let puzzle = Puzzle::new(PuzzleConfig::standard());
        // Every stock piece places 4 to 6 beads; the last slot leaves nothing.
        assert_eq!(puzzle.remaining_beads(9), BeadBounds { min: 0, max: 0 });
        // dark-blue: 4 or 5 beads.
        assert_eq!(puzzle.remaining_beads(8), BeadBounds { min: 4, max: 5 });
        // Everything after yellow.
        assert_eq!(puzzle.remaining_beads(0), BeadBounds { min: 41, max: 50 });
        assert!(puzzle.is_last_active(9));
    }

    #[test]
    fn test_skipped_slots_contribute_nothing() {
        let config = PuzzleConfig::standard()
            .with_skip(["dark-blue", "purple"])
            .unwrap();
        let puzzle = Puzzle::new(config);
        assert!(puzzle.is_skipped(9));
        assert!(!puzzle.is_skipped(0));
        assert!(puzzle.is_last_active(7));
        assert!(!puzzle.is_last_active(9));
        assert_eq!(puzzle.remaining_beads(7), BeadBounds { min: 0, max: 0 });
        assert_eq!(puzzle.remaining_beads(6), BeadBounds { min: 4, max: 5 });
    }

    #[test]
    fn test_reachability() {
        let dims = BoardDims::new(4, 2).unwrap();
        let square = Piece::parse("square", "xxxx").unwrap();
        let inventory = Inventory::new(vec![square]).unwrap();
        let puzzle = Puzzle::new(PuzzleConfig::new(dims, inventory));
        assert!(puzzle.is_reachable(BoardMask::EMPTY, 0));
        // Column 0 filled: columns 1..=3 remain, the square still fits.
        let column = BoardMask::from_bits(0b0001_0001);
        assert!(puzzle.is_reachable(column, 0));
        // Columns 0 and 2 filled: the free cells in columns 1 and 3 are isolated.
        let columns = BoardMask::from_bits(0b0101_0101);
        assert!(!puzzle.is_reachable(columns, 0));
        // No slot left to fill anything.
        assert!(!puzzle.is_reachable(column, 1));
        assert!(puzzle.is_reachable(BoardMask::from_bits(0xff), 1));
    }
}
