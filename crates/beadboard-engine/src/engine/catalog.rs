use crate::core::{
    BoardDims, BoardMask, Inventory, Move, PieceId, PieceShape, Placement, Rotation, Variant,
};

/// Every placement of every piece, grouped by slot.
///
/// Slot `k` holds the placements of the `k`-th inventory piece, enumerated by
/// rotation, then variant, then `x`, then `y`. Built once and never modified.
#[derive(Debug, Clone)]
pub struct MoveCatalog {
    dims: BoardDims,
    slots: Vec<Vec<Move>>,
}

impl MoveCatalog {
    #[must_use]
    pub fn build(dims: BoardDims, inventory: &Inventory) -> Self {
        let slots = inventory
            .iter()
            .map(|(id, piece)| piece_moves(dims, id, piece.shape()))
            .collect();
        Self { dims, slots }
    }

    #[must_use]
    pub fn dims(&self) -> BoardDims {
        self.dims
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn moves(&self, slot: usize) -> &[Move] {
        &self.slots[slot]
    }

    /// Total number of placements over all slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up the move for a placement, if the placement fits the board.
    #[must_use]
    pub fn find(&self, placement: Placement) -> Option<Move> {
        self.slots
            .get(placement.piece.index())?
            .iter()
            .find(|mv| mv.placement == placement)
            .copied()
    }

    /// Smallest and largest bead count among the placements of a slot, or
    /// `None` if the piece fits nowhere on the board.
    #[must_use]
    pub fn bead_range(&self, slot: usize) -> Option<(u8, u8)> {
        let moves = &self.slots[slot];
        let min = moves.iter().map(|mv| mv.beads).min()?;
        let max = moves.iter().map(|mv| mv.beads).max()?;
        Some((min, max))
    }
}

fn piece_moves(dims: BoardDims, piece: PieceId, shape: PieceShape) -> Vec<Move> {
    let len = shape.length();
    let mut moves = vec![];
    for rotation in Rotation::ALL {
        let (width, height) = rotation.footprint(len);
        if width > dims.width() || height > dims.height() {
            continue;
        }
        for variant in Variant::ALL {
            let local = shape.oriented(variant, rotation);
            for x in 0..=dims.width() - width {
                for y in 0..=dims.height() - height {
                    let mask = local
                        .cells()
                        .map(|(dx, dy)| BoardMask::cell(dims.cell_index(x + dx, y + dy)))
                        .fold(BoardMask::EMPTY, |acc, cell| acc | cell);
                    #[expect(clippy::cast_possible_truncation)]
                    let placement = Placement {
                        piece,
                        variant,
                        rotation,
                        x: x as u8,
                        y: y as u8,
                    };
                    moves.push(Move {
                        placement,
                        mask,
                        beads: mask.count(),
                    });
                }
            }
        }
    }
    moves
}

/// For every cell and slot, the masks of that slot's placements covering the
/// cell.
///
/// Stored as a flat table indexed by `cell * slot_count + slot`.
#[derive(Debug, Clone)]
pub struct PositionIndex {
    slot_count: usize,
    covering: Vec<Vec<BoardMask>>,
}

impl PositionIndex {
    #[must_use]
    pub fn build(catalog: &MoveCatalog) -> Self {
        let slot_count = catalog.slot_count();
        let covering = (0..catalog.dims().cell_count())
            .flat_map(|cell| {
                (0..slot_count).map(move |slot| {
                    catalog
                        .moves(slot)
                        .iter()
                        .filter(|mv| mv.mask.contains(cell))
                        .map(|mv| mv.mask)
                        .collect()
                })
            })
            .collect();
        Self {
            slot_count,
            covering,
        }
    }

    #[must_use]
    pub fn covering(&self, cell: usize, slot: usize) -> &[BoardMask] {
        &self.covering[cell * self.slot_count + slot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Piece, PuzzleConfig};

    #[test]
    fn test_standard_catalog_sizes() {
        let config = PuzzleConfig::standard();
        let catalog = MoveCatalog::build(config.dims(), config.inventory());
        assert_eq!(catalog.slot_count(), 10);
        for (id, piece) in config.inventory().iter() {
            let expected = match piece.shape().length() {
                // N/S: 7 x 4 positions, E/W: 9 x 2 positions, two variants each.
                4 => 2 * 2 * (7 * 4) + 2 * 2 * (9 * 2),
                // N/S: 8 x 4 positions, E/W: 9 x 3 positions.
                3 => 2 * 2 * (8 * 4) + 2 * 2 * (9 * 3),
                len => panic!("unexpected length {len}"),
            };
            assert_eq!(catalog.moves(id.index()).len(), expected, "{}", piece.name());
        }
    }

    #[test]
    fn test_moves_stay_on_board() {
        let config = PuzzleConfig::standard();
        let catalog = MoveCatalog::build(config.dims(), config.inventory());
        let full = config.dims().full_mask();
        for (id, piece) in config.inventory().iter() {
            for mv in catalog.moves(id.index()) {
                assert_eq!(mv.mask & full, mv.mask, "{mv:?}");
                assert!(mv.mask.bits() < 1 << 50);
                assert_eq!(mv.placement.piece, id);
                let canonical = piece.shape().variant(mv.placement.variant).count();
                assert_eq!(mv.beads, canonical, "{mv:?}");
                assert_eq!(mv.mask.count(), mv.beads);
            }
        }
    }

    #[test]
    fn test_standard_move_is_shifted_local_mask() {
        let config = PuzzleConfig::standard();
        let catalog = MoveCatalog::build(config.dims(), config.inventory());
        let yellow = config.inventory().find("yellow").unwrap();
        let shape = config.inventory().get(yellow).shape();
        for mv in catalog.moves(yellow.index()) {
            let Placement {
                variant,
                rotation,
                x,
                y,
                ..
            } = mv.placement;
            let local = shape.oriented(variant, rotation).bits();
            let shift = u32::from(x) + 10 * u32::from(y);
            assert_eq!(mv.mask.bits(), local << shift);
        }
    }

    #[test]
    fn test_find_and_bead_range() {
        let config = PuzzleConfig::standard();
        let catalog = MoveCatalog::build(config.dims(), config.inventory());
        let blue = config.inventory().find("blue").unwrap();
        let placement = Placement {
            piece: blue,
            variant: Variant::A,
            rotation: Rotation::E,
            x: 8,
            y: 1,
        };
        let mv = catalog.find(placement).unwrap();
        assert_eq!(mv.placement, placement);

        let off_board = Placement { x: 9, ..placement };
        assert_eq!(catalog.find(off_board), None);

        assert_eq!(catalog.bead_range(blue.index()), Some((5, 6)));
    }

    #[test]
    fn test_piece_too_large_for_board() {
        let dims = BoardDims::new(3, 3).unwrap();
        let long = Piece::new("long", PieceShape::parse("xxxxxxxx").unwrap());
        let inventory = Inventory::new(vec![long]).unwrap();
        let catalog = MoveCatalog::build(dims, &inventory);
        assert!(catalog.is_empty());
        assert_eq!(catalog.bead_range(0), None);
    }

    #[test]
    fn test_position_index() {
        let config = PuzzleConfig::standard();
        let catalog = MoveCatalog::build(config.dims(), config.inventory());
        let index = PositionIndex::build(&catalog);
        for cell in 0..config.dims().cell_count() {
            for slot in 0..catalog.slot_count() {
                let covering = index.covering(cell, slot);
                assert!(!covering.is_empty());
                assert!(covering.iter().all(|mask| mask.contains(cell)));
                let expected = catalog
                    .moves(slot)
                    .iter()
                    .filter(|mv| mv.mask.contains(cell))
                    .count();
                assert_eq!(covering.len(), expected);
            }
        }
    }
}
