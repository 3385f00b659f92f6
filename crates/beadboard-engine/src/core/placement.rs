use serde::{Deserialize, Serialize};

use super::{
    board::BoardMask,
    piece::{Inventory, PieceId, Rotation, Variant},
};

/// A way to drop one piece onto the board.
///
/// `x` and `y` are the board column and row of the top-left corner of the
/// rotated local window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub piece: PieceId,
    pub variant: Variant,
    pub rotation: Rotation,
    pub x: u8,
    pub y: u8,
}

impl Placement {
    #[must_use]
    pub fn to_record(self, inventory: &Inventory) -> PlacementRecord {
        PlacementRecord(
            inventory.name(self.piece).to_owned(),
            self.variant,
            self.rotation,
            self.x,
            self.y,
        )
    }
}

/// Serialized form of a [`Placement`].
///
/// Written as a JSON array `[name, variant, rotation, x, y]`, e.g.
/// `["yellow", "A", "N", 0, 0]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRecord(pub String, pub Variant, pub Rotation, pub u8, pub u8);

impl PlacementRecord {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// A placement together with the board cells it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub placement: Placement,
    pub mask: BoardMask,
    pub beads: u8,
}
