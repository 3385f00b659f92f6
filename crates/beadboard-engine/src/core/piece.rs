use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Row stride of a [`LocalMask`].
///
/// Equal to the standard board width, so on the standard board a local mask
/// shifted left by `x + 10 * y` is exactly the placed piece.
pub const LOCAL_STRIDE: usize = 10;

/// Widest piece description supported (`L`); an `L`-cell row must still fit
/// when rotated into `L` rows of a `u64` local mask.
pub const MAX_SHAPE_LEN: usize = 6;

/// Largest inventory the search supports.
pub const MAX_PIECES: usize = 16;

/// One of the two mirror-distinct shapes of a piece.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
pub enum Variant {
    /// Described row on top of a full anchor row.
    A,
    /// Full row on top of the described row.
    B,
}

impl Variant {
    pub const ALL: [Self; 2] = [Self::A, Self::B];

    const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

/// Orientation of a placed variant, in 90° clockwise steps from `N`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
pub enum Rotation {
    /// As described.
    N,
    /// 90° clockwise.
    E,
    /// 180°.
    S,
    /// 270° clockwise.
    W,
}

impl Rotation {
    pub const ALL: [Self; 4] = [Self::N, Self::E, Self::S, Self::W];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::N => 0,
            Self::E => 1,
            Self::S => 2,
            Self::W => 3,
        }
    }

    /// Width and height of the local window a piece of length `len` occupies
    /// in this rotation.
    #[must_use]
    pub const fn footprint(self, len: usize) -> (usize, usize) {
        match self {
            Self::N | Self::S => (len, 2),
            Self::E | Self::W => (2, len),
        }
    }
}

/// Shape of a piece in its own local window.
///
/// Bit `y * LOCAL_STRIDE + x` is set for a bead at column `x`, row `y`,
/// independent of any board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalMask(u64);

const fn local_bit(x: usize, y: usize) -> u64 {
    1 << (y * LOCAL_STRIDE + x)
}

impl LocalMask {
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_set(self, x: usize, y: usize) -> bool {
        (self.0 & local_bit(x, y)) != 0
    }

    #[must_use]
    pub const fn count(self) -> u8 {
        #[expect(clippy::cast_possible_truncation)]
        let count = self.0.count_ones() as u8;
        count
    }

    /// Iterates over `(x, y)` of every bead.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some((index % LOCAL_STRIDE, index / LOCAL_STRIDE))
        })
    }

    /// Width and height of the smallest box containing every bead.
    #[must_use]
    pub fn bounding_box(self) -> (usize, usize) {
        let mut min = (usize::MAX, usize::MAX);
        let mut max = (0, 0);
        for (x, y) in self.cells() {
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
        }
        if min.0 == usize::MAX {
            return (0, 0);
        }
        (max.0 - min.0 + 1, max.1 - min.1 + 1)
    }

    /// Renders the mask inside a `width` × `height` window.
    #[must_use]
    pub fn to_ascii(self, width: usize, height: usize) -> String {
        let mut out = String::new();
        for y in 0..height {
            for x in 0..width {
                if x > 0 {
                    out.push(' ');
                }
                out.push(if self.is_set(x, y) { 'x' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

/// Computes the `N`, `E`, `S` and `W` masks of a variant of length `len`.
///
/// A bead at `(x, y)` maps to `(1 - y, x)` in `E`, `(len - 1 - x, 1 - y)` in
/// `S` and `(y, len - 1 - x)` in `W`. `E` and `W` occupy a 2 × `len` window.
#[must_use]
pub const fn compute_rotations(mask: LocalMask, len: usize) -> [LocalMask; 4] {
    let mut east = 0;
    let mut south = 0;
    let mut west = 0;
    let mut y = 0;
    while y < 2 {
        let mut x = 0;
        while x < len {
            if mask.is_set(x, y) {
                east |= local_bit(1 - y, x);
                south |= local_bit(len - 1 - x, 1 - y);
                west |= local_bit(y, len - 1 - x);
            }
            x += 1;
        }
        y += 1;
    }
    [mask, LocalMask(east), LocalMask(south), LocalMask(west)]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShapeError {
    #[display("piece description is empty")]
    Empty,
    #[display("piece description has odd length {len}")]
    OddLength { len: usize },
    #[display("piece description rows are {len} cells wide, at most 6 are supported")]
    TooLong { len: usize },
    #[display("piece description contains a non-ASCII character")]
    NotAscii,
}

/// Compiled geometry of a piece: its two variants and their shared length.
///
/// A description is two rows of `L` characters written back to back. `x` is
/// a bead, anything else is empty. Variant `A` is the first row on top of a
/// full row of `L` beads, variant `B` is a full row on top of the second row.
///
/// ```
/// use beadboard_engine::{PieceShape, Variant};
///
/// let shape = PieceShape::parse("x.....xx").unwrap();
/// assert_eq!(shape.length(), 4);
/// assert_eq!(shape.variant(Variant::A).count(), 5);
/// assert_eq!(shape.variant(Variant::B).count(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceShape {
    len: u8,
    variants: [LocalMask; 2],
}

impl PieceShape {
    pub const fn parse(desc: &str) -> Result<Self, ShapeError> {
        let bytes = desc.as_bytes();
        if bytes.is_empty() {
            return Err(ShapeError::Empty);
        }
        if bytes.len() % 2 != 0 {
            return Err(ShapeError::OddLength { len: bytes.len() });
        }
        let len = bytes.len() / 2;
        if len > MAX_SHAPE_LEN {
            return Err(ShapeError::TooLong { len });
        }

        let mut a = 0;
        let mut b = 0;
        let mut i = 0;
        while i < len {
            let (top, bottom) = (bytes[i], bytes[i + len]);
            if !top.is_ascii() || !bottom.is_ascii() {
                return Err(ShapeError::NotAscii);
            }
            if top == b'x' {
                a |= local_bit(i, 0);
            }
            a |= local_bit(i, 1);
            b |= local_bit(i, 0);
            if bottom == b'x' {
                b |= local_bit(i, 1);
            }
            i += 1;
        }

        #[expect(clippy::cast_possible_truncation)]
        let len = len as u8;
        Ok(Self {
            len,
            variants: [LocalMask(a), LocalMask(b)],
        })
    }

    /// Row length `L` of the description.
    #[must_use]
    pub const fn length(self) -> usize {
        self.len as usize
    }

    #[must_use]
    pub const fn variant(self, variant: Variant) -> LocalMask {
        self.variants[variant.index()]
    }

    #[must_use]
    pub const fn rotations(self, variant: Variant) -> [LocalMask; 4] {
        compute_rotations(self.variant(variant), self.length())
    }

    #[must_use]
    pub const fn oriented(self, variant: Variant, rotation: Rotation) -> LocalMask {
        self.rotations(variant)[rotation.index()]
    }
}

/// Index of a piece in the inventory, which is also the slot it is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(u8);

/// Characters used for the slots in rendered boards.
const SLOT_SYMBOLS: &[u8; MAX_PIECES] = b"0123456789abcdef";

impl PieceId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Single-character label of the slot, `0`-`9` then `a`-`f`.
    #[must_use]
    pub fn symbol(self) -> char {
        char::from(SLOT_SYMBOLS[self.index()])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    name: String,
    shape: PieceShape,
}

impl Piece {
    pub fn new(name: impl Into<String>, shape: PieceShape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    /// Compiles a piece from its description.
    pub fn parse(name: impl Into<String>, desc: &str) -> Result<Self, ConfigError> {
        let name = name.into();
        match PieceShape::parse(desc) {
            Ok(shape) => Ok(Self { name, shape }),
            Err(source) => Err(ConfigError::InvalidShape { name, source }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn shape(&self) -> PieceShape {
        self.shape
    }
}

/// Ordered set of uniquely named pieces.
///
/// The order is the placement order: the piece at position `k` is always the
/// one placed in slot `k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    pieces: Vec<Piece>,
}

impl Inventory {
    pub fn new(pieces: Vec<Piece>) -> Result<Self, ConfigError> {
        if pieces.is_empty() {
            return Err(ConfigError::EmptyInventory);
        }
        if pieces.len() > MAX_PIECES {
            return Err(ConfigError::TooManyPieces {
                count: pieces.len(),
            });
        }
        let mut names = HashSet::new();
        for piece in &pieces {
            if piece.name.is_empty() {
                return Err(ConfigError::EmptyPieceName);
            }
            if !names.insert(piece.name.as_str()) {
                return Err(ConfigError::DuplicatePiece {
                    name: piece.name.clone(),
                });
            }
        }
        Ok(Self { pieces })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    #[must_use]
    pub fn name(&self, id: PieceId) -> &str {
        self.get(id).name()
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<PieceId> {
        self.ids().find(|id| self.name(*id) == name)
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn ids(&self) -> impl Iterator<Item = PieceId> + use<> {
        (0..self.pieces.len()).map(|i| PieceId(i as u8))
    }

    pub fn iter(&self) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        self.ids().zip(&self.pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PuzzleConfig;

    #[test]
    fn test_parse_piece_description() {
        let shape = PieceShape::parse("x.....xx").unwrap();
        assert_eq!(shape.length(), 4);
        // x . . .
        // x x x x
        assert_eq!(
            shape.variant(Variant::A).bits(),
            0b1 | (0b1111 << LOCAL_STRIDE)
        );
        // x x x x
        // . . x x
        assert_eq!(
            shape.variant(Variant::B).bits(),
            0b1111 | (0b1100 << LOCAL_STRIDE)
        );
    }

    #[test]
    fn test_parse_treats_other_characters_as_empty() {
        let dotted = PieceShape::parse("x...xx").unwrap();
        let with_o = PieceShape::parse("x..oxx").unwrap();
        assert_eq!(dotted, with_o);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(PieceShape::parse(""), Err(ShapeError::Empty));
        assert_eq!(
            PieceShape::parse("x.x"),
            Err(ShapeError::OddLength { len: 3 })
        );
        assert_eq!(
            PieceShape::parse("x.x.x.x.x.x.x.x."),
            Err(ShapeError::TooLong { len: 8 })
        );
        assert_eq!(PieceShape::parse("xé."), Err(ShapeError::NotAscii));
    }

    #[test]
    fn test_rotations_preserve_bead_count() {
        let config = PuzzleConfig::standard();
        for (_, piece) in config.inventory().iter() {
            let shape = piece.shape();
            for variant in Variant::ALL {
                let rotations = shape.rotations(variant);
                assert_eq!(rotations.len(), 4);
                assert_eq!(rotations[0], shape.variant(variant));
                let beads = shape.variant(variant).count();
                for (rotation, mask) in Rotation::ALL.into_iter().zip(rotations) {
                    assert_eq!(
                        mask.count(),
                        beads,
                        "{} {variant} {rotation}",
                        piece.name()
                    );
                    let (width, height) = rotation.footprint(shape.length());
                    for (x, y) in mask.cells() {
                        assert!(x < width && y < height, "{} {variant} {rotation}", piece.name());
                    }
                }
            }
        }
    }

    #[test]
    fn test_straight_rotation_swaps_bounding_box() {
        // . . .
        // x x x
        let straight = LocalMask::from_bits(0b111 << LOCAL_STRIDE);
        let [north, east, south, west] = compute_rotations(straight, 3);

        assert_eq!(north.bounding_box(), (3, 1));
        assert_eq!(south.bounding_box(), (3, 1));
        assert_eq!(east.bounding_box(), (1, 3));
        assert_eq!(west.bounding_box(), (1, 3));

        // S is the same row moved to the top.
        assert_eq!(south.bits(), 0b111);
        // E sits in the left column, W in the right one.
        assert!(east.cells().all(|(x, _)| x == 0));
        assert!(west.cells().all(|(x, _)| x == 1));
    }

    #[test]
    fn test_half_turn_twice_is_identity() {
        let shape = PieceShape::parse("x..oxx").unwrap();
        let [_, east, south, _] = shape.rotations(Variant::A);
        assert_eq!(compute_rotations(south, 3)[2], shape.variant(Variant::A));

        let east_cells: HashSet<_> = east.cells().collect();
        let expected: HashSet<_> = shape
            .variant(Variant::A)
            .cells()
            .map(|(x, y)| (1 - y, x))
            .collect();
        assert_eq!(east_cells, expected);
    }

    #[test]
    fn test_inventory_validation() {
        let square = PieceShape::parse("xxxx").unwrap();
        assert!(matches!(
            Inventory::new(vec![]),
            Err(ConfigError::EmptyInventory)
        ));
        assert!(matches!(
            Inventory::new(vec![Piece::new("a", square), Piece::new("a", square)]),
            Err(ConfigError::DuplicatePiece { name }) if name == "a"
        ));
        assert!(matches!(
            Inventory::new(vec![Piece::new("", square)]),
            Err(ConfigError::EmptyPieceName)
        ));
        let many = (0..=MAX_PIECES)
            .map(|i| Piece::new(format!("p{i}"), square))
            .collect();
        assert!(matches!(
            Inventory::new(many),
            Err(ConfigError::TooManyPieces { count: 17 })
        ));

        let inventory =
            Inventory::new(vec![Piece::new("a", square), Piece::new("b", square)]).unwrap();
        let b = inventory.find("b").unwrap();
        assert_eq!(b.index(), 1);
        assert_eq!(inventory.name(b), "b");
        assert_eq!(inventory.find("c"), None);
        assert_eq!(b.symbol(), '1');
    }

    #[test]
    fn test_variant_and_rotation_from_str() {
        assert_eq!("A".parse::<Variant>().unwrap(), Variant::A);
        assert_eq!("W".parse::<Rotation>().unwrap(), Rotation::W);
        assert!("Q".parse::<Rotation>().is_err());
        assert_eq!(Rotation::E.to_string(), "E");
    }
}
