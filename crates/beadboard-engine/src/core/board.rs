use std::ops::{BitAnd, BitOr, BitOrAssign};

use crate::ConfigError;

/// Largest number of cells a board may have; one bit per cell in a `u64`.
pub const MAX_CELLS: usize = 64;

/// Dimensions of a rectangular board.
///
/// Cells are indexed row-major: the cell at column `x` and row `y` has index
/// `y * width + x`. The standard board is 10 columns by 5 rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardDims {
    width: u8,
    height: u8,
}

impl Default for BoardDims {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl BoardDims {
    pub const STANDARD: Self = Self {
        width: 10,
        height: 5,
    };

    pub fn new(width: u8, height: u8) -> Result<Self, ConfigError> {
        let cells = usize::from(width) * usize::from(height);
        if cells == 0 || cells > MAX_CELLS {
            return Err(ConfigError::InvalidBoardSize { width, height });
        }
        Ok(Self { width, height })
    }

    #[must_use]
    pub const fn width(self) -> usize {
        self.width as usize
    }

    #[must_use]
    pub const fn height(self) -> usize {
        self.height as usize
    }

    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.width() * self.height()
    }

    #[must_use]
    pub const fn cell_index(self, x: usize, y: usize) -> usize {
        y * self.width() + x
    }

    /// Mask with every cell of the board set.
    #[must_use]
    pub const fn full_mask(self) -> BoardMask {
        let cells = self.cell_count();
        if cells == MAX_CELLS {
            BoardMask(u64::MAX)
        } else {
            BoardMask((1 << cells) - 1)
        }
    }

    /// Iterates over the indices of cells not set in `mask`.
    pub fn free_cells(self, mask: BoardMask) -> impl Iterator<Item = usize> {
        BoardMask(self.full_mask().0 & !mask.0).cells()
    }
}

/// Occupancy of a board, one bit per cell.
///
/// Bit `y * width + x` is set when the cell at column `x`, row `y` is
/// occupied. Along a search path masks only grow.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardMask(u64);

impl BoardMask {
    pub const EMPTY: Self = Self(0);

    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn cell(index: usize) -> Self {
        Self(1 << index)
    }

    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Number of occupied cells (beads).
    #[must_use]
    pub const fn count(self) -> u8 {
        #[expect(clippy::cast_possible_truncation)]
        let count = self.0.count_ones() as u8;
        count
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, index: usize) -> bool {
        (self.0 & (1 << index)) != 0
    }

    /// Iterates over the indices of occupied cells in ascending order.
    pub fn cells(self) -> impl Iterator<Item = usize> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(index)
        })
    }

    /// Parses a board from a cell string.
    ///
    /// `x` and `#` mark occupied cells, `.` marks an empty cell. Whitespace
    /// is ignored, so the cells may be laid out one row per line.
    pub fn from_ascii(dims: BoardDims, art: &str) -> Result<Self, ConfigError> {
        let mut mask = Self::EMPTY;
        let mut index = 0;
        for ch in art.chars().filter(|c| !c.is_whitespace()) {
            match ch {
                'x' | '#' => {
                    if index < dims.cell_count() {
                        mask |= Self::cell(index);
                    }
                }
                '.' => {}
                _ => return Err(ConfigError::InvalidBoardChar { ch }),
            }
            index += 1;
        }
        if index != dims.cell_count() {
            return Err(ConfigError::BoardCellCount {
                expected: dims.cell_count(),
                actual: index,
            });
        }
        Ok(mask)
    }

    /// Renders the board as rows of `x` and `.`, one line per row.
    #[must_use]
    pub fn to_ascii(self, dims: BoardDims) -> String {
        let mut out = String::with_capacity(dims.cell_count() * 2 + dims.height());
        for y in 0..dims.height() {
            for x in 0..dims.width() {
                if x > 0 {
                    out.push(' ');
                }
                out.push(if self.contains(dims.cell_index(x, y)) {
                    'x'
                } else {
                    '.'
                });
            }
            out.push('\n');
        }
        out
    }
}

impl BitOr for BoardMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for BoardMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for BoardMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_full_mask() {
        let full = BoardDims::STANDARD.full_mask();
        assert_eq!(full.count(), 50);
        assert_eq!(full.bits(), (1 << 50) - 1);
    }

    #[test]
    fn test_invalid_dims() {
        assert!(BoardDims::new(0, 5).is_err());
        assert!(BoardDims::new(9, 8).is_err());
        assert!(BoardDims::new(8, 8).is_ok());
        assert_eq!(BoardDims::new(8, 8).unwrap().full_mask().bits(), u64::MAX);
    }

    #[test]
    fn test_cells_iterates_in_order() {
        let mask = BoardMask::from_bits(0b1010_0001);
        assert_eq!(mask.cells().collect::<Vec<_>>(), vec![0, 5, 7]);
        assert_eq!(mask.count(), 3);
    }

    #[test]
    fn test_free_cells_stay_inside_board() {
        let dims = BoardDims::new(4, 2).unwrap();
        let mask = BoardMask::from_bits(0b0110_0110);
        assert_eq!(dims.free_cells(mask).collect::<Vec<_>>(), vec![0, 3, 4, 7]);
    }

    #[test]
    fn test_from_ascii() {
        let dims = BoardDims::STANDARD;
        let mask = BoardMask::from_ascii(
            dims,
            r"
            ..........
            ..x..xx...
            ..x..xxxx.
            ..xx......
            ..........
            ",
        )
        .unwrap();
        assert_eq!(mask.count(), 10);
        assert!(mask.contains(dims.cell_index(2, 1)));
        assert!(mask.contains(dims.cell_index(8, 2)));
        assert!(!mask.contains(dims.cell_index(9, 2)));

        let rendered = mask.to_ascii(dims);
        let reparsed = BoardMask::from_ascii(dims, &rendered).unwrap();
        assert_eq!(reparsed, mask);
    }

    #[test]
    fn test_from_ascii_errors() {
        let dims = BoardDims::new(2, 2).unwrap();
        assert!(matches!(
            BoardMask::from_ascii(dims, "x.."),
            Err(ConfigError::BoardCellCount {
                expected: 4,
                actual: 3
            })
        ));
        assert!(matches!(
            BoardMask::from_ascii(dims, "x.?."),
            Err(ConfigError::InvalidBoardChar { ch: '?' })
        ));
    }
}
