use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{BoardDims, BoardMask, Inventory, Piece, PieceId, PieceShape},
};

const fn stock(desc: &str) -> PieceShape {
    match PieceShape::parse(desc) {
        Ok(shape) => shape,
        Err(_) => panic!("malformed stock piece description"),
    }
}

/// The ten stock pieces in placement order.
///
/// Each description is the top row of variant `A` followed by the bottom row
/// of variant `B`; the other row of each variant is full. The yellow piece,
/// for instance, is either
///
/// ```text
/// x . . .      x x x x
/// x x x x  or  . . x x
/// ```
const STANDARD_PIECES: [(&str, PieceShape); 10] = [
    ("yellow", stock(concat!("x...", "..xx"))),
    ("blue", stock(concat!("x.x.", "x..."))),
    ("orange", stock(concat!("..x.", "x.x."))),
    ("red", stock(concat!("x..x", "x..."))),
    ("pink", stock(concat!(".x..", "xx.."))),
    ("light-blue", stock(concat!(".xx.", ".x.."))),
    ("light-green", stock(concat!("x.x", "x.."))),
    ("dark-green", stock(concat!(".x.", "xx."))),
    ("purple", stock(concat!("x..", "oxx"))),
    ("dark-blue", stock(concat!("x.x", ".x."))),
];

/// Immutable description of one puzzle: board, pieces, skipped pieces and
/// pre-filled cells.
///
/// # Example
///
/// ```
/// use beadboard_engine::PuzzleConfig;
///
/// let config = PuzzleConfig::standard()
///     .with_skip(["yellow", "light-green"])
///     .unwrap();
/// assert_eq!(config.inventory().len(), 10);
/// assert_eq!(config.skipped().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleConfig {
    dims: BoardDims,
    inventory: Inventory,
    skip: Vec<PieceId>,
    start_board: BoardMask,
}

impl PuzzleConfig {
    #[must_use]
    pub fn new(dims: BoardDims, inventory: Inventory) -> Self {
        Self {
            dims,
            inventory,
            skip: vec![],
            start_board: BoardMask::EMPTY,
        }
    }

    /// The 10 × 5 board with the ten stock pieces, nothing skipped and an
    /// empty start board.
    #[must_use]
    pub fn standard() -> Self {
        let pieces = STANDARD_PIECES
            .iter()
            .map(|(name, shape)| Piece::new(*name, *shape))
            .collect();
        let inventory = match Inventory::new(pieces) {
            Ok(inventory) => inventory,
            Err(e) => unreachable!("stock inventory is valid: {e}"),
        };
        Self::new(BoardDims::STANDARD, inventory)
    }

    /// Marks pieces that keep their slot but are never placed.
    pub fn with_skip<I, S>(mut self, names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            let id = self
                .inventory
                .find(name)
                .ok_or_else(|| ConfigError::UnknownPiece {
                    name: name.to_owned(),
                })?;
            self.skip.push(id);
        }
        self.skip.sort_unstable();
        self.skip.dedup();
        Ok(self)
    }

    /// Pre-fills cells of the board before any piece is placed.
    pub fn with_start_board(mut self, start_board: BoardMask) -> Result<Self, ConfigError> {
        if (start_board & self.dims.full_mask()) != start_board {
            return Err(ConfigError::StartBoardOutOfRange);
        }
        self.start_board = start_board;
        Ok(self)
    }

    /// Same as [`Self::with_start_board`], reading the cells from a string
    /// (see [`BoardMask::from_ascii`]).
    pub fn with_start_board_ascii(self, art: &str) -> Result<Self, ConfigError> {
        let mask = BoardMask::from_ascii(self.dims, art)?;
        self.with_start_board(mask)
    }

    #[must_use]
    pub fn dims(&self) -> BoardDims {
        self.dims
    }

    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    #[must_use]
    pub fn start_board(&self) -> BoardMask {
        self.start_board
    }

    /// Cells still free on the start board.
    #[must_use]
    pub fn initial_free_cells(&self) -> u8 {
        self.dims.full_mask().count() - self.start_board.count()
    }

    #[must_use]
    pub fn is_skipped(&self, id: PieceId) -> bool {
        self.skip.binary_search(&id).is_ok()
    }

    pub fn skipped(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.skip.iter().copied()
    }
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Board size as written in a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSize {
    pub width: u8,
    pub height: u8,
}

/// One piece as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceEntry {
    pub name: String,
    pub shape: String,
}

/// On-disk form of a [`PuzzleConfig`].
///
/// Every field is optional; missing fields fall back to the standard puzzle.
///
/// ```json
/// {
///   "board": { "width": 10, "height": 5 },
///   "pieces": [{ "name": "yellow", "shape": "x.....xx" }],
///   "skip": ["yellow"],
///   "start_board": "..........  ..x..xx...  ..x..xxxx.  ..xx......  .........."
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub board: Option<BoardSize>,
    #[serde(default)]
    pub pieces: Vec<PieceEntry>,
    #[serde(default)]
    pub skip: Vec<String>,
    #[serde(default)]
    pub start_board: Option<String>,
}

impl ConfigFile {
    pub fn into_config(self) -> Result<PuzzleConfig, ConfigError> {
        let standard = PuzzleConfig::standard();
        let dims = match self.board {
            Some(BoardSize { width, height }) => BoardDims::new(width, height)?,
            None => standard.dims(),
        };
        let inventory = if self.pieces.is_empty() {
            standard.inventory
        } else {
            let pieces = self
                .pieces
                .into_iter()
                .map(|entry| Piece::parse(entry.name, &entry.shape))
                .collect::<Result<Vec<_>, _>>()?;
            Inventory::new(pieces)?
        };

        let mut config = PuzzleConfig::new(dims, inventory).with_skip(&self.skip)?;
        if let Some(start_board) = &self.start_board {
            config = config.with_start_board_ascii(start_board)?;
        }
        Ok(config)
    }
}
