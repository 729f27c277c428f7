//! Rules and search engine for 4x4 stacking tic-tac-toe (Gobblet-style).
//!
//! # Pieces
//!
//! ```text
//! Each player owns 12 pieces, indexed 0-11.
//! Piece i starts in reserve stack i / 4 at depth i % 4 with size i % 4 + 1:
//!
//!   stack 0: G00(S1) G01(S2) G02(S3) G03(S4)   <- top
//!   stack 1: G04(S1) G05(S2) G06(S3) G07(S4)   <- top
//!   stack 2: G08(S1) G09(S2) G10(S3) G11(S4)   <- top
//! ```
//!
//! # Board
//!
//! ```text
//! Cell indices (row-major order):
//!   (0,0)=0   (0,1)=1   (0,2)=2   (0,3)=3
//!   (1,0)=4   (1,1)=5   (1,2)=6   (1,3)=7
//!   (2,0)=8   (2,1)=9   (2,2)=10  (2,3)=11
//!   (3,0)=12  (3,1)=13  (3,2)=14  (3,3)=15
//!
//! Line indices:
//!   0-3: rows, 4-7: columns, 8: main diagonal, 9: anti-diagonal
//! ```
//!
//! Each cell holds a stack of pieces with strictly increasing sizes, so a cell
//! never holds more than four pieces. Only the top piece of a cell counts for
//! lines.

pub mod controller;
pub mod eval;
pub mod notation;
pub mod render;
pub mod search;
pub mod state;

pub use controller::Controller;
pub use eval::evaluate;
pub use notation::{describe, parse_action, NotationError};
pub use search::{Level, Robot, SearchContext, SearchOutcome};
pub use state::{Action, GameState, Reverse};

use serde::{Deserialize, Serialize};

/// Board side length.
pub const BOARD_SIZE: u8 = 4;
/// Number of cells on the board.
pub const CELLS: usize = 16;
/// Pieces owned by each player.
pub const PIECES_PER_PLAYER: usize = 12;
/// Reserve stacks per player.
pub const RESERVE_STACKS: usize = 3;
/// Pieces per reserve stack (one of each size).
pub const PIECES_PER_STACK: usize = 4;
/// Number of winning lines.
pub const LINE_COUNT: usize = 10;

/// The 10 winning lines: 4 rows, 4 columns, 2 diagonals.
pub const LINES: [[Pos; 4]; LINE_COUNT] = [
    [Pos(0), Pos(1), Pos(2), Pos(3)],     // Row 0
    [Pos(4), Pos(5), Pos(6), Pos(7)],     // Row 1
    [Pos(8), Pos(9), Pos(10), Pos(11)],   // Row 2
    [Pos(12), Pos(13), Pos(14), Pos(15)], // Row 3
    [Pos(0), Pos(4), Pos(8), Pos(12)],    // Col 0
    [Pos(1), Pos(5), Pos(9), Pos(13)],    // Col 1
    [Pos(2), Pos(6), Pos(10), Pos(14)],   // Col 2
    [Pos(3), Pos(7), Pos(11), Pos(15)],   // Col 3
    [Pos(0), Pos(5), Pos(10), Pos(15)],   // Main diagonal
    [Pos(3), Pos(6), Pos(9), Pos(12)],    // Anti-diagonal
];

/// Player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    One = 0,
    Two = 1,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Index into per-player arrays (0 or 1).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Contribution of this player's top piece to a line score.
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            Player::One => 1,
            Player::Two => -1,
        }
    }

    /// Sign of an optional top owner; an empty cell contributes 0.
    #[inline]
    pub fn sign_of(owner: Option<Player>) -> i8 {
        owner.map_or(0, Player::sign)
    }

    /// 1-based number used in labels and messages.
    #[inline]
    pub fn number(self) -> u8 {
        self as u8 + 1
    }
}

/// Position on the 4x4 board (0-15).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos(pub u8);

impl Pos {
    /// Create a position from row and column (0-3 each).
    #[inline]
    pub fn from_row_col(row: u8, col: u8) -> Pos {
        debug_assert!(row < BOARD_SIZE && col < BOARD_SIZE);
        Pos(row * BOARD_SIZE + col)
    }

    /// Get the row (0-3).
    #[inline]
    pub fn row(self) -> u8 {
        self.0 / BOARD_SIZE
    }

    /// Get the column (0-3).
    #[inline]
    pub fn col(self) -> u8 {
        self.0 % BOARD_SIZE
    }

    /// Check if this is a valid position (0-15).
    #[inline]
    pub fn is_valid(self) -> bool {
        (self.0 as usize) < CELLS
    }

    /// Iterate over all 16 positions.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..CELLS as u8).map(Pos)
    }

    /// Indices of the lines passing through this cell: its row, its column
    /// and zero to two diagonals.
    pub fn lines(self) -> impl Iterator<Item = usize> {
        let (row, col) = (self.row() as usize, self.col() as usize);
        let main = (row == col).then_some(8);
        let anti = (row + col == BOARD_SIZE as usize - 1).then_some(9);
        [Some(row), Some(BOARD_SIZE as usize + col), main, anti]
            .into_iter()
            .flatten()
    }
}

/// Where a piece currently sits. `depth` is the position within the stack,
/// 0 being the bottom.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Location {
    Reserve { stack: u8, depth: u8 },
    Board { pos: Pos, depth: u8 },
}

impl Location {
    /// Check if the piece has not been played yet.
    #[inline]
    pub fn is_reserve(self) -> bool {
        matches!(self, Location::Reserve { .. })
    }
}

/// Reference to a piece by owner and index, as stored in stacks.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct PieceRef {
    pub owner: Player,
    pub index: u8,
}

/// Size of the piece with the given index (1-4).
#[inline]
pub const fn piece_size(index: u8) -> u8 {
    index % PIECES_PER_STACK as u8 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_opponent() {
        assert_eq!(Player::One.opponent(), Player::Two);
        assert_eq!(Player::Two.opponent(), Player::One);
    }

    #[test]
    fn test_player_sign() {
        assert_eq!(Player::One.sign(), 1);
        assert_eq!(Player::Two.sign(), -1);
        assert_eq!(Player::sign_of(None), 0);
        assert_eq!(Player::sign_of(Some(Player::Two)), -1);
    }

    #[test]
    fn test_pos_row_col() {
        for pos in Pos::all() {
            assert_eq!(Pos::from_row_col(pos.row(), pos.col()), pos);
        }
        assert_eq!(Pos::from_row_col(1, 2), Pos(6));
        assert!(!Pos(16).is_valid());
    }

    #[test]
    fn test_pos_lines_match_table() {
        for pos in Pos::all() {
            let from_table: Vec<usize> = (0..LINE_COUNT)
                .filter(|&line| LINES[line].contains(&pos))
                .collect();
            let from_pos: Vec<usize> = pos.lines().collect();
            assert_eq!(from_pos, from_table, "lines through {:?}", pos);
        }
    }

    #[test]
    fn test_diagonal_cells_have_three_lines() {
        assert_eq!(Pos::from_row_col(0, 0).lines().count(), 3);
        assert_eq!(Pos::from_row_col(1, 2).lines().count(), 3);
        assert_eq!(Pos::from_row_col(0, 1).lines().count(), 2);
    }

    #[test]
    fn test_piece_size() {
        assert_eq!(piece_size(0), 1);
        assert_eq!(piece_size(3), 4);
        assert_eq!(piece_size(6), 3);
        assert_eq!(piece_size(11), 4);
    }
}
