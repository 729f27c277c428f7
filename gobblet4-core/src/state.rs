//! Board, reserves and line scores, mutated in place with exact undo.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh64::xxh64;

use crate::{
    piece_size, Location, PieceRef, Player, Pos, CELLS, LINES, LINE_COUNT, PIECES_PER_PLAYER,
    PIECES_PER_STACK, RESERVE_STACKS,
};

/// A move: one of the mover's exposed pieces lands on `to`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Action {
    /// Piece index (0-11) of the player to move.
    pub piece: u8,
    /// Destination cell.
    pub to: Pos,
}

/// Bookkeeping needed to take back an applied action.
///
/// `from` is the piece's location before the action. A `Reserve` location
/// sends the piece back onto its reserve stack, which never happens in play.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Reverse {
    pub piece: u8,
    pub from: Location,
}

/// Full description of one piece.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub owner: Player,
    pub index: u8,
    pub size: u8,
    pub location: Location,
}

/// Fixed-capacity LIFO of piece references (no heap allocation).
///
/// Slots above `len` are always `None`, so derived equality only sees live
/// pieces.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
struct Stack {
    items: [Option<PieceRef>; PIECES_PER_STACK],
    len: u8,
}

impl Stack {
    #[inline]
    fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    fn top(&self) -> Option<PieceRef> {
        self.len.checked_sub(1).and_then(|i| self.items[i as usize])
    }

    #[inline]
    fn push(&mut self, piece: PieceRef) {
        debug_assert!(self.len() < PIECES_PER_STACK, "stack overflow");
        self.items[self.len as usize] = Some(piece);
        self.len += 1;
    }

    #[inline]
    fn pop(&mut self) -> Option<PieceRef> {
        let top = self.top()?;
        self.len -= 1;
        self.items[self.len as usize] = None;
        Some(top)
    }
}

/// Complete game state: piece ledger, board stacks, reserve stacks, line
/// scores and turn.
///
/// The line scores are maintained incrementally by `apply` and `undo`;
/// `scores[line]` always equals the sum of `sign(top owner)` over that line.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct GameState {
    locations: [[Location; PIECES_PER_PLAYER]; 2],
    reserves: [[Stack; RESERVE_STACKS]; 2],
    cells: [Stack; CELLS],
    scores: [i8; LINE_COUNT],
    turn: Player,
    move_number: u32,
}

impl GameState {
    /// Create the initial position with Player One to move.
    pub fn new() -> GameState {
        let mut locations = [[Location::Reserve { stack: 0, depth: 0 }; PIECES_PER_PLAYER]; 2];
        let mut reserves = [[Stack::default(); RESERVE_STACKS]; 2];

        for owner in [Player::One, Player::Two] {
            for index in 0..PIECES_PER_PLAYER as u8 {
                let stack = index / PIECES_PER_STACK as u8;
                let depth = index % PIECES_PER_STACK as u8;
                reserves[owner.index()][stack as usize].push(PieceRef { owner, index });
                locations[owner.index()][index as usize] = Location::Reserve { stack, depth };
            }
        }

        GameState {
            locations,
            reserves,
            cells: [Stack::default(); CELLS],
            scores: [0; LINE_COUNT],
            turn: Player::One,
            move_number: 1,
        }
    }

    /// Player to move.
    #[inline]
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Move counter, starting at 1.
    #[inline]
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    /// Current location of a piece.
    #[inline]
    pub fn location(&self, owner: Player, index: u8) -> Location {
        self.locations[owner.index()][index as usize]
    }

    /// Get a full description of a piece.
    pub fn piece(&self, owner: Player, index: u8) -> Piece {
        Piece {
            owner,
            index,
            size: piece_size(index),
            location: self.location(owner, index),
        }
    }

    /// Get the top (visible) piece at a position.
    #[inline]
    pub fn top_piece(&self, pos: Pos) -> Option<PieceRef> {
        self.cells[pos.0 as usize].top()
    }

    /// Owner of the top piece at a position, or None if the cell is empty.
    #[inline]
    pub fn top_owner(&self, pos: Pos) -> Option<Player> {
        self.top_piece(pos).map(|piece| piece.owner)
    }

    /// Number of pieces stacked at a position.
    #[inline]
    pub fn stack_height(&self, pos: Pos) -> usize {
        self.cells[pos.0 as usize].len()
    }

    /// Index of the exposed piece on a reserve stack, if any remain.
    #[inline]
    pub fn reserve_top(&self, owner: Player, stack: usize) -> Option<u8> {
        self.reserves[owner.index()][stack].top().map(|piece| piece.index)
    }

    /// Incrementally maintained score of one line.
    #[inline]
    pub fn line_score(&self, line: usize) -> i8 {
        self.scores[line]
    }

    /// All 10 line scores.
    #[inline]
    pub fn line_scores(&self) -> &[i8; LINE_COUNT] {
        &self.scores
    }

    /// Count the cells of a line whose top piece belongs to `player`.
    pub fn count_in_line(&self, line: usize, player: Player) -> u8 {
        LINES[line]
            .iter()
            .filter(|&&pos| self.top_owner(pos) == Some(player))
            .count() as u8
    }

    // ========== Move Generation ==========

    /// Check if a piece may move: top of its reserve stack or of its cell.
    pub fn is_exposed(&self, owner: Player, index: u8) -> bool {
        let piece = PieceRef { owner, index };
        match self.location(owner, index) {
            Location::Reserve { stack, depth } => {
                self.reserves[owner.index()][stack as usize].len() == depth as usize + 1
            }
            Location::Board { pos, .. } => self.top_piece(pos) == Some(piece),
        }
    }

    /// Check if the opponent of the player to move shows exactly 3 pieces on
    /// some line through `pos`.
    fn opponent_threatens(&self, pos: Pos) -> bool {
        let opponent = self.turn.opponent();
        pos.lines()
            .any(|line| self.count_in_line(line, opponent) == 3)
    }

    /// Generate all legal actions for the player to move.
    ///
    /// Actions are ordered by piece index, then destination. A piece may land
    /// on an empty cell or cover a strictly smaller piece. A piece that is
    /// still in reserve may only cover a piece on a cell that lies on a line
    /// where the opponent shows exactly 3 pieces.
    pub fn available_actions(&self) -> Vec<Action> {
        let player = self.turn;
        let mut actions = Vec::with_capacity(64);

        for index in 0..PIECES_PER_PLAYER as u8 {
            if !self.is_exposed(player, index) {
                continue;
            }
            let size = piece_size(index);
            let from_reserve = self.location(player, index).is_reserve();

            for to in Pos::all() {
                if let Some(top) = self.top_piece(to) {
                    if piece_size(top.index) >= size {
                        continue;
                    }
                    if from_reserve && !self.opponent_threatens(to) {
                        continue;
                    }
                }
                actions.push(Action { piece: index, to });
            }
        }

        actions
    }

    // ========== Apply & Undo ==========

    /// Describe how to take back `action` from the current position.
    ///
    /// Must be called before the action is applied.
    #[inline]
    pub fn reverse_of(&self, action: Action) -> Reverse {
        Reverse {
            piece: action.piece,
            from: self.location(self.turn, action.piece),
        }
    }

    /// Apply an action, returning the information needed to undo it.
    ///
    /// The action must come from `available_actions()`. Mutates the state in
    /// place, switches the player and advances the move counter.
    pub fn apply(&mut self, action: Action) -> Reverse {
        let player = self.turn;
        debug_assert!(self.is_exposed(player, action.piece), "piece is not exposed");
        debug_assert!(
            self.top_piece(action.to)
                .map_or(true, |top| piece_size(top.index) < piece_size(action.piece)),
            "destination is not coverable"
        );

        let reverse = self.reverse_of(action);
        let piece = PieceRef { owner: player, index: action.piece };
        self.lift(piece);
        self.land(piece, action.to);
        self.turn = player.opponent();
        self.move_number += 1;
        reverse
    }

    /// Undo the most recently applied action.
    ///
    /// `reverse` must be the value returned by (or `reverse_of` computed for)
    /// that action, and no other action may have been applied since.
    pub fn undo(&mut self, reverse: Reverse) {
        let player = self.turn.opponent();
        self.turn = player;
        self.move_number -= 1;

        let piece = PieceRef { owner: player, index: reverse.piece };
        debug_assert!(
            !self.location(player, reverse.piece).is_reserve(),
            "undo of a piece that is not on the board"
        );
        self.lift(piece);

        match reverse.from {
            Location::Reserve { stack, depth } => {
                let reserve = &mut self.reserves[player.index()][stack as usize];
                debug_assert_eq!(reserve.len(), depth as usize);
                reserve.push(piece);
                self.locations[player.index()][reverse.piece as usize] =
                    Location::Reserve { stack, depth };
            }
            Location::Board { pos, .. } => self.land(piece, pos),
        }
    }

    /// Remove an exposed piece from wherever it sits.
    fn lift(&mut self, piece: PieceRef) {
        match self.location(piece.owner, piece.index) {
            Location::Reserve { stack, .. } => {
                self.reserves[piece.owner.index()][stack as usize].pop();
            }
            Location::Board { pos, .. } => {
                self.cells[pos.0 as usize].pop();
                let revealed = self.top_owner(pos);
                self.retop(pos, Some(piece.owner), revealed);
            }
        }
    }

    /// Push a piece onto a board cell.
    fn land(&mut self, piece: PieceRef, to: Pos) {
        let covered = self.top_owner(to);
        self.retop(to, covered, Some(piece.owner));
        let depth = self.cells[to.0 as usize].len() as u8;
        self.cells[to.0 as usize].push(piece);
        self.locations[piece.owner.index()][piece.index as usize] =
            Location::Board { pos: to, depth };
    }

    /// Update line scores for a cell whose top owner changed.
    #[inline]
    fn retop(&mut self, pos: Pos, old: Option<Player>, new: Option<Player>) {
        let delta = Player::sign_of(new) - Player::sign_of(old);
        if delta == 0 {
            return;
        }
        for line in pos.lines() {
            self.scores[line] += delta;
        }
    }

    // ========== Win Detection ==========

    /// Signed score of the line with the largest magnitude (first in scan
    /// order on ties). +4 means Player One has won, -4 Player Two.
    pub fn max_score(&self) -> i8 {
        let mut max = 0i8;
        for &score in &self.scores {
            if score.abs() > max.abs() {
                max = score;
            }
        }
        max
    }

    /// Check if some line is complete for one player.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.scores.iter().any(|score| score.abs() == 4)
    }

    /// The winning player, if the game is over.
    pub fn winner(&self) -> Option<Player> {
        match self.max_score() {
            4 => Some(Player::One),
            -4 => Some(Player::Two),
            _ => None,
        }
    }

    // ========== Fingerprint ==========

    /// Hash of the player to move and every piece location.
    ///
    /// The move counter is excluded, so the same arrangement reached by
    /// different move orders has the same fingerprint.
    pub fn fingerprint(&self) -> u64 {
        let mut bytes = [0u8; 1 + 2 * PIECES_PER_PLAYER * 3];
        bytes[0] = self.turn as u8;
        let mut i = 1;
        for owner_locations in &self.locations {
            for location in owner_locations {
                let encoded = match *location {
                    Location::Reserve { stack, depth } => [0, stack, depth],
                    Location::Board { pos, depth } => [1, pos.0, depth],
                };
                bytes[i..i + 3].copy_from_slice(&encoded);
                i += 3;
            }
        }
        xxh64(&bytes, 0)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
