//! Static evaluation of a position from one player's point of view.

use crate::{GameState, Player, LINES};

/// Value of a line indexed by `[own pieces][opponent pieces]` on top.
///
/// Open lines grow with the number of own pieces, a complete line is worth
/// 1000, and a line both players show pieces on is dead.
pub const LINE_VALUES: [[i32; 5]; 5] = [
    [0, -1, -2, -3, -1000],
    [1, 0, -1, -2, 0],
    [2, 1, 0, -1, 0],
    [3, 2, 1, 0, 0],
    [1000, 0, 0, 0, 0],
];

/// Any evaluation above this contains a completed line.
pub const WIN_THRESHOLD: i32 = 900;

/// Sum of `LINE_VALUES` over the 10 lines.
pub fn evaluate(state: &GameState, perspective: Player) -> i32 {
    let mut sum = 0;
    for cells in &LINES {
        let mut own = 0;
        let mut other = 0;
        for &pos in cells {
            match state.top_owner(pos) {
                Some(owner) if owner == perspective => own += 1,
                Some(_) => other += 1,
                None => {}
            }
        }
        sum += LINE_VALUES[own][other];
    }
    sum
}
