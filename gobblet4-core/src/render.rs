//! Console rendering of a game state.

use std::fmt;

use crate::notation::piece_label;
use crate::{GameState, Player, Pos, BOARD_SIZE, RESERVE_STACKS};

/// Width of one rendered cell (a piece label).
const CELL_WIDTH: usize = 9;

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.move_number() > 1 {
            writeln!(f, "{}", "=".repeat(15))?;
        }
        writeln!(f, "Move: {}", self.move_number())?;
        writeln!(f)?;

        for player in [Player::One, Player::Two] {
            write!(f, "Player {} Available Off-board Gobblets: ", player.number())?;
            for stack in 0..RESERVE_STACKS {
                if let Some(index) = self.reserve_top(player, stack) {
                    write!(f, "{} ", piece_label(player, index))?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f)?;

        let width = BOARD_SIZE as usize;
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                match self.top_piece(Pos::from_row_col(row, col)) {
                    Some(piece) => write!(f, "{}", piece_label(piece.owner, piece.index))?,
                    None => write!(f, "{}", " ".repeat(CELL_WIDTH))?,
                }
                if col + 1 != BOARD_SIZE {
                    write!(f, "|")?;
                }
            }
            writeln!(f)?;
            if row + 1 != BOARD_SIZE {
                writeln!(f, "{}", "-".repeat(width * CELL_WIDTH + width - 1))?;
            }
        }
        writeln!(f)?;
        writeln!(f)?;

        if !self.is_terminal() {
            write!(f, "Player {}'s turn", self.turn().number())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::play;

    #[test]
    fn test_render_initial() {
        let text = GameState::new().to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Move: 1");
        assert_eq!(
            lines[2],
            "Player 1 Available Off-board Gobblets: P1-G03-S4 P1-G07-S4 P1-G11-S4 "
        );
        assert_eq!(lines[5], "         |         |         |         ");
        assert_eq!(lines[6], "-".repeat(39));
        assert!(text.ends_with("Player 1's turn"));
    }

    #[test]
    fn test_render_after_moves() {
        let mut state = GameState::new();
        play(&mut state, 3, 0, 1);
        play(&mut state, 11, 3, 3);
        let text = state.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "===============");
        assert_eq!(lines[1], "Move: 3");
        assert_eq!(
            lines[4],
            "Player 2 Available Off-board Gobblets: P2-G03-S4 P2-G07-S4 P2-G10-S3 "
        );
        assert_eq!(lines[6], "         |P1-G03-S4|         |         ");
        assert_eq!(lines[12], "         |         |         |P2-G11-S4");
    }

    #[test]
    fn test_render_terminal_has_no_turn_footer() {
        let mut state = GameState::new();
        play(&mut state, 3, 0, 0);
        play(&mut state, 3, 3, 3);
        play(&mut state, 7, 0, 1);
        play(&mut state, 7, 3, 2);
        play(&mut state, 11, 0, 2);
        play(&mut state, 11, 1, 3);
        play(&mut state, 2, 0, 3);
        assert!(!state.to_string().contains("turn"));
    }
}
