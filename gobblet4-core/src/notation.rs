//! Text notation for pieces and actions.
//!
//! ```text
//! Piece:  P<player>-G<index, 2 digits>-S<size>     e.g. P1-G03-S4
//! Action: <piece> to (<row>, <col>)                e.g. P1-G03-S4 to (0, 3)
//! ```
//!
//! Rows and columns are 0-based. Parsing ignores case and whitespace inside
//! the destination.

use thiserror::Error;

use crate::{piece_size, Action, GameState, Player, Pos, BOARD_SIZE, PIECES_PER_PLAYER};

/// Why a typed action was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("expected `<piece> to (<row>, <col>)`, got {0:?}")]
    Format(String),
    #[error("unknown piece {0:?}")]
    Piece(String),
    #[error("{label} belongs to player {owner}")]
    WrongPlayer { label: String, owner: u8 },
    #[error("cell ({row}, {col}) is off the board")]
    OutOfBounds { row: u8, col: u8 },
    #[error("{0} is not a legal move")]
    Illegal(String),
}

/// Label of a piece, e.g. `P2-G07-S4`.
pub fn piece_label(owner: Player, index: u8) -> String {
    format!("P{}-G{:02}-S{}", owner.number(), index, piece_size(index))
}

/// Format an action of the player to move.
pub fn describe(state: &GameState, action: Action) -> String {
    format!(
        "{} to ({}, {})",
        piece_label(state.turn(), action.piece),
        action.to.row(),
        action.to.col()
    )
}

/// Parse an action for the player to move and check that it is legal.
pub fn parse_action(state: &GameState, text: &str) -> Result<Action, NotationError> {
    let format_error = || NotationError::Format(text.trim().to_string());

    let (label, rest) = text.trim().split_once(char::is_whitespace).ok_or_else(format_error)?;
    let rest = rest.trim_start();
    let keyword = rest.get(..2).ok_or_else(format_error)?;
    if !keyword.eq_ignore_ascii_case("to") {
        return Err(format_error());
    }

    let (owner, index) = parse_label(label)?;
    if owner != state.turn() {
        return Err(NotationError::WrongPlayer {
            label: piece_label(owner, index),
            owner: owner.number(),
        });
    }

    let (row, col) = parse_cell(&rest[2..]).ok_or_else(format_error)?;
    if row >= BOARD_SIZE || col >= BOARD_SIZE {
        return Err(NotationError::OutOfBounds { row, col });
    }

    let action = Action {
        piece: index,
        to: Pos::from_row_col(row, col),
    };
    if !state.available_actions().contains(&action) {
        return Err(NotationError::Illegal(describe(state, action)));
    }
    Ok(action)
}

fn parse_label(label: &str) -> Result<(Player, u8), NotationError> {
    let unknown = || NotationError::Piece(label.to_string());
    let upper = label.to_ascii_uppercase();
    let mut parts = upper.split('-');

    let owner = match parts.next() {
        Some("P1") => Player::One,
        Some("P2") => Player::Two,
        _ => return Err(unknown()),
    };
    let index: u8 = parts
        .next()
        .and_then(|part| part.strip_prefix('G'))
        .and_then(|digits| digits.parse().ok())
        .filter(|&index| (index as usize) < PIECES_PER_PLAYER)
        .ok_or_else(unknown)?;
    let size: u8 = parts
        .next()
        .and_then(|part| part.strip_prefix('S'))
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(unknown)?;

    if parts.next().is_some() || size != piece_size(index) {
        return Err(unknown());
    }
    Ok((owner, index))
}

fn parse_cell(text: &str) -> Option<(u8, u8)> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let inner = compact
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(&compact);
    let (row, col) = inner.split_once(',')?;
    Some((row.parse().ok()?, col.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::play;

    #[test]
    fn test_piece_label() {
        assert_eq!(piece_label(Player::One, 3), "P1-G03-S4");
        assert_eq!(piece_label(Player::Two, 10), "P2-G10-S3");
    }

    #[test]
    fn test_describe() {
        let state = GameState::new();
        let action = Action { piece: 7, to: Pos::from_row_col(2, 1) };
        assert_eq!(describe(&state, action), "P1-G07-S4 to (2, 1)");
    }

    #[test]
    fn test_parse_matches_describe_for_initial_actions() {
        let state = GameState::new();
        for action in state.available_actions() {
            let text = describe(&state, action);
            assert_eq!(parse_action(&state, &text), Ok(action), "{}", text);
        }
    }

    #[test]
    fn test_parse_is_lenient_about_case_and_spaces() {
        let state = GameState::new();
        let expected = Action { piece: 11, to: Pos::from_row_col(1, 2) };
        assert_eq!(parse_action(&state, "  p1-g11-s4 TO ( 1 ,2 ) "), Ok(expected));
        assert_eq!(parse_action(&state, "P1-G11-S4 to 1,2"), Ok(expected));
    }

    #[test]
    fn test_parse_errors() {
        let mut state = GameState::new();

        assert!(matches!(parse_action(&state, "P1-G03-S4"), Err(NotationError::Format(_))));
        assert!(matches!(
            parse_action(&state, "P1-G03-S4 onto (0,0)"),
            Err(NotationError::Format(_))
        ));
        assert!(matches!(
            parse_action(&state, "P1-G03-S4 to (0;0)"),
            Err(NotationError::Format(_))
        ));
        assert!(matches!(parse_action(&state, "P1-G03-S2 to (0,0)"), Err(NotationError::Piece(_))));
        assert!(matches!(parse_action(&state, "P3-G03-S4 to (0,0)"), Err(NotationError::Piece(_))));
        assert!(matches!(parse_action(&state, "P1-G12-S1 to (0,0)"), Err(NotationError::Piece(_))));
        assert_eq!(
            parse_action(&state, "P2-G03-S4 to (0,0)"),
            Err(NotationError::WrongPlayer { label: "P2-G03-S4".to_string(), owner: 2 })
        );
        assert_eq!(
            parse_action(&state, "P1-G03-S4 to (4,0)"),
            Err(NotationError::OutOfBounds { row: 4, col: 0 })
        );

        // Buried piece.
        assert_eq!(
            parse_action(&state, "P1-G02-S3 to (0,0)"),
            Err(NotationError::Illegal("P1-G02-S3 to (0, 0)".to_string()))
        );

        // Covering an equal size.
        play(&mut state, 3, 0, 0);
        assert!(matches!(
            parse_action(&state, "P2-G03-S4 to (0,0)"),
            Err(NotationError::Illegal(_))
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = NotationError::OutOfBounds { row: 5, col: 1 };
        assert_eq!(err.to_string(), "cell (5, 1) is off the board");
        let err = NotationError::WrongPlayer { label: "P2-G03-S4".to_string(), owner: 2 };
        assert_eq!(err.to_string(), "P2-G03-S4 belongs to player 2");
    }
}
