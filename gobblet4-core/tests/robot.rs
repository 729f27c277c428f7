//! Robot behaviour through the public API.

use std::collections::HashSet;
use std::time::Duration;

use gobblet4_core::{
    parse_action, Action, Controller, GameState, Level, Player, Pos, Robot, LINES,
};

fn setup(moves: &[&str]) -> GameState {
    let mut state = GameState::new();
    for text in moves {
        let action = parse_action(&state, text).unwrap();
        state.apply(action);
    }
    state
}

/// Player One shows (0,0), (0,1), (0,2) and moves next; (0,3) is empty.
fn one_move_from_win() -> GameState {
    setup(&[
        "P1-G03-S4 to (0, 0)",
        "P2-G03-S4 to (3, 3)",
        "P1-G07-S4 to (0, 1)",
        "P2-G07-S4 to (3, 2)",
        "P1-G11-S4 to (0, 2)",
        "P2-G11-S4 to (1, 3)",
    ])
}

#[test]
fn test_forced_win_at_every_level() {
    for level in [Level::Beginner, Level::Intermediate, Level::Expert] {
        for seed in 0..5 {
            let mut state = one_move_from_win();
            let mut robot = Robot::seeded(Player::One, Duration::from_secs(60), level, seed);
            let action = robot.pick_action(&mut state).unwrap();

            assert_eq!(action.to, Pos::from_row_col(0, 3), "{:?}", level);
            state.apply(action);
            assert_eq!(state.winner(), Some(Player::One));
        }
    }
}

#[test]
fn test_tiny_budget_returns_legal_action() {
    let mut state = setup(&["P1-G03-S4 to (1, 1)", "P2-G03-S4 to (2, 2)"]);
    let before = state.clone();
    let mut robot = Robot::seeded(Player::One, Duration::from_nanos(1), Level::Expert, 9);

    let action = robot.pick_action(&mut state).unwrap();
    assert!(state.available_actions().contains(&action));
    assert_eq!(state, before);
}

#[test]
fn test_robot_game_keeps_invariants() {
    let mut state = GameState::new();
    let mut robots: [Box<dyn Controller>; 2] = [
        Box::new(Robot::seeded(Player::One, Duration::from_secs(30), Level::Beginner, 11)),
        Box::new(Robot::seeded(Player::Two, Duration::from_secs(30), Level::Beginner, 12)),
    ];
    let mut seen = HashSet::new();

    for _ in 0..200 {
        if state.is_terminal() || !seen.insert(state.fingerprint()) {
            break;
        }
        let mover = state.turn();
        let action = robots[mover.index()].pick_action(&mut state).unwrap();
        assert!(state.available_actions().contains(&action));
        state.apply(action);

        for (line, cells) in LINES.iter().enumerate() {
            let expected: i8 = cells
                .iter()
                .map(|&pos| Player::sign_of(state.top_owner(pos)))
                .sum();
            assert_eq!(state.line_score(line), expected);
        }
    }
}

#[test]
fn test_action_json() {
    let action = Action {
        piece: 7,
        to: Pos::from_row_col(2, 3),
    };
    let json = serde_json::to_string(&action).unwrap();
    assert_eq!(json, r#"{"piece":7,"to":11}"#);
    let back: Action = serde_json::from_str(&json).unwrap();
    assert_eq!(back, action);
}
