//! Move selection strategy shared by human and automated players.

use rand::Rng;

use crate::{Action, GameState, Robot};

/// Something that chooses the next action for the player to move.
pub trait Controller {
    /// Pick one of `state.available_actions()`.
    ///
    /// Implementations may mutate `state` while deciding but must restore it
    /// before returning. Returns None if no action can be chosen.
    fn pick_action(&mut self, state: &mut GameState) -> Option<Action>;
}

impl<R: Rng> Controller for Robot<R> {
    fn pick_action(&mut self, state: &mut GameState) -> Option<Action> {
        Robot::pick_action(self, state)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{Level, Player};

    #[test]
    fn test_robot_as_dyn_controller() {
        let mut controllers: Vec<Box<dyn Controller>> = vec![
            Box::new(Robot::seeded(Player::One, Duration::from_secs(30), Level::Beginner, 5)),
            Box::new(Robot::seeded(Player::Two, Duration::from_secs(30), Level::Beginner, 6)),
        ];

        let mut state = GameState::new();
        for turn in 0..4 {
            let action = controllers[turn % 2].pick_action(&mut state).unwrap();
            assert!(state.available_actions().contains(&action));
            state.apply(action);
        }
        assert_eq!(state.move_number(), 5);
    }
}
