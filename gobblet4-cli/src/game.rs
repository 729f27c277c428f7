//! Turn loop: alternate controllers until a line is completed, a position
//! repeats, or the player stops the game.

use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use gobblet4_core::{describe, Action, Controller, GameState, Player};

/// How a game ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    /// The player completed a line.
    Win(Player),
    /// A position repeated with the same player to move.
    Draw,
    /// The player to move had no legal action and loses.
    NoMoves(Player),
    /// Ctrl-C, or a controller gave up (e.g. end of input).
    Interrupted,
}

/// Final result and every action played, in order.
#[derive(Debug)]
pub struct GameReport {
    pub outcome: Outcome,
    pub history: Vec<Action>,
}

pub struct Game {
    controllers: [Box<dyn Controller>; 2],
    state: GameState,
    /// Fingerprints of every position a controller has been asked to move in.
    seen: HashSet<u64>,
    history: Vec<Action>,
}

impl Game {
    pub fn new(controllers: [Box<dyn Controller>; 2]) -> Self {
        Self {
            controllers,
            state: GameState::new(),
            seen: HashSet::new(),
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Play until the game ends, printing each position to `out`.
    pub fn run<W: Write>(&mut self, running: &AtomicBool, out: &mut W) -> io::Result<GameReport> {
        let outcome = self.play(running, out)?;

        match outcome {
            Outcome::Win(player) => {
                writeln!(out, "{}", self.state)?;
                writeln!(out, "Player {} won!", player.number())?
            }
            Outcome::Draw => writeln!(out, "Game state repeated. Game is a draw!")?,
            Outcome::NoMoves(player) => writeln!(
                out,
                "Player {} has no legal move. Player {} won!",
                player.number(),
                player.opponent().number()
            )?,
            Outcome::Interrupted => writeln!(out, "Game stopped.")?,
        }

        Ok(GameReport {
            outcome,
            history: std::mem::take(&mut self.history),
        })
    }

    fn play<W: Write>(&mut self, running: &AtomicBool, out: &mut W) -> io::Result<Outcome> {
        loop {
            if let Some(winner) = self.state.winner() {
                return Ok(Outcome::Win(winner));
            }
            if !running.load(Ordering::SeqCst) {
                return Ok(Outcome::Interrupted);
            }

            writeln!(out, "{}", self.state)?;
            if !self.seen.insert(self.state.fingerprint()) {
                return Ok(Outcome::Draw);
            }

            let mover = self.state.turn();
            let start = Instant::now();
            let Some(action) = self.controllers[mover.index()].pick_action(&mut self.state) else {
                if self.state.available_actions().is_empty() {
                    return Ok(Outcome::NoMoves(mover));
                }
                return Ok(Outcome::Interrupted);
            };
            log::info!(
                "move {} picked in {:.2}s",
                self.state.move_number(),
                start.elapsed().as_secs_f64()
            );

            writeln!(out, "\nPlayer {} plays {}", mover.number(), describe(&self.state, action))?;
            self.history.push(action);
            self.state.apply(action);
        }
    }
}
