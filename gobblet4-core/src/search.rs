//! Iterative-deepening alpha-beta search with a wall-clock budget.
//!
//! The search mutates the caller's `GameState` in place, applying and undoing
//! actions as it walks the tree, and leaves it exactly as it found it.
//!
//! Timer expiry is cooperative: every min/max node checks the
//! `SearchContext` on entry and returns 0 once the budget is spent. The
//! interrupted depth is thrown away and the last fully searched depth wins.
//! Depth 1 evaluates the root's children directly and is always completed,
//! so a search with legal actions always produces a choice.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::eval::{evaluate, WIN_THRESHOLD};
use crate::{Action, GameState, Player};

/// Larger than any evaluation. A side with no legal action scores as the
/// worst outcome for itself (-SCORE_INF at max nodes, +SCORE_INF at min nodes).
pub const SCORE_INF: i32 = 1_000_000;

/// Difficulty preset.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Level {
    Beginner,
    Intermediate,
    Expert,
}

impl Level {
    /// Exclusive bound on the iterative-deepening depth: depths
    /// `1..depth_bound()` are searched.
    #[inline]
    pub fn depth_bound(self) -> u8 {
        match self {
            Level::Beginner => 3,
            Level::Intermediate => 6,
            Level::Expert => 7,
        }
    }
}

/// Per-move cancellation token: a deadline and a latched expiry flag.
#[derive(Debug)]
pub struct SearchContext {
    deadline: Option<Instant>,
    timed_out: bool,
    nodes: u64,
}

impl SearchContext {
    /// Arm the timer for `budget` from now.
    pub fn new(budget: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(budget),
            timed_out: false,
            nodes: 0,
        }
    }

    /// Poll the clock. Once expired, stays expired.
    #[inline]
    pub fn expired(&mut self) -> bool {
        if !self.timed_out && self.deadline.is_some_and(|at| Instant::now() >= at) {
            self.timed_out = true;
        }
        self.timed_out
    }

    /// Whether a poll has observed the deadline. Does not read the clock.
    #[inline]
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Nodes visited so far.
    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }
}

/// Result of one iterative-deepening search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Root actions sharing the best value at the deepest completed depth.
    pub best: Vec<Action>,
    /// That best value.
    pub value: i32,
    /// Deepest completed depth (0 if the mover had no legal actions).
    pub depth: u8,
    /// Nodes visited, including those of a discarded depth.
    pub nodes: u64,
    /// Whether the timer cut the search short.
    pub timed_out: bool,
}

/// Automated player.
pub struct Robot<R = StdRng> {
    player: Player,
    move_time: Duration,
    level: Level,
    rng: R,
}

impl Robot<StdRng> {
    /// Create a robot with an OS-seeded random generator.
    pub fn new(player: Player, move_time: Duration, level: Level) -> Self {
        Self::with_rng(player, move_time, level, StdRng::from_os_rng())
    }

    /// Create a robot whose tie-breaks are reproducible.
    pub fn seeded(player: Player, move_time: Duration, level: Level, seed: u64) -> Self {
        Self::with_rng(player, move_time, level, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Robot<R> {
    pub fn with_rng(player: Player, move_time: Duration, level: Level, rng: R) -> Self {
        Self {
            player,
            move_time,
            level,
            rng,
        }
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Choose an action for the player to move, uniformly among the best.
    ///
    /// Returns None only if the player has no legal action.
    pub fn pick_action(&mut self, state: &mut GameState) -> Option<Action> {
        let outcome = self.search(state);
        if outcome.best.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..outcome.best.len());
        Some(outcome.best[idx])
    }

    /// Run a search bounded by this robot's move time.
    pub fn search(&self, state: &mut GameState) -> SearchOutcome {
        let mut ctx = SearchContext::new(self.move_time);
        self.search_with(state, &mut ctx)
    }

    /// Run a search against an externally armed context.
    pub fn search_with(&self, state: &mut GameState, ctx: &mut SearchContext) -> SearchOutcome {
        debug_assert_eq!(state.turn(), self.player, "robot asked to move out of turn");

        let mut actions = state.available_actions();
        let mut outcome = SearchOutcome {
            best: Vec::new(),
            value: -SCORE_INF,
            depth: 0,
            nodes: 0,
            timed_out: false,
        };
        if actions.is_empty() {
            log::debug!("{:?} has no legal action", self.player);
            return outcome;
        }

        for depth in 1..self.level.depth_bound() {
            let mut scored = Vec::with_capacity(actions.len());
            let mut best_value = i32::MIN;
            let mut best_actions = Vec::new();

            for &action in &actions {
                let reverse = state.apply(action);
                let value = if depth == 1 {
                    ctx.nodes += 1;
                    evaluate(state, self.player)
                } else {
                    self.min_value(state, depth - 1, -SCORE_INF, SCORE_INF, ctx)
                };
                state.undo(reverse);
                scored.push((action, value));

                if value > best_value {
                    best_value = value;
                    best_actions.clear();
                    best_actions.push(action);
                } else if value == best_value {
                    best_actions.push(action);
                }

                if best_value > WIN_THRESHOLD {
                    break;
                }
            }

            if depth > 1 && ctx.timed_out() {
                log::debug!(
                    "timed out during depth {}, keeping depth {} ({} nodes)",
                    depth,
                    outcome.depth,
                    ctx.nodes()
                );
                break;
            }

            log::debug!(
                "depth {} complete: value={} candidates={} nodes={}",
                depth,
                best_value,
                best_actions.len(),
                ctx.nodes()
            );
            outcome.best = best_actions;
            outcome.value = best_value;
            outcome.depth = depth;

            if best_value > WIN_THRESHOLD {
                break;
            }

            // Stable sort: equal values keep their previous relative order.
            scored.sort_by(|a, b| b.1.cmp(&a.1));
            actions = scored.into_iter().map(|(action, _)| action).collect();
        }

        outcome.nodes = ctx.nodes();
        outcome.timed_out = ctx.timed_out();
        outcome
    }

    fn max_value(
        &self,
        state: &mut GameState,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        ctx: &mut SearchContext,
    ) -> i32 {
        if ctx.expired() {
            return 0;
        }
        ctx.nodes += 1;
        if depth == 0 || state.is_terminal() {
            return evaluate(state, self.player);
        }

        let mut value = -SCORE_INF;
        for action in state.available_actions() {
            let reverse = state.apply(action);
            value = value.max(self.min_value(state, depth - 1, alpha, beta, ctx));
            state.undo(reverse);

            if value >= beta {
                return value;
            }
            alpha = alpha.max(value);
        }
        value
    }

    fn min_value(
        &self,
        state: &mut GameState,
        depth: u8,
        alpha: i32,
        mut beta: i32,
        ctx: &mut SearchContext,
    ) -> i32 {
        if ctx.expired() {
            return 0;
        }
        ctx.nodes += 1;
        if depth == 0 || state.is_terminal() {
            return evaluate(state, self.player);
        }

        let mut value = SCORE_INF;
        for action in state.available_actions() {
            let reverse = state.apply(action);
            value = value.min(self.max_value(state, depth - 1, alpha, beta, ctx));
            state.undo(reverse);

            if value <= alpha {
                return value;
            }
            beta = beta.min(value);
        }
        value
    }
}
