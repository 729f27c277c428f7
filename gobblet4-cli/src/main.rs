//! 4x4 Gobblet
//!
//! Plays a game on the console between any mix of humans and robots.

mod game;
mod human;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use gobblet4_core::{Controller, Level, Player, Robot};

use crate::game::Game;
use crate::human::Human;

/// Who controls each side.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Rule {
    HumanHuman,
    HumanRobot,
    RobotHuman,
    RobotRobot,
}

impl Rule {
    /// Whether Player One and Player Two are human.
    fn humans(self) -> [bool; 2] {
        match self {
            Rule::HumanHuman => [true, true],
            Rule::HumanRobot => [true, false],
            Rule::RobotHuman => [false, true],
            Rule::RobotRobot => [false, false],
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "gobblet4", about = "Play 4x4 Gobblet against a human or a robot")]
struct Args {
    /// Which players are humans
    #[arg(long, value_enum, default_value_t = Rule::HumanRobot)]
    rule: Rule,

    /// Robot search strength
    #[arg(long, value_enum, default_value_t = Level::Beginner)]
    level: Level,

    /// Seconds a robot may think per move
    #[arg(long, default_value_t = 30.0)]
    move_time: f64,

    /// Seed for robot tie-breaking (each robot offsets it by its player index)
    #[arg(long)]
    seed: Option<u64>,

    /// Print the move history as JSON when the game ends
    #[arg(long)]
    history_json: bool,
}

fn controller(player: Player, human: bool, args: &Args, move_time: Duration) -> Box<dyn Controller> {
    if human {
        return Box::new(Human::console());
    }
    match args.seed {
        Some(seed) => Box::new(Robot::seeded(
            player,
            move_time,
            args.level,
            seed.wrapping_add(player.index() as u64),
        )),
        None => Box::new(Robot::new(player, move_time, args.level)),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let move_time = Duration::try_from_secs_f64(args.move_time)
        .with_context(|| format!("invalid --move-time {}", args.move_time))?;

    println!("4x4 Gobblet");
    println!("===========");
    println!("Rule: {:?}", args.rule);
    println!("Level: {:?}, move time: {:.1}s", args.level, move_time.as_secs_f64());
    println!();

    // Stop between turns on Ctrl-C
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        println!("\n\nInterrupt received, stopping after this move...");
        r.store(false, Ordering::SeqCst);
    })
    .context("Error setting Ctrl-C handler")?;

    let [one, two] = args.rule.humans();
    let mut game = Game::new([
        controller(Player::One, one, &args, move_time),
        controller(Player::Two, two, &args, move_time),
    ]);

    let start = Instant::now();
    let report = game
        .run(&running, &mut io::stdout())
        .context("failed to write game output")?;
    log::info!(
        "game over after {} moves in {:.2}s: {:?}",
        report.history.len(),
        start.elapsed().as_secs_f64(),
        report.outcome
    );

    if args.history_json {
        let json = serde_json::to_string(&report.history).context("failed to encode history")?;
        println!("{}", json);
    }
    Ok(())
}
