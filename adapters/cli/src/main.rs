#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Snake Surge session.
//!
//! Drives the world with a fixed 16 ms frame, feeds frame time through the
//! step accumulator, and steers the snake toward the nearest apple with a
//! simple greedy pilot. Prints the end-of-game summary when the run ends.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use snake_surge_core::{Command, Config, Direction, Event, GridPosition, SessionPhase};
use snake_surge_system_stepper::Stepper;
use snake_surge_world::{apply, query, World};

const FRAME: Duration = Duration::from_millis(16);

/// Runs a deterministic Snake Surge session without a renderer.
#[derive(Debug, Parser)]
#[command(name = "snake-surge", version)]
struct Args {
    /// Seed for the session's random stream; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of frames to simulate before giving up.
    #[arg(long, default_value_t = 60_000)]
    frames: u32,
    /// Optional TOML file overriding the default tuning.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => Config::default(),
    };

    let mut world = World::new(config, seed).context("constructing session")?;
    let mut stepper = Stepper::new();
    let mut events: Vec<Event> = Vec::new();
    let mut commands: Vec<Command> = Vec::new();

    println!("snake-surge: seed {seed}");

    let mut frame = 0;
    while query::phase(&world) == SessionPhase::Running && frame < args.frames {
        if let Some(direction) = pilot_heading(&world) {
            apply(&mut world, Command::SetDirection { direction }, &mut events);
        }
        if query::held_power_up(&world).is_some() {
            apply(&mut world, Command::UsePowerUp, &mut events);
        }

        events.clear();
        apply(&mut world, Command::Tick { dt: FRAME }, &mut events);

        commands.clear();
        stepper.handle(&events, query::steps_per_second(&world), &mut commands);
        for command in commands.drain(..) {
            apply(&mut world, command, &mut events);
        }
        frame += 1;
    }

    match query::summary(&world) {
        Some(summary) => {
            println!(
                "session over after {:.1}s: {}",
                summary.elapsed.as_secs_f32(),
                summary.reason
            );
            println!(
                "score {} (max multiplier x{}), length {}, {} world events",
                summary.score, summary.max_multiplier, summary.final_length, summary.events_triggered
            );
        }
        None => println!("frame budget exhausted after {frame} frames"),
    }
    Ok(())
}

/// Greedy heading toward the nearest apple, preferring the longer axis.
///
/// Reversals are filtered by the world, so the pilot only has to avoid
/// proposing the axis it is already on when the gap there is zero.
fn pilot_heading(world: &World) -> Option<Direction> {
    let head = *query::snake_segments(world).first()?;
    let target = nearest_apple(world, head)?;
    let dx = target.x() - head.x();
    let dy = target.y() - head.y();
    if dx.abs() >= dy.abs() && dx != 0 {
        Some(if dx > 0 { Direction::East } else { Direction::West })
    } else if dy != 0 {
        Some(if dy > 0 { Direction::South } else { Direction::North })
    } else {
        None
    }
}

fn nearest_apple(world: &World, head: GridPosition) -> Option<GridPosition> {
    query::apples(world)
        .into_iter()
        .map(|apple| apple.position)
        .min_by_key(|position| {
            let dx = (position.x() - head.x()).abs();
            let dy = (position.y() - head.y()).abs();
            dx + dy
        })
}
