#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for a Snake Surge session.
//!
//! A [`World`] owns every mutable piece of a run: the snake agent, the entity
//! collections, the single random stream, and the event director. Adapters
//! mutate it exclusively through [`apply`] and observe it through the
//! read-only [`query`] functions; the fixed-step accumulator that decides how
//! many [`Command::Step`]s a frame earns lives outside this crate.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use snake_surge_core::{
    AppleKind, CellKey, Command, Config, ConfigError, EndReason, Event, GameOverSummary,
    GridPosition, GridSize, PowerUp, SessionPhase, WorldEvent,
};

use crate::director::Director;
use crate::entities::{Meteor, Portal};
use crate::rng::SessionRng;
use crate::snake::{CollisionKind, Snake};

mod director;
mod entities;
mod rng;
mod snake;

const INITIAL_APPLE_COUNT: usize = 3;
const APPLE_TARGET_MIN: i32 = 3;
const APPLE_TARGET_MAX: i32 = 5;
const GOLDEN_ROLL_THRESHOLD: f32 = 0.88;
const ROTTEN_ROLL_THRESHOLD: f32 = 0.12;
const SPAWN_ATTEMPT_BUDGET: u32 = 2_000;

const OBSTACLE_TOPUP_CHANCE: f32 = 0.2;
const PORTAL_RESHUFFLE_CHANCE: f32 = 0.03;

const POWER_UP_BASE_CHANCE: f32 = 0.18;
const POWER_UP_CHANCE_PER_MULTIPLIER: f32 = 0.02;

const INVERT_DURATION_SECONDS: f32 = 6.0;
const FOG_DURATION_SECONDS: f32 = 8.0;
const TIME_SHIFT_DELTA: f32 = 3.0;
const TIME_SHIFT_REVERT_SECONDS: f32 = 6.0;
const METEOR_COUNT_MIN: i32 = 6;
const METEOR_COUNT_MAX: i32 = 12;
const METEOR_TTL_MIN: i32 = 4;
const METEOR_TTL_MAX: i32 = 8;
const BLOOM_COUNT_MIN: i32 = 3;
const BLOOM_COUNT_MAX: i32 = 6;

/// Roster the director picks from; one entry per world event family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EventChoice {
    InvertControls,
    Fog,
    MeteorShower,
    TimeShift,
    PortalShuffle,
    AppleBloom,
}

const EVENT_ROSTER: [EventChoice; 6] = [
    EventChoice::InvertControls,
    EventChoice::Fog,
    EventChoice::MeteorShower,
    EventChoice::TimeShift,
    EventChoice::PortalShuffle,
    EventChoice::AppleBloom,
];

/// Represents one complete simulation session.
#[derive(Debug)]
pub struct World {
    config: Config,
    size: GridSize,
    rng: SessionRng,
    snake: Snake,
    apples: BTreeMap<CellKey, AppleKind>,
    obstacles: BTreeSet<CellKey>,
    portal: Option<Portal>,
    meteors: Vec<Meteor>,
    director: Director,
    phase: SessionPhase,
    score: u32,
    multiplier: u32,
    max_multiplier: u32,
    combo_timer: f32,
    steps_per_second: f32,
    power_up: Option<PowerUp>,
    elapsed: f32,
    summary: Option<GameOverSummary>,
}

impl World {
    /// Builds a session from a validated configuration and a seed.
    ///
    /// Fails fast on misconfiguration; nothing is clamped silently. The seed
    /// fixes every random decision of the run, so two sessions constructed
    /// with the same configuration and seed replay identically under the
    /// same command stream.
    pub fn new(config: Config, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let size = config.grid_size();
        let mut rng = SessionRng::seeded(seed);
        let initial_cooldown = rng.range(
            config.event_cooldown_min_seconds,
            config.event_cooldown_max_seconds,
        );
        let mut world = Self {
            snake: Snake::new(size, config.initial_length, config.initial_hunger),
            apples: BTreeMap::new(),
            obstacles: BTreeSet::new(),
            portal: None,
            meteors: Vec::new(),
            director: Director::new(initial_cooldown),
            phase: SessionPhase::Running,
            score: 0,
            multiplier: 1,
            max_multiplier: 1,
            combo_timer: 0.0,
            steps_per_second: config.base_steps_per_second,
            power_up: None,
            elapsed: 0.0,
            summary: None,
            config,
            size,
            rng,
        };

        let initial_obstacles =
            (size.cell_count() as f32 * world.config.obstacle_density).floor() as usize;
        for _ in 0..initial_obstacles {
            world.spawn_obstacle();
        }
        for _ in 0..INITIAL_APPLE_COUNT {
            world.spawn_apple();
        }
        world.reshuffle_portal();

        Ok(world)
    }

    fn update_continuous(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        self.elapsed += dt;

        self.snake
            .apply_hunger_drain(dt, self.config.hunger_drain_per_second);

        if self.combo_timer > 0.0 {
            self.combo_timer -= dt;
        }
        if self.combo_timer <= 0.0 {
            self.multiplier = 1;
        }

        let wake = self.director.advance(dt);
        for delta in wake.rate_reverts {
            self.shift_step_rate(delta);
        }
        if wake.invert_expired {
            self.snake.set_invert(false);
        }
        if wake.fire_event {
            self.fire_world_event(out_events);
            let next = self.rng.range(
                self.config.event_cooldown_min_seconds,
                self.config.event_cooldown_max_seconds,
            );
            self.director.set_cooldown(next);
        }

        if !self.snake.alive() {
            self.finish(EndReason::Starvation, out_events);
        }
    }

    /// One discrete simulation step. The stage order is load-bearing:
    /// movement, teleport, hazard decay, meteor collision, wall/self
    /// collision, consumption, obstacle top-up, portal reshuffle.
    fn step_once(&mut self, out_events: &mut Vec<Event>) {
        self.snake.advance_step(self.size);

        if let Some(portal) = self.portal {
            if self.snake.teleport_cooldown() == 0 {
                let entry = self.snake.head();
                if let Some(destination) = portal.other_end(entry) {
                    self.snake.relocate_head(destination);
                    self.snake
                        .arm_teleport_cooldown(self.config.portal_cooldown_steps);
                    out_events.push(Event::Teleported {
                        from: entry,
                        to: destination,
                    });
                }
            }
        }

        for meteor in &mut self.meteors {
            meteor.ttl -= 1;
        }
        self.meteors.retain(|meteor| meteor.ttl > 0);

        let head = self.snake.head();
        if self.meteors.iter().any(|meteor| meteor.position == head) {
            self.snake.kill();
            self.finish(EndReason::MeteorStrike, out_events);
            return;
        }

        if let Some(kind) = self.snake.collide(&self.obstacles, self.size) {
            let reason = match kind {
                CollisionKind::Obstacle => EndReason::ObstacleCollision,
                CollisionKind::Body => EndReason::SelfCollision,
            };
            self.finish(reason, out_events);
            return;
        }

        let head_key = CellKey::encode(head, self.size);
        if let Some(kind) = self.apples.remove(&head_key) {
            self.consume_apple(head, kind, out_events);
            if !self.snake.alive() {
                self.finish(EndReason::FatalShrink, out_events);
                return;
            }
        }

        let target_obstacles = (self.size.cell_count() as f32
            * (self.config.obstacle_density
                + self.score as f32 * self.config.extra_obstacle_per_score))
            .floor() as usize;
        if self.obstacles.len() < target_obstacles && self.rng.chance(OBSTACLE_TOPUP_CHANCE) {
            self.spawn_obstacle();
        }

        if self.rng.chance(PORTAL_RESHUFFLE_CHANCE) {
            self.reshuffle_portal();
        }
    }

    fn consume_apple(
        &mut self,
        position: GridPosition,
        kind: AppleKind,
        out_events: &mut Vec<Event>,
    ) {
        self.snake.grow(kind.growth());

        let combo_active = self.combo_timer > 0.0;
        self.multiplier = if combo_active {
            (self.multiplier + 1).min(self.config.multiplier_cap)
        } else {
            1
        };
        self.max_multiplier = self.max_multiplier.max(self.multiplier);
        let points = (kind.score_value() * self.multiplier as i32).max(0) as u32;
        self.score += points;
        self.combo_timer = self.config.combo_window_seconds;

        if kind != AppleKind::Rotten {
            self.snake.apply_refill(self.config.hunger_refill_on_eat);
        }
        self.shift_step_rate(kind.step_rate_shift());

        if self.power_up.is_none() {
            let chance =
                POWER_UP_BASE_CHANCE + POWER_UP_CHANCE_PER_MULTIPLIER * self.multiplier as f32;
            if self.rng.chance(chance) {
                self.power_up = Some(PowerUp::Ghost);
                out_events.push(Event::PowerUpGranted {
                    power: PowerUp::Ghost,
                });
            }
        }

        out_events.push(Event::AppleEaten {
            position,
            kind,
            points,
            multiplier: self.multiplier,
        });

        let target = self.rng.int(APPLE_TARGET_MIN, APPLE_TARGET_MAX) as usize;
        while self.apples.len() < target {
            self.spawn_apple();
        }
    }

    fn fire_world_event(&mut self, out_events: &mut Vec<Event>) {
        let choice = self.rng.pick(&EVENT_ROSTER).copied();
        let Some(choice) = choice else {
            return;
        };
        let fired = match choice {
            EventChoice::InvertControls => {
                self.snake.set_invert(true);
                self.director.schedule_invert(INVERT_DURATION_SECONDS);
                WorldEvent::InvertControls
            }
            EventChoice::Fog => {
                self.director.schedule_fog(FOG_DURATION_SECONDS);
                WorldEvent::Fog
            }
            EventChoice::MeteorShower => {
                let count = self.rng.int(METEOR_COUNT_MIN, METEOR_COUNT_MAX);
                for _ in 0..count {
                    let cell = self.random_empty_cell();
                    let ttl = self.rng.int(METEOR_TTL_MIN, METEOR_TTL_MAX) as u32;
                    self.meteors.push(Meteor::new(cell, ttl));
                }
                WorldEvent::MeteorShower
            }
            EventChoice::TimeShift => {
                let surge = self.rng.chance(0.5);
                let delta = if surge {
                    TIME_SHIFT_DELTA
                } else {
                    -TIME_SHIFT_DELTA
                };
                self.shift_step_rate(delta);
                self.director
                    .schedule_rate_revert(-delta, TIME_SHIFT_REVERT_SECONDS);
                WorldEvent::TimeShift { surge }
            }
            EventChoice::PortalShuffle => {
                self.reshuffle_portal();
                WorldEvent::PortalShuffle
            }
            EventChoice::AppleBloom => {
                let count = self.rng.int(BLOOM_COUNT_MIN, BLOOM_COUNT_MAX);
                for _ in 0..count {
                    self.spawn_apple();
                }
                WorldEvent::AppleBloom
            }
        };
        self.director.note_fired();
        out_events.push(Event::WorldEventFired { event: fired });
    }

    fn shift_step_rate(&mut self, delta: f32) {
        self.steps_per_second = (self.steps_per_second + delta).clamp(
            self.config.min_steps_per_second,
            self.config.max_steps_per_second,
        );
    }

    fn can_place(&self, position: GridPosition) -> bool {
        let key = CellKey::encode(position, self.size);
        if self.obstacles.contains(&key) || self.apples.contains_key(&key) {
            return false;
        }
        if self.snake.occupies(position) {
            return false;
        }
        if let Some(portal) = &self.portal {
            if portal.covers(position) {
                return false;
            }
        }
        true
    }

    /// Rejection-sampled empty cell. After the attempt budget is exhausted
    /// the last draw is accepted regardless, so a crowded board degrades to
    /// best-effort placement instead of stalling the session.
    fn random_empty_cell(&mut self) -> GridPosition {
        let mut candidate = self.random_cell();
        for _ in 0..SPAWN_ATTEMPT_BUDGET {
            if self.can_place(candidate) {
                return candidate;
            }
            candidate = self.random_cell();
        }
        candidate
    }

    fn random_cell(&mut self) -> GridPosition {
        let x = self.rng.int(0, self.size.columns() as i32 - 1);
        let y = self.rng.int(0, self.size.rows() as i32 - 1);
        GridPosition::new(x, y)
    }

    fn spawn_obstacle(&mut self) {
        let cell = self.random_empty_cell();
        let _ = self.obstacles.insert(CellKey::encode(cell, self.size));
    }

    fn spawn_apple(&mut self) {
        let cell = self.random_empty_cell();
        let roll = self.rng.next_unit();
        let kind = if roll > GOLDEN_ROLL_THRESHOLD {
            AppleKind::Golden
        } else if roll < ROTTEN_ROLL_THRESHOLD {
            AppleKind::Rotten
        } else {
            AppleKind::Normal
        };
        let _ = self.apples.insert(CellKey::encode(cell, self.size), kind);
    }

    fn reshuffle_portal(&mut self) {
        let a = self.random_empty_cell();
        let b = self.random_empty_cell();
        self.portal = Some(Portal::new(a, b));
    }

    fn finish(&mut self, reason: EndReason, out_events: &mut Vec<Event>) {
        if self.phase == SessionPhase::Over {
            return;
        }
        self.phase = SessionPhase::Over;
        let summary = GameOverSummary {
            score: self.score,
            max_multiplier: self.max_multiplier,
            final_length: self.snake.len(),
            elapsed: Duration::from_secs_f32(self.elapsed),
            events_triggered: self.director.events_triggered(),
            reason,
        };
        self.summary = Some(summary);
        out_events.push(Event::SessionEnded { reason });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            if world.phase != SessionPhase::Running {
                return;
            }
            let clamped = dt
                .as_secs_f32()
                .min(world.config.max_frame_delta_seconds);
            out_events.push(Event::TimeAdvanced {
                dt: Duration::from_secs_f32(clamped),
            });
            world.update_continuous(clamped, out_events);
        }
        Command::Step => {
            if world.phase != SessionPhase::Running {
                return;
            }
            world.step_once(out_events);
        }
        Command::SetDirection { direction } => {
            if world.phase != SessionPhase::Running {
                return;
            }
            let intent = if world.snake.inverted() {
                direction.opposite()
            } else {
                direction
            };
            world.snake.set_direction(intent);
        }
        Command::TogglePause => match world.phase {
            SessionPhase::Running => {
                world.phase = SessionPhase::Paused;
                out_events.push(Event::PauseToggled { paused: true });
            }
            SessionPhase::Paused => {
                world.phase = SessionPhase::Running;
                out_events.push(Event::PauseToggled { paused: false });
            }
            SessionPhase::Over => {}
        },
        Command::UsePowerUp => {
            if world.phase != SessionPhase::Running {
                return;
            }
            if let Some(power) = world.power_up.take() {
                match power {
                    PowerUp::Ghost => {
                        let steps = (world.config.power_up_duration_seconds
                            * world.steps_per_second)
                            .round() as u32;
                        world.snake.grant_ghost(steps);
                    }
                }
                out_events.push(Event::PowerUpConsumed { power });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use snake_surge_core::{
        AppleKind, GameOverSummary, GridPosition, GridSize, PowerUp, SessionPhase,
    };

    use super::World;

    /// Current phase of the session.
    #[must_use]
    pub fn phase(world: &World) -> SessionPhase {
        world.phase
    }

    /// Dimensions of the play field.
    #[must_use]
    pub fn grid_size(world: &World) -> GridSize {
        world.size
    }

    /// Snake body segments, head first.
    #[must_use]
    pub fn snake_segments(world: &World) -> &[GridPosition] {
        world.snake.segments()
    }

    /// Number of segments in the snake's body.
    #[must_use]
    pub fn body_length(world: &World) -> usize {
        world.snake.len()
    }

    /// Hunger meter percentage in `[0, 100]`.
    #[must_use]
    pub fn hunger(world: &World) -> f32 {
        world.snake.hunger()
    }

    /// Current simulation rate in steps per second.
    #[must_use]
    pub fn steps_per_second(world: &World) -> f32 {
        world.steps_per_second
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Current combo multiplier.
    #[must_use]
    pub fn multiplier(world: &World) -> u32 {
        world.multiplier
    }

    /// Power-up currently held, if any.
    #[must_use]
    pub fn held_power_up(world: &World) -> Option<PowerUp> {
        world.power_up
    }

    /// Remaining ghost steps; non-zero means collision immunity is active.
    #[must_use]
    pub fn ghost_steps(world: &World) -> u32 {
        world.snake.ghost_steps()
    }

    /// Whether the fog overlay should be drawn.
    #[must_use]
    pub fn fog_active(world: &World) -> bool {
        world.director.fog_active()
    }

    /// Whether directional input is currently negated.
    #[must_use]
    pub fn controls_inverted(world: &World) -> bool {
        world.snake.inverted()
    }

    /// Obstacle cells in deterministic (key) order.
    #[must_use]
    pub fn obstacles(world: &World) -> Vec<GridPosition> {
        world
            .obstacles
            .iter()
            .map(|key| key.decode(world.size))
            .collect()
    }

    /// Apples on the board in deterministic (key) order.
    #[must_use]
    pub fn apples(world: &World) -> Vec<AppleSnapshot> {
        world
            .apples
            .iter()
            .map(|(key, kind)| AppleSnapshot {
                position: key.decode(world.size),
                kind: *kind,
            })
            .collect()
    }

    /// Portal endpoint pair, if a portal currently exists.
    #[must_use]
    pub fn portal_endpoints(world: &World) -> Option<(GridPosition, GridPosition)> {
        world.portal.map(|portal| portal.endpoints())
    }

    /// Live meteors with their remaining step lifetimes.
    #[must_use]
    pub fn meteors(world: &World) -> Vec<MeteorSnapshot> {
        world
            .meteors
            .iter()
            .map(|meteor| MeteorSnapshot {
                position: meteor.position,
                ttl: meteor.ttl,
            })
            .collect()
    }

    /// Simulated time elapsed since the session started.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        Duration::from_secs_f32(world.elapsed)
    }

    /// Number of world events the director has fired so far.
    #[must_use]
    pub fn events_triggered(world: &World) -> u32 {
        world.director.events_triggered()
    }

    /// End-of-game statistics; present once the session is over.
    #[must_use]
    pub fn summary(world: &World) -> Option<&GameOverSummary> {
        world.summary.as_ref()
    }

    /// Immutable representation of a single apple used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct AppleSnapshot {
        /// Cell the apple occupies.
        pub position: GridPosition,
        /// Variant of the apple.
        pub kind: AppleKind,
    }

    /// Immutable representation of a single meteor used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MeteorSnapshot {
        /// Cell the meteor occupies.
        pub position: GridPosition,
        /// Remaining lifetime in whole steps.
        pub ttl: u32,
    }
}
