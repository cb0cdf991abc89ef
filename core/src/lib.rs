#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake Surge simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! actually happened. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Advances the continuous frame clock by the provided delta time.
    ///
    /// Drives hunger drain, combo decay, and the event director. The world
    /// clamps the delta to its configured frame bound before use.
    Tick {
        /// Wall-clock time elapsed since the previous frame.
        dt: Duration,
    },
    /// Executes one discrete simulation step: movement, teleport, hazards,
    /// collisions, and consumption.
    Step,
    /// Queues a directional intent for the snake.
    SetDirection {
        /// Desired heading; negated by the world while controls are inverted.
        direction: Direction,
    },
    /// Toggles between the running and paused phases.
    TogglePause,
    /// Consumes the held power-up, if any.
    UsePowerUp,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the continuous clock advanced by a (clamped) delta.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the frame.
        dt: Duration,
    },
    /// Confirms that the snake ate an apple.
    AppleEaten {
        /// Cell the apple occupied.
        position: GridPosition,
        /// Variant of the consumed apple.
        kind: AppleKind,
        /// Points awarded after the multiplier was applied.
        points: u32,
        /// Multiplier in effect when the points were awarded.
        multiplier: u32,
    },
    /// Confirms that the snake's head traversed the portal.
    Teleported {
        /// Endpoint the head entered.
        from: GridPosition,
        /// Endpoint the head emerged from.
        to: GridPosition,
    },
    /// Announces that a power-up dropped and is now held.
    PowerUpGranted {
        /// Power-up that became available.
        power: PowerUp,
    },
    /// Confirms that the held power-up was spent.
    PowerUpConsumed {
        /// Power-up that was activated.
        power: PowerUp,
    },
    /// Reports that the event director fired a world event.
    WorldEventFired {
        /// Event that was selected and applied.
        event: WorldEvent,
    },
    /// Announces a pause state change.
    PauseToggled {
        /// Whether the session is paused after the toggle.
        paused: bool,
    },
    /// Reports that the session reached a terminal state.
    SessionEnded {
        /// Condition that ended the run.
        reason: EndReason,
    },
}

/// Cardinal movement directions available to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Unit displacement applied to a position moving in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// The exactly-opposite heading; queuing it is rejected by the snake.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Dimensions of the toroidal play field measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new grid size descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells on the board.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.columns as u64 * self.rows as u64
    }

    /// Reports whether the position lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, position: GridPosition) -> bool {
        position.x() >= 0
            && position.y() >= 0
            && (position.x() as u32) < self.columns
            && (position.y() as u32) < self.rows
    }
}

/// Location of a single cell on the toroidal grid.
///
/// Values produced by [`GridPosition::wrapped`] and
/// [`GridPosition::stepped`] are always non-negative and in-bounds; raw
/// constructor input may be anything and is normalized on wrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    x: i32,
    y: i32,
}

impl GridPosition {
    /// Creates a new position from raw coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Normalizes the position onto the torus described by `size`.
    ///
    /// Both axes use euclidean remainders, so the result is always
    /// non-negative and in-bounds; wrapping an already-wrapped position is a
    /// no-op.
    #[must_use]
    pub fn wrapped(self, size: GridSize) -> Self {
        let columns = size.columns() as i32;
        let rows = size.rows() as i32;
        Self {
            x: self.x.rem_euclid(columns),
            y: self.y.rem_euclid(rows),
        }
    }

    /// Moves one cell in `direction`, wrapping around the grid edges.
    #[must_use]
    pub fn stepped(self, direction: Direction, size: GridSize) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy).wrapped(size)
    }
}

/// Dense map key for an in-bounds grid position.
///
/// [`CellKey::encode`] and [`CellKey::decode`] form a lossless bijection for
/// every cell of the grid, so positions can serve as ordered map keys without
/// string formatting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey(u64);

impl CellKey {
    /// Encodes a wrapped position into its dense key.
    #[must_use]
    pub fn encode(position: GridPosition, size: GridSize) -> Self {
        let wrapped = position.wrapped(size);
        Self(wrapped.y() as u64 * u64::from(size.columns()) + wrapped.x() as u64)
    }

    /// Decodes the key back into the position it was encoded from.
    #[must_use]
    pub fn decode(self, size: GridSize) -> GridPosition {
        let columns = u64::from(size.columns());
        GridPosition::new((self.0 % columns) as i32, (self.0 / columns) as i32)
    }
}

/// Variants of apple that can appear on the board.
///
/// Each variant fixes its score, growth, and step-rate payload as an
/// associated constant table; new variants extend the table rather than a
/// type hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppleKind {
    /// Everyday apple: modest score, one segment of growth.
    Normal,
    /// Rare bonus apple: large score, fast growth, speeds the game up.
    Golden,
    /// Spoiled apple: costs score and shrinks the snake.
    Rotten,
}

impl AppleKind {
    /// Base score delta applied before the combo multiplier.
    #[must_use]
    pub const fn score_value(self) -> i32 {
        match self {
            Self::Normal => 3,
            Self::Golden => 10,
            Self::Rotten => -4,
        }
    }

    /// Segments added to (or removed from) the snake on consumption.
    #[must_use]
    pub const fn growth(self) -> i32 {
        match self {
            Self::Normal => 1,
            Self::Golden => 3,
            Self::Rotten => -2,
        }
    }

    /// Steps-per-second adjustment applied when the apple is eaten.
    #[must_use]
    pub const fn step_rate_shift(self) -> f32 {
        match self {
            Self::Normal => 0.0,
            Self::Golden => 0.6,
            Self::Rotten => -0.4,
        }
    }
}

/// Power-ups the snake can hold and activate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUp {
    /// Temporary immunity to obstacle and self collision.
    Ghost,
}

impl fmt::Display for PowerUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ghost => write!(f, "ghost"),
        }
    }
}

/// Randomized world-altering events fired by the director.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Directional input is negated for a fixed window.
    InvertControls,
    /// The board is shrouded for a fixed window; pure presentation flag.
    Fog,
    /// A batch of expiring lethal meteors lands on the board.
    MeteorShower,
    /// The step rate surges or slows, reverting after a fixed delay.
    TimeShift {
        /// True for a speed surge, false for a slowdown.
        surge: bool,
    },
    /// Both portal endpoints are redrawn from empty cells.
    PortalShuffle,
    /// A burst of extra apples spawns at once.
    AppleBloom,
}

/// Phase of a simulation session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// The simulation advances with every tick and step.
    Running,
    /// Frame-driven updates are frozen; countdowns hold their values.
    Paused,
    /// A terminal condition was reached; commands are ignored.
    Over,
}

/// Terminal conditions that end a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// The hunger meter drained to zero.
    Starvation,
    /// The head struck an obstacle without ghost protection.
    ObstacleCollision,
    /// The head ran into the snake's own body without ghost protection.
    SelfCollision,
    /// The head touched a meteor; ghost status offers no protection.
    MeteorStrike,
    /// A shrink reduced the body to one segment or fewer.
    FatalShrink,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Starvation => "starved",
            Self::ObstacleCollision => "hit an obstacle",
            Self::SelfCollision => "ran into itself",
            Self::MeteorStrike => "struck by a meteor",
            Self::FatalShrink => "shrank away to nothing",
        };
        write!(f, "{text}")
    }
}

/// End-of-game statistics handed to the UI collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameOverSummary {
    /// Final score at the moment the session ended.
    pub score: u32,
    /// Highest combo multiplier reached during the run.
    pub max_multiplier: u32,
    /// Number of body segments when the session ended.
    pub final_length: usize,
    /// Total simulated time elapsed over the session.
    pub elapsed: Duration,
    /// Number of world events the director fired.
    pub events_triggered: u32,
    /// Condition that terminated the run.
    pub reason: EndReason,
}

/// Tuning parameters consumed when a session is constructed.
///
/// Defaults reproduce the reference tuning. [`Config::validate`] rejects
/// misconfiguration at setup instead of clamping silently.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of grid columns.
    pub columns: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Body segments the snake starts with.
    pub initial_length: u32,
    /// Hunger percentage at round start.
    pub initial_hunger: f32,
    /// Step rate the session starts at.
    pub base_steps_per_second: f32,
    /// Lower clamp for the step rate.
    pub min_steps_per_second: f32,
    /// Upper clamp for the step rate.
    pub max_steps_per_second: f32,
    /// Hunger percentage drained per second of play.
    pub hunger_drain_per_second: f32,
    /// Hunger percentage restored by a non-rotten apple.
    pub hunger_refill_on_eat: f32,
    /// Seconds the combo window stays open after an apple is eaten.
    pub combo_window_seconds: f32,
    /// Shortest possible delay between world events.
    pub event_cooldown_min_seconds: f32,
    /// Longest possible delay between world events.
    pub event_cooldown_max_seconds: f32,
    /// Seconds of protection granted when the ghost power-up is used.
    pub power_up_duration_seconds: f32,
    /// Fraction of the board occupied by obstacles at round start.
    pub obstacle_density: f32,
    /// Additional obstacle-density fraction earned per point of score.
    pub extra_obstacle_per_score: f32,
    /// Steps the snake must wait between portal traversals.
    pub portal_cooldown_steps: u32,
    /// Hard cap on the combo multiplier.
    pub multiplier_cap: u32,
    /// Upper bound applied to frame deltas before they enter the clock.
    pub max_frame_delta_seconds: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: 45,
            rows: 35,
            initial_length: 4,
            initial_hunger: 100.0,
            base_steps_per_second: 7.0,
            min_steps_per_second: 3.5,
            max_steps_per_second: 18.0,
            hunger_drain_per_second: 4.0,
            hunger_refill_on_eat: 28.0,
            combo_window_seconds: 3.0,
            event_cooldown_min_seconds: 8.0,
            event_cooldown_max_seconds: 16.0,
            power_up_duration_seconds: 6.0,
            obstacle_density: 0.05,
            extra_obstacle_per_score: 0.0025,
            portal_cooldown_steps: 3,
            multiplier_cap: 12,
            max_frame_delta_seconds: 0.06,
        }
    }
}

impl Config {
    /// Dimensions of the play field described by this configuration.
    #[must_use]
    pub const fn grid_size(&self) -> GridSize {
        GridSize::new(self.columns, self.rows)
    }

    /// Checks every tuning parameter, failing fast on misconfiguration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.initial_length == 0 {
            return Err(ConfigError::ZeroInitialLength);
        }
        if u64::from(self.initial_length) > self.grid_size().cell_count() {
            return Err(ConfigError::InitialLengthExceedsGrid {
                length: self.initial_length,
            });
        }
        if !(self.min_steps_per_second > 0.0
            && self.min_steps_per_second <= self.base_steps_per_second
            && self.base_steps_per_second <= self.max_steps_per_second)
        {
            return Err(ConfigError::InvalidStepRateBounds {
                min: self.min_steps_per_second,
                base: self.base_steps_per_second,
                max: self.max_steps_per_second,
            });
        }
        if self.hunger_drain_per_second < 0.0 || self.hunger_refill_on_eat < 0.0 {
            return Err(ConfigError::NegativeHungerRate);
        }
        if self.combo_window_seconds <= 0.0 {
            return Err(ConfigError::NonPositiveComboWindow);
        }
        if !(self.event_cooldown_min_seconds > 0.0
            && self.event_cooldown_min_seconds <= self.event_cooldown_max_seconds)
        {
            return Err(ConfigError::InvalidEventCooldownRange {
                min: self.event_cooldown_min_seconds,
                max: self.event_cooldown_max_seconds,
            });
        }
        if self.obstacle_density < 0.0 || self.extra_obstacle_per_score < 0.0 {
            return Err(ConfigError::NegativeObstacleDensity);
        }
        if self.max_frame_delta_seconds <= 0.0 {
            return Err(ConfigError::NonPositiveFrameClamp);
        }
        Ok(())
    }
}

/// Construction-time misconfiguration reported by [`Config::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid has no cells in at least one dimension.
    #[error("grid dimensions {columns}x{rows} leave no play field")]
    EmptyGrid {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// The snake cannot start with zero segments.
    #[error("initial snake length must be at least 1")]
    ZeroInitialLength,
    /// The starting body cannot outnumber the cells of the board.
    #[error("initial snake length {length} exceeds the grid capacity")]
    InitialLengthExceedsGrid {
        /// Configured starting length.
        length: u32,
    },
    /// The step-rate bounds are not ordered `0 < min <= base <= max`.
    #[error("step rate bounds must satisfy 0 < min <= base <= max (min {min}, base {base}, max {max})")]
    InvalidStepRateBounds {
        /// Configured lower clamp.
        min: f32,
        /// Configured starting rate.
        base: f32,
        /// Configured upper clamp.
        max: f32,
    },
    /// Hunger drain and refill rates must be non-negative.
    #[error("hunger drain and refill rates must be non-negative")]
    NegativeHungerRate,
    /// The combo window must last for a positive duration.
    #[error("combo window must be positive")]
    NonPositiveComboWindow,
    /// The event cooldown range is empty or non-positive.
    #[error("event cooldown range must satisfy 0 < min <= max (min {min}, max {max})")]
    InvalidEventCooldownRange {
        /// Configured shortest cooldown.
        min: f32,
        /// Configured longest cooldown.
        max: f32,
    },
    /// Obstacle density parameters must be non-negative.
    #[error("obstacle density parameters must be non-negative")]
    NegativeObstacleDensity,
    /// The frame-delta clamp must be positive.
    #[error("frame delta clamp must be positive")]
    NonPositiveFrameClamp,
}
