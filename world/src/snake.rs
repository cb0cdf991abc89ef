//! The snake agent: body, turn buffer, hunger, and status counters.

use snake_surge_core::{CellKey, Direction, GridPosition, GridSize};
use std::collections::{BTreeSet, VecDeque};

/// What the head ran into during a collision check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CollisionKind {
    /// A static obstacle cell.
    Obstacle,
    /// One of the snake's own body segments.
    Body,
}

/// Player-controlled agent advanced once per simulation step.
///
/// The body always holds at least one segment; the only operations that
/// change its length are [`Snake::advance_step`] and [`Snake::grow`], and a
/// shrink that would empty the body marks the snake dead instead.
#[derive(Clone, Debug)]
pub(crate) struct Snake {
    body: Vec<GridPosition>,
    direction: Direction,
    pending: VecDeque<Direction>,
    grow_pending: u32,
    hunger: f32,
    alive: bool,
    ghost_steps: u32,
    inverted: bool,
    teleport_cooldown: u32,
}

impl Snake {
    /// Creates a snake centered on the grid, tail extending west, heading east.
    pub(crate) fn new(size: GridSize, initial_length: u32, initial_hunger: f32) -> Self {
        let center_x = size.columns() as i32 / 2;
        let center_y = size.rows() as i32 / 2;
        let body = (0..initial_length as i32)
            .map(|offset| GridPosition::new(center_x - offset, center_y).wrapped(size))
            .collect();
        Self {
            body,
            direction: Direction::East,
            pending: VecDeque::new(),
            grow_pending: 0,
            hunger: initial_hunger,
            alive: true,
            ghost_steps: 0,
            inverted: false,
            teleport_cooldown: 0,
        }
    }

    pub(crate) fn head(&self) -> GridPosition {
        self.body[0]
    }

    pub(crate) fn segments(&self) -> &[GridPosition] {
        &self.body
    }

    pub(crate) fn len(&self) -> usize {
        self.body.len()
    }

    pub(crate) fn hunger(&self) -> f32 {
        self.hunger
    }

    pub(crate) fn alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn ghost_steps(&self) -> u32 {
        self.ghost_steps
    }

    pub(crate) fn inverted(&self) -> bool {
        self.inverted
    }

    pub(crate) fn teleport_cooldown(&self) -> u32 {
        self.teleport_cooldown
    }

    /// Queues a turn unless it exactly reverses the most recent heading.
    ///
    /// The reference heading is the last queued turn, or the current
    /// direction when the queue is empty, so a buffered turn cannot be undone
    /// into the snake's own neck either.
    pub(crate) fn set_direction(&mut self, direction: Direction) {
        let reference = self.pending.back().copied().unwrap_or(self.direction);
        if direction == reference.opposite() {
            return;
        }
        self.pending.push_back(direction);
    }

    /// Drains hunger by `rate * dt`; an empty meter is terminal.
    pub(crate) fn apply_hunger_drain(&mut self, dt: f32, rate: f32) {
        self.hunger = (self.hunger - rate * dt).max(0.0);
        if self.hunger <= 0.0 {
            self.alive = false;
        }
    }

    /// Refills hunger, capped at 100 percent.
    pub(crate) fn apply_refill(&mut self, amount: f32) {
        self.hunger = (self.hunger + amount).min(100.0);
    }

    /// Non-stacking ghost refresh: keeps the larger of the two windows.
    pub(crate) fn grant_ghost(&mut self, steps: u32) {
        self.ghost_steps = self.ghost_steps.max(steps);
    }

    pub(crate) fn set_invert(&mut self, active: bool) {
        self.inverted = active;
    }

    pub(crate) fn arm_teleport_cooldown(&mut self, steps: u32) {
        self.teleport_cooldown = steps;
    }

    /// Replaces the head position without touching the rest of the body.
    /// Used by portal traversal only.
    pub(crate) fn relocate_head(&mut self, destination: GridPosition) {
        self.body[0] = destination;
    }

    /// Marks the snake dead; used for hazards resolved outside the agent.
    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }

    /// The per-step transition: consume one queued turn, wrap-move the head,
    /// and settle growth and status counters.
    pub(crate) fn advance_step(&mut self, size: GridSize) {
        if !self.alive {
            return;
        }
        if let Some(next) = self.pending.pop_front() {
            self.direction = next;
        }
        let new_head = self.head().stepped(self.direction, size);
        self.body.insert(0, new_head);
        if self.grow_pending > 0 {
            self.grow_pending -= 1;
        } else {
            let _ = self.body.pop();
        }
        if self.ghost_steps > 0 {
            self.ghost_steps -= 1;
        }
        if self.teleport_cooldown > 0 {
            self.teleport_cooldown -= 1;
        }
    }

    /// Positive `n` grows over the next `n` steps; negative `n` trims the
    /// tail immediately. Shrinking to a single segment or fewer is fatal.
    pub(crate) fn grow(&mut self, n: i32) {
        if n > 0 {
            self.grow_pending += n as u32;
        } else if n < 0 {
            let removable = (self.body.len() - 1).min(n.unsigned_abs() as usize);
            self.body.truncate(self.body.len() - removable);
            if self.body.len() <= 1 {
                self.alive = false;
            }
        }
    }

    /// Reports whether any body segment occupies `position`.
    pub(crate) fn occupies(&self, position: GridPosition) -> bool {
        self.body.contains(&position)
    }

    /// Checks the head against the obstacle set and the rest of the body.
    ///
    /// While ghost steps remain the check reports nothing and mutates
    /// nothing; otherwise a hit is lethal and the kind is returned.
    pub(crate) fn collide(
        &mut self,
        obstacles: &BTreeSet<CellKey>,
        size: GridSize,
    ) -> Option<CollisionKind> {
        if self.ghost_steps > 0 {
            return None;
        }
        let head = self.head();
        if obstacles.contains(&CellKey::encode(head, size)) {
            self.alive = false;
            return Some(CollisionKind::Obstacle);
        }
        if self.body[1..].contains(&head) {
            self.alive = false;
            return Some(CollisionKind::Body);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: GridSize = GridSize::new(45, 35);

    fn snake() -> Snake {
        Snake::new(SIZE, 4, 100.0)
    }

    #[test]
    fn starts_centered_with_head_leading_east() {
        let snake = snake();
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), GridPosition::new(22, 17));
        assert_eq!(snake.segments()[3], GridPosition::new(19, 17));
    }

    #[test]
    fn reversal_of_current_heading_is_rejected() {
        let mut snake = snake();
        snake.set_direction(Direction::West);
        snake.advance_step(SIZE);
        assert_eq!(snake.head(), GridPosition::new(23, 17));
    }

    #[test]
    fn reversal_of_queued_heading_is_rejected() {
        let mut snake = snake();
        snake.set_direction(Direction::North);
        snake.set_direction(Direction::South);
        snake.advance_step(SIZE);
        assert_eq!(snake.head(), GridPosition::new(22, 16));
        snake.advance_step(SIZE);
        assert_eq!(snake.head(), GridPosition::new(22, 15));
    }

    #[test]
    fn growth_applies_over_following_steps() {
        let mut snake = snake();
        snake.grow(3);
        for _ in 0..3 {
            snake.advance_step(SIZE);
        }
        assert_eq!(snake.len(), 7);
        snake.advance_step(SIZE);
        assert_eq!(snake.len(), 7);
    }

    #[test]
    fn moderate_shrink_trims_tail_and_survives() {
        let mut snake = Snake::new(SIZE, 5, 100.0);
        snake.grow(-2);
        assert_eq!(snake.len(), 3);
        assert!(snake.alive());
    }

    #[test]
    fn severe_shrink_is_fatal() {
        let mut snake = Snake::new(SIZE, 5, 100.0);
        snake.grow(-10);
        assert_eq!(snake.len(), 1);
        assert!(!snake.alive());
    }

    #[test]
    fn hunger_drain_clamps_at_zero_and_kills() {
        let mut snake = snake();
        snake.apply_hunger_drain(10.0, 4.0);
        assert!(snake.alive());
        snake.apply_hunger_drain(20.0, 4.0);
        assert_eq!(snake.hunger(), 0.0);
        assert!(!snake.alive());
    }

    #[test]
    fn refill_caps_at_one_hundred() {
        let mut snake = snake();
        snake.apply_hunger_drain(1.0, 4.0);
        snake.apply_refill(50.0);
        assert_eq!(snake.hunger(), 100.0);
    }

    #[test]
    fn ghost_grant_refreshes_without_stacking() {
        let mut snake = snake();
        snake.grant_ghost(8);
        snake.grant_ghost(3);
        assert_eq!(snake.ghost_steps(), 8);
        snake.grant_ghost(12);
        assert_eq!(snake.ghost_steps(), 12);
    }

    #[test]
    fn obstacle_collision_is_lethal_without_ghost() {
        let mut snake = snake();
        let mut obstacles = BTreeSet::new();
        let _ = obstacles.insert(CellKey::encode(snake.head(), SIZE));
        assert_eq!(snake.collide(&obstacles, SIZE), Some(CollisionKind::Obstacle));
        assert!(!snake.alive());
    }

    #[test]
    fn ghost_suppresses_obstacle_and_self_collision() {
        let mut snake = snake();
        snake.grant_ghost(4);
        let mut obstacles = BTreeSet::new();
        let _ = obstacles.insert(CellKey::encode(snake.head(), SIZE));
        assert_eq!(snake.collide(&obstacles, SIZE), None);
        assert!(snake.alive());
    }

    #[test]
    fn self_collision_is_detected_after_a_tight_turn() {
        let mut snake = Snake::new(SIZE, 5, 100.0);
        snake.set_direction(Direction::South);
        snake.advance_step(SIZE);
        snake.set_direction(Direction::West);
        snake.advance_step(SIZE);
        snake.set_direction(Direction::North);
        snake.advance_step(SIZE);
        assert_eq!(snake.collide(&BTreeSet::new(), SIZE), Some(CollisionKind::Body));
        assert!(!snake.alive());
    }

    #[test]
    fn counters_decrement_once_per_step() {
        let mut snake = snake();
        snake.grant_ghost(2);
        snake.arm_teleport_cooldown(3);
        snake.advance_step(SIZE);
        assert_eq!(snake.ghost_steps(), 1);
        assert_eq!(snake.teleport_cooldown(), 2);
    }
}
