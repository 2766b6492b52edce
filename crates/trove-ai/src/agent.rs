//! The opponent's body: position, facing, speed, and current intent.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use trove_common::Direction;

use crate::config::AiConfig;

/// High-level behavior the opponent is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AiMode {
    /// Wandering to random nodes
    Roaming,
    /// Visiting unexplored parts of the map (default)
    #[default]
    Exploring,
    /// Heading for a specific hint or hotspot target
    Seeking,
}

/// Minimal movement contract for steering-related code.
///
/// Movement is 2D and cardinal, so there is no orientation or angular
/// motion to expose.
pub trait Steerable {
    /// Current world position.
    fn position(&self) -> Vec2;
    /// Current velocity in pixels per second.
    fn linear_velocity(&self) -> Vec2;
    /// Radius of the agent's footprint in pixels.
    fn bounding_radius(&self) -> f32;
}

/// State of the computer-controlled treasure hunter.
///
/// Created at round start with [`Agent::create`]; recreated on round reset.
#[derive(Debug, Clone)]
pub struct Agent {
    position: Vec2,
    velocity: Vec2,
    radius: f32,
    direction: Direction,
    base_speed: f32,
    speed: f32,
    boost_multiplier: f32,
    boost_duration: f32,
    boost_remaining: f32,
    target: Option<Vec2>,
    mode: AiMode,
    score: u32,
    stuck_timer: f32,
    path_refresh_timer: f32,
    repath_attempts: u32,
}

impl Agent {
    /// Creates an agent standing at `spawn`.
    #[must_use]
    pub fn create(spawn: Vec2, config: &AiConfig) -> Self {
        Self {
            position: spawn,
            velocity: Vec2::ZERO,
            radius: config.agent_radius,
            direction: Direction::default(),
            base_speed: config.base_speed,
            speed: config.base_speed,
            boost_multiplier: config.boost_multiplier,
            boost_duration: config.boost_duration,
            boost_remaining: 0.0,
            target: None,
            mode: AiMode::default(),
            score: 0,
            stuck_timer: 0.0,
            path_refresh_timer: 0.0,
            repath_attempts: 0,
        }
    }

    /// Committed facing direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Current movement speed (boost applied).
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Unboosted movement speed.
    #[must_use]
    pub const fn base_speed(&self) -> f32 {
        self.base_speed
    }

    /// Whether a speed boost is running.
    #[must_use]
    pub fn is_boosted(&self) -> bool {
        self.boost_remaining > 0.0
    }

    /// Seconds of boost left.
    #[must_use]
    pub const fn boost_remaining(&self) -> f32 {
        self.boost_remaining
    }

    /// Current target position.
    #[must_use]
    pub const fn target(&self) -> Option<Vec2> {
        self.target
    }

    /// Current behavior mode.
    #[must_use]
    pub const fn mode(&self) -> AiMode {
        self.mode
    }

    /// Treasures collected this round.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Seconds spent without progress toward the current target.
    #[must_use]
    pub const fn stuck_timer(&self) -> f32 {
        self.stuck_timer
    }

    /// Seconds since the path was last computed.
    #[must_use]
    pub const fn path_refresh_timer(&self) -> f32 {
        self.path_refresh_timer
    }

    /// Consecutive stuck recoveries since the last reached target.
    #[must_use]
    pub const fn repath_attempts(&self) -> u32 {
        self.repath_attempts
    }

    /// Adds collected treasures to the score.
    pub fn add_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    /// Sets the behavior mode.
    pub fn set_mode(&mut self, mode: AiMode) {
        self.mode = mode;
    }

    /// Starts (or restarts) the speed boost.
    pub fn start_boost(&mut self) {
        self.boost_remaining = self.boost_duration;
        self.speed = self.base_speed * self.boost_multiplier;
    }

    /// Cancels any running boost.
    pub fn clear_boost(&mut self) {
        self.boost_remaining = 0.0;
        self.speed = self.base_speed;
    }

    /// Counts the boost down. Returns true on the tick the boost expires.
    pub(crate) fn tick_boost(&mut self, dt: f32) -> bool {
        if self.boost_remaining <= 0.0 {
            return false;
        }
        self.boost_remaining -= dt;
        if self.boost_remaining <= 0.0 {
            self.clear_boost();
            return true;
        }
        false
    }

    pub(crate) fn set_target(&mut self, target: Option<Vec2>) {
        self.target = target;
    }

    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub(crate) fn move_to(&mut self, position: Vec2, velocity: Vec2) {
        self.position = position;
        self.velocity = velocity;
    }

    /// Places the agent without implying motion (snapping, recovery).
    pub(crate) fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
    }

    pub(crate) fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    pub(crate) fn accumulate_stuck(&mut self, dt: f32) -> f32 {
        self.stuck_timer += dt;
        self.stuck_timer
    }

    pub(crate) fn reset_stuck(&mut self) {
        self.stuck_timer = 0.0;
    }

    pub(crate) fn accumulate_refresh(&mut self, dt: f32) -> f32 {
        self.path_refresh_timer += dt;
        self.path_refresh_timer
    }

    pub(crate) fn reset_refresh(&mut self) {
        self.path_refresh_timer = 0.0;
    }

    /// Bumps the recovery counter, saturating at `max`. Returns the new value.
    pub(crate) fn bump_repath_attempts(&mut self, max: u32) -> u32 {
        self.repath_attempts = (self.repath_attempts + 1).min(max);
        self.repath_attempts
    }

    pub(crate) fn reset_repath_attempts(&mut self) {
        self.repath_attempts = 0;
    }
}

impl Steerable for Agent {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn linear_velocity(&self) -> Vec2 {
        self.velocity
    }

    fn bounding_radius(&self) -> f32 {
        self.radius
    }
}
