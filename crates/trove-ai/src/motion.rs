//! Motion controller: turns a target into cardinal movement on the grid.
//!
//! Per tick, in order: stuck detection, boost decay, path refresh, fallback
//! target selection, then facing and movement.

use fastrand::Rng;
use glam::Vec2;
use tracing::{debug, warn};
use trove_common::Direction;
use trove_nav::{find_path, GridNode, NavGraph, Path, Walkability};

use crate::agent::{Agent, AiMode, Steerable};
use crate::config::AiConfig;
use crate::debounce::DirectionDebounce;
use crate::events::{AiEvent, AiEventBus, RecoveryKind};

/// Attempts at drawing a recovery target that differs from the old one.
const RECOVERY_PICK_TRIES: usize = 8;

/// Fractions of a full step tried when the full step is blocked.
const STEP_FRACTIONS: [f32; 10] = [1.0, 0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1];

/// What movement did this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStep {
    /// No target or no route
    Idle,
    /// Rotated toward the next node without translating
    Turning,
    /// Translated toward the next node
    Moved,
    /// Every step fraction was blocked
    Blocked,
    /// The final path node was reached
    Arrived,
}

/// Drives an [`Agent`] along paths on a bound [`NavGraph`].
#[derive(Debug, Clone)]
pub struct MotionController {
    graph: NavGraph,
    path: Path,
    path_dirty: bool,
    last_path_distance: Option<f32>,
    debounce: DirectionDebounce,
    last_position: Option<Vec2>,
    config: AiConfig,
}

impl MotionController {
    /// Creates a controller over `graph`.
    #[must_use]
    pub fn new(graph: NavGraph, config: &AiConfig) -> Self {
        Self {
            graph,
            path: Path::empty(),
            path_dirty: false,
            last_path_distance: None,
            debounce: DirectionDebounce::new(
                Direction::default(),
                config.direction_confirm_time,
                config.min_reverse_steps,
            ),
            last_position: None,
            config: config.clone(),
        }
    }

    /// The navigation graph.
    #[must_use]
    pub const fn graph(&self) -> &NavGraph {
        &self.graph
    }

    /// The current path.
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }

    /// Remaining route as world points.
    #[must_use]
    pub fn debug_path(&self) -> Vec<Vec2> {
        self.path.world_points()
    }

    /// Sets a new target and schedules a re-plan.
    pub fn retarget(&mut self, agent: &mut Agent, target: Vec2, bus: &AiEventBus) {
        agent.set_target(Some(target));
        self.path.clear();
        self.path_dirty = true;
        self.last_path_distance = None;
        bus.publish(AiEvent::TargetChanged {
            target,
            mode: agent.mode(),
        });
    }

    /// Drops the target and path.
    pub fn clear_target(&mut self, agent: &mut Agent) {
        agent.set_target(None);
        self.path.clear();
        self.path_dirty = false;
        self.last_path_distance = None;
    }

    /// Advances the agent by one tick.
    ///
    /// `policy_updated` tells the controller the target policy already chose
    /// a target this tick, so no fallback target is picked.
    pub fn update(
        &mut self,
        agent: &mut Agent,
        dt: f32,
        world: &dyn Walkability,
        policy_updated: bool,
        rng: &mut Rng,
        bus: &AiEventBus,
    ) -> MotionStep {
        if dt <= 0.0 {
            return MotionStep::Idle;
        }

        self.detect_stuck(agent, dt, rng, bus);
        self.last_position = Some(agent.position());

        if agent.tick_boost(dt) {
            debug!("Speed boost ended");
            bus.publish(AiEvent::BoostEnded);
        }

        if agent.target().is_some() {
            let elapsed = agent.accumulate_refresh(dt);
            if self.path_dirty {
                self.recompute_path(agent, bus);
            } else if elapsed >= self.config.path_refresh_interval {
                if self.path.in_progress() && self.closer_than_last_plan(agent) {
                    agent.reset_refresh();
                } else {
                    self.recompute_path(agent, bus);
                }
            }
        }

        if agent.target().is_none() && !policy_updated {
            self.pick_fallback_target(agent, rng, bus);
        }

        self.step(agent, dt, world, bus)
    }

    fn detect_stuck(&mut self, agent: &mut Agent, dt: f32, rng: &mut Rng, bus: &AiEventBus) {
        if agent.target().is_none() {
            agent.reset_stuck();
            return;
        }
        let progressed = self
            .last_position
            .map_or(true, |last| last.distance_squared(agent.position()) > f32::EPSILON);
        if progressed {
            agent.reset_stuck();
            return;
        }
        if agent.accumulate_stuck(dt) >= self.config.stuck_threshold {
            self.recover_from_stuck(agent, rng, bus);
        }
    }

    fn closer_than_last_plan(&self, agent: &Agent) -> bool {
        match (self.last_path_distance, agent.target()) {
            (Some(last), Some(target)) => agent.position().distance(target) < last,
            _ => false,
        }
    }

    fn snap_to_graph(&self, agent: &mut Agent) -> Option<GridNode> {
        if let Some(node) = self.graph.node_at(agent.position()) {
            return Some(*node);
        }
        let node = *self.graph.nearest_node(agent.position())?;
        debug!(
            "Agent off graph at ({:.0}, {:.0}), snapping to node {}",
            agent.position().x,
            agent.position().y,
            node.index()
        );
        agent.teleport(node.center());
        Some(node)
    }

    /// Plans a route from the agent to its target.
    ///
    /// An unreachable target is dropped so a fallback target is chosen.
    pub fn recompute_path(&mut self, agent: &mut Agent, bus: &AiEventBus) {
        self.path_dirty = false;
        agent.reset_refresh();
        let Some(target) = agent.target() else {
            self.path.clear();
            return;
        };

        let start = self.snap_to_graph(agent);
        let goal = self.graph.resolve_node(target).copied();
        let route = match (start, goal) {
            (Some(start), Some(goal)) => find_path(&self.graph, start.index(), goal.index()),
            _ => Vec::new(),
        };

        if route.is_empty() {
            debug!("No route to ({:.0}, {:.0}), dropping target", target.x, target.y);
            self.clear_target(agent);
            bus.publish(AiEvent::PathUnreachable { target });
            return;
        }

        let position = agent.position();
        let mut path = Path::new(route);
        // Already past the first node: don't walk back to its center.
        if let [first, second, ..] = path.nodes() {
            if position.distance(second.center()) < first.center().distance(second.center()) {
                path.advance();
            }
        }
        debug!("Path computed: {} nodes", path.len());
        bus.publish(AiEvent::PathComputed { nodes: path.len() });
        self.path = path;
        self.last_path_distance = Some(position.distance(target));
    }

    fn pick_fallback_target(&mut self, agent: &mut Agent, rng: &mut Rng, bus: &AiEventBus) {
        if agent.mode() == AiMode::Seeking {
            agent.set_mode(AiMode::Exploring);
        }
        let pick = match agent.mode() {
            AiMode::Roaming => self.graph.random_walkable_node(rng).copied(),
            _ => self.graph.unexplored_node(agent.position(), rng),
        };
        if let Some(node) = pick {
            self.retarget(agent, node.center(), bus);
            self.recompute_path(agent, bus);
        }
    }

    fn recover_from_stuck(&mut self, agent: &mut Agent, rng: &mut Rng, bus: &AiEventBus) {
        let stuck_for = agent.stuck_timer();
        let old_target = agent.target();
        agent.reset_stuck();
        if let Some(node) = self.graph.nearest_node(agent.position()).copied() {
            agent.teleport(node.center());
        }
        self.clear_target(agent);

        let max = self.config.max_repath_attempts;
        let attempts = agent.bump_repath_attempts(max);
        let kind = if attempts >= max {
            agent.reset_repath_attempts();
            RecoveryKind::Random
        } else {
            RecoveryKind::Exploration
        };

        let mut pick = None;
        for _ in 0..RECOVERY_PICK_TRIES {
            let candidate = match kind {
                RecoveryKind::Random => self.graph.random_walkable_node(rng).copied(),
                RecoveryKind::Exploration => self.graph.unexplored_node(agent.position(), rng),
            };
            let Some(node) = candidate else { break };
            pick = Some(node.center());
            if pick != old_target {
                break;
            }
        }

        warn!(
            "Stuck for {stuck_for:.1}s, recovering with {kind:?} target (attempt {attempts}/{max})"
        );
        bus.publish(AiEvent::StuckRecovered { kind, attempts });

        if let Some(target) = pick {
            agent.set_mode(match kind {
                RecoveryKind::Random => AiMode::Roaming,
                RecoveryKind::Exploration => AiMode::Exploring,
            });
            self.retarget(agent, target, bus);
        }
    }

    /// Position the agent steers to for a node, kept inside the edge margin.
    fn waypoint(&self, node: &GridNode) -> Vec2 {
        self.graph
            .geometry()
            .clamp_with_margin(node.center(), self.config.edge_margin_tiles)
    }

    fn step(
        &mut self,
        agent: &mut Agent,
        dt: f32,
        world: &dyn Walkability,
        bus: &AiEventBus,
    ) -> MotionStep {
        let Some(target) = agent.target() else {
            agent.halt();
            return MotionStep::Idle;
        };
        let position = agent.position();

        while let Some(node) = self.path.current() {
            if self.waypoint(node).distance(position) > self.config.node_tolerance {
                break;
            }
            self.path.advance();
        }

        if self.path.is_complete() {
            debug!("Reached target ({:.0}, {:.0})", target.x, target.y);
            self.clear_target(agent);
            agent.reset_repath_attempts();
            agent.halt();
            bus.publish(AiEvent::TargetReached { position: target });
            return MotionStep::Arrived;
        }
        let Some(next) = self.path.current().map(|node| self.waypoint(node)) else {
            agent.halt();
            return MotionStep::Idle;
        };

        let delta = next - position;
        let Some(desired) = Direction::from_vec2(delta) else {
            agent.halt();
            return MotionStep::Idle;
        };
        let facing = self.debounce.observe(desired, dt);
        agent.set_direction(facing);
        if facing != desired {
            agent.halt();
            return MotionStep::Turning;
        }

        let remaining = if desired.is_horizontal() {
            delta.x.abs()
        } else {
            delta.y.abs()
        };
        let full = desired.to_vec2() * (agent.speed() * dt).min(remaining);
        let geometry = self.graph.geometry();

        for fraction in STEP_FRACTIONS {
            let candidate =
                geometry.clamp_with_margin(position + full * fraction, self.config.edge_margin_tiles);
            if candidate != position && world.is_walkable(candidate) {
                agent.move_to(candidate, (candidate - position) / dt);
                return MotionStep::Moved;
            }
        }
        agent.halt();
        MotionStep::Blocked
    }
}
