//! The opponent session: agent, policy, and motion behind one API.
//!
//! Lifecycle per round: [`Opponent::create`], then
//! [`Opponent::bind_navigation`] and [`Opponent::load_map`], then one
//! [`Opponent::update`] per frame.

use fastrand::Rng;
use glam::Vec2;
use serde::Serialize;
use tracing::{debug, info};
use trove_common::{Direction, MapId};
use trove_nav::{Landmark, MapDescriptor, NavGraph, Walkability};
use trove_store::HistoryStore;

use crate::agent::{Agent, AiMode, Steerable};
use crate::config::AiConfig;
use crate::events::{AiEvent, AiEventBus};
use crate::history::load_hotspot_points;
use crate::hotspot::select_hotspots;
use crate::motion::{MotionController, MotionStep};
use crate::policy::{PolicyOutcome, TargetPolicy};

/// Read-only snapshot taken after each update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickReport {
    /// Agent position
    pub position: Vec2,
    /// Committed facing
    pub direction: Direction,
    /// Treasures collected this round
    pub score: u32,
    /// Behavior mode
    pub mode: AiMode,
    /// Current target
    pub target: Option<Vec2>,
    /// Whether the agent translated this tick
    pub moved: bool,
    /// Whether the target policy chose a target this tick
    pub target_updated: bool,
}

/// Computer-controlled treasure hunter.
#[derive(Debug)]
pub struct Opponent {
    config: AiConfig,
    agent: Agent,
    motion: Option<MotionController>,
    policy: TargetPolicy,
    rng: Rng,
    bus: AiEventBus,
    map_id: Option<MapId>,
    landmarks: Vec<Landmark>,
}

impl Opponent {
    /// Creates an opponent at `spawn`. Navigation must be bound before it
    /// can move.
    #[must_use]
    pub fn create(spawn: Vec2, mut config: AiConfig) -> Self {
        config.validate();
        let rng = config.seed.map_or_else(Rng::new, Rng::with_seed);
        Self {
            agent: Agent::create(spawn, &config),
            motion: None,
            policy: TargetPolicy::new(&config),
            rng,
            bus: AiEventBus::new(config.event_capacity),
            map_id: None,
            landmarks: Vec::new(),
            config,
        }
    }

    /// Attaches the navigation graph for the current map.
    pub fn bind_navigation(&mut self, graph: NavGraph) {
        debug!("Binding navigation graph with {} nodes", graph.len());
        self.motion = Some(MotionController::new(graph, &self.config));
    }

    /// Whether a navigation graph is bound.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.motion.is_some()
    }

    /// Switches to `map`: takes its landmarks and rebuilds hotspots from the
    /// store's history for it.
    pub fn load_map(&mut self, map: &MapDescriptor, store: &dyn HistoryStore) {
        self.landmarks = map.landmarks.clone();
        self.map_id = Some(map.id.clone());

        let points = load_hotspot_points(store, &map.id);
        let selected = select_hotspots(&points, self.config.hotspot_limit, &mut self.rng);
        info!(
            "Loaded map {} with {} landmarks, {} hotspots from {} past pickups",
            map.id,
            self.landmarks.len(),
            selected.len(),
            points.len()
        );
        self.policy.rebuild_hotspots(map.id.clone(), selected);
    }

    /// Queues a hint for the next update.
    pub fn offer_hint(&mut self, hint: impl Into<String>) {
        self.policy.offer_hint(hint);
    }

    /// Processes a hint immediately. Returns whether it was followed.
    pub fn process_hint(&mut self, hint: &str) -> bool {
        let outcome = self.policy.process_hint(
            hint,
            self.agent.position(),
            &self.landmarks,
            &mut self.rng,
            &self.bus,
        );
        match outcome {
            Some(outcome) => self.apply(outcome),
            None => false,
        }
    }

    /// Tells the opponent a treasure was picked up.
    ///
    /// A player pickup boosts the opponent; its own pickup ends any boost.
    pub fn notify_treasure_collected(&mut self, position: Vec2, collected_by_player: bool) {
        self.policy.on_treasure_collected(position, &self.bus);
        if collected_by_player {
            self.agent.start_boost();
            debug!("Speed boost for {:.1}s", self.config.boost_duration);
            self.bus.publish(AiEvent::BoostStarted {
                duration: self.config.boost_duration,
            });
        } else {
            self.agent.clear_boost();
        }
    }

    /// Adds to the opponent's score.
    pub fn add_score(&mut self, amount: u32) {
        self.agent.add_score(amount);
    }

    /// Advances the opponent by `dt` seconds against `world`.
    pub fn update(&mut self, dt: f32, world: &dyn Walkability) -> TickReport {
        if self.motion.is_none() {
            debug!("Update before navigation was bound; standing still");
            return self.report(false, false);
        }

        let outcome = self.policy.evaluate(
            dt,
            &self.agent,
            self.agent.target(),
            &self.landmarks,
            &mut self.rng,
            &self.bus,
        );
        let target_updated = self.apply(outcome);

        let Some(motion) = self.motion.as_mut() else {
            return self.report(false, target_updated);
        };
        let step = motion.update(
            &mut self.agent,
            dt,
            world,
            target_updated,
            &mut self.rng,
            &self.bus,
        );
        self.report(step == MotionStep::Moved, target_updated)
    }

    /// Applies a policy outcome. Returns whether a target was set.
    fn apply(&mut self, outcome: PolicyOutcome) -> bool {
        match outcome {
            PolicyOutcome::Keep => false,
            PolicyOutcome::Retarget { target, mode } => {
                self.agent.set_mode(mode);
                match self.motion.as_mut() {
                    Some(motion) => motion.retarget(&mut self.agent, target, &self.bus),
                    None => self.agent.set_target(Some(target)),
                }
                true
            }
            PolicyOutcome::Roam => {
                self.agent.set_mode(AiMode::Roaming);
                if let Some(motion) = self.motion.as_mut() {
                    motion.clear_target(&mut self.agent);
                }
                false
            }
            PolicyOutcome::Explore => {
                self.agent.set_mode(AiMode::Exploring);
                false
            }
        }
    }

    fn report(&self, moved: bool, target_updated: bool) -> TickReport {
        TickReport {
            position: self.agent.position(),
            direction: self.agent.direction(),
            score: self.agent.score(),
            mode: self.agent.mode(),
            target: self.agent.target(),
            moved,
            target_updated,
        }
    }

    /// Remaining route as world points, for debug drawing.
    #[must_use]
    pub fn debug_path(&self) -> Vec<Vec2> {
        self.motion
            .as_ref()
            .map(MotionController::debug_path)
            .unwrap_or_default()
    }

    /// Takes all events published since the last drain.
    pub fn drain_events(&self) -> Vec<AiEvent> {
        self.bus.drain()
    }

    /// Starts a new round at `spawn`.
    ///
    /// The agent is recreated and navigation unbound; hotspots survive.
    pub fn reset_round(&mut self, spawn: Vec2) {
        self.agent = Agent::create(spawn, &self.config);
        self.motion = None;
        self.policy.reset_round();
    }

    /// The agent.
    #[must_use]
    pub const fn agent(&self) -> &Agent {
        &self.agent
    }

    /// The target policy.
    #[must_use]
    pub const fn policy(&self) -> &TargetPolicy {
        &self.policy
    }

    /// Validated configuration in use.
    #[must_use]
    pub const fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Map loaded by [`Opponent::load_map`].
    #[must_use]
    pub const fn map_id(&self) -> Option<&MapId> {
        self.map_id.as_ref()
    }

    /// Landmarks of the loaded map.
    #[must_use]
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }
}
