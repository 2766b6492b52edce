//! One round of treasure hunting on a single map.
//!
//! The round stands in for the host game: it scatters treasures, lets a
//! scripted player pick them up on a timer, feeds the opponent hints, and
//! persists every pickup to the history store.

use anyhow::{bail, Result};
use fastrand::Rng;
use glam::Vec2;
use std::fmt;
use tracing::{debug, info};
use trove_ai::{record_collection, AiEvent, Opponent, Steerable};
use trove_common::{MapId, RoundNumber};
use trove_nav::{GridNode, MapDescriptor, NavGraph};
use trove_store::{HistoryStore, TreasureCollectionEvent};

use crate::config::SimConfig;

/// Counts of opponent events seen during a round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventTally {
    /// Targets assigned
    pub targets_changed: u32,
    /// Targets reached
    pub targets_reached: u32,
    /// Paths planned
    pub paths_computed: u32,
    /// Targets with no route
    pub unreachable: u32,
    /// Stuck recoveries
    pub stuck_recoveries: u32,
    /// Hints followed
    pub hints_followed: u32,
    /// Hint follows that timed out
    pub hints_abandoned: u32,
    /// Hotspots learned at runtime
    pub hotspots_added: u32,
    /// Speed boosts started
    pub boosts: u32,
}

impl EventTally {
    /// Counts one event.
    pub fn observe(&mut self, event: &AiEvent) {
        match event {
            AiEvent::TargetChanged { .. } => self.targets_changed += 1,
            AiEvent::TargetReached { .. } => self.targets_reached += 1,
            AiEvent::PathComputed { .. } => self.paths_computed += 1,
            AiEvent::PathUnreachable { .. } => self.unreachable += 1,
            AiEvent::StuckRecovered { .. } => self.stuck_recoveries += 1,
            AiEvent::HintMatched { .. } => self.hints_followed += 1,
            AiEvent::HintAbandoned { .. } => self.hints_abandoned += 1,
            AiEvent::HotspotAdded { .. } => self.hotspots_added += 1,
            AiEvent::BoostStarted { .. } => self.boosts += 1,
            AiEvent::BoostEnded => {}
        }
    }
}

impl fmt::Display for EventTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "targets {} reached {} paths {} unreachable {} stuck {} hints {}/{} hotspots {} boosts {}",
            self.targets_changed,
            self.targets_reached,
            self.paths_computed,
            self.unreachable,
            self.stuck_recoveries,
            self.hints_followed,
            self.hints_abandoned,
            self.hotspots_added,
            self.boosts
        )
    }
}

/// Outcome of a finished round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    /// Round number
    pub round: RoundNumber,
    /// Map played
    pub map_id: MapId,
    /// Ticks simulated
    pub ticks: u32,
    /// Treasures the opponent picked up
    pub ai_collected: u32,
    /// Treasures the scripted player picked up
    pub player_collected: u32,
    /// Treasures left on the map
    pub remaining: u32,
    /// Pickups written to the store
    pub persisted: u32,
    /// Opponent events seen
    pub events: EventTally,
}

/// Mutable state of a round in progress.
struct RoundState<'a> {
    round: RoundNumber,
    map: &'a MapDescriptor,
    store: &'a mut dyn HistoryStore,
    treasures: Vec<Vec2>,
    ai_collected: u32,
    player_collected: u32,
    persisted: u32,
}

impl RoundState<'_> {
    fn collect(&mut self, opponent: &mut Opponent, index: usize, by_player: bool) {
        let treasure = self.treasures.swap_remove(index);
        let collector = if by_player {
            self.player_collected += 1;
            treasure
        } else {
            self.ai_collected += 1;
            opponent.add_score(1);
            opponent.agent().position()
        };
        opponent.notify_treasure_collected(treasure, by_player);

        let event = TreasureCollectionEvent::new(
            self.round,
            self.map.id.clone(),
            treasure,
            collector,
            by_player,
        );
        if record_collection(self.store, &event) {
            self.persisted += 1;
        }
        debug!(
            "Treasure at ({:.0}, {:.0}) collected by {}",
            treasure.x,
            treasure.y,
            if by_player { "player" } else { "opponent" }
        );
    }
}

/// Picks `count` distinct interior floor cells, never `spawn`.
fn scatter_treasures(graph: &NavGraph, spawn: Vec2, count: u32, rng: &mut Rng) -> Vec<Vec2> {
    let geometry = graph.geometry();
    let mut spots: Vec<Vec2> = graph
        .nodes()
        .iter()
        .filter(|n| !n.cell().is_border(geometry.grid_width, geometry.grid_height))
        .map(GridNode::center)
        .filter(|c| *c != spawn)
        .collect();
    rng.shuffle(&mut spots);
    spots.truncate(count as usize);
    spots
}

/// Plays one round of `map` with `opponent`.
///
/// Returns an error only if the map has no walkable cells.
pub fn run_round(
    config: &SimConfig,
    map: &MapDescriptor,
    round: RoundNumber,
    opponent: &mut Opponent,
    store: &mut dyn HistoryStore,
    rng: &mut Rng,
) -> Result<RoundSummary> {
    let graph = NavGraph::build(&map.tiles, map.geometry());
    let Some(spawn) = graph.random_walkable_node(rng).map(|n| n.center()) else {
        bail!("Map {} has no walkable cells", map.id);
    };
    let treasures = scatter_treasures(&graph, spawn, config.treasures_per_round, rng);
    info!(
        "Round {round} on {} ({}): {} treasures",
        map.id,
        map.name,
        treasures.len()
    );

    opponent.reset_round(spawn);
    opponent.bind_navigation(graph);
    opponent.load_map(map, store);

    let mut state = RoundState {
        round,
        map,
        store,
        treasures,
        ai_collected: 0,
        player_collected: 0,
        persisted: 0,
    };
    let mut events = EventTally::default();
    let mut player_timer = 0.0_f32;
    let mut hint_timer = 0.0_f32;
    let dt = config.tick_seconds();
    let mut ticks = 0;

    for _ in 0..config.ticks_per_round() {
        ticks += 1;
        let report = opponent.update(dt, &map.tiles);

        if let Some(index) = state
            .treasures
            .iter()
            .position(|t| t.distance(report.position) <= config.pickup_radius)
        {
            state.collect(opponent, index, false);
        }

        player_timer += dt;
        if player_timer >= config.player_collect_interval && !state.treasures.is_empty() {
            player_timer = 0.0;
            let index = rng.usize(..state.treasures.len());
            state.collect(opponent, index, true);
        }

        hint_timer += dt;
        if hint_timer >= config.hint_interval && !state.treasures.is_empty() {
            hint_timer = 0.0;
            let treasure = state.treasures[rng.usize(..state.treasures.len())];
            if let Some(landmark) = map.nearest_landmark(treasure) {
                debug!("Hinting at {}", landmark.name);
                opponent.offer_hint(format!("Something glitters near the {}", landmark.name));
            }
        }

        for event in opponent.drain_events() {
            events.observe(&event);
        }

        if state.treasures.is_empty() {
            break;
        }
    }

    let summary = RoundSummary {
        round,
        map_id: map.id.clone(),
        ticks,
        ai_collected: state.ai_collected,
        player_collected: state.player_collected,
        remaining: u32::try_from(state.treasures.len()).unwrap_or(u32::MAX),
        persisted: state.persisted,
        events,
    };
    info!(
        "Round {round} over: opponent {} / player {} ({} left)",
        summary.ai_collected,
        summary.player_collected,
        summary.remaining
    );
    Ok(summary)
}
