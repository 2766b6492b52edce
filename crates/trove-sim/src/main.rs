//! # Trove
//!
//! Headless simulator for the treasure-hunt opponent.
//!
//! Plays a configurable number of rounds on the built-in maps against a
//! scripted player, persisting every pickup so later rounds can learn
//! hotspots from earlier ones.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod maps;
mod round;

use anyhow::Result;
use fastrand::Rng;
use glam::Vec2;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trove_ai::Opponent;
use trove_common::{MapId, RoundNumber};
use trove_nav::MapDescriptor;
use trove_store::JsonLinesStore;

use crate::config::SimConfig;
use crate::maps::builtin_registry;
use crate::round::run_round;

/// Main entry point.
fn main() -> Result<()> {
    // Loaded before tracing so the log directive can come from the file.
    let config_path = SimConfig::config_path();
    let mut config = SimConfig::load();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(config.log_directive.parse()?))
        .init();

    info!("Trove simulator starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    if !config_path.exists() {
        if let Err(e) = config.save_to(&config_path) {
            warn!("Failed to write default config: {e}");
        }
    }

    if config.ai.seed.is_none() {
        config.ai.seed = config.seed;
    }
    let mut rng = config.seed.map_or_else(Rng::new, Rng::with_seed);

    let registry = builtin_registry()?;
    let mut schedule: Vec<&MapDescriptor> = Vec::new();
    for id in &config.maps {
        match registry.get(&MapId::new(id.as_str())) {
            Ok(map) => schedule.push(map),
            Err(e) => warn!("Skipping map: {e}"),
        }
    }

    let mut store = JsonLinesStore::new(&config.history_path);
    let mut opponent = Opponent::create(Vec2::ZERO, config.ai.clone());

    let mut round = RoundNumber::FIRST;
    let (mut ai_total, mut player_total) = (0, 0);
    for _ in 0..config.rounds {
        let map = if schedule.is_empty() {
            registry.for_round(round)
        } else {
            schedule.get((round.raw() as usize - 1) % schedule.len()).copied()
        };
        let Some(map) = map else {
            warn!("No map available for round {round}");
            break;
        };

        let summary = run_round(&config, map, round, &mut opponent, &mut store, &mut rng)?;
        info!(
            "Round {} on {}: {} ticks, {} pickups saved, events [{}]",
            summary.round, summary.map_id, summary.ticks, summary.persisted, summary.events
        );
        ai_total += summary.ai_collected;
        player_total += summary.player_collected;
        round = round.next();
    }

    info!(
        "Final tally after {} rounds: opponent {ai_total}, player {player_total}",
        config.rounds
    );
    info!("Collection history in {}", config.history_path.display());
    Ok(())
}
