//! Simulator configuration.
//!
//! Read from `trove.toml` in the working directory, or from the file named
//! by `TROVE_CONFIG`. Missing or unreadable files fall back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use trove_ai::AiConfig;
use trove_store::HISTORY_FILE;

/// Configuration file name.
const CONFIG_FILE: &str = "trove.toml";

/// Environment variable overriding the configuration path.
const CONFIG_ENV: &str = "TROVE_CONFIG";

/// Simulator configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Logging ===
    /// Default tracing directive when `RUST_LOG` is unset
    pub log_directive: String,

    // === Rounds ===
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Number of rounds to play
    pub rounds: u32,
    /// Length of a round in seconds
    pub round_seconds: f32,
    /// Treasures scattered at round start
    pub treasures_per_round: u32,
    /// Distance at which the opponent picks up a treasure, in pixels
    pub pickup_radius: f32,
    /// Seconds between pickups by the scripted player
    pub player_collect_interval: f32,
    /// Seconds between hints offered to the opponent
    pub hint_interval: f32,

    // === Maps ===
    /// Map IDs to cycle through (empty = every built-in map)
    pub maps: Vec<String>,
    /// Seed for treasure placement and the opponent (None = random)
    pub seed: Option<u64>,

    // === Persistence ===
    /// Collection history file
    pub history_path: PathBuf,

    // === Opponent ===
    /// Opponent tuning
    pub ai: AiConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            log_directive: "trove=info".to_string(),

            tick_rate: 60,
            rounds: 3,
            round_seconds: 120.0,
            treasures_per_round: 8,
            pickup_radius: 16.0,
            player_collect_interval: 12.0,
            hint_interval: 20.0,

            maps: Vec::new(),
            seed: None,

            history_path: PathBuf::from(HISTORY_FILE),

            ai: AiConfig::default(),
        }
    }
}

impl SimConfig {
    /// Loads configuration from `TROVE_CONFIG` or the default file.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Loads configuration from a specific path.
    ///
    /// Returns defaults if the file is missing or invalid. The result is
    /// always validated.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        let mut config = if path.exists() {
            match fs::read_to_string(path) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                },
                Err(e) => {
                    warn!("Failed to read config file: {e}");
                    Self::default()
                },
            }
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };

        config.validate();
        config
    }

    /// Saves configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Configuration file path: `TROVE_CONFIG` if set, else `trove.toml`.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV).map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from)
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        if self.log_directive.trim().is_empty() {
            self.log_directive = "trove=info".to_string();
        }

        // Rounds
        self.tick_rate = self.tick_rate.clamp(1, 1000);
        self.rounds = self.rounds.clamp(1, 1000);
        self.round_seconds = self.round_seconds.clamp(1.0, 3600.0);
        self.treasures_per_round = self.treasures_per_round.clamp(1, 1000);
        self.pickup_radius = self.pickup_radius.clamp(1.0, 256.0);
        self.player_collect_interval = self.player_collect_interval.clamp(0.5, 3600.0);
        self.hint_interval = self.hint_interval.clamp(0.5, 3600.0);

        self.ai.validate();
    }

    /// Fixed tick length in seconds.
    #[must_use]
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Ticks in one full round.
    #[must_use]
    pub fn ticks_per_round(&self) -> u32 {
        (self.round_seconds * self.tick_rate as f32).ceil() as u32
    }
}
