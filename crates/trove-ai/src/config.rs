//! Opponent tuning parameters.
//!
//! Every threshold, timer, and probability the opponent uses lives here so
//! it can be tuned from a config file.

use serde::{Deserialize, Serialize};

/// Opponent configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    // === Movement ===
    /// Base movement speed in pixels per second
    pub base_speed: f32,
    /// Speed multiplier while boosted
    pub boost_multiplier: f32,
    /// Boost length in seconds
    pub boost_duration: f32,
    /// Distance at which a path node counts as reached, in pixels
    pub node_tolerance: f32,
    /// Distance kept from the map edge, in tiles
    pub edge_margin_tiles: f32,
    /// Time a new facing must persist before it is committed, in seconds
    pub direction_confirm_time: f32,
    /// Ticks that must pass after a facing change before a reversal
    pub min_reverse_steps: u32,
    /// Bounding radius of the agent in pixels
    pub agent_radius: f32,

    // === Navigation ===
    /// Time without progress before stuck recovery, in seconds
    pub stuck_threshold: f32,
    /// Periodic re-plan interval while a target is active, in seconds
    pub path_refresh_interval: f32,
    /// Consecutive stuck recoveries before a fully random target
    pub max_repath_attempts: u32,

    // === Target policy ===
    /// Probability that a new hint is acted on
    pub hint_follow_chance: f32,
    /// Probability of targeting a hotspot when free
    pub hotspot_weight: f32,
    /// Probability of a second hotspot attempt before roaming
    pub fallback_hotspot_chance: f32,
    /// Shortest roam period in seconds
    pub roam_min_duration: f32,
    /// Longest roam period in seconds (exclusive)
    pub roam_max_duration: f32,
    /// Time a hint is followed before it is abandoned, in seconds
    pub hint_follow_duration: f32,
    /// Distance from a landmark that counts as arrival, in pixels
    pub landmark_arrival_radius: f32,
    /// Time between search picks around a landmark, in seconds
    pub search_interval: f32,
    /// Search radius growth in pixels per second
    pub search_growth_rate: f32,
    /// Largest search radius in pixels
    pub search_radius_cap: f32,

    // === Hotspots ===
    /// Minimum spacing between hotspots, in pixels
    pub hotspot_radius: f32,
    /// Maximum number of hotspots kept per map
    pub max_cached_locations: usize,
    /// Number of hotspots selected from history on map load
    pub hotspot_limit: usize,
    /// Random score jitter added to hotspot distances, in pixels
    pub hotspot_jitter: f32,
    /// Dot product above which a hotspot counts as "ahead"
    pub alignment_threshold: f32,
    /// Score multiplier for hotspots ahead of the current heading
    pub alignment_bonus: f32,

    // === Misc ===
    /// Seed for the opponent's RNG (None = random)
    pub seed: Option<u64>,
    /// Capacity of the opponent's event bus
    pub event_capacity: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            // Movement
            base_speed: 120.0,
            boost_multiplier: 1.5,
            boost_duration: 5.0,
            node_tolerance: 5.0,
            edge_margin_tiles: 1.0,
            direction_confirm_time: 0.1,
            min_reverse_steps: 4,
            agent_radius: 12.0,

            // Navigation
            stuck_threshold: 1.0,
            path_refresh_interval: 1.5,
            max_repath_attempts: 3,

            // Target policy
            hint_follow_chance: 0.9,
            hotspot_weight: 0.9,
            fallback_hotspot_chance: 0.5,
            roam_min_duration: 5.0,
            roam_max_duration: 15.0,
            hint_follow_duration: 30.0,
            landmark_arrival_radius: 48.0,
            search_interval: 3.0,
            search_growth_rate: 20.0,
            search_radius_cap: 320.0,

            // Hotspots
            hotspot_radius: 150.0,
            max_cached_locations: 50,
            hotspot_limit: 20,
            hotspot_jitter: 50.0,
            alignment_threshold: 0.7,
            alignment_bonus: 0.8,

            // Misc
            seed: None,
            event_capacity: 256,
        }
    }
}

impl AiConfig {
    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Movement
        self.base_speed = self.base_speed.clamp(1.0, 2000.0);
        self.boost_multiplier = self.boost_multiplier.clamp(1.0, 5.0);
        self.boost_duration = self.boost_duration.clamp(0.0, 120.0);
        self.node_tolerance = self.node_tolerance.clamp(0.5, 64.0);
        self.edge_margin_tiles = self.edge_margin_tiles.clamp(0.0, 4.0);
        self.direction_confirm_time = self.direction_confirm_time.clamp(0.0, 2.0);
        self.min_reverse_steps = self.min_reverse_steps.min(120);
        self.agent_radius = self.agent_radius.clamp(0.0, 256.0);

        // Navigation
        self.stuck_threshold = self.stuck_threshold.clamp(0.1, 30.0);
        self.path_refresh_interval = self.path_refresh_interval.clamp(0.1, 60.0);
        self.max_repath_attempts = self.max_repath_attempts.clamp(1, 100);

        // Target policy
        self.hint_follow_chance = self.hint_follow_chance.clamp(0.0, 1.0);
        self.hotspot_weight = self.hotspot_weight.clamp(0.0, 1.0);
        self.fallback_hotspot_chance = self.fallback_hotspot_chance.clamp(0.0, 1.0);
        self.roam_min_duration = self.roam_min_duration.clamp(0.0, 600.0);
        self.roam_max_duration = self.roam_max_duration.clamp(self.roam_min_duration, 600.0);
        self.hint_follow_duration = self.hint_follow_duration.clamp(1.0, 600.0);
        self.landmark_arrival_radius = self.landmark_arrival_radius.clamp(1.0, 1024.0);
        self.search_interval = self.search_interval.clamp(0.1, 60.0);
        self.search_growth_rate = self.search_growth_rate.clamp(0.0, 1000.0);
        self.search_radius_cap = self.search_radius_cap.clamp(1.0, 10_000.0);

        // Hotspots
        self.hotspot_radius = self.hotspot_radius.clamp(0.0, 10_000.0);
        self.max_cached_locations = self.max_cached_locations.clamp(1, 10_000);
        self.hotspot_limit = self.hotspot_limit.clamp(1, self.max_cached_locations);
        self.hotspot_jitter = self.hotspot_jitter.clamp(0.0, 10_000.0);
        self.alignment_threshold = self.alignment_threshold.clamp(-1.0, 1.0);
        self.alignment_bonus = self.alignment_bonus.clamp(0.0, 1.0);

        self.event_capacity = self.event_capacity.clamp(1, 65_536);
    }
}
