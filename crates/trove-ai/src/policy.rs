//! Target policy: decides where the opponent wants to go.
//!
//! Evaluated once per tick, before the motion controller. Priority order:
//!
//! 1. Continue an active hint-follow (travel to the landmark, then search
//!    an expanding disc around it).
//! 2. Accept a newly offered hint that names a known landmark.
//! 3. Hold a running roam period.
//! 4. When free, pick a historical hotspot (weighted chance), then a second
//!    hotspot attempt, otherwise start a timed roam.

use fastrand::Rng;
use glam::Vec2;
use tracing::{debug, info};
use trove_common::MapId;
use trove_nav::Landmark;

use crate::agent::{AiMode, Steerable};
use crate::config::AiConfig;
use crate::events::{AiEvent, AiEventBus};
use crate::hint::{match_hint, random_point_in_disc, HintFollow};
use crate::hotspot::{HotspotCache, PickScoring};

/// What the policy decided this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolicyOutcome {
    /// Leave the current target alone
    Keep,
    /// Switch to a new target
    Retarget {
        /// Target position
        target: Vec2,
        /// Mode to enter
        mode: AiMode,
    },
    /// A roam period started; the motion controller picks roam targets
    Roam,
    /// A roam period ended; exploration resumes
    Explore,
}

impl PolicyOutcome {
    /// Whether a concrete target was produced.
    #[must_use]
    pub const fn target_updated(&self) -> bool {
        matches!(self, Self::Retarget { .. })
    }
}

/// Layered target selection with hint, hotspot, and roam state.
#[derive(Debug, Clone)]
pub struct TargetPolicy {
    config: AiConfig,
    hotspots: HotspotCache,
    pending_hint: Option<String>,
    follow: Option<HintFollow>,
    roam_remaining: f32,
    last_pick: Option<(Vec2, Vec2)>,
}

impl TargetPolicy {
    /// Creates a policy with an empty hotspot cache.
    #[must_use]
    pub fn new(config: &AiConfig) -> Self {
        Self {
            config: config.clone(),
            hotspots: HotspotCache::new(config.hotspot_radius, config.max_cached_locations),
            pending_hint: None,
            follow: None,
            roam_remaining: 0.0,
            last_pick: None,
        }
    }

    /// Hotspot cache.
    #[must_use]
    pub const fn hotspots(&self) -> &HotspotCache {
        &self.hotspots
    }

    /// Replaces the hotspots for `map`.
    pub fn rebuild_hotspots(&mut self, map: MapId, positions: Vec<Vec2>) {
        self.hotspots.rebuild(map, positions);
    }

    /// Queues a hint for the next evaluation. Replaces any unprocessed hint.
    pub fn offer_hint(&mut self, hint: impl Into<String>) {
        self.pending_hint = Some(hint.into());
    }

    /// Hint waiting to be processed.
    #[must_use]
    pub fn pending_hint(&self) -> Option<&str> {
        self.pending_hint.as_deref()
    }

    /// Active hint-follow state.
    #[must_use]
    pub const fn follow(&self) -> Option<&HintFollow> {
        self.follow.as_ref()
    }

    /// Whether a roam period is running.
    #[must_use]
    pub fn is_roaming(&self) -> bool {
        self.roam_remaining > 0.0
    }

    /// Drops hint, follow, and roam state. Hotspots are kept.
    pub fn reset_round(&mut self) {
        self.pending_hint = None;
        self.follow = None;
        self.roam_remaining = 0.0;
        self.last_pick = None;
    }

    /// Learns a pickup and ends any hint-follow.
    pub fn on_treasure_collected(&mut self, position: Vec2, bus: &AiEventBus) {
        if self.hotspots.record_collection(position) {
            debug!("New hotspot at ({:.0}, {:.0})", position.x, position.y);
            bus.publish(AiEvent::HotspotAdded { position });
        }
        self.follow = None;
    }

    /// Runs the priority cascade for one tick.
    pub fn evaluate<S: Steerable>(
        &mut self,
        dt: f32,
        agent: &S,
        current_target: Option<Vec2>,
        landmarks: &[Landmark],
        rng: &mut Rng,
        bus: &AiEventBus,
    ) -> PolicyOutcome {
        let mut force_pick = false;

        if let Some(follow) = self.follow.as_mut() {
            follow.tick(dt);
            if follow.elapsed() < self.config.hint_follow_duration {
                return self.continue_follow(agent, current_target, rng);
            }
            let landmark = follow.landmark().name.clone();
            info!(
                "Abandoning hint for {landmark} after {:.1}s",
                follow.elapsed()
            );
            bus.publish(AiEvent::HintAbandoned { landmark });
            self.follow = None;
            force_pick = true;
        }

        if let Some(hint) = self.pending_hint.take() {
            if self.listens(&hint, rng) {
                match self.follow_hint(&hint, agent.position(), landmarks, bus) {
                    Some(outcome) => return outcome,
                    None => force_pick = true,
                }
            }
        }

        if self.roam_remaining > 0.0 {
            self.roam_remaining -= dt;
            if self.roam_remaining > 0.0 {
                return PolicyOutcome::Keep;
            }
            debug!("Roam period over, exploring");
            return PolicyOutcome::Explore;
        }

        if current_target.is_some() && !force_pick {
            return PolicyOutcome::Keep;
        }

        if rng.f32() < self.config.hotspot_weight {
            if let Some(outcome) = self.pick_hotspot(agent, rng) {
                return outcome;
            }
        }
        if rng.f32() < self.config.fallback_hotspot_chance {
            if let Some(outcome) = self.pick_hotspot(agent, rng) {
                return outcome;
            }
        }

        self.roam_remaining = if self.config.roam_max_duration > self.config.roam_min_duration {
            self.config.roam_min_duration
                + rng.f32() * (self.config.roam_max_duration - self.config.roam_min_duration)
        } else {
            self.config.roam_min_duration
        };
        debug!("Roaming for {:.1}s", self.roam_remaining);
        PolicyOutcome::Roam
    }

    /// Processes a hint right away.
    ///
    /// Returns `None` when the hint is ignored (lost the follow roll, blank,
    /// or naming no landmark). The pending hint, if any, is left untouched.
    pub fn process_hint(
        &mut self,
        hint: &str,
        position: Vec2,
        landmarks: &[Landmark],
        rng: &mut Rng,
        bus: &AiEventBus,
    ) -> Option<PolicyOutcome> {
        if !self.listens(hint, rng) {
            return None;
        }
        self.follow_hint(hint, position, landmarks, bus)
    }

    /// Rolls whether a hint is acted on at all.
    fn listens(&self, hint: &str, rng: &mut Rng) -> bool {
        if rng.f32() < self.config.hint_follow_chance {
            return true;
        }
        debug!("Ignoring hint {hint:?}");
        false
    }

    fn follow_hint(
        &mut self,
        hint: &str,
        position: Vec2,
        landmarks: &[Landmark],
        bus: &AiEventBus,
    ) -> Option<PolicyOutcome> {
        let Some(landmark) = match_hint(hint, landmarks) else {
            debug!("Hint {hint:?} names no known landmark");
            return None;
        };

        info!("Following hint toward {}", landmark.name);
        bus.publish(AiEvent::HintMatched {
            landmark: landmark.name.clone(),
        });
        let target = landmark.position;
        self.follow = Some(HintFollow::new(landmark.clone()));
        self.roam_remaining = 0.0;
        self.last_pick = Some((position, target));
        Some(PolicyOutcome::Retarget {
            target,
            mode: AiMode::Seeking,
        })
    }

    fn continue_follow<S: Steerable>(
        &mut self,
        agent: &S,
        current_target: Option<Vec2>,
        rng: &mut Rng,
    ) -> PolicyOutcome {
        let Some(follow) = self.follow.as_mut() else {
            return PolicyOutcome::Keep;
        };
        let position = agent.position();
        let center = follow.landmark().position;

        if !follow.arrived() {
            let reach = self.config.landmark_arrival_radius + agent.bounding_radius();
            if position.distance(center) > reach {
                // Lost the route (unreachable or stuck recovery): head back.
                if current_target != Some(center)
                    && follow.take_travel_retry(self.config.search_interval)
                {
                    debug!("Resuming travel to {}", follow.landmark().name);
                    self.last_pick = Some((position, center));
                    return PolicyOutcome::Retarget {
                        target: center,
                        mode: AiMode::Seeking,
                    };
                }
                return PolicyOutcome::Keep;
            }
            debug!("Reached {}, searching", follow.landmark().name);
            follow.mark_arrived();
        }

        if !follow.take_search_pick(self.config.search_interval, current_target.is_none()) {
            return PolicyOutcome::Keep;
        }
        let radius = follow.search_radius(self.config.search_growth_rate, self.config.search_radius_cap);
        let target = self
            .hotspots
            .take_nearest_unvisited_within(center, radius)
            .unwrap_or_else(|| random_point_in_disc(center, radius, rng));

        self.last_pick = Some((position, target));
        PolicyOutcome::Retarget {
            target,
            mode: AiMode::Seeking,
        }
    }

    fn heading<S: Steerable>(&self, agent: &S) -> Option<Vec2> {
        self.last_pick
            .and_then(|(from, to)| (to - from).try_normalize())
            .or_else(|| agent.linear_velocity().try_normalize())
    }

    fn pick_hotspot<S: Steerable>(&mut self, agent: &S, rng: &mut Rng) -> Option<PolicyOutcome> {
        let position = agent.position();
        let heading = self.heading(agent);
        let scoring = PickScoring {
            jitter: self.config.hotspot_jitter,
            alignment_threshold: self.config.alignment_threshold,
            alignment_bonus: self.config.alignment_bonus,
            min_distance: agent.bounding_radius(),
        };
        let target = self.hotspots.pick_best(position, heading, scoring, rng)?;
        debug!("Targeting hotspot ({:.0}, {:.0})", target.x, target.y);
        self.last_pick = Some((position, target));
        self.roam_remaining = 0.0;
        Some(PolicyOutcome::Retarget {
            target,
            mode: AiMode::Seeking,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        position: Vec2,
    }

    impl Steerable for Probe {
        fn position(&self) -> Vec2 {
            self.position
        }

        fn linear_velocity(&self) -> Vec2 {
            Vec2::ZERO
        }

        fn bounding_radius(&self) -> f32 {
            10.0
        }
    }

    fn config() -> AiConfig {
        AiConfig {
            hint_follow_chance: 1.0,
            hotspot_weight: 1.0,
            hotspot_jitter: 0.0,
            ..AiConfig::default()
        }
    }

    fn landmarks() -> Vec<Landmark> {
        vec![Landmark::new("Old_Tower", Vec2::new(500.0, 500.0), 100.0)]
    }

    #[test]
    fn test_hint_match_seeks_landmark() {
        let mut policy = TargetPolicy::new(&config());
        let bus = AiEventBus::default();
        let mut rng = Rng::with_seed(1);
        let probe = Probe { position: Vec2::ZERO };

        policy.offer_hint("chest near old_tower");
        let outcome = policy.evaluate(0.1, &probe, None, &landmarks(), &mut rng, &bus);
        assert_eq!(
            outcome,
            PolicyOutcome::Retarget {
                target: Vec2::new(500.0, 500.0),
                mode: AiMode::Seeking,
            }
        );
        assert!(policy.follow().is_some());
        assert!(policy.pending_hint().is_none());
        assert_eq!(
            bus.drain(),
            vec![AiEvent::HintMatched {
                landmark: "Old_Tower".to_string()
            }]
        );
    }

    #[test]
    fn test_ignored_hint_is_consumed() {
        let mut policy = TargetPolicy::new(&AiConfig {
            hint_follow_chance: 0.0,
            ..config()
        });
        let bus = AiEventBus::default();
        let mut rng = Rng::with_seed(2);
        let probe = Probe { position: Vec2::ZERO };

        policy.offer_hint("chest near old_tower");
        let outcome = policy.evaluate(0.1, &probe, Some(Vec2::ONE), &landmarks(), &mut rng, &bus);
        assert_eq!(outcome, PolicyOutcome::Keep);
        assert!(policy.follow().is_none());
        assert!(policy.pending_hint().is_none());
    }

    #[test]
    fn test_no_hotspots_roams() {
        let mut policy = TargetPolicy::new(&config());
        let bus = AiEventBus::default();
        let mut rng = Rng::with_seed(3);
        let probe = Probe { position: Vec2::ZERO };

        let outcome = policy.evaluate(0.1, &probe, None, &[], &mut rng, &bus);
        assert_eq!(outcome, PolicyOutcome::Roam);
        assert!(policy.is_roaming());
        // Still roaming on the next tick, even without a target.
        assert_eq!(
            policy.evaluate(0.1, &probe, None, &[], &mut rng, &bus),
            PolicyOutcome::Keep
        );
    }

    #[test]
    fn test_roam_expires_to_explore() {
        let mut policy = TargetPolicy::new(&AiConfig {
            roam_min_duration: 1.0,
            roam_max_duration: 1.0,
            ..config()
        });
        let bus = AiEventBus::default();
        let mut rng = Rng::with_seed(4);
        let probe = Probe { position: Vec2::ZERO };

        assert_eq!(
            policy.evaluate(0.5, &probe, None, &[], &mut rng, &bus),
            PolicyOutcome::Roam
        );
        assert_eq!(
            policy.evaluate(0.5, &probe, None, &[], &mut rng, &bus),
            PolicyOutcome::Keep
        );
        assert_eq!(
            policy.evaluate(0.5, &probe, None, &[], &mut rng, &bus),
            PolicyOutcome::Explore
        );
    }

    #[test]
    fn test_hotspot_pick_when_free() {
        let mut policy = TargetPolicy::new(&config());
        policy.rebuild_hotspots(MapId::new("m"), vec![Vec2::new(300.0, 0.0)]);
        let bus = AiEventBus::default();
        let mut rng = Rng::with_seed(5);
        let probe = Probe { position: Vec2::ZERO };

        assert_eq!(
            policy.evaluate(0.1, &probe, None, &[], &mut rng, &bus),
            PolicyOutcome::Retarget {
                target: Vec2::new(300.0, 0.0),
                mode: AiMode::Seeking,
            }
        );
        // Busy with a target: nothing changes.
        assert_eq!(
            policy.evaluate(0.1, &probe, Some(Vec2::new(300.0, 0.0)), &[], &mut rng, &bus),
            PolicyOutcome::Keep
        );
    }

    #[test]
    fn test_unmatched_hint_falls_back_to_hotspot() {
        let mut policy = TargetPolicy::new(&config());
        policy.rebuild_hotspots(MapId::new("m"), vec![Vec2::new(300.0, 0.0)]);
        let bus = AiEventBus::default();
        let mut rng = Rng::with_seed(6);
        let probe = Probe { position: Vec2::ZERO };

        policy.offer_hint("somewhere by the lighthouse");
        let outcome = policy.evaluate(0.1, &probe, Some(Vec2::ONE), &landmarks(), &mut rng, &bus);
        assert_eq!(
            outcome,
            PolicyOutcome::Retarget {
                target: Vec2::new(300.0, 0.0),
                mode: AiMode::Seeking,
            }
        );
    }

    #[test]
    fn test_follow_search_after_arrival() {
        let mut policy = TargetPolicy::new(&config());
        let bus = AiEventBus::default();
        let mut rng = Rng::with_seed(7);
        let lms = landmarks();

        policy.offer_hint("old_tower");
        let far = Probe { position: Vec2::ZERO };
        policy.evaluate(0.1, &far, None, &lms, &mut rng, &bus);

        // Still travelling.
        assert_eq!(
            policy.evaluate(0.1, &far, Some(Vec2::new(500.0, 500.0)), &lms, &mut rng, &bus),
            PolicyOutcome::Keep
        );

        // At the landmark a search pick lands inside the initial radius.
        let near = Probe {
            position: Vec2::new(505.0, 500.0),
        };
        let outcome = policy.evaluate(0.1, &near, Some(Vec2::new(500.0, 500.0)), &lms, &mut rng, &bus);
        let PolicyOutcome::Retarget { target, mode } = outcome else {
            panic!("expected a search target, got {outcome:?}");
        };
        assert_eq!(mode, AiMode::Seeking);
        assert!(target.distance(Vec2::new(500.0, 500.0)) <= 100.0 + 1e-3);
        assert!(policy.follow().is_some_and(HintFollow::arrived));
    }

    #[test]
    fn test_follow_without_target_heads_back_to_landmark() {
        let mut policy = TargetPolicy::new(&config());
        let bus = AiEventBus::default();
        let mut rng = Rng::with_seed(9);
        let lms = landmarks();
        let far = Probe { position: Vec2::ZERO };
        let landmark = PolicyOutcome::Retarget {
            target: Vec2::new(500.0, 500.0),
            mode: AiMode::Seeking,
        };

        policy.offer_hint("old_tower");
        assert_eq!(policy.evaluate(0.1, &far, None, &lms, &mut rng, &bus), landmark);

        // Target dropped far from the landmark: no search yet, travel resumes.
        assert_eq!(policy.evaluate(0.1, &far, None, &lms, &mut rng, &bus), landmark);
        assert!(policy.follow().is_some_and(|f| !f.arrived()));

        // Retries wait for the search interval.
        assert_eq!(
            policy.evaluate(0.1, &far, None, &lms, &mut rng, &bus),
            PolicyOutcome::Keep
        );
        assert_eq!(policy.evaluate(3.0, &far, None, &lms, &mut rng, &bus), landmark);
        assert!(policy.follow().is_some_and(|f| !f.arrived()));
    }

    #[test]
    fn test_follow_overrides_recovery_target() {
        let mut policy = TargetPolicy::new(&config());
        let bus = AiEventBus::default();
        let mut rng = Rng::with_seed(10);
        let lms = landmarks();
        let far = Probe {
            position: Vec2::new(40.0, 40.0),
        };

        policy.offer_hint("old_tower");
        policy.evaluate(0.1, &far, None, &lms, &mut rng, &bus);

        // Stuck recovery swapped in an exploration target mid-travel.
        let detour = Some(Vec2::new(80.0, 300.0));
        assert_eq!(
            policy.evaluate(0.1, &far, detour, &lms, &mut rng, &bus),
            PolicyOutcome::Retarget {
                target: Vec2::new(500.0, 500.0),
                mode: AiMode::Seeking,
            }
        );
        assert!(policy.follow().is_some_and(|f| !f.arrived()));
    }

    #[test]
    fn test_follow_search_prefers_hotspot_in_radius() {
        let mut policy = TargetPolicy::new(&config());
        policy.rebuild_hotspots(MapId::new("m"), vec![Vec2::new(540.0, 500.0)]);
        let bus = AiEventBus::default();
        let mut rng = Rng::with_seed(8);
        let lms = landmarks();
        let near = Probe {
            position: Vec2::new(500.0, 500.0),
        };

        policy.offer_hint("old_tower");
        policy.evaluate(0.1, &near, None, &lms, &mut rng, &bus);
        let outcome = policy.evaluate(0.1, &near, Some(Vec2::new(500.0, 500.0)), &lms, &mut rng, &bus);
        assert_eq!(
            outcome,
            PolicyOutcome::Retarget {
                target: Vec2::new(540.0, 500.0),
                mode: AiMode::Seeking,
            }
        );
    }

    #[test]
    fn test_follow_times_out() {
        let mut policy = TargetPolicy::new(&AiConfig {
            hint_follow_duration: 1.0,
            ..config()
        });
        policy.rebuild_hotspots(MapId::new("m"), vec![Vec2::new(300.0, 0.0)]);
        let bus = AiEventBus::default();
        let mut rng = Rng::with_seed(9);
        let lms = landmarks();
        let probe = Probe { position: Vec2::ZERO };

        policy.offer_hint("old_tower");
        policy.evaluate(0.1, &probe, None, &lms, &mut rng, &bus);
        bus.drain();

        let outcome = policy.evaluate(2.0, &probe, Some(Vec2::new(500.0, 500.0)), &lms, &mut rng, &bus);
        assert!(policy.follow().is_none());
        assert_eq!(
            outcome,
            PolicyOutcome::Retarget {
                target: Vec2::new(300.0, 0.0),
                mode: AiMode::Seeking,
            }
        );
        assert!(bus.drain().contains(&AiEvent::HintAbandoned {
            landmark: "Old_Tower".to_string()
        }));
    }

    #[test]
    fn test_collection_ends_follow_and_learns_hotspot() {
        let mut policy = TargetPolicy::new(&config());
        policy.rebuild_hotspots(MapId::new("m"), Vec::new());
        let bus = AiEventBus::default();
        let mut rng = Rng::with_seed(10);
        let probe = Probe { position: Vec2::ZERO };

        policy.offer_hint("old_tower");
        policy.evaluate(0.1, &probe, None, &landmarks(), &mut rng, &bus);
        bus.drain();

        policy.on_treasure_collected(Vec2::new(480.0, 520.0), &bus);
        assert!(policy.follow().is_none());
        assert_eq!(policy.hotspots().len(), 1);
        assert_eq!(
            bus.drain(),
            vec![AiEvent::HotspotAdded {
                position: Vec2::new(480.0, 520.0)
            }]
        );
    }
}
