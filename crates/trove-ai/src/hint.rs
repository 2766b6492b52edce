//! Hint matching and the hint-follow sub-state.

use fastrand::Rng;
use glam::Vec2;
use trove_nav::Landmark;

/// Resolves hint text to a landmark by case-insensitive substring match.
///
/// Blank hints match nothing. When several landmark names appear in the
/// hint, the longest name wins so "old tower" beats "tower".
#[must_use]
pub fn match_hint<'a>(hint: &str, landmarks: &'a [Landmark]) -> Option<&'a Landmark> {
    let text = hint.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }
    landmarks
        .iter()
        .filter(|lm| {
            let name = lm.name.trim().to_lowercase();
            !name.is_empty() && text.contains(&name)
        })
        .max_by_key(|lm| lm.name.trim().len())
}

/// Uniform random point inside a disc.
#[must_use]
pub fn random_point_in_disc(center: Vec2, radius: f32, rng: &mut Rng) -> Vec2 {
    let r = radius.max(0.0) * rng.f32().sqrt();
    let angle = rng.f32() * std::f32::consts::TAU;
    center + Vec2::from_angle(angle) * r
}

/// Progress of following one hint.
#[derive(Debug, Clone)]
pub struct HintFollow {
    landmark: Landmark,
    elapsed: f32,
    arrived: bool,
    search_elapsed: f32,
    since_pick: f32,
    since_travel: f32,
}

impl HintFollow {
    /// Starts following `landmark`.
    #[must_use]
    pub fn new(landmark: Landmark) -> Self {
        Self {
            landmark,
            elapsed: 0.0,
            arrived: false,
            search_elapsed: 0.0,
            since_pick: 0.0,
            since_travel: f32::INFINITY,
        }
    }

    /// The landmark being followed.
    #[must_use]
    pub const fn landmark(&self) -> &Landmark {
        &self.landmark
    }

    /// Seconds since the hint was accepted.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Whether the landmark has been reached and the search has begun.
    #[must_use]
    pub const fn arrived(&self) -> bool {
        self.arrived
    }

    /// Current search radius around the landmark.
    #[must_use]
    pub fn search_radius(&self, growth_rate: f32, cap: f32) -> f32 {
        (self.landmark.radius + growth_rate * self.search_elapsed).min(cap)
    }

    pub(crate) fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.arrived {
            self.search_elapsed += dt;
            self.since_pick += dt;
        } else {
            self.since_travel += dt;
        }
    }

    pub(crate) fn mark_arrived(&mut self) {
        self.arrived = true;
        self.search_elapsed = 0.0;
        // Forces an immediate first search pick.
        self.since_pick = f32::INFINITY;
    }

    /// Returns true (and restarts the interval) when the landmark may be
    /// targeted again after the route to it was lost.
    pub(crate) fn take_travel_retry(&mut self, interval: f32) -> bool {
        if self.since_travel >= interval {
            self.since_travel = 0.0;
            return true;
        }
        false
    }

    /// Returns true (and restarts the interval) when a search pick is due.
    pub(crate) fn take_search_pick(&mut self, interval: f32, target_missing: bool) -> bool {
        if self.since_pick >= interval || target_missing {
            self.since_pick = 0.0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landmarks() -> Vec<Landmark> {
        vec![
            Landmark::new("Tower", Vec2::new(10.0, 10.0), 50.0),
            Landmark::new("Old_Tower", Vec2::new(500.0, 500.0), 100.0),
            Landmark::new("Well", Vec2::new(900.0, 100.0), 40.0),
        ]
    }

    #[test]
    fn test_match_case_insensitive() {
        let lms = landmarks();
        let lm = match_hint("chest near old_tower", &lms).expect("match");
        assert_eq!(lm.name, "Old_Tower");
        assert_eq!(lm.position, Vec2::new(500.0, 500.0));
    }

    #[test]
    fn test_match_shorter_name() {
        let lms = landmarks();
        assert_eq!(match_hint("by the WELL", &lms).map(|l| l.name.as_str()), Some("Well"));
        assert_eq!(match_hint("tower top", &lms).map(|l| l.name.as_str()), Some("Tower"));
    }

    #[test]
    fn test_no_match() {
        let lms = landmarks();
        assert!(match_hint("", &lms).is_none());
        assert!(match_hint("   ", &lms).is_none());
        assert!(match_hint("under the bridge", &lms).is_none());
        assert!(match_hint("old_tower", &[]).is_none());
    }

    #[test]
    fn test_disc_points_inside() {
        let mut rng = Rng::with_seed(9);
        let center = Vec2::new(100.0, -50.0);
        for _ in 0..500 {
            let p = random_point_in_disc(center, 30.0, &mut rng);
            assert!(p.distance(center) <= 30.0 + 1e-3);
        }
    }

    #[test]
    fn test_search_radius_grows_to_cap() {
        let mut follow = HintFollow::new(Landmark::new("x", Vec2::ZERO, 100.0));
        follow.tick(5.0);
        // Before arrival the search clock does not run.
        assert!((follow.search_radius(20.0, 320.0) - 100.0).abs() < f32::EPSILON);

        follow.mark_arrived();
        follow.tick(5.0);
        assert!((follow.search_radius(20.0, 320.0) - 200.0).abs() < f32::EPSILON);
        follow.tick(100.0);
        assert!((follow.search_radius(20.0, 320.0) - 320.0).abs() < f32::EPSILON);
        assert!((follow.elapsed() - 110.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_search_pick_interval() {
        let mut follow = HintFollow::new(Landmark::new("x", Vec2::ZERO, 10.0));
        follow.mark_arrived();
        assert!(follow.take_search_pick(3.0, false));
        assert!(!follow.take_search_pick(3.0, false));
        follow.tick(3.0);
        assert!(follow.take_search_pick(3.0, false));
        assert!(follow.take_search_pick(3.0, true));
    }

    #[test]
    fn test_travel_retry_interval() {
        let mut follow = HintFollow::new(Landmark::new("x", Vec2::ZERO, 10.0));
        assert!(follow.take_travel_retry(3.0));
        assert!(!follow.take_travel_retry(3.0));
        follow.tick(3.0);
        assert!(follow.take_travel_retry(3.0));
    }
}
