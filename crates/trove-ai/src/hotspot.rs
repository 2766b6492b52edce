//! Historical hotspots.
//!
//! Hotspots are past treasure locations the opponent prefers to revisit.
//! On map load a well-spread subset of the history is selected; during play
//! new pickups far from every known hotspot are appended until the cache is
//! full.

use std::collections::HashMap;

use fastrand::Rng;
use glam::Vec2;
use tracing::debug;
use trove_common::MapId;

/// A remembered treasure location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hotspot {
    /// World position
    pub position: Vec2,
    /// Whether it has been targeted since the last wrap-around
    pub visited: bool,
}

impl Hotspot {
    /// Creates an unvisited hotspot.
    #[must_use]
    pub const fn new(position: Vec2) -> Self {
        Self {
            position,
            visited: false,
        }
    }
}

fn centroid(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::ZERO;
    }
    let count = points.len() as f32;
    points.iter().copied().sum::<Vec2>() / count
}

fn quadrant_of(point: Vec2, center: Vec2) -> usize {
    usize::from(point.x >= center.x) | (usize::from(point.y >= center.y) << 1)
}

/// Splits `limit` slots across quadrant sizes.
///
/// Every non-empty quadrant gets one slot, the rest are shared in proportion
/// to size, and rounding leftovers go to the densest quadrants.
fn quadrant_quotas(sizes: [usize; 4], limit: usize) -> [usize; 4] {
    let mut by_density: Vec<usize> = (0..4).filter(|&q| sizes[q] > 0).collect();
    by_density.sort_by(|&a, &b| sizes[b].cmp(&sizes[a]).then(a.cmp(&b)));

    let mut quotas = [0usize; 4];
    if by_density.len() >= limit {
        for &q in by_density.iter().take(limit) {
            quotas[q] = 1;
        }
        return quotas;
    }

    for &q in &by_density {
        quotas[q] = 1;
    }
    let remaining = limit - by_density.len();
    let total: usize = sizes.iter().sum();
    for &q in &by_density {
        let share = remaining * sizes[q] / total;
        quotas[q] = (quotas[q] + share).min(sizes[q]);
    }

    let mut assigned: usize = quotas.iter().sum();
    while assigned < limit {
        let mut progressed = false;
        for &q in &by_density {
            if assigned >= limit {
                break;
            }
            if quotas[q] < sizes[q] {
                quotas[q] += 1;
                assigned += 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
    quotas
}

/// Greedy farthest-point selection over `candidates` (indices into `points`).
///
/// The first pick is the candidate farthest from `anchor`; each later pick
/// maximizes its minimum distance to everything already in `chosen`.
fn farthest_point_fill(
    points: &[Vec2],
    candidates: &[usize],
    anchor: Vec2,
    count: usize,
    chosen: &mut Vec<usize>,
) {
    let mut pool: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|i| !chosen.contains(i))
        .collect();

    for _ in 0..count {
        let best = pool
            .iter()
            .enumerate()
            .map(|(slot, &i)| {
                let spread = if chosen.is_empty() {
                    points[i].distance(anchor)
                } else {
                    chosen
                        .iter()
                        .map(|&c| points[i].distance(points[c]))
                        .fold(f32::INFINITY, f32::min)
                };
                (slot, spread)
            })
            .max_by(|a, b| a.1.total_cmp(&b.1));

        let Some((slot, _)) = best else { break };
        chosen.push(pool.swap_remove(slot));
    }
}

/// Selects a spatially spread subset of `points` of at most `limit` entries.
///
/// The result is shuffled so targeting order differs between runs.
#[must_use]
pub fn select_hotspots(points: &[Vec2], limit: usize, rng: &mut Rng) -> Vec<Vec2> {
    if limit == 0 || points.is_empty() {
        return Vec::new();
    }
    if points.len() <= limit {
        let mut all = points.to_vec();
        rng.shuffle(&mut all);
        return all;
    }

    let center = centroid(points);
    let mut quadrants: [Vec<usize>; 4] = Default::default();
    for (i, &p) in points.iter().enumerate() {
        quadrants[quadrant_of(p, center)].push(i);
    }
    let sizes = [
        quadrants[0].len(),
        quadrants[1].len(),
        quadrants[2].len(),
        quadrants[3].len(),
    ];
    let quotas = quadrant_quotas(sizes, limit);

    let mut chosen: Vec<usize> = Vec::with_capacity(limit);
    for (members, &quota) in quadrants.iter().zip(quotas.iter()) {
        let mut ranked = members.clone();
        ranked.sort_by(|&a, &b| {
            points[b]
                .distance_squared(center)
                .total_cmp(&points[a].distance_squared(center))
                .then(a.cmp(&b))
        });
        chosen.extend(ranked.into_iter().take(quota));
    }

    if chosen.len() < limit {
        let everything: Vec<usize> = (0..points.len()).collect();
        let shortfall = limit - chosen.len();
        farthest_point_fill(points, &everything, center, shortfall, &mut chosen);
    }

    let mut selected: Vec<Vec2> = chosen.into_iter().map(|i| points[i]).collect();
    rng.shuffle(&mut selected);
    selected.truncate(limit);
    debug!(
        "Selected {} hotspots from {} historical points",
        selected.len(),
        points.len()
    );
    selected
}

/// Parameters for [`HotspotCache::pick_best`].
#[derive(Debug, Clone, Copy)]
pub struct PickScoring {
    /// Random jitter added to each distance
    pub jitter: f32,
    /// Dot product above which a candidate counts as "ahead"
    pub alignment_threshold: f32,
    /// Multiplier applied to the score of aligned candidates
    pub alignment_bonus: f32,
    /// Hotspots this close to the agent are skipped
    pub min_distance: f32,
}

/// Per-map hotspot lists.
#[derive(Debug, Clone)]
pub struct HotspotCache {
    maps: HashMap<MapId, Vec<Hotspot>>,
    current: Option<MapId>,
    min_spacing: f32,
    capacity: usize,
}

impl HotspotCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(min_spacing: f32, capacity: usize) -> Self {
        Self {
            maps: HashMap::new(),
            current: None,
            min_spacing,
            capacity,
        }
    }

    /// Replaces the hotspots of `map` and makes it current.
    pub fn rebuild(&mut self, map: MapId, positions: Vec<Vec2>) {
        let mut hotspots: Vec<Hotspot> = positions.into_iter().map(Hotspot::new).collect();
        hotspots.truncate(self.capacity);
        debug!("Hotspot cache for {map} rebuilt with {} entries", hotspots.len());
        self.maps.insert(map.clone(), hotspots);
        self.current = Some(map);
    }

    /// Map whose hotspots are in use.
    #[must_use]
    pub fn current_map(&self) -> Option<&MapId> {
        self.current.as_ref()
    }

    /// Hotspots of the current map.
    #[must_use]
    pub fn hotspots(&self) -> &[Hotspot] {
        self.current
            .as_ref()
            .and_then(|map| self.maps.get(map))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn current_mut(&mut self) -> Option<&mut Vec<Hotspot>> {
        let map = self.current.as_ref()?;
        self.maps.get_mut(map)
    }

    /// Number of hotspots on the current map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hotspots().len()
    }

    /// Returns whether the current map has no hotspots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hotspots().is_empty()
    }

    /// Maximum hotspots per map.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Learns a pickup position.
    ///
    /// Returns true if it was appended. Positions within the spacing radius
    /// of an existing hotspot, or arriving when the cache is full, are
    /// ignored.
    pub fn record_collection(&mut self, position: Vec2) -> bool {
        let spacing = self.min_spacing;
        let capacity = self.capacity;
        let Some(hotspots) = self.current_mut() else {
            return false;
        };
        if hotspots.len() >= capacity {
            return false;
        }
        if hotspots
            .iter()
            .any(|h| h.position.distance(position) <= spacing)
        {
            return false;
        }
        hotspots.push(Hotspot::new(position));
        true
    }

    /// Picks the best unvisited hotspot and marks it visited.
    ///
    /// Lower score wins: distance plus jitter, scaled down when the hotspot
    /// lies along `heading`. When every hotspot is visited the marks are
    /// cleared first. Hotspots within `min_distance` of `from` are never
    /// picked.
    pub fn pick_best(
        &mut self,
        from: Vec2,
        heading: Option<Vec2>,
        scoring: PickScoring,
        rng: &mut Rng,
    ) -> Option<Vec2> {
        let hotspots = self.current_mut()?;
        if hotspots.is_empty() {
            return None;
        }
        if hotspots.iter().all(|h| h.visited) {
            for h in hotspots.iter_mut() {
                h.visited = false;
            }
        }

        let heading = heading.and_then(Vec2::try_normalize);
        let best = hotspots
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.visited && h.position.distance(from) > scoring.min_distance)
            .map(|(i, h)| {
                let offset = h.position - from;
                let mut score = offset.length() + rng.f32() * scoring.jitter;
                if let (Some(heading), Some(dir)) = (heading, offset.try_normalize()) {
                    if heading.dot(dir) > scoring.alignment_threshold {
                        score *= scoring.alignment_bonus;
                    }
                }
                (i, score)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        let hotspot = &mut hotspots[best.0];
        hotspot.visited = true;
        Some(hotspot.position)
    }

    /// Nearest unvisited hotspot within `radius` of `center`, marked visited.
    pub fn take_nearest_unvisited_within(&mut self, center: Vec2, radius: f32) -> Option<Vec2> {
        let hotspots = self.current_mut()?;
        let (index, _) = hotspots
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.visited)
            .map(|(i, h)| (i, h.position.distance(center)))
            .filter(|&(_, d)| d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        let hotspot = &mut hotspots[index];
        hotspot.visited = true;
        Some(hotspot.position)
    }
}
