use log::{debug, trace};

use crate::boid::{Boid, Group};
use crate::neighbors::{BruteForce, NeighborSearch};
use crate::params::Params;
use crate::rules::BoidUpdater;
use crate::vector::Vector2D;

/// Writes frame N+1 into `next` from the settled frame N in `current`.
fn settle<S: NeighborSearch>(current: &[Boid], next: &mut [Boid], search: &S, params: &Params) {
    let updater = BoidUpdater::new(params);
    for (index, slot) in next.iter_mut().enumerate() {
        *slot = current[index];
        let summary = search.summarize(index, current);
        updater.update(slot, &summary);
    }
}

#[cfg(feature = "parallel")]
fn settle_parallel<S: NeighborSearch>(
    current: &[Boid],
    next: &mut [Boid],
    search: &S,
    params: &Params,
) {
    use rayon::prelude::*;

    let updater = BoidUpdater::new(params);
    next.par_iter_mut().enumerate().for_each(|(index, slot)| {
        *slot = current[index];
        let summary = search.summarize(index, current);
        updater.update(slot, &summary);
    });
}

/// Aggregate view of one settled frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlockStats {
    pub count: usize,
    pub centroid: Vector2D,
    pub mean_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub scout_right_bias: Option<f32>,
    pub scout_left_bias: Option<f32>,
}

impl FlockStats {
    pub fn from_boids(boids: &[Boid]) -> Self {
        if boids.is_empty() {
            return Self::default();
        }

        let mut position_sum = Vector2D::zero();
        let mut speed_sum = 0.0;
        let mut min_speed = f32::MAX;
        let mut max_speed = 0.0f32;
        let mut right = (0.0, 0u32);
        let mut left = (0.0, 0u32);

        for boid in boids {
            let speed = boid.speed();
            position_sum += boid.position;
            speed_sum += speed;
            min_speed = min_speed.min(speed);
            max_speed = max_speed.max(speed);
            match boid.group() {
                Group::ScoutRight => right = (right.0 + boid.biasval(), right.1 + 1),
                Group::ScoutLeft => left = (left.0 + boid.biasval(), left.1 + 1),
                Group::Normal => {}
            }
        }

        let count = boids.len();
        let mean = |(sum, n): (f32, u32)| (n > 0).then(|| sum / n as f32);
        Self {
            count,
            centroid: position_sum / count as f32,
            mean_speed: speed_sum / count as f32,
            min_speed,
            max_speed,
            scout_right_bias: mean(right),
            scout_left_bias: mean(left),
        }
    }
}

/// A double-buffered flock for embedded (no_std) environments
pub struct Flock<const N: usize, S = BruteForce> {
    current: heapless::Vec<Boid, N>,
    next: heapless::Vec<Boid, N>,
    params: Params,
    search: S,
    frame: u64,
}

impl<const N: usize, S: NeighborSearch> Flock<N, S> {
    pub fn new(params: Params, search: S) -> Self {
        debug!("flock created with capacity {}", N);
        Self {
            current: heapless::Vec::new(),
            next: heapless::Vec::new(),
            params,
            search,
            frame: 0,
        }
    }

    /// Adds a boid, handing it back if the flock is full.
    pub fn add_boid(&mut self, boid: Boid) -> Result<(), Boid> {
        self.current.push(boid)?;
        // Both buffers always hold the same boids, so this push cannot fail.
        self.next.push(boid).ok();
        debug_assert_eq!(self.current.len(), self.next.len());
        Ok(())
    }

    pub fn step(&mut self) {
        settle(&self.current, &mut self.next, &self.search, &self.params);
        core::mem::swap(&mut self.current, &mut self.next);
        self.frame += 1;
        trace!("frame {} settled", self.frame);
    }

    pub fn boids(&self) -> &[Boid] {
        &self.current
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn stats(&self) -> FlockStats {
        FlockStats::from_boids(&self.current)
    }
}

/// A double-buffered flock for std environments
#[cfg(feature = "std")]
pub struct FlockStd<S = BruteForce> {
    current: Vec<Boid>,
    next: Vec<Boid>,
    params: Params,
    search: S,
    frame: u64,
}

#[cfg(feature = "std")]
impl<S: NeighborSearch> FlockStd<S> {
    pub fn new(params: Params, search: S) -> Self {
        Self::with_boids(params, search, Vec::new())
    }

    pub fn with_boids(params: Params, search: S, boids: Vec<Boid>) -> Self {
        debug!("flock created with {} boids", boids.len());
        Self {
            next: boids.clone(),
            current: boids,
            params,
            search,
            frame: 0,
        }
    }

    /// Takes effect from the next call to [`FlockStd::step`].
    pub fn add_boid(&mut self, boid: Boid) {
        self.current.push(boid);
        self.next.push(boid);
    }

    pub fn step(&mut self) {
        #[cfg(feature = "parallel")]
        settle_parallel(&self.current, &mut self.next, &self.search, &self.params);
        #[cfg(not(feature = "parallel"))]
        settle(&self.current, &mut self.next, &self.search, &self.params);

        std::mem::swap(&mut self.current, &mut self.next);
        self.frame += 1;
        trace!("frame {} settled", self.frame);
    }

    pub fn boids(&self) -> &[Boid] {
        &self.current
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn stats(&self) -> FlockStats {
        FlockStats::from_boids(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boid_at(x: f32, y: f32, vx: f32, vy: f32) -> Boid {
        Boid::new(Vector2D::new(x, y), Vector2D::new(vx, vy))
    }

    #[test]
    fn test_flock_reads_settled_frame() {
        let params = Params::default();
        let search = BruteForce::default();
        let start = [boid_at(400.0, 300.0, 3.0, 0.0), boid_at(410.0, 300.0, 0.0, 3.0)];

        let mut flock = FlockStd::with_boids(params, search, start.to_vec());
        flock.step();

        // Each boid must see the other's frame-0 state, regardless of order.
        for (index, boid) in flock.boids().iter().enumerate() {
            let mut expected = start[index];
            expected.update(&search.summarize(index, &start), &params);
            assert_eq!(*boid, expected);
        }
        assert_eq!(flock.frame(), 1);
    }

    #[test]
    fn test_heapless_flock_matches_std_flock() {
        let params = Params::default();
        let start = [
            boid_at(400.0, 300.0, 3.0, 0.0),
            boid_at(420.0, 310.0, -1.0, 2.0),
            boid_at(60.0, 40.0, -2.0, -2.0),
        ];

        let mut embedded = Flock::<8>::new(params, BruteForce::default());
        for boid in start {
            embedded.add_boid(boid).unwrap();
        }
        let mut hosted = FlockStd::with_boids(params, BruteForce::default(), start.to_vec());

        for _ in 0..20 {
            embedded.step();
            hosted.step();
        }

        assert_eq!(embedded.boids(), hosted.boids());
        assert_eq!(embedded.frame(), 20);
    }

    #[test]
    fn test_add_boid_when_full() {
        let mut flock = Flock::<1>::new(Params::default(), BruteForce::default());
        let boid = boid_at(0.0, 0.0, 1.0, 0.0);

        assert!(flock.add_boid(boid).is_ok());
        assert_eq!(flock.add_boid(boid), Err(boid));
        assert_eq!(flock.len(), 1);

        // A rejected add must leave both buffers in step.
        flock.step();
        flock.step();
        assert_eq!(flock.len(), 1);
        let speed = flock.boids()[0].speed();
        assert!(speed >= flock.params().minspeed && speed <= flock.params().maxspeed);
    }

    #[test]
    fn test_std_add_boid() {
        let mut flock = FlockStd::new(Params::default(), BruteForce::default());
        assert!(flock.is_empty());

        flock.add_boid(boid_at(400.0, 300.0, 2.0, 0.0));
        flock.step();

        assert_eq!(flock.len(), 1);
        assert_eq!(flock.boids()[0].position, Vector2D::new(402.0, 300.0));
    }

    #[test]
    fn test_speeds_stay_within_limits() {
        let params = Params::default();
        let boids = (0..30)
            .map(|i| {
                let i = i as f32;
                boid_at(300.0 + i * 7.0, 250.0 + i * 3.0, (i * 0.3) - 4.0, 1.0)
            })
            .collect();
        let mut flock = FlockStd::with_boids(params, BruteForce::default(), boids);

        for _ in 0..100 {
            flock.step();
            for boid in flock.boids() {
                assert!(boid.position.is_finite());
                assert!(boid.speed() >= params.minspeed - 1e-4);
                assert!(boid.speed() <= params.maxspeed + 1e-4);
            }
        }
    }

    #[test]
    fn test_stats() {
        let boids = [
            boid_at(0.0, 0.0, 3.0, 4.0),
            boid_at(10.0, 20.0, 1.0, 0.0),
            Boid::with_group(Vector2D::zero(), Vector2D::new(2.0, 0.0), Group::ScoutRight, 0.004),
            Boid::with_group(Vector2D::new(20.0, 10.0), Vector2D::new(2.0, 0.0), Group::ScoutRight, 0.002),
        ];

        let stats = FlockStats::from_boids(&boids);

        assert_eq!(stats.count, 4);
        assert_eq!(stats.centroid, Vector2D::new(7.5, 7.5));
        assert_eq!(stats.mean_speed, 2.5);
        assert_eq!(stats.min_speed, 1.0);
        assert_eq!(stats.max_speed, 5.0);
        assert!((stats.scout_right_bias.unwrap() - 0.003).abs() < 1e-6);
        assert_eq!(stats.scout_left_bias, None);
    }

    #[test]
    fn test_stats_of_empty_flock() {
        assert_eq!(FlockStats::from_boids(&[]), FlockStats::default());
    }
}
