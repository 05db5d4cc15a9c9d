use thiserror::Error;

use crate::boid::Boid;
use crate::vector::Vector2D;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SearchError {
    #[error("neighbor ranges must satisfy 0 < protected_range <= visual_range (got {protected} / {visual})")]
    Ranges { visual: f32, protected: f32 },
}

/// What one boid perceives of its flockmates in a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NeighborSummary {
    /// Boids within visual range.
    pub count: u32,
    pub position_sum: Vector2D,
    pub velocity_sum: Vector2D,
    /// Accumulated displacement away from boids inside the protected range.
    pub close: Vector2D,
}

impl NeighborSummary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add_visible(&mut self, other: &Boid) {
        self.count += 1;
        self.position_sum += other.position;
        self.velocity_sum += other.velocity;
    }

    pub fn add_close(&mut self, delta: Vector2D) {
        self.close += delta;
    }

    pub fn average_position(&self) -> Option<Vector2D> {
        (self.count > 0).then(|| self.position_sum / self.count as f32)
    }

    pub fn average_velocity(&self) -> Option<Vector2D> {
        (self.count > 0).then(|| self.velocity_sum / self.count as f32)
    }
}

/// Produces the neighbor summary for one boid from a settled frame.
///
/// Implementations only read `boids`; the flock guarantees the slice is
/// the previous frame and does not change while summaries are built.
pub trait NeighborSearch: Sync {
    fn summarize(&self, index: usize, boids: &[Boid]) -> NeighborSummary;
}

/// Checks every pair. O(n) per boid, fine for a few hundred boids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BruteForce {
    visual_range: f32,
    protected_range: f32,
    visual_sq: f32,
    protected_sq: f32,
}

impl BruteForce {
    pub fn new(visual_range: f32, protected_range: f32) -> Result<Self, SearchError> {
        let valid = visual_range.is_finite()
            && protected_range.is_finite()
            && protected_range > 0.0
            && protected_range <= visual_range;
        if !valid {
            return Err(SearchError::Ranges {
                visual: visual_range,
                protected: protected_range,
            });
        }
        Ok(Self {
            visual_range,
            protected_range,
            visual_sq: visual_range * visual_range,
            protected_sq: protected_range * protected_range,
        })
    }

    pub fn visual_range(&self) -> f32 {
        self.visual_range
    }

    pub fn protected_range(&self) -> f32 {
        self.protected_range
    }
}

impl Default for BruteForce {
    fn default() -> Self {
        Self {
            visual_range: 50.0,
            protected_range: 25.0,
            visual_sq: 2500.0,
            protected_sq: 625.0,
        }
    }
}

impl NeighborSearch for BruteForce {
    fn summarize(&self, index: usize, boids: &[Boid]) -> NeighborSummary {
        let mut summary = NeighborSummary::empty();
        let Some(boid) = boids.get(index) else {
            return summary;
        };

        for (other_index, other) in boids.iter().enumerate() {
            if other_index == index {
                continue;
            }
            let distance_sq = boid.position.distance_squared(&other.position);
            if distance_sq < self.visual_sq {
                if distance_sq < self.protected_sq {
                    summary.add_close(boid.position - other.position);
                }
                summary.add_visible(other);
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boid_at(x: f32, y: f32) -> Boid {
        Boid::new(Vector2D::new(x, y), Vector2D::new(1.0, 0.0))
    }

    #[test]
    fn test_empty_summary_has_no_averages() {
        let summary = NeighborSummary::empty();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average_position(), None);
        assert_eq!(summary.average_velocity(), None);
    }

    #[test]
    fn test_averages() {
        let mut summary = NeighborSummary::empty();
        summary.add_visible(&Boid::new(Vector2D::new(2.0, 4.0), Vector2D::new(1.0, 0.0)));
        summary.add_visible(&Boid::new(Vector2D::new(4.0, 8.0), Vector2D::new(0.0, 1.0)));

        assert_eq!(summary.average_position(), Some(Vector2D::new(3.0, 6.0)));
        assert_eq!(summary.average_velocity(), Some(Vector2D::new(0.5, 0.5)));
    }

    #[test]
    fn test_rejects_bad_ranges() {
        assert_eq!(
            BruteForce::new(10.0, 20.0),
            Err(SearchError::Ranges {
                visual: 10.0,
                protected: 20.0
            })
        );
        assert!(BruteForce::new(10.0, 0.0).is_err());
        assert!(BruteForce::new(f32::INFINITY, 5.0).is_err());
        assert!(BruteForce::new(10.0, 10.0).is_ok());
    }

    #[test]
    fn test_brute_force_classifies_ranges() {
        let search = BruteForce::new(50.0, 25.0).unwrap();
        let boids = [
            boid_at(100.0, 100.0),
            boid_at(110.0, 100.0), // close and visible
            boid_at(100.0, 140.0), // visible only
            boid_at(200.0, 200.0), // out of range
        ];

        let summary = search.summarize(0, &boids);

        assert_eq!(summary.count, 2);
        assert_eq!(summary.position_sum, Vector2D::new(210.0, 240.0));
        assert_eq!(summary.velocity_sum, Vector2D::new(2.0, 0.0));
        assert_eq!(summary.close, Vector2D::new(-10.0, 0.0));
    }

    #[test]
    fn test_brute_force_skips_self() {
        let search = BruteForce::default();
        let boids = [boid_at(0.0, 0.0)];
        assert_eq!(search.summarize(0, &boids), NeighborSummary::empty());
    }

    #[test]
    fn test_range_edges_are_exclusive() {
        let search = BruteForce::new(50.0, 25.0).unwrap();
        let boids = [boid_at(0.0, 0.0), boid_at(25.0, 0.0), boid_at(0.0, 50.0)];

        let summary = search.summarize(0, &boids);

        assert_eq!(summary.count, 1);
        assert_eq!(summary.close, Vector2D::zero());
    }

    #[test]
    fn test_out_of_bounds_index() {
        let search = BruteForce::default();
        assert_eq!(search.summarize(3, &[]), NeighborSummary::empty());
    }
}
