use log::debug;
use rand::Rng;

use crate::boid::{Boid, Group};
use crate::params::Params;
use crate::vector::Vector2D;

/// How many boids to create, how they split into groups, and where.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationLayout {
    pub boid_count: usize,
    pub scout_right_count: usize,
    pub scout_left_count: usize,
    pub width: f32,
    pub height: f32,
    pub initial_bias: f32,
}

impl Boid {
    /// Uniform position in the arena, velocity components in [-2, 2).
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        width: f32,
        height: f32,
        group: Group,
        biasval: f32,
    ) -> Self {
        let position = Vector2D::new(rng.gen::<f32>() * width, rng.gen::<f32>() * height);
        let velocity = Vector2D::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
        Self::with_group(position, velocity, group, biasval)
    }
}

/// Creates `layout.boid_count` boids: right scouts first, then left scouts,
/// then normal boids.
pub fn spawn_population<R: Rng + ?Sized>(
    rng: &mut R,
    layout: &PopulationLayout,
    params: &Params,
) -> Vec<Boid> {
    let right = layout.scout_right_count.min(layout.boid_count);
    let left = layout.scout_left_count.min(layout.boid_count - right);
    let bias = params.clamp_bias(layout.initial_bias);

    debug!(
        "spawning {} boids ({} right scouts, {} left scouts)",
        layout.boid_count, right, left
    );

    (0..layout.boid_count)
        .map(|i| {
            let (group, biasval) = if i < right {
                (Group::ScoutRight, bias)
            } else if i < right + left {
                (Group::ScoutLeft, bias)
            } else {
                (Group::Normal, 0.0)
            };
            Boid::random(&mut *rng, layout.width, layout.height, group, biasval)
        })
        .collect()
}
