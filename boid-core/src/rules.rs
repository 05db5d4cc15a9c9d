//! The per-boid update rule.
//!
//! Each stage reads the velocity left by the previous one, so they must
//! run in the order [`BoidUpdater::update`] calls them.

use log::trace;

use crate::boid::Boid;
use crate::neighbors::NeighborSummary;
use crate::params::Params;
use crate::vector::Vector2D;

/// Applies the flocking rule to one boid at a time with shared parameters.
#[derive(Debug, Clone, Copy)]
pub struct BoidUpdater<'a> {
    params: &'a Params,
}

impl<'a> BoidUpdater<'a> {
    pub fn new(params: &'a Params) -> Self {
        debug_assert!(params.validate().is_ok(), "invalid params: {params:?}");
        Self { params }
    }

    pub fn params(&self) -> &'a Params {
        self.params
    }

    /// Computes the boid's velocity and position for the next frame.
    pub fn update(&self, boid: &mut Boid, neighbors: &NeighborSummary) {
        let params = self.params;
        let heading = boid.velocity;

        cohesion_alignment(boid, neighbors, params);
        separation(boid, neighbors, params);
        turn_at_margins(boid, params);
        adapt_bias(boid, params);
        apply_bias(boid);
        clamp_speed(boid, heading, params);
        integrate(boid);
    }
}

/// Steers toward the neighbors' average position and velocity.
pub fn cohesion_alignment(boid: &mut Boid, neighbors: &NeighborSummary, params: &Params) {
    let (Some(avg_position), Some(avg_velocity)) =
        (neighbors.average_position(), neighbors.average_velocity())
    else {
        return;
    };

    let velocity = boid.velocity;
    boid.velocity = velocity
        + (avg_position - boid.position) * params.centering_factor
        + (avg_velocity - velocity) * params.matching_factor;
}

pub fn separation(boid: &mut Boid, neighbors: &NeighborSummary, params: &Params) {
    boid.velocity += neighbors.close * params.avoidfactor;
}

/// Soft push back toward the arena; every margin is checked independently.
pub fn turn_at_margins(boid: &mut Boid, params: &Params) {
    let margins = &params.margins;
    let turn = params.turnfactor;

    if boid.position.y < margins.top {
        boid.velocity.y += turn;
    }
    if boid.position.x > margins.right {
        boid.velocity.x -= turn;
    }
    if boid.position.x < margins.left {
        boid.velocity.x += turn;
    }
    if boid.position.y > margins.bottom {
        boid.velocity.y -= turn;
    }
}

/// Strengthens a scout's bias while it heads the preferred way, weakens it otherwise.
pub fn adapt_bias(boid: &mut Boid, params: &Params) {
    if !boid.group.is_scout() {
        return;
    }

    // Floor is bias_increment, not zero.
    boid.biasval = if boid.group.favors(boid.velocity.x) {
        (boid.biasval + params.bias_increment).min(params.maxbias)
    } else {
        (boid.biasval - params.bias_increment).max(params.bias_increment)
    };
}

/// Blends a scout's x velocity toward its group's direction.
pub fn apply_bias(boid: &mut Boid) {
    if let Some(direction) = boid.group.bias_direction() {
        let bias = boid.biasval;
        boid.velocity.x = (1.0 - bias) * boid.velocity.x + bias * direction;
    }
}

/// Rescales the velocity into `[minspeed, maxspeed]`, keeping its direction.
///
/// A boid with no speed left takes `heading` (its velocity entering the
/// frame) at `minspeed`, or its group's default heading if that is zero too.
pub fn clamp_speed(boid: &mut Boid, heading: Vector2D, params: &Params) {
    let speed = boid.velocity.magnitude();

    if speed < params.minspeed {
        boid.velocity = match boid.velocity.normalize() {
            Some(direction) => direction * params.minspeed,
            None => {
                let direction = heading
                    .normalize()
                    .unwrap_or_else(|| boid.group.default_heading());
                trace!("zero speed, falling back to heading {direction:?}");
                direction * params.minspeed
            }
        };
    } else if speed > params.maxspeed {
        if let Some(direction) = boid.velocity.normalize() {
            boid.velocity = direction * params.maxspeed;
        }
    }
}

/// Explicit Euler step with a timestep of one frame.
pub fn integrate(boid: &mut Boid) {
    boid.position += boid.velocity;
}
