use crate::neighbors::NeighborSummary;
use crate::params::Params;
use crate::rules::BoidUpdater;
use crate::vector::Vector2D;

/// Flock membership, fixed when the boid is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Group {
    #[default]
    Normal,
    /// Scout group 1, biased toward the right of the arena.
    ScoutRight,
    /// Scout group 2, biased toward the left of the arena.
    ScoutLeft,
}

impl Group {
    pub fn is_scout(self) -> bool {
        !matches!(self, Group::Normal)
    }

    /// Sign of the x heading the group is drawn toward.
    pub fn bias_direction(self) -> Option<f32> {
        match self {
            Group::Normal => None,
            Group::ScoutRight => Some(1.0),
            Group::ScoutLeft => Some(-1.0),
        }
    }

    /// Whether `vx` already points the way this group prefers.
    pub fn favors(self, vx: f32) -> bool {
        match self {
            Group::Normal => false,
            Group::ScoutRight => vx > 0.0,
            Group::ScoutLeft => vx < 0.0,
        }
    }

    /// Unit heading used when a boid has no direction of its own.
    pub(crate) fn default_heading(self) -> Vector2D {
        match self {
            Group::ScoutLeft => Vector2D::new(-1.0, 0.0),
            Group::Normal | Group::ScoutRight => Vector2D::new(1.0, 0.0),
        }
    }
}

/// A single boid entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub(crate) group: Group,
    pub(crate) biasval: f32,
}

impl Boid {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self {
            position,
            velocity,
            group: Group::Normal,
            biasval: 0.0,
        }
    }

    /// A boid in `group` starting with the given bias strength.
    ///
    /// For scouts the bias only stays inside `[bias_increment, maxbias]` if it starts
    /// there; see [`Params::clamp_bias`].
    pub fn with_group(position: Vector2D, velocity: Vector2D, group: Group, biasval: f32) -> Self {
        Self {
            position,
            velocity,
            group,
            biasval,
        }
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn biasval(&self) -> f32 {
        self.biasval
    }

    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }

    /// Advances this boid by one frame given its neighbor summary.
    pub fn update(&mut self, neighbors: &NeighborSummary, params: &Params) {
        BoidUpdater::new(params).update(self, neighbors);
    }
}
