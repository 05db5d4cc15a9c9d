#![cfg_attr(not(feature = "std"), no_std)]

//! Boid flocking core: the per-boid update rule, the neighbor summary it
//! consumes, and a double-buffered flock that steps the whole population.

mod boid;
mod flock;
mod neighbors;
mod params;
pub mod rules;
#[cfg(feature = "std")]
mod spawn;
mod vector;

pub use boid::{Boid, Group};
pub use flock::{Flock, FlockStats};
#[cfg(feature = "std")]
pub use flock::FlockStd;
pub use neighbors::{BruteForce, NeighborSearch, NeighborSummary, SearchError};
pub use params::{Margins, Params, ParamsError};
pub use rules::BoidUpdater;
#[cfg(feature = "std")]
pub use spawn::{spawn_population, PopulationLayout};
pub use vector::Vector2D;
