//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod common;
mod map;
mod occupant;
mod pickup;

pub use common::*;
pub use map::*;
pub use occupant::*;
pub use pickup::*;
