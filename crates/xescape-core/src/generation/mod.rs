//! Generation - procedural creation of the escape map and the car's occupants

mod map;
mod names;
mod occupants;

pub use map::*;
pub use names::*;
pub use occupants::*;
