//! Systems - logic that operates on components

mod day_cycle;
mod escape_map;
mod game_state;
mod items;
mod pickup;
mod resources;
mod town;

pub use day_cycle::*;
pub use escape_map::*;
pub use game_state::*;
pub use items::*;
pub use pickup::*;
pub use resources::*;
pub use town::*;
