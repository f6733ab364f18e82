//! X-Escape Core - headless survival road-trip game
//!
//! A family flees across hostile country in one car. Each morning the player
//! hands out the little food and disguise left in the car; on the road they
//! pick a route across a fogged map while fuel and stamina run down.
//!
//! # Architecture
//!
//! The game uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Occupants, seat item tokens, map nodes, falling supplies
//! - **Components**: Pure data attached to entities (Occupant, Vitals, MapNode, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! [`engine::GameEngine`] owns the world and everything around it (day
//! counter, stock, resources, inventory) and is the only type a frontend
//! needs to drive.
//!
//! # Example
//!
//! ```rust,no_run
//! use xescape_core::prelude::*;
//!
//! let mut engine = GameEngine::new(GameConfig::default());
//!
//! engine.assign_item("Daughter", ItemCategory::Food).unwrap();
//! engine.next_day().unwrap();
//!
//! engine.load_escape_scene();
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//!     for event in engine.drain_events() {
//!         println!("{:?}", event);
//!     }
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod inventory;
pub mod persistence;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::GameConfig;
    pub use crate::engine::{GameEngine, OccupantView};
    pub use crate::error::{ConfigError, GameError, SaveError};
    pub use crate::inventory::{Item, ItemCategory, ItemKind};
    pub use crate::systems::{DayOutcome, GameEvent, GameState, NodeArrival, Scene};
}
