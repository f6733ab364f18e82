//! Game tunables.
//!
//! Every section has a `Default` matching the shipped game, and the whole
//! config can be overridden from JSON. Missing fields fall back to their
//! defaults, so an override file only needs the values it changes.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Bundled configuration (same values as `GameConfig::default()`)
const DEFAULT_CONFIG_JSON: &str = include_str!("../../../data/game_config.json");

/// Top-level configuration for a game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
    pub day: DayConfig,
    pub stock: StockConfig,
    pub occupants: Vec<OccupantSpec>,
    pub map: MapConfig,
    pub resources: ResourceConfig,
    pub town: TownConfig,
    pub pickup: PickupConfig,
    pub inventory: InventoryConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            day: DayConfig::default(),
            stock: StockConfig::default(),
            occupants: vec![
                OccupantSpec::new("Father", [-1.5, 0.0]),
                OccupantSpec::new("Mother", [1.5, 0.0]),
                OccupantSpec::new("Daughter", [0.0, -2.5]),
            ],
            map: MapConfig::default(),
            resources: ResourceConfig::default(),
            town: TownConfig::default(),
            pickup: PickupConfig::default(),
            inventory: InventoryConfig::default(),
        }
    }
}

impl GameConfig {
    /// Configuration bundled with the game
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_json_str(DEFAULT_CONFIG_JSON)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject configurations the game cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.day.max_day == 0 {
            return Err(ConfigError::Invalid("day.max_day must be at least 1".into()));
        }
        if self.map.total_nodes < 2 {
            return Err(ConfigError::Invalid(
                "map.total_nodes must be at least 2 (start and border)".into(),
            ));
        }
        let mut names: Vec<&str> = self.occupants.iter().map(|o| o.name.as_str()).collect();
        names.sort_unstable();
        if names.windows(2).any(|w| w[0] == w[1]) {
            return Err(ConfigError::Invalid("occupant names must be unique".into()));
        }
        if self.pickup.backpack_slots == 0 {
            return Err(ConfigError::Invalid("pickup.backpack_slots must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DayConfig {
    pub max_day: u32,
}

impl Default for DayConfig {
    fn default() -> Self {
        Self { max_day: 10 }
    }
}

/// Items waiting in the car to be handed out
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StockConfig {
    pub food: u32,
    pub disguise: u32,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self { food: 2, disguise: 2 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupantSpec {
    pub name: String,
    pub seat: [f32; 2],
}

impl OccupantSpec {
    pub fn new(name: impl Into<String>, seat: [f32; 2]) -> Self {
        Self {
            name: name.into(),
            seat,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: f32,
    pub height: f32,
    pub total_nodes: u32,
    /// Nodes within this distance of the current node are revealed
    pub visible_range: f32,
    /// Outgoing edges per node (nearest neighbours)
    pub connections_per_node: usize,
    pub town_probability: f32,
    pub border_probability: f32,
    pub danger_probability: f32,
    /// Layouts whose border cannot be reached are regenerated up to this many times
    pub max_generation_attempts: u32,
    pub danger_stamina_loss: [f32; 2],
    pub danger_fuel_loss: [f32; 2],
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 10.0,
            total_nodes: 20,
            visible_range: 2.0,
            connections_per_node: 3,
            town_probability: 0.3,
            border_probability: 0.1,
            danger_probability: 0.2,
            max_generation_attempts: 32,
            danger_stamina_loss: [10.0, 30.0],
            danger_fuel_loss: [15.0, 25.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub max_stamina: f32,
    pub stamina: f32,
    pub max_fuel: f32,
    pub fuel: f32,
    /// Stamina lost per second while consuming
    pub stamina_rate: f32,
    /// Fuel burned per second while escaping
    pub fuel_rate: f32,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            max_stamina: 100.0,
            stamina: 100.0,
            max_fuel: 100.0,
            fuel: 100.0,
            stamina_rate: 1.0,
            fuel_rate: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TownConfig {
    /// Seconds a supply search takes
    pub search_time: f32,
    pub min_resource_gain: f32,
    pub max_resource_gain: f32,
}

impl Default for TownConfig {
    fn default() -> Self {
        Self {
            search_time: 3.0,
            min_resource_gain: 10.0,
            max_resource_gain: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    pub spawn_interval: f32,
    pub spawn_height: f32,
    pub spawn_range_x: f32,
    pub item_value: f32,
    pub gravity: f32,
    pub gravity_scale: f32,
    pub ground_y: f32,
    /// Seconds a landed item lies around before it disappears
    pub destroy_delay: f32,
    pub item_half_size: f32,
    pub move_speed: f32,
    pub move_range_x: f32,
    pub player_y: f32,
    pub player_half_width: f32,
    pub player_half_height: f32,
    pub backpack_slots: usize,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            spawn_interval: 2.0,
            spawn_height: 10.0,
            spawn_range_x: 8.0,
            item_value: 20.0,
            gravity: 9.81,
            gravity_scale: 1.0,
            ground_y: 0.0,
            destroy_delay: 5.0,
            item_half_size: 0.25,
            move_speed: 5.0,
            move_range_x: 8.0,
            player_y: 0.5,
            player_half_width: 0.5,
            player_half_height: 0.5,
            backpack_slots: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub max_slots: usize,
    /// Start with one of every preset item from the item database
    pub starter_kit: bool,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            max_slots: 20,
            starter_kit: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_matches_default() {
        let bundled = GameConfig::bundled().expect("bundled config parses");
        let default = GameConfig::default();
        assert_eq!(bundled.day.max_day, default.day.max_day);
        assert_eq!(bundled.stock.food, default.stock.food);
        assert_eq!(bundled.map.total_nodes, default.map.total_nodes);
        assert_eq!(bundled.occupants.len(), default.occupants.len());
        assert_eq!(bundled.pickup.backpack_slots, default.pickup.backpack_slots);
    }

    #[test]
    fn test_partial_override() {
        let config = GameConfig::from_json_str(r#"{ "day": { "max_day": 5 }, "seed": 7 }"#)
            .expect("partial config parses");
        assert_eq!(config.day.max_day, 5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.stock.food, 2);
        assert_eq!(config.occupants.len(), 3);
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let json = r#"{ "occupants": [
            { "name": "Father", "seat": [0.0, 0.0] },
            { "name": "Father", "seat": [1.0, 0.0] }
        ] }"#;
        assert!(matches!(
            GameConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            GameConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
