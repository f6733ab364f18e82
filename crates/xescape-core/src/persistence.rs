//! Save/Load functionality for persisting game state
//!
//! Uses bincode for compact binary serialization of the whole game.
//! Components are serialized individually then reconstructed on load.

use hecs::World;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::components::*;
use crate::config::GameConfig;
use crate::engine::GameEngine;
use crate::generation::MapLayout;
use crate::inventory::Item;
use crate::systems::{DayCycle, GameState, ItemLedger, PickupField, Resources, Scene, Stock, TownSearch};

pub use crate::error::SaveError;

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the game state
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub config: GameConfig,
    pub state: GameState,
    pub scene: Scene,
    pub day: DayCycle,
    pub ledger: ItemLedger,
    pub stock: Stock,
    pub resources: Resources,
    pub town: TownSearch,
    pub pickup: PickupField,
    pub inventory: Vec<Item>,
    pub map: Option<SerializableMapLayout>,
    pub play_time: f64,
    /// All entities with their components
    pub entities: Vec<SerializableEntity>,
}

/// Serializable version of MapLayout (without Entity references)
#[derive(Serialize, Deserialize, Clone)]
pub struct SerializableMapLayout {
    pub start: u32,
    pub border: u32,
    pub current: u32,
    pub visible_range: f32,
    pub node_count: usize,
}

impl From<&MapLayout> for SerializableMapLayout {
    fn from(layout: &MapLayout) -> Self {
        Self {
            start: layout.start,
            border: layout.border,
            current: layout.current,
            visible_range: layout.visible_range,
            node_count: layout.len(),
        }
    }
}

/// All possible components for an entity, serialized as optionals
#[derive(Serialize, Deserialize, Default)]
pub struct SerializableEntity {
    // Car
    pub occupant: Option<Occupant>,
    pub vitals: Option<Vitals>,
    pub dead: bool,
    pub item_token: Option<ItemToken>,
    pub cancel_button: Option<CancelButton>,

    // Escape map
    pub map_node: Option<MapNode>,
    pub node_connections: Option<NodeConnections>,

    // Pickup field
    pub falling_item: Option<FallingItem>,
}

/// Extract all entities from a world into serializable form
fn serialize_entities(world: &World) -> Vec<SerializableEntity> {
    let mut entities = Vec::new();

    for entity_ref in world.iter() {
        let mut se = SerializableEntity::default();

        if let Some(c) = entity_ref.get::<&Occupant>() {
            se.occupant = Some((*c).clone());
        }
        if let Some(c) = entity_ref.get::<&Vitals>() {
            se.vitals = Some(*c);
        }
        se.dead = entity_ref.has::<Dead>();
        if let Some(c) = entity_ref.get::<&ItemToken>() {
            se.item_token = Some((*c).clone());
        }
        if let Some(c) = entity_ref.get::<&CancelButton>() {
            se.cancel_button = Some((*c).clone());
        }
        if let Some(c) = entity_ref.get::<&MapNode>() {
            se.map_node = Some((*c).clone());
        }
        if let Some(c) = entity_ref.get::<&NodeConnections>() {
            se.node_connections = Some((*c).clone());
        }
        if let Some(c) = entity_ref.get::<&FallingItem>() {
            se.falling_item = Some((*c).clone());
        }

        entities.push(se);
    }

    entities
}

/// Spawn an entity with all its components
fn spawn_entity(world: &mut World, se: SerializableEntity) {
    let entity = world.spawn(());

    if let Some(c) = se.occupant {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.vitals {
        let _ = world.insert_one(entity, c);
    }
    if se.dead {
        let _ = world.insert_one(entity, Dead);
    }
    if let Some(c) = se.item_token {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.cancel_button {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.map_node {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.node_connections {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.falling_item {
        let _ = world.insert_one(entity, c);
    }
}

/// Save the complete game to a writer
pub fn save_game<W: Write>(writer: W, engine: &GameEngine) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        config: engine.config.clone(),
        state: engine.state,
        scene: engine.scene,
        day: engine.day,
        ledger: engine.ledger.clone(),
        stock: engine.stock,
        resources: engine.resources.clone(),
        town: engine.town.clone(),
        pickup: engine.pickup.clone(),
        inventory: engine.inventory.items().to_vec(),
        map: engine.map.as_ref().map(SerializableMapLayout::from),
        play_time: engine.play_time,
        entities: serialize_entities(&engine.world),
    };

    bincode::serialize_into(writer, &save_data)?;
    log::info!("saved game on day {}", engine.day.current_day);
    Ok(())
}

/// Load a game from a reader
pub fn load_game<R: Read>(reader: R) -> Result<LoadedGame, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let mut world = World::new();
    for se in save_data.entities {
        spawn_entity(&mut world, se);
    }

    Ok(LoadedGame {
        world,
        config: save_data.config,
        state: save_data.state,
        scene: save_data.scene,
        day: save_data.day,
        ledger: save_data.ledger,
        stock: save_data.stock,
        resources: save_data.resources,
        town: save_data.town,
        pickup: save_data.pickup,
        inventory: save_data.inventory,
        map: save_data.map,
        play_time: save_data.play_time,
    })
}

/// Result of loading a game
pub struct LoadedGame {
    pub world: World,
    pub config: GameConfig,
    pub state: GameState,
    pub scene: Scene,
    pub day: DayCycle,
    pub ledger: ItemLedger,
    pub stock: Stock,
    pub resources: Resources,
    pub town: TownSearch,
    pub pickup: PickupField,
    pub inventory: Vec<Item>,
    pub map: Option<SerializableMapLayout>,
    pub play_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::ItemCategory;

    #[test]
    fn test_save_load_roundtrip() {
        let mut engine = GameEngine::new(GameConfig::default().with_seed(11));
        engine.assign_item("Mother", ItemCategory::Disguise).unwrap();
        engine.next_day().unwrap();
        engine.assign_item("Father", ItemCategory::Food).unwrap();
        engine.update(1.0);

        let mut save_buffer = Vec::new();
        engine.save(&mut save_buffer).expect("Save failed");

        let mut loaded = GameEngine::default();
        loaded.load(&save_buffer[..]).expect("Load failed");

        assert_eq!(loaded.day.current_day, 2);
        assert_eq!(loaded.stock, engine.stock);
        assert!(loaded.ledger.has_food("Father"));
        assert!(!loaded.ledger.has_disguise("Mother"));
        assert!(loaded.instances.food_item("Father").is_some());
        assert_eq!(loaded.state, engine.state);

        let father = loaded.occupant("Father").unwrap();
        assert_eq!(father.vitals.satiety(), 80.0);
        let mother = loaded.occupant("Mother").unwrap();
        assert_eq!(mother.vitals.disguise(), 100.0);

        assert_eq!(loaded.map_nodes().len(), 20);
        assert_eq!(
            loaded.current_node().map(|n| n.id),
            engine.current_node().map(|n| n.id)
        );
        assert_eq!(loaded.inventory.item_count(), engine.inventory.item_count());
    }

    #[test]
    fn test_version_mismatch() {
        let engine = GameEngine::new(GameConfig::default().with_seed(1));
        let mut buffer = Vec::new();
        engine.save(&mut buffer).unwrap();
        // The version is the first field: a little-endian u32
        buffer[0] = 99;

        let mut loaded = GameEngine::default();
        assert!(matches!(
            loaded.load(&buffer[..]),
            Err(SaveError::VersionMismatch { expected: 1, found: 99 })
        ));
    }
}
