//! Item database: the preset food and disguise items, loaded from JSON

use serde::Deserialize;

use super::item::{DisguiseType, FoodType, Item};
use crate::error::ConfigError;

const ITEMS_JSON: &str = include_str!("../../../../data/items.json");

#[derive(Debug, Deserialize)]
struct FoodRecord {
    id: u32,
    name: String,
    #[serde(default)]
    description: String,
    food_type: FoodType,
    satiety_restore: f32,
    #[serde(default)]
    stamina_restore: f32,
    #[serde(default = "one")]
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct DisguiseRecord {
    id: u32,
    name: String,
    #[serde(default)]
    description: String,
    disguise_type: DisguiseType,
    disguise_bonus: f32,
    #[serde(default = "one")]
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct DatabaseFile {
    #[serde(default)]
    food_items: Vec<FoodRecord>,
    #[serde(default)]
    disguise_items: Vec<DisguiseRecord>,
}

fn one() -> u32 {
    1
}

/// Preset items, looked up by id or name
#[derive(Debug, Clone, Default)]
pub struct ItemDatabase {
    pub food_items: Vec<Item>,
    pub disguise_items: Vec<Item>,
}

impl ItemDatabase {
    /// Items bundled with the game
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_json_str(ITEMS_JSON)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: DatabaseFile = serde_json::from_str(json)?;

        let food_items = file
            .food_items
            .into_iter()
            .map(|r| {
                Item::food(r.id, r.name, r.food_type, r.satiety_restore, r.stamina_restore)
                    .with_description(r.description)
                    .with_quantity(r.quantity)
            })
            .collect();

        let disguise_items = file
            .disguise_items
            .into_iter()
            .map(|r| {
                Item::disguise(r.id, r.name, r.disguise_type, r.disguise_bonus)
                    .with_description(r.description)
                    .with_quantity(r.quantity)
            })
            .collect();

        Ok(Self {
            food_items,
            disguise_items,
        })
    }

    pub fn food_by_id(&self, id: u32) -> Option<&Item> {
        self.food_items.iter().find(|i| i.id == id)
    }

    pub fn food_by_name(&self, name: &str) -> Option<&Item> {
        self.food_items.iter().find(|i| i.name == name)
    }

    pub fn disguise_by_id(&self, id: u32) -> Option<&Item> {
        self.disguise_items.iter().find(|i| i.id == id)
    }

    pub fn disguise_by_name(&self, name: &str) -> Option<&Item> {
        self.disguise_items.iter().find(|i| i.name == name)
    }

    /// Every preset, food first
    pub fn all(&self) -> impl Iterator<Item = &Item> {
        self.food_items.iter().chain(self.disguise_items.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{ItemCategory, ItemKind};

    #[test]
    fn test_bundled_database() {
        let db = ItemDatabase::bundled().expect("bundled items parse");
        assert_eq!(db.food_items.len(), 3);
        assert_eq!(db.disguise_items.len(), 3);

        let bread = db.food_by_name("Bread").expect("bread present");
        assert_eq!(bread.quantity, 5);
        assert_eq!(bread.max_stack, 10);
        assert!(matches!(
            bread.kind,
            ItemKind::Food { satiety_restore, .. } if satiety_restore == 20.0
        ));

        let mask = db.disguise_by_id(103).expect("mask present");
        assert_eq!(mask.name, "Mask");
        assert_eq!(mask.category(), ItemCategory::Disguise);
        assert!(db.food_by_id(103).is_none());
    }
}
