//! Item records: plain data with a category-specific payload

use serde::{Deserialize, Serialize};

use crate::components::SupplyKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Food,
    Disguise,
    Tool,
    Material,
    Other,
}

impl ItemCategory {
    /// Only food and disguise items can be handed to car occupants
    pub fn supply_kind(&self) -> Option<SupplyKind> {
        match self {
            ItemCategory::Food => Some(SupplyKind::Food),
            ItemCategory::Disguise => Some(SupplyKind::Disguise),
            _ => None,
        }
    }
}

impl From<SupplyKind> for ItemCategory {
    fn from(kind: SupplyKind) -> Self {
        match kind {
            SupplyKind::Food => ItemCategory::Food,
            SupplyKind::Disguise => ItemCategory::Disguise,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodType {
    Bread,
    Water,
    CannedFood,
    Snack,
    Meal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisguiseType {
    Hat,
    Glasses,
    Clothes,
    Mask,
    Wig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    Food {
        food_type: FoodType,
        satiety_restore: f32,
        stamina_restore: f32,
    },
    Disguise {
        disguise_type: DisguiseType,
        /// Disguise points added (0-100)
        disguise_bonus: f32,
    },
    Tool,
    Material,
    Other,
}

impl ItemKind {
    pub fn category(&self) -> ItemCategory {
        match self {
            ItemKind::Food { .. } => ItemCategory::Food,
            ItemKind::Disguise { .. } => ItemCategory::Disguise,
            ItemKind::Tool => ItemCategory::Tool,
            ItemKind::Material => ItemCategory::Material,
            ItemKind::Other => ItemCategory::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub kind: ItemKind,
    pub max_stack: u32,
    pub quantity: u32,
    pub value: u32,
}

impl Item {
    pub fn new(id: u32, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            kind,
            max_stack: 1,
            quantity: 1,
            value: 0,
        }
    }

    /// Food stacks up to 10
    pub fn food(
        id: u32,
        name: impl Into<String>,
        food_type: FoodType,
        satiety_restore: f32,
        stamina_restore: f32,
    ) -> Self {
        let mut item = Self::new(
            id,
            name,
            ItemKind::Food {
                food_type,
                satiety_restore,
                stamina_restore,
            },
        );
        item.max_stack = 10;
        item
    }

    /// Disguise items do not stack
    pub fn disguise(
        id: u32,
        name: impl Into<String>,
        disguise_type: DisguiseType,
        disguise_bonus: f32,
    ) -> Self {
        Self::new(
            id,
            name,
            ItemKind::Disguise {
                disguise_type,
                disguise_bonus,
            },
        )
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_max_stack(mut self, max_stack: u32) -> Self {
        self.max_stack = max_stack;
        self
    }

    pub fn category(&self) -> ItemCategory {
        self.kind.category()
    }

    /// Copy of this item under a fresh id
    pub fn duplicate(&self, new_id: u32) -> Self {
        Self {
            id: new_id,
            ..self.clone()
        }
    }

    pub fn can_stack(&self) -> bool {
        self.max_stack > 1
    }

    pub fn can_stack_with(&self, amount: u32) -> bool {
        self.can_stack() && self.quantity + amount <= self.max_stack
    }

    /// Same item line: stacks merge only with these
    pub fn same_line(&self, other: &Item) -> bool {
        self.name == other.name && self.category() == other.category()
    }
}
