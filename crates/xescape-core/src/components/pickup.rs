//! Pickup mini-game components: supplies falling from the sky

use super::common::Vec2;
use serde::{Deserialize, Serialize};

/// Supplies thrown into the pickup field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores stamina
    Food,
    /// Restores fuel
    Fuel,
    /// Restores twice its value in stamina
    Medicine,
}

impl PickupKind {
    pub const ALL: [PickupKind; 3] = [PickupKind::Food, PickupKind::Fuel, PickupKind::Medicine];

    pub fn label(&self) -> &'static str {
        match self {
            PickupKind::Food => "Food",
            PickupKind::Fuel => "Fuel",
            PickupKind::Medicine => "Medicine",
        }
    }

    /// What using `amount` of this supply does to the travel resources
    pub fn effect(&self, amount: f32) -> SupplyEffect {
        match self {
            PickupKind::Food => SupplyEffect::Stamina(amount),
            PickupKind::Fuel => SupplyEffect::Fuel(amount),
            PickupKind::Medicine => SupplyEffect::Stamina(amount * 2.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SupplyEffect {
    Stamina(f32),
    Fuel(f32),
}

/// A supply item in the pickup field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingItem {
    pub kind: PickupKind,
    /// Amount added to the backpack when collected
    pub value: f32,
    pub position: Vec2,
    pub velocity_y: f32,
    /// Seconds spent lying on the ground; `None` while still falling
    pub grounded_for: Option<f32>,
}

impl FallingItem {
    pub fn new(kind: PickupKind, value: f32, position: Vec2) -> Self {
        Self {
            kind,
            value,
            position,
            velocity_y: 0.0,
            grounded_for: None,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded_for.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medicine_doubles_stamina() {
        assert_eq!(PickupKind::Medicine.effect(20.0), SupplyEffect::Stamina(40.0));
        assert_eq!(PickupKind::Fuel.effect(20.0), SupplyEffect::Fuel(20.0));
        assert_eq!(PickupKind::Food.effect(15.0), SupplyEffect::Stamina(15.0));
    }
}
