//! Handing food and disguise items to car occupants.
//!
//! Three pieces of bookkeeping move together:
//! - [`ItemLedger`]: who has been given food or a disguise (the source of truth)
//! - [`ItemInstances`]: the token and cancel-button entities shown on each seat
//! - [`Stock`]: how many items are left to hand out
//!
//! Both maps are keyed by occupant name, which is unique within a game.

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::day_cycle::find_occupant;
use crate::components::{CancelButton, Dead, ItemToken, Occupant, SupplyKind, Vec2};
use crate::config::StockConfig;
use crate::error::GameError;
use crate::inventory::ItemCategory;

/// Items dropped farther than this from every seat are not handed out
pub const DROP_RADIUS: f32 = 2.0;
/// Half size of the cancel button click area
pub const CANCEL_HALF_SIZE: f32 = 0.2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterItemData {
    pub has_food: bool,
    pub has_disguise: bool,
}

/// Has-food / has-disguise flags per occupant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemLedger {
    entries: HashMap<String, CharacterItemData>,
}

impl ItemLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_has_food(&mut self, name: &str, value: bool) {
        self.entries.entry(name.to_string()).or_default().has_food = value;
    }

    pub fn set_has_disguise(&mut self, name: &str, value: bool) {
        self.entries.entry(name.to_string()).or_default().has_disguise = value;
    }

    pub fn set(&mut self, name: &str, kind: SupplyKind, value: bool) {
        match kind {
            SupplyKind::Food => self.set_has_food(name, value),
            SupplyKind::Disguise => self.set_has_disguise(name, value),
        }
    }

    pub fn has_food(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|d| d.has_food)
    }

    pub fn has_disguise(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|d| d.has_disguise)
    }

    pub fn has(&self, name: &str, kind: SupplyKind) -> bool {
        match kind {
            SupplyKind::Food => self.has_food(name),
            SupplyKind::Disguise => self.has_disguise(name),
        }
    }

    pub fn consume_food(&mut self, name: &str) {
        if let Some(data) = self.entries.get_mut(name) {
            data.has_food = false;
        }
    }

    pub fn consume_disguise(&mut self, name: &str) {
        if let Some(data) = self.entries.get_mut(name) {
            data.has_disguise = false;
        }
    }

    pub fn get(&self, name: &str) -> Option<CharacterItemData> {
        self.entries.get(name).copied()
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }
}

/// Entities spawned on one occupant's seat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstanceSlots {
    pub food: Option<Entity>,
    pub disguise: Option<Entity>,
    pub food_cancel: Option<Entity>,
    pub disguise_cancel: Option<Entity>,
}

impl InstanceSlots {
    fn entities(&self) -> impl Iterator<Item = Entity> {
        [self.food, self.disguise, self.food_cancel, self.disguise_cancel]
            .into_iter()
            .flatten()
    }
}

/// Registry of item-token entities per occupant
#[derive(Debug, Clone, Default)]
pub struct ItemInstances {
    slots: HashMap<String, InstanceSlots>,
}

impl ItemInstances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_food(&mut self, name: &str, item: Entity, cancel: Option<Entity>) {
        let slots = self.slots.entry(name.to_string()).or_default();
        slots.food = Some(item);
        slots.food_cancel = cancel;
    }

    pub fn register_disguise(&mut self, name: &str, item: Entity, cancel: Option<Entity>) {
        let slots = self.slots.entry(name.to_string()).or_default();
        slots.disguise = Some(item);
        slots.disguise_cancel = cancel;
    }

    pub fn register(&mut self, name: &str, kind: SupplyKind, item: Entity, cancel: Option<Entity>) {
        match kind {
            SupplyKind::Food => self.register_food(name, item, cancel),
            SupplyKind::Disguise => self.register_disguise(name, item, cancel),
        }
    }

    /// Forget the food references without despawning anything
    pub fn unregister_food(&mut self, name: &str) {
        if let Some(slots) = self.slots.get_mut(name) {
            slots.food = None;
            slots.food_cancel = None;
        }
    }

    pub fn unregister_disguise(&mut self, name: &str) {
        if let Some(slots) = self.slots.get_mut(name) {
            slots.disguise = None;
            slots.disguise_cancel = None;
        }
    }

    pub fn food_item(&self, name: &str) -> Option<Entity> {
        self.slots.get(name).and_then(|s| s.food)
    }

    pub fn disguise_item(&self, name: &str) -> Option<Entity> {
        self.slots.get(name).and_then(|s| s.disguise)
    }

    pub fn slots(&self, name: &str) -> Option<&InstanceSlots> {
        self.slots.get(name)
    }

    /// Despawn everything registered for `name` and drop the entry.
    /// Returns how many entities were despawned.
    pub fn clear_character(&mut self, world: &mut World, name: &str) -> usize {
        let Some(slots) = self.slots.remove(name) else {
            return 0;
        };
        slots
            .entities()
            .filter(|&entity| world.despawn(entity).is_ok())
            .count()
    }

    pub fn clear_all(&mut self, world: &mut World) -> usize {
        let names: Vec<String> = self.slots.keys().cloned().collect();
        names
            .iter()
            .map(|name| self.clear_character(world, name))
            .sum()
    }

    /// Rebuild the registry from the token entities in `world` (after a load)
    pub fn rebuild(world: &World) -> Self {
        let mut instances = Self::new();

        let tokens: Vec<(Entity, String, SupplyKind)> = world
            .query::<&ItemToken>()
            .iter()
            .map(|(e, t)| (e, t.owner.clone(), t.kind))
            .collect();
        for (entity, owner, kind) in tokens {
            let cancel = world
                .query::<&CancelButton>()
                .iter()
                .find(|(_, b)| b.owner == owner && b.kind == kind)
                .map(|(e, _)| e);
            instances.register(&owner, kind, entity, cancel);
        }

        instances
    }
}

/// Items waiting in the car to be handed out. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub food: u32,
    pub disguise: u32,
}

impl Stock {
    pub fn from_config(config: &StockConfig) -> Self {
        Self {
            food: config.food,
            disguise: config.disguise,
        }
    }

    pub fn count(&self, kind: SupplyKind) -> u32 {
        match kind {
            SupplyKind::Food => self.food,
            SupplyKind::Disguise => self.disguise,
        }
    }

    /// Take one item out. Returns false when none is left.
    pub fn decrease(&mut self, kind: SupplyKind) -> bool {
        let count = match kind {
            SupplyKind::Food => &mut self.food,
            SupplyKind::Disguise => &mut self.disguise,
        };
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    pub fn increase(&mut self, kind: SupplyKind) {
        match kind {
            SupplyKind::Food => self.food += 1,
            SupplyKind::Disguise => self.disguise += 1,
        }
    }
}

impl Default for Stock {
    fn default() -> Self {
        Self::from_config(&StockConfig::default())
    }
}

/// Nearest living occupant whose seat is within [`DROP_RADIUS`] of `point`
pub fn find_drop_target(world: &World, point: Vec2) -> Option<Entity> {
    let radius_sq = DROP_RADIUS * DROP_RADIUS;
    world
        .query::<(&Occupant, Option<&Dead>)>()
        .iter()
        .filter(|(_, (_, dead))| dead.is_none())
        .map(|(entity, (occupant, _))| (entity, occupant.seat.distance_squared(&point)))
        .filter(|(_, dist_sq)| *dist_sq <= radius_sq)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(entity, _)| entity)
}

/// Hand one item of `category` from the stock to `occupant`: spawn its token
/// and cancel button, flag it in the ledger and take it out of stock.
pub fn assign_item(
    world: &mut World,
    ledger: &mut ItemLedger,
    instances: &mut ItemInstances,
    stock: &mut Stock,
    occupant: Entity,
    category: ItemCategory,
) -> Result<SupplyKind, GameError> {
    let (name, seat, dead) = {
        let occ = world
            .get::<&Occupant>(occupant)
            .map_err(|_| GameError::UnknownOccupant)?;
        let dead = world.get::<&Dead>(occupant).is_ok();
        (occ.name.clone(), occ.seat, dead)
    };

    if dead {
        return Err(GameError::OccupantDead(name));
    }
    let kind = category
        .supply_kind()
        .ok_or(GameError::NotAssignable { category })?;
    if stock.count(kind) == 0 {
        return Err(GameError::OutOfStock(kind));
    }
    if ledger.has(&name, kind) {
        return Err(GameError::SlotOccupied { name, kind });
    }

    let token = world.spawn((ItemToken {
        owner: name.clone(),
        kind,
        position: seat + kind.token_offset(),
    },));
    let cancel = world.spawn((CancelButton {
        owner: name.clone(),
        kind,
        position: seat + kind.cancel_offset(),
        half_size: CANCEL_HALF_SIZE,
    },));

    ledger.set(&name, kind, true);
    instances.register(&name, kind, token, Some(cancel));
    stock.decrease(kind);

    log::info!("{} received {:?}", name, kind);
    Ok(kind)
}

/// Take back the item on `name`'s seat and return it to stock
pub fn cancel_item(
    world: &mut World,
    ledger: &mut ItemLedger,
    instances: &mut ItemInstances,
    stock: &mut Stock,
    name: &str,
    kind: SupplyKind,
) -> Result<(), GameError> {
    if find_occupant(world, name).is_none() {
        return Err(GameError::UnknownOccupant);
    }
    if !ledger.has(name, kind) {
        return Err(GameError::SlotEmpty {
            name: name.to_string(),
            kind,
        });
    }

    if let Some(slots) = instances.slots(name).copied() {
        let (item, cancel) = match kind {
            SupplyKind::Food => (slots.food, slots.food_cancel),
            SupplyKind::Disguise => (slots.disguise, slots.disguise_cancel),
        };
        for entity in [item, cancel].into_iter().flatten() {
            let _ = world.despawn(entity);
        }
    }
    match kind {
        SupplyKind::Food => instances.unregister_food(name),
        SupplyKind::Disguise => instances.unregister_disguise(name),
    }

    ledger.set(name, kind, false);
    stock.increase(kind);

    log::info!("{} returned {:?} to stock", name, kind);
    Ok(())
}

/// Owner and kind of the cancel button under `point`, if any
pub fn cancel_button_at(world: &World, point: Vec2) -> Option<(String, SupplyKind)> {
    world
        .query::<&CancelButton>()
        .iter()
        .find(|(_, button)| button.contains(point))
        .map(|(_, button)| (button.owner.clone(), button.kind))
}
