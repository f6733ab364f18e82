//! Inventory - the stack-based item bag carried between days.
//!
//! Items come from the [`ItemDatabase`] presets. Using a food item feeds
//! every living occupant; using a disguise item improves everyone's disguise.

mod database;
mod item;

pub use database::*;
pub use item::*;

use hecs::World;

use crate::components::{Dead, Vitals};
use crate::error::GameError;
use crate::systems::Resources;

#[derive(Debug, Clone)]
pub struct Inventory {
    items: Vec<Item>,
    max_slots: usize,
    next_id: u32,
}

impl Inventory {
    pub fn new(max_slots: usize) -> Self {
        Self {
            items: Vec::new(),
            max_slots,
            next_id: 1,
        }
    }

    /// Rebuild from saved entries, keeping fresh ids clear of the saved ones
    pub fn from_items(max_slots: usize, items: Vec<Item>) -> Self {
        let next_id = items.iter().map(|i| i.id).max().map_or(1, |id| id + 1);
        Self {
            items,
            max_slots,
            next_id,
        }
    }

    /// Add `item`, merging into existing stacks of the same line first.
    ///
    /// Whatever the stacks cannot take is split into new entries of at most
    /// `max_stack` each. Fails without touching the inventory when there are
    /// not enough free slots for those entries.
    pub fn add_item(&mut self, item: &Item) -> Result<(), GameError> {
        let max_stack = item.max_stack.max(1);
        let room: u32 = if item.can_stack() {
            self.items
                .iter()
                .filter(|i| i.same_line(item))
                .map(|i| i.max_stack.saturating_sub(i.quantity))
                .sum()
        } else {
            0
        };
        let spill = item.quantity.saturating_sub(room);
        let slots_needed = spill.div_ceil(max_stack) as usize;

        if self.items.len() + slots_needed > self.max_slots {
            log::warn!(
                "inventory full ({}/{}), {} x{} needs {} slot(s)",
                self.items.len(),
                self.max_slots,
                item.name,
                item.quantity,
                slots_needed
            );
            return Err(GameError::InventoryFull);
        }

        let mut remaining = item.quantity - spill;
        for existing in self.items.iter_mut().filter(|i| i.same_line(item)) {
            if remaining == 0 {
                break;
            }
            let taken = existing.max_stack.saturating_sub(existing.quantity).min(remaining);
            existing.quantity += taken;
            remaining -= taken;
        }

        let mut remaining = spill;
        while remaining > 0 {
            let chunk = remaining.min(max_stack);
            let id = self.next_id;
            self.next_id += 1;
            self.items.push(item.duplicate(id).with_quantity(chunk));
            remaining -= chunk;
        }
        log::debug!("added {} x{}", item.name, item.quantity);
        Ok(())
    }

    /// Take `quantity` units of item `id`; the entry goes away when it runs out
    pub fn remove_item(&mut self, id: u32, quantity: u32) -> bool {
        let Some(index) = self.items.iter().position(|i| i.id == id) else {
            return false;
        };
        if self.items[index].quantity <= quantity {
            self.items.remove(index);
        } else {
            self.items[index].quantity -= quantity;
        }
        true
    }

    /// Use one unit of item `id` on the car: food raises every living
    /// occupant's satiety and restores stamina, disguise items raise
    /// everyone's disguise. Other kinds cannot be used.
    pub fn use_item(
        &mut self,
        id: u32,
        world: &mut World,
        resources: &mut Resources,
    ) -> Result<ItemCategory, GameError> {
        let item = self.get(id).ok_or(GameError::UnknownItem(id))?.clone();

        match item.kind {
            ItemKind::Food {
                satiety_restore,
                stamina_restore,
                ..
            } => {
                for (_, (vitals, dead)) in world.query_mut::<(&mut Vitals, Option<&Dead>)>() {
                    if dead.is_none() {
                        vitals.set_satiety(vitals.satiety() + satiety_restore);
                    }
                }
                if stamina_restore > 0.0 {
                    resources.restore_stamina(stamina_restore);
                }
            }
            ItemKind::Disguise { disguise_bonus, .. } => {
                for (_, (vitals, dead)) in world.query_mut::<(&mut Vitals, Option<&Dead>)>() {
                    if dead.is_none() {
                        vitals.set_disguise(vitals.disguise() + disguise_bonus);
                    }
                }
            }
            _ => return Err(GameError::NotUsable(id)),
        }

        self.remove_item(id, 1);
        log::info!("used {}", item.name);
        Ok(item.category())
    }

    pub fn get(&self, id: u32) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn items_by_category(&self, category: ItemCategory) -> Vec<&Item> {
        self.items.iter().filter(|i| i.category() == category).collect()
    }

    /// Occupied slots
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Units across all stacks
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn has_empty_slot(&self) -> bool {
        self.items.len() < self.max_slots
    }

    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
