//! Pickup mini-game: supplies drop from the sky and the player runs left and
//! right underneath to catch them in a small backpack.

use hecs::{Entity, World};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::resources::Resources;
use crate::components::{Aabb, FallingItem, PickupKind, Vec2};
use crate::config::PickupConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackpackSlot {
    pub kind: PickupKind,
    pub amount: f32,
}

/// Fixed number of slots; one slot per supply kind, amounts add up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backpack {
    slots: Vec<Option<BackpackSlot>>,
}

impl Backpack {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count],
        }
    }

    /// Stack onto the slot holding `kind`, else take the first empty slot.
    /// Returns false when the backpack is full.
    pub fn add(&mut self, kind: PickupKind, amount: f32) -> bool {
        if let Some(slot) = self.slots.iter_mut().flatten().find(|s| s.kind == kind) {
            slot.amount += amount;
            return true;
        }
        match self.slots.iter_mut().find(|s| s.is_none()) {
            Some(empty) => {
                *empty = Some(BackpackSlot { kind, amount });
                true
            }
            None => false,
        }
    }

    /// Apply the slot's effect to `resources` and empty it.
    /// Returns false for an out-of-range or empty slot.
    pub fn use_slot(&mut self, index: usize, resources: &mut Resources) -> bool {
        let Some(slot) = self.slots.get_mut(index).and_then(Option::take) else {
            return false;
        };
        resources.apply(slot.kind.effect(slot.amount));
        log::info!("used {} ({:.0})", slot.kind.label(), slot.amount);
        true
    }

    /// Number of slots holding `kind`
    pub fn item_count(&self, kind: PickupKind) -> usize {
        self.slots.iter().flatten().filter(|s| s.kind == kind).count()
    }

    pub fn slots(&self) -> &[Option<BackpackSlot>] {
        &self.slots
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }
}

/// The runner at the bottom of the pickup field. Moves horizontally only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupPlayer {
    pub x: f32,
    /// Horizontal input in [-1, 1]
    pub input: f32,
    pub enabled: bool,
}

impl Default for PickupPlayer {
    fn default() -> Self {
        Self {
            x: 0.0,
            input: 0.0,
            enabled: true,
        }
    }
}

impl PickupPlayer {
    pub fn set_input(&mut self, input: f32) {
        self.input = input.clamp(-1.0, 1.0);
    }

    pub fn bounds(&self, config: &PickupConfig) -> Aabb {
        Aabb::new(
            Vec2::new(self.x, config.player_y),
            Vec2::new(config.player_half_width, config.player_half_height),
        )
    }
}

/// Drops a new item every `spawn_interval` seconds while spawning
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemSpawner {
    pub spawning: bool,
    /// Seconds until the next drop
    pub timer: f32,
}

impl ItemSpawner {
    /// The first item drops on the next update
    pub fn start(&mut self) {
        if !self.spawning {
            self.spawning = true;
            self.timer = 0.0;
        }
    }

    pub fn stop(&mut self) {
        self.spawning = false;
    }
}

/// Everything the pickup scene keeps between frames
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupField {
    pub spawner: ItemSpawner,
    pub player: PickupPlayer,
    pub backpack: Backpack,
}

impl PickupField {
    pub fn from_config(config: &PickupConfig) -> Self {
        Self {
            spawner: ItemSpawner::default(),
            player: PickupPlayer::default(),
            backpack: Backpack::new(config.backpack_slots),
        }
    }
}

/// Drop items on schedule. Returns how many were spawned.
pub fn spawner_system(
    world: &mut World,
    spawner: &mut ItemSpawner,
    config: &PickupConfig,
    rng: &mut impl Rng,
    delta_seconds: f32,
) -> usize {
    if !spawner.spawning {
        return 0;
    }

    let interval = config.spawn_interval.max(0.01);
    let half_range = config.spawn_range_x / 2.0;
    let mut spawned = 0;

    // A long frame drops at most one catch-up item
    spawner.timer = (spawner.timer - delta_seconds).max(-interval);
    while spawner.timer <= 0.0 {
        let x = if half_range > 0.0 {
            rng.gen_range(-half_range..half_range)
        } else {
            0.0
        };
        let kind = PickupKind::ALL[rng.gen_range(0..PickupKind::ALL.len())];
        world.spawn((FallingItem::new(
            kind,
            config.item_value,
            Vec2::new(x, config.spawn_height),
        ),));
        spawner.timer += interval;
        spawned += 1;
    }

    spawned
}

/// Fall under gravity until resting on the ground, then expire after
/// `destroy_delay` seconds. Returns how many items expired.
pub fn falling_system(world: &mut World, config: &PickupConfig, delta_seconds: f32) -> usize {
    let gravity = config.gravity * config.gravity_scale;
    let rest_y = config.ground_y + config.item_half_size;
    let mut expired: Vec<Entity> = Vec::new();

    for (entity, item) in world.query_mut::<&mut FallingItem>() {
        match item.grounded_for.as_mut() {
            Some(time) => {
                *time += delta_seconds;
                if *time >= config.destroy_delay {
                    expired.push(entity);
                }
            }
            None => {
                item.velocity_y -= gravity * delta_seconds;
                item.position.y += item.velocity_y * delta_seconds;
                if item.position.y <= rest_y {
                    item.position.y = rest_y;
                    item.velocity_y = 0.0;
                    item.grounded_for = Some(0.0);
                }
            }
        }
    }

    for entity in &expired {
        let _ = world.despawn(*entity);
    }
    expired.len()
}

pub fn player_movement_system(player: &mut PickupPlayer, config: &PickupConfig, delta_seconds: f32) {
    let half_range = config.move_range_x / 2.0;
    player.x = (player.x + player.input * config.move_speed * delta_seconds)
        .clamp(-half_range, half_range);
}

/// Offer every item touching the player to the backpack. Caught items are
/// despawned; items that do not fit stay where they are.
pub fn pickup_trigger_system(
    world: &mut World,
    player: &PickupPlayer,
    backpack: &mut Backpack,
    config: &PickupConfig,
) -> Vec<PickupKind> {
    if !player.enabled {
        return Vec::new();
    }

    let player_box = player.bounds(config);
    let half = Vec2::new(config.item_half_size, config.item_half_size);
    let touching: Vec<(Entity, PickupKind, f32)> = world
        .query::<&FallingItem>()
        .iter()
        .filter(|(_, item)| Aabb::new(item.position, half).overlaps(&player_box))
        .map(|(entity, item)| (entity, item.kind, item.value))
        .collect();

    let mut collected = Vec::new();
    for (entity, kind, value) in touching {
        if backpack.add(kind, value) {
            let _ = world.despawn(entity);
            collected.push(kind);
        } else {
            log::debug!("backpack full, {} left behind", kind.label());
        }
    }
    collected
}
