//! Day cycle: each departure consumes assigned items, then wears down
//! whoever went without. Two days in a row at zero satiety is fatal.

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use super::items::{ItemInstances, ItemLedger};
use crate::components::{Dead, Occupant, SupplyKind, Vitals, STAT_MAX};

/// Day counter. Day 1 is the first morning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCycle {
    pub current_day: u32,
    pub max_day: u32,
}

/// What a departure led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOutcome {
    /// A new day started
    Advanced(u32),
    /// Nobody is left alive
    GameOver,
    /// Departed on the last day with someone alive
    Victory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayReport {
    pub outcome: DayOutcome,
    /// (occupant, kind) for every item eaten or worn this morning
    pub consumed: Vec<(String, SupplyKind)>,
    pub died: Vec<String>,
}

impl DayCycle {
    pub fn new(max_day: u32) -> Self {
        Self {
            current_day: 1,
            max_day: max_day.max(1),
        }
    }

    pub fn is_last_day(&self) -> bool {
        self.current_day >= self.max_day
    }

    pub fn days_left(&self) -> u32 {
        self.max_day.saturating_sub(self.current_day)
    }

    /// Leave for the next day.
    ///
    /// Before the last day this advances the counter, consumes assigned
    /// items, decays the rest and reports deaths. On the last day it only
    /// decides the game: victory if anyone survived.
    pub fn next_day(
        &mut self,
        world: &mut World,
        ledger: &mut ItemLedger,
        instances: &mut ItemInstances,
    ) -> DayReport {
        if self.is_last_day() {
            let outcome = if all_occupants_dead(world) {
                DayOutcome::GameOver
            } else {
                DayOutcome::Victory
            };
            return DayReport {
                outcome,
                consumed: Vec::new(),
                died: Vec::new(),
            };
        }

        self.current_day += 1;
        log::info!("day {} of {}", self.current_day, self.max_day);

        let consumed = consume_items(world, ledger, instances);
        let died = decay_occupants(world, &consumed);

        let outcome = if all_occupants_dead(world) {
            DayOutcome::GameOver
        } else {
            DayOutcome::Advanced(self.current_day)
        };

        DayReport {
            outcome,
            consumed,
            died,
        }
    }
}

impl Default for DayCycle {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Fill every living occupant's gauges
pub fn initialize_occupants(world: &mut World) {
    for (_, (vitals, dead)) in world.query_mut::<(&mut Vitals, Option<&Dead>)>() {
        if dead.is_none() {
            vitals.set_satiety(STAT_MAX);
            vitals.set_disguise(STAT_MAX);
        }
    }
}

/// True when no occupant is alive (including when there are none at all)
pub fn all_occupants_dead(world: &World) -> bool {
    !world
        .query::<(&Occupant, Option<&Dead>)>()
        .iter()
        .any(|(_, (_, dead))| dead.is_none())
}

pub fn find_occupant(world: &World, name: &str) -> Option<Entity> {
    world
        .query::<&Occupant>()
        .iter()
        .find(|(_, occupant)| occupant.name == name)
        .map(|(entity, _)| entity)
}

/// Names of the living occupants, in spawn order
pub fn living_occupants(world: &World) -> Vec<(Entity, String)> {
    let mut living: Vec<(Entity, String)> = world
        .query::<(&Occupant, Option<&Dead>)>()
        .iter()
        .filter(|(_, (_, dead))| dead.is_none())
        .map(|(entity, (occupant, _))| (entity, occupant.name.clone()))
        .collect();
    living.sort_by_key(|(entity, _)| entity.id());
    living
}

/// Eat and wear what was handed out: restore those gauges to full, clear
/// the ledger flags and despawn the seat tokens.
fn consume_items(
    world: &mut World,
    ledger: &mut ItemLedger,
    instances: &mut ItemInstances,
) -> Vec<(String, SupplyKind)> {
    let mut consumed = Vec::new();

    for (entity, name) in living_occupants(world) {
        let had_food = ledger.has_food(&name);
        let had_disguise = ledger.has_disguise(&name);

        if let Ok(mut vitals) = world.get::<&mut Vitals>(entity) {
            if had_food {
                vitals.set_satiety(STAT_MAX);
            }
            if had_disguise {
                vitals.set_disguise(STAT_MAX);
            }
        }

        if had_food {
            ledger.consume_food(&name);
            consumed.push((name.clone(), SupplyKind::Food));
        }
        if had_disguise {
            ledger.consume_disguise(&name);
            consumed.push((name.clone(), SupplyKind::Disguise));
        }
        if had_food || had_disguise {
            instances.clear_character(world, &name);
        }
    }

    consumed
}

/// Step down every gauge not refreshed this morning. Returns who starved.
fn decay_occupants(world: &mut World, consumed: &[(String, SupplyKind)]) -> Vec<String> {
    let was_given = |name: &str, kind: SupplyKind| {
        consumed.iter().any(|(n, k)| n == name && *k == kind)
    };

    let mut died = Vec::new();
    for (entity, (occupant, vitals, dead)) in
        world.query_mut::<(&Occupant, &mut Vitals, Option<&Dead>)>()
    {
        if dead.is_some() {
            continue;
        }
        if !was_given(&occupant.name, SupplyKind::Disguise) {
            vitals.decrease_disguise_level();
        }
        if !was_given(&occupant.name, SupplyKind::Food) && vitals.decrease_satiety_level() {
            vitals.health = 0.0;
            died.push((entity, occupant.name.clone()));
        }
    }

    for (entity, name) in &died {
        let _ = world.insert_one(*entity, Dead);
        log::warn!("{} starved", name);
    }

    died.into_iter().map(|(_, name)| name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Vec2;

    fn spawn(world: &mut World, name: &str) -> Entity {
        world.spawn((Occupant::new(name, Vec2::ZERO), Vitals::full()))
    }

    fn advance(cycle: &mut DayCycle, world: &mut World) -> DayReport {
        let mut ledger = ItemLedger::new();
        let mut instances = ItemInstances::new();
        cycle.next_day(world, &mut ledger, &mut instances)
    }

    #[test]
    fn test_no_occupants_counts_as_all_dead() {
        let world = World::new();
        assert!(all_occupants_dead(&world));
    }

    #[test]
    fn test_unfed_occupant_dies_on_day_seven() {
        let mut world = World::new();
        let father = spawn(&mut world, "Father");
        spawn(&mut world, "Mother");
        let mut cycle = DayCycle::new(10);

        for day in 2..=6 {
            let report = advance(&mut cycle, &mut world);
            assert_eq!(report.outcome, DayOutcome::Advanced(day));
            assert!(report.died.is_empty());
        }
        assert_eq!(world.get::<&Vitals>(father).unwrap().satiety(), 0.0);

        let report = advance(&mut cycle, &mut world);
        assert_eq!(report.outcome, DayOutcome::GameOver);
        assert_eq!(report.died.len(), 2);
        assert!(world.get::<&Dead>(father).is_ok());
        assert!(all_occupants_dead(&world));
    }

    #[test]
    fn test_consumption_restores_and_skips_decay() {
        let mut world = World::new();
        let father = spawn(&mut world, "Father");
        let mut cycle = DayCycle::new(10);
        let mut ledger = ItemLedger::new();
        let mut instances = ItemInstances::new();

        world.get::<&mut Vitals>(father).unwrap().set_satiety(40.0);
        ledger.set_has_food("Father", true);
        let token = world.spawn(());
        instances.register_food("Father", token, None);

        let report = cycle.next_day(&mut world, &mut ledger, &mut instances);
        assert_eq!(report.outcome, DayOutcome::Advanced(2));
        assert_eq!(report.consumed, vec![("Father".to_string(), SupplyKind::Food)]);

        let vitals = *world.get::<&Vitals>(father).unwrap();
        assert_eq!(vitals.satiety(), 100.0);
        assert_eq!(vitals.disguise(), 80.0);
        assert!(!ledger.has_food("Father"));
        assert!(instances.food_item("Father").is_none());
        assert!(!world.contains(token));
    }

    #[test]
    fn test_last_day_departure_wins() {
        let mut world = World::new();
        let father = spawn(&mut world, "Father");
        let mut cycle = DayCycle::new(3);
        cycle.current_day = 3;

        let before = *world.get::<&Vitals>(father).unwrap();
        let report = advance(&mut cycle, &mut world);
        assert_eq!(report.outcome, DayOutcome::Victory);
        assert_eq!(cycle.current_day, 3);
        assert_eq!(*world.get::<&Vitals>(father).unwrap(), before);
    }

    #[test]
    fn test_last_day_with_everyone_dead_loses() {
        let mut world = World::new();
        let father = spawn(&mut world, "Father");
        world.insert_one(father, Dead).unwrap();
        let mut cycle = DayCycle::new(2);
        cycle.current_day = 2;
        assert!(cycle.is_last_day());
        assert_eq!(advance(&mut cycle, &mut world).outcome, DayOutcome::GameOver);
    }

    #[test]
    fn test_dead_occupants_do_not_decay() {
        let mut world = World::new();
        let father = spawn(&mut world, "Father");
        spawn(&mut world, "Mother");
        world.insert_one(father, Dead).unwrap();

        let mut cycle = DayCycle::new(10);
        advance(&mut cycle, &mut world);
        assert_eq!(world.get::<&Vitals>(father).unwrap().satiety(), 100.0);
    }

    #[test]
    fn test_initialize_fills_living_only() {
        let mut world = World::new();
        let father = spawn(&mut world, "Father");
        let mother = spawn(&mut world, "Mother");
        world.get::<&mut Vitals>(father).unwrap().set_satiety(20.0);
        world.get::<&mut Vitals>(mother).unwrap().set_satiety(20.0);
        world.insert_one(mother, Dead).unwrap();

        initialize_occupants(&mut world);
        assert_eq!(world.get::<&Vitals>(father).unwrap().satiety(), 100.0);
        assert_eq!(world.get::<&Vitals>(mother).unwrap().satiety(), 20.0);
    }
}
