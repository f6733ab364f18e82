//! Integration tests for whole games driven through the engine.
//!
//! Exercises: car items → day cycle → escape map → town search
//! → pickup field → inventory → save/load
//!
//! All tests are headless: no window, no rendering.

use xescape_core::components::{NodeType, PickupKind, SupplyKind, Vec2};
use xescape_core::config::GameConfig;
use xescape_core::engine::GameEngine;
use xescape_core::error::GameError;
use xescape_core::inventory::ItemCategory;
use xescape_core::systems::{DayOutcome, GameEvent, GameState, NodeArrival, Scene};

// ── Helpers ────────────────────────────────────────────────────────────

fn new_game(seed: u64) -> GameEngine {
    GameEngine::new(GameConfig::default().with_seed(seed))
}

/// Depart until the game decides itself or `days` run out
fn depart_days(engine: &mut GameEngine, days: u32) -> Option<DayOutcome> {
    let mut last = None;
    for _ in 0..days {
        let outcome = engine.next_day().ok()?;
        last = Some(outcome);
        if !matches!(outcome, DayOutcome::Advanced(_)) {
            break;
        }
    }
    last
}

/// Node ids from the current node to the border, shortest first
fn route_to_border(engine: &GameEngine) -> Vec<u32> {
    let layout = engine.map.as_ref().expect("map generated");
    let nodes = engine.map_nodes();
    let mut previous: Vec<Option<u32>> = vec![None; nodes.len()];
    let mut seen = vec![false; nodes.len()];
    let mut queue = std::collections::VecDeque::from([layout.current]);
    seen[layout.current as usize] = true;

    while let Some(id) = queue.pop_front() {
        if id == layout.border {
            let mut path = vec![id];
            while let Some(prev) = previous[*path.last().unwrap() as usize] {
                path.push(prev);
            }
            path.reverse();
            return path;
        }
        for &next in &nodes[id as usize].1 {
            if !seen[next as usize] {
                seen[next as usize] = true;
                previous[next as usize] = Some(id);
                queue.push_back(next);
            }
        }
    }
    Vec::new()
}

// ── Day cycle ──────────────────────────────────────────────────────────

#[test]
fn unfed_family_starves_on_day_seven() {
    let mut engine = new_game(1);

    assert_eq!(depart_days(&mut engine, 5), Some(DayOutcome::Advanced(6)));
    for o in engine.occupants() {
        assert_eq!(o.vitals.satiety(), 0.0);
        assert_eq!(o.vitals.satiety_status(), "Empty");
        assert!(!o.dead);
    }

    assert_eq!(engine.next_day(), Ok(DayOutcome::GameOver));
    assert_eq!(engine.day.current_day, 7);
    assert_eq!(engine.state, GameState::GameOver);

    let events = engine.drain_events();
    let deaths = events
        .iter()
        .filter(|e| matches!(e, GameEvent::OccupantDied(_)))
        .count();
    assert_eq!(deaths, 3);
    assert!(events.contains(&GameEvent::GameEnd));

    // Nothing moves after the end
    assert_eq!(engine.next_day(), Err(GameError::GameFinished));
    assert_eq!(
        engine.assign_item("Father", ItemCategory::Food),
        Err(GameError::GameFinished)
    );
}

#[test]
fn one_survivor_reaches_the_last_day() {
    let mut engine = new_game(2);

    for _ in 0..9 {
        if engine.stock.food == 0 {
            engine.stock.increase(SupplyKind::Food);
        }
        engine.assign_item("Daughter", ItemCategory::Food).unwrap();
        let outcome = engine.next_day().unwrap();
        assert!(matches!(outcome, DayOutcome::Advanced(_)));
    }
    assert_eq!(engine.day.current_day, 10);
    assert!(engine.day.is_last_day());
    assert_eq!(engine.living_count(), 1);
    assert!(engine.occupant("Father").is_some_and(|o| o.dead));

    // The final departure decides without decaying anyone
    let before = engine.occupant("Daughter").unwrap().vitals;
    assert_eq!(engine.next_day(), Ok(DayOutcome::Victory));
    assert_eq!(engine.day.current_day, 10);
    assert_eq!(engine.state, GameState::Victory);
    assert_eq!(engine.occupant("Daughter").unwrap().vitals, before);
}

#[test]
fn dead_occupants_cannot_receive_items() {
    let mut engine = new_game(3);
    engine.assign_item("Daughter", ItemCategory::Food).unwrap();
    depart_days(&mut engine, 1);
    engine.assign_item("Daughter", ItemCategory::Food).unwrap();
    depart_days(&mut engine, 5);
    assert!(engine.occupant("Mother").is_some_and(|o| o.dead));

    engine.stock.increase(SupplyKind::Disguise);
    assert_eq!(
        engine.assign_item("Mother", ItemCategory::Disguise),
        Err(GameError::OccupantDead("Mother".into()))
    );
    // Dropping on a dead occupant's seat finds no target
    assert_eq!(
        engine.drop_item_at(ItemCategory::Disguise, Vec2::new(1.5, 0.0)),
        Err(GameError::NoDropTarget)
    );
}

// ── Car items ──────────────────────────────────────────────────────────

#[test]
fn assignment_and_cancel_keep_stock_consistent() {
    let mut engine = new_game(4);
    let food = engine.stock.food;

    engine.assign_item("Father", ItemCategory::Food).unwrap();
    assert_eq!(
        engine.assign_item("Father", ItemCategory::Food),
        Err(GameError::SlotOccupied {
            name: "Father".into(),
            kind: SupplyKind::Food
        })
    );
    assert_eq!(
        engine.assign_item("Father", ItemCategory::Tool),
        Err(GameError::NotAssignable {
            category: ItemCategory::Tool
        })
    );
    assert_eq!(engine.stock.food, food - 1);
    assert_eq!(engine.cancel_buttons().len(), 1);

    engine.cancel_item("Father", SupplyKind::Food).unwrap();
    assert_eq!(engine.stock.food, food);
    assert!(engine.cancel_buttons().is_empty());
    assert!(!engine.ledger.has_food("Father"));
    assert_eq!(
        engine.cancel_item("Father", SupplyKind::Food),
        Err(GameError::SlotEmpty {
            name: "Father".into(),
            kind: SupplyKind::Food
        })
    );
}

// ── Escape map ─────────────────────────────────────────────────────────

#[test]
fn driving_to_the_border_wins() {
    let mut engine = new_game(5);
    engine.load_escape_scene();
    engine.resources.stamina = engine.resources.max_stamina;
    engine.resources.fuel = engine.resources.max_fuel;

    let route = route_to_border(&engine);
    assert!(route.len() >= 2, "border must be reachable from the start");

    let mut last = None;
    for &id in &route[1..] {
        // Danger on the way is paid for in full
        engine.resources.stamina = engine.resources.max_stamina;
        engine.resources.fuel = engine.resources.max_fuel;
        last = Some(engine.select_node(id).unwrap());
        if engine.state.is_terminal() {
            break;
        }
    }

    assert_eq!(last, Some(NodeArrival::Border));
    assert_eq!(engine.state, GameState::Victory);
    assert_eq!(engine.select_node(0), Err(GameError::GameFinished));
}

#[test]
fn only_neighbours_of_the_current_node_are_reachable() {
    let mut engine = new_game(6);
    engine.load_escape_scene();
    let nodes = engine.map_nodes();
    let current = engine.map.as_ref().unwrap().current;
    let edges = nodes[current as usize].1.clone();

    let stranger = nodes
        .iter()
        .map(|(n, _)| n.id)
        .find(|id| *id != current && !edges.contains(id));
    if let Some(id) = stranger {
        assert_eq!(engine.select_node(id), Err(GameError::NodeUnreachable(id)));
    }
    assert_eq!(engine.select_node(current), Err(GameError::NodeVisited(current)));
    assert_eq!(engine.select_node(999), Err(GameError::UnknownNode(999)));
}

#[test]
fn searching_a_town_restores_supplies() {
    // Find a game whose start node leads straight into a town
    let (mut engine, town) = (0..500)
        .find_map(|seed| {
            let engine = new_game(seed);
            let nodes = engine.map_nodes();
            let current = engine.map.as_ref()?.current;
            let town = nodes[current as usize]
                .1
                .iter()
                .copied()
                .find(|id| nodes[*id as usize].0.node_type == NodeType::Town)?;
            Some((engine, town))
        })
        .expect("some seed starts next to a town");

    engine.load_escape_scene();
    assert_eq!(engine.select_node(town), Ok(NodeArrival::Town));
    assert!(engine.town.menu_open);

    engine.resources.fuel = 50.0;
    assert_eq!(engine.start_town_search(), Ok(true));
    assert_eq!(engine.start_town_search(), Ok(false));
    engine.drain_events();

    engine.update(engine.config.town.search_time + 0.5);
    let events = engine.drain_events();
    let found = events.iter().find_map(|e| match e {
        GameEvent::SearchCompleted { fuel, .. } => Some(*fuel),
        _ => None,
    });
    let fuel = found.expect("search completes");
    assert!(fuel >= engine.config.town.min_resource_gain);
    assert!(fuel <= engine.config.town.max_resource_gain);
    assert!(engine.resources.fuel > 50.0);

    engine.close_town_menu();
    assert!(!engine.town.menu_open);
}

#[test]
fn burning_all_fuel_ends_the_escape() {
    let mut engine = new_game(7);
    engine.load_escape_scene();
    let seconds = engine.resources.fuel / engine.resources.fuel_rate + 1.0;
    for _ in 0..(seconds as usize * 10) {
        engine.update(0.1);
    }
    assert_eq!(engine.resources.fuel, 0.0);
    assert_eq!(engine.state, GameState::GameOver);
}

// ── Pickup ─────────────────────────────────────────────────────────────

#[test]
fn standing_under_a_drop_catches_it() {
    let mut engine = new_game(8);
    engine.load_pickup_scene();
    assert_eq!(engine.scene, Scene::Pickup);

    let mut caught = Vec::new();
    for _ in 0..600 {
        // Follow the first item that is still in the air
        let target = engine
            .falling_items()
            .into_iter()
            .find(|i| !i.is_grounded())
            .map(|i| i.position.x);
        let input = match target {
            Some(x) => (x - engine.pickup.player.x).clamp(-1.0, 1.0),
            None => 0.0,
        };
        engine.set_player_input(input);
        engine.update(0.05);
        caught.extend(engine.drain_events().into_iter().filter_map(|e| match e {
            GameEvent::ItemPickedUp(kind) => Some(kind),
            _ => None,
        }));
    }

    assert!(!caught.is_empty());
    let stored: usize = PickupKind::ALL
        .iter()
        .map(|k| engine.pickup.backpack.item_count(*k))
        .sum();
    assert!(stored >= 1 && stored <= 3);

    let slot = engine
        .pickup
        .backpack
        .slots()
        .iter()
        .position(Option::is_some)
        .unwrap();
    assert!(engine.use_backpack_slot(slot));
    assert!(!engine.use_backpack_slot(slot));
}

// ── Inventory ──────────────────────────────────────────────────────────

#[test]
fn eating_from_the_inventory_feeds_the_living() {
    let mut engine = new_game(9);
    depart_days(&mut engine, 1);
    assert_eq!(engine.occupant("Father").unwrap().vitals.satiety(), 80.0);

    let bread = engine
        .inventory
        .items_by_category(ItemCategory::Food)
        .into_iter()
        .find(|i| i.name == "Bread")
        .map(|i| (i.id, i.quantity))
        .unwrap();

    assert_eq!(engine.use_inventory_item(bread.0), Ok(ItemCategory::Food));
    for o in engine.occupants() {
        assert_eq!(o.vitals.satiety(), 100.0);
    }
    assert_eq!(engine.inventory.get(bread.0).map(|i| i.quantity), Some(bread.1 - 1));
    assert_eq!(engine.use_inventory_item(4242), Err(GameError::UnknownItem(4242)));
}

// ── Persistence ────────────────────────────────────────────────────────

#[test]
fn a_loaded_game_plays_on_identically() {
    let mut engine = new_game(10);
    engine.assign_item("Mother", ItemCategory::Food).unwrap();
    engine.assign_item("Daughter", ItemCategory::Disguise).unwrap();
    depart_days(&mut engine, 2);
    engine.assign_item("Father", ItemCategory::Food).unwrap();

    let mut buffer = Vec::new();
    engine.save(&mut buffer).unwrap();
    let mut loaded = GameEngine::default();
    loaded.load(&buffer[..]).unwrap();

    // Cancelling through the restored instances works
    loaded.cancel_item("Father", SupplyKind::Food).unwrap();
    engine.cancel_item("Father", SupplyKind::Food).unwrap();
    assert_eq!(loaded.stock, engine.stock);
    assert!(loaded.item_tokens().is_empty());

    // Both play the same days out
    let a = depart_days(&mut engine, 10);
    let b = depart_days(&mut loaded, 10);
    assert_eq!(a, b);
    assert_eq!(loaded.day, engine.day);
    let names = |e: &GameEngine| {
        e.occupants()
            .into_iter()
            .map(|o| (o.name, o.dead))
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&loaded), names(&engine));
}
