//! X-Escape Headless Game Harness
//!
//! Plays scripted games against the core and validates the bundled data.
//! Runs entirely in-process: no window, no rendering.
//!
//! Usage:
//!   cargo run -p xescape-simtest
//!   cargo run -p xescape-simtest -- --verbose
//!   RUST_LOG=xescape_core=debug cargo run -p xescape-simtest

use serde::Deserialize;
use xescape_core::components::{NodeType, PickupKind, SupplyKind, Vec2};
use xescape_core::config::GameConfig;
use xescape_core::engine::GameEngine;
use xescape_core::inventory::{ItemCategory, ItemDatabase};
use xescape_core::systems::{DayOutcome, GameEvent, GameState, NodeArrival};

// ── Item presets (same JSON the core embeds) ────────────────────────────
const ITEMS_JSON: &str = include_str!("../../../data/items.json");

#[derive(Debug, Deserialize)]
struct RawItem {
    id: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawItemFile {
    food_items: Vec<RawItem>,
    disguise_items: Vec<RawItem>,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== X-Escape Game Harness ===\n");

    let mut results = Vec::new();

    // 1. Bundled data
    results.extend(validate_bundled_data(verbose));

    // 2. Day cycle
    results.extend(validate_day_cycle(verbose));

    // 3. Handing out items in the car
    results.extend(validate_car_items(verbose));

    // 4. Escape map generation sweep
    results.extend(validate_map_generation(verbose));

    // 5. Escape map traversal
    results.extend(validate_map_traversal(verbose));

    // 6. Pickup mini-game
    results.extend(validate_pickup(verbose));

    // 7. Save/load
    results.extend(validate_persistence(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn seeded(seed: u64) -> GameEngine {
    GameEngine::new(GameConfig::default().with_seed(seed))
}

// ── 1. Bundled data ─────────────────────────────────────────────────────

fn validate_bundled_data(verbose: bool) -> Vec<TestResult> {
    println!("--- Bundled Data ---");
    let mut results = Vec::new();

    let config = GameConfig::bundled();
    results.push(TestResult {
        name: "config_parse".into(),
        passed: config.is_ok(),
        detail: match &config {
            Ok(c) => format!("{} occupants, {} days", c.occupants.len(), c.day.max_day),
            Err(e) => format!("config error: {}", e),
        },
    });

    let raw: Result<RawItemFile, _> = serde_json::from_str(ITEMS_JSON);
    match raw {
        Ok(file) => {
            let mut ids: Vec<u32> = file
                .food_items
                .iter()
                .chain(file.disguise_items.iter())
                .map(|i| i.id)
                .collect();
            let count = ids.len();
            ids.sort_unstable();
            ids.dedup();
            results.push(TestResult {
                name: "items_unique_ids".into(),
                passed: ids.len() == count,
                detail: format!("{} presets, {} unique ids", count, ids.len()),
            });

            let unnamed = file
                .food_items
                .iter()
                .chain(file.disguise_items.iter())
                .filter(|i| i.name.trim().is_empty())
                .count();
            results.push(TestResult {
                name: "items_named".into(),
                passed: unnamed == 0,
                detail: format!("{} presets without a name", unnamed),
            });
        }
        Err(e) => results.push(TestResult {
            name: "items_parse".into(),
            passed: false,
            detail: format!("JSON parse error: {}", e),
        }),
    }

    let db = ItemDatabase::bundled();
    results.push(TestResult {
        name: "item_database_load".into(),
        passed: db.as_ref().is_ok_and(|d| !d.food_items.is_empty() && !d.disguise_items.is_empty()),
        detail: match &db {
            Ok(d) => format!("{} food, {} disguise", d.food_items.len(), d.disguise_items.len()),
            Err(e) => format!("database error: {}", e),
        },
    });

    if verbose {
        println!("  bundled data checked");
    }
    results
}

// ── 2. Day cycle ────────────────────────────────────────────────────────

fn validate_day_cycle(verbose: bool) -> Vec<TestResult> {
    println!("--- Day Cycle ---");
    let mut results = Vec::new();

    // Nobody fed: everyone starves on day 7
    let mut engine = seeded(1);
    let mut death_day = None;
    for _ in 0..9 {
        match engine.next_day() {
            Ok(DayOutcome::GameOver) => {
                death_day = Some(engine.day.current_day);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                results.push(TestResult {
                    name: "starvation_run".into(),
                    passed: false,
                    detail: format!("unexpected error: {}", e),
                });
                return results;
            }
        }
    }
    results.push(TestResult {
        name: "starvation_day".into(),
        passed: death_day == Some(7),
        detail: format!("all dead on day {:?}", death_day),
    });
    results.push(TestResult {
        name: "starvation_is_game_over".into(),
        passed: engine.state == GameState::GameOver,
        detail: format!("state {:?}", engine.state),
    });

    // Feed one occupant every other day until the end
    let mut engine = seeded(2);
    let mut outcome = None;
    let mut stock_ok = true;
    for day in 1..=10 {
        if day % 2 == 1 {
            // Stock runs out after two items; top it up like a found supply
            if engine.stock.food == 0 {
                engine.stock.increase(SupplyKind::Food);
            }
            if engine.assign_item("Daughter", ItemCategory::Food).is_err() {
                stock_ok = false;
            }
        }
        match engine.next_day() {
            Ok(o) => {
                outcome = Some(o);
                if o != DayOutcome::Advanced(engine.day.current_day) {
                    break;
                }
            }
            Err(_) => break,
        }
    }
    results.push(TestResult {
        name: "fed_family_wins".into(),
        passed: outcome == Some(DayOutcome::Victory) && stock_ok,
        detail: format!(
            "outcome {:?}, {} alive on day {}",
            outcome,
            engine.living_count(),
            engine.day.current_day
        ),
    });
    results.push(TestResult {
        name: "fed_daughter_survives".into(),
        passed: engine.occupant("Daughter").is_some_and(|o| !o.dead),
        detail: format!(
            "father dead: {:?}, daughter dead: {:?}",
            engine.occupant("Father").map(|o| o.dead),
            engine.occupant("Daughter").map(|o| o.dead)
        ),
    });

    if verbose {
        for o in engine.occupants() {
            println!(
                "  {}: {} / {}",
                o.name,
                o.vitals.satiety_status(),
                o.vitals.disguise_status()
            );
        }
    }
    results
}

// ── 3. Car items ────────────────────────────────────────────────────────

fn validate_car_items(verbose: bool) -> Vec<TestResult> {
    println!("--- Car Items ---");
    let mut results = Vec::new();
    let mut engine = seeded(3);

    let first = engine.drop_item_at(ItemCategory::Disguise, Vec2::new(1.4, 0.1));
    let second = engine.drop_item_at(ItemCategory::Disguise, Vec2::new(0.1, -2.4));
    let third = engine.drop_item_at(ItemCategory::Disguise, Vec2::new(-1.5, 0.0));
    results.push(TestResult {
        name: "stock_limits_assignment".into(),
        passed: first.is_ok() && second.is_ok() && third.is_err() && engine.stock.disguise == 0,
        detail: format!("{:?} / {:?} / {:?}", first, second, third),
    });

    let cancelled = engine.cancel_item("Mother", SupplyKind::Disguise);
    results.push(TestResult {
        name: "cancel_returns_stock".into(),
        passed: cancelled.is_ok() && engine.stock.disguise == 1 && engine.item_tokens().len() == 1,
        detail: format!("stock {}, tokens {}", engine.stock.disguise, engine.item_tokens().len()),
    });

    let _ = engine.next_day();
    let daughter = engine.occupant("Daughter");
    let events = engine.drain_events();
    results.push(TestResult {
        name: "consumption_clears_tokens".into(),
        passed: engine.item_tokens().is_empty()
            && !engine.ledger.has_disguise("Daughter")
            && daughter.is_some_and(|d| d.vitals.disguise() == 100.0)
            && events.iter().any(|e| matches!(e, GameEvent::ItemConsumed { .. })),
        detail: format!("{} events after departure", events.len()),
    });

    if verbose {
        println!("  stock left: {:?}", engine.stock);
    }
    results
}

// ── 4. Map generation ───────────────────────────────────────────────────

fn validate_map_generation(verbose: bool) -> Vec<TestResult> {
    println!("--- Map Generation ---");
    let mut results = Vec::new();

    let seeds = 0..50u64;
    let mut unreachable = Vec::new();
    let mut bad_edges = Vec::new();
    let mut bad_roles = Vec::new();

    for seed in seeds.clone() {
        let engine = seeded(seed);
        let nodes = engine.map_nodes();

        if !engine
            .map
            .as_ref()
            .is_some_and(|layout| xescape_core::systems::is_border_reachable(&engine.world, layout))
        {
            unreachable.push(seed);
        }
        if nodes.iter().any(|(_, edges)| edges.len() > 3) {
            bad_edges.push(seed);
        }
        let start_ok = nodes.first().is_some_and(|(n, _)| n.visited);
        let border_ok = nodes.last().is_some_and(|(n, _)| n.node_type == NodeType::Border);
        if !start_ok || !border_ok {
            bad_roles.push(seed);
        }
    }

    results.push(TestResult {
        name: "border_reachable".into(),
        passed: unreachable.is_empty(),
        detail: format!("{} of {} seeds unreachable {:?}", unreachable.len(), seeds.end, unreachable),
    });
    results.push(TestResult {
        name: "edges_per_node".into(),
        passed: bad_edges.is_empty(),
        detail: format!("{} seeds with more than 3 edges", bad_edges.len()),
    });
    results.push(TestResult {
        name: "start_and_border".into(),
        passed: bad_roles.is_empty(),
        detail: format!("{} seeds with a bad start or border", bad_roles.len()),
    });

    if verbose {
        let engine = seeded(0);
        for (node, edges) in engine.map_nodes() {
            println!(
                "  #{:2} {:8} {:20} -> {:?}",
                node.id,
                node.node_type.label(),
                node.name,
                edges
            );
        }
    }
    results
}

// ── 5. Map traversal ────────────────────────────────────────────────────

/// Shortest path of node ids from the current node to the border
fn path_to_border(engine: &GameEngine) -> Option<Vec<u32>> {
    let layout = engine.map.as_ref()?;
    let nodes = engine.map_nodes();
    let mut previous = vec![None; nodes.len()];
    let mut seen = vec![false; nodes.len()];
    let mut queue = std::collections::VecDeque::from([layout.current]);
    seen[layout.current as usize] = true;

    while let Some(id) = queue.pop_front() {
        if id == layout.border {
            let mut path = vec![id];
            let mut at = id;
            while let Some(prev) = previous[at as usize] {
                path.push(prev);
                at = prev;
            }
            path.reverse();
            return Some(path);
        }
        for &next in &nodes[id as usize].1 {
            if !seen[next as usize] {
                seen[next as usize] = true;
                previous[next as usize] = Some(id);
                queue.push_back(next);
            }
        }
    }
    None
}

fn validate_map_traversal(verbose: bool) -> Vec<TestResult> {
    println!("--- Map Traversal ---");
    let mut results = Vec::new();

    let mut engine = seeded(4);
    engine.load_escape_scene();
    // Keep the car topped up so only the route decides the outcome
    engine.resources.max_fuel = 10_000.0;
    engine.resources.fuel = 10_000.0;
    engine.resources.max_stamina = 10_000.0;
    engine.resources.stamina = 10_000.0;

    let visited_before = engine.current_node().map(|n| n.id);
    let rejected = visited_before.map(|id| engine.select_node(id));
    results.push(TestResult {
        name: "visited_node_rejected".into(),
        passed: matches!(rejected, Some(Err(_))),
        detail: format!("{:?}", rejected),
    });

    let path = path_to_border(&engine);
    let mut arrivals = Vec::new();
    if let Some(path) = &path {
        for &id in path.iter().skip(1) {
            match engine.select_node(id) {
                Ok(arrival) => arrivals.push(arrival),
                Err(e) => {
                    arrivals.clear();
                    results.push(TestResult {
                        name: "walk_to_border".into(),
                        passed: false,
                        detail: format!("step to {} failed: {}", id, e),
                    });
                    break;
                }
            }
            if engine.state.is_terminal() {
                break;
            }
        }
    }
    results.push(TestResult {
        name: "border_is_victory".into(),
        passed: engine.state == GameState::Victory
            && arrivals.last() == Some(&NodeArrival::Border),
        detail: format!(
            "path {:?}, state {:?}",
            path.as_ref().map(|p| p.len()),
            engine.state
        ),
    });

    // Danger and an empty tank
    let mut engine = seeded(5);
    engine.load_escape_scene();
    engine.resources.fuel = 0.5;
    engine.update(1.0);
    results.push(TestResult {
        name: "empty_tank_is_game_over".into(),
        passed: engine.state == GameState::GameOver,
        detail: format!("fuel {:.1}, state {:?}", engine.resources.fuel, engine.state),
    });

    if verbose {
        println!("  arrivals: {:?}", arrivals);
    }
    results
}

// ── 6. Pickup ───────────────────────────────────────────────────────────

fn validate_pickup(verbose: bool) -> Vec<TestResult> {
    println!("--- Pickup ---");
    let mut results = Vec::new();
    let mut engine = seeded(6);
    engine.load_pickup_scene();

    // Chase the lowest falling item for two simulated minutes
    let mut picked = 0;
    for _ in 0..(120 * 30) {
        let target = engine
            .falling_items()
            .into_iter()
            .filter(|item| !item.is_grounded())
            .min_by(|a, b| {
                a.position
                    .y
                    .partial_cmp(&b.position.y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|item| item.position.x);
        let input = match target {
            Some(x) if x > engine.pickup.player.x + 0.1 => 1.0,
            Some(x) if x < engine.pickup.player.x - 0.1 => -1.0,
            _ => 0.0,
        };
        engine.set_player_input(input);
        engine.update(1.0 / 30.0);
        picked += engine
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::ItemPickedUp(_)))
            .count();
    }

    results.push(TestResult {
        name: "player_catches_items".into(),
        passed: picked > 0,
        detail: format!("{} items caught", picked),
    });

    let kinds: usize = PickupKind::ALL
        .iter()
        .filter(|k| engine.pickup.backpack.item_count(**k) > 0)
        .count();
    results.push(TestResult {
        name: "backpack_one_slot_per_kind".into(),
        passed: (1..=3).contains(&kinds) && engine.pickup.backpack.slots().iter().flatten().count() == kinds,
        detail: format!("{} kinds in backpack", kinds),
    });

    engine.resources.fuel = 10.0;
    let fuel_slot = engine
        .pickup
        .backpack
        .slots()
        .iter()
        .position(|s| s.is_some_and(|s| s.kind == PickupKind::Fuel));
    let used = fuel_slot.map(|i| engine.use_backpack_slot(i));
    results.push(TestResult {
        name: "fuel_refills_tank".into(),
        passed: used.is_none() || (used == Some(true) && engine.resources.fuel > 10.0),
        detail: format!("slot {:?}, fuel {:.1}", fuel_slot, engine.resources.fuel),
    });

    engine.load_car_scene();
    results.push(TestResult {
        name: "leaving_clears_field".into(),
        passed: engine.falling_items().is_empty(),
        detail: format!("{} items left", engine.falling_items().len()),
    });

    if verbose {
        println!("  backpack: {:?}", engine.pickup.backpack.slots());
    }
    results
}

// ── 7. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    let mut engine = seeded(8);
    let _ = engine.assign_item("Father", ItemCategory::Food);
    let _ = engine.next_day();
    let _ = engine.assign_item("Mother", ItemCategory::Food);
    engine.load_escape_scene();
    engine.update(2.0);

    let mut buffer = Vec::new();
    let saved = engine.save(&mut buffer);
    let mut loaded = GameEngine::default();
    let restored = saved.is_ok() && loaded.load(&buffer[..]).is_ok();

    results.push(TestResult {
        name: "save_load_roundtrip".into(),
        passed: restored,
        detail: format!("{} bytes", buffer.len()),
    });

    let same = restored
        && loaded.day == engine.day
        && loaded.stock == engine.stock
        && loaded.state == engine.state
        && loaded.ledger.has_food("Mother")
        && loaded.instances.food_item("Mother").is_some()
        && loaded.map_nodes().len() == engine.map_nodes().len()
        && (loaded.resources.fuel - engine.resources.fuel).abs() < f32::EPSILON;
    results.push(TestResult {
        name: "save_load_state_matches".into(),
        passed: same,
        detail: format!("day {} state {:?}", loaded.day.current_day, loaded.state),
    });

    if verbose {
        println!("  save size: {} bytes", buffer.len());
    }
    results
}
