//! X-Escape Viewer - Bevy frontend for the game
//!
//! Controls:
//!   Car:    drag the food/disguise icons onto a seat, click X to take back,
//!           N or the Depart button to leave (Y/N to confirm)
//!   Map:    click a revealed node, T to search a town, Esc to leave it
//!   Pickup: A/D or arrows to move, 1-6 to use a backpack slot
//!   F1/F2/F3 switch scenes, R restarts, Ctrl+S / Ctrl+L save and load

use bevy::prelude::*;
use bevy::sprite::Anchor;
use bevy::window::PrimaryWindow;
use xescape_core::components::{
    NodeDisplay, NodeType, PickupKind, SupplyKind, Vec2 as SimVec2,
};
use xescape_core::config::GameConfig;
use xescape_core::engine::GameEngine;
use xescape_core::inventory::ItemCategory;
use xescape_core::systems::{GameEvent, GameState, Scene};

/// Screen pixels per game unit
const PIXELS_PER_UNIT: f32 = 60.0;
const SAVE_PATH: &str = "xescape_save.bin";
const EVENT_LOG_LINES: usize = 6;

/// Stock icons and the Depart button in the car, in game units
const FOOD_ICON: SimVec2 = SimVec2 { x: -3.5, y: -4.5 };
const DISGUISE_ICON: SimVec2 = SimVec2 { x: -2.0, y: -4.5 };
const DEPART_BUTTON: SimVec2 = SimVec2 { x: 3.5, y: -4.5 };
const ICON_RADIUS: f32 = 0.5;

/// Map nodes are centered on the origin; nudge them below the status text
const MAP_OFFSET: SimVec2 = SimVec2 { x: 1.0, y: -0.5 };
const NODE_RADIUS: f32 = 0.25;

/// The pickup field's ground sits below the screen center
const PICKUP_OFFSET: SimVec2 = SimVec2 { x: 0.0, y: -4.5 };

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::from_path(&path).unwrap_or_else(|e| {
            eprintln!("Failed to read config {}: {}, using defaults", path, e);
            GameConfig::default()
        }),
        None => GameConfig::bundled().unwrap_or_else(|e| {
            eprintln!("Bundled config unreadable: {}, using defaults", e);
            GameConfig::default()
        }),
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "X-Escape".to_string(),
                resolution: (1280.0, 720.0).into(),
                present_mode: bevy::window::PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(SimWrapper(GameEngine::new(config)))
        .insert_resource(DragState::default())
        .insert_resource(DepartPrompt(false))
        .insert_resource(EventLog::default())
        .insert_resource(ClearColor(Color::srgb(0.08, 0.08, 0.1)))
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                update_game,
                keyboard_controls,
                car_mouse,
                map_mouse,
                collect_events,
                render_car,
                render_map,
                render_pickup,
                render_resources,
                update_text_ui,
            )
                .chain(),
        )
        .run();
}

#[derive(Resource)]
struct SimWrapper(GameEngine);

/// Stock icon being dragged in the car
#[derive(Resource, Default)]
struct DragState {
    item: Option<ItemCategory>,
    cursor: Vec2,
}

/// Waiting for Y/N after asking to depart
#[derive(Resource)]
struct DepartPrompt(bool);

/// Recent messages, newest last
#[derive(Resource, Default)]
struct EventLog {
    lines: Vec<String>,
}

impl EventLog {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
        if self.lines.len() > EVENT_LOG_LINES {
            self.lines.remove(0);
        }
    }
}

// Marker components for text UI elements
#[derive(Component)]
struct TitleText;

#[derive(Component)]
struct StatusText;

#[derive(Component)]
struct PromptText;

#[derive(Component)]
struct LogText;

fn to_screen(p: SimVec2, offset: SimVec2) -> Vec2 {
    Vec2::new((p.x + offset.x) * PIXELS_PER_UNIT, (p.y + offset.y) * PIXELS_PER_UNIT)
}

fn to_sim(p: Vec2, offset: SimVec2) -> SimVec2 {
    SimVec2::new(p.x / PIXELS_PER_UNIT - offset.x, p.y / PIXELS_PER_UNIT - offset.y)
}

fn spawn_text(commands: &mut Commands, text: &str, size: f32, at: Vec3, marker: impl Component) {
    commands.spawn((
        Text2d::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(Color::WHITE),
        Anchor::TopLeft,
        Transform::from_translation(at),
        marker,
    ));
}

fn setup(mut commands: Commands, sim: Res<SimWrapper>) {
    commands.spawn(Camera2d);

    spawn_text(&mut commands, "", 24.0, Vec3::new(-620.0, 350.0, 100.0), TitleText);
    spawn_text(&mut commands, "", 16.0, Vec3::new(-620.0, 315.0, 100.0), StatusText);
    spawn_text(&mut commands, "", 18.0, Vec3::new(-200.0, 350.0, 100.0), PromptText);
    spawn_text(&mut commands, "", 14.0, Vec3::new(220.0, 350.0, 100.0), LogText);

    info!(
        "X-Escape: {} occupants, {} days to the border",
        sim.0.occupants().len(),
        sim.0.day.max_day
    );
}

fn cursor_world(
    window_query: &Query<&Window, With<PrimaryWindow>>,
    camera_query: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let window = window_query.get_single().ok()?;
    let cursor_pos = window.cursor_position()?;
    let (camera, camera_transform) = camera_query.get_single().ok()?;
    camera.viewport_to_world_2d(camera_transform, cursor_pos).ok()
}

fn update_game(time: Res<Time>, mut sim: ResMut<SimWrapper>) {
    sim.0.update(time.delta_secs());
}

fn keyboard_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut sim: ResMut<SimWrapper>,
    mut prompt: ResMut<DepartPrompt>,
    mut log: ResMut<EventLog>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);

    // Save with Ctrl+S
    if ctrl && keyboard.just_pressed(KeyCode::KeyS) {
        match std::fs::File::create(SAVE_PATH) {
            Ok(file) => match sim.0.save(std::io::BufWriter::new(file)) {
                Ok(()) => log.push(format!("Saved to {}", SAVE_PATH)),
                Err(e) => log.push(format!("Failed to save: {}", e)),
            },
            Err(e) => log.push(format!("Failed to create save file: {}", e)),
        }
        return;
    }

    // Load with Ctrl+L
    if ctrl && keyboard.just_pressed(KeyCode::KeyL) {
        match std::fs::File::open(SAVE_PATH) {
            Ok(file) => match sim.0.load(std::io::BufReader::new(file)) {
                Ok(()) => log.push(format!("Loaded {}", SAVE_PATH)),
                Err(e) => log.push(format!("Failed to load: {}", e)),
            },
            Err(e) => log.push(format!("Failed to open save file: {}", e)),
        }
        prompt.0 = false;
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        sim.0.restart();
        prompt.0 = false;
        log.lines.clear();
        return;
    }

    if keyboard.just_pressed(KeyCode::F1) {
        sim.0.load_car_scene();
    }
    if keyboard.just_pressed(KeyCode::F2) {
        sim.0.load_escape_scene();
    }
    if keyboard.just_pressed(KeyCode::F3) {
        sim.0.load_pickup_scene();
    }

    match sim.0.scene {
        Scene::CarInterior => {
            if prompt.0 {
                if keyboard.just_pressed(KeyCode::KeyY) {
                    prompt.0 = false;
                    if let Err(e) = sim.0.next_day() {
                        log.push(e.to_string());
                    }
                } else if keyboard.just_pressed(KeyCode::KeyN)
                    || keyboard.just_pressed(KeyCode::Escape)
                {
                    prompt.0 = false;
                }
            } else if keyboard.just_pressed(KeyCode::KeyN) && !sim.0.state.is_terminal() {
                prompt.0 = true;
            }
        }
        Scene::EscapeMap => {
            if keyboard.just_pressed(KeyCode::KeyT) {
                match sim.0.start_town_search() {
                    Ok(true) => {}
                    Ok(false) => log.push("Already searching"),
                    Err(e) => log.push(e.to_string()),
                }
            }
            if keyboard.just_pressed(KeyCode::Escape) {
                sim.0.close_town_menu();
            }
        }
        Scene::Pickup => {
            let mut input = 0.0;
            if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
                input -= 1.0;
            }
            if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
                input += 1.0;
            }
            sim.0.set_player_input(input);

            let slot_keys = [
                KeyCode::Digit1,
                KeyCode::Digit2,
                KeyCode::Digit3,
                KeyCode::Digit4,
                KeyCode::Digit5,
                KeyCode::Digit6,
            ];
            for (index, key) in slot_keys.iter().enumerate() {
                if keyboard.just_pressed(*key) && !sim.0.use_backpack_slot(index) {
                    log.push(format!("Backpack slot {} is empty", index + 1));
                }
            }
        }
    }
}

/// Drag and drop stock icons onto seats, press cancel and depart buttons
fn car_mouse(
    mut sim: ResMut<SimWrapper>,
    mut drag: ResMut<DragState>,
    mut prompt: ResMut<DepartPrompt>,
    mut log: ResMut<EventLog>,
    mouse: Res<ButtonInput<MouseButton>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    window_query: Query<&Window, With<PrimaryWindow>>,
) {
    if sim.0.scene != Scene::CarInterior {
        drag.item = None;
        return;
    }
    let Some(cursor) = cursor_world(&window_query, &camera_query) else {
        return;
    };
    drag.cursor = cursor;
    let point = to_sim(cursor, SimVec2::ZERO);

    if mouse.just_pressed(MouseButton::Left) {
        if point.distance(&FOOD_ICON) <= ICON_RADIUS {
            drag.item = Some(ItemCategory::Food);
        } else if point.distance(&DISGUISE_ICON) <= ICON_RADIUS {
            drag.item = Some(ItemCategory::Disguise);
        } else if point.distance(&DEPART_BUTTON) <= ICON_RADIUS * 2.0 {
            prompt.0 = !sim.0.state.is_terminal();
        } else {
            if let Err(e) = sim.0.click_cancel_at(point) {
                log.push(e.to_string());
            }
        }
    }

    if mouse.just_released(MouseButton::Left) {
        if let Some(category) = drag.item.take() {
            if let Err(e) = sim.0.drop_item_at(category, point) {
                log.push(e.to_string());
            }
        }
    }
}

/// Click a revealed node to travel there
fn map_mouse(
    mut sim: ResMut<SimWrapper>,
    mut log: ResMut<EventLog>,
    mouse: Res<ButtonInput<MouseButton>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    window_query: Query<&Window, With<PrimaryWindow>>,
) {
    if sim.0.scene != Scene::EscapeMap || !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Some(cursor) = cursor_world(&window_query, &camera_query) else {
        return;
    };
    let point = to_sim(cursor, MAP_OFFSET);

    if let Some(id) = sim.0.node_at(point, NODE_RADIUS * 1.5) {
        if let Err(e) = sim.0.select_node(id) {
            log.push(e.to_string());
        }
    }
}

fn collect_events(mut sim: ResMut<SimWrapper>, mut log: ResMut<EventLog>) {
    for event in sim.0.drain_events() {
        if let Some(line) = describe_event(&event) {
            info!("{}", line);
            log.push(line);
        }
    }
}

fn describe_event(event: &GameEvent) -> Option<String> {
    let line = match event {
        GameEvent::DayChanged(day) => format!("Day {} begins", day),
        GameEvent::GameEnd => "Everyone is gone".to_string(),
        GameEvent::GameWin => "The family made it".to_string(),
        GameEvent::OccupantDied(name) => format!("{} did not survive the night", name),
        GameEvent::ItemAssigned { name, kind } => format!("{} gets {:?}", name, kind),
        GameEvent::ItemCancelled { name, kind } => format!("{:?} taken back from {}", kind, name),
        GameEvent::ItemConsumed { name, kind } => format!("{} used {:?}", name, kind),
        GameEvent::NodeEntered { id, node_type } => {
            format!("Arrived at {} #{}", node_type.label(), id)
        }
        GameEvent::DangerEncountered {
            stamina_loss,
            fuel_loss,
        } => format!("Danger! -{:.0} stamina, -{:.0} fuel", stamina_loss, fuel_loss),
        GameEvent::SearchStarted => "Searching the town...".to_string(),
        GameEvent::SearchCompleted { stamina, fuel } => {
            format!("Found +{:.0} stamina, +{:.0} fuel", stamina, fuel)
        }
        GameEvent::ResourcesDepleted => "Out of stamina or fuel".to_string(),
        GameEvent::ItemPickedUp(kind) => format!("Picked up {}", kind.label()),
        GameEvent::StateChanged(GameState::Victory) => "Victory!".to_string(),
        GameEvent::StateChanged(GameState::GameOver) => "Game over".to_string(),
        GameEvent::TownMenuOpened
        | GameEvent::TownMenuClosed
        | GameEvent::InventoryChanged
        | GameEvent::StateChanged(_)
        | GameEvent::SceneChanged(_) => return None,
    };
    Some(line)
}

fn supply_color(kind: SupplyKind) -> Color {
    match kind {
        SupplyKind::Food => Color::srgb(0.9, 0.7, 0.2),
        SupplyKind::Disguise => Color::srgb(0.6, 0.4, 0.9),
    }
}

fn render_car(sim: Res<SimWrapper>, drag: Res<DragState>, mut gizmos: Gizmos) {
    if sim.0.scene != Scene::CarInterior {
        return;
    }
    let engine = &sim.0;

    // Car body
    gizmos.rect_2d(
        Isometry2d::from_translation(Vec2::new(0.0, -0.5 * PIXELS_PER_UNIT)),
        Vec2::new(6.0, 6.0) * PIXELS_PER_UNIT,
        Color::srgba(0.4, 0.4, 0.45, 0.8),
    );

    for occupant in engine.occupants() {
        let seat = to_screen(occupant.seat, SimVec2::ZERO);
        let color = if occupant.dead {
            Color::srgb(0.3, 0.3, 0.3)
        } else {
            Color::srgb(0.3, 0.6, 0.9)
        };
        gizmos.circle_2d(Isometry2d::from_translation(seat), 0.5 * PIXELS_PER_UNIT, color);

        if !occupant.dead {
            let bar = seat + Vec2::new(-0.9, -0.7) * PIXELS_PER_UNIT;
            draw_resource_bar(
                &mut gizmos,
                bar,
                0.8 * PIXELS_PER_UNIT,
                6.0,
                occupant.vitals.satiety() / 100.0,
                supply_color(SupplyKind::Food),
            );
            draw_resource_bar(
                &mut gizmos,
                bar - Vec2::new(0.0, 8.0),
                0.8 * PIXELS_PER_UNIT,
                6.0,
                occupant.vitals.disguise() / 100.0,
                supply_color(SupplyKind::Disguise),
            );
        }
    }

    for token in engine.item_tokens() {
        gizmos.rect_2d(
            Isometry2d::from_translation(to_screen(token.position, SimVec2::ZERO)),
            Vec2::splat(0.3 * PIXELS_PER_UNIT),
            supply_color(token.kind),
        );
    }

    for button in engine.cancel_buttons() {
        let center = to_screen(button.position, SimVec2::ZERO);
        let h = button.half_size * PIXELS_PER_UNIT;
        let red = Color::srgb(0.9, 0.2, 0.2);
        gizmos.line_2d(center + Vec2::new(-h, -h), center + Vec2::new(h, h), red);
        gizmos.line_2d(center + Vec2::new(-h, h), center + Vec2::new(h, -h), red);
    }

    // Stock icons, one pip per item left
    for (icon, kind) in [(FOOD_ICON, SupplyKind::Food), (DISGUISE_ICON, SupplyKind::Disguise)] {
        let center = to_screen(icon, SimVec2::ZERO);
        gizmos.circle_2d(
            Isometry2d::from_translation(center),
            ICON_RADIUS * PIXELS_PER_UNIT,
            supply_color(kind),
        );
        for i in 0..engine.stock.count(kind) {
            gizmos.circle_2d(
                Isometry2d::from_translation(center + Vec2::new(i as f32 * 8.0 - 8.0, -40.0)),
                3.0,
                Color::WHITE,
            );
        }
    }

    gizmos.rect_2d(
        Isometry2d::from_translation(to_screen(DEPART_BUTTON, SimVec2::ZERO)),
        Vec2::new(2.0, 1.0) * PIXELS_PER_UNIT * ICON_RADIUS * 2.0,
        Color::srgb(0.3, 0.8, 0.4),
    );

    if let Some(category) = drag.item {
        if let Some(kind) = category.supply_kind() {
            gizmos.circle_2d(
                Isometry2d::from_translation(drag.cursor),
                ICON_RADIUS * PIXELS_PER_UNIT * 0.6,
                supply_color(kind),
            );
        }
    }
}

fn node_color(node_type: NodeType) -> Color {
    match node_type {
        NodeType::Town => Color::srgb(0.3, 0.8, 0.4),
        NodeType::Road => Color::srgb(0.7, 0.7, 0.7),
        NodeType::Border => Color::srgb(0.3, 0.6, 1.0),
        NodeType::Danger => Color::srgb(0.9, 0.25, 0.2),
    }
}

fn render_map(sim: Res<SimWrapper>, mut gizmos: Gizmos) {
    if sim.0.scene != Scene::EscapeMap {
        return;
    }
    let nodes = sim.0.map_nodes();
    let current = sim.0.map.as_ref().map(|m| m.current);

    // Edges between revealed nodes
    for (node, edges) in &nodes {
        if !node.visible {
            continue;
        }
        let from = to_screen(node.position, MAP_OFFSET);
        for &to in edges {
            let Some((target, _)) = nodes.get(to as usize) else {
                continue;
            };
            if !target.visible {
                continue;
            }
            let color = if Some(node.id) == current {
                Color::srgba(1.0, 1.0, 0.4, 0.8)
            } else {
                Color::srgba(0.5, 0.5, 0.55, 0.4)
            };
            gizmos.line_2d(from, to_screen(target.position, MAP_OFFSET), color);
        }
    }

    for (node, _) in &nodes {
        let center = to_screen(node.position, MAP_OFFSET);
        let radius = NODE_RADIUS * PIXELS_PER_UNIT;
        match node.display_state() {
            NodeDisplay::Hidden => {
                gizmos.circle_2d(
                    Isometry2d::from_translation(center),
                    radius * 0.4,
                    Color::srgba(0.3, 0.3, 0.3, 0.3),
                );
            }
            NodeDisplay::Visited => {
                gizmos.circle_2d(
                    Isometry2d::from_translation(center),
                    radius,
                    node_color(node.node_type).with_alpha(0.4),
                );
            }
            NodeDisplay::Unvisited => {
                gizmos.circle_2d(
                    Isometry2d::from_translation(center),
                    radius,
                    node_color(node.node_type),
                );
            }
        }
        if Some(node.id) == current {
            gizmos.circle_2d(Isometry2d::from_translation(center), radius * 1.5, Color::WHITE);
        }
    }
}

fn pickup_color(kind: PickupKind) -> Color {
    match kind {
        PickupKind::Food => Color::srgb(0.9, 0.7, 0.2),
        PickupKind::Fuel => Color::srgb(0.9, 0.5, 0.1),
        PickupKind::Medicine => Color::srgb(0.95, 0.95, 0.95),
    }
}

fn render_pickup(sim: Res<SimWrapper>, mut gizmos: Gizmos) {
    if sim.0.scene != Scene::Pickup {
        return;
    }
    let config = &sim.0.config.pickup;
    let half_range = config.move_range_x / 2.0 + 1.0;

    // Ground
    gizmos.line_2d(
        to_screen(SimVec2::new(-half_range, config.ground_y), PICKUP_OFFSET),
        to_screen(SimVec2::new(half_range, config.ground_y), PICKUP_OFFSET),
        Color::srgb(0.4, 0.35, 0.3),
    );

    let player = sim.0.pickup.player.bounds(config);
    gizmos.rect_2d(
        Isometry2d::from_translation(to_screen(player.center, PICKUP_OFFSET)),
        Vec2::new(player.half_extents.x, player.half_extents.y) * 2.0 * PIXELS_PER_UNIT,
        Color::srgb(0.3, 0.6, 0.9),
    );

    for item in sim.0.falling_items() {
        let alpha = match item.grounded_for {
            Some(t) => (1.0 - t / config.destroy_delay).clamp(0.2, 1.0),
            None => 1.0,
        };
        gizmos.rect_2d(
            Isometry2d::from_translation(to_screen(item.position, PICKUP_OFFSET)),
            Vec2::splat(config.item_half_size * 2.0 * PIXELS_PER_UNIT),
            pickup_color(item.kind).with_alpha(alpha),
        );
    }

    // Backpack slots along the bottom
    for (i, slot) in sim.0.pickup.backpack.slots().iter().enumerate() {
        let center = Vec2::new(-150.0 + i as f32 * 60.0, -330.0);
        gizmos.rect_2d(
            Isometry2d::from_translation(center),
            Vec2::splat(48.0),
            Color::srgba(0.6, 0.6, 0.65, 0.8),
        );
        if let Some(slot) = slot {
            gizmos.rect_2d(
                Isometry2d::from_translation(center),
                Vec2::splat(36.0),
                pickup_color(slot.kind),
            );
        }
    }
}

fn render_resources(sim: Res<SimWrapper>, mut gizmos: Gizmos) {
    let resources = &sim.0.resources;
    let x = -520.0;
    let y = 210.0;
    draw_resource_bar(
        &mut gizmos,
        Vec2::new(x, y),
        160.0,
        10.0,
        resources.stamina_fraction(),
        Color::srgb(0.3, 0.8, 0.3),
    );
    draw_resource_bar(
        &mut gizmos,
        Vec2::new(x, y - 16.0),
        160.0,
        10.0,
        resources.fuel_fraction(),
        Color::srgb(0.9, 0.5, 0.1),
    );
}

fn draw_resource_bar(
    gizmos: &mut Gizmos,
    pos: Vec2,
    width: f32,
    height: f32,
    level: f32,
    color: Color,
) {
    // Background
    gizmos.rect_2d(
        Isometry2d::from_translation(pos),
        Vec2::new(width, height),
        Color::srgba(0.2, 0.2, 0.25, 0.8),
    );

    // Fill based on level
    let fill_width = width * level.clamp(0.0, 1.0);
    if fill_width > 0.1 {
        gizmos.rect_2d(
            Isometry2d::from_translation(pos - Vec2::new((width - fill_width) / 2.0, 0.0)),
            Vec2::new(fill_width, height - 1.0),
            color,
        );
    }
}

fn update_text_ui(
    sim: Res<SimWrapper>,
    prompt: Res<DepartPrompt>,
    log: Res<EventLog>,
    mut title_query: Query<
        &mut Text2d,
        (With<TitleText>, Without<StatusText>, Without<PromptText>, Without<LogText>),
    >,
    mut status_query: Query<
        &mut Text2d,
        (With<StatusText>, Without<TitleText>, Without<PromptText>, Without<LogText>),
    >,
    mut prompt_query: Query<
        &mut Text2d,
        (With<PromptText>, Without<TitleText>, Without<StatusText>, Without<LogText>),
    >,
    mut log_query: Query<
        &mut Text2d,
        (With<LogText>, Without<TitleText>, Without<StatusText>, Without<PromptText>),
    >,
) {
    let engine = &sim.0;

    for mut text in &mut title_query {
        **text = format!(
            "Day {}/{} - {}",
            engine.day.current_day,
            engine.day.max_day,
            engine.scene.title()
        );
    }

    for mut text in &mut status_query {
        let mut lines = Vec::new();
        for o in engine.occupants() {
            if o.dead {
                lines.push(format!("{}: dead", o.name));
            } else {
                lines.push(format!(
                    "{}: {}, {}",
                    o.name,
                    o.vitals.satiety_status(),
                    o.vitals.disguise_status()
                ));
            }
        }
        lines.push(format!(
            "Stamina {:.0}/{:.0}  Fuel {:.0}/{:.0}",
            engine.resources.stamina,
            engine.resources.max_stamina,
            engine.resources.fuel,
            engine.resources.max_fuel
        ));
        lines.push(format!(
            "Stock: {} food, {} disguise",
            engine.stock.food, engine.stock.disguise
        ));
        **text = lines.join("\n");
    }

    for mut text in &mut prompt_query {
        **text = match engine.state {
            GameState::Victory => "You reached safety! [R] to play again".to_string(),
            GameState::GameOver => "Game over. [R] to try again".to_string(),
            _ if prompt.0 => "Depart for the next day? [Y/N]".to_string(),
            _ if engine.town.searching => {
                format!("Searching... {:.1}s", engine.town.remaining())
            }
            _ if engine.town.menu_open => "Town: [T] search, [Esc] leave".to_string(),
            _ => String::new(),
        };
    }

    for mut text in &mut log_query {
        **text = log.lines.join("\n");
    }
}
