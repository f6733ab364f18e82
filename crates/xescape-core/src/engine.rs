//! Game engine - main entry point for running a game

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::*;
use crate::config::GameConfig;
use crate::error::{GameError, SaveError};
use crate::generation::{generate_map, spawn_occupants, MapLayout};
use crate::inventory::{Inventory, Item, ItemCategory, ItemDatabase};
use crate::systems::*;

/// Read-only snapshot of one occupant, for display
#[derive(Debug, Clone)]
pub struct OccupantView {
    pub entity: Entity,
    pub name: String,
    pub seat: Vec2,
    pub vitals: Vitals,
    pub dead: bool,
}

/// Main game engine
pub struct GameEngine {
    /// ECS world containing all entities
    pub world: World,
    pub config: GameConfig,
    pub state: GameState,
    pub scene: Scene,
    pub day: DayCycle,
    /// Who has been handed food or a disguise
    pub ledger: ItemLedger,
    /// Token entities on each seat
    pub instances: ItemInstances,
    pub stock: Stock,
    pub resources: Resources,
    pub map: Option<MapLayout>,
    pub town: TownSearch,
    pub pickup: PickupField,
    pub inventory: Inventory,
    /// Preset items
    pub items: ItemDatabase,
    /// Seconds of play since the game started
    pub play_time: f64,
    events: EventQueue,
    rng: StdRng,
}

impl GameEngine {
    /// Start a new game with the bundled item presets
    pub fn new(config: GameConfig) -> Self {
        let items = ItemDatabase::bundled().unwrap_or_else(|e| {
            log::warn!("bundled item database unreadable: {}", e);
            ItemDatabase::default()
        });
        Self::with_items(config, items)
    }

    /// Start a new game: seat the occupants, fill their gauges and roll a map
    pub fn with_items(config: GameConfig, items: ItemDatabase) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut world = World::new();
        spawn_occupants(&mut world, &config.occupants);
        initialize_occupants(&mut world);

        let mut layout = generate_map(&mut world, &config.map, &mut rng);
        initialize_map(&mut world, &mut layout);

        let mut inventory = Inventory::new(config.inventory.max_slots);
        if config.inventory.starter_kit {
            for item in items.all() {
                if let Err(e) = inventory.add_item(item) {
                    log::warn!("starter kit: {} not added: {}", item.name, e);
                }
            }
        }

        log::info!(
            "new game: {} occupants, {} days, {} map nodes",
            config.occupants.len(),
            config.day.max_day,
            layout.len()
        );

        Self {
            world,
            state: GameState::InCar,
            scene: Scene::CarInterior,
            day: DayCycle::new(config.day.max_day),
            ledger: ItemLedger::new(),
            instances: ItemInstances::new(),
            stock: Stock::from_config(&config.stock),
            resources: Resources::from_config(&config.resources),
            map: Some(layout),
            town: TownSearch::from_config(&config.town),
            pickup: PickupField::from_config(&config.pickup),
            inventory,
            items,
            play_time: 0.0,
            events: EventQueue::new(),
            rng,
            config,
        }
    }

    /// Throw the current game away and start over with the same config
    pub fn restart(&mut self) {
        let config = self.config.clone();
        let items = std::mem::take(&mut self.items);
        *self = Self::with_items(config, items);
        self.events.push(GameEvent::StateChanged(GameState::InCar));
        self.events.push(GameEvent::SceneChanged(Scene::CarInterior));
    }

    /// Advance timers and real-time systems by `delta_seconds`
    pub fn update(&mut self, delta_seconds: f32) {
        self.play_time += delta_seconds as f64;
        if self.state.is_terminal() {
            return;
        }

        if let Some(found) = self.town.update(delta_seconds, &mut self.rng) {
            self.resources.restore_stamina(found.stamina);
            self.resources.restore_fuel(found.fuel);
            log::info!("search found {:.1} stamina, {:.1} fuel", found.stamina, found.fuel);
            self.events.push(GameEvent::SearchCompleted {
                stamina: found.stamina,
                fuel: found.fuel,
            });
        }

        let escaping = self.state == GameState::Escaping;
        if resources_system(&mut self.resources, escaping, delta_seconds) {
            self.events.push(GameEvent::ResourcesDepleted);
        }
        if escaping {
            self.check_game_over();
        }

        if self.scene == Scene::Pickup {
            self.update_pickup(delta_seconds);
        }
    }

    fn update_pickup(&mut self, delta_seconds: f32) {
        let config = &self.config.pickup;
        player_movement_system(&mut self.pickup.player, config, delta_seconds);
        spawner_system(
            &mut self.world,
            &mut self.pickup.spawner,
            config,
            &mut self.rng,
            delta_seconds,
        );
        falling_system(&mut self.world, config, delta_seconds);

        let collected = pickup_trigger_system(
            &mut self.world,
            &self.pickup.player,
            &mut self.pickup.backpack,
            config,
        );
        for kind in &collected {
            self.events.push(GameEvent::ItemPickedUp(*kind));
        }
        if !collected.is_empty() {
            self.events.push(GameEvent::InventoryChanged);
        }
    }

    fn ensure_running(&self) -> Result<(), GameError> {
        if self.state.is_terminal() {
            Err(GameError::GameFinished)
        } else {
            Ok(())
        }
    }

    /// Change state. Terminal states stick until restart.
    fn set_state(&mut self, state: GameState) {
        if self.state == state || self.state.is_terminal() {
            return;
        }
        log::info!("state {:?} -> {:?}", self.state, state);
        self.state = state;
        self.events.push(GameEvent::StateChanged(state));
    }

    // === Day cycle ===

    /// Depart: end the current day
    pub fn next_day(&mut self) -> Result<DayOutcome, GameError> {
        self.ensure_running()?;

        let report = self
            .day
            .next_day(&mut self.world, &mut self.ledger, &mut self.instances);

        for (name, kind) in report.consumed {
            self.events.push(GameEvent::ItemConsumed { name, kind });
        }
        for name in report.died {
            self.events.push(GameEvent::OccupantDied(name));
        }

        match report.outcome {
            DayOutcome::Advanced(day) => self.events.push(GameEvent::DayChanged(day)),
            DayOutcome::GameOver => {
                self.events.push(GameEvent::GameEnd);
                self.set_state(GameState::GameOver);
            }
            DayOutcome::Victory => {
                self.events.push(GameEvent::GameWin);
                self.set_state(GameState::Victory);
            }
        }
        Ok(report.outcome)
    }

    // === Car items ===

    /// Hand an item from stock to the named occupant
    pub fn assign_item(&mut self, name: &str, category: ItemCategory) -> Result<SupplyKind, GameError> {
        self.ensure_running()?;
        let occupant = find_occupant(&self.world, name).ok_or(GameError::UnknownOccupant)?;
        self.assign_to(occupant, category)
    }

    /// Drag-and-drop release: hand the item to the occupant seated near `point`.
    /// Returns the receiving occupant's name.
    pub fn drop_item_at(&mut self, category: ItemCategory, point: Vec2) -> Result<String, GameError> {
        self.ensure_running()?;
        let occupant = find_drop_target(&self.world, point).ok_or(GameError::NoDropTarget)?;
        self.assign_to(occupant, category)?;
        let name = self
            .world
            .get::<&Occupant>(occupant)
            .map(|o| o.name.clone())
            .map_err(|_| GameError::UnknownOccupant)?;
        Ok(name)
    }

    fn assign_to(&mut self, occupant: Entity, category: ItemCategory) -> Result<SupplyKind, GameError> {
        let kind = assign_item(
            &mut self.world,
            &mut self.ledger,
            &mut self.instances,
            &mut self.stock,
            occupant,
            category,
        )?;
        if let Ok(o) = self.world.get::<&Occupant>(occupant) {
            self.events.push(GameEvent::ItemAssigned {
                name: o.name.clone(),
                kind,
            });
        }
        Ok(kind)
    }

    /// Take an assigned item back into stock
    pub fn cancel_item(&mut self, name: &str, kind: SupplyKind) -> Result<(), GameError> {
        self.ensure_running()?;
        cancel_item(
            &mut self.world,
            &mut self.ledger,
            &mut self.instances,
            &mut self.stock,
            name,
            kind,
        )?;
        self.events.push(GameEvent::ItemCancelled {
            name: name.to_string(),
            kind,
        });
        Ok(())
    }

    /// Click on the car interior: press the cancel button under `point`.
    /// Returns false when no button is there.
    pub fn click_cancel_at(&mut self, point: Vec2) -> Result<bool, GameError> {
        match cancel_button_at(&self.world, point) {
            Some((name, kind)) => self.cancel_item(&name, kind).map(|_| true),
            None => Ok(false),
        }
    }

    // === Escape map ===

    /// Travel to map node `id` and resolve what waits there
    pub fn select_node(&mut self, id: u32) -> Result<NodeArrival, GameError> {
        self.ensure_running()?;
        let layout = self.map.as_mut().ok_or(GameError::NoMap)?;
        let arrival = select_node(&mut self.world, layout, id, &self.config.map, &mut self.rng)?;

        let node_type = match arrival {
            NodeArrival::Road => NodeType::Road,
            NodeArrival::Town => NodeType::Town,
            NodeArrival::Danger { .. } => NodeType::Danger,
            NodeArrival::Border => NodeType::Border,
        };
        self.events.push(GameEvent::NodeEntered { id, node_type });

        match arrival {
            NodeArrival::Town => {
                self.town.open_menu();
                self.events.push(GameEvent::TownMenuOpened);
            }
            NodeArrival::Danger {
                stamina_loss,
                fuel_loss,
            } => {
                let was_depleted = self.resources.is_depleted();
                self.resources.consume_stamina(stamina_loss);
                self.resources.consume_fuel(fuel_loss);
                log::warn!("danger: lost {:.1} stamina, {:.1} fuel", stamina_loss, fuel_loss);
                self.events.push(GameEvent::DangerEncountered {
                    stamina_loss,
                    fuel_loss,
                });
                if !was_depleted && self.resources.is_depleted() {
                    self.events.push(GameEvent::ResourcesDepleted);
                }
            }
            NodeArrival::Road | NodeArrival::Border => {}
        }

        if arrival == NodeArrival::Border {
            self.check_victory();
        } else {
            self.check_game_over();
        }
        Ok(arrival)
    }

    /// Map node under `point`, for click picking
    pub fn node_at(&self, point: Vec2, radius: f32) -> Option<u32> {
        node_at(&self.world, point, radius)
    }

    pub fn current_node(&self) -> Option<MapNode> {
        let entity = self.map.as_ref()?.current_entity()?;
        self.world.get::<&MapNode>(entity).ok().map(|n| (*n).clone())
    }

    /// Every map node with its outgoing edges, ordered by id
    pub fn map_nodes(&self) -> Vec<(MapNode, Vec<u32>)> {
        let mut nodes: Vec<(MapNode, Vec<u32>)> = self
            .world
            .query::<(&MapNode, &NodeConnections)>()
            .iter()
            .map(|(_, (node, conn))| (node.clone(), conn.connected_to.clone()))
            .collect();
        nodes.sort_by_key(|(node, _)| node.id);
        nodes
    }

    pub fn is_node_reachable(&self, id: u32) -> bool {
        self.map
            .as_ref()
            .is_some_and(|layout| is_node_reachable(&self.world, layout, id))
    }

    // === Town ===

    /// Search the current town for supplies. Returns false if a search is
    /// already running.
    pub fn start_town_search(&mut self) -> Result<bool, GameError> {
        self.ensure_running()?;
        let at_town = self
            .current_node()
            .is_some_and(|node| node.node_type == NodeType::Town);
        if !at_town {
            return Err(GameError::NotAtNode(NodeType::Town));
        }
        let started = self.town.start_search();
        if started {
            self.events.push(GameEvent::SearchStarted);
        }
        Ok(started)
    }

    pub fn close_town_menu(&mut self) {
        if self.town.menu_open {
            self.town.close_menu();
            self.events.push(GameEvent::TownMenuClosed);
        }
    }

    // === Inventory ===

    pub fn add_inventory_item(&mut self, item: &Item) -> Result<(), GameError> {
        self.inventory.add_item(item)?;
        self.events.push(GameEvent::InventoryChanged);
        Ok(())
    }

    pub fn use_inventory_item(&mut self, id: u32) -> Result<ItemCategory, GameError> {
        self.ensure_running()?;
        let category = self
            .inventory
            .use_item(id, &mut self.world, &mut self.resources)?;
        self.events.push(GameEvent::InventoryChanged);
        Ok(category)
    }

    // === Pickup ===

    pub fn set_player_input(&mut self, input: f32) {
        self.pickup.player.set_input(input);
    }

    pub fn use_backpack_slot(&mut self, index: usize) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        let used = self.pickup.backpack.use_slot(index, &mut self.resources);
        if used {
            self.events.push(GameEvent::InventoryChanged);
        }
        used
    }

    // === Scenes and game state ===

    pub fn load_car_scene(&mut self) {
        self.change_scene(Scene::CarInterior);
        self.set_state(GameState::InCar);
    }

    /// Hit the road: fuel starts burning
    pub fn load_escape_scene(&mut self) {
        self.change_scene(Scene::EscapeMap);
        self.set_state(GameState::Escaping);
        self.resources.start_consuming();
    }

    pub fn load_pickup_scene(&mut self) {
        self.change_scene(Scene::Pickup);
        self.pickup.spawner.start();
    }

    fn change_scene(&mut self, scene: Scene) {
        if self.scene == scene {
            return;
        }
        if self.scene == Scene::Pickup {
            self.leave_pickup();
        }
        log::info!("scene {:?} -> {:?}", self.scene, scene);
        self.scene = scene;
        self.events.push(GameEvent::SceneChanged(scene));
    }

    /// The drop field is torn down with its scene
    fn leave_pickup(&mut self) {
        self.pickup.spawner.stop();
        self.pickup.player.set_input(0.0);
        let falling: Vec<Entity> = self
            .world
            .query::<&FallingItem>()
            .iter()
            .map(|(e, _)| e)
            .collect();
        for entity in falling {
            let _ = self.world.despawn(entity);
        }
    }

    /// Out of fuel or stamina ends the game. Returns true on game over.
    pub fn check_game_over(&mut self) -> bool {
        if self.resources.is_depleted() {
            self.set_state(GameState::GameOver);
        }
        self.state == GameState::GameOver
    }

    pub fn check_victory(&mut self) {
        self.set_state(GameState::Victory);
    }

    /// Events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    // === Queries ===

    /// All occupants in seating order
    pub fn occupants(&self) -> Vec<OccupantView> {
        let mut views: Vec<OccupantView> = self
            .world
            .query::<(&Occupant, &Vitals, Option<&Dead>)>()
            .iter()
            .map(|(entity, (occupant, vitals, dead))| OccupantView {
                entity,
                name: occupant.name.clone(),
                seat: occupant.seat,
                vitals: *vitals,
                dead: dead.is_some(),
            })
            .collect();
        views.sort_by_key(|v| v.entity.id());
        views
    }

    pub fn occupant(&self, name: &str) -> Option<OccupantView> {
        self.occupants().into_iter().find(|o| o.name == name)
    }

    pub fn living_count(&self) -> usize {
        living_occupants(&self.world).len()
    }

    pub fn item_tokens(&self) -> Vec<ItemToken> {
        self.world
            .query::<&ItemToken>()
            .iter()
            .map(|(_, t)| t.clone())
            .collect()
    }

    pub fn cancel_buttons(&self) -> Vec<CancelButton> {
        self.world
            .query::<&CancelButton>()
            .iter()
            .map(|(_, b)| b.clone())
            .collect()
    }

    pub fn falling_items(&self) -> Vec<FallingItem> {
        self.world
            .query::<&FallingItem>()
            .iter()
            .map(|(_, f)| f.clone())
            .collect()
    }

    // === Persistence ===

    /// Save game state to a writer
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), SaveError> {
        crate::persistence::save_game(writer, self)
    }

    /// Load game state from a reader. The event queue is cleared and the RNG
    /// is reseeded.
    pub fn load<R: std::io::Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let loaded = crate::persistence::load_game(reader)?;

        self.rng = match loaded.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(loaded.play_time.to_bits())),
            None => StdRng::from_entropy(),
        };
        self.world = loaded.world;
        self.config = loaded.config;
        self.state = loaded.state;
        self.scene = loaded.scene;
        self.day = loaded.day;
        self.ledger = loaded.ledger;
        self.stock = loaded.stock;
        self.resources = loaded.resources;
        self.town = loaded.town;
        self.pickup = loaded.pickup;
        self.inventory = Inventory::from_items(self.config.inventory.max_slots, loaded.inventory);
        self.play_time = loaded.play_time;
        self.events = EventQueue::new();

        self.instances = ItemInstances::rebuild(&self.world);
        self.map = loaded
            .map
            .map(|info| self.rebuild_map_layout(info));

        Ok(())
    }

    /// Rebuild map layout entity references from the loaded world
    fn rebuild_map_layout(&self, info: crate::persistence::SerializableMapLayout) -> MapLayout {
        let mut nodes: Vec<(u32, Entity)> = self
            .world
            .query::<&MapNode>()
            .iter()
            .map(|(entity, node)| (node.id, entity))
            .collect();
        nodes.sort_by_key(|(id, _)| *id);

        MapLayout {
            nodes: nodes.into_iter().map(|(_, entity)| entity).collect(),
            start: info.start,
            border: info.border,
            current: info.current,
            visible_range: info.visible_range,
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::new(GameConfig::default().with_seed(7))
    }

    #[test]
    fn test_new_game() {
        let engine = engine();
        assert_eq!(engine.occupants().len(), 3);
        assert_eq!(engine.living_count(), 3);
        assert_eq!(engine.day.current_day, 1);
        assert_eq!(engine.state, GameState::InCar);
        assert_eq!(engine.scene, Scene::CarInterior);
        assert_eq!(engine.map.as_ref().map(|m| m.len()), Some(20));
        assert_eq!(engine.inventory.item_count(), 6);
        assert!(engine.current_node().is_some_and(|n| n.visited));
    }

    #[test]
    fn test_drop_on_seat_assigns() {
        let mut engine = engine();
        let name = engine
            .drop_item_at(ItemCategory::Food, Vec2::new(-1.4, 0.3))
            .unwrap();
        assert_eq!(name, "Father");
        assert_eq!(engine.stock.food, 1);
        assert_eq!(engine.item_tokens().len(), 1);

        assert_eq!(
            engine.drop_item_at(ItemCategory::Food, Vec2::new(20.0, 20.0)),
            Err(GameError::NoDropTarget)
        );

        let button = Vec2::new(-1.5, 0.0) + SupplyKind::Food.cancel_offset();
        assert_eq!(engine.click_cancel_at(button), Ok(true));
        assert_eq!(engine.stock.food, 2);
        assert!(engine.item_tokens().is_empty());
    }

    #[test]
    fn test_fuel_drains_only_on_the_road() {
        let mut engine = engine();
        engine.update(5.0);
        assert_eq!(engine.resources.fuel, 100.0);

        engine.load_escape_scene();
        engine.update(5.0);
        assert!((engine.resources.fuel - 90.0).abs() < 0.001);
        assert!((engine.resources.stamina - 95.0).abs() < 0.001);
    }

    #[test]
    fn test_running_dry_ends_the_escape() {
        let mut engine = engine();
        engine.load_escape_scene();
        engine.resources.fuel = 1.0;
        engine.update(1.0);

        assert_eq!(engine.state, GameState::GameOver);
        let events = engine.drain_events();
        assert!(events.contains(&GameEvent::ResourcesDepleted));
        assert!(events.contains(&GameEvent::StateChanged(GameState::GameOver)));

        // Sticky until restart
        engine.load_car_scene();
        assert_eq!(engine.state, GameState::GameOver);
        assert_eq!(engine.next_day(), Err(GameError::GameFinished));

        engine.restart();
        assert_eq!(engine.state, GameState::InCar);
        assert_eq!(engine.resources.fuel, 100.0);
    }

    #[test]
    fn test_town_search_needs_a_town() {
        let mut engine = engine();
        assert_eq!(
            engine.start_town_search(),
            Err(GameError::NotAtNode(NodeType::Town))
        );
    }

    #[test]
    fn test_pickup_scene_lifecycle() {
        let mut engine = engine();
        engine.load_pickup_scene();
        engine.update(0.1);
        assert_eq!(engine.falling_items().len(), 1);

        engine.load_car_scene();
        assert!(engine.falling_items().is_empty());
        assert!(!engine.pickup.spawner.spawning);
    }
}
