//! Game flow state, the active scene and the event queue the frontend drains

use serde::{Deserialize, Serialize};

use crate::components::{NodeType, PickupKind, SupplyKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    InCar,
    Escaping,
    GameOver,
    Victory,
}

impl GameState {
    /// GameOver and Victory stick until the game is restarted
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameState::GameOver | GameState::Victory)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scene {
    CarInterior,
    Pickup,
    EscapeMap,
}

impl Scene {
    pub fn title(&self) -> &'static str {
        match self {
            Scene::CarInterior => "Car",
            Scene::Pickup => "Supply Drop",
            Scene::EscapeMap => "Escape Map",
        }
    }
}

/// Something the frontend may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    DayChanged(u32),
    /// Every occupant is dead
    GameEnd,
    /// Departed on the last day with someone alive
    GameWin,
    OccupantDied(String),
    ItemAssigned { name: String, kind: SupplyKind },
    ItemCancelled { name: String, kind: SupplyKind },
    ItemConsumed { name: String, kind: SupplyKind },
    NodeEntered { id: u32, node_type: NodeType },
    DangerEncountered { stamina_loss: f32, fuel_loss: f32 },
    TownMenuOpened,
    TownMenuClosed,
    SearchStarted,
    SearchCompleted { stamina: f32, fuel: f32 },
    ResourcesDepleted,
    ItemPickedUp(PickupKind),
    InventoryChanged,
    StateChanged(GameState),
    SceneChanged(Scene),
}

/// Events raised since the last drain
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        log::debug!("event: {:?}", event);
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::DayChanged(2));
        queue.push(GameEvent::GameWin);
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(drained, vec![GameEvent::DayChanged(2), GameEvent::GameWin]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_terminal_states() {
        assert!(GameState::GameOver.is_terminal());
        assert!(GameState::Victory.is_terminal());
        assert!(!GameState::InCar.is_terminal());
        assert!(!GameState::Escaping.is_terminal());
    }
}
