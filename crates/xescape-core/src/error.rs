//! Error types for game actions, configuration and save files

use thiserror::Error;

use crate::components::{NodeType, SupplyKind};
use crate::inventory::ItemCategory;

/// A player action the rules refused
#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("no occupant is close enough to receive the item")]
    NoDropTarget,
    #[error("occupant not found")]
    UnknownOccupant,
    #[error("{0} is dead")]
    OccupantDead(String),
    #[error("{category:?} items cannot be handed to occupants")]
    NotAssignable { category: ItemCategory },
    #[error("no {0:?} left in stock")]
    OutOfStock(SupplyKind),
    #[error("{name} already holds a {kind:?} item")]
    SlotOccupied { name: String, kind: SupplyKind },
    #[error("{name} holds no {kind:?} item")]
    SlotEmpty { name: String, kind: SupplyKind },
    #[error("map node {0} does not exist")]
    UnknownNode(u32),
    #[error("map node {0} was already visited")]
    NodeVisited(u32),
    #[error("map node {0} is not connected to the current node")]
    NodeUnreachable(u32),
    #[error("no escape map has been generated")]
    NoMap,
    #[error("the current node is not a {0:?}")]
    NotAtNode(NodeType),
    #[error("item {0} is not in the inventory")]
    UnknownItem(u32),
    #[error("item {0} cannot be used")]
    NotUsable(u32),
    #[error("inventory is full")]
    InventoryFull,
    #[error("the game is over")]
    GameFinished,
}

/// Configuration could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}
