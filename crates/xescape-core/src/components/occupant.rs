//! Car occupant components: Occupant, Vitals, Dead and the item tokens
//! shown on an occupant's seat.

use super::common::Vec2;
use serde::{Deserialize, Serialize};

/// Upper bound of the satiety and disguise gauges
pub const STAT_MAX: f32 = 100.0;
/// One gauge level; gauges move in whole steps
pub const STAT_STEP: f32 = 20.0;
/// Consecutive day-decrements spent at zero satiety before an occupant dies
pub const STARVATION_DAYS: u32 = 2;

const SATIETY_STATUS: [&str; 6] = ["Empty", "Starving", "Hungry", "Peckish", "Satisfied", "Full"];
const DISGUISE_STATUS: [&str; 6] = ["Exposed", "Shaky", "Thin", "Passable", "Convincing", "Flawless"];

/// A passenger in the car, identified by display name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occupant {
    pub name: String,
    /// Seat position; items dropped near it are handed to this occupant
    pub seat: Vec2,
}

impl Occupant {
    pub fn new(name: impl Into<String>, seat: Vec2) -> Self {
        Self {
            name: name.into(),
            seat,
        }
    }
}

/// Per-occupant gauges. Satiety and disguise are always within [0, 100].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Vitals {
    satiety: f32,
    disguise: f32,
    pub health: f32,
    pub max_health: f32,
    /// Day-decrements in a row that left satiety at zero
    zero_satiety_days: u32,
}

impl Default for Vitals {
    fn default() -> Self {
        Self::full()
    }
}

impl Vitals {
    /// Fresh occupant: every gauge at the top level
    pub fn full() -> Self {
        Self {
            satiety: STAT_MAX,
            disguise: STAT_MAX,
            health: 100.0,
            max_health: 100.0,
            zero_satiety_days: 0,
        }
    }

    pub fn satiety(&self) -> f32 {
        self.satiety
    }

    pub fn disguise(&self) -> f32 {
        self.disguise
    }

    pub fn zero_satiety_days(&self) -> u32 {
        self.zero_satiety_days
    }

    pub fn set_satiety(&mut self, value: f32) {
        self.satiety = value.clamp(0.0, STAT_MAX);
        if self.satiety > 0.0 {
            self.zero_satiety_days = 0;
        }
    }

    pub fn set_disguise(&mut self, value: f32) {
        self.disguise = value.clamp(0.0, STAT_MAX);
    }

    /// Drop satiety by one step. Returns true once the occupant has spent
    /// `STARVATION_DAYS` consecutive decrements at zero.
    pub fn decrease_satiety_level(&mut self) -> bool {
        self.satiety = (self.satiety - STAT_STEP).clamp(0.0, STAT_MAX);
        if self.satiety <= 0.0 {
            self.zero_satiety_days += 1;
        } else {
            self.zero_satiety_days = 0;
        }
        self.is_starved()
    }

    pub fn decrease_disguise_level(&mut self) {
        self.disguise = (self.disguise - STAT_STEP).clamp(0.0, STAT_MAX);
    }

    pub fn is_starved(&self) -> bool {
        self.zero_satiety_days >= STARVATION_DAYS
    }

    /// Gauge level 0..=5 (a partial step rounds up)
    pub fn satiety_level(&self) -> usize {
        level_of(self.satiety)
    }

    pub fn disguise_level(&self) -> usize {
        level_of(self.disguise)
    }

    pub fn satiety_status(&self) -> &'static str {
        SATIETY_STATUS[self.satiety_level()]
    }

    pub fn disguise_status(&self) -> &'static str {
        DISGUISE_STATUS[self.disguise_level()]
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }
}

fn level_of(value: f32) -> usize {
    ((value / STAT_STEP).ceil() as usize).min(SATIETY_STATUS.len() - 1)
}

/// Marker for a dead occupant. Permanent: nothing removes it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Dead;

/// The two kinds of supply that can be handed to an occupant in the car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupplyKind {
    Food,
    Disguise,
}

impl SupplyKind {
    /// Where the token sits relative to the seat (food above, disguise below)
    pub fn token_offset(&self) -> Vec2 {
        match self {
            SupplyKind::Food => Vec2::new(0.0, 0.8),
            SupplyKind::Disguise => Vec2::new(0.0, -0.3),
        }
    }

    /// Where the cancel button sits relative to the seat
    pub fn cancel_offset(&self) -> Vec2 {
        match self {
            SupplyKind::Food => Vec2::new(0.4, 1.1),
            SupplyKind::Disguise => Vec2::new(0.4, 0.0),
        }
    }
}

/// A supply item resting on an occupant's seat, waiting to be consumed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemToken {
    pub owner: String,
    pub kind: SupplyKind,
    pub position: Vec2,
}

/// Clickable button that takes an assigned item back into stock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelButton {
    pub owner: String,
    pub kind: SupplyKind,
    pub position: Vec2,
    /// Half size of the square click area
    pub half_size: f32,
}

impl CancelButton {
    pub fn contains(&self, point: Vec2) -> bool {
        (point.x - self.position.x).abs() <= self.half_size
            && (point.y - self.position.y).abs() <= self.half_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauges_clamp() {
        let mut vitals = Vitals::full();
        vitals.set_satiety(140.0);
        vitals.set_disguise(-5.0);
        assert_eq!(vitals.satiety(), 100.0);
        assert_eq!(vitals.disguise(), 0.0);
    }

    #[test]
    fn test_satiety_steps_down_to_zero() {
        let mut vitals = Vitals::full();
        for expected in [80.0, 60.0, 40.0, 20.0, 0.0] {
            assert!(!vitals.decrease_satiety_level());
            assert_eq!(vitals.satiety(), expected);
        }
        assert_eq!(vitals.zero_satiety_days(), 1);
    }

    #[test]
    fn test_second_zero_day_starves() {
        let mut vitals = Vitals::full();
        vitals.set_satiety(20.0);
        assert!(!vitals.decrease_satiety_level());
        assert!(vitals.decrease_satiety_level());
        assert_eq!(vitals.satiety(), 0.0);
    }

    #[test]
    fn test_feeding_resets_streak() {
        let mut vitals = Vitals::full();
        vitals.set_satiety(0.0);
        assert!(!vitals.decrease_satiety_level());
        vitals.set_satiety(100.0);
        assert_eq!(vitals.zero_satiety_days(), 0);
        assert!(!vitals.decrease_satiety_level());
    }

    #[test]
    fn test_disguise_never_kills() {
        let mut vitals = Vitals::full();
        for _ in 0..10 {
            vitals.decrease_disguise_level();
        }
        assert_eq!(vitals.disguise(), 0.0);
        assert!(!vitals.is_starved());
    }

    #[test]
    fn test_status_text() {
        let mut vitals = Vitals::full();
        assert_eq!(vitals.satiety_status(), "Full");
        assert_eq!(vitals.disguise_status(), "Flawless");
        vitals.set_satiety(30.0);
        assert_eq!(vitals.satiety_level(), 2);
        assert_eq!(vitals.satiety_status(), "Hungry");
        vitals.set_disguise(0.0);
        assert_eq!(vitals.disguise_status(), "Exposed");
    }

    #[test]
    fn test_health_fraction() {
        let mut vitals = Vitals::full();
        vitals.health = 50.0;
        assert!((vitals.health_fraction() - 0.5).abs() < 0.001);
        vitals.max_health = 0.0;
        assert_eq!(vitals.health_fraction(), 0.0);
    }
}
