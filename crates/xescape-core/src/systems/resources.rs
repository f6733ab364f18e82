//! Travel resources: stamina and fuel, drained in real time while on the road

use serde::{Deserialize, Serialize};

use crate::components::SupplyEffect;
use crate::config::ResourceConfig;

/// Stamina and fuel gauges shared by the whole car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resources {
    pub stamina: f32,
    pub max_stamina: f32,
    pub fuel: f32,
    pub max_fuel: f32,
    /// Stamina lost per second while consuming
    pub stamina_rate: f32,
    /// Fuel burned per second while escaping
    pub fuel_rate: f32,
    pub consuming: bool,
}

impl Resources {
    pub fn from_config(config: &ResourceConfig) -> Self {
        Self {
            stamina: config.stamina.clamp(0.0, config.max_stamina),
            max_stamina: config.max_stamina,
            fuel: config.fuel.clamp(0.0, config.max_fuel),
            max_fuel: config.max_fuel,
            stamina_rate: config.stamina_rate,
            fuel_rate: config.fuel_rate,
            consuming: false,
        }
    }

    pub fn start_consuming(&mut self) {
        self.consuming = true;
    }

    pub fn stop_consuming(&mut self) {
        self.consuming = false;
    }

    pub fn consume_stamina(&mut self, amount: f32) {
        self.stamina = (self.stamina - amount).clamp(0.0, self.max_stamina);
    }

    pub fn consume_fuel(&mut self, amount: f32) {
        self.fuel = (self.fuel - amount).clamp(0.0, self.max_fuel);
    }

    pub fn restore_stamina(&mut self, amount: f32) {
        self.stamina = (self.stamina + amount).clamp(0.0, self.max_stamina);
    }

    pub fn restore_fuel(&mut self, amount: f32) {
        self.fuel = (self.fuel + amount).clamp(0.0, self.max_fuel);
    }

    pub fn apply(&mut self, effect: SupplyEffect) {
        match effect {
            SupplyEffect::Stamina(amount) => self.restore_stamina(amount),
            SupplyEffect::Fuel(amount) => self.restore_fuel(amount),
        }
    }

    /// Either gauge empty
    pub fn is_depleted(&self) -> bool {
        self.stamina <= 0.0 || self.fuel <= 0.0
    }

    pub fn stamina_fraction(&self) -> f32 {
        if self.max_stamina > 0.0 {
            self.stamina / self.max_stamina
        } else {
            0.0
        }
    }

    pub fn fuel_fraction(&self) -> f32 {
        if self.max_fuel > 0.0 {
            self.fuel / self.max_fuel
        } else {
            0.0
        }
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self::from_config(&ResourceConfig::default())
    }
}

/// Drain resources for one frame. Fuel only burns while escaping.
/// Returns true when this tick emptied a gauge.
pub fn resources_system(resources: &mut Resources, escaping: bool, delta_seconds: f32) -> bool {
    if !resources.consuming {
        return false;
    }

    let was_depleted = resources.is_depleted();
    resources.consume_stamina(resources.stamina_rate * delta_seconds);
    if escaping {
        resources.consume_fuel(resources.fuel_rate * delta_seconds);
    }

    !was_depleted && resources.is_depleted()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_resources_do_not_drain() {
        let mut resources = Resources::default();
        assert!(!resources_system(&mut resources, true, 10.0));
        assert_eq!(resources.stamina, 100.0);
        assert_eq!(resources.fuel, 100.0);
    }

    #[test]
    fn test_fuel_only_burns_while_escaping() {
        let mut resources = Resources::default();
        resources.start_consuming();

        resources_system(&mut resources, false, 10.0);
        assert!((resources.stamina - 90.0).abs() < 0.001);
        assert_eq!(resources.fuel, 100.0);

        resources_system(&mut resources, true, 10.0);
        assert!((resources.stamina - 80.0).abs() < 0.001);
        assert!((resources.fuel - 80.0).abs() < 0.001);
    }

    #[test]
    fn test_depletion_reported_once() {
        let mut resources = Resources::default();
        resources.start_consuming();
        resources.fuel = 3.0;

        assert!(resources_system(&mut resources, true, 2.0));
        assert_eq!(resources.fuel, 0.0);
        assert!(!resources_system(&mut resources, true, 2.0));
    }

    #[test]
    fn test_restore_clamps() {
        let mut resources = Resources::default();
        resources.consume_fuel(50.0);
        resources.apply(SupplyEffect::Fuel(80.0));
        assert_eq!(resources.fuel, 100.0);
        resources.consume_stamina(500.0);
        assert_eq!(resources.stamina, 0.0);
        assert!(resources.is_depleted());
    }
}
