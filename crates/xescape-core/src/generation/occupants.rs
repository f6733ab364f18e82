//! Occupant generation - seats the family in the car

use hecs::{Entity, World};

use crate::components::{Occupant, Vec2, Vitals};
use crate::config::OccupantSpec;

/// Spawn one occupant per spec with full gauges
pub fn spawn_occupants(world: &mut World, specs: &[OccupantSpec]) -> Vec<Entity> {
    specs
        .iter()
        .map(|spec| {
            world.spawn((
                Occupant::new(spec.name.clone(), Vec2::from(spec.seat)),
                Vitals::full(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_default_family() {
        let mut world = World::new();
        let entities = spawn_occupants(&mut world, &GameConfig::default().occupants);
        assert_eq!(entities.len(), 3);

        let daughter = world.get::<&Occupant>(entities[2]).unwrap();
        assert_eq!(daughter.name, "Daughter");
        assert_eq!(daughter.seat, Vec2::new(0.0, -2.5));
    }
}
