//! Escape map generation - random nodes joined to their nearest neighbours

use hecs::{Entity, World};
use rand::Rng;

use super::names::generate_place_name;
use crate::components::{MapNode, NodeConnections, NodeType, Vec2};
use crate::config::MapConfig;
use crate::systems::is_border_reachable;

/// Entity handles of a generated map, indexed by node id
#[derive(Debug, Clone)]
pub struct MapLayout {
    pub nodes: Vec<Entity>,
    pub start: u32,
    /// The node every layout is guaranteed to have (always the last id)
    pub border: u32,
    pub current: u32,
    pub visible_range: f32,
}

impl MapLayout {
    pub fn node(&self, id: u32) -> Option<Entity> {
        self.nodes.get(id as usize).copied()
    }

    pub fn current_entity(&self) -> Option<Entity> {
        self.node(self.current)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Generate a map in the ECS world.
///
/// Layouts whose border cannot be reached from the start are thrown away
/// and rolled again, up to `max_generation_attempts` times.
pub fn generate_map(world: &mut World, config: &MapConfig, rng: &mut impl Rng) -> MapLayout {
    let attempts = config.max_generation_attempts.max(1);

    let mut layout = spawn_layout(world, config, rng);
    let mut attempt = 1;
    while !is_border_reachable(world, &layout) && attempt < attempts {
        despawn_layout(world, &layout);
        layout = spawn_layout(world, config, rng);
        attempt += 1;
    }

    if is_border_reachable(world, &layout) {
        log::debug!("map generated after {} attempt(s)", attempt);
    } else {
        log::warn!("no map with a reachable border after {} attempts", attempts);
    }
    layout
}

/// Remove every node of `layout` from the world
pub fn despawn_layout(world: &mut World, layout: &MapLayout) {
    for &entity in &layout.nodes {
        let _ = world.despawn(entity);
    }
}

fn spawn_layout(world: &mut World, config: &MapConfig, rng: &mut impl Rng) -> MapLayout {
    let total = config.total_nodes.max(2) as usize;
    let half_w = config.width / 2.0;
    let half_h = config.height / 2.0;

    let positions: Vec<Vec2> = (0..total)
        .map(|_| {
            Vec2::new(
                rng.gen_range(-half_w..=half_w),
                rng.gen_range(-half_h..=half_h),
            )
        })
        .collect();

    let types: Vec<NodeType> = (0..total)
        .map(|i| {
            if i == 0 {
                NodeType::Road
            } else if i == total - 1 {
                NodeType::Border
            } else {
                random_node_type(config, rng)
            }
        })
        .collect();

    let connections = nearest_neighbours(&positions, config.connections_per_node);

    let nodes = positions
        .iter()
        .zip(types)
        .zip(connections)
        .enumerate()
        .map(|(i, ((&position, node_type), connected_to))| {
            let name = generate_place_name(node_type, rng);
            world.spawn((
                MapNode::new(i as u32, name, node_type, position),
                NodeConnections { connected_to },
            ))
        })
        .collect();

    MapLayout {
        nodes,
        start: 0,
        border: (total - 1) as u32,
        current: 0,
        visible_range: config.visible_range,
    }
}

fn random_node_type(config: &MapConfig, rng: &mut impl Rng) -> NodeType {
    let roll: f32 = rng.gen();
    let border = config.border_probability;
    let danger = border + config.danger_probability;
    let town = danger + config.town_probability;

    if roll < border {
        NodeType::Border
    } else if roll < danger {
        NodeType::Danger
    } else if roll < town {
        NodeType::Town
    } else {
        NodeType::Road
    }
}

/// Outgoing edges: each node to its `k` nearest other nodes
fn nearest_neighbours(positions: &[Vec2], k: usize) -> Vec<Vec<u32>> {
    positions
        .iter()
        .enumerate()
        .map(|(i, from)| {
            let mut others: Vec<(u32, f32)> = positions
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(j, to)| (j as u32, from.distance_squared(to)))
                .collect();
            others.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
            others.into_iter().take(k).map(|(j, _)| j).collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_map_shape() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(42);
        let config = MapConfig::default();

        let layout = generate_map(&mut world, &config, &mut rng);
        assert_eq!(layout.len(), 20);
        assert_eq!(world.query::<&MapNode>().iter().count(), 20);
        assert_eq!(layout.border, 19);

        let start = world.get::<&MapNode>(layout.nodes[0]).unwrap();
        assert_eq!(start.node_type, NodeType::Road);
        let border = world.get::<&MapNode>(layout.nodes[19]).unwrap();
        assert_eq!(border.node_type, NodeType::Border);

        for (_, (node, conn)) in world.query::<(&MapNode, &NodeConnections)>().iter() {
            assert_eq!(conn.connected_to.len(), 3);
            assert!(!conn.is_connected(node.id));
            assert!(node.position.x.abs() <= 5.0 && node.position.y.abs() <= 5.0);
        }
    }

    #[test]
    fn test_nearest_neighbours() {
        let positions = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(2.0, 0.0),
        ];
        let edges = nearest_neighbours(&positions, 2);
        assert_eq!(edges[0], vec![1, 3]);
        assert_eq!(edges[2], vec![3, 1]);
    }

    #[test]
    fn test_two_node_map() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(1);
        let config = MapConfig {
            total_nodes: 2,
            ..Default::default()
        };
        let layout = generate_map(&mut world, &config, &mut rng);
        assert_eq!(layout.len(), 2);
        assert!(is_border_reachable(&world, &layout));
    }
}
