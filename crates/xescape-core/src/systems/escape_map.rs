//! Escape map traversal: fog-of-war, reachability and node arrival

use hecs::World;
use rand::Rng;
use std::collections::{HashSet, VecDeque};

use crate::components::{MapNode, NodeConnections, NodeType, Vec2};
use crate::config::MapConfig;
use crate::error::GameError;
use crate::generation::MapLayout;

/// What happened on arriving at a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeArrival {
    Road,
    /// Supplies can be searched for here
    Town,
    Danger { stamina_loss: f32, fuel_loss: f32 },
    Border,
}

/// Visit the start node and reveal its surroundings
pub fn initialize_map(world: &mut World, layout: &mut MapLayout) {
    layout.current = layout.start;
    if let Some(entity) = layout.node(layout.start) {
        if let Ok(mut node) = world.get::<&mut MapNode>(entity) {
            node.visit();
        }
    }
    update_visible_nodes(world, layout);
}

/// Reveal nodes within `visible_range` of the current node. Visited nodes
/// stay revealed; everything else is hidden.
pub fn update_visible_nodes(world: &mut World, layout: &MapLayout) {
    let Some(current) = current_position(world, layout) else {
        return;
    };
    let range_sq = layout.visible_range * layout.visible_range;

    for (_, node) in world.query_mut::<&mut MapNode>() {
        let visible = node.id == layout.current
            || node.visited
            || node.position.distance_squared(&current) <= range_sq;
        node.set_visible(visible);
    }
}

fn current_position(world: &World, layout: &MapLayout) -> Option<Vec2> {
    let entity = layout.current_entity()?;
    let node = world.get::<&MapNode>(entity).ok()?;
    Some(node.position)
}

/// Whether `id` is one of the current node's outgoing edges
pub fn is_node_reachable(world: &World, layout: &MapLayout, id: u32) -> bool {
    layout
        .current_entity()
        .and_then(|entity| world.get::<&NodeConnections>(entity).ok())
        .is_some_and(|conn| conn.is_connected(id))
}

/// Breadth-first search from the start node to the border node
pub fn is_border_reachable(world: &World, layout: &MapLayout) -> bool {
    let mut seen = HashSet::from([layout.start]);
    let mut queue = VecDeque::from([layout.start]);

    while let Some(id) = queue.pop_front() {
        if id == layout.border {
            return true;
        }
        let Some(entity) = layout.node(id) else {
            continue;
        };
        if let Ok(conn) = world.get::<&NodeConnections>(entity) {
            for &next in &conn.connected_to {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }

    false
}

/// Visible node whose marker contains `point`
pub fn node_at(world: &World, point: Vec2, radius: f32) -> Option<u32> {
    world
        .query::<&MapNode>()
        .iter()
        .find(|(_, node)| node.visible && node.position.distance_squared(&point) <= radius * radius)
        .map(|(_, node)| node.id)
}

/// Travel to node `id`.
///
/// Rejected when the node does not exist, was already visited or is not
/// connected to the current node. Otherwise the car moves there, the node is
/// visited, fog-of-war is updated and the arrival is reported. Danger losses
/// are rolled here and applied by the caller.
pub fn select_node(
    world: &mut World,
    layout: &mut MapLayout,
    id: u32,
    config: &MapConfig,
    rng: &mut impl Rng,
) -> Result<NodeArrival, GameError> {
    let entity = layout.node(id).ok_or(GameError::UnknownNode(id))?;
    let node_type = {
        let node = world
            .get::<&MapNode>(entity)
            .map_err(|_| GameError::UnknownNode(id))?;
        if node.visited {
            return Err(GameError::NodeVisited(id));
        }
        node.node_type
    };
    if !is_node_reachable(world, layout, id) {
        return Err(GameError::NodeUnreachable(id));
    }

    layout.current = id;
    if let Ok(mut node) = world.get::<&mut MapNode>(entity) {
        node.visit();
    }

    let arrival = match node_type {
        NodeType::Road => NodeArrival::Road,
        NodeType::Town => NodeArrival::Town,
        NodeType::Border => NodeArrival::Border,
        NodeType::Danger => NodeArrival::Danger {
            stamina_loss: roll(config.danger_stamina_loss, rng),
            fuel_loss: roll(config.danger_fuel_loss, rng),
        },
    };

    update_visible_nodes(world, layout);
    log::info!("arrived at node {} ({})", id, node_type.label());
    Ok(arrival)
}

fn roll([min, max]: [f32; 2], rng: &mut impl Rng) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Line of four nodes one unit apart: 0 -> 1 -> 2 -> 3 (border)
    fn line_map(world: &mut World, types: [NodeType; 4]) -> MapLayout {
        let nodes = types
            .iter()
            .enumerate()
            .map(|(i, &node_type)| {
                let mut conn = NodeConnections::new();
                if i + 1 < types.len() {
                    conn.connect(i as u32 + 1);
                }
                world.spawn((
                    MapNode::new(i as u32, format!("N{}", i), node_type, Vec2::new(i as f32 * 1.5, 0.0)),
                    conn,
                ))
            })
            .collect();
        MapLayout {
            nodes,
            start: 0,
            border: 3,
            current: 0,
            visible_range: 2.0,
        }
    }

    fn node(world: &World, layout: &MapLayout, id: u32) -> MapNode {
        (*world.get::<&MapNode>(layout.nodes[id as usize]).unwrap()).clone()
    }

    #[test]
    fn test_initialize_reveals_neighbourhood() {
        let mut world = World::new();
        let mut layout = line_map(&mut world, [NodeType::Road; 4]);
        initialize_map(&mut world, &mut layout);

        assert!(node(&world, &layout, 0).visited);
        assert!(node(&world, &layout, 1).visible);
        assert!(!node(&world, &layout, 2).visible);
    }

    #[test]
    fn test_select_rejections() {
        let mut world = World::new();
        let mut layout = line_map(&mut world, [NodeType::Road; 4]);
        initialize_map(&mut world, &mut layout);
        let config = MapConfig::default();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            select_node(&mut world, &mut layout, 9, &config, &mut rng),
            Err(GameError::UnknownNode(9))
        );
        assert_eq!(
            select_node(&mut world, &mut layout, 0, &config, &mut rng),
            Err(GameError::NodeVisited(0))
        );
        assert_eq!(
            select_node(&mut world, &mut layout, 2, &config, &mut rng),
            Err(GameError::NodeUnreachable(2))
        );
        assert_eq!(layout.current, 0);
    }

    #[test]
    fn test_walk_to_border() {
        let mut world = World::new();
        let mut layout = line_map(
            &mut world,
            [NodeType::Road, NodeType::Danger, NodeType::Town, NodeType::Border],
        );
        initialize_map(&mut world, &mut layout);
        let config = MapConfig::default();
        let mut rng = StdRng::seed_from_u64(0);

        match select_node(&mut world, &mut layout, 1, &config, &mut rng) {
            Ok(NodeArrival::Danger {
                stamina_loss,
                fuel_loss,
            }) => {
                assert!((10.0..30.0).contains(&stamina_loss));
                assert!((15.0..25.0).contains(&fuel_loss));
            }
            other => panic!("expected danger, got {:?}", other),
        }
        assert_eq!(
            select_node(&mut world, &mut layout, 2, &config, &mut rng),
            Ok(NodeArrival::Town)
        );
        // Visited nodes stay revealed after moving away
        assert!(node(&world, &layout, 0).visible);
        assert_eq!(
            select_node(&mut world, &mut layout, 3, &config, &mut rng),
            Ok(NodeArrival::Border)
        );
        assert_eq!(layout.current, 3);
    }

    #[test]
    fn test_border_reachability() {
        let mut world = World::new();
        let layout = line_map(&mut world, [NodeType::Road; 4]);
        assert!(is_border_reachable(&world, &layout));

        world
            .get::<&mut NodeConnections>(layout.nodes[1])
            .unwrap()
            .connected_to
            .clear();
        assert!(!is_border_reachable(&world, &layout));
    }

    #[test]
    fn test_node_at_ignores_hidden() {
        let mut world = World::new();
        let mut layout = line_map(&mut world, [NodeType::Road; 4]);
        initialize_map(&mut world, &mut layout);
        assert_eq!(node_at(&world, Vec2::new(1.5, 0.1), 0.3), Some(1));
        assert_eq!(node_at(&world, Vec2::new(4.5, 0.0), 0.3), None);
    }
}
