//! Place names for escape map nodes

use crate::components::NodeType;
use rand::Rng;

/// Generate a place name fitting the node type
pub fn generate_place_name(node_type: NodeType, rng: &mut impl Rng) -> String {
    match node_type {
        NodeType::Town => {
            let stem = TOWN_STEMS[rng.gen_range(0..TOWN_STEMS.len())];
            let suffix = TOWN_SUFFIXES[rng.gen_range(0..TOWN_SUFFIXES.len())];
            format!("{}{}", stem, suffix)
        }
        NodeType::Road => {
            let kind = ROAD_KINDS[rng.gen_range(0..ROAD_KINDS.len())];
            format!("{} {}", kind, rng.gen_range(1..=99))
        }
        NodeType::Danger => DANGER_PLACES[rng.gen_range(0..DANGER_PLACES.len())].to_string(),
        NodeType::Border => BORDER_PLACES[rng.gen_range(0..BORDER_PLACES.len())].to_string(),
    }
}

static TOWN_STEMS: &[&str] = &[
    "Ash", "Birch", "Cold", "Elm", "Fair", "Grey", "High", "Iron", "Lake", "Mill", "North", "Oak",
    "Red", "Stone", "West", "Wolf",
];

static TOWN_SUFFIXES: &[&str] = &[
    "ford", "field", "haven", "ton", "bury", "wick", "dale", "brook",
];

static ROAD_KINDS: &[&str] = &["Route", "Highway", "Old Road", "Farm Track"];

static DANGER_PLACES: &[&str] = &[
    "Checkpoint",
    "Patrol Post",
    "Collapsed Bridge",
    "Burned Village",
    "Roadblock",
    "Minefield Edge",
];

static BORDER_PLACES: &[&str] = &["Border Crossing", "Mountain Pass", "River Ferry"];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_names_match_type() {
        let mut rng = StdRng::seed_from_u64(3);
        let road = generate_place_name(NodeType::Road, &mut rng);
        assert!(ROAD_KINDS.iter().any(|k| road.starts_with(k)));
        let border = generate_place_name(NodeType::Border, &mut rng);
        assert!(BORDER_PLACES.contains(&border.as_str()));
        assert!(!generate_place_name(NodeType::Town, &mut rng).is_empty());
    }
}
