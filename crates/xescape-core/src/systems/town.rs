//! Town supply search: a timed search that restores stamina and fuel

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::TownConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TownSearch {
    pub menu_open: bool,
    pub searching: bool,
    /// Seconds into the current search
    pub elapsed: f32,
    pub search_time: f32,
    pub min_gain: f32,
    pub max_gain: f32,
}

/// Supplies found by a finished search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub stamina: f32,
    pub fuel: f32,
}

impl TownSearch {
    pub fn from_config(config: &TownConfig) -> Self {
        Self {
            menu_open: false,
            searching: false,
            elapsed: 0.0,
            search_time: config.search_time,
            min_gain: config.min_resource_gain,
            max_gain: config.max_resource_gain,
        }
    }

    pub fn open_menu(&mut self) {
        self.menu_open = true;
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    /// Begin a search. Ignored (returns false) while one is running.
    pub fn start_search(&mut self) -> bool {
        if self.searching {
            return false;
        }
        self.searching = true;
        self.elapsed = 0.0;
        true
    }

    /// Seconds left in the running search
    pub fn remaining(&self) -> f32 {
        if self.searching {
            (self.search_time - self.elapsed).max(0.0)
        } else {
            0.0
        }
    }

    /// Advance the search timer; yields the gains once the search completes
    pub fn update(&mut self, delta_seconds: f32, rng: &mut impl Rng) -> Option<SearchResult> {
        if !self.searching {
            return None;
        }
        self.elapsed += delta_seconds;
        if self.elapsed < self.search_time {
            return None;
        }

        self.searching = false;
        self.elapsed = 0.0;
        Some(SearchResult {
            stamina: self.roll_gain(rng),
            fuel: self.roll_gain(rng),
        })
    }

    fn roll_gain(&self, rng: &mut impl Rng) -> f32 {
        if self.max_gain > self.min_gain {
            rng.gen_range(self.min_gain..self.max_gain)
        } else {
            self.min_gain
        }
    }
}

impl Default for TownSearch {
    fn default() -> Self {
        Self::from_config(&TownConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_search_completes_after_search_time() {
        let mut town = TownSearch::default();
        let mut rng = StdRng::seed_from_u64(5);

        assert!(town.update(1.0, &mut rng).is_none());
        assert!(town.start_search());
        assert!(!town.start_search());

        assert!(town.update(2.0, &mut rng).is_none());
        assert!((town.remaining() - 1.0).abs() < 0.001);

        let result = town.update(1.5, &mut rng).expect("search finished");
        assert!((10.0..30.0).contains(&result.stamina));
        assert!((10.0..30.0).contains(&result.fuel));
        assert!(!town.searching);
        assert!(town.start_search());
    }
}
