use serde::{Deserialize, Serialize};

use crate::random::{MaxRand, Rand, SeededRand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandMode {
    #[default]
    Seeded,
    Max,
}

/// Tunables shared by rulesets and maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    /// Percent chance (0~100) of spawning one extra food per turn.
    pub food_spawn_chance: i32,
    pub minimum_food: i32,
    pub hazard_damage_per_turn: i32,
    pub shrink_every_n_turns: i32,
    pub seed: i64,
    pub rand_mode: RandMode,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            food_spawn_chance: 15,
            minimum_food: 1,
            hazard_damage_per_turn: 14,
            shrink_every_n_turns: 25,
            seed: 0,
            rand_mode: RandMode::Seeded,
        }
    }
}

impl RuleSettings {
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_rand_mode(mut self, rand_mode: RandMode) -> Self {
        self.rand_mode = rand_mode;
        self
    }

    /// Random stream for the given turn. The same `(seed, turn)` always
    /// yields the same stream.
    pub fn rand_for_turn(&self, turn: i32) -> Box<dyn Rand> {
        match self.rand_mode {
            RandMode::Seeded => Box::new(SeededRand::new(self.seed, i64::from(turn))),
            RandMode::Max => Box::new(MaxRand),
        }
    }
}
