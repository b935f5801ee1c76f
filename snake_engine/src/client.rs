//! Game-request payloads as exchanged with snakes over the public API.

use serde::{Deserialize, Serialize};

use crate::frame::{SnakeCosmetics, SnakeRegistry};
use crate::maps::MAP_STANDARD;
use crate::model::{self, BoardState, EliminationCause, Point};
use crate::settings::RuleSettings;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl From<Coord> for Point {
    fn from(coord: Coord) -> Self {
        Point::new(coord.x, coord.y)
    }
}

impl From<Point> for Coord {
    fn from(point: Point) -> Self {
        Coord {
            x: point.x,
            y: point.y,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customizations {
    pub color: String,
    pub head: String,
    pub tail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snake {
    pub id: String,
    pub name: String,
    pub latency: String,
    pub health: i32,
    pub body: Vec<Coord>,
    pub head: Coord,
    pub length: i32,
    pub shout: String,
    pub squad: String,
    pub customizations: Customizations,
}

impl Snake {
    pub fn cosmetics(&self) -> SnakeCosmetics {
        SnakeCosmetics {
            name: self.name.clone(),
            color: self.customizations.color.clone(),
            head: self.customizations.head.clone(),
            tail: self.customizations.tail.clone(),
            squad: self.squad.clone(),
            author: String::new(),
        }
    }

    /// Rebuilds the API view of `snake`, carrying display fields from `source`.
    pub fn from_model(snake: &model::Snake, source: Option<&Snake>) -> Self {
        let body: Vec<Coord> = snake.body.iter().copied().map(Coord::from).collect();
        let source = source.cloned().unwrap_or_default();
        Snake {
            id: snake.id.clone(),
            name: source.name,
            latency: source.latency,
            health: if snake.is_eliminated() { 0 } else { snake.health },
            head: body.first().copied().unwrap_or_default(),
            length: body.len() as i32,
            body,
            shout: source.shout,
            squad: source.squad,
            customizations: source.customizations,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Board {
    pub height: i32,
    pub width: i32,
    pub food: Vec<Coord>,
    pub hazards: Vec<Coord>,
    pub snakes: Vec<Snake>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoyaleSettings {
    pub shrink_every_n_turns: i32,
}

impl Default for RoyaleSettings {
    fn default() -> Self {
        Self {
            shrink_every_n_turns: RuleSettings::default().shrink_every_n_turns,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RulesetSettings {
    pub food_spawn_chance: i32,
    pub minimum_food: i32,
    pub hazard_damage_per_turn: i32,
    pub royale: RoyaleSettings,
}

impl Default for RulesetSettings {
    fn default() -> Self {
        let defaults = RuleSettings::default();
        Self {
            food_spawn_chance: defaults.food_spawn_chance,
            minimum_food: defaults.minimum_food,
            hazard_damage_per_turn: defaults.hazard_damage_per_turn,
            royale: RoyaleSettings::default(),
        }
    }
}

impl RulesetSettings {
    pub fn rule_settings(&self) -> RuleSettings {
        RuleSettings {
            food_spawn_chance: self.food_spawn_chance,
            minimum_food: self.minimum_food,
            hazard_damage_per_turn: self.hazard_damage_per_turn,
            shrink_every_n_turns: self.royale.shrink_every_n_turns,
            ..RuleSettings::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    pub name: String,
    pub version: String,
    pub settings: RulesetSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Game {
    pub id: String,
    pub ruleset: Ruleset,
    pub map: String,
    pub timeout: i32,
    pub source: String,
}

impl Game {
    /// Requests that predate maps carry no map id; they play on the standard map.
    pub fn map_id(&self) -> &str {
        if self.map.is_empty() {
            MAP_STANDARD
        } else {
            &self.map
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeRequest {
    pub game: Game,
    pub turn: i32,
    pub board: Board,
    pub you: Snake,
}

impl SnakeRequest {
    /// Snapshot view of the request. Snakes arriving with no health are
    /// imported as already eliminated so the rules leave them in place.
    pub fn board_state(&self) -> BoardState {
        let mut state = BoardState::new(self.board.width, self.board.height);
        state.turn = self.turn;
        state.food = self.board.food.iter().copied().map(Point::from).collect();
        state.hazards = self.board.hazards.iter().copied().map(Point::from).collect();
        state.snakes = self
            .board
            .snakes
            .iter()
            .map(|snake| {
                let mut imported = model::Snake::new(
                    snake.id.clone(),
                    snake.body.iter().copied().map(Point::from).collect(),
                    snake.health,
                );
                if snake.health <= 0 {
                    imported.eliminate(EliminationCause::OutOfHealth, "", self.turn);
                }
                imported
            })
            .collect();
        state
    }

    pub fn snake_ids(&self) -> Vec<String> {
        self.board.snakes.iter().map(|snake| snake.id.clone()).collect()
    }

    pub fn registry(&self) -> SnakeRegistry {
        let mut registry = SnakeRegistry::new();
        for snake in &self.board.snakes {
            registry.insert(snake.id.clone(), snake.cosmetics());
        }
        registry
    }
}

/// One line of the batch protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveState {
    pub request: SnakeRequest,
    pub moves: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_decodes_public_api_keys() {
        let request: SnakeRequest = serde_json::from_value(json!({
            "game": {
                "id": "g1",
                "ruleset": {
                    "name": "royale",
                    "version": "v1.0.0",
                    "settings": {
                        "foodSpawnChance": 25,
                        "minimumFood": 2,
                        "hazardDamagePerTurn": 30,
                        "royale": {"shrinkEveryNTurns": 10}
                    }
                },
                "map": "",
                "timeout": 500
            },
            "turn": 3,
            "board": {
                "height": 11,
                "width": 11,
                "food": [{"x": 5, "y": 5}],
                "hazards": [],
                "snakes": [{
                    "id": "s1",
                    "name": "one",
                    "health": 0,
                    "body": [{"x": 1, "y": 1}],
                    "customizations": {"color": "#123456", "head": "default", "tail": "default"}
                }]
            },
            "you": {"id": "s1"}
        }))
        .unwrap();

        let settings = request.game.ruleset.settings.rule_settings();
        assert_eq!(settings.food_spawn_chance, 25);
        assert_eq!(settings.minimum_food, 2);
        assert_eq!(settings.hazard_damage_per_turn, 30);
        assert_eq!(settings.shrink_every_n_turns, 10);
        assert_eq!(request.game.map_id(), MAP_STANDARD);

        let state = request.board_state();
        assert_eq!(state.turn, 3);
        assert_eq!(state.food, vec![Point::new(5, 5)]);
        assert!(state.snakes[0].is_eliminated());

        let registry = request.registry();
        assert_eq!(registry.get("s1").map(|c| c.color.as_str()), Some("#123456"));
    }

    #[test]
    fn eliminated_snakes_report_zero_health() {
        let mut snake = model::Snake::new("s1", vec![Point::new(2, 3), Point::new(2, 2)], 40);
        snake.eliminate(EliminationCause::Collision, "s2", 9);
        let source = Snake {
            name: "one".to_string(),
            latency: "120".to_string(),
            ..Snake::default()
        };

        let api = Snake::from_model(&snake, Some(&source));
        assert_eq!(api.health, 0);
        assert_eq!(api.head, Coord { x: 2, y: 3 });
        assert_eq!(api.length, 2);
        assert_eq!(api.name, "one");
        assert_eq!(api.latency, "120");
    }
}
