use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{BoardState, Point, Snake};

/// Display attributes that are not part of the game state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeCosmetics {
    pub name: String,
    pub color: String,
    pub head: String,
    pub tail: String,
    pub squad: String,
    pub author: String,
}

/// Cosmetics keyed by snake id. Handed to the frame builder explicitly.
#[derive(Debug, Clone, Default)]
pub struct SnakeRegistry {
    entries: HashMap<String, SnakeCosmetics>,
}

impl SnakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, cosmetics: SnakeCosmetics) {
        self.entries.insert(id.into(), cosmetics);
    }

    pub fn get(&self, id: &str) -> Option<&SnakeCosmetics> {
        self.entries.get(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FrameCoord {
    pub x: i32,
    pub y: i32,
}

impl From<Point> for FrameCoord {
    fn from(point: Point) -> Self {
        Self {
            x: point.x,
            y: point.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FrameDeath {
    pub cause: String,
    pub turn: i32,
    pub eliminated_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FrameSnake {
    pub body: Vec<FrameCoord>,
    pub color: String,
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub health: i32,
    pub latency: i32,
    pub death: Option<FrameDeath>,
    pub head_type: String,
    pub tail_type: String,
    pub squad: String,
    pub author: String,
    pub shout: String,
}

impl FrameSnake {
    fn build(snake: &Snake, cosmetics: Option<&SnakeCosmetics>) -> Self {
        let cosmetics = cosmetics.cloned().unwrap_or_default();
        Self {
            body: snake.body.iter().copied().map(FrameCoord::from).collect(),
            color: cosmetics.color,
            id: snake.id.clone(),
            name: cosmetics.name,
            health: snake.health,
            latency: 0,
            death: snake.elimination.as_ref().map(|elimination| FrameDeath {
                cause: elimination.cause.to_string(),
                turn: elimination.turn,
                eliminated_by: elimination.by.clone(),
            }),
            head_type: cosmetics.head,
            tail_type: cosmetics.tail,
            squad: cosmetics.squad,
            author: cosmetics.author,
            shout: String::new(),
        }
    }
}

/// One turn as rendered by the board viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Frame {
    pub snakes: Vec<FrameSnake>,
    pub turn: i32,
    pub food: Vec<FrameCoord>,
    pub hazards: Vec<FrameCoord>,
}

impl Frame {
    /// Snake order follows the board, not the registry.
    pub fn from_state(state: &BoardState, registry: &SnakeRegistry) -> Self {
        Self {
            snakes: state
                .snakes
                .iter()
                .map(|snake| FrameSnake::build(snake, registry.get(&snake.id)))
                .collect(),
            turn: state.turn,
            food: state.food.iter().copied().map(FrameCoord::from).collect(),
            hazards: state.hazards.iter().copied().map(FrameCoord::from).collect(),
        }
    }
}
