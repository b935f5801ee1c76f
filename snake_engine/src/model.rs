use std::fmt;

use serde::{Deserialize, Serialize};

pub const SNAKE_MAX_HEALTH: i32 = 100;
pub const SNAKE_START_SIZE: usize = 3;

/// Board coordinate. `(0, 0)` is the bottom-left corner and `up` is +y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::new(self.x, self.y + 1),
            Direction::Down => Self::new(self.x, self.y - 1),
            Direction::Left => Self::new(self.x - 1, self.y),
            Direction::Right => Self::new(self.x + 1, self.y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Parses a move as sent by a snake. Anything else is treated as "no valid move".
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submitted move. `direction` is kept raw: unrecognized values fall back
/// to the snake's current heading when the ruleset applies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeMove {
    pub id: String,
    pub direction: String,
}

impl SnakeMove {
    pub fn new(id: impl Into<String>, direction: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            direction: direction.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EliminationCause {
    #[serde(rename = "out-of-health")]
    OutOfHealth,
    #[serde(rename = "wall-collision")]
    OutOfBounds,
    #[serde(rename = "self-collision")]
    SelfCollision,
    #[serde(rename = "collision")]
    Collision,
    #[serde(rename = "head-collision")]
    HeadToHeadCollision,
    #[serde(rename = "hazard")]
    Hazard,
}

impl EliminationCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            EliminationCause::OutOfHealth => "out-of-health",
            EliminationCause::OutOfBounds => "wall-collision",
            EliminationCause::SelfCollision => "self-collision",
            EliminationCause::Collision => "collision",
            EliminationCause::HeadToHeadCollision => "head-collision",
            EliminationCause::Hazard => "hazard",
        }
    }
}

impl fmt::Display for EliminationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Death record. `by` is empty when no other snake was responsible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elimination {
    pub cause: EliminationCause,
    pub by: String,
    pub turn: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    pub id: String,
    /// Head first, tail last.
    pub body: Vec<Point>,
    pub health: i32,
    pub elimination: Option<Elimination>,
}

impl Snake {
    pub fn new(id: impl Into<String>, body: Vec<Point>, health: i32) -> Self {
        Self {
            id: id.into(),
            body,
            health,
            elimination: None,
        }
    }

    pub fn head(&self) -> Option<Point> {
        self.body.first().copied()
    }

    pub fn is_eliminated(&self) -> bool {
        self.elimination.is_some()
    }

    pub fn eliminate(&mut self, cause: EliminationCause, by: impl Into<String>, turn: i32) {
        // The first recorded cause wins.
        if self.elimination.is_none() {
            self.elimination = Some(Elimination {
                cause,
                by: by.into(),
                turn,
            });
        }
    }
}

/// Minimal working state of one turn. Cosmetic data lives in
/// [`crate::frame::SnakeRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub width: i32,
    pub height: i32,
    pub turn: i32,
    pub food: Vec<Point>,
    pub hazards: Vec<Point>,
    pub snakes: Vec<Snake>,
}

impl BoardState {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            turn: 0,
            food: Vec::new(),
            hazards: Vec::new(),
            snakes: Vec::new(),
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn snake(&self, id: &str) -> Option<&Snake> {
        self.snakes.iter().find(|snake| snake.id == id)
    }

    pub fn alive_count(&self) -> usize {
        self.snakes.iter().filter(|snake| !snake.is_eliminated()).count()
    }

    /// Every point not covered by food or a live snake's body.
    pub fn unoccupied_points(&self, include_hazards: bool) -> Vec<Point> {
        let mut points = Vec::new();
        for x in 0..self.width {
            for y in 0..self.height {
                let p = Point::new(x, y);
                if self.food.contains(&p) {
                    continue;
                }
                if !include_hazards && self.hazards.contains(&p) {
                    continue;
                }
                let occupied = self
                    .snakes
                    .iter()
                    .filter(|snake| !snake.is_eliminated())
                    .any(|snake| snake.body.contains(&p));
                if !occupied {
                    points.push(p);
                }
            }
        }
        points
    }
}

/// Pairs a positional list of directions with the snakes of `state`, in
/// board order. Extra directions are ignored; snakes past the end of the list
/// get no move.
pub fn moves_in_board_order(state: &BoardState, directions: &[String]) -> Vec<SnakeMove> {
    state
        .snakes
        .iter()
        .zip(directions)
        .map(|(snake, direction)| SnakeMove::new(snake.id.clone(), direction.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_follows_board_orientation() {
        let p = Point::new(3, 3);
        assert_eq!(p.step(Direction::Up), Point::new(3, 4));
        assert_eq!(p.step(Direction::Down), Point::new(3, 2));
        assert_eq!(p.step(Direction::Left), Point::new(2, 3));
        assert_eq!(p.step(Direction::Right), Point::new(4, 3));
    }

    #[test]
    fn first_elimination_is_kept() {
        let mut snake = Snake::new("a", vec![Point::new(0, 0)], 10);
        snake.eliminate(EliminationCause::Hazard, "", 4);
        snake.eliminate(EliminationCause::Collision, "b", 4);
        let elimination = snake.elimination.unwrap();
        assert_eq!(elimination.cause, EliminationCause::Hazard);
        assert_eq!(elimination.by, "");
    }

    #[test]
    fn moves_pair_by_position() {
        let mut state = BoardState::new(5, 5);
        state.snakes.push(Snake::new("a", vec![Point::new(0, 0)], 100));
        state.snakes.push(Snake::new("b", vec![Point::new(4, 4)], 100));

        let moves = moves_in_board_order(&state, &["left".to_string()]);
        assert_eq!(moves, vec![SnakeMove::new("a", "left")]);
    }
}
