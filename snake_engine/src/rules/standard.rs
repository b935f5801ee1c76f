use tracing::debug;

use super::{Ruleset, GAME_TYPE_ROYALE, GAME_TYPE_SOLO, GAME_TYPE_STANDARD};
use crate::error::RulesError;
use crate::model::{
    BoardState, Direction, EliminationCause, Point, Snake, SnakeMove, SNAKE_MAX_HEALTH,
};
use crate::random::Rand;
use crate::settings::RuleSettings;

pub(crate) fn validate(state: &BoardState) -> Result<(), RulesError> {
    if state.width < 1 || state.height < 1 {
        return Err(RulesError::InvalidBoard {
            width: state.width,
            height: state.height,
        });
    }
    if let Some(snake) = state.snakes.iter().find(|snake| snake.body.is_empty()) {
        return Err(RulesError::ZeroLengthSnake {
            snake_id: snake.id.clone(),
        });
    }
    Ok(())
}

/// Direction implied by the head and neck. Snakes without a neck head up.
pub(crate) fn default_direction(snake: &Snake, width: i32, height: i32) -> Direction {
    let (head, neck) = match (snake.body.first(), snake.body.get(1)) {
        (Some(head), Some(neck)) => (*head, *neck),
        _ => return Direction::Up,
    };
    let dx = head.x - neck.x;
    let dy = head.y - neck.y;
    match (dx, dy) {
        (1, 0) => Direction::Right,
        (-1, 0) => Direction::Left,
        (0, 1) => Direction::Up,
        (0, -1) => Direction::Down,
        // Neck on the far side of a wrapped edge.
        (dx, 0) if dx == -(width - 1) => Direction::Right,
        (dx, 0) if dx == width - 1 => Direction::Left,
        (0, dy) if dy == -(height - 1) => Direction::Up,
        (0, dy) if dy == height - 1 => Direction::Down,
        _ => Direction::Up,
    }
}

pub(crate) fn wrap_point(point: Point, width: i32, height: i32) -> Point {
    Point::new(point.x.rem_euclid(width), point.y.rem_euclid(height))
}

pub(crate) fn move_snakes(
    state: &mut BoardState,
    moves: &[SnakeMove],
    wrap: bool,
) -> Result<(), RulesError> {
    let (width, height) = (state.width, state.height);
    for snake in state.snakes.iter_mut().filter(|snake| !snake.is_eliminated()) {
        let Some(head) = snake.head() else {
            return Err(RulesError::ZeroLengthSnake {
                snake_id: snake.id.clone(),
            });
        };

        let direction = moves
            .iter()
            .find(|m| m.id == snake.id)
            .and_then(|m| Direction::parse(&m.direction))
            .unwrap_or_else(|| default_direction(snake, width, height));

        let mut next = head.step(direction);
        if wrap {
            next = wrap_point(next, width, height);
        }
        snake.body.insert(0, next);
        snake.body.pop();
    }
    Ok(())
}

pub(crate) fn reduce_health(state: &mut BoardState) {
    for snake in state.snakes.iter_mut().filter(|snake| !snake.is_eliminated()) {
        snake.health -= 1;
    }
}

pub(crate) fn damage_hazards(state: &mut BoardState, damage: i32) {
    let turn = state.turn + 1;
    for snake in state.snakes.iter_mut().filter(|snake| !snake.is_eliminated()) {
        let Some(head) = snake.head() else { continue };
        if !state.hazards.contains(&head) || state.food.contains(&head) {
            continue;
        }
        snake.health = (snake.health - damage).max(0);
        if snake.health == 0 {
            debug!(snake_id = %snake.id, turn, "snake eliminated by hazard");
            snake.eliminate(EliminationCause::Hazard, "", turn);
        }
    }
}

pub(crate) fn grow(snake: &mut Snake) {
    if let Some(tail) = snake.body.last().copied() {
        snake.body.push(tail);
    }
}

pub(crate) fn feed_snakes(state: &mut BoardState) {
    let mut remaining = Vec::with_capacity(state.food.len());
    for food in std::mem::take(&mut state.food) {
        let mut eaten = false;
        for snake in state.snakes.iter_mut().filter(|snake| !snake.is_eliminated()) {
            if snake.head() == Some(food) {
                snake.health = SNAKE_MAX_HEALTH;
                grow(snake);
                eaten = true;
            }
        }
        if !eaten {
            remaining.push(food);
        }
    }
    state.food = remaining;
}

pub(crate) fn eliminate_snakes(state: &mut BoardState) -> Result<(), RulesError> {
    let turn = state.turn + 1;
    let (width, height) = (state.width, state.height);
    let in_bounds = |p: Point| p.x >= 0 && p.x < width && p.y >= 0 && p.y < height;

    for snake in state.snakes.iter_mut().filter(|snake| !snake.is_eliminated()) {
        let Some(head) = snake.head() else {
            return Err(RulesError::ZeroLengthSnake {
                snake_id: snake.id.clone(),
            });
        };
        if snake.health <= 0 {
            snake.eliminate(EliminationCause::OutOfHealth, "", turn);
        } else if !in_bounds(head) {
            snake.eliminate(EliminationCause::OutOfBounds, "", turn);
        }
    }

    // Collisions are resolved against the same board, then applied together.
    let mut eliminations: Vec<(usize, EliminationCause, String)> = Vec::new();
    for (i, snake) in state.snakes.iter().enumerate() {
        if snake.is_eliminated() {
            continue;
        }
        let Some(head) = snake.head() else { continue };

        if snake.body[1..].contains(&head) {
            eliminations.push((i, EliminationCause::SelfCollision, snake.id.clone()));
            continue;
        }

        let others = || {
            state
                .snakes
                .iter()
                .enumerate()
                .filter(move |(j, other)| *j != i && !other.is_eliminated())
                .map(|(_, other)| other)
        };

        if let Some(other) = others().find(|other| other.body[1..].contains(&head)) {
            eliminations.push((i, EliminationCause::Collision, other.id.clone()));
            continue;
        }

        if let Some(other) = others()
            .find(|other| other.head() == Some(head) && snake.body.len() <= other.body.len())
        {
            eliminations.push((i, EliminationCause::HeadToHeadCollision, other.id.clone()));
        }
    }

    for (i, cause, by) in eliminations {
        let snake = &mut state.snakes[i];
        debug!(snake_id = %snake.id, %cause, by = %by, turn, "snake eliminated");
        snake.eliminate(cause, by, turn);
    }
    Ok(())
}

/// Shared pipeline: move, starve, hazards, feed, eliminate.
pub(crate) fn run_stages(
    state: &BoardState,
    moves: &[SnakeMove],
    settings: &RuleSettings,
    wrap: bool,
) -> Result<BoardState, RulesError> {
    validate(state)?;
    let mut next = state.clone();
    move_snakes(&mut next, moves, wrap)?;
    reduce_health(&mut next);
    damage_hazards(&mut next, settings.hazard_damage_per_turn);
    feed_snakes(&mut next);
    eliminate_snakes(&mut next)?;
    Ok(next)
}

pub struct StandardRuleset {
    settings: RuleSettings,
}

impl StandardRuleset {
    pub fn new(settings: RuleSettings) -> Self {
        Self { settings }
    }
}

impl Ruleset for StandardRuleset {
    fn name(&self) -> &str {
        GAME_TYPE_STANDARD
    }

    fn execute(
        &self,
        state: &BoardState,
        moves: &[SnakeMove],
        _rand: &mut dyn Rand,
    ) -> Result<BoardState, RulesError> {
        run_stages(state, moves, &self.settings, false)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        state.alive_count() <= 1
    }
}

/// Single-player variant: plays on until the last snake is gone.
pub struct SoloRuleset {
    settings: RuleSettings,
}

impl SoloRuleset {
    pub fn new(settings: RuleSettings) -> Self {
        Self { settings }
    }
}

impl Ruleset for SoloRuleset {
    fn name(&self) -> &str {
        GAME_TYPE_SOLO
    }

    fn execute(
        &self,
        state: &BoardState,
        moves: &[SnakeMove],
        _rand: &mut dyn Rand,
    ) -> Result<BoardState, RulesError> {
        run_stages(state, moves, &self.settings, false)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        state.alive_count() == 0
    }
}

/// Standard movement; the shrinking hazard ring comes from the royale map.
pub struct RoyaleRuleset {
    settings: RuleSettings,
}

impl RoyaleRuleset {
    pub fn new(settings: RuleSettings) -> Self {
        Self { settings }
    }
}

impl Ruleset for RoyaleRuleset {
    fn name(&self) -> &str {
        GAME_TYPE_ROYALE
    }

    fn execute(
        &self,
        state: &BoardState,
        moves: &[SnakeMove],
        _rand: &mut dyn Rand,
    ) -> Result<BoardState, RulesError> {
        run_stages(state, moves, &self.settings, false)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        state.alive_count() <= 1
    }
}
