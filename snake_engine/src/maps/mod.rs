//! Board-shape hooks. A map decides where snakes and food start, and may
//! reshape the board before and after each ruleset step.

mod empty;
mod royale;
mod standard;

pub use empty::EmptyMap;
pub use royale::RoyaleMap;
pub use standard::StandardMap;

use crate::error::MapError;
use crate::model::{BoardState, Point, Snake, SNAKE_MAX_HEALTH, SNAKE_START_SIZE};
use crate::random::{shuffle_slice, Rand};
use crate::settings::RuleSettings;

pub const MAP_STANDARD: &str = "standard";
pub const MAP_EMPTY: &str = "empty";
pub const MAP_ROYALE: &str = "royale";

/// Boards at least this big use the fixed start positions.
const FIXED_START_MIN_SIZE: i32 = 7;

pub trait GameMap: Send + Sync {
    fn id(&self) -> &str;

    fn setup_board(
        &self,
        width: i32,
        height: i32,
        snake_ids: &[String],
        settings: &RuleSettings,
        rand: &mut dyn Rand,
    ) -> Result<BoardState, MapError>;

    fn pre_update_board(
        &self,
        state: &mut BoardState,
        settings: &RuleSettings,
        rand: &mut dyn Rand,
    ) -> Result<(), MapError>;

    fn post_update_board(
        &self,
        state: &mut BoardState,
        settings: &RuleSettings,
        rand: &mut dyn Rand,
    ) -> Result<(), MapError>;
}

pub fn get_map(id: &str) -> Result<Box<dyn GameMap>, MapError> {
    match id {
        MAP_STANDARD => Ok(Box::new(StandardMap)),
        MAP_EMPTY => Ok(Box::new(EmptyMap)),
        MAP_ROYALE => Ok(Box::new(RoyaleMap)),
        other => Err(MapError::UnknownMap {
            map_id: other.to_string(),
        }),
    }
}

/// Places every snake at full health with its whole body stacked on the
/// start square.
pub(crate) fn place_snakes(
    map_id: &str,
    state: &mut BoardState,
    snake_ids: &[String],
    rand: &mut dyn Rand,
) -> Result<(), MapError> {
    if state.width < 3 || state.height < 3 {
        return Err(MapError::BoardTooSmall {
            map_id: map_id.to_string(),
            width: state.width,
            height: state.height,
        });
    }

    let starts = if state.width >= FIXED_START_MIN_SIZE && state.height >= FIXED_START_MIN_SIZE {
        fixed_start_points(state.width, state.height, rand)
    } else {
        let mut points: Vec<Point> = state
            .unoccupied_points(false)
            .into_iter()
            .filter(|p| (p.x + p.y) % 2 == 0)
            .collect();
        shuffle_slice(rand, &mut points);
        points
    };

    if snake_ids.len() > starts.len() {
        return Err(MapError::TooManySnakes {
            map_id: map_id.to_string(),
            max: starts.len(),
            requested: snake_ids.len(),
        });
    }

    for (id, start) in snake_ids.iter().zip(starts) {
        state.snakes.push(Snake::new(
            id.clone(),
            vec![start; SNAKE_START_SIZE],
            SNAKE_MAX_HEALTH,
        ));
    }
    Ok(())
}

fn fixed_start_points(width: i32, height: i32, rand: &mut dyn Rand) -> Vec<Point> {
    let (min_x, max_x) = (1, width - 2);
    let (min_y, max_y) = (1, height - 2);
    let (mid_x, mid_y) = ((width - 1) / 2, (height - 1) / 2);

    let mut corners = vec![
        Point::new(min_x, min_y),
        Point::new(min_x, max_y),
        Point::new(max_x, min_y),
        Point::new(max_x, max_y),
    ];
    let mut cardinals = vec![
        Point::new(min_x, mid_y),
        Point::new(mid_x, min_y),
        Point::new(mid_x, max_y),
        Point::new(max_x, mid_y),
    ];
    shuffle_slice(rand, &mut corners);
    shuffle_slice(rand, &mut cardinals);

    if rand.intn(2) == 0 {
        cardinals.extend(corners);
        cardinals
    } else {
        corners.extend(cardinals);
        corners
    }
}

/// One food diagonal to each snake head, then one in the center.
pub(crate) fn place_initial_food(state: &mut BoardState, rand: &mut dyn Rand) {
    let center = Point::new((state.width - 1) / 2, (state.height - 1) / 2);
    let heads: Vec<Point> = state.snakes.iter().filter_map(|s| s.head()).collect();

    for head in heads {
        let candidates: Vec<Point> = [(-1, 1), (-1, -1), (1, 1), (1, -1)]
            .iter()
            .map(|(dx, dy)| Point::new(head.x + dx, head.y + dy))
            .filter(|p| state.in_bounds(*p) && *p != center)
            .filter(|p| !state.food.contains(p))
            .filter(|p| !state.snakes.iter().any(|s| s.body.contains(p)))
            .collect();
        if candidates.is_empty() {
            continue;
        }
        let pick = rand.intn(candidates.len() as i32) as usize;
        state.food.push(candidates[pick]);
    }

    let center_taken = state.food.contains(&center)
        || state.snakes.iter().any(|s| s.body.contains(&center));
    if !center_taken {
        state.food.push(center);
    }
}

/// Tops food up to the minimum, otherwise rolls the spawn chance for one more.
pub(crate) fn spawn_food(state: &mut BoardState, settings: &RuleSettings, rand: &mut dyn Rand) {
    let current = state.food.len() as i32;
    let wanted = if current < settings.minimum_food {
        settings.minimum_food - current
    } else if settings.food_spawn_chance > 0 && (100 - rand.intn(100)) < settings.food_spawn_chance
    {
        1
    } else {
        0
    };

    for _ in 0..wanted {
        let free = state.unoccupied_points(false);
        if free.is_empty() {
            break;
        }
        let pick = rand.intn(free.len() as i32) as usize;
        state.food.push(free[pick]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::MaxRand;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("snake-{i}")).collect()
    }

    #[test]
    fn get_map_rejects_unknown() {
        assert!(get_map(MAP_STANDARD).is_ok());
        assert_eq!(
            get_map("arcade_maze").err(),
            Some(MapError::UnknownMap {
                map_id: "arcade_maze".to_string()
            })
        );
    }

    #[test]
    fn fixed_starts_are_distinct() {
        let mut state = BoardState::new(11, 11);
        place_snakes(MAP_STANDARD, &mut state, &ids(8), &mut MaxRand).unwrap();
        let mut heads: Vec<Point> = state.snakes.iter().filter_map(|s| s.head()).collect();
        heads.sort();
        heads.dedup();
        assert_eq!(heads.len(), 8);
        for snake in &state.snakes {
            assert_eq!(snake.body.len(), SNAKE_START_SIZE);
            assert_eq!(snake.health, SNAKE_MAX_HEALTH);
        }
    }

    #[test]
    fn too_many_snakes_is_an_error() {
        let mut state = BoardState::new(11, 11);
        let err = place_snakes(MAP_STANDARD, &mut state, &ids(9), &mut MaxRand).unwrap_err();
        assert_eq!(
            err,
            MapError::TooManySnakes {
                map_id: MAP_STANDARD.to_string(),
                max: 8,
                requested: 9
            }
        );
    }

    #[test]
    fn small_boards_fall_back_to_random_placement() {
        let mut state = BoardState::new(5, 5);
        place_snakes(MAP_EMPTY, &mut state, &ids(2), &mut MaxRand).unwrap();
        assert_eq!(state.snakes.len(), 2);
        assert_ne!(state.snakes[0].head(), state.snakes[1].head());
    }

    #[test]
    fn spawn_food_tops_up_to_minimum() {
        let mut state = BoardState::new(5, 5);
        let settings = RuleSettings {
            minimum_food: 3,
            food_spawn_chance: 0,
            ..RuleSettings::default()
        };
        spawn_food(&mut state, &settings, &mut MaxRand);
        assert_eq!(state.food.len(), 3);
    }
}
