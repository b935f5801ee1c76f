use tracing::trace;

use super::{place_initial_food, place_snakes, spawn_food, GameMap, MAP_ROYALE};
use crate::error::MapError;
use crate::model::{BoardState, Point};
use crate::random::{Rand, SeededRand};
use crate::settings::RuleSettings;

/// Standard food plus a hazard ring that closes in every
/// `shrink_every_n_turns` turns.
pub struct RoyaleMap;

impl RoyaleMap {
    /// Rebuilds the hazard set for `turn`. The shrink sequence only depends on
    /// the game seed, so every turn replays the same edges in the same order.
    fn apply_shrink(
        state: &mut BoardState,
        settings: &RuleSettings,
        turn: i32,
    ) -> Result<(), MapError> {
        let every = settings.shrink_every_n_turns;
        if every < 1 {
            return Err(MapError::InvalidParameter {
                name: "shrink_every_n_turns",
                value: every,
            });
        }
        if turn < every {
            return Ok(());
        }

        let mut rand = SeededRand::new(settings.seed, 0);
        let (mut min_x, mut max_x) = (0, state.width - 1);
        let (mut min_y, mut max_y) = (0, state.height - 1);
        for _ in 0..turn / every {
            match rand.intn(4) {
                0 if min_x < max_x => min_x += 1,
                1 if max_x > min_x => max_x -= 1,
                2 if min_y < max_y => min_y += 1,
                3 if max_y > min_y => max_y -= 1,
                _ => {}
            }
        }
        trace!(turn, min_x, max_x, min_y, max_y, "royale safe zone");

        state.hazards.clear();
        for x in 0..state.width {
            for y in 0..state.height {
                if x < min_x || x > max_x || y < min_y || y > max_y {
                    state.hazards.push(Point::new(x, y));
                }
            }
        }
        Ok(())
    }
}

impl GameMap for RoyaleMap {
    fn id(&self) -> &str {
        MAP_ROYALE
    }

    fn setup_board(
        &self,
        width: i32,
        height: i32,
        snake_ids: &[String],
        _settings: &RuleSettings,
        rand: &mut dyn Rand,
    ) -> Result<BoardState, MapError> {
        let mut state = BoardState::new(width, height);
        place_snakes(MAP_ROYALE, &mut state, snake_ids, rand)?;
        place_initial_food(&mut state, rand);
        Ok(state)
    }

    fn pre_update_board(
        &self,
        _state: &mut BoardState,
        _settings: &RuleSettings,
        _rand: &mut dyn Rand,
    ) -> Result<(), MapError> {
        Ok(())
    }

    fn post_update_board(
        &self,
        state: &mut BoardState,
        settings: &RuleSettings,
        rand: &mut dyn Rand,
    ) -> Result<(), MapError> {
        spawn_food(state, settings, rand);
        // The hook runs before the turn counter moves on.
        let turn = state.turn + 1;
        Self::apply_shrink(state, settings, turn)
    }
}
