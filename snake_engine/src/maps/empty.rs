use super::{place_snakes, GameMap, MAP_EMPTY};
use crate::error::MapError;
use crate::model::BoardState;
use crate::random::Rand;
use crate::settings::RuleSettings;

/// Snakes only. No food is ever placed.
pub struct EmptyMap;

impl GameMap for EmptyMap {
    fn id(&self) -> &str {
        MAP_EMPTY
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
        place_snakes(MAP_EMPTY, &mut state, snake_ids, rand)?;
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
        _state: &mut BoardState,
        _settings: &RuleSettings,
        _rand: &mut dyn Rand,
    ) -> Result<(), MapError> {
        Ok(())
    }
}
