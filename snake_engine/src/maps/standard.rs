use super::{place_initial_food, place_snakes, spawn_food, GameMap, MAP_STANDARD};
use crate::error::MapError;
use crate::model::BoardState;
use crate::random::Rand;
use crate::settings::RuleSettings;

pub struct StandardMap;

impl GameMap for StandardMap {
    fn id(&self) -> &str {
        MAP_STANDARD
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
        place_snakes(MAP_STANDARD, &mut state, snake_ids, rand)?;
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
        Ok(())
    }
}
