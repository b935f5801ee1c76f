use tracing::{debug, instrument};

use crate::error::{EngineError, EngineResult};
use crate::frame::{Frame, SnakeRegistry};
use crate::maps::{self, GameMap};
use crate::model::{BoardState, SnakeMove};
use crate::rules::{self, Ruleset};
use crate::settings::RuleSettings;

/// Applies a ruleset and a map's board hooks to move a snapshot forward one
/// turn. Holds no per-game state; every call is a pure function of its
/// inputs and the settings.
pub struct TurnEngine {
    ruleset: Box<dyn Ruleset>,
    map: Box<dyn GameMap>,
    settings: RuleSettings,
}

impl TurnEngine {
    pub fn new(ruleset: Box<dyn Ruleset>, map: Box<dyn GameMap>, settings: RuleSettings) -> Self {
        Self {
            ruleset,
            map,
            settings,
        }
    }

    /// Resolves both collaborators by name.
    pub fn from_names(ruleset: &str, map_id: &str, settings: RuleSettings) -> EngineResult<Self> {
        let ruleset = rules::named(ruleset, &settings)?;
        let map = maps::get_map(map_id).map_err(EngineError::MapSetup)?;
        Ok(Self::new(ruleset, map, settings))
    }

    pub fn ruleset_name(&self) -> &str {
        self.ruleset.name()
    }

    pub fn setup_board(
        &self,
        width: i32,
        height: i32,
        snake_ids: &[String],
    ) -> EngineResult<BoardState> {
        let mut rand = self.settings.rand_for_turn(0);
        self.map
            .setup_board(width, height, snake_ids, &self.settings, rand.as_mut())
            .map_err(EngineError::MapSetup)
    }

    /// pre-update hook, ruleset step, post-update hook, then `turn + 1`.
    /// Nothing from a failed call is observable.
    #[instrument(
        level = "debug",
        skip_all,
        fields(turn = state.turn, ruleset = self.ruleset.name())
    )]
    pub fn advance(&self, state: &BoardState, moves: &[SnakeMove]) -> EngineResult<BoardState> {
        let mut rand = self.settings.rand_for_turn(state.turn);

        let mut working = state.clone();
        self.map
            .pre_update_board(&mut working, &self.settings, rand.as_mut())
            .map_err(EngineError::PreUpdate)?;

        let mut next = self.ruleset.execute(&working, moves, rand.as_mut())?;

        self.map
            .post_update_board(&mut next, &self.settings, rand.as_mut())
            .map_err(EngineError::PostUpdate)?;

        next.turn = state.turn + 1;
        for snake in next.snakes.iter_mut().filter(|snake| snake.is_eliminated()) {
            snake.health = 0;
        }

        debug!(alive = next.alive_count(), "turn advanced");
        Ok(next)
    }

    pub fn frame(&self, state: &BoardState, registry: &SnakeRegistry) -> Frame {
        Frame::from_state(state, registry)
    }

    pub fn is_game_over(&self, state: &BoardState) -> bool {
        self.ruleset.is_game_over(state)
    }
}
