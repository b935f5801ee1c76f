use super::standard::run_stages;
use super::{Ruleset, GAME_TYPE_WRAPPED};
use crate::error::RulesError;
use crate::model::{BoardState, SnakeMove};
use crate::random::Rand;
use crate::settings::RuleSettings;

/// Standard stages on a torus: leaving one edge re-enters at the opposite one.
pub struct WrappedRuleset {
    settings: RuleSettings,
}

impl WrappedRuleset {
    pub fn new(settings: RuleSettings) -> Self {
        Self { settings }
    }
}

impl Ruleset for WrappedRuleset {
    fn name(&self) -> &str {
        GAME_TYPE_WRAPPED
    }

    fn execute(
        &self,
        state: &BoardState,
        moves: &[SnakeMove],
        _rand: &mut dyn Rand,
    ) -> Result<BoardState, RulesError> {
        run_stages(state, moves, &self.settings, true)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        state.alive_count() <= 1
    }
}
