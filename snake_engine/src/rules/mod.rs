//! Built-in rulesets. A ruleset owns one turn's movement, health, feeding and
//! elimination; board-shape changes belong to [`crate::maps`].

mod constrictor;
mod standard;
mod wrapped;

pub use constrictor::ConstrictorRuleset;
pub use standard::{RoyaleRuleset, SoloRuleset, StandardRuleset};
pub use wrapped::WrappedRuleset;

use crate::error::{EngineError, RulesError};
use crate::model::{BoardState, SnakeMove};
use crate::random::Rand;
use crate::settings::RuleSettings;

pub const GAME_TYPE_STANDARD: &str = "standard";
pub const GAME_TYPE_SOLO: &str = "solo";
pub const GAME_TYPE_ROYALE: &str = "royale";
pub const GAME_TYPE_CONSTRICTOR: &str = "constrictor";
pub const GAME_TYPE_WRAPPED: &str = "wrapped";

pub trait Ruleset: Send + Sync {
    fn name(&self) -> &str;

    /// Produces the board after one round of moves. The returned state keeps
    /// the input turn number; the engine owns turn advancement.
    fn execute(
        &self,
        state: &BoardState,
        moves: &[SnakeMove],
        rand: &mut dyn Rand,
    ) -> Result<BoardState, RulesError>;

    fn is_game_over(&self, state: &BoardState) -> bool;
}

/// Resolves a ruleset by its game-type name.
pub fn named(name: &str, settings: &RuleSettings) -> Result<Box<dyn Ruleset>, EngineError> {
    let settings = settings.clone();
    let ruleset: Box<dyn Ruleset> = match name {
        GAME_TYPE_STANDARD => Box::new(StandardRuleset::new(settings)),
        GAME_TYPE_SOLO => Box::new(SoloRuleset::new(settings)),
        GAME_TYPE_ROYALE => Box::new(RoyaleRuleset::new(settings)),
        GAME_TYPE_CONSTRICTOR => Box::new(ConstrictorRuleset::new(settings)),
        GAME_TYPE_WRAPPED => Box::new(WrappedRuleset::new(settings)),
        other => {
            return Err(EngineError::UnknownRuleset {
                name: other.to_string(),
            })
        }
    };
    Ok(ruleset)
}
