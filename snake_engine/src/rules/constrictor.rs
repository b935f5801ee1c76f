use super::standard::{grow, run_stages};
use super::{Ruleset, GAME_TYPE_CONSTRICTOR};
use crate::error::RulesError;
use crate::model::{BoardState, SnakeMove, SNAKE_MAX_HEALTH};
use crate::random::Rand;
use crate::settings::RuleSettings;

/// No food; every surviving snake grows each turn at full health.
pub struct ConstrictorRuleset {
    settings: RuleSettings,
}

impl ConstrictorRuleset {
    pub fn new(settings: RuleSettings) -> Self {
        Self { settings }
    }
}

impl Ruleset for ConstrictorRuleset {
    fn name(&self) -> &str {
        GAME_TYPE_CONSTRICTOR
    }

    fn execute(
        &self,
        state: &BoardState,
        moves: &[SnakeMove],
        _rand: &mut dyn Rand,
    ) -> Result<BoardState, RulesError> {
        let mut next = run_stages(state, moves, &self.settings, false)?;
        next.food.clear();
        for snake in next.snakes.iter_mut().filter(|snake| !snake.is_eliminated()) {
            snake.health = SNAKE_MAX_HEALTH;
            grow(snake);
        }
        Ok(next)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        state.alive_count() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Point, Snake};
    use crate::random::MaxRand;

    #[test]
    fn snakes_grow_every_turn_and_food_is_cleared() {
        let mut state = BoardState::new(7, 7);
        state.food = vec![Point::new(0, 6)];
        state.snakes = vec![
            Snake::new("a", vec![Point::new(1, 1), Point::new(1, 0)], 40),
            Snake::new("b", vec![Point::new(5, 5), Point::new(5, 4)], 40),
        ];

        let next = ConstrictorRuleset::new(RuleSettings::default())
            .execute(&state, &[], &mut MaxRand)
            .unwrap();

        assert!(next.food.is_empty());
        for snake in &next.snakes {
            assert_eq!(snake.health, SNAKE_MAX_HEALTH);
            assert_eq!(snake.body.len(), 3);
        }
        assert_eq!(next.snakes[0].head(), Some(Point::new(1, 2)));
    }
}
