mod common;

use std::sync::{Arc, Mutex};

use snake_engine::maps::{GameMap, EmptyMap};
use snake_engine::random::Rand;
use snake_engine::rules::StandardRuleset;
use snake_engine::{
    BoardState, EliminationCause, EngineError, MapError, Point, RuleSettings, SnakeMove,
    SnakeRegistry, TurnEngine,
};

use common::{board, setup_logger, snake};

fn empty_standard() -> TurnEngine {
    TurnEngine::from_names("standard", "empty", RuleSettings::default()).unwrap()
}

// ============================================================
// Turn sequencing
// ============================================================

#[cfg(test)]
mod sequencing_tests {
    use super::*;

    #[test]
    fn body_collision_eliminates_only_the_mover() {
        setup_logger();
        let state = board(
            11,
            11,
            vec![
                snake("a", &[(1, 3), (1, 2), (1, 1)], 80),
                snake("b", &[(2, 4), (2, 3), (2, 2)], 100),
            ],
        );
        let moves = [SnakeMove::new("a", "right"), SnakeMove::new("b", "up")];

        let next = empty_standard().advance(&state, &moves).unwrap();

        let a = next.snake("a").unwrap();
        let death = a.elimination.clone().unwrap();
        assert_eq!(death.cause, EliminationCause::Collision);
        assert_eq!(death.cause.to_string(), "collision");
        assert_eq!(death.by, "b");
        assert_eq!(death.turn, 1);
        assert_eq!(a.health, 0);
        assert_eq!(a.body[0], Point::new(2, 3));

        let b = next.snake("b").unwrap();
        assert!(!b.is_eliminated());
        assert_eq!(b.health, 99);
        assert_eq!(b.body[0], Point::new(2, 5));
    }

    #[test]
    fn turn_advances_by_exactly_one() {
        let engine = empty_standard();
        let mut state = board(
            11,
            11,
            vec![
                snake("a", &[(1, 1), (1, 0)], 100),
                snake("b", &[(9, 1), (9, 0)], 100),
            ],
        );
        state.turn = 41;
        for expected in 42..47 {
            state = engine.advance(&state, &[]).unwrap();
            assert_eq!(state.turn, expected);
        }
        assert_eq!(state.snakes.len(), 2);
    }

    #[test]
    fn eliminated_snakes_stay_in_board_order() {
        let engine = empty_standard();
        let state = board(
            7,
            7,
            vec![
                snake("first", &[(0, 3), (1, 3)], 100),
                snake("second", &[(5, 5), (5, 4)], 100),
            ],
        );
        let next = engine
            .advance(&state, &[SnakeMove::new("first", "left")])
            .unwrap();
        let ids: Vec<&str> = next.snakes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
        assert!(next.snakes[0].is_eliminated());
        assert!(engine.is_game_over(&next));
    }

    #[test]
    fn frame_carries_engine_output() {
        let engine = empty_standard();
        let state = board(7, 7, vec![snake("a", &[(3, 3), (3, 2)], 100)]);
        let next = engine.advance(&state, &[]).unwrap();
        let frame = engine.frame(&next, &SnakeRegistry::new());
        assert_eq!(frame.turn, 1);
        assert_eq!(frame.snakes[0].body[0].y, 4);
    }
}

// ============================================================
// Determinism
// ============================================================

#[cfg(test)]
mod determinism_tests {
    use super::*;

    fn play(seed: i64, turns: usize) -> Vec<String> {
        let engine =
            TurnEngine::from_names("standard", "standard", RuleSettings::default().with_seed(seed))
                .unwrap();
        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let mut state = engine.setup_board(11, 11, &ids).unwrap();
        let mut history = Vec::new();
        for _ in 0..turns {
            state = engine.advance(&state, &[]).unwrap();
            history.push(serde_json::to_string(&state).unwrap());
        }
        history
    }

    #[test]
    fn same_seed_replays_byte_for_byte() {
        assert_eq!(play(42, 8), play(42, 8));
    }

    #[test]
    fn single_advance_is_repeatable() {
        let settings = RuleSettings::default().with_seed(7);
        let engine = TurnEngine::from_names("royale", "royale", settings).unwrap();
        let ids = vec!["a".to_string(), "b".to_string()];
        let mut state = engine.setup_board(11, 11, &ids).unwrap();
        state.turn = 60;
        let moves = [SnakeMove::new("a", "down"), SnakeMove::new("b", "left")];

        let first = serde_json::to_vec(&engine.advance(&state, &moves).unwrap()).unwrap();
        let second = serde_json::to_vec(&engine.advance(&state, &moves).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}

// ============================================================
// Board hooks and failures
// ============================================================

#[derive(Default)]
struct RecordingMap {
    seen: Arc<Mutex<Vec<(&'static str, i32, Option<Point>)>>>,
    fail_post: bool,
}

impl GameMap for RecordingMap {
    fn id(&self) -> &str {
        "recording"
    }

    fn setup_board(
        &self,
        width: i32,
        height: i32,
        snake_ids: &[String],
        settings: &RuleSettings,
        rand: &mut dyn Rand,
    ) -> Result<BoardState, MapError> {
        EmptyMap.setup_board(width, height, snake_ids, settings, rand)
    }

    fn pre_update_board(
        &self,
        state: &mut BoardState,
        _settings: &RuleSettings,
        _rand: &mut dyn Rand,
    ) -> Result<(), MapError> {
        let head = state.snakes.first().and_then(|s| s.head());
        self.seen.lock().unwrap().push(("pre", state.turn, head));
        Ok(())
    }

    fn post_update_board(
        &self,
        state: &mut BoardState,
        _settings: &RuleSettings,
        _rand: &mut dyn Rand,
    ) -> Result<(), MapError> {
        let head = state.snakes.first().and_then(|s| s.head());
        self.seen.lock().unwrap().push(("post", state.turn, head));
        if self.fail_post {
            return Err(MapError::InvalidParameter {
                name: "fail_post",
                value: 1,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod hook_tests {
    use super::*;

    #[test]
    fn hooks_wrap_the_ruleset_step() {
        let map = RecordingMap::default();
        let seen = map.seen.clone();
        let settings = RuleSettings::default();
        let engine = TurnEngine::new(
            Box::new(StandardRuleset::new(settings.clone())),
            Box::new(map),
            settings,
        );
        let mut state = board(7, 7, vec![snake("a", &[(3, 3), (3, 2)], 100)]);
        state.turn = 5;

        let next = engine.advance(&state, &[SnakeMove::new("a", "right")]).unwrap();

        assert_eq!(next.turn, 6);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                ("pre", 5, Some(Point::new(3, 3))),
                ("post", 5, Some(Point::new(4, 3))),
            ]
        );
    }

    #[test]
    fn hook_failure_surfaces_as_engine_error() {
        let map = RecordingMap {
            fail_post: true,
            ..RecordingMap::default()
        };
        let settings = RuleSettings::default();
        let engine = TurnEngine::new(
            Box::new(StandardRuleset::new(settings.clone())),
            Box::new(map),
            settings,
        );
        let state = board(7, 7, vec![snake("a", &[(3, 3), (3, 2)], 100)]);

        let err = engine.advance(&state, &[]).unwrap_err();
        assert!(matches!(err, EngineError::PostUpdate(MapError::InvalidParameter { .. })));
    }

    #[test]
    fn royale_rejects_non_positive_shrink_interval() {
        let settings = RuleSettings {
            shrink_every_n_turns: 0,
            ..RuleSettings::default()
        };
        let engine = TurnEngine::from_names("royale", "royale", settings).unwrap();
        let state = board(11, 11, vec![snake("a", &[(3, 3), (3, 2)], 100)]);

        let err = engine.advance(&state, &[]).unwrap_err();
        assert_eq!(
            err,
            EngineError::PostUpdate(MapError::InvalidParameter {
                name: "shrink_every_n_turns",
                value: 0
            })
        );
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = TurnEngine::from_names("mystery", "standard", RuleSettings::default())
            .err()
            .unwrap();
        assert_eq!(
            err,
            EngineError::UnknownRuleset {
                name: "mystery".to_string()
            }
        );

        let err = TurnEngine::from_names("standard", "mystery", RuleSettings::default())
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::MapSetup(MapError::UnknownMap { .. })));
    }

    #[test]
    fn zero_length_snake_is_fatal() {
        let state = board(7, 7, vec![snake("a", &[], 100)]);
        let err = empty_standard().advance(&state, &[]).unwrap_err();
        assert!(matches!(err, EngineError::Rules(_)));
    }
}
