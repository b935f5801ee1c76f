mod common;

use serde_json::{json, Value};
use snake_engine::batch::{self, BatchSummary};
use snake_engine::client::SnakeRequest;
use snake_engine::BatchError;

use common::setup_logger;

fn request(turn: i32, ruleset: &str, you: &str) -> Value {
    json!({
        "game": {
            "id": "game-1",
            "ruleset": {"name": ruleset, "version": "cli", "settings": {
                "foodSpawnChance": 15,
                "minimumFood": 1,
                "hazardDamagePerTurn": 14,
                "royale": {"shrinkEveryNTurns": 25}
            }},
            "map": "standard",
            "timeout": 500,
            "source": "custom"
        },
        "turn": turn,
        "board": {
            "height": 11,
            "width": 11,
            "food": [{"x": 5, "y": 5}],
            "hazards": [],
            "snakes": [
                {
                    "id": "alpha",
                    "name": "Alpha",
                    "latency": "42",
                    "health": 90,
                    "body": [{"x": 1, "y": 1}, {"x": 1, "y": 0}, {"x": 1, "y": 0}],
                    "head": {"x": 1, "y": 1},
                    "length": 3,
                    "shout": "hi",
                    "squad": "",
                    "customizations": {"color": "#ff0000", "head": "default", "tail": "default"}
                },
                {
                    "id": "beta",
                    "name": "Beta",
                    "latency": "17",
                    "health": 70,
                    "body": [{"x": 9, "y": 9}, {"x": 9, "y": 10}, {"x": 9, "y": 10}],
                    "head": {"x": 9, "y": 9},
                    "length": 3,
                    "shout": "",
                    "squad": "",
                    "customizations": {"color": "#0000ff", "head": "default", "tail": "default"}
                }
            ]
        },
        "you": {"id": you}
    })
}

fn line(turn: i32, moves: &[&str]) -> String {
    json!({"request": request(turn, "standard", "alpha"), "moves": moves}).to_string()
}

fn run(input: &str) -> (Result<BatchSummary, BatchError>, Vec<SnakeRequest>) {
    setup_logger();
    let mut out = Vec::new();
    let result = batch::run(input.as_bytes(), &mut out);
    let text = String::from_utf8(out).unwrap();
    let outputs = text
        .lines()
        .map(|l| serde_json::from_str::<SnakeRequest>(l).unwrap())
        .collect();
    (result, outputs)
}

// ============================================================
// Happy path
// ============================================================

#[cfg(test)]
mod batch_tests {
    use super::*;

    #[test]
    fn each_input_yields_one_line_with_next_turn() {
        let input = format!("{}\n{}\n", line(0, &["up", "down"]), line(7, &["right", "left"]));
        let (result, outputs) = run(&input);

        let summary = result.unwrap();
        assert_eq!(summary.processed, 2);
        assert!(!summary.decode_failed);
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].turn, 1);
        assert_eq!(outputs[1].turn, 8);

        let alpha = &outputs[0].board.snakes[0];
        assert_eq!(alpha.head.x, 1);
        assert_eq!(alpha.head.y, 2);
        assert_eq!(alpha.health, 89);
        assert_eq!(alpha.length, 3);
        assert_eq!(alpha.name, "Alpha");
        assert_eq!(alpha.latency, "42");
        assert_eq!(alpha.customizations.color, "#ff0000");
        assert_eq!(outputs[0].game.id, "game-1");
    }

    #[test]
    fn viewpoint_follows_you_id() {
        let input = json!({"request": request(3, "standard", "beta"), "moves": ["up", "down"]});
        let (result, outputs) = run(&input.to_string());

        result.unwrap();
        let next = &outputs[0];
        assert_eq!(next.you.id, "beta");
        assert_eq!(next.you, next.board.snakes[1]);
        assert_eq!(next.you.head.y, 8);
    }

    #[test]
    fn missing_moves_continue_heading() {
        let (result, outputs) = run(&line(0, &[]));
        result.unwrap();
        assert_eq!(outputs[0].board.snakes[0].head.y, 2);
        assert_eq!(outputs[0].board.snakes[1].head.y, 8);
    }

    #[test]
    fn empty_input_is_fine() {
        let (result, outputs) = run("");
        assert_eq!(result.unwrap(), BatchSummary::default());
        assert!(outputs.is_empty());
    }
}

// ============================================================
// Failures
// ============================================================

#[cfg(test)]
mod failure_tests {
    use super::*;

    #[test]
    fn malformed_line_stops_after_prior_output() {
        let input = format!(
            "{}\n{{\"request\": oops}}\n{}\n",
            line(0, &["up", "down"]),
            line(1, &["up", "down"])
        );
        let (result, outputs) = run(&input);

        let summary = result.unwrap();
        assert_eq!(summary.processed, 1);
        assert!(summary.decode_failed);
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].turn, 1);
    }

    #[test]
    fn engine_failure_is_fatal() {
        let input = json!({"request": request(0, "not-a-ruleset", "alpha"), "moves": []});
        let (result, outputs) = run(&input.to_string());

        match result {
            Err(BatchError::Engine { index, .. }) => assert_eq!(index, 0),
            other => panic!("expected engine failure, got {other:?}"),
        }
        assert!(outputs.is_empty());
    }
}
