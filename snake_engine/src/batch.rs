//! Line-delimited replay protocol: each input value is a game request plus
//! the moves made from it, each output line is the request for the next turn.

use std::io::{Read, Write};

use tracing::{debug, error};

use crate::client::{self, MoveState, SnakeRequest};
use crate::engine::TurnEngine;
use crate::error::{BatchError, EngineError, EngineResult};
use crate::model::{moves_in_board_order, BoardState};
use crate::settings::RandMode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    /// Input stopped on a value that could not be decoded.
    pub decode_failed: bool,
}

pub fn run<R: Read, W: Write>(reader: R, mut writer: W) -> Result<BatchSummary, BatchError> {
    let mut summary = BatchSummary::default();
    let stream = serde_json::Deserializer::from_reader(reader).into_iter::<MoveState>();

    for item in stream {
        let state = match item {
            Ok(state) => state,
            Err(err) => {
                error!(error = %err, processed = summary.processed, "failed to decode move state");
                summary.decode_failed = true;
                break;
            }
        };

        let next = apply(&state).map_err(|source| BatchError::Engine {
            index: summary.processed,
            source,
        })?;
        serde_json::to_writer(&mut writer, &next)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        summary.processed += 1;
    }

    debug!(processed = summary.processed, "batch input exhausted");
    Ok(summary)
}

/// Advances one request by its moves. Replays are seed-free: seed 0 and the
/// always-max random source.
pub fn apply(state: &MoveState) -> EngineResult<SnakeRequest> {
    let request = &state.request;
    let settings = request
        .game
        .ruleset
        .settings
        .rule_settings()
        .with_seed(0)
        .with_rand_mode(RandMode::Max);
    let engine = TurnEngine::from_names(
        &request.game.ruleset.name,
        request.game.map_id(),
        settings,
    )?;

    // Run map setup for its validation only; the request supplies the board.
    engine.setup_board(request.board.width, request.board.height, &request.snake_ids())?;
    let board = request.board_state();

    let moves = moves_in_board_order(&board, &state.moves);
    let next = engine.advance(&board, &moves)?;
    next_request(request, &next)
}

fn next_request(request: &SnakeRequest, next: &BoardState) -> EngineResult<SnakeRequest> {
    let source = |id: &str| request.board.snakes.iter().find(|snake| snake.id == id);
    let snakes: Vec<client::Snake> = next
        .snakes
        .iter()
        .map(|snake| client::Snake::from_model(snake, source(&snake.id)))
        .collect();

    let you = snakes
        .iter()
        .find(|snake| snake.id == request.you.id)
        .or_else(|| snakes.first())
        .cloned()
        .ok_or_else(|| EngineError::ViewpointMissing {
            snake_id: request.you.id.clone(),
        })?;

    Ok(SnakeRequest {
        game: request.game.clone(),
        turn: next.turn,
        board: client::Board {
            height: next.height,
            width: next.width,
            food: next.food.iter().copied().map(client::Coord::from).collect(),
            hazards: next.hazards.iter().copied().map(client::Coord::from).collect(),
            snakes,
        },
        you,
    })
}
