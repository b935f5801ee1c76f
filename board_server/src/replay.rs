use std::time::Duration;

use snake_engine::{
    client::SnakeRequest, moves_in_board_order, BoardState, Frame, SnakeRegistry, TurnEngine,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error, info};

use crate::error::ReplayError;
use crate::hub::HubHandle;
use crate::protocol::GameSession;

/// How a replay stopped feeding the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    InputExhausted { turn: i32 },
    MalformedInput { turn: i32 },
    GameOver { turn: i32 },
}

/// A game driven one turn at a time from positional move lists.
pub struct Replay {
    engine: TurnEngine,
    registry: SnakeRegistry,
    state: BoardState,
    snake_timeout: i32,
}

impl Replay {
    /// Builds the engine from the request's ruleset and map, playing with a
    /// seeded random stream.
    pub fn from_request(request: &SnakeRequest, seed: i64) -> Result<Self, ReplayError> {
        if request.turn != 0 {
            return Err(ReplayError::NotInitialTurn { turn: request.turn });
        }

        let settings = request.game.ruleset.settings.rule_settings().with_seed(seed);
        let engine = TurnEngine::from_names(
            &request.game.ruleset.name,
            request.game.map_id(),
            settings,
        )?;

        Ok(Self {
            engine,
            registry: request.registry(),
            state: request.board_state(),
            snake_timeout: request.game.timeout,
        })
    }

    pub fn session(&self) -> GameSession {
        GameSession::new(self.state.width, self.state.height, self.engine.ruleset_name())
            .with_snake_timeout(self.snake_timeout)
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn frame(&self) -> Frame {
        self.engine.frame(&self.state, &self.registry)
    }

    pub fn is_game_over(&self) -> bool {
        self.engine.is_game_over(&self.state)
    }

    /// Advances one turn. Directions pair with snakes in board order.
    pub fn step(&mut self, directions: &[String]) -> Result<Frame, ReplayError> {
        let moves = moves_in_board_order(&self.state, directions);
        self.state = self.engine.advance(&self.state, &moves)?;
        Ok(self.frame())
    }

    /// Ingests the current frame, then one frame per input line until the
    /// input ends, a line fails to decode, or the game is over.
    pub async fn drive<R>(
        &mut self,
        hub: &HubHandle,
        input: R,
        turn_delay: Option<Duration>,
    ) -> Result<ReplayOutcome, ReplayError>
    where
        R: AsyncBufRead + Unpin,
    {
        hub.ingest(self.frame()).await?;

        let mut lines = input.lines();
        loop {
            if self.is_game_over() {
                info!(turn = self.state.turn, "game over");
                return Ok(ReplayOutcome::GameOver { turn: self.state.turn });
            }

            let Some(line) = lines.next_line().await? else {
                info!(turn = self.state.turn, "move input exhausted");
                return Ok(ReplayOutcome::InputExhausted { turn: self.state.turn });
            };
            if line.trim().is_empty() {
                continue;
            }

            let directions: Vec<String> = match serde_json::from_str(&line) {
                Ok(directions) => directions,
                Err(e) => {
                    error!(turn = self.state.turn, error = %e, "malformed move line");
                    return Ok(ReplayOutcome::MalformedInput { turn: self.state.turn });
                }
            };

            let frame = self.step(&directions)?;
            debug!(turn = frame.turn, "replay frame ready");
            hub.ingest(frame).await?;

            if let Some(delay) = turn_delay {
                tokio::time::sleep(delay).await;
            }
        }
    }
}
