use serde::{Deserialize, Serialize};
use snake_engine::Frame;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvelopeKind {
    #[serde(rename = "frame")]
    Frame,
    #[serde(rename = "game_end")]
    GameEnd,
}

/// Websocket payload: `{"Data": Frame|null, "Type": "frame"|"game_end"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<F> {
    #[serde(rename = "Data")]
    pub data: Option<F>,
    #[serde(rename = "Type")]
    pub kind: EnvelopeKind,
}

pub type FrameEnvelope<'a> = Envelope<&'a Frame>;

impl<'a> Envelope<&'a Frame> {
    pub fn frame(frame: &'a Frame) -> Self {
        Self {
            data: Some(frame),
            kind: EnvelopeKind::Frame,
        }
    }

    pub fn game_end(last: Option<&'a Frame>) -> Self {
        Self {
            data: last,
            kind: EnvelopeKind::GameEnd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Running,
    Ended,
}

/// Per-move timeout reported to viewers when the game request has none.
pub const DEFAULT_SNAKE_TIMEOUT_MS: i32 = 500;

/// The one game a board server hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub id: String,
    pub width: i32,
    pub height: i32,
    pub ruleset_name: String,
    /// Milliseconds each snake gets per move.
    pub snake_timeout: i32,
    pub status: SessionStatus,
}

impl GameSession {
    pub fn new(width: i32, height: i32, ruleset_name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), width, height, ruleset_name)
    }

    pub fn with_id(
        id: impl Into<String>,
        width: i32,
        height: i32,
        ruleset_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            ruleset_name: ruleset_name.into(),
            snake_timeout: DEFAULT_SNAKE_TIMEOUT_MS,
            status: SessionStatus::Running,
        }
    }

    /// Non-positive values keep the default.
    pub fn with_snake_timeout(mut self, timeout_ms: i32) -> Self {
        if timeout_ms > 0 {
            self.snake_timeout = timeout_ms;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RulesetDescriptor {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameDescriptor {
    #[serde(rename = "ID")]
    pub id: String,
    pub width: i32,
    pub height: i32,
    pub ruleset: RulesetDescriptor,
    pub status: SessionStatus,
    pub snake_timeout: i32,
}

/// Body of `GET /games/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameResponse {
    pub game: GameDescriptor,
    pub last_frame: Option<Frame>,
}

impl GameResponse {
    pub fn new(session: &GameSession, last_frame: Option<&Frame>) -> Self {
        Self {
            game: GameDescriptor {
                id: session.id.clone(),
                width: session.width,
                height: session.height,
                ruleset: RulesetDescriptor {
                    name: session.ruleset_name.clone(),
                },
                status: session.status,
                snake_timeout: session.snake_timeout,
            },
            last_frame: last_frame.cloned(),
        }
    }
}
