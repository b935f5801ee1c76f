use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// Producer-side contract breaches. These are surfaced to the caller, never absorbed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolViolation {
    #[error("frame turn {got} does not follow buffered history (expected {expected})")]
    TurnMismatch { expected: i32, got: i32 },

    #[error("frame ingested after the game ended")]
    IngestAfterEnd,

    #[error("game already ended")]
    AlreadyEnded,

    #[error("hub is no longer running")]
    HubStopped,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HubError {
    #[error("protocol violation: {0}")]
    ProtocolViolation(#[from] ProtocolViolation),
}

impl From<actix::MailboxError> for HubError {
    fn from(_: actix::MailboxError) -> Self {
        HubError::ProtocolViolation(ProtocolViolation::HubStopped)
    }
}

pub type HubResult<T> = Result<T, HubError>;

/// Failures local to one viewer connection.
#[derive(Error, Debug)]
pub enum SubscriberError {
    #[error("write timed out after {seconds}s")]
    WriteTimeout { seconds: u64 },

    #[error("peer closed the connection")]
    PeerClosed,

    #[error("failed to encode envelope: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("websocket session closed")]
    SessionClosed,
}

impl From<actix_ws::Closed> for SubscriberError {
    fn from(_: actix_ws::Closed) -> Self {
        SubscriberError::SessionClosed
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("hub error: {0}")]
    Hub(#[from] HubError),

    #[error("game {game_id} not found")]
    GameNotFound { game_id: String },

    #[error("websocket handshake failed: {message}")]
    Handshake { message: String },
}

impl ServerError {
    pub fn game_not_found(game_id: impl Into<String>) -> Self {
        Self::GameNotFound {
            game_id: game_id.into(),
        }
    }

    pub fn handshake(message: impl Into<String>) -> Self {
        Self::Handshake {
            message: message.into(),
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::GameNotFound { .. } => StatusCode::NOT_FOUND,
            ServerError::Handshake { .. } => StatusCode::BAD_REQUEST,
            ServerError::Hub(HubError::ProtocolViolation(ProtocolViolation::HubStopped)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("snapshot must start at turn 0, got turn {turn}")]
    NotInitialTurn { turn: i32 },

    #[error("turn computation failed: {0}")]
    Engine(#[from] snake_engine::EngineError),

    #[error("hub rejected frame: {0}")]
    Hub(#[from] HubError),

    #[error("failed to read moves: {0}")]
    Io(#[from] std::io::Error),
}
