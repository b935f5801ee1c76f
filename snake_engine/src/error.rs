use thiserror::Error;

/// Failures raised by a ruleset while executing a turn.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("snake {snake_id} has a zero-length body")]
    ZeroLengthSnake { snake_id: String },

    #[error("board dimensions {width}x{height} are invalid")]
    InvalidBoard { width: i32, height: i32 },
}

/// Failures raised by a board-shape map during setup or a board hook.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("unknown map: {map_id}")]
    UnknownMap { map_id: String },

    #[error("invalid map parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: i32 },

    #[error("board {width}x{height} is too small for map {map_id}")]
    BoardTooSmall {
        map_id: String,
        width: i32,
        height: i32,
    },

    #[error("map {map_id} supports at most {max} snakes, got {requested}")]
    TooManySnakes {
        map_id: String,
        max: usize,
        requested: usize,
    },
}

/// Any failure while computing the next turn. These are never retried: the
/// snapshot that produced them is treated as inconsistent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown ruleset: {name}")]
    UnknownRuleset { name: String },

    #[error("map setup failed: {0}")]
    MapSetup(MapError),

    #[error("pre-update board hook failed: {0}")]
    PreUpdate(MapError),

    #[error("post-update board hook failed: {0}")]
    PostUpdate(MapError),

    #[error("ruleset execution failed: {0}")]
    Rules(#[from] RulesError),

    #[error("viewpoint snake {snake_id} is missing from the board")]
    ViewpointMissing { snake_id: String },
}

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("turn computation failed on input {index}: {source}")]
    Engine {
        index: usize,
        #[source]
        source: EngineError,
    },

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
