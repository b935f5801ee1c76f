pub mod batch;
pub mod client;
pub mod engine;
pub mod error;
pub mod frame;
pub mod maps;
pub mod model;
pub mod random;
pub mod rules;
pub mod settings;

pub use engine::TurnEngine;
pub use error::{BatchError, EngineError, EngineResult, MapError, RulesError};
pub use frame::{Frame, SnakeCosmetics, SnakeRegistry};
pub use model::{
    moves_in_board_order, BoardState, Direction, EliminationCause, Point, Snake, SnakeMove,
};
pub use settings::{RandMode, RuleSettings};
