use thiserror::Error;

/// Contract violations reported by the board and the engine setup
///
/// None of these ever escape a move request: the search only tries
/// playable columns, so they only surface for malformed host input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid move, column {column} is full")]
    InvalidMove { column: usize },
    #[error("column {column} out of range, the board has {columns} columns")]
    InvalidColumn { column: usize, columns: usize },
    #[error("nothing to undo")]
    EmptyHistory,
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;
