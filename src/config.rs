//! Engine configuration

use std::time::Duration;

use crate::{error::*, Player, DEFAULT_COLUMNS, DEFAULT_CONNECT, DEFAULT_ROWS, MAX_CELLS};

/// Default wall-clock budget for a single move decision
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(10);

/// Everything the host fixes when it sets up an engine
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub columns: usize,
    pub rows: usize,
    /// Number of aligned coins needed to win
    pub connect: usize,
    /// The side this engine plays
    pub player: Player,
    pub time_budget: Duration,
    /// Optional cap on iterative deepening, `None` searches until the budget runs out
    pub max_depth: Option<usize>,
}

impl EngineConfig {
    pub fn new(columns: usize, rows: usize, player: Player) -> Self {
        Self {
            columns,
            rows,
            player,
            ..Self::default()
        }
    }

    pub fn with_connect(mut self, connect: usize) -> Self {
        self.connect = connect;
        self
    }

    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_dimensions(self.columns, self.rows, self.connect)?;
        if self.time_budget == Duration::from_secs(0) {
            return Err(GameError::InvalidConfiguration(
                "time budget must be positive".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(GameError::InvalidConfiguration(
                "max depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            connect: DEFAULT_CONNECT,
            player: Player::One,
            time_budget: DEFAULT_TIME_BUDGET,
            max_depth: None,
        }
    }
}

/// Checks that a board of the given shape fits the bitboard and can be won
pub fn validate_dimensions(columns: usize, rows: usize, connect: usize) -> Result<()> {
    if columns == 0 || rows == 0 {
        return Err(GameError::InvalidConfiguration(format!(
            "board dimensions must be positive, got {}x{}",
            columns, rows
        )));
    }
    match columns.checked_mul(rows) {
        Some(cells) if cells <= MAX_CELLS => {}
        _ => {
            return Err(GameError::InvalidConfiguration(format!(
                "a {}x{} board does not fit in {} cells",
                columns, rows, MAX_CELLS
            )))
        }
    }
    if connect < 2 || connect > columns.max(rows) {
        return Err(GameError::InvalidConfiguration(format!(
            "win length {} is not achievable on a {}x{} board",
            connect, columns, rows
        )));
    }
    Ok(())
}
