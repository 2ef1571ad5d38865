//! A time-bounded agent for playing the board game 'Connect 4'
//!
//! The agent runs an iterative deepening alpha-beta search over a bitboard
//! that is mutated in place and restored after every speculative move, and
//! answers with the best column found before its time budget runs out.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_timed::{Engine, EngineConfig, Player};
//! use std::time::Duration;
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let config = EngineConfig::new(7, 6, Player::One).with_time_budget(Duration::from_secs(1));
//! let mut engine = Engine::initialize(config)?;
//!
//! for &(column, player) in &[(0, 1u8), (6, 2), (1, 1), (6, 2), (2, 1), (5, 2)] {
//!     engine.notify_move(column, Player::try_from(player)?)?;
//! }
//!
//! // player one completes the bottom row
//! assert_eq!(engine.request_move(), 3);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod config;

pub mod bitboard;

pub mod terminal;

pub mod evaluator;

pub mod search;

pub mod engine;


pub use bitboard::{BitBoard, Player};
pub use config::EngineConfig;
pub use engine::{Decision, Engine};
pub use error::GameError;
pub use terminal::Outcome;

/// The number of cells a board can hold, one bit of a `u64` each
pub const MAX_CELLS: usize = 64;

/// The standard width of the game board in tiles
pub const DEFAULT_COLUMNS: usize = 7;

/// The standard height of the game board in tiles
pub const DEFAULT_ROWS: usize = 6;

/// The standard number of aligned coins needed to win
pub const DEFAULT_CONNECT: usize = 4;

// ensure that the standard dimensions fit in a u64 for the bitboard representation
const_assert!(DEFAULT_COLUMNS * DEFAULT_ROWS <= MAX_CELLS);
const_assert!(MAX_CELLS == u64::BITS as usize);
