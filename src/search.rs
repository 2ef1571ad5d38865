//! Fixed-depth alpha-beta search over a shared board
//!
//! The search never copies the board: every candidate move is played in
//! place through a [`PlacedCoin`](crate::bitboard::PlacedCoin) guard and
//! taken back when the guard is dropped, so each frame leaves the board as it
//! found it whether it finishes, prunes or is interrupted.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    evaluator::{heuristic, terminal_score, WIN_SCORE},
    BitBoard, Player,
};

/// The cancellation token was raised while searching
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Interrupted;

/// Best root move found by a completed search and its value
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SearchResult {
    pub value: f64,
    /// `None` only if no column was playable
    pub best_move: Option<usize>,
}

/// A depth-limited minimax search for one player
///
/// Values are always from `player`'s point of view: the `max` layers are
/// `player`'s moves and the `min` layers their opponent's.
pub struct Searcher<'a> {
    player: Player,
    cutoff: usize,
    cancel: &'a AtomicBool,

    /// The number of nodes searched by this `Searcher` so far (for diagnostics only)
    pub node_count: usize,
}

impl<'a> Searcher<'a> {
    /// Creates a searcher that gives up as soon as `cancel` is set
    ///
    /// The reply to the root move is at depth 0 and nodes deeper than
    /// `cutoff` are scored by the heuristic, so the search looks
    /// `cutoff + 2` plies ahead.
    pub fn new(player: Player, cutoff: usize, cancel: &'a AtomicBool) -> Self {
        Self {
            player,
            cutoff,
            cancel,
            node_count: 0,
        }
    }

    pub fn cutoff(&self) -> usize {
        self.cutoff
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Tries every playable column from left to right and keeps the first
    /// one reaching the highest value
    ///
    /// On a first iteration (`cutoff == 1`) an immediately winning column is
    /// returned without looking at the others.
    pub fn search(&mut self, board: &mut BitBoard) -> Result<SearchResult, Interrupted> {
        if self.cancelled() {
            return Err(Interrupted);
        }
        self.node_count += 1;

        let mut best = SearchResult {
            value: f64::NEG_INFINITY,
            best_move: None,
        };
        for column in 0..board.columns() {
            if !board.playable(column) {
                continue;
            }
            let mut child = match board.place(column, self.player) {
                Ok(child) => child,
                Err(_) => continue,
            };
            let value = self.min(&mut child, f64::NEG_INFINITY, f64::INFINITY, 0)?;
            drop(child);

            if self.cutoff == 1 && value == WIN_SCORE {
                return Ok(SearchResult {
                    value,
                    best_move: Some(column),
                });
            }
            if value > best.value {
                best = SearchResult {
                    value,
                    best_move: Some(column),
                };
            }
        }
        Ok(best)
    }

    /// Value of a position where the opponent is to move
    fn min(
        &mut self,
        board: &mut BitBoard,
        alpha: f64,
        mut beta: f64,
        depth: usize,
    ) -> Result<f64, Interrupted> {
        if self.cancelled() {
            return Err(Interrupted);
        }
        self.node_count += 1;

        if let Some(score) = terminal_score(board.outcome(), self.player) {
            return Ok(score);
        }
        if depth > self.cutoff {
            return Ok(heuristic(board, self.player));
        }

        let opponent = self.player.other();
        let mut result = f64::INFINITY;
        for column in 0..board.columns() {
            if !board.playable(column) {
                continue;
            }
            let mut child = match board.place(column, opponent) {
                Ok(child) => child,
                Err(_) => continue,
            };
            let value = self.max(&mut child, alpha, beta, depth + 1)?;
            drop(child);

            result = result.min(value);
            // the maximising player already has something at least this good
            if result <= alpha {
                return Ok(alpha);
            }
            beta = beta.min(result);
        }
        Ok(result)
    }

    /// Value of a position where `player` is to move
    fn max(
        &mut self,
        board: &mut BitBoard,
        mut alpha: f64,
        beta: f64,
        depth: usize,
    ) -> Result<f64, Interrupted> {
        if self.cancelled() {
            return Err(Interrupted);
        }
        self.node_count += 1;

        if let Some(score) = terminal_score(board.outcome(), self.player) {
            return Ok(score);
        }
        if depth > self.cutoff {
            return Ok(heuristic(board, self.player));
        }

        let mut result = f64::NEG_INFINITY;
        for column in 0..board.columns() {
            if !board.playable(column) {
                continue;
            }
            let mut child = match board.place(column, self.player) {
                Ok(child) => child,
                Err(_) => continue,
            };
            let value = self.min(&mut child, alpha, beta, depth + 1)?;
            drop(child);

            result = result.max(value);
            // the minimising player will never allow this line
            if result >= beta {
                return Ok(beta);
            }
            alpha = alpha.max(result);
        }
        Ok(result)
    }
}
