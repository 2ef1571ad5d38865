//! Static scoring of positions
//!
//! Finished games score exactly `WIN_SCORE`, `LOSS_SCORE` or `TIE_SCORE`.
//! Unfinished positions get a connectivity heuristic scaled down far enough
//! that it always stays strictly between the loss and win scores.

use crate::{terminal::Outcome, BitBoard, Player};

pub const WIN_SCORE: f64 = 1.0;
pub const LOSS_SCORE: f64 = -1.0;
pub const TIE_SCORE: f64 = 0.0;

/// Scales connectivity totals into the open interval (-1, 1)
pub const HEURISTIC_SCALE: f64 = 10000.0;

/// Score of a finished game for `player`, `None` while the game is ongoing
pub fn terminal_score(outcome: Outcome, player: Player) -> Option<f64> {
    match outcome {
        Outcome::Win(winner) if winner == player => Some(WIN_SCORE),
        Outcome::Win(_) => Some(LOSS_SCORE),
        Outcome::Tie => Some(TIE_SCORE),
        Outcome::Ongoing => None,
    }
}

/// Sums the connectivity of every column's top coin, counting it for
/// `player` if they own it and against them otherwise
pub fn heuristic(board: &BitBoard, player: Player) -> f64 {
    let (mut own, mut enemy) = (0usize, 0usize);
    for column in 0..board.columns() {
        if let Some((owner, runs)) = board.axis_runs(column) {
            let total: usize = runs.iter().sum();
            if owner == player {
                own += total;
            } else {
                enemy += total;
            }
        }
    }
    (own as f64 - enemy as f64) / HEURISTIC_SCALE
}
