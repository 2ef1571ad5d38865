//! Win, tie and connectivity detection

use crate::{BitBoard, Player};

/// State of the game derived from a position
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Outcome {
    Win(Player),
    Tie,
    Ongoing,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Ongoing
    }
}

// the two directions making up each axis: horizontal, vertical, diagonal /, diagonal \
const AXES: [[(isize, isize); 2]; 4] = [
    [(-1, 0), (1, 0)],
    [(0, -1), (0, 1)],
    [(-1, -1), (1, 1)],
    [(1, -1), (-1, 1)],
];

impl BitBoard {
    /// Counts the coins of `player` in a line starting next to `(column, row)`,
    /// looking at most `connect - 1` cells away
    fn run(&self, column: usize, row: usize, (dx, dy): (isize, isize), player: Player) -> usize {
        let mut length = 0;
        let (mut x, mut y) = (column as isize, row as isize);
        while length + 1 < self.connect() {
            x += dx;
            y += dy;
            if x < 0 || y < 0 {
                break;
            }
            match self.occupant_at(x as usize, y as usize) {
                Some(occupant) if occupant == player => length += 1,
                _ => break,
            }
        }
        length
    }

    /// The owner of the top coin of `column` and how many of their coins
    /// adjoin it along each axis, or `None` for an empty column
    ///
    /// Each axis is measured on its own, so a coin lying on two axes is
    /// counted once per axis.
    pub fn axis_runs(&self, column: usize) -> Option<(Player, [usize; 4])> {
        let row = self.top_row(column)?;
        let player = self.occupant_at(column, row)?;

        let mut runs = [0; 4];
        for (run, directions) in runs.iter_mut().zip(AXES.iter()) {
            *run = directions
                .iter()
                .map(|&direction| self.run(column, row, direction, player))
                .sum();
        }
        Some((player, runs))
    }

    /// Length of the longest line through the top coin of `column`, 0 if the column is empty
    pub fn longest_run_through_top_of_column(&self, column: usize) -> usize {
        match self.axis_runs(column) {
            Some((_, runs)) => 1 + runs.iter().copied().max().unwrap_or(0),
            None => 0,
        }
    }

    /// Determines whether the game is won, tied or still going
    ///
    /// Only the top coin of each column is inspected: a winning line always
    /// contains the coin that completed it, and play stops as soon as a line
    /// is completed.
    ///
    /// Columns are scanned left to right and a full board is declared a tie
    /// at the first column whose top coin does not win, so a line completed
    /// by a later column's top coin on a full board is not reported.
    pub fn outcome(&self) -> Outcome {
        for column in 0..self.columns() {
            if let Some((player, runs)) = self.axis_runs(column) {
                if runs.iter().any(|&run| run + 1 >= self.connect()) {
                    return Outcome::Win(player);
                }
            }
            if self.is_full() {
                return Outcome::Tie;
            }
        }
        Outcome::Ongoing
    }
}
