use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::{config::validate_dimensions, error::*, DEFAULT_COLUMNS, DEFAULT_CONNECT, DEFAULT_ROWS};

/// One of the two sides of the game
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The host-facing id of the player, 1 or 2
    pub fn id(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = GameError;

    fn try_from(id: u8) -> Result<Self> {
        match id {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            _ => Err(GameError::InvalidConfiguration(format!(
                "unknown player id {}, expected 1 or 2",
                id
            ))),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.id())
    }
}

/// A Connect 4 position stored as two bitmasks with an undo history
///
/// Cells are indexed left-to-right, bottom-to-top: the cell at `(column, row)`
/// has index `row * columns + column`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BitBoard {
    columns: usize,
    rows: usize,
    connect: usize,
    // mask of all coins
    occupied: u64,
    // mask of player two's coins, only meaningful where `occupied` is set
    owner: u64,
    heights: Vec<usize>,
    // cell indices of the coins added since the last commit
    history: Vec<usize>,
}

impl BitBoard {
    /// Creates an empty board where four aligned coins win
    pub fn new(columns: usize, rows: usize) -> Result<Self> {
        Self::with_connect(columns, rows, DEFAULT_CONNECT)
    }

    /// Creates an empty board with a custom win length
    pub fn with_connect(columns: usize, rows: usize, connect: usize) -> Result<Self> {
        validate_dimensions(columns, rows, connect)?;
        Ok(Self {
            columns,
            rows,
            connect,
            occupied: 0,
            owner: 0,
            heights: vec![0; columns],
            history: Vec::with_capacity(columns * rows),
        })
    }

    /// Builds a standard 7x6 board from a string of 1-indexed columns,
    /// alternating players starting with `Player::One`
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        Self::new(DEFAULT_COLUMNS, DEFAULT_ROWS)?.with_moves(moves)
    }

    /// Plays a string of 1-indexed columns on top of this position and commits them
    ///
    /// The side to move is derived from the number of coins already on the board.
    pub fn with_moves<S: AsRef<str>>(mut self, moves: S) -> Result<Self> {
        for column_char in moves.as_ref().chars() {
            let player = if self.num_moves() % 2 == 0 {
                Player::One
            } else {
                Player::Two
            };
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=9) => self.add_coin(column - 1, player)?,
                _ => {
                    return Err(GameError::InvalidConfiguration(format!(
                        "could not parse '{}' as a valid move",
                        column_char
                    )))
                }
            }
        }
        self.commit();
        Ok(self)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of aligned coins needed to win
    pub fn connect(&self) -> usize {
        self.connect
    }

    pub fn occupied_mask(&self) -> u64 {
        self.occupied
    }

    pub fn owner_mask(&self) -> u64 {
        self.owner
    }

    fn cell(&self, column: usize, row: usize) -> usize {
        row * self.columns + column
    }

    fn check_column(&self, column: usize) -> Result<()> {
        if column >= self.columns {
            return Err(GameError::InvalidColumn {
                column,
                columns: self.columns,
            });
        }
        Ok(())
    }

    /// Drops a coin for `player` into `column`
    pub fn add_coin(&mut self, column: usize, player: Player) -> Result<()> {
        self.check_column(column)?;
        let height = self.heights[column];
        if height >= self.rows {
            return Err(GameError::InvalidMove { column });
        }

        let index = self.cell(column, height);
        let bit = 1u64 << index;
        self.occupied |= bit;
        match player {
            Player::One => self.owner &= !bit,
            Player::Two => self.owner |= bit,
        }
        self.heights[column] += 1;
        self.history.push(index);
        Ok(())
    }

    /// Drops a coin that is taken back again when the returned guard goes out of scope
    ///
    /// Anything done through the guard must leave the board as it found it.
    pub fn place(&mut self, column: usize, player: Player) -> Result<PlacedCoin<'_>> {
        self.add_coin(column, player)?;
        Ok(PlacedCoin { board: self })
    }

    /// Takes back the most recent uncommitted coin
    pub fn undo_last(&mut self) -> Result<()> {
        let index = self.history.pop().ok_or(GameError::EmptyHistory)?;
        let bit = 1u64 << index;
        self.occupied &= !bit;
        self.owner &= !bit;
        self.heights[index % self.columns] -= 1;
        Ok(())
    }

    /// Takes back every uncommitted coin
    pub fn undo_all(&mut self) {
        while self.undo_last().is_ok() {}
    }

    /// Makes every coin played so far permanent
    pub fn commit(&mut self) {
        self.history.clear();
    }

    pub fn occupant_at(&self, column: usize, row: usize) -> Option<Player> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let bit = 1u64 << self.cell(column, row);
        if self.occupied & bit == 0 {
            None
        } else if self.owner & bit == 0 {
            Some(Player::One)
        } else {
            Some(Player::Two)
        }
    }

    pub fn coins_in_column(&self, column: usize) -> Result<usize> {
        self.check_column(column)?;
        Ok(self.heights[column])
    }

    pub fn playable(&self, column: usize) -> bool {
        column < self.columns && self.heights[column] < self.rows
    }

    pub fn playable_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.columns).filter(move |&column| self.playable(column))
    }

    pub fn first_playable_column(&self) -> Option<usize> {
        self.playable_columns().next()
    }

    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&height| height == self.rows)
    }

    pub fn num_moves(&self) -> usize {
        self.occupied.count_ones() as usize
    }

    pub fn empty_cells(&self) -> usize {
        self.columns * self.rows - self.num_moves()
    }

    /// Number of coins that can still be taken back
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn last_played_column(&self) -> Option<usize> {
        self.history.last().map(|index| index % self.columns)
    }

    /// Row of the topmost coin in `column`, if any
    pub fn top_row(&self, column: usize) -> Option<usize> {
        self.heights.get(column).and_then(|height| height.checked_sub(1))
    }

    // key for a transposition table, nothing caches positions yet
    pub fn key(&self) -> u128 {
        (self.occupied as u128) << 64 | self.owner as u128
    }

    /// True if the masks agree with the column counts and every column obeys gravity
    pub fn is_consistent(&self) -> bool {
        if self.owner & !self.occupied != 0 {
            return false;
        }
        (0..self.columns).all(|column| {
            let height = self.heights[column];
            (0..self.rows).all(|row| {
                let bit = 1u64 << self.cell(column, row);
                (self.occupied & bit != 0) == (row < height)
            })
        })
    }
}

/// A speculative coin, taken back when dropped
pub struct PlacedCoin<'a> {
    board: &'a mut BitBoard,
}

impl Deref for PlacedCoin<'_> {
    type Target = BitBoard;

    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl DerefMut for PlacedCoin<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.board
    }
}

impl Drop for PlacedCoin<'_> {
    fn drop(&mut self) {
        let undone = self.board.undo_last();
        debug_assert!(undone.is_ok(), "placed coin was no longer on the history");
    }
}
