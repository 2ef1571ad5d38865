use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connect4_timed::{BitBoard, Player};

/// Draws the board top row first, with 1-indexed column labels above it
pub fn display(board: &BitBoard) -> Result<()> {
    let mut stdout = stdout();

    let cols: String = (1..=board.columns())
        .map(|x| (x % 10).to_string())
        .collect();
    stdout.queue(PrintStyledContent(style(cols + "\n")))?;

    for row in (0..board.rows()).rev() {
        for column in 0..board.columns() {
            stdout.queue(PrintStyledContent(
                style("O")
                    .attribute(Attribute::Bold)
                    .on(Color::DarkBlue)
                    .with(match board.occupant_at(column, row) {
                        Some(Player::One) => Color::Red,
                        Some(Player::Two) => Color::Yellow,
                        None => Color::DarkBlue,
                    }),
            ))?;
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;
    Ok(())
}
