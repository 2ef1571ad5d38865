use anyhow::Result;
use clap::Parser;
use indicatif::ProgressBar;

use std::io::{stdin, stdout, Stdin, Write};
use std::time::Duration;

use connect4_timed::*;

mod display;
use display::display;

/// Play Connect 4 against a time-bounded search engine, or watch two engines play
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Width of the board
    #[arg(long, default_value_t = DEFAULT_COLUMNS)]
    columns: usize,

    /// Height of the board
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,

    /// Number of aligned coins needed to win
    #[arg(long, default_value_t = DEFAULT_CONNECT)]
    connect: usize,

    /// Thinking time per engine move in milliseconds
    #[arg(long, default_value_t = 10_000)]
    time_ms: u64,

    /// Deepest search iteration to run, unlimited by default
    #[arg(long)]
    max_depth: Option<usize>,
}

fn ask_yes_no(stdin: &Stdin, question: &str) -> Result<bool> {
    loop {
        let mut buffer = String::new();
        print!("{} y/n: ", question);
        stdout().flush()?;
        stdin.read_line(&mut buffer)?;
        match buffer.to_lowercase().chars().next() {
            Some('y') => return Ok(true),
            Some('n') => return Ok(false),
            _ => println!("Unknown answer given"),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let stdin = stdin();

    println!("Welcome to Connect 4\n");

    // the harness keeps its own copy of the game to validate human moves and draw it
    let mut board = BitBoard::with_connect(args.columns, args.rows, args.connect)?;

    let mut engines: Vec<Engine> = Vec::new();
    for &player in &[Player::One, Player::Two] {
        if ask_yes_no(&stdin, &format!("Is player {} AI controlled?", player.id()))? {
            let config = EngineConfig::new(args.columns, args.rows, player)
                .with_connect(args.connect)
                .with_time_budget(Duration::from_millis(args.time_ms))
                .with_max_depth(args.max_depth);
            engines.push(Engine::initialize(config)?);
        }
    }

    let both_ai = engines.len() == 2;
    let mut player = Player::One;

    // game loop
    loop {
        display(&board)?;

        match board.outcome() {
            Outcome::Ongoing => {
                let column = match engines.iter_mut().find(|engine| engine.player() == player) {
                    // AI player
                    Some(engine) => {
                        // slow down play if both players are AI
                        if both_ai {
                            std::thread::sleep(Duration::from_millis(500));
                        }

                        let spinner = ProgressBar::new_spinner();
                        spinner.set_message(&format!("{} is thinking...", player));
                        spinner.enable_steady_tick(100);
                        let decision = engine.request_decision();
                        spinner.finish_and_clear();

                        println!(
                            "{} plays {} (search depth {} in {:.2}s)",
                            player,
                            decision.column + 1,
                            decision.completed_depth,
                            decision.elapsed.as_secs_f64()
                        );
                        decision.column
                    }

                    // human player
                    None => {
                        print!("{} move input > ", player);
                        stdout().flush()?;
                        let mut input_str = String::new();
                        stdin.read_line(&mut input_str)?;

                        match input_str.trim().parse::<usize>() {
                            Ok(column) if column >= 1 => column - 1,
                            _ => {
                                println!("Invalid number: {}", input_str.trim());
                                continue;
                            }
                        }
                    }
                };

                if let Err(err) = board.add_coin(column, player) {
                    println!("{}", err);
                    // try the move again
                    continue;
                }
                board.commit();
                for engine in engines.iter_mut() {
                    engine.notify_move(column, player)?;
                }
                player = player.other();
            }

            // end states
            Outcome::Win(winner) => {
                println!("{} wins!", winner);
                break;
            }
            Outcome::Tie => {
                println!("Tie!");
                break;
            }
        }
    }
    Ok(())
}
