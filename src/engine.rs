//! The host-facing engine: keeps the real game in sync and picks moves
//! with a time-bounded iterative deepening search
//!
//! Each depth is searched on a single long-lived worker thread. The board is
//! moved into the worker together with the job and handed back with the
//! result, so only one side can ever touch it. When the budget runs out the
//! driver raises the cancellation token and waits for the worker to unwind
//! and return the restored board before reading anything.

use log::{debug, error, info, trace, warn};
use rayon::{ThreadPool, ThreadPoolBuilder};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{
    config::EngineConfig,
    error::*,
    evaluator::WIN_SCORE,
    search::{Interrupted, SearchResult, Searcher},
    terminal::Outcome,
    BitBoard, Player,
};

/// What a move request settled on
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Decision {
    pub column: usize,
    /// Value of `column` at `completed_depth`, `None` if no depth completed
    pub value: Option<f64>,
    /// Deepest cutoff whose search ran to completion, 0 if none did
    pub completed_depth: usize,
    pub timed_out: bool,
    pub elapsed: Duration,
    /// Nodes visited across all iterations, including an interrupted one
    pub node_count: usize,
}

// sent back by the worker after every iteration
struct IterationReport {
    board: BitBoard,
    result: Result<SearchResult, Interrupted>,
    node_count: usize,
}

enum Iteration {
    Completed(SearchResult),
    TimedOut,
}

/// A Connect 4 player for one side of a game
pub struct Engine {
    config: EngineConfig,
    board: BitBoard,
    worker: ThreadPool,
}

impl Engine {
    /// Sets up an empty board and the search worker
    pub fn initialize(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let board = BitBoard::with_connect(config.columns, config.rows, config.connect)?;
        let worker = ThreadPoolBuilder::new()
            .num_threads(1)
            .thread_name(move |_| format!("connect4-search-{}", config.player.id()))
            .panic_handler(|_| error!("search worker panicked"))
            .build()
            .map_err(|err| {
                GameError::InvalidConfiguration(format!("could not start search worker: {}", err))
            })?;

        debug!(
            "engine for {} on a {}x{} board (connect {}), budget {:?}",
            config.player, config.columns, config.rows, config.connect, config.time_budget
        );
        Ok(Self {
            config,
            board,
            worker,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn player(&self) -> Player {
        self.config.player
    }

    pub fn board(&self) -> &BitBoard {
        &self.board
    }

    /// Records a real move by either player
    ///
    /// Every move of the game, including the ones this engine chose, must be
    /// notified before the next move request.
    pub fn notify_move(&mut self, column: usize, player: Player) -> Result<()> {
        self.board.add_coin(column, player)?;
        self.board.commit();
        trace!("{} played column {}", player, column);
        Ok(())
    }

    pub fn outcome(&self) -> Outcome {
        self.board.outcome()
    }

    /// Picks a playable column within the time budget
    ///
    /// Falls back to the first playable column (or 0 on a full board) if no
    /// search depth completes.
    pub fn request_move(&mut self) -> usize {
        self.request_decision().column
    }

    /// Like [`request_move`](Engine::request_move), with the details of the search
    pub fn request_decision(&mut self) -> Decision {
        let start = Instant::now();

        // the snapshot stays in place while the real board is out on the worker
        let snapshot = self.board.clone();
        let board = std::mem::replace(&mut self.board, snapshot);
        let (board, mut decision) = self.deepen(board, start);

        self.restore_board(board);

        if decision.completed_depth == 0 {
            warn!(
                "no search depth completed, falling back to column {}",
                decision.column
            );
        }
        decision.elapsed = start.elapsed();
        info!(
            "{} plays column {} (value {:?}, depth {}, {} nodes, {:?})",
            self.config.player,
            decision.column,
            decision.value,
            decision.completed_depth,
            decision.node_count,
            decision.elapsed
        );
        decision
    }

    /// Takes back the board handed out to the worker, keeping the snapshot
    /// if it went missing or does not match the position it was given
    pub(crate) fn restore_board(&mut self, board: Option<BitBoard>) {
        match board {
            Some(board) if board == self.board => self.board = board,
            Some(_) => error!("search did not restore the board, keeping the snapshot"),
            None => warn!("search worker lost the board, restored the position from a snapshot"),
        }
    }

    // column to play when nothing better is known
    fn default_column(&self) -> usize {
        self.board.first_playable_column().unwrap_or(0)
    }

    /// Searches with increasing cutoffs until the budget runs out or a deeper
    /// search can no longer change the answer
    ///
    /// Returns the board if the worker handed it back.
    fn deepen(&self, board: BitBoard, start: Instant) -> (Option<BitBoard>, Decision) {
        let mut decision = Decision {
            column: self.default_column(),
            value: None,
            completed_depth: 0,
            timed_out: false,
            elapsed: Duration::from_secs(0),
            node_count: 0,
        };
        let cancel = Arc::new(AtomicBool::new(false));
        let mut board = Some(board);

        let mut cutoff = 1;
        while let Some(current) = board.take() {
            if self.config.max_depth.map_or(false, |max| cutoff > max) {
                board = Some(current);
                break;
            }
            let remaining = match self.config.time_budget.checked_sub(start.elapsed()) {
                Some(remaining) if remaining > Duration::from_secs(0) => remaining,
                _ => {
                    decision.timed_out = true;
                    board = Some(current);
                    break;
                }
            };
            let empty_cells = current.empty_cells();

            let (returned, iteration) = self.run_iteration(current, cutoff, remaining, &cancel);
            board = returned;
            let result = match iteration {
                Some((Iteration::Completed(result), node_count)) => {
                    decision.node_count += node_count;
                    result
                }
                Some((Iteration::TimedOut, node_count)) => {
                    decision.node_count += node_count;
                    decision.timed_out = true;
                    debug!("depth {} timed out after {:?}", cutoff, start.elapsed());
                    break;
                }
                None => break,
            };

            let column = match result.best_move {
                Some(column) => column,
                None => break,
            };
            decision.column = column;
            decision.value = Some(result.value);
            decision.completed_depth = cutoff;
            debug!(
                "depth {} completed: column {}, value {}, {:?}",
                cutoff,
                column,
                result.value,
                start.elapsed()
            );

            // a proven result or a horizon past the end of the game cannot improve
            if result.value.abs() >= WIN_SCORE || cutoff + 2 >= empty_cells {
                break;
            }
            cutoff += 1;
        }
        (board, decision)
    }

    /// Hands one fixed-depth search to the worker and waits at most `remaining` for it
    ///
    /// `None` means the worker went away without reporting, taking the board with it.
    fn run_iteration(
        &self,
        board: BitBoard,
        cutoff: usize,
        remaining: Duration,
        cancel: &Arc<AtomicBool>,
    ) -> (Option<BitBoard>, Option<(Iteration, usize)>) {
        let (tx, rx) = channel();
        let token = Arc::clone(cancel);
        let player = self.config.player;

        self.worker.spawn(move || {
            let mut board = board;
            let mut searcher = Searcher::new(player, cutoff, &token);
            let result = searcher.search(&mut board);
            let node_count = searcher.node_count;
            // the driver only stops listening once it has the board back
            let _ = tx.send(IterationReport {
                board,
                result,
                node_count,
            });
        });

        let report = match rx.recv_timeout(remaining) {
            Ok(report) => report,
            Err(RecvTimeoutError::Timeout) => {
                cancel.store(true, Ordering::Relaxed);
                // wait for the worker to unwind and give the board back
                return match rx.recv() {
                    Ok(report) => (
                        Some(report.board),
                        Some((Iteration::TimedOut, report.node_count)),
                    ),
                    Err(_) => (None, None),
                };
            }
            Err(RecvTimeoutError::Disconnected) => return (None, None),
        };

        let iteration = match report.result {
            Ok(result) => Iteration::Completed(result),
            Err(Interrupted) => Iteration::TimedOut,
        };
        (Some(report.board), Some((iteration, report.node_count)))
    }
}
