use rayon::prelude::*;

use crate::error::SearchError;
use crate::game::{Board, GameState, Player};

use super::agent::Agent;

/// Base magnitude of a decided game. The remaining depth is added on top so
/// that sooner wins and later losses are preferred.
pub const WIN_SCORE: f64 = 1.0;
/// Score of an undecided position at the search horizon.
pub const NO_SCORE: f64 = 0.0;

/// The side whose score the engine raises. The other side lowers it.
pub const MAXIMIZER: Player = Player::Computer;

/// Score and chosen column of one search node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    pub score: f64,
    pub column: Option<usize>,
}

impl SearchOutcome {
    const NEUTRAL: SearchOutcome = SearchOutcome {
        score: NO_SCORE,
        column: None,
    };

    fn decided(winner: Player, depth: usize) -> Self {
        let magnitude = WIN_SCORE + depth as f64;
        SearchOutcome {
            score: if winner == MAXIMIZER {
                magnitude
            } else {
                -magnitude
            },
            column: None,
        }
    }
}

/// A search outcome together with the number of nodes visited to reach it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub nodes: u64,
}

/// Running best child for one node.
struct Best {
    side: Player,
    score: f64,
    column: Option<usize>,
}

impl Best {
    fn new(side: Player) -> Self {
        let score = if side == MAXIMIZER {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        Best {
            side,
            score,
            column: None,
        }
    }

    /// Strict comparison: among equal scores the earliest offered column stays.
    fn offer(&mut self, column: usize, score: f64) {
        let better = if self.side == MAXIMIZER {
            score > self.score
        } else {
            score < self.score
        };
        if better {
            self.score = score;
            self.column = Some(column);
        }
    }

    fn finish(self) -> SearchOutcome {
        match self.column {
            Some(column) => SearchOutcome {
                score: self.score,
                column: Some(column),
            },
            // No placeable column and no winner: a drawn position.
            None => SearchOutcome::NEUTRAL,
        }
    }
}

/// Choose the best column for `side_to_move`, looking `depth` plies ahead.
///
/// The board is never modified; every explored move works on its own
/// snapshot. Boards carrying a preview marker are rejected.
pub fn search(
    board: &Board,
    depth: usize,
    side_to_move: Player,
) -> Result<SearchOutcome, SearchError> {
    search_with_report(board, depth, side_to_move).map(|report| report.outcome)
}

/// Same as [`search`], also reporting how many nodes were visited.
pub fn search_with_report(
    board: &Board,
    depth: usize,
    side_to_move: Player,
) -> Result<SearchReport, SearchError> {
    reject_preview(board)?;

    let mut nodes = 0;
    let outcome = minimax(board, depth, side_to_move, &mut nodes)?;
    log::debug!(
        "minimax depth {depth} for {}: column {:?} score {} ({nodes} nodes)",
        side_to_move.name(),
        outcome.column,
        outcome.score
    );
    Ok(SearchReport { outcome, nodes })
}

/// Like [`search`], but the subtrees of the root's candidate columns are
/// evaluated in parallel. Children are combined in ascending column order,
/// so the result is identical to the sequential search.
pub fn search_parallel(
    board: &Board,
    depth: usize,
    side_to_move: Player,
) -> Result<SearchOutcome, SearchError> {
    search_parallel_with_report(board, depth, side_to_move).map(|report| report.outcome)
}

/// Same as [`search_parallel`], also reporting how many nodes were visited.
pub fn search_parallel_with_report(
    board: &Board,
    depth: usize,
    side_to_move: Player,
) -> Result<SearchReport, SearchError> {
    reject_preview(board)?;

    if let Some(outcome) = settled(board, depth) {
        return Ok(SearchReport { outcome, nodes: 1 });
    }

    let columns: Vec<usize> = board.placeable_columns().collect();
    let children: Vec<Result<(usize, SearchOutcome, u64), SearchError>> = columns
        .par_iter()
        .map(|&column| -> Result<(usize, SearchOutcome, u64), SearchError> {
            let child = place(board, column, side_to_move)?;
            let mut nodes = 0;
            let outcome = minimax(&child, depth - 1, side_to_move.other(), &mut nodes)?;
            Ok((column, outcome, nodes))
        })
        .collect();

    let mut best = Best::new(side_to_move);
    let mut nodes = 1;
    for child in children {
        let (column, outcome, child_nodes) = child?;
        nodes += child_nodes;
        best.offer(column, outcome.score);
    }

    let outcome = best.finish();
    log::debug!(
        "parallel minimax depth {depth} for {}: column {:?} score {} ({nodes} nodes)",
        side_to_move.name(),
        outcome.column,
        outcome.score
    );
    Ok(SearchReport { outcome, nodes })
}

fn reject_preview(board: &Board) -> Result<(), SearchError> {
    match board.find_preview() {
        Some((row, col)) => Err(SearchError::PreviewCell { row, col }),
        None => Ok(()),
    }
}

/// Outcome of a node that needs no expansion: a decided board, or the horizon.
fn settled(board: &Board, depth: usize) -> Option<SearchOutcome> {
    if let Some(winner) = board.check_winner() {
        return Some(SearchOutcome::decided(winner, depth));
    }
    if depth == 0 {
        return Some(SearchOutcome::NEUTRAL);
    }
    None
}

fn place(board: &Board, column: usize, side: Player) -> Result<Board, SearchError> {
    board
        .place(column, side.to_cell())
        .map_err(|source| SearchError::Placement { column, source })
}

fn minimax(
    board: &Board,
    depth: usize,
    side: Player,
    nodes: &mut u64,
) -> Result<SearchOutcome, SearchError> {
    *nodes += 1;

    if let Some(outcome) = settled(board, depth) {
        return Ok(outcome);
    }

    let mut best = Best::new(side);
    for column in board.placeable_columns() {
        let child = place(board, column, side)?;
        let outcome = minimax(&child, depth - 1, side.other(), nodes)?;
        best.offer(column, outcome.score);
    }

    Ok(best.finish())
}

/// Agent that plays the minimax choice for whichever side is to move.
pub struct MinimaxAgent {
    depth: usize,
    parallel: bool,
}

impl MinimaxAgent {
    pub fn new(depth: usize) -> Self {
        MinimaxAgent {
            depth,
            parallel: false,
        }
    }

    /// Evaluate root candidates on the rayon thread pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Agent for MinimaxAgent {
    fn select_action(&mut self, state: &GameState) -> Result<Option<usize>, SearchError> {
        if state.is_terminal() {
            return Ok(None);
        }
        let report = if self.parallel {
            search_parallel_with_report(state.board(), self.depth, state.current_player())?
        } else {
            search_with_report(state.board(), self.depth, state.current_player())?
        };
        Ok(report.outcome.column)
    }

    fn name(&self) -> &str {
        "Minimax"
    }
}
