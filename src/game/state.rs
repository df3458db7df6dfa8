use super::{Board, Cell, Player};
use crate::error::BoardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("the game is already over")]
    GameOver,

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// The authoritative game as seen by a driver: one board, whose turn it is,
/// and the outcome once the game has ended.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    outcome: Option<GameOutcome>,
}

impl GameState {
    /// Start a game on an empty board of the given size
    pub fn new(height: usize, width: usize, first: Player) -> Result<Self, BoardError> {
        Ok(Self::from_board(Board::new(height, width)?, first))
    }

    /// Resume from an existing position, deriving the outcome from the board.
    pub fn from_board(board: Board, to_move: Player) -> Self {
        let outcome = Self::outcome_of(&board);
        GameState {
            board,
            current_player: to_move,
            outcome,
        }
    }

    fn outcome_of(board: &Board) -> Option<GameOutcome> {
        if let Some(winner) = board.check_winner() {
            Some(GameOutcome::Winner(winner))
        } else if board.is_full() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Columns the current player may drop into
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.placeable_columns().collect()
    }

    /// Apply a move for the current player and return the new state
    pub fn apply_move(&self, column: usize) -> Result<GameState, MoveError> {
        let mut next = self.clone();
        next.apply_move_mut(column)?;
        Ok(next)
    }

    /// Apply a move in place. The board is swapped for the placed snapshot,
    /// so a failed move leaves the state untouched.
    pub fn apply_move_mut(&mut self, column: usize) -> Result<(), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        self.board = self.board.place(column, self.current_player.to_cell())?;
        self.outcome = Self::outcome_of(&self.board);
        self.current_player = self.current_player.other();

        Ok(())
    }

    /// Board copy with a preview marker where the current player's piece
    /// would land. Columns that cannot take a piece yield the plain board.
    pub fn preview(&self, column: usize) -> Board {
        if self.is_terminal() {
            return self.board.clone();
        }
        match self.board.place(column, Cell::Preview) {
            Ok(board) => board,
            Err(_) => self.board.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard(first: Player) -> GameState {
        GameState::new(6, 7, first).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let state = standard(Player::Human);
        assert_eq!(state.current_player(), Player::Human);
        assert!(!state.is_terminal());
        assert_eq!(state.legal_actions().len(), 7);
    }

    #[test]
    fn test_apply_move() {
        let state = standard(Player::Human);
        let new_state = state.apply_move(3).unwrap();

        assert_eq!(new_state.current_player(), Player::Computer);
        assert_eq!(new_state.board().at(5, 3), Ok(Cell::Human));
        assert_eq!(state.board().at(5, 3), Ok(Cell::Empty));
    }

    #[test]
    fn test_failed_move_keeps_turn() {
        let mut state = standard(Player::Computer);
        assert_eq!(
            state.apply_move_mut(9),
            Err(MoveError::Board(BoardError::InvalidMove { column: 9 }))
        );
        assert_eq!(state.current_player(), Player::Computer);
        assert_eq!(state.board(), &Board::standard());
    }

    #[test]
    fn test_win_detection() {
        let mut state = standard(Player::Human);

        // Human wins along the bottom row
        for col in 0..4 {
            state = state.apply_move(col).unwrap(); // Human
            if col < 3 {
                state = state.apply_move(col).unwrap(); // Computer (row above)
            }
        }

        assert!(state.is_terminal());
        assert_eq!(state.outcome(), Some(GameOutcome::Winner(Player::Human)));
        assert_eq!(state.apply_move(5), Err(MoveError::GameOver));
        assert!(state.legal_actions().is_empty());
    }

    #[test]
    fn test_draw() {
        let board = Board::from_rows(&["OX.", "XOX", "OXO"]).unwrap();
        let state = GameState::from_board(board, Player::Human);
        assert!(!state.is_terminal());

        let state = state.apply_move(2).unwrap();
        assert_eq!(state.outcome(), Some(GameOutcome::Draw));
    }

    #[test]
    fn test_preview_marks_landing_cell() {
        let state = standard(Player::Human).apply_move(1).unwrap();
        let hovered = state.preview(1);
        assert_eq!(hovered.at(4, 1), Ok(Cell::Preview));
        assert_eq!(state.board().at(4, 1), Ok(Cell::Empty));
    }

    #[test]
    fn test_preview_ignores_unplaceable_column() {
        let state = standard(Player::Human);
        assert_eq!(&state.preview(42), state.board());
    }
}
