use crate::error::SearchError;
use crate::game::GameState;

/// Anything that can pick a column for the side to move.
pub trait Agent {
    /// Select a column for the current player. `None` means the agent has no
    /// move to offer (the game is over or no column is open).
    fn select_action(&mut self, state: &GameState) -> Result<Option<usize>, SearchError>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
