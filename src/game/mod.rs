//! Core game model: the drop grid with gravity placement and winner
//! detection, the two players, and a driver-facing game state.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, STANDARD_HEIGHT, STANDARD_WIDTH};
pub use player::Player;
pub use state::{GameOutcome, GameState, MoveError};
