//! Terminal driver: a human plays against the minimax engine on a board of
//! any configured size, with a hover preview of the selected column.

mod app;
mod game_view;

pub use app::App;
