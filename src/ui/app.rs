use crate::ai::{Agent, MinimaxAgent, RandomAgent};
use crate::config::AppConfig;
use crate::error::BoardError;
use crate::game::{GameOutcome, GameState, MoveError, Player};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::io;

/// Human-versus-computer game loop. Owns the authoritative game state and
/// asks the minimax agent for a reply after every human move.
pub struct App {
    config: AppConfig,
    game_state: GameState,
    computer: MinimaxAgent,
    fallback: RandomAgent,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self, BoardError> {
        let computer = MinimaxAgent::new(config.search.depth).parallel(config.search.parallel);
        let mut app = App {
            game_state: Self::fresh_game(&config)?,
            selected_column: config.board.width / 2,
            config,
            computer,
            fallback: RandomAgent::new(),
            should_quit: false,
            message: None,
        };
        app.computer_turn();
        Ok(app)
    }

    fn fresh_game(config: &AppConfig) -> Result<GameState, BoardError> {
        let first = if config.game.human_first {
            Player::Human
        } else {
            Player::Computer
        };
        GameState::new(config.board.height, config.board.width, first)
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press; the outcome stays up until restart
        if !self.game_state.is_terminal() {
            self.message = None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column + 1 < self.config.board.width {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char('r') => self.restart(),
            _ => {}
        }
    }

    fn restart(&mut self) {
        match Self::fresh_game(&self.config) {
            Ok(state) => {
                self.game_state = state;
                self.selected_column = self.config.board.width / 2;
                self.message = Some("New game started!".to_string());
                self.computer_turn();
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    /// Drop the human's piece in the selected column, then let the computer reply.
    fn drop_piece(&mut self) {
        if let Some(outcome) = self.game_state.outcome() {
            self.message = Some(format!(
                "{} Press 'r' to restart.",
                Self::outcome_text(outcome)
            ));
            return;
        }
        if self.game_state.current_player() != Player::Human {
            return;
        }
        match self.game_state.apply_move_mut(self.selected_column) {
            Ok(()) => {
                if !self.announce_outcome() {
                    self.computer_turn();
                }
            }
            Err(MoveError::GameOver) => {
                self.message = Some("Game over! Press 'r' to restart.".to_string());
            }
            Err(MoveError::Board(BoardError::InvalidMove { .. })) => {
                self.message = Some("Column is full!".to_string());
            }
            Err(MoveError::Board(e)) => {
                self.message = Some(e.to_string());
            }
        }
    }

    /// Play the computer's move if it is the computer's turn.
    fn computer_turn(&mut self) {
        if self.game_state.is_terminal() || self.game_state.current_player() != Player::Computer {
            return;
        }

        let column = match self.computer.select_action(&self.game_state) {
            Ok(Some(column)) => Some(column),
            Ok(None) => {
                log::warn!("minimax offered no column, playing a random move");
                self.random_column()
            }
            Err(e) => {
                log::warn!("minimax failed ({e}), playing a random move");
                self.random_column()
            }
        };

        let Some(column) = column else {
            return;
        };
        if let Err(e) = self.game_state.apply_move_mut(column) {
            self.message = Some(format!("Computer move failed: {e}"));
            return;
        }
        self.announce_outcome();
    }

    fn random_column(&mut self) -> Option<usize> {
        self.fallback.select_action(&self.game_state).ok().flatten()
    }

    /// Set the end-of-game message. Returns true when the game is over.
    fn announce_outcome(&mut self) -> bool {
        let Some(outcome) = self.game_state.outcome() else {
            return false;
        };
        let text = Self::outcome_text(outcome);
        log::info!("game over: {text}");
        self.message = Some(text);
        true
    }

    fn outcome_text(outcome: GameOutcome) -> String {
        match outcome {
            GameOutcome::Winner(player) => format!("{} wins!", player.name()),
            GameOutcome::Draw => "It's a draw!".to_string(),
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let board = self.game_state.preview(self.selected_column);
        super::game_view::render(
            frame,
            &self.game_state,
            &board,
            self.selected_column,
            &self.message,
            self.computer.depth(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn pieces(app: &App) -> usize {
        let board = app.game_state().board();
        (0..board.height())
            .flat_map(|row| (0..board.width()).map(move |col| (row, col)))
            .filter(|&(row, col)| board.at(row, col).map_or(false, |c| c.player().is_some()))
            .count()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn config(human_first: bool) -> AppConfig {
        let mut config = AppConfig::default();
        config.search.depth = 3;
        config.search.parallel = false;
        config.game.human_first = human_first;
        config
    }

    #[test]
    fn test_computer_replies_to_human_move() {
        let mut app = App::new(config(true)).unwrap();
        assert_eq!(app.game_state().current_player(), Player::Human);

        press(&mut app, KeyCode::Enter);

        assert_eq!(pieces(&app), 2);
        assert_eq!(app.game_state().current_player(), Player::Human);
    }

    #[test]
    fn test_computer_opens_when_first() {
        let app = App::new(config(false)).unwrap();
        assert_eq!(app.game_state().current_player(), Player::Human);
        assert_eq!(pieces(&app), 1);
    }

    #[test]
    fn test_cursor_stays_on_board() {
        let mut app = App::new(config(true)).unwrap();
        for _ in 0..10 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.selected_column, 6);
        for _ in 0..10 {
            press(&mut app, KeyCode::Left);
        }
        assert_eq!(app.selected_column, 0);
    }

    #[test]
    fn test_restart_clears_board() {
        let mut app = App::new(config(true)).unwrap();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(pieces(&app), 0);
        assert_eq!(app.message(), Some("New game started!"));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(config(true)).unwrap();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_human_win_message_survives_further_input() {
        let mut app = App::new(config(true)).unwrap();
        let board = crate::game::Board::from_rows(&[
            ".......", //
            ".......",
            ".......",
            ".......",
            "X......",
            "OOO..XX",
        ])
        .unwrap();
        app.game_state = GameState::from_board(board, Player::Human);
        app.selected_column = 3;

        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.game_state().outcome(),
            Some(GameOutcome::Winner(Player::Human))
        );
        assert_eq!(app.message(), Some("Human wins!"));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.message(), Some("Human wins! Press 'r' to restart."));

        press(&mut app, KeyCode::Left);
        assert_eq!(app.message(), Some("Human wins! Press 'r' to restart."));
        assert_eq!(pieces(&app), 7);
    }
}
